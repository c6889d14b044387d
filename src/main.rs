use clap::Parser;
use color_eyre::Result;
use color_eyre::eyre::eyre;
use ratatui::DefaultTerminal;
use ratatui::crossterm::event::{
    DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
};
use ratatui::crossterm::execute;
use ratatui::crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use std::io::stdout;
use std::path::PathBuf;
use std::time::Duration;

use hyper_search::app::App;
use hyper_search::config;
use hyper_search::{ActionDispatcher, Completion, Fetch, Lookup, SearchConfig, SearchWidget};

/// Search-as-you-type against a JSON endpoint
#[derive(Parser, Debug)]
#[command(
    version,
    about = "Search-as-you-type against a JSON endpoint, with cached and debounced lookups"
)]
struct Args {
    /// Config file (defaults to ~/.config/hyper-search/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Lookup endpoint; queried as GET <endpoint>?q=<query>
    #[arg(long)]
    endpoint: Option<String>,

    /// Minimum number of characters before a lookup is made
    #[arg(long)]
    min_query_length: Option<usize>,

    /// Quiet period in milliseconds before a typed query is searched
    #[arg(long)]
    debounce_rate: Option<u64>,

    /// Object field shown for each result
    #[arg(long)]
    result_key: Option<String>,

    /// Placeholder text for the search box
    #[arg(long)]
    placeholder: Option<String>,

    /// Hide the results when clicking outside the widget
    #[arg(long)]
    clear_on_outside_click: bool,

    /// Run a single lookup, print the results as JSON and exit
    #[arg(short, long)]
    query: Option<String>,
}

impl Args {
    fn apply_overrides(&self, config: &mut SearchConfig) {
        if let Some(endpoint) = &self.endpoint {
            config.endpoint = Some(endpoint.clone());
        }
        if let Some(min) = self.min_query_length {
            config.min_query_length = min;
        }
        if let Some(rate) = self.debounce_rate {
            config.debounce_rate = rate;
        }
        if let Some(key) = &self.result_key {
            config.result_key = Some(key.clone());
        }
        if let Some(placeholder) = &self.placeholder {
            config.placeholder = Some(placeholder.clone());
        }
        if self.clear_on_outside_click {
            config.clear_on_outside_click = true;
        }
    }
}

fn main() -> Result<()> {
    // Writes to /tmp/hyper-search-debug.log at DEBUG level
    #[cfg(debug_assertions)]
    {
        use std::io::Write;

        let log_file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open("/tmp/hyper-search-debug.log")
            .expect("Failed to open /tmp/hyper-search-debug.log");

        env_logger::Builder::new()
            .filter_level(log::LevelFilter::Debug)
            .target(env_logger::Target::Pipe(Box::new(log_file)))
            .format(|buf, record| {
                use std::time::SystemTime;
                let datetime: chrono::DateTime<chrono::Local> = SystemTime::now().into();
                writeln!(
                    buf,
                    "[{}] [{}] {}",
                    datetime.format("%Y-%m-%dT%H:%M:%S%.3f"),
                    record.level(),
                    record.args()
                )
            })
            .init();

        log::debug!("=== HYPER-SEARCH DEBUG SESSION STARTED ===");
    }

    color_eyre::install()?;

    let args = Args::parse();

    let mut config_result = match &args.config {
        Some(path) => config::load_config_from(path),
        None => config::load_config(),
    };
    args.apply_overrides(&mut config_result.config);

    if let Some(query) = &args.query {
        if let Some(warning) = &config_result.warning {
            eprintln!("Warning: {}", warning);
        }
        return run_once(config_result.config, query);
    }

    // Fail before touching the terminal
    let lookup = Lookup::from_config(&config_result.config)?;

    let terminal = init_terminal()?;
    let result = App::new(config_result.config, lookup)
        .map_err(color_eyre::Report::from)
        .and_then(|app| run(terminal, app, config_result.warning));

    restore_terminal()?;
    let app = result?;

    // Output after terminal restore to prevent corruption
    if let Some(item) = &app.selected {
        println!("{}", serde_json::to_string_pretty(item)?);
    }

    #[cfg(debug_assertions)]
    log::debug!("=== HYPER-SEARCH DEBUG SESSION ENDED ===");

    Ok(())
}

/// Resolve one query without the terminal UI
fn run_once(config: SearchConfig, query: &str) -> Result<()> {
    let timeout = Duration::from_millis(config.request_timeout_ms) + Duration::from_secs(1);
    let lookup = Lookup::from_config(&config)?;
    let mut widget = SearchWidget::new(config, lookup, ActionDispatcher::default())?;

    let results = match widget.fetch(query)? {
        Fetch::Ready(results) => results,
        Fetch::Pending { .. } => match widget.block_until_idle(timeout).pop() {
            Some(Completion::Applied { results, .. }) => results,
            Some(Completion::Failed { error, .. }) => return Err(error.into()),
            Some(Completion::Stale { .. }) | None => {
                return Err(eyre!("Timed out waiting for results for {:?}", query));
            }
        },
    };

    println!("{}", serde_json::to_string_pretty(&results)?);
    Ok(())
}

/// Initialize terminal with raw mode, alternate screen, bracketed paste and mouse capture
fn init_terminal() -> Result<DefaultTerminal> {
    let hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = execute!(
            stdout(),
            DisableMouseCapture,
            DisableBracketedPaste,
            LeaveAlternateScreen
        );
        let _ = disable_raw_mode();
        hook(info);
    }));

    enable_raw_mode()?;

    // If any subsequent operations fail, ensure raw mode is disabled
    if let Err(e) = execute!(
        stdout(),
        EnterAlternateScreen,
        EnableBracketedPaste,
        EnableMouseCapture
    ) {
        let _ = disable_raw_mode();
        return Err(e.into());
    }

    match ratatui::Terminal::new(ratatui::backend::CrosstermBackend::new(stdout())) {
        Ok(terminal) => Ok(terminal),
        Err(e) => {
            let _ = restore_terminal();
            Err(e.into())
        }
    }
}

/// Restore terminal to normal state
fn restore_terminal() -> Result<()> {
    let _ = execute!(
        stdout(),
        DisableMouseCapture,
        DisableBracketedPaste,
        LeaveAlternateScreen
    );
    disable_raw_mode()?;
    Ok(())
}

fn run(mut terminal: DefaultTerminal, mut app: App, warning: Option<String>) -> Result<App> {
    if let Some(warning) = warning {
        app.show_warning(&warning);
    }

    loop {
        terminal.draw(|frame| app.render(frame))?;

        app.handle_events()?;

        if app.should_quit() {
            break;
        }
    }

    Ok(app)
}
