//! Shared helpers for terminal host tests

use ratatui::Terminal;
use ratatui::backend::TestBackend;
use ratatui::crossterm::event::{
    Event, KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use serde_json::{Value, json};
use std::time::Duration;

use super::app_state::App;
use crate::config::SearchConfig;
use crate::lookup::{Lookup, LookupError};

const CATALOG: [&str; 4] = ["Catalog", "Category", "Caterpillar", "Dog"];

pub fn test_config() -> SearchConfig {
    SearchConfig {
        clear_on_outside_click: true,
        ..SearchConfig::default()
    }
}

/// Prefix match over a fixed catalog; queries starting with "err" fail
pub fn catalog_lookup() -> Lookup {
    Lookup::custom(|query: String| async move {
        if query.starts_with("err") {
            return Err(LookupError::Other("catalog offline".to_string()));
        }
        let needle = query.to_lowercase();
        Ok::<_, LookupError>(
            CATALOG
                .iter()
                .filter(|name| name.to_lowercase().starts_with(&needle))
                .map(|name| json!(name))
                .collect::<Vec<Value>>(),
        )
    })
}

pub fn test_app() -> App {
    App::new(test_config(), catalog_lookup()).unwrap()
}

pub fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

pub fn key_with_mods(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
    KeyEvent::new(code, modifiers)
}

pub fn type_str(app: &mut App, text: &str) {
    for c in text.chars() {
        app.handle_event(Event::Key(key(KeyCode::Char(c))));
    }
}

pub fn click(app: &mut App, column: u16, row: u16) {
    app.handle_event(Event::Mouse(MouseEvent {
        kind: MouseEventKind::Down(MouseButton::Left),
        column,
        row,
        modifiers: KeyModifiers::NONE,
    }));
}

/// Tick until the widget stops loading
pub fn settle(app: &mut App) {
    for _ in 0..500 {
        app.tick();
        if !app.widget.is_loading() {
            return;
        }
        std::thread::sleep(Duration::from_millis(10));
    }
    panic!("lookup did not finish");
}

pub fn render_to_string(app: &mut App, width: u16, height: u16) -> String {
    let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
    terminal.draw(|f| app.render(f)).unwrap();
    terminal.backend().to_string()
}
