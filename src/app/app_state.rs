use ratatui::layout::Rect;
use serde_json::Value;
use std::sync::mpsc::{self, Receiver};
use tui_textarea::TextArea;

use crate::config::SearchConfig;
use crate::dispatch::{ActionDispatcher, SearchAction};
use crate::error::SearchError;
use crate::lookup::Lookup;
use crate::visibility::ClickRegistry;
use crate::widget::SearchWidget;

pub const DEFAULT_PLACEHOLDER: &str = "Type to search...";

/// Screen regions recorded during the last render, used for mouse hit testing
#[derive(Debug, Default, Clone, Copy)]
pub struct LayoutRegions {
    pub input_field: Option<Rect>,
    pub results_list: Option<Rect>,
}

pub struct App {
    pub widget: SearchWidget,
    pub input: TextArea<'static>,
    pub clicks: ClickRegistry,
    /// Host side of the widget's event bus
    pub actions: Receiver<SearchAction>,
    /// Highlighted row in the results list
    pub cursor: usize,
    pub status: Option<String>,
    pub selected: Option<Value>,
    pub layout_regions: LayoutRegions,
    pub(super) result_key: Option<String>,
    pub(super) last_query: String,
    should_quit: bool,
}

impl App {
    pub fn new(config: SearchConfig, lookup: Lookup) -> Result<Self, SearchError> {
        let (action_tx, actions) = mpsc::channel();
        let result_key = config.result_key.clone();

        let mut input = TextArea::default();
        input.set_placeholder_text(
            config
                .placeholder
                .clone()
                .unwrap_or_else(|| DEFAULT_PLACEHOLDER.to_string()),
        );
        input.set_cursor_line_style(ratatui::style::Style::default());

        let clicks = ClickRegistry::new();
        let mut widget = SearchWidget::new(config, lookup, ActionDispatcher::EventBus(action_tx))?;
        widget.mount(&clicks);
        // The input starts focused, which counts as interacting with the widget
        widget.activate();

        Ok(Self {
            widget,
            input,
            clicks,
            actions,
            cursor: 0,
            status: None,
            selected: None,
            layout_regions: LayoutRegions::default(),
            result_key,
            last_query: String::new(),
            should_quit: false,
        })
    }

    pub fn query(&self) -> &str {
        self.input.lines()[0].as_ref()
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    pub fn show_warning(&mut self, message: &str) {
        self.status = Some(message.to_string());
    }

    /// Item under the cursor, if the list is showing
    pub fn highlighted(&self) -> Option<&Value> {
        if !self.widget.is_visible() {
            return None;
        }
        self.widget.results().get(self.cursor)
    }
}

#[cfg(test)]
#[path = "app_state_tests.rs"]
mod app_state_tests;
