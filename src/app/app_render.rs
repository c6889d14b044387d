use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, List, ListItem, ListState, Paragraph},
};
use serde_json::Value;

use super::app_state::App;

const HELP_TEXT: &str = "↑↓ move  Enter select  Esc quit";

impl App {
    pub fn render(&mut self, frame: &mut Frame) {
        self.layout_regions = Default::default();

        let layout = Layout::vertical([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(frame.area());
        let (input_area, results_area, help_area) = (layout[0], layout[1], layout[2]);

        self.render_input(frame, input_area);
        self.layout_regions.input_field = Some(input_area);

        let mut bounds = input_area;
        if self.widget.is_visible() && !self.widget.results().is_empty() {
            let list_rect = self.render_results(frame, results_area);
            self.layout_regions.results_list = Some(list_rect);
            bounds = bounds.union(list_rect);
        }
        self.widget.set_bounds(bounds);

        self.render_help_line(frame, help_area);
    }

    fn render_input(&mut self, frame: &mut Frame, area: Rect) {
        let title = if self.widget.is_loading() {
            " Searching… "
        } else {
            " Search "
        };
        let border = if self.widget.is_visible() {
            Color::Cyan
        } else {
            Color::DarkGray
        };
        self.input.set_block(
            Block::bordered()
                .title(title)
                .border_style(Style::default().fg(border)),
        );
        frame.render_widget(&self.input, area);
    }

    fn render_results(&self, frame: &mut Frame, area: Rect) -> Rect {
        let results = self.widget.results();
        // Borders plus one row per item, capped by the space available
        let height = (results.len() as u16).saturating_add(2).min(area.height);
        let list_rect = Rect { height, ..area };

        let key = self.result_key.as_deref();
        let items: Vec<ListItem> = results
            .iter()
            .map(|item| ListItem::new(item_label(item, key)))
            .collect();

        let list = List::new(items)
            .block(
                Block::bordered()
                    .title(format!(" Results ({}) ", results.len()))
                    .border_style(Style::default().fg(Color::Cyan)),
            )
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
            .highlight_symbol("> ");

        let mut state = ListState::default().with_selected(Some(self.cursor));
        frame.render_stateful_widget(list, list_rect, &mut state);
        list_rect
    }

    fn render_help_line(&self, frame: &mut Frame, area: Rect) {
        let line = match &self.status {
            Some(status) => Line::from(Span::styled(
                status.as_str(),
                Style::default().fg(Color::Yellow),
            )),
            None => Line::from(Span::styled(
                HELP_TEXT,
                Style::default().fg(Color::DarkGray),
            )),
        };
        frame.render_widget(Paragraph::new(line), area);
    }
}

/// Display text for a result item: the `result_key` field of an object when
/// configured and present, otherwise the item itself
pub fn item_label(item: &Value, result_key: Option<&str>) -> String {
    let value = match (result_key, item) {
        (Some(key), Value::Object(map)) => map.get(key).unwrap_or(item),
        _ => item,
    };
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
