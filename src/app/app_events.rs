use ratatui::crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};
use std::io;
use std::time::Duration;

use super::app_state::App;
use crate::coordinator::Completion;
use crate::dispatch::SearchAction;

const EVENT_POLL_TIMEOUT: Duration = Duration::from_millis(50);

impl App {
    pub fn handle_events(&mut self) -> io::Result<()> {
        self.tick();

        if event::poll(EVENT_POLL_TIMEOUT)? {
            let event = event::read()?;
            self.handle_event(event);
        }
        Ok(())
    }

    /// Fire due searches, apply finished lookups and drain host actions
    pub fn tick(&mut self) {
        for completion in self.widget.tick() {
            if let Completion::Failed { error, .. } = completion {
                self.status = Some(error.to_string());
            }
        }
        self.drain_actions();
    }

    pub fn drain_actions(&mut self) {
        while let Ok(action) = self.actions.try_recv() {
            log::trace!("Host action {}", action.name());
            match action {
                SearchAction::LoadingChanged(true) => self.status = None,
                SearchAction::LoadingChanged(false) => {}
                SearchAction::ResultsChanged(results) => {
                    self.cursor = self.cursor.min(results.len().saturating_sub(1));
                }
                SearchAction::ResultSelected(item) => {
                    self.selected = Some(item);
                    self.quit();
                }
            }
        }
    }

    pub fn handle_event(&mut self, event: Event) {
        match &event {
            Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key_event(*key),
            Event::Mouse(mouse) => self.handle_mouse_event(*mouse),
            Event::Paste(text) => {
                // The search box is a single line
                let text = text.replace("\r\n", " ").replace(['\r', '\n'], " ");
                self.input.insert_str(&text);
                self.on_input_changed(&event);
            }
            _ => {}
        }
    }

    pub fn handle_key_event(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Esc
            || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
        {
            self.quit();
            return;
        }

        match key.code {
            KeyCode::Up => {
                self.cursor = self.cursor.saturating_sub(1);
            }
            KeyCode::Down => {
                let last = self.widget.results().len().saturating_sub(1);
                self.cursor = (self.cursor + 1).min(last);
            }
            KeyCode::Enter => {
                if let Some(item) = self.highlighted().cloned() {
                    self.widget.select_result(&item);
                    self.drain_actions();
                }
            }
            _ => {
                if self.input.input(key) {
                    self.on_input_changed(&Event::Key(key));
                }
            }
        }
    }

    fn on_input_changed(&mut self, event: &Event) {
        let query = self.query().to_string();
        if query == self.last_query {
            return;
        }
        self.last_query = query.clone();
        self.widget.activate();

        if query.is_empty() {
            self.widget.clear_results();
            self.cursor = 0;
        }
        self.widget.handle_search_event(event, &query);
        self.drain_actions();
    }

    fn handle_mouse_event(&mut self, mouse: MouseEvent) {
        if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
            return;
        }

        let dismissed = self.clicks.dispatch_click(mouse.column, mouse.row);
        if dismissed > 0 {
            log::debug!("Click at ({}, {}) dismissed the results", mouse.column, mouse.row);
        }

        if !self.widget.contains(mouse.column, mouse.row) {
            return;
        }
        self.widget.activate();

        if let Some(list) = self.layout_regions.results_list
            && crate::visibility::contains(list, mouse.column, mouse.row)
        {
            // First row inside the border is item 0
            if let Some(row) = mouse.row.checked_sub(list.y + 1)
                && (row as usize) < self.widget.results().len()
            {
                self.cursor = row as usize;
            }
        }
    }
}
