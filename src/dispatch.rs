//! Host notification
//!
//! The widget reports three events to its host: loading changes, result changes and
//! selections. Hosts either hand over closures (`Direct`) or a channel that receives
//! named actions (`EventBus`). The strategy is fixed when the widget is built.

use std::fmt;
use std::sync::mpsc::Sender;

use serde_json::Value;

use crate::ResultSet;

/// A named action emitted to event-bus hosts
#[derive(Debug, Clone, PartialEq)]
pub enum SearchAction {
    LoadingChanged(bool),
    ResultsChanged(ResultSet),
    ResultSelected(Value),
}

impl SearchAction {
    /// Action name as seen by event-bus hosts
    pub fn name(&self) -> &'static str {
        match self {
            SearchAction::LoadingChanged(_) => "loadingHandler",
            SearchAction::ResultsChanged(_) => "handleResults",
            SearchAction::ResultSelected(_) => "selectResult",
        }
    }
}

type LoadingCallback = Box<dyn FnMut(bool)>;
type ResultsCallback = Box<dyn FnMut(&ResultSet)>;
type SelectCallback = Box<dyn FnMut(&Value)>;

/// Closures supplied by a direct-callback host
///
/// Events without a closure go to the fallback bus when one is set, and are
/// dropped otherwise.
#[derive(Default)]
pub struct HostCallbacks {
    on_loading: Option<LoadingCallback>,
    on_results: Option<ResultsCallback>,
    on_select: Option<SelectCallback>,
    fallback: Option<Sender<SearchAction>>,
}

impl HostCallbacks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_loading(mut self, f: impl FnMut(bool) + 'static) -> Self {
        self.on_loading = Some(Box::new(f));
        self
    }

    pub fn on_results(mut self, f: impl FnMut(&ResultSet) + 'static) -> Self {
        self.on_results = Some(Box::new(f));
        self
    }

    pub fn on_select(mut self, f: impl FnMut(&Value) + 'static) -> Self {
        self.on_select = Some(Box::new(f));
        self
    }

    pub fn with_fallback(mut self, bus: Sender<SearchAction>) -> Self {
        self.fallback = Some(bus);
        self
    }
}

impl fmt::Debug for HostCallbacks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HostCallbacks")
            .field("on_loading", &self.on_loading.is_some())
            .field("on_results", &self.on_results.is_some())
            .field("on_select", &self.on_select.is_some())
            .field("fallback", &self.fallback.is_some())
            .finish()
    }
}

/// Dispatch strategy chosen by the host
#[derive(Debug)]
pub enum ActionDispatcher {
    Direct(HostCallbacks),
    EventBus(Sender<SearchAction>),
}

impl Default for ActionDispatcher {
    fn default() -> Self {
        ActionDispatcher::Direct(HostCallbacks::default())
    }
}

impl ActionDispatcher {
    pub fn loading_changed(&mut self, loading: bool) {
        if let ActionDispatcher::Direct(HostCallbacks {
            on_loading: Some(f),
            ..
        }) = self
        {
            f(loading);
            return;
        }
        self.emit(SearchAction::LoadingChanged(loading));
    }

    pub fn results_changed(&mut self, results: &ResultSet) {
        if let ActionDispatcher::Direct(HostCallbacks {
            on_results: Some(f),
            ..
        }) = self
        {
            f(results);
            return;
        }
        self.emit(SearchAction::ResultsChanged(results.clone()));
    }

    pub fn result_selected(&mut self, item: &Value) {
        if let ActionDispatcher::Direct(HostCallbacks {
            on_select: Some(f),
            ..
        }) = self
        {
            f(item);
            return;
        }
        self.emit(SearchAction::ResultSelected(item.clone()));
    }

    /// Named-action emission for events that had no direct closure
    fn emit(&self, action: SearchAction) {
        let bus = match self {
            ActionDispatcher::EventBus(bus) => Some(bus),
            ActionDispatcher::Direct(callbacks) => callbacks.fallback.as_ref(),
        };

        let Some(bus) = bus else {
            log::trace!("No handler for action {}", action.name());
            return;
        };

        let name = action.name();
        if bus.send(action).is_err() {
            log::debug!("Event bus closed, dropped action {}", name);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::sync::mpsc;

    #[test]
    fn test_action_names() {
        assert_eq!(SearchAction::LoadingChanged(true).name(), "loadingHandler");
        assert_eq!(SearchAction::ResultsChanged(vec![]).name(), "handleResults");
        assert_eq!(
            SearchAction::ResultSelected(json!(null)).name(),
            "selectResult"
        );
    }

    #[test]
    fn test_direct_callbacks_receive_events() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let (l1, l2, l3) = (log.clone(), log.clone(), log.clone());

        let mut dispatcher = ActionDispatcher::Direct(
            HostCallbacks::new()
                .on_loading(move |b| l1.borrow_mut().push(format!("loading:{}", b)))
                .on_results(move |r| l2.borrow_mut().push(format!("results:{}", r.len())))
                .on_select(move |v| l3.borrow_mut().push(format!("select:{}", v))),
        );

        dispatcher.loading_changed(true);
        dispatcher.results_changed(&vec![json!("a"), json!("b")]);
        dispatcher.result_selected(&json!("a"));

        assert_eq!(
            *log.borrow(),
            vec!["loading:true", "results:2", "select:\"a\""]
        );
    }

    #[test]
    fn test_missing_callback_falls_back_to_bus() {
        let (tx, rx) = mpsc::channel();
        let loading = Rc::new(RefCell::new(Vec::new()));
        let loading_clone = loading.clone();

        let mut dispatcher = ActionDispatcher::Direct(
            HostCallbacks::new()
                .on_loading(move |b| loading_clone.borrow_mut().push(b))
                .with_fallback(tx),
        );

        dispatcher.loading_changed(false);
        dispatcher.results_changed(&vec![json!(1)]);

        assert_eq!(*loading.borrow(), vec![false]);
        assert_eq!(
            rx.try_recv().unwrap(),
            SearchAction::ResultsChanged(vec![json!(1)])
        );
        assert!(rx.try_recv().is_err(), "loading must not reach the bus");
    }

    #[test]
    fn test_direct_without_callbacks_or_fallback_is_silent() {
        let mut dispatcher = ActionDispatcher::default();
        dispatcher.loading_changed(true);
        dispatcher.results_changed(&vec![]);
        dispatcher.result_selected(&json!({"id": 1}));
    }

    #[test]
    fn test_event_bus_emits_named_actions() {
        let (tx, rx) = mpsc::channel();
        let mut dispatcher = ActionDispatcher::EventBus(tx);

        dispatcher.loading_changed(true);
        dispatcher.loading_changed(false);
        dispatcher.result_selected(&json!({"id": 7}));

        let names: Vec<&str> = rx.try_iter().map(|a| a.name()).collect();
        assert_eq!(names, vec!["loadingHandler", "loadingHandler", "selectResult"]);
    }

    #[test]
    fn test_event_bus_survives_closed_receiver() {
        let (tx, rx) = mpsc::channel();
        drop(rx);
        let mut dispatcher = ActionDispatcher::EventBus(tx);
        dispatcher.results_changed(&vec![json!(1)]);
    }
}
