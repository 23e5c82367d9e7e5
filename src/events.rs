use super::*;

/// Stable handle for a registered listener, used for explicit teardown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub(crate) usize);

pub(crate) type HookFn = Rc<RefCell<dyn FnMut(&mut EventState)>>;

#[derive(Clone)]
pub(crate) enum ListenerAction {
    /// Registers the submit guard on every marked form; runs on `load`.
    InstallValidationGuards,
    /// The per-form submit gate.
    ValidationGuard,
    /// Observer callback registered through the public API.
    Hook(HookFn),
}

impl fmt::Debug for ListenerAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InstallValidationGuards => write!(f, "InstallValidationGuards"),
            Self::ValidationGuard => write!(f, "ValidationGuard"),
            Self::Hook(_) => write!(f, "Hook(..)"),
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct Listener {
    pub(crate) id: ListenerId,
    pub(crate) capture: bool,
    pub(crate) action: ListenerAction,
}

#[derive(Debug, Default)]
pub(crate) struct ListenerStore {
    pub(crate) map: HashMap<NodeId, HashMap<String, Vec<Listener>>>,
    pub(crate) next_listener_id: usize,
}

impl ListenerStore {
    fn allocate_listener_id(&mut self) -> ListenerId {
        let id = ListenerId(self.next_listener_id);
        self.next_listener_id = self.next_listener_id.saturating_add(1);
        id
    }

    pub(crate) fn add(
        &mut self,
        node_id: NodeId,
        event: String,
        capture: bool,
        action: ListenerAction,
    ) -> ListenerId {
        let id = self.allocate_listener_id();
        self.map
            .entry(node_id)
            .or_default()
            .entry(event)
            .or_default()
            .push(Listener {
                id,
                capture,
                action,
            });
        id
    }

    pub(crate) fn remove(&mut self, id: ListenerId) -> bool {
        let mut found = None;
        'search: for (node, events) in self.map.iter_mut() {
            for (event, listeners) in events.iter_mut() {
                if let Some(pos) = listeners.iter().position(|listener| listener.id == id) {
                    listeners.remove(pos);
                    found = Some((*node, event.clone()));
                    break 'search;
                }
            }
        }

        let Some((node, event)) = found else {
            return false;
        };
        if let Some(events) = self.map.get_mut(&node) {
            if events.get(&event).is_some_and(Vec::is_empty) {
                events.remove(&event);
            }
            if events.is_empty() {
                self.map.remove(&node);
            }
        }
        true
    }

    pub(crate) fn get(&self, node_id: NodeId, event: &str, capture: bool) -> Vec<Listener> {
        self.map
            .get(&node_id)
            .and_then(|events| events.get(event))
            .map(|listeners| {
                listeners
                    .iter()
                    .filter(|listener| listener.capture == capture)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    pub(crate) fn count_for_event(&self, event: &str) -> usize {
        self.map
            .values()
            .filter_map(|events| events.get(event))
            .map(Vec::len)
            .sum()
    }
}

/// Mutable view of one in-flight event dispatch.
#[derive(Debug, Clone)]
pub struct EventState {
    pub(crate) event_type: String,
    pub(crate) target: NodeId,
    pub(crate) current_target: NodeId,
    pub(crate) event_phase: i32,
    pub(crate) time_stamp_ms: i64,
    pub(crate) default_prevented: bool,
    pub(crate) bubbles: bool,
    pub(crate) cancelable: bool,
    pub(crate) propagation_stopped: bool,
    pub(crate) immediate_propagation_stopped: bool,
}

impl EventState {
    pub(crate) fn new(event_type: &str, target: NodeId, time_stamp_ms: i64) -> Self {
        Self {
            event_type: event_type.to_string(),
            target,
            current_target: target,
            event_phase: 2,
            time_stamp_ms,
            default_prevented: false,
            bubbles: true,
            cancelable: true,
            propagation_stopped: false,
            immediate_propagation_stopped: false,
        }
    }

    pub fn event_type(&self) -> &str {
        &self.event_type
    }

    pub fn time_stamp_ms(&self) -> i64 {
        self.time_stamp_ms
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }

    pub fn propagation_stopped(&self) -> bool {
        self.propagation_stopped
    }

    pub fn immediate_propagation_stopped(&self) -> bool {
        self.immediate_propagation_stopped
    }

    pub fn prevent_default(&mut self) {
        if self.cancelable {
            self.default_prevented = true;
        }
    }

    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    pub fn stop_immediate_propagation(&mut self) {
        self.propagation_stopped = true;
        self.immediate_propagation_stopped = true;
    }

    pub(crate) fn outcome(&self) -> EventOutcome {
        EventOutcome {
            fired: true,
            default_prevented: self.default_prevented,
            propagation_stopped: self.propagation_stopped,
        }
    }
}

/// Summary of a dispatch, returned by the page action methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventOutcome {
    pub fired: bool,
    pub default_prevented: bool,
    pub propagation_stopped: bool,
}

impl EventOutcome {
    pub(crate) fn not_fired() -> Self {
        Self {
            fired: false,
            default_prevented: false,
            propagation_stopped: false,
        }
    }
}
