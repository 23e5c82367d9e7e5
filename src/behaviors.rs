use super::*;

/// Subscriptions created by `install_page_behaviors`, recorded so the
/// whole wiring can be torn down explicitly.
#[derive(Debug, Default)]
pub(crate) struct BehaviorSubscriptions {
    pub(crate) load_listener: Option<ListenerId>,
    pub(crate) guard_listeners: Vec<(NodeId, ListenerId)>,
    pub(crate) flash_timer: Option<i64>,
}

impl Page {
    /// Wires both page behaviors: a `load` listener that will install the
    /// validation guard, and the flash-dismissal timer. The timer counts
    /// from installation, not from the load event.
    pub fn install_page_behaviors(&mut self) -> Result<()> {
        if self.behaviors.load_listener.is_some() || self.behaviors.flash_timer.is_some() {
            return Err(Error::PageRuntime("page behaviors already installed".into()));
        }

        let root = self.dom.root;
        let listener = self.listeners.add(
            root,
            "load".to_string(),
            false,
            ListenerAction::InstallValidationGuards,
        );
        self.behaviors.load_listener = Some(listener);

        let timer = self.schedule_task(FLASH_DISMISS_DELAY_MS, TimerAction::DismissAlerts);
        self.behaviors.flash_timer = Some(timer);
        self.trace_event_line(format!(
            "[event] behaviors_installed flash_timer={timer} delay_ms={FLASH_DISMISS_DELAY_MS}"
        ));
        Ok(())
    }

    /// Dispatches the page `load` event at the document.
    pub fn fire_load(&mut self) -> Result<EventOutcome> {
        let root = self.dom.root;
        stacker::grow(32 * 1024 * 1024, || {
            let event = self.dispatch_event(root, "load")?;
            Ok(event.outcome())
        })
    }

    /// Captures the marked-form set once and registers the submit guard
    /// on each. Forms added to the document later are not covered.
    pub(crate) fn install_validation_guards(&mut self) -> Result<usize> {
        let marked = self.dom.elements_by_class(NEEDS_VALIDATION_CLASS);
        let mut installed = 0usize;
        for node in marked {
            let listener = self.listeners.add(
                node,
                "submit".to_string(),
                false,
                ListenerAction::ValidationGuard,
            );
            self.behaviors.guard_listeners.push((node, listener));
            installed += 1;
        }
        self.trace_event_line(format!("[event] guard_install count={installed}"));
        Ok(installed)
    }

    /// The submit gate: an invalid target suppresses the default action
    /// and halts further listener dispatch; the `was-validated` styling
    /// hook is (re)applied on every attempt.
    pub(crate) fn run_validation_guard(
        &mut self,
        node_id: NodeId,
        event: &mut EventState,
    ) -> Result<()> {
        let valid = self.dom.element_is_valid_for_submit(node_id)?;
        if !valid {
            event.prevent_default();
            event.stop_propagation();
        }
        self.dom.class_add(node_id, WAS_VALIDATED_CLASS)?;
        let label = self.trace_node_label(node_id);
        self.trace_event_line(format!(
            "[event] validation_guard target={label} valid={valid}"
        ));
        Ok(())
    }

    /// Removes every flash banner present at fire time. An empty set is
    /// a no-op, as is a banner already detached by an earlier removal.
    pub(crate) fn dismiss_flash_messages(&mut self) -> Result<usize> {
        let alerts = self.dom.elements_by_class(ALERT_CLASS);
        let mut removed = 0usize;
        for node in alerts {
            if self.dom.parent(node).is_some() {
                self.dom.remove_node(node)?;
                removed += 1;
            }
        }
        Ok(removed)
    }

    /// Drops every subscription the installer created: the load listener,
    /// all guard listeners, and the dismissal timer if it has not fired.
    /// Returns the number of subscriptions removed.
    pub fn teardown_page_behaviors(&mut self) -> usize {
        let mut removed = 0usize;
        if let Some(listener) = self.behaviors.load_listener.take() {
            if self.listeners.remove(listener) {
                removed += 1;
            }
        }
        for (_, listener) in std::mem::take(&mut self.behaviors.guard_listeners) {
            if self.listeners.remove(listener) {
                removed += 1;
            }
        }
        if let Some(timer) = self.behaviors.flash_timer.take() {
            if self.clear_timer(timer) {
                removed += 1;
            }
        }
        self.trace_event_line(format!("[event] behaviors_teardown removed={removed}"));
        removed
    }
}
