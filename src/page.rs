use super::*;

/// Deterministic page fixture: an in-memory document plus the listener
/// and timer state the page behaviors run against.
#[derive(Debug)]
pub struct Page {
    pub(crate) dom: Dom,
    pub(crate) listeners: ListenerStore,
    pub(crate) scheduler: SchedulerState,
    pub(crate) behaviors: BehaviorSubscriptions,
    pub(crate) trace_state: TraceState,
    pub(crate) submission_log: Vec<String>,
}

impl Page {
    pub fn from_html(html: &str) -> Result<Self> {
        let dom = parse_document(html)?;
        Ok(Self {
            dom,
            listeners: ListenerStore::default(),
            scheduler: SchedulerState::default(),
            behaviors: BehaviorSubscriptions::default(),
            trace_state: TraceState::default(),
            submission_log: Vec::new(),
        })
    }

    pub(crate) fn select_one(&self, selector: &str) -> Result<NodeId> {
        self.dom
            .query_selector(selector)?
            .ok_or_else(|| Error::SelectorNotFound(selector.to_string()))
    }

    pub fn exists(&self, selector: &str) -> Result<bool> {
        Ok(self.dom.query_selector(selector)?.is_some())
    }

    pub fn query_count(&self, selector: &str) -> Result<usize> {
        Ok(self.dom.query_selector_all(selector)?.len())
    }

    pub fn text(&self, selector: &str) -> Result<String> {
        let target = self.select_one(selector)?;
        Ok(self.dom.text_content(target))
    }

    pub fn value(&self, selector: &str) -> Result<String> {
        let target = self.select_one(selector)?;
        self.dom.value(target)
    }

    pub fn has_class(&self, selector: &str, class_name: &str) -> Result<bool> {
        let target = self.select_one(selector)?;
        self.dom.class_contains(target, class_name)
    }

    pub fn class_list(&self, selector: &str) -> Result<Vec<String>> {
        let target = self.select_one(selector)?;
        let element = self
            .dom
            .element(target)
            .ok_or_else(|| Error::PageRuntime("classList target is not an element".into()))?;
        Ok(class_tokens(element.attrs.get("class").map(String::as_str)))
    }

    pub fn control_validity(&self, selector: &str) -> Result<InputValidity> {
        let target = self.select_one(selector)?;
        self.dom.compute_control_validity(target)
    }

    pub fn form_is_valid(&self, selector: &str) -> Result<bool> {
        let target = self.select_one(selector)?;
        self.dom.element_is_valid_for_submit(target)
    }

    /// Total listeners registered for `event_type`, all phases.
    pub fn listener_count(&self, event_type: &str) -> usize {
        self.listeners.count_for_event(event_type)
    }

    /// Forms whose submission went through unprevented, oldest first.
    pub fn submissions(&self) -> &[String] {
        &self.submission_log
    }

    pub fn dump_dom(&self, selector: &str) -> Result<String> {
        let target = self.select_one(selector)?;
        Ok(self.dom.dump_node(target))
    }

    /// Parses `html` and appends the nodes at the document root.
    pub fn append_html(&mut self, html: &str) -> Result<()> {
        let root = self.dom.root;
        parse_fragment_into(&mut self.dom, root, html)
    }

    pub fn assert_text(&self, selector: &str, expected: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        let actual = self.dom.text_content(target);
        if actual != expected {
            return Err(Error::AssertionFailed {
                selector: selector.to_string(),
                expected: expected.to_string(),
                actual,
                dom_snippet: self.dom.node_snippet(target),
            });
        }
        Ok(())
    }

    pub fn assert_class(&self, selector: &str, class_name: &str, expected: bool) -> Result<()> {
        let target = self.select_one(selector)?;
        let actual = self.dom.class_contains(target, class_name)?;
        if actual != expected {
            return Err(Error::AssertionFailed {
                selector: selector.to_string(),
                expected: format!("class {class_name} present={expected}"),
                actual: format!("class {class_name} present={actual}"),
                dom_snippet: self.dom.node_snippet(target),
            });
        }
        Ok(())
    }

    pub fn assert_exists(&self, selector: &str) -> Result<()> {
        let _ = self.select_one(selector)?;
        Ok(())
    }

    pub fn assert_not_exists(&self, selector: &str) -> Result<()> {
        if let Some(target) = self.dom.query_selector(selector)? {
            return Err(Error::AssertionFailed {
                selector: selector.to_string(),
                expected: "no match".to_string(),
                actual: "matched".to_string(),
                dom_snippet: self.dom.node_snippet(target),
            });
        }
        Ok(())
    }

    pub fn type_text(&mut self, selector: &str, text: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        if self.dom.is_effectively_disabled(target) {
            return Ok(());
        }

        let tag = self
            .dom
            .tag_name(target)
            .ok_or_else(|| Error::TypeMismatch {
                selector: selector.to_string(),
                expected: "input or textarea".into(),
                actual: "non-element".into(),
            })?
            .to_ascii_lowercase();
        if tag != "input" && tag != "textarea" {
            return Err(Error::TypeMismatch {
                selector: selector.to_string(),
                expected: "input or textarea".into(),
                actual: tag,
            });
        }

        let input_type = if tag == "input" {
            self.dom.normalized_input_type(target)
        } else {
            String::new()
        };
        if input_type == "hidden" || input_type == "image" {
            return Ok(());
        }
        if self.dom.readonly(target) {
            return Ok(());
        }

        stacker::grow(32 * 1024 * 1024, || {
            self.dom.set_value(target, text)?;
            self.dispatch_event(target, "input")?;
            Ok(())
        })
    }

    /// Direct value assignment without an input event; covers controls
    /// `type_text` refuses, such as selects.
    pub fn set_value(&mut self, selector: &str, value: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        self.dom.set_value(target, value)
    }

    pub fn set_checked(&mut self, selector: &str, checked: bool) -> Result<()> {
        let target = self.select_one(selector)?;
        if self.dom.is_effectively_disabled(target) {
            return Ok(());
        }
        if !is_checkbox_input(&self.dom, target) && !is_radio_input(&self.dom, target) {
            let actual = self
                .dom
                .tag_name(target)
                .map(str::to_ascii_lowercase)
                .unwrap_or_else(|| "non-element".into());
            return Err(Error::TypeMismatch {
                selector: selector.to_string(),
                expected: "input[type=checkbox] or input[type=radio]".into(),
                actual,
            });
        }

        if checked && is_radio_input(&self.dom, target) {
            self.uncheck_radio_group_siblings(target)?;
        }
        stacker::grow(32 * 1024 * 1024, || {
            self.dom.set_checked(target, checked)?;
            self.dispatch_event(target, "change")?;
            Ok(())
        })
    }

    fn uncheck_radio_group_siblings(&mut self, target: NodeId) -> Result<()> {
        let name = self.dom.attr(target, "name").unwrap_or_default();
        if name.is_empty() {
            return Ok(());
        }
        let form = self.dom.find_ancestor_by_tag(target, "form");
        for candidate in self.dom.all_element_nodes() {
            if candidate != target
                && is_radio_input(&self.dom, candidate)
                && self.dom.attr(candidate, "name").unwrap_or_default() == name
                && self.dom.find_ancestor_by_tag(candidate, "form") == form
            {
                self.dom.set_checked(candidate, false)?;
            }
        }
        Ok(())
    }

    pub fn set_custom_validity(&mut self, selector: &str, message: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        self.dom.set_custom_validity(target, message)
    }

    /// Native click activation: dispatches `click` and, for an
    /// unprevented submit control, requests submission of its form.
    pub fn click(&mut self, selector: &str) -> Result<EventOutcome> {
        let target = self.select_one(selector)?;
        if self.dom.is_effectively_disabled(target) {
            return Ok(EventOutcome::not_fired());
        }
        stacker::grow(32 * 1024 * 1024, || {
            let event = self.dispatch_event(target, "click")?;
            if !event.default_prevented && is_submit_control(&self.dom, target) {
                if let Some(form) = self.resolve_form_for_submit(target) {
                    self.request_form_submit(form)?;
                }
            }
            Ok(event.outcome())
        })
    }

    /// User-initiated submit request for the form owning `selector`.
    pub fn submit(&mut self, selector: &str) -> Result<EventOutcome> {
        let target = self.select_one(selector)?;
        let Some(form) = self.resolve_form_for_submit(target) else {
            return Ok(EventOutcome::not_fired());
        };
        stacker::grow(32 * 1024 * 1024, || self.request_form_submit(form))
    }

    /// Fires `event_type` at the selected element unconditionally,
    /// bypassing native submit gating.
    pub fn dispatch(&mut self, selector: &str, event_type: &str) -> Result<EventOutcome> {
        let target = self.select_one(selector)?;
        stacker::grow(32 * 1024 * 1024, || {
            let event = self.dispatch_event(target, event_type)?;
            Ok(event.outcome())
        })
    }

    /// Registers a bubble-phase observer callback on the selected element.
    pub fn on_event(
        &mut self,
        selector: &str,
        event_type: &str,
        hook: impl FnMut(&mut EventState) + 'static,
    ) -> Result<ListenerId> {
        let target = self.select_one(selector)?;
        Ok(self.listeners.add(
            target,
            event_type.to_string(),
            false,
            ListenerAction::Hook(Rc::new(RefCell::new(hook))),
        ))
    }

    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        self.listeners.remove(id)
    }

    pub(crate) fn resolve_form_for_submit(&self, node_id: NodeId) -> Option<NodeId> {
        if self
            .dom
            .tag_name(node_id)
            .is_some_and(|tag| tag.eq_ignore_ascii_case("form"))
        {
            return Some(node_id);
        }
        self.dom.find_ancestor_by_tag(node_id, "form")
    }

    pub(crate) fn request_form_submit(&mut self, form: NodeId) -> Result<EventOutcome> {
        let skip_validation = self.dom.attr(form, "novalidate").is_some();
        if !skip_validation && !self.dom.form_is_valid(form)? {
            let label = self.trace_node_label(form);
            self.trace_event_line(format!(
                "[event] submit blocked_by_native_validation target={label}"
            ));
            return Ok(EventOutcome::not_fired());
        }

        let event = self.dispatch_event(form, "submit")?;
        if !event.default_prevented {
            let label = self.form_submit_label(form);
            self.submission_log.push(label);
        }
        Ok(event.outcome())
    }

    fn form_submit_label(&self, form: NodeId) -> String {
        if let Some(id) = self.dom.attr(form, "id") {
            return format!("#{id}");
        }
        if let Some(name) = self.dom.attr(form, "name") {
            return name;
        }
        self.dom
            .attr(form, "action")
            .unwrap_or_else(|| "form".to_string())
    }

    pub(crate) fn dispatch_event(&mut self, target: NodeId, event_type: &str) -> Result<EventState> {
        let mut event = EventState::new(event_type, target, self.scheduler.now_ms);

        let mut path = Vec::new();
        let mut cursor = Some(target);
        while let Some(node) = cursor {
            path.push(node);
            cursor = self.dom.parent(node);
        }
        path.reverse();

        // Capture phase.
        if path.len() >= 2 {
            for node in &path[..path.len() - 1] {
                event.event_phase = 1;
                event.current_target = *node;
                self.invoke_listeners(*node, &mut event, true)?;
                if event.propagation_stopped {
                    self.trace_event_done(&event, "propagation_stopped");
                    return Ok(event);
                }
            }
        }

        // Target phase: capture listeners first.
        event.event_phase = 2;
        event.current_target = target;
        self.invoke_listeners(target, &mut event, true)?;
        if event.propagation_stopped {
            self.trace_event_done(&event, "propagation_stopped");
            return Ok(event);
        }

        // Target phase: bubble listeners.
        event.event_phase = 2;
        self.invoke_listeners(target, &mut event, false)?;
        if event.propagation_stopped {
            self.trace_event_done(&event, "propagation_stopped");
            return Ok(event);
        }

        // Bubble phase.
        if event.bubbles && path.len() >= 2 {
            for node in path[..path.len() - 1].iter().rev() {
                event.event_phase = 3;
                event.current_target = *node;
                self.invoke_listeners(*node, &mut event, false)?;
                if event.propagation_stopped {
                    self.trace_event_done(&event, "propagation_stopped");
                    return Ok(event);
                }
            }
        }

        self.trace_event_done(&event, "completed");
        Ok(event)
    }

    pub(crate) fn invoke_listeners(
        &mut self,
        node_id: NodeId,
        event: &mut EventState,
        capture: bool,
    ) -> Result<()> {
        let listeners = self.listeners.get(node_id, &event.event_type, capture);
        for listener in listeners {
            if self.trace_state.enabled {
                let phase = if capture { "capture" } else { "bubble" };
                let target_label = self.trace_node_label(event.target);
                let current_label = self.trace_node_label(event.current_target);
                self.trace_event_line(format!(
                    "[event] {} target={} current={} phase={} default_prevented={}",
                    event.event_type, target_label, current_label, phase, event.default_prevented
                ));
            }
            match listener.action {
                ListenerAction::InstallValidationGuards => {
                    self.install_validation_guards()?;
                }
                ListenerAction::ValidationGuard => {
                    self.run_validation_guard(node_id, event)?;
                }
                ListenerAction::Hook(hook) => {
                    (hook.borrow_mut())(event);
                }
            }
            if event.immediate_propagation_stopped {
                break;
            }
        }
        Ok(())
    }
}
