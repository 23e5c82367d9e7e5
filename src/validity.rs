use super::*;

use fancy_regex::Regex;

/// Native constraint-validation flags for a single form control.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputValidity {
    pub value_missing: bool,
    pub type_mismatch: bool,
    pub pattern_mismatch: bool,
    pub too_long: bool,
    pub too_short: bool,
    pub range_underflow: bool,
    pub range_overflow: bool,
    pub step_mismatch: bool,
    pub bad_input: bool,
    pub custom_error: bool,
    pub valid: bool,
}

impl InputValidity {
    fn finish(mut self) -> Self {
        self.valid = !(self.value_missing
            || self.type_mismatch
            || self.pattern_mismatch
            || self.too_long
            || self.too_short
            || self.range_underflow
            || self.range_overflow
            || self.step_mismatch
            || self.bad_input
            || self.custom_error);
        self
    }
}

pub(crate) fn is_form_control(dom: &Dom, node_id: NodeId) -> bool {
    let Some(element) = dom.element(node_id) else {
        return false;
    };

    element.tag_name.eq_ignore_ascii_case("input")
        || element.tag_name.eq_ignore_ascii_case("select")
        || element.tag_name.eq_ignore_ascii_case("textarea")
        || element.tag_name.eq_ignore_ascii_case("button")
}

pub(crate) fn is_checkbox_input(dom: &Dom, node_id: NodeId) -> bool {
    input_has_type(dom, node_id, "checkbox")
}

pub(crate) fn is_radio_input(dom: &Dom, node_id: NodeId) -> bool {
    input_has_type(dom, node_id, "radio")
}

fn input_has_type(dom: &Dom, node_id: NodeId, wanted: &str) -> bool {
    let Some(element) = dom.element(node_id) else {
        return false;
    };
    if !element.tag_name.eq_ignore_ascii_case("input") {
        return false;
    }
    element
        .attrs
        .get("type")
        .map(|kind| kind.eq_ignore_ascii_case(wanted))
        .unwrap_or(false)
}

pub(crate) fn is_submit_control(dom: &Dom, node_id: NodeId) -> bool {
    let Some(element) = dom.element(node_id) else {
        return false;
    };

    if element.tag_name.eq_ignore_ascii_case("button") {
        return element
            .attrs
            .get("type")
            .map(|kind| kind.eq_ignore_ascii_case("submit"))
            .unwrap_or(true);
    }

    if element.tag_name.eq_ignore_ascii_case("input") {
        return element
            .attrs
            .get("type")
            .map(|kind| kind.eq_ignore_ascii_case("submit") || kind.eq_ignore_ascii_case("image"))
            .unwrap_or(false);
    }

    false
}

pub(crate) fn input_participates_in_constraint_validation(kind: &str) -> bool {
    !matches!(kind, "button" | "submit" | "reset" | "hidden" | "image")
}

pub(crate) fn input_supports_required(kind: &str) -> bool {
    !matches!(
        kind,
        "range" | "color" | "hidden" | "submit" | "reset" | "button" | "image"
    )
}

pub(crate) fn is_ascii_email_local_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric()
        || matches!(
            ch,
            '.' | '!'
                | '#'
                | '$'
                | '%'
                | '&'
                | '\''
                | '*'
                | '+'
                | '/'
                | '='
                | '?'
                | '^'
                | '_'
                | '`'
                | '{'
                | '|'
                | '}'
                | '~'
                | '-'
        )
}

pub(crate) fn is_valid_email_domain_label(label: &str) -> bool {
    if label.is_empty() || label.len() > 63 {
        return false;
    }

    let mut chars = label.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    if !first.is_ascii_alphanumeric() {
        return false;
    }

    let mut last = first;
    for ch in chars {
        if !(ch.is_ascii_alphanumeric() || ch == '-') {
            return false;
        }
        last = ch;
    }

    last.is_ascii_alphanumeric()
}

pub(crate) fn is_valid_email_domain(domain: &str) -> bool {
    !domain.is_empty() && domain.split('.').all(is_valid_email_domain_label)
}

pub(crate) fn is_simple_email(value: &str) -> bool {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return false;
    }
    let Some((local, domain)) = trimmed.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return false;
    }
    if !local.chars().all(is_ascii_email_local_char) {
        return false;
    }
    is_valid_email_domain(domain)
}

pub(crate) fn is_email_address_list(value: &str) -> bool {
    if value.trim().is_empty() {
        return true;
    }

    for part in value.split(',') {
        let part = part.trim();
        if part.is_empty() || !is_simple_email(part) {
            return false;
        }
    }
    true
}

pub(crate) fn is_url_like(value: &str) -> bool {
    let trimmed = value.trim();
    let Some(scheme_end) = trimmed.find(':') else {
        return false;
    };
    let scheme = &trimmed[..scheme_end];
    let mut chars = scheme.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    if !first.is_ascii_alphabetic() {
        return false;
    }
    if !chars.all(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '+' | '-' | '.')) {
        return false;
    }
    !trimmed[scheme_end + 1..].is_empty()
}

pub(crate) fn parse_number_value(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    // Hex, infinities and nan are not valid floating-point input values.
    if trimmed
        .chars()
        .any(|ch| !(ch.is_ascii_digit() || matches!(ch, '+' | '-' | '.' | 'e' | 'E')))
    {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|number| number.is_finite())
}

impl Dom {
    pub(crate) fn normalized_input_type(&self, node_id: NodeId) -> String {
        self.attr(node_id, "type")
            .unwrap_or_else(|| "text".to_string())
            .to_ascii_lowercase()
    }

    pub(crate) fn parse_attr_i64(&self, node_id: NodeId, name: &str) -> Option<i64> {
        self.attr(node_id, name)
            .and_then(|raw| raw.trim().parse::<i64>().ok())
    }

    pub(crate) fn parse_attr_f64(&self, node_id: NodeId, name: &str) -> Option<f64> {
        self.attr(node_id, name)
            .and_then(|raw| raw.trim().parse::<f64>().ok())
            .filter(|number| number.is_finite())
    }

    pub(crate) fn is_radio_group_checked(&self, node_id: NodeId) -> bool {
        let name = self.attr(node_id, "name").unwrap_or_default();
        if name.is_empty() {
            return self.checked(node_id).unwrap_or(false);
        }
        let form = self.find_ancestor_by_tag(node_id, "form");
        self.all_element_nodes().into_iter().any(|candidate| {
            is_radio_input(self, candidate)
                && self.attr(candidate, "name").unwrap_or_default() == name
                && self.find_ancestor_by_tag(candidate, "form") == form
                && self.checked(candidate).unwrap_or(false)
        })
    }

    pub(crate) fn compute_control_validity(&self, node_id: NodeId) -> Result<InputValidity> {
        let mut validity = InputValidity {
            valid: true,
            ..InputValidity::default()
        };

        if self.is_effectively_disabled(node_id) {
            return Ok(validity);
        }

        let Some(tag_name) = self.tag_name(node_id) else {
            return Ok(validity);
        };

        if tag_name.eq_ignore_ascii_case("textarea") {
            let value = self.value(node_id)?;
            let required = self.required(node_id);
            let readonly = self.readonly(node_id);

            if required && !readonly && value.is_empty() {
                validity.value_missing = true;
            }

            if !value.is_empty() {
                let value_len = value.chars().count() as i64;
                if let Some(min_len) = self.parse_attr_i64(node_id, "minlength") {
                    if min_len >= 0 && value_len < min_len {
                        validity.too_short = true;
                    }
                }
                if let Some(max_len) = self.parse_attr_i64(node_id, "maxlength") {
                    if max_len >= 0 && value_len > max_len {
                        validity.too_long = true;
                    }
                }
            }

            validity.custom_error = !self.custom_validity_message(node_id)?.is_empty();
            return Ok(validity.finish());
        }

        if tag_name.eq_ignore_ascii_case("select") {
            let value = self.value(node_id)?;
            if self.required(node_id) && value.is_empty() {
                validity.value_missing = true;
            }
            validity.custom_error = !self.custom_validity_message(node_id)?.is_empty();
            return Ok(validity.finish());
        }

        if !tag_name.eq_ignore_ascii_case("input") {
            let custom_error = !self.custom_validity_message(node_id)?.is_empty();
            validity.custom_error = custom_error;
            validity.valid = !custom_error;
            return Ok(validity);
        }

        let input_type = self.normalized_input_type(node_id);
        if !input_participates_in_constraint_validation(input_type.as_str()) {
            return Ok(validity);
        }
        let value = self.value(node_id)?;
        let required = self.required(node_id);
        let readonly = self.readonly(node_id);
        let multiple = self.attr(node_id, "multiple").is_some();
        let email_multiple = input_type == "email" && multiple;
        let value_is_effectively_empty = if email_multiple {
            value.trim().is_empty()
        } else {
            value.is_empty()
        };

        if required && !readonly && input_supports_required(input_type.as_str()) {
            validity.value_missing = if input_type == "checkbox" {
                !self.checked(node_id)?
            } else if input_type == "radio" {
                !self.is_radio_group_checked(node_id)
            } else if email_multiple {
                false
            } else {
                value_is_effectively_empty
            };
        }

        if !value_is_effectively_empty {
            if input_type == "email" {
                validity.type_mismatch = if email_multiple {
                    !is_email_address_list(&value)
                } else {
                    !is_simple_email(&value)
                };
            } else if input_type == "url" {
                validity.type_mismatch = !is_url_like(&value);
            }

            if matches!(
                input_type.as_str(),
                "text" | "search" | "url" | "tel" | "email" | "password"
            ) {
                let value_len = value.chars().count() as i64;
                if let Some(min_len) = self.parse_attr_i64(node_id, "minlength") {
                    if min_len >= 0 && value_len < min_len {
                        validity.too_short = true;
                    }
                }
                if let Some(max_len) = self.parse_attr_i64(node_id, "maxlength") {
                    if max_len >= 0 && value_len > max_len {
                        validity.too_long = true;
                    }
                }

                if let Some(pattern) = self.attr(node_id, "pattern") {
                    if !pattern.is_empty() {
                        let wrapped = format!("^(?:{})$", pattern);
                        if let Ok(regex) = Regex::new(&wrapped) {
                            if email_multiple {
                                for part in value.split(',') {
                                    let part = part.trim();
                                    if part.is_empty() {
                                        continue;
                                    }
                                    match regex.is_match(part) {
                                        Ok(true) => {}
                                        Ok(false) => {
                                            validity.pattern_mismatch = true;
                                            break;
                                        }
                                        Err(_) => {}
                                    }
                                }
                            } else if let Ok(false) = regex.is_match(&value) {
                                validity.pattern_mismatch = true;
                            }
                        }
                    }
                }
            }

            if matches!(input_type.as_str(), "number" | "range") {
                match parse_number_value(&value) {
                    Some(numeric) => {
                        if let Some(min) = self.parse_attr_f64(node_id, "min") {
                            if numeric < min {
                                validity.range_underflow = true;
                            }
                        }
                        if let Some(max) = self.parse_attr_f64(node_id, "max") {
                            if numeric > max {
                                validity.range_overflow = true;
                            }
                        }

                        let step_attr = self.attr(node_id, "step").unwrap_or_default();
                        if !step_attr.eq_ignore_ascii_case("any") {
                            let step = step_attr
                                .trim()
                                .parse::<f64>()
                                .ok()
                                .filter(|step| step.is_finite() && *step > 0.0)
                                .unwrap_or(1.0);
                            let base = self
                                .parse_attr_f64(node_id, "min")
                                .or_else(|| self.parse_attr_f64(node_id, "value"))
                                .unwrap_or(0.0);
                            let ratio = (numeric - base) / step;
                            let nearest = ratio.round();
                            if (ratio - nearest).abs() > 1e-7 {
                                validity.step_mismatch = true;
                            }
                        }
                    }
                    None => {
                        validity.bad_input = true;
                    }
                }
            }
        }

        validity.custom_error = !self.custom_validity_message(node_id)?.is_empty();
        Ok(validity.finish())
    }

    pub(crate) fn control_is_valid(&self, node_id: NodeId) -> Result<bool> {
        Ok(self.compute_control_validity(node_id)?.valid)
    }

    /// Submittable controls inside `form`, in document order.
    pub(crate) fn form_controls(&self, form: NodeId) -> Vec<NodeId> {
        let mut descendants = Vec::new();
        self.collect_elements_dfs(form, &mut descendants);
        descendants
            .into_iter()
            .filter(|node| is_form_control(self, *node))
            .collect()
    }

    pub(crate) fn form_is_valid(&self, form: NodeId) -> Result<bool> {
        for control in self.form_controls(form) {
            if !self.control_is_valid(control)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Validity predicate the guard evaluates: forms check every control,
    /// lone controls check themselves, anything else passes.
    pub(crate) fn element_is_valid_for_submit(&self, node_id: NodeId) -> Result<bool> {
        if self
            .tag_name(node_id)
            .is_some_and(|tag| tag.eq_ignore_ascii_case("form"))
        {
            return self.form_is_valid(node_id);
        }
        if is_form_control(self, node_id) {
            return self.control_is_valid(node_id);
        }
        Ok(true)
    }
}
