use super::*;

mod constraint_validation;
mod dom_tree_and_selectors;
mod timers_and_trace;
