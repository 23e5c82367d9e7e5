use std::cell::RefCell;
use std::collections::{HashMap, HashSet, VecDeque};
use std::error::Error as StdError;
use std::fmt;
use std::rc::Rc;

pub type Result<T> = std::result::Result<T, Error>;

/// Marker class that opts a form into the validation guard.
pub const NEEDS_VALIDATION_CLASS: &str = "needs-validation";
/// Styling hook added to a form on every submit attempt.
pub const WAS_VALIDATED_CLASS: &str = "was-validated";
/// Marker class identifying dismissable flash banners.
pub const ALERT_CLASS: &str = "alert";
/// Delay before flash banners are removed, counted from behavior
/// installation rather than from the load event.
pub const FLASH_DISMISS_DELAY_MS: i64 = 3000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    HtmlParse(String),
    PageRuntime(String),
    SelectorNotFound(String),
    UnsupportedSelector(String),
    TypeMismatch {
        selector: String,
        expected: String,
        actual: String,
    },
    AssertionFailed {
        selector: String,
        expected: String,
        actual: String,
        dom_snippet: String,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HtmlParse(msg) => write!(f, "html parse error: {msg}"),
            Self::PageRuntime(msg) => write!(f, "page runtime error: {msg}"),
            Self::SelectorNotFound(selector) => write!(f, "selector not found: {selector}"),
            Self::UnsupportedSelector(selector) => write!(f, "unsupported selector: {selector}"),
            Self::TypeMismatch {
                selector,
                expected,
                actual,
            } => write!(
                f,
                "type mismatch for {selector}: expected {expected}, actual {actual}"
            ),
            Self::AssertionFailed {
                selector,
                expected,
                actual,
                dom_snippet,
            } => write!(
                f,
                "assertion failed for {selector}: expected {expected}, actual {actual}, snippet {dom_snippet}"
            ),
        }
    }
}

impl StdError for Error {}

mod behaviors;
mod dom;
mod events;
mod html;
mod page;
mod scheduler;
mod selector;
mod trace;
mod validity;

#[cfg(test)]
mod tests;

use behaviors::*;
use dom::*;
use events::*;
use html::*;
use scheduler::*;
use selector::*;
use trace::*;
use validity::*;

pub use events::{EventOutcome, EventState, ListenerId};
pub use page::Page;
pub use scheduler::PendingTimer;
pub use validity::InputValidity;
