//! Transient overlays: delete confirmation and toast messages.

use crate::crm::Collection;

/// Pending delete awaiting confirmation.
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Confirmation {
    pub collection: Collection,
    pub ids: Vec<String>,
    /// Whether the ids are the table's row selection.
    pub from_selection: bool,
    /// What is being deleted, for the prompt.
    pub label: String,
}

impl Confirmation {
    pub fn prompt(&self) -> String {
        format!("Delete {}?", self.label)
    }
}

/// Severity of a toast message.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Success,
    Error,
}

/// Short message shown in the footer until the next key press.
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub level: ToastLevel,
    pub message: String,
}

impl Toast {
    pub fn info(message: impl Into<String>) -> Toast {
        Toast {
            level: ToastLevel::Info,
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Toast {
        Toast {
            level: ToastLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Toast {
        Toast {
            level: ToastLevel::Error,
            message: message.into(),
        }
    }
}
