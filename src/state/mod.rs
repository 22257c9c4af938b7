//! Application state management module.
//!
//! This module contains the core state management for the application, including:
//! - Main `State` struct that holds the store and all UI state
//! - Navigation types (Route, Focus)
//! - Overlay types (delete confirmation, toasts)
//! - Dashboard figures
//! - State error handling

mod dashboard;
mod error;
mod modal;
mod navigation;

pub use dashboard::DashboardStats;
pub use error::StateError;
pub use modal::{Confirmation, Toast, ToastLevel};
pub use navigation::{Focus, Route};

// State struct, methods and Default impl are in state_impl.rs
#[path = "state_impl.rs"]
mod state_impl;

pub use state_impl::State;
