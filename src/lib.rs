//! Terminal front-end for a CRM and marketing suite.
//!
//! Records live in per-collection slices of an in-process store; the UI
//! renders them as searchable tables, detail pages and forms.

pub mod app;
pub mod config;
pub mod crm;
pub mod error;
pub mod events;
pub mod forms;
pub mod logger;
pub mod state;
pub mod store;
pub mod table;
pub mod ui;
pub mod utils;
