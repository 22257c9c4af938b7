//! Event handling module.
//!
//! This module contains handlers for different types of events:
//! - Worker events: simulated round trips such as sending an email
//! - Terminal events: User input and terminal interactions

pub mod terminal;
pub mod worker;
