use crate::state::State;
use anyhow::Result;
use log::*;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

/// Specify background actions that complete after a simulated round trip.
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    SendTestEmail { email_id: String },
    SendEmail { email_id: String },
}

/// Specify struct for applying background action results to state.
///
pub struct Handler<'a> {
    state: &'a Arc<Mutex<State>>,
    delay: Duration,
}

impl<'a> Handler<'a> {
    /// Return new instance with reference to state.
    ///
    pub fn new(state: &'a Arc<Mutex<State>>, delay: Duration) -> Self {
        Handler { state, delay }
    }

    /// Handle worker events by type.
    ///
    pub async fn handle(&mut self, event: Event) -> Result<()> {
        debug!("Processing worker event '{:?}'...", event);
        match event {
            Event::SendTestEmail { email_id } => self.send_test_email(email_id).await?,
            Event::SendEmail { email_id } => self.send_email(email_id).await?,
        }
        Ok(())
    }

    async fn send_test_email(&mut self, email_id: String) -> Result<()> {
        info!("Sending test email {}...", email_id);
        tokio::time::sleep(self.delay).await;
        let mut state = self.state.lock().await;
        state.complete_test_email(&email_id);
        Ok(())
    }

    async fn send_email(&mut self, email_id: String) -> Result<()> {
        info!("Sending email {}...", email_id);
        tokio::time::sleep(self.delay).await;
        let mut state = self.state.lock().await;
        state.complete_send_email(&email_id);
        Ok(())
    }
}
