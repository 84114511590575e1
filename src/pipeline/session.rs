//! Session driver.
//!
//! Owns the pipeline event receiver and the debounce timer, feeding the
//! single-threaded controller. The suspension points are exactly the event
//! channel and the debounce sleep; translation calls and speech callbacks
//! re-enter through the channel.

use crate::pipeline::controller::{EventReceiver, SessionController};
use log::debug;
use std::time::Instant;
use tokio::time::sleep_until;

pub struct Session {
    controller: SessionController,
    events: EventReceiver,
}

impl Session {
    pub fn new(controller: SessionController, events: EventReceiver) -> Self {
        Self { controller, events }
    }

    pub fn controller(&self) -> &SessionController {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut SessionController {
        &mut self.controller
    }

    /// Drive the controller until the session has stopped and drained:
    /// listening ended, no translation call in flight, no utterance playing.
    /// Callers start listening before running, otherwise this returns
    /// immediately.
    pub async fn run(&mut self) {
        loop {
            if self.controller.is_drained() {
                break;
            }

            let deadline = self.controller.debounce_deadline();

            tokio::select! {
                event = self.events.recv() => {
                    match event {
                        Some(event) => self.controller.handle_event(event, Instant::now()),
                        None => break,
                    }
                }
                _ = async {
                    match deadline {
                        Some(deadline) => {
                            sleep_until(tokio::time::Instant::from_std(deadline)).await
                        }
                        None => std::future::pending::<()>().await,
                    }
                } => {
                    self.controller.on_debounce_expired(Instant::now());
                }
            }
        }

        debug!("Session loop finished");
    }
}
