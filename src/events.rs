//! Change notifications broadcast to whoever renders the data.
//!
//! The store never knows who listens. Presentation code subscribes, and on
//! `Committed` re-reads whatever it shows.

use crate::domain::EntityKind;
use std::collections::BTreeSet;
use tokio::sync::broadcast;
use tracing::debug;

const DEFAULT_CAPACITY: usize = 64;

/// Something observable happened in the core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// A unit of work committed
    Committed {
        /// Store generation after the commit
        generation: u64,
        /// Collections the commit wrote to
        kinds: BTreeSet<EntityKind>,
    },
    /// Onboarding finished and its profile is committed
    OnboardingCompleted,
}

/// Broadcast channel shared by the store and the application services.
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<AppEvent>,
}

impl EventBus {
    /// A bus buffering up to `capacity` events per slow receiver.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Registers a new listener; it only sees events published after this call.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<AppEvent> {
        self.sender.subscribe()
    }

    /// Publishes an event, returning how many listeners received it.
    pub fn publish(&self, event: AppEvent) -> usize {
        match self.sender.send(event) {
            Ok(receivers) => receivers,
            Err(broadcast::error::SendError(event)) => {
                debug!("No listeners for {event:?}");
                0
            }
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[tokio::test]
    async fn test_publish_reaches_subscribers() {
        let bus = EventBus::default();
        let mut rx = bus.subscribe();
        assert_eq!(bus.publish(AppEvent::OnboardingCompleted), 1);
        assert_eq!(rx.recv().await.unwrap(), AppEvent::OnboardingCompleted);
    }

    #[test]
    fn test_publish_without_listeners_is_harmless() {
        let bus = EventBus::default();
        assert_eq!(bus.publish(AppEvent::OnboardingCompleted), 0);
    }
}
