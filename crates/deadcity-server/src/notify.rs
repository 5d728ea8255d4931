//! Outbound notifications.
//!
//! The engine hands every [`Event`] to a [`Notifier`] together with its
//! topic. What happens next (socket broadcast, log line, nothing) is up to
//! the implementation.

use std::sync::{Mutex, PoisonError};

use deadcity_logic::events::Event;

pub trait Notifier: Send + Sync {
    fn publish(&self, topic: &str, event: &Event);
}

/// JSON payload for an event, as a socket layer would forward it.
pub fn to_json(event: &Event) -> Result<String, serde_json::Error> {
    serde_json::to_string(event)
}

/// Drops everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullNotifier;

impl Notifier for NullNotifier {
    fn publish(&self, _topic: &str, _event: &Event) {}
}

/// Writes each event to the `log` facade at debug level.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn publish(&self, topic: &str, event: &Event) {
        match to_json(event) {
            Ok(payload) => log::debug!("[{}] {}", topic, payload),
            Err(e) => log::warn!("[{}] unserializable event: {}", topic, e),
        }
    }
}

/// Keeps every published event in memory.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    events: Mutex<Vec<(String, Event)>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<(String, Event)> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Drain what was recorded so far.
    pub fn take(&self) -> Vec<(String, Event)> {
        std::mem::take(&mut *self.events.lock().unwrap_or_else(PoisonError::into_inner))
    }

    pub fn topics(&self) -> Vec<String> {
        self.events().into_iter().map(|(topic, _)| topic).collect()
    }
}

impl Notifier for RecordingNotifier {
    fn publish(&self, topic: &str, event: &Event) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((topic.to_string(), event.clone()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use deadcity_logic::events::topics;

    fn resting(id: u64) -> Event {
        Event::RestingChanged {
            character_id: id,
            resting: true,
            building_id: Some(2),
        }
    }

    #[test]
    fn test_recording_notifier() {
        let n = RecordingNotifier::new();
        n.publish(topics::RESTING_CHANGED, &resting(1));
        n.publish(topics::RESTING_CHANGED, &resting(2));
        assert_eq!(n.topics(), vec![topics::RESTING_CHANGED; 2]);
        assert_eq!(n.take().len(), 2);
        assert!(n.events().is_empty());
    }

    #[test]
    fn test_to_json() {
        let json = to_json(&resting(7)).unwrap();
        assert!(json.contains("\"event\":\"resting_changed\""));
        assert!(json.contains("\"character_id\":7"));
    }
}
