//! # Event Bus System
//!
//! Broadcasts catalog changes and user-facing notifications using
//! `tokio::sync::broadcast`.
//!
//! ## Overview
//!
//! The presentation layer is an external collaborator. It learns that the
//! view must be re-rendered, or that a toast should be shown, by subscribing
//! to the [`EventBus`]:
//!
//! ```text
//! ┌────────────────┐   emit    ┌──────────┐   subscribe   ┌──────────────┐
//! │ CatalogService ├──────────>│ EventBus ├──────────────>│ Presentation │
//! └────────────────┘           └──────────┘               └──────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use core_runtime::events::{CoreEvent, EventBus, Notification};
//!
//! # #[tokio::main]
//! # async fn main() {
//! let bus = EventBus::new(16);
//! let mut rx = bus.subscribe();
//!
//! bus.emit(CoreEvent::Notification(Notification::success("Added to favorites")))
//!     .ok();
//!
//! let event = rx.recv().await.unwrap();
//! assert!(matches!(event, CoreEvent::Notification(_)));
//! # }
//! ```
//!
//! ## Error Handling
//!
//! - **`RecvError::Lagged(n)`**: the subscriber missed `n` events. Non-fatal.
//! - **`RecvError::Closed`**: every sender was dropped; treat as shutdown.
//!
//! Emitting with no subscribers returns `Err(SendError)`; the catalog ignores
//! it because a headless catalog is a valid configuration.

use serde::{Deserialize, Serialize};
use std::fmt;
use tokio::sync::broadcast;

pub use tokio::sync::broadcast::error::{RecvError, SendError};
pub use tokio::sync::broadcast::Receiver;

/// Default buffer size for the event bus channel.
pub const DEFAULT_EVENT_BUFFER_SIZE: usize = 100;

// ============================================================================
// Core Event Types
// ============================================================================

/// Top-level event published through the bus.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "payload")]
pub enum CoreEvent {
    /// Collection and view changes
    Catalog(CatalogEvent),
    /// Message to show to the user
    Notification(Notification),
}

impl CoreEvent {
    /// Returns a human-readable description of the event.
    pub fn description(&self) -> &str {
        match self {
            CoreEvent::Catalog(e) => e.description(),
            CoreEvent::Notification(n) => &n.message,
        }
    }

    /// Returns the severity level of the event.
    pub fn severity(&self) -> EventSeverity {
        match self {
            CoreEvent::Notification(n) => n.level.severity(),
            CoreEvent::Catalog(CatalogEvent::ViewChanged { .. }) => EventSeverity::Debug,
            CoreEvent::Catalog(_) => EventSeverity::Info,
        }
    }
}

/// Event severity levels for filtering and logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EventSeverity {
    Debug,
    Info,
    Warning,
    Error,
}

// ============================================================================
// Catalog Events
// ============================================================================

/// Events describing changes to the record store or the derived view.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "event")]
pub enum CatalogEvent {
    /// The full set was replaced from the remote store.
    Loaded {
        /// Number of records now held.
        count: usize,
    },
    /// The remote store confirmed a new record.
    RecordAdded {
        /// Server-assigned id.
        id: String,
        title: String,
    },
    /// The remote store confirmed a change.
    RecordUpdated {
        id: String,
        /// Field names that were submitted.
        updated_fields: Vec<String>,
    },
    /// The remote store confirmed a deletion.
    RecordDeleted { id: String },
    /// The filtered and sorted view was re-derived.
    ViewChanged {
        /// Records in the view.
        visible: usize,
        /// Records in the full set.
        total: usize,
    },
    /// The full set was replaced from an exported snapshot.
    Imported { count: usize },
}

impl CatalogEvent {
    fn description(&self) -> &str {
        match self {
            CatalogEvent::Loaded { .. } => "Catalog loaded",
            CatalogEvent::RecordAdded { .. } => "Record added",
            CatalogEvent::RecordUpdated { .. } => "Record updated",
            CatalogEvent::RecordDeleted { .. } => "Record deleted",
            CatalogEvent::ViewChanged { .. } => "View re-derived",
            CatalogEvent::Imported { .. } => "Catalog imported",
        }
    }
}

// ============================================================================
// Notifications
// ============================================================================

/// Level of a user-facing notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    Info,
    Success,
    Warning,
    Error,
}

impl NotificationLevel {
    fn severity(&self) -> EventSeverity {
        match self {
            NotificationLevel::Info | NotificationLevel::Success => EventSeverity::Info,
            NotificationLevel::Warning => EventSeverity::Warning,
            NotificationLevel::Error => EventSeverity::Error,
        }
    }
}

/// A message for the presentation layer to show as a toast.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

impl Notification {
    pub fn new(level: NotificationLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Info, message)
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Success, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Warning, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Error, message)
    }
}

// ============================================================================
// Event Bus
// ============================================================================

/// Central broadcast channel.
///
/// Cloning the bus clones the sender; all clones publish to the same
/// subscribers.
#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<CoreEvent>,
}

impl EventBus {
    /// Creates a new event bus with the specified buffer size.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publishes an event to all subscribers.
    ///
    /// Returns the number of subscribers that received the event, or an
    /// error if there are none.
    pub fn emit(&self, event: CoreEvent) -> Result<usize, SendError<CoreEvent>> {
        self.sender.send(event)
    }

    /// Publishes a notification, ignoring the no-subscriber case.
    pub fn notify(&self, notification: Notification) {
        self.emit(CoreEvent::Notification(notification)).ok();
    }

    /// Publishes a catalog event, ignoring the no-subscriber case.
    pub fn catalog(&self, event: CatalogEvent) {
        self.emit(CoreEvent::Catalog(event)).ok();
    }

    /// Creates a new subscriber. Past events are not replayed.
    pub fn subscribe(&self) -> Receiver<CoreEvent> {
        self.sender.subscribe()
    }

    /// Returns the number of active subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_EVENT_BUFFER_SIZE)
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("subscriber_count", &self.subscriber_count())
            .finish()
    }
}

// ============================================================================
// Event Stream Wrapper
// ============================================================================

type EventFilter = Box<dyn Fn(&CoreEvent) -> bool + Send + Sync>;

/// A wrapper around `broadcast::Receiver` with optional filtering.
pub struct EventStream {
    receiver: Receiver<CoreEvent>,
    filter: Option<EventFilter>,
}

impl EventStream {
    pub fn new(receiver: Receiver<CoreEvent>) -> Self {
        Self {
            receiver,
            filter: None,
        }
    }

    /// Only events matching `predicate` will be returned.
    pub fn filter<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&CoreEvent) -> bool + Send + Sync + 'static,
    {
        self.filter = Some(Box::new(predicate));
        self
    }

    /// Receives the next event that passes the filter.
    pub async fn recv(&mut self) -> Result<CoreEvent, RecvError> {
        loop {
            let event = self.receiver.recv().await?;
            if self.matches(&event) {
                return Ok(event);
            }
        }
    }

    /// Attempts to receive a matching event without waiting.
    pub fn try_recv(&mut self) -> Option<Result<CoreEvent, RecvError>> {
        loop {
            match self.receiver.try_recv() {
                Ok(event) => {
                    if self.matches(&event) {
                        return Some(Ok(event));
                    }
                }
                Err(broadcast::error::TryRecvError::Empty) => return None,
                Err(broadcast::error::TryRecvError::Lagged(n)) => {
                    return Some(Err(RecvError::Lagged(n)))
                }
                Err(broadcast::error::TryRecvError::Closed) => return Some(Err(RecvError::Closed)),
            }
        }
    }

    /// Drains every matching event currently buffered.
    pub fn drain(&mut self) -> Vec<CoreEvent> {
        let mut events = Vec::new();
        while let Some(result) = self.try_recv() {
            match result {
                Ok(event) => events.push(event),
                Err(RecvError::Lagged(_)) => continue,
                Err(RecvError::Closed) => break,
            }
        }
        events
    }

    fn matches(&self, event: &CoreEvent) -> bool {
        self.filter.as_ref().map_or(true, |f| f(event))
    }
}

impl fmt::Debug for EventStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventStream")
            .field("has_filter", &self.filter.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_event_bus_creation() {
        let bus = EventBus::new(10);
        assert_eq!(bus.subscriber_count(), 0);
    }

    #[tokio::test]
    async fn test_emission_without_subscribers_is_err_but_notify_is_silent() {
        let bus = EventBus::new(10);
        assert!(bus
            .emit(CoreEvent::Catalog(CatalogEvent::Loaded { count: 0 }))
            .is_err());

        bus.notify(Notification::info("nobody listens"));
        bus.catalog(CatalogEvent::Loaded { count: 0 });
    }

    #[tokio::test]
    async fn test_multiple_subscribers_receive_same_event() {
        let bus = EventBus::new(10);
        let mut first = bus.subscribe();
        let mut second = bus.subscribe();

        let event = CoreEvent::Catalog(CatalogEvent::RecordDeleted { id: "3".to_string() });
        assert_eq!(bus.emit(event.clone()).unwrap(), 2);

        assert_eq!(first.recv().await.unwrap(), event);
        assert_eq!(second.recv().await.unwrap(), event);
    }

    #[tokio::test]
    async fn test_event_stream_with_filter() {
        let bus = EventBus::new(10);
        let mut notifications =
            EventStream::new(bus.subscribe()).filter(|e| matches!(e, CoreEvent::Notification(_)));

        bus.catalog(CatalogEvent::ViewChanged {
            visible: 1,
            total: 2,
        });
        bus.notify(Notification::error("Update failed"));

        let event = notifications.recv().await.unwrap();
        assert_eq!(
            event,
            CoreEvent::Notification(Notification::error("Update failed"))
        );
    }

    #[tokio::test]
    async fn test_drain_collects_buffered_events() {
        let bus = EventBus::new(10);
        let mut stream = EventStream::new(bus.subscribe());

        bus.notify(Notification::success("one"));
        bus.notify(Notification::warning("two"));

        let drained = stream.drain();
        assert_eq!(drained.len(), 2);
        assert!(stream.try_recv().is_none());
    }

    #[tokio::test]
    async fn test_lagged_subscriber() {
        let bus = EventBus::new(2);
        let mut rx = bus.subscribe();

        for count in 0..5 {
            bus.catalog(CatalogEvent::Loaded { count });
        }

        assert!(matches!(rx.recv().await, Err(RecvError::Lagged(_))));
    }

    #[test]
    fn test_event_severity() {
        assert_eq!(
            CoreEvent::Notification(Notification::error("x")).severity(),
            EventSeverity::Error
        );
        assert_eq!(
            CoreEvent::Notification(Notification::warning("x")).severity(),
            EventSeverity::Warning
        );
        assert_eq!(
            CoreEvent::Catalog(CatalogEvent::ViewChanged {
                visible: 0,
                total: 0
            })
            .severity(),
            EventSeverity::Debug
        );
        assert!(EventSeverity::Error > EventSeverity::Info);
    }

    #[test]
    fn test_event_serialization() {
        let event = CoreEvent::Notification(Notification::success("Media added"));
        let json = serde_json::to_value(&event).unwrap();

        assert_eq!(json["type"], "Notification");
        assert_eq!(json["payload"]["level"], "success");

        let back: CoreEvent = serde_json::from_value(json).unwrap();
        assert_eq!(back, event);
    }
}
