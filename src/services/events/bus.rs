//! Typed publish/subscribe for lifecycle events.
//!
//! The bus is owned by `AppState` and passed explicitly; there is no global registry.
use async_trait::async_trait;
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::task::JoinHandle;

use crate::services::events::types::{EventEnvelope, EventKind, TaskEvent};

pub const DEFAULT_CAPACITY: usize = 256;

/// Observer registered with `EventBus::register`.
#[async_trait]
pub trait EventListener: Send + Sync + 'static {
    fn name(&self) -> &'static str;

    fn interested_in(&self, _kind: EventKind) -> bool {
        true
    }

    async fn on_event(&self, envelope: &EventEnvelope);
}

#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<EventEnvelope>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Publish an event. Returns the number of subscribers it reached (0 is fine).
    pub fn emit(&self, event: TaskEvent) -> usize {
        let envelope = EventEnvelope::new(event);
        tracing::trace!(event_id = %envelope.id, kind = envelope.event.kind().as_str(), "emit");
        self.sender.send(envelope).unwrap_or(0)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<EventEnvelope> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// Feed every future event to `listener` on a background task.
    ///
    /// The task ends once every `EventBus` handle is dropped.
    pub fn register<L: EventListener>(&self, listener: L) -> JoinHandle<()> {
        let mut rx = self.subscribe();

        tokio::spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(envelope) => {
                        if listener.interested_in(envelope.event.kind()) {
                            listener.on_event(&envelope).await;
                        }
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::warn!(listener = listener.name(), skipped, "event listener lagged");
                    }
                    Err(RecvError::Closed) => break,
                }
            }
            tracing::debug!(listener = listener.name(), "event listener stopped");
        })
    }
}

/// Logs every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingListener;

#[async_trait]
impl EventListener for TracingListener {
    fn name(&self) -> &'static str {
        "tracing"
    }

    async fn on_event(&self, envelope: &EventEnvelope) {
        tracing::info!(
            event_id = %envelope.id,
            kind = envelope.event.kind().as_str(),
            event = ?envelope.event,
            "lifecycle event"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};
    use uuid::Uuid;

    #[derive(Clone, Default)]
    struct Recorder {
        seen: Arc<Mutex<Vec<TaskEvent>>>,
        only: Option<EventKind>,
    }

    #[async_trait]
    impl EventListener for Recorder {
        fn name(&self) -> &'static str {
            "recorder"
        }

        fn interested_in(&self, kind: EventKind) -> bool {
            self.only.is_none_or(|only| only == kind)
        }

        async fn on_event(&self, envelope: &EventEnvelope) {
            self.seen.lock().unwrap().push(envelope.event.clone());
        }
    }

    #[test]
    fn emit_without_subscribers_is_not_an_error() {
        let bus = EventBus::default();
        assert_eq!(bus.emit(TaskEvent::ProcessingNodeRemoved { node_id: 1 }), 0);
    }

    #[tokio::test]
    async fn subscribers_receive_envelopes() {
        let bus = EventBus::new(8);
        let mut rx = bus.subscribe();
        let task_id = Uuid::new_v4();

        assert_eq!(bus.emit(TaskEvent::TaskCompleted { task_id }), 1);

        let envelope = rx.recv().await.unwrap();
        assert_eq!(envelope.event, TaskEvent::TaskCompleted { task_id });
    }

    #[tokio::test]
    async fn registered_listener_sees_filtered_events_until_bus_drops() {
        let bus = EventBus::new(8);
        let recorder = Recorder {
            only: Some(EventKind::TaskFailed),
            ..Default::default()
        };
        let handle = bus.register(recorder.clone());
        assert_eq!(bus.subscriber_count(), 1);

        let task_id = Uuid::new_v4();
        bus.emit(TaskEvent::TaskRemoving { task_id });
        bus.emit(TaskEvent::TaskFailed {
            task_id,
            reason: None,
        });
        bus.emit(TaskEvent::TaskRemoved { task_id });

        drop(bus);
        handle.await.unwrap();

        let seen = recorder.seen.lock().unwrap().clone();
        assert_eq!(
            seen,
            vec![TaskEvent::TaskFailed {
                task_id,
                reason: None
            }]
        );
    }

    #[tokio::test]
    async fn late_listener_sees_only_new_events() {
        let bus = EventBus::new(1);
        let recorder = Recorder::default();
        let mut rx = bus.subscribe();

        for node_id in 0..4 {
            bus.emit(TaskEvent::ProcessingNodeRemoved { node_id });
        }
        assert!(matches!(rx.recv().await, Err(RecvError::Lagged(_))));

        let handle = bus.register(recorder.clone());
        bus.emit(TaskEvent::ProcessingNodeRemoved { node_id: 9 });
        drop(bus);
        handle.await.unwrap();

        assert_eq!(
            recorder.seen.lock().unwrap().as_slice(),
            &[TaskEvent::ProcessingNodeRemoved { node_id: 9 }]
        );
    }
}
