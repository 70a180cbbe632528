/*!
 * Lifecycle event bus
 *
 * Public API:
 * - TaskEvent / EventKind / EventEnvelope
 * - EventBus / EventListener / TracingListener
 */
mod bus;
mod types;

pub use bus::{DEFAULT_CAPACITY, EventBus, EventListener, TracingListener};
pub use types::{EventEnvelope, EventKind, TaskEvent};
