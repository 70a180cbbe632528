use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Task / processing-node lifecycle events observers can react to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TaskEvent {
    TaskCompleted { task_id: Uuid },
    TaskRemoving { task_id: Uuid },
    TaskRemoved { task_id: Uuid },
    TaskFailed { task_id: Uuid, reason: Option<String> },
    TaskResizingImages { task_id: Uuid },
    TaskDuplicated { task_id: Uuid, new_task_id: Uuid },
    ProcessingNodeRemoved { node_id: i64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    TaskCompleted,
    TaskRemoving,
    TaskRemoved,
    TaskFailed,
    TaskResizingImages,
    TaskDuplicated,
    ProcessingNodeRemoved,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::TaskCompleted => "task_completed",
            EventKind::TaskRemoving => "task_removing",
            EventKind::TaskRemoved => "task_removed",
            EventKind::TaskFailed => "task_failed",
            EventKind::TaskResizingImages => "task_resizing_images",
            EventKind::TaskDuplicated => "task_duplicated",
            EventKind::ProcessingNodeRemoved => "processing_node_removed",
        }
    }
}

impl TaskEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            TaskEvent::TaskCompleted { .. } => EventKind::TaskCompleted,
            TaskEvent::TaskRemoving { .. } => EventKind::TaskRemoving,
            TaskEvent::TaskRemoved { .. } => EventKind::TaskRemoved,
            TaskEvent::TaskFailed { .. } => EventKind::TaskFailed,
            TaskEvent::TaskResizingImages { .. } => EventKind::TaskResizingImages,
            TaskEvent::TaskDuplicated { .. } => EventKind::TaskDuplicated,
            TaskEvent::ProcessingNodeRemoved { .. } => EventKind::ProcessingNodeRemoved,
        }
    }
}

/// An emitted event plus delivery metadata.
#[derive(Debug, Clone, Serialize)]
pub struct EventEnvelope {
    pub id: Uuid,
    pub emitted_at: DateTime<Utc>,
    pub event: TaskEvent,
}

impl EventEnvelope {
    pub fn new(event: TaskEvent) -> Self {
        Self {
            id: Uuid::new_v4(),
            emitted_at: Utc::now(),
            event,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_type_tag() {
        let task_id = Uuid::nil();
        let value = serde_json::to_value(TaskEvent::TaskFailed {
            task_id,
            reason: Some("node offline".to_string()),
        })
        .unwrap();

        assert_eq!(value["type"], "task_failed");
        assert_eq!(value["reason"], "node offline");
        assert_eq!(
            TaskEvent::ProcessingNodeRemoved { node_id: 3 }.kind().as_str(),
            "processing_node_removed"
        );
    }
}
