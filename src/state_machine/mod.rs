// Task status state machine
//
// Pure transition logic: callers pass the current record, an event and the
// timestamp to stamp, and get back a TaskTransition to persist.

pub mod events;
pub mod states;
pub mod task_state_machine;

// Re-export main types for convenient access
pub use events::TaskEvent;
pub use states::TaskStatus;
pub use task_state_machine::{TaskStateMachine, TaskTransition};
