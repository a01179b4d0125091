pub mod task;
pub mod topic;

pub use task::{Priority, Task, TaskRecord};
pub use topic::{FieldValue, Topic, TopicAction};
