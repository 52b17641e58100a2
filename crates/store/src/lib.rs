pub mod file_store;
pub mod task;

pub use file_store::TaskStore;
pub use task::{NewTask, Task, TaskUpdate};
