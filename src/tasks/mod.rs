//! Task entity: the state-bearing record for one execution request.

mod task;

pub use task::{Payload, Task, TaskStatus};
