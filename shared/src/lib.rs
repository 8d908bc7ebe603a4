//! Wire contract shared by the backend and the WASM frontend.
//!
//! Everything that crosses the HTTP boundary lives here: the [`Task`] record,
//! the request payloads, the [`ApiResponse`] envelope, and the field rules.
//! Both sides compile this crate, so the two cannot drift apart.

pub mod response;
pub mod task;

pub use response::ApiResponse;
pub use task::{
    validate_task_fields, CreateTaskRequest, Task, TaskFields, UpdateTaskRequest,
    MAX_DESCRIPTION_LEN, MAX_TITLE_LEN,
};
