//! Background worker for file I/O.
//!
//! The plugin thread posts [`WorkerMessage`]s (load rows, load columns, load or
//! save preferences, write a report) and receives [`WorkerResponse`]s as custom
//! messages. The worker never touches view state.
//!
//! - `messages`: request/response protocol types
//! - `handler`: worker implementation

pub mod handler;
pub mod messages;

pub use handler::TableWorker;
pub use messages::{WorkerMessage, WorkerResponse};
