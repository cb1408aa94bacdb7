mod controller;
mod countdown;
mod progress;
mod service;

// Public API of the session subsystem.
pub use crate::error::SessionError;
pub use controller::ExamController;
pub use progress::ExamProgress;
pub use service::{CountdownStatus, ExamSession};
