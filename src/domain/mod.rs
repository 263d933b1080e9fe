pub mod enums;
pub mod events;
pub mod session;
pub mod task;
pub mod time;

pub use enums::{Mode, RunState, UiMode};
pub use events::{Rejection, SessionEvent, Transition};
pub use session::{CompletedSessionRecord, CompletedTask, Session};
pub use task::{Task, TaskId};
pub use time::{format_seconds, parse_user_input};
