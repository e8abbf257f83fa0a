//! Dashboard view state and controller
//!
//! State lives in an explicit [`ViewState`] record updated only through the
//! pure [`reduce`] function. The [`Dashboard`] controller issues request ids,
//! runs analyses, and feeds their completions back as events.

mod dashboard;
mod state;

pub use dashboard::{Completion, Dashboard, PendingRequest};
pub use state::{RequestId, ViewEvent, ViewState, reduce};
