//! View state and reducer

use crate::model::AnalysisResult;
use std::fmt;
use tracing::debug;

/// Monotonically increasing id of an analysis request
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestId(u64);

impl RequestId {
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Everything the dashboard renders from
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    /// Latest successful result, kept across failed refreshes
    pub result: Option<AnalysisResult>,
    /// True until the first request completes
    pub loading: bool,
    /// True while a request is in flight
    pub refreshing: bool,
    /// Message from the most recent failure, until dismissed
    pub error: Option<String>,
    pub search_text: String,
    /// Only completions for this request are applied
    pub current_request: RequestId,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            result: None,
            loading: true,
            refreshing: false,
            error: None,
            search_text: String::new(),
            current_request: RequestId::default(),
        }
    }
}

impl ViewState {
    /// Nothing to show yet but a progress indicator
    pub fn is_initial_loading(&self) -> bool {
        self.loading && self.result.is_none()
    }
}

/// Inputs to the reducer
#[derive(Debug, Clone, PartialEq)]
pub enum ViewEvent {
    RequestStarted(RequestId),
    RequestSucceeded(RequestId, AnalysisResult),
    RequestFailed(RequestId, String),
    ErrorDismissed,
    SearchTextChanged(String),
}

/// Apply `event` to `state`
///
/// Completions whose id is not the current request are discarded, so a slow
/// earlier response never overwrites a newer one.
pub fn reduce(state: ViewState, event: ViewEvent) -> ViewState {
    match event {
        ViewEvent::RequestStarted(id) => ViewState {
            refreshing: true,
            error: None,
            current_request: id,
            ..state
        },
        ViewEvent::RequestSucceeded(id, result) => {
            if id != state.current_request {
                debug!("Discarding result of superseded request {id}");
                return state;
            }
            ViewState {
                result: Some(result),
                loading: false,
                refreshing: false,
                ..state
            }
        }
        ViewEvent::RequestFailed(id, message) => {
            if id != state.current_request {
                debug!("Discarding failure of superseded request {id}");
                return state;
            }
            ViewState {
                error: Some(message),
                loading: false,
                refreshing: false,
                ..state
            }
        }
        ViewEvent::ErrorDismissed => ViewState {
            error: None,
            ..state
        },
        ViewEvent::SearchTextChanged(text) => ViewState {
            search_text: text,
            ..state
        },
    }
}
