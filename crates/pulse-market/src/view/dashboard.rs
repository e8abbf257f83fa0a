//! Dashboard controller

use super::state::{RequestId, ViewEvent, ViewState, reduce};
use crate::client::Analyzer;
use crate::error::Result;
use crate::model::AnalysisResult;
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

/// An issued request that has not been run yet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingRequest {
    pub id: RequestId,
    /// `None` asks for the default market-wide analysis
    pub query: Option<String>,
}

/// Outcome of a request, tagged with the id it was issued under
#[derive(Debug)]
pub struct Completion {
    pub id: RequestId,
    pub outcome: Result<AnalysisResult>,
}

/// Owns the view state and drives analyses
pub struct Dashboard {
    analyzer: Arc<dyn Analyzer>,
    state: ViewState,
}

impl Dashboard {
    pub fn new(analyzer: Arc<dyn Analyzer>) -> Self {
        Self {
            analyzer,
            state: ViewState::default(),
        }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    fn dispatch(&mut self, event: ViewEvent) {
        let state = std::mem::take(&mut self.state);
        self.state = reduce(state, event);
    }

    fn begin(&mut self, query: Option<String>) -> PendingRequest {
        let id = self.state.current_request.next();
        self.dispatch(ViewEvent::RequestStarted(id));
        debug!("Issued request {id} for {query:?}");
        PendingRequest { id, query }
    }

    /// First analysis on startup, always for the default query
    pub fn start_initial(&mut self) -> PendingRequest {
        self.begin(None)
    }

    /// Search for `text`; blank input is ignored and issues nothing
    pub fn submit_search(&mut self, text: &str) -> Option<PendingRequest> {
        let query = text.trim();
        if query.is_empty() {
            return None;
        }
        self.dispatch(ViewEvent::SearchTextChanged(query.to_string()));
        Some(self.begin(Some(query.to_string())))
    }

    /// Re-run the current search; ignored while a request is in flight
    pub fn refresh(&mut self) -> Option<PendingRequest> {
        if self.state.refreshing {
            debug!("Refresh ignored, request {} in flight", self.state.current_request);
            return None;
        }
        let query = Some(self.state.search_text.trim())
            .filter(|q| !q.is_empty())
            .map(str::to_string);
        Some(self.begin(query))
    }

    pub fn dismiss_error(&mut self) {
        self.dispatch(ViewEvent::ErrorDismissed);
    }

    /// Apply a completion; failures become the generic user message
    pub fn complete(&mut self, completion: Completion) {
        let Completion { id, outcome } = completion;
        match outcome {
            Ok(result) => {
                info!("Request {id} completed");
                self.dispatch(ViewEvent::RequestSucceeded(id, result));
            }
            Err(e) => {
                error!("Request {id} failed: {e}");
                self.dispatch(ViewEvent::RequestFailed(id, e.user_message().to_string()));
            }
        }
    }

    /// Run `pending` to completion and apply its outcome
    pub async fn run(&mut self, pending: PendingRequest) {
        let outcome = self.analyzer.analyze(pending.query).await;
        self.complete(Completion {
            id: pending.id,
            outcome,
        });
    }

    /// Run `pending` in the background, delivering the outcome on `tx`
    pub fn spawn(&self, pending: PendingRequest, tx: UnboundedSender<Completion>) -> JoinHandle<()> {
        let analyzer = Arc::clone(&self.analyzer);
        tokio::spawn(async move {
            let outcome = analyzer.analyze(pending.query).await;
            if tx
                .send(Completion {
                    id: pending.id,
                    outcome,
                })
                .is_err()
            {
                debug!("Dashboard closed before request {} finished", pending.id);
            }
        })
    }
}
