use std::sync::Arc;
use tracing::info;

use super::config::SessionConfig;
use crate::agent::safety::{SafetyGate, SafetyVerdict};
use crate::agent::{ActionRequest, ActionResult};
use crate::browser::BrowserDriver;
use crate::gemini::{GenerativeModel, Tool};

/// Collaborators and settings shared by every turn of a session
pub(super) struct AgentInner {
    pub(super) driver: Arc<dyn BrowserDriver>,
    pub(super) model: Arc<dyn GenerativeModel>,
    pub(super) safety_gate: Arc<dyn SafetyGate>,
    pub(super) config: SessionConfig,
    pub(super) tools: Vec<Tool>,
}

/// Every request of one model turn paired with its result, in order
pub(super) struct DispatchedBatch {
    pub(super) entries: Vec<(ActionRequest, ActionResult)>,
    /// The operator rejected an action in this batch
    pub(super) terminated: bool,
}

impl AgentInner {
    /// Run a batch through the safety gate and the executor, one at a time
    ///
    /// After a rejection nothing else in the batch runs, but each remaining
    /// request still gets a result so responses stay aligned with calls.
    pub(super) async fn dispatch_batch(&self, requests: Vec<ActionRequest>) -> DispatchedBatch {
        let mut entries = Vec::with_capacity(requests.len());
        let mut terminated = false;

        for request in requests {
            let gated = request.safety_decision.is_some().then_some(false);

            let result = if terminated {
                ActionResult::skipped(request.kind.clone()).with_acknowledgement(gated)
            } else if let Some(decision) = &request.safety_decision {
                match self.safety_gate.confirm(decision).await {
                    SafetyVerdict::Proceed => self
                        .execute_action(&request)
                        .await
                        .with_acknowledgement(Some(true)),
                    SafetyVerdict::Terminate => {
                        info!("Terminating agent loop by operator choice");
                        terminated = true;
                        ActionResult::rejected(request.kind.clone())
                    }
                }
            } else {
                self.execute_action(&request).await
            };

            entries.push((request, result));
        }

        DispatchedBatch {
            entries,
            terminated,
        }
    }
}
