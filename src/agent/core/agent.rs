use std::sync::Arc;
use tracing::{Instrument, info, info_span, warn};
use uuid::Uuid;

use super::browser_state::build_responses;
use super::config::SessionConfig;
use super::processor::AgentInner;
use crate::agent::safety::SafetyGate;
use crate::agent::{ActionRequest, AgentResult, DoneReason, SessionReport};
use crate::browser::BrowserDriver;
use crate::gemini::{Content, GenerativeModel};

/// Where a goal session stands between steps
#[derive(Debug)]
enum LoopState {
    AwaitingModel,
    Dispatching(Vec<ActionRequest>),
    Done(DoneReason),
}

/// Turn-loop controller for goal sessions against one page
///
/// Each call to [`Agent::run`] is an independent session that starts from
/// an empty history. Sessions on one agent must not overlap.
pub struct Agent {
    inner: AgentInner,
}

impl Agent {
    pub fn new(
        driver: Arc<dyn BrowserDriver>,
        model: Arc<dyn GenerativeModel>,
        safety_gate: Arc<dyn SafetyGate>,
        config: SessionConfig,
    ) -> Self {
        let tools = config.tools();
        Self {
            inner: AgentInner {
                driver,
                model,
                safety_gate,
                config,
                tools,
            },
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.inner.config
    }

    /// Drive the model and browser until the goal ends
    ///
    /// Action failures are reported to the model and do not end the session.
    /// A failed model call or page capture does, with an error.
    pub async fn run(&self, goal: &str) -> AgentResult<SessionReport> {
        let session_id = Uuid::new_v4();
        let span = info_span!("goal_session", %session_id);
        self.run_session(session_id, goal).instrument(span).await
    }

    async fn run_session(&self, session_id: Uuid, goal: &str) -> AgentResult<SessionReport> {
        let started_at = chrono::Utc::now();
        let turn_limit = self.inner.config.turn_limit;
        info!("Starting goal session: {}", goal);

        let mut history = vec![Content::user_text(goal)];
        let mut turns = 0;
        let mut state = LoopState::AwaitingModel;

        let reason = loop {
            state = match state {
                LoopState::AwaitingModel if turns >= turn_limit => {
                    LoopState::Done(DoneReason::TurnLimitReached)
                }
                LoopState::AwaitingModel => {
                    turns += 1;
                    info!("--- Turn {} ---", turns);

                    let turn = self.inner.request_turn(&history).await?;
                    let next = if turn.has_function_calls() {
                        LoopState::Dispatching(
                            turn.function_calls().map(ActionRequest::from_call).collect(),
                        )
                    } else {
                        let text = turn.text();
                        info!("Agent: {}", text);
                        LoopState::Done(DoneReason::FinalAnswer(text))
                    };
                    history.push(turn);
                    next
                }
                LoopState::Dispatching(requests) => {
                    info!("Executing {} action(s)...", requests.len());
                    let batch = self.inner.dispatch_batch(requests).await;
                    let failed = batch.entries.iter().filter(|(_, r)| !r.is_success()).count();
                    if failed > 0 {
                        warn!("{} of {} action(s) failed", failed, batch.entries.len());
                    }

                    info!("Capturing state...");
                    let snapshot = self.inner.capture_snapshot().await?;
                    history.push(Content::function_responses(build_responses(
                        &batch.entries,
                        &snapshot,
                    )));

                    if batch.terminated {
                        LoopState::Done(DoneReason::UserTerminated)
                    } else {
                        LoopState::AwaitingModel
                    }
                }
                LoopState::Done(reason) => break reason,
            };
        };

        if reason == DoneReason::TurnLimitReached {
            info!("Turn limit of {} reached", turn_limit);
        }
        info!("Goal session finished after {} turn(s): {:?}", turns, reason);

        Ok(SessionReport {
            session_id,
            goal: goal.to_string(),
            reason,
            turns,
            history,
            started_at,
            finished_at: chrono::Utc::now(),
        })
    }
}
