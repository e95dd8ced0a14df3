use tracing::{debug, info};

use super::processor::AgentInner;
use crate::agent::AgentResult;
use crate::gemini::Content;

/// Model integration implementation
impl AgentInner {
    /// Ask the model for the next turn given the full history
    pub(super) async fn request_turn(&self, history: &[Content]) -> AgentResult<Content> {
        debug!(
            "Requesting turn from {} ({} history entries)",
            self.config.model,
            history.len()
        );
        let turn = self.model.generate(history, &self.tools).await?;

        let calls = turn.function_calls().count();
        if calls > 0 {
            info!("Model requested {} action(s)", calls);
        }
        let text = turn.text();
        if !text.is_empty() && calls > 0 {
            info!("Model: {}", text);
        }
        Ok(turn)
    }
}
