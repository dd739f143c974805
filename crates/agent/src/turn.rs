//! Turn state machine types.

use reelclaw_core::message::MessageToolCall;
use serde::{Deserialize, Serialize};

/// The name of the retrieval tool; calls to it route through the
/// RetrievalQa branch of the state machine.
pub const RETRIEVAL_TOOL: &str = "document_qa";

/// Phases a turn moves through. Recorded in order so transition
/// coverage can be asserted independently of model output variance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurnPhase {
    Idle,
    Interpreting,
    DirectReply,
    ToolDispatch,
    RetrievalQa,
    Responding,
}

/// What the model's response means for this turn.
#[derive(Debug)]
pub enum TurnDecision {
    /// Plain text — no tool involvement.
    DirectReply(String),

    /// One or more tool calls to dispatch in sequence.
    ToolDispatch(Vec<MessageToolCall>),

    /// Every requested call targets the retrieval tool.
    Retrieval(Vec<MessageToolCall>),
}

impl TurnDecision {
    /// Classify a model response into a decision.
    pub fn classify(content: &str, tool_calls: &[MessageToolCall]) -> Self {
        if tool_calls.is_empty() {
            return TurnDecision::DirectReply(content.to_string());
        }
        if tool_calls.iter().all(|tc| tc.name == RETRIEVAL_TOOL) {
            return TurnDecision::Retrieval(tool_calls.to_vec());
        }
        TurnDecision::ToolDispatch(tool_calls.to_vec())
    }

    /// The phase this decision enters.
    pub fn phase(&self) -> TurnPhase {
        match self {
            TurnDecision::DirectReply(_) => TurnPhase::DirectReply,
            TurnDecision::ToolDispatch(_) => TurnPhase::ToolDispatch,
            TurnDecision::Retrieval(_) => TurnPhase::RetrievalQa,
        }
    }
}
