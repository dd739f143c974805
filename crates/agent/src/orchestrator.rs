//! The per-turn orchestration loop.

use crate::prompt;
use crate::session::Session;
use crate::turn::{TurnDecision, TurnPhase};
use reelclaw_config::AppConfig;
use reelclaw_core::error::ToolError;
use reelclaw_core::event::{DomainEvent, EventBus};
use reelclaw_core::message::{Conversation, Message, MessageToolCall, Role};
use reelclaw_core::provider::{Provider, ProviderRequest};
use reelclaw_core::tool::{ToolCall, ToolResult};
use reelclaw_core::Persona;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// User-facing message when a collaborator fails beyond recovery.
const APOLOGY: &str =
    "Sorry — I hit a problem while working on that. Nothing was lost; please try again.";

/// User-facing message when a turn exceeds its iteration bound.
const EXHAUSTED: &str =
    "That took more steps than I can handle in one turn. Could you rephrase or split the request?";

/// The outcome of one processed turn.
#[derive(Debug)]
pub struct TurnOutcome {
    /// The final reply, in the active persona's register.
    pub reply: String,

    /// Phases the turn moved through, in order.
    pub trace: Vec<TurnPhase>,

    /// Successful tool results, for renderers that show cards.
    pub tool_results: Vec<ToolResult>,
}

/// Drives the `Idle → Interpreting → {DirectReply | ToolDispatch |
/// RetrievalQa} → Responding → Idle` machine for each user turn.
///
/// The orchestrator is stateless across turns; everything per-user
/// lives in the [`Session`]. Holding the session's conversation lock
/// for the whole turn keeps tool dispatches strictly sequential.
pub struct Orchestrator {
    provider: Arc<dyn Provider>,
    chat_model: String,
    temperature: f32,
    max_tokens: u32,
    max_iterations: u32,
    history_window: usize,
    event_bus: Arc<EventBus>,
}

impl Orchestrator {
    pub fn new(provider: Arc<dyn Provider>, config: &AppConfig, event_bus: Arc<EventBus>) -> Self {
        Self {
            provider,
            chat_model: config.provider.chat_model.clone(),
            temperature: config.provider.temperature,
            max_tokens: config.provider.max_tokens,
            max_iterations: config.agent.max_iterations,
            history_window: config.agent.history_window,
            event_bus,
        }
    }

    /// Process one user turn to completion.
    ///
    /// Never returns an error: every failure — malformed tool
    /// arguments, collaborator outages, iteration exhaustion — folds
    /// into a conversational reply, and the session's history survives
    /// for a retry.
    pub async fn process_turn(&self, session: &Session, user_text: &str) -> TurnOutcome {
        let mut conv = session.conversation().lock().await;
        let persona = session.persona().await;

        Self::refresh_system_prompt(&mut conv, persona);
        conv.push(Message::user(user_text));

        info!(
            session_id = %session.id(),
            messages = conv.messages.len(),
            "Processing turn"
        );

        let mut trace = vec![TurnPhase::Interpreting];
        let mut tool_results: Vec<ToolResult> = Vec::new();
        let mut tokens_used = 0u32;
        // One shared correction budget per turn: the model gets a single
        // chance to fix a failed call before it must report the failure.
        let mut retry_used = false;

        let definitions = session.registry().definitions();

        let mut reply: Option<String> = None;
        for iteration in 1..=self.max_iterations {
            debug!(session_id = %session.id(), iteration, "Interpreting");

            let request = ProviderRequest {
                model: self.chat_model.clone(),
                messages: conv.recent_window(self.history_window),
                temperature: self.temperature,
                max_tokens: Some(self.max_tokens),
                tools: definitions.clone(),
            };

            let response = match self.provider.complete(request).await {
                Ok(response) => response,
                Err(e) => {
                    warn!(session_id = %session.id(), error = %e, "Provider failed; ending turn");
                    self.event_bus.publish(DomainEvent::ErrorOccurred {
                        context: "provider.complete".into(),
                        error_message: e.to_string(),
                        timestamp: chrono::Utc::now(),
                    });
                    conv.push(Message::assistant(APOLOGY));
                    reply = Some(APOLOGY.to_string());
                    break;
                }
            };

            if let Some(usage) = &response.usage {
                tokens_used += usage.total_tokens;
            }

            let decision =
                TurnDecision::classify(&response.message.content, response.tool_calls());
            trace.push(decision.phase());

            match decision {
                TurnDecision::DirectReply(text) => {
                    conv.push(response.message);
                    reply = Some(text);
                    break;
                }
                TurnDecision::ToolDispatch(calls) | TurnDecision::Retrieval(calls) => {
                    conv.push(response.message);

                    // Strictly sequential: watchlist mutations must keep
                    // their order, and later calls may depend on earlier
                    // results.
                    for tc in &calls {
                        let observation = self
                            .dispatch(session, tc, &mut retry_used, &mut tool_results)
                            .await;
                        conv.push(Message::tool_result(&tc.id, &observation));
                    }

                    trace.push(TurnPhase::Interpreting);
                }
            }
        }

        let reply = reply.unwrap_or_else(|| {
            warn!(
                session_id = %session.id(),
                iterations = self.max_iterations,
                "Turn exhausted its iteration budget"
            );
            conv.push(Message::assistant(EXHAUSTED));
            EXHAUSTED.to_string()
        });

        trace.push(TurnPhase::Responding);
        trace.push(TurnPhase::Idle);

        self.event_bus.publish(DomainEvent::TurnCompleted {
            session_id: session.id().to_string(),
            model: self.chat_model.clone(),
            tokens_used,
            timestamp: chrono::Utc::now(),
        });

        TurnOutcome {
            reply,
            trace,
            tool_results,
        }
    }

    /// Execute one tool call and produce the observation text that goes
    /// back into the conversation — either the tool's output or a
    /// structured error the model can act on.
    async fn dispatch(
        &self,
        session: &Session,
        tc: &MessageToolCall,
        retry_used: &mut bool,
        tool_results: &mut Vec<ToolResult>,
    ) -> String {
        let arguments: serde_json::Value = match serde_json::from_str(&tc.arguments) {
            Ok(value) => value,
            Err(e) => {
                let err = ToolError::InvalidArguments(format!("arguments are not valid JSON: {e}"));
                return Self::error_observation(&err, retry_used);
            }
        };

        let call = ToolCall {
            id: tc.id.clone(),
            name: tc.name.clone(),
            arguments,
        };

        let start = std::time::Instant::now();
        let result = session.registry().execute(&call).await;
        let duration_ms = start.elapsed().as_millis() as u64;

        self.event_bus.publish(DomainEvent::ToolExecuted {
            tool_name: tc.name.clone(),
            success: result.is_ok(),
            duration_ms,
            timestamp: chrono::Utc::now(),
        });

        match result {
            Ok(tool_result) => {
                debug!(tool = %tc.name, duration_ms, "Tool executed");
                let output = tool_result.output.clone();
                tool_results.push(tool_result);
                output
            }
            Err(e) => {
                warn!(tool = %tc.name, error = %e, "Tool execution failed");
                Self::error_observation(&e, retry_used)
            }
        }
    }

    /// Build the structured error observation for a failed call.
    ///
    /// The first failure in a turn invites one corrected retry; any
    /// later failure instructs the model to report the problem instead.
    fn error_observation(error: &ToolError, retry_used: &mut bool) -> String {
        let kind = match error {
            ToolError::InvalidArguments(_) => "invalid_arguments",
            ToolError::NotFound(_) => "unknown_tool",
            ToolError::Timeout { .. } => "timeout",
            ToolError::ExecutionFailed { .. } => "execution_failed",
        };

        let guidance = if !*retry_used && error.is_retryable() {
            *retry_used = true;
            "You may correct the arguments and retry this call once."
        } else if !*retry_used {
            *retry_used = true;
            "You may retry this call once if a different approach could work; \
             otherwise explain the problem to the user."
        } else {
            "Do not retry. Explain the problem to the user in plain language."
        };

        serde_json::json!({
            "error": {
                "kind": kind,
                "message": error.to_string(),
                "guidance": guidance,
            }
        })
        .to_string()
    }

    /// Keep the persona-styled system prompt as message zero.
    fn refresh_system_prompt(conv: &mut Conversation, persona: Persona) {
        let system = Message::system(prompt::system_prompt(persona));
        if conv.messages.first().map(|m| m.role.clone()) == Some(Role::System) {
            conv.messages[0] = system;
        } else {
            conv.messages.insert(0, system);
        }
    }
}
