//! Generation backend behind `POST /chat`.
//!
//! Keeps per-conversation history in memory, shapes the system prompt from
//! the persona settings carried by each request, forwards the history to an
//! [`LlmProvider`] and post-processes the reply with the glitch effect.

use dashmap::DashMap;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, warn};
use uuid::Uuid;

use madchat_types::gateway::{ChatRequest, ChatResponse};
use madchat_types::llm::{CompletionRequest, LlmError, Message};
use madchat_types::persona::PersonalityMode;

use crate::llm::LlmProvider;
use crate::persona::{apply_glitch, build_prompt};

/// System prompt used when neither persona shaping nor a caller prompt applies.
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful assistant.";

/// Upstream sampling bounds.
const MAX_TOKENS_CEILING: u32 = 1000;

/// One history entry, tagged so a failed request can take back exactly its own turn.
#[derive(Debug, Clone)]
struct Turn {
    id: Uuid,
    message: Message,
}

/// Stateful chat service shared by all `/chat` requests.
pub struct ChatBackend<P: LlmProvider> {
    provider: P,
    model: String,
    use_prompt_utils: bool,
    conversations: DashMap<String, Vec<Turn>>,
}

impl<P: LlmProvider> ChatBackend<P> {
    /// `use_prompt_utils` is the default for requests that don't say.
    pub fn new(provider: P, model: impl Into<String>, use_prompt_utils: bool) -> Self {
        Self {
            provider,
            model: model.into(),
            use_prompt_utils,
            conversations: DashMap::new(),
        }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Number of conversations with history.
    pub fn conversation_count(&self) -> usize {
        self.conversations.len()
    }

    /// Snapshot of one conversation's history.
    pub fn history(&self, conversation_id: &str) -> Vec<Message> {
        self.conversations
            .get(conversation_id)
            .map(|h| h.iter().map(|t| t.message.clone()).collect())
            .unwrap_or_default()
    }

    /// Handle one chat request.
    pub async fn handle(&self, request: ChatRequest) -> Result<ChatResponse, LlmError> {
        let mut rng = StdRng::from_entropy();
        self.handle_with_rng(request, &mut rng).await
    }

    /// Handle one chat request with a caller-supplied random source.
    ///
    /// On upstream failure the user turn is taken back out of the history so
    /// a retry does not send it twice.
    #[tracing::instrument(
        skip(self, request, rng),
        fields(conversation_id = request.conversation_id.as_deref().unwrap_or("new"))
    )]
    pub async fn handle_with_rng<R: Rng + Send>(
        &self,
        request: ChatRequest,
        rng: &mut R,
    ) -> Result<ChatResponse, LlmError> {
        let text = request.message_content.trim();
        if text.is_empty() {
            return Err(LlmError::InvalidRequest("message_content is empty".to_string()));
        }

        let shaped = request.use_prompt_utils.unwrap_or(self.use_prompt_utils);
        let system = if shaped {
            let mode = parse_mode(&request.personality_mode);
            build_prompt(text, request.anger_level, mode, rng)
        } else {
            request
                .system_prompt
                .clone()
                .filter(|p| !p.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_SYSTEM_PROMPT.to_string())
        };

        let conversation_id = request
            .conversation_id
            .clone()
            .filter(|id| !id.is_empty())
            .unwrap_or_else(|| Uuid::now_v7().to_string());

        let turn_id = Uuid::now_v7();
        let messages: Vec<Message> = {
            let mut history = self.conversations.entry(conversation_id.clone()).or_default();
            history.push(Turn {
                id: turn_id,
                message: Message::user(text),
            });
            history.iter().map(|t| t.message.clone()).collect()
        };

        let completion = CompletionRequest {
            model: self.model.clone(),
            messages,
            system: Some(system),
            max_tokens: request.max_new_tokens.clamp(1, MAX_TOKENS_CEILING),
            temperature: Some(clamp_unit(request.temperature)),
            top_p: None,
        };

        debug!(
            provider = self.provider.name(),
            turns = completion.messages.len(),
            shaped,
            "Forwarding conversation upstream"
        );

        let reply = match self.provider.complete(&completion).await {
            Ok(resp) => resp.content,
            Err(e) => {
                warn!(error = %e, "Upstream completion failed");
                self.rollback_turn(&conversation_id, turn_id);
                return Err(e);
            }
        };

        let reply = if shaped {
            apply_glitch(&reply, request.glitch_level, rng)
        } else {
            reply
        };

        if let Some(mut history) = self.conversations.get_mut(&conversation_id) {
            history.push(Turn {
                id: Uuid::now_v7(),
                message: Message::assistant(reply.clone()),
            });
        }

        Ok(ChatResponse {
            conversation_id,
            response: reply,
            user_message: Some(request.message_content),
        })
    }

    /// Remove the turn `turn_id` pushed. Other requests may have appended
    /// to the same conversation in the meantime, so the last entry is not
    /// necessarily ours.
    fn rollback_turn(&self, conversation_id: &str, turn_id: Uuid) {
        let now_empty = match self.conversations.get_mut(conversation_id) {
            Some(mut history) => {
                history.retain(|t| t.id != turn_id);
                history.is_empty()
            }
            None => false,
        };
        if now_empty {
            self.conversations.remove(conversation_id);
        }
    }
}

fn parse_mode(raw: &str) -> PersonalityMode {
    raw.parse().unwrap_or_else(|_| {
        warn!(mode = raw, "Unknown personality mode, using normal");
        PersonalityMode::Normal
    })
}

fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() { 0.0 } else { value.clamp(0.0, 1.0) }
}
