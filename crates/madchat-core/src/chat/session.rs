//! Session controller for the active conversation.
//!
//! Tracks which conversation is active, its user message count and the
//! derived anger/glitch levels, enforces the message cap, and drives
//! requests to the chat gateway. The session state is a recomputable view
//! of the `ConversationStore`: selecting a conversation always rebuilds it
//! from the stored records.
//!
//! Every outgoing request is tracked by a [`RequestHandle`]. Starting a new
//! conversation, selecting another one or deleting the active one bumps the
//! session generation and cancels outstanding handles, so a late response
//! is discarded instead of landing in whatever conversation is active now.

use std::collections::HashMap;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use uuid::Uuid;

use madchat_types::chat::{Levels, MESSAGE_CAP, MessageRecord, MessageRole, SessionState};
use madchat_types::error::{GatewayError, SessionError, ValidationError};
use madchat_types::gateway::{ChatRequest, ChatResponse};
use madchat_types::profile::UserProfile;

use crate::chat::gateway::{ChatGateway, GenerationSettings};
use crate::chat::levels::compute_levels;
use crate::chat::store::{ConversationStore, RenameOutcome};
use crate::chat::title::generate_title;
use crate::storage::PersistedStore;

/// Content of the system record appended when the gateway call fails.
pub const GATEWAY_FAILURE_MESSAGE: &str = "Error: Unable to get response from server.";

/// Identifies one outstanding gateway request.
#[derive(Debug, Clone)]
pub struct RequestHandle {
    id: Uuid,
    generation: u64,
    title: String,
    cancel: CancellationToken,
}

impl RequestHandle {
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Title of the conversation the request was sent from.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Token that fires when the request is cancelled or superseded.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

/// A user message that has been recorded and is ready to go to the gateway.
#[derive(Debug)]
pub struct PendingSend {
    pub handle: RequestHandle,
    pub request: ChatRequest,
}

/// Why a gateway outcome was dropped without touching the conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscardReason {
    /// The request was cancelled before its outcome was applied.
    Cancelled,
    /// The conversation the request belonged to is no longer active.
    Stale,
}

/// What happened to a sent message.
#[derive(Debug, Clone, PartialEq)]
pub enum SendOutcome {
    /// The persona replied; the assistant record was appended.
    Replied(MessageRecord),
    /// The gateway failed; a system diagnostic record was appended.
    Failed {
        record: MessageRecord,
        error: GatewayError,
    },
    /// The outcome was dropped.
    Discarded(DiscardReason),
}

/// Orchestrates the active conversation on top of a `ConversationStore`
/// and a `ChatGateway`.
///
/// Generic over the persistence and gateway ports so the same controller
/// runs against the file store and HTTP gateway in the binary and against
/// in-memory fakes in tests.
pub struct SessionController<S: PersistedStore, G: ChatGateway> {
    store: ConversationStore<S>,
    gateway: G,
    settings: GenerationSettings,
    profile: Option<UserProfile>,
    state: SessionState,
    /// Bumped whenever the active conversation changes identity.
    generation: u64,
    in_flight: HashMap<Uuid, CancellationToken>,
}

impl<S: PersistedStore, G: ChatGateway> SessionController<S, G> {
    /// Create a controller with no active conversation.
    pub fn new(store: ConversationStore<S>, gateway: G, settings: GenerationSettings) -> Self {
        Self {
            store,
            gateway,
            settings: settings.clamped(),
            profile: None,
            state: SessionState::default(),
            generation: 0,
            in_flight: HashMap::new(),
        }
    }

    /// Attach the logged-in user's profile to outgoing requests.
    pub fn with_profile(mut self, profile: Option<UserProfile>) -> Self {
        self.profile = profile;
        self
    }

    pub fn set_profile(&mut self, profile: Option<UserProfile>) {
        self.profile = profile;
    }

    pub fn profile(&self) -> Option<&UserProfile> {
        self.profile.as_ref()
    }

    /// Current session state.
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn store(&self) -> &ConversationStore<S> {
        &self.store
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    pub fn settings(&self) -> &GenerationSettings {
        &self.settings
    }

    /// Whether at least one request is outstanding.
    pub fn is_loading(&self) -> bool {
        self.state.loading
    }

    /// Records of the active conversation, oldest first.
    pub fn conversation(&self) -> Vec<MessageRecord> {
        match &self.state.current_title {
            Some(title) => self.store.filter_by_title(title),
            None => Vec::new(),
        }
    }

    /// Whether leaving the active conversation discards visible messages,
    /// in which case the UI should ask before starting a new one.
    pub fn needs_confirmation(&self) -> bool {
        self.state
            .current_title
            .as_deref()
            .is_some_and(|title| self.store.contains(title))
    }

    /// Levels for a user message count. Pure; see [`compute_levels`].
    pub fn compute_levels(user_message_count: u32) -> Levels {
        compute_levels(user_message_count)
    }

    /// Reset to the empty-conversation baseline.
    ///
    /// Outstanding requests are cancelled and their outcomes will be discarded.
    pub fn start_new_conversation(&mut self) {
        self.invalidate_requests();
        self.state = SessionState::default();
        info!("Started new conversation");
    }

    /// Make `title` the active conversation and rebuild the session state
    /// from its stored records.
    ///
    /// Returns false when no records carry the title; the title is still
    /// adopted and becomes the name of the next message's conversation.
    pub fn select_conversation(&mut self, title: &str) -> bool {
        self.invalidate_requests();

        self.state = SessionState {
            current_title: Some(title.to_string()),
            ..SessionState::default()
        };
        let existed = self.refresh_from_store();

        info!(
            title = %title,
            message_count = self.state.message_count,
            anger_level = self.state.anger_level,
            "Selected conversation"
        );
        existed
    }

    /// Send a message and wait for the reply.
    ///
    /// The request cannot be cancelled from outside while this borrows the
    /// controller; callers that need that use `begin_send`/`finish_send`.
    ///
    /// Validation failures are returned without touching any state. Gateway
    /// failures are recovered: a system record is appended and reported as
    /// [`SendOutcome::Failed`]. The user record and incremented count are
    /// kept either way.
    pub async fn send_message(&mut self, text: &str) -> Result<SendOutcome, ValidationError> {
        let PendingSend { handle, request } = self.begin_send(text)?;
        let result = self.gateway.send(&request).await;
        Ok(self.finish_send(handle, result))
    }

    /// First half of [`send_message`](Self::send_message): validate, record
    /// the user message and register a request handle.
    ///
    /// Callers that drive the gateway themselves (e.g. to race it against
    /// Ctrl+C) pass the handle and the gateway result to
    /// [`finish_send`](Self::finish_send).
    pub fn begin_send(&mut self, text: &str) -> Result<PendingSend, ValidationError> {
        if text.trim().is_empty() {
            return Err(ValidationError::EmptyMessage);
        }
        if self.state.message_count >= MESSAGE_CAP {
            return Err(ValidationError::MessageCapReached { cap: MESSAGE_CAP });
        }

        let title = match &self.state.current_title {
            Some(title) => title.clone(),
            None => {
                let title = generate_title(text);
                debug!(title = %title, "Adopted title from first message");
                self.state.current_title = Some(title.clone());
                title
            }
        };

        self.state.message_count += 1;
        self.apply_levels();

        let record = MessageRecord::new(
            title.clone(),
            MessageRole::User,
            text,
            self.state.conversation_id.clone(),
        );
        self.append_logged(record);

        let handle = RequestHandle {
            id: Uuid::now_v7(),
            generation: self.generation,
            title,
            cancel: CancellationToken::new(),
        };
        self.in_flight.insert(handle.id, handle.cancel.clone());
        self.state.loading = true;

        let request = self.build_request(text);
        debug!(
            request_id = %handle.id,
            message_count = self.state.message_count,
            anger_level = request.anger_level,
            glitch_level = request.glitch_level,
            "Dispatching chat request"
        );

        Ok(PendingSend { handle, request })
    }

    /// Second half of [`send_message`](Self::send_message): apply a gateway
    /// outcome and release the handle.
    pub fn finish_send(
        &mut self,
        handle: RequestHandle,
        result: Result<ChatResponse, GatewayError>,
    ) -> SendOutcome {
        let tracked = self.in_flight.remove(&handle.id).is_some();
        self.state.loading = !self.in_flight.is_empty();

        if !tracked || handle.generation != self.generation {
            info!(request_id = %handle.id, title = %handle.title, "Discarding stale chat response");
            return SendOutcome::Discarded(DiscardReason::Stale);
        }
        if handle.is_cancelled() || matches!(result, Err(GatewayError::Cancelled)) {
            info!(request_id = %handle.id, "Chat request cancelled");
            return SendOutcome::Discarded(DiscardReason::Cancelled);
        }

        // Same generation: the active conversation is the one the request
        // came from, possibly renamed since.
        let title = self
            .state
            .current_title
            .clone()
            .unwrap_or_else(|| handle.title.clone());

        match result {
            Ok(response) => {
                if self.state.conversation_id.is_none() {
                    debug!(conversation_id = %response.conversation_id, "Adopted conversation id");
                    self.state.conversation_id = Some(response.conversation_id);
                }
                let record = MessageRecord::new(
                    title,
                    MessageRole::Assistant,
                    response.response,
                    self.state.conversation_id.clone(),
                );
                self.append_logged(record.clone());
                SendOutcome::Replied(record)
            }
            Err(error) => {
                warn!(request_id = %handle.id, error = %error, "Chat gateway request failed");
                let record = MessageRecord::new(
                    title,
                    MessageRole::System,
                    GATEWAY_FAILURE_MESSAGE,
                    self.state.conversation_id.clone(),
                );
                self.append_logged(record.clone());
                SendOutcome::Failed { record, error }
            }
        }
    }

    /// Cancel every outstanding request. Their outcomes will be discarded.
    ///
    /// Returns the number of requests cancelled.
    pub fn cancel_pending(&mut self) -> usize {
        for token in self.in_flight.values() {
            token.cancel();
        }
        self.in_flight.len()
    }

    /// Rename a conversation, following it if it is the active one.
    ///
    /// Renaming onto an existing title merges the two conversations; the
    /// outcome's `merged` flag reports it.
    pub fn rename_conversation(
        &mut self,
        old_title: &str,
        new_title: &str,
    ) -> Result<RenameOutcome, SessionError> {
        let outcome = self.store.rename(old_title, new_title)?;
        let new_title = new_title.trim();

        match self.state.current_title.as_deref() {
            Some(active) if active == old_title => {
                self.state.current_title = Some(new_title.to_string());
                self.refresh_from_store();
            }
            Some(active) if active == new_title && outcome.merged => {
                self.refresh_from_store();
            }
            _ => {}
        }

        info!(
            old_title = %old_title,
            new_title = %new_title,
            moved = outcome.moved,
            merged = outcome.merged,
            "Conversation renamed"
        );
        Ok(outcome)
    }

    /// Delete a conversation. Deleting the active one resets the session.
    ///
    /// Returns the number of records removed.
    pub fn delete_conversation(&mut self, title: &str) -> Result<usize, SessionError> {
        let removed = self.store.remove(title);
        if self.state.current_title.as_deref() == Some(title) {
            self.start_new_conversation();
        }
        let removed = removed?;
        info!(title = %title, removed, "Conversation deleted");
        Ok(removed)
    }

    fn build_request(&self, text: &str) -> ChatRequest {
        ChatRequest {
            message_content: text.to_string(),
            conversation_id: self.state.conversation_id.clone(),
            system_prompt: None,
            anger_level: u32::from(self.state.anger_level),
            personality_mode: self.settings.personality_mode.to_string(),
            glitch_level: self.state.glitch_level,
            temperature: self.settings.temperature,
            top_p: self.settings.top_p,
            max_new_tokens: self.settings.max_new_tokens,
            use_prompt_utils: None,
            user_data: self.profile.clone(),
        }
    }

    /// Rebuild the conversation id, count and levels of the active
    /// conversation from its records. A merged conversation can hold more
    /// than the cap; the count is clamped.
    ///
    /// Returns whether any record carries the active title.
    fn refresh_from_store(&mut self) -> bool {
        let Some(title) = self.state.current_title.as_deref() else {
            return false;
        };
        let records = self.store.filter_by_title(title);
        let count = self.store.user_message_count(title);

        self.state.conversation_id = records.iter().find_map(|r| r.conversation_id.clone());
        self.state.message_count = count.min(MESSAGE_CAP);
        self.apply_levels();
        !records.is_empty()
    }

    fn apply_levels(&mut self) {
        let levels = compute_levels(self.state.message_count);
        self.state.anger_level = levels.anger;
        self.state.glitch_level = levels.glitch;
    }

    fn invalidate_requests(&mut self) {
        for (_, token) in self.in_flight.drain() {
            token.cancel();
        }
        self.generation += 1;
        self.state.loading = false;
    }

    fn append_logged(&mut self, record: MessageRecord) {
        if let Err(e) = self.store.append(record) {
            warn!(error = %e, "Failed to persist chat history");
        }
    }
}
