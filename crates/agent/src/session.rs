//! Sessions and the session manager.
//!
//! A session owns everything conversational for one user: the message
//! history, the persona, a private watchlist store, and at most one
//! ingested document. Distinct sessions share nothing but the stateless
//! collaborators (provider, catalog, retriever), so independent users
//! can run fully in parallel.

use crate::prompt;
use reelclaw_config::AppConfig;
use reelclaw_core::error::RetrievalError;
use reelclaw_core::event::{DomainEvent, EventBus};
use reelclaw_core::message::{Conversation, Message, Role, SessionId};
use reelclaw_core::tool::ToolRegistry;
use reelclaw_core::{Persona, Provider};
use reelclaw_metadata::MovieCatalog;
use reelclaw_retrieval::{DocumentRetriever, DocumentSlot};
use reelclaw_tools::{session_registry, ToolContext};
use reelclaw_watchlist::WatchlistStore;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info};

/// One user's conversational state and collaborators.
pub struct Session {
    id: SessionId,
    persona: RwLock<Persona>,
    conversation: Mutex<Conversation>,
    registry: ToolRegistry,
    watchlist: Arc<WatchlistStore>,
    document: Arc<DocumentSlot>,
    retriever: Arc<DocumentRetriever>,
    event_bus: Arc<EventBus>,
}

impl Session {
    fn new(
        id: SessionId,
        persona: Persona,
        registry: ToolRegistry,
        watchlist: Arc<WatchlistStore>,
        document: Arc<DocumentSlot>,
        retriever: Arc<DocumentRetriever>,
        event_bus: Arc<EventBus>,
    ) -> Self {
        let conversation = Conversation::new(id.clone());
        Self {
            id,
            persona: RwLock::new(persona),
            conversation: Mutex::new(conversation),
            registry,
            watchlist,
            document,
            retriever,
            event_bus,
        }
    }

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    /// The conversation, guarded so a session processes one turn at a
    /// time — the orchestrator holds this lock for the whole turn.
    pub fn conversation(&self) -> &Mutex<Conversation> {
        &self.conversation
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    pub fn watchlist(&self) -> &Arc<WatchlistStore> {
        &self.watchlist
    }

    pub fn document(&self) -> &Arc<DocumentSlot> {
        &self.document
    }

    pub async fn persona(&self) -> Persona {
        *self.persona.read().await
    }

    /// Switch the reply persona. Takes effect at the next turn's
    /// Responding phase; history and watchlist are untouched.
    pub async fn set_persona(&self, persona: Persona) {
        *self.persona.write().await = persona;
        debug!(session_id = %self.id, %persona, "Persona switched");
    }

    /// Ingest a document for this session, replacing any previous one.
    /// Returns the number of indexed chunks.
    pub async fn ingest_document(
        &self,
        bytes: &[u8],
        name: &str,
    ) -> Result<usize, RetrievalError> {
        let index = self.retriever.ingest(bytes, name).await?;
        let chunks = index.len();

        self.event_bus.publish(DomainEvent::DocumentIngested {
            document_id: index.document_id.clone(),
            chunks,
            timestamp: chrono::Utc::now(),
        });

        self.document.replace(index).await;
        Ok(chunks)
    }

    /// Clear the history, keeping the persona and watchlist.
    pub async fn reset_conversation(&self) {
        let mut conv = self.conversation.lock().await;
        conv.reset();
    }

    /// Whether the conversation currently has any non-system messages.
    pub async fn has_history(&self) -> bool {
        let conv = self.conversation.lock().await;
        conv.messages.iter().any(|m| m.role != Role::System)
    }

    /// Seed the system prompt so a brand-new session renders its
    /// persona even before the first turn.
    pub(crate) async fn seed_system_prompt(&self) {
        let persona = self.persona().await;
        let mut conv = self.conversation.lock().await;
        if conv.messages.is_empty() {
            conv.push(Message::system(prompt::system_prompt(persona)));
        }
    }
}

/// Creates, hands out, and tears down sessions.
///
/// Shared state is keyed strictly per session: each session gets its
/// own watchlist store and document slot, while the provider, catalog,
/// retriever, and event bus are stateless and shared.
pub struct SessionManager {
    provider: Arc<dyn Provider>,
    catalog: Arc<dyn MovieCatalog>,
    retriever: Arc<DocumentRetriever>,
    event_bus: Arc<EventBus>,
    config: AppConfig,
    default_persona: Persona,
    sessions: RwLock<HashMap<SessionId, Arc<Session>>>,
}

impl SessionManager {
    pub fn new(
        provider: Arc<dyn Provider>,
        catalog: Arc<dyn MovieCatalog>,
        config: AppConfig,
        event_bus: Arc<EventBus>,
    ) -> Self {
        let retriever = Arc::new(DocumentRetriever::new(
            provider.clone(),
            config.retrieval.clone(),
            config.provider.chat_model.clone(),
            config.provider.embedding_model.clone(),
        ));
        let default_persona = config.default_persona().unwrap_or_default();

        Self {
            provider,
            catalog,
            retriever,
            event_bus,
            config,
            default_persona,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Get an existing session or create a fresh one.
    pub async fn get_or_create(&self, id: &SessionId) -> Arc<Session> {
        if let Some(session) = self.sessions.read().await.get(id) {
            return session.clone();
        }

        let mut sessions = self.sessions.write().await;
        // Double-checked: another caller may have won the race.
        if let Some(session) = sessions.get(id) {
            return session.clone();
        }

        let watchlist = Arc::new(WatchlistStore::new());
        let document = Arc::new(DocumentSlot::new());
        let ctx = ToolContext {
            catalog: self.catalog.clone(),
            watchlist: watchlist.clone(),
            retriever: self.retriever.clone(),
            document: document.clone(),
            default_region: self.config.catalog.default_region.clone(),
        };
        let registry = session_registry(
            &ctx,
            Duration::from_secs(self.config.agent.tool_timeout_secs),
        );

        let session = Arc::new(Session::new(
            id.clone(),
            self.default_persona,
            registry,
            watchlist,
            document,
            self.retriever.clone(),
            self.event_bus.clone(),
        ));
        session.seed_system_prompt().await;

        info!(session_id = %id, "Session created");
        sessions.insert(id.clone(), session.clone());
        session
    }

    /// Tear down a session, discarding its in-flight state.
    pub async fn end_session(&self, id: &SessionId) -> bool {
        let removed = self.sessions.write().await.remove(id).is_some();
        if removed {
            info!(session_id = %id, "Session ended");
        }
        removed
    }

    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Build the orchestrator matching this manager's configuration.
    pub fn orchestrator(&self) -> crate::Orchestrator {
        crate::Orchestrator::new(
            self.provider.clone(),
            &self.config,
            self.event_bus.clone(),
        )
    }
}
