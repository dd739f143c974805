//! End-to-end turn flows: scripted model, real tools, real stores.

use async_trait::async_trait;
use reelclaw_agent::{SessionManager, TurnPhase};
use reelclaw_config::AppConfig;
use reelclaw_core::error::ProviderError;
use reelclaw_core::event::{DomainEvent, EventBus};
use reelclaw_core::message::{Message, MessageToolCall, SessionId};
use reelclaw_core::provider::{
    EmbeddingRequest, EmbeddingResponse, Provider, ProviderRequest, ProviderResponse,
};
use reelclaw_metadata::StaticCatalog;
use std::sync::Arc;
use std::sync::Mutex;

/// Scripted chat responses plus deterministic keyword embeddings, so
/// the whole pipeline — orchestrator, tools, watchlist, retriever —
/// runs for real underneath.
struct ScriptedProvider {
    responses: Mutex<Vec<ProviderResponse>>,
    cursor: Mutex<usize>,
}

impl ScriptedProvider {
    fn new(responses: Vec<ProviderResponse>) -> Self {
        Self {
            responses: Mutex::new(responses),
            cursor: Mutex::new(0),
        }
    }
}

#[async_trait]
impl Provider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn complete(
        &self,
        _request: ProviderRequest,
    ) -> Result<ProviderResponse, ProviderError> {
        let mut cursor = self.cursor.lock().unwrap();
        let responses = self.responses.lock().unwrap();
        let response = responses
            .get(*cursor)
            .unwrap_or_else(|| panic!("script exhausted at call #{}", *cursor))
            .clone();
        *cursor += 1;
        Ok(response)
    }

    async fn embed(
        &self,
        request: EmbeddingRequest,
    ) -> Result<EmbeddingResponse, ProviderError> {
        let embeddings = request
            .inputs
            .iter()
            .map(|text| {
                let t = text.to_lowercase();
                if t.contains("shuttle") {
                    vec![1.0, 0.0]
                } else {
                    vec![0.0, 1.0]
                }
            })
            .collect();
        Ok(EmbeddingResponse {
            embeddings,
            model: "scripted".into(),
        })
    }
}

fn text(content: &str) -> ProviderResponse {
    ProviderResponse {
        message: Message::assistant(content),
        usage: None,
        model: "scripted".into(),
    }
}

fn tools(calls: &[(&str, serde_json::Value)]) -> ProviderResponse {
    let mut msg = Message::assistant("");
    msg.tool_calls = calls
        .iter()
        .enumerate()
        .map(|(i, (name, args))| MessageToolCall {
            id: format!("call_{i}"),
            name: name.to_string(),
            arguments: args.to_string(),
        })
        .collect();
    ProviderResponse {
        message: msg,
        usage: None,
        model: "scripted".into(),
    }
}

fn manager(responses: Vec<ProviderResponse>) -> (SessionManager, Arc<EventBus>) {
    let event_bus = Arc::new(EventBus::default());
    let mgr = SessionManager::new(
        Arc::new(ScriptedProvider::new(responses)),
        Arc::new(StaticCatalog::sample()),
        AppConfig::default(),
        event_bus.clone(),
    );
    (mgr, event_bus)
}

#[tokio::test]
async fn build_up_watchlist_then_curate_schedule() {
    // Turn 1: the model adds three movies. Turn 2: it builds a
    // two-and-a-half-hour schedule from them.
    let (mgr, _) = manager(vec![
        tools(&[
            ("watchlist_add", serde_json::json!({"title": "Alien"})),        // 117 min
            ("watchlist_add", serde_json::json!({"title": "Heat"})),         // 170 min
            ("watchlist_add", serde_json::json!({"title": "The Thing"})),    // 109 min
        ]),
        text("All three are on your list."),
        tools(&[("build_schedule", serde_json::json!({"budget_minutes": 230}))]),
        text("Alien plus The Thing fills your evening almost exactly."),
    ]);
    let orchestrator = mgr.orchestrator();
    let session = mgr.get_or_create(&SessionId::from("movie-night")).await;

    let first = orchestrator
        .process_turn(&session, "Add Alien, Heat, and The Thing to my watchlist")
        .await;
    assert_eq!(first.tool_results.len(), 3);
    assert_eq!(session.watchlist().len().await, 3);

    let second = orchestrator
        .process_turn(&session, "I have 230 minutes tonight, what should I watch?")
        .await;

    // 117 + 109 = 226 beats 170 alone and 170+? (170+117=287 > 230).
    let schedule = second.tool_results[0].data.as_ref().unwrap();
    assert_eq!(schedule["found"], true);
    assert_eq!(schedule["total_minutes"], 226);
    assert_eq!(schedule["unused_minutes"], 4);
    let titles: Vec<&str> = schedule["selected"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["Alien", "The Thing"]);
}

#[tokio::test]
async fn document_upload_then_grounded_qa() {
    let (mgr, event_bus) = manager(vec![
        // Call 1: the turn's Interpreting completion asks for document_qa.
        tools(&[(
            "document_qa",
            serde_json::json!({"question": "How does Ripley use the shuttle?"}),
        )]),
        // Call 2: the grounded completion inside the retriever.
        text("Ripley escapes on the shuttle."),
        // Call 3: the persona-voiced narration of the tool result.
        text("According to the script, Ripley escapes on the shuttle."),
    ]);
    let orchestrator = mgr.orchestrator();
    let session = mgr.get_or_create(&SessionId::from("reader")).await;
    let mut events = event_bus.subscribe();

    let chunks = session
        .ingest_document(
            b"The alien stalks the corridors.\x0CRipley reaches the shuttle and escapes.",
            "alien-script.txt",
        )
        .await
        .unwrap();
    assert_eq!(chunks, 2);

    // Ingestion published its domain event.
    let event = events.recv().await.unwrap();
    assert!(matches!(
        event.as_ref(),
        DomainEvent::DocumentIngested { chunks: 2, .. }
    ));

    let outcome = orchestrator
        .process_turn(&session, "How does Ripley use the shuttle?")
        .await;

    assert!(outcome.reply.contains("shuttle"));
    assert!(outcome.trace.contains(&TurnPhase::RetrievalQa));

    let data = outcome.tool_results[0].data.as_ref().unwrap();
    assert_eq!(data["status"], "found");
    assert_eq!(data["sources"][0]["page"], 2);
    assert!(data["answer"].as_str().unwrap().contains("shuttle"));
}

#[tokio::test]
async fn off_document_question_returns_not_in_document() {
    let (mgr, _) = manager(vec![]);
    let session = mgr.get_or_create(&SessionId::from("reader")).await;

    session
        .ingest_document(b"Ripley reaches the shuttle.", "script.txt")
        .await
        .unwrap();

    // "cooking" embeds orthogonally to every chunk; the script has no
    // completion queued, proving the model is never consulted.
    let call = reelclaw_core::tool::ToolCall {
        id: "call_qa".into(),
        name: "document_qa".into(),
        arguments: serde_json::json!({"question": "Any cooking tips?"}),
    };
    let result = session.registry().execute(&call).await.unwrap();
    assert_eq!(result.data.unwrap()["status"], "not_in_document");
}

#[tokio::test]
async fn watchlist_round_trips_through_export_and_import() {
    let (mgr, _) = manager(vec![
        tools(&[
            ("watchlist_add", serde_json::json!({"title": "Alien"})),
            ("watchlist_add", serde_json::json!({"title": "Arrival"})),
        ]),
        text("Both added."),
    ]);
    let orchestrator = mgr.orchestrator();
    let session = mgr.get_or_create(&SessionId::from("curator")).await;

    orchestrator
        .process_turn(&session, "Add Alien and Arrival")
        .await;

    let exported = session.watchlist().export().await.unwrap();

    let other = mgr.get_or_create(&SessionId::from("other")).await;
    let count = other.watchlist().import(&exported).await.unwrap();
    assert_eq!(count, 2);

    let a = session.watchlist().list().await;
    let b = other.watchlist().list().await;
    for (x, y) in a.iter().zip(b.iter()) {
        assert_eq!(x.title, y.title);
        assert_eq!(x.duration_minutes, y.duration_minutes);
        assert_eq!(x.genres, y.genres);
    }
}

#[tokio::test]
async fn full_trace_covers_dispatch_and_narration() {
    let (mgr, _) = manager(vec![
        tools(&[("movie_info", serde_json::json!({"title": "Heat"}))]),
        text("Heat (1995), 170 minutes of De Niro vs. Pacino."),
    ]);
    let orchestrator = mgr.orchestrator();
    let session = mgr.get_or_create(&SessionId::from("fan")).await;

    let outcome = orchestrator.process_turn(&session, "Tell me about Heat").await;
    assert_eq!(
        outcome.trace,
        vec![
            TurnPhase::Interpreting,
            TurnPhase::ToolDispatch,
            TurnPhase::Interpreting,
            TurnPhase::DirectReply,
            TurnPhase::Responding,
            TurnPhase::Idle,
        ]
    );
}
