//! Document QA tool — retrieval-grounded answers about the uploaded
//! document.

use async_trait::async_trait;
use reelclaw_core::error::ToolError;
use reelclaw_core::tool::{decode_arguments, Tool, ToolResult};
use reelclaw_retrieval::{DocumentAnswer, DocumentRetriever, DocumentSlot};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub struct DocumentQaTool {
    retriever: Arc<DocumentRetriever>,
    document: Arc<DocumentSlot>,
}

impl DocumentQaTool {
    pub fn new(retriever: Arc<DocumentRetriever>, document: Arc<DocumentSlot>) -> Self {
        Self {
            retriever,
            document,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct DocumentQaArgs {
    question: String,
}

#[derive(Serialize)]
struct QaPayload {
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    answer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    sources: Vec<QaSource>,
}

#[derive(Serialize)]
struct QaSource {
    page: u32,
    similarity: f32,
}

#[async_trait]
impl Tool for DocumentQaTool {
    fn name(&self) -> &str {
        "document_qa"
    }

    fn description(&self) -> &str {
        "Answer a question about the uploaded script or book, grounded in the \
         document's own text. Use ONLY for questions about the uploaded \
         document's content."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "question": {
                    "type": "string",
                    "description": "Question about the document content"
                }
            },
            "required": ["question"]
        })
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<ToolResult, ToolError> {
        let args: DocumentQaArgs = decode_arguments(arguments)?;
        if args.question.trim().is_empty() {
            return Err(ToolError::InvalidArguments(
                "'question' must not be empty".into(),
            ));
        }

        // No index, no retrieval: tell the user instead of guessing.
        let Some(index) = self.document.current().await else {
            return ToolResult::json(&QaPayload {
                status: "no_document",
                answer: None,
                message: Some(
                    "No document has been uploaded yet. Ask the user to upload one first."
                        .into(),
                ),
                sources: vec![],
            });
        };

        let payload = match self
            .retriever
            .answer(&index, args.question.trim())
            .await
            .map_err(|e| ToolError::ExecutionFailed {
                tool_name: self.name().into(),
                reason: e.to_string(),
            })? {
            DocumentAnswer::Found { answer, supporting } => QaPayload {
                status: "found",
                answer: Some(answer),
                message: None,
                sources: supporting
                    .iter()
                    .map(|s| QaSource {
                        page: s.page,
                        similarity: s.similarity,
                    })
                    .collect(),
            },
            DocumentAnswer::NotFound => QaPayload {
                status: "not_in_document",
                answer: None,
                message: Some(format!(
                    "'{}' doesn't match anything in '{}'.",
                    args.question.trim(),
                    index.name
                )),
                sources: vec![],
            },
        };

        ToolResult::json(&payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::context;

    #[tokio::test]
    async fn without_document_reports_no_document() {
        let ctx = context();
        let tool = DocumentQaTool::new(ctx.retriever, ctx.document);

        let data = tool
            .execute(serde_json::json!({"question": "How does it end?"}))
            .await
            .unwrap()
            .data
            .unwrap();

        assert_eq!(data["status"], "no_document");
        assert!(data["message"].as_str().unwrap().contains("upload"));
    }

    #[tokio::test]
    async fn with_document_returns_grounded_answer() {
        let ctx = context();
        let index = ctx
            .retriever
            .ingest(b"The ship drifts through space.", "script.txt")
            .await
            .unwrap();
        ctx.document.replace(index).await;

        let tool = DocumentQaTool::new(ctx.retriever, ctx.document);
        let data = tool
            .execute(serde_json::json!({"question": "What does the ship do?"}))
            .await
            .unwrap()
            .data
            .unwrap();

        assert_eq!(data["status"], "found");
        assert_eq!(data["answer"], "grounded answer");
        assert_eq!(data["sources"][0]["page"], 1);
    }

    #[tokio::test]
    async fn empty_question_is_invalid_arguments() {
        let ctx = context();
        let tool = DocumentQaTool::new(ctx.retriever, ctx.document);
        let err = tool
            .execute(serde_json::json!({"question": ""}))
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments(_)));
    }
}
