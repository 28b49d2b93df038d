use std::sync::Arc;

use axum::{Json, extract::State};

use crate::firm::assistant;
use crate::web::server::AppState;
use crate::web::types::{
    AnalyzeSentimentRequest, ApiError, CaseMemoResponse, DocumentSummaryResponse,
    GenerateCaseMemoRequest, SentimentResponse, SummarizeDocumentRequest, SummarizeTextRequest,
    SummaryResponse, internal_error,
};

use super::{finish_validation, field_uuid};

pub async fn summarize_text_handler(
    Json(req): Json<SummarizeTextRequest>,
) -> Json<SummaryResponse> {
    Json(SummaryResponse {
        summary: assistant::summarize_text(&req.text),
    })
}

pub async fn summarize_document_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SummarizeDocumentRequest>,
) -> Result<Json<DocumentSummaryResponse>, ApiError> {
    let mut errors = Vec::new();
    let document_id = field_uuid(&req.document_id, "document_id", &mut errors);
    finish_validation(errors)?;
    let document_id = document_id.expect("validated");

    let summary = assistant::summarize_document(state.db.as_ref(), document_id)
        .await
        .map_err(internal_error)?;

    Ok(Json(DocumentSummaryResponse {
        summary,
        document_id,
    }))
}

pub async fn generate_case_memo_handler(
    Json(req): Json<GenerateCaseMemoRequest>,
) -> Json<CaseMemoResponse> {
    Json(CaseMemoResponse {
        sections: assistant::case_memo_sections(&req.case_summary),
    })
}

pub async fn analyze_sentiment_handler(
    Json(req): Json<AnalyzeSentimentRequest>,
) -> Json<SentimentResponse> {
    // Interactions are accepted but unused until a real model is wired in.
    let _ = req.interactions;
    Json(SentimentResponse {
        analysis: assistant::client_sentiment_stub(),
    })
}
