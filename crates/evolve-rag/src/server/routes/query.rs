//! Query endpoint

use axum::{body::Bytes, extract::State, Json};

use crate::error::Result;
use crate::server::state::AppState;
use crate::types::{QueryRequest, QueryResponse};

/// POST /query - Answer a question from the stored documents
///
/// The body is parsed by hand so that every malformed request maps to the
/// same 400 envelope instead of axum's JSON rejection.
pub async fn query_rag(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<QueryResponse>> {
    let request = QueryRequest::from_body(&body)?;
    let payload = state.pipeline().run(&request.query).await?;
    Ok(Json(payload.into()))
}
