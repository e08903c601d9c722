use crate::api::AppState;
use crate::error::{AppError, Result};
use crate::search::Document;
use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        indexed_docs: state.engine.document_count(),
    })
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub indexed_docs: usize,
}

/// Manual refresh endpoint
///
/// Fetches the full document set and rebuilds the index in-band. Shares the
/// loader's rebuild lock with the periodic task, so a concurrent cycle and a
/// manual reload cannot interleave.
pub async fn reload(State(state): State<AppState>) -> Result<Json<ReloadResponse>> {
    let indexed = state.loader.load().await?;
    Ok(Json(ReloadResponse {
        status: "reloaded".to_string(),
        indexed_docs: indexed,
    }))
}

#[derive(Debug, Serialize)]
pub struct ReloadResponse {
    pub status: String,
    pub indexed_docs: usize,
}

/// Search endpoint
///
/// Pagination is validated here, before the engine is reached; the engine
/// itself assumes well-formed page parameters.
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResponse>> {
    params.validate()?;

    if params.page < 1 || params.page_size < 1 || params.page_size > state.max_page_size {
        return Err(AppError::Validation(format!(
            "Invalid pagination parameters: page must be >=1 and page_size must be between 1 and {}",
            state.max_page_size
        )));
    }

    let results = state
        .engine
        .search(&params.search_query, params.page, params.page_size);

    Ok(Json(SearchResponse {
        total: results.total,
        page: params.page,
        page_size: params.page_size,
        results: results.documents,
    }))
}

#[derive(Debug, Deserialize, Validate)]
pub struct SearchParams {
    /// Search by id, name, message
    #[validate(length(min = 1))]
    pub search_query: String,

    #[serde(default = "default_page")]
    pub page: usize,

    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

fn default_page() -> usize {
    1
}

fn default_page_size() -> usize {
    10
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub total: usize,
    pub page: usize,
    pub page_size: usize,
    pub results: Vec<Document>,
}
