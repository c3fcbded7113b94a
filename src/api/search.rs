// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Mutuals Contributors

//! User search and per-user search history.

use axum::{
    extract::{Path, State},
    Json,
};

use crate::{
    auth::Auth,
    error::ApiError,
    models::{MessageResponse, SearchHistoryEntry, SearchHistoryRequest, UserSummary},
    state::AppState,
};

#[utoipa::path(
    get,
    path = "/search/{term}",
    params(("term" = String, Path, description = "Search term")),
    tag = "Search",
    security(("bearer" = [])),
    responses(
        (status = 200, body = [UserSummary]),
        (status = 401, description = "Missing or invalid token"),
    )
)]
pub async fn search_users(
    Auth(_caller): Auth,
    State(state): State<AppState>,
    Path(term): Path<String>,
) -> Result<Json<Vec<UserSummary>>, ApiError> {
    let store = state.store.read().await;
    Ok(Json(store.search_users(&term)))
}

/// Record that the caller visited a profile from search. Revisiting the
/// same profile refreshes the existing entry rather than duplicating it.
#[utoipa::path(
    post,
    path = "/search-history",
    request_body = SearchHistoryRequest,
    tag = "Search",
    security(("bearer" = [])),
    responses(
        (status = 200, body = MessageResponse),
        (status = 404, description = "Referenced user not found"),
    )
)]
pub async fn add_search_history(
    Auth(caller): Auth,
    State(state): State<AppState>,
    Json(request): Json<SearchHistoryRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let mut store = state.store.write().await;
    store.add_search_entry(caller.user_id, request.user_id)?;
    Ok(Json(MessageResponse::new("Search history updated")))
}

#[utoipa::path(
    get,
    path = "/search-history",
    tag = "Search",
    security(("bearer" = [])),
    responses(
        (status = 200, body = [SearchHistoryEntry]),
        (status = 401, description = "Missing or invalid token"),
    )
)]
pub async fn get_search_history(
    Auth(caller): Auth,
    State(state): State<AppState>,
) -> Result<Json<Vec<SearchHistoryEntry>>, ApiError> {
    let store = state.store.read().await;
    Ok(Json(store.search_history(caller.user_id)?))
}

#[utoipa::path(
    delete,
    path = "/search-history",
    request_body = SearchHistoryRequest,
    tag = "Search",
    security(("bearer" = [])),
    responses(
        (status = 200, body = MessageResponse),
        (status = 404, description = "No history entry for that user"),
    )
)]
pub async fn remove_search_history(
    Auth(caller): Auth,
    State(state): State<AppState>,
    Json(request): Json<SearchHistoryRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let mut store = state.store.write().await;
    store.remove_search_entry(caller.user_id, request.user_id)?;
    Ok(Json(MessageResponse::new("Search entry removed")))
}
