// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: MIT-0

//! HTTP route handlers for the EC2 Query API.
//!
//! | Method | Path | Handler | Description |
//! |--------|------|---------|-------------|
//! | GET | `/health` | [`health`] | Health check endpoint |
//! | GET, POST | `/` | [`query`] | Query API actions |

use std::sync::Arc;

use axum::Json;
use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use axum::extract::{RawQuery, State};
use axum::http::StatusCode;
use axum::http::header::CONTENT_TYPE;
use axum::response::{IntoResponse, Response};
use ec2_engine::{Params, Reply};
use serde_json::json;
use tracing::Instrument;
use url::form_urlencoded;
use uuid::Uuid;

use crate::application::AppState;
use crate::constants::XML_CONTENT_TYPE;
use crate::errors::AppError;

/// Health check endpoint.
///
/// # Response
///
/// ```json
/// {"status": "ok"}
/// ```
pub async fn health() -> impl IntoResponse {
    Json(json!({"status": "ok"}))
}

/// Runs one Query API action.
///
/// Parameters are read from the query string and from a form-encoded body,
/// query string first. The reply is always an XML document: the action's
/// response, or the error envelope with the same `requestId`.
pub async fn query(
    State(state): State<Arc<AppState>>,
    RawQuery(query): RawQuery,
    body: Result<Bytes, BytesRejection>,
) -> Result<Response, AppError> {
    let body = body?;
    let params = collect_params(query.as_deref(), &body);
    let request_id = Uuid::new_v4().to_string();

    let span = tracing::info_span!("query", %request_id, action = params.scalar("Action"));
    let reply = async {
        tracing::debug!("[server] {} parameters", params.len());
        let mut engine = state.engine.lock().await;
        engine.handle(&params, &request_id)
    }
    .instrument(span)
    .await;

    Ok(xml_response(reply))
}

fn collect_params(query: Option<&str>, body: &[u8]) -> Params {
    let query = query.unwrap_or_default().as_bytes();
    form_urlencoded::parse(query)
        .chain(form_urlencoded::parse(body))
        .collect()
}

fn xml_response(reply: Reply) -> Response {
    let status = StatusCode::from_u16(reply.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, [(CONTENT_TYPE, XML_CONTENT_TYPE)], reply.body).into_response()
}
