// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: MIT-0

use axum::http::header::CONTENT_TYPE;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use ec2_engine::xml::encode_error;
use uuid::Uuid;

use crate::constants::XML_CONTENT_TYPE;

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum AppError {
    #[error("unable to bind {address}: {message}")]
    BindError { address: String, message: String },
    #[error("server stopped: {0}")]
    ServeError(String),
    #[error("request body rejected: {1}")]
    BodyRejected(StatusCode, String),
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            Self::BindError { .. } | Self::ServeError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::BodyRejected(status, _) => *status,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (code, message) = match self {
            Self::BodyRejected(_, message) => ("InvalidRequest", message),
            other => {
                tracing::error!("{:?}", other);
                ("InternalError", "An internal error has occurred".to_string())
            }
        };

        let body = encode_error(code, &message, &Uuid::new_v4().to_string());
        (status, [(CONTENT_TYPE, XML_CONTENT_TYPE)], body).into_response()
    }
}

impl From<axum::extract::rejection::BytesRejection> for AppError {
    fn from(source: axum::extract::rejection::BytesRejection) -> Self {
        tracing::debug!("{:?}", source);
        AppError::BodyRejected(source.status(), source.body_text())
    }
}
