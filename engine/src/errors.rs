// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: MIT-0

//! Error taxonomy for the engine.
//!
//! Handlers return `Result<_, Ec2Error>` and propagate with `?`. At the dispatch
//! boundary an error is turned into an error sentinel payload (see
//! [`crate::value::Value::error`]) which the XML encoder renders as the EC2
//! error envelope.

use std::borrow::Cow;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Ec2Error {
    #[error("The request must contain the parameter {0}")]
    MissingParameter(String),
    #[error("{0}")]
    InvalidParameterValue(String),
    #[error("The {noun} ID '{id}' does not exist")]
    NotFound {
        code: &'static str,
        noun: &'static str,
        id: String,
    },
    #[error("{0}")]
    DependencyViolation(String),
    #[error("{0}")]
    InvalidStateTransition(String),
    #[error("The request must contain the parameter Action")]
    MissingAction,
    #[error("The action {0} is not valid for this web service.")]
    InvalidAction(String),
    #[error("Request would have succeeded, but DryRun flag is set.")]
    DryRunOperation,
    #[error("{message}")]
    Other { code: String, message: String },
    #[error("An internal error has occurred")]
    InternalError,
}

impl Ec2Error {
    pub fn not_found(code: &'static str, noun: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            code,
            noun,
            id: id.into(),
        }
    }

    pub fn invalid_value(name: &str, value: &str) -> Self {
        Self::InvalidParameterValue(format!(
            "Value ({value}) for parameter {name} is invalid."
        ))
    }

    pub fn other(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Other {
            code: code.into(),
            message: message.into(),
        }
    }

    /// The wire error code, e.g. `InvalidVpcID.NotFound`.
    pub fn code(&self) -> Cow<'_, str> {
        match self {
            Self::MissingParameter(_) => "MissingParameter".into(),
            Self::InvalidParameterValue(_) => "InvalidParameterValue".into(),
            Self::NotFound { code, .. } => (*code).into(),
            Self::DependencyViolation(_) => "DependencyViolation".into(),
            Self::InvalidStateTransition(_) => "InvalidStateTransition".into(),
            Self::MissingAction => "MissingAction".into(),
            Self::InvalidAction(_) => "InvalidAction".into(),
            Self::DryRunOperation => "DryRunOperation".into(),
            Self::Other { code, .. } => code.as_str().into(),
            Self::InternalError => "InternalError".into(),
        }
    }

    pub fn status_code(&self) -> u16 {
        status_for_code(&self.code())
    }
}

/// HTTP status EC2 uses for an error code: every client error is a 400.
pub fn status_for_code(code: &str) -> u16 {
    match code {
        "InternalError" | "InternalFailure" => 500,
        "Unavailable" | "ServiceUnavailable" => 503,
        _ => 400,
    }
}
