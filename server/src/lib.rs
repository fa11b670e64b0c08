// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: MIT-0

//! # EC2 Server
//!
//! HTTP front end for the [`ec2_engine`] Query API emulator.
//!
//! ```text
//! Client -> HTTP (GET/POST /) -> Params -> Engine -> XML response
//! ```
//!
//! ## Modules
//!
//! - [`application`]: Axum router and server lifecycle
//! - [`configuration`]: CLI argument parsing with clap
//! - [`constants`]: Defaults and limits
//! - [`errors`]: Transport-level errors rendered as EC2 error documents
//! - [`routes`]: HTTP route handlers (health, query)
//!
//! ## Usage
//!
//! ```bash
//! ec2-server --host 127.0.0.1 --port 4566 --region us-east-1
//! ```

pub mod application;
pub mod configuration;
pub mod constants;
pub mod errors;
pub mod routes;
