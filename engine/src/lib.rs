// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: MIT-0

//! In-memory emulation of the EC2 Query API.
//!
//! A request is a flat parameter map ([`params::Params`]) naming an `Action`.
//! [`engine::Engine`] routes it to a resource handler, which reads and writes
//! the [`registry::Registry`], and the resulting [`value::Value`] payload is
//! rendered by [`xml::encode`].

pub mod config;
pub mod constants;
pub mod engine;
pub mod errors;
pub mod filters;
pub mod ids;
pub mod models;
pub mod paging;
pub mod params;
pub mod registry;
pub mod resources;
pub mod value;
pub mod xml;

pub use config::Config;
pub use engine::{Engine, Reply};
pub use errors::Ec2Error;
pub use params::Params;
