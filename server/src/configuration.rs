// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: MIT-0

use clap::{ArgAction, Parser};
use ec2_engine::constants::{DEFAULT_ACCOUNT_ID, DEFAULT_REGION};
use ec2_engine::Config;

use crate::constants::{DEFAULT_HOST, DEFAULT_PORT};

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct ServerOptions {
    #[arg(long, default_value = DEFAULT_HOST, env("EC2_HTTP_HOST"))]
    pub host: String,
    #[arg(long, default_value_t = DEFAULT_PORT, env("EC2_HTTP_PORT"))]
    pub port: u16,
    #[arg(long, default_value = DEFAULT_REGION, env("EC2_REGION"))]
    pub region: String,
    #[arg(long, default_value = DEFAULT_ACCOUNT_ID, env("EC2_ACCOUNT_ID"))]
    pub account_id: String,
    /// Seed for the id generator, for reproducible resource ids
    #[arg(long, env("EC2_ID_SEED"))]
    pub id_seed: Option<u64>,
    #[arg(long, default_value = "false", env("EC2_LOG_JSON"), action = ArgAction::SetTrue)]
    pub log_json: bool,
}

impl Default for ServerOptions {
    fn default() -> Self {
        ServerOptions {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            region: DEFAULT_REGION.to_string(),
            account_id: DEFAULT_ACCOUNT_ID.to_string(),
            id_seed: None,
            log_json: false,
        }
    }
}

impl ServerOptions {
    pub fn engine_config(&self) -> Config {
        Config {
            region: self.region.clone(),
            account_id: self.account_id.clone(),
            id_seed: self.id_seed,
        }
    }
}
