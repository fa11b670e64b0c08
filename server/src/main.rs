// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: MIT-0

use anyhow::Result;
use clap::Parser;
use ec2_server::application::Application;
use ec2_server::configuration::ServerOptions;
use tracing_subscriber::EnvFilter;

fn env_filter() -> EnvFilter {
    EnvFilter::new(std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()))
}

#[tokio::main]
async fn main() -> Result<()> {
    let options = ServerOptions::parse();

    if options.log_json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(env_filter())
            // this needs to be set to remove duplicated information in the log.
            .with_current_span(false)
            .with_ansi(false)
            .without_time()
            .with_target(false)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter()).init();
    }

    tracing::info!("[server] {:?}", &options);

    let application = Application::build(options).await?;
    application.run_until_stopped().await?;
    Ok(())
}
