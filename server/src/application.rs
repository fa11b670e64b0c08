// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: MIT-0

use crate::configuration::ServerOptions;
use crate::constants::MAX_BODY_SIZE;
use crate::errors::AppError;
use crate::routes;
use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::get;
use axum::serve::Serve;
use ec2_engine::Engine;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::Mutex;

pub struct AppState {
    /// The whole emulated account. Each request holds the lock for its dispatch.
    pub engine: Mutex<Engine>,
}

pub struct Application {
    port: u16,
    server: Serve<TcpListener, Router, Router>,
}

impl Application {
    pub async fn build(options: ServerOptions) -> Result<Self, AppError> {
        let address = format!("{}:{}", options.host, options.port);
        let bind_error = |err: std::io::Error| AppError::BindError {
            address: address.clone(),
            message: err.to_string(),
        };
        let listener = TcpListener::bind(&address).await.map_err(bind_error)?;
        let port = listener.local_addr().map_err(bind_error)?.port();

        tracing::info!("[server] listening at http://{}:{}", options.host, port);

        let server = axum::serve(listener, create_router(options));
        Ok(Self { port, server })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> Result<(), AppError> {
        self.server
            .await
            .map_err(|err| AppError::ServeError(err.to_string()))
    }
}

#[tracing::instrument]
pub fn create_router(options: ServerOptions) -> Router {
    let state = Arc::new(AppState {
        engine: Mutex::new(Engine::new(options.engine_config())),
    });

    Router::new()
        .route("/health", get(routes::health))
        .route("/", get(routes::query).post(routes::query))
        .layer(DefaultBodyLimit::max(MAX_BODY_SIZE))
        .with_state(state)
}
