//! Server core
//!
//! Wires the credential and session components into an axum router and owns
//! the listener lifecycle.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use log::{error, info};
use tokio::net::TcpListener;

use crate::auth::{CredentialStore, CredentialVerifier};
use crate::config::ServerConfig;
use crate::error::AuthServerError;
use crate::server::handlers::{healthz, login, logout, session_info};
use crate::session::SessionIssuer;

/// Shared state handed to every request handler
pub struct AppState {
    pub verifier: CredentialVerifier,
    pub sessions: SessionIssuer,
    pub login_redirect: String,
    pub session_ttl_secs: u64,
}

pub struct Server {
    listener: TcpListener,
    app: Router,
    state: Arc<AppState>,
}

impl Server {
    pub async fn new(config: ServerConfig) -> Result<Self, AuthServerError> {
        let store = CredentialStore::new(&config)?;
        store.seed(&config.credentials).await?;

        let verifier = CredentialVerifier::new(Arc::new(store), &config);
        let sessions = SessionIssuer::new(&config);
        let state = Arc::new(AppState {
            verifier,
            sessions,
            login_redirect: config.login_redirect.clone(),
            session_ttl_secs: config.session_ttl_secs,
        });

        let app = Router::new()
            .route("/login", post(login))
            .route("/logout", post(logout))
            .route("/session", get(session_info))
            .route("/healthz", get(healthz))
            .with_state(state.clone());

        let socket = config.listen_socket();
        let listener = match TcpListener::bind(&socket).await {
            Ok(listener) => {
                info!("Server bound to {}", socket);
                listener
            }
            Err(e) => {
                error!("Failed to bind to {}: {}", socket, e);
                return Err(e.into());
            }
        };

        Ok(Self { listener, app, state })
    }

    /// Shared state, for the expiry sweeper and tests
    pub fn state(&self) -> Arc<AppState> {
        self.state.clone()
    }

    /// Actual bound address; useful when configured with port 0
    pub fn local_addr(&self) -> Result<SocketAddr, AuthServerError> {
        Ok(self.listener.local_addr()?)
    }

    pub async fn start(self) -> Result<(), AuthServerError> {
        info!("Starting RAX auth server");
        axum::serve(self.listener, self.app).await?;
        Ok(())
    }
}
