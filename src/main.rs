//! RAX Auth Server - Entry Point
//!
//! Credential verification and session issuance behind an HTTP POST login.

use log::{debug, error, info};

use rax_auth_server::Server;
use rax_auth_server::config::ServerConfig;

#[tokio::main]
async fn main() {
    // Initialize the logger (env_logger picks up RUST_LOG environment variable)
    env_logger::init();

    info!("Launching auth server...");

    let config = match ServerConfig::load() {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };
    let sweep_interval = config.sweep_interval();

    let server = match Server::new(config).await {
        Ok(server) => server,
        Err(e) => {
            error!("Server startup failed: {}", e);
            std::process::exit(1);
        }
    };

    // Periodic sweep so lazily expired sessions do not accumulate
    let state = server.state();
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(sweep_interval);
        loop {
            ticker.tick().await;
            match state.sessions.purge_expired().await {
                Ok(0) => {}
                Ok(n) => debug!("Swept {} expired session(s)", n),
                Err(e) => error!("Session sweep failed: {}", e),
            }
        }
    });

    if let Err(e) = server.start().await {
        error!("Server error: {}", e);
        std::process::exit(1);
    }
}
