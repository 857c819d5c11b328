//! # Handyman Server
//!
//! Serves the landing page, the auth forms and the dashboard on `Axum`, talking
//! to the hosted auth + profiles backend on the visitor's behalf.
//!
//! ## Example
//! ```no_run
//! use handy_server::Server;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     Server::builder()
//!         .port(3000)
//!         .build()?
//!         .run()
//!         .await
//! }
//! ```

mod router;

use anyhow::{Context, Result, anyhow};
use axum::Router;
use axum_server::Handle;
use handy::backend::Backend;
use handy::domain::config::AppConfig;
use handy::events::EventBus;
use handy::kernel::regions::load_regions;
use handy::kernel::server::state::AppState;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tracing::{error, info, warn};

const SHUTDOWN_GRACE: Duration = Duration::from_secs(30);

/// A fluent builder for configuring and initializing the [`Server`].
#[must_use = "builders do nothing unless you call .build()"]
#[derive(Debug, Default)]
pub struct ServerBuilder {
    cfg: AppConfig,
    backend: Option<Backend>,
}

impl ServerBuilder {
    pub fn config(mut self, cfg: AppConfig) -> Self {
        self.cfg = cfg;
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.cfg.server.port = port;
        self
    }

    /// Uses `backend` instead of the one described by the `backend` section.
    pub fn backend(mut self, backend: Backend) -> Self {
        self.backend = Some(backend);
        self
    }

    fn init_backend(&self) -> Result<Backend> {
        let cfg = &self.cfg.backend;
        Backend::builder()
            .url(&cfg.url)
            .anon_key(&cfg.anon_key)
            .timeout(Duration::from_secs(cfg.timeout_seconds))
            .profiles_table(&cfg.profiles_table)
            .init()
            .context("Failed to configure the hosted backend")
    }

    fn validate_ssl_config(&self) -> Result<()> {
        if let Some(ssl) = &self.cfg.server.ssl {
            if !ssl.cert.exists() {
                anyhow::bail!("SSL certificate not found at: {}", ssl.cert.display());
            }
            if !ssl.key.exists() {
                anyhow::bail!("SSL key not found at: {}", ssl.key.display());
            }

            #[cfg(unix)]
            {
                use std::os::unix::fs::PermissionsExt;
                let metadata = ssl.key.metadata()?;
                if metadata.permissions().mode() & 0o077 != 0 {
                    warn!(
                        "SECURITY: SSL private key {} has insecure permissions (should be 600)",
                        ssl.key.display()
                    );
                }
            }
        }
        Ok(())
    }

    /// Consumes the builder and assembles the application.
    ///
    /// Must be called inside a tokio runtime; the audit listeners start here.
    ///
    /// # Errors
    /// Returns an error if:
    /// * the SSL certificate or key is missing
    /// * the backend section is unusable (unknown URL scheme, missing anon key)
    /// * the region directory cannot be read or is empty
    /// * a feature slice fails to initialize
    pub fn build(self) -> Result<Server> {
        self.validate_ssl_config()?;

        let backend = match self.backend.clone() {
            Some(backend) => backend,
            None => self.init_backend()?,
        };
        let regions = Arc::new(load_regions(&self.cfg.regions).context("Failed to load regions")?);
        info!(
            backend = backend.kind(),
            regions = regions.len(),
            static_dir = %self.cfg.storage.static_dir.display(),
            "Initializing server"
        );

        let events = EventBus::new();
        let slices = handy::init(&self.cfg, &backend, &regions, &events)
            .map_err(|e| anyhow!("Feature bootstrap failed: {e}"))?;

        let state = slices
            .into_iter()
            .fold(
                AppState::builder().config(self.cfg).backend(backend).regions(regions).events(events),
                |builder, slice| builder.register_slice(slice),
            )
            .build()
            .context("Failed to finalize application state")?;
        Ok(Server { state })
    }
}

/// A fully initialized server instance ready to run.
#[must_use = "call .run().await to start the server"]
#[derive(Debug)]
pub struct Server {
    state: AppState,
}

impl Server {
    pub fn builder() -> ServerBuilder {
        ServerBuilder::default()
    }

    /// The complete HTTP application: pages, JSON API, docs and static files.
    pub fn router(&self) -> Router {
        router::init(self.state.clone())
    }

    /// Serves until Ctrl+C or SIGTERM, then drains connections for up to 30s.
    ///
    /// # Errors
    /// Returns an error if the server fails to bind to the configured address
    /// or if TLS setup fails.
    pub async fn run(self) -> Result<()> {
        let cfg = self.state.config.clone();
        let address = SocketAddr::new(cfg.server.address, cfg.server.port);
        let app = self.router();

        let handle = Handle::<SocketAddr>::new();
        let shutdown_handle = handle.clone();
        tokio::spawn(async move {
            if let Err(e) = shutdown_signal().await {
                error!("Error while waiting for shutdown signal: {e}");
                return;
            }
            info!("Shutdown signal received, starting graceful shutdown");
            shutdown_handle.graceful_shutdown(Some(SHUTDOWN_GRACE));
        });

        if let Some(ssl_config) = &cfg.server.ssl {
            info!("Starting HTTPS server on https://{address}");

            let tls_config = axum_server::tls_rustls::RustlsConfig::from_pem_file(
                &ssl_config.cert,
                &ssl_config.key,
            )
            .await
            .context("Failed to load SSL/TLS certificates")?;

            axum_server::bind_rustls(address, tls_config)
                .handle(handle)
                .serve(app.into_make_service())
                .await
                .context("HTTPS server failed")?;
        } else {
            info!("Starting HTTP server on http://{address}");

            axum_server::bind(address)
                .handle(handle)
                .serve(app.into_make_service())
                .await
                .context("HTTP server failed")?;
        }

        info!("Server shutdown complete");
        Ok(())
    }

    #[must_use]
    pub const fn state(&self) -> &AppState {
        &self.state
    }
}

/// Resolves on SIGINT (Ctrl+C) or, on unix, SIGTERM.
async fn shutdown_signal() -> Result<()> {
    let ctrl_c = async { signal::ctrl_c().await.context("Failed to install Ctrl+C handler") };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .context("Failed to install SIGTERM handler")?
            .recv()
            .await;
        Ok::<_, anyhow::Error>(())
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<Result<()>>();

    tokio::select! {
        res = ctrl_c => res?,
        res = terminate => res?,
    }

    Ok(())
}
