// ============================
// crates/backend-bin/src/main.rs
// ============================
//! Tokio / Axum entry point: serve a directory behind htpasswd authentication.
use anyhow::Context;
use clap::{Parser, ValueEnum};
use gatehouse_backend::{
    config::{AuthMode, Settings, DEFAULT_CONFIG_FILE},
    router, AppState,
};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Mode {
    Basic,
    Form,
}

impl From<Mode> for AuthMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Basic => AuthMode::Basic,
            Mode::Form => AuthMode::Form,
        }
    }
}

/// Serve static files to users listed in an htpasswd file
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Configuration file
    #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,
    /// Address to serve on
    #[arg(long)]
    addr: Option<String>,
    /// Port to serve on
    #[arg(long)]
    port: Option<u16>,
    /// The directory of static files to serve
    #[arg(long)]
    dir: Option<PathBuf>,
    /// htpasswd file name
    #[arg(long)]
    htpasswd: Option<PathBuf>,
    /// Authentication mode
    #[arg(long, value_enum)]
    mode: Option<Mode>,
}

impl Args {
    /// Command-line flags take precedence over file and environment
    fn apply(self, mut settings: Settings) -> anyhow::Result<Settings> {
        if let Some(addr) = self.addr {
            settings.server.host = addr;
        }
        if let Some(port) = self.port {
            settings.server.port = port;
        }
        if let Some(dir) = self.dir {
            settings.static_dir = dir;
        }
        if let Some(htpasswd) = self.htpasswd {
            settings.htpasswd_path = htpasswd;
        }
        if let Some(mode) = self.mode {
            settings.mode = mode.into();
        }
        settings.validate()?;
        Ok(settings)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let settings = Settings::load_from(&args.config)?;
    let settings = args.apply(settings)?;

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&settings.log_level)),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let state = AppState::from_settings(settings.clone())?;

    if settings.mode == AuthMode::Form {
        let period = settings.session.gc_interval();
        info!(?period, "starting session collector");
        Arc::clone(&state.sessions).spawn_collector(period);
    }

    let app = router::create_router(state);

    let addr = settings.bind_addr()?;
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("cannot listen on {addr}"))?;
    info!(
        dir = %settings.static_dir.display(),
        mode = %settings.mode,
        "serving on {addr}"
    );

    axum::serve(listener, app).await?;

    Ok(())
}
