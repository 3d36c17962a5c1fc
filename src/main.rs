//! # OI Sentinel: Open-Interest Monitor for a Discord Channel
//!
//! ## Architecture Overview
//!
//! ```text
//!  ┌──────────────┐   rendered (WebDriver) or raw (HTTP)   ┌────────────────────┐
//!  │  coinalyze   │ ◀──────────────────────────────────────│  Pipeline          │
//!  │  OI tables   │   main page: BTC, ETH                  │  Mutex<CellSource> │
//!  └──────────────┘   categories page: ALT                 │  + RetryPolicy     │
//!                                                          └─────────┬──────────┘
//!                       every MONITOR_INTERVAL_SECS                  │
//!  ┌──────────────┐ ◀── alert embed ──── Monitor ◀─────────────────────┤
//!  │  Discord     │                                                  │
//!  │  channel     │ ◀── summary embed ── GET /api/oi/:asset ◀──────────┘
//!  └──────────────┘                      POST /api/monitor/check
//!                                        GET /api/health
//! ```
//!
//! ## Environment Variables
//!
//! | Variable                | Default                  | Description                          |
//! |-------------------------|--------------------------|--------------------------------------|
//! | `DISCORD_TOKEN`         | required                 | Bot token for the REST API           |
//! | `CHANNEL_ID`            | required                 | Channel that receives every post     |
//! | `FETCH_BACKEND`         | `rendered`               | `rendered` or `raw`                  |
//! | `WEBDRIVER_URL`         | `http://localhost:9515`  | chromedriver endpoint                |
//! | `MONITOR_INTERVAL_SECS` | `60`                     | Alert cycle period                   |
//! | `ALERT_MODE`            | `combined`               | `combined` or `alts`                 |
//! | `BIND_ADDR`             | `0.0.0.0:3000`           | Address Axum listens on              |
//! | `RUST_LOG`              | `oi_sentinel=debug`      | Tracing filter                       |
//!
//! See `config.rs` for the full list.

use std::sync::Arc;

use anyhow::Context;
use tokio::sync::watch;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod config;
mod engine;
mod error;
mod fetch;
mod models;
mod monitor;
mod notify;
mod pipeline;
mod routes;
mod state;

use config::Config;
use monitor::Monitor;
use notify::{DiscordNotifier, Notifier};
use pipeline::Pipeline;
use state::build_state;

// ─── Entry Point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ── 1. Load .env (optional, real env vars take precedence) ───────────────
    dotenvy::dotenv().ok();

    // ── 2. Initialise structured logging ─────────────────────────────────────
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env()
            .add_directive("oi_sentinel=debug".parse()?)
            .add_directive("tower_http=info".parse()?)
            .add_directive("reqwest=warn".parse()?)
            .add_directive("fantoccini=warn".parse()?))
        .init();

    info!(
        r#"

  ╔═══════════════════════════════════════════════╗
  ║        OI SENTINEL — Open Interest Monitor    ║
  ║        BTC  ·  ETH  ·  Alts  →  Discord       ║
  ╚═══════════════════════════════════════════════╝"#
    );

    // ── 3. Configuration ─────────────────────────────────────────────────────
    let config = Config::from_env().context("Invalid configuration")?;
    info!(?config, "Configuration loaded");

    // ── 4. Fetch pipeline, notifier, monitor ─────────────────────────────────
    let source = fetch::build_source(&config).context("Could not build fetch backend")?;
    let pipeline = Arc::new(Pipeline::new(source, config.retry.clone()));

    let notifier: Arc<dyn Notifier> = Arc::new(
        DiscordNotifier::from_config(&config).context("Could not build Discord client")?,
    );

    let monitor = Arc::new(Monitor::new(
        pipeline.clone(),
        notifier.clone(),
        config.alert_mode,
        config.alert_cooldown,
    ));

    // ── 5. Scheduled monitor ─────────────────────────────────────────────────
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let monitor_task = tokio::spawn(monitor.clone().run(config.monitor_interval, shutdown_rx));

    // ── 6. On-demand HTTP surface ────────────────────────────────────────────
    let app = routes::router(build_state(pipeline.clone(), monitor, notifier));

    info!(addr = %config.bind_addr, backend = pipeline.backend(), "🚀 OI Sentinel starting");

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("Could not bind {}", config.bind_addr))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // ── 7. Teardown: stop the loop, then close the browser ───────────────────
    info!("Shutting down");
    let _ = shutdown_tx.send(true);
    if let Err(e) = monitor_task.await {
        warn!(error = %e, "Monitor task ended abnormally");
    }
    pipeline.shutdown().await;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Could not listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
}
