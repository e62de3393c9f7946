// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `lrd` binary: lead routing daemon.

use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;

use lr_daemon::listener::ListenCtx;
use lr_daemon::{startup, Config, LifecycleError, Listener, StartupResult};

#[tokio::main]
async fn main() {
    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("lrd: {e}");
            std::process::exit(1);
        }
    };
    if let Err(e) = run(config).await {
        eprintln!("lrd: {e}");
        std::process::exit(1);
    }
}

async fn run(config: Config) -> Result<(), LifecycleError> {
    std::fs::create_dir_all(&config.state_dir)?;

    // Log to the state dir; RUST_LOG overrides the default level.
    let file_appender = tracing_appender::rolling::never(&config.state_dir, "daemon.log");
    let (writer, _guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(writer)
        .with_ansi(false)
        .init();

    let StartupResult { daemon, listener } = startup(&config)?;
    info!(
        version = lr_daemon::env::PROTOCOL_VERSION,
        socket = %config.socket_path.display(),
        "daemon ready"
    );
    println!("READY");

    let ctx = Arc::new(ListenCtx::from_daemon(&daemon));
    let shutdown = Arc::clone(&daemon.shutdown);
    tokio::spawn(Listener::new(listener, ctx).run());

    tokio::select! {
        _ = shutdown.notified() => info!("shutdown requested"),
        _ = tokio::signal::ctrl_c() => info!("interrupt received"),
    }

    daemon.shutdown()
}
