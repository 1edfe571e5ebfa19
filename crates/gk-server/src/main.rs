// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! GophKeeper vault server binary.

use std::net::SocketAddr;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use gk_server::{create_app_state, create_router};
use gk_server_db::PoolSettings;

/// GophKeeper server - stores client-sealed secrets, never plaintext.
#[derive(Parser, Debug)]
#[command(name = "gk-server", about = "GophKeeper vault server", version)]
struct Args {
	/// Path to the TOML configuration file.
	#[arg(short, long, default_value = gk_server_config::DEFAULT_CONFIG_PATH)]
	config: String,

	#[command(subcommand)]
	command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
	/// Show version information
	Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
	let args = Args::parse();

	if let Some(Command::Version) = args.command {
		println!("gk-server {}", env!("CARGO_PKG_VERSION"));
		return Ok(());
	}

	// Load .env file if present
	dotenvy::dotenv().ok();

	let config = gk_server_config::load_config_with_file(&args.config)?;

	init_tracing(&config.log.level, &config.log.format);

	tracing::info!(
		env = %config.env,
		host = %config.server.host,
		port = config.server.port,
		database = %config.db.dsn,
		"starting gk-server"
	);

	let pool_settings = PoolSettings {
		max_open_conns: config.db.max_open_conns,
		conn_max_lifetime: config.db.conn_max_lifetime,
		conn_max_idle_time: config.db.conn_max_idle_time,
		acquire_timeout: config.db.query_timeout,
	};
	let pool = gk_server_db::create_pool(&config.db.dsn, &pool_settings).await?;
	gk_server_db::run_migrations(&pool).await?;

	let bind_addr = config.socket_addr();
	let shutdown_timeout = config.server.shutdown_timeout;

	let state = create_app_state(pool, config);
	let app = create_router(state);

	let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
	tracing::info!("server listening on {bind_addr}");

	axum::serve(
		listener,
		app.into_make_service_with_connect_info::<SocketAddr>(),
	)
	.with_graceful_shutdown(shutdown_signal(shutdown_timeout))
	.await?;

	tracing::info!("server stopped");
	Ok(())
}

fn init_tracing(level: &str, format: &str) {
	let filter = tracing_subscriber::EnvFilter::try_from_default_env()
		.unwrap_or_else(|_| level.into());

	if format == "console" {
		tracing_subscriber::registry()
			.with(filter)
			.with(tracing_subscriber::fmt::layer())
			.init();
	} else {
		tracing_subscriber::registry()
			.with(filter)
			.with(tracing_subscriber::fmt::layer().json())
			.init();
	}
}

async fn shutdown_signal(timeout: Duration) {
	let ctrl_c = async {
		tokio::signal::ctrl_c()
			.await
			.expect("failed to install Ctrl+C handler");
	};

	#[cfg(unix)]
	let terminate = async {
		tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
			.expect("failed to install signal handler")
			.recv()
			.await;
	};

	#[cfg(not(unix))]
	let terminate = std::future::pending::<()>();

	tokio::select! {
		_ = ctrl_c => {},
		_ = terminate => {},
	}

	tracing::info!("graceful shutdown initiated");

	// In-flight requests get the configured window, then the process exits.
	tokio::spawn(async move {
		tokio::time::sleep(timeout).await;
		tracing::error!("shutdown timeout exceeded, exiting");
		std::process::exit(1);
	});
}
