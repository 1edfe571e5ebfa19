// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! GophKeeper agent binary.

use clap::{Parser, Subcommand};

use gk_agent::api::JsonClient;
use gk_agent::commands::{self, AgentContext};
use gk_agent::paths;

/// GophKeeper agent - seals secrets locally, syncs ciphertext with the
/// server, keeps a mirror for offline reads.
#[derive(Parser, Debug)]
#[command(name = "gk-agent", about = "GophKeeper command-line agent", version)]
struct Cli {
	/// Server base URL.
	#[arg(long, global = true, default_value = "http://127.0.0.1:8080")]
	server: String,

	/// Skip TLS certificate verification (self-signed dev servers only).
	#[arg(long, global = true)]
	insecure: bool,

	#[command(subcommand)]
	command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
	/// Create a new account
	Register {
		#[arg(long)]
		email: String,
		/// Account password; prompted when omitted
		#[arg(long)]
		password: Option<String>,
	},
	/// Log in and store the token pair
	Login {
		#[arg(long)]
		email: String,
		/// Account password; prompted when omitted
		#[arg(long)]
		password: Option<String>,
	},
	/// Exchange the stored refresh token for a fresh pair
	Refresh,
	/// Seal a new secret and upload it
	Create {
		/// Secret type: login_password, text, binary, bank_card or otp
		#[arg(long = "type")]
		kind: String,
		#[arg(long)]
		title: String,
		/// Plaintext to seal with the master password
		#[arg(long)]
		data: String,
		/// Optional metadata, stored unencrypted
		#[arg(long)]
		meta: Option<String>,
	},
	/// Update fields of an existing secret
	Update {
		#[arg(long)]
		id: String,
		#[arg(long = "type")]
		kind: Option<String>,
		#[arg(long)]
		title: Option<String>,
		/// New plaintext; sealed before upload
		#[arg(long)]
		data: Option<String>,
		#[arg(long)]
		meta: Option<String>,
	},
	/// Delete a secret
	Delete {
		#[arg(long)]
		id: String,
	},
	/// Print secrets from the local mirror
	Get {
		/// Secret id; omit to list everything
		id: Option<String>,
		/// Open the envelope and print the plaintext
		#[arg(long)]
		decrypt: bool,
	},
	/// Pull the server's view and replace the local mirror
	Sync,
	/// Show version information
	Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
	let cli = Cli::parse();

	tracing_subscriber::fmt()
		.with_env_filter(
			tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()),
		)
		.with_writer(std::io::stderr)
		.init();

	if let Command::Version = cli.command {
		println!("gk-agent {}", env!("CARGO_PKG_VERSION"));
		return Ok(());
	}

	let ctx = AgentContext {
		client: JsonClient::new(&cli.server, cli.insecure),
		mirror_path: paths::default_mirror_path()?,
		credentials_path: paths::default_credentials_path()?,
	};

	match cli.command {
		Command::Register { email, password } => commands::register::run(&ctx, &email, password).await,
		Command::Login { email, password } => commands::login::run(&ctx, &email, password).await,
		Command::Refresh => commands::refresh::run(&ctx).await,
		Command::Create {
			kind,
			title,
			data,
			meta,
		} => {
			commands::create::run(
				&ctx,
				commands::create::CreateArgs {
					kind,
					title,
					data,
					meta,
				},
			)
			.await
		}
		Command::Update {
			id,
			kind,
			title,
			data,
			meta,
		} => {
			commands::update::run(
				&ctx,
				commands::update::UpdateArgs {
					id,
					kind,
					title,
					data,
					meta,
				},
			)
			.await
		}
		Command::Delete { id } => commands::delete::run(&ctx, &id).await,
		Command::Get { id, decrypt } => commands::get::run(&ctx, id, decrypt).await,
		Command::Sync => commands::sync::run(&ctx).await,
		Command::Version => unreachable!("handled above"),
	}
}
