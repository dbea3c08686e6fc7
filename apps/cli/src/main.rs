mod fixture;

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use syncml_core::services::LineCodec;
use syncml_core::{ServiceConfig, SessionPhase, SyncmlService};
use tracing::{error, info};

use fixture::Fixture;

#[derive(Parser, Debug)]
#[command(author, version, about = "SyncML enrollment session replay", long_about = None)]
struct Args {
    /// Fixture file (TOML) with tokens, devices, pending operations and requests
    fixture: String,

    /// Service configuration file, overrides the fixture's [service] table
    #[arg(long)]
    config: Option<String>,

    /// Keep enrollment properties on the stored record
    #[arg(long)]
    retain_properties: bool,

    /// Continue with the next request after a fatal error
    #[arg(long)]
    keep_going: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn run(args: &Args) -> Result<bool> {
    let fixture = Fixture::load(&args.fixture)?;
    let config = match &args.config {
        Some(path) => ServiceConfig::load_from_file(path)?,
        None => fixture.service.clone(),
    };
    info!(
        device_type = %config.device_type,
        requests = fixture.requests.len(),
        "Replaying fixture"
    );

    let service = SyncmlService::new(
        config,
        Arc::new(fixture.registry(args.retain_properties)),
        Arc::new(fixture.token_cache()),
        Arc::new(LineCodec::new()),
    );

    let mut clean = true;
    for (n, request) in fixture.requests.iter().enumerate() {
        let message = request.to_message()?;
        let phase = SessionPhase::select(message.msg_id(), message.session_id());
        match service.handle(&message) {
            Ok(response) => {
                println!("#{} {} -> {}", n + 1, phase, response.status);
                println!("{}\n", response.body);
            }
            Err(e) => {
                clean = false;
                error!(request = n + 1, "Request failed: {}", e);
                println!("#{} {} -> failed: {}\n", n + 1, phase, e);
                if !args.keep_going {
                    break;
                }
            }
        }
    }
    Ok(clean)
}

fn main() {
    let args = Args::parse();

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::builder()
                .with_default_directive(if args.verbose {
                    tracing::Level::DEBUG.into()
                } else {
                    tracing::Level::INFO.into()
                })
                .from_env_lossy(),
        )
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    match run(&args) {
        Ok(true) => {}
        Ok(false) => std::process::exit(2),
        Err(e) => {
            error!("Error: {:#}", e);
            std::process::exit(1);
        }
    }
}
