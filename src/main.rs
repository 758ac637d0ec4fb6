// medcot - Medical image chain-of-thought demo backed by hosted vision models
// Author: kelexine (https://github.com/kelexine)

use anyhow::{Context, Result};
use clap::Parser;
use medcot::cli::{Args, Command, OutputFormat};
use medcot::config::AppConfig;
use medcot::diagnosis::{DiagnosisReport, DiagnosisSession, Diagnoser};
use medcot::providers::{ProviderKind, ProviderSet};
use medcot::server::create_router;
use medcot::utils::logging;
use medcot::vision::{Normalizer, SourceImage};
use std::net::SocketAddr;
use std::path::PathBuf;
use tokio::signal;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    // Phase 1: Load configuration
    let config = AppConfig::load_from(args.config.as_deref())?;

    // Phase 2: Initialize logging
    logging::init(&config.logging)?;
    info!("Starting medcot v{}", env!("CARGO_PKG_VERSION"));

    // Phase 3: Build the pipeline
    let diagnoser = Diagnoser::new(
        Normalizer::new(config.normalizer.clone()),
        ProviderSet::from_config(&config)?,
    );

    match args.command {
        Command::Diagnose {
            image,
            provider,
            format,
            save_normalized,
        } => diagnose(diagnoser, image, provider, format, save_normalized).await,
        Command::Serve { host, port } => {
            let host = host.unwrap_or_else(|| config.server.host.clone());
            let port = port.unwrap_or(config.server.port);
            serve(config, diagnoser, &host, port).await
        }
    }
}

async fn diagnose(
    diagnoser: Diagnoser,
    image: PathBuf,
    provider: ProviderKind,
    format: OutputFormat,
    save_normalized: Option<PathBuf>,
) -> Result<()> {
    let source = SourceImage::from_path(&image)
        .await
        .with_context(|| format!("Failed to read {}", image.display()))?;

    let session = DiagnosisSession::new(provider);
    let mut normalized_jpeg = None;
    let outcome = diagnoser
        .diagnose_with(&session, source, None, |normalized| {
            if save_normalized.is_some() {
                normalized_jpeg = Some(normalized.data.clone());
            }
            Ok(())
        })
        .await;

    if let (Some(path), Some(data)) = (&save_normalized, normalized_jpeg) {
        tokio::fs::write(path, data)
            .await
            .with_context(|| format!("Failed to write {}", path.display()))?;
        info!("Saved normalized image to {}", path.display());
    }

    match outcome {
        Ok(report) => print_report(&report, format),
        Err(e) => {
            // The rendered summary is the whole report; exit without repeating it.
            error!("Diagnosis failed: {}", e);
            eprintln!("{}", session.snapshot().summary);
            std::process::exit(1);
        }
    }
}

fn print_report(report: &DiagnosisReport, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(report)?),
        OutputFormat::Text => {
            println!("当前使用模型：{} ({})", report.provider_label, report.model);
            println!();
            println!("诊断结论");
            println!("{}", report.result.summary);
            if !report.result.reasoning.is_empty() {
                println!();
                println!("推理链条");
                println!("{}", report.result.reasoning);
            }
        }
    }
    Ok(())
}

async fn serve(config: AppConfig, diagnoser: Diagnoser, host: &str, port: u16) -> Result<()> {
    let app = create_router(config, diagnoser)?;
    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;

    info!("Starting server on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down gracefully");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            info!("Received SIGTERM signal");
        },
    }
}
