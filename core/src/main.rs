//! `taskwatch`: headless job lifecycle client.

mod cli;

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use taskwatch_core::infrastructure::{config::Settings, telemetry::TelemetryBuilder};
use taskwatch_core::poller::TokioClock;
use taskwatch_core::task::TaskSnapshot;
use taskwatch_core::view::{RenderModel, project};
use taskwatch_core::{HttpConfig, HttpTaskApi, TaskApi, TaskController, TaskIdentifier};
use tokio::signal;
use tracing::info;

use cli::{Cli, Command, build_form};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let settings = match &cli.config {
        Some(path) => Settings::from_file(path),
        None => Settings::new(),
    }
    .context("Failed to load configuration")?;

    let _guard = TelemetryBuilder::new("taskwatch")
        .with_settings(&settings.telemetry)
        .init()
        .context("Failed to initialize telemetry")?;

    let http_config = match cli.server {
        Some(url) => HttpConfig::new(url).with_request_timeout(settings.request_timeout()),
        None => settings.http_config()?,
    };
    info!(server = %http_config.base_url, "Using job server");
    let api = Arc::new(HttpTaskApi::new(http_config).context("Failed to build HTTP client")?);

    match cli.command {
        Command::Start {
            fields,
            files,
            no_watch,
        } => {
            let form = build_form(&fields, &files)?;
            let mut controller =
                TaskController::new(api, Arc::new(TokioClock), settings.controller_config());

            let id = controller.start(&form).await?;
            if let Some(notice) = controller.notice() {
                println!("{notice}");
            }
            println!("Task ID: {id}");

            if no_watch {
                controller.shutdown();
                return Ok(());
            }

            tokio::select! {
                () = controller.follow(|handle| print_model(&project(handle.snapshot()))) => {
                    info!(task_id = %id, "Task finished");
                }
                _ = signal::ctrl_c() => {
                    println!("Detached; task {id} keeps running on the server.");
                }
            }
            controller.shutdown();
        }
        Command::Stop { id } => {
            let mut controller =
                TaskController::new(api, Arc::new(TokioClock), settings.controller_config());
            let ack = controller.stop(&id).await?;
            println!("{}", ack.message);
        }
        Command::Status { id } => {
            let id = TaskIdentifier::parse(&id)?;
            let update = api.status(&id).await?;
            let mut snapshot = TaskSnapshot::started();
            snapshot.merge(update);
            print_model(&project(&snapshot));
        }
    }

    Ok(())
}

fn print_model(model: &RenderModel) {
    println!();
    for line in model.lines() {
        println!("{line}");
    }
}
