use std::{io, sync::Arc};

use anyhow::{Context, Result};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, Event, EventStream, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use ratatui::{
    Terminal,
    backend::{Backend, CrosstermBackend},
};
use taskwatch_core::infrastructure::{config::Settings, telemetry::TelemetryBuilder};
use taskwatch_core::poller::TokioClock;
use taskwatch_core::{HttpTaskApi, TaskController};
use tracing::info;

mod app;
mod commands;
mod ui;

use app::App;
use commands::Command;
use ui::ui;

#[tokio::main]
async fn main() -> Result<()> {
    let settings = Settings::new().context("Failed to load configuration")?;

    // The terminal is ours, so logs always go to a file.
    let log_dir = settings.telemetry.log_dir.clone().unwrap_or_else(|| {
        dirs::data_local_dir()
            .unwrap_or_else(std::env::temp_dir)
            .join("taskwatch")
            .join("logs")
    });
    let _guard = TelemetryBuilder::new("taskwatch-tui")
        .with_settings(&settings.telemetry)
        .with_log_dir(log_dir)
        .init()?;

    let api = Arc::new(HttpTaskApi::new(settings.http_config()?).context("Failed to build HTTP client")?);
    info!(server = %api.base_url(), "Connecting to job server");
    let mut controller = TaskController::new(api, Arc::new(TokioClock), settings.controller_config());

    // setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new();
    app.add_message(format!("Job server: {}", settings.server.base_url));

    let res = run_app(&mut terminal, &mut app, &mut controller).await;

    // restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    controller.shutdown();

    if let Err(err) = res {
        println!("{err:?}");
    }

    Ok(())
}

async fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    controller: &mut TaskController,
) -> Result<()> {
    let mut events = EventStream::new();

    loop {
        let model = controller.render();
        let task = controller
            .tracked_id()
            .map(|id| id.as_str())
            .zip(model.as_ref());
        terminal.draw(|f| ui(f, app, task))?;

        tokio::select! {
            maybe_event = events.next() => match maybe_event {
                Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                    if let Some(line) = app.handle_key(key.code) {
                        app.add_message(format!("> {line}"));
                        execute_command(&line, app, controller).await;
                    }
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => return Err(e.into()),
                None => return Ok(()),
            },
            Some(event) = controller.next_event() => {
                controller.apply(event);
                controller.drain_events();
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

async fn execute_command(line: &str, app: &mut App, controller: &mut TaskController) {
    match commands::parse(line) {
        Ok(Command::Start(form)) => match controller.start(&form).await {
            Ok(id) => {
                let notice = controller.notice().unwrap_or_default().to_string();
                app.add_message(format!("{notice} (task {id})"));
            }
            Err(e) => app.add_message(format!("Start failed: {e}")),
        },
        Ok(Command::Stop(id)) => {
            let id = id
                .or_else(|| controller.tracked_id().map(ToString::to_string))
                .unwrap_or_default();
            match controller.stop(&id).await {
                Ok(ack) => app.add_message(ack.message),
                Err(e) => app.add_message(format!("Stop failed: {e}")),
            }
        }
        Ok(Command::Help) => {
            for help in commands::HELP {
                app.add_message(help);
            }
        }
        Err(e) => app.add_message(e),
    }
}
