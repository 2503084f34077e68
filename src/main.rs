use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use color_eyre::eyre::{Result, WrapErr};
use tokio::sync::mpsc;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use histview::action::Action;
use histview::app::{App, Effect};
use histview::client::{HistoryClient, HttpHistoryClient};
use histview::config::{Cli, ConfigFile, Settings};
use histview::domain::Id;
use histview::event::{key_to_action, AppEvent, RawEventHandler};
use histview::tui::Tui;
use histview::worker::{load_record, CliHandle, CliRequest, CliWorker};
use histview::{report, widgets};

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = ConfigFile::load().wrap_err("could not load config file")?;
    let settings = Settings::resolve(cli, config);

    // stdout belongs to the TUI, so logs only go to a file
    let _log_guard = match settings.log_file {
        Some(ref path) => Some(init_logging(path)?),
        None => None,
    };

    let client = HttpHistoryClient::new(&settings.api_url, settings.token.clone(), settings.timeout)
        .wrap_err("invalid history service settings")?;

    if let Some(ref id) = settings.print {
        let detail = load_record(&client, &Id::from(id.as_str()))
            .await
            .wrap_err_with(|| format!("could not load history record {}", id))?;
        print!("{}", report::render(&detail));
        return Ok(());
    }

    run_tui(Arc::new(client), &settings).await
}

fn init_logging(path: &Path) -> Result<WorkerGuard> {
    let file = std::fs::File::create(path)
        .wrap_err_with(|| format!("could not create log file {}", path.display()))?;
    let (writer, guard) = tracing_appender::non_blocking(file);
    tracing_subscriber::fmt()
        .with_writer(writer)
        .with_ansi(false)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("histview=info")),
        )
        .init();
    Ok(guard)
}

async fn run_tui(client: Arc<dyn HistoryClient>, settings: &Settings) -> Result<()> {
    let mut app = App::new(settings.api_url.clone(), settings.poll_interval);

    let (action_tx, mut action_rx) = mpsc::unbounded_channel::<Action>();
    let (worker, cli_handle) = CliWorker::new(client, action_tx);
    tokio::spawn(worker.run());

    let effects = app.update(Action::Refresh);
    handle_effects(effects, &cli_handle);

    let mut terminal = histview::tui::init()?;
    let result = event_loop(&mut terminal, &mut app, &cli_handle, &mut action_rx).await;
    histview::tui::restore()?;
    result
}

async fn event_loop(
    terminal: &mut Tui,
    app: &mut App,
    cli_handle: &CliHandle,
    action_rx: &mut mpsc::UnboundedReceiver<Action>,
) -> Result<()> {
    let mut events = RawEventHandler::new(Duration::from_secs(1));

    loop {
        terminal.draw(|frame| widgets::render(app, frame))?;

        tokio::select! {
            Some(event) = events.next() => {
                let action = match event {
                    AppEvent::Key(key) => key_to_action(
                        key,
                        app.view,
                        &app.input_mode,
                        &app.overlay,
                        &app.input_buffer,
                    ),
                    AppEvent::Tick => Some(Action::Tick),
                };
                if let Some(action) = action {
                    let effects = app.update(action);
                    handle_effects(effects, cli_handle);
                }
            }
            Some(action) = action_rx.recv() => {
                let effects = app.update(action);
                handle_effects(effects, cli_handle);
            }
            else => break,
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

fn handle_effects(effects: Vec<Effect>, cli_handle: &CliHandle) {
    for effect in effects {
        match effect {
            Effect::LoadHistory => cli_handle.send(CliRequest::LoadHistory),
            Effect::LoadRecord(id) => cli_handle.send(CliRequest::LoadRecord { id }),
            Effect::Quit => {}
        }
    }
}
