mod auth;
mod cli;
mod config;
mod controller;
mod logging;
mod model;
mod view;

use std::io;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::{
    event,
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use cli::CliOptions;
use config::{AppConfig, ConfigPaths};
use controller::{AppController, AppEvent, Dispatcher, TICK_INTERVAL};
use model::{AppModel, Gateway, SpotifyClient};
use view::AppView;

const INPUT_POLL: Duration = Duration::from_millis(50);

#[tokio::main]
async fn main() -> Result<()> {
    let options = CliOptions::parse();

    // Logging goes to a file so it never fights the TUI for the terminal
    let _log_guard = if options.debug {
        match logging::init_logging(&options.log_file) {
            Ok(guard) => Some(guard),
            Err(e) => {
                eprintln!("Warning: Failed to initialize logging: {}", e);
                None
            }
        }
    } else {
        None
    };

    tracing::info!("=== spotify-autoplay starting ===");

    let paths = ConfigPaths::resolve()?;
    let mut config = AppConfig::load(&paths.config_file)?;
    config.prompt_missing(&paths.config_file)?;

    let spotify = auth::authorize(&config, &paths.token_cache).await?;
    let client = SpotifyClient::new(spotify);

    if options.now_playing {
        return print_now_playing(&client).await;
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, client, options.autoplay).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = &res {
        tracing::error!(error = ?err, "Application error");
    }
    tracing::info!("spotify-autoplay shutting down");
    res
}

async fn print_now_playing(client: &SpotifyClient) -> Result<()> {
    match client.fetch_currently_playing().await? {
        Some(state) => match state.track {
            Some(track) => {
                let status = if state.is_playing { "Playing" } else { "Paused" };
                println!("{}: {} - {}", status, track.name, track.artist_line());
            }
            None => println!("Nothing playing"),
        },
        None => println!("Nothing playing"),
    }
    Ok(())
}

fn spawn_ticker(events: UnboundedSender<AppEvent>) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(TICK_INTERVAL);
        loop {
            interval.tick().await;
            if events.send(AppEvent::Tick).is_err() {
                break;
            }
        }
    });
}

/// crossterm reads block, so input lives on its own thread
fn spawn_input_reader(events: UnboundedSender<AppEvent>) {
    thread::spawn(move || {
        loop {
            match event::poll(INPUT_POLL) {
                Ok(true) => match event::read() {
                    Ok(ev) => {
                        if events.send(AppEvent::Input(ev)).is_err() {
                            break;
                        }
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "Failed to read terminal event");
                        break;
                    }
                },
                Ok(false) => {
                    if events.is_closed() {
                        break;
                    }
                }
                Err(e) => {
                    tracing::error!(error = %e, "Failed to poll terminal events");
                    break;
                }
            }
        }
    });
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    client: SpotifyClient,
    autoplay: bool,
) -> Result<()> {
    let (tx, mut rx): (UnboundedSender<AppEvent>, UnboundedReceiver<AppEvent>) =
        mpsc::unbounded_channel();

    let now = Instant::now();
    let mut controller = AppController::new(AppModel::new(now, autoplay), now);
    let dispatcher = Dispatcher::new(client, tx.clone());

    spawn_ticker(tx.clone());
    spawn_input_reader(tx);
    dispatcher.dispatch_all(controller.startup_requests());

    loop {
        terminal.draw(|f| AppView::render(f, controller.model()))?;

        let Some(event) = rx.recv().await else {
            break;
        };
        let requests = controller.handle(event, Instant::now());
        dispatcher.dispatch_all(requests);

        if controller.should_quit() {
            break;
        }
    }

    Ok(())
}
