use std::io;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;
use tracing::{info, warn};
use zenboard_ai::{Assistant, GeminiClient};
use zenboard_store::{create_store, BoardRepository};
use zenboard_tui::app::App;
use zenboard_tui::config::BoardConfig;
use zenboard_tui::logging;

const TICK: Duration = Duration::from_millis(100);

fn main() -> Result<()> {
    let config = BoardConfig::parse();
    logging::init(&config.log_path())?;
    info!("zenboard starting");
    info!("data dir: {}", config.data_dir().display());

    let ai_config = config.ai_config();
    if ai_config.api_key.is_none() {
        warn!("no Gemini API key configured, AI actions will fail");
    }
    let assistant: Arc<dyn Assistant> =
        Arc::new(GeminiClient::new(&ai_config).context("failed to build AI client")?);

    let repo = BoardRepository::new(create_store(&config.store_config()));
    let rt = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
        .context("failed to start async runtime")?;
    if config.reset {
        rt.block_on(repo.reset())
            .context("failed to delete stored board")?;
    }

    // Load before touching the terminal so a corrupt document is reported
    // on a normal screen.
    let app = App::new(rt, repo, assistant)?;
    run_tui(app)
}

fn run_tui(app: App) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = event_loop(&mut terminal, app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(ref e) = result {
        eprintln!("Error: {e}");
    }

    result
}

fn event_loop(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, mut app: App) -> Result<()> {
    loop {
        app.poll_ai();
        terminal.draw(|frame| app.render(frame))?;

        // Use poll with timeout while AI requests are in flight, blocking read otherwise
        if app.needs_polling() {
            if event::poll(TICK)? {
                if let Event::Key(key) = event::read()? {
                    if app.should_quit(key) {
                        break;
                    }
                    app.handle_key(key);
                }
            } else {
                app.on_tick();
            }
        } else if let Event::Key(key) = event::read()? {
            if app.should_quit(key) {
                break;
            }
            app.handle_key(key);
        }
    }

    info!("zenboard exiting");
    Ok(())
}
