use std::fs::{self, File};
use std::io::{self, Stdout};
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::backend::CrosstermBackend;
use ratatui::prelude::*;
use tracing_subscriber::EnvFilter;

use player_stats_terminal::config::{Category, Config};
use player_stats_terminal::fetch::HttpStatsSource;
use player_stats_terminal::page::Page;
use player_stats_terminal::prefs::{FilePreferenceStore, MemoryPreferenceStore, PreferenceStore};
use player_stats_terminal::provider::{self, Delta, ProviderCommand};
use player_stats_terminal::sync::SyncEngine;
use player_stats_terminal::ui;

const LOG_DIR: &str = "player_stats_terminal";
const LOG_FILE: &str = "app.log";

struct App {
    engine: SyncEngine,
    cmd_tx: Sender<ProviderCommand>,
    should_quit: bool,
}

impl App {
    fn on_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('r') | KeyCode::Char('R') => {
                let cmds = self.engine.refresh_all();
                self.dispatch(cmds);
            }
            KeyCode::Char('h') | KeyCode::Char('H') => self.refresh_one(Category::Hitters),
            KeyCode::Char('p') | KeyCode::Char('P') => self.refresh_one(Category::Pitchers),
            KeyCode::Char('t') | KeyCode::Char('T') => self.engine.toggle_theme(),
            KeyCode::Char('?') => self.engine.toggle_help(),
            _ => {}
        }
    }

    fn refresh_one(&mut self, category: Category) {
        let cmd = self.engine.begin_refresh(category);
        self.dispatch(vec![cmd]);
    }

    fn dispatch(&mut self, cmds: Vec<ProviderCommand>) {
        for cmd in cmds {
            if self.cmd_tx.send(cmd).is_err() {
                self.engine.push_log("[WARN] Fetch worker unavailable");
                tracing::error!("fetch worker channel closed");
            }
        }
    }
}

fn main() -> Result<()> {
    let config = Config::from_env();
    init_tracing();

    let prefs: Box<dyn PreferenceStore> =
        match FilePreferenceStore::at_default_path(config.prefs_path.clone()) {
            Some(store) => {
                tracing::info!(path = %store.path().display(), "using preference file");
                Box::new(store)
            }
            None => Box::new(MemoryPreferenceStore::default()),
        };

    enable_raw_mode()?;
    let (mut terminal, width) = or_restore(setup_terminal(), restore_terminal)?;
    let (tx, rx) = mpsc::channel();
    let (cmd_tx, cmd_rx) = mpsc::channel();
    let source = Arc::new(HttpStatsSource::new(
        config.api_base_url.clone(),
        config.request_timeout,
    ));
    provider::spawn_fetch_worker(source, tx, cmd_rx);

    let mut app = App {
        engine: SyncEngine::new(config, Page::standard(), prefs, width),
        cmd_tx,
        should_quit: false,
    };
    let initial = app.engine.refresh_all();
    app.dispatch(initial);

    let res = run_app(&mut terminal, &mut app, rx);

    restore_terminal();
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("error: {err:#}");
    }
    Ok(())
}

fn setup_terminal() -> io::Result<(Terminal<CrosstermBackend<Stdout>>, u16)> {
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let terminal = Terminal::new(CrosstermBackend::new(stdout))?;
    let width = terminal.size()?.width;
    Ok((terminal, width))
}

fn restore_terminal() {
    let _ = disable_raw_mode();
    let _ = execute!(io::stdout(), LeaveAlternateScreen);
}

/// Runs `restore` before handing back a failed setup step, so an early error
/// doesn't leave the shell in raw mode.
fn or_restore<T>(res: io::Result<T>, restore: impl FnOnce()) -> Result<T> {
    res.map_err(|err| {
        restore();
        anyhow::Error::new(err).context("terminal setup failed")
    })
}

fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    rx: Receiver<Delta>,
) -> Result<()> {
    let poll_rate = Duration::from_millis(50);

    loop {
        while let Ok(delta) = rx.try_recv() {
            app.engine.apply_delta(delta);
        }
        app.engine.tick(Instant::now());

        terminal
            .draw(|f| ui::draw(f, &app.engine))
            .context("draw frame")?;

        if event::poll(poll_rate)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => app.on_key(key),
                Event::Resize(width, _) => app.engine.on_resize(width, Instant::now()),
                _ => {}
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

/// Logs go to a file so they don't tear the alternate screen.
fn init_tracing() {
    let Some(path) = log_path() else {
        return;
    };
    if let Some(dir) = path.parent() {
        let _ = fs::create_dir_all(dir);
    }
    let Ok(file) = File::options().create(true).append(true).open(&path) else {
        return;
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("player_stats_terminal=info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init();
}

fn log_path() -> Option<PathBuf> {
    if let Ok(base) = std::env::var("XDG_CACHE_HOME") {
        if !base.trim().is_empty() {
            return Some(PathBuf::from(base).join(LOG_DIR).join(LOG_FILE));
        }
    }
    let home = std::env::var("HOME").ok()?;
    if home.trim().is_empty() {
        return None;
    }
    Some(PathBuf::from(home).join(".cache").join(LOG_DIR).join(LOG_FILE))
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;

    #[test]
    fn failed_setup_restores_terminal() {
        let restored = Cell::new(0);
        let res: Result<u16> = or_restore(
            Err(io::Error::other("no tty")),
            || restored.set(restored.get() + 1),
        );
        assert!(res.is_err());
        assert_eq!(restored.get(), 1);
    }

    #[test]
    fn successful_setup_leaves_terminal_alone() {
        let restored = Cell::new(0);
        let width = or_restore(Ok(120u16), || restored.set(restored.get() + 1)).unwrap();
        assert_eq!(width, 120);
        assert_eq!(restored.get(), 0);
    }
}
