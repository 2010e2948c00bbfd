//! Terminal runner (default binary).
//!
//! Owns the frame loop: reads keys, feeds elapsed time to the session, records
//! finished games in the high-score list and renders every frame.

use std::fs::{self, OpenOptions};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event::{self, Event};
use tracing::{debug, info, trace, warn};
use tracing_subscriber::EnvFilter;

use blockfall::core::{GameSnapshot, HighScoreList, Session};
use blockfall::input::{handle_key_event, should_quit};
use blockfall::store::{JsonFileStore, ScoreStore};
use blockfall::term::{
    Backdrop, BackdropConfig, FrameBuffer, GameView, TerminalRenderer, ViewExtras, Viewport,
};
use blockfall::AppConfig;

fn main() -> Result<()> {
    let config = AppConfig::from_env();
    init_logging(&config)?;

    let store = JsonFileStore::new(&config.scores_path);
    let mut high_scores = store.load().unwrap_or_else(|e| {
        warn!(error = ?e, "could not load high scores, starting empty");
        HighScoreList::new()
    });
    info!(
        path = %store.path().display(),
        count = high_scores.len(),
        best = ?high_scores.best(),
        "high scores ready"
    );

    let mut term = TerminalRenderer::new();
    term.enter()?;

    let result = run(&mut term, &config, &store, &mut high_scores);

    // Always try to restore terminal state.
    let _ = term.exit();
    result
}

/// Install a file-backed subscriber when a log path is configured
fn init_logging(config: &AppConfig) -> Result<()> {
    let Some(path) = &config.log_path else {
        return Ok(());
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("create log directory {}", parent.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("open log file {}", path.display()))?;

    let filter = EnvFilter::try_new(&config.log_filter)
        .unwrap_or_else(|_| EnvFilter::new(blockfall::config::DEFAULT_LOG_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();

    info!(path = %path.display(), "logging initialized");
    Ok(())
}

fn run(
    term: &mut TerminalRenderer,
    config: &AppConfig,
    store: &impl ScoreStore,
    high_scores: &mut HighScoreList,
) -> Result<()> {
    let seed = config.resolve_seed();
    let mut session = Session::new(seed);
    info!(seed, "blockfall ready");

    let view = GameView::default();
    let mut backdrop = config
        .backdrop
        .then(|| Backdrop::new(seed.rotate_left(16), BackdropConfig::default()));

    let mut fb = FrameBuffer::new(0, 0);
    let mut snap = GameSnapshot::default();

    let frame = Duration::from_millis(config.frame_ms as u64);
    let mut last_frame = Instant::now();

    loop {
        // Render.
        let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
        session.snapshot_into(&mut snap);
        let extras = ViewExtras {
            high_scores: high_scores.scores(),
            backdrop: backdrop.as_ref(),
        };
        view.render_into_with(&snap, extras, Viewport::new(w, h), &mut fb);
        let stats = term.draw_swap(&mut fb)?;
        if stats.bytes > 0 {
            trace!(full = stats.full, spans = stats.spans, bytes = stats.bytes, "frame");
        }

        // Input with timeout until next frame.
        let timeout = frame
            .checked_sub(last_frame.elapsed())
            .unwrap_or(Duration::ZERO);

        if event::poll(timeout).context("poll terminal events")? {
            match event::read().context("read terminal event")? {
                Event::Key(key) => {
                    if should_quit(key) {
                        info!(score = session.score(), "quit");
                        return Ok(());
                    }
                    if let Some(command) = handle_key_event(key) {
                        let accepted = session.apply_command(command);
                        debug!(command = command.as_str(), accepted, "command");
                    }
                }
                Event::Resize(..) => term.invalidate(),
                _ => {}
            }
        }

        // Advance time.
        let elapsed = last_frame.elapsed();
        if elapsed >= frame {
            last_frame = Instant::now();
            let elapsed_ms = elapsed.as_millis().min(u32::MAX as u128) as u32;
            session.update(elapsed_ms);
            if let Some(backdrop) = backdrop.as_mut() {
                backdrop.update(elapsed_ms, w);
            }
        }

        if let Some(event) = session.take_last_event() {
            if event.game_over {
                record_final_score(store, high_scores, event.score);
            }
        }
    }
}

/// Add a finished game's score and persist the list if it changed
fn record_final_score(store: &impl ScoreStore, high_scores: &mut HighScoreList, score: u32) {
    match high_scores.record(score) {
        Some(rank) => {
            info!(score, rank, "new high score");
            if let Err(e) = store.save(high_scores) {
                warn!(error = ?e, "could not save high scores");
            }
        }
        None => debug!(score, "score did not place"),
    }
}
