//! High-score persistence
//!
//! The core only ever sees a [`HighScoreList`]. Where it lives is up to a
//! [`ScoreStore`]: a JSON file for the binary, memory for tests.
//!
//! The file format is a bare JSON array of at most five integers, best first:
//!
//! ```json
//! [1200, 340, 120]
//! ```

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use blockfall_core::HighScoreList;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

/// Load/save seam between the game loop and wherever scores are kept
pub trait ScoreStore {
    fn load(&self) -> Result<HighScoreList>;
    fn save(&self, scores: &HighScoreList) -> Result<()>;
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(transparent)]
struct StoredScores(Vec<u32>);

/// Scores kept in a JSON file.
///
/// A missing file loads as an empty list. Parent directories are created on save.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ScoreStore for JsonFileStore {
    #[instrument(skip(self), fields(path = %self.path.display()))]
    fn load(&self) -> Result<HighScoreList> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("no score file yet");
                return Ok(HighScoreList::new());
            }
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("read score file {}", self.path.display()))
            }
        };

        let stored: StoredScores = serde_json::from_str(&content)
            .with_context(|| format!("parse score file {}", self.path.display()))?;
        let list = HighScoreList::from_scores(stored.0);
        info!(count = list.len(), "scores loaded");
        Ok(list)
    }

    #[instrument(skip(self, scores), fields(path = %self.path.display(), count = scores.len()))]
    fn save(&self, scores: &HighScoreList) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("create score directory {}", parent.display()))?;
        }

        let json = serde_json::to_string(&StoredScores(scores.scores().to_vec()))
            .context("encode scores")?;
        fs::write(&self.path, json)
            .with_context(|| format!("write score file {}", self.path.display()))?;
        debug!("scores saved");
        Ok(())
    }
}

/// In-memory store. Clones share the same list.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    scores: Arc<Mutex<HighScoreList>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_scores(scores: HighScoreList) -> Self {
        Self {
            scores: Arc::new(Mutex::new(scores)),
        }
    }
}

impl ScoreStore for MemoryStore {
    fn load(&self) -> Result<HighScoreList> {
        let guard = self
            .scores
            .lock()
            .map_err(|_| anyhow::anyhow!("score store lock poisoned"))?;
        Ok(guard.clone())
    }

    fn save(&self, scores: &HighScoreList) -> Result<()> {
        let mut guard = self
            .scores
            .lock()
            .map_err(|_| anyhow::anyhow!("score store lock poisoned"))?;
        *guard = scores.clone();
        Ok(())
    }
}
