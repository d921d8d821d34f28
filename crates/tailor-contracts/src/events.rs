use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Everything the session log can record.
///
/// Serialized internally tagged, so the variant name becomes the `type` field of the
/// JSONL row and the variant fields sit beside it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEvent {
    SessionStarted {
        command: String,
        texture: PathBuf,
        backup: PathBuf,
    },
    EditRequested {
        kind: String,
        input: String,
    },
    StateChanged {
        from: String,
        to: String,
    },
    DescriptionReady {
        image_path: PathBuf,
        description: String,
    },
    EditCancelled {
        description: String,
    },
    BackupCreated {
        backup: PathBuf,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        sha256: Option<String>,
    },
    TextureSynthesized {
        raw_width: u32,
        raw_height: u32,
        size: u32,
        resized: bool,
        source_sha256: String,
    },
    TextureCommitted {
        texture: PathBuf,
        sha256: String,
        bytes: usize,
    },
    EditFailed {
        stage: String,
        reason: String,
    },
    TextureRestored {
        texture: PathBuf,
        backup: PathBuf,
    },
    RestoreSkipped,
}

impl SessionEvent {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::SessionStarted { .. } => "session_started",
            Self::EditRequested { .. } => "edit_requested",
            Self::StateChanged { .. } => "state_changed",
            Self::DescriptionReady { .. } => "description_ready",
            Self::EditCancelled { .. } => "edit_cancelled",
            Self::BackupCreated { .. } => "backup_created",
            Self::TextureSynthesized { .. } => "texture_synthesized",
            Self::TextureCommitted { .. } => "texture_committed",
            Self::EditFailed { .. } => "edit_failed",
            Self::TextureRestored { .. } => "texture_restored",
            Self::RestoreSkipped => "restore_skipped",
        }
    }
}

#[derive(Serialize)]
struct Row<'a> {
    #[serde(flatten)]
    event: &'a SessionEvent,
    session_id: &'a str,
    ts: String,
}

/// Append-only JSONL log shared by every component of one session.
///
/// Nothing touches the disk until the first `record`. The file's directory must
/// already exist; the log never creates the texture directory on its own.
#[derive(Debug, Clone)]
pub struct EventLog {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    path: PathBuf,
    session_id: String,
    lock: Mutex<()>,
}

impl EventLog {
    pub fn new(path: impl Into<PathBuf>, session_id: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(Inner {
                path: path.into(),
                session_id: session_id.into(),
                lock: Mutex::new(()),
            }),
        }
    }

    pub fn record(&self, event: &SessionEvent) -> anyhow::Result<()> {
        let row = Row {
            event,
            session_id: &self.inner.session_id,
            ts: Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true),
        };
        let mut line = serde_json::to_vec(&row)?;
        line.push(b'\n');

        let _guard = self
            .inner
            .lock
            .lock()
            .map_err(|_| anyhow::anyhow!("event log lock poisoned"))?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.inner.path)?;
        file.write_all(&line)?;
        Ok(())
    }

    /// Events written by any session to this file, oldest first. Rows that no longer
    /// parse as a known event are skipped.
    pub fn replay(&self) -> anyhow::Result<Vec<SessionEvent>> {
        let raw = match fs::read_to_string(&self.inner.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(err.into()),
        };
        Ok(raw
            .lines()
            .filter_map(|line| serde_json::from_str::<SessionEvent>(line).ok())
            .collect())
    }

    pub fn recorded_kinds(&self) -> anyhow::Result<Vec<&'static str>> {
        Ok(self.replay()?.iter().map(SessionEvent::kind).collect())
    }
}
