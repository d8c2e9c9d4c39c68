//! File-backed session store with file locking.
//!
//! This is the "session store" collaborator that sits outside the engine:
//! the CLI uses it to keep a session between invocations. Sessions are kept
//! one JSON document per session id, written atomically.
//!
//! Every access to `<id>.json` holds an `fs2` lock on the sidecar
//! `<id>.lock`. The JSON file itself is replaced by rename on each save, so
//! it cannot carry the lock. Readers take it shared; `save`, `delete` and
//! the whole read-modify-write of `update` take it exclusive.

use crate::{Error, Result, Session};
use fs2::FileExt;
use std::fs::{File, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use uuid::Uuid;

const ACTIVE_FILE: &str = "active";

/// Storage for whole session snapshots keyed by session id
pub trait SessionStore {
    fn load(&self, id: Uuid) -> Result<Session>;
    fn save(&self, session: &Session) -> Result<()>;
    fn delete(&self, id: Uuid) -> Result<()>;
}

/// Stores `<dir>/<session-id>.json` plus an `active` pointer file
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn session_path(&self, id: Uuid) -> PathBuf {
        self.dir.join(format!("{id}.json"))
    }

    fn ensure_dir(&self) -> Result<()> {
        std::fs::create_dir_all(&self.dir)?;
        Ok(())
    }

    /// Open (creating if needed) the lock file guarding session `id`
    fn lock_file(&self, id: Uuid) -> Result<File> {
        self.ensure_dir()?;
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(self.dir.join(format!("{id}.lock")))?;
        Ok(file)
    }

    /// Write `contents` to `path` via a temp file and atomic rename
    fn write_atomic(&self, path: &Path, contents: &[u8]) -> Result<()> {
        self.ensure_dir()?;

        let temp = NamedTempFile::new_in(&self.dir)?;
        {
            let mut writer = std::io::BufWriter::new(temp.as_file());
            writer.write_all(contents)?;
            writer.flush()?;
        }
        temp.as_file().sync_all()?;

        temp.persist(path).map_err(|e| Error::Io(e.error))?;
        Ok(())
    }

    /// Read a session; the caller holds its lock
    fn read_session(&self, id: Uuid) -> Result<Session> {
        let path = self.session_path(id);
        if !path.exists() {
            return Err(Error::SessionNotFound(id.to_string()));
        }

        let mut contents = String::new();
        std::io::BufReader::new(File::open(&path)?).read_to_string(&mut contents)?;

        let session: Session = serde_json::from_str(&contents)?;
        tracing::debug!(
            "Loaded session {} from {:?} ({} events)",
            id,
            path,
            session.event_count()
        );
        Ok(session)
    }

    /// Write a session; the caller holds its lock exclusively
    fn write_session(&self, session: &Session) -> Result<()> {
        let contents = serde_json::to_string(session)?;
        let path = self.session_path(session.id);
        self.write_atomic(&path, contents.as_bytes())?;
        tracing::debug!("Saved session {} to {:?}", session.id, path);
        Ok(())
    }

    /// Load, modify and save session `id` under one exclusive lock
    ///
    /// Nothing is written when `f` fails.
    pub fn update<T, F>(&self, id: Uuid, f: F) -> Result<(Session, T)>
    where
        F: FnOnce(&mut Session) -> Result<T>,
    {
        if !self.session_path(id).exists() {
            return Err(Error::SessionNotFound(id.to_string()));
        }
        let lock = self.lock_file(id)?;
        lock.lock_exclusive()?;

        let result = self.read_session(id).and_then(|mut session| {
            let value = f(&mut session)?;
            self.write_session(&session)?;
            Ok((session, value))
        });

        lock.unlock()?;
        result
    }

    /// `update` applied to the active session
    pub fn update_active<T, F>(&self, f: F) -> Result<(Session, T)>
    where
        F: FnOnce(&mut Session) -> Result<T>,
    {
        self.update(self.require_active()?, f)
    }

    /// Id of the session the CLI is currently working on, if any
    pub fn active(&self) -> Result<Option<Uuid>> {
        let path = self.dir.join(ACTIVE_FILE);
        if !path.exists() {
            return Ok(None);
        }
        let raw = std::fs::read_to_string(&path)?;
        let id = Uuid::parse_str(raw.trim())
            .map_err(|e| Error::State(format!("Corrupt active session pointer {:?}: {}", path, e)))?;
        Ok(Some(id))
    }

    fn require_active(&self) -> Result<Uuid> {
        self.active()?
            .ok_or_else(|| Error::State("No active session; run `tipple start` first".into()))
    }

    pub fn set_active(&self, id: Uuid) -> Result<()> {
        self.write_atomic(&self.dir.join(ACTIVE_FILE), id.to_string().as_bytes())?;
        tracing::debug!("Active session is now {}", id);
        Ok(())
    }

    pub fn clear_active(&self) -> Result<()> {
        let path = self.dir.join(ACTIVE_FILE);
        if path.exists() {
            std::fs::remove_file(&path)?;
        }
        Ok(())
    }

    /// Load the active session, or fail with a hint to start one
    pub fn load_active(&self) -> Result<Session> {
        self.load(self.require_active()?)
    }
}

impl SessionStore for JsonFileStore {
    /// Load a session with its lock held shared while reading
    fn load(&self, id: Uuid) -> Result<Session> {
        if !self.session_path(id).exists() {
            return Err(Error::SessionNotFound(id.to_string()));
        }
        let lock = self.lock_file(id)?;
        lock.lock_shared()?;
        let result = self.read_session(id);
        lock.unlock()?;
        result
    }

    /// Save a session atomically under its exclusive lock:
    /// 1. Write to a temp file in the store directory
    /// 2. Sync to disk
    /// 3. Rename over the previous version
    fn save(&self, session: &Session) -> Result<()> {
        let lock = self.lock_file(session.id)?;
        lock.lock_exclusive()?;
        let result = self.write_session(session);
        lock.unlock()?;
        result
    }

    fn delete(&self, id: Uuid) -> Result<()> {
        let path = self.session_path(id);
        if !path.exists() {
            return Err(Error::SessionNotFound(id.to_string()));
        }

        let lock = self.lock_file(id)?;
        lock.lock_exclusive()?;
        let removed = std::fs::remove_file(&path)
            .and_then(|_| std::fs::remove_file(self.dir.join(format!("{id}.lock"))));
        lock.unlock()?;
        removed?;

        if self.active()? == Some(id) {
            self.clear_active()?;
        }
        tracing::info!("Deleted session {}", id);
        Ok(())
    }
}
