// encrypted conversation memory
// the whole store is one json document, sealed and rewritten on every change

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use super::cipher::Cipher;
use super::emotion::Emotion;
use crate::Error;

/// One user message and the reply it got.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exchange {
    pub user_msg: String,
    pub bot_msg: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emotion: Option<Emotion>,
    #[serde(default)]
    pub timestamp: String,
}

impl Exchange {
    /// Stamped with the current local time.
    pub fn new(user_msg: &str, bot_msg: &str, emotion: Option<Emotion>) -> Self {
        Self {
            user_msg: user_msg.to_string(),
            bot_msg: bot_msg.to_string(),
            emotion,
            timestamp: chrono::Local::now().to_rfc3339(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    #[serde(default)]
    pub history: Vec<Exchange>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoreData {
    #[serde(default)]
    pub users: BTreeMap<String, UserRecord>,
}

/// Per-user conversation log kept in a single encrypted file.
///
/// Every mutation decrypts the whole file, changes it in memory and writes a
/// new sealed snapshot over the old one. The internal mutex serializes those
/// cycles inside this process only: two processes sharing the same file can
/// still lose each other's updates (last write wins).
pub struct ConversationStore {
    path: PathBuf,
    cipher: Cipher,
    lock: Mutex<()>,
}

impl ConversationStore {
    /// Opens the store at `path`, creating the key at `key_path` and an empty
    /// store on first run.
    pub fn open(path: impl Into<PathBuf>, key_path: &Path) -> Result<Self, Error> {
        let path = path.into();
        let cipher = Cipher::load_or_create(key_path)?;

        if let Some(parent) = parent_dir(&path) {
            fs::create_dir_all(parent)?;
        }

        let store = Self {
            path,
            cipher,
            lock: Mutex::new(()),
        };

        if !store.path.exists() {
            store.save(&StoreData::default())?;
        }

        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the whole store. Missing, empty, corrupt or undecryptable files
    /// all come back as an empty store.
    pub fn load(&self) -> StoreData {
        let blob = match fs::read(&self.path) {
            Ok(blob) => blob,
            Err(e) => {
                if e.kind() != std::io::ErrorKind::NotFound {
                    tracing::warn!(path = %self.path.display(), error = %e, "could not read store");
                }
                return StoreData::default();
            }
        };

        if blob.is_empty() {
            return StoreData::default();
        }

        match self.open_blob(&blob) {
            Ok(data) => data,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "store unreadable, starting empty");
                StoreData::default()
            }
        }
    }

    /// Replaces the whole store with `data`.
    pub fn save(&self, data: &StoreData) -> Result<(), Error> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        self.write(data)
    }

    pub fn history(&self, user_id: &str) -> Vec<Exchange> {
        self.load()
            .users
            .remove(user_id)
            .map(|record| record.history)
            .unwrap_or_default()
    }

    pub fn users(&self) -> Vec<String> {
        self.load().users.into_keys().collect()
    }

    /// Appends `exchange` to the user's history, creating the user if needed.
    /// The new snapshot is on disk when this returns.
    pub fn add_message(&self, user_id: &str, exchange: Exchange) -> Result<(), Error> {
        self.update(|data| {
            data.users
                .entry(user_id.to_string())
                .or_default()
                .history
                .push(exchange);
            true
        })
        .map(|_| ())
    }

    /// Empties one user's history. Returns false (and writes nothing) for an
    /// unknown user.
    pub fn clear_user(&self, user_id: &str) -> Result<bool, Error> {
        self.update(|data| match data.users.get_mut(user_id) {
            Some(record) => {
                record.history.clear();
                true
            }
            None => false,
        })
    }

    pub fn clear_all(&self) -> Result<(), Error> {
        self.save(&StoreData::default())
    }

    // read-modify-write under the lock; `change` says whether to write back
    fn update<F>(&self, change: F) -> Result<bool, Error>
    where
        F: FnOnce(&mut StoreData) -> bool,
    {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut data = self.load();
        if !change(&mut data) {
            return Ok(false);
        }
        self.write(&data)?;
        Ok(true)
    }

    fn open_blob(&self, blob: &[u8]) -> Result<StoreData, Error> {
        let plaintext = self.cipher.decrypt(blob)?;
        Ok(serde_json::from_slice(&plaintext)?)
    }

    // seal into a temp file next to the store, then rename over it
    fn write(&self, data: &StoreData) -> Result<(), Error> {
        let json = serde_json::to_vec(data)?;
        let sealed = self.cipher.encrypt(&json)?;

        let dir = parent_dir(&self.path).unwrap_or(Path::new("."));
        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        tmp.write_all(&sealed)?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path)
            .map_err(|e| Error::Storage(format!("could not replace {}: {}", self.path.display(), e.error)))?;

        Ok(())
    }
}

fn parent_dir(path: &Path) -> Option<&Path> {
    path.parent().filter(|p| !p.as_os_str().is_empty())
}
