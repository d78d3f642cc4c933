//! A JSON-file key-value store.
//!
//! The file holds a single top-level object. Each key is read and written
//! independently; writes preserve every other key and replace the file
//! atomically via a sibling temp file.

use std::{
    env, io,
    path::{Path, PathBuf},
    sync::Arc,
};

use serde::{Serialize, de::DeserializeOwned};
use serde_json::{Map, Value};
use tokio::{fs, sync::Mutex};
use tracing::{debug, trace};

use crate::{Error, Result};

/// File name of the persisted store.
pub const DEFAULT_STORE_FILE: &str = ".app_storage.json";

/// Environment variable overriding the store location.
pub const STORE_ENV: &str = "HOTKEYS_STORE";

/// Resolve the store path: `$HOTKEYS_STORE`, else `~/.hotkeys/.app_storage.json`.
pub fn default_store_path() -> PathBuf {
    if let Some(p) = env::var_os(STORE_ENV) {
        return PathBuf::from(p);
    }
    let mut p = PathBuf::from(env::var_os("HOME").unwrap_or_default());
    p.push(".hotkeys");
    p.push(DEFAULT_STORE_FILE);
    p
}

/// Handle to a JSON key-value file. Clones share the same write lock.
#[derive(Debug, Clone)]
pub struct JsonStore {
    /// Location of the backing file.
    path: PathBuf,
    /// Serializes read-modify-write cycles from this process.
    lock: Arc<Mutex<()>>,
}

impl JsonStore {
    /// Open (lazily) the store at `path`. The file need not exist yet.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Arc::new(Mutex::new(())),
        }
    }

    /// Location of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the value stored under `key`. Missing file, missing key and
    /// `null` all read as `None`.
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let mut entries = self.read_entries().await?;
        match entries.remove(key) {
            None | Some(Value::Null) => Ok(None),
            Some(v) => Ok(Some(serde_json::from_value(v)?)),
        }
    }

    /// Store `value` under `key`, replacing any prior value.
    pub async fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let _guard = self.lock.lock().await;
        let mut entries = self.read_entries().await?;
        entries.insert(key.to_string(), serde_json::to_value(value)?);
        self.write_entries(&entries).await
    }

    /// Remove `key`. Returns whether it was present.
    pub async fn remove(&self, key: &str) -> Result<bool> {
        let _guard = self.lock.lock().await;
        let mut entries = self.read_entries().await?;
        if entries.remove(key).is_none() {
            return Ok(false);
        }
        self.write_entries(&entries).await?;
        Ok(true)
    }

    async fn read_entries(&self) -> Result<Map<String, Value>> {
        let bytes = match fs::read(&self.path).await {
            Ok(b) => b,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                trace!(path = %self.path.display(), "store file absent");
                return Ok(Map::new());
            }
            Err(e) => return Err(e.into()),
        };
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Map::new());
        }
        match serde_json::from_slice::<Value>(&bytes)? {
            Value::Object(map) => Ok(map),
            _ => Err(Error::Backend(format!(
                "{} does not hold a JSON object",
                self.path.display()
            ))),
        }
    }

    async fn write_entries(&self, entries: &Map<String, Value>) -> Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).await?;
        }
        let body = serde_json::to_vec_pretty(entries)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, body).await?;
        fs::rename(&tmp, &self.path).await?;
        debug!(path = %self.path.display(), keys = entries.len(), "store written");
        Ok(())
    }
}
