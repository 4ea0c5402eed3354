use std::{
    collections::HashMap,
    fs,
    path::{
        Path,
        PathBuf,
    },
    sync::Mutex,
};

use serde::{
    Deserialize,
    Serialize,
};

use crate::core::UtsushiError;

const APP_NAME: &str = "utsushi";
const STORAGE_FILE: &str = "storage.json";

pub fn get_app_data_dir() -> PathBuf {
    if let Some(data_dir) = dirs::data_local_dir() {
        let app_dir = data_dir.join(APP_NAME);
        let _ = fs::create_dir_all(&app_dir);
        app_dir
    } else {
        PathBuf::from(".")
    }
}

pub fn get_data_file_path(filename: &str) -> PathBuf {
    get_app_data_dir().join(filename)
}

pub fn save_json<T: Serialize>(data: &T, path: &Path) -> Result<(), UtsushiError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(data)?;
    fs::write(path, json)?;
    tracing::debug!(path = %path.display(), "Data saved");
    Ok(())
}

pub fn load_json<T: for<'de> Deserialize<'de> + Default>(path: &Path) -> Result<T, UtsushiError> {
    if !path.exists() {
        return Ok(T::default());
    }

    let json = fs::read_to_string(path)?;
    let data: T = serde_json::from_str(&json)?;
    tracing::debug!(path = %path.display(), "Data loaded");
    Ok(data)
}

pub fn load_json_or_default<T: for<'de> Deserialize<'de> + Default>(path: &Path) -> T {
    match load_json::<T>(path) {
        Ok(data) => data,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Failed to load, using defaults");
            T::default()
        }
    }
}

/// Durable string key-value storage.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<(), UtsushiError>;
}

/// Map persisted as one JSON object; every `set` rewrites the file.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    entries: Mutex<HashMap<String, String>>,
}

impl JsonFileStore {
    pub fn open(path: PathBuf) -> Self {
        let entries: HashMap<String, String> = load_json_or_default(&path);
        Self { path, entries: Mutex::new(entries) }
    }

    pub fn open_default() -> Self {
        Self::open(get_data_file_path(STORAGE_FILE))
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Option<String> {
        let entries = self.entries.lock().ok()?;
        entries.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), UtsushiError> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| UtsushiError::Custom("Storage lock poisoned".to_string()))?;
        entries.insert(key.to_string(), value.to_string());
        save_json(&*entries, &self.path)
    }
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().ok()?.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), UtsushiError> {
        self.entries
            .lock()
            .map_err(|_| UtsushiError::Custom("Storage lock poisoned".to_string()))?
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}
