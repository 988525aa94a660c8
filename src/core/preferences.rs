use std::error::Error as StdError;
use std::fmt;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::core::constants::{DEFAULT_MODEL, DEFAULT_TEMPERATURE};

/// A model the settings overlay offers. The store itself never checks
/// identifiers against this list; anything the user names is forwarded to the
/// gateway verbatim.
pub struct ModelOption {
    pub id: &'static str,
    pub label: &'static str,
}

pub const MODEL_CATALOG: &[ModelOption] = &[
    ModelOption {
        id: "claude-3.7-sonnet",
        label: "Claude 3.7 Sonnet",
    },
    ModelOption {
        id: "gpt-4",
        label: "GPT-4",
    },
    ModelOption {
        id: "gpt-4o",
        label: "GPT-4o",
    },
    ModelOption {
        id: "gpt-4o-mini",
        label: "GPT-4o Mini",
    },
    ModelOption {
        id: "o1",
        label: "o1",
    },
    ModelOption {
        id: "o1-mini",
        label: "o1-mini",
    },
    ModelOption {
        id: "o1-preview",
        label: "o1-preview",
    },
    ModelOption {
        id: "o3-mini",
        label: "o3-mini",
    },
];

/// The two persisted user preferences. Values are not validated; both go to
/// the wire exactly as stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preferences {
    pub model: String,
    pub temperature: f64,
}

impl Default for Preferences {
    fn default() -> Self {
        Preferences {
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
        }
    }
}

/// Errors that can occur when loading preferences from disk.
#[derive(Debug)]
pub enum StoreError {
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Read { path, source } => {
                write!(
                    f,
                    "Failed to read preferences at {}: {}",
                    path.display(),
                    source
                )
            }
            StoreError::Parse { path, source } => {
                write!(
                    f,
                    "Failed to parse preferences at {}: {}",
                    path.display(),
                    source
                )
            }
        }
    }
}

impl StdError for StoreError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            StoreError::Read { source, .. } => Some(source),
            StoreError::Parse { source, .. } => Some(source),
        }
    }
}

impl Preferences {
    pub fn load_from_path(path: &Path) -> Result<Preferences, StoreError> {
        if path.exists() {
            let contents = fs::read_to_string(path).map_err(|source| StoreError::Read {
                path: path.to_path_buf(),
                source,
            })?;
            let preferences =
                serde_json::from_str(&contents).map_err(|source| StoreError::Parse {
                    path: path.to_path_buf(),
                    source,
                })?;
            Ok(preferences)
        } else {
            Ok(Preferences::default())
        }
    }

    fn save_to_path(&self, path: &Path) -> Result<(), Box<dyn StdError>> {
        let parent = path.parent().filter(|dir| !dir.as_os_str().is_empty());

        if let Some(dir) = parent {
            fs::create_dir_all(dir)?;
        }

        let contents = serde_json::to_string_pretty(self)?;
        let mut temp_file = match parent {
            Some(dir) => NamedTempFile::new_in(dir)?,
            None => NamedTempFile::new()?,
        };

        temp_file.write_all(contents.as_bytes())?;
        temp_file.as_file_mut().sync_all()?;
        temp_file
            .persist(path)
            .map_err(|err| -> Box<dyn StdError> { Box::new(err) })?;
        Ok(())
    }
}

/// Owns the persisted preferences and fans out changes to subscribers.
///
/// Loading is forgiving: a missing or unreadable file silently becomes the
/// defaults. Writing is eager: every `set` rewrites the whole document
/// atomically, and a failed write is logged but never surfaced to the caller.
pub struct PreferenceStore {
    path: PathBuf,
    tx: watch::Sender<Preferences>,
}

impl PreferenceStore {
    /// Opens the store at the platform config location.
    pub fn open() -> Self {
        Self::open_at(default_preferences_path())
    }

    pub fn open_at(path: PathBuf) -> Self {
        let preferences = match Preferences::load_from_path(&path) {
            Ok(preferences) => preferences,
            Err(err) => {
                debug!(error = %err, "falling back to default preferences");
                Preferences::default()
            }
        };
        let (tx, _rx) = watch::channel(preferences);
        PreferenceStore { path, tx }
    }

    pub fn get(&self) -> Preferences {
        self.tx.borrow().clone()
    }

    pub fn set(&self, next: Preferences) {
        if let Err(err) = next.save_to_path(&self.path) {
            warn!(path = %self.path.display(), error = %err, "failed to persist preferences");
        }
        self.tx.send_replace(next);
    }

    pub fn subscribe(&self) -> watch::Receiver<Preferences> {
        self.tx.subscribe()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn default_preferences_path() -> PathBuf {
    let proj_dirs = ProjectDirs::from("org", "causerie", "causerie")
        .expect("Failed to determine config directory");
    proj_dirs.config_dir().join("preferences.json")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn custom() -> Preferences {
        Preferences {
            model: "gpt-4o".to_string(),
            temperature: 0.7,
        }
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempdir().unwrap();
        let store = PreferenceStore::open_at(dir.path().join("preferences.json"));
        assert_eq!(store.get(), Preferences::default());
        assert_eq!(store.get().model, "claude-3.7-sonnet");
        assert_eq!(store.get().temperature, 0.3);
    }

    #[test]
    fn corrupt_file_yields_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("preferences.json");
        fs::write(&path, "{not json at all").unwrap();

        let store = PreferenceStore::open_at(path);
        assert_eq!(store.get(), Preferences::default());
    }

    #[test]
    fn partial_document_yields_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("preferences.json");
        fs::write(&path, r#"{"model":"gpt-4"}"#).unwrap();

        let store = PreferenceStore::open_at(path);
        assert_eq!(store.get(), Preferences::default());
    }

    #[test]
    fn unknown_fields_are_ignored_on_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("preferences.json");
        fs::write(
            &path,
            r#"{"model":"gpt-4","temperature":0.9,"theme":"dark"}"#,
        )
        .unwrap();

        let store = PreferenceStore::open_at(path);
        assert_eq!(store.get().model, "gpt-4");
        assert_eq!(store.get().temperature, 0.9);
    }

    #[test]
    fn set_takes_effect_immediately() {
        let dir = tempdir().unwrap();
        let store = PreferenceStore::open_at(dir.path().join("preferences.json"));

        store.set(custom());
        assert_eq!(store.get(), custom());
    }

    #[test]
    fn set_persists_across_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("preferences.json");

        let store = PreferenceStore::open_at(path.clone());
        store.set(custom());
        drop(store);

        let reopened = PreferenceStore::open_at(path);
        assert_eq!(reopened.get(), custom());
    }

    #[test]
    fn set_creates_missing_parent_directories() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("deeper").join("prefs.json");

        let store = PreferenceStore::open_at(path.clone());
        store.set(custom());

        assert!(path.exists());
        assert_eq!(PreferenceStore::open_at(path).get(), custom());
    }

    #[test]
    fn later_set_overwrites_earlier_one() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("preferences.json");

        let store = PreferenceStore::open_at(path.clone());
        store.set(custom());
        store.set(Preferences {
            model: "o1-mini".to_string(),
            temperature: 0.1,
        });
        drop(store);

        let reopened = PreferenceStore::open_at(path);
        assert_eq!(reopened.get().model, "o1-mini");
        assert_eq!(reopened.get().temperature, 0.1);
    }

    #[test]
    fn unvalidated_values_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("preferences.json");
        let odd = Preferences {
            model: "my-homegrown-llm".to_string(),
            temperature: 7.2,
        };

        let store = PreferenceStore::open_at(path.clone());
        store.set(odd.clone());
        drop(store);

        assert_eq!(PreferenceStore::open_at(path).get(), odd);
    }

    #[test]
    fn stored_document_is_a_flat_json_object() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("preferences.json");

        let store = PreferenceStore::open_at(path.clone());
        store.set(custom());

        let raw = fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["model"], "gpt-4o");
        assert_eq!(value["temperature"], 0.7);
    }

    #[test]
    fn subscribers_are_notified_on_set() {
        let dir = tempdir().unwrap();
        let store = PreferenceStore::open_at(dir.path().join("preferences.json"));
        let mut rx = store.subscribe();

        assert!(!rx.has_changed().unwrap());
        store.set(custom());
        assert!(rx.has_changed().unwrap());
        assert_eq!(*rx.borrow_and_update(), custom());
    }

    #[test]
    fn catalog_contains_the_default_model() {
        assert!(MODEL_CATALOG
            .iter()
            .any(|option| option.id == DEFAULT_MODEL));
    }
}
