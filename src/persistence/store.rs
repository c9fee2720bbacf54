use super::files::{atomic_write, read_file};
use crate::domain::{Task, TodoFlow};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::marker::PhantomData;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("record has no id")]
    MissingId,
    #[error("record is not a JSON object")]
    NotAnObject,
    #[error("corrupt store file {path}: {source}")]
    Corrupt {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("could not encode record: {0}")]
    Encode(#[from] serde_json::Error),
    #[error(transparent)]
    Io(#[from] anyhow::Error),
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Anything stored by id
pub trait Record {
    fn record_id(&self) -> &str;
}

impl Record for TodoFlow {
    fn record_id(&self) -> &str {
        &self.id
    }
}

impl Record for Task {
    fn record_id(&self) -> &str {
        &self.id
    }
}

/// Keyed persistence for one record type
pub trait Repository<T> {
    /// Merge `item` into the stored record with the same id, or append it.
    /// Returns the record as stored.
    fn upsert(&self, item: &T) -> StoreResult<T>;
    fn get_all(&self) -> StoreResult<Vec<T>>;
    fn get_by_id(&self, id: &str) -> StoreResult<Option<T>>;
    /// Returns whether a record was removed
    fn remove(&self, id: &str) -> StoreResult<bool>;
    fn clear(&self) -> StoreResult<()>;
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreFile {
    #[serde(default)]
    items: Vec<Value>,
}

/// Whole-file JSON store holding `{"items": [...]}`.
/// Upserts merge new fields into the stored object, so fields this version
/// does not know about are kept.
#[derive(Debug, Clone)]
pub struct JsonStore<T> {
    path: PathBuf,
    _record: PhantomData<fn() -> T>,
}

impl<T> JsonStore<T> {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            _record: PhantomData,
        }
    }

    fn load(&self) -> StoreResult<StoreFile> {
        let content = read_file(&self.path)?;
        if content.trim().is_empty() {
            return Ok(StoreFile::default());
        }
        serde_json::from_str(&content).map_err(|source| StoreError::Corrupt {
            path: self.path.clone(),
            source,
        })
    }

    fn save(&self, file: &StoreFile) -> StoreResult<()> {
        let json = serde_json::to_string_pretty(file)?;
        atomic_write(&self.path, &json)?;
        Ok(())
    }
}

fn value_id(value: &Value) -> Option<&str> {
    value.get("id").and_then(Value::as_str)
}

/// Shallow merge: top-level fields of `patch` replace those in `target`
fn merge_into(target: &mut Map<String, Value>, patch: Map<String, Value>) {
    for (key, value) in patch {
        target.insert(key, value);
    }
}

impl<T> Repository<T> for JsonStore<T>
where
    T: Record + Serialize + DeserializeOwned,
{
    fn upsert(&self, item: &T) -> StoreResult<T> {
        let id = item.record_id();
        if id.is_empty() {
            return Err(StoreError::MissingId);
        }
        let Value::Object(patch) = serde_json::to_value(item)? else {
            return Err(StoreError::NotAnObject);
        };

        let mut file = self.load()?;
        let position = file.items.iter().position(|v| value_id(v) == Some(id));
        let stored = match position {
            Some(index) => match &mut file.items[index] {
                Value::Object(target) => {
                    merge_into(target, patch);
                    Value::Object(target.clone())
                }
                other => {
                    *other = Value::Object(patch);
                    other.clone()
                }
            },
            None => {
                let value = Value::Object(patch);
                file.items.push(value.clone());
                value
            }
        };

        self.save(&file)?;
        log::debug!("upserted record {} into {}", id, self.path.display());
        Ok(serde_json::from_value(stored)?)
    }

    fn get_all(&self) -> StoreResult<Vec<T>> {
        let file = self.load()?;
        let mut items = Vec::with_capacity(file.items.len());
        for value in file.items {
            match serde_json::from_value(value) {
                Ok(item) => items.push(item),
                Err(e) => log::warn!("skipping unreadable record in {}: {}", self.path.display(), e),
            }
        }
        Ok(items)
    }

    fn get_by_id(&self, id: &str) -> StoreResult<Option<T>> {
        let file = self.load()?;
        let Some(value) = file.items.into_iter().find(|v| value_id(v) == Some(id)) else {
            return Ok(None);
        };
        Ok(Some(serde_json::from_value(value)?))
    }

    fn remove(&self, id: &str) -> StoreResult<bool> {
        let mut file = self.load()?;
        let before = file.items.len();
        file.items.retain(|v| value_id(v) != Some(id));
        if file.items.len() == before {
            return Ok(false);
        }
        self.save(&file)?;
        Ok(true)
    }

    fn clear(&self) -> StoreResult<()> {
        self.save(&StoreFile::default())
    }
}

#[cfg(test)]
pub mod testing {
    use super::*;
    use std::cell::{Cell, RefCell};

    /// In-memory store that counts writes; optionally fails every call
    #[derive(Debug)]
    pub struct MemoryStore<T> {
        pub items: RefCell<Vec<T>>,
        pub upserts: Cell<usize>,
        pub fail: bool,
    }

    impl<T> Default for MemoryStore<T> {
        fn default() -> Self {
            Self {
                items: RefCell::new(Vec::new()),
                upserts: Cell::new(0),
                fail: false,
            }
        }
    }

    impl<T> MemoryStore<T> {
        pub fn failing() -> Self {
            Self {
                fail: true,
                ..Self::default()
            }
        }

        pub fn upsert_count(&self) -> usize {
            self.upserts.get()
        }

        fn check(&self) -> StoreResult<()> {
            if self.fail {
                return Err(StoreError::Io(anyhow::anyhow!("disk unavailable")));
            }
            Ok(())
        }
    }

    impl<T: Record + Clone> Repository<T> for MemoryStore<T> {
        fn upsert(&self, item: &T) -> StoreResult<T> {
            self.upserts.set(self.upserts.get() + 1);
            self.check()?;
            let mut items = self.items.borrow_mut();
            match items.iter_mut().find(|i| i.record_id() == item.record_id()) {
                Some(existing) => *existing = item.clone(),
                None => items.push(item.clone()),
            }
            Ok(item.clone())
        }

        fn get_all(&self) -> StoreResult<Vec<T>> {
            self.check()?;
            Ok(self.items.borrow().clone())
        }

        fn get_by_id(&self, id: &str) -> StoreResult<Option<T>> {
            self.check()?;
            Ok(self
                .items
                .borrow()
                .iter()
                .find(|i| i.record_id() == id)
                .cloned())
        }

        fn remove(&self, id: &str) -> StoreResult<bool> {
            self.check()?;
            let mut items = self.items.borrow_mut();
            let before = items.len();
            items.retain(|i| i.record_id() != id);
            Ok(items.len() != before)
        }

        fn clear(&self) -> StoreResult<()> {
            self.check()?;
            self.items.borrow_mut().clear();
            Ok(())
        }
    }
}
