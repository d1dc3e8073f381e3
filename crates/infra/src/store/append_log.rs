use std::sync::RwLock;

use crate::error::StoreError;

/// Insert-only sequence of records (archives, audit history).
///
/// Entries are never updated or removed once appended.
#[derive(Debug)]
pub struct AppendLog<T> {
    name: &'static str,
    entries: RwLock<Vec<T>>,
}

impl<T: Clone> AppendLog<T> {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            entries: RwLock::new(Vec::new()),
        }
    }

    pub fn append(&self, entry: T) -> Result<(), StoreError> {
        self.append_with(|_| entry).map(|_| ())
    }

    /// Append the entry built by `build`, which receives the 1-based position it will occupy.
    pub fn append_with(&self, build: impl FnOnce(u64) -> T) -> Result<T, StoreError> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| StoreError::Poisoned(self.name))?;
        let entry = build(entries.len() as u64 + 1);
        entries.push(entry.clone());
        Ok(entry)
    }

    pub fn all(&self) -> Result<Vec<T>, StoreError> {
        self.filter(|_| true)
    }

    pub fn filter(&self, pred: impl Fn(&T) -> bool) -> Result<Vec<T>, StoreError> {
        let entries = self
            .entries
            .read()
            .map_err(|_| StoreError::Poisoned(self.name))?;
        Ok(entries.iter().filter(|e| pred(e)).cloned().collect())
    }
}
