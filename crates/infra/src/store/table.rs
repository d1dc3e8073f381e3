use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use depot_core::Entity;

use crate::error::StoreError;

/// In-memory collection of entities keyed by a storage-assigned integer id.
///
/// Ids start at 1 and are never reused. Iteration follows id order, which is also
/// insertion order. Each table owns its own lock, so readers of one collection never
/// wait on writers of another.
#[derive(Debug)]
pub struct Table<E> {
    name: &'static str,
    inner: RwLock<Rows<E>>,
}

#[derive(Debug)]
struct Rows<E> {
    rows: BTreeMap<i64, E>,
    next_id: i64,
}

impl<E> Table<E>
where
    E: Entity + Clone,
{
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            inner: RwLock::new(Rows {
                rows: BTreeMap::new(),
                next_id: 1,
            }),
        }
    }

    pub fn all(&self) -> Result<Vec<E>, StoreError> {
        Ok(self.read()?.rows.values().cloned().collect())
    }

    pub fn get(&self, id: E::Id) -> Result<Option<E>, StoreError> {
        let key: i64 = id.into();
        Ok(self.read()?.rows.get(&key).cloned())
    }

    pub fn find(&self, pred: impl Fn(&E) -> bool) -> Result<Vec<E>, StoreError> {
        Ok(self
            .read()?
            .rows
            .values()
            .filter(|row| pred(row))
            .cloned()
            .collect())
    }

    /// Store a new row under the next free id and return it with that id.
    pub fn insert(&self, mut row: E) -> Result<E, StoreError> {
        let mut inner = self.write()?;
        let id = inner.next_id;
        inner.next_id += 1;
        row.assign_id(E::Id::from(id));
        inner.rows.insert(id, row.clone());
        Ok(row)
    }

    /// Store a row under the id it already carries (seed data, restores).
    ///
    /// Later auto-assigned ids continue above the highest id seen.
    pub fn insert_with_id(&self, row: E) -> Result<E, StoreError> {
        let mut inner = self.write()?;
        let id: i64 = row.id().into();
        inner.next_id = inner.next_id.max(id + 1);
        inner.rows.insert(id, row.clone());
        Ok(row)
    }

    /// Mutate one row in place.
    ///
    /// `f` works on a copy; the row is only replaced when `f` succeeds, so a failed
    /// mutation leaves the stored row untouched. Returns `Ok(None)` if the id is absent.
    pub fn update<T, Er>(
        &self,
        id: E::Id,
        f: impl FnOnce(&mut E) -> Result<T, Er>,
    ) -> Result<Option<T>, Er>
    where
        Er: From<StoreError>,
    {
        let mut inner = self.write()?;
        let key: i64 = id.into();
        let Some(current) = inner.rows.get(&key) else {
            return Ok(None);
        };

        let mut working = current.clone();
        let out = f(&mut working)?;
        inner.rows.insert(key, working);
        Ok(Some(out))
    }

    /// Remove one row after `before` has accepted it.
    ///
    /// `before` runs under the write lock, so nothing can change the row between the
    /// check and the removal. Returns `Ok(None)` if the id is absent.
    pub fn remove_with<T, Er>(
        &self,
        id: E::Id,
        before: impl FnOnce(&E) -> Result<T, Er>,
    ) -> Result<Option<T>, Er>
    where
        Er: From<StoreError>,
    {
        let mut inner = self.write()?;
        let key: i64 = id.into();
        let Some(current) = inner.rows.get(&key) else {
            return Ok(None);
        };

        let out = before(current)?;
        inner.rows.remove(&key);
        Ok(Some(out))
    }

    /// Run a multi-row write against a staged view of the table.
    ///
    /// Rows touched through [`Staged`] are copied into an overlay. The overlay is written
    /// back only if `f` returns `Ok`; on `Err` the table is left exactly as it was.
    /// The table's write lock is held for the whole call.
    pub fn stage<T, Er>(&self, f: impl FnOnce(&mut Staged<'_, E>) -> Result<T, Er>) -> Result<T, Er>
    where
        Er: From<StoreError>,
    {
        let mut inner = self.write()?;
        let (out, overlay, next_id) = {
            let mut staged = Staged {
                table: self.name,
                committed: &inner.rows,
                overlay: BTreeMap::new(),
                next_id: inner.next_id,
            };
            let out = f(&mut staged)?;
            (out, staged.overlay, staged.next_id)
        };

        inner.rows.extend(overlay);
        inner.next_id = next_id;
        Ok(out)
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Rows<E>>, StoreError> {
        self.inner.read().map_err(|_| StoreError::Poisoned(self.name))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Rows<E>>, StoreError> {
        self.inner.write().map_err(|_| StoreError::Poisoned(self.name))
    }
}

/// Copy-on-write view of a [`Table`] used by [`Table::stage`].
pub struct Staged<'a, E> {
    table: &'static str,
    committed: &'a BTreeMap<i64, E>,
    overlay: BTreeMap<i64, E>,
    next_id: i64,
}

impl<E> Staged<'_, E>
where
    E: Entity + Clone,
{
    /// Id of the first row (in id order) matching `pred`, staged rows included.
    ///
    /// Staged-only rows always carry ids above every committed row, so committed rows
    /// are visited first.
    pub fn position(&self, pred: impl Fn(&E) -> bool) -> Option<E::Id> {
        let committed = self
            .committed
            .iter()
            .map(|(key, row)| (key, self.overlay.get(key).unwrap_or(row)));
        let staged_only = self
            .overlay
            .iter()
            .filter(|(key, _)| !self.committed.contains_key(*key));

        committed
            .chain(staged_only)
            .find(|(_, row)| pred(row))
            .map(|(key, _)| E::Id::from(*key))
    }

    pub fn get(&self, id: E::Id) -> Option<&E> {
        self.row(id.into())
    }

    /// Mutable access to a row, copying it into the overlay on first touch.
    pub fn get_mut(&mut self, id: E::Id) -> Result<&mut E, StoreError> {
        let key: i64 = id.into();
        if !self.overlay.contains_key(&key) {
            let row = self.committed.get(&key).cloned().ok_or(StoreError::MissingRow {
                table: self.table,
                id: key,
            })?;
            self.overlay.insert(key, row);
        }

        self.overlay.get_mut(&key).ok_or(StoreError::MissingRow {
            table: self.table,
            id: key,
        })
    }

    /// Stage a new row under the next free id.
    pub fn insert(&mut self, mut row: E) -> E::Id {
        let key = self.next_id;
        self.next_id += 1;
        let id = E::Id::from(key);
        row.assign_id(id);
        self.overlay.insert(key, row);
        id
    }

    fn row(&self, key: i64) -> Option<&E> {
        self.overlay.get(&key).or_else(|| self.committed.get(&key))
    }
}
