use crate::error::{TableError, TableResult};
use ahash::HashMap;
use std::any::type_name;
use std::collections::hash_map::Entry;
use std::fmt::{self, Debug};
use std::hash::Hash;

/// A keyed table holding values of a single type
///
/// `Table` is the storage behind every sub-table of a
/// [`HeterogeneousTable`](crate::HeterogeneousTable), but it is usable on its
/// own. Each value lives in its own heap allocation, so the address of a
/// stored value does not change when other rows are inserted or removed.
///
/// Inserting an existing key and looking up a missing key are programming
/// errors and panic. Use [`Table::try_insert`] and [`Table::try_get`] when the
/// caller wants to inspect the failure instead.
///
/// # Examples
///
/// ```
/// use sovran_typetable::Table;
///
/// let mut scores = Table::<u32, i64>::new();
/// scores.insert(1, 10);
/// *scores.insert_default(2) += 5;
///
/// assert_eq!(*scores.get(&1), 10);
/// assert_eq!(*scores.get(&2), 5);
/// assert!(!scores.contains_key(&3));
///
/// let mut total = 0;
/// scores.scan(|_, value| total += *value);
/// assert_eq!(total, 15);
/// ```
pub struct Table<K, V> {
    rows: HashMap<K, Box<V>>,
}

impl<K, V> Table<K, V>
where
    K: Eq + Hash + Debug,
{
    /// Creates a new, empty table
    pub fn new() -> Self {
        Self {
            rows: HashMap::default(),
        }
    }

    /// Creates an empty table with room for at least `capacity` rows
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            rows: HashMap::with_capacity_and_hasher(capacity, Default::default()),
        }
    }

    /// Inserts a default-constructed value under `key`
    ///
    /// # Panics
    ///
    /// Panics if a row with `key` already exists.
    pub fn insert_default(&mut self, key: K) -> &mut V
    where
        V: Default,
    {
        self.insert(key, V::default())
    }

    /// Moves `value` into the table under `key` and returns a reference to
    /// the stored value
    ///
    /// # Panics
    ///
    /// Panics if a row with `key` already exists. Existing rows are never
    /// overwritten; remove the row first if replacement is intended.
    pub fn insert(&mut self, key: K, value: V) -> &mut V {
        self.try_insert(key, value).unwrap_or_else(|err| panic!("{err}"))
    }

    /// Like [`Table::insert`], but reports a duplicate key as an error
    ///
    /// On failure `value` is dropped and the existing row is left untouched.
    ///
    /// # Errors
    ///
    /// Returns `TableError::DuplicateKey` if a row with `key` already exists.
    pub fn try_insert(&mut self, key: K, value: V) -> TableResult<&mut V> {
        match self.rows.entry(key) {
            Entry::Occupied(entry) => Err(TableError::DuplicateKey {
                key: format!("{:?}", entry.key()),
                value_type: type_name::<V>(),
            }),
            Entry::Vacant(entry) => {
                tracing::trace!(key = ?entry.key(), value_type = type_name::<V>(), "insert row");
                Ok(&mut **entry.insert(Box::new(value)))
            }
        }
    }

    /// Removes the row for `key`, returning its value if it was present
    pub fn remove(&mut self, key: &K) -> Option<V> {
        self.remove_boxed(key).map(|value| *value)
    }

    /// Returns a reference to the value stored under `key`
    ///
    /// # Panics
    ///
    /// Panics if no row with `key` exists.
    pub fn get(&self, key: &K) -> &V {
        self.try_get(key).unwrap_or_else(|err| panic!("{err}"))
    }

    /// Returns a mutable reference to the value stored under `key`
    ///
    /// # Panics
    ///
    /// Panics if no row with `key` exists.
    pub fn get_mut(&mut self, key: &K) -> &mut V {
        self.try_get_mut(key).unwrap_or_else(|err| panic!("{err}"))
    }

    /// Like [`Table::get`], but reports a missing key as an error
    ///
    /// # Errors
    ///
    /// Returns `TableError::KeyNotFound` if no row with `key` exists.
    pub fn try_get(&self, key: &K) -> TableResult<&V> {
        match self.rows.get(key) {
            Some(value) => Ok(&**value),
            None => Err(key_not_found::<K, V>(key)),
        }
    }

    /// Like [`Table::get_mut`], but reports a missing key as an error
    ///
    /// # Errors
    ///
    /// Returns `TableError::KeyNotFound` if no row with `key` exists.
    pub fn try_get_mut(&mut self, key: &K) -> TableResult<&mut V> {
        match self.rows.get_mut(key) {
            Some(value) => Ok(&mut **value),
            None => Err(key_not_found::<K, V>(key)),
        }
    }

    /// Returns true if a row with `key` exists
    pub fn contains_key(&self, key: &K) -> bool {
        self.rows.contains_key(key)
    }

    /// Calls `visitor` once for every row, in no particular order
    pub fn scan<F>(&self, mut visitor: F)
    where
        F: FnMut(&K, &V),
    {
        for (key, value) in self.rows() {
            visitor(key, value);
        }
    }

    /// Calls `visitor` once for every row with mutable access to the value
    pub fn scan_mut<F>(&mut self, mut visitor: F)
    where
        F: FnMut(&K, &mut V),
    {
        for (key, value) in self.rows_mut() {
            visitor(key, value);
        }
    }

    /// Returns the number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if the table has no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Returns the number of rows the table can hold without reallocating
    pub fn capacity(&self) -> usize {
        self.rows.capacity()
    }

    // Boxed storage is handed to the erased layer without unboxing.
    pub(crate) fn remove_boxed(&mut self, key: &K) -> Option<Box<V>> {
        let removed = self.rows.remove(key)?;
        tracing::trace!(key = ?key, value_type = type_name::<V>(), "remove row");
        Some(removed)
    }

    pub(crate) fn rows(&self) -> impl Iterator<Item = (&K, &V)> {
        self.rows.iter().map(|(key, value)| (key, &**value))
    }

    pub(crate) fn rows_mut(&mut self) -> impl Iterator<Item = (&K, &mut V)> {
        self.rows.iter_mut().map(|(key, value)| (key, &mut **value))
    }
}

fn key_not_found<K: Debug, V>(key: &K) -> TableError {
    TableError::KeyNotFound {
        key: format!("{:?}", key),
        value_type: type_name::<V>(),
    }
}

impl<K, V> Default for Table<K, V>
where
    K: Eq + Hash + Debug,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> Debug for Table<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Table")
            .field("value_type", &type_name::<V>())
            .field("rows", &self.rows.len())
            .finish()
    }
}
