use crate::erased::{mismatch, ErasedTable, TypedVisitor, TypedVisitorMut};
use crate::error::{TableError, TableResult};
use crate::table::Table;
use ahash::HashMap;
use std::any::{type_name, TypeId};
use std::fmt::{self, Debug};
use std::hash::Hash;

/// A keyed table that stores rows of any number of value types
///
/// `HeterogeneousTable` keeps one [`Table<K, T>`](Table) per value type `T`,
/// created the first time an operation names `T`. Rows of different value
/// types never interact, even when they share a key.
///
/// The value type is always chosen at the call site, either through a
/// turbofish or by inference from the value passed in. Adding a row under a key
/// that already exists for that type, or reading a row that does not exist,
/// is a programming error and panics. The `try_*` variants return a
/// [`TableError`] instead.
///
/// # Examples
///
/// ```
/// use sovran_typetable::HeterogeneousTable;
///
/// let mut db = HeterogeneousTable::<usize>::new();
///
/// db.add_row(0, -3.33f32);
/// db.add_row(0, "test".to_string());
///
/// assert_eq!(*db.get_row::<f32>(&0), -3.33);
/// assert_eq!(db.get_row::<String>(&0), "test");
///
/// db.remove_row::<f32>(&0);
/// assert!(!db.has_row::<f32>(&0));
/// assert!(db.has_row::<String>(&0));
/// ```
pub struct HeterogeneousTable<K> {
    tables: HashMap<TypeId, Box<dyn ErasedTable<K>>>,
    row_capacity: usize,
}

impl<K> HeterogeneousTable<K>
where
    K: Eq + Hash + Debug + 'static,
{
    /// Creates a new, empty table
    pub fn new() -> Self {
        Self {
            tables: HashMap::default(),
            row_capacity: 0,
        }
    }

    /// Creates an empty table with room for `types` sub-tables
    pub fn with_capacity(types: usize) -> Self {
        Self {
            tables: HashMap::with_capacity_and_hasher(types, Default::default()),
            row_capacity: 0,
        }
    }

    /// Sets the initial row capacity of every sub-table created from now on
    ///
    /// # Examples
    ///
    /// ```
    /// use sovran_typetable::HeterogeneousTable;
    ///
    /// let mut db = HeterogeneousTable::<u64>::with_capacity(4).with_row_capacity(1024);
    /// db.add_row(1, 1.5f64);
    /// assert_eq!(db.row_count::<f64>(), 1);
    /// ```
    pub fn with_row_capacity(mut self, rows: usize) -> Self {
        self.row_capacity = rows;
        self
    }

    /// Adds a row holding `T::default()` under `key`
    ///
    /// Creates the sub-table for `T` if this is the first time `T` is used.
    ///
    /// # Panics
    ///
    /// Panics if a `T` row with `key` already exists.
    pub fn add_default_row<T>(&mut self, key: K) -> &mut T
    where
        T: Default + 'static,
    {
        self.add_row(key, T::default())
    }

    /// Moves `value` into the `T` sub-table under `key`
    ///
    /// Creates the sub-table for `T` if this is the first time `T` is used.
    /// The returned reference points at the stored value, which stays at the
    /// same address until the row is removed.
    ///
    /// # Panics
    ///
    /// Panics if a `T` row with `key` already exists. Rows are never
    /// overwritten; call [`HeterogeneousTable::remove_row`] first if
    /// replacement is intended.
    pub fn add_row<T: 'static>(&mut self, key: K, value: T) -> &mut T {
        self.try_add_row(key, value).unwrap_or_else(|err| panic!("{err}"))
    }

    /// Like [`HeterogeneousTable::add_row`], but reports a duplicate key as an
    /// error
    ///
    /// # Errors
    ///
    /// Returns `TableError::DuplicateKey` if a `T` row with `key` already
    /// exists. `value` is dropped in that case.
    pub fn try_add_row<T: 'static>(&mut self, key: K, value: T) -> TableResult<&mut T> {
        self.table_or_create::<T>()
            .as_any_mut()
            .downcast_mut::<Table<K, T>>()
            .ok_or_else(mismatch::<T>)?
            .try_insert(key, value)
    }

    /// Removes the `T` row under `key`, returning its value if it existed
    ///
    /// Never creates a sub-table: removing from a type that was never used
    /// returns `None`.
    pub fn remove_row<T: 'static>(&mut self, key: &K) -> Option<T> {
        let removed = self.tables.get_mut(&TypeId::of::<T>())?.remove_row(key)?;
        match removed.downcast::<T>() {
            Ok(value) => Some(*value),
            Err(_) => panic!("{}", mismatch::<T>()),
        }
    }

    /// Returns the `T` row under `key`
    ///
    /// # Panics
    ///
    /// Panics if no `T` row with `key` exists, including when `T` has never
    /// been used with this table.
    pub fn get_row<T: 'static>(&self, key: &K) -> &T {
        self.try_get_row(key).unwrap_or_else(|err| panic!("{err}"))
    }

    /// Returns the `T` row under `key` for modification
    ///
    /// # Panics
    ///
    /// Panics if no `T` row with `key` exists.
    pub fn get_row_mut<T: 'static>(&mut self, key: &K) -> &mut T {
        self.try_get_row_mut(key).unwrap_or_else(|err| panic!("{err}"))
    }

    /// Like [`HeterogeneousTable::get_row`], but reports a missing row as an
    /// error
    ///
    /// # Errors
    ///
    /// - Returns `TableError::TableNotFound` if `T` has never been used
    /// - Returns `TableError::KeyNotFound` if no `T` row with `key` exists
    pub fn try_get_row<T: 'static>(&self, key: &K) -> TableResult<&T> {
        self.tables
            .get(&TypeId::of::<T>())
            .ok_or_else(table_not_found::<T>)?
            .as_any()
            .downcast_ref::<Table<K, T>>()
            .ok_or_else(mismatch::<T>)?
            .try_get(key)
    }

    /// Like [`HeterogeneousTable::get_row_mut`], but reports a missing row as
    /// an error
    ///
    /// # Errors
    ///
    /// - Returns `TableError::TableNotFound` if `T` has never been used
    /// - Returns `TableError::KeyNotFound` if no `T` row with `key` exists
    pub fn try_get_row_mut<T: 'static>(&mut self, key: &K) -> TableResult<&mut T> {
        self.tables
            .get_mut(&TypeId::of::<T>())
            .ok_or_else(table_not_found::<T>)?
            .as_any_mut()
            .downcast_mut::<Table<K, T>>()
            .ok_or_else(mismatch::<T>)?
            .try_get_mut(key)
    }

    /// Returns true if a `T` row with `key` exists
    ///
    /// Never creates a sub-table.
    pub fn has_row<T: 'static>(&self, key: &K) -> bool {
        self.tables
            .get(&TypeId::of::<T>())
            .is_some_and(|table| table.contains_row(key))
    }

    /// Calls `visitor` once for every `T` row, in no particular order
    ///
    /// Creates an empty sub-table for `T` if none exists, in which case
    /// `visitor` is never called.
    ///
    /// # Examples
    ///
    /// ```
    /// use sovran_typetable::HeterogeneousTable;
    ///
    /// let mut db = HeterogeneousTable::<usize>::new();
    /// for i in 0..10 {
    ///     db.add_row::<usize>(i, i);
    /// }
    ///
    /// let mut sum = 0;
    /// db.query::<usize, _>(|key, value| {
    ///     assert_eq!(key, value);
    ///     sum += *value;
    /// });
    /// assert_eq!(sum, 45);
    /// ```
    pub fn query<T, F>(&mut self, visitor: F)
    where
        T: 'static,
        F: FnMut(&K, &T),
    {
        let mut visitor = TypedVisitor::<F, T>::new(visitor);
        self.table_or_create::<T>().scan(&mut visitor);
    }

    /// Calls `visitor` once for every `T` row with mutable access to the value
    ///
    /// Creates an empty sub-table for `T` if none exists.
    pub fn query_mut<T, F>(&mut self, visitor: F)
    where
        T: 'static,
        F: FnMut(&K, &mut T),
    {
        let mut visitor = TypedVisitorMut::<F, T>::new(visitor);
        self.table_or_create::<T>().scan_mut(&mut visitor);
    }

    /// Returns true if a sub-table for `T` has been created
    pub fn has_table<T: 'static>(&self) -> bool {
        self.tables.contains_key(&TypeId::of::<T>())
    }

    /// Returns the number of sub-tables
    pub fn table_count(&self) -> usize {
        self.tables.len()
    }

    /// Returns the number of `T` rows, without creating a sub-table
    pub fn row_count<T: 'static>(&self) -> usize {
        self.tables
            .get(&TypeId::of::<T>())
            .map_or(0, |table| table.len())
    }

    /// Returns the number of rows across all sub-tables
    pub fn total_row_count(&self) -> usize {
        self.tables.values().map(|table| table.len()).sum()
    }

    /// Returns true if no sub-table holds any rows
    pub fn is_empty(&self) -> bool {
        self.tables.values().all(|table| table.is_empty())
    }

    /// Returns the value type names of all sub-tables, in no particular order
    ///
    /// Names come from `std::any::type_name` and are for diagnostics only;
    /// distinct types are not guaranteed to have distinct names.
    pub fn value_type_names(&self) -> Vec<&'static str> {
        self.tables
            .values()
            .map(|table| table.value_type_name())
            .collect()
    }

    fn table_or_create<T: 'static>(&mut self) -> &mut Box<dyn ErasedTable<K>> {
        let row_capacity = self.row_capacity;
        self.tables
            .entry(TypeId::of::<T>())
            .or_insert_with(|| new_table::<K, T>(row_capacity))
    }
}

fn new_table<K, T>(row_capacity: usize) -> Box<dyn ErasedTable<K>>
where
    K: Eq + Hash + Debug + 'static,
    T: 'static,
{
    tracing::debug!(value_type = type_name::<T>(), row_capacity, "creating table");
    Box::new(Table::<K, T>::with_capacity(row_capacity))
}

fn table_not_found<T>() -> TableError {
    TableError::TableNotFound {
        value_type: type_name::<T>(),
    }
}

impl<K> Default for HeterogeneousTable<K>
where
    K: Eq + Hash + Debug + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

/// Lists sub-tables by `type_name`, which is for diagnostics only and may
/// repeat across distinct types.
impl<K> Debug for HeterogeneousTable<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(
                self.tables
                    .values()
                    .map(|table| (table.value_type_name(), table.len())),
            )
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tables_are_created_lazily() {
        let mut db = HeterogeneousTable::<u32>::new();
        assert_eq!(db.table_count(), 0);

        db.add_row(1, 1u8);
        assert!(db.has_table::<u8>());
        assert!(!db.has_table::<u16>());
        assert_eq!(db.table_count(), 1);

        db.add_row(1, 1u16);
        db.add_row(2, 2u16);
        assert_eq!(db.table_count(), 2);
    }

    #[test]
    fn test_lookups_never_create_tables() {
        let mut db = HeterogeneousTable::<u32>::new();

        assert!(!db.has_row::<i64>(&0));
        assert_eq!(db.remove_row::<i64>(&0), None);
        assert_eq!(db.row_count::<i64>(), 0);
        assert!(matches!(
            db.try_get_row::<i64>(&0),
            Err(TableError::TableNotFound { .. })
        ));
        assert!(db.try_get_row_mut::<i64>(&0).is_err());

        assert_eq!(db.table_count(), 0);
    }

    #[test]
    fn test_query_creates_an_empty_table() {
        let mut db = HeterogeneousTable::<u32>::new();

        let mut calls = 0;
        db.query::<String, _>(|_, _| calls += 1);

        assert_eq!(calls, 0);
        assert!(db.has_table::<String>());
        assert_eq!(db.row_count::<String>(), 0);
        assert!(db.is_empty());
    }

    #[test]
    fn test_identity_is_by_declared_type() {
        let mut db = HeterogeneousTable::<u32>::new();

        // Same size and alignment, different types.
        db.add_row(0, 1u32);
        db.add_row(0, 1.0f32);
        db.add_row(0, 1i32);

        assert_eq!(db.table_count(), 3);
        assert_eq!(db.total_row_count(), 3);

        db.remove_row::<u32>(&0);
        assert!(!db.has_row::<u32>(&0));
        assert!(db.has_row::<f32>(&0));
        assert!(db.has_row::<i32>(&0));
    }

    #[test]
    fn test_row_capacity_applies_to_new_tables() {
        fn capacity_of<T: 'static>(db: &HeterogeneousTable<u32>) -> usize {
            db.tables[&TypeId::of::<T>()]
                .as_any()
                .downcast_ref::<Table<u32, T>>()
                .unwrap()
                .capacity()
        }

        let mut plain = HeterogeneousTable::<u32>::new();
        plain.query::<u64, _>(|_, _| {});
        assert_eq!(capacity_of::<u64>(&plain), 0);

        let mut db = HeterogeneousTable::<u32>::with_capacity(2).with_row_capacity(16);
        db.query::<u64, _>(|_, _| {});
        assert!(capacity_of::<u64>(&db) >= 16);

        for key in 0..32 {
            db.add_default_row::<u64>(key);
        }
        assert_eq!(db.row_count::<u64>(), 32);
        assert_eq!(*db.get_row::<u64>(&31), 0);
    }

    #[test]
    fn test_debug_lists_tables() {
        let mut db = HeterogeneousTable::<u32>::new();
        db.add_row(1, true);
        db.add_row(2, false);

        assert_eq!(format!("{:?}", db), "{\"bool\": 2}");
        assert_eq!(db.value_type_names(), vec!["bool"]);
    }
}
