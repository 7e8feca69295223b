use crate::error::TableError;
use crate::table::Table;
use std::any::{type_name, Any, TypeId};
use std::fmt::Debug;
use std::hash::Hash;
use std::marker::PhantomData;

/// A sub-table viewed without knowledge of its value type
///
/// Every [`Table<K, V>`](Table) implements this trait. The registry only ever
/// holds `Box<dyn ErasedTable<K>>`; operations that need the concrete value
/// type downcast through [`ErasedTable::as_any`] at the call site that names
/// that type.
pub trait ErasedTable<K> {
    /// The `TypeId` of the values stored in this table
    fn value_type_id(&self) -> TypeId;

    /// The name of the value type, for diagnostics
    fn value_type_name(&self) -> &'static str;

    /// The number of rows
    fn len(&self) -> usize;

    /// Returns true if the table has no rows
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns true if a row with `key` exists
    fn contains_row(&self, key: &K) -> bool;

    /// Removes the row for `key`, handing back its boxed value
    fn remove_row(&mut self, key: &K) -> Option<Box<dyn Any>>;

    /// Reports every row to `visitor`
    fn scan(&self, visitor: &mut dyn RowVisitor<K>);

    /// Reports every row to `visitor` with mutable access to the value
    fn scan_mut(&mut self, visitor: &mut dyn RowVisitorMut<K>);

    /// The concrete table, for downcasting to `Table<K, V>`
    fn as_any(&self) -> &dyn Any;

    /// The concrete table, for downcasting to `Table<K, V>`
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Receives rows from [`ErasedTable::scan`]
pub trait RowVisitor<K> {
    /// Called once per row with the key and the type-erased value
    fn visit(&mut self, key: &K, value: &dyn Any);
}

/// Receives rows from [`ErasedTable::scan_mut`]
pub trait RowVisitorMut<K> {
    /// Called once per row with the key and the mutable type-erased value
    fn visit(&mut self, key: &K, value: &mut dyn Any);
}

impl<K, V> ErasedTable<K> for Table<K, V>
where
    K: Eq + Hash + Debug + 'static,
    V: 'static,
{
    fn value_type_id(&self) -> TypeId {
        TypeId::of::<V>()
    }

    fn value_type_name(&self) -> &'static str {
        type_name::<V>()
    }

    fn len(&self) -> usize {
        Table::len(self)
    }

    fn contains_row(&self, key: &K) -> bool {
        self.contains_key(key)
    }

    fn remove_row(&mut self, key: &K) -> Option<Box<dyn Any>> {
        self.remove_boxed(key).map(|value| value as Box<dyn Any>)
    }

    fn scan(&self, visitor: &mut dyn RowVisitor<K>) {
        for (key, value) in self.rows() {
            visitor.visit(key, value);
        }
    }

    fn scan_mut(&mut self, visitor: &mut dyn RowVisitorMut<K>) {
        for (key, value) in self.rows_mut() {
            visitor.visit(key, value);
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Adapts a typed closure `FnMut(&K, &V)` to the erased [`RowVisitor`]
pub(crate) struct TypedVisitor<F, V> {
    visitor: F,
    _value: PhantomData<fn(&V)>,
}

impl<F, V> TypedVisitor<F, V> {
    pub(crate) fn new(visitor: F) -> Self {
        Self {
            visitor,
            _value: PhantomData,
        }
    }
}

impl<K, V, F> RowVisitor<K> for TypedVisitor<F, V>
where
    V: 'static,
    F: FnMut(&K, &V),
{
    fn visit(&mut self, key: &K, value: &dyn Any) {
        match value.downcast_ref::<V>() {
            Some(value) => (self.visitor)(key, value),
            None => panic!("{}", mismatch::<V>()),
        }
    }
}

/// Adapts a typed closure `FnMut(&K, &mut V)` to the erased [`RowVisitorMut`]
pub(crate) struct TypedVisitorMut<F, V> {
    visitor: F,
    _value: PhantomData<fn(&mut V)>,
}

impl<F, V> TypedVisitorMut<F, V> {
    pub(crate) fn new(visitor: F) -> Self {
        Self {
            visitor,
            _value: PhantomData,
        }
    }
}

impl<K, V, F> RowVisitorMut<K> for TypedVisitorMut<F, V>
where
    V: 'static,
    F: FnMut(&K, &mut V),
{
    fn visit(&mut self, key: &K, value: &mut dyn Any) {
        match value.downcast_mut::<V>() {
            Some(value) => (self.visitor)(key, value),
            None => panic!("{}", mismatch::<V>()),
        }
    }
}

pub(crate) fn mismatch<V>() -> TableError {
    TableError::TypeMismatch {
        value_type: type_name::<V>(),
    }
}
