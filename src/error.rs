use thiserror::Error;

/// Convenience alias for results produced by the `try_*` operations
pub type TableResult<T> = Result<T, TableError>;

/// Contract violations raised by table operations
///
/// The panicking operations (`add_row`, `get_row`, ...) panic with the
/// `Display` text of one of these variants. The `try_*` operations return
/// them instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableError {
    /// A row with this key already exists for the value type
    #[error("duplicate key {key} in {value_type} table")]
    DuplicateKey { key: String, value_type: &'static str },

    /// No row with this key exists for the value type
    #[error("key {key} not found in {value_type} table")]
    KeyNotFound { key: String, value_type: &'static str },

    /// No sub-table has been created for the value type yet
    #[error("no table exists for value type {value_type}")]
    TableNotFound { value_type: &'static str },

    /// Stored data could not be recovered as the requested value type
    ///
    /// Signals a broken internal invariant: sub-tables are keyed by the
    /// `TypeId` of their value type, so the public API never returns this.
    #[error("stored value is not a {value_type}")]
    TypeMismatch { value_type: &'static str },
}
