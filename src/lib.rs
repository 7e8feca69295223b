//! # sovran-typetable
//!
//! A heterogeneous keyed table: one logical database holding rows of many
//! unrelated value types.
//!
//! `sovran-typetable` stores every value type in its own homogeneous sub-table,
//! created the first time that type is named. All rows share one key type,
//! chosen when the table is created. Each value type is chosen at the call
//! site, so reads and writes are checked by the compiler even though the
//! sub-tables are held behind a type-erased interface.
//!
//! ## Key Features
//!
//! - **Type-safe**: The value type is a generic parameter of every operation
//! - **Lazy**: Sub-tables are created on first use and live as long as the table
//! - **Stable storage**: Each value is boxed, so its address survives inserts
//!   and removals of other rows
//! - **Loud contract violations**: Duplicate inserts and missing lookups panic
//!   instead of silently overwriting or returning a sentinel
//!
//! ## Usage Examples
//!
//! ### Basic Usage
//!
//! ```rust
//! use sovran_typetable::HeterogeneousTable;
//!
//! #[derive(Debug, Default, PartialEq)]
//! struct Position {
//!     x: f32,
//!     y: f32,
//! }
//!
//! let mut db = HeterogeneousTable::<u64>::new();
//!
//! // Different value types can share a key
//! db.add_row(7, "player".to_string());
//! db.add_row(7, Position { x: 1.0, y: 2.0 });
//!
//! // Default-constructed rows can be filled in place
//! let health = db.add_default_row::<u32>(7);
//! *health = 100;
//!
//! assert_eq!(db.get_row::<String>(&7), "player");
//! assert_eq!(db.get_row::<Position>(&7), &Position { x: 1.0, y: 2.0 });
//! assert_eq!(*db.get_row::<u32>(&7), 100);
//!
//! // Types that were never stored simply have no rows
//! assert!(!db.has_row::<bool>(&7));
//! ```
//!
//! ### Querying and Updating Rows
//!
//! ```rust
//! use sovran_typetable::HeterogeneousTable;
//!
//! let mut db = HeterogeneousTable::<u32>::new();
//! for id in 0..5 {
//!     db.add_row(id, id as i64 * 10);
//! }
//!
//! // Modify every i64 row in place
//! db.query_mut::<i64, _>(|_, value| *value += 1);
//!
//! let mut total = 0;
//! db.query::<i64, _>(|_, value| total += *value);
//! assert_eq!(total, 105);
//!
//! // Modify a single row
//! *db.get_row_mut::<i64>(&0) = -1;
//! assert_eq!(db.remove_row::<i64>(&0), Some(-1));
//! ```
//!
//! ### Error Handling
//!
//! The panicking operations treat a duplicate key or a missing row as a bug in
//! the caller. When the caller would rather inspect the failure, the `try_*`
//! variants return a [`TableError`] with the same message:
//!
//! ```rust
//! use sovran_typetable::{HeterogeneousTable, TableError};
//!
//! let mut db = HeterogeneousTable::<String>::new();
//! db.add_row("config".to_string(), vec!["setting1", "setting2"]);
//!
//! match db.try_add_row("config".to_string(), vec!["setting3"]) {
//!     Ok(_) => println!("stored"),
//!     Err(TableError::DuplicateKey { key, .. }) => println!("{} already exists", key),
//!     Err(e) => println!("Other error: {}", e),
//! }
//!
//! match db.try_get_row::<i32>(&"settings".to_string()) {
//!     Ok(value) => println!("Setting: {}", value),
//!     Err(TableError::TableNotFound { value_type }) => println!("no {} rows yet", value_type),
//!     Err(e) => println!("Other error: {}", e),
//! }
//! ```

mod erased;
mod error;
mod heterogeneous;
mod table;

#[cfg(test)]
mod table_tests;

pub use erased::{ErasedTable, RowVisitor, RowVisitorMut};
pub use error::{TableError, TableResult};
pub use heterogeneous::HeterogeneousTable;
pub use table::Table;
