//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the
//! application.

pub mod catalog;
pub mod state;
pub mod transaction;

pub use catalog::CatalogRepository;
pub use state::{ACTIVE_STATE, INACTIVE_STATE, TransactionStateRepository};
pub use transaction::{
    CreateTransactionInput, TransactionError, TransactionRepository, UpdateTransactionInput,
};
