//! `SeaORM` entity definitions for the transactions schema.

pub mod transaction_categories;
pub mod transaction_states;
pub mod transaction_types;
pub mod transactions;
