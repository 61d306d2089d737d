//! Transaction repository for plot transaction database operations.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, NotSet, QueryFilter,
    QueryOrder, Set,
};

use crate::entities::{transaction_states, transactions};
use crate::repositories::state::{ACTIVE_STATE, INACTIVE_STATE};

/// Error types for transaction operations.
#[derive(Debug, thiserror::Error)]
pub enum TransactionError {
    /// Transaction not found.
    #[error("Transaction not found: {0}")]
    NotFound(i32),

    /// A required state row is missing from the lookup table.
    #[error("Transaction state '{0}' not found")]
    StateNotFound(&'static str),

    /// Inactive transactions cannot be modified.
    #[error("Transaction {0} is inactive and cannot be modified")]
    Inactive(i32),

    /// The transaction was already soft-deleted.
    #[error("Transaction {0} is already deleted")]
    AlreadyDeleted(i32),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating a transaction.
#[derive(Debug, Clone)]
pub struct CreateTransactionInput {
    /// Plot the transaction belongs to.
    pub plot_id: i32,
    /// Category ID.
    pub transaction_category_id: i32,
    /// Optional description.
    pub description: Option<String>,
    /// Monetary value.
    pub value: Decimal,
    /// Transaction date.
    pub transaction_date: NaiveDate,
    /// User who recorded the transaction.
    pub creator_id: i32,
}

/// Input for updating a transaction; `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct UpdateTransactionInput {
    /// New category ID.
    pub transaction_category_id: Option<i32>,
    /// New description.
    pub description: Option<String>,
    /// New value.
    pub value: Option<Decimal>,
    /// New date.
    pub transaction_date: Option<NaiveDate>,
}

/// Transaction repository for CRUD operations.
#[derive(Debug)]
#[cfg_attr(not(test), derive(Clone))]
pub struct TransactionRepository {
    db: DatabaseConnection,
}

impl TransactionRepository {
    /// Creates a new transaction repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a new transaction in the `Active` state.
    pub async fn create(
        &self,
        input: CreateTransactionInput,
    ) -> Result<transactions::Model, TransactionError> {
        let active = self.find_state(ACTIVE_STATE).await?;

        let transaction = transactions::ActiveModel {
            transaction_id: NotSet,
            plot_id: Set(input.plot_id),
            description: Set(input.description),
            transaction_date: Set(input.transaction_date),
            transaction_state_id: Set(active.transaction_state_id),
            value: Set(input.value),
            transaction_category_id: Set(input.transaction_category_id),
            creator_id: Set(input.creator_id),
        };

        Ok(transaction.insert(&self.db).await?)
    }

    /// Finds a transaction by ID.
    pub async fn find_by_id(
        &self,
        transaction_id: i32,
    ) -> Result<Option<transactions::Model>, TransactionError> {
        Ok(transactions::Entity::find_by_id(transaction_id)
            .one(&self.db)
            .await?)
    }

    /// Updates the supplied fields of a transaction.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for unknown IDs and `Inactive` when the
    /// transaction has been soft-deleted.
    pub async fn update(
        &self,
        transaction_id: i32,
        input: UpdateTransactionInput,
    ) -> Result<transactions::Model, TransactionError> {
        let transaction = self
            .find_by_id(transaction_id)
            .await?
            .ok_or(TransactionError::NotFound(transaction_id))?;

        let inactive = self.find_state(INACTIVE_STATE).await?;
        if transaction.transaction_state_id == inactive.transaction_state_id {
            return Err(TransactionError::Inactive(transaction_id));
        }

        let mut active_model: transactions::ActiveModel = transaction.into();

        if let Some(category_id) = input.transaction_category_id {
            active_model.transaction_category_id = Set(category_id);
        }
        if let Some(description) = input.description {
            active_model.description = Set(Some(description));
        }
        if let Some(value) = input.value {
            active_model.value = Set(value);
        }
        if let Some(date) = input.transaction_date {
            active_model.transaction_date = Set(date);
        }

        Ok(active_model.update(&self.db).await?)
    }

    /// Soft-deletes a transaction by moving it to the `Inactive` state.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for unknown IDs and `AlreadyDeleted` when the
    /// transaction is already inactive.
    pub async fn soft_delete(
        &self,
        transaction_id: i32,
    ) -> Result<transactions::Model, TransactionError> {
        let transaction = self
            .find_by_id(transaction_id)
            .await?
            .ok_or(TransactionError::NotFound(transaction_id))?;

        let inactive = self.find_state(INACTIVE_STATE).await?;
        if transaction.transaction_state_id == inactive.transaction_state_id {
            return Err(TransactionError::AlreadyDeleted(transaction_id));
        }

        let mut active_model: transactions::ActiveModel = transaction.into();
        active_model.transaction_state_id = Set(inactive.transaction_state_id);

        Ok(active_model.update(&self.db).await?)
    }

    /// Lists all non-inactive transactions of a plot.
    pub async fn list_by_plot(
        &self,
        plot_id: i32,
    ) -> Result<Vec<transactions::Model>, TransactionError> {
        let inactive = self.find_state(INACTIVE_STATE).await?;

        Ok(transactions::Entity::find()
            .filter(transactions::Column::PlotId.eq(plot_id))
            .filter(
                transactions::Column::TransactionStateId.ne(inactive.transaction_state_id),
            )
            .order_by_asc(transactions::Column::TransactionId)
            .all(&self.db)
            .await?)
    }

    /// Lists the `Active` transactions of a set of plots within a date range.
    pub async fn list_for_report(
        &self,
        plot_ids: &[i32],
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<transactions::Model>, TransactionError> {
        let active = self.find_state(ACTIVE_STATE).await?;

        Ok(transactions::Entity::find()
            .filter(transactions::Column::PlotId.is_in(plot_ids.iter().copied()))
            .filter(transactions::Column::TransactionDate.gte(from))
            .filter(transactions::Column::TransactionDate.lte(to))
            .filter(
                transactions::Column::TransactionStateId.eq(active.transaction_state_id),
            )
            .order_by_asc(transactions::Column::TransactionId)
            .all(&self.db)
            .await?)
    }

    async fn find_state(
        &self,
        name: &'static str,
    ) -> Result<transaction_states::Model, TransactionError> {
        transaction_states::Entity::find()
            .filter(transaction_states::Column::Name.eq(name))
            .one(&self.db)
            .await?
            .ok_or(TransactionError::StateNotFound(name))
    }
}

#[cfg(test)]
#[path = "transaction_tests.rs"]
mod transaction_tests;
