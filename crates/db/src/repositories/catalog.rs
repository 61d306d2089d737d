//! Catalog queries for transaction types and categories.

use std::collections::HashMap;

use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder,
};

use crate::entities::{transaction_categories, transaction_types};

/// A category joined with its transaction type, keyed by category ID.
pub type CategoryIndex =
    HashMap<i32, (transaction_categories::Model, Option<transaction_types::Model>)>;

/// Repository for the transaction type/category catalog.
#[derive(Debug)]
#[cfg_attr(not(test), derive(Clone))]
pub struct CatalogRepository {
    db: DatabaseConnection,
}

impl CatalogRepository {
    /// Creates a new catalog repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists all transaction types.
    pub async fn list_types(&self) -> Result<Vec<transaction_types::Model>, DbErr> {
        transaction_types::Entity::find()
            .order_by_asc(transaction_types::Column::TransactionTypeId)
            .all(&self.db)
            .await
    }

    /// Lists all categories together with their transaction type.
    pub async fn list_categories(
        &self,
    ) -> Result<Vec<(transaction_categories::Model, Option<transaction_types::Model>)>, DbErr>
    {
        transaction_categories::Entity::find()
            .find_also_related(transaction_types::Entity)
            .order_by_asc(transaction_categories::Column::TransactionCategoryId)
            .all(&self.db)
            .await
    }

    /// Finds one category together with its transaction type.
    pub async fn find_category(
        &self,
        transaction_category_id: i32,
    ) -> Result<Option<(transaction_categories::Model, Option<transaction_types::Model>)>, DbErr>
    {
        transaction_categories::Entity::find_by_id(transaction_category_id)
            .find_also_related(transaction_types::Entity)
            .one(&self.db)
            .await
    }

    /// Loads the categories (with types) for a set of category IDs.
    ///
    /// Listing and report paths resolve many transactions at once; a single
    /// batched query here avoids per-row lookups.
    pub async fn category_index(&self, category_ids: &[i32]) -> Result<CategoryIndex, DbErr> {
        if category_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows = transaction_categories::Entity::find()
            .filter(
                transaction_categories::Column::TransactionCategoryId
                    .is_in(category_ids.iter().copied()),
            )
            .find_also_related(transaction_types::Entity)
            .all(&self.db)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(category, kind)| (category.transaction_category_id, (category, kind)))
            .collect())
    }
}

#[cfg(test)]
#[path = "catalog_tests.rs"]
mod catalog_tests;
