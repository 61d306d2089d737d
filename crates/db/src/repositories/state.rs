//! Transaction state lookups.

use sea_orm::{ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter};

use crate::entities::transaction_states;

/// Name of the state a live transaction carries.
pub const ACTIVE_STATE: &str = "Active";

/// Name of the state a soft-deleted transaction carries.
pub const INACTIVE_STATE: &str = "Inactive";

/// Repository for the transaction_states lookup table.
#[derive(Debug)]
#[cfg_attr(not(test), derive(Clone))]
pub struct TransactionStateRepository {
    db: DatabaseConnection,
}

impl TransactionStateRepository {
    /// Creates a new state repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Finds a transaction state by name.
    pub async fn find_by_name(
        &self,
        name: &str,
    ) -> Result<Option<transaction_states::Model>, DbErr> {
        transaction_states::Entity::find()
            .filter(transaction_states::Column::Name.eq(name))
            .one(&self.db)
            .await
    }

    /// Lists all transaction states.
    pub async fn list(&self) -> Result<Vec<transaction_states::Model>, DbErr> {
        transaction_states::Entity::find().all(&self.db).await
    }
}

#[cfg(test)]
mod tests {
    use sea_orm::{DatabaseBackend, MockDatabase};

    use super::{ACTIVE_STATE, TransactionStateRepository};
    use crate::entities::transaction_states;

    #[tokio::test]
    async fn test_find_by_name_returns_matching_state() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![transaction_states::Model {
                transaction_state_id: 1,
                name: ACTIVE_STATE.to_string(),
            }]])
            .into_connection();

        let repo = TransactionStateRepository::new(db);
        let state = repo
            .find_by_name(ACTIVE_STATE)
            .await
            .expect("query should succeed")
            .expect("state should exist");

        assert_eq!(state.transaction_state_id, 1);
        assert_eq!(state.name, ACTIVE_STATE);
    }

    #[tokio::test]
    async fn test_find_by_name_returns_none_when_missing() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<transaction_states::Model>::new()])
            .into_connection();

        let repo = TransactionStateRepository::new(db);
        let state = repo
            .find_by_name("Archived")
            .await
            .expect("query should succeed");

        assert!(state.is_none());
    }

    #[tokio::test]
    async fn test_list_returns_all_states() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![
                transaction_states::Model {
                    transaction_state_id: 1,
                    name: "Active".to_string(),
                },
                transaction_states::Model {
                    transaction_state_id: 2,
                    name: "Inactive".to_string(),
                },
            ]])
            .into_connection();

        let repo = TransactionStateRepository::new(db);
        let states = repo.list().await.expect("query should succeed");

        assert_eq!(states.len(), 2);
        assert_eq!(states[1].name, "Inactive");
    }
}
