//! Initial database migration.
//!
//! Creates the transaction lookup tables and the transactions table, and
//! seeds the state and type catalogs.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        db.execute_unprepared(TRANSACTION_STATES_SQL).await?;
        db.execute_unprepared(TRANSACTION_TYPES_SQL).await?;
        db.execute_unprepared(TRANSACTION_CATEGORIES_SQL).await?;
        db.execute_unprepared(TRANSACTIONS_SQL).await?;
        db.execute_unprepared(SEED_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        db.execute_unprepared(
            "DROP TABLE IF EXISTS transactions;
             DROP TABLE IF EXISTS transaction_categories;
             DROP TABLE IF EXISTS transaction_types;
             DROP TABLE IF EXISTS transaction_states;",
        )
        .await?;

        Ok(())
    }
}

const TRANSACTION_STATES_SQL: &str = r"
CREATE TABLE transaction_states (
    transaction_state_id SERIAL PRIMARY KEY,
    name VARCHAR(45) NOT NULL UNIQUE
);
";

const TRANSACTION_TYPES_SQL: &str = r"
CREATE TABLE transaction_types (
    transaction_type_id SERIAL PRIMARY KEY,
    name VARCHAR(255) NOT NULL UNIQUE
);
";

const TRANSACTION_CATEGORIES_SQL: &str = r"
CREATE TABLE transaction_categories (
    transaction_category_id SERIAL PRIMARY KEY,
    name VARCHAR(255) NOT NULL,
    transaction_type_id INTEGER NOT NULL
        REFERENCES transaction_types (transaction_type_id),
    UNIQUE (name, transaction_type_id)
);
";

const TRANSACTIONS_SQL: &str = r"
CREATE TABLE transactions (
    transaction_id SERIAL PRIMARY KEY,
    plot_id INTEGER NOT NULL,
    description VARCHAR(255),
    transaction_date DATE NOT NULL,
    transaction_state_id INTEGER NOT NULL
        REFERENCES transaction_states (transaction_state_id),
    value NUMERIC(15, 2) NOT NULL,
    transaction_category_id INTEGER NOT NULL
        REFERENCES transaction_categories (transaction_category_id),
    creator_id INTEGER NOT NULL
);

CREATE INDEX idx_transactions_plot_date
    ON transactions (plot_id, transaction_date);
CREATE INDEX idx_transactions_state
    ON transactions (transaction_state_id);
";

const SEED_SQL: &str = r"
INSERT INTO transaction_states (name)
    VALUES ('Active'), ('Inactive')
    ON CONFLICT (name) DO NOTHING;

INSERT INTO transaction_types (name)
    VALUES ('Income'), ('Expense')
    ON CONFLICT (name) DO NOTHING;
";
