//! Tests for catalog queries against a mock database.

use sea_orm::{DatabaseBackend, MockDatabase};

use super::CatalogRepository;
use crate::entities::{transaction_categories, transaction_types};

fn income_type() -> transaction_types::Model {
    transaction_types::Model {
        transaction_type_id: 1,
        name: "Income".to_string(),
    }
}

fn expense_type() -> transaction_types::Model {
    transaction_types::Model {
        transaction_type_id: 2,
        name: "Expense".to_string(),
    }
}

#[tokio::test]
async fn test_list_types() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![income_type(), expense_type()]])
        .into_connection();

    let repo = CatalogRepository::new(db);
    let types = repo.list_types().await.expect("query should succeed");

    assert_eq!(types.len(), 2);
    assert_eq!(types[0].name, "Income");
    assert_eq!(types[1].name, "Expense");
}

#[tokio::test]
async fn test_list_categories_joins_type_names() {
    let fertilizer = transaction_categories::Model {
        transaction_category_id: 10,
        name: "Fertilizer".to_string(),
        transaction_type_id: 2,
    };

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![(fertilizer, expense_type())]])
        .into_connection();

    let repo = CatalogRepository::new(db);
    let categories = repo.list_categories().await.expect("query should succeed");

    assert_eq!(categories.len(), 1);
    let (category, kind) = &categories[0];
    assert_eq!(category.name, "Fertilizer");
    assert_eq!(kind.as_ref().expect("type should join").name, "Expense");
}

#[tokio::test]
async fn test_category_index_keys_by_category_id() {
    let sale = transaction_categories::Model {
        transaction_category_id: 7,
        name: "Coffee sale".to_string(),
        transaction_type_id: 1,
    };
    let labor = transaction_categories::Model {
        transaction_category_id: 8,
        name: "Labor".to_string(),
        transaction_type_id: 2,
    };

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![
            (sale, income_type()),
            (labor, expense_type()),
        ]])
        .into_connection();

    let repo = CatalogRepository::new(db);
    let index = repo
        .category_index(&[7, 8])
        .await
        .expect("query should succeed");

    assert_eq!(index.len(), 2);
    assert_eq!(index[&7].0.name, "Coffee sale");
    assert_eq!(
        index[&8].1.as_ref().expect("type should join").name,
        "Expense"
    );
}

#[tokio::test]
async fn test_category_index_empty_input_skips_query() {
    let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

    let repo = CatalogRepository::new(db);
    let index = repo
        .category_index(&[])
        .await
        .expect("no query should be issued");

    assert!(index.is_empty());
}
