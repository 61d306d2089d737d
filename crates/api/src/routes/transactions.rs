//! Transaction CRUD and catalog routes.

use std::collections::HashMap;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Response;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::error;

use coffeetech_db::entities::{transaction_categories, transaction_types, transactions};
use coffeetech_db::{
    CatalogRepository, CreateTransactionInput, INACTIVE_STATE, TransactionError,
    TransactionRepository, TransactionStateRepository, UpdateTransactionInput,
};

use crate::AppState;
use crate::auth::{
    ADD_TRANSACTION, DELETE_TRANSACTION, EDIT_TRANSACTION, READ_TRANSACTION, SessionTokenQuery,
    authenticate, authorize_farm_action,
};
use crate::response::{error_response, success_response};
use crate::routes::{client_failure, db_failure};

/// Request body for creating a transaction.
#[derive(Debug, Deserialize)]
pub struct CreateTransactionRequest {
    /// Plot the transaction belongs to.
    pub plot_id: i32,
    /// Category ID.
    pub transaction_category_id: i32,
    /// Optional description.
    #[serde(default)]
    pub description: Option<String>,
    /// Monetary value.
    pub value: Decimal,
    /// Transaction date.
    pub transaction_date: NaiveDate,
}

/// Request body for editing a transaction; absent fields are left untouched.
#[derive(Debug, Deserialize)]
pub struct UpdateTransactionRequest {
    /// Transaction to edit.
    pub transaction_id: i32,
    /// New category ID.
    #[serde(default)]
    pub transaction_category_id: Option<i32>,
    /// New description.
    #[serde(default)]
    pub description: Option<String>,
    /// New value.
    #[serde(default)]
    pub value: Option<Decimal>,
    /// New date.
    #[serde(default)]
    pub transaction_date: Option<NaiveDate>,
}

/// Request body for soft-deleting a transaction.
#[derive(Debug, Deserialize)]
pub struct DeleteTransactionRequest {
    /// Transaction to delete.
    pub transaction_id: i32,
}

/// A transaction as returned to clients, with names resolved.
#[derive(Debug, Serialize)]
pub struct TransactionResponse {
    /// Transaction ID.
    pub transaction_id: i32,
    /// Plot the transaction belongs to.
    pub plot_id: i32,
    /// Transaction type name.
    pub transaction_type_name: String,
    /// Category name.
    pub transaction_category_name: String,
    /// Description.
    pub description: Option<String>,
    /// Monetary value.
    pub value: Decimal,
    /// Transaction date.
    pub transaction_date: NaiveDate,
    /// Transaction state name.
    pub transaction_state: String,
}

/// A transaction type row.
#[derive(Debug, Serialize)]
pub struct TransactionTypeResponse {
    /// Type ID.
    pub transaction_type_id: i32,
    /// Type name.
    pub name: String,
}

/// A transaction category row with its type name resolved.
#[derive(Debug, Serialize)]
pub struct TransactionCategoryResponse {
    /// Category ID.
    pub transaction_category_id: i32,
    /// Category name.
    pub name: String,
    /// Type ID.
    pub transaction_type_id: i32,
    /// Type name.
    pub transaction_type_name: String,
}

const UNKNOWN: &str = "Unknown";

/// Builds the client-facing view of a stored transaction.
///
/// Broken joins degrade to `Unknown` names instead of failing the request.
fn transaction_response(
    model: &transactions::Model,
    category: Option<&(transaction_categories::Model, Option<transaction_types::Model>)>,
    states: &HashMap<i32, String>,
) -> TransactionResponse {
    let (category_name, type_name) = category.map_or_else(
        || (UNKNOWN.to_string(), UNKNOWN.to_string()),
        |(cat, kind)| {
            (
                cat.name.clone(),
                kind.as_ref()
                    .map_or_else(|| UNKNOWN.to_string(), |t| t.name.clone()),
            )
        },
    );

    TransactionResponse {
        transaction_id: model.transaction_id,
        plot_id: model.plot_id,
        transaction_type_name: type_name,
        transaction_category_name: category_name,
        description: model.description.clone(),
        value: model.value,
        transaction_date: model.transaction_date,
        transaction_state: states
            .get(&model.transaction_state_id)
            .cloned()
            .unwrap_or_else(|| UNKNOWN.to_string()),
    }
}

/// Loads the state lookup table as an ID-to-name map.
async fn state_names(db: &DatabaseConnection) -> Result<HashMap<i32, String>, Response> {
    let states = TransactionStateRepository::new(db.clone())
        .list()
        .await
        .map_err(|e| db_failure(&e))?;

    Ok(states
        .into_iter()
        .map(|s| (s.transaction_state_id, s.name))
        .collect())
}

/// Maps repository errors onto envelope responses.
pub(crate) fn transaction_failure(e: &TransactionError) -> Response {
    match e {
        TransactionError::NotFound(_) => error_response(
            "The specified transaction does not exist",
            StatusCode::NOT_FOUND,
        ),
        TransactionError::Inactive(_) => error_response(
            "The transaction is inactive and cannot be edited",
            StatusCode::FORBIDDEN,
        ),
        TransactionError::AlreadyDeleted(_) => {
            error_response("The transaction is already deleted", StatusCode::BAD_REQUEST)
        }
        TransactionError::StateNotFound(_) | TransactionError::Database(_) => {
            error!(error = %e, "Transaction repository failure");
            error_response("Database error", StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// POST /transaction/create-transaction
async fn create_transaction(
    State(state): State<AppState>,
    Query(query): Query<SessionTokenQuery>,
    Json(payload): Json<CreateTransactionRequest>,
) -> Result<Response, Response> {
    let user = authenticate(&state.users, query.session_token.as_deref()).await?;

    let plot = state
        .farms
        .verify_plot(payload.plot_id)
        .await
        .map_err(|e| client_failure(&e))?
        .ok_or_else(|| {
            error_response("The specified plot does not exist", StatusCode::NOT_FOUND)
        })?;

    authorize_farm_action(
        &state.farms,
        &state.users,
        user.user_id,
        plot.farm_id,
        ADD_TRANSACTION,
        "add transactions",
    )
    .await?;

    let catalog = CatalogRepository::new(state.db.clone());
    let category = catalog
        .find_category(payload.transaction_category_id)
        .await
        .map_err(|e| db_failure(&e))?
        .ok_or_else(|| {
            error_response(
                "The specified transaction category does not exist",
                StatusCode::BAD_REQUEST,
            )
        })?;

    if payload.value <= Decimal::ZERO {
        return Err(error_response(
            "Transaction value must be positive",
            StatusCode::BAD_REQUEST,
        ));
    }

    let repo = TransactionRepository::new(state.db.clone());
    let created = repo
        .create(CreateTransactionInput {
            plot_id: payload.plot_id,
            transaction_category_id: payload.transaction_category_id,
            description: payload.description,
            value: payload.value,
            transaction_date: payload.transaction_date,
            creator_id: user.user_id,
        })
        .await
        .map_err(|e| transaction_failure(&e))?;

    let states = state_names(&state.db).await?;
    let body = transaction_response(&created, Some(&category), &states);
    Ok(success_response("Transaction created successfully", &body))
}

/// POST /transaction/edit-transaction
async fn edit_transaction(
    State(state): State<AppState>,
    Query(query): Query<SessionTokenQuery>,
    Json(payload): Json<UpdateTransactionRequest>,
) -> Result<Response, Response> {
    let user = authenticate(&state.users, query.session_token.as_deref()).await?;

    let repo = TransactionRepository::new(state.db.clone());
    let existing = repo
        .find_by_id(payload.transaction_id)
        .await
        .map_err(|e| transaction_failure(&e))?
        .ok_or_else(|| {
            error_response(
                "The specified transaction does not exist",
                StatusCode::NOT_FOUND,
            )
        })?;

    let states = state_names(&state.db).await?;
    if states
        .get(&existing.transaction_state_id)
        .is_some_and(|name| name == INACTIVE_STATE)
    {
        return Err(error_response(
            "The transaction is inactive and cannot be edited",
            StatusCode::FORBIDDEN,
        ));
    }

    let plot = state
        .farms
        .verify_plot(existing.plot_id)
        .await
        .map_err(|e| client_failure(&e))?
        .ok_or_else(|| {
            error_response(
                "The plot associated with this transaction does not exist",
                StatusCode::NOT_FOUND,
            )
        })?;

    authorize_farm_action(
        &state.farms,
        &state.users,
        user.user_id,
        plot.farm_id,
        EDIT_TRANSACTION,
        "edit transactions",
    )
    .await?;

    let catalog = CatalogRepository::new(state.db.clone());
    if let Some(category_id) = payload.transaction_category_id {
        if catalog
            .find_category(category_id)
            .await
            .map_err(|e| db_failure(&e))?
            .is_none()
        {
            return Err(error_response(
                "The specified transaction category does not exist",
                StatusCode::BAD_REQUEST,
            ));
        }
    }

    if let Some(value) = payload.value {
        if value <= Decimal::ZERO {
            return Err(error_response(
                "Transaction value must be positive",
                StatusCode::BAD_REQUEST,
            ));
        }
    }

    let updated = repo
        .update(
            payload.transaction_id,
            UpdateTransactionInput {
                transaction_category_id: payload.transaction_category_id,
                description: payload.description,
                value: payload.value,
                transaction_date: payload.transaction_date,
            },
        )
        .await
        .map_err(|e| transaction_failure(&e))?;

    let category = catalog
        .find_category(updated.transaction_category_id)
        .await
        .map_err(|e| db_failure(&e))?;

    let body = transaction_response(&updated, category.as_ref(), &states);
    Ok(success_response("Transaction updated successfully", &body))
}

/// POST /transaction/delete-transaction
async fn delete_transaction(
    State(state): State<AppState>,
    Query(query): Query<SessionTokenQuery>,
    Json(payload): Json<DeleteTransactionRequest>,
) -> Result<Response, Response> {
    let user = authenticate(&state.users, query.session_token.as_deref()).await?;

    let repo = TransactionRepository::new(state.db.clone());
    let existing = repo
        .find_by_id(payload.transaction_id)
        .await
        .map_err(|e| transaction_failure(&e))?
        .ok_or_else(|| {
            error_response(
                "The specified transaction does not exist",
                StatusCode::NOT_FOUND,
            )
        })?;

    let states = state_names(&state.db).await?;
    if states
        .get(&existing.transaction_state_id)
        .is_some_and(|name| name == INACTIVE_STATE)
    {
        return Err(error_response(
            "The transaction is already deleted",
            StatusCode::BAD_REQUEST,
        ));
    }

    let plot = state
        .farms
        .verify_plot(existing.plot_id)
        .await
        .map_err(|e| client_failure(&e))?
        .ok_or_else(|| {
            error_response(
                "The plot associated with this transaction does not exist",
                StatusCode::NOT_FOUND,
            )
        })?;

    authorize_farm_action(
        &state.farms,
        &state.users,
        user.user_id,
        plot.farm_id,
        DELETE_TRANSACTION,
        "delete transactions",
    )
    .await?;

    let deleted = repo
        .soft_delete(payload.transaction_id)
        .await
        .map_err(|e| transaction_failure(&e))?;

    Ok(success_response(
        "Transaction deleted successfully",
        &json!({ "transaction_id": deleted.transaction_id }),
    ))
}

/// GET /transaction/list-transactions/{plot_id}
async fn list_transactions(
    State(state): State<AppState>,
    Path(plot_id): Path<i32>,
    Query(query): Query<SessionTokenQuery>,
) -> Result<Response, Response> {
    let user = authenticate(&state.users, query.session_token.as_deref()).await?;

    let plot = state
        .farms
        .verify_plot(plot_id)
        .await
        .map_err(|e| client_failure(&e))?
        .ok_or_else(|| {
            error_response("The specified plot does not exist", StatusCode::NOT_FOUND)
        })?;

    authorize_farm_action(
        &state.farms,
        &state.users,
        user.user_id,
        plot.farm_id,
        READ_TRANSACTION,
        "read transactions",
    )
    .await?;

    let repo = TransactionRepository::new(state.db.clone());
    let rows = repo
        .list_by_plot(plot_id)
        .await
        .map_err(|e| transaction_failure(&e))?;

    if rows.is_empty() {
        return Ok(success_response(
            "The plot has no registered transactions",
            &json!({ "transactions": [] }),
        ));
    }

    let category_ids: Vec<i32> = rows.iter().map(|t| t.transaction_category_id).collect();
    let catalog = CatalogRepository::new(state.db.clone());
    let index = catalog
        .category_index(&category_ids)
        .await
        .map_err(|e| db_failure(&e))?;
    let states = state_names(&state.db).await?;

    let transactions: Vec<TransactionResponse> = rows
        .iter()
        .map(|t| transaction_response(t, index.get(&t.transaction_category_id), &states))
        .collect();

    Ok(success_response(
        "Transactions retrieved successfully",
        &json!({ "transactions": transactions }),
    ))
}

/// GET /transaction/transaction-types
async fn list_transaction_types(State(state): State<AppState>) -> Result<Response, Response> {
    let catalog = CatalogRepository::new(state.db.clone());
    let types: Vec<TransactionTypeResponse> = catalog
        .list_types()
        .await
        .map_err(|e| db_failure(&e))?
        .into_iter()
        .map(|t| TransactionTypeResponse {
            transaction_type_id: t.transaction_type_id,
            name: t.name,
        })
        .collect();

    Ok(success_response(
        "Transaction types retrieved successfully",
        &json!({ "transaction_types": types }),
    ))
}

/// GET /transaction/transaction-categories
async fn list_transaction_categories(
    State(state): State<AppState>,
) -> Result<Response, Response> {
    let catalog = CatalogRepository::new(state.db.clone());
    let categories: Vec<TransactionCategoryResponse> = catalog
        .list_categories()
        .await
        .map_err(|e| db_failure(&e))?
        .into_iter()
        .map(|(category, kind)| TransactionCategoryResponse {
            transaction_category_id: category.transaction_category_id,
            name: category.name,
            transaction_type_id: category.transaction_type_id,
            transaction_type_name: kind.map_or_else(|| UNKNOWN.to_string(), |t| t.name),
        })
        .collect();

    Ok(success_response(
        "Transaction categories retrieved successfully",
        &json!({ "transaction_categories": categories }),
    ))
}

/// Creates the transaction routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/transaction/create-transaction", post(create_transaction))
        .route("/transaction/edit-transaction", post(edit_transaction))
        .route("/transaction/delete-transaction", post(delete_transaction))
        .route(
            "/transaction/list-transactions/{plot_id}",
            get(list_transactions),
        )
        .route(
            "/transaction/transaction-types",
            get(list_transaction_types),
        )
        .route(
            "/transaction/transaction-categories",
            get(list_transaction_categories),
        )
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use rust_decimal_macros::dec;
    use serde_json::{json, to_value};

    use coffeetech_db::entities::{transaction_categories, transaction_types, transactions};

    use super::{CreateTransactionRequest, UpdateTransactionRequest, transaction_response};

    fn stored() -> transactions::Model {
        transactions::Model {
            transaction_id: 14,
            plot_id: 3,
            description: Some("Coffee sale".to_string()),
            transaction_date: "2025-04-02".parse().expect("valid test date"),
            transaction_state_id: 1,
            value: dec!(1200.00),
            transaction_category_id: 6,
            creator_id: 42,
        }
    }

    #[test]
    fn test_create_request_accepts_missing_description() {
        let body = json!({
            "plot_id": 3,
            "transaction_category_id": 6,
            "value": "1200.00",
            "transaction_date": "2025-04-02"
        });

        let parsed: CreateTransactionRequest =
            serde_json::from_value(body).expect("should parse");
        assert_eq!(parsed.plot_id, 3);
        assert_eq!(parsed.value, dec!(1200.00));
        assert!(parsed.description.is_none());
    }

    #[test]
    fn test_update_request_defaults_absent_fields() {
        let body = json!({ "transaction_id": 14, "value": "99.50" });

        let parsed: UpdateTransactionRequest =
            serde_json::from_value(body).expect("should parse");
        assert_eq!(parsed.transaction_id, 14);
        assert_eq!(parsed.value, Some(dec!(99.50)));
        assert!(parsed.transaction_category_id.is_none());
        assert!(parsed.transaction_date.is_none());
    }

    #[test]
    fn test_transaction_response_resolves_names() {
        let category = (
            transaction_categories::Model {
                transaction_category_id: 6,
                name: "Coffee sales".to_string(),
                transaction_type_id: 1,
            },
            Some(transaction_types::Model {
                transaction_type_id: 1,
                name: "Income".to_string(),
            }),
        );
        let states = HashMap::from([(1, "Active".to_string())]);

        let response = transaction_response(&stored(), Some(&category), &states);

        assert_eq!(response.transaction_type_name, "Income");
        assert_eq!(response.transaction_category_name, "Coffee sales");
        assert_eq!(response.transaction_state, "Active");
    }

    #[test]
    fn test_transaction_response_degrades_to_unknown() {
        let response = transaction_response(&stored(), None, &HashMap::new());

        assert_eq!(response.transaction_type_name, "Unknown");
        assert_eq!(response.transaction_category_name, "Unknown");
        assert_eq!(response.transaction_state, "Unknown");
    }

    #[test]
    fn test_transaction_response_serializes_decimal_as_string() {
        let states = HashMap::from([(1, "Active".to_string())]);
        let response = transaction_response(&stored(), None, &states);

        let value = to_value(&response).expect("should serialize");
        assert_eq!(value["value"], "1200.00");
        assert_eq!(value["transaction_date"], "2025-04-02");
    }
}
