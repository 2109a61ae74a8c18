//! The JSON REST API for transactions.
//!
//! Each handler parses its input, performs exactly one store call and
//! serializes the result. Failures are logged and reported with a generic
//! `{"error": "..."}` body, see [Error::into_api_response].

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Path, State, rejection::JsonRejection},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;
use serde_json::json;

use crate::{
    AppState, Error,
    database_id::TransactionId,
    db::acquire_connection,
    transaction::core::{
        TransactionData, create_transaction, delete_transaction, get_transaction,
        list_transactions, update_transaction,
    },
};

/// The state needed by the transaction API.
#[derive(Debug, Clone)]
pub struct TransactionApiState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for TransactionApiState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Parse a JSON body, treating a malformed body like any other failure.
fn parse_body(
    payload: Result<Json<TransactionData>, JsonRejection>,
) -> Result<TransactionData, Error> {
    payload
        .map(|Json(data)| data)
        .map_err(|rejection| Error::InvalidRequestBody(rejection.body_text()))
}

/// A route handler that returns every transaction, most recent first.
pub async fn list_transactions_endpoint(State(state): State<TransactionApiState>) -> Response {
    acquire_connection(&state.db_connection)
        .and_then(|connection| list_transactions(&connection))
        .map(|transactions| Json(transactions).into_response())
        .unwrap_or_else(|error| error.into_api_response("Failed to fetch transactions"))
}

/// A route handler for creating a transaction, responds with the created transaction.
pub async fn create_transaction_endpoint(
    State(state): State<TransactionApiState>,
    payload: Result<Json<TransactionData>, JsonRejection>,
) -> Response {
    parse_body(payload)
        .and_then(|data| {
            let connection = acquire_connection(&state.db_connection)?;
            create_transaction(data, &connection)
        })
        .map(|transaction| Json(transaction).into_response())
        .unwrap_or_else(|error| error.into_api_response("Failed to create transaction"))
}

/// A route handler for getting a transaction by its ID.
///
/// Responds with `404 Not Found` if the transaction does not exist.
pub async fn get_transaction_endpoint(
    State(state): State<TransactionApiState>,
    Path(transaction_id): Path<TransactionId>,
) -> Response {
    acquire_connection(&state.db_connection)
        .and_then(|connection| get_transaction(&transaction_id, &connection))
        .map(|transaction| Json(transaction).into_response())
        .unwrap_or_else(|error| error.into_api_response("Failed to fetch transaction"))
}

/// A route handler for replacing the fields of a transaction.
///
/// Responds with `404 Not Found` if the transaction does not exist.
pub async fn update_transaction_endpoint(
    State(state): State<TransactionApiState>,
    Path(transaction_id): Path<TransactionId>,
    payload: Result<Json<TransactionData>, JsonRejection>,
) -> Response {
    parse_body(payload)
        .and_then(|data| {
            let connection = acquire_connection(&state.db_connection)?;
            update_transaction(&transaction_id, data, &connection)
        })
        .map(|transaction| Json(transaction).into_response())
        .unwrap_or_else(|error| error.into_api_response("Failed to update transaction"))
}

/// A route handler for deleting a transaction, responds with a confirmation message.
///
/// Deleting a transaction that does not exist is reported as a failure.
pub async fn delete_transaction_endpoint(
    State(state): State<TransactionApiState>,
    Path(transaction_id): Path<TransactionId>,
) -> Response {
    acquire_connection(&state.db_connection)
        .and_then(|connection| delete_transaction(&transaction_id, &connection))
        .map(|()| Json(json!({ "message": "Transaction deleted" })).into_response())
        .unwrap_or_else(|error| error.into_api_response("Failed to delete transaction"))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use serde_json::{Value, json};
    use time::macros::date;

    use crate::{
        AppState, build_router, endpoints,
        endpoints::format_endpoint,
        test_utils::must_create_test_state,
        transaction::{Amount, Transaction},
    };

    fn create_test_server() -> (TestServer, AppState) {
        let state = must_create_test_state();
        let server = TestServer::new(build_router(state.clone()));

        (server, state)
    }

    fn transaction_route(id: &str) -> String {
        format_endpoint(endpoints::TRANSACTION_API, id)
    }

    fn break_store(state: &AppState) {
        state
            .db_connection
            .lock()
            .unwrap()
            .execute("DROP TABLE \"transaction\"", ())
            .expect("could not drop transaction table");
    }

    async fn create(server: &TestServer, body: Value) -> Transaction {
        let response = server.post(endpoints::TRANSACTIONS_API).json(&body).await;
        response.assert_status_ok();
        response.json::<Transaction>()
    }

    #[tokio::test]
    async fn create_echoes_fields_with_generated_id() {
        let (server, _) = create_test_server();

        let transaction = create(
            &server,
            json!({ "amount": 42.50, "date": "2024-01-15", "description": "Groceries" }),
        )
        .await;

        assert!(!transaction.id.as_str().is_empty());
        assert_eq!(transaction.amount, Amount::from_cents(4250));
        assert_eq!(transaction.date, date!(2024 - 01 - 15));
        assert_eq!(transaction.description, "Groceries");
    }

    #[tokio::test]
    async fn create_returns_json_shape() {
        let (server, _) = create_test_server();

        let response = server
            .post(endpoints::TRANSACTIONS_API)
            .json(&json!({
                "amount": "-12.30",
                "date": "2024-01-15T09:30:00.000Z",
                "description": "Lunch"
            }))
            .await;

        response.assert_status_ok();
        let body = response.json::<Value>();
        assert!(body["id"].is_string());
        assert_eq!(body["amount"], json!(-12.3));
        assert_eq!(body["date"], "2024-01-15");
        assert_eq!(body["description"], "Lunch");
    }

    #[tokio::test]
    async fn create_fails_on_malformed_amount() {
        let (server, _) = create_test_server();

        let response = server
            .post(endpoints::TRANSACTIONS_API)
            .json(&json!({ "amount": "lots", "date": "2024-01-15", "description": "?" }))
            .await;

        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            response.json::<Value>()["error"],
            "Failed to create transaction"
        );
    }

    #[tokio::test]
    async fn create_fails_on_store_failure() {
        let (server, state) = create_test_server();
        break_store(&state);

        let response = server
            .post(endpoints::TRANSACTIONS_API)
            .json(&json!({ "amount": 1, "date": "2024-01-15", "description": "x" }))
            .await;

        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn list_is_empty_array_without_transactions() {
        let (server, _) = create_test_server();

        let response = server.get(endpoints::TRANSACTIONS_API).await;

        response.assert_status_ok();
        assert_eq!(response.json::<Value>(), json!([]));
    }

    #[tokio::test]
    async fn list_includes_created_transactions_most_recent_first() {
        let (server, _) = create_test_server();
        let mut created = Vec::new();
        for date in ["2024-03-02", "2024-01-15", "2024-05-30", "2024-03-02"] {
            created.push(
                create(
                    &server,
                    json!({ "amount": 1, "date": date, "description": date }),
                )
                .await,
            );
        }

        let listed = server
            .get(endpoints::TRANSACTIONS_API)
            .await
            .json::<Vec<Transaction>>();

        assert_eq!(listed.len(), created.len());
        for transaction in &created {
            assert!(listed.contains(transaction), "{transaction:?} not listed");
        }
        assert!(listed.windows(2).all(|pair| pair[0].date >= pair[1].date));
    }

    #[tokio::test]
    async fn list_fails_on_store_failure() {
        let (server, state) = create_test_server();
        break_store(&state);

        let response = server.get(endpoints::TRANSACTIONS_API).await;

        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            response.json::<Value>()["error"],
            "Failed to fetch transactions"
        );
    }

    #[tokio::test]
    async fn get_returns_transaction() {
        let (server, _) = create_test_server();
        let created = create(
            &server,
            json!({ "amount": 3.5, "date": "2024-02-01", "description": "Coffee" }),
        )
        .await;

        let response = server.get(&transaction_route(created.id.as_str())).await;

        response.assert_status_ok();
        assert_eq!(response.json::<Transaction>(), created);
    }

    #[tokio::test]
    async fn get_missing_is_not_found() {
        let (server, _) = create_test_server();

        let response = server.get(&transaction_route("missing")).await;

        response.assert_status(StatusCode::NOT_FOUND);
        assert_eq!(response.json::<Value>()["error"], "Transaction not found");
    }

    #[tokio::test]
    async fn update_replaces_all_fields() {
        let (server, _) = create_test_server();
        let created = create(
            &server,
            json!({ "amount": 42.5, "date": "2024-01-15", "description": "Groceries" }),
        )
        .await;

        let response = server
            .put(&transaction_route(created.id.as_str()))
            .json(&json!({ "amount": 40, "date": "2024-01-16", "description": "Supermarket" }))
            .await;

        response.assert_status_ok();
        let updated = response.json::<Transaction>();
        assert_eq!(
            updated,
            Transaction {
                id: created.id.clone(),
                amount: Amount::from_cents(4000),
                date: date!(2024 - 01 - 16),
                description: "Supermarket".to_owned(),
            }
        );
        let fetched = server
            .get(&transaction_route(created.id.as_str()))
            .await
            .json::<Transaction>();
        assert_eq!(fetched, updated);
    }

    #[tokio::test]
    async fn update_missing_is_not_found() {
        let (server, _) = create_test_server();

        let response = server
            .put(&transaction_route("missing"))
            .json(&json!({ "amount": 1, "date": "2024-01-16", "description": "x" }))
            .await;

        response.assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn update_fails_on_store_failure() {
        let (server, state) = create_test_server();
        let created = create(
            &server,
            json!({ "amount": 1, "date": "2024-01-15", "description": "x" }),
        )
        .await;
        break_store(&state);

        let response = server
            .put(&transaction_route(created.id.as_str()))
            .json(&json!({ "amount": 2, "date": "2024-01-16", "description": "y" }))
            .await;

        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            response.json::<Value>()["error"],
            "Failed to update transaction"
        );
    }

    #[tokio::test]
    async fn delete_then_get_is_not_found() {
        let (server, _) = create_test_server();
        let created = create(
            &server,
            json!({ "amount": 1, "date": "2024-01-15", "description": "x" }),
        )
        .await;

        let response = server.delete(&transaction_route(created.id.as_str())).await;

        response.assert_status_ok();
        assert_eq!(
            response.json::<Value>(),
            json!({ "message": "Transaction deleted" })
        );
        server
            .get(&transaction_route(created.id.as_str()))
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn delete_missing_fails() {
        let (server, _) = create_test_server();

        let response = server.delete(&transaction_route("missing")).await;

        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            response.json::<Value>()["error"],
            "Failed to delete transaction"
        );
    }
}
