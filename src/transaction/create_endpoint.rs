//! Defines the endpoint the transaction form posts new transactions to.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
// Must use axum_extra's Form since that parses an empty string as None instead
// of crashing like axum::Form.
use axum_extra::extract::Form;
use axum_htmx::HxRedirect;
use rusqlite::Connection;

use crate::{
    AppState, db::acquire_connection, endpoints,
    transaction::{core::create_transaction, form::TransactionForm},
};

/// The state needed to create a transaction.
#[derive(Debug, Clone)]
pub struct CreateTransactionState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for creating a new transaction, redirects to the home page on success.
///
/// Invalid input is reported with an alert and nothing is stored.
pub async fn create_transaction_endpoint(
    State(state): State<CreateTransactionState>,
    Form(form): Form<TransactionForm>,
) -> Response {
    let result = form.into_data().and_then(|data| {
        let connection = acquire_connection(&state.db_connection)?;
        create_transaction(data, &connection)
    });

    match result {
        Ok(transaction) => {
            tracing::debug!("created transaction {}", transaction.id);
            (HxRedirect(endpoints::ROOT.to_owned()), StatusCode::SEE_OTHER).into_response()
        }
        Err(error) => {
            tracing::error!("could not create transaction: {error}");
            error.into_alert_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use axum_test::TestServer;

    use crate::{
        AppState, build_router, endpoints,
        test_utils::must_create_test_state,
        transaction::{Amount, form::TransactionForm, list_transactions},
    };

    fn create_test_server() -> (TestServer, AppState) {
        let state = must_create_test_state();
        let server = TestServer::new(build_router(state.clone()));

        (server, state)
    }

    fn form(amount: &str, date: &str, description: &str) -> TransactionForm {
        TransactionForm {
            amount: amount.to_owned(),
            date: date.to_owned(),
            description: description.to_owned(),
        }
    }

    #[tokio::test]
    async fn can_create_transaction() {
        let (server, state) = create_test_server();

        let response = server
            .post(endpoints::TRANSACTIONS_VIEW)
            .form(&form("12.30", "2024-01-15", "test transaction"))
            .await;

        response.assert_status(StatusCode::SEE_OTHER);
        assert_eq!(response.header("hx-redirect"), endpoints::ROOT);
        let connection = state.db_connection.lock().unwrap();
        let transactions = list_transactions(&connection).unwrap();
        assert_eq!(transactions.len(), 1);
        assert_eq!(transactions[0].amount, Amount::from_cents(1230));
        assert_eq!(transactions[0].description, "test transaction");
    }

    #[tokio::test]
    async fn rejects_invalid_amount_with_alert() {
        let (server, state) = create_test_server();

        let response = server
            .post(endpoints::TRANSACTIONS_VIEW)
            .form(&form("twelve", "2024-01-15", "test transaction"))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert!(response.text().contains("Invalid amount"));
        let connection = state.db_connection.lock().unwrap();
        assert!(list_transactions(&connection).unwrap().is_empty());
    }

    #[tokio::test]
    async fn rejects_empty_description() {
        let (server, _) = create_test_server();

        let response = server
            .post(endpoints::TRANSACTIONS_VIEW)
            .form(&form("1", "2024-01-15", ""))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert!(response.text().contains("Missing description"));
    }
}
