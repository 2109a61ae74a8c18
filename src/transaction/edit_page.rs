use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;

use crate::{
    AppState,
    database_id::TransactionId,
    db::acquire_connection,
    transaction::{
        core::get_transaction,
        form::{FormMode, transaction_form_view},
    },
};

/// The state needed for the edit transaction dialog.
#[derive(Debug, Clone)]
pub struct EditTransactionPageState {
    /// The database connection for reading the transaction.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditTransactionPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Renders the edit form for a transaction as a fragment for the edit dialog.
pub async fn get_edit_transaction_form(
    State(state): State<EditTransactionPageState>,
    Path(transaction_id): Path<TransactionId>,
) -> Response {
    let transaction = acquire_connection(&state.db_connection)
        .and_then(|connection| get_transaction(&transaction_id, &connection));

    match transaction {
        Ok(transaction) => transaction_form_view(FormMode::Edit(&transaction)).into_response(),
        Err(error) => {
            tracing::error!("Failed to retrieve transaction {transaction_id}: {error}");
            error.into_alert_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use scraper::Html;
    use time::macros::date;

    use crate::{
        build_router, endpoints,
        endpoints::format_endpoint,
        test_utils::{
            assert_form_input_with_value, assert_hx_endpoint, must_create_test_state,
            must_get_form,
        },
        transaction::{Amount, Transaction, create_transaction},
    };

    #[tokio::test]
    async fn renders_prefilled_form() {
        let state = must_create_test_state();
        let transaction = create_transaction(
            Transaction::build(Amount::from_cents(4250), date!(2024 - 01 - 15), "Groceries"),
            &state.db_connection.lock().unwrap(),
        )
        .unwrap();
        let server = TestServer::new(build_router(state));

        let response = server
            .get(&format_endpoint(
                endpoints::EDIT_TRANSACTION_VIEW,
                transaction.id.as_str(),
            ))
            .await;

        response.assert_status_ok();
        let html = Html::parse_fragment(&response.text());
        let form = must_get_form(&html);
        assert_hx_endpoint(
            &form,
            &format_endpoint(endpoints::TRANSACTION_VIEW, transaction.id.as_str()),
            "hx-put",
        );
        assert_form_input_with_value(&form, "amount", "number", "42.50");
        assert_form_input_with_value(&form, "description", "text", "Groceries");
    }

    #[tokio::test]
    async fn missing_transaction_is_not_found() {
        let server = TestServer::new(build_router(must_create_test_state()));

        let response = server
            .get(&format_endpoint(endpoints::EDIT_TRANSACTION_VIEW, "missing"))
            .await;

        response.assert_status(StatusCode::NOT_FOUND);
    }
}
