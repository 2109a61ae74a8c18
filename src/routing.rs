//! Application router configuration for the JSON API and the HTML views.

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::{
    AppState, endpoints,
    error_page::{get_404_not_found, get_internal_server_error_page},
    transaction::{
        create_transaction_api, create_transaction_endpoint, delete_transaction_api,
        delete_transaction_endpoint, edit_transaction_endpoint, get_edit_transaction_form,
        get_transaction_api, get_transactions_page, list_transactions_api,
        update_transaction_api,
    },
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route(
            endpoints::TRANSACTIONS_API,
            get(list_transactions_api).post(create_transaction_api),
        )
        .route(
            endpoints::TRANSACTION_API,
            get(get_transaction_api)
                .put(update_transaction_api)
                .delete(delete_transaction_api),
        );

    let view_routes = Router::new()
        .route(endpoints::ROOT, get(get_transactions_page))
        .route(endpoints::TRANSACTIONS_VIEW, post(create_transaction_endpoint))
        .route(
            endpoints::TRANSACTION_VIEW,
            put(edit_transaction_endpoint).delete(delete_transaction_endpoint),
        )
        .route(
            endpoints::EDIT_TRANSACTION_VIEW,
            get(get_edit_transaction_form),
        )
        .route(
            endpoints::INTERNAL_ERROR_VIEW,
            get(get_internal_server_error_page),
        );

    api_routes
        .merge(view_routes)
        .fallback(get_404_not_found)
        .with_state(state)
}
