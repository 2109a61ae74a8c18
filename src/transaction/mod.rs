//! Transaction management for the finance tracker.
//!
//! This module contains everything related to transactions:
//! - The `Transaction` model, its money and date types
//! - Database functions for storing, querying, and managing transactions
//! - The JSON API handlers
//! - View handlers for the home page, the transaction form and the edit dialog

mod amount;
mod api;
mod core;
mod create_endpoint;
mod date;
mod delete_endpoint;
mod edit_endpoint;
mod edit_page;
mod form;
mod transactions_page;

pub use amount::Amount;
pub use api::{
    create_transaction_endpoint as create_transaction_api,
    delete_transaction_endpoint as delete_transaction_api,
    get_transaction_endpoint as get_transaction_api,
    list_transactions_endpoint as list_transactions_api,
    update_transaction_endpoint as update_transaction_api,
};
pub use core::{
    Transaction, TransactionData, count_transactions, create_transaction,
    create_transaction_table, list_transactions,
};
pub use create_endpoint::create_transaction_endpoint;
pub use date::{format_date, parse_date};
pub use delete_endpoint::delete_transaction_endpoint;
pub use edit_endpoint::edit_transaction_endpoint;
pub use edit_page::get_edit_transaction_form;
pub use form::TransactionForm;
pub use transactions_page::get_transactions_page;

#[cfg(test)]
pub use core::{delete_transaction, get_transaction, update_transaction};
