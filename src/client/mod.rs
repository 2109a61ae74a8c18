//! A client for the transaction API.
//!
//! [ApiClient] talks to the JSON API, [Ledger] keeps the client's local copy
//! of the transaction list in order, and [TransactionForm] drives the
//! create/edit flow without a browser.

mod api_client;
mod form;
mod ledger;

pub use api_client::{API_URL_ENV, ApiClient, ClientError, DEFAULT_API_URL};
pub use form::{FormInput, FormMode, Submission, TransactionForm};
pub use ledger::{Ledger, LedgerAction};
