//! A headless version of the transaction form for non-browser clients.

use std::sync::atomic::{AtomicBool, Ordering};

use crate::{
    Transaction, TransactionId,
    client::{ApiClient, ClientError},
};

/// The raw form fields, parsed and validated on submit.
pub use crate::transaction::TransactionForm as FormInput;

/// Whether the form creates a new transaction or edits an existing one.
#[derive(Debug, Clone, PartialEq)]
pub enum FormMode {
    /// Submitting creates a new transaction.
    Create,
    /// Submitting replaces the fields of the transaction with this ID.
    Edit(TransactionId),
}

/// The outcome of [TransactionForm::submit].
#[derive(Debug, Clone, PartialEq)]
pub enum Submission {
    /// The server saved the transaction and returned it.
    Saved(Transaction),
    /// Another submission was still in flight, so this one was dropped.
    Ignored,
}

/// Submits transactions to the API, one at a time.
#[derive(Debug)]
pub struct TransactionForm {
    client: ApiClient,
    mode: FormMode,
    busy: AtomicBool,
}

/// Clears the busy flag when the submission finishes, however it finishes.
struct BusyGuard<'a>(&'a AtomicBool);

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl TransactionForm {
    /// A form for creating new transactions.
    pub fn create(client: ApiClient) -> Self {
        Self::new(client, FormMode::Create)
    }

    /// A form for editing `transaction`, along with its current values to
    /// pre-fill the input with.
    pub fn edit(client: ApiClient, transaction: &Transaction) -> (Self, FormInput) {
        (
            Self::new(client, FormMode::Edit(transaction.id.clone())),
            FormInput::from(transaction),
        )
    }

    fn new(client: ApiClient, mode: FormMode) -> Self {
        Self {
            client,
            mode,
            busy: AtomicBool::new(false),
        }
    }

    /// The form's mode.
    pub fn mode(&self) -> &FormMode {
        &self.mode
    }

    /// Whether a submission is in flight.
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Validate `input` and create or update the transaction.
    ///
    /// Returns [Submission::Ignored] without validating or sending anything
    /// if another submission is still in flight.
    ///
    /// # Errors
    /// Returns [ClientError::InvalidInput] if the amount, date or description
    /// is invalid, or the API error if the request failed.
    pub async fn submit(&self, input: FormInput) -> Result<Submission, ClientError> {
        if self.busy.swap(true, Ordering::AcqRel) {
            tracing::debug!("Dropping submission while another is in flight");
            return Ok(Submission::Ignored);
        }
        let _guard = BusyGuard(&self.busy);

        let data = input.into_data()?;

        let saved = match &self.mode {
            FormMode::Create => self.client.create_transaction(&data).await?,
            FormMode::Edit(id) => self.client.update_transaction(id, &data).await?,
        };

        Ok(Submission::Saved(saved))
    }
}
