//! The dual-mode transaction form: create a new transaction or edit an existing one.

use maud::{Markup, html};
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    Error, endpoints,
    endpoints::format_endpoint,
    html::{
        BUTTON_PRIMARY_STYLE, BUTTON_SECONDARY_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE,
        loading_spinner,
    },
    transaction::{
        core::{Transaction, TransactionData},
        date::{format_date, parse_date},
    },
};

/// Which transaction the form is for.
#[derive(Debug, Clone, Copy)]
pub enum FormMode<'a> {
    /// A blank form for a new transaction, dated `default_date`.
    Create { default_date: Date },
    /// A form pre-filled with an existing transaction.
    Edit(&'a Transaction),
}

/// The raw form fields as submitted by the browser.
///
/// Fields are kept as strings so that malformed input can be reported to the
/// user instead of being rejected by the extractor.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct TransactionForm {
    /// The amount in dollars, e.g. "-12.30".
    #[serde(default)]
    pub amount: String,
    /// The date as `YYYY-MM-DD`.
    #[serde(default)]
    pub date: String,
    /// What the transaction was for.
    #[serde(default)]
    pub description: String,
}

impl From<&Transaction> for TransactionForm {
    fn from(transaction: &Transaction) -> Self {
        Self {
            amount: transaction.amount.to_string(),
            date: format_date(transaction.date),
            description: transaction.description.clone(),
        }
    }
}

impl TransactionForm {
    /// Validate the form fields.
    ///
    /// Unlike the JSON API, the form requires a non-empty description.
    ///
    /// # Errors
    /// Returns [Error::InvalidAmount], [Error::InvalidDate] or
    /// [Error::EmptyDescription] for the first invalid field.
    pub fn into_data(self) -> Result<TransactionData, Error> {
        let amount = self.amount.parse()?;
        let date = parse_date(&self.date)?;
        let description = self.description.trim();

        if description.is_empty() {
            return Err(Error::EmptyDescription);
        }

        Ok(TransactionData {
            amount,
            date,
            description: description.to_owned(),
        })
    }
}

/// Render the transaction form.
///
/// In create mode the form posts to [endpoints::TRANSACTIONS_VIEW], in edit
/// mode it puts to [endpoints::TRANSACTION_VIEW] and offers a cancel button
/// that closes the surrounding dialog. A second submission while one is in
/// flight is dropped and the submit button is disabled until it settles.
pub fn transaction_form_view(mode: FormMode<'_>) -> Markup {
    let (title, button_text, fields) = match mode {
        FormMode::Create { default_date } => (
            "Add Transaction",
            "Add",
            TransactionForm {
                date: format_date(default_date),
                ..Default::default()
            },
        ),
        FormMode::Edit(transaction) => (
            "Edit Transaction",
            "Update",
            TransactionForm::from(transaction),
        ),
    };
    let edit_route = match mode {
        FormMode::Edit(transaction) => Some(format_endpoint(
            endpoints::TRANSACTION_VIEW,
            transaction.id.as_str(),
        )),
        FormMode::Create { .. } => None,
    };
    let spinner = loading_spinner();

    html! {
        form
            hx-post=[edit_route.is_none().then_some(endpoints::TRANSACTIONS_VIEW)]
            hx-put=[edit_route.as_deref()]
            hx-target-error="#alert-container"
            hx-sync="this:drop"
            hx-disabled-elt="find button"
            class="w-full space-y-4 md:space-y-6"
        {
            h2 class="text-xl font-bold" { (title) }

            div
            {
                label
                    for="amount"
                    class=(FORM_LABEL_STYLE)
                {
                    "Amount"
                }

                // w-full needed to ensure input takes the full width when prefilled with a value
                div class="input-wrapper w-full"
                {
                    input
                        name="amount"
                        id="amount"
                        type="number"
                        step="0.01"
                        placeholder="0.00"
                        required
                        autofocus
                        value=(fields.amount)
                        class=(FORM_TEXT_INPUT_STYLE);
                }
            }

            div
            {
                label
                    for="date"
                    class=(FORM_LABEL_STYLE)
                {
                    "Date"
                }

                input
                    name="date"
                    id="date"
                    type="date"
                    required
                    value=(fields.date)
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label
                    for="description"
                    class=(FORM_LABEL_STYLE)
                {
                    "Description"
                }

                input
                    name="description"
                    id="description"
                    type="text"
                    placeholder="e.g., Groceries"
                    required
                    value=(fields.description)
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div class="flex gap-4"
            {
                button type="submit" tabindex="0" class=(BUTTON_PRIMARY_STYLE)
                {
                    span
                        id="indicator"
                        class="inline htmx-indicator"
                    {
                        (spinner)
                    }
                    (button_text)
                }

                @if edit_route.is_some() {
                    button
                        type="button"
                        class=(BUTTON_SECONDARY_STYLE)
                        onclick="this.closest('dialog').close()"
                    {
                        "Cancel"
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use scraper::Html;
    use time::macros::date;

    use crate::{
        Error,
        database_id::TransactionId,
        test_utils::{
            assert_form_input, assert_form_input_with_value, assert_form_submit_button_with_text,
            assert_hx_endpoint, must_get_form,
        },
        transaction::{Amount, Transaction},
    };

    use super::{FormMode, TransactionForm, transaction_form_view};

    fn form(amount: &str, date: &str, description: &str) -> TransactionForm {
        TransactionForm {
            amount: amount.to_owned(),
            date: date.to_owned(),
            description: description.to_owned(),
        }
    }

    #[test]
    fn valid_form_becomes_transaction_data() {
        let data = form("42.50", "2024-01-15", "  Groceries ")
            .into_data()
            .unwrap();

        assert_eq!(data.amount, Amount::from_cents(4250));
        assert_eq!(data.date, date!(2024 - 01 - 15));
        assert_eq!(data.description, "Groceries");
    }

    #[test]
    fn rejects_invalid_fields() {
        assert_eq!(
            form("", "2024-01-15", "x").into_data(),
            Err(Error::InvalidAmount(String::new()))
        );
        assert_eq!(
            form("1", "15/01/2024", "x").into_data(),
            Err(Error::InvalidDate("15/01/2024".to_owned()))
        );
        assert_eq!(
            form("1", "2024-01-15", "   ").into_data(),
            Err(Error::EmptyDescription)
        );
    }

    #[test]
    fn create_form_posts_with_default_date() {
        let markup = transaction_form_view(FormMode::Create {
            default_date: date!(2025 - 10 - 05),
        });

        let html = Html::parse_fragment(&markup.into_string());
        let form = must_get_form(&html);
        assert_hx_endpoint(&form, "/transactions", "hx-post");
        assert_eq!(form.value().attr("hx-put"), None);
        assert_eq!(form.value().attr("hx-sync"), Some("this:drop"));
        assert_form_input(&form, "amount", "number");
        assert_form_input_with_value(&form, "date", "date", "2025-10-05");
        assert_form_input(&form, "description", "text");
        assert_form_submit_button_with_text(&form, "Add");
    }

    #[test]
    fn edit_form_puts_prefilled_values() {
        let transaction = Transaction {
            id: TransactionId::new("abc123"),
            amount: Amount::from_cents(-1999),
            date: date!(2024 - 02 - 29),
            description: "Books".to_owned(),
        };

        let markup = transaction_form_view(FormMode::Edit(&transaction));

        let html = Html::parse_fragment(&markup.into_string());
        let form = must_get_form(&html);
        assert_hx_endpoint(&form, "/transactions/abc123", "hx-put");
        assert_eq!(form.value().attr("hx-post"), None);
        assert_form_input_with_value(&form, "amount", "number", "-19.99");
        assert_form_input_with_value(&form, "date", "date", "2024-02-29");
        assert_form_input_with_value(&form, "description", "text", "Books");
        assert_form_submit_button_with_text(&form, "Update");
    }
}
