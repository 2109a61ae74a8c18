//! Defines the route handler for the home page: the transaction form, the
//! monthly chart and the transaction table.
use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, PreEscaped, html};
use rusqlite::Connection;
use time::Date;

use crate::{
    AppState, Error,
    chart::{monthly_chart_script, monthly_chart_view},
    db::acquire_connection,
    endpoints::{self, format_endpoint},
    html::{
        BUTTON_DELETE_STYLE, BUTTON_EDIT_STYLE, CARD_STYLE, HeadElement, PAGE_CONTAINER_STYLE,
        TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE, base, dollar_input_styles,
        format_currency,
    },
    timezone::local_today,
    transaction::{
        Amount, Transaction,
        core::list_transactions,
        date::format_date,
        form::{FormMode, transaction_form_view},
    },
};

const TABLE_STYLE: &str =
    "w-full text-sm text-left rtl:text-right text-gray-500 dark:text-gray-400";

const EDIT_DIALOG_SCRIPT: &str = r#"
document.addEventListener('htmx:afterSwap', function (event) {
    if (event.detail.target.id !== 'edit-dialog-content') return;
    document.getElementById('edit-dialog').showModal();
});
"#;

/// The state needed for the transactions page.
#[derive(Debug, Clone)]
pub struct TransactionsViewState {
    /// The database connection for managing transactions.
    db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    local_timezone: String,
}

impl FromRef<AppState> for TransactionsViewState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// Render the form, the chart of the last six months and every transaction,
/// most recent first.
pub async fn get_transactions_page(
    State(state): State<TransactionsViewState>,
) -> Result<Response, Error> {
    let today = local_today(&state.local_timezone)?;
    let transactions = {
        let connection = acquire_connection(&state.db_connection)?;
        list_transactions(&connection)?
    };

    Ok(transactions_view(&transactions, today).into_response())
}

fn transactions_view(transactions: &[Transaction], today: Date) -> Markup {
    let mut head_elements = vec![
        dollar_input_styles(),
        HeadElement::ScriptSource(PreEscaped(EDIT_DIALOG_SCRIPT.to_owned())),
    ];
    head_elements.extend(monthly_chart_script(transactions));

    let content = html! {
        main class=(PAGE_CONTAINER_STYLE)
        {
            h1 class="text-3xl font-bold" { "Finance Tracker" }

            div class="grid gap-8 lg:grid-cols-2"
            {
                section class=(CARD_STYLE)
                {
                    (transaction_form_view(FormMode::Create { default_date: today }))
                }

                (monthly_chart_view(transactions))
            }

            (transaction_table_view(transactions))
        }

        dialog
            id="edit-dialog"
            class="w-full max-w-md p-6 rounded-lg shadow bg-white dark:bg-gray-800 \
                text-gray-900 dark:text-white backdrop:bg-black/50"
        {
            div id="edit-dialog-content" {}
        }
    };

    base("Transactions", &head_elements, &content)
}

fn amount_class(amount: Amount) -> &'static str {
    if amount < Amount::ZERO {
        "text-red-700 dark:text-red-300"
    } else {
        "text-green-700 dark:text-green-300"
    }
}

fn transaction_table_view(transactions: &[Transaction]) -> Markup {
    html! {
        section class=(CARD_STYLE)
        {
            h2 class="text-xl font-bold mb-4" { "Transactions" }

            @if transactions.is_empty() {
                p class="text-gray-500 dark:text-gray-400" { "No transactions found" }
            } @else {
                div class="overflow-x-auto"
                {
                    table class=(TABLE_STYLE)
                    {
                        thead class=(TABLE_HEADER_STYLE)
                        {
                            tr
                            {
                                th scope="col" class=(TABLE_CELL_STYLE) { "Date" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Description" }
                                th scope="col" class={(TABLE_CELL_STYLE) " text-right"} { "Amount" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Actions" }
                            }
                        }

                        tbody
                        {
                            @for transaction in transactions {
                                (transaction_row_view(transaction))
                            }
                        }
                    }
                }
            }
        }
    }
}

fn transaction_row_view(transaction: &Transaction) -> Markup {
    let edit_route = format_endpoint(endpoints::EDIT_TRANSACTION_VIEW, transaction.id.as_str());
    let delete_route = format_endpoint(endpoints::TRANSACTION_VIEW, transaction.id.as_str());

    html! {
        tr class=(TABLE_ROW_STYLE) data-transaction-id=(transaction.id)
        {
            td class=(TABLE_CELL_STYLE) { (format_date(transaction.date)) }
            td class=(TABLE_CELL_STYLE) { (transaction.description) }
            td class={(TABLE_CELL_STYLE) " text-right " (amount_class(transaction.amount))}
            {
                (format_currency(transaction.amount))
            }
            td class=(TABLE_CELL_STYLE)
            {
                div class="flex gap-4"
                {
                    button
                        hx-get=(edit_route)
                        hx-target="#edit-dialog-content"
                        hx-target-error="#alert-container"
                        class=(BUTTON_EDIT_STYLE)
                    {
                        "Edit"
                    }

                    button
                        hx-delete=(delete_route)
                        hx-confirm="Are you sure you want to delete this transaction?"
                        hx-target-error="#alert-container"
                        class=(BUTTON_DELETE_STYLE)
                    {
                        "Delete"
                    }
                }
            }
        }
    }
}
