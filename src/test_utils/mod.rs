#![allow(missing_docs)]

pub(crate) mod form;
pub(crate) mod html;

use rusqlite::Connection;

use crate::AppState;

pub(crate) use form::{
    assert_form_input, assert_form_input_with_value, assert_form_submit_button_with_text,
    assert_hx_endpoint, must_get_form,
};
pub(crate) use html::{assert_valid_html, parse_html_document};

/// Create app state backed by a fresh in-memory database in UTC.
#[track_caller]
pub(crate) fn must_create_test_state() -> AppState {
    let connection = Connection::open_in_memory().expect("Could not open database in memory.");

    AppState::new(connection, "Etc/UTC").expect("Could not create app state.")
}
