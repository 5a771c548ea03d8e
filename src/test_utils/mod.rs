#![allow(missing_docs)]

pub(crate) mod fakes;
pub(crate) mod form;
pub(crate) mod html;
pub(crate) mod http;

pub(crate) use fakes::{
    FakeAuthProvider, FakeNewsSource, InMemoryTransactionStore, test_transaction,
};
pub(crate) use form::{
    assert_form_input, assert_form_submit_button, assert_hx_endpoint, must_get_form,
};
pub(crate) use html::{
    assert_valid_html, parse_html_document, parse_html_fragment, parse_html_text, select_text,
};
pub(crate) use http::{
    assert_hx_redirect, encrypted_session_cookie, get_header, spawn_stub_server,
};
