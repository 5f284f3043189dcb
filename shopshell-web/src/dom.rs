use shopshell_core::ProductId;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Storage, Window};

use crate::error::ShellError;

/// Retrieve the global `window` object.
///
/// # Errors
/// Returns an error when executed outside of a browser context.
pub fn window() -> Result<Window, ShellError> {
    web_sys::window().ok_or(ShellError::NoWindow)
}

/// Retrieve the document object for DOM interactions.
///
/// # Errors
/// Returns an error when the document cannot be accessed from the current window.
pub fn document() -> Result<Document, ShellError> {
    window()?.document().ok_or(ShellError::NoDocument)
}

/// Access the browser `localStorage` handle.
///
/// # Errors
/// Returns an error if the browser window cannot be accessed or `localStorage` is unavailable.
pub fn local_storage() -> Result<Storage, ShellError> {
    window()?
        .local_storage()?
        .ok_or(ShellError::StorageUnavailable("localStorage"))
}

/// Access the browser `sessionStorage` handle.
///
/// # Errors
/// Returns an error if the browser window cannot be accessed or `sessionStorage` is unavailable.
pub fn session_storage() -> Result<Storage, ShellError> {
    window()?
        .session_storage()?
        .ok_or(ShellError::StorageUnavailable("sessionStorage"))
}

/// Convert a JavaScript value into a readable string for error reporting.
#[must_use]
pub fn js_error_message(value: &JsValue) -> String {
    value
        .as_string()
        .or_else(|| {
            value
                .dyn_ref::<js_sys::Error>()
                .map(|err| err.message().into())
        })
        .unwrap_or_else(|| format!("{value:?}"))
}

/// Text of a string or numeric argument passed in from page scripts.
#[must_use]
pub fn js_text(value: &JsValue) -> Option<String> {
    value
        .as_string()
        .or_else(|| value.as_f64().map(|n| n.to_string()))
}

/// Product id argument, keeping whether the script passed a string or a
/// number. Other values have no stored form and become null.
#[must_use]
pub fn js_product_id(value: &JsValue) -> ProductId {
    if let Some(text) = value.as_string() {
        ProductId::from(text)
    } else if let Some(n) = value.as_f64() {
        ProductId::from_number(n)
    } else {
        ProductId::default()
    }
}

/// Numeric value of an argument using the JavaScript `Number()` conversion;
/// NaN when the value has no numeric meaning.
#[must_use]
pub fn js_number(value: &JsValue) -> f64 {
    value
        .as_f64()
        .unwrap_or_else(|| js_sys::Number::new(value).value_of())
}

/// Show a blocking message dialog.
pub fn alert(message: &str) {
    let shown = window().and_then(|win| win.alert_with_message(message).map_err(Into::into));
    if let Err(err) = shown {
        log::warn!("alert failed: {err}");
    }
}

/// Navigate the current tab to `href`.
pub fn navigate(href: &str) {
    let moved = window().and_then(|win| win.location().set_href(href).map_err(Into::into));
    if let Err(err) = moved {
        log::warn!("navigation to {href} failed: {err}");
    }
}
