use wasm_bindgen::JsValue;

use crate::dom::js_error_message;

/// Failures while attaching the shell to the browser page.
#[derive(Debug, thiserror::Error)]
pub enum ShellError {
    #[error("`window` is not available")]
    NoWindow,
    #[error("`document` is not available")]
    NoDocument,
    #[error("{0} is unavailable")]
    StorageUnavailable(&'static str),
    #[error("JavaScript error: {0}")]
    Js(String),
}

impl From<JsValue> for ShellError {
    fn from(value: JsValue) -> Self {
        Self::Js(js_error_message(&value))
    }
}
