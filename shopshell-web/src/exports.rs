//! Entry points callable from page scripts and inline `onclick` attributes.
//!
//! The mounted shell lives in a thread-local; wasm runs on the UI thread only.
use std::cell::RefCell;
use std::rc::Rc;

use js_sys::Reflect;
use shopshell_core::{NewLineItem, coerce_price};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use web_sys::Event;

use crate::dom;
use crate::error::ShellError;
use crate::shell::Shell;

thread_local! {
    static SHELL: RefCell<Option<Rc<Shell>>> = const { RefCell::new(None) };
}

/// Mount once the DOM is parsed: right away if it already is, otherwise on
/// `DOMContentLoaded`.
pub fn mount_when_ready() {
    let document = match dom::document() {
        Ok(document) => document,
        Err(err) => {
            log::error!("cannot mount page shell: {err}");
            return;
        }
    };
    if document.ready_state() != "loading" {
        report(mount());
        return;
    }
    let on_ready = Closure::<dyn FnMut(Event)>::new(|_event: Event| report(mount()));
    match document
        .add_event_listener_with_callback("DOMContentLoaded", on_ready.as_ref().unchecked_ref())
    {
        Ok(()) => on_ready.forget(),
        Err(err) => log::error!(
            "cannot wait for DOMContentLoaded: {}",
            dom::js_error_message(&err)
        ),
    }
}

fn report(result: Result<Rc<Shell>, ShellError>) {
    if let Err(err) = result {
        log::error!("cannot mount page shell: {err}");
    }
}

/// Bind the shell to the page, render it, install listeners and publish the
/// global entry points. A second call replaces the mounted shell.
///
/// # Errors
/// Returns an error if the browser globals, storage or listeners are unavailable.
pub fn mount() -> Result<Rc<Shell>, ShellError> {
    let document = dom::document()?;
    let shell = Shell::from_document(&document)?;
    shell.init();
    shell.install_listeners()?;
    install_globals()?;
    SHELL.with(|slot| slot.replace(Some(Rc::clone(&shell))));
    log::info!("page shell mounted");
    Ok(shell)
}

/// The currently mounted shell, if any.
#[must_use]
pub fn mounted() -> Option<Rc<Shell>> {
    SHELL.with(|slot| slot.borrow().clone())
}

fn with_shell(entry: &str, f: impl FnOnce(&Shell)) {
    match mounted() {
        Some(shell) => f(&shell),
        None => log::warn!("{entry} called before the page shell was mounted"),
    }
}

/// Build a cart line from loosely typed script arguments.
#[must_use]
pub fn product_from_js(
    product_id: &JsValue,
    product_name: &JsValue,
    price: &JsValue,
    img: &JsValue,
) -> NewLineItem {
    let name = dom::js_text(product_name).unwrap_or_default();
    let numeric = dom::js_number(price);
    if coerce_price(numeric).is_none() {
        log::debug!("raw price argument for {name}: {price:?}");
    }
    NewLineItem {
        id: dom::js_product_id(product_id),
        name,
        price: numeric,
        img: dom::js_text(img),
    }
}

#[wasm_bindgen(js_name = addToCart)]
pub fn add_to_cart(product_id: JsValue, product_name: JsValue, price: JsValue, img: JsValue) {
    let product = product_from_js(&product_id, &product_name, &price, &img);
    with_shell("addToCart", |shell| shell.add_to_cart(product));
}

#[wasm_bindgen(js_name = toggleCart)]
pub fn toggle_cart() {
    with_shell("toggleCart", Shell::toggle_cart);
}

#[wasm_bindgen(js_name = updateCartDisplay)]
pub fn update_cart_display() {
    with_shell("updateCartDisplay", Shell::update_cart_display);
}

/// Publish the entry points on `window` so inline handlers can reach them.
fn install_globals() -> Result<(), ShellError> {
    let window = dom::window()?;

    let add = Closure::<dyn Fn(JsValue, JsValue, JsValue, JsValue)>::new(add_to_cart);
    Reflect::set(&window, &JsValue::from_str("addToCart"), add.as_ref())?;
    add.forget();

    let toggle = Closure::<dyn Fn()>::new(toggle_cart);
    Reflect::set(&window, &JsValue::from_str("toggleCart"), toggle.as_ref())?;
    toggle.forget();

    let update = Closure::<dyn Fn()>::new(update_cart_display);
    Reflect::set(&window, &JsValue::from_str("updateCartDisplay"), update.as_ref())?;
    update.forget();

    Ok(())
}
