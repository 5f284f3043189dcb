#![cfg(target_arch = "wasm32")]

use shopshell_web::bindings::ShellElements;
use shopshell_web::shell::{DARK_MODE_CLASS, DROPDOWN_OPEN_CLASS, Shell};
use shopshell_web::{dom, exports};
use js_sys::{Function, Reflect};
use std::rc::Rc;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_test::*;
use web_sys::{HtmlElement, Node};

wasm_bindgen_test_configure!(run_in_browser);

const PAGE: &str = r#"
    <button class="dark-mode-toggle"><i class="fas"></i></button>
    <a id="accountLink" href="login.html">Account</a>
    <div id="accountDropdown"><a id="logoutLink" href="index.html">Logout</a></div>
    <span id="cartCount">0</span>
    <p id="outside">elsewhere</p>
"#;

fn reset_page(markup: &str) {
    dom::local_storage().expect("localStorage").clear().unwrap();
    dom::session_storage().expect("sessionStorage").clear().unwrap();
    let body = dom::document().unwrap().body().expect("body");
    body.set_inner_html(markup);
    let _ = body.class_list().remove_1(DARK_MODE_CLASS);
}

fn sign_in(email: &str, first_name: &str) {
    let local = dom::local_storage().unwrap();
    local
        .set_item(
            "currentUser",
            &format!(r#"{{"email":"{email}","firstName":"{first_name}"}}"#),
        )
        .unwrap();
    local.set_item("isLoggedIn", "true").unwrap();
}

fn mount_shell() -> Rc<Shell> {
    let shell = Shell::from_document(&dom::document().unwrap()).expect("shell");
    shell.init();
    shell
}

fn by_id(id: &str) -> HtmlElement {
    dom::document()
        .unwrap()
        .get_element_by_id(id)
        .expect(id)
        .dyn_into::<HtmlElement>()
        .unwrap()
}

#[wasm_bindgen_test]
fn badge_counts_quantities_of_signed_in_user() {
    reset_page(PAGE);
    sign_in("a@x.com", "Ada");
    dom::local_storage()
        .unwrap()
        .set_item(
            "cart_a@x.com",
            r#"[{"id":"p1","quantity":2},{"id":"p2","quantity":1}]"#,
        )
        .unwrap();
    mount_shell();
    assert_eq!(by_id("cartCount").text_content().as_deref(), Some("3"));
}

#[wasm_bindgen_test]
fn guest_sees_account_label_and_hidden_dropdown() {
    reset_page(PAGE);
    mount_shell();
    let link = by_id("accountLink");
    let dropdown = by_id("accountDropdown");
    assert_eq!(link.text_content().as_deref(), Some("Account"));
    assert!(dropdown.hidden());
    assert!(!link.class_list().contains("dropdown-toggle"));
    assert_eq!(by_id("cartCount").text_content().as_deref(), Some("0"));
}

#[wasm_bindgen_test]
fn signed_in_link_toggles_and_outside_click_dismisses() {
    reset_page(PAGE);
    sign_in("a@x.com", " Ada ");
    let shell = mount_shell();
    shell.install_listeners().expect("listeners");

    let link = by_id("accountLink");
    let dropdown = by_id("accountDropdown");
    assert_eq!(link.text_content().as_deref(), Some("Ada"));
    assert!(!dropdown.hidden());
    assert!(link.class_list().contains("dropdown-toggle"));

    link.click();
    assert!(dropdown.class_list().contains(DROPDOWN_OPEN_CLASS));

    by_id("outside").click();
    assert!(!dropdown.class_list().contains(DROPDOWN_OPEN_CLASS));
}

#[wasm_bindgen_test]
fn clicks_inside_dropdown_keep_it_open() {
    reset_page(PAGE);
    sign_in("a@x.com", "Ada");
    let shell = mount_shell();
    let dropdown = by_id("accountDropdown");
    dropdown.class_list().add_1(DROPDOWN_OPEN_CLASS).unwrap();

    let inside: Node = dropdown.clone().into();
    shell.dismiss_if_outside(Some(&inside));
    assert!(dropdown.class_list().contains(DROPDOWN_OPEN_CLASS));

    shell.dismiss_if_outside(None);
    assert!(!dropdown.class_list().contains(DROPDOWN_OPEN_CLASS));
}

#[wasm_bindgen_test]
fn refresh_follows_storage_changes() {
    reset_page(PAGE);
    sign_in("a@x.com", "Ada");
    let shell = mount_shell();
    assert_eq!(by_id("accountLink").text_content().as_deref(), Some("Ada"));

    dom::local_storage()
        .unwrap()
        .set_item("isLoggedIn", "false")
        .unwrap();
    shell.refresh();
    assert_eq!(by_id("accountLink").text_content().as_deref(), Some("Account"));
    assert!(by_id("accountDropdown").hidden());
}

#[wasm_bindgen_test]
fn dark_mode_preference_sets_body_class_and_icon() {
    reset_page(PAGE);
    dom::session_storage()
        .unwrap()
        .set_item("darkMode", "true")
        .unwrap();
    mount_shell();
    let document = dom::document().unwrap();
    assert!(document.body().unwrap().class_list().contains(DARK_MODE_CLASS));
    let icon = document.query_selector(".dark-mode-toggle i").unwrap().unwrap();
    assert_eq!(icon.class_name(), "fas fa-sun");

    reset_page(PAGE);
    mount_shell();
    let icon = document.query_selector(".dark-mode-toggle i").unwrap().unwrap();
    assert_eq!(icon.class_name(), "fas fa-moon");
}

#[wasm_bindgen_test]
fn pages_without_shell_elements_are_skipped() {
    reset_page("<main>no header here</main>");
    sign_in("a@x.com", "Ada");
    let shell = mount_shell();
    assert!(shell.elements().account().is_none());
    assert!(shell.elements().cart_count.is_none());
    shell.update_cart_display();
    shell.update_account_ui();
    let elements = ShellElements::resolve(&dom::document().unwrap());
    assert!(elements.dark_mode_icon.is_none());
}

fn silence_alerts() {
    let window = dom::window().unwrap();
    let noop = Function::new_no_args("");
    Reflect::set(&window, &JsValue::from_str("alert"), &noop).unwrap();
}

fn badge() -> Option<String> {
    by_id("cartCount").text_content()
}

#[wasm_bindgen_test]
fn exported_entry_points_update_badge_and_stored_cart() {
    reset_page(PAGE);
    silence_alerts();
    sign_in("a@x.com", "Ada");
    exports::mount().expect("mount");
    assert_eq!(badge().as_deref(), Some("0"));

    exports::add_to_cart(
        JsValue::from_str("p1"),
        JsValue::from_str("Shirt"),
        JsValue::from_f64(19.99),
        JsValue::from_str("s.jpg"),
    );
    assert_eq!(badge().as_deref(), Some("1"));

    exports::add_to_cart(
        JsValue::from_f64(7.0),
        JsValue::from_str("Mug"),
        JsValue::from_str("4"),
        JsValue::UNDEFINED,
    );
    assert_eq!(badge().as_deref(), Some("2"));

    let local = dom::local_storage().unwrap();
    let raw = local.get_item("cart_a@x.com").unwrap().expect("stored cart");
    let cart: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(cart[0]["id"], "p1");
    assert_eq!(cart[1]["id"], 7);
    assert_eq!(cart[1]["price"], 4.0);
    assert_eq!(cart[1]["img"], "images/placeholder.jpg");

    local
        .set_item("cart_a@x.com", r#"[{"id":"p1","quantity":5}]"#)
        .unwrap();
    let window = dom::window().unwrap();
    let update: Function = Reflect::get(&window, &JsValue::from_str("updateCartDisplay"))
        .unwrap()
        .dyn_into()
        .expect("updateCartDisplay published on window");
    update.call0(&JsValue::NULL).unwrap();
    assert_eq!(badge().as_deref(), Some("5"));
}
