use anyhow::{Context, Result, ensure};
use serde_json::Value;
use shopshell_core::keys::{CURRENT_USER, IS_LOGGED_IN, cart_key};
use shopshell_core::{
    AccountView, Destination, Effect, KeyValueStore, NewLineItem, User, cart::PLACEHOLDER_IMG,
    parse_price_text,
};

use super::Scenario;
use crate::harness::Harness;

const EMAIL: &str = "a@x.com";

pub fn catalog_scenarios() -> Vec<Scenario> {
    vec![
        Scenario::new(
            "smoke",
            "Fresh Page Renders Guest State",
            "Page-load rendering for guests and signed-in users",
            fresh_page_expectation,
        ),
        Scenario::new(
            "smoke",
            "Signed-in Page Shows Display Name",
            "Page-load rendering for guests and signed-in users",
            signed_in_label_expectation,
        ),
        Scenario::new(
            "add-to-cart",
            "Shirt Added Once",
            "Add-to-cart line items, quantities and badge",
            shirt_added_once_expectation,
        ),
        Scenario::new(
            "add-to-cart",
            "Shirt Added Twice",
            "Add-to-cart line items, quantities and badge",
            shirt_added_twice_expectation,
        ),
        Scenario::new(
            "add-to-cart",
            "Invalid Price Defaults To Zero",
            "Add-to-cart line items, quantities and badge",
            invalid_price_expectation,
        ),
        Scenario::new(
            "add-to-cart",
            "Foreign Cart Lines Are Kept",
            "Add-to-cart line items, quantities and badge",
            foreign_lines_expectation,
        ),
        Scenario::new(
            "logout",
            "Logout Clears Session",
            "Logout flags, user record and badge reset",
            logout_expectation,
        ),
        Scenario::new(
            "guest-guards",
            "Guest Add To Cart Redirects",
            "Guest calls are redirected to login without writes",
            guest_add_expectation,
        ),
        Scenario::new(
            "guest-guards",
            "Guest Toggle Cart Redirects",
            "Guest calls are redirected to login without writes",
            guest_toggle_expectation,
        ),
        Scenario::new(
            "cross-tab",
            "Second Tab Sees Cart Changes",
            "Two controllers sharing the same stores",
            cross_tab_expectation,
        ),
    ]
}

fn ada() -> User {
    User::new(EMAIL).with_names(Some("Ada"), None)
}

fn shirt() -> NewLineItem {
    NewLineItem::new("p1", "Shirt", 19.99).with_img("s.jpg")
}

fn stored_cart(harness: &Harness) -> Result<Value> {
    let raw = harness
        .durable
        .value(&cart_key(EMAIL))
        .context("cart was not persisted")?;
    serde_json::from_str(&raw).context("cart is not valid JSON")
}

fn fresh_page_expectation(harness: &Harness) -> Result<()> {
    let tab = harness.tab();
    ensure!(!tab.is_logged_in(), "Fresh stores must not be logged in");
    ensure!(tab.current_user().is_none(), "No user expected");
    ensure!(tab.cart_count() == 0, "Badge should start at 0");
    ensure!(
        tab.account_view() == AccountView::SignedOut,
        "Account area should be signed out"
    );
    Ok(())
}

fn signed_in_label_expectation(harness: &Harness) -> Result<()> {
    harness.sign_in(&ada())?;
    let view = harness.tab().account_view();
    ensure!(view.is_signed_in(), "User should be signed in");
    ensure!(view.label() == "Ada", "Label was {}", view.label());
    Ok(())
}

fn shirt_added_once_expectation(harness: &Harness) -> Result<()> {
    harness.sign_in(&ada())?;
    let reaction = harness.tab().add_to_cart(shirt(), Harness::clock());
    ensure!(reaction.badge == Some(1), "Badge was {:?}", reaction.badge);
    ensure!(
        reaction.effects == vec![Effect::Alert("Shirt added to cart!".to_string())],
        "Unexpected effects {:?}",
        reaction.effects
    );

    let cart = stored_cart(harness)?;
    let line = &cart[0];
    ensure!(cart.as_array().map(Vec::len) == Some(1), "One line expected");
    ensure!(line["id"] == "p1" && line["name"] == "Shirt", "Wrong line {line}");
    ensure!(line["price"] == 19.99, "Price was {}", line["price"]);
    ensure!(line["img"] == "s.jpg", "Image was {}", line["img"]);
    ensure!(line["quantity"] == 1, "Quantity was {}", line["quantity"]);
    Ok(())
}

fn shirt_added_twice_expectation(harness: &Harness) -> Result<()> {
    harness.sign_in(&ada())?;
    let tab = harness.tab();
    tab.add_to_cart(shirt(), Harness::clock());
    let reaction = tab.add_to_cart(shirt(), Harness::clock());
    ensure!(reaction.badge == Some(2), "Badge was {:?}", reaction.badge);
    let cart = stored_cart(harness)?;
    ensure!(
        cart.as_array().map(Vec::len) == Some(1),
        "Same id must not duplicate the line"
    );
    ensure!(cart[0]["quantity"] == 2, "Quantity was {}", cart[0]["quantity"]);
    Ok(())
}

fn invalid_price_expectation(harness: &Harness) -> Result<()> {
    harness.sign_in(&ada())?;
    let price = parse_price_text("call us");
    harness
        .tab()
        .add_to_cart(NewLineItem::new("p2", "Quote", price), Harness::clock());
    let cart = stored_cart(harness)?;
    ensure!(cart[0]["price"] == 0.0, "Price was {}", cart[0]["price"]);
    ensure!(cart[0]["img"] == PLACEHOLDER_IMG, "Image was {}", cart[0]["img"]);
    Ok(())
}

fn foreign_lines_expectation(harness: &Harness) -> Result<()> {
    harness.sign_in(&ada())?;
    harness.durable.set(
        &cart_key(EMAIL),
        r#"[{"id":1,"name":"Mug","price":"4","quantity":2,"size":"L"}]"#,
    )?;
    let tab = harness.tab();
    ensure!(tab.cart_count() == 2, "Badge was {}", tab.cart_count());
    tab.add_to_cart(shirt(), Harness::clock());
    let cart = stored_cart(harness)?;
    ensure!(
        cart.as_array().map(Vec::len) == Some(2),
        "Existing line must survive the add"
    );
    ensure!(cart[0]["id"] == 1, "Numeric id became {}", cart[0]["id"]);
    ensure!(cart[0]["size"] == "L", "Extra field was {}", cart[0]["size"]);
    Ok(())
}

fn logout_expectation(harness: &Harness) -> Result<()> {
    harness.sign_in(&ada())?;
    let tab = harness.tab();
    tab.add_to_cart(shirt(), Harness::clock());
    let reaction = tab.logout();
    ensure!(reaction.refresh, "Logout must re-render the page");
    ensure!(
        reaction.navigates_to(Destination::Home),
        "Logout should go home"
    );
    ensure!(
        harness.durable.value(CURRENT_USER).is_none(),
        "currentUser should be removed"
    );
    ensure!(
        harness.durable.value(IS_LOGGED_IN).as_deref() == Some("false")
            && harness.session.value(IS_LOGGED_IN).as_deref() == Some("false"),
        "Both login flags should be false"
    );
    ensure!(tab.cart_count() == 0, "Badge should reset to 0");
    Ok(())
}

fn guest_add_expectation(harness: &Harness) -> Result<()> {
    let before = harness.durable.snapshot();
    let reaction = harness.tab().add_to_cart(shirt(), Harness::clock());
    ensure!(
        reaction.navigates_to(Destination::Login),
        "Guest should be sent to login"
    );
    ensure!(reaction.badge.is_none(), "Badge must not change");
    ensure!(
        harness.durable.snapshot() == before,
        "Guest add must not write storage"
    );
    Ok(())
}

fn guest_toggle_expectation(harness: &Harness) -> Result<()> {
    let reaction = harness.tab().toggle_cart();
    ensure!(
        reaction.navigates_to(Destination::Login),
        "Guest should be sent to login"
    );
    ensure!(
        !reaction.navigates_to(Destination::Cart),
        "Guest must not reach the cart page"
    );
    Ok(())
}

fn cross_tab_expectation(harness: &Harness) -> Result<()> {
    harness.sign_in(&ada())?;
    let tab_a = harness.tab();
    let tab_b = harness.tab();
    tab_a.add_to_cart(shirt(), Harness::clock());
    tab_a.add_to_cart(NewLineItem::new("p3", "Hat", 5.0), Harness::clock());
    ensure!(tab_b.cart_count() == 2, "Other tab badge was {}", tab_b.cart_count());
    tab_b.logout();
    ensure!(
        tab_a.account_view() == AccountView::SignedOut,
        "Logout in one tab should sign out the other on refresh"
    );
    Ok(())
}
