//! Page elements the shell drives, looked up once at mount.
//!
//! Any of them may be missing on a given page; renderers that need a missing
//! element are skipped.
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement};

pub const ACCOUNT_LINK_ID: &str = "accountLink";
pub const LOGOUT_LINK_ID: &str = "logoutLink";
pub const ACCOUNT_DROPDOWN_ID: &str = "accountDropdown";
pub const CART_COUNT_ID: &str = "cartCount";
pub const DARK_MODE_ICON_SELECTOR: &str = ".dark-mode-toggle i";

#[derive(Debug, Clone, Default)]
pub struct ShellElements {
    pub account_link: Option<HtmlElement>,
    pub logout_link: Option<HtmlElement>,
    pub account_dropdown: Option<HtmlElement>,
    pub cart_count: Option<Element>,
    pub dark_mode_icon: Option<Element>,
    pub body: Option<HtmlElement>,
}

/// The account link and dropdown, which only work as a pair.
#[derive(Debug, Clone, Copy)]
pub struct AccountWidgets<'a> {
    pub link: &'a HtmlElement,
    pub dropdown: &'a HtmlElement,
}

impl ShellElements {
    #[must_use]
    pub fn resolve(document: &Document) -> Self {
        let html = |id: &str| {
            document
                .get_element_by_id(id)
                .and_then(|el| el.dyn_into::<HtmlElement>().ok())
        };
        Self {
            account_link: html(ACCOUNT_LINK_ID),
            logout_link: html(LOGOUT_LINK_ID),
            account_dropdown: html(ACCOUNT_DROPDOWN_ID),
            cart_count: document.get_element_by_id(CART_COUNT_ID),
            dark_mode_icon: document
                .query_selector(DARK_MODE_ICON_SELECTOR)
                .ok()
                .flatten(),
            body: document.body(),
        }
    }

    #[must_use]
    pub fn account(&self) -> Option<AccountWidgets<'_>> {
        Some(AccountWidgets {
            link: self.account_link.as_ref()?,
            dropdown: self.account_dropdown.as_ref()?,
        })
    }
}
