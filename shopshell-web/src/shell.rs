//! Applies session state to the page and wires the page's events back.
use std::cell::Cell;
use std::rc::{Rc, Weak};

use chrono::Utc;
use shopshell_core::{AccountView, Destination, Effect, NewLineItem, Reaction, Session};
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use web_sys::{Document, Event, EventTarget, Node};

use crate::bindings::ShellElements;
use crate::dom;
use crate::error::ShellError;
use crate::storage::BrowserStore;

pub type BrowserSession = Session<BrowserStore, BrowserStore>;

pub const DROPDOWN_TOGGLE_CLASS: &str = "dropdown-toggle";
pub const DROPDOWN_OPEN_CLASS: &str = "show";
pub const DARK_MODE_CLASS: &str = "dark-mode";
pub const SUN_ICON_CLASS: &str = "fas fa-sun";
pub const MOON_ICON_CLASS: &str = "fas fa-moon";

/// The cart badge and account dropdown controller for one page.
pub struct Shell {
    session: BrowserSession,
    elements: ShellElements,
    /// Whether the account area was last rendered for a signed-in user.
    /// Click handlers act on what is shown, not on what storage says now.
    signed_in: Cell<bool>,
}

impl Shell {
    #[must_use]
    pub fn new(session: BrowserSession, elements: ShellElements) -> Rc<Self> {
        Rc::new(Self {
            session,
            elements,
            signed_in: Cell::new(false),
        })
    }

    /// Bind to the current document and the browser's two storage areas.
    ///
    /// # Errors
    /// Returns an error if the document or either storage area is unavailable.
    pub fn from_document(document: &Document) -> Result<Rc<Self>, ShellError> {
        let session = Session::new(BrowserStore::local()?, BrowserStore::session()?);
        Ok(Self::new(session, ShellElements::resolve(document)))
    }

    pub const fn session(&self) -> &BrowserSession {
        &self.session
    }

    pub const fn elements(&self) -> &ShellElements {
        &self.elements
    }

    /// Page-load rendering: theme, badge, account area.
    pub fn init(&self) {
        self.apply_dark_mode();
        self.refresh();
    }

    /// Re-render everything that depends on storage.
    pub fn refresh(&self) {
        self.update_cart_display();
        self.update_account_ui();
    }

    pub fn apply_dark_mode(&self) {
        let dark = self.session.dark_mode();
        if let Some(body) = &self.elements.body {
            let classes = body.class_list();
            let toggled = if dark {
                classes.add_1(DARK_MODE_CLASS)
            } else {
                classes.remove_1(DARK_MODE_CLASS)
            };
            if let Err(err) = toggled {
                log::debug!("dark-mode class: {}", dom::js_error_message(&err));
            }
        }
        if let Some(icon) = &self.elements.dark_mode_icon {
            icon.set_class_name(if dark { SUN_ICON_CLASS } else { MOON_ICON_CLASS });
        }
    }

    /// Recompute the badge from storage. No-op on pages without a badge.
    pub fn update_cart_display(&self) {
        if self.elements.cart_count.is_none() {
            return;
        }
        self.write_badge(self.session.cart_count());
    }

    fn write_badge(&self, count: u32) {
        if let Some(badge) = &self.elements.cart_count {
            badge.set_text_content(Some(&count.to_string()));
        }
    }

    /// Render the account link and dropdown for the current user.
    pub fn update_account_ui(&self) {
        let Some(account) = self.elements.account() else {
            return;
        };
        let view = self.session.account_view();
        account.link.set_text_content(Some(view.label()));

        let link_classes = account.link.class_list();
        let dropdown_classes = account.dropdown.class_list();
        let styled = match &view {
            AccountView::SignedIn { .. } => {
                account.dropdown.set_hidden(false);
                link_classes.add_1(DROPDOWN_TOGGLE_CLASS).and_then(|()| {
                    account
                        .dropdown
                        .style()
                        .set_property("pointer-events", "auto")
                })
            }
            AccountView::SignedOut => {
                account.dropdown.set_hidden(true);
                link_classes
                    .remove_1(DROPDOWN_TOGGLE_CLASS)
                    .and_then(|()| dropdown_classes.remove_1(DROPDOWN_OPEN_CLASS))
                    .and_then(|()| {
                        account
                            .dropdown
                            .style()
                            .set_property("pointer-events", "none")
                    })
            }
        };
        if let Err(err) = styled {
            log::debug!("account styling: {}", dom::js_error_message(&err));
        }
        self.signed_in.set(view.is_signed_in());
    }

    pub fn add_to_cart(&self, product: NewLineItem) {
        let reaction = self.session.add_to_cart(product, Utc::now());
        self.apply(reaction);
    }

    pub fn toggle_cart(&self) {
        let reaction = self.session.toggle_cart();
        self.apply(reaction);
    }

    pub fn logout(&self) {
        let reaction = self.session.logout();
        self.apply(reaction);
    }

    /// Apply a reaction: badge, optional full refresh, then each effect in order.
    pub fn apply(&self, reaction: Reaction) {
        if let Some(count) = reaction.badge {
            self.write_badge(count);
        }
        if reaction.refresh {
            self.refresh();
        }
        for effect in reaction.effects {
            self.run_effect(&effect);
        }
    }

    fn run_effect(&self, effect: &Effect) {
        match effect {
            Effect::Alert(message) => dom::alert(message),
            Effect::Navigate(destination) => {
                dom::navigate(self.session.config().href(*destination));
            }
        }
    }

    fn toggle_dropdown(&self) {
        if let Some(account) = self.elements.account() {
            if let Err(err) = account.dropdown.class_list().toggle(DROPDOWN_OPEN_CLASS) {
                log::debug!("dropdown toggle: {}", dom::js_error_message(&err));
            }
        }
    }

    /// Close the dropdown when a click lands outside the link and the dropdown.
    pub fn dismiss_if_outside(&self, target: Option<&Node>) {
        let Some(account) = self.elements.account() else {
            return;
        };
        if account.link.contains(target) || account.dropdown.contains(target) {
            return;
        }
        if let Err(err) = account.dropdown.class_list().remove_1(DROPDOWN_OPEN_CLASS) {
            log::debug!("dropdown dismiss: {}", dom::js_error_message(&err));
        }
    }

    fn on_account_click(&self, event: &Event) {
        if self.signed_in.get() {
            event.prevent_default();
            self.toggle_dropdown();
        } else {
            self.run_effect(&Effect::Navigate(Destination::Login));
        }
    }

    fn on_logout_click(&self, event: &Event) {
        if !self.signed_in.get() {
            return;
        }
        event.prevent_default();
        self.logout();
    }

    /// Install the page-lifetime listeners: account link and logout clicks,
    /// document-wide dismissal, and cross-tab storage changes.
    ///
    /// # Errors
    /// Returns an error if a listener cannot be registered.
    pub fn install_listeners(self: &Rc<Self>) -> Result<(), ShellError> {
        let window = dom::window()?;
        let document = dom::document()?;

        if let Some(link) = &self.elements.account_link {
            listen(link, "click", self, |shell, event| shell.on_account_click(&event))?;
        }
        if let Some(logout) = &self.elements.logout_link {
            listen(logout, "click", self, |shell, event| shell.on_logout_click(&event))?;
        }
        listen(&document, "click", self, |shell, event| {
            let target = event.target().and_then(|t| t.dyn_into::<Node>().ok());
            shell.dismiss_if_outside(target.as_ref());
        })?;
        // Any key may matter: the user, either login flag or the cart.
        listen(&window, "storage", self, |shell, _event| {
            log::debug!("storage changed in another tab");
            shell.refresh();
        })?;
        Ok(())
    }
}

/// Register `handler` for `kind` on `target`. The closure only holds a weak
/// handle so a dropped shell turns it into a no-op.
fn listen<F>(
    target: &EventTarget,
    kind: &str,
    shell: &Rc<Shell>,
    handler: F,
) -> Result<(), ShellError>
where
    F: Fn(&Rc<Shell>, Event) + 'static,
{
    let weak: Weak<Shell> = Rc::downgrade(shell);
    let closure = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
        if let Some(shell) = weak.upgrade() {
            handler(&shell, event);
        }
    });
    target.add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}
