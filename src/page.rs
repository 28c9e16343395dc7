use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

pub const CART_BODY: &str = "cartBody";
pub const CART_TOTALS: &str = "cartTotals";
pub const CART_COUNT: &str = "cart-count";

/// Rendering target of the cart. Writes to an element that does not exist
/// are ignored and report `false`.
pub trait Page {
    fn has_element(&self, id: &str) -> bool;
    fn set_html(&mut self, id: &str, html: &str) -> bool;
    fn set_text(&mut self, id: &str, text: &str) -> bool;
    /// Whether the toast toolkit is loaded on this page.
    fn toast_available(&self) -> bool;
    fn show_toast(&mut self, message: &str);
    fn alert(&mut self, message: &str);
    fn navigate(&mut self, url: &str);
}

/// What the calling webview page reports about itself.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageContext {
    #[serde(default)]
    pub elements: Vec<String>,
    #[serde(default)]
    pub toast: bool,
}

impl PageContext {
    pub fn cart_page() -> Self {
        Self {
            elements: vec![CART_BODY.into(), CART_TOTALS.into(), CART_COUNT.into()],
            toast: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatchKind {
    Html,
    Text,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Patch {
    pub element: String,
    pub kind: PatchKind,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "message", rename_all = "lowercase")]
pub enum Notification {
    Toast(String),
    Alert(String),
}

/// Everything the webview must apply after a command, in order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageUpdate {
    pub patches: Vec<Patch>,
    pub notifications: Vec<Notification>,
    pub redirect: Option<String>,
}

/// In-memory page: tracks element contents and records every update.
#[derive(Debug, Clone, Default)]
pub struct PageState {
    elements: HashSet<String>,
    toast: bool,
    contents: HashMap<String, String>,
    update: PageUpdate,
}

impl PageState {
    pub fn new(context: PageContext) -> Self {
        Self {
            elements: context.elements.into_iter().collect(),
            toast: context.toast,
            contents: HashMap::new(),
            update: PageUpdate::default(),
        }
    }

    /// A page with none of the cart elements and no toast toolkit.
    pub fn blank() -> Self {
        Self::default()
    }

    pub fn content(&self, id: &str) -> Option<&str> {
        self.contents.get(id).map(String::as_str)
    }

    pub fn update(&self) -> &PageUpdate {
        &self.update
    }

    pub fn into_update(self) -> PageUpdate {
        self.update
    }

    fn patch(&mut self, id: &str, kind: PatchKind, content: &str) -> bool {
        if !self.elements.contains(id) {
            return false;
        }
        self.contents.insert(id.to_string(), content.to_string());
        self.update.patches.push(Patch {
            element: id.to_string(),
            kind,
            content: content.to_string(),
        });
        true
    }
}

impl Page for PageState {
    fn has_element(&self, id: &str) -> bool {
        self.elements.contains(id)
    }

    fn set_html(&mut self, id: &str, html: &str) -> bool {
        self.patch(id, PatchKind::Html, html)
    }

    fn set_text(&mut self, id: &str, text: &str) -> bool {
        self.patch(id, PatchKind::Text, text)
    }

    fn toast_available(&self) -> bool {
        self.toast
    }

    fn show_toast(&mut self, message: &str) {
        self.update
            .notifications
            .push(Notification::Toast(message.to_string()));
    }

    fn alert(&mut self, message: &str) {
        self.update
            .notifications
            .push(Notification::Alert(message.to_string()));
    }

    fn navigate(&mut self, url: &str) {
        self.update.redirect = Some(url.to_string());
    }
}
