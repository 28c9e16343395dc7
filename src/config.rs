use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

pub const CONFIG_FILE: &str = "cart-config.json";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct CartConfig {
    pub cart_key: String,
    pub order_key: String,
    pub confirmation_page: String,
    pub placeholder_image: String,
    pub database_file: String,
}

impl Default for CartConfig {
    fn default() -> Self {
        Self {
            cart_key: "pmg_cart".into(),
            order_key: "pmg_last_order".into(),
            confirmation_page: "order-confirmation.html".into(),
            placeholder_image: "assets/images/products/placeholder.jpg".into(),
            database_file: "pmg_cart.db".into(),
        }
    }
}

impl CartConfig {
    /// Defaults, then `cart-config.json` in `dir` if present, then environment.
    pub fn load(dir: &Path) -> Self {
        let path = dir.join(CONFIG_FILE);
        let mut config = match fs::read_to_string(&path) {
            Ok(raw) => serde_json::from_str(&raw).unwrap_or_else(|error| {
                tracing::warn!(path = %path.display(), %error, "ignoring malformed cart config");
                Self::default()
            }),
            Err(_) => Self::default(),
        };

        config.apply_overrides(|name| std::env::var(name).ok());
        config
    }

    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(v) = lookup("PMG_CART_KEY") {
            self.cart_key = v;
        }
        if let Some(v) = lookup("PMG_ORDER_KEY") {
            self.order_key = v;
        }
        if let Some(v) = lookup("PMG_DB_FILE") {
            self.database_file = v;
        }
    }
}
