use serde_json::Value;
use tracing::{debug, warn};

use crate::cart::{is_valid_id, Cart};
use crate::config::CartConfig;
use crate::error::Result;
use crate::models::{CartItem, Order};
use crate::page::{Page, CART_COUNT};
use crate::storage::Storage;

pub struct CartStore<S> {
    storage: S,
    cart_key: String,
    order_key: String,
}

impl<S: Storage> CartStore<S> {
    pub fn new(storage: S, config: &CartConfig) -> Self {
        Self {
            storage,
            cart_key: config.cart_key.clone(),
            order_key: config.order_key.clone(),
        }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Current cart. Missing or corrupt data reads as an empty cart; only a
    /// failing storage backend is an error.
    pub fn read(&self) -> Result<Cart> {
        Ok(match self.storage.get(&self.cart_key)? {
            Some(raw) => decode_cart(&raw),
            None => Cart::new(),
        })
    }

    /// Persists the cart, then refreshes the badge on `page` when given.
    pub fn write(&self, cart: &Cart, page: Option<&mut dyn Page>) -> Result<()> {
        let raw = serde_json::to_string(cart)?;
        self.storage.set(&self.cart_key, &raw)?;
        debug!(items = cart.len(), "cart written");

        if let Some(page) = page {
            self.update_badge(page)?;
        }
        Ok(())
    }

    pub fn clear(&self, page: Option<&mut dyn Page>) -> Result<()> {
        self.storage.remove(&self.cart_key)?;

        if let Some(page) = page {
            self.update_badge(page)?;
        }
        Ok(())
    }

    pub fn badge_count(&self) -> Result<u64> {
        Ok(self.read()?.total_quantity())
    }

    pub fn update_badge(&self, page: &mut dyn Page) -> Result<()> {
        if !page.has_element(CART_COUNT) {
            return Ok(());
        }
        let count = self.badge_count()?;
        page.set_text(CART_COUNT, &count.to_string());
        Ok(())
    }

    pub fn read_last_order(&self) -> Result<Option<Order>> {
        let Some(raw) = self.storage.get(&self.order_key)? else {
            return Ok(None);
        };
        match serde_json::from_str(&raw) {
            Ok(order) => Ok(Some(order)),
            Err(error) => {
                warn!(%error, "discarding unreadable last order");
                Ok(None)
            }
        }
    }

    pub fn write_last_order(&self, order: &Order) -> Result<()> {
        let raw = serde_json::to_string(order)?;
        self.storage.set(&self.order_key, &raw)?;
        Ok(())
    }
}

/// Decodes a stored cart record by record. Records without a usable id,
/// price or quantity are dropped; duplicate ids are merged.
pub fn decode_cart(raw: &str) -> Cart {
    let records = match serde_json::from_str::<Value>(raw) {
        Ok(Value::Array(records)) => records,
        Ok(_) => {
            warn!("stored cart is not a list, starting empty");
            return Cart::new();
        }
        Err(error) => {
            warn!(%error, "stored cart is corrupt, starting empty");
            return Cart::new();
        }
    };

    let mut cart = Cart::new();
    for (index, record) in records.iter().enumerate() {
        match decode_item(record) {
            Some(item) => {
                cart.merge(item);
            }
            None => warn!(index, "dropping malformed cart record"),
        }
    }
    cart
}

fn decode_item(record: &Value) -> Option<CartItem> {
    let obj = record.as_object()?;

    let id = obj.get("id")?.as_str().filter(|id| is_valid_id(id))?;
    let price = whole_number(obj.get("price")?)?;
    let qty = match obj.get("qty") {
        None | Some(Value::Null) => 1,
        Some(v) => whole_number(v).filter(|q| *q >= 1)?,
    };

    Some(CartItem {
        id: id.to_string(),
        title: text(obj.get("title")).unwrap_or_default(),
        price,
        img: text(obj.get("img")),
        meta: text(obj.get("meta")),
        qty: u32::try_from(qty).unwrap_or(u32::MAX),
    })
}

fn whole_number(value: &Value) -> Option<u64> {
    if let Some(n) = value.as_u64() {
        return Some(n);
    }
    let n = value.as_f64()?;
    (n.is_finite() && n >= 0.0).then(|| n.trunc() as u64)
}

fn text(value: Option<&Value>) -> Option<String> {
    value?.as_str().map(str::to_string)
}
