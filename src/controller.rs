use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::{debug, info};

use crate::cart::{calc_totals, coerce_quantity, is_valid_id, Cart};
use crate::clock::{Clock, SystemClock};
use crate::config::CartConfig;
use crate::error::{CartError, Result};
use crate::models::{Billing, NewCartItem, Order, OrderStatus};
use crate::page::{Page, CART_BODY, CART_TOTALS};
use crate::render;
use crate::storage::Storage;
use crate::store::CartStore;

pub const ORDER_ID_PREFIX: &str = "PMG";

pub struct CartController<S, C = SystemClock> {
    store: CartStore<S>,
    config: CartConfig,
    clock: C,
}

impl<S: Storage> CartController<S> {
    pub fn new(storage: S, config: CartConfig) -> Self {
        Self::with_clock(storage, config, SystemClock)
    }
}

impl<S: Storage, C: Clock> CartController<S, C> {
    pub fn with_clock(storage: S, config: CartConfig, clock: C) -> Self {
        Self {
            store: CartStore::new(storage, &config),
            config,
            clock,
        }
    }

    pub fn store(&self) -> &CartStore<S> {
        &self.store
    }

    /// Adds an item and confirms on the page. An item without an id is
    /// refused with a notification and nothing is stored.
    pub fn add_item(&self, page: &mut dyn Page, item: NewCartItem) -> Result<Cart> {
        if !is_valid_id(&item.id) {
            notify(page, "This item cannot be added to the cart");
            return Err(CartError::InvalidItem("missing id".to_string()));
        }

        let mut cart = self.store.read()?;
        let added = cart.add(item);
        debug!(id = %added.id, qty = added.qty, "added to cart");

        self.store.write(&cart, Some(&mut *page))?;
        notify(page, "Added to cart");
        Ok(cart)
    }

    /// Sets an item's quantity, clamped at 0; 0 removes the item.
    /// Unknown ids leave the cart and the page untouched.
    pub fn set_quantity(&self, page: &mut dyn Page, id: &str, qty: i64) -> Result<Cart> {
        let qty = u32::try_from(qty.max(0)).unwrap_or(u32::MAX);
        let mut cart = self.store.read()?;
        if !cart.set_quantity(id, qty) {
            return Ok(cart);
        }
        debug!(id, qty, "quantity updated");

        self.store.write(&cart, Some(&mut *page))?;
        self.render_cart(page, &cart)?;
        Ok(cart)
    }

    /// `set_quantity` for raw input from the page, e.g. an input's value.
    pub fn set_quantity_input(&self, page: &mut dyn Page, id: &str, raw: &Value) -> Result<Cart> {
        self.set_quantity(page, id, i64::from(coerce_quantity(raw)))
    }

    pub fn remove_item(&self, page: &mut dyn Page, id: &str) -> Result<Cart> {
        let mut cart = self.store.read()?;
        cart.remove(id);
        debug!(id, "removed from cart");

        self.store.write(&cart, Some(&mut *page))?;
        self.render_cart(page, &cart)?;
        Ok(cart)
    }

    pub fn render(&self, page: &mut dyn Page) -> Result<()> {
        if !page.has_element(CART_BODY) || !page.has_element(CART_TOTALS) {
            return Ok(());
        }
        let cart = self.store.read()?;
        self.render_cart(page, &cart)
    }

    fn render_cart(&self, page: &mut dyn Page, cart: &Cart) -> Result<()> {
        if !page.has_element(CART_BODY) || !page.has_element(CART_TOTALS) {
            return Ok(());
        }

        let rows = render::render_rows(cart, &self.config.placeholder_image)?;
        page.set_html(CART_BODY, &rows);
        if cart.is_empty() {
            page.set_html(CART_TOTALS, "");
        } else {
            let totals = render::render_totals(&calc_totals(cart))?;
            page.set_html(CART_TOTALS, &totals);
        }
        Ok(())
    }

    /// Places an order for the current cart and redirects to the
    /// confirmation page. An empty cart alerts and changes nothing.
    pub fn checkout(&self, page: &mut dyn Page, billing: Option<Billing>) -> Result<Order> {
        let cart = self.store.read()?;
        if cart.is_empty() {
            page.alert(&CartError::EmptyCart.to_string());
            return Err(CartError::EmptyCart);
        }

        let now = self.clock.now();
        let order = Order {
            id: order_id(now),
            created_at: now,
            totals: calc_totals(&cart),
            items: cart.into_items(),
            billing: billing.unwrap_or_default(),
            status: OrderStatus::Placed,
        };

        self.store.write_last_order(&order)?;
        self.store.clear(Some(&mut *page))?;
        info!(order_id = %order.id, total = order.totals.total, "order placed");

        page.navigate(&confirmation_url(&self.config.confirmation_page, &order.id));
        Ok(order)
    }

    pub fn page_loaded(&self, page: &mut dyn Page) -> Result<()> {
        self.store.update_badge(page)?;
        if page.has_element(CART_BODY) {
            self.render(page)?;
        }
        Ok(())
    }

    pub fn last_order(&self) -> Result<Option<Order>> {
        self.store.read_last_order()
    }
}

/// Toast when the page has the toolkit, blocking alert otherwise.
pub fn notify(page: &mut dyn Page, message: &str) {
    if page.toast_available() {
        page.show_toast(message);
    } else {
        page.alert(message);
    }
}

/// Prefix plus the last eight digits of the epoch-millisecond timestamp.
pub fn order_id(now: DateTime<Utc>) -> String {
    let millis = now.timestamp_millis().unsigned_abs().to_string();
    let tail = &millis[millis.len().saturating_sub(8)..];
    format!("{ORDER_ID_PREFIX}{tail}").to_uppercase()
}

pub fn confirmation_url(page: &str, order_id: &str) -> String {
    let encoded: String = url::form_urlencoded::byte_serialize(order_id.as_bytes()).collect();
    format!("{page}?order={encoded}")
}
