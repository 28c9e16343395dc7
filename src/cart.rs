use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::{CartItem, NewCartItem, Totals};

pub const TAX_PERCENT: u64 = 5;
pub const FREE_SHIPPING_ABOVE: u64 = 50_000;
pub const SHIPPING_FEE: u64 = 200;

/// Line items in insertion order, at most one per id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&CartItem> {
        self.items.iter().find(|i| i.id == id)
    }

    pub fn total_quantity(&self) -> u64 {
        self.items.iter().map(|i| u64::from(i.qty)).sum()
    }

    /// Inserts a new line item or increments the existing one.
    /// A missing or zero quantity counts as 1.
    pub fn add(&mut self, item: NewCartItem) -> &CartItem {
        let qty = item.qty.filter(|q| *q > 0).unwrap_or(1);
        self.merge(CartItem {
            id: item.id,
            title: item.title,
            price: item.price,
            img: item.img,
            meta: item.meta,
            qty,
        })
    }

    pub(crate) fn merge(&mut self, item: CartItem) -> &CartItem {
        let idx = match self.items.iter().position(|i| i.id == item.id) {
            Some(idx) => {
                let existing = &mut self.items[idx];
                existing.qty = existing.qty.saturating_add(item.qty);
                idx
            }
            None => {
                self.items.push(item);
                self.items.len() - 1
            }
        };
        &self.items[idx]
    }

    /// Sets the quantity of an existing item; 0 removes it.
    /// Returns false when the id is not in the cart.
    pub fn set_quantity(&mut self, id: &str, qty: u32) -> bool {
        let Some(idx) = self.items.iter().position(|i| i.id == id) else {
            return false;
        };
        if qty == 0 {
            self.items.remove(idx);
        } else {
            self.items[idx].qty = qty;
        }
        true
    }

    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.items.len();
        self.items.retain(|i| i.id != id);
        self.items.len() != before
    }

    pub fn into_items(self) -> Vec<CartItem> {
        self.items
    }
}

/// Ids must be non-empty; applies both when adding and when decoding storage.
pub fn is_valid_id(id: &str) -> bool {
    !id.is_empty()
}

/// Computed in u128 so no catalog price can overflow; each figure saturates
/// at `u64::MAX` only when its exact value does not fit.
pub fn calc_totals(cart: &Cart) -> Totals {
    let subtotal: u128 = cart
        .items()
        .iter()
        .map(|item| u128::from(item.price) * u128::from(item.qty))
        .sum();
    // round half up
    let tax = (subtotal * u128::from(TAX_PERCENT) + 50) / 100;
    let shipping = if subtotal > u128::from(FREE_SHIPPING_ABOVE) {
        0
    } else {
        u128::from(SHIPPING_FEE)
    };

    Totals {
        subtotal: saturate(subtotal),
        tax: saturate(tax),
        shipping: saturate(shipping),
        total: saturate(subtotal + tax + shipping),
    }
}

fn saturate(n: u128) -> u64 {
    u64::try_from(n).unwrap_or(u64::MAX)
}

/// Coerces a raw quantity from the page (number or numeric string) into a
/// non-negative integer. Anything unparseable becomes 0.
pub fn coerce_quantity(raw: &Value) -> u32 {
    let n = match raw {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => {
            let s = s.trim();
            if s.is_empty() {
                None
            } else {
                s.parse::<f64>().ok()
            }
        }
        _ => None,
    };

    match n {
        Some(n) if n.is_finite() && n >= 1.0 => {
            if n >= f64::from(u32::MAX) {
                u32::MAX
            } else {
                n.trunc() as u32
            }
        }
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn new_item(id: &str, price: u64, qty: Option<u32>) -> NewCartItem {
        NewCartItem {
            id: id.to_string(),
            title: format!("Item {id}"),
            price,
            img: None,
            meta: None,
            qty,
        }
    }

    #[test]
    fn test_add_same_id_twice_merges() {
        let mut cart = Cart::new();
        cart.add(new_item("a", 100, Some(1)));
        cart.add(new_item("a", 100, Some(1)));

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.get("a").unwrap().qty, 2);
    }

    #[test]
    fn test_add_distinct_ids_sums_per_id() {
        let mut cart = Cart::new();
        let adds = [("a", 2), ("b", 1), ("a", 3), ("c", 4), ("b", 5)];
        for (id, qty) in adds {
            cart.add(new_item(id, 10, Some(qty)));
        }

        assert_eq!(cart.len(), 3);
        assert_eq!(cart.get("a").unwrap().qty, 5);
        assert_eq!(cart.get("b").unwrap().qty, 6);
        assert_eq!(cart.get("c").unwrap().qty, 4);
        let order: Vec<&str> = cart.items().iter().map(|i| i.id.as_str()).collect();
        assert_eq!(order, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_add_defaults_quantity_to_one() {
        let mut cart = Cart::new();
        cart.add(new_item("a", 10, None));
        cart.add(new_item("b", 10, Some(0)));
        cart.add(new_item("a", 10, None));

        assert_eq!(cart.get("a").unwrap().qty, 2);
        assert_eq!(cart.get("b").unwrap().qty, 1);
    }

    #[test]
    fn test_set_quantity_zero_removes() {
        let mut cart = Cart::new();
        cart.add(new_item("a", 10, Some(3)));
        cart.add(new_item("b", 10, Some(1)));

        assert!(cart.set_quantity("a", 0));
        assert!(cart.get("a").is_none());
        assert_eq!(cart.len(), 1);
    }

    #[test]
    fn test_set_quantity_unknown_id() {
        let mut cart = Cart::new();
        cart.add(new_item("a", 10, Some(3)));

        assert!(!cart.set_quantity("zzz", 4));
        assert_eq!(cart.get("a").unwrap().qty, 3);
    }

    #[test]
    fn test_remove() {
        let mut cart = Cart::new();
        cart.add(new_item("a", 10, None));

        assert!(cart.remove("a"));
        assert!(!cart.remove("a"));
        assert!(cart.is_empty());
    }

    // ===== TOTALS =====

    #[test]
    fn test_totals_below_threshold() {
        let mut cart = Cart::new();
        cart.add(new_item("a", 1000, Some(2)));
        cart.add(new_item("b", 500, Some(1)));

        let totals = calc_totals(&cart);
        assert_eq!(
            totals,
            Totals {
                subtotal: 2500,
                tax: 125,
                shipping: 200,
                total: 2825,
            }
        );
    }

    #[test]
    fn test_totals_free_shipping_above_threshold() {
        let mut cart = Cart::new();
        cart.add(new_item("tv", 50_001, Some(1)));

        let totals = calc_totals(&cart);
        assert_eq!(totals.shipping, 0);
        assert_eq!(totals.tax, 2500);
        assert_eq!(totals.total, 52_501);
    }

    #[test]
    fn test_totals_threshold_is_exclusive() {
        let mut cart = Cart::new();
        cart.add(new_item("a", 50_000, Some(1)));

        assert_eq!(calc_totals(&cart).shipping, SHIPPING_FEE);
    }

    #[test]
    fn test_tax_rounds_half_up() {
        let mut cart = Cart::new();
        cart.add(new_item("a", 10, Some(1)));
        assert_eq!(calc_totals(&cart).tax, 1);

        let mut cart = Cart::new();
        cart.add(new_item("a", 9, Some(1)));
        assert_eq!(calc_totals(&cart).tax, 0);
    }

    #[test]
    fn test_totals_with_extreme_prices() {
        let mut cart = Cart::new();
        cart.add(new_item("a", u64::MAX, Some(1)));

        let totals = calc_totals(&cart);
        assert_eq!(totals.subtotal, u64::MAX);
        assert_eq!(totals.tax, 922_337_203_685_477_581);
        assert_eq!(totals.shipping, 0);
        assert_eq!(totals.total, u64::MAX);
    }

    #[test]
    fn test_tax_exact_above_fifth_of_max() {
        let price = u64::MAX / 4;
        let mut cart = Cart::new();
        cart.add(new_item("a", price, Some(1)));

        let expected = (u128::from(price) * 5 + 50) / 100;
        assert_eq!(u128::from(calc_totals(&cart).tax), expected);
    }

    #[test]
    fn test_valid_id() {
        assert!(is_valid_id("tee-01"));
        assert!(!is_valid_id(""));
    }

    #[test]
    fn test_empty_cart_totals() {
        let totals = calc_totals(&Cart::new());
        assert_eq!(totals.subtotal, 0);
        assert_eq!(totals.shipping, SHIPPING_FEE);
        assert_eq!(totals.total, SHIPPING_FEE);
    }

    // ===== QUANTITY COERCION =====

    #[test]
    fn test_coerce_quantity() {
        assert_eq!(coerce_quantity(&json!(3)), 3);
        assert_eq!(coerce_quantity(&json!("4")), 4);
        assert_eq!(coerce_quantity(&json!(" 2 ")), 2);
        assert_eq!(coerce_quantity(&json!(2.7)), 2);
        assert_eq!(coerce_quantity(&json!(-5)), 0);
        assert_eq!(coerce_quantity(&json!("")), 0);
        assert_eq!(coerce_quantity(&json!("abc")), 0);
        assert_eq!(coerce_quantity(&json!(null)), 0);
        assert_eq!(coerce_quantity(&json!({"qty": 1})), 0);
        assert_eq!(coerce_quantity(&json!(0.5)), 0);
    }
}
