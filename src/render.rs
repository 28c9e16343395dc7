//! Cart table and totals markup.

use askama::Template;

use crate::cart::{Cart, TAX_PERCENT};
use crate::error::Result;
use crate::filters;
use crate::models::{CartItem, Totals};

pub const CART_COLUMNS: usize = 6;
pub const EMPTY_CART_MESSAGE: &str = "Your cart is empty.";

/// One table row, with the placeholder image already resolved.
pub struct RowView<'a> {
    pub id: &'a str,
    pub title: &'a str,
    pub img: &'a str,
    pub meta: &'a str,
    pub price: u64,
    pub qty: u32,
    pub line_total: u64,
}

impl<'a> RowView<'a> {
    pub fn new(item: &'a CartItem, placeholder_image: &'a str) -> Self {
        Self {
            id: &item.id,
            title: &item.title,
            img: item.img.as_deref().unwrap_or(placeholder_image),
            meta: item.meta.as_deref().unwrap_or_default(),
            price: item.price,
            qty: item.qty,
            line_total: item.line_total(),
        }
    }
}

#[derive(Template)]
#[template(path = "cart_rows.html")]
pub struct CartRowsTemplate<'a> {
    pub rows: Vec<RowView<'a>>,
}

#[derive(Template)]
#[template(path = "cart_empty.html")]
pub struct EmptyCartTemplate {
    pub columns: usize,
}

#[derive(Template)]
#[template(path = "cart_totals.html")]
pub struct CartTotalsTemplate<'a> {
    pub totals: &'a Totals,
    pub tax_percent: u64,
}

pub fn render_rows(cart: &Cart, placeholder_image: &str) -> Result<String> {
    if cart.is_empty() {
        let empty = EmptyCartTemplate {
            columns: CART_COLUMNS,
        };
        return Ok(empty.render()?);
    }

    let rows = cart
        .items()
        .iter()
        .map(|item| RowView::new(item, placeholder_image))
        .collect();
    Ok(CartRowsTemplate { rows }.render()?)
}

pub fn render_totals(totals: &Totals) -> Result<String> {
    let template = CartTotalsTemplate {
        totals,
        tax_percent: TAX_PERCENT,
    };
    Ok(template.render()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewCartItem;

    fn cart_with(id: &str, title: &str, meta: Option<&str>, img: Option<&str>) -> Cart {
        let mut cart = Cart::new();
        cart.add(NewCartItem {
            id: id.to_string(),
            title: title.to_string(),
            price: 125_000,
            img: img.map(str::to_string),
            meta: meta.map(str::to_string),
            qty: Some(2),
        });
        cart
    }

    #[test]
    fn test_rows_escape_catalog_text() {
        let cart = cart_with(
            "x1",
            "<script>alert(1)</script>",
            Some("<img onerror=x>"),
            None,
        );
        let html = render_rows(&cart, "p.jpg").unwrap();

        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
        assert!(!html.contains("<img onerror"));
    }

    #[test]
    fn test_rows_escape_quotes_in_ids() {
        let cart = cart_with("x'); steal('", "Tee", None, None);
        let html = render_rows(&cart, "p.jpg").unwrap();

        assert!(!html.contains("x'); steal('"));
        assert!(!html.contains("removeFromCart('x'"));
    }

    #[test]
    fn test_row_contents() {
        let cart = cart_with("tee-01", "Tee", Some("Size M"), None);
        let html = render_rows(&cart, "p.jpg").unwrap();

        assert_eq!(html.matches("<tr>").count(), 1);
        assert!(html.contains(r#"src="p.jpg""#));
        assert!(html.contains("<strong>Tee</strong>"));
        assert!(html.contains("Size M"));
        assert!(html.contains("₹1,25,000"));
        assert!(html.contains("₹2,50,000"));
        assert!(html.contains(r#"value="2""#));
        assert!(html.contains("updateCartQty('tee-01', this.value)"));
        assert!(html.contains("removeFromCart('tee-01')"));
    }

    #[test]
    fn test_row_uses_item_image() {
        let cart = cart_with("a", "A", None, Some("a.jpg"));
        let html = render_rows(&cart, "p.jpg").unwrap();
        assert!(html.contains(r#"src="a.jpg""#));
    }

    #[test]
    fn test_empty_rows() {
        let html = render_rows(&Cart::new(), "p.jpg").unwrap();
        assert!(html.contains(EMPTY_CART_MESSAGE));
        assert!(html.contains(r#"colspan="6""#));
    }

    #[test]
    fn test_totals_block() {
        let html = render_totals(&Totals {
            subtotal: 2500,
            tax: 125,
            shipping: 200,
            total: 2825,
        })
        .unwrap();

        assert!(html.contains("Subtotal:</strong> ₹2,500"));
        assert!(html.contains("Tax (5%):</strong> ₹125"));
        assert!(html.contains("Shipping:</strong> ₹200"));
        assert!(html.contains("Total: ₹2,825"));
    }
}
