use serde_json::Value;
use tauri::{AppHandle, Manager};

use crate::cart::Cart;
use crate::config::CartConfig;
use crate::controller::CartController;
use crate::db::{Database, DatabaseExt};
use crate::error::CartError;
use crate::models::{Billing, NewCartItem, Order};
use crate::page::{PageContext, PageState, PageUpdate};

fn controller(app: &AppHandle) -> CartController<&Database> {
    let config = app.state::<CartConfig>().inner().clone();
    CartController::new(app.db(), config)
}

/// A refused item is not an error for the webview: the update carries the notice.
#[tauri::command]
pub fn add_to_cart(
    app: AppHandle,
    page: PageContext,
    item: NewCartItem,
) -> Result<PageUpdate, String> {
    let mut page = PageState::new(page);
    match controller(&app).add_item(&mut page, item) {
        Ok(_) | Err(CartError::InvalidItem(_)) => Ok(page.into_update()),
        Err(e) => Err(e.to_string()),
    }
}

/// Quantity arrives as whatever the input element holds; it is coerced.
#[tauri::command]
pub fn update_cart_qty(
    app: AppHandle,
    page: PageContext,
    id: String,
    qty: Value,
) -> Result<PageUpdate, String> {
    let mut page = PageState::new(page);
    controller(&app)
        .set_quantity_input(&mut page, &id, &qty)
        .map_err(|e| e.to_string())?;
    Ok(page.into_update())
}

#[tauri::command]
pub fn remove_from_cart(
    app: AppHandle,
    page: PageContext,
    id: String,
) -> Result<PageUpdate, String> {
    let mut page = PageState::new(page);
    controller(&app)
        .remove_item(&mut page, &id)
        .map_err(|e| e.to_string())?;
    Ok(page.into_update())
}

#[tauri::command]
pub fn render_cart(app: AppHandle, page: PageContext) -> Result<PageUpdate, String> {
    let mut page = PageState::new(page);
    controller(&app)
        .render(&mut page)
        .map_err(|e| e.to_string())?;
    Ok(page.into_update())
}

/// An empty cart is not an error for the webview: the update carries the alert.
#[tauri::command]
pub fn checkout_cart(
    app: AppHandle,
    page: PageContext,
    billing: Option<Billing>,
) -> Result<PageUpdate, String> {
    let mut page = PageState::new(page);
    match controller(&app).checkout(&mut page, billing) {
        Ok(_) | Err(CartError::EmptyCart) => Ok(page.into_update()),
        Err(e) => Err(e.to_string()),
    }
}

#[tauri::command]
pub fn update_cart_badge(app: AppHandle, page: PageContext) -> Result<PageUpdate, String> {
    let mut page = PageState::new(page);
    controller(&app)
        .store()
        .update_badge(&mut page)
        .map_err(|e| e.to_string())?;
    Ok(page.into_update())
}

#[tauri::command]
pub fn page_loaded(app: AppHandle, page: PageContext) -> Result<PageUpdate, String> {
    let mut page = PageState::new(page);
    controller(&app)
        .page_loaded(&mut page)
        .map_err(|e| e.to_string())?;
    Ok(page.into_update())
}

#[tauri::command]
pub fn get_cart(app: AppHandle) -> Result<Cart, String> {
    controller(&app).store().read().map_err(|e| e.to_string())
}

#[tauri::command]
pub fn get_last_order(app: AppHandle) -> Result<Option<Order>, String> {
    controller(&app).last_order().map_err(|e| e.to_string())
}
