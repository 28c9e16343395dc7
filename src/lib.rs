pub mod cart;
pub mod clock;
pub mod config;
pub mod controller;
pub mod db;
pub mod error;
pub mod filters;
pub mod logging;
pub mod models;
pub mod page;
pub mod render;
pub mod storage;
pub mod store;

#[cfg(feature = "app")]
mod commands;


pub use cart::{calc_totals, Cart};
pub use config::CartConfig;
pub use controller::CartController;
pub use db::Database;
pub use error::CartError;
pub use models::{Billing, CartItem, NewCartItem, Order, OrderStatus, Totals};
pub use page::{Page, PageContext, PageState, PageUpdate};
pub use storage::{MemoryStorage, Storage};
pub use store::CartStore;

#[cfg(feature = "app")]
#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    use tauri::Manager;

    logging::init();

    tauri::Builder::default()
        .setup(|app| {
            let data_dir = app.path().app_data_dir()?;
            let config = CartConfig::load(&data_dir);

            // Initialize database
            let db = Database::new(app.handle(), &config)?;
            db.initialize()?;
            tracing::info!(file = %config.database_file, "cart storage ready");

            app.manage(db);
            app.manage(config);
            Ok(())
        })
        .invoke_handler(tauri::generate_handler![
            commands::cart::add_to_cart,
            commands::cart::update_cart_qty,
            commands::cart::remove_from_cart,
            commands::cart::render_cart,
            commands::cart::checkout_cart,
            commands::cart::update_cart_badge,
            commands::cart::page_loaded,
            commands::cart::get_cart,
            commands::cart::get_last_order,
        ])
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
