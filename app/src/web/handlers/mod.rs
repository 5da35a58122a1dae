// bazaar_admin/src/web/handlers/mod.rs

pub mod health_handlers;
pub mod product_handlers;
pub mod user_handlers;
