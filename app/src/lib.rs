// bazaar_admin/src/lib.rs

//! HTTP surface for the Bazaar admin dashboard: configuration, a PostgreSQL store and actix-web routes
//! over the shared action layer.

pub mod config;
pub mod db;
pub mod errors;
pub mod seed;
pub mod state;
pub mod web;
