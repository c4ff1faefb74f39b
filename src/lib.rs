pub mod core;
pub mod deluge;
pub mod handlers;
pub mod models;
pub mod retention;
pub mod runner;
pub mod store;
pub mod utils;
