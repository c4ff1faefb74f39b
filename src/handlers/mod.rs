pub mod fallback;
pub mod health;
pub mod run;
pub mod settings;
pub mod ui;
