pub mod html;
pub mod time;
