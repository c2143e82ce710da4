pub mod draw_service;
pub mod providers;

pub use draw_service::*;
pub use providers::*;
