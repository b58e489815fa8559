mod csrf;
mod json_error;
mod panic;

pub use csrf::{CSRF_HEADER, csrf_guard};
pub use json_error::json_error_middleware;
pub use panic::catch_panic_layer;
