pub mod api;
mod entry;
pub mod public;

pub use entry::{API_PREFIX, build_app, router};
