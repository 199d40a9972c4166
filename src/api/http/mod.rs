// src/api/http/mod.rs

mod handlers;
mod mood;
mod pages;
mod router;
mod story;

pub use handlers::health_handler;
pub use mood::update_mood;
pub use pages::{app_js_handler, index_handler, progress_handler};
pub use router::{build_router, http_router};
pub use story::generate_story;
