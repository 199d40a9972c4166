// src/lib.rs

pub mod api;
pub mod catalog;
pub mod config;
pub mod llm;
pub mod progress;
pub mod random;
pub mod soundscape;
pub mod state;
pub mod store;
pub mod story;
pub mod templates;

pub use state::AppState;
