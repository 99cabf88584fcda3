//! Core logic layer
//!
//! Page model, the repeating ticker and the application state that ties them
//! to the widgets. NO imports from frontend/ or rendering code.
//! Core updates the page, frontends read and render it.

pub mod app_core;
pub mod page;
pub mod ticker;

pub use app_core::{AppCore, PageFeatures};
