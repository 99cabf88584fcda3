//! Frontend abstraction layer
//!
//! This module defines the `Frontend` trait implemented by the terminal UI and
//! the plain line writer. It provides a unified interface for event polling,
//! rendering, and cleanup.

pub mod events;
pub mod line;
pub mod markup;
pub mod tui;

use crate::core::AppCore;
use anyhow::Result;
pub use events::FrontendEvent;
pub use line::LineFrontend;
pub use tui::TuiFrontend;

/// Frontend trait - implemented by every way of showing the page
pub trait Frontend {
    /// Poll for user input events
    ///
    /// Returns all pending events converted to the frontend-agnostic
    /// `FrontendEvent` enum (empty if none).
    fn poll_events(&mut self) -> Result<Vec<FrontendEvent>>;

    /// Render the current page
    ///
    /// Called whenever `AppCore::needs_render` is set. Frontends only read the
    /// page; all updates happen in the core.
    fn render(&mut self, app: &AppCore) -> Result<()>;

    /// Restore the terminal and release resources before exit
    fn cleanup(&mut self) -> Result<()>;

    /// Current drawing area in character cells
    fn size(&self) -> (u16, u16);
}
