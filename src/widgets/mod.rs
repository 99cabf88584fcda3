//! Widget state structs (rendering-agnostic)
//!
//! Each widget turns an instant into a string. Frontends decide how that
//! string is drawn.

pub mod countdown;
pub mod notice;
pub mod template;

pub use countdown::{MidnightCountdown, COUNTDOWN_FIELDS};
pub use notice::{Notice, NOTICE_FIELDS};
pub use template::Template;
