//! # skr-core
//!
//! Shared vocabulary for the skr workspace: the unified error type, the
//! bounded upward directory walk used by config and skill discovery, and the
//! priority-ordered overlay that implements "first source wins" merging.

pub mod error;
pub mod overlay;
pub mod walk;

pub use error::{Result, SkrError, Skipped};
pub use overlay::overlay_first_wins;
pub use walk::{MAX_WALK_DEPTH, find_dir_upward, find_upward};
