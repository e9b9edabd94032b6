//! Input boundary
//!
//! Mouse click backends the engine drives, and the hotkey binding a key
//! listener calls into.

pub mod click;
pub mod hotkey;

pub use click::*;
pub use hotkey::{Hotkey, HotkeyBinding, HotkeyError};
