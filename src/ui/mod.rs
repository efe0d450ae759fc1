//! Widgets: everything that turns caller state into cells.
//!
//! Widgets hold no state of their own.  Each call reads the frame's pending
//! key, updates whatever the caller passed in, and draws the result.

pub mod edit_field;
pub mod flex_table;
pub mod markup;
pub mod text;
pub mod theme;
