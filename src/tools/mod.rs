//! Shared machinery for the coding modules.

pub mod bitio;
pub mod fgk_tree;
