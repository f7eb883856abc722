//! Renderables for each display mode plus the layout wrappers around them.

pub mod boxes;
pub mod csv;
pub mod document;
pub mod json;
pub mod layout;
pub mod markdown;
pub mod notebook;
pub mod rst;
pub mod rule;
pub mod syntax;
pub mod table;
