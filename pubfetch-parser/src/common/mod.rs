//! Building blocks shared by both schema variants

pub mod select;
pub mod tree;
pub mod xml_utils;

pub use tree::{Element, Node};
