//! Minimal XML tree and canonical serializer for the generated documents.

pub mod render;
pub mod tree;

pub use render::{escape_html, render, render_string, XML_DECLARATION};
pub use tree::{Document, Element, Node};
