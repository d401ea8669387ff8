//! Document tree consumed by the Slate renderer
//!
//! This module defines the closed set of node kinds the renderer knows how to
//! emit, and the adapter that folds pulldown-cmark's event stream into that tree.

// Submodules
mod builder;
mod error;
mod node;

// Re-export public types
pub use builder::{build_document, DocumentBuilder, MAX_NESTING_DEPTH, PARSER_OPTIONS};
pub use error::TreeError;
pub use node::{CellAlign, Document, LinkDefinition, Node, TableCell, TableRow, TextScope};
