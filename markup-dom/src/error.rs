//! Error types for markup-dom.

use thiserror::Error;

use crate::node::NodeKind;

/// Result type alias for markup-dom operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building, editing or parsing a node tree.
#[derive(Error, Debug)]
pub enum Error {
    /// A character offset past the end of a node's data.
    #[error("Index out of range: offset {offset} exceeds data length {length}")]
    IndexOutOfRange {
        /// The requested offset, in characters.
        offset: usize,
        /// The data length at the time of the call, in characters.
        length: usize,
    },

    /// A character-data operation was invoked on another kind of node.
    #[error("Node of kind {0} does not hold character data")]
    NotCharacterData(NodeKind),

    /// A tree edit that would make a node its own ancestor, or move a
    /// document node under a parent.
    #[error("Hierarchy request error: {0}")]
    HierarchyRequest(String),

    /// Markup parsing error.
    #[error("Markup parse error: {0}")]
    Parse(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// XML error from quick-xml.
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),
}
