//! Error handling for Flowkit
//!
//! Provides the error types used across the workspace:
//! - Diagram errors (operations the model declines)
//! - Geometry errors (degenerate input that cannot be given a fallback)
//! - I/O and generic errors
//!
//! Interactive diagram operations never surface a [`DiagramError`] to their
//! caller; the model logs the reason and returns `None`/`false`. The typed
//! error exists so the reason is explicit where the decision is made.

use thiserror::Error;

/// Reasons a diagram operation is declined.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DiagramError {
    /// The referenced item does not exist (or was removed)
    #[error("Item {id} does not exist")]
    MissingItem {
        /// The id that could not be resolved.
        id: u64,
    },

    /// The referenced item exists but is not a node
    #[error("Item {id} is not a node")]
    NotANode {
        /// The offending item id.
        id: u64,
    },

    /// The referenced item exists but is not a link
    #[error("Item {id} is not a link")]
    NotALink {
        /// The offending item id.
        id: u64,
    },

    /// Reflexive links are disabled
    #[error("Reflexive link on node {node} is not allowed")]
    ReflexiveLink {
        /// The node that would link to itself.
        node: u64,
    },

    /// Multiple links between the same pair are disabled
    #[error("Nodes {origin} and {destination} are already linked")]
    DuplicateLink {
        /// Origin node id.
        origin: u64,
        /// Destination node id.
        destination: u64,
    },

    /// Pin index does not exist on the node
    #[error("Pin {pin} is out of range for node {node}")]
    PinOutOfRange {
        /// The node id.
        node: u64,
        /// The requested pin index.
        pin: usize,
    },

    /// Point index does not exist on the link
    #[error("Point index {index} is out of range (link has {len} points)")]
    PointOutOfRange {
        /// The requested index.
        index: usize,
        /// Number of points on the link.
        len: usize,
    },

    /// The operation would leave a link with fewer than two points
    #[error("A link must keep at least two points")]
    TooFewPoints,

    /// The operation does not apply to the link's line style
    #[error("Operation not supported for {style} links")]
    UnsupportedForStyle {
        /// Display name of the line style.
        style: String,
    },

    /// The reserved idle action code was used to open a group
    #[error("The 'none' action code cannot open an undo group")]
    ReservedActionCode,
}

/// Main error type for Flowkit
#[derive(Error, Debug)]
pub enum Error {
    /// Diagram operation error
    #[error(transparent)]
    Diagram(#[from] DiagramError),

    /// Geometry error
    #[error("Geometry error: {0}")]
    Geometry(String),

    /// Standard I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an error from a string message
    pub fn other(msg: impl Into<String>) -> Self {
        Error::Other(msg.into())
    }

    /// Check if this is a diagram error
    pub fn is_diagram_error(&self) -> bool {
        matches!(self, Error::Diagram(_))
    }

    /// Check if this is an I/O error
    pub fn is_io_error(&self) -> bool {
        matches!(self, Error::Io(_))
    }
}

/// Result type for Flowkit operations
pub type Result<T> = std::result::Result<T, Error>;
