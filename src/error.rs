//! Error types for the routing tree.

use thiserror::Error;

/// An internal invariant of the radix tree was violated.
///
/// These never occur for any sequence of valid insertions. A lookup miss is
/// not an error and is reported as `None` instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TreeError {
    /// An edge was added under a label that the node already has.
    #[error("edge {label:#04x} already exists")]
    DuplicateEdge { label: u8 },

    /// An edge was replaced under a label that the node does not have.
    #[error("replacing missing edge {label:#04x}")]
    MissingEdge { label: u8 },
}
