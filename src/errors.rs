use thiserror::Error;

use crate::utils::side::Side;

/// Error type for change records that cannot be turned into a valid `Change`
#[derive(Error, Debug)]
pub enum ChangeError {
    /// The record isn't valid JSON or doesn't have the expected shape
    #[cfg(feature = "serde")]
    #[error("Malformed change record: {0}")]
    Json(#[from] serde_json::Error),

    /// The range ends before it starts
    #[error("Invalid change: the {side} range {from}..{to} ends before it starts")]
    InvertedRange {
        /// The coordinate system of the range
        side: Side,
        /// The declared start of the range
        from: usize,
        /// The declared end of the range
        to: usize,
    },

    /// The spans don't cover the declared range exactly
    #[error(
        "Invalid change: the {side} spans cover {actual} positions, but the range covers \
         {expected}"
    )]
    SpanLengthMismatch {
        /// The coordinate system of the spans
        side: Side,
        /// The length of the declared range
        expected: usize,
        /// The sum of the span lengths
        actual: usize,
    },
}

/// Error type for building documents and editing text
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DocumentError {
    #[error("Unknown node type `{name}`")]
    UnknownNodeType { name: String },

    #[error("Node type `{name}` is declared more than once")]
    DuplicateNodeType { name: String },

    #[error("Node type `{name}` is a leaf and cannot have children")]
    LeafWithChildren { name: String },

    #[error("Node type `{name}` is not a leaf")]
    NotALeaf { name: String },

    #[error("Position {position} is outside of the document (size {size})")]
    PositionOutOfBounds { position: usize, size: usize },

    #[error("Range {from}..{to} ends before it starts")]
    InvertedRange { from: usize, to: usize },
}

#[cfg(test)]
mod tests {
    use insta::assert_snapshot;

    use super::*;

    #[test]
    fn test_change_error_messages() {
        assert_snapshot!(
            ChangeError::InvertedRange { side: Side::A, from: 4, to: 2 }.to_string(),
            @"Invalid change: the A (old document) range 4..2 ends before it starts"
        );
        assert_snapshot!(
            ChangeError::SpanLengthMismatch { side: Side::B, expected: 3, actual: 2 }.to_string(),
            @"Invalid change: the B (new document) spans cover 2 positions, but the range covers 3"
        );
    }

    #[test]
    fn test_document_error_messages() {
        assert_snapshot!(
            DocumentError::PositionOutOfBounds { position: 100, size: 11 }.to_string(),
            @"Position 100 is outside of the document (size 11)"
        );
        assert_snapshot!(
            DocumentError::LeafWithChildren { name: "image".to_owned() }.to_string(),
            @"Node type `image` is a leaf and cannot have children"
        );
    }
}
