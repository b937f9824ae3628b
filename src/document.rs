//! The document model changes are tracked over.
//!
//! The engine only relies on the `DocumentNode` trait. `Node` and `Schema`
//! are a small concrete model implementing it.

mod node;
mod schema;

pub use node::{Mark, Node};
pub use schema::{NodeSpec, NodeType, NodeTypeId, Schema};

/// A node of a document tree.
///
/// Positions inside a node's content count one position per character of a
/// text node, one per leaf, and for every other node one position for its
/// opening boundary, its content, and one for its closing boundary.
pub trait DocumentNode: Sized {
    type Mark;

    fn is_text(&self) -> bool;

    /// Whether the node is atomic: a non-text node without content.
    fn is_leaf(&self) -> bool;

    /// The text of a text node, empty for other nodes.
    fn text(&self) -> &str;

    fn marks(&self) -> &[Self::Mark];

    /// Direct children, empty for text nodes and leaves.
    fn children(&self) -> &[Self];

    /// Number of positions the node occupies in its parent's content.
    fn node_size(&self) -> usize;

    /// Number of positions inside the node.
    fn content_size(&self) -> usize;

    /// Identifies the node's type. Nodes of the same type share an id.
    fn node_type_id(&self) -> NodeTypeId;
}

/// Total size of a list of sibling nodes.
pub fn fragment_size<N>(fragment: &[N]) -> usize
where
    N: DocumentNode,
{
    fragment.iter().map(DocumentNode::node_size).sum()
}
