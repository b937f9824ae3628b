use std::sync::Arc;

use super::{DocumentNode, NodeType, NodeTypeId, fragment_size};

/// A mark applied to text, such as `strong` or `em`.
pub type Mark = Arc<str>;

/// An immutable document node. Cloning is cheap: content is shared.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Node(Inner);

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum Inner {
    Text {
        text: Arc<str>,
        marks: Arc<[Mark]>,
        length: usize,
    },
    Leaf {
        node_type: NodeType,
    },
    Element {
        node_type: NodeType,
        children: Arc<[Node]>,
        content_size: usize,
    },
}

impl Node {
    /// The root node of a document.
    #[must_use]
    pub fn doc(children: Vec<Node>) -> Self { Node::element(NodeType::doc(), children) }

    /// A document holding `text` as a single text node.
    #[must_use]
    pub fn text_doc(text: &str) -> Self {
        if text.is_empty() {
            Node::doc(vec![])
        } else {
            Node::doc(vec![Node::text(text)])
        }
    }

    #[must_use]
    pub fn text(text: &str) -> Self { Node::text_with_marks(text, std::iter::empty::<Mark>()) }

    pub fn text_with_marks(text: &str, marks: impl IntoIterator<Item = impl Into<Mark>>) -> Self {
        Node(Inner::Text {
            text: text.into(),
            marks: marks.into_iter().map(Into::into).collect(),
            length: text.chars().count(),
        })
    }

    pub(super) fn element(node_type: NodeType, children: Vec<Node>) -> Self {
        let content_size = fragment_size(&children);

        Node(Inner::Element {
            node_type,
            children: children.into(),
            content_size,
        })
    }

    pub(super) fn leaf(node_type: NodeType) -> Self { Node(Inner::Leaf { node_type }) }

    /// The node's type, `None` for text nodes.
    #[must_use]
    pub fn node_type(&self) -> Option<&NodeType> {
        match &self.0 {
            Inner::Text { .. } => None,
            Inner::Leaf { node_type } | Inner::Element { node_type, .. } => Some(node_type),
        }
    }

    /// The concatenated text of every text node inside this one.
    #[must_use]
    pub fn text_content(&self) -> String {
        let mut result = String::new();
        self.collect_text(&mut result);
        result
    }

    fn collect_text(&self, out: &mut String) {
        match &self.0 {
            Inner::Text { text, .. } => out.push_str(text),
            Inner::Leaf { .. } => {}
            Inner::Element { children, .. } => {
                for child in children.iter() {
                    child.collect_text(out);
                }
            }
        }
    }
}

impl DocumentNode for Node {
    type Mark = Mark;

    fn is_text(&self) -> bool { matches!(self.0, Inner::Text { .. }) }

    fn is_leaf(&self) -> bool { matches!(self.0, Inner::Leaf { .. }) }

    fn text(&self) -> &str {
        match &self.0 {
            Inner::Text { text, .. } => text,
            _ => "",
        }
    }

    fn marks(&self) -> &[Mark] {
        match &self.0 {
            Inner::Text { marks, .. } => marks,
            _ => &[],
        }
    }

    fn children(&self) -> &[Node] {
        match &self.0 {
            Inner::Element { children, .. } => children,
            _ => &[],
        }
    }

    fn node_size(&self) -> usize {
        match &self.0 {
            Inner::Text { length, .. } => *length,
            Inner::Leaf { .. } => 1,
            Inner::Element { content_size, .. } => content_size + 2,
        }
    }

    fn content_size(&self) -> usize {
        match &self.0 {
            Inner::Text { length, .. } => *length,
            Inner::Leaf { .. } => 0,
            Inner::Element { content_size, .. } => *content_size,
        }
    }

    fn node_type_id(&self) -> NodeTypeId {
        self.node_type().map_or(NodeTypeId::TEXT, NodeType::id)
    }
}
