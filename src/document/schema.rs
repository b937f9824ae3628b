use std::{collections::HashMap, sync::Arc};

use super::Node;
use crate::errors::DocumentError;

/// Small integer identifying a node type within a schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeTypeId(u32);

impl NodeTypeId {
    pub const TEXT: NodeTypeId = NodeTypeId(0);
    pub const DOC: NodeTypeId = NodeTypeId(1);

    const FIRST_DECLARED: u32 = 2;

    #[must_use]
    pub fn value(self) -> u32 { self.0 }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NodeType {
    id: NodeTypeId,
    name: Arc<str>,
    is_leaf: bool,
}

impl NodeType {
    /// The type of the root node of every document.
    #[must_use]
    pub fn doc() -> Self {
        NodeType {
            id: NodeTypeId::DOC,
            name: "doc".into(),
            is_leaf: false,
        }
    }

    #[must_use]
    pub fn id(&self) -> NodeTypeId { self.id }

    #[must_use]
    pub fn name(&self) -> &str { &self.name }

    #[must_use]
    pub fn is_leaf(&self) -> bool { self.is_leaf }
}

/// Declaration of a node type, see `Schema::new`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeSpec {
    name: String,
    is_leaf: bool,
}

impl NodeSpec {
    /// A node type with content, such as a paragraph.
    pub fn element(name: impl Into<String>) -> Self {
        NodeSpec {
            name: name.into(),
            is_leaf: false,
        }
    }

    /// An atomic node type, such as an image.
    pub fn leaf(name: impl Into<String>) -> Self {
        NodeSpec {
            name: name.into(),
            is_leaf: true,
        }
    }
}

/// The set of node types documents are built from. Type ids are assigned
/// once, when the schema is created, and the lookup table is never modified
/// afterwards, so a schema can be shared between threads freely.
#[derive(Debug, Clone)]
pub struct Schema {
    types: Arc<HashMap<Arc<str>, NodeType>>,
}

impl Schema {
    /// Creates a schema from its node types. `doc` and `text` are always
    /// part of the schema and can't be declared again.
    pub fn new(specs: impl IntoIterator<Item = NodeSpec>) -> Result<Self, DocumentError> {
        let doc = NodeType::doc();
        let mut types = HashMap::from([(Arc::clone(&doc.name), doc)]);
        let mut next_id = NodeTypeId::FIRST_DECLARED;

        for spec in specs {
            if spec.name == "text" || types.contains_key(spec.name.as_str()) {
                return Err(DocumentError::DuplicateNodeType { name: spec.name });
            }

            let name: Arc<str> = spec.name.into();
            types.insert(
                Arc::clone(&name),
                NodeType {
                    id: NodeTypeId(next_id),
                    name,
                    is_leaf: spec.is_leaf,
                },
            );
            next_id += 1;
        }

        Ok(Schema {
            types: Arc::new(types),
        })
    }

    pub fn node_type(&self, name: &str) -> Result<&NodeType, DocumentError> {
        self.types
            .get(name)
            .ok_or_else(|| DocumentError::UnknownNodeType {
                name: name.to_owned(),
            })
    }

    /// Creates a node with content.
    pub fn element(&self, name: &str, children: Vec<Node>) -> Result<Node, DocumentError> {
        let node_type = self.node_type(name)?;
        if node_type.is_leaf {
            return Err(DocumentError::LeafWithChildren {
                name: name.to_owned(),
            });
        }

        Ok(Node::element(node_type.clone(), children))
    }

    /// Creates an atomic node.
    pub fn leaf(&self, name: &str) -> Result<Node, DocumentError> {
        let node_type = self.node_type(name)?;
        if !node_type.is_leaf {
            return Err(DocumentError::NotALeaf {
                name: name.to_owned(),
            });
        }

        Ok(Node::leaf(node_type.clone()))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::document::DocumentNode;

    fn schema() -> Schema {
        Schema::new([NodeSpec::element("paragraph"), NodeSpec::leaf("image")]).unwrap()
    }

    #[test]
    fn test_ids_are_assigned_once() {
        let schema = schema();

        let paragraph = schema.node_type("paragraph").unwrap();
        let image = schema.node_type("image").unwrap();

        assert_eq!(paragraph.id(), NodeTypeId(2));
        assert_eq!(image.id(), NodeTypeId(3));
        assert_eq!(schema.node_type("doc").unwrap().id(), NodeTypeId::DOC);
        assert_eq!(schema.clone().node_type("image").unwrap(), image);
    }

    #[test]
    fn test_unknown_node_type() {
        assert_eq!(
            schema().element("heading", vec![]),
            Err(DocumentError::UnknownNodeType {
                name: "heading".to_owned()
            })
        );
    }

    #[test]
    fn test_duplicate_node_type() {
        assert_eq!(
            Schema::new([NodeSpec::leaf("image"), NodeSpec::element("image")]).unwrap_err(),
            DocumentError::DuplicateNodeType {
                name: "image".to_owned()
            }
        );
        assert!(Schema::new([NodeSpec::element("text")]).is_err());
        assert!(Schema::new([NodeSpec::element("doc")]).is_err());
    }

    #[test]
    fn test_leaf_and_element_are_checked() {
        let schema = schema();

        assert!(matches!(
            schema.element("image", vec![]),
            Err(DocumentError::LeafWithChildren { .. })
        ));
        assert!(matches!(
            schema.leaf("paragraph"),
            Err(DocumentError::NotALeaf { .. })
        ));
        assert!(schema.leaf("image").unwrap().is_leaf());
    }
}
