use crate::{
    change::Change,
    change_set::{ChangeSet, ChangeSetConfig},
    document::{DocumentNode, Node},
    errors::DocumentError,
    mapping::StepMap,
    simplify::simplify_changes_with,
    utils::string_builder::StringBuilder,
};

/// A plain text together with every change made to it since it was created.
///
/// Positions are counted in `char`s. Like `ChangeSet`, a `TrackedText` is
/// immutable: `replace` returns the edited version.
#[derive(Debug, Clone)]
pub struct TrackedText<D> {
    text: String,
    doc: Node,
    changes: ChangeSet<D, Node>,
}

impl<D> TrackedText<D>
where
    D: Clone + PartialEq + 'static,
{
    #[must_use]
    pub fn new(text: &str) -> Self {
        TrackedText {
            text: text.to_owned(),
            doc: Node::text_doc(text),
            changes: ChangeSet::create(Node::text_doc(text)),
        }
    }

    /// Restores a tracked text from its start text, its current text and the
    /// changes between the two, e.g. ones read with `Change::vec_from_json`.
    ///
    /// # Panics
    ///
    /// Panics if the changes are out of order or overlap.
    #[must_use]
    pub fn restore(start_text: &str, text: &str, changes: Vec<Change<D>>) -> Self {
        TrackedText {
            text: text.to_owned(),
            doc: Node::text_doc(text),
            changes: ChangeSet::with_config(
                ChangeSetConfig::new(Node::text_doc(start_text)),
                changes,
            ),
        }
    }

    /// Computes the changes turning `old` into `new` in a single step, as if
    /// the whole text had been replaced.
    #[must_use]
    pub fn diff(old: &str, new: &str, data: D) -> Vec<Change<D>> {
        let tracked = TrackedText::new(old);
        let doc = Node::text_doc(new);
        let map = StepMap::replace(0, tracked.doc.content_size(), doc.content_size());

        tracked.changes.add_steps(&doc, &[map], data).changes().to_vec()
    }

    #[must_use]
    pub fn text(&self) -> &str { &self.text }

    #[must_use]
    pub fn start_text(&self) -> String { self.changes.start_doc().text_content() }

    /// Length of the current text in `char`s.
    #[must_use]
    pub fn len(&self) -> usize { self.doc.content_size() }

    #[must_use]
    pub fn is_empty(&self) -> bool { self.text.is_empty() }

    #[must_use]
    pub fn change_set(&self) -> &ChangeSet<D, Node> { &self.changes }

    #[must_use]
    pub fn changes(&self) -> &[Change<D>] { self.changes.changes() }

    /// Replaces the characters `from..to` of the current text with `insert`
    /// and records the edit, labelled with `data`.
    pub fn replace(
        &self,
        from: usize,
        to: usize,
        insert: &str,
        data: D,
    ) -> Result<Self, DocumentError> {
        if to < from {
            return Err(DocumentError::InvertedRange { from, to });
        }
        let size = self.len();
        if to > size {
            return Err(DocumentError::PositionOutOfBounds { position: to, size });
        }

        let mut builder = StringBuilder::new(&self.text);
        builder.retain(from);
        builder.delete(to - from);
        builder.insert(insert);
        let text = builder.build();

        let doc = Node::text_doc(&text);
        let map = StepMap::replace(from, to, insert.chars().count());
        let changes = self.changes.add_steps(&doc, &[map], data);

        Ok(TrackedText { text, doc, changes })
    }

    /// The changes, with changes to parts of words widened to the whole
    /// words for display.
    #[must_use]
    pub fn simplified_changes(&self) -> Vec<Change<D>> {
        simplify_changes_with(
            self.changes.changes(),
            &self.doc,
            self.changes.config().limits().max_simplify_distance,
        )
    }
}
