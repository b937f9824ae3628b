//! Makes a list of changes easier to read by expanding changes that replace
//! part of a word to cover the whole word.

use crate::{
    change::Change,
    document::DocumentNode,
    span::{Span, Spans, combine_equal},
    tokenizer::{TokenEncoder, tokenize_fragment},
};

/// Default distance (in new-document positions) under which changes are
/// simplified together.
pub const MAX_SIMPLIFY_DISTANCE: usize = 30;

/// Simplifies `changes`, which must be relative to `doc`'s start document
/// and use `doc` as their new document, with the default distance.
pub fn simplify_changes<D, N>(changes: &[Change<D>], doc: &N) -> Vec<Change<D>>
where
    D: Clone + PartialEq,
    N: DocumentNode,
{
    simplify_changes_with(changes, doc, MAX_SIMPLIFY_DISTANCE)
}

/// Groups changes less than `max_distance` apart. Within a group, changes
/// not separated by a word boundary are considered together; if together
/// they both delete and insert content (and aren't a single replaced
/// character), they are replaced by one change covering the whole words
/// they touch. Pure insertions and deletions are kept as they are.
pub fn simplify_changes_with<D, N>(
    changes: &[Change<D>],
    doc: &N,
    max_distance: usize,
) -> Vec<Change<D>>
where
    D: Clone + PartialEq,
    N: DocumentNode,
{
    let mut result = Vec::with_capacity(changes.len());
    let mut group_start = 0;

    while group_start < changes.len() {
        let mut group_end = group_start + 1;
        let mut end = changes[group_start].to_b;
        while group_end < changes.len()
            && changes[group_end].from_b <= end.saturating_add(max_distance)
        {
            end = changes[group_end].to_b;
            group_end += 1;
        }

        simplify_adjacent_changes(&changes[group_start..group_end], doc, max_distance, &mut result);
        group_start = group_end;
    }

    result
}

fn simplify_adjacent_changes<D, N>(
    group: &[Change<D>],
    doc: &N,
    max_distance: usize,
    target: &mut Vec<Change<D>>,
) where
    D: Clone + PartialEq,
    N: DocumentNode,
{
    let (Some(first), Some(last)) = (group.first(), group.last()) else {
        return;
    };
    let text = WordText::new(
        doc,
        first.from_b.saturating_sub(max_distance),
        doc.content_size().min(last.to_b.saturating_add(max_distance)),
    );

    let mut i = 0;
    while i < group.len() {
        let run_start = i;
        let (mut deleted, mut inserted) = (group[i].len_a(), group[i].len_b());
        while i + 1 < group.len() && !text.has_boundary(group[i].to_b, group[i + 1].from_b) {
            deleted += group[i + 1].len_a();
            inserted += group[i + 1].len_b();
            i += 1;
        }

        let run = &group[run_start..=i];
        i += 1;

        if deleted == 0 || inserted == 0 || (deleted == 1 && inserted == 1) {
            target.extend_from_slice(run);
            continue;
        }

        let from = text.word_start(run[0].from_b);
        let to = text.word_end(run[run.len() - 1].to_b);
        match fill_change(run, from, to) {
            Some(joined) => push_joined(target, joined),
            None => target.extend_from_slice(run),
        }
    }
}

/// Appends `joined`, merging it into the last change when they touch.
fn push_joined<D>(target: &mut Vec<Change<D>>, joined: Change<D>)
where
    D: Clone + PartialEq,
{
    match target.last_mut() {
        Some(last) if last.to_a == joined.from_a => {
            *last = Change::new(
                last.from_a,
                joined.to_a,
                last.from_b,
                joined.to_b,
                Span::join(&last.deleted, &joined.deleted, &combine_equal::<D>),
                Span::join(&last.inserted, &joined.inserted, &combine_equal::<D>),
            );
        }
        _ => target.push(joined),
    }
}

/// Builds one change covering `from_b..to_b` out of `changes`, which must
/// all lie within that range. The unchanged content between them becomes
/// part of the change, labelled with the data of the span before it.
///
/// Returns `None` if the first change has no content to take data from.
pub fn fill_change<D>(changes: &[Change<D>], from_b: usize, to_b: usize) -> Option<Change<D>>
where
    D: Clone + PartialEq,
{
    let (first, last) = (changes.first()?, changes.last()?);
    let from_a = first.from_a - (first.from_b - from_b);
    let to_a = last.to_a + (to_b - last.to_b);

    let mut deleted_data = first.deleted.first().or(first.inserted.first())?.data.clone();
    let mut inserted_data = first.inserted.first().or(first.deleted.first())?.data.clone();
    let (mut deleted, mut inserted) = (Span::none(), Span::none());
    let (mut position_a, mut position_b) = (from_a, from_b);

    for next in changes.iter().map(Some).chain([None]) {
        let (end_a, end_b) = next.map_or((to_a, to_b), |change| (change.from_a, change.from_b));
        if end_a > position_a {
            let filled = gap(end_a - position_a, &deleted_data);
            deleted = Span::join(&deleted, &filled, &combine_equal::<D>);
        }
        if end_b > position_b {
            let filled = gap(end_b - position_b, &inserted_data);
            inserted = Span::join(&inserted, &filled, &combine_equal::<D>);
        }

        let Some(next) = next else {
            break;
        };

        deleted = Span::join(&deleted, &next.deleted, &combine_equal::<D>);
        inserted = Span::join(&inserted, &next.inserted, &combine_equal::<D>);
        if let Some(span) = deleted.last() {
            deleted_data = span.data.clone();
        }
        if let Some(span) = inserted.last() {
            inserted_data = span.data.clone();
        }
        position_a = next.to_a;
        position_b = next.to_b;
    }

    Some(Change::new(from_a, to_a, from_b, to_b, deleted, inserted))
}

fn gap<D>(length: usize, data: &D) -> Spans<D>
where
    D: Clone,
{
    vec![Span::new(length, data.clone())].into()
}

/// Characters that make up words: letters and digits of any script, and `_`.
#[must_use]
pub fn is_word_char(character: char) -> bool { character.is_alphanumeric() || character == '_' }

/// One character per position of a document range. Node boundaries and
/// leaves read as spaces, so they never join two words.
#[must_use]
pub fn text_between<N>(doc: &N, from: usize, to: usize) -> Vec<char>
where
    N: DocumentNode,
{
    let mut text = Vec::with_capacity(to.saturating_sub(from));
    tokenize_fragment(doc.children(), &PlainTextEncoder, from, to, &mut text);
    text
}

struct PlainTextEncoder;

impl<N> TokenEncoder<N> for PlainTextEncoder
where
    N: DocumentNode,
{
    type Token = char;

    fn encode_character(&self, character: char, _marks: &[N::Mark]) -> char { character }

    fn encode_node_start(&self, _node: &N) -> char { ' ' }

    fn encode_node_end(&self, _node: &N) -> char { ' ' }

    fn compare_tokens(&self, a: &char, b: &char) -> bool { a == b }
}

/// The text around a group of changes, addressed by document position.
struct WordText {
    start: usize,
    end: usize,
    text: Vec<char>,
}

impl WordText {
    fn new<N>(doc: &N, start: usize, end: usize) -> Self
    where
        N: DocumentNode,
    {
        WordText {
            start,
            end,
            text: text_between(doc, start, end),
        }
    }

    /// Whether the character at `position` is part of a word. Positions
    /// outside of the text aren't.
    fn is_word(&self, position: usize) -> bool {
        position >= self.start
            && position < self.end
            && self
                .text
                .get(position - self.start)
                .copied()
                .is_some_and(is_word_char)
    }

    fn is_word_before(&self, position: usize) -> bool {
        position > self.start && self.is_word(position - 1)
    }

    /// Whether the text switches between word and non-word characters
    /// somewhere between `from` and `to`, counting the character before
    /// `from`.
    fn has_boundary(&self, from: usize, to: usize) -> bool {
        let mut previous = self.is_word_before(from);
        (from..to).any(|position| {
            let current = self.is_word(position);
            let boundary = previous != current;
            previous = current;
            boundary
        })
    }

    fn word_start(&self, mut position: usize) -> usize {
        if self.is_word(position) {
            while position > self.start && self.is_word(position - 1) {
                position -= 1;
            }
        }
        position
    }

    fn word_end(&self, mut position: usize) -> usize {
        if self.is_word_before(position) {
            while position < self.end && self.is_word(position) {
                position += 1;
            }
        }
        position
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::document::{Node, NodeSpec, Schema};

    type TestChange = Change<&'static str>;

    fn change(from_a: usize, to_a: usize, from_b: usize, to_b: usize) -> TestChange {
        let spans = |length: usize, data: &'static str| -> Spans<&'static str> {
            if length == 0 {
                Span::none()
            } else {
                vec![Span::new(length, data)].into()
            }
        };

        Change::new(
            from_a,
            to_a,
            from_b,
            to_b,
            spans(to_a - from_a, "deleted"),
            spans(to_b - from_b, "inserted"),
        )
    }

    #[test]
    fn test_partial_word_replacement_covers_the_word() {
        let doc = Node::text_doc("teXYing");

        assert_eq!(
            simplify_changes(&[change(2, 4, 2, 4)], &doc),
            vec![change(0, 7, 0, 7)]
        );
    }

    #[test]
    fn test_whole_word_replacement_is_kept() {
        let doc = Node::text_doc("The quick red fox");
        let changes = vec![change(10, 15, 10, 13)];

        assert_eq!(simplify_changes(&changes, &doc), changes);
    }

    #[test]
    fn test_pure_insertions_and_single_characters_are_kept() {
        let doc = Node::text_doc("hello there world bat");
        let changes = vec![change(6, 6, 6, 12), change(12, 13, 18, 19)];

        assert_eq!(simplify_changes(&changes, &doc), changes);
    }

    #[test]
    fn test_changes_in_one_word_are_joined() {
        let doc = Node::text_doc("aXcdYf");

        assert_eq!(
            simplify_changes(&[change(1, 2, 1, 2), change(4, 5, 4, 5)], &doc),
            vec![change(0, 6, 0, 6)]
        );
    }

    #[test]
    fn test_changes_in_different_words_stay_apart() {
        let doc = Node::text_doc("XY ZW");
        let changes = vec![change(0, 2, 0, 2), change(3, 5, 3, 5)];

        assert_eq!(simplify_changes(&changes, &doc), changes);
    }

    #[test]
    fn test_expanded_change_touching_previous_change_is_merged() {
        // "abcde" -> "a bcXYe"
        let doc = Node::text_doc("a bcXYe");

        assert_eq!(
            simplify_changes(&[change(1, 1, 1, 2), change(3, 4, 4, 6)], &doc),
            vec![change(1, 5, 1, 7)]
        );
    }

    #[test]
    fn test_unbounded_distance() {
        let doc = Node::text_doc("teXYing");

        assert_eq!(
            simplify_changes_with(&[change(2, 4, 2, 4)], &doc, usize::MAX),
            vec![change(0, 7, 0, 7)]
        );
    }

    #[test]
    fn test_borrowed_data() {
        let author = String::from("alice");
        let spans = |length: usize| Spans::<&str>::from(vec![Span::new(length, author.as_str())]);
        let changes = [Change::new(2, 4, 2, 4, spans(2), spans(2))];

        assert_eq!(
            simplify_changes(&changes, &Node::text_doc("teXYing")),
            vec![Change::new(0, 7, 0, 7, spans(7), spans(7))]
        );
    }

    #[test]
    fn test_distant_changes_are_not_grouped() {
        let doc = Node::text_doc("abXY cdefghijklmnopqrstuvwxyz ZWab");
        let changes = vec![change(2, 4, 2, 4), change(30, 32, 30, 32)];

        assert_eq!(
            simplify_changes_with(&changes, &doc, 5),
            vec![change(0, 4, 0, 4), change(30, 34, 30, 34)]
        );
    }

    #[test]
    fn test_leaves_separate_words() {
        let schema = Schema::new([NodeSpec::leaf("image")]).unwrap();
        let doc = Node::doc(vec![
            Node::text("ab"),
            schema.leaf("image").unwrap(),
            Node::text("cd"),
        ]);

        assert_eq!(text_between(&doc, 0, 5), vec!['a', 'b', ' ', 'c', 'd']);
        assert_eq!(
            simplify_changes(&[change(3, 5, 3, 5)], &doc),
            vec![change(3, 5, 3, 5)]
        );
    }

    #[test]
    fn test_is_word_char() {
        assert!(is_word_char('a'));
        assert!(is_word_char('É'));
        assert!(is_word_char('7'));
        assert!(is_word_char('_'));
        assert!(!is_word_char(' '));
        assert!(!is_word_char('-'));
    }
}
