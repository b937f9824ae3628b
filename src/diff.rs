//! Shrinks a coarse replaced range down to the parts that actually differ.

use log::debug;

use crate::{
    change::Change,
    change_set::DiffLimits,
    document::DocumentNode,
    tokenizer::{TokenEncoder, tokenize_fragment},
    utils::{common_prefix_len::common_prefix_len, common_suffix_len::common_suffix_len},
};

mod myers;

pub use myers::{EditRun, min_unchanged, myers_diff};

/// Default number of edits the Myers search may use before giving up.
pub const MAX_DIFF_SIZE: usize = 5000;

/// The part of two token sequences left after removing their common prefix
/// and suffix: `start..end_a` of the first and `start..end_b` of the second.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TrimmedRange {
    pub start: usize,
    pub end_a: usize,
    pub end_b: usize,
}

impl TrimmedRange {
    /// One side is empty, or both sides are a single token. Such ranges
    /// can't be split any further.
    #[must_use]
    pub fn is_simple(&self) -> bool {
        self.end_a == self.start
            || self.end_b == self.start
            || (self.end_a == self.end_b && self.end_a == self.start + 1)
    }

    #[must_use]
    pub fn len_a(&self) -> usize { self.end_a - self.start }

    #[must_use]
    pub fn len_b(&self) -> usize { self.end_b - self.start }
}

/// Removes the common prefix and suffix of `a` and `b`. Returns `None` if
/// the sequences are equal.
pub fn trim_tokens<T>(a: &[T], b: &[T], eq: impl Fn(&T, &T) -> bool) -> Option<TrimmedRange> {
    let start = common_prefix_len(a, b, &eq);
    if start == a.len() && start == b.len() {
        return None;
    }

    let suffix = common_suffix_len(&a[start..], &b[start..], &eq);

    Some(TrimmedRange {
        start,
        end_a: a.len() - suffix,
        end_b: b.len() - suffix,
    })
}

/// Compares the content `range` replaced in `fragment_a` with the content
/// that replaced it in `fragment_b`, and returns the changes that are left
/// once identical content is ignored. Returns no changes when the content
/// is identical.
///
/// When the diff would take more than `limits.max_diff_size` edits, the
/// trimmed range is returned as a single change.
pub fn compute_diff<D, N, E>(
    fragment_a: &[N],
    fragment_b: &[N],
    range: &Change<D>,
    encoder: &E,
    limits: &DiffLimits,
) -> Vec<Change<D>>
where
    D: Clone,
    N: DocumentNode,
    E: TokenEncoder<N>,
{
    let mut tokens_a = Vec::new();
    tokenize_fragment(fragment_a, encoder, range.from_a, range.to_a, &mut tokens_a);
    let mut tokens_b = Vec::new();
    tokenize_fragment(fragment_b, encoder, range.from_b, range.to_b, &mut tokens_b);

    let eq = |a: &E::Token, b: &E::Token| encoder.compare_tokens(a, b);

    let Some(trimmed) = trim_tokens(&tokens_a, &tokens_b, eq) else {
        return Vec::new();
    };

    let whole = || vec![range.slice(trimmed.start, trimmed.end_a, trimmed.start, trimmed.end_b)];

    if trimmed.is_simple() {
        return whole();
    }

    match myers_diff(&tokens_a, &tokens_b, trimmed, eq, limits.max_diff_size) {
        Some(runs) => runs
            .into_iter()
            .map(|run| range.slice(run.from_a, run.to_a, run.from_b, run.to_b))
            .collect(),
        None => {
            debug!(
                "Diff of {} and {} tokens exceeds {} edits, keeping the trimmed range",
                trimmed.len_a(),
                trimmed.len_b(),
                limits.max_diff_size
            );
            whole()
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    use super::*;
    use crate::{document::Node, span::Span, tokenizer::default_encoder::DefaultEncoder};

    /// Diffs two texts as if the whole first text was replaced by the second.
    fn diff_texts(old: &str, new: &str, limits: &DiffLimits) -> Vec<(usize, usize, usize, usize)> {
        let (doc_a, doc_b) = (Node::text_doc(old), Node::text_doc(new));
        let range = Change::new(
            0,
            doc_a.content_size(),
            0,
            doc_b.content_size(),
            vec![Span::new(doc_a.content_size(), "old")].into(),
            vec![Span::new(doc_b.content_size(), "new")].into(),
        );

        compute_diff(doc_a.children(), doc_b.children(), &range, &DefaultEncoder, limits)
            .iter()
            .map(|change| (change.from_a, change.to_a, change.from_b, change.to_b))
            .collect()
    }

    #[test_case("same", "same", &[] ; "identical content")]
    #[test_case("hello world", "hello there world", &[(6, 6, 6, 12)] ; "pure insertion")]
    #[test_case("hello world", "hello", &[(5, 11, 5, 5)] ; "pure deletion")]
    #[test_case("abcde", "axcde", &[(1, 2, 1, 2)] ; "single token substitution")]
    #[test_case(
        "abc 1234567890 def",
        "uvw 1234567890 xyz",
        &[(0, 3, 0, 3), (15, 18, 15, 18)] ;
        "two distant edits"
    )]
    #[test_case("abc-def", "uvw-xyz", &[(0, 7, 0, 7)] ; "edits with a short gap are joined")]
    fn test_compute_diff(old: &str, new: &str, expected: &[(usize, usize, usize, usize)]) {
        assert_eq!(diff_texts(old, new, &DiffLimits::default()), expected);
    }

    #[test]
    fn test_exceeding_the_limit_keeps_the_trimmed_range() {
        let limits = DiffLimits {
            max_diff_size: 2,
            ..DiffLimits::default()
        };

        assert_eq!(
            diff_texts("xabc 1234567890 defx", "xuvw 1234567890 xyzx", &limits),
            vec![(1, 19, 1, 19)]
        );
    }

    #[test]
    fn test_diff_keeps_span_data() {
        let (doc_a, doc_b) = (Node::text_doc("hello world"), Node::text_doc("hello earth"));
        let range = Change::new(
            0,
            11,
            0,
            11,
            vec![Span::new(11, "alice")].into(),
            vec![Span::new(6, "bob"), Span::new(5, "carol")].into(),
        );

        let diff = compute_diff(
            doc_a.children(),
            doc_b.children(),
            &range,
            &DefaultEncoder,
            &DiffLimits::default(),
        );

        assert_eq!(
            diff,
            vec![Change::new(
                6,
                11,
                6,
                11,
                vec![Span::new(5, "alice")].into(),
                vec![Span::new(5, "carol")].into(),
            )]
        );
    }

    #[test]
    fn test_trim_tokens() {
        let eq = |a: &char, b: &char| a == b;
        let chars = |text: &str| text.chars().collect::<Vec<_>>();

        assert_eq!(trim_tokens(&chars("abc"), &chars("abc"), eq), None);
        assert_eq!(
            trim_tokens(&chars("aaa"), &chars("aa"), eq),
            Some(TrimmedRange {
                start: 2,
                end_a: 3,
                end_b: 2,
            })
        );
    }
}
