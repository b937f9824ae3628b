use std::sync::Arc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Decides whether two adjacent spans may be joined into one. Returning
/// `None` keeps them apart, `Some(data)` joins them and labels the result with
/// `data`. The function must be pure: it's called with the left span's data
/// first.
pub type Combine<D> = dyn Fn(&D, &D) -> Option<D> + Send + Sync;

/// An immutable list of spans. Cloning it is cheap and keeps sharing the same
/// allocation, which is how the identity-preserving paths of `Span::slice`
/// and `Span::join` can be observed with `Arc::ptr_eq`.
pub type Spans<D> = Arc<[Span<D>]>;

/// A run of `length` deleted or inserted positions, all carrying the same
/// metadata.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Span<D> {
    pub length: usize,
    pub data: D,
}

/// The `Combine` used when nothing else is configured: spans are joined when
/// their data is equal.
pub fn combine_equal<D>(a: &D, b: &D) -> Option<D>
where
    D: PartialEq + Clone,
{
    (a == b).then(|| a.clone())
}

impl<D> Span<D>
where
    D: Clone,
{
    #[must_use]
    pub fn new(length: usize, data: D) -> Self { Span { length, data } }

    /// The same span with a different length.
    #[must_use]
    pub fn cut(&self, length: usize) -> Self {
        Span {
            length,
            data: self.data.clone(),
        }
    }

    /// An empty span list.
    #[must_use]
    pub fn none() -> Spans<D> { Vec::new().into() }

    /// Total number of positions covered by `spans`.
    #[must_use]
    pub fn len_of(spans: &[Span<D>]) -> usize { spans.iter().map(|span| span.length).sum() }

    /// Returns the spans covering `from..to`, cutting the spans at the edges
    /// down to their overlap with the range. Slicing the whole list returns
    /// the list itself.
    #[must_use]
    pub fn slice(spans: &Spans<D>, from: usize, to: usize) -> Spans<D> {
        if from == to {
            return Span::none();
        }

        if from == 0 && to >= Span::len_of(spans) {
            return Arc::clone(spans);
        }

        let mut result = Vec::new();
        let mut offset = 0;
        for span in spans.iter() {
            if offset >= to {
                break;
            }

            let end = offset + span.length;
            let overlap_start = from.max(offset);
            let overlap_end = to.min(end);
            if overlap_end > overlap_start {
                let overlap = overlap_end - overlap_start;
                result.push(if overlap == span.length {
                    span.clone()
                } else {
                    span.cut(overlap)
                });
            }

            offset = end;
        }

        result.into()
    }

    /// Appends `b` to `a`. When `combine` accepts the data at the seam, the
    /// last span of `a` and the first span of `b` become a single span.
    #[must_use]
    pub fn join<F>(a: &Spans<D>, b: &Spans<D>, combine: &F) -> Spans<D>
    where
        F: Fn(&D, &D) -> Option<D> + ?Sized,
    {
        let (Some(last), Some(first)) = (a.last(), b.first()) else {
            return if a.is_empty() {
                Arc::clone(b)
            } else {
                Arc::clone(a)
            };
        };

        let mut result = Vec::with_capacity(a.len() + b.len());
        match combine(&last.data, &first.data) {
            None => {
                result.extend_from_slice(a);
                result.extend_from_slice(b);
            }
            Some(data) => {
                result.extend_from_slice(&a[..a.len() - 1]);
                result.push(Span::new(last.length + first.length, data));
                result.extend_from_slice(&b[1..]);
            }
        }

        result.into()
    }
}
