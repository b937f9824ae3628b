mod merge;

#[cfg(feature = "serde")]
mod json;

use crate::span::{Span, Spans};

/// One replaced range, expressed both in the coordinates of the old document
/// (`A`) and of the new document (`B`). The deleted spans describe the
/// replaced content of the old document, the inserted spans the content that
/// took its place in the new one.
///
/// Changes are immutable; `slice` and `merge` produce new ones. The span
/// lists are shared between a change and the changes derived from it
/// whenever their content is unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Change<D> {
    pub(crate) from_a: usize,
    pub(crate) to_a: usize,
    pub(crate) from_b: usize,
    pub(crate) to_b: usize,
    pub(crate) deleted: Spans<D>,
    pub(crate) inserted: Spans<D>,
}

impl<D> Change<D>
where
    D: Clone,
{
    /// Creates a change from its bounds and content.
    ///
    /// # Panics
    ///
    /// Panics if a range ends before it starts or if the spans don't cover
    /// their range exactly. A change with inconsistent coordinates would
    /// silently corrupt every change merged with it.
    #[must_use]
    pub fn new(
        from_a: usize,
        to_a: usize,
        from_b: usize,
        to_b: usize,
        deleted: Spans<D>,
        inserted: Spans<D>,
    ) -> Self {
        assert!(from_a <= to_a, "A range {from_a}..{to_a} ends before it starts");
        assert!(from_b <= to_b, "B range {from_b}..{to_b} ends before it starts");
        assert_eq!(
            Span::len_of(&deleted),
            to_a - from_a,
            "Deleted spans must cover the A range {from_a}..{to_a}"
        );
        assert_eq!(
            Span::len_of(&inserted),
            to_b - from_b,
            "Inserted spans must cover the B range {from_b}..{to_b}"
        );

        Change {
            from_a,
            to_a,
            from_b,
            to_b,
            deleted,
            inserted,
        }
    }

    #[must_use]
    pub fn from_a(&self) -> usize { self.from_a }

    #[must_use]
    pub fn to_a(&self) -> usize { self.to_a }

    #[must_use]
    pub fn from_b(&self) -> usize { self.from_b }

    #[must_use]
    pub fn to_b(&self) -> usize { self.to_b }

    #[must_use]
    pub fn deleted(&self) -> &Spans<D> { &self.deleted }

    #[must_use]
    pub fn inserted(&self) -> &Spans<D> { &self.inserted }

    /// Length of the replaced range in the old document.
    #[must_use]
    pub fn len_a(&self) -> usize { self.to_a - self.from_a }

    /// Length of the replaced range in the new document.
    #[must_use]
    pub fn len_b(&self) -> usize { self.to_b - self.from_b }

    /// Returns the part of the change between the given offsets, which are
    /// relative to the start of the change on each side. Slicing the whole
    /// change returns a copy sharing both span lists.
    #[must_use]
    pub fn slice(&self, start_a: usize, end_a: usize, start_b: usize, end_b: usize) -> Self {
        if start_a == 0 && start_b == 0 && end_a == self.len_a() && end_b == self.len_b() {
            return self.clone();
        }

        Change::new(
            self.from_a + start_a,
            self.from_a + end_a,
            self.from_b + start_b,
            self.from_b + end_b,
            Span::slice(&self.deleted, start_a, end_a),
            Span::slice(&self.inserted, start_b, end_b),
        )
    }

    /// The same change with its B range moved by `offset`.
    pub(crate) fn shifted_b(&self, offset: isize) -> Self {
        if offset == 0 {
            return self.clone();
        }

        Change {
            from_b: shift(self.from_b, offset),
            to_b: shift(self.to_b, offset),
            ..self.clone()
        }
    }

    /// The same change with its A range moved by `offset`.
    pub(crate) fn shifted_a(&self, offset: isize) -> Self {
        if offset == 0 {
            return self.clone();
        }

        Change {
            from_a: shift(self.from_a, offset),
            to_a: shift(self.to_a, offset),
            ..self.clone()
        }
    }

    /// How much the positions after this change moved: `to_b - to_a`.
    pub(crate) fn end_offset(&self) -> isize { self.to_b as isize - self.to_a as isize }
}

/// Moves `position` by `offset`.
///
/// # Panics
///
/// Panics if the result would be negative.
pub(crate) fn shift(position: usize, offset: isize) -> usize {
    position
        .checked_add_signed(offset)
        .unwrap_or_else(|| panic!("Position {position} shifted by {offset} must be non-negative"))
}
