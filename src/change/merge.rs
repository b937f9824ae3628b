use super::{Change, shift};
use crate::span::{Combine, Span};

impl<D> Change<D>
where
    D: Clone,
{
    /// Combines two change lists applied one after the other into a single
    /// list. `x` takes the old document to an intermediate one and `y` takes
    /// that intermediate document to the new one, so the B coordinates of
    /// `x` and the A coordinates of `y` live in the same space. The result
    /// goes from the A coordinates of `x` straight to the B coordinates of
    /// `y`.
    ///
    /// Deleted content is combined, inserted content is merged: content
    /// inserted by `x` and deleted again by `y` disappears from both sides.
    #[must_use]
    pub fn merge(x: &[Change<D>], y: &[Change<D>], combine: &Combine<D>) -> Vec<Change<D>> {
        if x.is_empty() {
            return y.to_vec();
        }
        if y.is_empty() {
            return x.to_vec();
        }

        let mut cursor = MergeCursor { x, y, ix: 0, iy: 0 };
        let mut result = Vec::with_capacity(x.len() + y.len());

        loop {
            let (current_x, current_y) = (cursor.current_x(), cursor.current_y());

            if let Some(change) =
                current_x.filter(|cx| current_y.is_none_or(|cy| cx.to_b < cy.from_a))
            {
                result.push(change.shifted_b(cursor.offset_y()));
                cursor.ix += 1;
            } else if let Some(change) =
                current_y.filter(|cy| current_x.is_none_or(|cx| cy.to_a < cx.from_b))
            {
                result.push(change.shifted_a(-cursor.offset_x()));
                cursor.iy += 1;
            } else if let (Some(cx), Some(cy)) = (current_x, current_y) {
                if let Some(merged) = cursor.merge_overlapping_changes(cx, cy, combine) {
                    result.push(merged);
                }
            } else {
                return result;
            }
        }
    }
}

/// Running position in the two lists being merged.
struct MergeCursor<'a, D> {
    x: &'a [Change<D>],
    y: &'a [Change<D>],
    ix: usize,
    iy: usize,
}

impl<'a, D> MergeCursor<'a, D>
where
    D: Clone,
{
    fn current_x(&self) -> Option<&'a Change<D>> { self.x.get(self.ix) }

    fn current_y(&self) -> Option<&'a Change<D>> { self.y.get(self.iy) }

    /// How far the consumed part of `x` moved the positions after it.
    fn offset_x(&self) -> isize { self.ix.checked_sub(1).map_or(0, |i| self.x[i].end_offset()) }

    /// How far the consumed part of `y` moved the positions after it.
    fn offset_y(&self) -> isize { self.iy.checked_sub(1).map_or(0, |i| self.y[i].end_offset()) }

    /// Merges the group of changes touching `first_x` and `first_y` in the
    /// intermediate coordinate space. Consumes every change of the group and
    /// returns `None` when they cancel each other out.
    fn merge_overlapping_changes(
        &mut self,
        first_x: &Change<D>,
        first_y: &Change<D>,
        combine: &Combine<D>,
    ) -> Option<Change<D>> {
        let mut position = first_x.from_b.min(first_y.from_a);
        let from_a = first_x.from_a.min(shift(first_y.from_a, -self.offset_x()));
        let from_b = first_y.from_b.min(shift(first_x.from_b, self.offset_y()));
        let (mut to_a, mut to_b) = (from_a, from_b);
        let (mut deleted, mut inserted) = (Span::none(), Span::none());

        // A change's full content is added the first time the scan enters it
        let (mut entered_x, mut entered_y) = (false, false);

        loop {
            let (current_x, current_y) = (self.current_x(), self.current_y());
            let next_x = current_x.map_or(usize::MAX, |cx| {
                if position >= cx.from_b { cx.to_b } else { cx.from_b }
            });
            let next_y = current_y.map_or(usize::MAX, |cy| {
                if position >= cy.from_a { cy.to_a } else { cy.from_a }
            });
            let next = next_x.min(next_y);

            let in_x = current_x.filter(|cx| position >= cx.from_b);
            let in_y = current_y.filter(|cy| position >= cy.from_a);
            if in_x.is_none() && in_y.is_none() {
                break;
            }

            if let Some(cx) = in_x {
                if position == cx.from_b && !entered_x {
                    deleted = Span::join(&deleted, &cx.deleted, combine);
                    to_a += cx.len_a();
                    entered_x = true;
                }
                if in_y.is_none() {
                    let surviving =
                        Span::slice(&cx.inserted, position - cx.from_b, next - cx.from_b);
                    inserted = Span::join(&inserted, &surviving, combine);
                    to_b += next - position;
                }
            }

            if let Some(cy) = in_y {
                if position == cy.from_a && !entered_y {
                    inserted = Span::join(&inserted, &cy.inserted, combine);
                    to_b += cy.len_b();
                    entered_y = true;
                }
                if in_x.is_none() {
                    let removed =
                        Span::slice(&cy.deleted, position - cy.from_a, next - cy.from_a);
                    deleted = Span::join(&deleted, &removed, combine);
                    to_a += next - position;
                }
            }

            if in_x.is_some_and(|cx| next == cx.to_b) {
                self.ix += 1;
                entered_x = false;
            }
            if in_y.is_some_and(|cy| next == cy.to_a) {
                self.iy += 1;
                entered_y = false;
            }

            position = next;
        }

        (from_a < to_a || from_b < to_b)
            .then(|| Change::new(from_a, to_a, from_b, to_b, deleted, inserted))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::span::{Span, Spans, combine_equal};

    use super::*;

    type TestChange = Change<&'static str>;

    fn spans(items: &[(usize, &'static str)]) -> Spans<&'static str> {
        items
            .iter()
            .map(|(length, data)| Span::new(*length, *data))
            .collect::<Vec<_>>()
            .into()
    }

    fn change(
        (from_a, to_a): (usize, usize),
        (from_b, to_b): (usize, usize),
        deleted: &[(usize, &'static str)],
        inserted: &[(usize, &'static str)],
    ) -> TestChange {
        Change::new(from_a, to_a, from_b, to_b, spans(deleted), spans(inserted))
    }

    #[test]
    fn test_merge_with_empty_side_returns_other() {
        let changes = vec![change((1, 2), (1, 3), &[(1, "a")], &[(2, "b")])];

        assert_eq!(Change::merge(&changes, &[], &combine_equal), changes);
        assert_eq!(Change::merge(&[], &changes, &combine_equal), changes);
    }

    #[test]
    fn test_insertion_undone_by_deletion_cancels_out() {
        let insert = change((3, 3), (3, 4), &[], &[(1, "x")]);
        let delete = change((3, 4), (3, 3), &[(1, "y")], &[]);

        assert!(Change::merge(&[insert], &[delete], &combine_equal).is_empty());
    }

    #[test]
    fn test_disjoint_changes_are_shifted() {
        let x = change((0, 1), (0, 2), &[(1, "x")], &[(2, "x")]);
        let y = change((5, 6), (5, 5), &[(1, "y")], &[]);

        assert_eq!(
            Change::merge(&[x.clone()], &[y], &combine_equal),
            vec![x, change((4, 5), (5, 5), &[(1, "y")], &[])]
        );
    }

    #[test]
    fn test_later_x_is_shifted_by_earlier_y() {
        let x = change((10, 12), (10, 12), &[(2, "x")], &[(2, "x")]);
        let y = change((0, 0), (0, 3), &[], &[(3, "y")]);

        assert_eq!(
            Change::merge(&[x], &[y.clone()], &combine_equal),
            vec![y, change((10, 12), (13, 15), &[(2, "x")], &[(2, "x")])]
        );
    }

    #[test]
    fn test_replacement_inside_insertion() {
        let x = change((2, 2), (2, 5), &[], &[(3, "x")]);
        let y = change((3, 4), (3, 5), &[(1, "y")], &[(2, "y")]);

        assert_eq!(
            Change::merge(&[x], &[y], &combine_equal),
            vec![change((2, 2), (2, 6), &[], &[(1, "x"), (2, "y"), (1, "x")])]
        );
    }

    #[test]
    fn test_deletion_spanning_insertion_and_original_content() {
        // x inserts 2 positions at 5, y deletes them together with the 2
        // original positions after them
        let x = change((5, 5), (5, 7), &[], &[(2, "x")]);
        let y = change((5, 9), (5, 5), &[(4, "y")], &[]);

        assert_eq!(
            Change::merge(&[x], &[y], &combine_equal),
            vec![change((5, 7), (5, 5), &[(2, "y")], &[])]
        );
    }

    #[test]
    fn test_touching_changes_are_merged() {
        let x = change((0, 2), (0, 2), &[(2, "a")], &[(2, "a")]);
        let y = change((2, 3), (2, 4), &[(1, "a")], &[(2, "a")]);

        assert_eq!(
            Change::merge(&[x], &[y], &combine_equal),
            vec![change((0, 3), (0, 4), &[(3, "a")], &[(4, "a")])]
        );
    }

    #[test]
    fn test_one_y_change_covering_two_x_changes() {
        let x = vec![
            change((1, 1), (1, 2), &[], &[(1, "x")]),
            change((3, 3), (4, 5), &[], &[(1, "x")]),
        ];
        let y = vec![change((0, 6), (0, 1), &[(6, "y")], &[(1, "y")])];

        assert_eq!(
            Change::merge(&x, &y, &combine_equal),
            vec![change((0, 4), (0, 1), &[(4, "y")], &[(1, "y")])]
        );
    }
}
