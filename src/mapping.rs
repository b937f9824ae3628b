//! Position maps describing how an edit moved the positions of a document.

/// Which side of a replaced range a position sticks to when it is mapped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Assoc {
    Before,
    After,
}

/// The interface `ChangeSet` needs from the maps of the edits it records.
pub trait PositionMap: Sized {
    /// Calls `f(old_start, old_end, new_start, new_end)` for every replaced
    /// range, in document order. Old positions are in the coordinates before
    /// the edit, new positions in the coordinates after it.
    fn for_each_range(&self, f: impl FnMut(usize, usize, usize, usize));

    /// The map of the edit that undoes this one.
    #[must_use]
    fn invert(&self) -> Self;

    /// Maps a position from before the edit to after it.
    fn map(&self, position: usize, assoc: Assoc) -> usize;
}

/// One replaced range: `old_size` positions starting at `start` replaced by
/// `new_size` positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MappedRange {
    pub start: usize,
    pub old_size: usize,
    pub new_size: usize,
}

/// The map of a single edit: a sorted list of non-overlapping replaced
/// ranges, each `start` given in the coordinates before the edit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct StepMap {
    ranges: Vec<MappedRange>,
    inverted: bool,
}

impl StepMap {
    /// # Panics
    ///
    /// Panics if the ranges are out of order or overlap.
    #[must_use]
    pub fn new(ranges: Vec<MappedRange>) -> Self {
        assert!(
            ranges
                .windows(2)
                .all(|pair| pair[0].start + pair[0].old_size <= pair[1].start),
            "Mapped ranges must be sorted and must not overlap"
        );

        StepMap {
            ranges,
            inverted: false,
        }
    }

    /// The map of replacing `from..to` with `inserted` positions.
    ///
    /// # Panics
    ///
    /// Panics if `to < from`.
    #[must_use]
    pub fn replace(from: usize, to: usize, inserted: usize) -> Self {
        assert!(from <= to, "Replaced range {from}..{to} ends before it starts");

        if from == to && inserted == 0 {
            return StepMap::empty();
        }

        StepMap::new(vec![MappedRange {
            start: from,
            old_size: to - from,
            new_size: inserted,
        }])
    }

    /// A map that leaves every position where it is.
    #[must_use]
    pub fn empty() -> Self { StepMap::default() }

    #[must_use]
    pub fn ranges(&self) -> &[MappedRange] { &self.ranges }

    fn sizes(&self, range: &MappedRange) -> (usize, usize) {
        if self.inverted {
            (range.new_size, range.old_size)
        } else {
            (range.old_size, range.new_size)
        }
    }
}

impl PositionMap for StepMap {
    fn for_each_range(&self, mut f: impl FnMut(usize, usize, usize, usize)) {
        let mut diff: isize = 0;
        for range in &self.ranges {
            let (old_size, new_size) = self.sizes(range);
            let (old_start, new_start) = if self.inverted {
                (offset(range.start, -diff), range.start)
            } else {
                (range.start, offset(range.start, diff))
            };

            f(old_start, old_start + old_size, new_start, new_start + new_size);
            diff += new_size as isize - old_size as isize;
        }
    }

    fn invert(&self) -> Self {
        StepMap {
            ranges: self.ranges.clone(),
            inverted: !self.inverted,
        }
    }

    fn map(&self, position: usize, assoc: Assoc) -> usize {
        let mut diff: isize = 0;
        for range in &self.ranges {
            let start = if self.inverted {
                offset(range.start, -diff)
            } else {
                range.start
            };
            if start > position {
                break;
            }

            let (old_size, new_size) = self.sizes(range);
            let end = start + old_size;
            if position <= end {
                let side = if old_size == 0 {
                    assoc
                } else if position == start {
                    Assoc::Before
                } else if position == end {
                    Assoc::After
                } else {
                    assoc
                };

                let mapped_start = offset(start, diff);
                return match side {
                    Assoc::Before => mapped_start,
                    Assoc::After => mapped_start + new_size,
                };
            }

            diff += new_size as isize - old_size as isize;
        }

        offset(position, diff)
    }
}

fn offset(position: usize, diff: isize) -> usize {
    position
        .checked_add_signed(diff)
        .unwrap_or_else(|| panic!("Position {position} mapped by {diff} must be non-negative"))
}

/// Bounding box of every position touched by a sequence of maps, in the
/// coordinates before the first map (`A`) and after the last one (`B`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TouchedRange {
    pub from_a: usize,
    pub to_a: usize,
    pub from_b: usize,
    pub to_b: usize,
}

/// Computes the `TouchedRange` of `maps`, or `None` if none of them replaces
/// anything.
pub fn touched_range<M>(maps: &[M]) -> Option<TouchedRange>
where
    M: PositionMap,
{
    let (from_b, to_b) = touched(maps.iter())?;
    let inverted = maps.iter().rev().map(PositionMap::invert).collect::<Vec<_>>();
    let (from_a, to_a) = touched(inverted.iter())?;

    Some(TouchedRange {
        from_a,
        to_a,
        from_b,
        to_b,
    })
}

/// Folds the maps forward, carrying the box touched so far through each map
/// and widening it with the new coordinates of each replaced range.
fn touched<'a, M>(maps: impl Iterator<Item = &'a M>) -> Option<(usize, usize)>
where
    M: PositionMap + 'a,
{
    let mut bounds: Option<(usize, usize)> = None;

    for step in maps {
        bounds = bounds.map(|(from, to)| {
            (step.map(from, Assoc::Before), step.map(to, Assoc::After))
        });
        step.for_each_range(|_, _, start, end| {
            bounds = Some(bounds.map_or((start, end), |(from, to)| (from.min(start), to.max(end))));
        });
    }

    bounds
}
