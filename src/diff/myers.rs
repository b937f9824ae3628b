//! Myers' shortest edit script search, bounded by a number of edits.
//!
//! See [the original article by Eugene W. Myers](http://www.xmailserver.org/diff2.pdf)
//! describing it.
//!
//! The forward search keeps, for every diagonal `k = y - x` of the edit
//! graph, the furthest `x` reached with the current number of edits. A
//! snapshot of these frontiers is kept every other step, which is enough to
//! walk the path back once the end of both sequences is reached: step `d`
//! only ever reads diagonals of the parity of `d - 1`.

use super::TrimmedRange;

/// A run of edits, as offsets into the two diffed sequences:
/// `from_a..to_a` of the first sequence was replaced by `from_b..to_b` of the
/// second.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EditRun {
    pub from_a: usize,
    pub to_a: usize,
    pub from_b: usize,
    pub to_b: usize,
}

/// Runs of edits separated by fewer unchanged tokens than this are reported
/// as a single run, so that a coincidental match (such as one space between
/// two replaced words) doesn't split a change in two.
#[must_use]
pub fn min_unchanged(len_a: usize, len_b: usize) -> usize { (len_a.max(len_b) / 10).clamp(2, 15) }

/// Computes the runs of edits turning `a[range.start..range.end_a]` into
/// `b[range.start..range.end_b]`, in order. Returns `None` if more than
/// `max_diff_size` edits would be needed.
pub fn myers_diff<T>(
    a: &[T],
    b: &[T],
    range: TrimmedRange,
    eq: impl Fn(&T, &T) -> bool,
    max_diff_size: usize,
) -> Option<Vec<EditRun>> {
    let (len_a, len_b) = (range.len_a(), range.len_b());
    let a = &a[range.start..range.end_a];
    let b = &b[range.start..range.end_b];
    let max = max_diff_size.min(len_a + len_b);

    let mut frontier = Frontier::new(max);
    let mut history = Vec::new();

    for size in 0..=max {
        let size_isize = size as isize;

        for diagonal in (-size_isize..=size_isize).step_by(2) {
            let start = if size == 0 {
                Some(0)
            } else {
                choose_move(&frontier, diagonal, len_a, len_b).map(|step| step.x)
            };
            let Some(mut x) = start else {
                frontier.set(diagonal, -1);
                continue;
            };

            let mut y = x.wrapping_add_signed(diagonal);
            while x < len_a && y < len_b && eq(&a[x], &b[y]) {
                x += 1;
                y += 1;
            }
            frontier.set(diagonal, x as isize);

            if x >= len_a && y >= len_b {
                return Some(trace_back(
                    frontier,
                    &history,
                    size,
                    diagonal,
                    (len_a, len_b),
                    range.start,
                ));
            }
        }

        if size % 2 == 0 {
            history.push(frontier.snapshot(size));
        }
    }

    None
}

/// Furthest reaching `x` per diagonal. Diagonals that weren't reached hold
/// `-1`.
#[derive(Debug, Clone)]
struct Frontier {
    offset: isize,
    values: Vec<isize>,
}

impl Frontier {
    fn new(max: usize) -> Self {
        Frontier {
            offset: max as isize + 1,
            values: vec![-1; 2 * max + 3],
        }
    }

    fn get(&self, diagonal: isize) -> isize {
        usize::try_from(diagonal + self.offset)
            .ok()
            .and_then(|index| self.values.get(index))
            .copied()
            .unwrap_or(-1)
    }

    fn set(&mut self, diagonal: isize, x: isize) {
        let index = usize::try_from(diagonal + self.offset)
            .unwrap_or_else(|_| panic!("Diagonal {diagonal} is outside of the frontier"));
        self.values[index] = x;
    }

    /// Copy of the diagonals the next steps after `size` can read.
    fn snapshot(&self, size: usize) -> Self {
        let reach = size as isize + 1;
        let from = usize::try_from(self.offset - reach).unwrap_or(0);
        let to = usize::try_from(self.offset + reach)
            .unwrap_or(0)
            .min(self.values.len() - 1);

        Frontier {
            offset: reach,
            values: self.values[from..=to].to_vec(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Edit {
    /// Consumes a token of the first sequence, coming from `diagonal + 1`.
    Deletion,
    /// Consumes a token of the second sequence, coming from `diagonal - 1`.
    Insertion,
}

#[derive(Debug, Clone, Copy)]
struct Move {
    edit: Edit,
    x: usize,
}

/// Picks the edit reaching `diagonal` furthest from the previous frontier.
/// Moves leaving the edit graph are never taken. On a tie, the insertion
/// wins.
fn choose_move(frontier: &Frontier, diagonal: isize, len_a: usize, len_b: usize) -> Option<Move> {
    let above = frontier.get(diagonal + 1);
    let left = frontier.get(diagonal - 1);

    let deletion = usize::try_from(above)
        .ok()
        .filter(|&x| x < len_a)
        .map(|x| x + 1);
    let insertion = usize::try_from(left)
        .ok()
        .filter(|&x| x.checked_add_signed(diagonal).is_some_and(|y| y <= len_b));

    match (deletion, insertion) {
        (Some(deleted), Some(inserted)) if deleted > inserted => Some(Move {
            edit: Edit::Deletion,
            x: deleted,
        }),
        (_, Some(inserted)) => Some(Move {
            edit: Edit::Insertion,
            x: inserted,
        }),
        (Some(deleted), None) => Some(Move {
            edit: Edit::Deletion,
            x: deleted,
        }),
        (None, None) => None,
    }
}

/// Walks the path ending on `diagonal` after `size` edits back to the
/// origin, collecting its edits into runs.
fn trace_back(
    mut frontier: Frontier,
    history: &[Frontier],
    size: usize,
    mut diagonal: isize,
    (len_a, len_b): (usize, usize),
    start: usize,
) -> Vec<EditRun> {
    let mut runs = RunCollector::new(min_unchanged(len_a, len_b));

    for step in (0..size).rev() {
        let Some(previous) = choose_move(&frontier, diagonal, len_a, len_b) else {
            unreachable!("Every diagonal on the path was reached by a move");
        };

        match previous.edit {
            Edit::Insertion => {
                diagonal -= 1;
                let x = previous.x + start;
                let y = x.wrapping_add_signed(diagonal);
                runs.add(x, x, y, y + 1);
            }
            Edit::Deletion => {
                diagonal += 1;
                let x = previous.x - 1 + start;
                let y = x.wrapping_add_signed(diagonal);
                runs.add(x, x + 1, y, y);
            }
        }

        frontier = history[step >> 1].clone();
    }

    runs.finish()
}

/// Collects edits from the last one to the first, joining the ones closer
/// than `min_span` to each other.
struct RunCollector {
    min_span: usize,
    current: Option<EditRun>,
    runs: Vec<EditRun>,
}

impl RunCollector {
    fn new(min_span: usize) -> Self {
        RunCollector {
            min_span,
            current: None,
            runs: Vec::new(),
        }
    }

    fn add(&mut self, from_a: usize, to_a: usize, from_b: usize, to_b: usize) {
        match &mut self.current {
            Some(run) if run.from_a < to_a + self.min_span => {
                run.from_a = from_a;
                run.from_b = from_b;
            }
            current => {
                if let Some(run) = current.replace(EditRun {
                    from_a,
                    to_a,
                    from_b,
                    to_b,
                }) {
                    self.runs.push(run);
                }
            }
        }
    }

    fn finish(mut self) -> Vec<EditRun> {
        self.runs.extend(self.current.take());
        self.runs.reverse();
        self.runs
    }
}
