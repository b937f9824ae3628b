use std::{
    fmt::{self, Debug},
    ops::Range,
    sync::Arc,
};

use log::{debug, trace};

use crate::{
    change::{Change, shift},
    diff::compute_diff,
    document::DocumentNode,
    mapping::{PositionMap, TouchedRange, touched_range},
    span::{Combine, Span, Spans},
    tokenizer::{TokenEncoder, default_encoder::DefaultEncoder},
};

mod config;

pub use config::{ChangeSetConfig, DiffLimits};

/// The changes between a fixed start document and its latest revision, as
/// an ordered list of non-overlapping `Change`s.
///
/// A change set is immutable: `add_steps` and `map` return a new one, and
/// every earlier version stays valid. Versions derived from one another share
/// their configuration, and cloning a change set is cheap.
pub struct ChangeSet<D, N, E = DefaultEncoder> {
    config: Arc<ChangeSetConfig<D, N, E>>,
    changes: Arc<[Change<D>]>,
}

impl<D, N> ChangeSet<D, N, DefaultEncoder>
where
    D: Clone + PartialEq + 'static,
    N: DocumentNode,
{
    /// An empty change set tracking the changes made to `doc`.
    pub fn create(doc: N) -> Self { ChangeSet::with_config(ChangeSetConfig::new(doc), Vec::new()) }
}

impl<D, N, E> ChangeSet<D, N, E>
where
    D: Clone + PartialEq,
    N: DocumentNode,
    E: TokenEncoder<N>,
{
    /// Creates a change set from a configuration and the changes already
    /// made to its document, such as a restored change history.
    ///
    /// # Panics
    ///
    /// Panics if the changes are out of order or overlap.
    pub fn with_config(config: ChangeSetConfig<D, N, E>, changes: Vec<Change<D>>) -> Self {
        assert!(
            changes
                .windows(2)
                .all(|pair| pair[0].to_a <= pair[1].from_a && pair[0].to_b <= pair[1].from_b),
            "Changes must be sorted and must not overlap"
        );

        ChangeSet {
            config: Arc::new(config),
            changes: changes.into(),
        }
    }

    #[must_use]
    pub fn changes(&self) -> &[Change<D>] { &self.changes }

    /// The document the changes are relative to.
    #[must_use]
    pub fn start_doc(&self) -> &N { self.config.doc() }

    #[must_use]
    pub fn config(&self) -> &ChangeSetConfig<D, N, E> { &self.config }

    /// Records the edits described by `maps`, which lead from the current
    /// document to `new_doc`, labelling the content they touched with
    /// `data`.
    #[must_use]
    pub fn add_steps<M>(&self, new_doc: &N, maps: &[M], data: D) -> Self
    where
        M: PositionMap,
    {
        self.add_step_changes(new_doc, maps, |_| data.clone())
    }

    /// Like `add_steps`, with a separate label for each map.
    ///
    /// # Panics
    ///
    /// Panics if there isn't exactly one label per map.
    #[must_use]
    pub fn add_steps_with_data<M>(&self, new_doc: &N, maps: &[M], data: &[D]) -> Self
    where
        M: PositionMap,
    {
        assert_eq!(
            maps.len(),
            data.len(),
            "Every map must come with its own data"
        );

        self.add_step_changes(new_doc, maps, |index| data[index].clone())
    }

    fn add_step_changes<M>(&self, new_doc: &N, maps: &[M], data_for: impl Fn(usize) -> D) -> Self
    where
        M: PositionMap,
    {
        let mut step_changes = Vec::new();
        for (index, map) in maps.iter().enumerate() {
            let data = data_for(index);

            // Each range of a map is recorded as if the earlier ones had
            // already been applied.
            let mut offset: isize = 0;
            map.for_each_range(|from_a, to_a, from_b, to_b| {
                step_changes.push(Change::new(
                    shift(from_a, offset),
                    shift(to_a, offset),
                    from_b,
                    to_b,
                    spans_of(to_a - from_a, &data),
                    spans_of(to_b - from_b, &data),
                ));
                offset += (to_b - from_b) as isize - (to_a - from_a) as isize;
            });
        }

        if step_changes.is_empty() {
            return self.clone();
        }

        debug!(
            "Recording {} changed ranges from {} maps on top of {} changes",
            step_changes.len(),
            maps.len(),
            self.changes.len()
        );

        let combine = self.config.combine();
        let new_changes = merge_all(&step_changes, combine);
        let merged = Change::merge(&self.changes, &new_changes, combine);
        let changes = self.minimize(new_doc, merged, &new_changes);

        ChangeSet {
            config: Arc::clone(&self.config),
            changes: changes.into(),
        }
    }

    /// Replaces every change that both deletes and inserts content and
    /// touches one of `new_changes` with the parts of it that actually
    /// differ.
    fn minimize(
        &self,
        new_doc: &N,
        changes: Vec<Change<D>>,
        new_changes: &[Change<D>],
    ) -> Vec<Change<D>> {
        let mut result = Vec::with_capacity(changes.len());

        for change in changes {
            let touched = new_changes
                .iter()
                .any(|new| new.to_b > change.from_b && new.from_b < change.to_b);
            if change.from_a == change.to_a || change.from_b == change.to_b || !touched {
                result.push(change);
                continue;
            }

            let diff = compute_diff(
                self.config.doc().children(),
                new_doc.children(),
                &change,
                self.config.encoder(),
                self.config.limits(),
            );

            if matches!(diff.as_slice(), [single] if same_bounds(single, &change)) {
                trace!(
                    "Change {}..{} -> {}..{} can't be reduced",
                    change.from_a, change.to_a, change.from_b, change.to_b
                );
                result.push(change);
            } else {
                trace!(
                    "Change {}..{} -> {}..{} reduced to {} changes",
                    change.from_a,
                    change.to_a,
                    change.from_b,
                    change.to_b,
                    diff.len()
                );
                result.extend(diff);
            }
        }

        result
    }

    /// Rewrites the data of every span with `f`. Spans, span lists and
    /// changes whose data `f` leaves equal are reused.
    #[must_use]
    pub fn map(&self, f: impl Fn(&D) -> D) -> Self {
        let mut mapped: Option<Vec<Change<D>>> = None;

        for (index, change) in self.changes.iter().enumerate() {
            let deleted = map_spans(&change.deleted, &f);
            let inserted = map_spans(&change.inserted, &f);

            if Arc::ptr_eq(&deleted, &change.deleted) && Arc::ptr_eq(&inserted, &change.inserted) {
                if let Some(mapped) = &mut mapped {
                    mapped.push(change.clone());
                }
            } else {
                mapped
                    .get_or_insert_with(|| self.changes[..index].to_vec())
                    .push(Change {
                        deleted,
                        inserted,
                        ..change.clone()
                    });
            }
        }

        match mapped {
            None => self.clone(),
            Some(changes) => ChangeSet {
                config: Arc::clone(&self.config),
                changes: changes.into(),
            },
        }
    }

    /// The range of the document of `other` in which its changes differ from
    /// this set's, or `None` if they don't differ. Both sets must be relative
    /// to the same start document and have the same document as their
    /// current one.
    #[must_use]
    pub fn changed_range(&self, other: &Self) -> Option<Range<usize>> {
        self.changed_range_touching(other, None)
    }

    /// Like `changed_range`, for an `other` set whose document was reached
    /// from this set's through `maps`. The positions touched by the maps are
    /// always part of the result.
    #[must_use]
    pub fn changed_range_with_maps<M>(&self, other: &Self, maps: &[M]) -> Option<Range<usize>>
    where
        M: PositionMap,
    {
        self.changed_range_touching(other, touched_range(maps))
    }

    fn changed_range_touching(
        &self,
        other: &Self,
        touched: Option<TouchedRange>,
    ) -> Option<Range<usize>> {
        if Arc::ptr_eq(&self.changes, &other.changes) {
            return None;
        }

        let moved = touched.map_or(0, |touched| {
            (touched.to_b - touched.from_b) as isize - (touched.to_a - touched.from_a) as isize
        });
        let map = |position: usize| match touched {
            Some(touched) if position > touched.from_a => position.saturating_add_signed(moved),
            _ => position,
        };

        let (mut from, mut to) = touched.map_or((usize::MAX, 0), |touched| {
            (touched.from_b, touched.to_b)
        });
        let mut add = |start: usize, end: usize| {
            from = from.min(start);
            to = to.max(end);
        };

        let (mut index_a, mut index_b) = (0, 0);
        loop {
            match (self.changes.get(index_a), other.changes.get(index_b)) {
                (Some(a), Some(b)) if same_ranges(a, b, map) => {
                    index_a += 1;
                    index_b += 1;
                }
                (Some(a), Some(b)) if map(a.from_b) < b.from_b => {
                    add(map(a.from_b), map(a.to_b));
                    index_a += 1;
                }
                (_, Some(b)) => {
                    add(b.from_b, b.to_b);
                    index_b += 1;
                }
                (Some(a), None) => {
                    add(map(a.from_b), map(a.to_b));
                    index_a += 1;
                }
                (None, None) => break,
            }
        }

        (from <= to).then_some(from..to)
    }
}

impl<D, N, E> Clone for ChangeSet<D, N, E> {
    fn clone(&self) -> Self {
        ChangeSet {
            config: Arc::clone(&self.config),
            changes: Arc::clone(&self.changes),
        }
    }
}

impl<D, N, E> Debug for ChangeSet<D, N, E>
where
    D: Debug,
    N: Debug,
    E: Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChangeSet")
            .field("config", &self.config)
            .field("changes", &self.changes)
            .finish()
    }
}

/// Merges a list of changes applied one after the other by merging halves.
fn merge_all<D>(changes: &[Change<D>], combine: &Combine<D>) -> Vec<Change<D>>
where
    D: Clone,
{
    if changes.len() <= 1 {
        return changes.to_vec();
    }

    let (left, right) = changes.split_at(changes.len() / 2);
    Change::merge(
        &merge_all(left, combine),
        &merge_all(right, combine),
        combine,
    )
}

fn spans_of<D>(length: usize, data: &D) -> Spans<D>
where
    D: Clone,
{
    if length == 0 {
        Span::none()
    } else {
        vec![Span::new(length, data.clone())].into()
    }
}

fn map_spans<D>(spans: &Spans<D>, f: &impl Fn(&D) -> D) -> Spans<D>
where
    D: Clone + PartialEq,
{
    let mut mapped: Option<Vec<Span<D>>> = None;

    for (index, span) in spans.iter().enumerate() {
        let data = f(&span.data);
        if data == span.data {
            if let Some(mapped) = &mut mapped {
                mapped.push(span.clone());
            }
        } else {
            mapped
                .get_or_insert_with(|| spans[..index].to_vec())
                .push(Span::new(span.length, data));
        }
    }

    mapped.map_or_else(|| Arc::clone(spans), Into::into)
}

fn same_bounds<D>(a: &Change<D>, b: &Change<D>) -> bool {
    a.from_a == b.from_a && a.to_a == b.to_a && a.from_b == b.from_b && a.to_b == b.to_b
}

/// Whether `a`, with its B positions mapped by `map`, covers the same range
/// as `b` with the same content.
fn same_ranges<D>(a: &Change<D>, b: &Change<D>, map: impl Fn(usize) -> usize) -> bool
where
    D: PartialEq,
{
    map(a.from_b) == b.from_b
        && map(a.to_b) == b.to_b
        && a.deleted == b.deleted
        && a.inserted == b.inserted
}
