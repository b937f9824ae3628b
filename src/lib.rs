//! Track the changes between the start version of a document and its latest
//! revision.
//!
//! Every edit is recorded through the position map of the step that made it
//! and merged into a single list of non-overlapping changes. Each change
//! remembers which content it deleted from the start document and which
//! content it inserted, labelled with caller-defined data such as the author
//! of the edit. Replaced ranges are minimized with a diff, so retyping
//! deleted content doesn't show up as a change.
//!
//! ```
//! use tracked_changes::TrackedText;
//!
//! let text = TrackedText::new("The quick brown fox");
//! let edited = text.replace(4, 15, "quick red", "alice")?;
//!
//! let change = &edited.changes()[0];
//! assert_eq!((change.from_a(), change.to_a()), (10, 15));
//! assert_eq!((change.from_b(), change.to_b()), (10, 13));
//! assert_eq!(change.inserted()[0].data, "alice");
//! # Ok::<(), tracked_changes::DocumentError>(())
//! ```

mod change;
mod change_set;
pub mod diff;
pub mod document;
mod errors;
pub mod mapping;
pub mod simplify;
mod span;
pub mod tokenizer;
mod tracked_text;
mod utils;

pub use change::Change;
pub use change_set::{ChangeSet, ChangeSetConfig, DiffLimits};
pub use diff::{MAX_DIFF_SIZE, compute_diff};
pub use document::{DocumentNode, Node, NodeSpec, Schema};
pub use errors::{ChangeError, DocumentError};
pub use mapping::{Assoc, PositionMap, StepMap};
pub use simplify::{MAX_SIMPLIFY_DISTANCE, simplify_changes};
pub use span::{Combine, Span, Spans, combine_equal};
pub use tokenizer::{TokenEncoder, default_encoder::DefaultEncoder};
pub use tracked_text::TrackedText;
pub use utils::side::Side;

#[cfg(feature = "wasm")]
pub mod wasm;
