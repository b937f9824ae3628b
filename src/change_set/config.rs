use std::fmt::{self, Debug};

use log::debug;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    diff::MAX_DIFF_SIZE,
    simplify::MAX_SIMPLIFY_DISTANCE,
    span::{Combine, combine_equal},
    tokenizer::default_encoder::DefaultEncoder,
};

/// Work bounds of the diff and simplification passes.
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DiffLimits {
    /// Number of edits after which the diff gives up and reports the whole
    /// trimmed range as changed.
    #[cfg_attr(feature = "serde", serde(default = "default_max_diff_size"))]
    pub max_diff_size: usize,

    /// Changes closer than this (in new-document positions) are simplified
    /// together.
    #[cfg_attr(feature = "serde", serde(default = "default_max_simplify_distance"))]
    pub max_simplify_distance: usize,
}

fn default_max_diff_size() -> usize {
    debug!("Using default max diff size: {MAX_DIFF_SIZE}");
    MAX_DIFF_SIZE
}

fn default_max_simplify_distance() -> usize {
    debug!("Using default max simplify distance: {MAX_SIMPLIFY_DISTANCE}");
    MAX_SIMPLIFY_DISTANCE
}

impl Default for DiffLimits {
    fn default() -> Self {
        Self {
            max_diff_size: default_max_diff_size(),
            max_simplify_distance: default_max_simplify_distance(),
        }
    }
}

/// Everything a `ChangeSet` and all the change sets derived from it share:
/// the document the changes are relative to, how adjacent spans are
/// combined, how content is tokenized for the diff, and the diff's limits.
pub struct ChangeSetConfig<D, N, E = DefaultEncoder> {
    doc: N,
    combine: Box<Combine<D>>,
    encoder: E,
    limits: DiffLimits,
}

impl<D, N> ChangeSetConfig<D, N, DefaultEncoder>
where
    D: PartialEq + Clone + 'static,
{
    /// Spans with equal data are combined and content is compared with the
    /// `DefaultEncoder`.
    pub fn new(doc: N) -> Self {
        ChangeSetConfig {
            doc,
            combine: Box::new(combine_equal::<D>),
            encoder: DefaultEncoder,
            limits: DiffLimits::default(),
        }
    }
}

impl<D, N, E> ChangeSetConfig<D, N, E> {
    #[must_use]
    pub fn with_combine(
        self,
        combine: impl Fn(&D, &D) -> Option<D> + Send + Sync + 'static,
    ) -> Self {
        ChangeSetConfig {
            combine: Box::new(combine),
            ..self
        }
    }

    #[must_use]
    pub fn with_encoder<Encoder>(self, encoder: Encoder) -> ChangeSetConfig<D, N, Encoder> {
        ChangeSetConfig {
            doc: self.doc,
            combine: self.combine,
            encoder,
            limits: self.limits,
        }
    }

    #[must_use]
    pub fn with_limits(self, limits: DiffLimits) -> Self { ChangeSetConfig { limits, ..self } }

    /// The document the changes are relative to.
    pub fn doc(&self) -> &N { &self.doc }

    pub fn combine(&self) -> &Combine<D> { &*self.combine }

    pub fn encoder(&self) -> &E { &self.encoder }

    pub fn limits(&self) -> &DiffLimits { &self.limits }
}

impl<D, N, E> Debug for ChangeSetConfig<D, N, E>
where
    N: Debug,
    E: Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChangeSetConfig")
            .field("doc", &self.doc)
            .field("encoder", &self.encoder)
            .field("limits", &self.limits)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::document::Node;

    #[test]
    fn test_default_limits() {
        assert_eq!(
            DiffLimits::default(),
            DiffLimits {
                max_diff_size: 5000,
                max_simplify_distance: 30,
            }
        );
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_limits_fall_back_to_defaults() {
        let limits: DiffLimits = serde_yaml::from_str("max_diff_size: 100").unwrap();

        assert_eq!(
            limits,
            DiffLimits {
                max_diff_size: 100,
                max_simplify_distance: 30,
            }
        );
    }

    #[test]
    fn test_custom_combine() {
        let config = ChangeSetConfig::<u32, Node>::new(Node::text_doc("abc"))
            .with_combine(|a, b| Some(a.max(b).to_owned()));

        assert_eq!((config.combine())(&1, &2), Some(2));
        assert_eq!(config.doc().text_content(), "abc");
    }
}
