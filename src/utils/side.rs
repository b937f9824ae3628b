use std::fmt::Display;

/// The two coordinate systems a `Change` is expressed in: `A` for the old
/// document and `B` for the new one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    A,
    B,
}

impl Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::A => write!(f, "A (old document)"),
            Side::B => write!(f, "B (new document)"),
        }
    }
}
