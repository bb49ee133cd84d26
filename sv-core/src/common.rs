use std::{fmt::Display, str::FromStr};

use derive_more::{Display, From};
use thiserror::Error;

/// Opaque identifier of a structural-variant segment.
///
/// Nodes in a [`crate::graph::Graph`] and the `Source`/`Sink` columns of a
/// [`crate::table::Table`] are joined on this value.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Display, From)]
pub struct NodeId(pub String);

impl From<&str> for NodeId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl NodeId {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Layout coordinates of a node: `x` is the start coordinate, `y` the copy number.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl From<(f64, f64)> for Position {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("Invalid position `{0}`, expected `x,y`")]
pub struct PositionError(pub String);

impl FromStr for Position {
    type Err = PositionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Graphviz marks pinned positions with a trailing `!`.
        let trimmed = s.trim().trim_end_matches('!');
        let (x, y) = trimmed
            .split_once(',')
            .ok_or_else(|| PositionError(s.to_owned()))?;
        let parse = |v: &str| {
            v.trim()
                .parse::<f64>()
                .map_err(|_| PositionError(s.to_owned()))
        };
        Ok(Self {
            x: parse(x)?,
            y: parse(y)?,
        })
    }
}

/// Target of a table row: either another segment or the `loose` marker.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Sink {
    Node(NodeId),
    Loose,
}

impl Sink {
    const LOOSE: &'static str = "loose";

    /// Parse a `Sink` cell. Empty cells and `loose` (any case) are [`Sink::Loose`].
    #[must_use]
    pub fn parse(cell: &str) -> Self {
        let cell = cell.trim();
        if cell.is_empty() || cell.eq_ignore_ascii_case(Self::LOOSE) {
            Self::Loose
        } else {
            Self::Node(NodeId::from(cell))
        }
    }

    #[must_use]
    pub const fn node(&self) -> Option<&NodeId> {
        match self {
            Self::Node(id) => Some(id),
            Self::Loose => None,
        }
    }
}

impl Display for Sink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Node(id) => id.fmt(f),
            Self::Loose => f.write_str(Self::LOOSE),
        }
    }
}
