use sv_core::common::NodeId;
use thiserror::Error;

/// Failures while encoding one graph. Each graph fails independently.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum EncodeError {
    #[error("Node `{0}` has no layout position")]
    MissingNodePosition(NodeId),

    #[error("Node `{0}` has no matching row in the table")]
    UnresolvedNode(NodeId),

    #[error("{needed} categories but only {available} palette colors")]
    PaletteExhausted { needed: usize, available: usize },
}
