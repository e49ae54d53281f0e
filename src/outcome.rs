use crate::ItemId;
use thiserror::Error;

/// Why an operation left the canvas untouched
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Skip {
    #[error("item not found: {0}")]
    NotFound(ItemId),

    #[error("index out of range: {from} -> {to} (len {len})")]
    IndexOutOfRange { from: usize, to: usize, len: usize },

    #[error("not a widget: {0}")]
    NotAWidget(ItemId),

    #[error("id already present on the canvas: {0}")]
    DuplicateId(ItemId),

    #[error("rejected item list: {0}")]
    Invalid(String),

    #[error("drag ended outside any drop target")]
    NoTarget,

    #[error("drop target is not valid for this drag source")]
    InvalidTarget,

    #[error("dropped back onto its own container")]
    SameContainer,

    #[error("source and target are the same position")]
    SamePosition,

    #[error("nothing to undo")]
    NothingToUndo,

    #[error("nothing to redo")]
    NothingToRedo,
}

/// Result of a store operation. Operations never fail outright; they
/// either change the canvas or report why they did not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Applied,
    Created(ItemId),
    Skipped(Skip),
}

impl Outcome {
    pub fn is_applied(&self) -> bool {
        !matches!(self, Outcome::Skipped(_))
    }

    pub fn created_id(&self) -> Option<ItemId> {
        match self {
            Outcome::Created(id) => Some(*id),
            _ => None,
        }
    }

    pub fn skip_reason(&self) -> Option<&Skip> {
        match self {
            Outcome::Skipped(skip) => Some(skip),
            _ => None,
        }
    }
}

impl From<Skip> for Outcome {
    fn from(skip: Skip) -> Self {
        Outcome::Skipped(skip)
    }
}
