mod projection;
mod tag_sequencer;

use thiserror::Error;

use crate::{
    inventory::{CategoryId, InventoryError, PreCode},
    store::StoreError,
};

pub use projection::contains_ignore_case;
pub use projection::first_available;
pub use projection::format_tags;
pub use projection::next_sequence_number;
pub use tag_sequencer::TagSequencer;

#[derive(Debug, Error)]
pub enum SequencerError {
    #[error("invalid quantity {0:?}: expected an integer from 1 to 10000")]
    InvalidQuantity(String),
    #[error("category {0} has no purchased tag left to assign")]
    NotFound(CategoryId),
    #[error(
        "purchase for category {category} collided with concurrent purchases {attempts} times, resubmit it"
    )]
    SequenceConflict { category: CategoryId, attempts: u32 },
    #[error("sequence numbers for pre-code {0} are exhausted")]
    SequenceExhausted(PreCode),
    #[error("no category {0}")]
    UnknownCategory(CategoryId),
    #[error(transparent)]
    Inventory(InventoryError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<InventoryError> for SequencerError {
    fn from(value: InventoryError) -> Self {
        match value {
            InventoryError::InvalidQuantity(raw) => Self::InvalidQuantity(raw),
            other => Self::Inventory(other),
        }
    }
}
