use std::num::NonZeroU32;

use jiff::Zoned;
use log::{info, warn};

use crate::{
    inventory::{CategoryId, Quantity, Tag},
    sequencer::{SequencerError, TagSequencer},
    store::{StoreError, TagStore},
};

use super::{NewPurchaseLot, PurchaseLot};

/// Turns purchases into persisted lots with freshly minted tags.
///
/// Tags are computed from the tag history and written in one step by
/// [`TagStore::persist_lot`]. When another purchase for the same category
/// persisted overlapping tags in between, the store rejects the lot and the
/// tags are recomputed from the new history, at most `attempts` times.
#[derive(Debug, Clone)]
pub struct Purchasing<S> {
    sequencer: TagSequencer<S>,
    attempts: NonZeroU32,
}

impl<S: TagStore> Purchasing<S> {
    pub fn new(sequencer: TagSequencer<S>, attempts: NonZeroU32) -> Self {
        Self {
            sequencer,
            attempts,
        }
    }

    pub fn sequencer(&self) -> &TagSequencer<S> {
        &self.sequencer
    }

    /// Tags a purchase would receive right now. Nothing is reserved, so a
    /// later purchase may end up with different tags.
    pub async fn preview(
        &self,
        category: CategoryId,
        quantity: Quantity,
        purchased_at: &Zoned,
    ) -> Result<Vec<Tag>, SequencerError> {
        let category = self.sequencer.category(category).await?;
        self.sequencer
            .allocate_tags(category.id(), category.pre_code(), quantity, purchased_at)
            .await
    }

    pub async fn purchase(
        &self,
        category: CategoryId,
        quantity: Quantity,
        purchased_at: &Zoned,
    ) -> Result<PurchaseLot, SequencerError> {
        let category = self.sequencer.category(category).await?;

        for attempt in 1..=self.attempts.get() {
            let tags = self
                .sequencer
                .allocate_tags(category.id(), category.pre_code(), quantity, purchased_at)
                .await?;
            let lot = NewPurchaseLot::new(&category, quantity, tags, purchased_at.timestamp());

            match self.sequencer.store().persist_lot(&lot).await {
                Ok(persisted) => {
                    info!(
                        "purchased {quantity} units of {} as lot {}",
                        category.name(),
                        persisted.id()
                    );
                    return Ok(persisted);
                }
                Err(StoreError::Conflict(_)) => {
                    warn!(
                        "attempt {attempt}/{} to purchase for {} collided with a concurrent purchase",
                        self.attempts,
                        category.pre_code()
                    );
                }
                Err(error) => return Err(error.into()),
            }
        }

        Err(SequencerError::SequenceConflict {
            category: category.id(),
            attempts: self.attempts.get(),
        })
    }
}
