use jiff::Zoned;
use log::{debug, trace};

use crate::{
    inventory::{Category, CategoryId, PreCode, Quantity, SequenceNumber, Tag},
    store::TagStore,
};

use super::{
    SequencerError, contains_ignore_case, first_available, format_tags, next_sequence_number,
};

/// Computes tags for a category from its persisted tag history.
///
/// Every operation is read-only. Allocated tags only count as issued once the
/// purchasing workflow has persisted them as a lot, see
/// [`crate::purchase::Purchasing`].
#[derive(Debug, Clone)]
pub struct TagSequencer<S> {
    store: S,
}

impl<S: TagStore> TagSequencer<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub async fn category(&self, id: CategoryId) -> Result<Category, SequencerError> {
        self.store
            .category(id)
            .await?
            .ok_or(SequencerError::UnknownCategory(id))
    }

    pub async fn peek_next_sequence_number(
        &self,
        category: CategoryId,
        pre_code: &PreCode,
    ) -> Result<SequenceNumber, SequencerError> {
        let history = self.store.tag_history(category).await?;
        let issued = history.len();
        let next = next_sequence_number(pre_code, history)?;
        trace!("next sequence number of {pre_code} is {next} after {issued} issued tags");

        Ok(next)
    }

    /// Formats the next `quantity` tags of the category without reserving
    /// them.
    pub async fn allocate_tags(
        &self,
        category: CategoryId,
        pre_code: &PreCode,
        quantity: Quantity,
        purchased_at: &Zoned,
    ) -> Result<Vec<Tag>, SequencerError> {
        let start = self.peek_next_sequence_number(category, pre_code).await?;
        let tags = format_tags(pre_code, start, quantity, purchased_at)?;
        debug!(
            "allocated {quantity} tags for {pre_code} starting at sequence number {start}"
        );

        Ok(tags)
    }

    pub async fn find_next_available_tag(&self, category: CategoryId) -> Result<Tag, SequencerError> {
        let category = self.category(category).await?;
        let issued = self.store.issued_tags(category.id()).await?;
        let consumed = self.store.consumed_tags(category.id()).await?;
        trace!(
            "searching {} issued tags of {} for one not among {} consumed",
            issued.len(),
            category.pre_code(),
            consumed.len()
        );

        first_available(category.pre_code(), &issued, &consumed)
            .ok_or(SequencerError::NotFound(category.id()))
    }

    /// Whether an asset registered in this category already carries the
    /// candidate tag, ignoring case.
    pub async fn is_duplicate_tag(
        &self,
        category: CategoryId,
        candidate: &str,
    ) -> Result<bool, SequencerError> {
        let category = self.category(category).await?;
        let consumed = self.store.consumed_tags(category.id()).await?;

        Ok(contains_ignore_case(&consumed, candidate))
    }
}
