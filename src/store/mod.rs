mod deletion;
mod sqlite;

use std::io;

use thiserror::Error;

use crate::{
    inventory::{Category, CategoryId, PreCode, PurchaseLotId, SequenceNumber},
    purchase::{NewPurchaseLot, PurchaseLot},
};

pub use deletion::DeletionKind;
pub use deletion::DeletionRecord;
pub use sqlite::SqliteStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("sqlite: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("migrating inventory schema failed: {0}")]
    Migration(#[from] rusqlite_migration::Error),
    #[error("IO Issue when opening inventory {0}")]
    Io(#[from] io::Error),
    #[error("tags for category {0} collided with a concurrently persisted purchase")]
    Conflict(CategoryId),
    #[error("pre-code {0} is already used by another category")]
    DuplicatePreCode(PreCode),
    #[error("tag {tag} is already registered in category {category}")]
    DuplicateTag { category: CategoryId, tag: String },
    #[error("no category {0}")]
    UnknownCategory(CategoryId),
    #[error("no purchase lot {0}")]
    UnknownLot(PurchaseLotId),
    #[error("no asset tagged {tag} in category {category}")]
    UnknownAsset { category: CategoryId, tag: String },
    #[error("Encountered inconsistent inventory state: {0}")]
    Inconsistent(String),
}

/// Persistence the tag sequencer reads from and the purchasing workflow
/// writes through.
///
/// Issued tags are append-only history. `persist_lot` is the only writer and
/// must store a lot together with all of its tags or nothing at all. A lot
/// whose tags collide with tags already issued for the category is rejected
/// with [`StoreError::Conflict`].
pub trait TagStore {
    fn category(
        &self,
        id: CategoryId,
    ) -> impl Future<Output = Result<Option<Category>, StoreError>> + Send;

    /// Every tag ever issued for the category, including tags of deleted lots,
    /// next to the sequence number it was stored under. The tag text is not
    /// validated and may be corrupt.
    fn tag_history(
        &self,
        category: CategoryId,
    ) -> impl Future<Output = Result<Vec<(SequenceNumber, String)>, StoreError>> + Send;

    /// Tags of the category's live purchase lots.
    fn issued_tags(
        &self,
        category: CategoryId,
    ) -> impl Future<Output = Result<Vec<String>, StoreError>> + Send;

    /// Tags attached to registered assets of the category.
    fn consumed_tags(
        &self,
        category: CategoryId,
    ) -> impl Future<Output = Result<Vec<String>, StoreError>> + Send;

    fn persist_lot(
        &self,
        lot: &NewPurchaseLot,
    ) -> impl Future<Output = Result<PurchaseLot, StoreError>> + Send;
}
