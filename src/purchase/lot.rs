use derive_getters::Getters;
use jiff::Timestamp;

use crate::inventory::{Category, CategoryId, PreCode, PurchaseLotId, Quantity, Tag};

/// A purchase whose tags are allocated but not yet persisted.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct NewPurchaseLot {
    #[getter(skip)]
    category: CategoryId,
    pre_code: PreCode,
    #[getter(skip)]
    quantity: Quantity,
    tags: Vec<Tag>,
    #[getter(skip)]
    purchased_at: Timestamp,
}

impl NewPurchaseLot {
    pub fn new(
        category: &Category,
        quantity: Quantity,
        tags: Vec<Tag>,
        purchased_at: Timestamp,
    ) -> Self {
        debug_assert_eq!(
            tags.len(),
            quantity.get() as usize,
            "lot should carry one tag per purchased unit"
        );
        Self {
            category: category.id(),
            pre_code: category.pre_code().clone(),
            quantity,
            tags,
            purchased_at,
        }
    }

    pub fn category(&self) -> CategoryId {
        self.category
    }

    pub fn quantity(&self) -> Quantity {
        self.quantity
    }

    pub fn purchased_at(&self) -> Timestamp {
        self.purchased_at
    }

    pub(crate) fn into_persisted(self, id: PurchaseLotId) -> PurchaseLot {
        PurchaseLot {
            id,
            category: self.category,
            pre_code: self.pre_code,
            quantity: self.quantity,
            tags: self.tags,
            purchased_at: self.purchased_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct PurchaseLot {
    #[getter(skip)]
    id: PurchaseLotId,
    #[getter(skip)]
    category: CategoryId,
    pre_code: PreCode,
    #[getter(skip)]
    quantity: Quantity,
    tags: Vec<Tag>,
    #[getter(skip)]
    purchased_at: Timestamp,
}

impl PurchaseLot {
    pub(crate) fn new(
        id: PurchaseLotId,
        category: CategoryId,
        pre_code: PreCode,
        quantity: Quantity,
        tags: Vec<Tag>,
        purchased_at: Timestamp,
    ) -> Self {
        Self {
            id,
            category,
            pre_code,
            quantity,
            tags,
            purchased_at,
        }
    }

    pub fn id(&self) -> PurchaseLotId {
        self.id
    }

    pub fn category(&self) -> CategoryId {
        self.category
    }

    pub fn quantity(&self) -> Quantity {
        self.quantity
    }

    pub fn purchased_at(&self) -> Timestamp {
        self.purchased_at
    }
}
