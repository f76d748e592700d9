use derive_getters::Getters;
use jiff::Timestamp;

use super::CategoryId;

/// A physical device registered in the registry of its category.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct RegisteredAsset {
    id: i64,
    #[getter(skip)]
    category: CategoryId,
    name: String,
    tag: Option<String>,
    #[getter(skip)]
    registered_at: Timestamp,
}

impl RegisteredAsset {
    pub fn new(
        id: i64,
        category: CategoryId,
        name: String,
        tag: Option<String>,
        registered_at: Timestamp,
    ) -> Self {
        Self {
            id,
            category,
            name,
            tag,
            registered_at,
        }
    }

    pub fn category(&self) -> CategoryId {
        self.category
    }

    pub fn registered_at(&self) -> Timestamp {
        self.registered_at
    }
}
