use std::{fmt::Display, str::FromStr};

use derive_getters::Getters;
use jiff::Timestamp;
use thiserror::Error;

use crate::inventory::CategoryId;

// DO NOT RENAME! The textual representation is stored in the deletion log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeletionKind {
    Lot,
    Asset,
}

impl Display for DeletionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeletionKind::Lot => write!(f, "lot"),
            DeletionKind::Asset => write!(f, "asset"),
        }
    }
}

#[derive(Error, Debug)]
#[error("unknown deletion kind {kind}")]
pub struct UnknownDeletionKindError {
    kind: String,
}

impl FromStr for DeletionKind {
    type Err = UnknownDeletionKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "lot" => Ok(DeletionKind::Lot),
            "asset" => Ok(DeletionKind::Asset),
            _ => Err(Self::Err {
                kind: s.to_string(),
            }),
        }
    }
}

/// Audit entry written whenever a purchase lot or a registered asset is deleted.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct DeletionRecord {
    #[getter(skip)]
    kind: DeletionKind,
    #[getter(skip)]
    category: CategoryId,
    reference: String,
    #[getter(skip)]
    deleted_at: Timestamp,
}

impl DeletionRecord {
    pub fn new(
        kind: DeletionKind,
        category: CategoryId,
        reference: String,
        deleted_at: Timestamp,
    ) -> Self {
        Self {
            kind,
            category,
            reference,
            deleted_at,
        }
    }

    pub fn kind(&self) -> DeletionKind {
        self.kind
    }

    pub fn category(&self) -> CategoryId {
        self.category
    }

    pub fn deleted_at(&self) -> Timestamp {
        self.deleted_at
    }
}

impl Display for DeletionRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:.0} {} {} of category {}",
            self.deleted_at, self.kind, self.reference, self.category
        )
    }
}

#[cfg(test)]
mod tests {
    use assertables::*;
    use rstest::*;

    use super::*;

    #[rstest]
    #[case(DeletionKind::Lot)]
    #[case(DeletionKind::Asset)]
    fn test_kind_reads_back_what_it_writes(#[case] kind: DeletionKind) {
        assert_eq!(kind, assert_ok!(kind.to_string().parse::<DeletionKind>()));
    }

    #[rstest]
    fn test_unknown_kind_is_rejected() {
        assert_err!("location".parse::<DeletionKind>());
    }
}
