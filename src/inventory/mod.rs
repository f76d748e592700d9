mod asset;
mod category;
mod pre_code;
mod quantity;
mod sequence_number;
mod tag;

use thiserror::Error;

pub use asset::RegisteredAsset;
pub use category::Category;
pub use category::CategoryId;
pub use category::PurchaseLotId;
pub use pre_code::PreCode;
pub use quantity::Quantity;
pub use sequence_number::SequenceNumber;
pub use tag::Tag;
pub use tag::sequence_suffix;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum InventoryError {
    #[error("invalid pre-code {0:?}: expected 1 to 4 uppercase letters")]
    InvalidPreCode(String),
    #[error("invalid quantity {0:?}: expected an integer from 1 to 10000")]
    InvalidQuantity(String),
    #[error("malformed tag {0:?}")]
    MalformedTag(String),
    #[error("purchase year {0} cannot be stamped on a tag")]
    UnstampableYear(i16),
}
