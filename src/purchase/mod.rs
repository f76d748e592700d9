mod lot;
mod purchasing;

pub use lot::NewPurchaseLot;
pub use lot::PurchaseLot;
pub use purchasing::Purchasing;
