pub mod inventory;
pub mod purchase;
pub mod sequencer;
pub mod store;

#[cfg(test)]
mod testing;
