pub mod common;
pub use common::*;

pub mod accessory;
pub mod armor;
pub mod beast;
pub mod consumable;
pub mod shield;
pub mod weapon;

#[cfg(test)]
pub(crate) mod tests;
