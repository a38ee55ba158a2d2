//! Venue domain - the trading capability and its implementations

mod constant_product;
mod dex_interface;
mod dex_registry;
mod fixed_rate;
#[cfg(test)]
pub(crate) mod scripted;

pub use constant_product::ConstantProductVenue;
pub use dex_interface::Venue;
pub use dex_registry::VenueKind;
pub use fixed_rate::FixedRateVenue;
