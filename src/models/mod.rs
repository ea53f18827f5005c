pub mod delivery_fee_tier;
pub mod listing;
pub mod order;
pub mod pricing_config;
