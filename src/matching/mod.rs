pub mod aggregate;
pub mod filter;
pub mod normalize;
pub mod status;
pub mod tiered_matcher;
