pub mod centroid;
pub mod district_index;
pub mod primitives;
