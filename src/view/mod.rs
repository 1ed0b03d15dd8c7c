pub mod map_view;
pub mod scope;
