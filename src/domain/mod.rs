pub mod entity;
pub mod grid;
pub mod patrol;
pub mod tile;
