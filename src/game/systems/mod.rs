pub mod bounds;
pub mod collision;
pub mod physics;
pub mod resolve;
