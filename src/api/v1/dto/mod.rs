pub mod capabilities;
pub mod me;
