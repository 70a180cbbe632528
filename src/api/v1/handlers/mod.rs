pub mod capabilities;
pub mod health;
pub mod me;
