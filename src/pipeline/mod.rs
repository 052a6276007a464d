pub mod controller;
pub mod stage;
