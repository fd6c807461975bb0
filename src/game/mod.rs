pub mod battle;
pub mod math;
