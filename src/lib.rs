pub mod app;
pub mod game;
pub mod rendering;
