pub mod sound;
pub mod window;
