pub mod events;
pub mod fs;
pub mod image;
pub mod scanner;
