pub mod camera;
pub mod core;
pub mod host;
pub mod input;
pub mod timeline;
