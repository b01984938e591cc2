pub mod constants;
pub mod helper;
pub mod markdown;
pub mod render;
