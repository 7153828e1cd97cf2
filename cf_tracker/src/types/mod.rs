pub mod bookmark;
pub mod tables;
