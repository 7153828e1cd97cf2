pub mod bookmarks;
pub mod error;
pub mod handlers;
pub mod migration;
pub mod service;

#[cfg(test)]
pub mod testing;
