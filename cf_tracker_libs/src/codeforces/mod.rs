pub mod client;
pub mod data;
pub mod model;
pub mod signature;

pub use client::{CodeforcesApi, CodeforcesClient, CodeforcesConfig, CodeforcesError};
pub use data::ContestData;
