pub mod api;
pub mod codeforces;

pub use codeforces::{CodeforcesApi, CodeforcesClient, CodeforcesConfig, CodeforcesError, ContestData};
