pub mod models;
pub mod schedule;
pub mod score;

pub use models::*;
pub use schedule::Schedule;
pub use score::SetScores;
