pub mod league;
pub mod server;
pub mod snapshot;

pub use league::LeagueService;
