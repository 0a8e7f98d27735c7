pub mod fetcher;
pub mod leaderboard;
pub mod lock;
pub mod notify;
pub mod report;
pub mod session;
