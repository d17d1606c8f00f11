pub mod leaderboard;

pub use leaderboard::leaderboard_page;
