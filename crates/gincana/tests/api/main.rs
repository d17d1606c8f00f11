mod helpers;
mod leaderboard_test;
mod participants_test;
mod tools_test;
