//! gincana-core: scoring engine and document types for the gincana leaderboard
//!
//! This crate holds everything that is pure computation over the JSON documents:
//! verse reference parsing, points calculation, rankings and the activity feed.
//! It performs no I/O so the server and the command line tools share it as is.

pub mod activity;
pub mod errors;
pub mod points;
pub mod ranking;
pub mod reference;
pub mod timestamp;
pub mod types;
pub mod verses;

pub use activity::*;
pub use errors::*;
pub use points::*;
pub use ranking::*;
pub use reference::*;
pub use timestamp::*;
pub use types::*;
pub use verses::*;
