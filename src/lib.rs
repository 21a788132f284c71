//! Coverage and status engine for tracked sports-betting picks.
//!
//! `engine` turns a pick's freeform text (description, matchup, scoreboard)
//! into a canonical status and display strings; `feed` re-reads picks on a
//! tick and reports status changes.

pub mod config;
pub mod engine;
pub mod feed;
pub mod models;

pub use engine::{summarize, PickEngine, PickEvaluation};
pub use models::{PickOutcome, PickRecord, StatusChange};
