#![deny(unsafe_code)]

//! Data model shared by the listmatch crates.

pub mod config;
pub mod error;
pub mod lock;
pub mod matching;

pub use config::{AppConfig, DemoPreset, MatchDefaults};
pub use error::{ErrorKind, MatchError, Result};
pub use lock::{Lock, LockSet};
pub use matching::{
    DEFAULT_RATIO, DEFAULT_THRESHOLD, ListSide, MANUAL_SCORE, Match, MatchOptions, MatchResult,
    ScoreBand, ScoreBands,
};
