#![deny(unsafe_code)]

//! Globally optimal matching of two lists.
//!
//! This crate pairs the items of two lists so that the summed similarity of
//! all automatic pairs is as high as possible:
//!
//! - **Similarity**: fuzzy scoring strategies backed by `rapidfuzz`
//! - **Assignment**: a Kuhn-Munkres solver for rectangular reward matrices
//! - **Engine**: locks first, then the optimal pairing of what is left
//! - **Session**: editable list state and last-writer-wins result holding
//!
//! # Example
//!
//! ```ignore
//! use listmatch_map::MatchEngine;
//! use listmatch_model::{LockSet, MatchOptions};
//!
//! let mut locks = LockSet::new();
//! locks.add_lock("X", "Z")?;
//!
//! let engine = MatchEngine::with_defaults();
//! let result = engine.match_lists(&list_a, &list_b, &locks, &MatchOptions::default())?;
//! for m in &result.matches {
//!     println!("{} -> {} ({})", m.source, m.target, m.score);
//! }
//! ```

pub mod assignment;
pub mod engine;
pub mod error;
pub mod session;
pub mod similarity;

pub use assignment::{Assignment, AssignmentSolver, HungarianSolver, RewardMatrix};
pub use engine::MatchEngine;
pub use error::{SimilarityError, SolverError};
pub use session::{MatchSession, ResultSlot, RunTicket};
pub use similarity::{RapidfuzzSimilarity, SimilarityProvider, Strategy};
