//! Score submission and leaderboard contracts
//!
//! The HTTP score service lives outside the core. A session fires exactly one
//! [`ScoreSubmission`] per run and displays whatever leaderboard the host fetched.

#[cfg(test)]
use std::cell::RefCell;
#[cfg(test)]
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::LEADERBOARD_SIZE;

/// Failure reported by a score collaborator
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("score service rejected the submission (status {status})")]
    Rejected { status: u16 },
    #[error("score service unreachable: {0}")]
    Transport(String),
}

/// Payload posted to the score service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreSubmission {
    pub score: u64,
    pub init_data: String,
}

/// Sink for the end-of-run score
pub trait ScoreReporter {
    fn submit(&mut self, submission: &ScoreSubmission) -> Result<(), ReportError>;
}

/// Reporter that only logs the payload
#[derive(Debug, Clone, Copy, Default)]
pub struct LogReporter;

impl ScoreReporter for LogReporter {
    fn submit(&mut self, submission: &ScoreSubmission) -> Result<(), ReportError> {
        let body = serde_json::to_string(submission)
            .map_err(|e| ReportError::Transport(e.to_string()))?;
        log::info!("POST /api/score {}", body);
        Ok(())
    }
}

/// Reporter that records every submission; clones share the record
#[cfg(test)]
#[derive(Debug, Clone, Default)]
pub struct RecordingReporter {
    submissions: Rc<RefCell<Vec<ScoreSubmission>>>,
    fail: bool,
}

#[cfg(test)]
impl RecordingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records submissions but answers every one with an error
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn submissions(&self) -> Vec<ScoreSubmission> {
        self.submissions.borrow().clone()
    }
}

#[cfg(test)]
impl ScoreReporter for RecordingReporter {
    fn submit(&mut self, submission: &ScoreSubmission) -> Result<(), ReportError> {
        self.submissions.borrow_mut().push(submission.clone());
        if self.fail {
            Err(ReportError::Rejected { status: 503 })
        } else {
            Ok(())
        }
    }
}

/// A single leaderboard row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub name: String,
    pub score: u64,
}

/// Leaderboard fetched by the host, kept sorted by score (descending)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Leaderboard {
    pub entries: Vec<LeaderboardEntry>,
}

impl Leaderboard {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Normalize fetched rows: highest first, ties keep service order, top rows only
    pub fn from_entries(mut entries: Vec<LeaderboardEntry>) -> Self {
        entries.sort_by(|a, b| b.score.cmp(&a.score));
        entries.truncate(LEADERBOARD_SIZE);
        Self { entries }
    }

    /// Parse the score service's JSON response
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let entries: Vec<LeaderboardEntry> = serde_json::from_str(json)?;
        Ok(Self::from_entries(entries))
    }

    /// Place (1-based) a new score would take, or None when it misses the board.
    /// A tie lands below the rows already holding that score.
    pub fn potential_rank(&self, score: u64) -> Option<usize> {
        if score == 0 {
            return None;
        }
        let place = self.entries.partition_point(|e| e.score >= score);
        (place < LEADERBOARD_SIZE).then_some(place + 1)
    }

    pub fn qualifies(&self, score: u64) -> bool {
        self.potential_rank(score).is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }
}
