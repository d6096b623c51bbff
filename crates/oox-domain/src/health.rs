//! Health module - per-code wellbeing derived from health questions
//!
//! Each health answer scores a code 1 (healthy leaning) or 0 (unhealthy
//! leaning). The ratio of healthy answers maps to a three-level status.

use crate::{CategoryCode, Match, FUNCTION_CODES};
use std::collections::HashMap;

/// Healthy-answer ratio at or above which a code is `Healthy`
pub const HEALTHY_THRESHOLD: f64 = 0.67;

/// Healthy-answer ratio at or above which a code is `Normal`
pub const NORMAL_THRESHOLD: f64 = 0.34;

/// Three-level health status, serialized as `O`, `o` and `x`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HealthStatus {
    /// `O`
    Healthy,
    /// `o`
    Normal,
    /// `x`
    Unhealthy,
}

impl HealthStatus {
    /// Get the single-character symbol
    pub fn as_str(&self) -> &'static str {
        match self {
            HealthStatus::Healthy => "O",
            HealthStatus::Normal => "o",
            HealthStatus::Unhealthy => "x",
        }
    }

    /// Parse from the single-character symbol (case-sensitive)
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "O" => Some(HealthStatus::Healthy),
            "o" => Some(HealthStatus::Normal),
            "x" => Some(HealthStatus::Unhealthy),
            _ => None,
        }
    }

    /// Status for `healthy` answers out of `count`
    ///
    /// No answers at all counts as `Normal`.
    pub fn from_counts(healthy: u32, count: u32) -> Self {
        if count == 0 {
            return HealthStatus::Normal;
        }
        let ratio = f64::from(healthy) / f64::from(count);
        if ratio >= HEALTHY_THRESHOLD {
            HealthStatus::Healthy
        } else if ratio >= NORMAL_THRESHOLD {
            HealthStatus::Normal
        } else {
            HealthStatus::Unhealthy
        }
    }
}

impl std::fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Running tally of health answers per code
#[derive(Debug, Clone, Default)]
pub struct HealthTally {
    counts: HashMap<CategoryCode, (u32, u32)>,
}

impl HealthTally {
    /// Create an empty tally
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one answer for `code`
    pub fn record(&mut self, code: CategoryCode, healthy: bool) {
        let entry = self.counts.entry(code).or_insert((0, 0));
        if healthy {
            entry.0 += 1;
        }
        entry.1 += 1;
    }

    /// Record a raw answer: `value` 1 leans healthy, 0 unhealthy
    ///
    /// # Errors
    /// Returns error if `target` is empty or `value` is not 0 or 1
    pub fn record_answer(&mut self, target: &str, value: u8) -> Result<(), String> {
        if value > 1 {
            return Err(format!("Health answer for {} must be 0 or 1", target));
        }
        self.record(CategoryCode::new(target)?, value == 1);
        Ok(())
    }

    /// Current status of `code`
    pub fn status(&self, code: &CategoryCode) -> HealthStatus {
        let (healthy, count) = self.counts.get(code).copied().unwrap_or((0, 0));
        HealthStatus::from_counts(healthy, count)
    }

    /// Codes that received at least one answer
    pub fn answered(&self) -> impl Iterator<Item = &CategoryCode> {
        self.counts.keys()
    }

    /// Status for each of `codes`, in the given order
    pub fn statuses<'a, I>(&self, codes: I) -> Vec<(CategoryCode, HealthStatus)>
    where
        I: IntoIterator<Item = &'a CategoryCode>,
    {
        codes
            .into_iter()
            .map(|code| (code.clone(), self.status(code)))
            .collect()
    }

    /// Status report for a quiz session
    ///
    /// Covers the eight function codes, then other codes from `matches` in
    /// first-seen order, then other answered codes sorted. Each code once.
    pub fn report(&self, matches: &[Match]) -> Vec<(CategoryCode, HealthStatus)> {
        let mut codes = CategoryCode::function_codes();
        let mut push = |code: &CategoryCode| {
            if !FUNCTION_CODES.contains(&code.as_str()) && !codes.contains(code) {
                codes.push(code.clone());
            }
        };
        for m in matches {
            push(&m.winner);
            push(&m.loser);
        }
        let mut answered: Vec<&CategoryCode> = self.answered().collect();
        answered.sort();
        for code in answered {
            push(code);
        }
        self.statuses(&codes)
    }
}
