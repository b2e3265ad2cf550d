//! Pattern/rule model
//!
//! Known tracker domains and model-flagged suspicious patterns are gathered
//! by a [`PatternModelBuilder`] and frozen into a [`PatternModel`], which the
//! rule synthesizer reads.

use std::collections::{BTreeSet, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};
use veil_core::Domain;

use crate::error::CompileError;

/// Patterns at or below this model confidence are dropped.
pub const ACCEPT_CONFIDENCE: f64 = 0.75;

/// Default threshold for [`PatternModel::is_suspicious`].
pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 0.8;

/// Category inferred for a suspicious pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatternCategory {
    Analytics,
    Advertising,
    Social,
    Tracking,
    Unknown,
}

impl PatternCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Analytics => "analytics",
            Self::Advertising => "advertising",
            Self::Social => "social",
            Self::Tracking => "tracking",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for PatternCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Keyword lists checked in order; the first category with a substring hit wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternKeywords {
    pub categories: Vec<(PatternCategory, Vec<String>)>,
}

impl PatternKeywords {
    pub fn classify(&self, pattern: &str) -> PatternCategory {
        let lower = pattern.to_lowercase();
        self.categories
            .iter()
            .find(|(_, words)| words.iter().any(|w| lower.contains(w.as_str())))
            .map(|(category, _)| *category)
            .unwrap_or(PatternCategory::Unknown)
    }
}

impl Default for PatternKeywords {
    fn default() -> Self {
        let list = |words: &[&str]| words.iter().map(|w| w.to_string()).collect();
        Self {
            categories: vec![
                (PatternCategory::Analytics, list(&["analytics", "ga", "gtag", "stats"])),
                (PatternCategory::Advertising, list(&["ad", "doubleclick", "adsense"])),
                (PatternCategory::Social, list(&["facebook", "twitter", "linkedin", "social"])),
                (PatternCategory::Tracking, list(&["track", "pixel", "beacon"])),
            ],
        }
    }
}

/// A URL pattern or domain the model flagged with high confidence.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SuspiciousPattern {
    pub pattern: String,
    pub confidence: f64,
    pub category: PatternCategory,
}

#[derive(Deserialize)]
struct TrackerFile {
    #[serde(default)]
    domains: Vec<String>,
}

#[derive(Deserialize)]
struct PatternInput {
    pattern: String,
    confidence: f64,
}

/// Accumulates trackers and patterns for one generation run.
#[derive(Debug, Clone, Default)]
pub struct PatternModelBuilder {
    keywords: PatternKeywords,
    trackers: Vec<String>,
    seen: HashSet<Domain>,
    patterns: Vec<SuspiciousPattern>,
}

impl PatternModelBuilder {
    pub fn new(keywords: PatternKeywords) -> Self {
        Self {
            keywords,
            ..Default::default()
        }
    }

    /// Add a known tracker domain, normalized. Returns `false` if it was
    /// already present or is not a domain.
    pub fn add_known_tracker(&mut self, domain: &str) -> bool {
        let Some(domain) = Domain::parse(domain) else {
            log::debug!("ignoring known tracker {domain:?}");
            return false;
        };
        if !self.seen.insert(domain.clone()) {
            return false;
        }
        self.trackers.push(domain.into_string());
        true
    }

    /// Load known trackers from a `{"domains": [...]}` document.
    pub fn load_known_trackers(&mut self, json: &str) -> Result<usize, CompileError> {
        let file: TrackerFile = serde_json::from_str(json)?;
        let added = file
            .domains
            .iter()
            .filter(|d| self.add_known_tracker(d))
            .count();
        log::debug!("loaded {added} known tracker(s)");
        Ok(added)
    }

    /// Record a model-flagged pattern. Returns whether it cleared the
    /// acceptance threshold.
    pub fn add_suspicious_pattern(&mut self, pattern: &str, confidence: f64) -> Result<bool, CompileError> {
        if !(0.0..=1.0).contains(&confidence) {
            return Err(CompileError::InvalidConfidence(confidence));
        }
        if confidence <= ACCEPT_CONFIDENCE {
            return Ok(false);
        }
        let category = self.keywords.classify(pattern);
        self.patterns.push(SuspiciousPattern {
            pattern: pattern.trim().to_string(),
            confidence,
            category,
        });
        Ok(true)
    }

    /// Load patterns from a `[{"pattern": ..., "confidence": ...}]` document.
    pub fn load_suspicious_patterns(&mut self, json: &str) -> Result<usize, CompileError> {
        let inputs: Vec<PatternInput> = serde_json::from_str(json)?;
        let mut accepted = 0;
        for input in inputs {
            if self.add_suspicious_pattern(&input.pattern, input.confidence)? {
                accepted += 1;
            }
        }
        log::debug!("accepted {accepted} suspicious pattern(s)");
        Ok(accepted)
    }

    pub fn build(self) -> PatternModel {
        PatternModel {
            keywords: self.keywords,
            trackers: self.trackers,
            patterns: self.patterns,
        }
    }
}

/// Immutable snapshot of trackers and accepted patterns.
#[derive(Debug, Clone)]
pub struct PatternModel {
    keywords: PatternKeywords,
    trackers: Vec<String>,
    patterns: Vec<SuspiciousPattern>,
}

impl PatternModel {
    /// Normalized known trackers in insertion order, without duplicates.
    pub fn known_trackers(&self) -> &[String] {
        &self.trackers
    }

    pub fn suspicious_patterns(&self) -> &[SuspiciousPattern] {
        &self.patterns
    }

    pub fn classify_pattern(&self, pattern: &str) -> PatternCategory {
        self.keywords.classify(pattern)
    }

    /// Whether a domain overlaps or resembles a known tracker.
    pub fn is_suspicious(&self, domain: &str, threshold: f64) -> bool {
        let domain = domain.to_lowercase();
        self.trackers.iter().any(|tracker| {
            let tracker = tracker.to_lowercase();
            tracker.contains(&domain)
                || domain.contains(&tracker)
                || similarity(&domain, &tracker) > threshold
        })
    }
}

/// Shared-character ratio: |chars(a) ∩ chars(b)| / |chars(a) ∪ chars(b)|.
///
/// This is not an edit distance. Anagrams score 1.0, and character order is
/// ignored entirely; thresholds downstream are tuned against exactly this.
pub fn similarity(a: &str, b: &str) -> f64 {
    let set_a: BTreeSet<char> = a.chars().collect();
    let set_b: BTreeSet<char> = b.chars().collect();
    let union = set_a.union(&set_b).count();
    if union == 0 {
        return 0.0;
    }
    let common = set_a.intersection(&set_b).count();
    common as f64 / union as f64
}
