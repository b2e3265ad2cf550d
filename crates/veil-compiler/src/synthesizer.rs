//! Blocking rule synthesis
//!
//! Two target dialects:
//!
//! - **Primary** (Chrome declarativeNetRequest): numbered, prioritized rules.
//!   Known trackers get at most half the budget at priority 1, so exact
//!   domains are never crowded out by heuristic pattern rules (priority 2 for
//!   analytics/advertising, 3 otherwise), which fill the rest.
//! - **Secondary** (Firefox webRequest): one flat list of URL patterns with no
//!   ids or priorities, capped at the same budget.

use std::str::FromStr;

use serde::Serialize;
use veil_core::ResourceTypes;

use crate::error::CompileError;
use crate::patterns::{PatternCategory, PatternModel};

/// Default rule budget.
pub const DEFAULT_MAX_RULES: usize = 5000;

/// Target rule engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    Primary,
    Secondary,
}

impl FromStr for Dialect {
    type Err = CompileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "chrome" | "primary" => Ok(Self::Primary),
            "firefox" | "secondary" => Ok(Self::Secondary),
            _ => Err(CompileError::UnknownDialect(s.to_string())),
        }
    }
}

// =============================================================================
// Primary dialect
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum RuleAction {
    Block,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleCondition {
    pub url_filter: String,
    pub resource_types: ResourceTypes,
}

/// One declarativeNetRequest rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BlockRule {
    pub id: u32,
    pub priority: u8,
    pub action: RuleAction,
    pub condition: RuleCondition,
}

// =============================================================================
// Secondary dialect
// =============================================================================

/// webRequest listener filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SecondaryRuleSet {
    pub patterns: Vec<String>,
    pub types: ResourceTypes,
}

/// Output of a generation run in either dialect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum RuleSet {
    Primary(Vec<BlockRule>),
    Secondary(SecondaryRuleSet),
}

impl RuleSet {
    /// Number of rules (primary) or patterns (secondary).
    pub fn len(&self) -> usize {
        match self {
            Self::Primary(rules) => rules.len(),
            Self::Secondary(set) => set.patterns.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// =============================================================================
// Generation
// =============================================================================

/// Convert a domain or URL fragment into a URL filter.
pub fn to_url_filter(pattern: &str) -> String {
    if has_scheme_prefix(pattern) {
        pattern.to_string()
    } else if pattern.contains('.') && !pattern.contains('/') {
        format!("*://{pattern}/*")
    } else {
        format!("*{pattern}*")
    }
}

fn has_scheme_prefix(pattern: &str) -> bool {
    match pattern.find("://") {
        Some(idx) if idx > 0 => pattern[..idx]
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.' | '*')),
        _ => false,
    }
}

fn pattern_priority(category: PatternCategory) -> u8 {
    match category {
        PatternCategory::Analytics | PatternCategory::Advertising => 2,
        _ => 3,
    }
}

/// Generate rules in the given dialect, never more than `max_rules`.
pub fn generate(model: &PatternModel, dialect: Dialect, max_rules: usize) -> RuleSet {
    match dialect {
        Dialect::Primary => RuleSet::Primary(generate_primary(model, max_rules)),
        Dialect::Secondary => RuleSet::Secondary(generate_secondary(model, max_rules)),
    }
}

/// Prioritized, numbered rules. Ids start at 1 and increase by one.
pub fn generate_primary(model: &PatternModel, max_rules: usize) -> Vec<BlockRule> {
    let mut rules: Vec<BlockRule> = Vec::with_capacity(max_rules.min(
        model.known_trackers().len() + model.suspicious_patterns().len(),
    ));

    for domain in model.known_trackers().iter().take(max_rules / 2) {
        let id = rules.len() as u32 + 1;
        rules.push(BlockRule {
            id,
            priority: 1,
            action: RuleAction::Block,
            condition: RuleCondition {
                url_filter: format!("*://{domain}/*"),
                resource_types: ResourceTypes::TRACKER_DEFAULT,
            },
        });
    }
    let tracker_rules = rules.len();

    for item in model.suspicious_patterns() {
        if rules.len() >= max_rules {
            break;
        }
        let id = rules.len() as u32 + 1;
        rules.push(BlockRule {
            id,
            priority: pattern_priority(item.category),
            action: RuleAction::Block,
            condition: RuleCondition {
                url_filter: to_url_filter(&item.pattern),
                resource_types: ResourceTypes::PATTERN_DEFAULT,
            },
        });
    }

    log::info!(
        "generated {} chrome rules ({} tracker, {} pattern)",
        rules.len(),
        tracker_rules,
        rules.len() - tracker_rules
    );
    rules
}

/// Flat pattern list: trackers first, then suspicious patterns.
pub fn generate_secondary(model: &PatternModel, max_rules: usize) -> SecondaryRuleSet {
    let available = model.known_trackers().len() + model.suspicious_patterns().len();

    let patterns: Vec<String> = model
        .known_trackers()
        .iter()
        .map(|domain| format!("*://{domain}/*"))
        .chain(
            model
                .suspicious_patterns()
                .iter()
                .map(|item| to_url_filter(&item.pattern)),
        )
        .take(max_rules)
        .collect();

    if patterns.len() < available {
        log::warn!(
            "firefox pattern list truncated to {} of {} entries",
            patterns.len(),
            available
        );
    }

    SecondaryRuleSet {
        patterns,
        types: ResourceTypes::TRACKER_DEFAULT,
    }
}

/// Render rules as pretty JSON, ready to be written in one go.
pub fn export_rules(model: &PatternModel, dialect: Dialect, max_rules: usize) -> Result<String, CompileError> {
    let rules = generate(model, dialect, max_rules);
    Ok(serde_json::to_string_pretty(&rules)?)
}
