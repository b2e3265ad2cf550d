//! Cookie classification and privacy risk scoring
//!
//! Cookies arrive from the extension as loose JSON. They are validated once
//! into a [`CookieDescriptor`] and then classified by keyword against a
//! [`CategoryTable`], an explicit value so alternate tables can be swapped in.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::types::CookieCategory;

const KEYWORD_CONFIDENCE: f64 = 0.85;
const DEFAULT_CONFIDENCE: f64 = 0.5;
const DEFAULT_DESCRIPTION: &str = "Default classification";

pub const METHOD_RULE_BASED: &str = "rule-based";
pub const METHOD_RULE_BASED_DEFAULT: &str = "rule-based-default";

// =============================================================================
// Cookie Descriptor
// =============================================================================

/// Cookie as received on the wire. Every field is optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawCookie {
    pub name: Option<String>,
    pub domain: Option<String>,
    pub path: Option<String>,
    pub http_only: Option<bool>,
    pub secure: Option<bool>,
    pub same_site: Option<String>,
    pub session: Option<bool>,
}

/// SameSite attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SameSite {
    Strict,
    Lax,
    None,
    #[default]
    Unspecified,
}

impl SameSite {
    fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "strict" => Some(Self::Strict),
            "lax" => Some(Self::Lax),
            "none" | "no_restriction" => Some(Self::None),
            "unspecified" | "" => Some(Self::Unspecified),
            _ => None,
        }
    }
}

/// Validated cookie.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CookieDescriptor {
    pub name: String,
    pub domain: String,
    pub path: String,
    pub http_only: bool,
    pub secure: bool,
    pub same_site: SameSite,
    pub session: bool,
}

impl CookieDescriptor {
    /// Descriptor with only a name and domain set.
    pub fn new(name: impl Into<String>, domain: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            domain: domain.into(),
            path: "/".to_string(),
            http_only: false,
            secure: false,
            same_site: SameSite::Unspecified,
            session: false,
        }
    }

    /// Parse and validate a single cookie from JSON.
    pub fn from_json(json: &str) -> Result<Self, ValidationError> {
        let raw: RawCookie = serde_json::from_str(json)?;
        Self::try_from(raw)
    }

    /// The leading-dot domain form marks a cookie shared across subdomains,
    /// which the extension treats as third-party.
    pub fn is_third_party(&self) -> bool {
        self.domain.starts_with('.')
    }
}

impl TryFrom<RawCookie> for CookieDescriptor {
    type Error = ValidationError;

    fn try_from(raw: RawCookie) -> Result<Self, Self::Error> {
        let name = raw
            .name
            .filter(|n| !n.is_empty())
            .ok_or(ValidationError::MissingField("name"))?;

        let same_site = match raw.same_site {
            Some(value) => SameSite::parse(&value).ok_or(ValidationError::InvalidField {
                field: "sameSite",
                value,
            })?,
            None => SameSite::Unspecified,
        };

        Ok(Self {
            name,
            domain: raw.domain.unwrap_or_default(),
            path: raw.path.unwrap_or_default(),
            http_only: raw.http_only.unwrap_or(false),
            secure: raw.secure.unwrap_or(false),
            same_site,
            session: raw.session.unwrap_or(false),
        })
    }
}

// =============================================================================
// Category Table
// =============================================================================

/// Keywords, description and base risk for one category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryRule {
    pub category: CookieCategory,
    pub keywords: Vec<String>,
    pub description: String,
    pub base_risk: i32,
}

/// Ordered category rules. The first keyword hit wins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryTable {
    pub rules: Vec<CategoryRule>,
}

impl CategoryTable {
    pub fn rule(&self, category: CookieCategory) -> Option<&CategoryRule> {
        self.rules.iter().find(|r| r.category == category)
    }

    /// Base risk for a category; 50 for categories the table does not list.
    pub fn base_risk(&self, category: CookieCategory) -> i32 {
        self.rule(category).map(|r| r.base_risk).unwrap_or(50)
    }
}

fn category_rule(
    category: CookieCategory,
    keywords: &[&str],
    description: &str,
    base_risk: i32,
) -> CategoryRule {
    CategoryRule {
        category,
        keywords: keywords.iter().map(|k| k.to_string()).collect(),
        description: description.to_string(),
        base_risk,
    }
}

impl Default for CategoryTable {
    fn default() -> Self {
        use CookieCategory::*;
        Self {
            rules: vec![
                category_rule(
                    Necessary,
                    &["session", "csrf", "auth", "login", "security", "consent"],
                    "Essential for website functionality",
                    10,
                ),
                category_rule(
                    Analytics,
                    &["analytics", "ga", "_gid", "_gat", "utm", "tracking", "stats"],
                    "Used for analyzing user behavior",
                    60,
                ),
                category_rule(
                    Advertising,
                    &["ads", "doubleclick", "facebook", "fb", "advert", "marketing", "pixel"],
                    "Used for targeted advertising",
                    80,
                ),
                category_rule(
                    Functional,
                    &["pref", "lang", "currency", "theme", "settings"],
                    "Enhances user experience",
                    20,
                ),
                category_rule(
                    SocialMedia,
                    &["twitter", "linkedin", "instagram", "social", "share"],
                    "Social media integration",
                    70,
                ),
                category_rule(
                    Performance,
                    &["performance", "speed", "load", "cache"],
                    "Website performance optimization",
                    30,
                ),
            ],
        }
    }
}

// =============================================================================
// Classifier
// =============================================================================

/// Result of classifying a single cookie.
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub category: CookieCategory,
    pub confidence: f64,
    pub description: String,
    pub method: &'static str,
}

/// Record returned to the extension for one cookie.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CookieReport {
    pub cookie_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    pub category: CookieCategory,
    pub confidence: f64,
    pub description: String,
    pub risk_score: u8,
    pub classification_method: &'static str,
}

/// Aggregate statistics over a batch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchStatistics {
    pub total_cookies: usize,
    pub by_category: BTreeMap<CookieCategory, usize>,
    pub average_risk_score: f64,
}

/// Batch response.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchReport {
    pub results: Vec<CookieReport>,
    pub statistics: BatchStatistics,
}

/// Keyword-based cookie classifier.
#[derive(Debug, Clone, Default)]
pub struct CookieClassifier {
    table: CategoryTable,
}

impl CookieClassifier {
    pub fn new(table: CategoryTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &CategoryTable {
        &self.table
    }

    /// Classify a cookie by its name and domain.
    pub fn classify(&self, cookie: &CookieDescriptor) -> Classification {
        let name = cookie.name.to_lowercase();
        let domain = cookie.domain.to_lowercase();

        for rule in &self.table.rules {
            let hit = rule
                .keywords
                .iter()
                .any(|k| name.contains(k.as_str()) || domain.contains(k.as_str()));
            if hit {
                return Classification {
                    category: rule.category,
                    confidence: KEYWORD_CONFIDENCE,
                    description: rule.description.clone(),
                    method: METHOD_RULE_BASED,
                };
            }
        }

        Classification {
            category: CookieCategory::Functional,
            confidence: DEFAULT_CONFIDENCE,
            description: DEFAULT_DESCRIPTION.to_string(),
            method: METHOD_RULE_BASED_DEFAULT,
        }
    }

    /// Privacy risk in [0, 100].
    pub fn risk_score(&self, cookie: &CookieDescriptor, category: CookieCategory) -> u8 {
        let mut risk = self.table.base_risk(category);

        if cookie.http_only {
            risk -= 10;
        }
        if cookie.secure {
            risk -= 10;
        }
        if matches!(cookie.same_site, SameSite::Strict | SameSite::Lax) {
            risk -= 5;
        }
        if cookie.is_third_party() {
            risk += 15;
        }
        if cookie.session {
            risk -= 5;
        }

        risk.clamp(0, 100) as u8
    }

    /// Classify and score one cookie.
    pub fn report(&self, cookie: &CookieDescriptor) -> CookieReport {
        let classification = self.classify(cookie);
        let risk_score = self.risk_score(cookie, classification.category);
        log::debug!(
            "classified cookie '{}' as '{}'",
            cookie.name,
            classification.category
        );
        CookieReport {
            cookie_name: cookie.name.clone(),
            domain: None,
            category: classification.category,
            confidence: classification.confidence,
            description: classification.description,
            risk_score,
            classification_method: classification.method,
        }
    }

    /// Classify a batch and aggregate statistics.
    pub fn classify_batch(&self, cookies: &[CookieDescriptor]) -> Result<BatchReport, ValidationError> {
        if cookies.is_empty() {
            return Err(ValidationError::EmptyBatch);
        }

        let mut results = Vec::with_capacity(cookies.len());
        let mut by_category = BTreeMap::new();
        let mut risk_total = 0u64;

        for cookie in cookies {
            let mut report = self.report(cookie);
            report.domain = Some(cookie.domain.clone());
            *by_category.entry(report.category).or_insert(0) += 1;
            risk_total += report.risk_score as u64;
            results.push(report);
        }

        let statistics = BatchStatistics {
            total_cookies: results.len(),
            by_category,
            average_risk_score: risk_total as f64 / results.len() as f64,
        };
        log::info!("batch classified {} cookies", results.len());

        Ok(BatchReport {
            results,
            statistics,
        })
    }

    /// Category name to description, in table order.
    pub fn categories(&self) -> Vec<(CookieCategory, &str)> {
        self.table
            .rules
            .iter()
            .map(|r| (r.category, r.description.as_str()))
            .collect()
    }
}

/// Parse a batch body: either `{"cookies": [...]}` or a bare array.
pub fn parse_batch(json: &str) -> Result<Vec<CookieDescriptor>, ValidationError> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Body {
        Wrapped { cookies: Vec<RawCookie> },
        Bare(Vec<RawCookie>),
    }

    let raw = match serde_json::from_str(json)? {
        Body::Wrapped { cookies } => cookies,
        Body::Bare(cookies) => cookies,
    };
    raw.into_iter().map(CookieDescriptor::try_from).collect()
}
