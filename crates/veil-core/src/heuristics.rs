//! Hostname heuristics
//!
//! Two cheap checks that run before or beside filter lookups:
//!
//! - [`is_suspicious_subdomain`] picks the hosts worth resolving for CNAME
//!   cloaking.
//! - [`detect_dga`] flags subdomain labels that look algorithmically
//!   generated, by KL divergence from English letter frequencies.

use serde::Serialize;

use crate::domain::registered_domain;

/// English letter frequencies, `a` to `z`.
const ENGLISH_FREQ: [f64; 26] = [
    0.0817, 0.0150, 0.0278, 0.0425, 0.1270, 0.0223, 0.0202, 0.0609, 0.0697, 0.0015, 0.0077, 0.0403, 0.0241,
    0.0675, 0.0751, 0.0193, 0.0010, 0.0599, 0.0633, 0.0906, 0.0276, 0.0098, 0.0236, 0.0015, 0.0197, 0.0007,
];

/// Laplace smoothing added to every observed letter count.
const SMOOTHING: f64 = 0.001;

/// Labels longer than this count as long.
const LONG_LABEL: usize = 12;

const SUSPICIOUS_KEYWORDS: &[&str] = &[
    "metrics", "analytics", "track", "pixel", "tag", "beacon", "collect", "telemetry", "stat", "measure",
    "log", "data", "insight", "monitor", "report", "event", "click", "imp",
];

const BENIGN_LABELS: &[&str] = &[
    "www", "mail", "ftp", "api", "cdn", "img", "static", "assets", "ns1", "ns2",
];

/// Whether `host` is a subdomain worth checking for CNAME cloaking.
///
/// True when the subdomain part contains a tracking keyword, or when
/// `page_host` is given and has a different registered domain.
pub fn is_suspicious_subdomain(host: &str, page_host: Option<&str>) -> bool {
    let labels: Vec<&str> = host.split('.').collect();
    if labels.len() < 3 {
        return false;
    }

    let subdomain = labels[..labels.len() - 2].join(".").to_lowercase();
    if SUSPICIOUS_KEYWORDS.iter().any(|k| subdomain.contains(k)) {
        return true;
    }

    match page_host {
        Some(page) if !page.is_empty() => registered_domain(host) != registered_domain(page),
        _ => false,
    }
}

/// Subdomain labels of `host` that are DGA candidates, lower-cased.
///
/// Drops the last two labels and well-known service prefixes like `www`.
pub fn subdomain_labels(host: &str) -> Vec<String> {
    let lower = host.to_lowercase();
    let labels: Vec<&str> = lower.split('.').collect();
    if labels.len() < 3 {
        return Vec::new();
    }
    labels[..labels.len() - 2]
        .iter()
        .filter(|label| !label.is_empty() && !BENIGN_LABELS.contains(label))
        .map(|label| label.to_string())
        .collect()
}

/// Tuning for [`detect_dga`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DgaOptions {
    pub kl_threshold: f64,
    /// Shorter labels are never flagged.
    pub min_length: usize,
    /// Vowel share below this is suspicious.
    pub vowel_ratio_threshold: f64,
    /// Digit share above this is suspicious.
    pub digit_ratio_threshold: f64,
}

impl Default for DgaOptions {
    fn default() -> Self {
        Self {
            kl_threshold: 2.5,
            min_length: 6,
            vowel_ratio_threshold: 0.3,
            digit_ratio_threshold: 0.3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DgaReason {
    TooShort,
    NoChars,
    HighKlDivergence,
    LongSubdomain,
    LowVowelRatio,
    HighDigitRatio,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DgaVerdict {
    pub is_dga: bool,
    /// KL divergence in bits; 0 when the label was skipped.
    pub score: f64,
    pub reasons: Vec<DgaReason>,
}

impl DgaVerdict {
    fn skipped(reason: DgaReason) -> Self {
        Self {
            is_dga: false,
            score: 0.0,
            reasons: vec![reason],
        }
    }
}

/// Classify one subdomain label.
///
/// Flagged only when the KL divergence is over threshold and at least one of
/// length, vowel ratio or digit ratio is also off.
pub fn detect_dga(label: &str, options: &DgaOptions) -> DgaVerdict {
    let length = label.chars().count();
    if length == 0 || length < options.min_length {
        return DgaVerdict::skipped(DgaReason::TooShort);
    }

    let mut counts = [0u32; 26];
    let mut alpha = 0u32;
    let mut digits = 0u32;
    let mut vowels = 0u32;
    for c in label.chars().map(|c| c.to_ascii_lowercase()) {
        match c {
            'a'..='z' => {
                counts[(c as u8 - b'a') as usize] += 1;
                alpha += 1;
                if matches!(c, 'a' | 'e' | 'i' | 'o' | 'u') {
                    vowels += 1;
                }
            }
            '0'..='9' => digits += 1,
            _ => {}
        }
    }

    let total = alpha + digits;
    if total == 0 {
        return DgaVerdict::skipped(DgaReason::NoChars);
    }

    let score = kl_divergence(&counts, alpha);
    let mut reasons = Vec::new();

    let kl_flagged = score > options.kl_threshold;
    if kl_flagged {
        reasons.push(DgaReason::HighKlDivergence);
    }

    let long = length > LONG_LABEL;
    if long {
        reasons.push(DgaReason::LongSubdomain);
    }

    let vowel_ratio = if alpha > 0 { vowels as f64 / alpha as f64 } else { 0.0 };
    let low_vowels = alpha > 0 && vowel_ratio < options.vowel_ratio_threshold;
    if low_vowels {
        reasons.push(DgaReason::LowVowelRatio);
    }

    let many_digits = digits as f64 / total as f64 > options.digit_ratio_threshold;
    if many_digits {
        reasons.push(DgaReason::HighDigitRatio);
    }

    DgaVerdict {
        is_dga: kl_flagged && (long || low_vowels || many_digits),
        score,
        reasons,
    }
}

/// Whether any candidate subdomain label of `host` looks generated.
pub fn has_dga_subdomain(host: &str, options: &DgaOptions) -> bool {
    subdomain_labels(host)
        .iter()
        .any(|label| detect_dga(label, options).is_dga)
}

fn kl_divergence(counts: &[u32; 26], alpha: u32) -> f64 {
    if alpha == 0 {
        return 0.0;
    }
    let denom = alpha as f64 + SMOOTHING * 26.0;
    counts
        .iter()
        .zip(ENGLISH_FREQ.iter())
        .map(|(&count, &q)| {
            let p = (count as f64 + SMOOTHING) / denom;
            p * (p / q).log2()
        })
        .sum()
}
