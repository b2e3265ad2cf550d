//! Veil Tracker Corpus Compiler
//!
//! This crate compiles tracker-domain lists into the binary filter consumed by
//! the browser-side matcher, and turns known trackers plus model-flagged
//! patterns into blocking rules for Chrome and Firefox.

pub mod builder;
pub mod builtin;
pub mod error;
pub mod optimizer;
pub mod parser;
pub mod patterns;
pub mod synthesizer;

pub use builder::{build_filter, BuildOptions, BuildReport, BuiltFilter};
pub use error::CompileError;
pub use optimizer::dedupe_domains;
pub use parser::parse_domain_list;
pub use patterns::{PatternCategory, PatternKeywords, PatternModel, PatternModelBuilder, SuspiciousPattern};
pub use synthesizer::{export_rules, generate, BlockRule, Dialect, RuleSet, SecondaryRuleSet, DEFAULT_MAX_RULES};
