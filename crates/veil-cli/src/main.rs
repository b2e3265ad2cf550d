//! Veil CLI
//!
//! Builds tracker filters, generates blocking rules, and classifies cookies.

use std::fs;
use std::io::Write;
use std::time::Instant;

use clap::{Parser, Subcommand};

use veil_compiler::builtin::builtin_domains;
use veil_compiler::{build_filter, export_rules, parse_domain_list, BuildOptions, Dialect, PatternModelBuilder};
use veil_core::classify::parse_batch;
use veil_core::params::DEFAULT_FP_RATE;
use veil_core::{decode, CookieClassifier, CookieDescriptor};

#[derive(Parser)]
#[command(name = "veil-cli")]
#[command(about = "Veil tracker filter compiler and tools")]
struct Cli {
    /// Debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the tracker Bloom filter
    Build {
        /// Tracker domain list (one per line); the built-in corpus if omitted
        #[arg(short, long)]
        input: Option<String>,

        /// Output filter file
        #[arg(short, long, default_value = "tracker_bloom.bin")]
        output: String,

        /// Target false positive rate
        #[arg(long, default_value_t = DEFAULT_FP_RATE)]
        fp_rate: f64,

        /// Explicit filter size in bits
        #[arg(long)]
        size_bits: Option<u32>,

        /// Explicit hash function count
        #[arg(long)]
        hashes: Option<u32>,
    },

    /// Dump filter file info
    Info {
        /// Filter file to inspect
        #[arg(short, long)]
        input: String,
    },

    /// Generate blocking rules from known trackers and model patterns
    Rules {
        /// `{"domains": [...]}` file of known trackers
        #[arg(short, long)]
        trackers: String,

        /// `[{"pattern": ..., "confidence": ...}]` file of model output
        #[arg(short, long)]
        patterns: Option<String>,

        /// Rule dialect: chrome or firefox
        #[arg(short, long, default_value = "chrome")]
        dialect: String,

        /// Rule budget
        #[arg(long, default_value_t = veil_compiler::DEFAULT_MAX_RULES)]
        max_rules: usize,

        /// Output rules file
        #[arg(short, long)]
        output: String,
    },

    /// Classify cookies from a JSON file
    Classify {
        /// A cookie object, an array, or `{"cookies": [...]}`
        #[arg(short, long)]
        input: String,
    },
}

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level)).init();

    let result = match cli.command {
        Commands::Build {
            input,
            output,
            fp_rate,
            size_bits,
            hashes,
        } => cmd_build(input.as_deref(), &output, fp_rate, size_bits, hashes),
        Commands::Info { input } => cmd_info(&input),
        Commands::Rules {
            trackers,
            patterns,
            dialect,
            max_rules,
            output,
        } => cmd_rules(&trackers, patterns.as_deref(), &dialect, max_rules, &output),
        Commands::Classify { input } => cmd_classify(&input),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn write_file(path: &str, bytes: &[u8]) -> Result<(), String> {
    let mut file = fs::File::create(path).map_err(|e| format!("Failed to create '{}': {}", path, e))?;
    file.write_all(bytes)
        .map_err(|e| format!("Failed to write '{}': {}", path, e))
}

fn cmd_build(
    input: Option<&str>,
    output: &str,
    fp_rate: f64,
    size_bits: Option<u32>,
    hashes: Option<u32>,
) -> Result<(), String> {
    let start = Instant::now();

    let domains = match input {
        Some(path) => {
            let content = fs::read_to_string(path).map_err(|e| format!("Failed to read '{}': {}", path, e))?;
            parse_domain_list(&content)
        }
        None => {
            log::info!("no input given, using built-in tracker corpus");
            builtin_domains()
        }
    };

    let options = BuildOptions {
        fp_rate,
        size_bits,
        num_hashes: hashes,
        ..Default::default()
    };
    let built = build_filter(domains, &options).map_err(|e| format!("Build failed: {}", e))?;
    let bytes = built.to_bytes();

    decode(&bytes).map_err(|e| format!("Generated filter failed validation: {}", e))?;
    write_file(output, &bytes)?;

    let report = &built.report;
    println!("Built tracker filter '{}'", output);
    println!(
        "  Domains:   {} -> {} (dedupe removed {})",
        report.input_domains,
        report.unique_domains,
        report.input_domains - report.unique_domains
    );
    println!("  Bits:      {} (k={})", report.size_bits, report.num_hashes);
    println!("  Size:      {} bytes", report.encoded_bytes);
    println!("  Fill:      {:.1}%", report.fill_ratio * 100.0);
    println!("  FP rate:   {:.6} expected", report.expected_fp_rate);
    if let Some(observed) = report.observed_fp_rate {
        println!("             {:.6} observed", observed);
    }
    println!("  Time:      {:.1}ms", start.elapsed().as_secs_f64() * 1000.0);

    Ok(())
}

fn cmd_info(input: &str) -> Result<(), String> {
    let bytes = fs::read(input).map_err(|e| format!("Failed to read '{}': {}", input, e))?;
    let filter = decode(&bytes).map_err(|e| format!("Invalid filter: {}", e))?;

    println!("Filter: {}", input);
    println!("  Size bits:   {}", filter.size_bits());
    println!("  Hashes:      {}", filter.num_hashes());
    println!("  Bit array:   {} bytes", filter.bits().len());
    println!("  Total size:  {} bytes", bytes.len());
    println!("  Set bits:    {} ({:.1}%)", filter.count_ones(), filter.fill_ratio() * 100.0);

    Ok(())
}

fn cmd_rules(
    trackers: &str,
    patterns: Option<&str>,
    dialect: &str,
    max_rules: usize,
    output: &str,
) -> Result<(), String> {
    let dialect: Dialect = dialect.parse().map_err(|e| format!("{}", e))?;

    let mut builder = PatternModelBuilder::default();
    let content = fs::read_to_string(trackers).map_err(|e| format!("Failed to read '{}': {}", trackers, e))?;
    builder
        .load_known_trackers(&content)
        .map_err(|e| format!("Invalid tracker file '{}': {}", trackers, e))?;

    if let Some(path) = patterns {
        let content = fs::read_to_string(path).map_err(|e| format!("Failed to read '{}': {}", path, e))?;
        builder
            .load_suspicious_patterns(&content)
            .map_err(|e| format!("Invalid pattern file '{}': {}", path, e))?;
    }

    let model = builder.build();
    let json = export_rules(&model, dialect, max_rules).map_err(|e| format!("Rule generation failed: {}", e))?;
    write_file(output, json.as_bytes())?;

    println!("Generated {:?} rules to '{}'", dialect, output);
    println!("  Known trackers:   {}", model.known_trackers().len());
    println!("  Patterns:         {}", model.suspicious_patterns().len());

    Ok(())
}

fn cmd_classify(input: &str) -> Result<(), String> {
    let content = fs::read_to_string(input).map_err(|e| format!("Failed to read '{}': {}", input, e))?;
    let value: serde_json::Value = serde_json::from_str(&content).map_err(|e| format!("Invalid JSON: {}", e))?;
    let classifier = CookieClassifier::default();

    let json = if value.is_array() || value.get("cookies").is_some() {
        let cookies = parse_batch(&content).map_err(|e| format!("Invalid cookie batch: {}", e))?;
        let report = classifier.classify_batch(&cookies).map_err(|e| e.to_string())?;
        serde_json::to_string_pretty(&report)
    } else {
        let cookie = CookieDescriptor::from_json(&content).map_err(|e| format!("Invalid cookie: {}", e))?;
        serde_json::to_string_pretty(&classifier.report(&cookie))
    }
    .map_err(|e| e.to_string())?;

    println!("{json}");
    Ok(())
}
