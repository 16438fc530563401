//! Output formatting for CLI

use std::path::{MAIN_SEPARATOR, Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;

use crate::pipeline::TrainingResult;

/// Print a section header
pub fn print_section(title: &str) {
    println!("\n{}", "=".repeat(60));
    println!("{title}");
    println!("{}", "=".repeat(60));
}

/// Print a subsection header
pub fn print_subsection(title: &str) {
    println!("\n{title}");
    println!("{}", "-".repeat(40));
}

/// Format a number with thousands separators
pub fn format_number(n: usize) -> String {
    let s = n.to_string();
    let mut result = String::new();
    for (i, c) in s.chars().rev().enumerate() {
        if i > 0 && i.is_multiple_of(3) {
            result.insert(0, ',');
        }
        result.insert(0, c);
    }
    result
}

/// Print a key-value pair
pub fn print_kv(key: &str, value: &str) {
    println!("  {:20} {}", format!("{}:", key), value);
}

/// Print the outcome counts and rates of a run
pub fn print_result(result: &TrainingResult) {
    let rate = |count: usize, fraction: f64| format!("{count} ({:.1}%)", fraction * 100.0);
    let timeout_rate = if result.total_episodes > 0 {
        result.timeouts as f64 / result.total_episodes as f64
    } else {
        0.0
    };

    print_kv("Episodes", &format_number(result.total_episodes));
    print_kv("Goals", &rate(result.goals, result.goal_rate));
    print_kv("Crashes", &rate(result.crashes, result.crash_rate));
    print_kv("Timeouts", &rate(result.timeouts, timeout_rate));
    print_kv("Mean return", &format!("{:.2}", result.mean_return));
    print_kv("Mean steps", &format!("{:.1}", result.mean_steps));
}

/// Normalize a summary target: directories get `summary.json`, other paths a
/// `.json` extension.
pub fn sanitize_summary_path(raw: &Path) -> PathBuf {
    let mut normalized = raw.to_path_buf();
    let raw_str = raw.as_os_str().to_string_lossy();

    if raw_str.ends_with(MAIN_SEPARATOR) || normalized.file_name().is_none() {
        normalized.push("summary.json");
        return normalized;
    }

    match normalized.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("json") => normalized,
        _ => {
            normalized.set_extension("json");
            normalized
        }
    }
}

/// Write a pretty-printed JSON summary, creating parent directories
pub fn write_summary<T: Serialize>(raw: &Path, summary: &T) -> Result<PathBuf> {
    let path = sanitize_summary_path(raw);
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    let file = std::fs::File::create(&path)
        .with_context(|| format!("failed to create summary file {}", path.display()))?;
    serde_json::to_writer_pretty(file, summary)
        .with_context(|| format!("failed to write summary file {}", path.display()))?;
    Ok(path)
}
