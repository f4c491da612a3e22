use anyhow::{Context, Result};
use serde_json::json;
use std::io::{self, Write};
use std::process::ExitCode;
use std::time::{Duration, Instant};
use wildac::fragment::parse_wildcard;
use wildac::validation::{validate_automaton, validate_matches, ValidationLevel, ValidationReport};
use wildac::{WildcardMatcher, WildcardPattern};

pub fn cmd_validate(
    pattern: String,
    wildcard: String,
    text: Option<String>,
    level_str: String,
    json_output: bool,
) -> Result<ExitCode> {
    // Parse validation level
    let level = match level_str.to_lowercase().as_str() {
        "standard" => ValidationLevel::Standard,
        "strict" => ValidationLevel::Strict,
        _ => {
            anyhow::bail!(
                "Invalid validation level: '{}'. Must be: standard or strict",
                level_str
            );
        }
    };

    let wildcard_byte = parse_wildcard(&wildcard)?;
    let parsed = WildcardPattern::new(&pattern, wildcard_byte)
        .with_context(|| format!("Cannot validate pattern '{}'", pattern))?;
    let matcher = WildcardMatcher::new(parsed)?;

    let start = Instant::now();
    let mut report = validate_automaton(matcher.automaton(), level);
    if let Some(text) = &text {
        merge(&mut report, validate_matches(matcher.automaton(), text.as_bytes()));
    }
    let duration = start.elapsed();

    if json_output {
        let output = json!({
            "pattern": pattern,
            "validation_level": level_str,
            "is_valid": report.is_valid(),
            "duration_ms": duration.as_millis(),
            "errors": report.errors,
            "warnings": report.warnings,
            "info": report.info,
            "stats": report.stats,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        write_text_report(&mut out, &pattern, &level_str, &report, duration)?;
        out.flush()?;
    }

    Ok(ExitCode::from(exit_status(&report)))
}

/// 0 when every invariant holds, 1 otherwise
fn exit_status(report: &ValidationReport) -> u8 {
    if report.is_valid() {
        0
    } else {
        1
    }
}

fn write_text_report(
    out: &mut impl Write,
    pattern: &str,
    level: &str,
    report: &ValidationReport,
    duration: Duration,
) -> io::Result<()> {
    writeln!(out, "Validating: {}", pattern)?;
    writeln!(out, "Level:      {}", level)?;
    writeln!(out)?;

    if !report.errors.is_empty() {
        writeln!(out, "ERRORS ({}):", report.errors.len())?;
        for error in &report.errors {
            writeln!(out, "  - {}", error)?;
        }
        writeln!(out)?;
    }

    if !report.warnings.is_empty() {
        writeln!(out, "WARNINGS ({}):", report.warnings.len())?;
        for warning in &report.warnings {
            writeln!(out, "  - {}", warning)?;
        }
        writeln!(out)?;
    }

    for info in &report.info {
        writeln!(out, "  {}", info)?;
    }
    writeln!(out, "  Validation time: {:.2}ms", duration.as_secs_f64() * 1000.0)?;
    writeln!(out)?;

    if report.is_valid() {
        writeln!(out, "VALIDATION PASSED")
    } else {
        writeln!(out, "VALIDATION FAILED ({} error(s))", report.errors.len())
    }
}

fn merge(report: &mut ValidationReport, other: ValidationReport) {
    report.errors.extend(other.errors);
    report.warnings.extend(other.warnings);
    report.info.extend(other.info);
}
