use anyhow::{bail, Context, Result};
use serde_json::json;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use wildac::fragment::parse_wildcard;
use wildac::trace::{LogTrace, NoTrace, WriteTrace};
use wildac::{SearchReport, WildcardMatcher, WildcardPattern};

use crate::cli_utils::read_input;

/// Options for the search command
pub struct SearchArgs {
    pub tokens: Vec<String>,
    pub input: Option<PathBuf>,
    pub format: String,
    pub quiet: bool,
    pub trace: bool,
    pub dump: bool,
}

impl Default for SearchArgs {
    fn default() -> Self {
        Self {
            tokens: Vec::new(),
            input: None,
            format: "text".to_string(),
            quiet: false,
            trace: false,
            dump: false,
        }
    }
}

enum OutputFormat {
    Text,
    Json,
}

pub fn cmd_search(args: SearchArgs) -> Result<ExitCode> {
    let format = match args.format.to_lowercase().as_str() {
        "text" => OutputFormat::Text,
        "json" => OutputFormat::Json,
        _ => bail!(
            "Invalid output format: '{}'. Must be: text or json",
            args.format
        ),
    };

    let input = read_input(args.tokens, args.input.as_deref())?;
    let wildcard = parse_wildcard(&input.wildcard)?;
    let pattern = WildcardPattern::new(&input.pattern, wildcard).with_context(|| {
        format!("Cannot search for pattern '{}'", input.pattern.escape_ascii())
    })?;
    let matcher = WildcardMatcher::new(pattern)?;

    if args.dump {
        eprintln!("{}", matcher.automaton().dump());
    }

    let text = input.text.as_slice();
    let report = if args.trace {
        let mut sink = WriteTrace::new(io::stderr().lock());
        let report = matcher.search(text, &mut sink);
        sink.finish().context("Failed to write trace")?;
        report
    } else if log::log_enabled!(log::Level::Debug) {
        matcher.search(text, &mut LogTrace)
    } else {
        matcher.search(text, &mut NoTrace)
    };

    let found = !report.is_empty();
    if args.quiet {
        return Ok(if found { ExitCode::SUCCESS } else { ExitCode::from(1) });
    }

    match format {
        OutputFormat::Text => write_text(&report)?,
        OutputFormat::Json => {
            let fragments: Vec<_> = matcher
                .pattern()
                .fragments()
                .iter()
                .map(|f| {
                    json!({
                        "text": String::from_utf8_lossy(f.text()),
                        "offset": f.offset(),
                    })
                })
                .collect();
            let output = json!({
                "text_len": text.len(),
                "pattern": String::from_utf8_lossy(&input.pattern),
                "wildcard": String::from_utf8_lossy(&input.wildcard),
                "fragments": fragments,
                "match_count": report.positions.len(),
                "positions": report.positions,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    Ok(ExitCode::SUCCESS)
}

/// One position per line, or `no matches`
fn write_text(report: &SearchReport) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    if report.positions.is_empty() {
        writeln!(out, "no matches")?;
    } else {
        for position in &report.positions {
            writeln!(out, "{}", position)?;
        }
    }
    out.flush()?;
    Ok(())
}
