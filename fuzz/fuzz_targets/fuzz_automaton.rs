#![no_main]
use libfuzzer_sys::fuzz_target;
use wildac::automaton::Automaton;
use wildac::validation::{validate_automaton, validate_matches, ValidationLevel};

fuzz_target!(|data: &[u8]| {
    // Split input into NUL-separated patterns and a text
    if data.len() < 2 {
        return;
    }

    let split_point = (data[0] as usize).min(data.len() - 1);
    let pattern_data = &data[1..split_point.max(1)];
    let text = &data[split_point.max(1)..];

    let patterns: Vec<&[u8]> = pattern_data
        .split(|&b| b == 0)
        .filter(|p| !p.is_empty())
        .take(64)
        .collect();

    let Ok(ac) = Automaton::build(patterns.iter().copied()) else {
        return;
    };

    let report = validate_automaton(&ac, ValidationLevel::Strict);
    assert!(report.is_valid(), "{:?}", report.errors);

    let report = validate_matches(&ac, text);
    assert!(report.is_valid(), "{:?}", report.errors);
});
