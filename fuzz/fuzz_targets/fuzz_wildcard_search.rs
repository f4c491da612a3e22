#![no_main]
use libfuzzer_sys::fuzz_target;
use wildac::trace::NoTrace;
use wildac::WildcardMatcher;

fuzz_target!(|data: &[u8]| {
    // First byte is the wildcard, second picks the split between pattern and text
    if data.len() < 3 {
        return;
    }

    let wildcard = data[0];
    let rest = &data[2..];
    let split_point = (data[1] as usize).min(rest.len());
    let (pattern, text) = rest.split_at(split_point);

    // Empty and all-wildcard patterns must fail cleanly
    let Ok(matcher) = WildcardMatcher::compile(pattern, wildcard) else {
        return;
    };

    let report = matcher.search(text, &mut NoTrace);

    // Accepted positions are exactly the windows that match byte for byte
    let expected: Vec<usize> = if text.len() < pattern.len() {
        Vec::new()
    } else {
        (0..=text.len() - pattern.len())
            .filter(|&i| {
                pattern
                    .iter()
                    .zip(&text[i..])
                    .all(|(&p, &t)| p == wildcard || p == t)
            })
            .map(|i| i + 1)
            .collect()
    };
    assert_eq!(report.positions, expected);

    for &position in &report.positions {
        assert!(matcher.is_match_at(text, position - 1));
    }
});
