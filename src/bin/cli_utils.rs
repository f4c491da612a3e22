use anyhow::{bail, Context, Result};
use std::fs;
use std::io::{self, Read};
use std::path::Path;

/// The three input tokens of a search, as raw bytes
#[derive(Debug)]
pub struct SearchInput {
    pub text: Vec<u8>,
    pub pattern: Vec<u8>,
    pub wildcard: Vec<u8>,
}

/// Initialise stderr logging; `verbose` is the number of `-v` flags
pub fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .format_timestamp_millis()
        .init();
    log::debug!("logging initialized");
}

/// Resolve the search tokens from the command line, a file, or stdin
pub fn read_input(tokens: Vec<String>, input: Option<&Path>) -> Result<SearchInput> {
    if !tokens.is_empty() {
        let count = tokens.len();
        let Ok([text, pattern, wildcard]) = <[String; 3]>::try_from(tokens) else {
            bail!(
                "expected 3 tokens (TEXT PATTERN WILDCARD), got {}",
                count
            );
        };
        return Ok(SearchInput {
            text: text.into_bytes(),
            pattern: pattern.into_bytes(),
            wildcard: wildcard.into_bytes(),
        });
    }

    let source = match input {
        Some(path) => fs::read(path)
            .with_context(|| format!("Failed to read input: {}", path.display()))?,
        None => {
            let mut buf = Vec::new();
            io::stdin()
                .read_to_end(&mut buf)
                .context("Failed to read stdin")?;
            buf
        }
    };

    parse_tokens(&source)
}

/// Split `source` on ASCII whitespace into TEXT PATTERN WILDCARD; trailing
/// tokens are ignored. Tokens need not be valid UTF-8.
pub fn parse_tokens(source: &[u8]) -> Result<SearchInput> {
    let mut words = source
        .split(|b| b.is_ascii_whitespace())
        .filter(|word| !word.is_empty());
    let (Some(text), Some(pattern), Some(wildcard)) = (words.next(), words.next(), words.next())
    else {
        bail!("expected 3 whitespace-separated tokens: TEXT PATTERN WILDCARD");
    };

    let extra = words.count();
    if extra > 0 {
        log::warn!("ignoring {} extra input token(s)", extra);
    }

    Ok(SearchInput {
        text: text.to_vec(),
        pattern: pattern.to_vec(),
        wildcard: wildcard.to_vec(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tokens() {
        let input = parse_tokens(b"  ababc\ta?a\n?\n").unwrap();
        assert_eq!(input.text, b"ababc");
        assert_eq!(input.pattern, b"a?a");
        assert_eq!(input.wildcard, b"?");
    }

    #[test]
    fn test_parse_tokens_non_utf8() {
        let input = parse_tokens(b"\xff\xfeab \xff? ?").unwrap();
        assert_eq!(input.text, b"\xff\xfeab");
        assert_eq!(input.pattern, b"\xff?");
    }

    #[test]
    fn test_parse_tokens_too_few() {
        let err = parse_tokens(b"abc a?c").unwrap_err();
        assert!(err.to_string().contains("expected 3 whitespace-separated tokens"));
    }

    #[test]
    fn test_positional_token_count() {
        let err = read_input(vec!["abc".to_string()], None).unwrap_err();
        assert!(err.to_string().contains("got 1"));
    }
}
