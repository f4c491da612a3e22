mod cli_utils;
mod commands;

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use commands::{cmd_inspect, cmd_search, cmd_validate, SearchArgs};

#[derive(Parser)]
#[command(name = "wildac")]
#[command(
    about = "Find every occurrence of a wildcard pattern in a text",
    long_about = "wildac - Wildcard pattern search using an Aho-Corasick fragment automaton\n\n\
    Splits the pattern into its literal fragments, finds them all in a single pass over \n\
    the text, and reports the 1-based positions where every fragment lines up.\n\n\
    Input is three whitespace-separated tokens: TEXT PATTERN WILDCARD. They are read from \n\
    the command line, from --input, or from stdin. File and stdin input is \n\
    treated as raw bytes split on ASCII whitespace, so it need not be UTF-8.\n\n\
    Examples:\n\
      echo 'ababc a?a ?' | wildac\n\
      wildac search ACGTTACAAT 'AC??T' '?'\n\
      wildac search --input case.txt --format json\n\
      wildac search ababc 'a?a' '?' --trace --dump\n\
      wildac inspect 'he?she' '?'\n\
      wildac validate 'ab?b?ab' '?' --text abababab"
)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Increase log verbosity on stderr (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Search a text for a wildcard pattern (default when no command is given)
    Search {
        /// TEXT PATTERN WILDCARD (read from --input or stdin when omitted)
        #[arg(value_name = "TOKEN", num_args = 0..=3)]
        tokens: Vec<String>,

        /// Read the three tokens from a file instead of stdin
        #[arg(short, long, value_name = "FILE", conflicts_with = "tokens")]
        input: Option<PathBuf>,

        /// Output format: text (default, one position per line) or json
        #[arg(long, default_value = "text")]
        format: String,

        /// Quiet mode - no output, only exit code (0 = found, 1 = not found)
        #[arg(short, long)]
        quiet: bool,

        /// Print the step-by-step matching trace to stderr
        #[arg(long)]
        trace: bool,

        /// Print the automaton structure to stderr before searching
        #[arg(long)]
        dump: bool,
    },

    /// Show the fragments and automaton built for a pattern
    Inspect {
        /// Wildcard pattern
        #[arg(value_name = "PATTERN")]
        pattern: String,

        /// Wildcard byte
        #[arg(value_name = "WILDCARD")]
        wildcard: String,

        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Check the automaton invariants for a pattern
    Validate {
        /// Wildcard pattern
        #[arg(value_name = "PATTERN")]
        pattern: String,

        /// Wildcard byte
        #[arg(value_name = "WILDCARD")]
        wildcard: String,

        /// Also cross-check fragment hits in this text against substring search
        #[arg(long, value_name = "TEXT")]
        text: Option<String>,

        /// Validation level: standard or strict (default)
        #[arg(short, long, default_value = "strict")]
        level: String,

        /// Output results as JSON
        #[arg(short, long)]
        json: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    cli_utils::init_logging(cli.verbose);

    let result = match cli.command {
        None => cmd_search(SearchArgs::default()),
        Some(Commands::Search {
            tokens,
            input,
            format,
            quiet,
            trace,
            dump,
        }) => cmd_search(SearchArgs {
            tokens,
            input,
            format,
            quiet,
            trace,
            dump,
        }),
        Some(Commands::Inspect {
            pattern,
            wildcard,
            json,
        }) => cmd_inspect(pattern, wildcard, json),
        Some(Commands::Validate {
            pattern,
            wildcard,
            text,
            level,
            json,
        }) => cmd_validate(pattern, wildcard, text, level, json),
    };

    match result {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {:#}", err);
            ExitCode::from(2)
        }
    }
}
