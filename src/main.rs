mod cli;
mod config;
mod error;

use std::env;
use std::process;

use anyhow::Result;

/// Help is handled by the caller rather than the resolver so that git args
/// forwarded after a literal `--` keep their meaning.
fn wants_help(tokens: &[String]) -> bool {
    tokens
        .iter()
        .take_while(|t| t.as_str() != "--")
        .any(|t| t == "-h" || t == "--help")
}

fn main() -> Result<()> {
    let tokens: Vec<String> = env::args().skip(1).collect();

    if wants_help(&tokens) {
        print!("{}", cli::usage());
        return Ok(());
    }

    let config = match cli::parse(&tokens) {
        Ok(config) => config,
        Err(err) => {
            eprint!("{}", cli::usage());
            eprintln!("git-webdiff: {err}");
            process::exit(2);
        }
    };

    // The server, renderer, and watcher subsystems consume this record; emit
    // it so the effective configuration is inspectable.
    println!("{}", serde_json::to_string_pretty(&config)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toks(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_wants_help() {
        assert!(wants_help(&toks(&["--help"])));
        assert!(wants_help(&toks(&["--port", "9000", "-h"])));
        assert!(!wants_help(&toks(&["--port", "9000"])));
        assert!(!wants_help(&toks(&["--", "--help"])));
    }
}
