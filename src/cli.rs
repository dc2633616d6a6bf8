use std::collections::HashMap;

use crate::config::{ResolvedConfig, DIFF_ALGORITHM_NAMES};
use crate::error::UsageError;

pub const USAGE: &str = "\
Usage: git-webdiff [options] [git_args ...]

Web-based git difftool for viewing diffs in your browser.

Examples:
  git-webdiff                    # Compare working directory with HEAD
  git-webdiff HEAD~3..HEAD       # Compare specific commits
  git-webdiff --cached           # Compare staged changes
  git-webdiff --theme monokai    # Use custom theme
";

/// Value type of a declared option.
#[derive(Debug, Clone, Copy)]
pub enum OptionKind {
    Str,
    Int,
    /// Presence flag; consumes no value token.
    Flag,
    /// String restricted to a fixed set of names.
    Choice(&'static [&'static str]),
}

/// A typed option value. `Unset` marks options whose absence is meaningful
/// (`--diff-algorithm`, `--git-repo`) rather than defaultable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Str(String),
    Int(i32),
    Flag(bool),
    Unset,
}

/// One declared command-line option.
#[derive(Debug)]
pub struct OptionSpec {
    /// Long name, without the leading dashes.
    pub name: &'static str,
    /// Single-dash alias, e.g. `-p`.
    pub short: Option<&'static str>,
    pub kind: OptionKind,
    pub default: Value,
    pub help: &'static str,
}

/// The fixed set of options git-webdiff understands. Everything else on the
/// command line is forwarded to `git diff` untouched.
pub fn declared_options() -> Vec<OptionSpec> {
    vec![
        OptionSpec {
            name: "host",
            short: None,
            kind: OptionKind::Str,
            default: Value::Str("localhost".to_string()),
            help: "Host name on which to serve the webdiff UI.",
        },
        OptionSpec {
            name: "port",
            short: Some("-p"),
            kind: OptionKind::Int,
            default: Value::Int(-1),
            help: "Port to run webdiff on. -1 picks a free port.",
        },
        OptionSpec {
            name: "root-path",
            short: None,
            kind: OptionKind::Str,
            default: Value::Str(String::new()),
            help: "Root path for the application (e.g. /webdiff).",
        },
        OptionSpec {
            name: "timeout",
            short: None,
            kind: OptionKind::Int,
            default: Value::Int(0),
            help: "Shut the server down after this many minutes. 0 disables.",
        },
        OptionSpec {
            name: "no-timeout",
            short: None,
            kind: OptionKind::Flag,
            default: Value::Flag(false),
            help: "Disable the automatic timeout (same as --timeout 0).",
        },
        OptionSpec {
            name: "watch",
            short: None,
            kind: OptionKind::Int,
            default: Value::Int(10),
            help: "Poll interval in seconds for diff changes. 0 disables.",
        },
        OptionSpec {
            name: "no-watch",
            short: None,
            kind: OptionKind::Flag,
            default: Value::Flag(false),
            help: "Disable watch mode (same as --watch 0).",
        },
        OptionSpec {
            name: "unified",
            short: None,
            kind: OptionKind::Int,
            default: Value::Int(8),
            help: "Number of unified context lines.",
        },
        OptionSpec {
            name: "extra-dir-diff-args",
            short: None,
            kind: OptionKind::Str,
            default: Value::Str(String::new()),
            help: "Extra arguments for directory diffs.",
        },
        OptionSpec {
            name: "extra-file-diff-args",
            short: None,
            kind: OptionKind::Str,
            default: Value::Str(String::new()),
            help: "Extra arguments for file diffs.",
        },
        OptionSpec {
            name: "max-diff-width",
            short: None,
            kind: OptionKind::Int,
            default: Value::Int(160),
            help: "Maximum width for diff display.",
        },
        OptionSpec {
            name: "theme",
            short: None,
            kind: OptionKind::Str,
            default: Value::Str("googlecode".to_string()),
            help: "Color theme for syntax highlighting.",
        },
        OptionSpec {
            name: "max-lines-for-syntax",
            short: None,
            kind: OptionKind::Int,
            default: Value::Int(25000),
            help: "Maximum number of lines to syntax-highlight.",
        },
        OptionSpec {
            name: "diff-algorithm",
            short: None,
            kind: OptionKind::Choice(DIFF_ALGORITHM_NAMES),
            default: Value::Unset,
            help: "Diff algorithm to use. Unset lets git decide.",
        },
        OptionSpec {
            name: "color-insert",
            short: None,
            kind: OptionKind::Str,
            default: Value::Str("#efe".to_string()),
            help: "Background color for inserted lines.",
        },
        OptionSpec {
            name: "color-delete",
            short: None,
            kind: OptionKind::Str,
            default: Value::Str("#fee".to_string()),
            help: "Background color for deleted lines.",
        },
        OptionSpec {
            name: "color-char-insert",
            short: None,
            kind: OptionKind::Str,
            default: Value::Str("#cfc".to_string()),
            help: "Background color for inserted characters.",
        },
        OptionSpec {
            name: "color-char-delete",
            short: None,
            kind: OptionKind::Str,
            default: Value::Str("#fcc".to_string()),
            help: "Background color for deleted characters.",
        },
        OptionSpec {
            name: "git-repo",
            short: None,
            kind: OptionKind::Str,
            default: Value::Unset,
            help: "Path to the git repository. Defaults to the current directory.",
        },
    ]
}

/// Typed parse results: every declared option resolved (to its default if
/// absent) plus the ordered pass-through tokens destined for `git diff`.
#[derive(Debug)]
pub struct ParsedArgs {
    values: HashMap<&'static str, Value>,
    pub git_args: Vec<String>,
}

impl ParsedArgs {
    fn value(&self, name: &str) -> &Value {
        self.values.get(name).unwrap_or(&Value::Unset)
    }

    pub fn str(&self, name: &str) -> &str {
        match self.value(name) {
            Value::Str(s) => s.as_str(),
            _ => "",
        }
    }

    pub fn int(&self, name: &str) -> i32 {
        match self.value(name) {
            Value::Int(n) => *n,
            _ => 0,
        }
    }

    pub fn flag(&self, name: &str) -> bool {
        matches!(self.value(name), Value::Flag(true))
    }

    /// `Some` only when the option was explicitly supplied (its default is
    /// `Unset`).
    pub fn opt_str(&self, name: &str) -> Option<&str> {
        match self.value(name) {
            Value::Str(s) => Some(s.as_str()),
            _ => None,
        }
    }
}

/// Resolve an invocation's tokens (program name excluded) into the final
/// configuration record. Never partially applies: any malformed flag fails
/// the whole invocation.
pub fn parse(tokens: &[String]) -> Result<ResolvedConfig, UsageError> {
    ResolvedConfig::from_parsed(parse_tokens(tokens)?)
}

fn parse_tokens(tokens: &[String]) -> Result<ParsedArgs, UsageError> {
    let specs = declared_options();
    let mut values: HashMap<&'static str, Value> = specs
        .iter()
        .map(|spec| (spec.name, spec.default.clone()))
        .collect();
    let mut git_args = Vec::new();

    let mut i = 0;
    while i < tokens.len() {
        let token = &tokens[i];
        i += 1;

        if token == "--" {
            // git's path separator: forward it and everything after verbatim.
            git_args.push(token.clone());
            git_args.extend(tokens[i..].iter().cloned());
            break;
        }

        let (head, inline) = match token.split_once('=') {
            Some((head, value)) if token.starts_with("--") => (head, Some(value)),
            _ => (token.as_str(), None),
        };

        let Some(spec) = lookup(&specs, head) else {
            // Unrecognized tokens are git's business (revision ranges,
            // --cached, pathspecs); they never consume a following token.
            git_args.push(token.clone());
            continue;
        };

        let value = match spec.kind {
            OptionKind::Flag => {
                if inline.is_some() {
                    return Err(UsageError::new(format!(
                        "--{} does not take a value (got {token:?})",
                        spec.name
                    )));
                }
                Value::Flag(true)
            }
            _ => {
                let raw = match inline {
                    Some(value) => value,
                    None => {
                        let Some(next) = tokens.get(i) else {
                            return Err(UsageError::new(format!(
                                "--{} expects a value",
                                spec.name
                            )));
                        };
                        i += 1;
                        next.as_str()
                    }
                };
                coerce(spec, raw)?
            }
        };
        values.insert(spec.name, value);
    }

    Ok(ParsedArgs { values, git_args })
}

fn lookup<'a>(specs: &'a [OptionSpec], head: &str) -> Option<&'a OptionSpec> {
    specs.iter().find(|spec| {
        head.strip_prefix("--").is_some_and(|name| name == spec.name)
            || spec.short.is_some_and(|short| head == short)
    })
}

fn coerce(spec: &OptionSpec, raw: &str) -> Result<Value, UsageError> {
    match spec.kind {
        OptionKind::Str => Ok(Value::Str(raw.to_string())),
        OptionKind::Flag => Ok(Value::Flag(true)),
        OptionKind::Int => raw.parse::<i32>().map(Value::Int).map_err(|_| {
            UsageError::new(format!("invalid integer {raw:?} for --{}", spec.name))
        }),
        OptionKind::Choice(allowed) => {
            if allowed.contains(&raw) {
                Ok(Value::Str(raw.to_string()))
            } else {
                Err(UsageError::new(format!(
                    "invalid choice {raw:?} for --{} (choose from {})",
                    spec.name,
                    allowed.join(", ")
                )))
            }
        }
    }
}

/// Full help text: the usage banner plus one line per declared option.
pub fn usage() -> String {
    let mut out = String::from(USAGE);
    out.push_str("\nOptions:\n");
    for spec in declared_options() {
        let mut left = format!("--{}", spec.name);
        if let Some(short) = spec.short {
            left.push_str(", ");
            left.push_str(short);
        }
        match spec.kind {
            OptionKind::Flag => {}
            OptionKind::Int => left.push_str(" <n>"),
            OptionKind::Str => left.push_str(" <value>"),
            OptionKind::Choice(_) => left.push_str(" <name>"),
        }
        out.push_str(&format!("  {left:<32}{}\n", spec.help));
    }
    out
}
