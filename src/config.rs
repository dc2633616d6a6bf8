use std::env;
use std::path::PathBuf;

use serde::Serialize;

use crate::cli::ParsedArgs;
use crate::error::UsageError;

/// Diff algorithms accepted by `git diff --diff-algorithm`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DiffAlgorithm {
    Myers,
    Minimal,
    Patience,
    Histogram,
}

pub const DIFF_ALGORITHM_NAMES: &[&str] = &["myers", "minimal", "patience", "histogram"];

impl DiffAlgorithm {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "myers" => Some(Self::Myers),
            "minimal" => Some(Self::Minimal),
            "patience" => Some(Self::Patience),
            "histogram" => Some(Self::Histogram),
            _ => None,
        }
    }
}

/// Display and server settings under the legacy `webdiff` config group.
/// Serialized key names must stay byte-identical to the old git-config keys.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WebdiffSection {
    pub unified: i32,
    pub extra_dir_diff_args: String,
    pub extra_file_diff_args: String,
    pub port: i32,
    pub host: String,
    pub root_path: String,
    pub max_diff_width: i32,
    pub theme: String,
    pub max_lines_for_syntax: i32,
}

/// Line and character insert/delete backgrounds under `webdiff.colors`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ColorSection {
    pub insert: String,
    pub delete: String,
    pub char_insert: String,
    pub char_delete: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiffSection {
    /// `None` defers the choice to git's own default.
    pub algorithm: Option<DiffAlgorithm>,
}

/// Nested view mirroring the legacy git-config key grouping.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConfigSections {
    pub webdiff: WebdiffSection,
    #[serde(rename = "webdiff.colors")]
    pub colors: ColorSection,
    pub diff: DiffSection,
}

/// Final immutable output of argument resolution, consumed by the server,
/// renderer, and watcher subsystems. Built once per invocation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedConfig {
    pub config: ConfigSections,
    pub port: i32,
    pub host: String,
    /// Minutes until automatic shutdown; 0 disables the timer.
    pub timeout: i32,
    /// Poll interval in seconds; 0 disables watching.
    pub watch: i32,
    pub git_repo: PathBuf,
    pub git_args: Vec<String>,
}

impl ResolvedConfig {
    /// Assemble the output record from typed parse results.
    pub(crate) fn from_parsed(args: ParsedArgs) -> Result<Self, UsageError> {
        // The disable flags beat explicit values regardless of where they
        // appeared on the command line.
        let watch = if args.flag("no-watch") {
            0
        } else {
            args.int("watch")
        };
        let timeout = if args.flag("no-timeout") {
            0
        } else {
            args.int("timeout")
        };

        let algorithm = args
            .opt_str("diff-algorithm")
            .and_then(DiffAlgorithm::from_name);

        // The only I/O in the resolver, and only when --git-repo is absent.
        let git_repo = match args.opt_str("git-repo") {
            Some(path) => PathBuf::from(path),
            None => env::current_dir()
                .map_err(|e| UsageError::new(format!("cannot resolve current directory: {e}")))?,
        };

        Ok(Self {
            config: ConfigSections {
                webdiff: WebdiffSection {
                    unified: args.int("unified"),
                    extra_dir_diff_args: args.str("extra-dir-diff-args").to_string(),
                    extra_file_diff_args: args.str("extra-file-diff-args").to_string(),
                    port: args.int("port"),
                    host: args.str("host").to_string(),
                    root_path: args.str("root-path").to_string(),
                    max_diff_width: args.int("max-diff-width"),
                    theme: args.str("theme").to_string(),
                    max_lines_for_syntax: args.int("max-lines-for-syntax"),
                },
                colors: ColorSection {
                    insert: args.str("color-insert").to_string(),
                    delete: args.str("color-delete").to_string(),
                    char_insert: args.str("color-char-insert").to_string(),
                    char_delete: args.str("color-char-delete").to_string(),
                },
                diff: DiffSection { algorithm },
            },
            port: args.int("port"),
            host: args.str("host").to_string(),
            timeout,
            watch,
            git_repo,
            git_args: args.git_args,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli;

    fn toks(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_algorithm_from_name() {
        assert_eq!(DiffAlgorithm::from_name("myers"), Some(DiffAlgorithm::Myers));
        assert_eq!(
            DiffAlgorithm::from_name("histogram"),
            Some(DiffAlgorithm::Histogram)
        );
        assert_eq!(DiffAlgorithm::from_name("Myers"), None);
        assert_eq!(DiffAlgorithm::from_name(""), None);
    }

    #[test]
    fn test_legacy_json_shape() {
        let config = cli::parse(&toks(&[
            "--unified",
            "12",
            "--root-path",
            "/webdiff",
            "--color-char-insert",
            "#0f0",
            "--diff-algorithm",
            "patience",
        ]))
        .unwrap();
        let json = serde_json::to_value(&config).unwrap();

        let webdiff = &json["config"]["webdiff"];
        assert_eq!(webdiff["unified"], 12);
        assert_eq!(webdiff["extraDirDiffArgs"], "");
        assert_eq!(webdiff["extraFileDiffArgs"], "");
        assert_eq!(webdiff["rootPath"], "/webdiff");
        assert_eq!(webdiff["maxDiffWidth"], 160);
        assert_eq!(webdiff["maxLinesForSyntax"], 25000);

        let colors = &json["config"]["webdiff.colors"];
        assert_eq!(colors["insert"], "#efe");
        assert_eq!(colors["charInsert"], "#0f0");
        assert_eq!(colors["charDelete"], "#fcc");

        assert_eq!(json["config"]["diff"]["algorithm"], "patience");
    }

    #[test]
    fn test_unset_algorithm_serializes_as_null() {
        let config = cli::parse(&[]).unwrap();
        let json = serde_json::to_value(&config).unwrap();
        assert!(json["config"]["diff"]["algorithm"].is_null());
    }

    #[test]
    fn test_flat_fields_mirror_sections() {
        let config = cli::parse(&toks(&["--port", "8080", "--host", "0.0.0.0"])).unwrap();
        assert_eq!(config.port, config.config.webdiff.port);
        assert_eq!(config.host, config.config.webdiff.host);
        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(json["port"], 8080);
        assert_eq!(json["host"], "0.0.0.0");
        assert_eq!(json["timeout"], 0);
        assert_eq!(json["watch"], 10);
    }
}
