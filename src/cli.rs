//! CLI module - Command-line interface definitions and handlers

use anyhow::{bail, Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::backends::walk::{Traversal, WalkOptions};
use crate::core::config::FileConfig;
use crate::core::file_reader::TextEncoding;
use crate::core::filter::{FilterConfig, FilterPolicy, FilterRule, MatchTarget, DEFAULT_EXCLUDES};
use crate::core::render::{OutputFormat, Renderer};
use crate::core::tokenizer::{BpeTokenizer, TokenModel, Tokenizer};

/// ctxcat - print filtered directory contents as one delimited report.
#[derive(Parser, Debug)]
#[command(name = "ctxcat")]
#[command(
    author,
    version,
    about,
    long_about = r#"ctxcat walks a directory tree, keeps the files whose path (or name) passes
the include/exclude substring filter, and prints each one as:

    File: <path>
    ```
    Content:
    <file content>

    ```

Files that cannot be read or decoded are reported inline and the walk continues.
With --tokens, every printed file is tokenized and a summary is appended.

Filter policies:
- any-or-blank (default): include when both lists are empty, OR the path contains an
  include substring, OR the path contains no exclude substring
- strict-and: (no include list OR path contains an include substring)
  AND path contains no exclude substring

Examples:
    ctxcat --exclude .git,node_modules
    ctxcat src --include MainApp --exclude .DS_Store --policy strict-and --match-target file-name
    ctxcat --default-excludes --tokens --model gpt4o
"#
)]
pub struct Cli {
    /// Root directory to walk.
    #[arg(
        value_name = "ROOT",
        default_value = ".",
        env = "CTXCAT_ROOT",
        long_help = "Root directory to walk (defaults to the current directory).\n\n\
The root is canonicalized, so reported paths are absolute unless --relative is given."
    )]
    pub root: PathBuf,

    /// Substrings that select files (repeatable, comma separated).
    #[arg(
        short,
        long,
        value_name = "SUBSTR",
        value_delimiter = ',',
        env = "CTXCAT_INCLUDE",
        long_help = "Substrings that select files. May be repeated or comma separated.\n\n\
How this combines with --exclude depends on --policy."
    )]
    pub include: Vec<String>,

    /// Substrings that reject files (repeatable, comma separated).
    #[arg(
        short,
        long,
        value_name = "SUBSTR",
        value_delimiter = ',',
        env = "CTXCAT_EXCLUDE",
        long_help = "Substrings that reject files. May be repeated or comma separated.\n\n\
Example: --exclude .git,node_modules,package-lock"
    )]
    pub exclude: Vec<String>,

    /// Add the built-in exclude list (.git, node_modules, hocr, package-lock).
    #[arg(long)]
    pub default_excludes: bool,

    /// How include and exclude combine (any-or-blank/strict-and).
    #[arg(
        long,
        value_name = "POLICY",
        env = "CTXCAT_POLICY",
        long_help = "How the include and exclude lists combine.\n\n\
Supported values:\n\
- any-or-blank (default)\n\
- strict-and"
    )]
    pub policy: Option<FilterPolicy>,

    /// What the substrings are matched against (full-path/file-name).
    #[arg(
        long,
        value_name = "TARGET",
        env = "CTXCAT_MATCH_TARGET",
        long_help = "What the substrings are matched against.\n\n\
Supported values:\n\
- full-path (default): the reported path\n\
- file-name: only the last path component"
    )]
    pub match_target: Option<MatchTarget>,

    /// Text encoding used to decode files (default: utf-8).
    #[arg(
        long,
        value_name = "LABEL",
        env = "CTXCAT_ENCODING",
        long_help = "Text encoding used to decode files. Any WHATWG encoding label is accepted\n\
(utf-8, latin1, shift_jis, gbk, utf-16le, ...).\n\n\
Decoding is strict: files with malformed input are reported as unreadable."
    )]
    pub encoding: Option<String>,

    /// Tokenize printed files and append a token summary.
    #[arg(long)]
    pub tokens: bool,

    /// Token model used with --tokens.
    #[arg(
        long,
        value_name = "MODEL",
        env = "CTXCAT_MODEL",
        long_help = "Token model used with --tokens.\n\n\
Supported values: cl100k (default), o200k, gpt4, gpt4o, gpt35, claude3"
    )]
    pub model: Option<String>,

    /// Output format (text/jsonl).
    #[arg(
        long,
        default_value = "text",
        value_name = "FORMAT",
        env = "CTXCAT_FORMAT",
        long_help = "Select the output format.\n\n\
Supported values:\n\
- text (default): fenced File/Content blocks\n\
- jsonl: one JSON object per file, then a summary object with --tokens"
    )]
    pub format: OutputFormat,

    /// Report and match paths relative to ROOT.
    #[arg(long)]
    pub relative: bool,

    /// Visit entries sorted by file name for stable output.
    #[arg(long)]
    pub sort: bool,

    /// Honor .gitignore and .ignore files.
    #[arg(long)]
    pub respect_ignore: bool,

    /// JSON config file with include/exclude/policy/match_target/encoding/model.
    #[arg(
        long,
        value_name = "FILE",
        env = "CTXCAT_CONFIG",
        long_help = "JSON config file. Recognized keys: include, exclude, policy, match_target,\n\
encoding, model.\n\n\
Command-line values take precedence; include/exclude lists are merged."
    )]
    pub config: Option<PathBuf>,

    /// Quiet mode (errors only on stderr).
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Verbose mode (debug diagnostics on stderr).
    #[arg(short, long)]
    pub verbose: bool,
}

/// Fully resolved settings for one run
#[derive(Debug, Clone)]
pub struct Settings {
    pub root: PathBuf,
    pub filter: FilterConfig,
    pub walk: WalkOptions,
    pub format: OutputFormat,
    pub model: Option<TokenModel>,
}

impl Cli {
    /// Merge CLI values with the optional config file
    pub fn resolve(self) -> Result<Settings> {
        let file = match &self.config {
            Some(path) => FileConfig::load(path)?,
            None => FileConfig::default(),
        };

        let mut exclude: Vec<String> = file.exclude;
        exclude.extend(self.exclude);
        if self.default_excludes {
            exclude.extend(DEFAULT_EXCLUDES.iter().map(|s| s.to_string()));
        }
        let mut include: Vec<String> = file.include;
        include.extend(self.include);

        let filter = FilterConfig::new(
            self.policy.or(file.policy).unwrap_or_default(),
            self.match_target.or(file.match_target).unwrap_or_default(),
            FilterRule::new(
                include.into_iter().filter(|s| !s.is_empty()),
                exclude.into_iter().filter(|s| !s.is_empty()),
            ),
        );

        let encoding = match self.encoding.or(file.encoding) {
            Some(label) => label
                .parse::<TextEncoding>()
                .map_err(anyhow::Error::msg)?,
            None => TextEncoding::default(),
        };

        let model = if self.tokens {
            let model = match self.model.or(file.model) {
                Some(name) => name.parse::<TokenModel>().map_err(anyhow::Error::msg)?,
                None => TokenModel::default(),
            };
            Some(model)
        } else {
            None
        };

        if !self.root.exists() {
            bail!("Root path does not exist: {}", self.root.display());
        }
        if !self.root.is_dir() {
            bail!("Root path is not a directory: {}", self.root.display());
        }
        let root = self
            .root
            .canonicalize()
            .with_context(|| format!("Failed to resolve root {}", self.root.display()))?;

        Ok(Settings {
            root,
            filter,
            walk: WalkOptions {
                relative: self.relative,
                respect_ignore: self.respect_ignore,
                sort: self.sort,
                encoding,
            },
            format: self.format,
            model,
        })
    }
}

/// Install the stderr log subscriber
pub fn init_tracing(verbose: bool, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Run the CLI with parsed arguments
pub fn run(cli: Cli) -> Result<()> {
    init_tracing(cli.verbose, cli.quiet);

    let settings = cli.resolve()?;
    debug!(
        root = %settings.root.display(),
        policy = %settings.filter.policy,
        match_target = %settings.filter.match_target,
        encoding = %settings.walk.encoding,
        "starting report"
    );

    let tokenizer = match settings.model {
        Some(model) => Some(
            BpeTokenizer::new(model)
                .with_context(|| format!("Failed to load tokenizer for model {}", model))?,
        ),
        None => None,
    };

    let traversal = Traversal::new(settings.root, settings.filter, settings.walk);
    crate::flows::report::run_report(
        &traversal,
        Renderer::new(settings.format),
        tokenizer.as_ref().map(|t| t as &dyn Tokenizer),
    )
}
