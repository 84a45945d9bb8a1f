//! Library-level report tests
//!
//! Exercise the traversal, filter policies and token accumulation together over
//! real temporary directory trees.

use ctxcat::backends::walk::{Traversal, WalkOptions};
use ctxcat::core::filter::{FilterConfig, FilterPolicy, FilterRule, MatchTarget};
use ctxcat::core::model::TokenStats;
use ctxcat::core::render::Renderer;
use ctxcat::core::tokenizer::{chunk_tokens, TokenizeError, Tokenizer, MAX_CHUNK_TOKENS};
use ctxcat::flows::report::write_report;
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use tempfile::{tempdir, TempDir};

fn write_file(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

fn sample_tree() -> TempDir {
    let temp = tempdir().unwrap();
    let files = [
        ("src/main.rs", "fn main() {}\n"),
        ("src/secret.rs", "const KEY: &str = \"x\";\n"),
        ("src/components/MainApp.tsx", "export default {}\n"),
        ("docs/secret/notes.md", "# notes\n"),
        ("docs/readme.md", "readme"),
        ("node_modules/dep/index.js", "module.exports = 1;\n"),
        (".git/config", "[core]\n"),
        ("package-lock.json", "{}"),
    ];
    for (path, content) in files {
        write_file(&temp.path().join(path), content);
    }
    temp
}

fn options() -> WalkOptions {
    WalkOptions {
        relative: true,
        sort: true,
        ..WalkOptions::default()
    }
}

fn included(
    root: &Path,
    policy: FilterPolicy,
    target: MatchTarget,
    rule: &FilterRule,
) -> BTreeSet<String> {
    let filter = FilterConfig::new(policy, target, rule.clone());
    Traversal::new(root, filter, options())
        .entries()
        .map(|e| e.path)
        .collect()
}

fn rules() -> Vec<FilterRule> {
    vec![
        FilterRule::default(),
        FilterRule::new(Vec::<String>::new(), ["secret"]),
        FilterRule::new(["src"], Vec::<String>::new()),
        FilterRule::new(["MainApp"], [".DS_Store"]),
        FilterRule::new(["secret"], ["secret", ".git"]),
        FilterRule::new(["docs"], [".git", "node_modules", "hocr", "package-lock"]),
    ]
}

#[test]
fn blank_rule_includes_every_file_under_both_policies() {
    let temp = sample_tree();
    let rule = FilterRule::default();

    for target in [MatchTarget::FullPath, MatchTarget::FileName] {
        let any = included(temp.path(), FilterPolicy::AnyOrBlank, target, &rule);
        let strict = included(temp.path(), FilterPolicy::StrictAnd, target, &rule);
        assert_eq!(any.len(), 8);
        assert_eq!(any, strict);
    }
}

#[test]
fn strict_and_is_subset_of_any_or_blank() {
    let temp = sample_tree();

    for rule in rules() {
        for target in [MatchTarget::FullPath, MatchTarget::FileName] {
            let any = included(temp.path(), FilterPolicy::AnyOrBlank, target, &rule);
            let strict = included(temp.path(), FilterPolicy::StrictAnd, target, &rule);
            assert!(
                strict.is_subset(&any),
                "strict-and {strict:?} not within any-or-blank {any:?} for {rule:?} / {target}"
            );
        }
    }
}

#[test]
fn exclude_only_rule_drops_matching_paths() {
    let temp = sample_tree();
    let rule = FilterRule::new(Vec::<String>::new(), ["secret"]);

    for policy in [FilterPolicy::AnyOrBlank, FilterPolicy::StrictAnd] {
        let paths = included(temp.path(), policy, MatchTarget::FullPath, &rule);
        assert!(!paths.contains("src/secret.rs"));
        assert!(!paths.contains("docs/secret/notes.md"));
        assert!(paths.contains("src/main.rs"));
    }

    // Only the file name is matched, so the directory named "secret" no longer counts
    let paths = included(temp.path(), FilterPolicy::StrictAnd, MatchTarget::FileName, &rule);
    assert!(paths.contains("docs/secret/notes.md"));
    assert!(!paths.contains("src/secret.rs"));
}

#[test]
fn reported_content_matches_file_bytes() {
    let temp = sample_tree();
    let traversal = Traversal::new(temp.path(), FilterConfig::default(), options());

    for entry in traversal.entries() {
        let expected = fs::read_to_string(temp.path().join(&entry.path)).unwrap();
        assert_eq!(entry.text(), Some(expected.as_str()), "{}", entry.path);
    }
}

struct FailsOn(&'static str);

impl Tokenizer for FailsOn {
    fn encode(&self, text: &str) -> Result<Vec<u32>, TokenizeError> {
        if text.contains(self.0) {
            Err(TokenizeError::Backend(format!("cannot tokenize {:?}", self.0)))
        } else {
            Ok(text.bytes().map(u32::from).collect())
        }
    }
}

#[test]
fn tokenizer_failure_skips_file_in_aggregate() {
    let temp = tempdir().unwrap();
    write_file(&temp.path().join("a.txt"), "abc");
    write_file(&temp.path().join("b.txt"), "BOOM");
    write_file(&temp.path().join("c.txt"), "de");

    let traversal = Traversal::new(temp.path(), FilterConfig::default(), options());
    let tokenizer = FailsOn("BOOM");
    let mut stats = TokenStats::new();
    let mut out = Vec::new();

    let totals = write_report(
        traversal.entries(),
        &Renderer::default(),
        Some(&tokenizer as &dyn Tokenizer),
        &mut stats,
        &mut out,
    )
    .unwrap();

    assert_eq!(totals.entries, 3);
    assert_eq!(totals.token_errors, 1);
    assert_eq!(stats.file_count, 2);
    assert_eq!(stats.total_tokens, 5);

    let report = String::from_utf8(out).unwrap();
    assert!(report.contains("Could not tokenize file b.txt due to: cannot tokenize \"BOOM\"\n"));
    assert!(report.contains("File: c.txt\n"));
}

#[test]
fn chunking_utility_is_exposed() {
    let ids: Vec<u32> = (0..1030).collect();
    let chunks = chunk_tokens(&ids, MAX_CHUNK_TOKENS);
    let sizes: Vec<usize> = chunks.iter().map(Vec::len).collect();
    assert_eq!(sizes, vec![512, 512, 6]);
}
