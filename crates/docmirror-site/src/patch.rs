//! Exclusion list patching for static-site config files.
//!
//! The config file belongs to an external tool, so it is never parsed and
//! re-serialized. Instead a block of the form
//!
//! ```yaml
//! exclude:
//!   - "*.md"
//!   - node_modules
//! ```
//!
//! is located by pattern match and new items are spliced in after the last
//! existing one. Comment and blank lines between items belong to the block. Everything outside the inserted line is left byte-for-byte
//! untouched.
//!
//! Any other list style (`exclude: [a, b]`, a nested `exclude` key) does not
//! match, and a fresh block is appended at the end of the file instead. That
//! can leave the file with two `exclude` keys.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::SiteError;

/// What a patch did to the config text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchAction {
    /// The pattern was already listed; text unchanged.
    AlreadyPresent,

    /// The pattern was added to an existing exclusion block.
    InsertedIntoBlock,

    /// No exclusion block was found, so one was appended.
    AppendedBlock,
}

/// Result of patching config text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchResult {
    /// The patched text
    pub content: String,

    /// What changed
    pub action: PatchAction,
}

const EXCLUDE_KEY: &str = "exclude";

/// `exclude:` at column 0, optional trailing comment, then the contiguous
/// run of indented `- item` lines, with comment and blank lines allowed in
/// between. Group 1 is the item block.
static EXCLUDE_BLOCK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?m)^exclude:[ \t]*(?:#[^\n]*)?(?:\r?\n|\z)((?:[ \t]+-(?:[ \t][^\n]*)?(?:\n|\z)|[ \t]*(?:#[^\n]*)?\r?\n)*)",
    )
    .expect("exclude block pattern is valid")
});

/// Ensure `pattern` is listed under the `exclude` key of `content`.
pub fn ensure_excluded(content: &str, pattern: &str) -> PatchResult {
    let wanted = pattern.trim();

    let mut first_block = None;
    for caps in EXCLUDE_BLOCK_RE.captures_iter(content) {
        let Some(items) = caps.get(1) else {
            continue;
        };

        let block = scan_block(items.as_str());
        if block.values.iter().any(|value| *value == wanted) {
            return PatchResult {
                content: content.to_string(),
                action: PatchAction::AlreadyPresent,
            };
        }

        if first_block.is_none() {
            let insert_at = items.start() + block.last_item_end.unwrap_or(0);
            first_block = Some((insert_at, block.indent));
        }
    }

    match first_block {
        Some((insert_at, indent)) => {
            let mut line = String::new();
            // Key or last item sits on the final line without a newline.
            if !content[..insert_at].ends_with('\n') {
                line.push('\n');
            }
            line.push_str(&format!("{}- {}\n", indent, format_item(wanted)));

            let mut patched = String::with_capacity(content.len() + line.len());
            patched.push_str(&content[..insert_at]);
            patched.push_str(&line);
            patched.push_str(&content[insert_at..]);

            PatchResult {
                content: patched,
                action: PatchAction::InsertedIntoBlock,
            }
        }
        None => {
            let mut patched = content.to_string();
            if !patched.is_empty() && !patched.ends_with('\n') {
                patched.push('\n');
            }
            patched.push_str(&format!("{}:\n  - {}\n", EXCLUDE_KEY, format_item(wanted)));

            PatchResult {
                content: patched,
                action: PatchAction::AppendedBlock,
            }
        }
    }
}

/// Apply [`ensure_excluded`] for every pattern, in order.
pub fn ensure_all_excluded<S: AsRef<str>>(content: &str, patterns: &[S]) -> (String, Vec<PatchAction>) {
    let mut current = content.to_string();
    let mut actions = Vec::with_capacity(patterns.len());

    for pattern in patterns {
        let result = ensure_excluded(&current, pattern.as_ref());
        current = result.content;
        actions.push(result.action);
    }

    (current, actions)
}

/// Patch the config file at `path` in place.
///
/// A missing file is treated as empty. The file is only written when the
/// text changed. If the result no longer parses as YAML a warning is logged,
/// but the patched text is still written.
pub fn patch_config_file<S: AsRef<str>>(path: &Path, patterns: &[S]) -> Result<Vec<PatchAction>, SiteError> {
    let original = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => String::new(),
        Err(source) => {
            return Err(SiteError::Read {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    let (patched, actions) = ensure_all_excluded(&original, patterns);

    if patched != original {
        if let Err(e) = serde_yaml::from_str::<serde_yaml::Value>(&patched) {
            tracing::warn!("{} is not valid YAML after patching: {}", path.display(), e);
        }

        fs::write(path, &patched).map_err(|source| SiteError::Write {
            path: path.to_path_buf(),
            source,
        })?;
    }

    Ok(actions)
}

/// Extract the value of a `- item` line, without quotes or trailing comment.
fn item_value(line: &str) -> &str {
    let rest = line.trim_start();
    let rest = rest.strip_prefix('-').unwrap_or(rest).trim();

    for quote in ['"', '\''] {
        if let Some(inner) = rest.strip_prefix(quote) {
            if let Some(end) = inner.find(quote) {
                return inner[..end].trim();
            }
        }
    }

    match rest.find(" #") {
        Some(pos) => rest[..pos].trim(),
        None => rest,
    }
}

/// Items found in an exclusion block.
struct BlockScan<'a> {
    /// Item values, unquoted
    values: Vec<&'a str>,

    /// Indentation of the first item, or two spaces
    indent: String,

    /// Offset just past the last item line
    last_item_end: Option<usize>,
}

/// Walk a block's lines, skipping comment and blank lines.
fn scan_block(block: &str) -> BlockScan<'_> {
    let mut scan = BlockScan {
        values: Vec::new(),
        indent: "  ".to_string(),
        last_item_end: None,
    };

    let mut offset = 0;
    for line in block.split_inclusive('\n') {
        offset += line.len();

        if !line.trim_start().starts_with('-') {
            continue;
        }

        if scan.values.is_empty() {
            scan.indent = line
                .chars()
                .take_while(|c| *c == ' ' || *c == '\t')
                .collect();
        }
        scan.values.push(item_value(line));
        scan.last_item_end = Some(offset);
    }

    scan
}

/// Quote a pattern when YAML would otherwise misread it.
fn format_item(pattern: &str) -> String {
    const INDICATORS: &[char] = &[
        '*', '&', '!', '%', '@', '`', '|', '>', '?', '{', '[', '\'', '"', '#', '-', ':',
    ];

    let needs_quotes = pattern.starts_with(INDICATORS)
        || pattern.contains(": ")
        || pattern.contains(" #");

    if needs_quotes {
        format!("\"{}\"", pattern.replace('\\', "\\\\").replace('"', "\\\""))
    } else {
        pattern.to_string()
    }
}
