//! Declaration-region extraction — best-effort pattern matching.
//!
//! Recovers documentation and variable/member records from the loosely
//! formatted declaration text of a TwinCAT source file. This is not a
//! grammar: inputs that don't match the expected shapes yield empty or
//! partial records instead of errors.

use crate::model::{Documentation, DutKind, Field};
use regex::Regex;
use std::sync::LazyLock;

// -- Regex patterns -----------------------------------------------------------

static RE_LINE_COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"//[ \t]*(.*)").unwrap());

static RE_BLOCK_COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\(\*\s*(.*?)\s*\*\)").unwrap());

// One declaration per line: `name : type [:= default] [;]`. The trailing
// `// comment` is split off (outside string literals) before this pattern
// runs, so the greedy type capture cannot swallow it when the semicolon is
// missing.
static RE_FIELD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(\w+)\s*:\s*([^;:=]+)(?:\s*:=\s*([^;]+?))?\s*;?\s*$").unwrap()
});

static RE_VAR_INPUT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)VAR_INPUT\b(.*?)END_VAR").unwrap());

static RE_VAR_OUTPUT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)VAR_OUTPUT\b(.*?)END_VAR").unwrap());

// Plain local block. The opener must sit on its own line (qualifiers like
// CONSTANT or PERSISTENT allowed) so it cannot match the VAR inside a
// preceding END_VAR or VAR_INPUT.
static RE_VAR_LOCAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?ims)^[ \t]*VAR(?:[ \t]+[A-Za-z_]+)*[ \t]*\r?$(.*?)END_VAR").unwrap()
});

static RE_VAR_GLOBAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)VAR_GLOBAL\b(.*?)END_VAR").unwrap());

static RE_STRUCT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)\bSTRUCT\b(.*?)END_STRUCT").unwrap());

/// Block delimiter words that the field pattern must never mistake for a
/// declared name.
const REGION_KEYWORDS: &[&str] = &[
    "VAR",
    "END_VAR",
    "VAR_INPUT",
    "VAR_OUTPUT",
    "VAR_GLOBAL",
    "STRUCT",
    "END_STRUCT",
];

/// Which declaration sub-blocks to scan for fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    /// `VAR_INPUT`, then `VAR_OUTPUT`, then plain `VAR` blocks.
    Local,
    /// `VAR_GLOBAL` blocks only.
    Global,
}

// -- Documentation ------------------------------------------------------------

/// Extract documentation from the comments of a declaration region.
///
/// Two passes: labeled single-line comments (`Purpose:`/`Description:`,
/// `Author:`, `Version:`, `Date:` — case-insensitive, later occurrences
/// overwrite earlier ones), then block comments, where the first
/// `(* ... *)` unconditionally overwrites the description. A leading block
/// comment is the canonical description by convention.
pub fn extract_documentation(text: &str) -> Documentation {
    let comments: Vec<String> = RE_LINE_COMMENT
        .captures_iter(text)
        .map(|caps| caps[1].trim().to_string())
        .collect();

    let mut docs = Documentation::default();

    for line in &comments {
        let lower = line.to_lowercase();
        if lower.starts_with("purpose:") || lower.starts_with("description:") {
            docs.description = label_value(line);
        } else if lower.starts_with("author:") {
            docs.author = label_value(line);
        } else if lower.starts_with("version:") {
            docs.version = label_value(line);
        } else if lower.starts_with("date:") {
            docs.date = label_value(line);
        }
    }

    if let Some(caps) = RE_BLOCK_COMMENT.captures(text) {
        docs.description = caps[1].to_string();
    }

    docs.comments = comments;
    docs
}

/// Text after the first colon of a labeled comment line, trimmed.
fn label_value(line: &str) -> String {
    line.split_once(':')
        .map(|(_, value)| value.trim().to_string())
        .unwrap_or_default()
}

// -- Fields -------------------------------------------------------------------

/// Extract variable declarations from the blocks selected by `region`,
/// concatenated in block discovery order. Never fails: unmatched text
/// simply contributes nothing.
pub fn extract_fields(text: &str, region: Region) -> Vec<Field> {
    let mut blocks: Vec<&str> = Vec::new();
    match region {
        Region::Global => collect_blocks(&RE_VAR_GLOBAL, text, &mut blocks),
        Region::Local => {
            collect_blocks(&RE_VAR_INPUT, text, &mut blocks);
            collect_blocks(&RE_VAR_OUTPUT, text, &mut blocks);
            collect_blocks(&RE_VAR_LOCAL, text, &mut blocks);
        }
    }

    blocks
        .iter()
        .flat_map(|block| block.lines())
        .filter_map(parse_field_line)
        .collect()
}

/// Extract structure members from the first `STRUCT..END_STRUCT` block.
/// Returns an empty sequence when no structure block is present, e.g. for
/// enumerations (value lists are intentionally not extracted).
pub fn extract_struct_members(text: &str) -> Vec<Field> {
    match RE_STRUCT.captures(text) {
        Some(caps) => caps
            .get(1)
            .map(|body| body.as_str().lines().filter_map(parse_field_line).collect())
            .unwrap_or_default(),
        None => Vec::new(),
    }
}

/// Classify a DUT declaration as STRUCT or ENUM.
/// Plain text-containment check for the keyword pair, as in the original
/// tooling; enum value syntax itself is never parsed.
pub fn dut_kind(text: &str) -> DutKind {
    if text.contains("TYPE") && text.contains("ENUM") {
        DutKind::Enum
    } else {
        DutKind::Struct
    }
}

fn collect_blocks<'t>(re: &Regex, text: &'t str, blocks: &mut Vec<&'t str>) {
    for caps in re.captures_iter(text) {
        if let Some(body) = caps.get(1) {
            blocks.push(body.as_str());
        }
    }
}

/// Apply the per-line field pattern. Returns `None` for lines that don't
/// declare anything, and for matches whose name is a block keyword.
fn parse_field_line(line: &str) -> Option<Field> {
    let (code, comment) = split_comment(line);
    let caps = RE_FIELD.captures(code)?;
    let name = caps[1].to_string();
    if REGION_KEYWORDS.contains(&name.to_uppercase().as_str()) {
        return None;
    }
    Some(Field {
        name,
        ty: caps[2].trim().to_string(),
        default: caps
            .get(3)
            .map(|m| m.as_str().trim().to_string())
            .unwrap_or_default(),
        comment: comment.to_string(),
    })
}

/// Split a declaration line into code and trailing `//` comment. A `//`
/// inside a single-quoted string literal (e.g. a URL default) is part of
/// the code, not a comment delimiter.
fn split_comment(line: &str) -> (&str, &str) {
    let bytes = line.as_bytes();
    let mut in_string = false;
    for i in 0..bytes.len() {
        match bytes[i] {
            b'\'' => in_string = !in_string,
            b'/' if !in_string && bytes.get(i + 1) == Some(&b'/') => {
                return (&line[..i], line[i + 2..].trim());
            }
            _ => {}
        }
    }
    (line, "")
}
