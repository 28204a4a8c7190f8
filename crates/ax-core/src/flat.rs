//! Flat-content (`llms-full.txt`) parsing.
//!
//! Two export shapes are supported, both yielding [`FlatDocument`]s in input
//! order:
//!
//! - **Frontmatter**: each page starts with a `---` line followed by a
//!   `url:` key, a closing `---`, then a `# Title` heading and the body.
//! - **Inline path**: pages are separated by `---` lines and start with
//!   `# Title (/path)`.
//!
//! Blocks that do not fit the expected shape are dropped; parsing itself
//! never fails.

use std::sync::LazyLock;

use regex::Regex;

use crate::FlatDocument;

/// Opening `---` line of a frontmatter block, followed by its `url:` key.
///
/// The pattern is a compile-time constant known to be valid.
#[allow(clippy::unwrap_used)]
static FRONTMATTER_START: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^---[ \t]*\r?\nurl:").unwrap());

const BLOCK_INDICATORS: [&str; 3] = [">-", ">", "|"];

/// Parse a frontmatter-delimited export.
pub fn parse_frontmatter(content: &str) -> Vec<FlatDocument> {
    let starts: Vec<usize> = FRONTMATTER_START.find_iter(content).map(|m| m.start()).collect();
    starts
        .iter()
        .enumerate()
        .filter_map(|(i, &begin)| {
            let end = starts.get(i + 1).copied().unwrap_or(content.len());
            parse_frontmatter_block(&content[begin..end])
        })
        .collect()
}

fn parse_frontmatter_block(block: &str) -> Option<FlatDocument> {
    let mut lines = block.lines();
    // Opening delimiter, guaranteed by the block regex.
    lines.next()?;

    let mut frontmatter = Vec::new();
    let mut closed = false;
    for line in lines.by_ref() {
        if line.trim() == "---" {
            closed = true;
            break;
        }
        frontmatter.push(line);
    }
    if !closed {
        return None;
    }

    let url = frontmatter_url(&frontmatter)?;

    let mut body = lines.skip_while(|line| !line.trim_start().starts_with("# "));
    let title = body.next()?.trim_start().trim_start_matches("# ").trim().to_string();
    if title.is_empty() {
        return None;
    }
    let content = body.collect::<Vec<_>>().join("\n").trim().to_string();

    Some(FlatDocument {
        url,
        title,
        content,
    })
}

fn frontmatter_url(lines: &[&str]) -> Option<String> {
    for (i, line) in lines.iter().enumerate() {
        let Some(value) = line.trim().strip_prefix("url:") else {
            continue;
        };
        let mut value = value.trim();
        if BLOCK_INDICATORS.contains(&value) {
            value = lines[i + 1..]
                .iter()
                .map(|l| l.trim())
                .find(|l| !l.is_empty())
                .unwrap_or_default();
        }
        let url = value.trim_matches(|c| c == '"' || c == '\'').trim();
        return (!url.is_empty()).then(|| url.to_string());
    }
    None
}

/// Parse an inline-path export, resolving root-relative paths against
/// `base_url`.
pub fn parse_inline_path(content: &str, base_url: &str) -> Vec<FlatDocument> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);

    let mut blocks: Vec<Vec<&str>> = vec![Vec::new()];
    for line in content.lines() {
        if line == "---" {
            blocks.push(Vec::new());
        } else if let Some(current) = blocks.last_mut() {
            current.push(line);
        }
    }

    blocks
        .iter()
        .filter_map(|lines| parse_inline_block(lines, base_url))
        .collect()
}

fn parse_inline_block(lines: &[&str], base_url: &str) -> Option<FlatDocument> {
    let heading_at = lines.iter().position(|l| !l.trim().is_empty())?;
    let (title, path) = split_heading(lines[heading_at].trim())?;

    let url = resolve_url(path, base_url);
    if title.is_empty() || url.is_empty() {
        return None;
    }

    let content = lines[heading_at + 1..].join("\n").trim().to_string();
    Some(FlatDocument {
        url,
        title: title.to_string(),
        content,
    })
}

/// Split `# Title (path)` into its title and path.
fn split_heading(line: &str) -> Option<(&str, &str)> {
    let rest = line.strip_prefix("# ")?.strip_suffix(')')?;
    let open = rest.rfind('(')?;
    Some((rest[..open].trim(), rest[open + 1..].trim()))
}

/// Resolve a root-relative path against `base_url`; other values pass through.
pub fn resolve_url(path: &str, base_url: &str) -> String {
    if path.starts_with('/') && !base_url.is_empty() {
        format!("{}{}", base_url.trim_end_matches('/'), path)
    } else {
        path.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const BASE: &str = "https://tossmini-docs.toss.im";

    #[test]
    fn frontmatter_start_matches_block_openers_only() {
        assert!(FRONTMATTER_START.is_match("---\nurl: https://a.dev/x.md"));
        assert!(FRONTMATTER_START.is_match("text\n---  \r\nurl: x"));
        assert!(!FRONTMATTER_START.is_match("---\ntitle: x\nurl: y"));
        assert!(!FRONTMATTER_START.is_match("  ---\nurl: x"));
    }

    #[test]
    fn frontmatter_two_blocks_and_a_titleless_tail() {
        let content = "---
url: https://developers-apps-in-toss.toss.im/intro/overview.md
---

# Overview

Mini apps run inside Toss.

---
url: >-
  https://developers-apps-in-toss.toss.im/intro/setup.md
---

# Setup

Install the SDK.
---
url: https://developers-apps-in-toss.toss.im/broken.md
---

no heading here
";
        let docs = parse_frontmatter(content);
        assert_eq!(docs.len(), 2);
        assert_eq!(
            docs[0],
            FlatDocument {
                url: "https://developers-apps-in-toss.toss.im/intro/overview.md".into(),
                title: "Overview".into(),
                content: "Mini apps run inside Toss.".into(),
            }
        );
        assert_eq!(docs[1].url, "https://developers-apps-in-toss.toss.im/intro/setup.md");
        assert_eq!(docs[1].title, "Setup");
        assert_eq!(docs[1].content, "Install the SDK.");
    }

    #[test]
    fn frontmatter_block_indicator_with_blank_line() {
        let content = "---\nurl: |\n\n  'https://a.dev/x'\n---\n# X\nbody\n";
        let docs = parse_frontmatter(content);
        assert_eq!(docs[0].url, "https://a.dev/x");
    }

    #[test]
    fn frontmatter_quoted_url_and_extra_keys() {
        let content = "---\nurl: \"https://a.dev/q\"\ntags: [a]\n---\n\n  # Quoted\n\nbody\n";
        let docs = parse_frontmatter(content);
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].url, "https://a.dev/q");
        assert_eq!(docs[0].title, "Quoted");
    }

    #[test]
    fn frontmatter_drops_unclosed_and_empty_url_blocks() {
        let content = "---\nurl:\n---\n# Empty url\n\n---\nurl: https://a.dev/open\n# never closed\n";
        assert!(parse_frontmatter(content).is_empty());
    }

    #[test]
    fn frontmatter_ignores_leading_text() {
        let content = "preamble\n\n---\nurl: https://a.dev/x\n---\n# X\n";
        let docs = parse_frontmatter(content);
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].content, "");
    }

    #[test]
    fn inline_path_resolves_root_relative_paths() {
        let content = "\u{feff}# Button (/tds-react-native/components/button/)
Buttons trigger actions.
---
# Toast (https://elsewhere.dev/toast)

Shows a message.
---

---
no heading at all
---
# Dialog (/tds-react-native/components/dialog/)
";
        let docs = parse_inline_path(content, BASE);
        assert_eq!(docs.len(), 3);
        assert_eq!(
            docs[0],
            FlatDocument {
                url: "https://tossmini-docs.toss.im/tds-react-native/components/button/".into(),
                title: "Button".into(),
                content: "Buttons trigger actions.".into(),
            }
        );
        assert_eq!(docs[1].url, "https://elsewhere.dev/toast");
        assert_eq!(docs[1].content, "Shows a message.");
        assert_eq!(docs[2].title, "Dialog");
        assert_eq!(docs[2].content, "");
    }

    #[test]
    fn inline_path_title_uses_last_parenthesis() {
        let (title, path) = split_heading("# Select (Single) (/c/select/)").unwrap_or_default();
        assert_eq!(title, "Select (Single)");
        assert_eq!(path, "/c/select/");
        assert!(split_heading("# No path").is_none());
    }

    #[test]
    fn inline_path_drops_empty_path() {
        assert!(parse_inline_path("# Title ()\nbody\n", BASE).is_empty());
    }

    #[test]
    fn resolve_url_cases() {
        assert_eq!(resolve_url("/a/b", "https://x.dev/"), "https://x.dev/a/b");
        assert_eq!(resolve_url("https://y.dev/c", "https://x.dev"), "https://y.dev/c");
        assert_eq!(resolve_url("/a", ""), "/a");
    }
}
