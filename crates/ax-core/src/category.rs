//! Category paths for indexed documents.
//!
//! Categories come from the outline: a link listed under `## Guides` /
//! `### Payments` gets the category `Guides > Payments`. Component-library
//! corpora fall back to a label derived from the URL path when a page is
//! missing from the outline.

use std::collections::HashMap;

use crate::{Outline, Section, flat::resolve_url};

/// Separator between category path segments.
pub const CATEGORY_SEPARATOR: &str = " > ";

/// Category used when a URL has no usable path segments.
pub const FALLBACK_ROOT_CATEGORY: &str = "TDS";

/// Maps a page URL to its category path.
pub type CategoryMap = HashMap<String, String>;

/// Build the URL → category map for an outline.
///
/// Link URLs are rewritten with [`resolve_url`] against `base_url` so keys
/// line up with the URLs produced by the flat-content parser. Pass an empty
/// `base_url` to keep URLs as written.
pub fn build_category_map(outline: &Outline, base_url: &str) -> CategoryMap {
    let mut map = CategoryMap::new();
    for section in &outline.sections {
        visit(section, None, base_url, &mut map);
    }
    map
}

fn visit(section: &Section, parent: Option<&str>, base_url: &str, map: &mut CategoryMap) {
    let label = match parent {
        Some(parent) => format!("{parent}{CATEGORY_SEPARATOR}{}", section.title),
        None => section.title.clone(),
    };

    for link in &section.links {
        map.insert(resolve_url(&link.url, base_url), label.clone());
    }
    for child in &section.children {
        visit(child, Some(&label), base_url, map);
    }
}

/// Derive a category from the first two path segments of `url`.
///
/// ```rust
/// use ax_core::category::path_category;
///
/// assert_eq!(
///     path_category(
///         "https://tossmini-docs.toss.im/tds-react-native/components/button/",
///         "https://tossmini-docs.toss.im",
///     ),
///     "Tds React Native > Components"
/// );
/// ```
pub fn path_category(url: &str, base_url: &str) -> String {
    let path = url_path(url, base_url);
    let segments: Vec<String> = path
        .split('/')
        .filter(|segment| !segment.is_empty())
        .take(2)
        .map(title_case_kebab)
        .collect();

    if segments.is_empty() {
        FALLBACK_ROOT_CATEGORY.to_string()
    } else {
        segments.join(CATEGORY_SEPARATOR)
    }
}

fn url_path(url: &str, base_url: &str) -> String {
    if !base_url.is_empty() {
        if let Some(rest) = url.strip_prefix(base_url.trim_end_matches('/')) {
            return rest.to_string();
        }
    }
    url::Url::parse(url).map_or_else(|_| url.to_string(), |parsed| parsed.path().to_string())
}

fn title_case_kebab(segment: &str) -> String {
    segment
        .split('-')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) if first.is_ascii_lowercase() => {
                    let mut out = String::with_capacity(word.len());
                    out.push(first.to_ascii_uppercase());
                    out.push_str(chars.as_str());
                    out
                },
                _ => word.to_string(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
