//! Outline (`llms.txt`) parsing.
//!
//! The outline is a markdown table of contents: a level-1 title, an optional
//! blockquote summary, and headings whose bullet lists link to the pages of
//! the corpus. Parsing uses the tree-sitter markdown block grammar for the
//! document structure and the inline grammar for list-item links.
//!
//! Sections are collected into an arena first. The open-section stack holds
//! arena indices, and the finished arena is turned into an owned
//! [`Section`] tree at the end.

use tree_sitter::{Node, Parser};

use crate::{Error, Link, Outline, Result, Section};

/// Parser for outline documents.
///
/// Holds one tree-sitter parser per grammar; reuse it across documents.
pub struct OutlineParser {
    block: Parser,
    inline: Parser,
}

impl OutlineParser {
    /// Load the markdown block and inline grammars.
    pub fn new() -> Result<Self> {
        let mut block = Parser::new();
        block
            .set_language(&tree_sitter_md::LANGUAGE.into())
            .map_err(|e| Error::Parse(format!("Failed to set block language: {e}")))?;

        let mut inline = Parser::new();
        inline
            .set_language(&tree_sitter_md::INLINE_LANGUAGE.into())
            .map_err(|e| Error::Parse(format!("Failed to set inline language: {e}")))?;

        Ok(Self { block, inline })
    }

    /// Parse an outline document.
    ///
    /// Malformed markdown is tolerated. Only a parser that produces no tree
    /// at all yields [`Error::Parse`].
    pub fn parse(&mut self, text: &str) -> Result<Outline> {
        let tree = self
            .block
            .parse(text, None)
            .ok_or_else(|| Error::Parse("Failed to parse outline markdown".into()))?;

        let mut builder = OutlineBuilder::default();
        self.visit(tree.root_node(), text, &mut builder);
        Ok(builder.finish())
    }

    fn visit(&mut self, node: Node<'_>, text: &str, builder: &mut OutlineBuilder) {
        match node.kind() {
            "atx_heading" | "setext_heading" => {
                if let Some(level) = heading_level(node) {
                    builder.heading(level, heading_text(node, text));
                }
            },
            "block_quote" => builder.quote(&blockquote_text(node, text)),
            "list_item" => {
                // Nested list items are deliberately not visited.
                if let Some(link) = self.list_item_link(node, text) {
                    builder.link(link);
                }
            },
            _ => {
                let mut cursor = node.walk();
                let children: Vec<Node<'_>> = node.children(&mut cursor).collect();
                for child in children {
                    self.visit(child, text, builder);
                }
            },
        }
    }

    fn list_item_link(&mut self, item: Node<'_>, text: &str) -> Option<Link> {
        let mut cursor = item.walk();
        let first_block = item
            .children(&mut cursor)
            .find(|child| !child.kind().starts_with("list_marker") && child.kind() != "block_continuation")?;
        if first_block.kind() != "paragraph" {
            return None;
        }

        let mut cursor = first_block.walk();
        let inline = first_block
            .children(&mut cursor)
            .find(|child| child.kind() == "inline")?;

        parse_leading_link(&mut self.inline, node_text(inline, text))
    }
}

/// Recognize `[title](url): description` at the start of inline text.
fn parse_leading_link(parser: &mut Parser, text: &str) -> Option<Link> {
    let text = text.trim_start();
    let tree = parser.parse(text, None)?;
    let root = tree.root_node();

    let mut cursor = root.walk();
    let first = root.named_children(&mut cursor).next()?;
    if first.kind() != "inline_link" || first.start_byte() != 0 {
        return None;
    }

    let mut title = String::new();
    let mut url = None;
    let mut cursor = first.walk();
    for child in first.named_children(&mut cursor) {
        match child.kind() {
            "link_text" => title = collapse_whitespace(node_text(child, text)),
            "link_destination" => {
                let dest = node_text(child, text).trim();
                let dest = dest
                    .strip_prefix('<')
                    .and_then(|d| d.strip_suffix('>'))
                    .unwrap_or(dest);
                url = Some(dest.to_string());
            },
            _ => {},
        }
    }

    let description = text
        .get(first.end_byte()..)
        .unwrap_or_default()
        .trim_start_matches([':', ' ']);

    Some(Link {
        title,
        url: url?,
        description: collapse_whitespace(description),
    })
}

fn heading_level(node: Node<'_>) -> Option<usize> {
    let mut cursor = node.walk();
    node.children(&mut cursor).find_map(|child| match child.kind() {
        "setext_h1_underline" => Some(1),
        "setext_h2_underline" => Some(2),
        kind => kind
            .strip_prefix("atx_h")
            .and_then(|rest| rest.strip_suffix("_marker"))
            .and_then(|digit| digit.parse().ok()),
    })
}

fn heading_text(node: Node<'_>, text: &str) -> String {
    let mut cursor = node.walk();
    let content = node
        .children(&mut cursor)
        .find(|child| matches!(child.kind(), "inline" | "paragraph"));

    match content {
        Some(content) => collapse_whitespace(node_text(content, text)),
        None => node_text(node, text)
            .trim()
            .trim_matches('#')
            .trim()
            .to_string(),
    }
}

fn blockquote_text(node: Node<'_>, text: &str) -> String {
    node_text(node, text)
        .lines()
        .map(|line| line.trim_start().trim_start_matches('>').trim())
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

fn node_text<'t>(node: Node<'_>, text: &'t str) -> &'t str {
    text.get(node.byte_range()).unwrap_or_default()
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

struct SectionNode {
    title: String,
    level: usize,
    links: Vec<Link>,
    children: Vec<usize>,
}

#[derive(Default)]
struct OutlineBuilder {
    title: Option<String>,
    summary: Option<String>,
    nodes: Vec<SectionNode>,
    roots: Vec<usize>,
    open: Vec<usize>,
}

impl OutlineBuilder {
    fn heading(&mut self, level: usize, title: String) {
        if level <= 1 {
            if self.title.is_none() {
                self.title = Some(title);
            }
            return;
        }

        while let Some(&top) = self.open.last() {
            if self.nodes[top].level >= level {
                self.open.pop();
            } else {
                break;
            }
        }

        let handle = self.nodes.len();
        self.nodes.push(SectionNode {
            title,
            level,
            links: Vec::new(),
            children: Vec::new(),
        });
        match self.open.last() {
            Some(&parent) => self.nodes[parent].children.push(handle),
            None => self.roots.push(handle),
        }
        self.open.push(handle);
    }

    fn quote(&mut self, text: &str) {
        if self.summary.is_none() && !text.is_empty() {
            self.summary = Some(text.to_string());
        }
    }

    fn link(&mut self, link: Link) {
        if let Some(&top) = self.open.last() {
            self.nodes[top].links.push(link);
        }
    }

    fn finish(self) -> Outline {
        let sections = self.roots.iter().map(|&h| self.materialize(h)).collect();
        Outline {
            title: self.title.unwrap_or_default(),
            summary: self.summary.unwrap_or_default(),
            sections,
        }
    }

    fn materialize(&self, handle: usize) -> Section {
        let node = &self.nodes[handle];
        Section {
            title: node.title.clone(),
            level: node.level,
            links: node.links.clone(),
            children: node
                .children
                .iter()
                .map(|&child| self.materialize(child))
                .collect(),
        }
    }
}

impl Outline {
    /// Every link in the outline, depth-first in document order.
    pub fn all_links(&self) -> Vec<&Link> {
        fn collect<'a>(section: &'a Section, out: &mut Vec<&'a Link>) {
            out.extend(section.links.iter());
            for child in &section.children {
                collect(child, out);
            }
        }

        let mut links = Vec::new();
        for section in &self.sections {
            collect(section, &mut links);
        }
        links
    }

    /// Find a section anywhere in the tree by case-insensitive title.
    pub fn find_section(&self, title: &str) -> Option<&Section> {
        fn find<'a>(sections: &'a [Section], wanted: &str) -> Option<&'a Section> {
            sections.iter().find_map(|section| {
                if section.title.to_lowercase() == wanted {
                    Some(section)
                } else {
                    find(&section.children, wanted)
                }
            })
        }

        find(&self.sections, &title.to_lowercase())
    }

    /// Titles of every section, depth-first in document order.
    pub fn section_titles(&self) -> Vec<&str> {
        fn collect<'a>(section: &'a Section, out: &mut Vec<&'a str>) {
            out.push(&section.title);
            for child in &section.children {
                collect(child, out);
            }
        }

        let mut titles = Vec::new();
        for section in &self.sections {
            collect(section, &mut titles);
        }
        titles
    }
}
