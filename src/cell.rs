//! Text extraction from infobox data cells.
//!
//! A cell is read in tiers: link texts, then span texts, then bare text
//! nodes. The first tier that yields anything wins. Footnotes, edit links,
//! small print and images never contribute text.

use std::collections::HashSet;

use scraper::node::Element;
use scraper::{ElementRef, Node};

use crate::clean::SEPARATOR;

/// Link texts containing these (lowercased) are image captions, not values
const IMAGE_MARKERS: [&str; 4] = ["файл:", "изображение", "картинка", "icon"];

/// Raw text nodes starting with these are annotations or bullets
const RAW_SKIP_PREFIXES: [char; 5] = ['(', '[', '—', '\n', '•'];

/// Raw text nodes ending with these are labels
const RAW_SKIP_SUFFIXES: [char; 2] = [':', ';'];

const ANNOTATION_TAGS: [&str; 3] = ["sup", "small", "img"];
const ANNOTATION_CLASSES: [&str; 2] = ["mw-editsection", "reference"];

/// Extraction tier, tried in `Tier::ORDER`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    Links,
    Spans,
    RawText,
}

impl Tier {
    pub const ORDER: [Tier; 3] = [Tier::Links, Tier::Spans, Tier::RawText];

    /// Distinct tokens this tier finds in the cell, in document order
    pub fn collect(&self, cell: ElementRef) -> Vec<String> {
        let candidates: Vec<String> = match self {
            Tier::Links => visible_elements(cell)
                .into_iter()
                .filter(|el| el.value().name() == "a")
                .map(visible_text)
                .filter(|text| !is_image_caption(text))
                .collect(),
            Tier::Spans => visible_elements(cell)
                .into_iter()
                .filter(|el| el.value().name() == "span")
                .map(visible_text)
                .collect(),
            Tier::RawText => visible_text_nodes(cell)
                .into_iter()
                .filter(|text| {
                    !text.starts_with(RAW_SKIP_PREFIXES) && !text.ends_with(RAW_SKIP_SUFFIXES)
                })
                .collect(),
        };

        distinct_tokens(candidates)
    }
}

/// Pipe-joined distinct tokens of the first productive tier, or ""
pub fn extract_cell_text(cell: ElementRef) -> String {
    Tier::ORDER
        .iter()
        .map(|tier| tier.collect(cell))
        .find(|tokens| !tokens.is_empty())
        .map(|tokens| tokens.join(SEPARATOR))
        .unwrap_or_default()
}

/// Trim, drop one-character tokens, dedup case-sensitively keeping first-seen order
fn distinct_tokens(candidates: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    candidates
        .into_iter()
        .map(|t| t.trim().to_string())
        .filter(|t| t.chars().count() > 1)
        .filter(|t| seen.insert(t.clone()))
        .collect()
}

fn is_image_caption(text: &str) -> bool {
    let lower = text.to_lowercase();
    IMAGE_MARKERS.iter().any(|m| lower.contains(m))
}

fn is_annotation(element: &Element) -> bool {
    ANNOTATION_TAGS.contains(&element.name())
        || element.classes().any(|c| ANNOTATION_CLASSES.contains(&c))
}

/// Descendant elements in document order, skipping annotation subtrees
fn visible_elements(root: ElementRef) -> Vec<ElementRef> {
    let mut out = Vec::new();
    for child in root.children() {
        if let Some(el) = ElementRef::wrap(child) {
            if is_annotation(el.value()) {
                continue;
            }
            out.push(el);
            out.extend(visible_elements(el));
        }
    }
    out
}

/// Descendant text nodes (trimmed, non-empty), skipping annotation subtrees
fn visible_text_nodes(root: ElementRef) -> Vec<String> {
    let mut out = Vec::new();
    collect_text_nodes(root, &mut out);
    out.into_iter()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect()
}

fn collect_text_nodes(root: ElementRef, out: &mut Vec<String>) {
    for child in root.children() {
        match child.value() {
            Node::Text(text) => out.push(String::from(&**text)),
            Node::Element(element) if !is_annotation(element) => {
                if let Some(el) = ElementRef::wrap(child) {
                    collect_text_nodes(el, out);
                }
            }
            _ => {}
        }
    }
}

/// Whitespace-collapsed visible text of an element
fn visible_text(el: ElementRef) -> String {
    let mut parts = Vec::new();
    collect_text_nodes(el, &mut parts);
    parts.concat().split_whitespace().collect::<Vec<_>>().join(" ")
}
