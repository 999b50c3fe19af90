//! Abstract Normalizer: collapse 0..N abstract elements into one plain-text string

use crate::common::tree::Element;
use crate::common::xml_utils::{
    collapse_whitespace, decode_entities_bounded, replace_special_chars, strip_markup,
};
use crate::record::ABSENT;
use crate::schema::AbstractMode;

/// Normalize the abstract blocks of one article
///
/// Never returns an empty string: articles without abstract text get `.`.
pub fn normalize_abstract(blocks: &[&Element], mode: AbstractMode) -> String {
    let raw = match (blocks, mode) {
        ([], _) => return ABSENT.to_string(),
        ([single], AbstractMode::StructuralSections) if has_sections(single) => {
            sections_text(single)
        }
        ([single], _) => single.flat_text(),
        (many, AbstractMode::LabeledSections { label_attr }) => join_lines(
            many.iter().map(|block| labeled_text(block, label_attr)),
        ),
        (many, AbstractMode::StructuralSections) => match many.iter().find(|b| has_sections(b)) {
            Some(block) => sections_text(block),
            None => join_lines(many.iter().map(|block| block.flat_text())),
        },
    };

    let cleaned = clean_text(&raw);
    if cleaned.is_empty() {
        ABSENT.to_string()
    } else {
        cleaned
    }
}

/// Post-processing shared by every mode: strip tags, decode entities, swap special chars
///
/// Line breaks between sections survive; each line is trimmed.
pub fn clean_text(raw: &str) -> String {
    let stripped = strip_markup(raw);
    let decoded = decode_entities_bounded(&stripped);
    let replaced = replace_special_chars(&decoded);

    join_lines(replaced.lines().map(collapse_whitespace))
}

fn has_sections(block: &Element) -> bool {
    block.has_child("sec")
}

fn labeled_text(block: &Element, label_attr: &str) -> String {
    let text = block.flat_text();
    match block.attr(label_attr).map(str::trim).filter(|l| !l.is_empty()) {
        Some(label) if !text.is_empty() => format!("{label}: {text}"),
        _ => text,
    }
}

fn sections_text(block: &Element) -> String {
    join_lines(block.child_elements().filter(|c| c.name == "sec").map(|sec| {
        let body = collapse_whitespace(&sec.text_without_children(&["title"]));
        match sec.find_text("title") {
            Some(title) if !body.is_empty() => format!("{title}: {body}"),
            Some(title) => title,
            None => body,
        }
    }))
}

fn join_lines(lines: impl Iterator<Item = String>) -> String {
    lines.filter(|l| !l.is_empty()).collect::<Vec<_>>().join("\n")
}
