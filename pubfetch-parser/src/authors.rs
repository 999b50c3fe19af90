//! Author/Affiliation Resolver
//!
//! Produces ordered authors, an insertion-ordered affiliation index with the authors
//! attached to each affiliation, `"Name: email"` lines and the first/last author
//! affiliation. PubMed repeats affiliation text per author and is de-duplicated by
//! value; PMC points at `aff` blocks by id.

use std::collections::HashMap;

use tracing::debug;

use crate::common::tree::Element;
use crate::common::xml_utils::{collapse_whitespace, extract_email};
use crate::record::Author;
use crate::schema::{AuthorScheme, CrossReferencedAuthors, InlineAuthors};

/// One de-duplicated affiliation and the authors attached to it
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AffiliationEntry {
    pub text: String,
    pub authors: Vec<String>,
}

/// Insertion-ordered set of affiliations, unique by text
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AffiliationIndex {
    entries: Vec<AffiliationEntry>,
    positions: HashMap<String, usize>,
}

impl AffiliationIndex {
    /// Insert `text` if unseen and return its position either way
    pub fn insert(&mut self, text: &str) -> usize {
        if let Some(&position) = self.positions.get(text) {
            return position;
        }
        let position = self.entries.len();
        self.entries.push(AffiliationEntry {
            text: text.to_string(),
            authors: Vec::new(),
        });
        self.positions.insert(text.to_string(), position);
        position
    }

    /// Attach an author to the affiliation at `position`, once
    pub fn add_author(&mut self, position: usize, name: &str) {
        if let Some(entry) = self.entries.get_mut(position) {
            if !entry.authors.iter().any(|a| a == name) {
                entry.authors.push(name.to_string());
            }
        }
    }

    pub fn get(&self, position: usize) -> Option<&AffiliationEntry> {
        self.entries.get(position)
    }

    pub fn entries(&self) -> &[AffiliationEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `"1. {text} - ['A', 'B']"` lines, 1-based, in first-occurrence order
    pub fn render(&self) -> String {
        self.entries
            .iter()
            .enumerate()
            .map(|(i, entry)| {
                format!("{}. {} - {}", i + 1, entry.text, quoted_list(&entry.authors))
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Render names the way a bracketed list literal reads: `['Jane Doe', "Miles O'Brien"]`
fn quoted_list(names: &[String]) -> String {
    let quoted = names
        .iter()
        .map(|name| {
            if name.contains('\'') && !name.contains('"') {
                format!("\"{name}\"")
            } else {
                format!("'{}'", name.replace('\'', "\\'"))
            }
        })
        .collect::<Vec<_>>()
        .join(", ");
    format!("[{quoted}]")
}

/// Everything the record needs from the author list
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AuthorSummary {
    pub authors: Vec<Author>,
    pub affiliations: AffiliationIndex,
    /// `"Name: email"` lines, or the correspondence text fallback
    pub emails: Vec<String>,
    pub author_first: Option<String>,
    pub author_last: Option<String>,
}

/// Resolve authors and affiliations for one article
pub fn resolve_authors(article: &Element, scheme: &AuthorScheme) -> AuthorSummary {
    let mut summary = match scheme {
        AuthorScheme::Inline(inline) => resolve_inline(article, inline),
        AuthorScheme::CrossReferenced(xref) => resolve_cross_referenced(article, xref),
    };

    // author_first/author_last come from the flattened author -> affiliation pairs
    let associations: Vec<&String> = summary
        .authors
        .iter()
        .flat_map(|a| a.affiliations.iter())
        .collect();
    summary.author_first = associations.first().map(|s| s.to_string());
    summary.author_last = match associations.as_slice() {
        [_, .., last] => Some(last.to_string()),
        _ => None,
    };

    debug!(
        authors = summary.authors.len(),
        affiliations = summary.affiliations.len(),
        emails = summary.emails.len(),
        "Resolved authors"
    );
    summary
}

fn first_text(element: &Element, paths: &[&str]) -> Option<String> {
    paths.iter().find_map(|path| element.find_text(path))
}

fn push_unique(list: &mut Vec<String>, value: String) {
    if !list.contains(&value) {
        list.push(value);
    }
}

fn resolve_inline(article: &Element, scheme: &InlineAuthors) -> AuthorSummary {
    let mut summary = AuthorSummary::default();

    for element in article.find_all(scheme.authors) {
        let mut author = Author {
            last_name: first_text(element, scheme.family),
            fore_name: first_text(element, scheme.given),
            initials: first_text(element, scheme.initials),
            collective_name: first_text(element, scheme.collective),
            ..Default::default()
        };
        let name = author.display_name();

        for path in scheme.affiliations {
            for affiliation in element.find_all(path) {
                let text = affiliation.flat_text();
                if text.is_empty() {
                    continue;
                }

                let position = summary.affiliations.insert(&text);
                summary.affiliations.add_author(position, &name);

                if let Some(email) = extract_email(&text) {
                    author.email.get_or_insert_with(|| email.clone());
                    push_unique(&mut summary.emails, format!("{name}: {email}"));
                }
                push_unique(&mut author.affiliations, text);
            }
        }

        summary.authors.push(author);
    }

    summary
}

fn resolve_cross_referenced(article: &Element, scheme: &CrossReferencedAuthors) -> AuthorSummary {
    let mut summary = AuthorSummary::default();

    // Affiliation blocks in document order, addressable by id
    let mut affiliation_ids: HashMap<String, usize> = HashMap::new();
    for path in scheme.affiliation_blocks {
        for block in article.find_all(path) {
            let text = collapse_whitespace(&block.text_without_children(&[scheme.affiliation_label]));
            if text.is_empty() {
                continue;
            }
            let position = summary.affiliations.insert(&text);
            if let Some(id) = block.attr("id") {
                affiliation_ids.insert(id.to_string(), position);
            }
        }
    }

    // Correspondence id -> email, built before any author refers to it
    let correspondence: Vec<&Element> = scheme
        .correspondence_blocks
        .iter()
        .flat_map(|path| article.find_all(path))
        .collect();
    let mut emails_by_id: HashMap<&str, String> = HashMap::new();
    for block in &correspondence {
        let email = block
            .find_text("email")
            .or_else(|| extract_email(&block.text()));
        if let (Some(id), Some(email)) = (block.attr("id"), email) {
            emails_by_id.insert(id, email);
        }
    }

    for element in article.find_all(scheme.authors) {
        let mut author = Author {
            last_name: first_text(element, scheme.family),
            fore_name: first_text(element, scheme.given),
            collective_name: first_text(element, scheme.collective),
            ..Default::default()
        };
        let name = author.display_name();

        for path in scheme.affiliation_xrefs {
            for xref in element.find_all(path) {
                let rids = xref.attr("rid").unwrap_or_default();
                for rid in rids.split_whitespace() {
                    let Some(&position) = affiliation_ids.get(rid) else {
                        debug!(rid, "Affiliation reference without a matching block");
                        continue;
                    };
                    summary.affiliations.add_author(position, &name);
                    if let Some(entry) = summary.affiliations.get(position) {
                        push_unique(&mut author.affiliations, entry.text.clone());
                    }
                }
            }
        }

        for path in scheme.inline_affiliations {
            for affiliation in element.find_all(path) {
                let text = collapse_whitespace(
                    &affiliation.text_without_children(&[scheme.affiliation_label]),
                );
                if text.is_empty() {
                    continue;
                }
                let position = summary.affiliations.insert(&text);
                summary.affiliations.add_author(position, &name);
                push_unique(&mut author.affiliations, text);
            }
        }

        for path in scheme.correspondence_xrefs {
            for xref in element.find_all(path) {
                let rids = xref.attr("rid").unwrap_or_default();
                for rid in rids.split_whitespace() {
                    if let Some(email) = emails_by_id.get(rid) {
                        author.email.get_or_insert_with(|| email.clone());
                        push_unique(&mut summary.emails, format!("{name}: {email}"));
                    }
                }
            }
        }

        if let Some(email) = first_text(element, scheme.inline_emails) {
            author.email.get_or_insert_with(|| email.clone());
            push_unique(&mut summary.emails, format!("{name}: {email}"));
        }

        summary.authors.push(author);
    }

    if summary.emails.is_empty() {
        summary.emails = correspondence
            .iter()
            .map(|block| block.flat_text())
            .filter(|text| !text.is_empty())
            .collect();
    }

    summary
}
