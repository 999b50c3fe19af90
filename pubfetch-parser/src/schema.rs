//! Schema-variant descriptors
//!
//! A [`SchemaDescriptor`] maps each logical record field to an ordered list of
//! selectors (see [`crate::common::select`]); the first selector yielding a non-empty
//! value wins. The record assembler is written once against this table, so the
//! PubMed and PMC variants differ only in data.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::pmc::PMC_SCHEMA;
use crate::pubmed::PUBMED_SCHEMA;

/// The supported source document shapes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaVariant {
    /// PubMed metadata XML (`PubmedArticle` containers)
    PubMed,
    /// PMC full-text JATS XML (`article` containers)
    Pmc,
}

impl SchemaVariant {
    pub fn descriptor(self) -> &'static SchemaDescriptor {
        match self {
            SchemaVariant::PubMed => &PUBMED_SCHEMA,
            SchemaVariant::Pmc => &PMC_SCHEMA,
        }
    }

    /// E-utilities database name for this variant
    pub fn database(self) -> &'static str {
        match self {
            SchemaVariant::PubMed => "pubmed",
            SchemaVariant::Pmc => "pmc",
        }
    }
}

impl fmt::Display for SchemaVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.database())
    }
}

impl FromStr for SchemaVariant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pubmed" => Ok(SchemaVariant::PubMed),
            "pmc" => Ok(SchemaVariant::Pmc),
            other => Err(format!("unknown database '{other}', expected pubmed or pmc")),
        }
    }
}

/// How multiple abstract elements are merged
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbstractMode {
    /// Each element may carry a label attribute: `"{label}: {text}"` per line
    LabeledSections { label_attr: &'static str },
    /// Use the first block with nested `sec` elements, section titles as labels
    StructuralSections,
}

/// One entry of a date preference list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateCandidate {
    /// Label reported for the resolved date (`pubmed`, `epub`, ...)
    pub kind: &'static str,
    /// Selector for the element holding year/month/day children
    pub path: &'static str,
}

/// Authors whose affiliations are repeated inline per author (PubMed)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InlineAuthors {
    pub authors: &'static str,
    pub given: &'static [&'static str],
    pub family: &'static [&'static str],
    pub initials: &'static [&'static str],
    pub collective: &'static [&'static str],
    pub affiliations: &'static [&'static str],
}

/// Authors pointing at affiliation and correspondence blocks by id (PMC)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CrossReferencedAuthors {
    pub authors: &'static str,
    pub given: &'static [&'static str],
    pub family: &'static [&'static str],
    pub collective: &'static [&'static str],
    pub affiliation_xrefs: &'static [&'static str],
    pub correspondence_xrefs: &'static [&'static str],
    /// Affiliations nested directly in the author element
    pub inline_affiliations: &'static [&'static str],
    /// Emails nested directly in the author element
    pub inline_emails: &'static [&'static str],
    pub affiliation_blocks: &'static [&'static str],
    pub correspondence_blocks: &'static [&'static str],
    /// Child elements excluded from affiliation block text (footnote labels)
    pub affiliation_label: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthorScheme {
    Inline(InlineAuthors),
    CrossReferenced(CrossReferencedAuthors),
}

/// Selector table driving the record assembler for one schema variant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchemaDescriptor {
    pub variant: SchemaVariant,
    /// Name of the article container element
    pub container: &'static str,
    /// Elements that must exist for an article to be assembled at all
    pub required: &'static [&'static str],

    pub pmid: &'static [&'static str],
    pub pmc: &'static [&'static str],
    pub doi: &'static [&'static str],
    pub issn: &'static [&'static str],
    pub e_issn: &'static [&'static str],
    pub journal: &'static [&'static str],
    pub iso_abbr: &'static [&'static str],
    pub med_abbr: &'static [&'static str],
    pub title: &'static [&'static str],
    pub volume: &'static [&'static str],
    pub issue: &'static [&'static str],
    pub pagination: &'static [&'static str],
    /// `(first, last)` page selectors used when no pagination string exists
    pub page_range: Option<(&'static str, &'static str)>,
    pub keywords: &'static [&'static str],
    pub pub_types: &'static [&'static str],
    pub pub_status: &'static [&'static str],
    /// Report the kind of the resolved publication date as the status
    pub pub_status_from_date: bool,

    pub abstracts: &'static str,
    pub abstract_mode: AbstractMode,

    pub pubdate: &'static [DateCandidate],
    /// Empty means `pubmed_pubdate` mirrors `pubdate`
    pub pubmed_pubdate: &'static [DateCandidate],
    /// Elements whose child texts form the raw journal date
    pub journal_date: &'static [&'static str],

    pub authors: AuthorScheme,
}
