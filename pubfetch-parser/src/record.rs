//! The normalized article record and its serialized shape
//!
//! Every field is always present once serialized: optional text becomes the `.`
//! absent-marker, dates and years become empty strings, lists become empty arrays.

use serde::{Serialize, Serializer};

/// Placeholder written in place of missing optional text
pub const ABSENT: &str = ".";

/// One author as listed in the source document
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Author {
    pub last_name: Option<String>,
    pub fore_name: Option<String>,
    pub initials: Option<String>,
    pub collective_name: Option<String>,
    /// Affiliation texts attached to this author, in document order
    pub affiliations: Vec<String>,
    pub email: Option<String>,
}

impl Author {
    /// Given and family name joined with a space, skipping absent parts
    ///
    /// Falls back to the collective name for group authors.
    pub fn display_name(&self) -> String {
        let personal = [self.fore_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ");

        if personal.is_empty() {
            self.collective_name.clone().unwrap_or_default()
        } else {
            personal
        }
    }
}

/// Impact factor lookup outcome; serializes as the number or `.`
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ImpactFactor {
    Found(f64),
    NotFound,
}

impl ImpactFactor {
    pub fn value(&self) -> Option<f64> {
        match self {
            ImpactFactor::Found(v) => Some(*v),
            ImpactFactor::NotFound => None,
        }
    }
}

impl Serialize for ImpactFactor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ImpactFactor::Found(v) => serializer.serialize_f64(*v),
            ImpactFactor::NotFound => serializer.serialize_str(ABSENT),
        }
    }
}

/// Articles citing a record, from the link graph
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Citations {
    pub count: usize,
    pub links: Vec<String>,
}

impl Citations {
    pub fn new(links: Vec<String>) -> Self {
        Self {
            count: links.len(),
            links,
        }
    }
}

/// Fields attached after parsing; omitted from output until set
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Enrichment {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub impact_factor: Option<ImpactFactor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cited: Option<Citations>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub abstract_cn: Option<String>,
}

/// A flat, normalized bibliographic record for one article
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArticleRecord {
    #[serde(serialize_with = "or_absent")]
    pub pmid: Option<String>,
    pub title: String,
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    #[serde(serialize_with = "or_absent")]
    pub journal: Option<String>,
    #[serde(serialize_with = "or_absent")]
    pub med_abbr: Option<String>,
    #[serde(serialize_with = "or_absent")]
    pub iso_abbr: Option<String>,
    pub pubdate: String,
    pub pubmed_pubdate: String,
    #[serde(serialize_with = "or_absent")]
    pub pmc: Option<String>,
    #[serde(serialize_with = "or_absent")]
    pub issn: Option<String>,
    #[serde(serialize_with = "or_absent")]
    pub e_issn: Option<String>,
    #[serde(serialize_with = "or_absent")]
    pub doi: Option<String>,
    pub year: String,
    #[serde(serialize_with = "or_absent")]
    pub pagination: Option<String>,
    #[serde(serialize_with = "or_absent")]
    pub volume: Option<String>,
    #[serde(serialize_with = "or_absent")]
    pub issue: Option<String>,
    #[serde(serialize_with = "or_absent")]
    pub pub_status: Option<String>,
    #[serde(serialize_with = "author_names")]
    pub authors: Vec<Author>,
    pub keywords: Vec<String>,
    pub pub_types: Vec<String>,
    #[serde(serialize_with = "lines_or_absent")]
    pub author_mail: Vec<String>,
    #[serde(serialize_with = "or_absent")]
    pub author_first: Option<String>,
    #[serde(serialize_with = "or_absent")]
    pub author_last: Option<String>,
    pub affiliations: String,
    pub journal_date: String,
    #[serde(flatten)]
    pub enrichment: Enrichment,
}

impl ArticleRecord {
    /// Author display names in document order
    pub fn author_names(&self) -> Vec<String> {
        self.authors.iter().map(Author::display_name).collect()
    }

    /// The record's `author_mail` field as exported
    pub fn author_mail_text(&self) -> String {
        if self.author_mail.is_empty() {
            ABSENT.to_string()
        } else {
            self.author_mail.join("\n")
        }
    }

    pub fn has_abstract(&self) -> bool {
        self.abstract_text != ABSENT
    }
}

fn or_absent<S: Serializer>(value: &Option<String>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(value.as_deref().unwrap_or(ABSENT))
}

fn author_names<S: Serializer>(authors: &[Author], serializer: S) -> Result<S::Ok, S::Error> {
    let names = authors
        .iter()
        .map(Author::display_name)
        .collect::<Vec<_>>()
        .join("\n");
    serializer.serialize_str(&names)
}

fn lines_or_absent<S: Serializer>(lines: &[String], serializer: S) -> Result<S::Ok, S::Error> {
    if lines.is_empty() {
        serializer.serialize_str(ABSENT)
    } else {
        serializer.serialize_str(&lines.join("\n"))
    }
}
