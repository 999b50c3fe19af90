//! Citation strings built from record fields
//!
//! - **AMA** - American Medical Association
//! - **MLA** - Modern Language Association
//! - **APA** - American Psychological Association
//! - **NLM** - National Library of Medicine
//!
//! Optional parts (issue, DOI, PMCID) are left out when absent; other slots show the
//! record's `.` marker.

use std::fmt;
use std::str::FromStr;

use pubfetch_parser::{ABSENT, ArticleRecord, Author};
use serde::{Deserialize, Serialize};

/// Authors listed in full by AMA before switching to "et al"
const AMA_MAX_AUTHORS: usize = 5;
const AMA_ET_AL_AUTHORS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CitationStyle {
    #[default]
    Ama,
    Mla,
    Apa,
    Nlm,
}

impl fmt::Display for CitationStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CitationStyle::Ama => "ama",
            CitationStyle::Mla => "mla",
            CitationStyle::Apa => "apa",
            CitationStyle::Nlm => "nlm",
        })
    }
}

impl FromStr for CitationStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ama" => Ok(CitationStyle::Ama),
            "mla" => Ok(CitationStyle::Mla),
            "apa" => Ok(CitationStyle::Apa),
            "nlm" => Ok(CitationStyle::Nlm),
            other => Err(format!(
                "unknown citation style '{other}', expected ama, mla, apa or nlm"
            )),
        }
    }
}

/// Trait for rendering a record as a citation
pub trait Cite {
    fn to_ama(&self) -> String;

    fn to_mla(&self) -> String;

    fn to_apa(&self) -> String;

    fn to_nlm(&self) -> String;

    fn cite(&self, style: CitationStyle) -> String {
        match style {
            CitationStyle::Ama => self.to_ama(),
            CitationStyle::Mla => self.to_mla(),
            CitationStyle::Apa => self.to_apa(),
            CitationStyle::Nlm => self.to_nlm(),
        }
    }
}

fn or_absent(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or(ABSENT)
}

/// "Last Initials", or the group name for collective authors
fn short_name(author: &Author) -> String {
    match (&author.last_name, &author.initials) {
        (Some(last), Some(initials)) => format!("{last} {initials}"),
        (Some(last), None) => last.clone(),
        _ => author.display_name(),
    }
}

/// "Last, F. M." with every initial dotted
fn apa_name(author: &Author) -> String {
    let Some(last) = &author.last_name else {
        return author.display_name();
    };
    match author.initials.as_deref().filter(|i| !i.is_empty()) {
        Some(initials) => {
            let dotted: Vec<String> = initials.chars().map(String::from).collect();
            format!("{last}, {}.", dotted.join(". "))
        }
        None => last.clone(),
    }
}

impl Cite for ArticleRecord {
    fn to_ama(&self) -> String {
        let authors = if self.authors.len() > AMA_MAX_AUTHORS {
            let listed: Vec<String> = self.authors[..AMA_ET_AL_AUTHORS]
                .iter()
                .map(short_name)
                .collect();
            format!("{} et al", listed.join(", "))
        } else {
            self.authors
                .iter()
                .map(short_name)
                .collect::<Vec<_>>()
                .join(", ")
        };

        let issue = self
            .issue
            .as_ref()
            .map(|issue| format!("({issue})"))
            .unwrap_or_default();
        let doi = self
            .doi
            .as_ref()
            .map(|doi| format!(" doi:{doi}"))
            .unwrap_or_default();

        format!(
            "{authors}. {} {}. {};{}{issue}:{}.{doi}",
            self.title,
            or_absent(&self.med_abbr),
            self.year,
            or_absent(&self.volume),
            or_absent(&self.pagination),
        )
    }

    fn to_mla(&self) -> String {
        let first_author = match self.authors.first() {
            Some(author) => match (&author.last_name, &author.fore_name) {
                (Some(last), Some(fore)) => format!("{last}, {fore} et al. "),
                _ => format!("{} et al. ", author.display_name()),
            },
            None => String::new(),
        };

        let issue = self
            .issue
            .as_ref()
            .map(|issue| format!(",{issue}"))
            .unwrap_or_default();
        let doi = self
            .doi
            .as_ref()
            .map(|doi| format!(" doi:{doi}"))
            .unwrap_or_default();

        format!(
            "{first_author}\u{201c}{}\u{201d} {} vol. {}{issue} ({}): {}.{doi}",
            self.title,
            or_absent(&self.journal),
            or_absent(&self.volume),
            self.year,
            or_absent(&self.pagination),
        )
    }

    fn to_apa(&self) -> String {
        let authors = match self.authors.split_last() {
            Some((last, [])) => apa_name(last),
            Some((last, rest)) => {
                let leading: Vec<String> = rest.iter().map(apa_name).collect();
                format!("{}, & {}", leading.join(", "), apa_name(last))
            }
            None => String::new(),
        };

        let issue = self
            .issue
            .as_ref()
            .map(|issue| format!("({issue})"))
            .unwrap_or_default();
        let doi = self
            .doi
            .as_ref()
            .map(|doi| format!(" https://doi.org/{doi}"))
            .unwrap_or_default();

        format!(
            "{authors} ({}). {} {}, {}{issue}, {}.{doi}",
            self.year,
            self.title,
            or_absent(&self.journal),
            or_absent(&self.volume),
            or_absent(&self.pagination),
        )
    }

    fn to_nlm(&self) -> String {
        let author_list = self
            .authors
            .iter()
            .map(|author| match &author.collective_name {
                Some(name) if author.last_name.is_none() => format!(";{name}"),
                _ => short_name(author),
            })
            .collect::<Vec<_>>()
            .join(", ");

        let issue = self
            .issue
            .as_ref()
            .map(|issue| format!("({issue})"))
            .unwrap_or_default();
        let doi = self
            .doi
            .as_ref()
            .map(|doi| format!(" doi:{doi}. "))
            .unwrap_or_else(|| " ".to_string());

        let mut citation = format!(
            "{author_list}. {} {}. {};{}{issue}:{}.{doi}PMID:{}",
            self.title,
            or_absent(&self.med_abbr),
            self.pubdate,
            or_absent(&self.volume),
            or_absent(&self.pagination),
            or_absent(&self.pmid),
        );
        if let Some(pmc) = &self.pmc {
            citation.push_str(&format!("; PMCID: {pmc}."));
        }
        citation
    }
}
