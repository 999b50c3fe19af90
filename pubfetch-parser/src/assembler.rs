//! Record Assembler: one article subtree + a schema descriptor -> [`ArticleRecord`]

use tracing::{debug, instrument};

use crate::abstract_text::normalize_abstract;
use crate::authors::resolve_authors;
use crate::common::tree::Element;
use crate::common::xml_utils::{collapse_whitespace, strip_markup};
use crate::dates::{ResolvedDate, raw_date_text, render_date, resolve_date};
use crate::error::{ParseError, Result};
use crate::record::{ABSENT, ArticleRecord, Enrichment};
use crate::schema::SchemaDescriptor;

/// Build a record from one article container element
///
/// Only a missing required container is an error; every other missing field is
/// filled with its absent value.
#[instrument(skip_all, fields(variant = %descriptor.variant))]
pub fn assemble_record(article: &Element, descriptor: &SchemaDescriptor) -> Result<ArticleRecord> {
    if let Some(missing) = descriptor
        .required
        .iter()
        .find(|path| article.find(path).is_none())
    {
        return Err(ParseError::MissingElement {
            container: descriptor.container.to_string(),
            path: missing.to_string(),
        });
    }

    let pubdate = resolve_date(article, descriptor.pubdate);
    let history = if descriptor.pubmed_pubdate.is_empty() {
        pubdate
    } else {
        resolve_date(article, descriptor.pubmed_pubdate)
    };
    let journal_date = descriptor
        .journal_date
        .iter()
        .find_map(|path| article.find(path))
        .map(raw_date_text)
        .unwrap_or_default();

    let pub_status = if descriptor.pub_status_from_date {
        pubdate.map(|d| d.kind.to_string())
    } else {
        first_value(article, descriptor.pub_status)
    };

    let authors = resolve_authors(article, &descriptor.authors);
    let abstract_text = normalize_abstract(
        &article.find_all(descriptor.abstracts),
        descriptor.abstract_mode,
    );

    let record = ArticleRecord {
        pmid: first_value(article, descriptor.pmid),
        title: first_value(article, descriptor.title)
            .map(|t| collapse_whitespace(&strip_markup(&t)))
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| ABSENT.to_string()),
        abstract_text,
        journal: first_value(article, descriptor.journal),
        med_abbr: first_value(article, descriptor.med_abbr),
        iso_abbr: first_value(article, descriptor.iso_abbr),
        pubdate: render_date(pubdate.as_ref()).0,
        pubmed_pubdate: render_date(history.as_ref()).0,
        pmc: first_value(article, descriptor.pmc).map(|v| with_pmc_prefix(&v)),
        issn: first_value(article, descriptor.issn),
        e_issn: first_value(article, descriptor.e_issn),
        doi: first_value(article, descriptor.doi),
        year: resolve_year(history.as_ref(), pubdate.as_ref(), &journal_date),
        pagination: first_value(article, descriptor.pagination)
            .or_else(|| page_range(article, descriptor)),
        volume: first_value(article, descriptor.volume),
        issue: first_value(article, descriptor.issue),
        pub_status,
        authors: authors.authors,
        keywords: all_values(article, descriptor.keywords),
        pub_types: all_values(article, descriptor.pub_types),
        author_mail: authors.emails,
        author_first: authors.author_first,
        author_last: authors.author_last,
        affiliations: authors.affiliations.render(),
        journal_date,
        enrichment: Enrichment::default(),
    };

    debug!(
        pmid = record.pmid.as_deref().unwrap_or(ABSENT),
        authors = record.authors.len(),
        "Assembled record"
    );
    Ok(record)
}

/// First non-empty value across an ordered selector list
fn first_value(article: &Element, paths: &[&str]) -> Option<String> {
    paths.iter().find_map(|path| article.find_text(path))
}

/// Every non-empty value across all selectors, in selector then document order
fn all_values(article: &Element, paths: &[&str]) -> Vec<String> {
    paths
        .iter()
        .flat_map(|path| article.find_all_text(path))
        .filter(|v| !v.is_empty())
        .collect()
}

fn page_range(article: &Element, descriptor: &SchemaDescriptor) -> Option<String> {
    let (first, last) = descriptor.page_range?;
    let first = article.find_text(first)?;
    match article.find_text(last) {
        Some(last) if last != first => Some(format!("{first}-{last}")),
        _ => Some(first),
    }
}

fn with_pmc_prefix(value: &str) -> String {
    if value.starts_with("PMC") {
        value.to_string()
    } else {
        format!("PMC{value}")
    }
}

/// Year of the history date, else of the publication date, else the first
/// four-digit run of the raw journal date (`1998 Dec-1999 Jan` -> `1998`)
fn resolve_year(
    history: Option<&ResolvedDate>,
    pubdate: Option<&ResolvedDate>,
    journal_date: &str,
) -> String {
    if let Some(date) = history.or(pubdate) {
        return render_date(Some(date)).1;
    }
    journal_date
        .split(|c: char| !c.is_ascii_digit())
        .find(|part| part.len() == 4)
        .map(str::to_string)
        .unwrap_or_default()
}
