//! PMC efetch (JATS) XML parsing tests
//!
//! Fixture: `test_data/pmc_xml/efetch_sample.xml`, a research article with
//! cross-referenced affiliations and a correspondence note, and a sparse editorial
//! with a year-only print date.

use pubfetch_parser::{ArticleRecord, SchemaVariant, parse_pmc_xml, parse_records};

#[path = "../common/mod.rs"]
mod common;

fn sample_records() -> Vec<ArticleRecord> {
    parse_pmc_xml(&common::pmc_sample()).expect("Sample should parse")
}

#[test]
fn test_articles_in_document_order() {
    let records = sample_records();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].pmc.as_deref(), Some("PMC10821037"));
    assert_eq!(records[1].pmc.as_deref(), Some("PMC10000000"));
}

#[test]
fn test_research_article_identifiers() {
    let record = &sample_records()[0];
    assert_eq!(record.pmid.as_deref(), Some("38276672"));
    assert_eq!(record.doi.as_deref(), Some("10.3390/vaccines12010100"));
    assert_eq!(record.journal.as_deref(), Some("Vaccines"));
    assert_eq!(record.iso_abbr.as_deref(), Some("Vaccines (Basel)"));
    assert_eq!(record.med_abbr.as_deref(), Some("Vaccines (Basel)"));
    // Only an electronic ISSN exists: both fields fall back to it
    assert_eq!(record.issn.as_deref(), Some("2076-393X"));
    assert_eq!(record.e_issn.as_deref(), Some("2076-393X"));
    assert_eq!(record.volume.as_deref(), Some("12"));
    assert_eq!(record.issue.as_deref(), Some("1"));
    assert_eq!(record.pagination.as_deref(), Some("100"));
    assert_eq!(record.pub_types, vec!["research-article"]);
    assert_eq!(record.keywords, vec!["booster", "immunogenicity"]);
}

#[test]
fn test_title_markup_and_newlines() {
    let record = &sample_records()[0];
    assert_eq!(record.title, "Immunogenicity of a Booster Dose in Adults");
}

#[test]
fn test_epub_date_wins_and_sets_status() {
    let record = &sample_records()[0];
    assert_eq!(record.pubdate, "2024/01/18");
    assert_eq!(record.pubmed_pubdate, "2024/01/18");
    assert_eq!(record.year, "2024");
    assert_eq!(record.pub_status.as_deref(), Some("epub"));
    assert_eq!(record.journal_date, "2 2024");
}

#[test]
fn test_structural_abstract() {
    let record = &sample_records()[0];
    assert_eq!(
        record.abstract_text,
        "Background: Booster doses restore waning antibody titers.\n\
         Results: Titers rose 10 fold after 28 days (n = 120)."
    );
}

#[test]
fn test_cross_referenced_authors() {
    let record = &sample_records()[0];
    // The editor contrib is not an author
    assert_eq!(record.author_names(), vec!["Jane Doe", "John Roe"]);
    assert_eq!(
        record.affiliations,
        "1. Department of Immunology, University A, City 100, Country - ['Jane Doe', 'John Roe']\n\
         2. Institute B, City 200, Country - ['John Roe']"
    );
    assert_eq!(
        record.author_first.as_deref(),
        Some("Department of Immunology, University A, City 100, Country")
    );
    assert_eq!(
        record.author_last.as_deref(),
        Some("Institute B, City 200, Country")
    );
    assert_eq!(record.author_mail, vec!["Jane Doe: jane.doe@uni-a.edu"]);
    assert_eq!(record.authors[0].email.as_deref(), Some("jane.doe@uni-a.edu"));
    assert_eq!(record.authors[1].email, None);
}

#[test]
fn test_sparse_editorial() {
    let record = &sample_records()[1];
    assert_eq!(record.pmid, None);
    assert_eq!(record.doi, None);
    assert_eq!(record.title, "Editorial");
    assert_eq!(record.abstract_text, ".");
    assert_eq!(record.issn.as_deref(), Some("1234-5678"));
    assert_eq!(record.e_issn.as_deref(), Some("1234-5678"));
    assert_eq!(record.pagination.as_deref(), Some("1-2"));
    assert_eq!(record.author_names(), vec!["Editorial Board"]);
    assert_eq!(record.affiliations, "");
    assert_eq!(record.author_first, None);
    assert_eq!(
        record.author_mail,
        vec!["Correspondence to the editorial office."]
    );
}

#[test]
fn test_year_only_date_is_skipped() {
    let record = &sample_records()[1];
    assert_eq!(record.pubdate, "");
    assert_eq!(record.pubmed_pubdate, "");
    assert_eq!(record.pub_status, None);
    // The year still comes through the raw journal date
    assert_eq!(record.journal_date, "1867");
    assert_eq!(record.year, "1867");
}

#[test]
fn test_pmc_variant_ignores_pubmed_containers() {
    let records: Vec<_> = parse_records(common::pubmed_sample(), SchemaVariant::Pmc)
        .unwrap()
        .collect();
    assert!(records.is_empty());
}
