//! PubMed efetch XML parsing tests
//!
//! Fixture: `test_data/pubmed_xml/efetch_sample.xml`, two complete articles (one
//! structured and fully populated, one sparse letter with a `MedlineDate`) followed by
//! an article without a PMID.

use pubfetch_parser::{
    ArticleRecord, ParseError, SchemaVariant, XmlSource, parse_pubmed_xml, parse_records,
};
use tracing_test::traced_test;

#[path = "../common/mod.rs"]
mod common;

fn sample_records() -> Vec<ArticleRecord> {
    parse_pubmed_xml(&common::pubmed_sample()).expect("Sample should parse")
}

#[test]
#[traced_test]
fn test_invalid_article_is_skipped() {
    let records = sample_records();
    assert_eq!(records.len(), 2);
    assert!(logs_contain("Failed to parse article, skipping"));
}

#[test]
fn test_lazy_iterator_reports_invalid_article_in_place() {
    let results: Vec<_> = parse_records(common::pubmed_sample(), SchemaVariant::PubMed)
        .unwrap()
        .collect();
    assert_eq!(results.len(), 3);
    assert!(results[0].is_ok());
    assert!(results[1].is_ok());
    assert!(matches!(
        results[2],
        Err(ParseError::MissingElement { ref path, .. }) if path == "MedlineCitation/PMID"
    ));
}

#[test]
fn test_identifiers_and_journal() {
    let record = &sample_records()[0];
    assert_eq!(record.pmid.as_deref(), Some("31978945"));
    assert_eq!(record.doi.as_deref(), Some("10.1056/NEJMoa2001017"));
    assert_eq!(record.pmc.as_deref(), Some("PMC7092803"));
    assert_eq!(record.issn.as_deref(), Some("0028-4793"));
    assert_eq!(record.e_issn.as_deref(), Some("1533-4406"));
    assert_eq!(
        record.journal.as_deref(),
        Some("The New England journal of medicine")
    );
    assert_eq!(record.iso_abbr.as_deref(), Some("N Engl J Med"));
    assert_eq!(record.med_abbr.as_deref(), Some("N Engl J Med"));
    assert_eq!(record.volume.as_deref(), Some("382"));
    assert_eq!(record.issue.as_deref(), Some("8"));
    assert_eq!(record.pagination.as_deref(), Some("727-733"));
    assert_eq!(record.pub_status.as_deref(), Some("ppublish"));
}

#[test]
fn test_title_whitespace_is_collapsed() {
    let records = sample_records();
    assert_eq!(
        records[0].title,
        "A Novel Coronavirus from Patients with Pneumonia in China, 2019."
    );
    assert_eq!(records[1].title, "Letter: on pathology reporting.");
}

#[test]
fn test_dates() {
    let record = &sample_records()[0];
    // Electronic article date wins over the journal issue date
    assert_eq!(record.pubdate, "2020/01/24");
    // pubmed history entry wins over entrez and medline
    assert_eq!(record.pubmed_pubdate, "2020/01/25");
    assert_eq!(record.year, "2020");
    assert_eq!(record.journal_date, "2020 Feb 20");
}

#[test]
fn test_medline_date_only() {
    let record = &sample_records()[1];
    assert_eq!(record.pubdate, "");
    assert_eq!(record.pubmed_pubdate, "");
    assert_eq!(record.journal_date, "1998 Dec-1999 Jan");
    assert_eq!(record.year, "1998");
}

#[test]
fn test_labeled_abstract() {
    let record = &sample_records()[0];
    let lines: Vec<&str> = record.abstract_text.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with("BACKGROUND: In December 2019"));
    assert_eq!(
        lines[1],
        "METHODS: Bronchoalveolar lavage samples were analyzed with unbiased sequencing & culture."
    );
    assert_eq!(
        lines[2],
        "RESULTS: A novel \u{3b2}-coronavirus was identified (P<0.05)."
    );
}

#[test]
fn test_authors_and_affiliations() {
    let record = &sample_records()[0];
    assert_eq!(
        record.author_names(),
        vec![
            "Na Zhu",
            "Dingyu Zhang",
            "Wenjie Tan",
            "China Novel Coronavirus Investigating and Research Team",
        ]
    );
    assert_eq!(
        record.affiliations,
        "1. NHC Key Laboratory of Biosafety, Beijing, China. - ['Na Zhu', 'Wenjie Tan']\n\
         2. Wuhan Jinyintan Hospital, Wuhan, China. - ['Dingyu Zhang']\n\
         3. NHC Key Laboratory of Biosafety, Beijing, China. tanwj@ivdc.chinacdc.cn. - ['Wenjie Tan']"
    );
    assert_eq!(
        record.author_first.as_deref(),
        Some("NHC Key Laboratory of Biosafety, Beijing, China.")
    );
    assert_eq!(
        record.author_last.as_deref(),
        Some("NHC Key Laboratory of Biosafety, Beijing, China.")
    );
    assert_eq!(record.author_mail, vec!["Wenjie Tan: tanwj@ivdc.chinacdc.cn"]);
}

#[test]
fn test_sparse_letter() {
    let record = &sample_records()[1];
    assert_eq!(record.abstract_text, ".");
    assert_eq!(record.doi, None);
    assert_eq!(record.pmc, None);
    assert_eq!(record.e_issn, None);
    assert_eq!(record.pagination.as_deref(), Some("E1"));
    assert_eq!(record.pub_types, vec!["Letter"]);
    assert!(record.keywords.is_empty());
    assert_eq!(
        record.affiliations,
        "1. Department of Pathology, Dublin. - [\"Miles O'Brien\"]"
    );
    assert_eq!(record.author_first.as_deref(), Some("Department of Pathology, Dublin."));
    assert_eq!(record.author_last, None);
    assert!(record.author_mail.is_empty());
}

#[test]
fn test_keywords_and_publication_types() {
    let record = &sample_records()[0];
    assert_eq!(record.keywords, vec!["coronavirus", "pneumonia"]);
    assert_eq!(
        record.pub_types,
        vec!["Journal Article", "Research Support, Non-U.S. Gov't"]
    );
}

#[test]
fn test_serialized_shape() {
    let record = &sample_records()[1];
    let value = serde_json::to_value(record).unwrap();
    assert_eq!(value["pmid"], "10051234");
    assert_eq!(value["abstract"], ".");
    assert_eq!(value["doi"], ".");
    assert_eq!(value["author_mail"], ".");
    assert_eq!(value["author_last"], ".");
    assert_eq!(value["pubdate"], "");
    assert_eq!(value["authors"], "Miles O'Brien");
    assert_eq!(value["keywords"], serde_json::json!([]));
    // Enrichment fields are only present once attached
    assert!(value.get("impact_factor").is_none());
    assert!(value.get("cited").is_none());
    assert!(value.get("abstract_cn").is_none());
}

#[test]
fn test_parse_from_file_path() {
    let path = common::fixture_path("pubmed_xml", "efetch_sample.xml");
    let source = XmlSource::detect(path.to_string_lossy());
    assert!(matches!(source, XmlSource::Path(_)));

    let pmids: Vec<String> = parse_records(source, SchemaVariant::PubMed)
        .unwrap()
        .filter_map(|r| r.ok())
        .filter_map(|r| r.pmid)
        .collect();
    assert_eq!(pmids, vec!["31978945", "10051234"]);
}

#[test]
fn test_missing_file_fails_immediately() {
    let result = parse_records(
        XmlSource::Path("does/not/exist.xml".into()),
        SchemaVariant::PubMed,
    );
    assert!(matches!(result, Err(ParseError::IoError { .. })));
}
