//! Citation strings for parsed PubMed records

#[path = "../common/mod.rs"]
mod common;

use common::citation_records;
use pubfetch_formatter::{CitationStyle, Cite};
use rstest::rstest;

const NEJM_TITLE: &str = "A Novel Coronavirus from Patients with Pneumonia in China, 2019.";

#[rstest]
#[case(
    CitationStyle::Ama,
    format!("Zhu N, Zhang D, Wang W et al. {NEJM_TITLE} N Engl J Med. 2020;382(8):727-733. doi:10.1056/NEJMoa2001017")
)]
#[case(
    CitationStyle::Mla,
    format!("Zhu, Na et al. \u{201c}{NEJM_TITLE}\u{201d} The New England journal of medicine vol. 382,8 (2020): 727-733. doi:10.1056/NEJMoa2001017")
)]
#[case(
    CitationStyle::Apa,
    format!("Zhu, N., Zhang, D., Wang, W., Li, X., Yang, B., & Song, J. (2020). {NEJM_TITLE} The New England journal of medicine, 382(8), 727-733. https://doi.org/10.1056/NEJMoa2001017")
)]
#[case(
    CitationStyle::Nlm,
    format!("Zhu N, Zhang D, Wang W, Li X, Yang B, Song J. {NEJM_TITLE} N Engl J Med. 2020/01/24;382(8):727-733. doi:10.1056/NEJMoa2001017. PMID:31978945; PMCID: PMC7092803.")
)]
fn test_full_record_citations(#[case] style: CitationStyle, #[case] expected: String) {
    let records = citation_records();
    assert_eq!(records[0].cite(style), expected);
}

#[rstest]
#[case(
    CitationStyle::Ama,
    "Doe JQ, Editorial Board. Test title. J Test Med. 1999;12:45-50."
)]
#[case(
    CitationStyle::Mla,
    "Doe, Jane Q et al. \u{201c}Test title.\u{201d} Journal of Test Medicine vol. 12 (1999): 45-50."
)]
#[case(
    CitationStyle::Apa,
    "Doe, J. Q., & Editorial Board (1999). Test title. Journal of Test Medicine, 12, 45-50."
)]
#[case(
    CitationStyle::Nlm,
    "Doe JQ, ;Editorial Board. Test title. J Test Med. 1999/02/03;12:45-50. PMID:10051234"
)]
fn test_sparse_record_citations(#[case] style: CitationStyle, #[case] expected: &str) {
    let records = citation_records();
    assert_eq!(records[1].cite(style), expected);
}

#[test]
fn test_default_style_is_ama() {
    let records = citation_records();
    assert_eq!(
        records[1].cite(CitationStyle::default()),
        records[1].to_ama()
    );
}
