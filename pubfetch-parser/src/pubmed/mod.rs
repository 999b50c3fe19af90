//! PubMed metadata XML (`efetch.fcgi?db=pubmed&retmode=xml`)

use tracing::{instrument, warn};

use crate::error::Result;
use crate::reader::parse_records;
use crate::record::ArticleRecord;
use crate::schema::{
    AbstractMode, AuthorScheme, DateCandidate, InlineAuthors, SchemaDescriptor, SchemaVariant,
};

pub static PUBMED_SCHEMA: SchemaDescriptor = SchemaDescriptor {
    variant: SchemaVariant::PubMed,
    container: "PubmedArticle",
    required: &["MedlineCitation/Article", "MedlineCitation/PMID"],

    pmid: &["MedlineCitation/PMID"],
    pmc: &[r#"PubmedData/ArticleIdList/ArticleId[@IdType="pmc"]"#],
    doi: &[
        r#"PubmedData/ArticleIdList/ArticleId[@IdType="doi"]"#,
        r#"MedlineCitation/Article/ELocationID[@EIdType="doi"]"#,
    ],
    issn: &[
        r#"MedlineCitation/Article/Journal/ISSN[@IssnType="Print"]"#,
        "MedlineCitation/MedlineJournalInfo/ISSNLinking",
    ],
    e_issn: &[r#"MedlineCitation/Article/Journal/ISSN[@IssnType="Electronic"]"#],
    journal: &["MedlineCitation/Article/Journal/Title"],
    iso_abbr: &["MedlineCitation/Article/Journal/ISOAbbreviation"],
    med_abbr: &["MedlineCitation/MedlineJournalInfo/MedlineTA"],
    title: &[
        "MedlineCitation/Article/ArticleTitle",
        "MedlineCitation/Article/VernacularTitle",
    ],
    volume: &["MedlineCitation/Article/Journal/JournalIssue/Volume"],
    issue: &["MedlineCitation/Article/Journal/JournalIssue/Issue"],
    pagination: &["MedlineCitation/Article/Pagination/MedlinePgn"],
    page_range: Some((
        "MedlineCitation/Article/Pagination/StartPage",
        "MedlineCitation/Article/Pagination/EndPage",
    )),
    keywords: &["MedlineCitation/KeywordList/Keyword"],
    pub_types: &["MedlineCitation/Article/PublicationTypeList/PublicationType"],
    pub_status: &["PubmedData/PublicationStatus"],
    pub_status_from_date: false,

    abstracts: "MedlineCitation/Article/Abstract/AbstractText",
    abstract_mode: AbstractMode::LabeledSections { label_attr: "Label" },

    pubdate: &[
        DateCandidate {
            kind: "electronic",
            path: r#"MedlineCitation/Article/ArticleDate[@DateType="Electronic"]"#,
        },
        DateCandidate {
            kind: "journal",
            path: "MedlineCitation/Article/Journal/JournalIssue/PubDate",
        },
    ],
    pubmed_pubdate: &[
        DateCandidate {
            kind: "pubmed",
            path: r#"PubmedData/History/PubMedPubDate[@PubStatus="pubmed"]"#,
        },
        DateCandidate {
            kind: "entrez",
            path: r#"PubmedData/History/PubMedPubDate[@PubStatus="entrez"]"#,
        },
        DateCandidate {
            kind: "medline",
            path: r#"PubmedData/History/PubMedPubDate[@PubStatus="medline"]"#,
        },
    ],
    journal_date: &["MedlineCitation/Article/Journal/JournalIssue/PubDate"],

    authors: AuthorScheme::Inline(InlineAuthors {
        authors: "MedlineCitation/Article/AuthorList/Author",
        given: &["ForeName", "FirstName"],
        family: &["LastName"],
        initials: &["Initials"],
        collective: &["CollectiveName"],
        affiliations: &["AffiliationInfo/Affiliation", "Affiliation"],
    }),
};

/// Parse every `PubmedArticle` in a payload, skipping articles that fail to assemble
///
/// Malformed XML is still an error: there is no way to tell how many articles were lost.
#[instrument(skip(xml), fields(xml_size = xml.len()))]
pub fn parse_pubmed_xml(xml: &str) -> Result<Vec<ArticleRecord>> {
    let mut records = Vec::new();
    for (index, result) in parse_records(xml, SchemaVariant::PubMed)?.enumerate() {
        match result {
            Ok(record) => records.push(record),
            Err(e) if e.is_article_local() => {
                warn!(index, error = %e, "Failed to parse article, skipping");
            }
            Err(e) => return Err(e),
        }
    }
    Ok(records)
}
