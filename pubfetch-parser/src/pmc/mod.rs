//! PMC full-text JATS XML (`efetch.fcgi?db=pmc`)

use tracing::{instrument, warn};

use crate::error::Result;
use crate::reader::parse_records;
use crate::record::ArticleRecord;
use crate::schema::{
    AbstractMode, AuthorScheme, CrossReferencedAuthors, DateCandidate, SchemaDescriptor,
    SchemaVariant,
};

pub static PMC_SCHEMA: SchemaDescriptor = SchemaDescriptor {
    variant: SchemaVariant::Pmc,
    container: "article",
    required: &["front/article-meta"],

    pmid: &[r#"front/article-meta/article-id[@pub-id-type="pmid"]"#],
    pmc: &[
        r#"front/article-meta/article-id[@pub-id-type="pmc"]"#,
        r#"front/article-meta/article-id[@pub-id-type="pmcid"]"#,
    ],
    doi: &[r#"front/article-meta/article-id[@pub-id-type="doi"]"#],
    issn: &[
        r#"front/journal-meta/issn[@pub-type="ppub"]"#,
        r#"front/journal-meta/issn[@publication-format="print"]"#,
        r#"front/journal-meta/issn[@pub-type="epub"]"#,
        r#"front/journal-meta/issn[@publication-format="electronic"]"#,
        "front/journal-meta/issn",
    ],
    e_issn: &[
        r#"front/journal-meta/issn[@pub-type="epub"]"#,
        r#"front/journal-meta/issn[@publication-format="electronic"]"#,
        r#"front/journal-meta/issn[@pub-type="ppub"]"#,
        r#"front/journal-meta/issn[@publication-format="print"]"#,
        "front/journal-meta/issn",
    ],
    journal: &[
        "front/journal-meta/journal-title-group/journal-title",
        "front/journal-meta/journal-title",
    ],
    iso_abbr: &[r#"front/journal-meta/journal-id[@journal-id-type="iso-abbrev"]"#],
    med_abbr: &[r#"front/journal-meta/journal-id[@journal-id-type="nlm-ta"]"#],
    title: &["front/article-meta/title-group/article-title"],
    volume: &["front/article-meta/volume"],
    issue: &["front/article-meta/issue"],
    pagination: &["front/article-meta/elocation-id"],
    page_range: Some(("front/article-meta/fpage", "front/article-meta/lpage")),
    keywords: &["front/article-meta/kwd-group/kwd"],
    pub_types: &["@article-type"],
    pub_status: &[],
    pub_status_from_date: true,

    abstracts: "front/article-meta/abstract",
    abstract_mode: AbstractMode::StructuralSections,

    pubdate: &[
        DateCandidate {
            kind: "epub",
            path: r#"front/article-meta/pub-date[@pub-type="epub"]"#,
        },
        DateCandidate {
            kind: "epub",
            path: r#"front/article-meta/pub-date[@publication-format="electronic"]"#,
        },
        DateCandidate {
            kind: "pub",
            path: r#"front/article-meta/pub-date[@pub-type="pub"]"#,
        },
        DateCandidate {
            kind: "pub",
            path: r#"front/article-meta/pub-date[@date-type="pub"]"#,
        },
        DateCandidate {
            kind: "pmc-release",
            path: r#"front/article-meta/pub-date[@pub-type="pmc-release"]"#,
        },
        DateCandidate {
            kind: "ppub",
            path: r#"front/article-meta/pub-date[@pub-type="ppub"]"#,
        },
        DateCandidate {
            kind: "ppub",
            path: r#"front/article-meta/pub-date[@publication-format="print"]"#,
        },
    ],
    pubmed_pubdate: &[],
    journal_date: &[
        r#"front/article-meta/pub-date[@pub-type="ppub"]"#,
        r#"front/article-meta/pub-date[@publication-format="print"]"#,
        "front/article-meta/pub-date",
    ],

    authors: AuthorScheme::CrossReferenced(CrossReferencedAuthors {
        authors: r#"front/article-meta/contrib-group/contrib[@contrib-type="author"]"#,
        given: &["name/given-names", "name-alternatives/name/given-names"],
        family: &["name/surname", "name-alternatives/name/surname"],
        collective: &["collab"],
        affiliation_xrefs: &[r#"xref[@ref-type="aff"]"#],
        correspondence_xrefs: &[r#"xref[@ref-type="corresp"]"#, r#"xref[@ref-type="other"]"#],
        inline_affiliations: &["aff"],
        inline_emails: &["email", "address/email"],
        affiliation_blocks: &["front/article-meta/contrib-group/aff", "front/article-meta/aff"],
        correspondence_blocks: &["front/article-meta/author-notes/corresp"],
        affiliation_label: "label",
    }),
};

/// Parse every `article` in a PMC payload, skipping articles that fail to assemble
#[instrument(skip(xml), fields(xml_size = xml.len()))]
pub fn parse_pmc_xml(xml: &str) -> Result<Vec<ArticleRecord>> {
    let mut records = Vec::new();
    for (index, result) in parse_records(xml, SchemaVariant::Pmc)?.enumerate() {
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
