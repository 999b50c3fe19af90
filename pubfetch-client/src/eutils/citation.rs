//! Formatted citations from the PubMed site

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use super::EUtilsClient;
use crate::error::Result;

/// One citation style as PubMed renders it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CitationText {
    /// Plain text
    pub orig: String,
    /// The same citation with HTML emphasis
    #[serde(default)]
    pub format: String,
}

/// Body of `https://pubmed.ncbi.nlm.nih.gov/{pmid}/citations/`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NcbiCitation {
    #[serde(default)]
    pub id: String,
    pub ama: CitationText,
    pub mla: CitationText,
    pub apa: CitationText,
    pub nlm: CitationText,
}

impl NcbiCitation {
    /// Citation for a style name (`ama`, `mla`, `apa`, `nlm`), case-insensitively
    pub fn style(&self, name: &str) -> Option<&CitationText> {
        match name.trim().to_ascii_lowercase().as_str() {
            "ama" => Some(&self.ama),
            "mla" => Some(&self.mla),
            "apa" => Some(&self.apa),
            "nlm" => Some(&self.nlm),
            _ => None,
        }
    }
}

impl EUtilsClient {
    /// AMA, MLA, APA and NLM citations PubMed itself renders for `pmid`
    ///
    /// Goes through the shared rate limiter and retry policy. The API key is not
    /// sent to this endpoint.
    ///
    /// ```no_run
    /// use pubfetch_client::EUtilsClient;
    ///
    /// #[tokio::main]
    /// async fn main() -> Result<(), Box<dyn std::error::Error>> {
    ///     let client = EUtilsClient::new();
    ///     let citation = client.ncbi_citation("31978945").await?;
    ///     println!("{}", citation.ama.orig);
    ///     Ok(())
    /// }
    /// ```
    #[instrument(skip(self))]
    pub async fn ncbi_citation(&self, pmid: &str) -> Result<NcbiCitation> {
        let url = format!(
            "{}/{}/citations/",
            self.config.effective_citation_base_url(),
            urlencoding::encode(pmid.trim())
        );

        let response = self.send_with_retry(&url).await?;
        let citation: NcbiCitation = response.json().await?;

        debug!(id = %citation.id, "Citation retrieved");
        Ok(citation)
    }
}
