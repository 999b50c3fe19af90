//! ELink: articles citing a PubMed record

use pubfetch_parser::Citations;
use tracing::{debug, instrument};

use super::EUtilsClient;
use super::responses::ELinkResponse;
use crate::error::Result;

const CITED_IN_LINK: &str = "pubmed_pubmed_citedin";

impl EUtilsClient {
    /// PMIDs of the PubMed articles citing `pmid`
    ///
    /// An article nobody cites yields `Citations { count: 0, links: [] }`.
    ///
    /// ```no_run
    /// use pubfetch_client::EUtilsClient;
    ///
    /// #[tokio::main]
    /// async fn main() -> Result<(), Box<dyn std::error::Error>> {
    ///     let client = EUtilsClient::new();
    ///     let cited = client.cited_by("31978945").await?;
    ///     println!("Cited by {} articles", cited.count);
    ///     Ok(())
    /// }
    /// ```
    #[instrument(skip(self))]
    pub async fn cited_by(&self, pmid: &str) -> Result<Citations> {
        let url = format!(
            "{}/elink.fcgi?dbfrom=pubmed&db=pubmed&cmd=neighbor&retmode=json&id={}",
            self.base_url,
            urlencoding::encode(pmid.trim())
        );

        let response = self.make_request(&url).await?;
        let elink_response: ELinkResponse = response.json().await?;
        let citations = cited_in_links(elink_response);

        debug!(cited = citations.count, "ELink citedin completed");
        Ok(citations)
    }
}

fn cited_in_links(response: ELinkResponse) -> Citations {
    let links = response
        .linksets
        .into_iter()
        .next()
        .and_then(|linkset| linkset.linkset_dbs)
        .unwrap_or_default()
        .into_iter()
        .find(|db| db.link_name == CITED_IN_LINK)
        .map(|db| db.links)
        .unwrap_or_default();
    Citations::new(links)
}
