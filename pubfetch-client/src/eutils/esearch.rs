//! ESearch: query term to id list, paged

use pubfetch_parser::SchemaVariant;
use tracing::{debug, info, instrument, warn};

use super::EUtilsClient;
use super::responses::{ESearchEnvelope, ESearchPage};
use crate::error::{PubFetchError, Result};

/// Ids requested per ESearch page; also the most an unlimited search may return
pub const ESEARCH_PAGE_SIZE: usize = 250;

impl EUtilsClient {
    /// Resolve a search term to ids in `db`
    ///
    /// Pages through the result set `ESEARCH_PAGE_SIZE` ids at a time until `limit`
    /// ids are collected or the result set is exhausted. Without a limit, a term
    /// matching more than one page fails with [`PubFetchError::TooManyResults`].
    ///
    /// ```no_run
    /// use pubfetch_client::EUtilsClient;
    /// use pubfetch_parser::SchemaVariant;
    ///
    /// #[tokio::main]
    /// async fn main() -> Result<(), Box<dyn std::error::Error>> {
    ///     let client = EUtilsClient::new();
    ///     let pmids = client.search_ids(SchemaVariant::PubMed, "ngs AND disease", Some(20)).await?;
    ///     println!("Found {} articles", pmids.len());
    ///     Ok(())
    /// }
    /// ```
    #[instrument(skip(self), fields(db = %db))]
    pub async fn search_ids(
        &self,
        db: SchemaVariant,
        term: &str,
        limit: Option<usize>,
    ) -> Result<Vec<String>> {
        if term.trim().is_empty() {
            debug!("Empty query provided, returning empty results");
            return Ok(Vec::new());
        }

        let first = self.search_page(db, term, 0).await?;
        let count = first.count;
        info!(count, "Articles found for query");
        if let Some(translation) = &first.query_translation {
            debug!(query_translation = %translation, "Query translated by NCBI");
        }

        if limit.is_none() && count > ESEARCH_PAGE_SIZE {
            return Err(PubFetchError::TooManyResults {
                count,
                maximum: ESEARCH_PAGE_SIZE,
            });
        }

        let wanted = limit.unwrap_or(count).min(count);
        let mut ids = first.ids;
        let mut retstart = 0;

        while ids.len() < wanted && retstart + ESEARCH_PAGE_SIZE < count {
            retstart += ESEARCH_PAGE_SIZE;
            let page = self.search_page(db, term, retstart).await?;
            if page.ids.is_empty() {
                break;
            }
            debug!(retstart, page_ids = page.ids.len(), "Fetched ESearch page");
            ids.extend(page.ids);
        }

        ids.truncate(wanted);
        if ids.is_empty() {
            warn!(term, "No result for query");
        }
        Ok(ids)
    }

    async fn search_page(
        &self,
        db: SchemaVariant,
        term: &str,
        retstart: usize,
    ) -> Result<ESearchPage> {
        let url = format!(
            "{}/esearch.fcgi?db={}&term={}&retmax={}&retstart={}&retmode=json",
            self.base_url,
            db.database(),
            urlencoding::encode(term),
            ESEARCH_PAGE_SIZE,
            retstart
        );

        let response = self.make_request(&url).await?;
        let page = response.json::<ESearchEnvelope>().await?.result;

        // NCBI sometimes returns 200 OK with an ERROR field
        if let Some(error_msg) = page.error {
            return Err(PubFetchError::ApiError {
                status: 200,
                message: format!("NCBI ESearch API error: {}", error_msg),
            });
        }

        debug!(
            retstart = page.retstart,
            retmax = page.retmax,
            "ESearch page received"
        );
        Ok(page)
    }
}
