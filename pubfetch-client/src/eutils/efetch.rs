//! EFetch: id batches to parsed records

use pubfetch_parser::{ArticleRecord, ParseError, SchemaVariant, parse_records};
use tracing::{debug, info, instrument, warn};

use super::EUtilsClient;
use crate::error::Result;

impl EUtilsClient {
    /// Fetch and parse records for `ids` in batches of `batch_size`
    ///
    /// Articles missing a required element are skipped with a warning; a malformed
    /// payload fails the whole call.
    #[instrument(skip(self, ids), fields(db = %db, ids_count = ids.len()))]
    pub async fn fetch_records(
        &self,
        db: SchemaVariant,
        ids: &[String],
        batch_size: usize,
    ) -> Result<Vec<ArticleRecord>> {
        let mut records = Vec::with_capacity(ids.len());
        for chunk in ids.chunks(batch_size.max(1)) {
            records.extend(self.fetch_batch(db, chunk).await?);
        }
        Ok(records)
    }

    /// Fetch one batch with a single EFetch request
    ///
    /// PMC ids may carry the `PMC` prefix; it is stripped before sending.
    pub async fn fetch_batch(&self, db: SchemaVariant, ids: &[String]) -> Result<Vec<ArticleRecord>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let id_list = ids
            .iter()
            .map(|id| request_id(db, id))
            .collect::<Vec<_>>()
            .join(",");

        let url = format!(
            "{}/efetch.fcgi?db={}&id={}&retmode=xml",
            self.base_url,
            db.database(),
            id_list
        );

        debug!(batch_size = ids.len(), "Making batch EFetch API request");
        let response = self.make_request(&url).await?;
        let xml_text = response.text().await?;

        if xml_text.trim().is_empty() {
            warn!(batch_size = ids.len(), "Empty EFetch response");
            return Ok(Vec::new());
        }

        let records = collect_records(xml_text, db)?;
        info!(
            requested = ids.len(),
            parsed = records.len(),
            "Batch fetch completed"
        );
        Ok(records)
    }
}

fn request_id(db: SchemaVariant, id: &str) -> String {
    let id = id.trim();
    match db {
        SchemaVariant::Pmc => id
            .strip_prefix("PMC")
            .or_else(|| id.strip_prefix("pmc"))
            .unwrap_or(id)
            .to_string(),
        SchemaVariant::PubMed => id.to_string(),
    }
}

fn collect_records(xml: String, db: SchemaVariant) -> Result<Vec<ArticleRecord>> {
    let mut records = Vec::new();
    for record in parse_records(xml, db)? {
        match record {
            Ok(record) => records.push(record),
            Err(err @ ParseError::MissingElement { .. }) => {
                warn!(error = %err, "Skipping article");
            }
            Err(err) => return Err(err.into()),
        }
    }
    Ok(records)
}
