//! EInfo: searchable fields of a database

use pubfetch_parser::SchemaVariant;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, instrument};

use super::EUtilsClient;
use super::responses::EInfoResponse;
use crate::error::{PubFetchError, Result};

/// One searchable field, as listed by `pubfetch fields`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldInfo {
    /// Short tag used in queries, e.g. `TIAB`
    pub name: String,
    pub full_name: String,
    pub description: String,
}

impl EUtilsClient {
    /// Whether NCBI accepts the configured API key
    ///
    /// Sends a bare `einfo` request. NCBI answers a bad key with a client error
    /// status or an `{"error": "API key invalid"}` body; both give `Ok(false)`.
    /// Network failures and server errors stay errors.
    #[instrument(skip(self))]
    pub async fn check_api_key(&self) -> Result<bool> {
        let url = format!("{}/einfo.fcgi?retmode=json", self.base_url);

        match self.make_request(&url).await {
            Ok(response) => {
                let body: Value = response.json().await?;
                let accepted = body.get("error").is_none();
                debug!(accepted, "API key checked");
                Ok(accepted)
            }
            Err(PubFetchError::ApiError { status, .. })
                if (400..500).contains(&status) && status != 429 =>
            {
                debug!(status, "API key rejected");
                Ok(false)
            }
            Err(err) => Err(err),
        }
    }

    /// Searchable fields of `db`, sorted by full name
    #[instrument(skip(self), fields(db = %db))]
    pub async fn search_fields(&self, db: SchemaVariant) -> Result<Vec<FieldInfo>> {
        let url = format!(
            "{}/einfo.fcgi?db={}&retmode=json",
            self.base_url,
            db.database()
        );

        let response = self.make_request(&url).await?;
        let einfo_response: EInfoResponse = response.json().await?;

        let db_info = einfo_response
            .einfo_result
            .db_info
            .and_then(|infos| infos.into_iter().next())
            .ok_or_else(|| PubFetchError::ApiError {
                status: 200,
                message: format!("Database '{}' not found or no information available", db),
            })?;

        let mut fields: Vec<FieldInfo> = db_info
            .field_list
            .unwrap_or_default()
            .into_iter()
            .map(|field| FieldInfo {
                name: field.name,
                full_name: field.full_name,
                description: field.description,
            })
            .collect();
        fields.sort_by(|a, b| a.full_name.cmp(&b.full_name));

        info!(fields_count = fields.len(), "Field list retrieved successfully");
        Ok(fields)
    }
}
