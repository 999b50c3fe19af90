pub mod cite;
pub mod fields;
pub mod search;

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use pubfetch_client::{ClientConfig, EUtilsClient, SearchInput};
use pubfetch_parser::{ArticleRecord, SchemaVariant};
use tracing::info;

/// Settings shared by every command, before an API key is chosen
pub fn client_config(email: Option<&str>, tool: &str) -> ClientConfig {
    let config = ClientConfig::new().with_tool(tool);
    match email {
        Some(email) => config.with_email(email),
        None => config,
    }
}

pub fn create_eutils_client(
    api_key: Option<&str>,
    email: Option<&str>,
    tool: &str,
) -> Result<EUtilsClient> {
    let mut config = client_config(email, tool);

    if let Some(key) = api_key {
        config = config.with_api_key(key);
    }

    Ok(EUtilsClient::with_config(config))
}

/// Literal ids as given, or the ids an esearch for the term returns
pub async fn collect_ids(
    client: &EUtilsClient,
    db: SchemaVariant,
    input: SearchInput,
    limit: Option<usize>,
) -> Result<Vec<String>> {
    match input {
        SearchInput::Ids(mut ids) => {
            if let Some(limit) = limit {
                ids.truncate(limit);
            }
            info!(count = ids.len(), "Using ids from input");
            Ok(ids)
        }
        SearchInput::Term(term) => client
            .search_ids(db, &term, limit)
            .await
            .with_context(|| format!("Search failed for '{term}'")),
    }
}

pub fn progress_bar(len: usize, unit: &str) -> Result<ProgressBar> {
    let pb = ProgressBar::new(len as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(&format!(
                "{{spinner:.green}} [{{elapsed_precise}}] [{{bar:40.cyan/blue}}] {{pos}}/{{len}} {unit} ({{msg}})"
            ))
            .context("Failed to set progress bar template")?
            .progress_chars("#>-"),
    );
    Ok(pb)
}

/// Fetch and parse `ids` in batches, advancing a progress bar per batch
pub async fn fetch_with_progress(
    client: &EUtilsClient,
    db: SchemaVariant,
    ids: &[String],
    batch_size: usize,
) -> Result<Vec<ArticleRecord>> {
    let pb = progress_bar(ids.len(), "ids")?;
    let mut records = Vec::with_capacity(ids.len());

    for chunk in ids.chunks(batch_size.max(1)) {
        let batch = client
            .fetch_batch(db, chunk)
            .await
            .with_context(|| format!("Failed to fetch {}", chunk.join(",")))?;
        records.extend(batch);
        pb.inc(chunk.len() as u64);
        pb.set_message(format!("{} records", records.len()));
    }

    pb.finish_with_message(format!("{} records", records.len()));
    Ok(records)
}
