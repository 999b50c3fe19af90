use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use pubfetch_client::{
    EUtilsClient, Enricher, GoogleTranslator, ImpactFactorTable, TranslationCache, resolve_term,
};
use pubfetch_formatter::{export_records, parse_field_list};
use pubfetch_parser::{ArticleRecord, SchemaVariant};
use tracing::{info, warn};

use super::{collect_ids, create_eutils_client, fetch_with_progress, progress_bar};

#[derive(Args, Debug)]
pub struct Search {
    /// Search term, comma-separated PMIDs/PMCIDs, or a file of ids
    #[arg(value_name = "TERM")]
    term: String,

    /// Output file; the extension picks xlsx, csv, tsv, json or jsonl
    #[arg(short, long, default_value = "pubfetch.xlsx")]
    output: PathBuf,

    /// Comma-separated fields to export (default: all)
    #[arg(short, long)]
    fields: Option<String>,

    /// Ids per efetch request
    #[arg(short, long, default_value_t = 10)]
    batch_size: usize,

    /// Maximum number of articles to fetch
    #[arg(short, long)]
    limit: Option<usize>,

    /// Drop articles whose impact factor is missing or lower than this
    #[arg(long, requires = "impact_factors")]
    min_factor: Option<f64>,

    /// CSV of journal impact factors (journal,issn,eissn,factor)
    #[arg(long, value_name = "CSV")]
    impact_factors: Option<PathBuf>,

    /// Look up the articles citing each result
    #[arg(short, long)]
    cited: bool,

    /// Skip abstract translation
    #[arg(short, long)]
    no_translate: bool,

    /// JSON file remembering translations between runs
    #[arg(long, value_name = "JSON")]
    cache: Option<PathBuf>,

    /// Translation target language
    #[arg(long, default_value = "zh-CN")]
    target_language: String,
}

impl Search {
    pub async fn execute_with_config(
        &self,
        db: SchemaVariant,
        api_key: Option<&str>,
        email: Option<&str>,
        tool: &str,
    ) -> Result<()> {
        let client = create_eutils_client(api_key, email, tool)?;

        let input = resolve_term(&self.term, db)
            .with_context(|| format!("Failed to read ids from {}", self.term))?;
        let ids = collect_ids(&client, db, input, self.limit).await?;
        if ids.is_empty() {
            warn!("Nothing to fetch");
            return Ok(());
        }

        let records = fetch_with_progress(&client, db, &ids, self.batch_size).await?;
        let enricher = self.build_enricher(client).await?;
        let records = enrich_with_progress(&enricher, records).await?;
        enricher
            .persist_cache()
            .await
            .context("Failed to save translation cache")?;

        if records.is_empty() {
            warn!("No records left to export");
            return Ok(());
        }

        let fields = self.fields.as_deref().map(parse_field_list);
        let rows = export_records(&records, &self.output, fields.as_deref())
            .with_context(|| format!("Failed to export to {}", self.output.display()))?;
        info!(rows, output = %self.output.display(), "Search completed");
        Ok(())
    }

    async fn build_enricher(&self, client: EUtilsClient) -> Result<Enricher> {
        let mut enricher = Enricher::new(client).with_citations(self.cited);

        if let Some(path) = &self.impact_factors {
            let table = ImpactFactorTable::from_path(path).with_context(|| {
                format!("Failed to load impact factors from {}", path.display())
            })?;
            info!(journals = table.len(), "Loaded impact factor table");
            enricher = enricher.with_impact_factors(table);
        }

        if let Some(min_factor) = self.min_factor {
            enricher = enricher.with_min_factor(min_factor);
        }

        if !self.no_translate {
            enricher = enricher
                .with_translator(GoogleTranslator::new().with_target(&self.target_language));

            if let Some(path) = &self.cache {
                let cache = TranslationCache::load(path).await.with_context(|| {
                    format!("Failed to load translation cache from {}", path.display())
                })?;
                enricher = enricher.with_translation_cache(cache);
            }
        }

        Ok(enricher)
    }
}

async fn enrich_with_progress(
    enricher: &Enricher,
    records: Vec<ArticleRecord>,
) -> Result<Vec<ArticleRecord>> {
    let total = records.len();
    let pb = progress_bar(total, "enriched")?;
    let mut kept = Vec::with_capacity(total);

    for mut record in records {
        enricher
            .enrich(&mut record)
            .await
            .with_context(|| format!("Failed to enrich {}", record.pmid.as_deref().unwrap_or(".")))?;
        if enricher.keep(&record) {
            kept.push(record);
        }
        pb.inc(1);
    }

    pb.finish_with_message(format!("{} kept", kept.len()));
    if kept.len() < total {
        info!(dropped = total - kept.len(), "Filtered records by impact factor");
    }
    Ok(kept)
}
