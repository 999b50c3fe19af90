//! Post-parse enrichment: impact factor, citing articles, translated abstract
//!
//! Records are enriched one at a time, in order. Each step is optional and only
//! writes its own [`Enrichment`](pubfetch_parser::Enrichment) field.

mod impact_factor;
mod translate;
mod translation_cache;

use std::sync::Arc;

use pubfetch_parser::{ABSENT, ArticleRecord};
use tracing::{debug, info, instrument, warn};

use crate::error::Result;
use crate::eutils::EUtilsClient;

pub use impact_factor::{ImpactFactorSource, ImpactFactorTable};
pub use translate::{
    Chunk, DEFAULT_TARGET_LANGUAGE, DEFAULT_TRANSLATE_URL, GoogleTranslator, MAX_CHUNK_CHARS,
    TRANSLATE_FAILED, Translator, split_text,
};
pub use translation_cache::TranslationCache;

/// Applies the configured enrichment steps to parsed records
#[derive(Clone)]
pub struct Enricher {
    client: EUtilsClient,
    impact_factors: Option<Arc<dyn ImpactFactorSource>>,
    translator: Option<Arc<dyn Translator>>,
    cache: TranslationCache,
    cited: bool,
    min_factor: Option<f64>,
}

impl Enricher {
    /// An enricher with every step disabled
    pub fn new(client: EUtilsClient) -> Self {
        Self {
            client,
            impact_factors: None,
            translator: None,
            cache: TranslationCache::new(),
            cited: false,
            min_factor: None,
        }
    }

    pub fn with_impact_factors(mut self, source: impl ImpactFactorSource + 'static) -> Self {
        self.impact_factors = Some(Arc::new(source));
        self
    }

    pub fn with_translator(mut self, translator: impl Translator + 'static) -> Self {
        self.translator = Some(Arc::new(translator));
        self
    }

    pub fn with_translation_cache(mut self, cache: TranslationCache) -> Self {
        self.cache = cache;
        self
    }

    /// Attach `cited` from an ELink citedin query
    pub fn with_citations(mut self, cited: bool) -> Self {
        self.cited = cited;
        self
    }

    /// Drop records whose impact factor is missing or below `min_factor`
    pub fn with_min_factor(mut self, min_factor: f64) -> Self {
        self.min_factor = Some(min_factor);
        self
    }

    /// Enrich one record in place
    #[instrument(skip_all, fields(pmid = record.pmid.as_deref().unwrap_or(ABSENT)))]
    pub async fn enrich(&self, record: &mut ArticleRecord) -> Result<()> {
        if let Some(source) = &self.impact_factors {
            let factor = source.lookup(record.issn.as_deref(), record.e_issn.as_deref());
            debug!(?factor, "Impact factor attached");
            record.enrichment.impact_factor = Some(factor);
        }

        if self.cited {
            match record.pmid.as_deref() {
                Some(pmid) => {
                    record.enrichment.cited = Some(self.client.cited_by(pmid).await?);
                }
                None => debug!("No pmid, skipping citedin lookup"),
            }
        }

        if let Some(translator) = &self.translator {
            let translated = self.translate_abstract(translator.as_ref(), record).await;
            record.enrichment.abstract_cn = Some(translated);
        }

        Ok(())
    }

    async fn translate_abstract(
        &self,
        translator: &dyn Translator,
        record: &ArticleRecord,
    ) -> String {
        if !record.has_abstract() {
            return ABSENT.to_string();
        }

        let pmid = record.pmid.as_deref();
        if let Some(pmid) = pmid {
            if let Some(cached) = self.cache.get(pmid).await {
                debug!("Translation cache hit");
                return cached;
            }
        }

        match translator.translate(&record.abstract_text).await {
            Ok(translated) => {
                if let Some(pmid) = pmid {
                    self.cache.insert(pmid, &translated).await;
                }
                translated
            }
            Err(err) => {
                warn!(error = %err, "Abstract translation failed");
                TRANSLATE_FAILED.to_string()
            }
        }
    }

    /// Whether `record` survives the minimum impact factor filter
    pub fn keep(&self, record: &ArticleRecord) -> bool {
        let Some(min_factor) = self.min_factor else {
            return true;
        };
        record
            .enrichment
            .impact_factor
            .and_then(|factor| factor.value())
            .is_some_and(|value| value >= min_factor)
    }

    /// Enrich every record in order, then apply the impact factor filter
    pub async fn enrich_all(&self, records: Vec<ArticleRecord>) -> Result<Vec<ArticleRecord>> {
        let total = records.len();
        let mut kept = Vec::with_capacity(total);
        for mut record in records {
            self.enrich(&mut record).await?;
            if self.keep(&record) {
                kept.push(record);
            }
        }

        if kept.len() < total {
            info!(
                dropped = total - kept.len(),
                min_factor = self.min_factor,
                "Filtered records by impact factor"
            );
        }
        Ok(kept)
    }

    /// Save cached translations to their backing file, if any
    pub async fn persist_cache(&self) -> Result<()> {
        self.cache.persist().await
    }
}
