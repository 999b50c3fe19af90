use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Args;
use pubfetch_client::{EUtilsClient, SearchInput, resolve_term};
use pubfetch_formatter::{Cite as _, CitationStyle};
use pubfetch_parser::SchemaVariant;
use tracing::warn;

use super::{create_eutils_client, fetch_with_progress, progress_bar};

#[derive(Args, Debug)]
pub struct Cite {
    /// PMIDs/PMCIDs, or a single file of whitespace-separated ids
    #[arg(required = true, value_name = "IDS")]
    ids: Vec<String>,

    /// Citation style (ama, mla, apa or nlm)
    #[arg(short, long, default_value = "ama")]
    format: CitationStyle,

    /// Format citations locally from fetched records instead of asking PubMed
    #[arg(short, long)]
    manual: bool,

    /// Ids per efetch request (with --manual)
    #[arg(short, long, default_value_t = 10)]
    batch_size: usize,

    /// Write citations to this file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
}

impl Cite {
    pub async fn execute_with_config(
        &self,
        db: SchemaVariant,
        api_key: Option<&str>,
        email: Option<&str>,
        tool: &str,
    ) -> Result<()> {
        let ids = match resolve_term(&self.ids.join(","), db)? {
            SearchInput::Ids(ids) => ids,
            SearchInput::Term(term) => bail!("Expected ids or a file of ids, got '{term}'"),
        };

        let client = create_eutils_client(api_key, email, tool)?;
        let manual = self.manual || db == SchemaVariant::Pmc;
        if manual && !self.manual {
            warn!("PubMed only cites PMIDs; formatting PMC citations locally");
        }

        let citations = if manual {
            self.manual_citations(&client, db, &ids).await?
        } else {
            self.ncbi_citations(&client, &ids).await?
        };
        if citations.is_empty() {
            warn!("No articles found for the given ids");
            return Ok(());
        }

        let mut out: Box<dyn Write> = match &self.output {
            Some(path) => Box::new(BufWriter::new(
                File::create(path)
                    .with_context(|| format!("Failed to create {}", path.display()))?,
            )),
            None => Box::new(io::stdout().lock()),
        };

        for citation in &citations {
            writeln!(out, "{citation}")?;
        }
        out.flush()?;
        Ok(())
    }

    async fn manual_citations(
        &self,
        client: &EUtilsClient,
        db: SchemaVariant,
        ids: &[String],
    ) -> Result<Vec<String>> {
        let records = fetch_with_progress(client, db, ids, self.batch_size).await?;
        Ok(records.iter().map(|record| record.cite(self.format)).collect())
    }

    /// One PubMed-rendered citation per id; ids PubMed cannot cite are skipped
    async fn ncbi_citations(&self, client: &EUtilsClient, ids: &[String]) -> Result<Vec<String>> {
        let pb = progress_bar(ids.len(), "ids")?;
        let style = self.format.to_string();
        let mut citations = Vec::with_capacity(ids.len());

        for id in ids {
            match client.ncbi_citation(id).await {
                Ok(citation) => {
                    if let Some(text) = citation.style(&style) {
                        citations.push(text.orig.clone());
                    }
                }
                Err(err) => warn!(pmid = %id, error = %err, "Citation lookup failed"),
            }
            pb.inc(1);
        }

        pb.finish_with_message(format!("{} citations", citations.len()));
        Ok(citations)
    }
}
