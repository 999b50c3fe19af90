use std::io::{self, Write};

use anyhow::{Context, Result};
use clap::Args;
use pubfetch_parser::SchemaVariant;

use super::create_eutils_client;

#[derive(Args, Debug)]
pub struct Fields {
    /// Print the field list as JSON
    #[arg(long)]
    json: bool,
}

impl Fields {
    pub async fn execute_with_config(
        &self,
        db: SchemaVariant,
        api_key: Option<&str>,
        email: Option<&str>,
        tool: &str,
    ) -> Result<()> {
        let client = create_eutils_client(api_key, email, tool)?;
        let fields = client
            .search_fields(db)
            .await
            .with_context(|| format!("Failed to list fields of {db}"))?;

        let mut stdout = io::stdout().lock();
        if self.json {
            writeln!(stdout, "{}", serde_json::to_string_pretty(&fields)?)?;
            return Ok(());
        }

        for (i, field) in fields.iter().enumerate() {
            writeln!(
                stdout,
                "{:>3}  {:<6} {:<30} {}",
                i + 1,
                field.name,
                field.full_name,
                field.description
            )?;
        }
        Ok(())
    }
}
