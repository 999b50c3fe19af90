//! Journal impact factor lookup by ISSN

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use pubfetch_parser::ImpactFactor;
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::error::Result;

/// Anything that can map a journal's ISSNs to an impact factor
pub trait ImpactFactorSource: Send + Sync {
    fn factor_for_issn(&self, issn: &str) -> Option<f64>;

    /// Look up the print ISSN first, then the electronic one
    fn lookup(&self, issn: Option<&str>, e_issn: Option<&str>) -> ImpactFactor {
        [issn, e_issn]
            .into_iter()
            .flatten()
            .find_map(|value| self.factor_for_issn(value))
            .map_or(ImpactFactor::NotFound, ImpactFactor::Found)
    }
}

#[derive(Debug, Deserialize)]
struct FactorRow {
    #[serde(default)]
    journal: String,
    #[serde(default)]
    issn: String,
    #[serde(default)]
    eissn: String,
    factor: String,
}

/// Impact factors loaded from a `journal,issn,eissn,factor` CSV file
#[derive(Debug, Clone, Default)]
pub struct ImpactFactorTable {
    by_issn: HashMap<String, f64>,
}

impl ImpactFactorTable {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let table = Self::from_reader(csv::Reader::from_path(path)?)?;
        info!(path = %path.display(), issns = table.len(), "Loaded impact factor table");
        Ok(table)
    }

    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self> {
        Self::from_reader(csv::Reader::from_reader(reader))
    }

    fn from_reader<R: Read>(mut reader: csv::Reader<R>) -> Result<Self> {
        let mut by_issn = HashMap::new();
        for row in reader.deserialize() {
            let row: FactorRow = row?;
            let Ok(factor) = row.factor.trim().parse::<f64>() else {
                warn!(journal = %row.journal, factor = %row.factor, "Skipping non-numeric impact factor");
                continue;
            };
            for issn in [&row.issn, &row.eissn] {
                let key = normalize_issn(issn);
                if !key.is_empty() {
                    by_issn.insert(key, factor);
                }
            }
        }
        Ok(Self { by_issn })
    }

    pub fn insert(&mut self, issn: &str, factor: f64) {
        self.by_issn.insert(normalize_issn(issn), factor);
    }

    pub fn len(&self) -> usize {
        self.by_issn.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_issn.is_empty()
    }
}

impl ImpactFactorSource for ImpactFactorTable {
    fn factor_for_issn(&self, issn: &str) -> Option<f64> {
        let factor = self.by_issn.get(&normalize_issn(issn)).copied();
        debug!(issn, found = factor.is_some(), "Impact factor lookup");
        factor
    }
}

fn normalize_issn(issn: &str) -> String {
    issn.trim().to_ascii_uppercase()
}
