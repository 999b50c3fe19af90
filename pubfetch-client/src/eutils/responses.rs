//! Wire shapes of the JSON E-utilities responses

use serde::{Deserialize, Deserializer};

/// `{"esearchresult": {...}}`
#[derive(Debug, Deserialize)]
pub(crate) struct ESearchEnvelope {
    #[serde(rename = "esearchresult")]
    pub result: ESearchPage,
}

/// One page of ESearch ids. NCBI sends the counters as strings
#[derive(Debug, Deserialize)]
pub(crate) struct ESearchPage {
    #[serde(default, rename = "ERROR")]
    pub error: Option<String>,
    #[serde(default, deserialize_with = "counter")]
    pub count: usize,
    #[serde(default, deserialize_with = "counter")]
    pub retmax: usize,
    #[serde(default, deserialize_with = "counter")]
    pub retstart: usize,
    #[serde(default, rename = "idlist")]
    pub ids: Vec<String>,
    #[serde(default, rename = "querytranslation")]
    pub query_translation: Option<String>,
}

/// A counter given as `"42"` or `42`; anything unparsable counts as zero
fn counter<'de, D>(deserializer: D) -> Result<usize, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(usize),
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        Some(Raw::Text(text)) => text.trim().parse().unwrap_or(0),
        Some(Raw::Number(n)) => n,
        None => 0,
    })
}

// EInfo API response structures
#[derive(Debug, Deserialize)]
pub(crate) struct EInfoResponse {
    #[serde(rename = "einforesult")]
    pub einfo_result: EInfoResult,
}

#[derive(Debug, Deserialize)]
pub(crate) struct EInfoResult {
    #[serde(rename = "dbinfo", default)]
    pub db_info: Option<Vec<EInfoDbInfo>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct EInfoDbInfo {
    #[serde(rename = "fieldlist", default)]
    pub field_list: Option<Vec<EInfoField>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct EInfoField {
    pub name: String,
    #[serde(rename = "fullname", default)]
    pub full_name: String,
    #[serde(default)]
    pub description: String,
}

// ELink API response structures
#[derive(Debug, Deserialize)]
pub(crate) struct ELinkResponse {
    #[serde(default)]
    pub linksets: Vec<ELinkSet>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ELinkSet {
    #[serde(rename = "linksetdbs", default)]
    pub linkset_dbs: Option<Vec<ELinkSetDb>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ELinkSetDb {
    #[serde(rename = "linkname")]
    pub link_name: String,
    #[serde(default)]
    pub links: Vec<String>,
}
