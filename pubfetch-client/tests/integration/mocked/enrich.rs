//! Enrichment against mocked E-utilities and translation endpoints

#[path = "../common/mod.rs"]
mod common;

use common::{create_mock_client, fixture_path, quick_retries, read_fixture};
use pubfetch_client::{
    Enricher, GoogleTranslator, ImpactFactorTable, PubFetchError, TRANSLATE_FAILED,
    TranslationCache, Translator,
};
use pubfetch_parser::{ImpactFactor, SchemaVariant, parse_records};
use serde_json::json;
use tracing_test::traced_test;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn translated_body(segments: &[(&str, &str)]) -> String {
    let segments: Vec<_> = segments
        .iter()
        .map(|(translated, original)| json!([translated, original, null, null, 10]))
        .collect();
    json!([segments, null, "en"]).to_string()
}

fn translator(mock_server: &MockServer) -> GoogleTranslator {
    GoogleTranslator::new()
        .with_base_url(mock_server.uri())
        .with_retry_config(quick_retries(4))
}

fn fixture_records() -> Vec<pubfetch_parser::ArticleRecord> {
    parse_records(read_fixture("efetch_pubmed.xml"), SchemaVariant::PubMed)
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap()
}

#[tokio::test]
#[traced_test]
async fn test_google_translator_request_shape() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/translate_a/single"))
        .and(query_param("client", "gtx"))
        .and(query_param("sl", "auto"))
        .and(query_param("tl", "zh-CN"))
        .and(query_param("dt", "t"))
        .and(query_param("q", "Hello. World"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(translated_body(&[("你好。", "Hello. "), ("世界", "World")])),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let translated = translator(&mock_server).translate("Hello. World").await.unwrap();
    assert_eq!(translated, "你好。世界");
}

#[tokio::test]
#[traced_test]
async fn test_google_translator_keeps_line_breaks_between_chunks() {
    let mock_server = MockServer::start().await;
    for (original, translated) in [
        ("BACKGROUND: Cells grow.", "背景：细胞生长。"),
        ("RESULTS: Cells divide.", "结果：细胞分裂。"),
    ] {
        Mock::given(method("GET"))
            .and(path("/translate_a/single"))
            .and(query_param("q", original))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(translated_body(&[(translated, original)])),
            )
            .expect(1)
            .mount(&mock_server)
            .await;
    }

    let translated = translator(&mock_server)
        .with_max_chunk_chars(30)
        .translate("BACKGROUND: Cells grow.\nRESULTS: Cells divide.")
        .await
        .unwrap();

    assert_eq!(translated, "背景：细胞生长。\n结果：细胞分裂。");
    assert!(logs_contain("Splitting text for translation"));
}

#[tokio::test]
#[traced_test]
async fn test_google_translator_retries_then_fails() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/translate_a/single"))
        .respond_with(ResponseTemplate::new(200).set_body_string("[]"))
        .mount(&mock_server)
        .await;

    let err = translator(&mock_server).translate("text").await.unwrap_err();

    assert!(matches!(err, PubFetchError::TranslationError { .. }));
    // One attempt plus four retries
    assert_eq!(mock_server.received_requests().await.unwrap().len(), 5);
}

#[tokio::test]
#[traced_test]
async fn test_enricher_translates_and_caches() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/translate_a/single"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(translated_body(&[("摘要", "abstract")])),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let cache_path = dir.path().join("translations.json");
    let cache = TranslationCache::load(&cache_path).await.unwrap();

    let enricher = Enricher::new(create_mock_client(&mock_server))
        .with_translator(translator(&mock_server))
        .with_translation_cache(cache);

    let records = enricher.enrich_all(fixture_records()).await.unwrap();
    assert_eq!(records[0].enrichment.abstract_cn.as_deref(), Some("摘要"));
    // The second record has no abstract and is never sent
    assert_eq!(records[1].enrichment.abstract_cn.as_deref(), Some("."));

    // A second pass is served from the cache
    let again = enricher.enrich_all(fixture_records()).await.unwrap();
    assert_eq!(again[0].enrichment.abstract_cn.as_deref(), Some("摘要"));

    enricher.persist_cache().await.unwrap();
    let saved = std::fs::read_to_string(&cache_path).unwrap();
    assert!(saved.contains("31978945"));
}

#[tokio::test]
#[traced_test]
async fn test_enricher_marks_failed_translations() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/translate_a/single"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let enricher = Enricher::new(create_mock_client(&mock_server))
        .with_translator(translator(&mock_server));
    let records = enricher.enrich_all(fixture_records()).await.unwrap();

    assert_eq!(
        records[0].enrichment.abstract_cn.as_deref(),
        Some(TRANSLATE_FAILED)
    );
    assert!(logs_contain("Abstract translation failed"));
}

#[tokio::test]
#[traced_test]
async fn test_enricher_citations_and_impact_factor() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/elink.fcgi"))
        .and(query_param("id", "31978945"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(read_fixture("elink_citedin.json")),
        )
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/elink.fcgi"))
        .and(query_param("id", "33515491"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"linksets":[]}"#))
        .mount(&mock_server)
        .await;

    let table = ImpactFactorTable::from_path(fixture_path("impact_factors.csv")).unwrap();
    let enricher = Enricher::new(create_mock_client(&mock_server))
        .with_impact_factors(table)
        .with_citations(true);

    let records = enricher.enrich_all(fixture_records()).await.unwrap();
    assert_eq!(records.len(), 2);

    let nejm = &records[0];
    assert_eq!(
        nejm.enrichment.impact_factor,
        Some(ImpactFactor::Found(176.079))
    );
    assert_eq!(nejm.enrichment.cited.as_ref().map(|c| c.count), Some(3));

    let lancet = &records[1];
    assert_eq!(lancet.enrichment.impact_factor, Some(ImpactFactor::Found(51.1)));
    assert_eq!(lancet.enrichment.cited.as_ref().map(|c| c.count), Some(0));
}

#[tokio::test]
#[traced_test]
async fn test_min_factor_drops_low_and_unknown_journals() {
    let mock_server = MockServer::start().await;
    let table = ImpactFactorTable::from_path(fixture_path("impact_factors.csv")).unwrap();
    let enricher = Enricher::new(create_mock_client(&mock_server))
        .with_impact_factors(table)
        .with_min_factor(100.0);

    let records = enricher.enrich_all(fixture_records()).await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].pmid.as_deref(), Some("31978945"));
    assert!(logs_contain("Filtered records by impact factor"));
}
