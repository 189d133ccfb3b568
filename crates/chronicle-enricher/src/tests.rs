//! Integration tests for the Enricher

#[cfg(test)]
mod tests {
    use crate::{Enricher, EnricherConfig, EnrichmentRequest, EnrichmentStage};
    use chronicle_domain::traits::LlmProvider;
    use chronicle_llm::{LlmError, MockProvider};
    use std::time::Duration;

    const FACETS_MARKER: &str = "JSON object only";
    const TAGS_MARKER: &str = "comma-separated list of tags";
    const TRANSLATE_MARKER: &str = "Translate the following text";

    fn ottoman_request() -> EnrichmentRequest {
        EnrichmentRequest {
            title: "Liman mektubu".to_string(),
            file_name: Some("mektup.txt".to_string()),
            content_text: "Sayın efendim, limandaki gemiler yarın yola çıkacak.".to_string(),
        }
    }

    /// Provider that never answers within the timeout
    struct SlowProvider;

    impl LlmProvider for SlowProvider {
        type Error = LlmError;

        async fn generate(&self, _prompt: &str) -> Result<String, Self::Error> {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Ok(String::new())
        }

        fn model_name(&self) -> &str {
            "slow"
        }
    }

    #[tokio::test]
    async fn test_full_enrichment_flow() {
        let mut llm = MockProvider::default();
        llm.add_response_containing(
            FACETS_MARKER,
            r#"```json
{"era": ["ww1"], "location": ["turkey"], "subject": ["trade"], "sourceType": "correspondence", "language": "tr"}
```"#,
        );
        llm.add_response_containing(TAGS_MARKER, "Shipping, harbour, Letters");
        llm.add_response_containing(TRANSLATE_MARKER, "  Dear sir, the ships in the harbour sail tomorrow.\n");

        let enricher = Enricher::new(llm.clone(), EnricherConfig::default()).unwrap();
        let result = enricher.enrich(&ottoman_request()).await;

        assert!(result.is_complete(), "unexpected failures: {:?}", result.failures);
        assert_eq!(result.facets.era, vec!["ww1"]);
        assert_eq!(result.facets.source_type.as_deref(), Some("correspondence"));
        assert_eq!(result.tags, vec!["shipping", "harbour", "letters"]);
        assert_eq!(
            result.translation.as_deref(),
            Some("Dear sir, the ships in the harbour sail tomorrow.")
        );
        assert_eq!(llm.call_count(), 3);

        let prompts = llm.prompts();
        assert!(prompts[0].contains(FACETS_MARKER));
        assert!(prompts[1].contains(TAGS_MARKER));
        assert!(prompts[2].contains("\"tr\" into language code \"en\""));

        let metadata = result.item_metadata();
        assert_eq!(metadata.ai_generated_tags, result.tags);
        assert_eq!(metadata.ai_suggested_facets.as_ref(), Some(&result.facets));
    }

    #[tokio::test]
    async fn test_english_content_is_not_translated() {
        let mut llm = MockProvider::default();
        llm.add_response_containing(FACETS_MARKER, r#"{"language": "en"}"#);
        llm.add_response_containing(TAGS_MARKER, "diary");

        let enricher = Enricher::new(llm.clone(), EnricherConfig::default()).unwrap();
        let result = enricher.enrich(&ottoman_request()).await;

        assert!(result.translation.is_none());
        assert_eq!(llm.call_count(), 2);
    }

    #[tokio::test]
    async fn test_translation_disabled() {
        let mut llm = MockProvider::default();
        llm.add_response_containing(FACETS_MARKER, r#"{"language": "tr"}"#);
        llm.add_response_containing(TAGS_MARKER, "letters");

        let config = EnricherConfig {
            translate: false,
            ..Default::default()
        };
        let enricher = Enricher::new(llm.clone(), config).unwrap();
        let result = enricher.enrich(&ottoman_request()).await;

        assert!(result.translation.is_none());
        assert!(result.is_complete());
        assert_eq!(llm.call_count(), 2);
    }

    #[tokio::test]
    async fn test_unknown_language_skips_translation() {
        let mut llm = MockProvider::default();
        llm.add_response_containing(FACETS_MARKER, r#"{"era": ["ottoman"]}"#);
        llm.add_response_containing(TAGS_MARKER, "letters");

        let enricher = Enricher::new(llm.clone(), EnricherConfig::default()).unwrap();
        let result = enricher.enrich(&ottoman_request()).await;

        assert!(result.translation.is_none());
        assert_eq!(llm.call_count(), 2);
    }

    #[tokio::test]
    async fn test_invalid_facet_json_falls_back() {
        let mut llm = MockProvider::default();
        llm.add_response_containing(FACETS_MARKER, "I could not decide.");
        llm.add_response_containing(TAGS_MARKER, "letters, harbour");

        let enricher = Enricher::new(llm, EnricherConfig::default()).unwrap();
        let result = enricher.enrich(&ottoman_request()).await;

        assert!(result.facets.is_empty());
        assert_eq!(result.tags, vec!["letters", "harbour"]);
        assert_eq!(result.failures.len(), 1);
        assert_eq!(result.failures[0].stage, EnrichmentStage::Facets);
    }

    #[tokio::test]
    async fn test_provider_errors_are_recorded() {
        let mut llm = MockProvider::default();
        llm.add_response_containing(FACETS_MARKER, r#"{"language": "tr"}"#);
        llm.add_error_containing(TAGS_MARKER);
        llm.add_error_containing(TRANSLATE_MARKER);

        let enricher = Enricher::new(llm, EnricherConfig::default()).unwrap();
        let result = enricher.enrich(&ottoman_request()).await;

        assert_eq!(result.facets.language.as_deref(), Some("tr"));
        assert!(result.tags.is_empty());
        assert!(result.translation.is_none());

        let stages: Vec<EnrichmentStage> = result.failures.iter().map(|f| f.stage).collect();
        assert_eq!(stages, vec![EnrichmentStage::Tags, EnrichmentStage::Translation]);
        assert!(result.failures[0].reason.contains("Mock error"));
    }

    #[tokio::test]
    async fn test_empty_translation_is_a_failure() {
        let mut llm = MockProvider::default();
        llm.add_response_containing(FACETS_MARKER, r#"{"language": "fr"}"#);
        llm.add_response_containing(TAGS_MARKER, "letters");
        llm.add_response_containing(TRANSLATE_MARKER, "   ");

        let enricher = Enricher::new(llm, EnricherConfig::default()).unwrap();
        let result = enricher.enrich(&ottoman_request()).await;

        assert!(result.translation.is_none());
        assert_eq!(result.failures.len(), 1);
        assert_eq!(result.failures[0].stage, EnrichmentStage::Translation);
    }

    #[tokio::test]
    async fn test_content_is_truncated_in_prompts() {
        let llm = MockProvider::new("");
        let config = EnricherConfig {
            max_content_chars: 10,
            ..Default::default()
        };
        let enricher = Enricher::new(llm.clone(), config).unwrap();

        let request = EnrichmentRequest {
            title: "Long".to_string(),
            file_name: None,
            content_text: format!("{}{}", "a".repeat(10), "§".repeat(50)),
        };
        enricher.enrich(&request).await;

        for prompt in llm.prompts() {
            assert!(prompt.contains("aaaaaaaaaa"));
            assert!(!prompt.contains('§'));
        }
    }

    #[tokio::test]
    async fn test_slow_provider_times_out() {
        let config = EnricherConfig {
            call_timeout_secs: 1,
            ..Default::default()
        };
        let enricher = Enricher::new(SlowProvider, config).unwrap();
        let result = enricher.enrich(&ottoman_request()).await;

        assert!(result.facets.is_empty());
        assert!(result.tags.is_empty());
        assert_eq!(result.failures.len(), 2);
        assert!(result.failures.iter().all(|f| f.reason.contains("timed out")));
    }
}
