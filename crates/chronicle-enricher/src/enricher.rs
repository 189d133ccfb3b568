//! Core Enricher implementation

use crate::config::EnricherConfig;
use crate::error::EnricherError;
use crate::parser::{parse_facet_response, parse_tags};
use crate::prompt::{tag_prompt, translation_prompt, FacetPromptBuilder};
use crate::types::{EnrichmentFailure, EnrichmentRequest, EnrichmentResult, EnrichmentStage};
use chronicle_domain::traits::LlmProvider;
use std::sync::Arc;
use std::time::Instant;
use tokio::time::timeout;
use tracing::{debug, info, warn};

/// Suggests tags, facets and a translation for newly archived material
pub struct Enricher<L>
where
    L: LlmProvider,
{
    llm_provider: Arc<L>,
    config: EnricherConfig,
}

impl<L> Enricher<L>
where
    L: LlmProvider + Send + Sync + 'static,
{
    /// Create a new Enricher
    ///
    /// # Errors
    ///
    /// Returns [`EnricherError::Config`] when the configuration is invalid.
    pub fn new(llm_provider: L, config: EnricherConfig) -> Result<Self, EnricherError> {
        config.validate()?;
        Ok(Self {
            llm_provider: Arc::new(llm_provider),
            config,
        })
    }

    /// Configuration in use
    pub fn config(&self) -> &EnricherConfig {
        &self.config
    }

    /// Model answering the prompts; recorded as the author of AI translations
    pub fn model_name(&self) -> &str {
        self.llm_provider.model_name()
    }

    /// Run the pipeline
    ///
    /// Never fails: each stage that errors or times out is logged, recorded in
    /// `failures` and replaced by its default. Blank content skips every stage.
    pub async fn enrich(&self, request: &EnrichmentRequest) -> EnrichmentResult {
        let mut result = EnrichmentResult::default();

        if request.content_text.trim().is_empty() {
            debug!(title = %request.title, "no content to enrich");
            return result;
        }

        let started = Instant::now();
        info!(
            title = %request.title,
            model = self.llm_provider.model_name(),
            content_chars = request.content_text.chars().count(),
            "starting enrichment"
        );

        match self.suggest_facets(request).await {
            Ok(facets) => result.facets = facets,
            Err(e) => Self::record(&mut result, EnrichmentStage::Facets, e),
        }

        match self.generate_tags(&request.content_text).await {
            Ok(tags) => result.tags = tags,
            Err(e) => Self::record(&mut result, EnrichmentStage::Tags, e),
        }

        if let Some(source) = self.translation_source(&result) {
            match self.translate(&request.content_text, &source).await {
                Ok(text) => result.translation = Some(text),
                Err(e) => Self::record(&mut result, EnrichmentStage::Translation, e),
            }
        }

        info!(
            tags = result.tags.len(),
            translated = result.translation.is_some(),
            failures = result.failures.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "enrichment complete"
        );

        result
    }

    /// Ask for tags
    pub async fn generate_tags(&self, content: &str) -> Result<Vec<String>, EnricherError> {
        let prompt = tag_prompt(content, self.config.max_content_chars);
        let response = self.call_llm(&prompt).await?;
        let tags = parse_tags(&response, self.config.max_tags, self.config.max_tag_length);
        debug!(?tags, "parsed tags");
        Ok(tags)
    }

    /// Ask for facet suggestions
    pub async fn suggest_facets(
        &self,
        request: &EnrichmentRequest,
    ) -> Result<chronicle_domain::FacetSelection, EnricherError> {
        let prompt = FacetPromptBuilder::new(&request.title, &request.content_text)
            .with_file_name(request.file_name.as_deref())
            .build(self.config.max_content_chars);
        debug!(prompt_chars = prompt.len(), "facet prompt built");

        let response = self.call_llm(&prompt).await?;
        parse_facet_response(&response)
    }

    /// Ask for a translation into the target language
    pub async fn translate(&self, content: &str, source_language: &str) -> Result<String, EnricherError> {
        let prompt = translation_prompt(
            content,
            source_language,
            &self.config.target_language,
            self.config.max_content_chars,
        );
        let response = self.call_llm(&prompt).await?;
        let text = response.trim();
        if text.is_empty() {
            return Err(EnricherError::InvalidFormat("Empty translation".to_string()));
        }
        Ok(text.to_string())
    }

    /// Detected language when it differs from the target language
    fn translation_source(&self, result: &EnrichmentResult) -> Option<String> {
        if !self.config.translate {
            return None;
        }
        result
            .facets
            .language
            .as_deref()
            .filter(|lang| !lang.eq_ignore_ascii_case(&self.config.target_language))
            .map(str::to_string)
    }

    fn record(result: &mut EnrichmentResult, stage: EnrichmentStage, error: EnricherError) {
        warn!(%stage, error = %error, "enrichment stage failed, using default");
        result.failures.push(EnrichmentFailure {
            stage,
            reason: error.to_string(),
        });
    }

    /// Call the LLM provider, bounded by the configured timeout
    async fn call_llm(&self, prompt: &str) -> Result<String, EnricherError> {
        timeout(self.config.call_timeout(), self.llm_provider.generate(prompt))
            .await
            .map_err(|_| EnricherError::Timeout(self.config.call_timeout_secs))?
            .map_err(|e| EnricherError::Llm(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chronicle_llm::MockProvider;

    fn request(content: &str) -> EnrichmentRequest {
        EnrichmentRequest {
            title: "Letter".to_string(),
            file_name: Some("letter.txt".to_string()),
            content_text: content.to_string(),
        }
    }

    #[tokio::test]
    async fn test_blank_content_skips_provider() {
        let llm = MockProvider::new("anything");
        let enricher = Enricher::new(llm.clone(), EnricherConfig::default()).unwrap();

        let result = enricher.enrich(&request("   \n")).await;
        assert_eq!(result, EnrichmentResult::default());
        assert_eq!(llm.call_count(), 0);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = EnricherConfig {
            max_tags: 0,
            ..Default::default()
        };
        assert!(Enricher::new(MockProvider::default(), config).is_err());
    }

    #[tokio::test]
    async fn test_translation_source() {
        let enricher = Enricher::new(MockProvider::default(), EnricherConfig::default()).unwrap();
        let mut result = EnrichmentResult::default();
        assert_eq!(enricher.translation_source(&result), None);

        result.facets.language = Some("EN".to_string());
        assert_eq!(enricher.translation_source(&result), None);

        result.facets.language = Some("tr".to_string());
        assert_eq!(enricher.translation_source(&result).as_deref(), Some("tr"));
    }
}
