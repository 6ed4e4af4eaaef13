use crate::advice::{advise_or_fallback, AdviceMetrics, AdviceProvider, AdviceTopic, OfflineAdvisor};
use crate::error::Result;
use crate::llm::client::GeminiClient;
use futures::future::{BoxFuture, FutureExt};

/// Remote advice from the Gemini `generateContent` endpoint.
///
/// Prompts are built from [`AdviceMetrics`] alone.
pub struct GeminiAdvisor {
    client: GeminiClient,
    currency: String,
    fallback: OfflineAdvisor,
}

impl GeminiAdvisor {
    pub fn new(client: GeminiClient) -> Self {
        Self {
            client,
            currency: "XAF".to_string(),
            fallback: OfflineAdvisor::default(),
        }
    }

    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = currency.into();
        self
    }

    pub fn with_fallback(mut self, fallback: OfflineAdvisor) -> Self {
        self.fallback = fallback;
        self
    }

    /// Never fails: network or API errors produce the offline text.
    pub async fn advise_with_fallback(&self, topic: AdviceTopic, metrics: &AdviceMetrics) -> String {
        advise_or_fallback(self, &self.fallback, topic, metrics).await
    }
}

impl AdviceProvider for GeminiAdvisor {
    fn advise<'a>(
        &'a self,
        topic: AdviceTopic,
        metrics: &'a AdviceMetrics,
    ) -> BoxFuture<'a, Result<String>> {
        async move {
            let prompt = topic.prompt(metrics, &self.currency);
            let text = self.client.generate_text(&prompt).await?;
            Ok(text.trim().to_string())
        }
        .boxed()
    }
}
