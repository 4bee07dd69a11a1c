//! # Chat Service
//!
//! File: cli/src/assistant/service.rs
//!
//! ## Overview
//!
//! The chat service sits between a front end and the response matcher. It
//! enforces the caller side of the matcher contract (no empty messages,
//! text only) and emulates a network round trip by sleeping for a random
//! delay before answering, the way a hosted assistant would feel.
//!
//! Latency belongs here and nowhere else: the matcher stays synchronous.
//!
//! ## Examples
//!
//! ```rust
//! let cfg = config::load_config()?;
//! let service = ChatService::from_config(&cfg, random::from_seed(None))?;
//! let reply = service.send_message("When should I plant rice?").await?;
//! ```
//!
use super::knowledge::KnowledgeBase;
use super::matcher::{decode_message, Reply, ResponseMatcher};
use super::random::RandomSource;
use crate::core::config::{Config, LatencyConfig};
use crate::core::error::{KrishiError, Result};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

pub struct ChatService {
    matcher: ResponseMatcher,
    latency: LatencyConfig,
    random: Arc<dyn RandomSource>,
}

impl ChatService {
    pub fn new(matcher: ResponseMatcher, latency: LatencyConfig, random: Arc<dyn RandomSource>) -> Self {
        Self {
            matcher,
            latency,
            random,
        }
    }

    /// Builds the knowledge base selected by `config` once and wires a matcher
    /// around it. `random` drives both reply selection and latency jitter.
    pub fn from_config(config: &Config, random: Arc<dyn RandomSource>) -> Result<Self> {
        let knowledge = Arc::new(KnowledgeBase::from_config(&config.knowledge)?);
        let matcher = ResponseMatcher::new(knowledge, random.clone());
        let service = Self::new(matcher, config.latency.clone(), random);

        let kb = service.matcher().knowledge();
        info!(
            categories = kb.categories().len(),
            defaults = kb.default_responses().len(),
            "Knowledge base ready"
        );
        Ok(service)
    }

    pub fn matcher(&self) -> &ResponseMatcher {
        &self.matcher
    }

    /// Delay before the next reply: uniform in `[min_ms, max_ms]`, zero when disabled.
    pub fn simulated_delay(&self) -> Duration {
        if !self.latency.enabled {
            return Duration::ZERO;
        }
        let span = self.latency.max_ms.saturating_sub(self.latency.min_ms);
        let jitter = usize::try_from(span)
            .ok()
            .and_then(|span| span.checked_add(1))
            .and_then(|len| self.random.pick_index(len))
            .map_or(0, |pick| pick as u64);
        Duration::from_millis(self.latency.min_ms.saturating_add(jitter))
    }

    /// Validates `message`, waits out the simulated latency and answers.
    ///
    /// ## Errors
    ///
    /// `InvalidInput` if `message` is empty or whitespace only.
    pub async fn send_reply(&self, message: &str) -> Result<Reply<'_>> {
        let trimmed = self.accept(message).await?;
        Ok(self.matcher.reply(trimmed))
    }

    pub async fn send_message(&self, message: &str) -> Result<String> {
        let trimmed = self.accept(message).await?;
        Ok(self.matcher.respond(trimmed))
    }

    /// Like `send_reply`, for raw input that has not been decoded yet.
    pub async fn send_bytes(&self, raw: &[u8]) -> Result<Reply<'_>> {
        self.send_reply(decode_message(raw)?).await
    }

    async fn accept<'m>(&self, message: &'m str) -> Result<&'m str> {
        let trimmed = message.trim();
        if trimmed.is_empty() {
            return Err(KrishiError::InvalidInput("message cannot be empty".into()).into());
        }

        let delay = self.simulated_delay();
        if !delay.is_zero() {
            debug!(delay_ms = delay.as_millis() as u64, "Simulating network latency");
            tokio::time::sleep(delay).await;
        }
        Ok(trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assistant::random::{FixedSequence, ThreadRandom};

    fn service_with(latency: LatencyConfig, random: Arc<dyn RandomSource>) -> ChatService {
        let knowledge = Arc::new(KnowledgeBase::builtin().unwrap());
        ChatService::new(
            ResponseMatcher::new(knowledge, random.clone()),
            latency,
            random,
        )
    }

    fn no_delay() -> LatencyConfig {
        LatencyConfig {
            enabled: false,
            ..Default::default()
        }
    }

    fn assert_invalid_input(err: anyhow::Error) {
        let inner = err
            .downcast_ref::<KrishiError>()
            .expect("expected a KrishiError");
        assert!(inner.is_invalid_input(), "unexpected error: {inner}");
    }

    #[tokio::test]
    async fn rejects_empty_and_blank_messages() {
        let service = service_with(no_delay(), Arc::new(ThreadRandom));
        assert_invalid_input(service.send_message("").await.unwrap_err());
        assert_invalid_input(service.send_message("   \t\n").await.unwrap_err());
    }

    #[tokio::test]
    async fn rejects_non_utf8_bytes() {
        let service = service_with(no_delay(), Arc::new(ThreadRandom));
        assert_invalid_input(service.send_bytes(&[0xc3, 0x28]).await.unwrap_err());
        assert_eq!(service.send_bytes(b"monsoon").await.unwrap().topic, Some("weather"));
    }

    #[tokio::test]
    async fn answers_trimmed_message_from_matching_pool() {
        let service = service_with(no_delay(), Arc::new(ThreadRandom));
        let reply = service.send_reply("  When should I plant rice?  ").await.unwrap();
        assert_eq!(reply.topic, Some("rice"));

        let text = service.send_message("pest problem").await.unwrap();
        let pest = &service.matcher().knowledge().category("pest").unwrap().responses;
        assert!(pest.contains(&text));
    }

    #[test]
    fn disabled_latency_is_zero() {
        let service = service_with(no_delay(), Arc::new(ThreadRandom));
        assert_eq!(service.simulated_delay(), Duration::ZERO);
    }

    #[test]
    fn delay_stays_within_configured_bounds() {
        let latency = LatencyConfig {
            enabled: true,
            min_ms: 1000,
            max_ms: 3000,
        };
        let service = service_with(latency.clone(), Arc::new(ThreadRandom));
        for _ in 0..100 {
            let delay = service.simulated_delay();
            assert!(delay >= Duration::from_millis(1000));
            assert!(delay <= Duration::from_millis(3000));
        }

        let lowest = service_with(latency.clone(), Arc::new(FixedSequence::always(0)));
        assert_eq!(lowest.simulated_delay(), Duration::from_millis(1000));

        let highest = service_with(latency.clone(), Arc::new(FixedSequence::always(2000)));
        assert_eq!(highest.simulated_delay(), Duration::from_millis(3000));

        let unavailable = service_with(latency, Arc::new(FixedSequence::new(vec![None])));
        assert_eq!(unavailable.simulated_delay(), Duration::from_millis(1000));
    }

    #[tokio::test]
    async fn reply_waits_for_the_simulated_latency() {
        let latency = LatencyConfig {
            enabled: true,
            min_ms: 25,
            max_ms: 25,
        };
        let service = service_with(latency, Arc::new(ThreadRandom));
        let started = tokio::time::Instant::now();
        service.send_message("rice").await.unwrap();
        assert!(started.elapsed() >= Duration::from_millis(25));
    }

    #[test]
    fn from_config_uses_the_builtin_table_by_default() {
        let service = ChatService::from_config(&Config::default(), Arc::new(ThreadRandom)).unwrap();
        assert_eq!(service.matcher().knowledge().categories().len(), 6);
        assert!(service.simulated_delay() >= Duration::from_millis(1000));
    }
}
