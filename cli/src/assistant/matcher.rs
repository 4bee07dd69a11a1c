//! # Response Matcher
//!
//! File: cli/src/assistant/matcher.rs
//!
//! ## Overview
//!
//! Turns a free-text message into a single reply:
//! 1. Lowercase the message.
//! 2. Walk the categories in declaration order.
//! 3. Take the first category with a keyword contained in the message.
//! 4. Pick one of its responses uniformly at random, or one of the default
//!    responses if nothing matched.
//!
//! The matcher holds no per-call state. It is cheap to clone and safe to share
//! between tasks: the knowledge base is immutable and randomness comes from
//! an injected `RandomSource`.
//!
//! Matching is plain substring containment. `"rain"` fires inside `"brain"`
//! and the market keyword `"price"` contains the rice keyword `"rice"`, so a
//! question about prices is answered by the rice category, which is declared
//! first. Both are long-standing behaviour and are covered by tests below.
//!
use super::knowledge::{Category, KnowledgeBase};
use super::random::RandomSource;
use crate::core::error::{KrishiError, Result};
use std::sync::Arc;
use tracing::debug;

/// A chosen reply and the category that produced it (`None` for the default pool).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reply<'a> {
    pub topic: Option<&'a str>,
    pub text: &'a str,
}

#[derive(Clone)]
pub struct ResponseMatcher {
    knowledge: Arc<KnowledgeBase>,
    random: Arc<dyn RandomSource>,
}

impl ResponseMatcher {
    pub fn new(knowledge: Arc<KnowledgeBase>, random: Arc<dyn RandomSource>) -> Self {
        Self { knowledge, random }
    }

    pub fn knowledge(&self) -> &KnowledgeBase {
        &self.knowledge
    }

    /// First category, in declaration order, with a keyword inside `message`.
    pub fn classify(&self, message: &str) -> Option<&Category> {
        let lowered = message.to_lowercase();
        self.knowledge
            .categories()
            .iter()
            .find(|category| category.matches(&lowered))
    }

    pub fn reply(&self, message: &str) -> Reply<'_> {
        match self.classify(message) {
            Some(category) => {
                debug!(topic = %category.name, "Message matched a category");
                Reply {
                    topic: Some(&category.name),
                    text: self.choose(&category.responses),
                }
            }
            None => {
                debug!("No category matched; answering from the default pool");
                Reply {
                    topic: None,
                    text: self.choose(self.knowledge.default_responses()),
                }
            }
        }
    }

    /// Reply text for `message`. Never fails; the empty string gets a default response.
    pub fn respond(&self, message: &str) -> String {
        self.reply(message).text.to_string()
    }

    /// Boundary entry point for raw input. Bytes that are not UTF-8 text are
    /// rejected with `InvalidInput` instead of being guessed at.
    #[allow(dead_code)] // The CLI goes through ChatService; kept for callers without a runtime.
    pub fn respond_bytes(&self, raw: &[u8]) -> Result<String> {
        Ok(self.respond(decode_message(raw)?))
    }

    // Pools are non-empty by construction; a missing or out-of-range pick
    // falls back to the first entry.
    fn choose<'a>(&self, pool: &'a [String]) -> &'a str {
        self.random
            .pick_index(pool.len())
            .and_then(|index| pool.get(index))
            .or_else(|| pool.first())
            .map(String::as_str)
            .unwrap_or_default()
    }
}

/// Reads raw input as text, failing with `InvalidInput` on bytes that are not UTF-8.
pub fn decode_message(raw: &[u8]) -> Result<&str> {
    std::str::from_utf8(raw).map_err(|e| {
        KrishiError::InvalidInput(format!("message is not valid UTF-8 text ({e})")).into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assistant::random::{FixedSequence, SeededRandom, ThreadRandom};
    use std::collections::HashSet;

    fn builtin() -> Arc<KnowledgeBase> {
        Arc::new(KnowledgeBase::builtin().unwrap())
    }

    fn matcher() -> ResponseMatcher {
        ResponseMatcher::new(builtin(), Arc::new(ThreadRandom))
    }

    fn pool<'a>(m: &'a ResponseMatcher, topic: &str) -> &'a [String] {
        &m.knowledge().category(topic).unwrap().responses
    }

    fn assert_from_pool(m: &ResponseMatcher, message: &str, expected: &[String]) {
        for _ in 0..50 {
            let reply = m.respond(message);
            assert!(
                expected.contains(&reply),
                "reply to {message:?} came from the wrong pool: {reply:?}"
            );
        }
    }

    #[test]
    fn plant_rice_answers_from_rice() {
        let m = matcher();
        assert_from_pool(&m, "When should I plant rice?", pool(&m, "rice"));
        assert_eq!(m.reply("When should I plant rice?").topic, Some("rice"));
    }

    #[test]
    fn monsoon_rains_answers_from_weather() {
        let m = matcher();
        assert_from_pool(&m, "What about the monsoon rains?", pool(&m, "weather"));
    }

    #[test]
    fn empty_and_unmatched_messages_use_default_pool() {
        let m = matcher();
        let defaults = m.knowledge().default_responses().to_vec();
        for message in ["", "hello there", "tell me a joke", "🌾"] {
            assert_eq!(m.reply(message).topic, None);
            assert_from_pool(&m, message, &defaults);
        }
    }

    #[test]
    fn first_declared_category_wins() {
        let m = matcher();
        assert_eq!(
            m.reply("I need fertilizer and pest advice").topic,
            Some("fertilizer")
        );
        assert_from_pool(&m, "I need fertilizer and pest advice", pool(&m, "fertilizer"));
        // Position in the message does not matter, only declaration order.
        assert_eq!(m.reply("Rain is flooding my paddy").topic, Some("rice"));
    }

    #[test]
    fn every_keyword_selects_the_first_category_containing_it() {
        let m = matcher();
        for category in m.knowledge().categories() {
            for keyword in &category.keywords {
                let expected = m
                    .knowledge()
                    .categories()
                    .iter()
                    .find(|c| c.matches(keyword))
                    .map(|c| c.name.as_str());
                assert_eq!(
                    m.reply(&format!("question: {keyword}?")).topic,
                    expected,
                    "keyword {keyword:?}"
                );
            }
        }
    }

    #[test]
    fn unique_keywords_stay_in_their_category() {
        let m = matcher();
        let cases = [
            ("Is this paddy healthy?", "rice"),
            ("Is the monsoon late?", "weather"),
            ("How much manure per acre?", "fertilizer"),
            ("An insect is eating my leaves", "pest"),
            ("Where are buyers for selling bananas?", "market"),
            ("Any subsidy for drip irrigation?", "subsidy"),
        ];
        for (message, topic) in cases {
            assert_eq!(m.reply(message).topic, Some(topic), "{message}");
            assert_from_pool(&m, message, pool(&m, topic));
        }
    }

    #[test]
    fn matching_ignores_case() {
        let m = matcher();
        assert_eq!(m.classify("RICE").map(|c| c.name.as_str()), Some("rice"));
        assert_eq!(m.classify("rice").map(|c| c.name.as_str()), Some("rice"));
        assert_eq!(m.classify("PaDdY fields").map(|c| c.name.as_str()), Some("rice"));
        assert_from_pool(&m, "RICE", pool(&m, "rice"));
    }

    #[test]
    fn substring_matches_inside_unrelated_words() {
        let m = matcher();
        assert_eq!(m.reply("My brain hurts").topic, Some("weather"));
        // "price" contains "rice", and rice is declared before market.
        assert_eq!(m.reply("What is the price of pepper?").topic, Some("rice"));
    }

    #[test]
    fn malayalam_and_hindi_keywords_match() {
        let m = matcher();
        assert_eq!(m.reply("മഴ എപ്പോൾ വരും?").topic, Some("weather"));
        assert_eq!(m.reply("चावल की खेती कैसे करें").topic, Some("rice"));
        assert_eq!(m.reply("सब्सिडी कैसे मिलेगी").topic, Some("subsidy"));
        assert_eq!(m.reply("കീടം ശല്യം").topic, Some("pest"));
    }

    #[test]
    fn injected_random_drives_selection() {
        let kb = builtin();
        let rice = kb.category("rice").unwrap().responses.clone();

        let second = ResponseMatcher::new(kb.clone(), Arc::new(FixedSequence::always(1)));
        assert_eq!(second.respond("rice"), rice[1]);

        let unavailable = ResponseMatcher::new(kb.clone(), Arc::new(FixedSequence::new(vec![None])));
        assert_eq!(unavailable.respond("rice"), rice[0]);

        let out_of_range = ResponseMatcher::new(kb, Arc::new(FixedSequence::always(99)));
        assert_eq!(out_of_range.respond("rice"), rice[0]);
    }

    #[test]
    fn random_selection_reaches_every_response() {
        let m = ResponseMatcher::new(builtin(), Arc::new(SeededRandom::new(11)));
        let seen: HashSet<String> = (0..200).map(|_| m.respond("nothing to see")).collect();
        assert_eq!(seen.len(), m.knowledge().default_responses().len());
    }

    #[test]
    fn respond_bytes_rejects_non_utf8() {
        let m = matcher();
        let err = m.respond_bytes(&[0x72, 0x69, 0xff, 0xfe]).unwrap_err();
        let inner = err.downcast_ref::<KrishiError>().unwrap();
        assert!(inner.is_invalid_input());

        let reply = m.respond_bytes("paddy".as_bytes()).unwrap();
        assert!(pool(&m, "rice").contains(&reply));
    }

    #[test]
    fn shared_matcher_answers_from_many_threads() {
        let m = matcher();
        let rice = pool(&m, "rice").to_vec();
        std::thread::scope(|scope| {
            for _ in 0..4 {
                scope.spawn(|| {
                    for _ in 0..25 {
                        assert!(rice.contains(&m.respond("rice harvest")));
                    }
                });
            }
        });
    }
}
