//! Rule-based plant assistant.
//!
//! Answers free-text questions from the species metadata table: list the
//! known plants, describe one plant, or find plants whose traditional uses
//! mention a condition.

use serde::Serialize;
use tracing::debug;

use crate::metadata::{SpeciesInfo, SpeciesMetadataStore};

const GREETING: &str =
    "Hello! I'm your medicinal plant assistant. Ask me about a plant or a health concern.";

const HELP: &str = "You can ask me things like:\n\
  - \"list all plants\" to see every plant I know\n\
  - \"tell me about tulsi\" for details on one plant\n\
  - \"plants for diabetes\" to find plants traditionally used for a condition\n\
To identify a leaf, run `leafid classify <photo>`.";

const FALLBACK: &str = "I'm not sure about that. Try \"list all plants\", \
\"tell me about neem\" or \"plants for headache\".";

const STOP_WORDS: &[&str] = &[
    "a", "an", "and", "any", "are", "best", "for", "good", "help", "helps", "herb", "herbs",
    "is", "me", "my", "of", "or", "plant", "plants", "show", "that", "the", "to", "treat",
    "treating", "what", "which", "with",
];

/// Free-text question answering over plant metadata.
pub trait Assistant {
    fn chat(&mut self, query: &str) -> String;

    fn clear_history(&mut self);
}

/// One question and its answer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatTurn {
    pub query: String,
    pub reply: String,
}

/// What a query asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    Greeting,
    Help,
    ListPlants,
    About(String),
    PlantsFor(Vec<String>),
    Unknown,
}

/// Keyword-driven [`Assistant`] over a metadata store.
pub struct PlantAssistant<'a> {
    store: &'a dyn SpeciesMetadataStore,
    history: Vec<ChatTurn>,
    auto_clear: bool,
}

impl<'a> PlantAssistant<'a> {
    pub fn new(store: &'a dyn SpeciesMetadataStore) -> Self {
        Self {
            store,
            history: Vec::new(),
            auto_clear: false,
        }
    }

    /// Start every question with an empty history.
    pub fn with_auto_clear(mut self, auto_clear: bool) -> Self {
        self.auto_clear = auto_clear;
        self
    }

    pub fn history(&self) -> &[ChatTurn] {
        &self.history
    }

    /// Classify a query.
    pub fn intent(&self, query: &str) -> Intent {
        let words = words(query);
        if words.is_empty() {
            return Intent::Unknown;
        }
        let text = words.join(" ");

        if matches!(
            words[0].as_str(),
            "hi" | "hello" | "hey" | "namaste" | "greetings"
        ) && words.len() <= 3
        {
            return Intent::Greeting;
        }
        if text == "help" || text.contains("how to use") || text.contains("what can you do") {
            return Intent::Help;
        }
        if text.contains("list") || text.contains("all plants") {
            return Intent::ListPlants;
        }

        let condition = condition_terms(&words);
        let asks_for_plants = words
            .iter()
            .any(|w| matches!(w.as_str(), "plant" | "plants" | "herb" | "herbs" | "which"));

        if !condition.is_empty() && asks_for_plants {
            return Intent::PlantsFor(condition);
        }
        if let Some(species) = self.mentioned_species(&words) {
            return Intent::About(species);
        }
        if !condition.is_empty() {
            return Intent::PlantsFor(condition);
        }
        Intent::Unknown
    }

    fn mentioned_species(&self, query: &[String]) -> Option<String> {
        let mut best: Option<(usize, &str)> = None;
        for id in self.store.species() {
            let Ok(info) = self.store.lookup(id) else {
                continue;
            };
            let names = std::iter::once(id).chain(info.common_name_list());
            for name in names {
                let name_words = words(name);
                if name_words.is_empty() || !contains_run(query, &name_words) {
                    continue;
                }
                if best.map_or(true, |(len, _)| name_words.len() > len) {
                    best = Some((name_words.len(), id));
                }
            }
        }
        best.map(|(_, id)| id.to_string())
    }

    fn answer(&self, intent: &Intent) -> String {
        match intent {
            Intent::Greeting => GREETING.to_string(),
            Intent::Help => HELP.to_string(),
            Intent::ListPlants => {
                let species = self.store.species();
                let names: Vec<String> = species.iter().map(|s| s.replace('_', " ")).collect();
                format!(
                    "I know about {} medicinal plants: {}.",
                    names.len(),
                    names.join(", ")
                )
            }
            Intent::About(id) => match self.store.lookup(id) {
                Ok(info) => describe(id, info),
                Err(_) => FALLBACK.to_string(),
            },
            Intent::PlantsFor(terms) => self.plants_for(terms),
            Intent::Unknown => FALLBACK.to_string(),
        }
    }

    fn plants_for(&self, terms: &[String]) -> String {
        let stems: Vec<String> = terms.iter().map(|t| stem(t)).collect();
        let matches: Vec<(String, Vec<&str>)> = self
            .store
            .species()
            .into_iter()
            .filter_map(|id| {
                let info = self.store.lookup(id).ok()?;
                let hits: Vec<&str> = info
                    .use_list()
                    .filter(|u| {
                        let u = u.to_lowercase();
                        stems.iter().any(|s| u.contains(s.as_str()))
                    })
                    .collect();
                (!hits.is_empty()).then(|| (id.replace('_', " "), hits))
            })
            .collect();

        let topic = terms.join(" and ");
        if matches.is_empty() {
            return format!(
                "I couldn't find plants traditionally used for {}. Try \"list all plants\" to browse.",
                topic
            );
        }

        let mut reply = format!("Plants traditionally used for {}:", topic);
        for (name, hits) in &matches {
            reply.push_str(&format!("\n  - {}: {}", name, hits.join(", ")));
        }
        reply.push_str("\nConsult a qualified practitioner before using any plant medicinally.");
        reply
    }
}

impl Assistant for PlantAssistant<'_> {
    fn chat(&mut self, query: &str) -> String {
        if self.auto_clear {
            self.history.clear();
        }
        let intent = self.intent(query);
        debug!(?intent, "Assistant query");
        let reply = self.answer(&intent);
        self.history.push(ChatTurn {
            query: query.to_string(),
            reply: reply.clone(),
        });
        reply
    }

    fn clear_history(&mut self) {
        self.history.clear();
    }
}

fn describe(id: &str, info: &SpeciesInfo) -> String {
    format!(
        "{} ({})\nFamily: {}\nCommon names: {}\n{}\nUses: {}\nParts used: {}\nPreparation: {}\nPrecautions: {}",
        id.replace('_', " "),
        info.scientific_name,
        info.family,
        info.common_names,
        info.description,
        info.uses,
        info.parts_used,
        info.preparation,
        info.precautions
    )
}

/// Lowercase alphanumeric words.
fn words(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_string)
        .collect()
}

fn contains_run(haystack: &[String], needle: &[String]) -> bool {
    haystack.windows(needle.len()).any(|w| w == needle)
}

/// Words after the last "for", minus filler.
fn condition_terms(words: &[String]) -> Vec<String> {
    let Some(pos) = words.iter().rposition(|w| w == "for") else {
        return Vec::new();
    };
    words[pos + 1..]
        .iter()
        .filter(|w| !STOP_WORDS.contains(&w.as_str()))
        .cloned()
        .collect()
}

/// Crude stem so "diabetes" finds "diabetic" and "immunity" finds "immune".
fn stem(term: &str) -> String {
    term.chars().take(5).collect()
}
