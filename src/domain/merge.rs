//! Language merge strategies and the dispatch registry.

use std::collections::HashMap;
use std::sync::Arc;

use itertools::Itertools;
use tracing::debug;

use crate::domain::error::{MergeError, MergeResult};
use crate::domain::rules::RuleBlockParser;

/// A per-language merge implementation.
///
/// `merge` folds an incoming snippet into the current full text and returns
/// the full replacement text. Implementations are pure over their inputs;
/// reading and persisting text belongs to the caller.
pub trait MergeStrategy: Send + Sync {
    /// Canonical language tag, lowercase.
    fn language(&self) -> &str;

    /// Additional tags that resolve to this strategy.
    fn aliases(&self) -> &[&str] {
        &[]
    }

    /// Fold `incoming` into `current` and return the replacement text.
    fn merge(&self, current: &str, incoming: &str) -> MergeResult<String>;

    /// How snippets must be shaped to merge cleanly under this strategy,
    /// written to be pasted into a generative model's system prompt.
    fn prompt_instructions(&self) -> &str;
}

const CSS_PROMPT_INSTRUCTIONS: &str = "\
When emitting css, follow these merge rules:\n\
- Emit complete rule blocks only: `selector { property: value; }`.\n\
- A block whose selector already exists in the document replaces that block \
entirely; never emit a property-level diff.\n\
- To clear a selector, emit it with an empty body: `selector { }`.\n\
- Blocks you do not mention are kept untouched, in their current position.\n\
- An at-rule such as `@media` is one opaque block keyed by its full head; \
re-emit the whole at-rule to change any part of it.";

/// Block-level CSS merge: last write wins per selector.
///
/// Also answers for the `scss` and `less` tags, whose rule-block surface
/// merges the same way.
pub struct CssMerge {
    parser: RuleBlockParser,
}

impl CssMerge {
    pub fn new() -> Self {
        Self {
            parser: RuleBlockParser::new(),
        }
    }
}

impl Default for CssMerge {
    fn default() -> Self {
        Self::new()
    }
}

impl MergeStrategy for CssMerge {
    fn language(&self) -> &str {
        "css"
    }

    fn aliases(&self) -> &[&str] {
        &["scss", "less"]
    }

    /// Appends `incoming` below `current`, scans the combined text, then
    /// keeps only the last occurrence of each key, at that occurrence's own
    /// position. A re-emitted selector therefore moves to where the snippet
    /// put it instead of updating in place.
    fn merge(&self, current: &str, incoming: &str) -> MergeResult<String> {
        let combined = format!("{current}\n\n{incoming}");
        let blocks = self.parser.parse(&combined);

        // Walking from the end makes the last occurrence the one that
        // survives dedup.
        let mut survivors: Vec<_> = blocks
            .iter()
            .rev()
            .unique_by(|block| block.key.clone())
            .collect();
        survivors.reverse();

        debug!(
            scanned = blocks.len(),
            kept = survivors.len(),
            "merged rule blocks"
        );
        Ok(survivors.iter().map(|block| block.render()).join("\n\n"))
    }

    fn prompt_instructions(&self) -> &str {
        CSS_PROMPT_INSTRUCTIONS
    }
}

const PROMPT_PREAMBLE: &str = "\
Reply with fenced code snippets tagged by language. Each snippet is merged \
into the existing document rather than replacing it, so emit only the parts \
you are changing and follow the merge rules for the snippet language.";

/// Tag-indexed strategy registry, the uniform entry point for merges.
///
/// Tags resolve case-insensitively. Registering a strategy for an already
/// claimed tag shadows the earlier registration, so callers can swap out a
/// built-in.
pub struct MergeRegistry {
    by_tag: HashMap<String, Arc<dyn MergeStrategy>>,
}

impl MergeRegistry {
    /// An empty registry. Most callers want [`MergeRegistry::with_defaults`].
    pub fn new() -> Self {
        Self {
            by_tag: HashMap::new(),
        }
    }

    /// A registry with the built-in strategies registered.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(CssMerge::new()));
        registry
    }

    /// Register `strategy` under its language tag and all of its aliases.
    pub fn register(&mut self, strategy: Arc<dyn MergeStrategy>) {
        for alias in strategy.aliases() {
            self.by_tag
                .insert(alias.to_ascii_lowercase(), Arc::clone(&strategy));
        }
        self.by_tag
            .insert(strategy.language().to_ascii_lowercase(), strategy);
    }

    /// Resolve a language tag to its strategy.
    pub fn strategy(&self, language: &str) -> Option<&dyn MergeStrategy> {
        self.by_tag
            .get(&language.to_ascii_lowercase())
            .map(Arc::as_ref)
    }

    /// Fold `incoming` into `current` through the strategy for `language`.
    pub fn merge(&self, language: &str, current: &str, incoming: &str) -> MergeResult<String> {
        let strategy = self
            .strategy(language)
            .ok_or_else(|| MergeError::UnknownLanguage(language.to_string()))?;
        debug!(language = strategy.language(), "dispatching merge");
        strategy.merge(current, incoming)
    }

    /// Canonical tags with a registered strategy, sorted.
    pub fn languages(&self) -> Vec<&str> {
        self.by_tag
            .values()
            .map(|strategy| strategy.language())
            .unique()
            .sorted()
            .collect()
    }

    /// The instructions document covering every registered strategy,
    /// sections in language order under a shared preamble.
    pub fn prompt_instructions(&self) -> String {
        let sections = self
            .languages()
            .into_iter()
            .filter_map(|language| self.strategy(language))
            .map(|strategy| strategy.prompt_instructions())
            .join("\n\n");
        format!("{PROMPT_PREAMBLE}\n\n{sections}")
    }
}

impl Default for MergeRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
