//! Substitution engine
//!
//! Applies a frozen [`MappingSnapshot`] to file content. Categories are applied
//! in the fixed [`SUBSTITUTION_ORDER`], then the IPv4 masking pass runs over
//! whatever literals remain.
//!
//! Matching is literal and case-insensitive. A match written entirely in lower
//! case receives the token in lower case; any other match receives it upper-cased.
//!
//! Because earlier steps rewrite the text, most entries are searched for in the
//! form they have *after* those steps: an email `admin@corp.example.com` whose
//! domain was already replaced by the domain step is found as `admin@<domain token>`
//! and completed by the email step, so every occurrence ends as the email token.
//! Mail relays are the exception. Their keys stay as captured, so a relay whose
//! domain was already replaced keeps the shared domain token (`smtp.<domain token>`).
//!
//! # Examples
//!
//! ```
//! use logscrub::anonymization::{AnonymizationConfig, MappingBuilder, SubstitutionEngine};
//! use logscrub::anonymization::anonymizer::SequentialTokenGenerator;
//! use logscrub::anonymization::models::Category;
//!
//! let mut builder = MappingBuilder::new(Box::new(SequentialTokenGenerator::new("tok")));
//! builder.add(Category::ManagementHost, "esx01.lab.local");
//! let snapshot = builder.build();
//!
//! let engine = SubstitutionEngine::new(&snapshot, &AnonymizationConfig::default())?;
//! assert_eq!(engine.apply("host esx01.lab.local at 10.1.2.3"), "host tok2.tok1 at **.**.2.3");
//! # Ok::<(), logscrub::domain::ScrubError>(())
//! ```

use crate::anonymization::anonymizer::Ipv4Masker;
use crate::anonymization::config::AnonymizationConfig;
use crate::anonymization::models::{Category, MappingSnapshot};
use crate::domain::{Result, ScrubError};
use regex::{Regex, RegexBuilder};
use std::collections::{BTreeMap, HashSet};

/// Order in which category substitutions are applied
///
/// Broader identifiers come first so a later category never re-matches text an
/// earlier one already replaced; all of them run before IPv4 masking so named
/// hosts are tokenized rather than merely masked.
pub const SUBSTITUTION_ORDER: [Category; 8] = [
    Category::ServerIdentity,
    Category::ManagementHost,
    Category::DomainSuffix,
    Category::MailRelay,
    Category::ManagementServer,
    Category::SystemAccount,
    Category::EmailAddress,
    Category::HierarchicalLocation,
];

/// One literal replacement
#[derive(Debug, Clone)]
struct LiteralRule {
    search: Regex,
    token: String,
}

impl LiteralRule {
    fn new(key: &str, token: &str) -> Result<Self> {
        let search = RegexBuilder::new(&regex::escape(key))
            .case_insensitive(true)
            .build()
            .map_err(|e| ScrubError::Other(format!("Failed to compile substitution: {e}")))?;
        Ok(Self {
            search,
            token: token.to_string(),
        })
    }

    fn apply(&self, content: &str) -> (String, usize) {
        let mut count = 0;
        let replaced = self.search.replace_all(content, |caps: &regex::Captures<'_>| {
            count += 1;
            case_matched(&self.token, &caps[0])
        });
        (replaced.into_owned(), count)
    }
}

/// Ordered literal replacements for one category
#[derive(Debug, Clone)]
struct SubstitutionStep {
    category: Category,
    rules: Vec<LiteralRule>,
}

/// What a substitution replaced
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubstitutionStats {
    /// Number of replacements per category
    pub replacements: BTreeMap<Category, usize>,
    /// Number of IPv4 literals masked by the final pass
    pub masked_ipv4: usize,
    /// Whether the masking pass was skipped after a matcher failure
    pub masking_skipped: bool,
}

impl SubstitutionStats {
    /// Total replacements, masking included
    pub fn total(&self) -> usize {
        self.replacements.values().sum::<usize>() + self.masked_ipv4
    }
}

/// Content after substitution
#[derive(Debug, Clone, Default)]
pub struct Substitution {
    /// Anonymized content
    pub content: String,
    /// What was replaced
    pub stats: SubstitutionStats,
}

/// Applies the mapping to file content
///
/// Immutable after construction; share it across threads behind an `Arc`.
#[derive(Debug, Clone)]
pub struct SubstitutionEngine {
    steps: Vec<SubstitutionStep>,
    masker: Ipv4Masker,
}

impl SubstitutionEngine {
    /// Compile the substitution steps for a snapshot
    ///
    /// # Errors
    ///
    /// Returns an error if an IPv4 exemption setting or a literal cannot be compiled.
    pub fn new(snapshot: &MappingSnapshot, config: &AnonymizationConfig) -> Result<Self> {
        let masker = Ipv4Masker::new(&config.ipv4_exempt_prefixes)?;
        let mut steps: Vec<SubstitutionStep> = Vec::with_capacity(SUBSTITUTION_ORDER.len());

        for category in SUBSTITUTION_ORDER {
            let mut keyed: Vec<(String, &str)> = Vec::new();
            let mut seen = HashSet::new();

            for entry in snapshot.entries(category) {
                let key = if rewrites_keys(category) {
                    rewrite(&steps, &entry.original)
                } else {
                    entry.original.clone()
                };
                if key.is_empty() || !seen.insert(key.to_lowercase()) {
                    continue;
                }
                keyed.push((key, entry.token.as_str()));
            }

            // Longest first so "Production" is not clobbered by "Prod".
            keyed.sort_by(|a, b| b.0.len().cmp(&a.0.len()).then_with(|| a.0.cmp(&b.0)));

            let rules = keyed
                .iter()
                .map(|(key, token)| LiteralRule::new(key, token))
                .collect::<Result<Vec<_>>>()?;

            if rules.is_empty() {
                tracing::debug!(category = %category, "No substitutions for category");
            }
            steps.push(SubstitutionStep { category, rules });
        }

        Ok(Self { steps, masker })
    }

    /// Anonymize content
    pub fn apply(&self, content: &str) -> String {
        self.apply_with_stats(content).content
    }

    /// Anonymize content and report what was replaced
    pub fn apply_with_stats(&self, content: &str) -> Substitution {
        let mut result = Substitution {
            content: content.to_string(),
            ..Default::default()
        };

        for step in &self.steps {
            let mut step_count = 0;
            for rule in &step.rules {
                let (next, count) = rule.apply(&result.content);
                if count > 0 {
                    result.content = next;
                    step_count += count;
                }
            }
            if step_count > 0 {
                result.stats.replacements.insert(step.category, step_count);
            }
        }

        match self.masker.mask(&result.content) {
            Ok((masked, count)) => {
                result.content = masked;
                result.stats.masked_ipv4 = count;
            }
            Err(e) => {
                tracing::warn!(error = %e, "IPv4 masking skipped");
                result.stats.masking_skipped = true;
            }
        }

        result
    }

    /// Categories in application order with their rule counts
    pub fn plan(&self) -> Vec<(Category, usize)> {
        self.steps
            .iter()
            .map(|s| (s.category, s.rules.len()))
            .collect()
    }
}

/// Whether a category's keys are searched for after the earlier steps
fn rewrites_keys(category: Category) -> bool {
    category != Category::MailRelay
}

/// Run `value` through already-compiled steps
fn rewrite(steps: &[SubstitutionStep], value: &str) -> String {
    let mut current = value.to_string();
    for step in steps {
        for rule in &step.rules {
            let (next, count) = rule.apply(&current);
            if count > 0 {
                current = next;
            }
        }
    }
    current
}

/// At least one cased character and none upper-case
fn is_all_lowercase(s: &str) -> bool {
    let mut has_cased = false;
    for c in s.chars() {
        if c.is_uppercase() {
            return false;
        }
        if c.is_lowercase() {
            has_cased = true;
        }
    }
    has_cased
}

/// Token cased after the occurrence it replaces
fn case_matched(token: &str, occurrence: &str) -> String {
    if is_all_lowercase(occurrence) {
        token.to_lowercase()
    } else {
        token.to_uppercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anonymization::anonymizer::SequentialTokenGenerator;
    use crate::anonymization::builder::MappingBuilder;

    fn builder() -> MappingBuilder {
        MappingBuilder::new(Box::new(SequentialTokenGenerator::new("Tok")))
    }

    fn engine(builder: MappingBuilder) -> (MappingSnapshot, SubstitutionEngine) {
        let snapshot = builder.build();
        let engine = SubstitutionEngine::new(&snapshot, &AnonymizationConfig::default()).unwrap();
        (snapshot, engine)
    }

    #[test]
    fn test_order_is_declared() {
        let (_, engine) = engine(builder());
        let order: Vec<_> = engine.plan().into_iter().map(|(c, _)| c).collect();
        assert_eq!(order, SUBSTITUTION_ORDER.to_vec());
    }

    #[test]
    fn test_case_rule() {
        assert_eq!(case_matched("AbC1", "smtp.corp.local"), "abc1");
        assert_eq!(case_matched("AbC1", "SMTP.CORP.LOCAL"), "ABC1");
        assert_eq!(case_matched("AbC1", "Smtp"), "ABC1");
        assert_eq!(case_matched("AbC1", "1234"), "ABC1");
    }

    #[test]
    fn test_case_preservation_end_to_end() {
        let mut b = builder();
        b.add(Category::MailRelay, "smtp.corp.local");
        let (snapshot, engine) = engine(b);

        let relay = snapshot
            .token_for(Category::MailRelay, "smtp.corp.local")
            .unwrap()
            .to_string();
        let domain = snapshot
            .token_for(Category::DomainSuffix, "corp.local")
            .unwrap()
            .to_string();

        let lower = engine.apply("relay smtp.corp.local");
        let upper = engine.apply("RELAY SMTP.CORP.LOCAL");

        assert_eq!(lower, format!("relay smtp.{}", domain.to_lowercase()));
        assert_eq!(upper, format!("RELAY SMTP.{}", domain.to_uppercase()));
        assert!(!lower.contains(&relay.to_lowercase()));
    }

    #[test]
    fn test_relay_keeps_shared_domain_token() {
        let mut b = builder();
        b.add(Category::MailRelay, "smtp.corp.example.com");
        b.add(Category::ManagementServer, "vcenter01.corp.example.com");
        let (snapshot, engine) = engine(b);

        let domain = snapshot
            .token_for(Category::DomainSuffix, "corp.example.com")
            .unwrap()
            .to_lowercase();
        let server = snapshot
            .token_for(Category::ManagementServer, "vcenter01")
            .unwrap()
            .to_lowercase();

        let out = engine.apply("relay smtp.corp.example.com vc vcenter01.corp.example.com");
        assert_eq!(out, format!("relay smtp.{domain} vc {server}.{domain}"));
    }

    #[test]
    fn test_bare_relay_is_tokenized() {
        let mut b = builder();
        b.add(Category::MailRelay, "smtp01");
        let (snapshot, engine) = engine(b);

        let relay = snapshot.token_for(Category::MailRelay, "smtp01").unwrap();
        assert_eq!(engine.apply("relay smtp01"), format!("relay {}", relay.to_lowercase()));
    }

    #[test]
    fn test_email_completed_after_domain_step() {
        let mut b = builder();
        b.add(Category::EmailAddress, "admin@corp.example.com");
        let (snapshot, engine) = engine(b);

        let token = snapshot
            .token_for(Category::EmailAddress, "admin@corp.example.com")
            .unwrap()
            .to_lowercase();
        assert_eq!(engine.apply("notify admin@corp.example.com"), format!("notify {token}"));
    }

    #[test]
    fn test_longer_originals_first() {
        let mut b = builder();
        b.add(Category::HierarchicalLocation, r"vc\Prod\x");
        b.add(Category::HierarchicalLocation, r"vc\Production\x");
        let (snapshot, engine) = engine(b);

        let production = snapshot
            .token_for(Category::HierarchicalLocation, "Production")
            .unwrap()
            .to_uppercase();
        let out = engine.apply(r"folder Production");
        assert_eq!(out, format!("folder {production}"));
    }

    #[test]
    fn test_missing_server_is_noop() {
        let (_, engine) = engine(builder());
        assert_eq!(engine.apply("plain text"), "plain text");
    }

    #[test]
    fn test_stats_are_counted() {
        let mut b = builder();
        b.add(Category::SystemAccount, r"CORP\jdoe");
        let (_, engine) = engine(b);

        let result = engine.apply_with_stats("jdoe logged in; JDOE logged out from 10.9.8.7");
        assert_eq!(result.stats.replacements.get(&Category::SystemAccount), Some(&2));
        assert_eq!(result.stats.masked_ipv4, 1);
        assert_eq!(result.stats.total(), 3);
        assert!(!result.stats.masking_skipped);
    }
}
