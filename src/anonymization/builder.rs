//! Mapping builder
//!
//! Owns every category table during the collection pass and turns extracted
//! identifiers into original→token entries. [`MappingBuilder::build`] runs the
//! post-passes (root domains, host/server de-duplication) and hands back a
//! frozen [`MappingSnapshot`].
//!
//! # Category rules
//!
//! | Category | Key | Token |
//! |---|---|---|
//! | MailRelay | full value | random (FQDN registers its suffix) or masked IPv4 |
//! | ServerIdentity | first value ever seen | random |
//! | SystemAccount | trailing account of `DOMAIN\user` | random |
//! | ManagementServer / ManagementHost | leaf label of an FQDN, else full value | random, or masked IPv4 |
//! | HierarchicalLocation | each interior path component | random |
//! | EmailAddress | full address | `<random>@<token of its domain>` |
//!
//! Originals that differ only in letter case share the token of the first one
//! registered, matching the case-insensitive substitution.

use crate::anonymization::anonymizer::{RandomTokenGenerator, TokenGenerator};
use crate::anonymization::classifier::{
    account_name, classify_host, extract_email_domain, interior_components, mask_ipv4,
    root_domain, split_fqdn, HostKind,
};
use crate::anonymization::detector::{Extraction, IdentifierExtractor};
use crate::anonymization::models::{Category, MappingSnapshot, MappingTable};
use std::collections::BTreeMap;

/// Order in which categories are collected from each file
pub const COLLECTION_ORDER: [Category; 7] = [
    Category::MailRelay,
    Category::ServerIdentity,
    Category::SystemAccount,
    Category::ManagementServer,
    Category::HierarchicalLocation,
    Category::ManagementHost,
    Category::EmailAddress,
];

/// Builds the per-category mapping tables
pub struct MappingBuilder {
    generator: Box<dyn TokenGenerator>,
    tables: BTreeMap<Category, MappingTable>,
    degraded: BTreeMap<Category, String>,
}

impl MappingBuilder {
    /// Create a builder drawing tokens from `generator`
    pub fn new(generator: Box<dyn TokenGenerator>) -> Self {
        let tables = Category::ALL
            .into_iter()
            .map(|c| (c, MappingTable::new()))
            .collect();
        Self {
            generator,
            tables,
            degraded: BTreeMap::new(),
        }
    }

    /// Create a builder with random tokens of `token_length` characters
    pub fn with_random_tokens(token_length: usize) -> Self {
        Self::new(Box::new(RandomTokenGenerator::new(token_length)))
    }

    /// Run every collectable category of one file's content through the builder
    pub fn ingest_content(&mut self, extractor: &dyn IdentifierExtractor, content: &str) {
        for category in COLLECTION_ORDER {
            let extraction = extractor.extract(category, content);
            self.ingest(category, &extraction);
        }
    }

    /// Add the outcome of one category extraction
    pub fn ingest(&mut self, category: Category, extraction: &Extraction) {
        match extraction {
            Extraction::Found(values) => {
                tracing::trace!(category = %category, count = values.len(), "Collecting values");
                for value in values {
                    self.add(category, value);
                }
            }
            Extraction::Empty => {}
            Extraction::Degraded(reason) => {
                if !self.degraded.contains_key(&category) {
                    crate::log_category_skipped!(category, reason);
                    self.degraded.insert(category, reason.clone());
                }
            }
        }
    }

    /// Register a single extracted value for a category
    pub fn add(&mut self, category: Category, value: &str) {
        if value.is_empty() {
            return;
        }
        match category {
            Category::MailRelay => self.add_mail_relay(value),
            Category::ServerIdentity => self.add_server_identity(value),
            Category::SystemAccount => self.add_account(value),
            Category::ManagementServer | Category::ManagementHost => self.add_host(category, value),
            Category::HierarchicalLocation => self.add_location(value),
            Category::EmailAddress => self.add_email(value),
            Category::DomainSuffix => {
                self.register_domain(value);
            }
        }
    }

    /// Categories skipped so far, with the first reason seen
    pub fn degraded(&self) -> &BTreeMap<Category, String> {
        &self.degraded
    }

    /// Run the post-passes and freeze the tables
    pub fn build(mut self) -> MappingSnapshot {
        self.register_root_domains();
        self.exclude_hosts_known_as_servers();

        if self.table(Category::ServerIdentity).is_empty() {
            tracing::info!("No primary server identity found; server substitution will be skipped");
        }

        MappingSnapshot::from_tables(self.tables)
    }

    fn table(&mut self, category: Category) -> &mut MappingTable {
        self.tables.entry(category).or_default()
    }

    fn insert_random(&mut self, category: Category, original: &str) {
        let generator = &mut self.generator;
        self.tables
            .entry(category)
            .or_default()
            .get_or_insert_folded_with(original, || generator.generate());
    }

    fn insert_fixed(&mut self, category: Category, original: &str, token: String) {
        self.table(category).get_or_insert_folded_with(original, || token);
    }

    /// Register a domain suffix, returning its token
    fn register_domain(&mut self, suffix: &str) -> String {
        let generator = &mut self.generator;
        self.tables
            .entry(Category::DomainSuffix)
            .or_default()
            .get_or_insert_folded_with(suffix, || generator.generate())
            .to_string()
    }

    fn add_mail_relay(&mut self, value: &str) {
        match classify_host(value) {
            HostKind::Fqdn => {
                let (_, suffix) = split_fqdn(value);
                self.register_domain(suffix);
                self.insert_random(Category::MailRelay, value);
            }
            HostKind::Ipv4 => self.insert_fixed(Category::MailRelay, value, mask_ipv4(value)),
            HostKind::Bare => self.insert_random(Category::MailRelay, value),
        }
    }

    fn add_server_identity(&mut self, value: &str) {
        if self.table(Category::ServerIdentity).is_empty() {
            tracing::debug!("Primary server identity found");
            self.insert_random(Category::ServerIdentity, value);
        }
    }

    fn add_account(&mut self, value: &str) {
        match account_name(value) {
            Some(account) => self.insert_random(Category::SystemAccount, account),
            None => tracing::debug!("Account value without domain qualifier ignored"),
        }
    }

    fn add_host(&mut self, category: Category, value: &str) {
        match classify_host(value) {
            HostKind::Fqdn => {
                let (leaf, suffix) = split_fqdn(value);
                self.register_domain(suffix);
                self.insert_random(category, leaf);
            }
            HostKind::Ipv4 => self.insert_fixed(category, value, mask_ipv4(value)),
            HostKind::Bare => self.insert_random(category, value),
        }
    }

    fn add_location(&mut self, value: &str) {
        for component in interior_components(value) {
            if !component.is_empty() {
                self.insert_random(Category::HierarchicalLocation, component);
            }
        }
    }

    fn add_email(&mut self, value: &str) {
        if self.table(Category::EmailAddress).contains_folded(value) {
            // Case variant of a known address keeps that address's token
            self.insert_fixed(Category::EmailAddress, value, String::new());
            return;
        }
        let local_token = self.generator.generate();
        let token = match extract_email_domain(value) {
            Some(domain) => {
                let domain_token = self.register_domain(domain);
                format!("{local_token}@{domain_token}")
            }
            None => local_token,
        };
        self.insert_fixed(Category::EmailAddress, value, token);
    }

    /// Register the two-label root of every suffix with more than two labels
    fn register_root_domains(&mut self) {
        let roots: Vec<String> = self
            .table(Category::DomainSuffix)
            .entries()
            .iter()
            .filter_map(|e| root_domain(&e.original).map(str::to_string))
            .collect();

        for root in roots {
            self.register_domain(&root);
        }
    }

    /// Drop hosts whose original is also a management server original
    fn exclude_hosts_known_as_servers(&mut self) {
        let servers = self.table(Category::ManagementServer).clone();
        let before = self.table(Category::ManagementHost).len();
        self.table(Category::ManagementHost)
            .retain(|e| !servers.contains_folded(&e.original));

        let excluded = before - self.table(Category::ManagementHost).len();
        if excluded > 0 {
            tracing::debug!(excluded, "Hosts already mapped as management servers");
        }
    }
}

impl Default for MappingBuilder {
    fn default() -> Self {
        Self::new(Box::new(RandomTokenGenerator::default()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anonymization::anonymizer::SequentialTokenGenerator;

    fn builder() -> MappingBuilder {
        MappingBuilder::new(Box::new(SequentialTokenGenerator::new("T")))
    }

    fn found(values: &[&str]) -> Extraction {
        Extraction::Found(values.iter().map(|v| v.to_string()).collect())
    }

    #[test]
    fn test_management_server_fqdn_registers_suffix_and_leaf() {
        let mut b = builder();
        b.add(Category::ManagementServer, "vcenter01.corp.example.com");
        let snapshot = b.build();

        assert!(snapshot
            .token_for(Category::ManagementServer, "vcenter01")
            .is_some());
        assert!(snapshot
            .token_for(Category::DomainSuffix, "corp.example.com")
            .is_some());
        assert!(snapshot
            .token_for(Category::DomainSuffix, "example.com")
            .is_some());
    }

    #[test]
    fn test_ipv4_hosts_are_masked_not_tokenized() {
        let mut b = builder();
        b.add(Category::ManagementHost, "10.0.5.21");
        b.add(Category::MailRelay, "192.168.7.9");
        let snapshot = b.build();

        assert_eq!(
            snapshot.token_for(Category::ManagementHost, "10.0.5.21"),
            Some("**.**.5.21")
        );
        assert_eq!(
            snapshot.token_for(Category::MailRelay, "192.168.7.9"),
            Some("**.**.7.9")
        );
    }

    #[test]
    fn test_mail_relay_keeps_full_value() {
        let mut b = builder();
        b.add(Category::MailRelay, "smtp.corp.local");
        let snapshot = b.build();

        assert!(snapshot
            .token_for(Category::MailRelay, "smtp.corp.local")
            .is_some());
        assert!(snapshot
            .token_for(Category::DomainSuffix, "corp.local")
            .is_some());
    }

    #[test]
    fn test_server_identity_first_value_only() {
        let mut b = builder();
        b.ingest(Category::ServerIdentity, &found(&["vbr01", "vbr02"]));
        b.ingest(Category::ServerIdentity, &found(&["vbr03"]));
        let snapshot = b.build();

        assert_eq!(snapshot.entries(Category::ServerIdentity).len(), 1);
        assert_eq!(snapshot.primary_server().unwrap().original, "vbr01");
    }

    #[test]
    fn test_missing_server_identity_is_tolerated() {
        let snapshot = builder().build();
        assert!(snapshot.primary_server().is_none());
    }

    #[test]
    fn test_account_keeps_only_trailing_name() {
        let mut b = builder();
        b.add(Category::SystemAccount, r"CORP\jdoe");
        b.add(Category::SystemAccount, r"OTHER\jdoe");
        let snapshot = b.build();

        let entries = snapshot.entries(Category::SystemAccount);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].original, "jdoe");
        assert!(snapshot.token_for(Category::DomainSuffix, "CORP").is_none());
    }

    #[test]
    fn test_location_interior_components() {
        let mut b = builder();
        b.add(Category::HierarchicalLocation, r"vc01\DC-Paris\Prod\app01");
        b.add(Category::HierarchicalLocation, r"vc01\DC-Paris\Test\app02");
        let snapshot = b.build();

        let originals: Vec<_> = snapshot
            .entries(Category::HierarchicalLocation)
            .iter()
            .map(|e| e.original.as_str())
            .collect();
        assert_eq!(originals, vec!["DC-Paris", "Prod", "Test"]);
    }

    #[test]
    fn test_email_reuses_domain_token() {
        let mut b = builder();
        b.add(Category::ManagementServer, "vc01.corp.example.com");
        b.add(Category::EmailAddress, "admin@corp.example.com");
        let snapshot = b.build();

        let domain_token = snapshot
            .token_for(Category::DomainSuffix, "corp.example.com")
            .unwrap();
        let email_token = snapshot
            .token_for(Category::EmailAddress, "admin@corp.example.com")
            .unwrap();
        assert!(email_token.ends_with(&format!("@{domain_token}")));
    }

    #[test]
    fn test_email_registers_new_domain() {
        let mut b = builder();
        b.add(Category::EmailAddress, "ops@mail.example.org");
        let snapshot = b.build();

        assert!(snapshot
            .token_for(Category::DomainSuffix, "mail.example.org")
            .is_some());
        assert!(snapshot
            .token_for(Category::DomainSuffix, "example.org")
            .is_some());
    }

    #[test]
    fn test_host_also_server_is_excluded() {
        let mut b = builder();
        b.add(Category::ManagementServer, "vc01.lab.local");
        b.add(Category::ManagementHost, "vc01.lab.local");
        b.add(Category::ManagementHost, "esx01.lab.local");
        let snapshot = b.build();

        let hosts: Vec<_> = snapshot
            .entries(Category::ManagementHost)
            .iter()
            .map(|e| e.original.as_str())
            .collect();
        assert_eq!(hosts, vec!["esx01"]);
        assert!(snapshot
            .token_for(Category::ManagementServer, "vc01")
            .is_some());
    }

    #[test]
    fn test_domain_entries_are_never_overwritten() {
        let mut b = builder();
        b.add(Category::ManagementServer, "a.corp.example.com");
        let first = b.register_domain("corp.example.com");
        b.add(Category::ManagementHost, "b.corp.example.com");
        let second = b.register_domain("corp.example.com");
        assert_eq!(first, second);
    }

    #[test]
    fn test_case_variants_reuse_first_token() {
        let mut b = builder();
        b.add(Category::MailRelay, "smtp.corp.local");
        b.add(Category::MailRelay, "SMTP.CORP.LOCAL");
        b.add(Category::EmailAddress, "ops@corp.local");
        b.add(Category::EmailAddress, "OPS@CORP.LOCAL");
        let snapshot = b.build();

        let relays = snapshot.entries(Category::MailRelay);
        assert_eq!(relays.len(), 2);
        assert_eq!(relays[0].token, relays[1].token);
        assert_eq!(
            snapshot.token_for(Category::DomainSuffix, "CORP.LOCAL"),
            snapshot.token_for(Category::DomainSuffix, "corp.local")
        );
        assert_eq!(
            snapshot.token_for(Category::EmailAddress, "OPS@CORP.LOCAL"),
            snapshot.token_for(Category::EmailAddress, "ops@corp.local")
        );
        // T1 domain, T2 relay, T3 email local part
        assert_eq!(
            snapshot.token_for(Category::EmailAddress, "ops@corp.local"),
            Some("T3@T1")
        );
    }

    #[test]
    fn test_host_case_variant_of_server_is_excluded() {
        let mut b = builder();
        b.add(Category::ManagementServer, "vc01.lab.local");
        b.add(Category::ManagementHost, "VC01.lab.local");
        let snapshot = b.build();

        assert!(snapshot.entries(Category::ManagementHost).is_empty());
    }

    #[test]
    fn test_degraded_category_recorded_once() {
        let mut b = builder();
        b.ingest(Category::EmailAddress, &Extraction::Degraded("missing".into()));
        b.ingest(Category::EmailAddress, &Extraction::Degraded("again".into()));
        assert_eq!(b.degraded().get(&Category::EmailAddress).unwrap(), "missing");
    }
}
