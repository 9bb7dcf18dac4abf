//! Identifier categories

use serde::{Deserialize, Serialize};
use std::fmt;

/// Class of sensitive identifier found in diagnostic logs
///
/// Each extractable category owns one key in the external pattern table.
/// [`Category::DomainSuffix`] is derived while other categories are decomposed
/// and has no pattern of its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Primary backup server name (singleton)
    ServerIdentity,
    /// Domain-qualified service accounts (`DOMAIN\user`)
    SystemAccount,
    /// SMTP relay hosts
    MailRelay,
    /// vCenter-equivalent management servers
    ManagementServer,
    /// ESXi-equivalent managed hosts
    ManagementHost,
    /// Interior folder levels of backslash-delimited object paths
    HierarchicalLocation,
    /// Email addresses
    EmailAddress,
    /// Domain suffixes derived from fully-qualified names
    DomainSuffix,
}

impl Category {
    /// Every category, in declaration order
    pub const ALL: [Category; 8] = [
        Category::ServerIdentity,
        Category::SystemAccount,
        Category::MailRelay,
        Category::ManagementServer,
        Category::ManagementHost,
        Category::HierarchicalLocation,
        Category::EmailAddress,
        Category::DomainSuffix,
    ];

    /// Key of this category in the pattern table
    ///
    /// Returns `None` for [`Category::DomainSuffix`], which is never extracted directly.
    pub fn pattern_key(&self) -> Option<&'static str> {
        match self {
            Self::ServerIdentity => Some("VeeamServer"),
            Self::SystemAccount => Some("VeeamUser"),
            Self::MailRelay => Some("SMTPServer"),
            Self::ManagementServer => Some("vCenter"),
            Self::ManagementHost => Some("ESXiServer"),
            Self::HierarchicalLocation => Some("Location"),
            Self::EmailAddress => Some("Email"),
            Self::DomainSuffix => None,
        }
    }

    /// Section name used in the dictionary file and the mapping report
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::ServerIdentity => "Veeam Server",
            Self::SystemAccount => "VeeamUsers",
            Self::MailRelay => "SMTP Servers",
            Self::ManagementServer => "vCenter Servers",
            Self::ManagementHost => "ESXi hosts",
            Self::HierarchicalLocation => "vCenter Location",
            Self::EmailAddress => "Email address",
            Self::DomainSuffix => "Domain names",
        }
    }

    /// Short label used in log fields
    pub fn label(&self) -> &'static str {
        match self {
            Self::ServerIdentity => "server",
            Self::SystemAccount => "account",
            Self::MailRelay => "mail_relay",
            Self::ManagementServer => "management_server",
            Self::ManagementHost => "management_host",
            Self::HierarchicalLocation => "location",
            Self::EmailAddress => "email",
            Self::DomainSuffix => "domain",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
