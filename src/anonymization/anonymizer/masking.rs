//! IPv4 masking pass
//!
//! Runs after every named category has been substituted. Two forms are masked:
//! plain dotted quads not immediately followed by `]`, then IPv6-mapped
//! literals (`[::ffff:a.b.c.d]`). Literals starting with an exempt prefix
//! (product versions such as `7.0.1.5`) are left untouched.

use crate::anonymization::classifier::{is_ipv4_literal, mask_ipv4};
use crate::domain::{Result, ScrubError};

const DOTTED_QUAD: &str = r"\b\d{1,3}\.\d{1,3}\.\d{1,3}\.\d{1,3}\b(?!\])";
const MAPPED_IPV4: &str = r"\[::ffff:([\d.]+)\]";

/// Default exemption prefixes
pub fn default_exempt_prefixes() -> Vec<String> {
    vec!["7.".to_string(), "8.".to_string()]
}

/// Masks IPv4 literals remaining in file content
#[derive(Debug, Clone)]
pub struct Ipv4Masker {
    dotted: fancy_regex::Regex,
    mapped: regex::Regex,
    exempt_prefixes: Vec<String>,
}

impl Ipv4Masker {
    /// Create a masker with the given exemption prefixes
    pub fn new(exempt_prefixes: &[String]) -> Result<Self> {
        let dotted = fancy_regex::Regex::new(DOTTED_QUAD)
            .map_err(|e| ScrubError::Other(format!("Invalid IPv4 expression: {e}")))?;
        let mapped = regex::Regex::new(MAPPED_IPV4)
            .map_err(|e| ScrubError::Other(format!("Invalid IPv4 expression: {e}")))?;

        Ok(Self {
            dotted,
            mapped,
            exempt_prefixes: exempt_prefixes.to_vec(),
        })
    }

    fn is_exempt(&self, ip: &str) -> bool {
        self.exempt_prefixes.iter().any(|p| ip.starts_with(p.as_str()))
    }

    /// Mask every eligible literal, returning the new content and the number masked
    ///
    /// # Errors
    ///
    /// Returns an error if the lookahead matcher gives up (backtracking limit).
    pub fn mask(&self, content: &str) -> Result<(String, usize)> {
        let (content, dotted_count) = self.mask_dotted(content)?;
        let (content, mapped_count) = self.mask_mapped(&content);
        Ok((content, dotted_count + mapped_count))
    }

    fn mask_dotted(&self, content: &str) -> Result<(String, usize)> {
        let mut output = String::with_capacity(content.len());
        let mut last = 0;
        let mut count = 0;

        for found in self.dotted.find_iter(content) {
            let found = found.map_err(|e| ScrubError::Other(format!("IPv4 masking failed: {e}")))?;
            if self.is_exempt(found.as_str()) {
                continue;
            }
            output.push_str(&content[last..found.start()]);
            output.push_str(&mask_ipv4(found.as_str()));
            last = found.end();
            count += 1;
        }
        output.push_str(&content[last..]);

        Ok((output, count))
    }

    fn mask_mapped(&self, content: &str) -> (String, usize) {
        let mut count = 0;
        let masked = self.mapped.replace_all(content, |caps: &regex::Captures<'_>| {
            let ip = &caps[1];
            if is_ipv4_literal(ip) && !self.is_exempt(ip) {
                count += 1;
                format!("[::ffff:{}]", mask_ipv4(ip))
            } else {
                caps[0].to_string()
            }
        });
        (masked.into_owned(), count)
    }
}
