//! Admin access control: a configuration-supplied email allow-list.
//!
//! Sign-in is delegated entirely to the identity provider; this set
//! membership check is the whole authorization surface. No roles, no
//! scopes.

use std::collections::HashSet;

/// Case-insensitive set of admin email addresses.
#[derive(Debug, Clone, Default)]
pub struct AllowList {
    emails: HashSet<String>,
}

impl AllowList {
    /// Parse a comma-separated list, trimming whitespace and skipping
    /// empty entries.
    pub fn from_csv(raw: &str) -> Self {
        let emails = raw
            .split(',')
            .map(|entry| entry.trim().to_ascii_lowercase())
            .filter(|entry| !entry.is_empty())
            .collect();
        Self { emails }
    }

    pub fn is_allowed(&self, email: &str) -> bool {
        self.emails.contains(&email.trim().to_ascii_lowercase())
    }

    /// An empty list locks everyone out; the server warns at startup.
    pub fn is_empty(&self) -> bool {
        self.emails.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn membership_is_case_insensitive() {
        let list = AllowList::from_csv("ops@aegis.dev, CTO@aegis.dev");
        assert!(list.is_allowed("ops@aegis.dev"));
        assert!(list.is_allowed("Ops@Aegis.Dev"));
        assert!(list.is_allowed(" cto@aegis.dev "));
        assert!(!list.is_allowed("intruder@aegis.dev"));
    }

    #[test]
    fn empty_and_blank_entries_are_skipped() {
        let list = AllowList::from_csv(" , ,");
        assert!(list.is_empty());
        assert!(!list.is_allowed(""));
    }
}
