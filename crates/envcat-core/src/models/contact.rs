use serde::{Deserialize, Serialize};

/// A responsible party attached to a dataset. `role` is required; parties
/// without one are dropped at extraction time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    pub role: String,
    pub full_name: Option<String>,
    pub given_name: Option<String>,
    pub family_name: Option<String>,
    pub honorific_prefix: Option<String>,
    pub organisation_name: Option<String>,
    /// ROR or similar organisation URI.
    pub organisation_identifier: Option<String>,
    /// ORCID or similar person URI.
    pub name_identifier: Option<String>,
    pub position_name: Option<String>,
    pub email: Option<String>,
    pub address: Option<serde_json::Value>,
}

impl Contact {
    pub fn with_role(role: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            ..Default::default()
        }
    }

    /// Best human-readable person name: full name, else "given family".
    pub fn person_name(&self) -> Option<String> {
        if let Some(full) = self.full_name.as_deref().filter(|s| !s.trim().is_empty()) {
            return Some(full.trim().to_string());
        }
        let parts: Vec<&str> = [self.given_name.as_deref(), self.family_name.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect();
        (!parts.is_empty()).then(|| parts.join(" "))
    }

    /// Person name, falling back to the organisation.
    pub fn display_name(&self) -> Option<String> {
        self.person_name().or_else(|| {
            self.organisation_name
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        })
    }

    /// Case-insensitive substring match against every name field.
    pub fn matches_author(&self, needle: &str) -> bool {
        let needle = needle.trim().to_lowercase();
        if needle.is_empty() {
            return false;
        }
        [
            self.person_name(),
            self.given_name.clone(),
            self.family_name.clone(),
        ]
        .into_iter()
        .flatten()
        .any(|name| name.to_lowercase().contains(&needle))
    }

    pub fn matches_organisation(&self, needle: &str) -> bool {
        let needle = needle.trim().to_lowercase();
        !needle.is_empty()
            && self
                .organisation_name
                .as_deref()
                .is_some_and(|org| org.to_lowercase().contains(&needle))
    }

    /// Fill fields this contact lacks from `other`.
    pub fn absorb(&mut self, other: &Contact) {
        fn fill<T: Clone>(slot: &mut Option<T>, from: &Option<T>) {
            if slot.is_none() {
                slot.clone_from(from);
            }
        }
        fill(&mut self.full_name, &other.full_name);
        fill(&mut self.given_name, &other.given_name);
        fill(&mut self.family_name, &other.family_name);
        fill(&mut self.honorific_prefix, &other.honorific_prefix);
        fill(&mut self.organisation_name, &other.organisation_name);
        fill(&mut self.organisation_identifier, &other.organisation_identifier);
        fill(&mut self.name_identifier, &other.name_identifier);
        fill(&mut self.position_name, &other.position_name);
        fill(&mut self.email, &other.email);
        fill(&mut self.address, &other.address);
    }
}
