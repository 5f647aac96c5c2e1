use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::Event;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginCredentials {
    pub email: String,
    pub password: String,
}

impl LoginCredentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationData {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewEvent {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub starts_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_attendees: Option<u32>,
}

impl NewEvent {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub starts_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_attendees: Option<u32>,
}

impl EventPatch {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    pub fn apply_to(&self, event: &mut Event) {
        if let Some(title) = &self.title {
            event.title = title.clone();
        }
        if let Some(description) = &self.description {
            event.description = Some(description.clone());
        }
        if let Some(location) = &self.location {
            event.location = Some(location.clone());
        }
        if let Some(category) = &self.category {
            event.category = Some(category.clone());
        }
        if let Some(starts_at) = self.starts_at {
            event.starts_at = Some(starts_at);
        }
        if let Some(max_attendees) = self.max_attendees {
            event.max_attendees = Some(max_attendees);
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventFilters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<DateTime<Utc>>,
}

impl EventFilters {
    pub fn by_category(category: impl Into<String>) -> Self {
        Self {
            category: Some(category.into()),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.query_pairs().is_empty()
    }

    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(category) = non_blank(&self.category) {
            pairs.push(("category", category.to_string()));
        }
        if let Some(search) = non_blank(&self.search) {
            pairs.push(("search", search.to_string()));
        }
        if let Some(location) = non_blank(&self.location) {
            pairs.push(("location", location.to_string()));
        }
        if let Some(from) = self.from {
            pairs.push(("from", from.to_rfc3339()));
        }
        if let Some(to) = self.to {
            pairs.push(("to", to.to_rfc3339()));
        }
        pairs
    }

    pub fn matches(&self, event: &Event) -> bool {
        if let Some(category) = non_blank(&self.category) {
            let same = event
                .category
                .as_deref()
                .is_some_and(|value| value.eq_ignore_ascii_case(category));
            if !same {
                return false;
            }
        }

        if let Some(search) = non_blank(&self.search) {
            let needle = search.to_lowercase();
            let in_title = event.title.to_lowercase().contains(&needle);
            let in_description = event
                .description
                .as_deref()
                .is_some_and(|value| value.to_lowercase().contains(&needle));
            if !in_title && !in_description {
                return false;
            }
        }

        if let Some(location) = non_blank(&self.location) {
            let needle = location.to_lowercase();
            let found = event
                .location
                .as_deref()
                .is_some_and(|value| value.to_lowercase().contains(&needle));
            if !found {
                return false;
            }
        }

        if self.from.is_some() || self.to.is_some() {
            let Some(starts_at) = event.starts_at else {
                return false;
            };
            if self.from.is_some_and(|from| starts_at < from) {
                return false;
            }
            if self.to.is_some_and(|to| starts_at > to) {
                return false;
            }
        }

        true
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
#[path = "tests/protocol_tests.rs"]
mod tests;
