use std::fmt;
use std::str::FromStr;

use anyhow::{anyhow, Result};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Id reserved for a task the remote service has not confirmed yet.
pub const PLACEHOLDER_ID: u64 = 0;

/// A task as exchanged with the remote collection resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: u64,
    #[serde(rename = "userId")]
    pub owner_id: u64,
    pub title: String,
    #[serde(default)]
    pub completed: bool,
}

impl Task {
    pub fn is_placeholder(&self) -> bool {
        self.id == PLACEHOLDER_ID
    }
}

/// Body submitted when creating a task; the service answers with the same shape plus `id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTask {
    #[serde(rename = "userId")]
    pub owner_id: u64,
    pub title: String,
    pub completed: bool,
}

impl NewTask {
    pub fn new(owner_id: u64, title: impl Into<String>) -> Self {
        Self {
            owner_id,
            title: title.into(),
            completed: false,
        }
    }

    /// The stand-in shown while the create call is in flight.
    pub fn placeholder(&self) -> Task {
        Task {
            id: PLACEHOLDER_ID,
            owner_id: self.owner_id,
            title: self.title.clone(),
            completed: self.completed,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterMode {
    #[default]
    All,
    Active,
    Completed,
}

impl FilterMode {
    pub const ALL: &'static [FilterMode] =
        &[FilterMode::All, FilterMode::Active, FilterMode::Completed];

    pub fn as_str(&self) -> &'static str {
        match self {
            FilterMode::All => "all",
            FilterMode::Active => "active",
            FilterMode::Completed => "completed",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            FilterMode::All => "All",
            FilterMode::Active => "Active",
            FilterMode::Completed => "Completed",
        }
    }

    /// Hash route the filter links point at.
    pub fn fragment(&self) -> &'static str {
        match self {
            FilterMode::All => "#/",
            FilterMode::Active => "#/active",
            FilterMode::Completed => "#/completed",
        }
    }

    /// Resolve a hash route; unknown routes fall back to showing everything.
    pub fn from_fragment(fragment: &str) -> Self {
        match fragment.trim().trim_start_matches('#').trim_matches('/') {
            "active" => FilterMode::Active,
            "completed" => FilterMode::Completed,
            _ => FilterMode::All,
        }
    }

    pub fn matches(&self, task: &Task) -> bool {
        match self {
            FilterMode::All => true,
            FilterMode::Active => !task.completed,
            FilterMode::Completed => task.completed,
        }
    }
}

impl fmt::Display for FilterMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for FilterMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "all" => Ok(FilterMode::All),
            "active" => Ok(FilterMode::Active),
            "completed" => Ok(FilterMode::Completed),
            other => Err(anyhow!(
                "Unknown filter '{}': expected all|active|completed",
                other
            )),
        }
    }
}

impl ValueEnum for FilterMode {
    fn value_variants<'a>() -> &'a [Self] {
        Self::ALL
    }

    fn to_possible_value(&self) -> Option<clap::builder::PossibleValue> {
        Some(clap::builder::PossibleValue::new(self.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[test]
    fn task_uses_remote_field_names() {
        let task: Task =
            serde_json::from_str(r#"{"id":7,"userId":42,"title":"Buy milk","completed":true}"#)
                .unwrap();
        assert_eq!(
            task,
            Task {
                id: 7,
                owner_id: 42,
                title: "Buy milk".into(),
                completed: true,
            }
        );

        let body = serde_json::to_value(NewTask::new(42, "Buy milk")).unwrap();
        assert_eq!(
            body,
            serde_json::json!({"userId": 42, "title": "Buy milk", "completed": false})
        );
    }

    #[test]
    fn placeholder_mirrors_draft_with_reserved_id() {
        let draft = NewTask::new(5, "Write report");
        let placeholder = draft.placeholder();
        assert!(placeholder.is_placeholder());
        assert_eq!(placeholder.title, "Write report");
        assert_eq!(placeholder.owner_id, 5);
        assert!(!placeholder.completed);
    }

    #[rstest]
    #[case("#/", FilterMode::All)]
    #[case("#/active", FilterMode::Active)]
    #[case("#/completed", FilterMode::Completed)]
    #[case("#/unknown", FilterMode::All)]
    #[case("", FilterMode::All)]
    fn filter_mode_from_fragment(#[case] fragment: &str, #[case] expected: FilterMode) {
        assert_eq!(FilterMode::from_fragment(fragment), expected);
    }

    #[test]
    fn filter_mode_parses_names() {
        assert_eq!("Active".parse::<FilterMode>().unwrap(), FilterMode::Active);
        assert!("later".parse::<FilterMode>().is_err());
        for mode in FilterMode::ALL {
            assert_eq!(FilterMode::from_fragment(mode.fragment()), *mode);
        }
    }

    #[rstest]
    #[case("open")]
    #[case("done")]
    fn filter_mode_accepts_only_clap_values(#[case] raw: &str) {
        assert!(raw.parse::<FilterMode>().is_err());
        assert!(<FilterMode as ValueEnum>::from_str(raw, true).is_err());
        for mode in FilterMode::ALL {
            let name = mode.to_possible_value().unwrap().get_name().to_string();
            assert_eq!(name.parse::<FilterMode>().unwrap(), *mode);
        }
    }
}
