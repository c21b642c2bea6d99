//! Typed request parameters.
//!
//! Query strings arrive with snake_case or camelCase keys; both are folded to
//! camelCase before lookup. Validation happens here, before any network call.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::EstimateError;

const REQUIRED_KEYS: [&str; 5] = [
    "circleToken",
    "workflowId",
    "projectName",
    "projectUser",
    "projectVcs",
];

/// Version control system hosting the project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Vcs {
    Github,
    Bitbucket,
}

impl Vcs {
    /// Canonical form used in v1.1 project URLs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Vcs::Github => "github",
            Vcs::Bitbucket => "bitbucket",
        }
    }
}

impl FromStr for Vcs {
    type Err = EstimateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "gh" | "github" => Ok(Vcs::Github),
            "bb" | "bitbucket" => Ok(Vcs::Bitbucket),
            other => Err(EstimateError::InvalidParams(format!(
                "Invalid project_vcs '{other}'. Use one of: github, gh, bitbucket, bb"
            ))),
        }
    }
}

impl fmt::Display for Vcs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Addresses a project for the per-job detail endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectRef {
    pub vcs: Vcs,
    pub owner: String,
    pub name: String,
}

/// Validated input for one estimate.
#[derive(Debug, Clone)]
pub struct EstimateParams {
    pub token: String,
    pub workflow_id: String,
    pub project: ProjectRef,
    /// Overrides the configured provider host when set.
    pub base_url: Option<String>,
}

impl EstimateParams {
    /// Build from individually supplied values, rejecting blanks.
    pub fn new(
        token: &str,
        workflow_id: &str,
        owner: &str,
        name: &str,
        vcs: &str,
        base_url: Option<&str>,
    ) -> Result<Self, EstimateError> {
        let mut query = HashMap::new();
        query.insert("circleToken".to_string(), token.to_string());
        query.insert("workflowId".to_string(), workflow_id.to_string());
        query.insert("projectUser".to_string(), owner.to_string());
        query.insert("projectName".to_string(), name.to_string());
        query.insert("projectVcs".to_string(), vcs.to_string());
        if let Some(url) = base_url {
            query.insert("circleUrl".to_string(), url.to_string());
        }
        Self::from_query(&query)
    }

    /// Parse a raw query-string map. All missing keys are reported at once.
    ///
    /// When both spellings of a key are present, the camelCase one wins.
    pub fn from_query(query: &HashMap<String, String>) -> Result<Self, EstimateError> {
        let mut normalized: HashMap<String, &str> = HashMap::new();
        for (key, value) in query {
            let value = value.trim();
            if value.is_empty() {
                continue;
            }
            let camel = snake_to_camel(key);
            if camel == *key {
                normalized.insert(camel, value);
            } else {
                normalized.entry(camel).or_insert(value);
            }
        }

        let missing: Vec<&str> = REQUIRED_KEYS
            .iter()
            .copied()
            .filter(|k| !normalized.contains_key(*k))
            .collect();
        if !missing.is_empty() {
            return Err(EstimateError::InvalidParams(format!(
                "Please provide query parameters: {}",
                missing
                    .iter()
                    .map(|k| camel_to_snake(k))
                    .collect::<Vec<_>>()
                    .join(", ")
            )));
        }

        let get = |key: &str| normalized.get(key).map(|v| v.to_string()).unwrap_or_default();
        Ok(Self {
            token: get("circleToken"),
            workflow_id: get("workflowId"),
            project: ProjectRef {
                vcs: get("projectVcs").parse()?,
                owner: get("projectUser"),
                name: get("projectName"),
            },
            base_url: normalized.get("circleUrl").map(|v| v.to_string()),
        })
    }
}

/// `this_is_snake_case` -> `thisIsSnakeCase`. Already camelCase input is unchanged.
pub fn snake_to_camel(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut upper_next = false;
    for c in s.chars() {
        if c == '_' {
            upper_next = !out.is_empty();
        } else if upper_next {
            out.extend(c.to_uppercase());
            upper_next = false;
        } else {
            out.push(c);
        }
    }
    out
}

fn camel_to_snake(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 4);
    for c in s.chars() {
        if c.is_ascii_uppercase() {
            out.push('_');
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}
