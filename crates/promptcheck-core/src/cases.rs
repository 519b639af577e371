//! Cases file parsing and normalization.
//!
//! Two document shapes are accepted:
//!
//! ```yaml
//! # grouped by domain
//! interpersonal: ["I feel anxious", "..."]
//! emotion: ["..."]
//! ```
//!
//! ```yaml
//! # explicit list
//! - id: INT_01            # optional
//!   domain: interpersonal
//!   input: "I feel anxious"
//!   expect_traits: [brief] # optional
//! ```
//!
//! Both normalize into the same ordered `Vec<Case>`. Numeric and boolean
//! scalars are accepted as text in either shape.
//!
//! Only explicit ids must be unique. Synthesized ids may collide, e.g.
//! `distress` and `distraction` both yield `DIS_01`; such collisions are
//! logged and kept.

use crate::errors::{HarnessError, HarnessResult};
use crate::model::Case;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use serde_yaml::Value;
use std::collections::{HashMap, HashSet};
use std::path::Path;

/// The one dispatch point over accepted top-level shapes.
#[derive(Debug, Clone, PartialEq)]
pub enum CasesDocument {
    Grouped(Vec<(String, Vec<String>)>),
    List(Vec<RawCase>),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawCase {
    #[serde(default, deserialize_with = "optional_scalar")]
    pub id: Option<String>,
    pub domain: String,
    #[serde(deserialize_with = "scalar")]
    pub input: String,
    #[serde(default)]
    pub expect_traits: Vec<String>,
}

/// `{first 3 letters of domain, uppercased}_{index:02}`.
pub fn synthesize_id(domain: &str, index: usize) -> String {
    let prefix: String = domain.chars().take(3).collect::<String>().to_uppercase();
    format!("{}_{:02}", prefix, index)
}

impl CasesDocument {
    pub fn from_value(raw: Value, path: &Path) -> HarnessResult<Self> {
        match raw {
            Value::Mapping(map) => {
                let mut groups = Vec::with_capacity(map.len());
                for (key, inputs) in map {
                    let domain = scalar_to_string(&key).ok_or_else(|| {
                        HarnessError::format(path, "domain keys must be strings")
                    })?;
                    let Value::Sequence(items) = inputs else {
                        return Err(HarnessError::format(
                            path,
                            format!("domain '{}' must map to a list of inputs", domain),
                        ));
                    };
                    let inputs = items
                        .iter()
                        .map(|v| {
                            scalar_to_string(v).ok_or_else(|| {
                                HarnessError::format(
                                    path,
                                    format!("inputs for domain '{}' must be scalars", domain),
                                )
                            })
                        })
                        .collect::<HarnessResult<Vec<_>>>()?;
                    groups.push((domain, inputs));
                }
                Ok(CasesDocument::Grouped(groups))
            }
            Value::Sequence(items) => {
                let cases = items
                    .into_iter()
                    .enumerate()
                    .map(|(idx, item)| {
                        serde_yaml::from_value::<RawCase>(item).map_err(|e| {
                            HarnessError::format(path, format!("case #{}: {}", idx + 1, e))
                        })
                    })
                    .collect::<HarnessResult<Vec<_>>>()?;
                Ok(CasesDocument::List(cases))
            }
            _ => Err(HarnessError::format(
                path,
                "unsupported cases format (expected a domain mapping or a list of cases)",
            )),
        }
    }

    /// Flattens into ordered cases, synthesizing missing ids.
    pub fn normalize(self) -> Vec<Case> {
        let mut normalized: Vec<Case> = Vec::new();
        match self {
            CasesDocument::Grouped(groups) => {
                for (domain, inputs) in groups {
                    for (i, input) in inputs.into_iter().enumerate() {
                        normalized.push(Case {
                            id: synthesize_id(&domain, i + 1),
                            domain: domain.clone(),
                            input,
                            expect_traits: Vec::new(),
                        });
                    }
                }
            }
            CasesDocument::List(items) => {
                for item in items {
                    let id = match item.id {
                        Some(id) if !id.is_empty() => id,
                        _ => synthesize_id(&item.domain, normalized.len() + 1),
                    };
                    normalized.push(Case {
                        id,
                        domain: item.domain,
                        input: item.input,
                        expect_traits: item.expect_traits,
                    });
                }
            }
        }
        normalized
    }
}

fn scalar_to_string(v: &Value) -> Option<String> {
    match v {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn scalar<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    let v = Value::deserialize(d)?;
    scalar_to_string(&v).ok_or_else(|| D::Error::custom("expected a string, number or boolean"))
}

fn optional_scalar<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    match Value::deserialize(d)? {
        Value::Null => Ok(None),
        v => scalar_to_string(&v)
            .map(Some)
            .ok_or_else(|| D::Error::custom("expected a string, number or boolean")),
    }
}

/// Fails on the first explicit id that appears twice in a list-shaped document.
fn reject_explicit_duplicates(doc: &CasesDocument, path: &Path) -> HarnessResult<()> {
    let CasesDocument::List(items) = doc else {
        return Ok(());
    };
    let mut seen = HashSet::new();
    for id in items
        .iter()
        .filter_map(|c| c.id.as_deref())
        .filter(|id| !id.is_empty())
    {
        if !seen.insert(id) {
            return Err(HarnessError::DuplicateCaseId {
                id: id.to_string(),
                path: path.to_path_buf(),
            });
        }
    }
    Ok(())
}

fn warn_on_shared_ids(cases: &[Case], path: &Path) {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for case in cases {
        *counts.entry(case.id.as_str()).or_default() += 1;
    }
    let mut shared: Vec<_> = counts.into_iter().filter(|(_, n)| *n > 1).collect();
    shared.sort_unstable();
    for (id, n) in shared {
        tracing::warn!(
            id,
            count = n,
            path = %path.display(),
            "synthesized case id is shared by several cases"
        );
    }
}

/// Parses cases from YAML text; `path` is used for diagnostics only.
pub fn parse_cases(text: &str, path: &Path) -> HarnessResult<Vec<Case>> {
    let raw: Value = serde_yaml::from_str(text)
        .map_err(|e| HarnessError::format(path, format!("failed to parse YAML: {}", e)))?;
    let doc = CasesDocument::from_value(raw, path)?;
    reject_explicit_duplicates(&doc, path)?;

    let cases = doc.normalize();
    warn_on_shared_ids(&cases, path);
    Ok(cases)
}

pub fn load_cases(path: &Path) -> HarnessResult<Vec<Case>> {
    let text = std::fs::read_to_string(path).map_err(|e| HarnessError::io(path, e))?;
    parse_cases(&text, path)
}
