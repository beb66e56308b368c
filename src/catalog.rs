//! Building catalog: the built-in JSON dataset (compiled in) or a replacement file,
//! validated once at startup and read-only afterwards.

use std::collections::HashSet;

use tracing::{error, info, instrument, warn};

use crate::domain::BuildingRecord;
use crate::error::CatalogError;

const BUILTIN_CATALOG: &str = include_str!("../data/buildings.json");

#[derive(Clone, Debug, Default)]
pub struct Catalog {
  buildings: Vec<BuildingRecord>,
}

impl Catalog {
  /// Build a catalog from already-parsed records, dropping invalid entries.
  pub fn from_records(records: Vec<BuildingRecord>) -> Self {
    let mut seen = HashSet::new();
    let mut buildings = Vec::with_capacity(records.len());
    for rec in records {
      if let Err(reason) = validate_record(&rec) {
        error!(target: "catalog", id = %rec.id, %reason, "Skipping catalog entry");
        continue;
      }
      if !seen.insert(rec.id.clone()) {
        error!(target: "catalog", id = %rec.id, "Skipping catalog entry: duplicate id");
        continue;
      }
      buildings.push(rec);
    }
    Self { buildings }
  }

  pub fn from_json(s: &str) -> Result<Self, CatalogError> {
    let records: Vec<BuildingRecord> = serde_json::from_str(s)?;
    Ok(Self::from_records(records))
  }

  pub fn builtin() -> Result<Self, CatalogError> {
    Self::from_json(BUILTIN_CATALOG)
  }

  pub fn from_path(path: &str) -> Result<Self, CatalogError> {
    let s = std::fs::read_to_string(path)
      .map_err(|source| CatalogError::Io { path: path.to_string(), source })?;
    Self::from_json(&s)
  }

  /// Load from `path` when given, falling back to the built-in dataset on any error.
  #[instrument(level = "info", skip_all, fields(path = ?path))]
  pub fn load(path: Option<&str>) -> Self {
    if let Some(p) = path {
      match Self::from_path(p) {
        Ok(c) => {
          info!(target: "catalog", path = %p, buildings = c.len(), "Loaded catalog file");
          return c;
        }
        Err(e) => error!(target: "catalog", path = %p, error = %e, "Catalog file unusable; using built-in catalog"),
      }
    }
    match Self::builtin() {
      Ok(c) => {
        info!(target: "catalog", buildings = c.len(), "Loaded built-in catalog");
        c
      }
      Err(e) => {
        error!(target: "catalog", error = %e, "Built-in catalog is corrupt; quiz will be empty");
        Self::default()
      }
    }
  }

  pub fn buildings(&self) -> &[BuildingRecord] {
    &self.buildings
  }

  pub fn len(&self) -> usize {
    self.buildings.len()
  }

  pub fn is_empty(&self) -> bool {
    self.buildings.is_empty()
  }
}

/// Option sets must be non-empty and pairwise distinct.
fn validate_record(rec: &BuildingRecord) -> Result<(), String> {
  if rec.id.trim().is_empty() {
    return Err("empty id".into());
  }
  check_option_set("style", &rec.style, &rec.style_option_set())?;
  check_option_set("engineering", &rec.engineering_answer, &rec.engineering_option_set())?;
  if rec.style_distractors.len() != 3 {
    warn!(target: "catalog", id = %rec.id, count = rec.style_distractors.len(), "Style question does not offer 4 options");
  }
  Ok(())
}

fn check_option_set(label: &str, correct: &str, options: &[String]) -> Result<(), String> {
  if correct.trim().is_empty() {
    return Err(format!("empty correct {label} answer"));
  }
  let mut seen = HashSet::new();
  for o in options {
    if !seen.insert(o.as_str()) {
      return Err(format!("duplicate {label} option '{o}'"));
    }
  }
  Ok(())
}
