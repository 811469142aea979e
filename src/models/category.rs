//! Budget table categories and the unit × category key tables are stored under

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The two line-item families a budget table can hold
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BudgetCategory {
    /// Travel line items ("Misiones")
    Missions,
    /// Contracted personnel line items ("Consultorías")
    Consulting,
}

impl BudgetCategory {
    /// Slug used in file names and storage keys
    pub fn slug(&self) -> &'static str {
        match self {
            BudgetCategory::Missions => "misiones",
            BudgetCategory::Consulting => "consultorias",
        }
    }

    /// All categories, in display order
    pub fn all() -> &'static [BudgetCategory] {
        &[BudgetCategory::Missions, BudgetCategory::Consulting]
    }
}

impl fmt::Display for BudgetCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BudgetCategory::Missions => write!(f, "Misiones"),
            BudgetCategory::Consulting => write!(f, "Consultorías"),
        }
    }
}

impl FromStr for BudgetCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "misiones" | "mision" | "misión" | "missions" | "mission" => {
                Ok(BudgetCategory::Missions)
            }
            "consultorias" | "consultorías" | "consultoria" | "consultoría" | "consulting" => {
                Ok(BudgetCategory::Consulting)
            }
            other => Err(format!(
                "unknown category '{}' (expected 'misiones' or 'consultorias')",
                other
            )),
        }
    }
}

/// Identifies one stored table: an organizational unit and a category
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TableKey {
    pub unit: String,
    pub category: BudgetCategory,
}

impl TableKey {
    pub fn new(unit: impl Into<String>, category: BudgetCategory) -> Self {
        Self {
            unit: unit.into(),
            category,
        }
    }

    /// File-system safe stem, e.g. `VPO__misiones`
    pub fn file_stem(&self) -> String {
        let unit: String = self
            .unit
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        format!("{}__{}", unit, self.category.slug())
    }
}

impl fmt::Display for TableKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.unit, self.category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_from_str() {
        assert_eq!(
            "Misiones".parse::<BudgetCategory>().unwrap(),
            BudgetCategory::Missions
        );
        assert_eq!(
            "Consultorías".parse::<BudgetCategory>().unwrap(),
            BudgetCategory::Consulting
        );
        assert!("viajes".parse::<BudgetCategory>().is_err());
    }

    #[test]
    fn test_file_stem_is_sanitized() {
        let key = TableKey::new("VP/Ops 2", BudgetCategory::Consulting);
        assert_eq!(key.file_stem(), "VP_Ops_2__consultorias");
    }

    #[test]
    fn test_key_display() {
        let key = TableKey::new("VPO", BudgetCategory::Missions);
        assert_eq!(key.to_string(), "VPO/Misiones");
    }
}
