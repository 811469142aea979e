//! Group-by aggregation of line-item totals
//!
//! Groups are returned in lexical order of their key values. Rows missing a
//! value for an ordinary key land in the `(none)` group so no total is lost;
//! objective grouping is the exception and drops rows whose objective is not
//! a valid flag, reporting them as warnings.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::models::{BudgetTable, Field, LineData, Money, Objective, Rounding, Warning};

/// Label of the group that collects rows without a key value
pub const NO_VALUE: &str = "(none)";

/// A categorical field tables can be grouped by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupKey {
    Country,
    Objective,
    Area,
    OrgUnit,
    Type,
    Role,
}

impl GroupKey {
    pub fn field(&self) -> Field {
        match self {
            GroupKey::Country => Field::Country,
            GroupKey::Objective => Field::Objective,
            GroupKey::Area => Field::Area,
            GroupKey::OrgUnit => Field::OrgUnit,
            GroupKey::Type => Field::Type,
            GroupKey::Role => Field::Role,
        }
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.field().name())
    }
}

impl FromStr for GroupKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.parse::<Field>()? {
            Field::Country => Ok(GroupKey::Country),
            Field::Objective => Ok(GroupKey::Objective),
            Field::Area => Ok(GroupKey::Area),
            Field::OrgUnit => Ok(GroupKey::OrgUnit),
            Field::Type => Ok(GroupKey::Type),
            Field::Role => Ok(GroupKey::Role),
            other => Err(format!("cannot group by '{}'", other)),
        }
    }
}

/// Summed totals for one group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupTotal {
    /// One value per grouping key
    pub values: Vec<String>,
    pub total: Money,
    /// Indices of the rows in this group
    pub rows: Vec<usize>,
}

impl GroupTotal {
    /// Key values joined for display, e.g. `Chile / R`
    pub fn label(&self) -> String {
        self.values.join(" / ")
    }
}

/// Result of grouping a table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupedTotals {
    pub keys: Vec<GroupKey>,
    pub groups: Vec<GroupTotal>,
    /// Rows left out of every group (invalid or missing objective)
    pub excluded_rows: Vec<usize>,
    pub warnings: Vec<Warning>,
}

impl GroupedTotals {
    /// Sum of all group totals
    pub fn total(&self) -> Money {
        self.groups.iter().map(|g| g.total).sum()
    }

    /// Look up a group by its key values
    pub fn get(&self, values: &[&str]) -> Option<&GroupTotal> {
        self.groups
            .iter()
            .find(|g| g.values.iter().map(String::as_str).eq(values.iter().copied()))
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// Sum row totals grouped by one or more keys
pub fn group_totals(table: &BudgetTable, keys: &[GroupKey]) -> GroupedTotals {
    let by_objective = keys.contains(&GroupKey::Objective);
    let mut groups: BTreeMap<Vec<String>, GroupTotal> = BTreeMap::new();
    let mut excluded_rows = Vec::new();
    let mut warnings = Vec::new();
    let mut missing_objective = 0;

    for (index, row) in table.rows.iter().enumerate() {
        if by_objective {
            match row.objective() {
                Some(value) if Objective::parse(value).is_some() => {}
                Some(value) if !value.trim().is_empty() => {
                    warnings.push(Warning::InvalidObjective {
                        table: table.name.clone(),
                        row: index,
                        value: value.to_string(),
                    });
                    excluded_rows.push(index);
                    continue;
                }
                _ => {
                    missing_objective += 1;
                    excluded_rows.push(index);
                    continue;
                }
            }
        }

        let values: Vec<String> = keys
            .iter()
            .map(|key| match *key {
                GroupKey::Objective => row
                    .objective()
                    .and_then(Objective::parse)
                    .map(|o| o.to_string())
                    .unwrap_or_else(|| NO_VALUE.to_string()),
                other => row
                    .text(other.field())
                    .map(str::trim)
                    .filter(|v| !v.is_empty())
                    .unwrap_or(NO_VALUE)
                    .to_string(),
            })
            .collect();

        let group = groups.entry(values.clone()).or_insert_with(|| GroupTotal {
            values,
            total: Money::zero(),
            rows: Vec::new(),
        });
        group.total += row.total;
        group.rows.push(index);
    }

    if missing_objective > 0 {
        warnings.push(Warning::MissingObjective {
            table: table.name.clone(),
            rows: missing_objective,
        });
    }

    GroupedTotals {
        keys: keys.to_vec(),
        groups: groups.into_values().collect(),
        excluded_rows,
        warnings,
    }
}

/// Warnings for rows whose objective is set but invalid
///
/// Lets callers surface objective problems without grouping by objective.
pub fn objective_warnings(table: &BudgetTable) -> Vec<Warning> {
    table
        .rows
        .iter()
        .enumerate()
        .filter_map(|(index, row)| {
            let value = row.objective()?;
            if value.trim().is_empty() || Objective::parse(value).is_some() {
                return None;
            }
            Some(Warning::InvalidObjective {
                table: table.name.clone(),
                row: index,
                value: value.to_string(),
            })
        })
        .collect()
}

/// Ungrouped sum of every row total
pub fn grand_total(table: &BudgetTable) -> Money {
    table.grand_total()
}

/// Column sums of the mission cost components
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ComponentTotals {
    pub fare_cost: Money,
    pub lodging_cost: Money,
    pub per_diem_cost: Money,
    pub mobility_cost: Money,
}

impl ComponentTotals {
    /// Labeled components in display order
    pub fn entries(&self) -> [(Field, Money); 4] {
        [
            (Field::FareCost, self.fare_cost),
            (Field::LodgingCost, self.lodging_cost),
            (Field::PerDiemCost, self.per_diem_cost),
            (Field::MobilityCost, self.mobility_cost),
        ]
    }
}

/// Sum each cost column of a mission table; `None` for consulting tables
pub fn component_totals(table: &BudgetTable) -> Option<ComponentTotals> {
    if table.category != crate::models::BudgetCategory::Missions {
        return None;
    }

    let mut sums = [0.0_f64; 4];
    for row in &table.rows {
        if let LineData::Mission(m) = &row.data {
            sums[0] += m.fare_cost;
            sums[1] += m.lodging_cost;
            sums[2] += m.per_diem_cost;
            sums[3] += m.mobility_cost;
        }
    }

    let money = |v: f64| Money::from_f64(v, Rounding::TwoDecimal);
    Some(ComponentTotals {
        fare_cost: money(sums[0]),
        lodging_cost: money(sums[1]),
        per_diem_cost: money(sums[2]),
        mobility_cost: money(sums[3]),
    })
}
