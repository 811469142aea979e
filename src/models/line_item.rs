//! Line-item models
//!
//! A [`LineItem`] is one row of a budget table: a typed record for its
//! category plus the derived total and any extra source columns the engine
//! does not interpret.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::category::BudgetCategory;
use super::field::Field;
use super::money::{Money, Rounding};

/// The valid objective flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Objective {
    R,
    E,
}

impl Objective {
    /// Parse an objective flag, returning `None` for anything outside {"R","E"}
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "R" => Some(Objective::R),
            "E" => Some(Objective::E),
            _ => None,
        }
    }
}

impl fmt::Display for Objective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Objective::R => write!(f, "R"),
            Objective::E => write!(f, "E"),
        }
    }
}

/// A travel ("Misiones") line item
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MissionItem {
    pub country: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operation: Option<String>,
    pub staff_count: f64,
    pub days: f64,
    pub fare_cost: f64,
    pub lodging_cost: f64,
    pub per_diem_cost: f64,
    pub mobility_cost: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub objective: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub area: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub org_unit: Option<String>,
}

/// A contracted-personnel ("Consultorías") line item
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ConsultingItem {
    pub role: String,
    pub headcount: f64,
    pub monthly_amount: f64,
    pub month_count: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub area: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub objective: Option<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

/// The typed part of a row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "lowercase")]
pub enum LineData {
    Mission(MissionItem),
    Consulting(ConsultingItem),
}

/// Where the current total came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TotalSource {
    /// Computed by the total calculator
    #[default]
    Computed,
    /// Kept from the source table at load time
    Loaded,
}

/// One row of a budget table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub data: LineData,
    pub total: Money,
    #[serde(default)]
    pub total_source: TotalSource,
    /// Exact `Total` value read from the source, until the row is recomputed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_total: Option<Money>,
    /// Source columns not bound to a field, keyed by header
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: BTreeMap<String, String>,
}

impl LineItem {
    pub fn mission(item: MissionItem) -> Self {
        Self::from_data(LineData::Mission(item))
    }

    pub fn consulting(item: ConsultingItem) -> Self {
        Self::from_data(LineData::Consulting(item))
    }

    fn from_data(data: LineData) -> Self {
        Self {
            data,
            total: Money::zero(),
            total_source: TotalSource::Computed,
            source_total: None,
            extra: BTreeMap::new(),
        }
    }

    /// An empty row of the given category
    pub fn blank(category: BudgetCategory) -> Self {
        match category {
            BudgetCategory::Missions => Self::mission(MissionItem::default()),
            BudgetCategory::Consulting => Self::consulting(ConsultingItem::default()),
        }
    }

    pub fn category(&self) -> BudgetCategory {
        match self.data {
            LineData::Mission(_) => BudgetCategory::Missions,
            LineData::Consulting(_) => BudgetCategory::Consulting,
        }
    }

    /// The raw objective value, if any
    pub fn objective(&self) -> Option<&str> {
        match &self.data {
            LineData::Mission(m) => m.objective.as_deref(),
            LineData::Consulting(c) => c.objective.as_deref(),
        }
    }

    /// Read a text field; `None` when absent or not part of this shape
    pub fn text(&self, field: Field) -> Option<&str> {
        match (&self.data, field) {
            (LineData::Mission(m), Field::Country) => Some(m.country.as_str()),
            (LineData::Mission(m), Field::Operation) => m.operation.as_deref(),
            (LineData::Mission(m), Field::Objective) => m.objective.as_deref(),
            (LineData::Mission(m), Field::Area) => m.area.as_deref(),
            (LineData::Mission(m), Field::OrgUnit) => m.org_unit.as_deref(),
            (LineData::Consulting(c), Field::Role) => Some(c.role.as_str()),
            (LineData::Consulting(c), Field::Area) => c.area.as_deref(),
            (LineData::Consulting(c), Field::Objective) => c.objective.as_deref(),
            (LineData::Consulting(c), Field::Type) => c.kind.as_deref(),
            _ => None,
        }
    }

    /// Read a numeric input field; `None` when not part of this shape
    pub fn number(&self, field: Field) -> Option<f64> {
        match (&self.data, field) {
            (LineData::Mission(m), Field::StaffCount) => Some(m.staff_count),
            (LineData::Mission(m), Field::Days) => Some(m.days),
            (LineData::Mission(m), Field::FareCost) => Some(m.fare_cost),
            (LineData::Mission(m), Field::LodgingCost) => Some(m.lodging_cost),
            (LineData::Mission(m), Field::PerDiemCost) => Some(m.per_diem_cost),
            (LineData::Mission(m), Field::MobilityCost) => Some(m.mobility_cost),
            (LineData::Consulting(c), Field::Headcount) => Some(c.headcount),
            (LineData::Consulting(c), Field::MonthlyAmount) => Some(c.monthly_amount),
            (LineData::Consulting(c), Field::MonthCount) => Some(c.month_count),
            _ => None,
        }
    }

    /// Mutable access to a numeric input field
    pub(crate) fn number_mut(&mut self, field: Field) -> Option<&mut f64> {
        match (&mut self.data, field) {
            (LineData::Mission(m), Field::StaffCount) => Some(&mut m.staff_count),
            (LineData::Mission(m), Field::Days) => Some(&mut m.days),
            (LineData::Mission(m), Field::FareCost) => Some(&mut m.fare_cost),
            (LineData::Mission(m), Field::LodgingCost) => Some(&mut m.lodging_cost),
            (LineData::Mission(m), Field::PerDiemCost) => Some(&mut m.per_diem_cost),
            (LineData::Mission(m), Field::MobilityCost) => Some(&mut m.mobility_cost),
            (LineData::Consulting(c), Field::Headcount) => Some(&mut c.headcount),
            (LineData::Consulting(c), Field::MonthlyAmount) => Some(&mut c.monthly_amount),
            (LineData::Consulting(c), Field::MonthCount) => Some(&mut c.month_count),
            _ => None,
        }
    }

    /// Set a text field; returns false when the field is not a text field of this shape
    pub(crate) fn set_text(&mut self, field: Field, value: Option<String>) -> bool {
        match (&mut self.data, field) {
            (LineData::Mission(m), Field::Country) => m.country = value.unwrap_or_default(),
            (LineData::Mission(m), Field::Operation) => m.operation = value,
            (LineData::Mission(m), Field::Objective) => m.objective = value,
            (LineData::Mission(m), Field::Area) => m.area = value,
            (LineData::Mission(m), Field::OrgUnit) => m.org_unit = value,
            (LineData::Consulting(c), Field::Role) => c.role = value.unwrap_or_default(),
            (LineData::Consulting(c), Field::Area) => c.area = value,
            (LineData::Consulting(c), Field::Objective) => c.objective = value,
            (LineData::Consulting(c), Field::Type) => c.kind = value,
            _ => return false,
        }
        true
    }

    /// Whether any numeric input on this row is non-zero
    pub fn has_inputs(&self) -> bool {
        Field::fields_for(self.category())
            .iter()
            .filter_map(|f| self.number(*f))
            .any(|v| v != 0.0)
    }

    /// Render a bound field for display or export
    pub fn display_value(&self, field: Field, rounding: Rounding) -> String {
        if field == Field::Total {
            return self.total.format_plain(rounding);
        }
        if let Some(v) = self.number(field) {
            return format_number(v);
        }
        self.text(field).unwrap_or_default().to_string()
    }
}

/// Format a normalized number without a trailing `.0` for whole values
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{:.0}", value)
    } else {
        format!("{}", value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_objective_parse() {
        assert_eq!(Objective::parse("R"), Some(Objective::R));
        assert_eq!(Objective::parse(" e "), Some(Objective::E));
        assert_eq!(Objective::parse("X"), None);
        assert_eq!(Objective::parse(""), None);
    }

    #[test]
    fn test_field_access_respects_shape() {
        let item = LineItem::mission(MissionItem {
            country: "Chile".into(),
            staff_count: 2.0,
            ..Default::default()
        });
        assert_eq!(item.text(Field::Country), Some("Chile"));
        assert_eq!(item.number(Field::StaffCount), Some(2.0));
        assert_eq!(item.number(Field::Headcount), None);
        assert_eq!(item.text(Field::Role), None);
        assert!(item.has_inputs());
    }

    #[test]
    fn test_set_text_rejects_foreign_field() {
        let mut item = LineItem::blank(BudgetCategory::Consulting);
        assert!(item.set_text(Field::Type, Some("Nacional".into())));
        assert!(!item.set_text(Field::Country, Some("Perú".into())));
        assert_eq!(item.text(Field::Type), Some("Nacional"));
    }

    #[test]
    fn test_display_value() {
        let mut item = LineItem::consulting(ConsultingItem {
            role: "Analista".into(),
            headcount: 1.5,
            monthly_amount: 1000.0,
            month_count: 6.0,
            ..Default::default()
        });
        item.total = Money::from_units(9000);
        assert_eq!(item.display_value(Field::Headcount, Rounding::Integer), "1.5");
        assert_eq!(item.display_value(Field::MonthCount, Rounding::Integer), "6");
        assert_eq!(item.display_value(Field::Total, Rounding::Integer), "9000");
        assert_eq!(item.display_value(Field::Area, Rounding::Integer), "");
    }

    #[test]
    fn test_serde_round_trip_keeps_shape() {
        let item = LineItem::blank(BudgetCategory::Missions);
        let json = serde_json::to_string(&item).unwrap();
        assert!(json.contains("\"shape\":\"mission\""));
        let back: LineItem = serde_json::from_str(&json).unwrap();
        assert_eq!(back.category(), BudgetCategory::Missions);
    }
}
