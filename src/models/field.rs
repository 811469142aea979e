//! Line-item fields and their source column labels
//!
//! Source workbooks use Spanish headers ("País", "Costo de Pasaje", "Nº", ...).
//! Each [`Field`] knows its canonical name and the labels it answers to, so a
//! table's columns are bound to typed fields once, at load time.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::category::BudgetCategory;

/// A named line-item field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    // Mission fields
    Country,
    Operation,
    StaffCount,
    Days,
    FareCost,
    LodgingCost,
    PerDiemCost,
    MobilityCost,
    OrgUnit,

    // Consulting fields
    Role,
    Headcount,
    MonthlyAmount,
    MonthCount,
    Type,

    // Shared fields
    Area,
    Objective,
    Total,
}

const MISSION_FIELDS: &[Field] = &[
    Field::Country,
    Field::Operation,
    Field::StaffCount,
    Field::Days,
    Field::FareCost,
    Field::LodgingCost,
    Field::PerDiemCost,
    Field::MobilityCost,
    Field::Objective,
    Field::Area,
    Field::OrgUnit,
    Field::Total,
];

const MISSION_REQUIRED: &[Field] = &[
    Field::Country,
    Field::StaffCount,
    Field::Days,
    Field::FareCost,
    Field::LodgingCost,
    Field::PerDiemCost,
    Field::MobilityCost,
];

const CONSULTING_FIELDS: &[Field] = &[
    Field::Role,
    Field::Headcount,
    Field::MonthlyAmount,
    Field::MonthCount,
    Field::Area,
    Field::Objective,
    Field::Type,
    Field::Total,
];

const CONSULTING_REQUIRED: &[Field] = &[
    Field::Role,
    Field::Headcount,
    Field::MonthlyAmount,
    Field::MonthCount,
];

impl Field {
    /// Canonical snake_case name
    pub fn name(&self) -> &'static str {
        match self {
            Field::Country => "country",
            Field::Operation => "operation",
            Field::StaffCount => "staff_count",
            Field::Days => "days",
            Field::FareCost => "fare_cost",
            Field::LodgingCost => "lodging_cost",
            Field::PerDiemCost => "per_diem_cost",
            Field::MobilityCost => "mobility_cost",
            Field::OrgUnit => "org_unit",
            Field::Role => "role",
            Field::Headcount => "headcount",
            Field::MonthlyAmount => "monthly_amount",
            Field::MonthCount => "month_count",
            Field::Type => "type",
            Field::Area => "area",
            Field::Objective => "objective",
            Field::Total => "total",
        }
    }

    /// Column header used when a table is created without a source
    pub fn label(&self) -> &'static str {
        match self {
            Field::Country => "País",
            Field::Operation => "Operación",
            Field::StaffCount => "Cantidad de Funcionarios",
            Field::Days => "Días",
            Field::FareCost => "Costo de Pasaje",
            Field::LodgingCost => "Alojamiento",
            Field::PerDiemCost => "Per-diem y Otros",
            Field::MobilityCost => "Movilidad",
            Field::OrgUnit => "Unidad",
            Field::Role => "Cargo",
            Field::Headcount => "Nº",
            Field::MonthlyAmount => "Monto Mensual",
            Field::MonthCount => "Cantidad de Meses",
            Field::Type => "Tipo",
            Field::Area => "Área",
            Field::Objective => "Objetivo",
            Field::Total => "Total",
        }
    }

    /// Alternative header spellings seen in source workbooks
    fn aliases(&self) -> &'static [&'static str] {
        match self {
            Field::Country => &["pais", "country"],
            Field::Operation => &["operacion", "operation", "descripcion"],
            Field::StaffCount => &["cantidad de funcionarios", "funcionarios", "staff count"],
            Field::Days => &["dias", "days"],
            Field::FareCost => &["costo de pasaje", "pasaje", "pasajes", "fare cost"],
            Field::LodgingCost => &["alojamiento", "lodging cost", "lodging"],
            Field::PerDiemCost => &["per diem y otros", "per diem", "viaticos", "per diem cost"],
            Field::MobilityCost => &["movilidad", "mobility cost", "mobility"],
            Field::OrgUnit => &["unidad", "unidad organizacional", "org unit", "vp"],
            Field::Role => &["cargo", "rol", "role", "consultoria"],
            Field::Headcount => &["no", "n", "nro", "numero", "headcount"],
            Field::MonthlyAmount => &["monto mensual", "honorario mensual", "monthly amount"],
            Field::MonthCount => &["cantidad de meses", "meses", "month count", "months"],
            Field::Type => &["tipo", "type"],
            Field::Area => &["area"],
            Field::Objective => &["objetivo", "objective"],
            Field::Total => &["total"],
        }
    }

    /// Whether this field holds a number (quantity or amount)
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            Field::StaffCount
                | Field::Days
                | Field::FareCost
                | Field::LodgingCost
                | Field::PerDiemCost
                | Field::MobilityCost
                | Field::Headcount
                | Field::MonthlyAmount
                | Field::MonthCount
                | Field::Total
        )
    }

    /// Every field a table of this category can carry, in default column order
    pub fn fields_for(category: BudgetCategory) -> &'static [Field] {
        match category {
            BudgetCategory::Missions => MISSION_FIELDS,
            BudgetCategory::Consulting => CONSULTING_FIELDS,
        }
    }

    /// Fields a source table must provide for this category
    pub fn required_for(category: BudgetCategory) -> &'static [Field] {
        match category {
            BudgetCategory::Missions => MISSION_REQUIRED,
            BudgetCategory::Consulting => CONSULTING_REQUIRED,
        }
    }

    /// Check whether this field belongs to the given category's shape
    pub fn applies_to(&self, category: BudgetCategory) -> bool {
        Self::fields_for(category).contains(self)
    }

    /// Bind a source header to a field of the given category
    pub fn from_header(header: &str, category: BudgetCategory) -> Option<Field> {
        let wanted = normalize_header(header);
        Self::fields_for(category)
            .iter()
            .copied()
            .find(|field| field.matches(&wanted))
    }

    fn matches(&self, normalized: &str) -> bool {
        normalized == self.name().replace('_', " ")
            || normalized == normalize_header(self.label())
            || self.aliases().iter().any(|a| *a == normalized)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Field {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = normalize_header(s);
        MISSION_FIELDS
            .iter()
            .chain(CONSULTING_FIELDS.iter())
            .copied()
            .find(|field| field.matches(&wanted))
            .ok_or_else(|| format!("unknown field '{}'", s))
    }
}

/// Lowercase, strip accents, and collapse separators so header variants compare equal
pub fn normalize_header(header: &str) -> String {
    let folded: String = header
        .trim()
        .chars()
        .flat_map(|c| c.to_lowercase())
        .map(|c| match c {
            'á' | 'à' | 'ä' | 'â' => 'a',
            'é' | 'è' | 'ë' | 'ê' => 'e',
            'í' | 'ì' | 'ï' | 'î' => 'i',
            'ó' | 'ò' | 'ö' | 'ô' => 'o',
            'ú' | 'ù' | 'ü' | 'û' => 'u',
            'ñ' => 'n',
            'º' | '°' => 'o',
            '_' | '-' | '.' | '/' => ' ',
            other => other,
        })
        .collect();
    folded.split_whitespace().collect::<Vec<_>>().join(" ")
}
