//! Budget table model
//!
//! An ordered set of line items sharing one category, tied to an
//! organizational unit. The column list records the source header order and
//! which headers were bound to typed fields, so exports reproduce the input
//! shape.

use serde::{Deserialize, Serialize};

use super::category::{BudgetCategory, TableKey};
use super::field::Field;
use super::line_item::LineItem;
use super::money::Money;
use crate::error::{BudgetError, BudgetResult};

/// A source column, bound to a field or carried through untouched
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub header: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<Field>,
}

impl Column {
    pub fn bound(header: impl Into<String>, field: Field) -> Self {
        Self {
            header: header.into(),
            field: Some(field),
        }
    }

    pub fn extra(header: impl Into<String>) -> Self {
        Self {
            header: header.into(),
            field: None,
        }
    }
}

/// A table of line items for one unit and category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetTable {
    /// Source table name (sheet or file)
    pub name: String,
    pub unit: String,
    pub category: BudgetCategory,
    pub columns: Vec<Column>,
    pub rows: Vec<LineItem>,
}

impl BudgetTable {
    /// Create an empty table with the category's default columns
    pub fn new(unit: impl Into<String>, category: BudgetCategory) -> Self {
        let unit = unit.into();
        let columns = Field::fields_for(category)
            .iter()
            .map(|f| Column::bound(f.label(), *f))
            .collect();
        Self {
            name: format!("{}/{}", unit, category),
            unit,
            category,
            columns,
            rows: Vec::new(),
        }
    }

    /// Create an empty table with explicit columns
    pub fn with_columns(
        name: impl Into<String>,
        unit: impl Into<String>,
        category: BudgetCategory,
        columns: Vec<Column>,
    ) -> Self {
        Self {
            name: name.into(),
            unit: unit.into(),
            category,
            columns,
            rows: Vec::new(),
        }
    }

    pub fn key(&self) -> TableKey {
        TableKey::new(self.unit.clone(), self.category)
    }

    /// Append a row; the row must match the table's category
    pub fn push(&mut self, item: LineItem) -> BudgetResult<()> {
        if item.category() != self.category {
            return Err(BudgetError::Validation(format!(
                "cannot add a {} row to {} table '{}'",
                item.category(),
                self.category,
                self.name
            )));
        }
        self.rows.push(item);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row(&self, index: usize) -> BudgetResult<&LineItem> {
        let len = self.rows.len();
        self.rows
            .get(index)
            .ok_or(BudgetError::RowOutOfRange { row: index, len })
    }

    pub fn row_mut(&mut self, index: usize) -> BudgetResult<&mut LineItem> {
        let len = self.rows.len();
        self.rows
            .get_mut(index)
            .ok_or(BudgetError::RowOutOfRange { row: index, len })
    }

    /// Header bound to a field, if the table has that column
    pub fn header_for(&self, field: Field) -> Option<&str> {
        self.columns
            .iter()
            .find(|c| c.field == Some(field))
            .map(|c| c.header.as_str())
    }

    /// Whether the source carried a total column
    pub fn has_total_column(&self) -> bool {
        self.header_for(Field::Total).is_some()
    }

    /// Sum of all row totals
    pub fn grand_total(&self) -> Money {
        self.rows.iter().map(|r| r.total).sum()
    }
}
