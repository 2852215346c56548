//! Tabular exports.

use super::{ExportError, ExportResult};
use crate::models::{format_number, Animal, FeedingRecord, InventoryItem, Medication, Task};

/// One exported row: ordered `(column, value)` pairs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExportRecord {
    fields: Vec<(&'static str, String)>,
}

impl ExportRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a column.
    pub fn field(mut self, column: &'static str, value: impl Into<String>) -> Self {
        self.fields.push((column, value.into()));
        self
    }

    pub fn columns(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(|(c, _)| *c)
    }

    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(_, v)| v.as_str())
    }

    /// Value of a column, if present.
    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(c, _)| *c == column)
            .map(|(_, v)| v.as_str())
    }
}

/// Serialise records to CSV.
///
/// The header comes from the first record's columns. Rows are joined with
/// `\n` and there is no trailing newline.
pub fn to_csv(records: &[ExportRecord]) -> ExportResult<String> {
    let first = records.first().ok_or(ExportError::Empty)?;

    let mut lines = Vec::with_capacity(records.len() + 1);
    lines.push(first.columns().map(escape_csv).collect::<Vec<_>>().join(","));
    for record in records {
        lines.push(record.values().map(escape_csv).collect::<Vec<_>>().join(","));
    }
    Ok(lines.join("\n"))
}

/// Quote a field if it contains a comma, quote or newline.
pub fn escape_csv(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

fn text(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}

// ============================================================================
// Preparers
// ============================================================================

pub fn animal_records(animals: &[Animal]) -> Vec<ExportRecord> {
    animals
        .iter()
        .map(|a| {
            ExportRecord::new()
                .field("ID", a.id.as_str())
                .field("Name", a.name.as_str())
                .field("Species", a.species.as_str())
                .field("Age", text(&a.age))
                .field("Health", a.health.as_str())
                .field("Mood", text(&a.mood))
                .field("Appetite", text(&a.appetite))
                .field("Assigned To", text(&a.assigned_to))
                .field("Enclosure", text(&a.enclosure))
                .field("Last Checked", text(&a.last_checked))
        })
        .collect()
}

/// Feeding rows joined with their animal; unknown animals export as `Unknown`.
pub fn feeding_records(records: &[FeedingRecord], animals: &[Animal]) -> Vec<ExportRecord> {
    records
        .iter()
        .map(|r| {
            let animal = animals.iter().find(|a| a.id == r.animal_id);
            ExportRecord::new()
                .field("Animal", animal.map_or("Unknown", |a| a.name.as_str()))
                .field("Species", animal.map_or("", |a| a.species.as_str()))
                .field("Feed Type", r.feed_type.as_str())
                .field("Amount", text(&r.amount))
                .field("Cost", format_number(r.cost))
                .field("Status", r.status.as_str())
                .field("Last Fed", text(&r.recorded_at))
        })
        .collect()
}

pub fn medication_records(medications: &[Medication]) -> Vec<ExportRecord> {
    medications
        .iter()
        .map(|m| {
            ExportRecord::new()
                .field("Animal", m.animal_id.as_str())
                .field("Medication", m.medication_name.as_str())
                .field("Dosage", m.dosage.as_str())
                .field("Frequency", m.frequency.as_str())
                .field("Start Date", m.start_date.as_str())
                .field("End Date", m.end_date.as_str())
                .field("Status", m.status.as_str())
                .field("Prescribed By", text(&m.prescribed_by))
                .field("Purpose", text(&m.purpose))
                .field("Administration Count", m.administration_count().to_string())
        })
        .collect()
}

pub fn task_records(tasks: &[Task]) -> Vec<ExportRecord> {
    tasks
        .iter()
        .map(|t| {
            ExportRecord::new()
                .field("Title", t.title.as_str())
                .field("Description", t.description.as_str())
                .field("Assigned To", t.assigned_to.as_str())
                .field("Assigned By", text(&t.assigned_by))
                .field("Animal ID", text(&t.animal_id))
                .field("Priority", t.priority.as_str())
                .field("Status", t.status.as_str())
                .field("Due Date", t.due_date.as_str())
                .field("Created At", text(&t.created_at))
                .field("Comments Count", t.comments.len().to_string())
        })
        .collect()
}

pub fn inventory_records(items: &[InventoryItem]) -> Vec<ExportRecord> {
    items
        .iter()
        .map(|i| {
            ExportRecord::new()
                .field("Item Name", i.name.as_str())
                .field("Category", i.category.as_str())
                .field("Quantity", format_number(i.quantity))
                .field("Unit", i.unit.as_str())
                .field("Min Threshold", format_number(i.min_threshold))
                .field("Cost per Unit", format_number(i.cost))
                .field("Total Value", format_number(i.total_value()))
                .field("Supplier", text(&i.supplier))
                .field("Last Restocked", text(&i.last_restocked))
                .field("Expiry Date", text(&i.expiry_date))
                .field("Low Stock", if i.is_low_stock() { "Yes" } else { "No" })
        })
        .collect()
}
