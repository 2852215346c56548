//! Plain-text report bodies for PDF export.

use std::fmt::Write;

use super::format_rupees;
use crate::models::{
    format_number, Animal, FeedingRecord, FeedingStatus, HealthStatus, InventoryItem, Medication, Task,
    TaskStatus, TreatmentRecord,
};

const RULE_WIDTH: usize = 60;

fn heavy_rule() -> String {
    "=".repeat(RULE_WIDTH)
}

fn light_rule() -> String {
    "-".repeat(RULE_WIDTH)
}

fn or_blank(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("")
}

fn or_na(value: &Option<String>) -> &str {
    match value.as_deref() {
        Some(v) if !v.trim().is_empty() => v,
        _ => "N/A",
    }
}

fn animal_for<'a>(animals: &'a [Animal], id: &str) -> Option<&'a Animal> {
    animals.iter().find(|a| a.id == id)
}

/// Health counts and the animals needing attention, poor before fair.
pub fn health_report(animals: &[Animal]) -> String {
    let count = |h: HealthStatus| animals.iter().filter(|a| a.health == h).count();
    let mut report = String::from("HEALTH REPORT\n\n");
    let _ = writeln!(report, "{}\n", heavy_rule());
    let _ = writeln!(report, "Total Animals: {}", animals.len());
    let _ = writeln!(report, "Excellent Health: {}", count(HealthStatus::Excellent));
    let _ = writeln!(report, "Good Health: {}", count(HealthStatus::Good));
    let _ = writeln!(report, "Fair Health: {}", count(HealthStatus::Fair));
    let _ = writeln!(report, "Poor Health: {}\n", count(HealthStatus::Poor));

    let attention: Vec<&Animal> = [HealthStatus::Poor, HealthStatus::Fair]
        .iter()
        .flat_map(|h| animals.iter().filter(move |a| a.health == *h))
        .collect();
    if !attention.is_empty() {
        report.push_str("ANIMALS REQUIRING ATTENTION:\n");
        let _ = writeln!(report, "{}\n", light_rule());
        for a in attention {
            let _ = writeln!(report, "{} ({})", a.name, a.species);
            let _ = writeln!(report, "  ID: {}", a.id);
            let _ = writeln!(report, "  Health: {}", a.health);
            let _ = writeln!(report, "  Mood: {}", or_blank(&a.mood));
            let _ = writeln!(report, "  Appetite: {}", or_blank(&a.appetite));
            let _ = writeln!(report, "  Assigned to: {}", or_blank(&a.assigned_to));
            let _ = writeln!(report, "  Last checked: {}\n", or_blank(&a.last_checked));
        }
    }
    report
}

/// Feeding totals, cost per feed type in first-seen order, then every record.
pub fn feeding_cost_report(records: &[FeedingRecord], animals: &[Animal]) -> String {
    let total: f64 = records.iter().map(|r| r.cost).sum();
    let mut by_type: Vec<(&str, f64)> = Vec::new();
    for r in records {
        match by_type.iter_mut().find(|(t, _)| *t == r.feed_type) {
            Some((_, cost)) => *cost += r.cost,
            None => by_type.push((r.feed_type.as_str(), r.cost)),
        }
    }
    let with_status = |s: FeedingStatus| records.iter().filter(|r| r.status == s).count();

    let mut report = String::from("FEEDING & COST REPORT\n\n");
    let _ = writeln!(report, "{}\n", heavy_rule());
    let _ = writeln!(report, "Total Records: {}", records.len());
    let _ = writeln!(report, "Total Cost: {}", format_rupees(total));
    let _ = writeln!(report, "Completed: {}", with_status(FeedingStatus::Completed));
    let _ = writeln!(report, "Pending: {}\n", with_status(FeedingStatus::Pending));

    report.push_str("COST BREAKDOWN BY FEED TYPE:\n");
    let _ = writeln!(report, "{}\n", light_rule());
    for (feed_type, cost) in &by_type {
        let _ = writeln!(report, "{}: {}", feed_type, format_rupees(*cost));
    }

    report.push_str("\n\nDETAILED RECORDS:\n");
    let _ = writeln!(report, "{}\n", light_rule());
    for r in records {
        let animal = animal_for(animals, &r.animal_id);
        let _ = writeln!(
            report,
            "{} ({})",
            animal.map_or("Unknown", |a| a.name.as_str()),
            animal.map_or("", |a| a.species.as_str())
        );
        let _ = writeln!(report, "  Feed Type: {}", r.feed_type);
        let _ = writeln!(report, "  Amount: {}", or_blank(&r.amount));
        let _ = writeln!(report, "  Cost: {}", format_rupees(r.cost));
        let _ = writeln!(report, "  Status: {}", r.status);
        let _ = writeln!(report, "  Last Fed: {}\n", or_na(&r.recorded_at));
    }
    report
}

pub fn inventory_report(items: &[InventoryItem]) -> String {
    let low = items.iter().filter(|i| i.is_low_stock()).count();
    let value: f64 = items.iter().map(|i| i.total_value()).sum();

    let mut report = String::from("INVENTORY REPORT\n\n");
    let _ = writeln!(report, "Total Items: {}", items.len());
    let _ = writeln!(report, "Low Stock Items: {}", low);
    let _ = writeln!(report, "Total Value: {}\n", format_rupees(value));
    let _ = writeln!(report, "{}\n", heavy_rule());
    for i in items {
        let _ = writeln!(report, "{}", i.name);
        let _ = writeln!(report, "  Category: {}", i.category);
        let _ = writeln!(report, "  Quantity: {} {}", format_number(i.quantity), i.unit);
        let _ = writeln!(report, "  Cost: {} per {}", format_rupees(i.cost), i.unit);
        let _ = writeln!(report, "  Supplier: {}", or_na(&i.supplier));
        let _ = writeln!(
            report,
            "  Status: {}\n",
            if i.is_low_stock() { "LOW STOCK" } else { "OK" }
        );
    }
    report
}

pub fn task_report(tasks: &[&Task]) -> String {
    let with_status = |s: TaskStatus| tasks.iter().filter(|t| t.status == s).count();

    let mut report = String::from("TASK MANAGEMENT REPORT\n\n");
    let _ = writeln!(report, "Total Tasks: {}", tasks.len());
    let _ = writeln!(report, "Pending: {}", with_status(TaskStatus::Pending));
    let _ = writeln!(report, "In Progress: {}", with_status(TaskStatus::InProgress));
    let _ = writeln!(report, "Completed: {}\n", with_status(TaskStatus::Completed));
    let _ = writeln!(report, "{}\n", heavy_rule());
    for t in tasks {
        let description = if t.description.trim().is_empty() {
            "N/A"
        } else {
            t.description.as_str()
        };
        let _ = writeln!(report, "{}", t.title);
        let _ = writeln!(report, "  Assigned to: {}", t.assigned_to);
        let _ = writeln!(report, "  Priority: {}", t.priority.as_str().to_uppercase());
        let _ = writeln!(report, "  Status: {}", t.status);
        let _ = writeln!(report, "  Due Date: {}", t.due_date);
        let _ = writeln!(report, "  Description: {}", description);
        let _ = writeln!(report, "  Comments: {}\n", t.comments.len());
    }
    report
}

/// Active courses, finished courses, and any locally recorded outcomes.
pub fn medication_report(
    medications: &[Medication],
    animals: &[Animal],
    outcomes: &[TreatmentRecord],
) -> String {
    let (finished, active): (Vec<&Medication>, Vec<&Medication>) =
        medications.iter().partition(|m| m.status.is_finished());
    let animal_name = |id: &str| animal_for(animals, id).map_or("Unknown", |a| a.name.as_str());

    let mut report = String::from("MEDICATION & TREATMENT REPORT\n\n");
    let _ = writeln!(report, "Total Medications: {}", medications.len());
    let _ = writeln!(report, "Active: {}", active.len());
    let _ = writeln!(report, "Completed/Discontinued: {}\n", finished.len());
    let _ = writeln!(report, "{}", heavy_rule());

    report.push_str("ACTIVE MEDICATIONS:\n");
    let _ = writeln!(report, "{}\n", light_rule());
    for m in &active {
        let _ = writeln!(report, "{}", m.medication_name);
        let _ = writeln!(report, "  Animal: {}", animal_name(&m.animal_id));
        let _ = writeln!(report, "  Dosage: {}", m.dosage);
        let _ = writeln!(report, "  Frequency: {}", m.frequency);
        let _ = writeln!(report, "  Duration: {} to {}", m.start_date, m.end_date);
        let _ = writeln!(report, "  Prescribed by: {}", or_blank(&m.prescribed_by));
        let _ = writeln!(report, "  Administrations: {}\n", m.administration_count());
    }

    if !finished.is_empty() {
        report.push_str("\nCOMPLETED TREATMENTS (OUTCOMES):\n");
        let _ = writeln!(report, "{}\n", light_rule());
        for m in &finished {
            let _ = writeln!(report, "{}", m.medication_name);
            let _ = writeln!(report, "  Animal: {}", animal_name(&m.animal_id));
            let _ = writeln!(report, "  Outcome: {}", m.status);
            let _ = writeln!(report, "  Notes: {}\n", or_na(&m.notes));
        }
    }

    if !outcomes.is_empty() {
        report.push_str("\nRECORDED OUTCOMES:\n");
        let _ = writeln!(report, "{}\n", light_rule());
        for o in outcomes {
            let notes = if o.notes.trim().is_empty() { "N/A" } else { o.notes.as_str() };
            let _ = writeln!(report, "{}", o.treatment_name);
            let _ = writeln!(report, "  Animal: {}", animal_name(&o.animal_id));
            let _ = writeln!(report, "  Duration: {} to {}", o.start_date, o.end_date);
            let _ = writeln!(report, "  Outcome: {}", o.outcome);
            let _ = writeln!(report, "  Notes: {}\n", notes);
        }
    }
    report
}
