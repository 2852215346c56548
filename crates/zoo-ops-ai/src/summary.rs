//! Monitoring summary schema and parsing of model output.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Summary errors.
#[derive(Error, Debug)]
pub enum SummaryError {
    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("Invalid response format: {0}")]
    InvalidFormat(String),
}

pub type SummaryResult<T> = Result<T, SummaryError>;

/// Structured daily monitoring record derived from a keeper's observation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MonitoringSummary {
    /// Date or day of observation
    pub date_or_day: String,
    /// Animal seen at the scheduled observation time
    pub animal_observed_on_time: bool,
    pub clean_drinking_water_provided: bool,
    pub enclosure_cleaned_properly: bool,
    /// Normal behaviour and activity
    pub normal_behaviour_status: bool,
    /// Details when behaviour was abnormal
    #[serde(default)]
    pub normal_behaviour_details: Option<String>,
    pub feed_and_supplements_available: bool,
    pub feed_given_as_prescribed: bool,
    /// Any other special needs
    #[serde(default)]
    pub other_animal_requirements: Option<String>,
    /// Caretaker or in-charge signature
    pub incharge_signature: String,
    /// Health monitoring summary; this is the text applied back to the log form
    pub daily_animal_health_monitoring: String,
    pub carnivorous_animal_feeding_chart: String,
    pub medicine_stock_register: String,
    pub daily_wildlife_monitoring: String,
}

/// Parse model output into a summary, tolerating text around the JSON object.
pub fn parse_summary_output(raw: &str) -> SummaryResult<MonitoringSummary> {
    let start = raw.find('{').ok_or_else(|| {
        SummaryError::InvalidFormat("No JSON object found in response".into())
    })?;
    let end = raw.rfind('}').ok_or_else(|| {
        SummaryError::InvalidFormat("No closing brace found in response".into())
    })?;
    if end < start {
        return Err(SummaryError::InvalidFormat(
            "Closing brace precedes opening brace".into(),
        ));
    }

    Ok(serde_json::from_str(&raw[start..=end])?)
}

/// Summary used when no model is available or its output is unusable.
pub fn fallback_summary(observation: &str, date: &str) -> MonitoringSummary {
    MonitoringSummary {
        date_or_day: date.to_string(),
        animal_observed_on_time: true,
        clean_drinking_water_provided: true,
        enclosure_cleaned_properly: true,
        normal_behaviour_status: true,
        normal_behaviour_details: None,
        feed_and_supplements_available: true,
        feed_given_as_prescribed: true,
        other_animal_requirements: Some(observation.to_string()),
        incharge_signature: "Zoo Keeper".to_string(),
        daily_animal_health_monitoring: format!("Observation recorded on {}: {}", date, observation),
        carnivorous_animal_feeding_chart: "Standard feeding schedule followed".to_string(),
        medicine_stock_register: "Stock levels adequate".to_string(),
        daily_wildlife_monitoring: format!("Wildlife monitoring completed on {}", date),
    }
}

/// Keyword-driven summariser for running without a model.
pub struct MockSummarizer;

impl MockSummarizer {
    /// Summarise an observation by looking for negated care keywords.
    pub fn summarize(observation: &str, date: &str) -> MonitoringSummary {
        let lower = observation.to_lowercase();
        let mut summary = fallback_summary(observation, date);

        if mentions_any(&lower, &["not seen", "missing", "could not find", "not visible"]) {
            summary.animal_observed_on_time = false;
        }
        if mentions_any(&lower, &["no water", "dirty water", "water empty", "water was empty"]) {
            summary.clean_drinking_water_provided = false;
        }
        if mentions_any(&lower, &["not cleaned", "dirty enclosure", "enclosure dirty", "enclosure was dirty"]) {
            summary.enclosure_cleaned_properly = false;
        }
        if mentions_any(&lower, &["no feed", "out of feed", "feed unavailable", "no supplements"]) {
            summary.feed_and_supplements_available = false;
        }
        if mentions_any(&lower, &["refused food", "did not eat", "skipped feed", "not fed"]) {
            summary.feed_given_as_prescribed = false;
        }

        let abnormal = [
            "agitated", "lethargic", "limping", "aggressive", "injury", "injured", "bleeding",
            "not eating", "vomit", "pacing",
        ];
        let found: Vec<&str> = abnormal.iter().copied().filter(|k| lower.contains(k)).collect();
        if !found.is_empty() {
            summary.normal_behaviour_status = false;
            summary.normal_behaviour_details = Some(format!("Observed: {}", found.join(", ")));
        }

        summary
    }
}

fn mentions_any(text: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| text.contains(n))
}
