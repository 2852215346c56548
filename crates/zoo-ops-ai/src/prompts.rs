//! Prompts for turning keeper observations into monitoring summaries.
//!
//! The model is asked for a single JSON object matching
//! [`MonitoringSummary`](crate::MonitoringSummary); anything around the object
//! is discarded by [`parse_summary_output`](crate::parse_summary_output).

/// System prompt for the monitoring assistant.
pub const SYSTEM_PROMPT: &str = r#"You are an expert zoo monitoring assistant. Your task is to analyze an observation log for a specific animal and convert it into a structured JSON format.

Instructions:
1. Read the observation text carefully.
2. Determine the boolean values (true/false) for each required field based on the text. If the text says the animal was seen, set animal_observed_on_time to true.
3. Extract a concise summary for daily_animal_health_monitoring.
4. Fill in all other fields based on the observation. If a field is not mentioned, make a reasonable assumption (incharge_signature can be 'Zoo Keeper').
5. Return ONLY a valid JSON object that strictly follows the schema. Do not include any extra text, comments, or markdown."#;

/// Field descriptions appended to every request.
pub const FORMAT_INSTRUCTIONS: &str = r#"The output must be a JSON object with these fields:
- date_or_day (string): Date or day of observation
- animal_observed_on_time (boolean): Was the animal seen at the scheduled observation time?
- clean_drinking_water_provided (boolean): Was clean drinking water available?
- enclosure_cleaned_properly (boolean): Was the enclosure cleaned as required?
- normal_behaviour_status (boolean): Is the animal showing normal behaviour and activity?
- normal_behaviour_details (string or null): If abnormal behaviour observed, provide details
- feed_and_supplements_available (boolean): Was feed and supplements available?
- feed_given_as_prescribed (boolean): Was the feed given as prescribed?
- other_animal_requirements (string or null): Any other special needs or requirements
- incharge_signature (string): Signature of caretaker or in-charge
- daily_animal_health_monitoring (string): Summary of daily animal health monitoring
- carnivorous_animal_feeding_chart (string): Summary of carnivorous animal feeding chart
- medicine_stock_register (string): Summary of medicine stock register
- daily_wildlife_monitoring (string): Summary of daily wildlife monitoring observations"#;

/// Build the user prompt for one observation.
pub fn make_observation_prompt(observation: &str, date: &str, animal_name: &str) -> String {
    format!(
        r#"Animal Being Observed: {animal_name}

{FORMAT_INSTRUCTIONS}

Observation:
Date: {date}
Observation: {observation}"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_includes_inputs() {
        let prompt = make_observation_prompt("Simba ate well", "2024-03-01", "Simba");
        assert!(prompt.contains("Animal Being Observed: Simba"));
        assert!(prompt.contains("Date: 2024-03-01"));
        assert!(prompt.contains("Observation: Simba ate well"));
        assert!(prompt.contains("daily_wildlife_monitoring"));
    }
}
