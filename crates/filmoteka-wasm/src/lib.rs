use chrono::NaiveDate;
use wasm_bindgen::prelude::*;

use filmoteka_core::calendar::{format_date as label_for, group_by_date};
use filmoteka_core::forms::{password_strength as strength, RatingForm};
use filmoteka_core::models::PlannedEvent;

/// Heading for a calendar date group. Dates are `YYYY-MM-DD`; anything
/// unparseable is echoed back.
#[wasm_bindgen]
pub fn format_date(date: &str, today: &str) -> String {
    match (date.parse::<NaiveDate>(), today.parse::<NaiveDate>()) {
        (Ok(date), Ok(today)) => label_for(date, today),
        _ => date.to_string(),
    }
}

#[wasm_bindgen]
pub fn password_strength(password: &str) -> String {
    serde_json::to_string(&strength(password)).unwrap_or_else(|_| "{}".to_string())
}

/// Group a JSON array of calendar events by planned date.
#[wasm_bindgen]
pub fn group_events(events_json: &str) -> String {
    serde_json::from_str::<Vec<PlannedEvent>>(events_json)
        .ok()
        .and_then(|events| serde_json::to_string(&group_by_date(events)).ok())
        .unwrap_or_else(|| "[]".to_string())
}

/// Average label for a JSON array of star values (`null` for empty rows).
#[wasm_bindgen]
pub fn rating_average(values_json: &str) -> String {
    let values: Vec<Option<f32>> = serde_json::from_str(values_json).unwrap_or_default();
    RatingForm::with_values(values).average_label()
}
