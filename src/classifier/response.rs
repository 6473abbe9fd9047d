use log::warn;
use serde::Deserialize;

use crate::error::ClassifierError;
use crate::models::{Category, ClassificationResult, Recyclable, MAX_RECYCLABILITY_SCORE};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawClassification {
    item_name: Option<String>,
    recyclable: Option<String>,
    category: Option<String>,
    recyclability_score: Option<f64>,
    instructions: Option<String>,
    alternatives: Option<Vec<String>>,
    eco_friendly_tip: Option<String>,
}

fn required<T>(value: Option<T>, field: &str) -> Result<T, ClassifierError> {
    value.ok_or_else(|| ClassifierError::Malformed(format!("missing field {field}")))
}

fn parse_recyclable(value: &str) -> Result<Recyclable, ClassifierError> {
    match value.trim() {
        "Yes" => Ok(Recyclable::Yes),
        "No" => Ok(Recyclable::No),
        "Uncertain" => Ok(Recyclable::Uncertain),
        other => Err(ClassifierError::Malformed(format!(
            "unknown recyclable value '{other}'"
        ))),
    }
}

fn parse_score(value: f64) -> Result<u8, ClassifierError> {
    let rounded = value.round();
    if !rounded.is_finite() || rounded < 0.0 || rounded > f64::from(MAX_RECYCLABILITY_SCORE) {
        return Err(ClassifierError::Malformed(format!(
            "recyclabilityScore {value} is outside 0-100"
        )));
    }
    Ok(rounded as u8)
}

fn strip_code_fence(text: &str) -> String {
    let trimmed = text.trim();
    if trimmed.starts_with("```") {
        let mut lines = trimmed.lines();
        lines.next();
        let mut body = Vec::new();
        for line in lines {
            if line.trim_start().starts_with("```") {
                break;
            }
            body.push(line);
        }
        body.join("\n")
    } else {
        trimmed.to_string()
    }
}

/// Validates the classifier's JSON verdict. All seven fields must be present;
/// an unrecognized category is accepted as general waste.
pub fn parse_classification(text: &str) -> Result<ClassificationResult, ClassifierError> {
    let body = strip_code_fence(text);
    let raw: RawClassification = serde_json::from_str(&body)
        .map_err(|err| ClassifierError::Malformed(format!("invalid JSON: {err}")))?;

    let category_label = required(raw.category, "category")?;
    let category = Category::from_label(&category_label);
    if category == Category::GeneralWaste && category_label.trim() != "General Waste" {
        warn!("Classifier returned unknown category '{category_label}', using General Waste");
    }

    Ok(ClassificationResult {
        item_name: required(raw.item_name, "itemName")?,
        recyclable: parse_recyclable(&required(raw.recyclable, "recyclable")?)?,
        category,
        recyclability_score: parse_score(required(
            raw.recyclability_score,
            "recyclabilityScore",
        )?)?,
        instructions: required(raw.instructions, "instructions")?,
        alternatives: required(raw.alternatives, "alternatives")?,
        eco_friendly_tip: required(raw.eco_friendly_tip, "ecoFriendlyTip")?,
    })
}
