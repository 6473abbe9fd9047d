//! Classification records returned by the image classifier.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

pub const MAX_RECYCLABILITY_SCORE: u8 = 100;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Recyclable {
    Yes,
    No,
    Uncertain,
}

/// Coarse waste bucket. Anything the classifier or an older history file
/// reports outside the known labels lands in `GeneralWaste`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum Category {
    Recyclable,
    Organic,
    Hazardous,
    #[default]
    GeneralWaste,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Recyclable,
        Category::Organic,
        Category::Hazardous,
        Category::GeneralWaste,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Recyclable => "Recyclable",
            Category::Organic => "Organic",
            Category::Hazardous => "Hazardous",
            Category::GeneralWaste => "General Waste",
        }
    }

    /// Short label used by the profile breakdown legend.
    pub fn short_label(&self) -> &'static str {
        match self {
            Category::GeneralWaste => "General",
            other => other.as_str(),
        }
    }

    pub fn from_label(value: &str) -> Self {
        match value.trim() {
            "Recyclable" => Category::Recyclable,
            "Organic" => Category::Organic,
            "Hazardous" => Category::Hazardous,
            _ => Category::GeneralWaste,
        }
    }
}

impl Serialize for Category {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Category {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.as_deref().map(Category::from_label).unwrap_or_default())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationResult {
    pub item_name: String,
    pub recyclable: Recyclable,
    #[serde(default)]
    pub category: Category,
    pub recyclability_score: u8,
    pub instructions: String,
    #[serde(default)]
    pub alternatives: Vec<String>,
    pub eco_friendly_tip: String,
}

impl ClassificationResult {
    /// Reward granted for a scan: `round(score / 10)`, halves rounding up.
    pub fn points(&self) -> u32 {
        (u32::from(self.recyclability_score) + 5) / 10
    }
}
