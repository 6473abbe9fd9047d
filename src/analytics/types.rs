use serde::Serialize;

use crate::models::Category;

#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CategoryCounts {
    pub recyclable: usize,
    pub organic: usize,
    pub hazardous: usize,
    pub general_waste: usize,
}

impl CategoryCounts {
    pub fn get(&self, category: Category) -> usize {
        match category {
            Category::Recyclable => self.recyclable,
            Category::Organic => self.organic,
            Category::Hazardous => self.hazardous,
            Category::GeneralWaste => self.general_waste,
        }
    }

    pub(crate) fn increment(&mut self, category: Category) {
        match category {
            Category::Recyclable => self.recyclable += 1,
            Category::Organic => self.organic += 1,
            Category::Hazardous => self.hazardous += 1,
            Category::GeneralWaste => self.general_waste += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.recyclable + self.organic + self.hazardous + self.general_waste
    }
}

/// Live scanning summary. General waste has no percentage here; it only
/// shows up as a count in the profile breakdown.
#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CategoryPercentages {
    pub recyclable: u32,
    pub organic: u32,
    pub hazardous: u32,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum AchievementKind {
    FirstScan,
    RecyclingPro,
    PerfectScore,
    TreeHugger,
    HydrationHero,
    EcoMaster,
}

impl AchievementKind {
    pub const ALL: [AchievementKind; 6] = [
        AchievementKind::FirstScan,
        AchievementKind::RecyclingPro,
        AchievementKind::PerfectScore,
        AchievementKind::TreeHugger,
        AchievementKind::HydrationHero,
        AchievementKind::EcoMaster,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            AchievementKind::FirstScan => "First Scan",
            AchievementKind::RecyclingPro => "Recycling Pro",
            AchievementKind::PerfectScore => "Perfect Score",
            AchievementKind::TreeHugger => "Tree Hugger",
            AchievementKind::HydrationHero => "Hydration Hero",
            AchievementKind::EcoMaster => "Eco-Master",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            AchievementKind::FirstScan => "Scan your first item",
            AchievementKind::RecyclingPro => "Scan 10 recyclables",
            AchievementKind::PerfectScore => "Get a 100 score",
            AchievementKind::TreeHugger => "Scan 25 items",
            AchievementKind::HydrationHero => "Scan 5 bottles",
            AchievementKind::EcoMaster => "Reach 1000 points",
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Achievement {
    pub kind: AchievementKind,
    pub title: &'static str,
    pub description: &'static str,
    pub unlocked: bool,
}

/// One arc of the profile donut chart. Percentages are cumulative so the
/// renderer can draw `start_percent..end_percent` directly.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BreakdownSlice {
    pub category: Category,
    pub label: &'static str,
    pub count: usize,
    pub start_percent: f64,
    pub end_percent: f64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProfileSummary {
    pub total_scans: usize,
    pub total_points: u64,
    pub best_score: u8,
    pub category_counts: CategoryCounts,
    pub category_percentages: CategoryPercentages,
    pub breakdown: Vec<BreakdownSlice>,
    pub achievements: Vec<Achievement>,
}
