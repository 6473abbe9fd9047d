mod types;

pub use types::{
    Achievement, AchievementKind, BreakdownSlice, CategoryCounts, CategoryPercentages,
    ProfileSummary,
};

use crate::models::{Category, HistoryEntry, MAX_RECYCLABILITY_SCORE};

const RECYCLING_PRO_THRESHOLD: usize = 10;
const TREE_HUGGER_THRESHOLD: usize = 25;
const ECO_MASTER_POINTS: u64 = 1000;

/// Derived figures over one history snapshot. Nothing is cached; build a new
/// one from the latest snapshot whenever the history changes.
#[derive(Debug, Clone, Copy)]
pub struct HistoryAnalytics<'a> {
    entries: &'a [HistoryEntry],
}

impl<'a> HistoryAnalytics<'a> {
    pub fn new(entries: &'a [HistoryEntry]) -> Self {
        Self { entries }
    }

    pub fn total_scans(&self) -> usize {
        self.entries.len()
    }

    pub fn total_points(&self) -> u64 {
        self.entries.iter().map(|entry| u64::from(entry.points)).sum()
    }

    pub fn best_score(&self) -> u8 {
        self.entries
            .iter()
            .map(|entry| entry.result.recyclability_score)
            .max()
            .unwrap_or(0)
    }

    pub fn category_counts(&self) -> CategoryCounts {
        let mut counts = CategoryCounts::default();
        for entry in self.entries {
            counts.increment(entry.result.category);
        }
        counts
    }

    pub fn category_percentages(&self) -> CategoryPercentages {
        let total = self.total_scans();
        if total == 0 {
            return CategoryPercentages::default();
        }

        let counts = self.category_counts();
        let percent = |count: usize| ((count as f64 / total as f64) * 100.0).round() as u32;

        CategoryPercentages {
            recyclable: percent(counts.recyclable),
            organic: percent(counts.organic),
            hazardous: percent(counts.hazardous),
        }
    }

    pub fn breakdown(&self) -> Vec<BreakdownSlice> {
        let counts = self.category_counts();
        let total = counts.total();
        let mut cumulative = 0.0;

        Category::ALL
            .iter()
            .map(|&category| {
                let count = counts.get(category);
                let percent = if total == 0 {
                    0.0
                } else {
                    count as f64 / total as f64 * 100.0
                };
                let start_percent = cumulative;
                cumulative += percent;
                BreakdownSlice {
                    category,
                    label: category.short_label(),
                    count,
                    start_percent,
                    end_percent: cumulative,
                }
            })
            .collect()
    }

    pub fn achievements(&self) -> Vec<Achievement> {
        let total_scans = self.total_scans();
        let total_points = self.total_points();
        let best_score = self.best_score();
        let counts = self.category_counts();

        AchievementKind::ALL
            .iter()
            .map(|&kind| {
                let unlocked = match kind {
                    AchievementKind::FirstScan => total_scans >= 1,
                    AchievementKind::RecyclingPro => {
                        counts.recyclable >= RECYCLING_PRO_THRESHOLD
                    }
                    AchievementKind::PerfectScore => best_score == MAX_RECYCLABILITY_SCORE,
                    AchievementKind::TreeHugger => total_scans >= TREE_HUGGER_THRESHOLD,
                    // No bottle signal is tracked yet.
                    AchievementKind::HydrationHero => false,
                    AchievementKind::EcoMaster => total_points >= ECO_MASTER_POINTS,
                };
                Achievement {
                    kind,
                    title: kind.title(),
                    description: kind.description(),
                    unlocked,
                }
            })
            .collect()
    }

    pub fn summary(&self) -> ProfileSummary {
        ProfileSummary {
            total_scans: self.total_scans(),
            total_points: self.total_points(),
            best_score: self.best_score(),
            category_counts: self.category_counts(),
            category_percentages: self.category_percentages(),
            breakdown: self.breakdown(),
            achievements: self.achievements(),
        }
    }
}
