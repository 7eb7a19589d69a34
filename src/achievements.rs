use std::collections::HashSet;

use chrono::Datelike;

use crate::collection::Record;
use crate::model::{Achievement, AchievementIcon, Category, Plan};

pub const ACHIEVEMENTS_KEY: &str = "achievements";

/// How many locked achievements the overview previews.
pub const UP_NEXT_LIMIT: usize = 2;

impl Record for Achievement {
    fn id(&self) -> i64 {
        self.id
    }
}

#[derive(Clone, Copy, Debug)]
enum Criterion {
    PlansCreated,
    PlansCompleted,
    CompletedInCategory(Category),
    DistinctMonths,
}

impl Criterion {
    fn count(self, plans: &[Plan]) -> usize {
        match self {
            Self::PlansCreated => plans.len(),
            Self::PlansCompleted => plans.iter().filter(|plan| plan.completed).count(),
            Self::CompletedInCategory(category) => plans
                .iter()
                .filter(|plan| plan.completed && plan.category == category)
                .count(),
            Self::DistinctMonths => plans
                .iter()
                .map(|plan| (plan.date.year(), plan.date.month()))
                .collect::<HashSet<_>>()
                .len(),
        }
    }
}

struct Definition {
    id: i64,
    title: &'static str,
    description: &'static str,
    icon: AchievementIcon,
    total: u32,
    criterion: Criterion,
}

impl Definition {
    fn progress(&self, plans: &[Plan]) -> u32 {
        let raw = u32::try_from(self.criterion.count(plans)).unwrap_or(u32::MAX);
        raw.min(self.total)
    }

    fn materialize(&self, progress: u32, unlocked: bool) -> Achievement {
        Achievement {
            id: self.id,
            title: self.title.to_string(),
            description: self.description.to_string(),
            icon: self.icon,
            progress,
            total: self.total,
            unlocked,
        }
    }
}

const DEFINITIONS: [Definition; 6] = [
    Definition {
        id: 1,
        title: "First Plan!",
        description: "Create your first plan together",
        icon: AchievementIcon::Trophy,
        total: 1,
        criterion: Criterion::PlansCreated,
    },
    Definition {
        id: 2,
        title: "Plan Master",
        description: "Create 10 plans together",
        icon: AchievementIcon::Medal,
        total: 10,
        criterion: Criterion::PlansCreated,
    },
    Definition {
        id: 3,
        title: "Completionist",
        description: "Complete 5 plans",
        icon: AchievementIcon::Star,
        total: 5,
        criterion: Criterion::PlansCompleted,
    },
    Definition {
        id: 4,
        title: "Adventurers",
        description: "Complete 3 vacation plans",
        icon: AchievementIcon::Award,
        total: 3,
        criterion: Criterion::CompletedInCategory(Category::Vacation),
    },
    Definition {
        id: 5,
        title: "Romantics",
        description: "Complete 3 date plans",
        icon: AchievementIcon::Target,
        total: 3,
        criterion: Criterion::CompletedInCategory(Category::Date),
    },
    Definition {
        id: 6,
        title: "Organized Duo",
        description: "Make plans in 3 different calendar months",
        icon: AchievementIcon::Calendar,
        total: 3,
        criterion: Criterion::DistinctMonths,
    },
];

/// The snapshot used before anything has been persisted: every achievement
/// locked with no progress.
pub fn default_achievements() -> Vec<Achievement> {
    DEFINITIONS
        .iter()
        .map(|definition| definition.materialize(0, false))
        .collect()
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Derivation {
    pub achievements: Vec<Achievement>,
    /// The last achievement, in definition order, that went from locked to
    /// unlocked in this pass. Earlier ones crossing in the same pass are
    /// recorded in `achievements` only.
    pub unlocked: Option<Achievement>,
}

/// Recomputes every achievement against `plans`. Unlocking is one-way: an
/// achievement unlocked in `previous` stays unlocked whatever its progress.
pub fn derive(plans: &[Plan], previous: &[Achievement]) -> Derivation {
    let mut achievements = Vec::with_capacity(DEFINITIONS.len());
    let mut unlocked = None;

    for definition in &DEFINITIONS {
        let progress = definition.progress(plans);
        let was_unlocked = previous
            .iter()
            .find(|achievement| achievement.id == definition.id)
            .is_some_and(|achievement| achievement.unlocked);
        let now_unlocked = was_unlocked || progress >= definition.total;
        let achievement = definition.materialize(progress, now_unlocked);
        if now_unlocked && !was_unlocked {
            unlocked = Some(achievement.clone());
        }
        achievements.push(achievement);
    }

    Derivation {
        achievements,
        unlocked,
    }
}

pub struct Overview<'a> {
    pub unlocked: Vec<&'a Achievement>,
    pub locked: Vec<&'a Achievement>,
}

/// Unlocked achievements, then up to `limit` locked ones (all when `None`).
pub fn overview(achievements: &[Achievement], limit: Option<usize>) -> Overview<'_> {
    let (unlocked, locked): (Vec<&Achievement>, Vec<&Achievement>) =
        achievements.iter().partition(|achievement| achievement.unlocked);
    let locked = match limit {
        Some(limit) => locked.into_iter().take(limit).collect(),
        None => locked,
    };
    Overview { unlocked, locked }
}
