use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Anniversary,
    Vacation,
    Date,
    Goal,
    Surprise,
    Other,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Anniversary => "anniversary",
            Self::Vacation => "vacation",
            Self::Date => "date",
            Self::Goal => "goal",
            Self::Surprise => "surprise",
            Self::Other => "other",
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plan {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub date: NaiveDate,
    pub category: Category,
    pub priority: Priority,
    pub completed: bool,
    /// Secondary sort key. Set to the collection length at creation and never
    /// compacted, so gaps and ties are expected.
    pub order: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// Boolean fields of a [`Plan`] that can be flipped without a full update.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PlanFlag {
    Completed,
}

#[derive(Clone, Debug)]
pub struct PlanInput {
    pub title: String,
    pub description: String,
    pub date: NaiveDate,
    pub category: Category,
    pub priority: Priority,
    pub location: Option<String>,
    pub notes: Option<String>,
    pub image: Option<String>,
}

/// Partial edit of a plan. `None` leaves a field untouched; for the optional
/// extras an empty string clears the value.
#[derive(Clone, Debug, Default)]
pub struct PlanChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub date: Option<NaiveDate>,
    pub category: Option<Category>,
    pub priority: Option<Priority>,
    pub location: Option<String>,
    pub notes: Option<String>,
    pub image: Option<String>,
}

impl PlanChanges {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.date.is_none()
            && self.category.is_none()
            && self.priority.is_none()
            && self.location.is_none()
            && self.notes.is_none()
            && self.image.is_none()
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum StatusFilter {
    #[default]
    All,
    Pending,
    Completed,
}

#[derive(Clone, Debug, Default)]
pub struct PlanQuery {
    pub status: StatusFilter,
    pub category: Option<Category>,
    pub search: Option<String>,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AchievementIcon {
    Trophy,
    Medal,
    Star,
    Award,
    Target,
    Calendar,
}

impl AchievementIcon {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Trophy => "trophy",
            Self::Medal => "medal",
            Self::Star => "star",
            Self::Award => "award",
            Self::Target => "target",
            Self::Calendar => "calendar",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Achievement {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub icon: AchievementIcon,
    pub progress: u32,
    pub total: u32,
    pub unlocked: bool,
}
