use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};

use crate::collection::{Record, Toggle};
use crate::error::AppError;
use crate::model::{
    Category, Plan, PlanChanges, PlanFlag, PlanInput, PlanQuery, Priority, StatusFilter,
};

pub const PLANS_KEY: &str = "plans";

const MIN_TITLE_CHARS: usize = 3;

const ANNIVERSARY_DINNER_DATE: NaiveDate = ymd(2025, 7, 15);
const BEACH_GETAWAY_DATE: NaiveDate = ymd(2025, 8, 10);
const PICNIC_DATE: NaiveDate = ymd(2025, 6, 20);

impl Record for Plan {
    fn id(&self) -> i64 {
        self.id
    }
}

impl Toggle for Plan {
    type Field = PlanFlag;

    fn toggle(&mut self, field: PlanFlag) {
        match field {
            PlanFlag::Completed => self.completed = !self.completed,
        }
    }
}

pub fn seed_plans() -> Vec<Plan> {
    vec![
        Plan {
            id: 1,
            title: "Anniversary dinner".to_string(),
            description: "Celebrate our anniversary at a special restaurant".to_string(),
            date: ANNIVERSARY_DINNER_DATE,
            category: Category::Anniversary,
            priority: Priority::High,
            completed: false,
            order: 0,
            location: Some("El Mirador Restaurant".to_string()),
            notes: None,
            image: None,
        },
        Plan {
            id: 2,
            title: "Beach getaway".to_string(),
            description: "A romantic weekend on the coast".to_string(),
            date: BEACH_GETAWAY_DATE,
            category: Category::Vacation,
            priority: Priority::Medium,
            completed: false,
            order: 1,
            location: None,
            notes: None,
            image: None,
        },
        Plan {
            id: 3,
            title: "Picnic in the park".to_string(),
            description: "A slow afternoon with food and music".to_string(),
            date: PICNIC_DATE,
            category: Category::Date,
            priority: Priority::Low,
            completed: true,
            order: 2,
            location: Some("Central Park".to_string()),
            notes: None,
            image: None,
        },
    ]
}

/// Seed dates are built in const context, so a bad date fails the build.
const fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
    match NaiveDate::from_ymd_opt(year, month, day) {
        Some(date) => date,
        None => panic!("invalid calendar date"),
    }
}

pub fn validate_input(input: &PlanInput) -> Result<(), AppError> {
    let mut problems = Vec::new();
    check_title(&input.title, &mut problems);
    check_description(&input.description, &mut problems);
    finish(problems)
}

pub fn validate_changes(changes: &PlanChanges) -> Result<(), AppError> {
    if changes.is_empty() {
        return Err(AppError::InvalidInput(
            "plan update requires at least one field".to_string(),
        ));
    }
    let mut problems = Vec::new();
    if let Some(title) = &changes.title {
        check_title(title, &mut problems);
    }
    if let Some(description) = &changes.description {
        check_description(description, &mut problems);
    }
    finish(problems)
}

fn check_title(title: &str, problems: &mut Vec<String>) {
    let title = title.trim();
    if title.is_empty() {
        problems.push("plan title cannot be empty".to_string());
    } else if title.chars().count() < MIN_TITLE_CHARS {
        problems.push(format!(
            "plan title must be at least {MIN_TITLE_CHARS} characters"
        ));
    }
}

fn check_description(description: &str, problems: &mut Vec<String>) {
    if description.trim().is_empty() {
        problems.push("plan description cannot be empty".to_string());
    }
}

fn finish(problems: Vec<String>) -> Result<(), AppError> {
    if problems.is_empty() {
        Ok(())
    } else {
        Err(AppError::InvalidInput(problems.join("\n")))
    }
}

/// Next plan id: the clock in milliseconds, bumped past every live id when
/// the clock has not moved on.
pub fn next_plan_id(plans: &[Plan], now_millis: i64) -> Result<i64, AppError> {
    match plans.iter().map(|plan| plan.id).max() {
        Some(max) if max >= now_millis => max.checked_add(1).ok_or_else(|| {
            AppError::InvalidInput(format!("no plan id left after {max}"))
        }),
        _ => Ok(now_millis),
    }
}

pub fn new_plan(plans: &[Plan], input: PlanInput, now_millis: i64) -> Result<Plan, AppError> {
    Ok(Plan {
        id: next_plan_id(plans, now_millis)?,
        title: input.title.trim().to_string(),
        description: input.description.trim().to_string(),
        date: input.date,
        category: input.category,
        priority: input.priority,
        completed: false,
        order: plans.len() as i64,
        location: non_blank(input.location),
        notes: non_blank(input.notes),
        image: non_blank(input.image),
    })
}

/// Applies an already validated edit. Identity, `order` and `completed` are
/// never touched here.
pub fn apply_changes(plan: &mut Plan, changes: PlanChanges) {
    if let Some(title) = changes.title {
        plan.title = title.trim().to_string();
    }
    if let Some(description) = changes.description {
        plan.description = description.trim().to_string();
    }
    if let Some(date) = changes.date {
        plan.date = date;
    }
    if let Some(category) = changes.category {
        plan.category = category;
    }
    if let Some(priority) = changes.priority {
        plan.priority = priority;
    }
    if let Some(location) = changes.location {
        plan.location = non_blank(Some(location));
    }
    if let Some(notes) = changes.notes {
        plan.notes = non_blank(Some(notes));
    }
    if let Some(image) = changes.image {
        plan.image = non_blank(Some(image));
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
}

/// Date ascending, then `order` ascending. Stable, so full ties keep their
/// collection order.
pub fn sort_plans(plans: &mut [&Plan]) {
    plans.sort_by(|a, b| a.date.cmp(&b.date).then(a.order.cmp(&b.order)));
}

pub fn matches_query(plan: &Plan, query: &PlanQuery) -> bool {
    let status_ok = match query.status {
        StatusFilter::All => true,
        StatusFilter::Pending => !plan.completed,
        StatusFilter::Completed => plan.completed,
    };
    if !status_ok {
        return false;
    }
    if query.category.is_some_and(|category| category != plan.category) {
        return false;
    }
    match query.search.as_deref().map(str::trim) {
        Some(term) if !term.is_empty() => {
            let term = term.to_lowercase();
            plan.title.to_lowercase().contains(&term)
                || plan.description.to_lowercase().contains(&term)
                || plan
                    .location
                    .as_deref()
                    .is_some_and(|location| location.to_lowercase().contains(&term))
        }
        _ => true,
    }
}

pub fn filter_plans<'a>(plans: &'a [Plan], query: &PlanQuery) -> Vec<&'a Plan> {
    let mut filtered: Vec<&Plan> = plans
        .iter()
        .filter(|plan| matches_query(plan, query))
        .collect();
    sort_plans(&mut filtered);
    filtered
}

/// Plans dated within the given month, grouped by day.
pub fn plans_in_month(plans: &[Plan], year: i32, month: u32) -> BTreeMap<NaiveDate, Vec<&Plan>> {
    let mut in_month: Vec<&Plan> = plans
        .iter()
        .filter(|plan| plan.date.year() == year && plan.date.month() == month)
        .collect();
    sort_plans(&mut in_month);

    let mut days: BTreeMap<NaiveDate, Vec<&Plan>> = BTreeMap::new();
    for plan in in_month {
        days.entry(plan.date).or_default().push(plan);
    }
    days
}

pub fn parse_month(value: &str) -> Result<(i32, u32), AppError> {
    let invalid = || AppError::InvalidInput(format!("invalid month '{value}', expected YYYY-MM"));
    let (year, month) = value.trim().split_once('-').ok_or_else(invalid)?;
    let year: i32 = year.parse().map_err(|_| invalid())?;
    let month: u32 = month.parse().map_err(|_| invalid())?;
    if !(1..=12).contains(&month) {
        return Err(invalid());
    }
    Ok((year, month))
}
