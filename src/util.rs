use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};

use crate::model::{Achievement, Plan};
use crate::notify::Notification;

fn has_text(value: &Option<String>) -> bool {
    value
        .as_deref()
        .map(|text| !text.trim().is_empty())
        .unwrap_or(false)
}

pub fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

pub fn format_time(dt: DateTime<Utc>) -> String {
    dt.format("%H:%M:%S").to_string()
}

fn checkbox(completed: bool) -> &'static str {
    if completed {
        "[x]"
    } else {
        "[ ]"
    }
}

fn status_label(completed: bool) -> &'static str {
    if completed {
        "completed"
    } else {
        "pending"
    }
}

pub fn format_plan_detail(plan: &Plan) -> String {
    let mut output = String::new();
    output.push_str(&format!("Plan ID: {}\n", plan.id));
    output.push_str(&format!("Title: {}\n", plan.title));
    output.push_str(&format!("Description: {}\n", plan.description));
    output.push_str(&format!("Date: {}\n", format_date(plan.date)));
    output.push_str(&format!("Category: {}\n", plan.category.as_str()));
    output.push_str(&format!("Priority: {}\n", plan.priority.as_str()));
    output.push_str(&format!("Status: {}\n", status_label(plan.completed)));
    output.push_str(&format!("Order: {}\n", plan.order));
    if has_text(&plan.location) {
        output.push_str(&format!(
            "Location: {}\n",
            plan.location.as_deref().unwrap_or("")
        ));
    }
    if has_text(&plan.notes) {
        output.push_str(&format!("Notes: {}\n", plan.notes.as_deref().unwrap_or("")));
    }
    if has_text(&plan.image) {
        output.push_str(&format!("Image: {}\n", plan.image.as_deref().unwrap_or("")));
    }
    output.trim_end().to_string()
}

pub fn format_plan_table(plans: &[&Plan]) -> String {
    let mut lines = vec![format!(
        "{:<14} {:<10} {:<9} {:<12} {:<8} {}",
        "ID", "DATE", "STATUS", "CATEGORY", "PRIORITY", "TITLE"
    )];
    for plan in plans {
        lines.push(format!(
            "{:<14} {:<10} {:<9} {:<12} {:<8} {}",
            plan.id,
            format_date(plan.date),
            status_label(plan.completed),
            plan.category.as_str(),
            plan.priority.as_str(),
            plan.title
        ));
    }
    lines.join("\n")
}

pub fn format_calendar(days: &BTreeMap<NaiveDate, Vec<&Plan>>) -> String {
    let mut lines = Vec::new();
    for (day, plans) in days {
        lines.push(day.format("%a %d").to_string());
        for plan in plans {
            lines.push(format!(
                "  {} {} (plan id {}, {})",
                checkbox(plan.completed),
                plan.title,
                plan.id,
                plan.category.as_str()
            ));
        }
    }
    lines.join("\n")
}

pub fn format_achievement(achievement: &Achievement) -> String {
    format!(
        "{} {:<14} {:>2}/{:<2} [{}] {}",
        checkbox(achievement.unlocked),
        achievement.title,
        achievement.progress,
        achievement.total,
        achievement.icon.as_str(),
        achievement.description
    )
}

pub fn format_notification(notification: &Notification) -> String {
    format!(
        "Achievement unlocked: {} ({}/{})",
        notification.achievement.title,
        notification.achievement.progress,
        notification.achievement.total
    )
}
