mod achievements;
mod app;
mod cli;
mod collection;
mod config;
mod db;
mod entities;
mod error;
mod model;
mod notify;
mod plans;
mod storage;
mod util;

use chrono::{NaiveDate, Utc};
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::achievements::{overview, UP_NEXT_LIMIT};
use crate::app::App;
use crate::cli::{
    AchievementCommand, AchievementList, Cli, Command, PlanAdd, PlanCalendar, PlanCommand,
    PlanList, PlanRemove, PlanShow, PlanToggle, PlanUpdate, SessionCommand, SessionLine,
};
use crate::config::Settings;
use crate::error::AppError;
use crate::model::{Achievement, PlanChanges, PlanInput, PlanQuery};
use crate::notify::NotificationCenter;
use crate::storage::{KeyValueStore, SqliteStore};
use crate::util::{
    format_achievement, format_calendar, format_notification, format_plan_detail,
    format_plan_table, format_time,
};

#[tokio::main]
async fn main() {
    config::init_tracing();
    if let Err(err) = run().await {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), AppError> {
    let Cli {
        data_dir,
        notify_secs,
        command,
    } = Cli::parse();
    let settings = Settings::resolve(data_dir, notify_secs)?;

    let db_path = db::resolve_db_path(&settings.data_dir);
    db::ensure_parent_dir(&db_path)?;
    let mut lock = db::open_lock(&db_path)?;
    let _guard = lock.write()?;

    let conn = db::connect(&db_path).await?;
    db::ensure_schema(&conn).await?;
    let mut app = App::open(SqliteStore::new(conn)).await?;
    let mut notifications = NotificationCenter::new(settings.notification_ttl);

    let unlocked = app.reconcile().await?;
    surface_unlock(&mut notifications, unlocked);

    match command {
        Command::Plan(command) => handle_plan(&mut app, &mut notifications, command).await,
        Command::Achievement(command) => {
            handle_achievement(&app, command);
            Ok(())
        }
        Command::Session => run_session(&mut app, &mut notifications).await,
    }
}

async fn run_session<S: KeyValueStore>(
    app: &mut App<S>,
    notifications: &mut NotificationCenter,
) -> Result<(), AppError> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let Some(words) = shlex::split(trimmed) else {
            eprintln!("Error: unbalanced quotes: {trimmed}");
            continue;
        };
        let parsed = match SessionLine::try_parse_from(words) {
            Ok(parsed) => parsed,
            Err(err) => {
                let _ = err.print();
                continue;
            }
        };

        match parsed.command {
            SessionCommand::Exit => break,
            SessionCommand::Notification => match notifications.current(Utc::now()) {
                Some(notification) => println!(
                    "{} (since {})",
                    format_notification(notification),
                    format_time(notification.raised_at)
                ),
                None => println!("No notification."),
            },
            SessionCommand::Dismiss => match notifications.dismiss() {
                Some(notification) => {
                    println!("Dismissed: {}", notification.achievement.title)
                }
                None => println!("No notification."),
            },
            SessionCommand::Achievement(command) => handle_achievement(app, command),
            SessionCommand::Plan(command) => {
                if let Err(err) = handle_plan(app, notifications, command).await {
                    eprintln!("Error: {err}");
                }
            }
        }
    }
    Ok(())
}

fn surface_unlock(notifications: &mut NotificationCenter, unlocked: Option<Achievement>) {
    if let Some(achievement) = unlocked {
        let notification = notifications.raise(achievement, Utc::now());
        println!("{}", format_notification(notification));
    }
}

async fn handle_plan<S: KeyValueStore>(
    app: &mut App<S>,
    notifications: &mut NotificationCenter,
    command: PlanCommand,
) -> Result<(), AppError> {
    match command {
        PlanCommand::Add(args) => handle_plan_add(app, notifications, args).await,
        PlanCommand::List(args) => {
            handle_plan_list(app, args);
            Ok(())
        }
        PlanCommand::Show(args) => handle_plan_show(app, args),
        PlanCommand::Update(args) => handle_plan_update(app, notifications, args).await,
        PlanCommand::Toggle(args) => handle_plan_toggle(app, notifications, args).await,
        PlanCommand::Remove(args) => handle_plan_remove(app, notifications, args).await,
        PlanCommand::Calendar(args) => handle_plan_calendar(app, args),
    }
}

async fn handle_plan_add<S: KeyValueStore>(
    app: &mut App<S>,
    notifications: &mut NotificationCenter,
    args: PlanAdd,
) -> Result<(), AppError> {
    let outcome = app
        .add_plan(PlanInput {
            title: args.title,
            description: args.description,
            date: args.date,
            category: args.category.into(),
            priority: args.priority.into(),
            location: args.location,
            notes: args.notes,
            image: args.image,
        })
        .await?;

    println!(
        "Created plan ID: {}: {}",
        outcome.value.id, outcome.value.title
    );
    surface_unlock(notifications, outcome.unlocked);
    Ok(())
}

fn handle_plan_list<S: KeyValueStore>(app: &App<S>, args: PlanList) {
    let query = PlanQuery {
        status: args.status.into(),
        category: args.category.map(Into::into),
        search: args.search,
    };
    let plans = app.list_plans(&query);
    if plans.is_empty() {
        println!("No plans found.");
        return;
    }
    println!("{}", format_plan_table(&plans));
}

fn handle_plan_show<S: KeyValueStore>(app: &App<S>, args: PlanShow) -> Result<(), AppError> {
    let plan = app.get_plan(args.id)?;
    println!("{}", format_plan_detail(plan));
    Ok(())
}

async fn handle_plan_update<S: KeyValueStore>(
    app: &mut App<S>,
    notifications: &mut NotificationCenter,
    args: PlanUpdate,
) -> Result<(), AppError> {
    let id = args.id;
    let changes = PlanChanges {
        title: args.title,
        description: args.description,
        date: args.date,
        category: args.category.map(Into::into),
        priority: args.priority.map(Into::into),
        location: args.location,
        notes: args.notes,
        image: args.image,
    };
    let outcome = app.update_plan(id, changes).await?;
    match &outcome.value {
        Some(plan) => println!("Updated plan ID: {}: {}", plan.id, plan.title),
        None => print_missing_plan(id),
    }
    surface_unlock(notifications, outcome.unlocked);
    Ok(())
}

async fn handle_plan_toggle<S: KeyValueStore>(
    app: &mut App<S>,
    notifications: &mut NotificationCenter,
    args: PlanToggle,
) -> Result<(), AppError> {
    let outcome = app.toggle_plan(args.id).await?;
    match &outcome.value {
        Some(plan) if plan.completed => println!("Plan ID: {} marked completed", plan.id),
        Some(plan) => println!("Plan ID: {} marked pending", plan.id),
        None => print_missing_plan(args.id),
    }
    surface_unlock(notifications, outcome.unlocked);
    Ok(())
}

async fn handle_plan_remove<S: KeyValueStore>(
    app: &mut App<S>,
    notifications: &mut NotificationCenter,
    args: PlanRemove,
) -> Result<(), AppError> {
    let outcome = app.delete_plan(args.id).await?;
    if outcome.value {
        println!("Removed plan ID: {}", args.id);
    } else {
        print_missing_plan(args.id);
    }
    surface_unlock(notifications, outcome.unlocked);
    Ok(())
}

fn handle_plan_calendar<S: KeyValueStore>(
    app: &App<S>,
    args: PlanCalendar,
) -> Result<(), AppError> {
    let (year, month) = plans::parse_month(&args.month)?;
    let heading = NaiveDate::from_ymd_opt(year, month, 1)
        .map(|first| first.format("%B %Y").to_string())
        .unwrap_or_else(|| args.month.clone());
    let days = app.plans_in_month(year, month);
    if days.is_empty() {
        println!("No plans in {heading}.");
        return Ok(());
    }
    println!("{heading}");
    println!("{}", format_calendar(&days));
    Ok(())
}

fn handle_achievement<S: KeyValueStore>(app: &App<S>, command: AchievementCommand) {
    match command {
        AchievementCommand::List(args) => print_achievements(app.achievements(), args),
    }
}

fn print_achievements(achievements: &[Achievement], args: AchievementList) {
    let AchievementList { all } = args;
    let limit = if all { None } else { Some(UP_NEXT_LIMIT) };
    let view = overview(achievements, limit);

    if view.unlocked.is_empty() {
        println!("No achievements unlocked yet.");
    } else {
        println!("Unlocked:");
        for achievement in &view.unlocked {
            println!("{}", format_achievement(achievement));
        }
    }
    if !view.locked.is_empty() {
        println!("{}", if all { "Locked:" } else { "Up next:" });
        for achievement in &view.locked {
            println!("{}", format_achievement(achievement));
        }
    }
}

fn print_missing_plan(id: i64) {
    println!("Plan ID: {id} not found; nothing changed.");
}
