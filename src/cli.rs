use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::model::{Category, Priority, StatusFilter};
use crate::notify::DEFAULT_NOTIFICATION_SECS;

#[derive(Parser, Debug)]
#[command(
    name = "keepsake",
    version,
    about = "Keep our shared plans and the achievements they unlock"
)]
pub struct Cli {
    #[arg(
        long,
        global = true,
        value_name = "PATH",
        help = "Data directory (defaults to $KEEPSAKE_HOME, then ~/.keepsake)"
    )]
    pub data_dir: Option<PathBuf>,
    #[arg(
        long,
        global = true,
        value_name = "SECS",
        default_value_t = DEFAULT_NOTIFICATION_SECS,
        help = "How long an achievement notification stays visible in a session"
    )]
    pub notify_secs: u64,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    #[command(subcommand)]
    Plan(PlanCommand),
    #[command(subcommand)]
    Achievement(AchievementCommand),
    /// Read one command per line from stdin
    Session,
}

/// One line of an interactive session.
#[derive(Parser, Debug)]
#[command(name = "keepsake", no_binary_name = true)]
pub struct SessionLine {
    #[command(subcommand)]
    pub command: SessionCommand,
}

#[derive(Subcommand, Debug)]
pub enum SessionCommand {
    #[command(subcommand)]
    Plan(PlanCommand),
    #[command(subcommand)]
    Achievement(AchievementCommand),
    /// Show the current achievement notification
    Notification,
    /// Hide the current achievement notification
    Dismiss,
    Exit,
}

#[derive(Subcommand, Debug)]
pub enum PlanCommand {
    Add(PlanAdd),
    List(PlanList),
    Show(PlanShow),
    Update(PlanUpdate),
    Toggle(PlanToggle),
    Remove(PlanRemove),
    Calendar(PlanCalendar),
}

#[derive(Subcommand, Debug)]
pub enum AchievementCommand {
    List(AchievementList),
}

#[derive(Args, Debug)]
pub struct PlanAdd {
    pub title: String,
    pub description: String,
    #[arg(long, value_name = "YYYY-MM-DD")]
    pub date: NaiveDate,
    #[arg(long, value_enum, default_value = "date")]
    pub category: CategoryArg,
    #[arg(long, value_enum, default_value = "medium")]
    pub priority: PriorityArg,
    #[arg(long)]
    pub location: Option<String>,
    #[arg(long)]
    pub notes: Option<String>,
    #[arg(long, value_name = "URL")]
    pub image: Option<String>,
}

#[derive(Args, Debug)]
pub struct PlanList {
    #[arg(long, value_enum, default_value = "all")]
    pub status: StatusArg,
    #[arg(long, value_enum)]
    pub category: Option<CategoryArg>,
    #[arg(long, value_name = "TERM")]
    pub search: Option<String>,
}

#[derive(Args, Debug)]
pub struct PlanShow {
    pub id: i64,
}

#[derive(Args, Debug)]
pub struct PlanUpdate {
    pub id: i64,
    #[arg(long)]
    pub title: Option<String>,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long, value_name = "YYYY-MM-DD")]
    pub date: Option<NaiveDate>,
    #[arg(long, value_enum)]
    pub category: Option<CategoryArg>,
    #[arg(long, value_enum)]
    pub priority: Option<PriorityArg>,
    #[arg(long, help = "New location (empty string clears it)")]
    pub location: Option<String>,
    #[arg(long, help = "New notes (empty string clears them)")]
    pub notes: Option<String>,
    #[arg(long, value_name = "URL", help = "New image (empty string clears it)")]
    pub image: Option<String>,
}

#[derive(Args, Debug)]
pub struct PlanToggle {
    pub id: i64,
}

#[derive(Args, Debug)]
pub struct PlanRemove {
    pub id: i64,
}

#[derive(Args, Debug)]
pub struct PlanCalendar {
    #[arg(value_name = "YYYY-MM")]
    pub month: String,
}

#[derive(Args, Debug)]
pub struct AchievementList {
    #[arg(long, help = "List every locked achievement, not just the next two")]
    pub all: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum CategoryArg {
    Anniversary,
    Vacation,
    Date,
    Goal,
    Surprise,
    Other,
}

impl From<CategoryArg> for Category {
    fn from(arg: CategoryArg) -> Self {
        match arg {
            CategoryArg::Anniversary => Category::Anniversary,
            CategoryArg::Vacation => Category::Vacation,
            CategoryArg::Date => Category::Date,
            CategoryArg::Goal => Category::Goal,
            CategoryArg::Surprise => Category::Surprise,
            CategoryArg::Other => Category::Other,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum PriorityArg {
    High,
    Medium,
    Low,
}

impl From<PriorityArg> for Priority {
    fn from(arg: PriorityArg) -> Self {
        match arg {
            PriorityArg::High => Priority::High,
            PriorityArg::Medium => Priority::Medium,
            PriorityArg::Low => Priority::Low,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum StatusArg {
    All,
    Pending,
    Completed,
}

impl From<StatusArg> for StatusFilter {
    fn from(arg: StatusArg) -> Self {
        match arg {
            StatusArg::All => StatusFilter::All,
            StatusArg::Pending => StatusFilter::Pending,
            StatusArg::Completed => StatusFilter::Completed,
        }
    }
}
