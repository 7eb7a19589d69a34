use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

use sea_orm::{ConnectionTrait, Database, DatabaseBackend, Statement};
use tempfile::TempDir;
use url::Url;

fn bin_path() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_keepsake"))
}

fn run_cmd_with_flags(
    data_dir: &Path,
    flags: &[&str],
    args: &[&str],
    input: Option<&str>,
) -> Output {
    let mut cmd = Command::new(bin_path());
    cmd.arg("--data-dir").arg(data_dir);
    cmd.args(flags);
    cmd.args(args);
    cmd.env_remove("RUST_LOG");
    if input.is_some() {
        cmd.stdin(Stdio::piped());
    }
    cmd.stdout(Stdio::piped()).stderr(Stdio::piped());
    let mut child = cmd.spawn().expect("spawn command");
    if let Some(input) = input {
        child
            .stdin
            .as_mut()
            .expect("stdin")
            .write_all(input.as_bytes())
            .expect("write stdin");
    }
    child.wait_with_output().expect("wait output")
}

fn run_cmd(data_dir: &Path, args: &[&str], input: Option<&str>) -> Output {
    run_cmd_with_flags(data_dir, &[], args, input)
}

fn output_stdout(output: Output) -> String {
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8(output.stdout).expect("stdout utf8")
}

fn output_stderr(output: Output) -> String {
    assert!(!output.status.success(), "command unexpectedly succeeded");
    String::from_utf8(output.stderr).expect("stderr utf8")
}

fn parse_plan_id(stdout: &str) -> i64 {
    let prefix = "Created plan ID: ";
    let line = stdout
        .lines()
        .find(|line| line.starts_with(prefix))
        .expect("plan output");
    let rest = line.strip_prefix(prefix).expect("plan prefix");
    let id_str = rest.split(':').next().expect("plan id");
    id_str.trim().parse().expect("plan id parse")
}

fn titles_in_listing(stdout: &str) -> Vec<String> {
    stdout
        .lines()
        .skip_while(|line| !line.starts_with("ID"))
        .skip(1)
        .map(|line| {
            line.split_whitespace()
                .skip(5)
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect()
}

fn add_plan(dir: &TempDir, title: &str, date: &str, category: &str) -> i64 {
    let stdout = output_stdout(run_cmd(
        dir.path(),
        &[
            "plan",
            "add",
            title,
            "Something for the two of us",
            "--date",
            date,
            "--category",
            category,
        ],
        None,
    ));
    parse_plan_id(&stdout)
}

#[test]
fn fresh_data_dir_lists_seed_plans_by_date() {
    let dir = TempDir::new().expect("temp dir");
    let stdout = output_stdout(run_cmd(dir.path(), &["plan", "list"], None));

    assert!(stdout.starts_with("Achievement unlocked: Organized Duo (3/3)"));
    assert_eq!(
        titles_in_listing(&stdout),
        vec!["Picnic in the park", "Anniversary dinner", "Beach getaway"]
    );

    let stdout = output_stdout(run_cmd(dir.path(), &["plan", "list"], None));
    assert!(
        !stdout.contains("Achievement unlocked"),
        "unlock is only announced once: {stdout}"
    );
}

#[test]
fn plan_add_then_show() {
    let dir = TempDir::new().expect("temp dir");
    let plan_id = add_plan(&dir, "Museum day", "2025-09-06", "date");

    let stdout = output_stdout(run_cmd(
        dir.path(),
        &["plan", "show", &plan_id.to_string()],
        None,
    ));
    assert!(stdout.contains(&format!("Plan ID: {plan_id}")));
    assert!(stdout.contains("Title: Museum day"));
    assert!(stdout.contains("Date: 2025-09-06"));
    assert!(stdout.contains("Priority: medium"));
    assert!(stdout.contains("Status: pending"));
    assert!(stdout.contains("Order: 3"));
}

#[test]
fn plan_add_rejects_short_title() {
    let dir = TempDir::new().expect("temp dir");
    let stderr = output_stderr(run_cmd(
        dir.path(),
        &["plan", "add", "Go", "Somewhere", "--date", "2025-09-06"],
        None,
    ));
    assert!(stderr.contains("Invalid input: plan title must be at least 3 characters"));

    let stdout = output_stdout(run_cmd(dir.path(), &["plan", "list"], None));
    assert_eq!(titles_in_listing(&stdout).len(), 3);
}

#[test]
fn plan_add_rejects_empty_description() {
    let dir = TempDir::new().expect("temp dir");
    let stderr = output_stderr(run_cmd(
        dir.path(),
        &["plan", "add", "Museum day", " ", "--date", "2025-09-06"],
        None,
    ));
    assert!(stderr.contains("plan description cannot be empty"));
}

#[test]
fn plan_show_reports_missing_plan() {
    let dir = TempDir::new().expect("temp dir");
    let stderr = output_stderr(run_cmd(dir.path(), &["plan", "show", "999999"], None));
    assert!(stderr.contains("Not found: plan id 999999"));
}

#[test]
fn mutations_on_missing_plan_change_nothing() {
    let dir = TempDir::new().expect("temp dir");
    for args in [
        vec!["plan", "toggle", "999999"],
        vec!["plan", "remove", "999999"],
        vec!["plan", "update", "999999", "--notes", "hello"],
    ] {
        let stdout = output_stdout(run_cmd(dir.path(), &args, None));
        assert!(
            stdout.contains("Plan ID: 999999 not found; nothing changed."),
            "stdout: {stdout}"
        );
    }

    let stdout = output_stdout(run_cmd(dir.path(), &["plan", "list"], None));
    assert_eq!(titles_in_listing(&stdout).len(), 3);
}

#[test]
fn plan_toggle_flips_completion() {
    let dir = TempDir::new().expect("temp dir");
    let stdout = output_stdout(run_cmd(dir.path(), &["plan", "toggle", "2"], None));
    assert!(stdout.contains("Plan ID: 2 marked completed"));

    let stdout = output_stdout(run_cmd(dir.path(), &["plan", "toggle", "2"], None));
    assert!(stdout.contains("Plan ID: 2 marked pending"));
}

#[test]
fn plan_update_keeps_completion_and_order() {
    let dir = TempDir::new().expect("temp dir");
    let stdout = output_stdout(run_cmd(
        dir.path(),
        &[
            "plan",
            "update",
            "3",
            "--title",
            "Picnic by the lake",
            "--location",
            "",
        ],
        None,
    ));
    assert!(stdout.contains("Updated plan ID: 3: Picnic by the lake"));

    let stdout = output_stdout(run_cmd(dir.path(), &["plan", "show", "3"], None));
    assert!(stdout.contains("Status: completed"));
    assert!(stdout.contains("Order: 2"));
    assert!(!stdout.contains("Location:"));
}

#[test]
fn plan_list_filters_status_category_and_search() {
    let dir = TempDir::new().expect("temp dir");

    let stdout = output_stdout(run_cmd(
        dir.path(),
        &["plan", "list", "--status", "completed"],
        None,
    ));
    assert_eq!(titles_in_listing(&stdout), vec!["Picnic in the park"]);

    let stdout = output_stdout(run_cmd(
        dir.path(),
        &["plan", "list", "--status", "pending"],
        None,
    ));
    assert_eq!(
        titles_in_listing(&stdout),
        vec!["Anniversary dinner", "Beach getaway"]
    );

    let stdout = output_stdout(run_cmd(
        dir.path(),
        &["plan", "list", "--category", "vacation"],
        None,
    ));
    assert_eq!(titles_in_listing(&stdout), vec!["Beach getaway"]);

    let stdout = output_stdout(run_cmd(
        dir.path(),
        &["plan", "list", "--search", "MIRADOR"],
        None,
    ));
    assert_eq!(titles_in_listing(&stdout), vec!["Anniversary dinner"]);

    let stdout = output_stdout(run_cmd(
        dir.path(),
        &["plan", "list", "--search", "opera"],
        None,
    ));
    assert!(stdout.contains("No plans found."));
}

#[test]
fn plan_list_breaks_date_ties_by_order() {
    let dir = TempDir::new().expect("temp dir");
    add_plan(&dir, "Morning hike", "2025-07-15", "goal");
    add_plan(&dir, "Sunset walk", "2025-07-15", "date");

    let stdout = output_stdout(run_cmd(dir.path(), &["plan", "list"], None));
    assert_eq!(
        titles_in_listing(&stdout),
        vec![
            "Picnic in the park",
            "Anniversary dinner",
            "Morning hike",
            "Sunset walk",
            "Beach getaway",
        ]
    );
}

#[test]
fn plan_remove_then_remove_again() {
    let dir = TempDir::new().expect("temp dir");
    let stdout = output_stdout(run_cmd(dir.path(), &["plan", "remove", "1"], None));
    assert!(stdout.contains("Removed plan ID: 1"));

    let stdout = output_stdout(run_cmd(dir.path(), &["plan", "remove", "1"], None));
    assert!(stdout.contains("Plan ID: 1 not found; nothing changed."));
}

#[test]
fn plan_calendar_groups_month() {
    let dir = TempDir::new().expect("temp dir");
    add_plan(&dir, "Cooking class", "2025-07-02", "date");

    let stdout = output_stdout(run_cmd(dir.path(), &["plan", "calendar", "2025-07"], None));
    assert!(stdout.contains("July 2025"));
    let cooking = stdout.find("Cooking class").expect("cooking class listed");
    let dinner = stdout.find("Anniversary dinner").expect("dinner listed");
    assert!(cooking < dinner);
    assert!(!stdout.contains("Beach getaway"));

    let stdout = output_stdout(run_cmd(dir.path(), &["plan", "calendar", "2024-01"], None));
    assert!(stdout.contains("No plans in January 2024."));

    let stderr = output_stderr(run_cmd(dir.path(), &["plan", "calendar", "July"], None));
    assert!(stderr.contains("expected YYYY-MM"));
}

#[test]
fn achievement_list_shows_unlocked_and_next_two() {
    let dir = TempDir::new().expect("temp dir");
    let stdout = output_stdout(run_cmd(dir.path(), &["achievement", "list"], None));

    let (unlocked, up_next) = stdout.split_once("Up next:").expect("up next section");
    assert!(unlocked.contains("[x] First Plan!"));
    assert!(unlocked.contains("[x] Organized Duo"));
    assert!(up_next.contains("[ ] Plan Master"));
    assert!(up_next.contains("[ ] Completionist"));
    assert!(!up_next.contains("Romantics"));

    let stdout = output_stdout(run_cmd(dir.path(), &["achievement", "list", "--all"], None));
    assert!(stdout.contains("Locked:"));
    assert!(stdout.contains("[ ] Romantics"));
    assert!(stdout.contains("[ ] Adventurers"));
}

#[tokio::test]
async fn malformed_stored_plans_fall_back_to_seed() {
    let dir = TempDir::new().expect("temp dir");
    add_plan(&dir, "Museum day", "2025-09-06", "date");

    let db_path = dir.path().join("keepsake.db");
    let mut url = Url::from_file_path(&db_path).expect("db path");
    url.set_query(Some("mode=rwc"));
    let sqlite_url = url.as_str().replacen("file://", "sqlite://", 1);
    let db = Database::connect(&sqlite_url).await.expect("connect db");
    db.execute(Statement::from_string(
        DatabaseBackend::Sqlite,
        "UPDATE entries SET value = '{not valid json' WHERE key = 'plans';".to_string(),
    ))
    .await
    .expect("corrupt plans");
    db.close().await.expect("close db");

    let stdout = output_stdout(run_cmd(dir.path(), &["plan", "list"], None));
    assert_eq!(
        titles_in_listing(&stdout),
        vec!["Picnic in the park", "Anniversary dinner", "Beach getaway"]
    );
}

#[test]
fn unlocks_survive_plan_removal() {
    let dir = TempDir::new().expect("temp dir");
    let mut last_id = 0;
    for idx in 0..7 {
        last_id = add_plan(&dir, &format!("Weekend plan {idx}"), "2025-10-04", "other");
    }

    let stdout = output_stdout(run_cmd(dir.path(), &["achievement", "list"], None));
    let (unlocked, _) = stdout.split_once("Up next:").expect("up next section");
    assert!(unlocked.contains("[x] Plan Master"));
    assert!(unlocked.contains("10/10"));

    output_stdout(run_cmd(
        dir.path(),
        &["plan", "remove", &last_id.to_string()],
        None,
    ));
    let stdout = output_stdout(run_cmd(dir.path(), &["achievement", "list"], None));
    let (unlocked, _) = stdout.split_once("Up next:").expect("up next section");
    assert!(unlocked.contains("[x] Plan Master"));
    assert!(unlocked.contains(" 9/10"));
}

#[test]
fn session_announces_unlock_once_and_keeps_going_after_errors() {
    let dir = TempDir::new().expect("temp dir");
    let mut script = String::from("plan add \"No\" \"too short\" --date 2025-01-01\n");
    for idx in 0..7 {
        script.push_str(&format!(
            "plan add \"Weekend plan {idx}\" \"Out and about\" --date 2025-10-04\n"
        ));
    }
    script.push_str("plan list --search weekend\nexit\nplan list\n");

    let output = run_cmd(dir.path(), &["session"], Some(&script));
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let stdout = output_stdout(output);

    assert!(stderr.contains("plan title must be at least 3 characters"));
    assert_eq!(stdout.matches("Created plan ID:").count(), 7);
    assert_eq!(
        stdout
            .matches("Achievement unlocked: Plan Master (10/10)")
            .count(),
        1
    );
    assert_eq!(titles_in_listing(&stdout).len(), 7);
}

#[test]
fn session_notification_can_be_dismissed() {
    let dir = TempDir::new().expect("temp dir");
    let script = "notification\ndismiss\nnotification\ndismiss\n";
    let stdout = output_stdout(run_cmd_with_flags(
        dir.path(),
        &["--notify-secs", "600"],
        &["session"],
        Some(script),
    ));

    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines[0], "Achievement unlocked: Organized Duo (3/3)");
    assert!(lines[1].starts_with("Achievement unlocked: Organized Duo (3/3) (since "));
    assert_eq!(lines[2], "Dismissed: Organized Duo");
    assert_eq!(lines[3], "No notification.");
    assert_eq!(lines[4], "No notification.");

    let stdout = output_stdout(run_cmd(dir.path(), &["achievement", "list"], None));
    assert!(stdout.contains("[x] Organized Duo"), "dismissal keeps the unlock");
}

#[test]
fn session_notification_expires() {
    let dir = TempDir::new().expect("temp dir");
    let stdout = output_stdout(run_cmd_with_flags(
        dir.path(),
        &["--notify-secs", "0"],
        &["session"],
        Some("notification\n"),
    ));
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines[0], "Achievement unlocked: Organized Duo (3/3)");
    assert_eq!(lines[1], "No notification.");
}

#[test]
fn oversized_notify_secs_is_rejected() {
    let dir = TempDir::new().expect("temp dir");
    for secs in ["100000000000000", "10000000000000000"] {
        let output = run_cmd_with_flags(
            dir.path(),
            &["--notify-secs", secs],
            &["plan", "list"],
            None,
        );
        assert_eq!(output.status.code(), Some(1), "secs {secs}");
        let stderr = String::from_utf8(output.stderr).expect("stderr utf8");
        assert!(stderr.contains("Invalid input: notify-secs must be at most 86400"));
    }

    let stdout = output_stdout(run_cmd_with_flags(
        dir.path(),
        &["--notify-secs", "86400"],
        &["plan", "list"],
        None,
    ));
    assert!(stdout.contains("Beach getaway"));
}
