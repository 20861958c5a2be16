use std::env;
use std::io::{self, Write};
use std::path::PathBuf;
use std::str::SplitWhitespace;

use chrono::{Duration, Utc};

use life_codex::core::codex::Codex;
use life_codex::goals::{GoalDraft, GoalId, GoalReward};
use life_codex::journal::{EntryDraft, EntryId, EntryPatch};
use life_codex::persistence::SqliteSnapshotStore;
use life_codex::skills::SkillId;
use life_codex::stats::StatName;

const COMMANDS: &str = "Commands: summary | stats | history <stat> | gain <stat> <amount> [source] | lose <stat> <amount> [source] | reset-stats | skills | skill <id> | learn <stat> <difficulty> <name> | practice <id> <amount> | atrophy <id> <amount> | select <id|none> | goals | add-goal <value> <stat|-> <skills|-> <title> | toggle <id> | delete-goal <id> | journal | note <title> | tag-note <id> <tags,csv> | drop-note <id> | tags | quit";

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let db_path = parse_db_path(env::args().collect());
    let store = match SqliteSnapshotStore::open(&db_path) {
        Ok(store) => store,
        Err(err) => {
            eprintln!("Failed to open codex DB at {}: {}", db_path.display(), err);
            std::process::exit(1);
        }
    };
    let mut codex = match Codex::open(Box::new(store)) {
        Ok(codex) => codex,
        Err(err) => {
            eprintln!("Failed to load codex state: {}", err);
            std::process::exit(1);
        }
    };

    println!("Life Codex ({})", db_path.display());
    println!("{}", COMMANDS);
    loop {
        print!("> ");
        if io::stdout().flush().is_err() {
            break;
        }

        let mut input = String::new();
        if io::stdin().read_line(&mut input).is_err() {
            break;
        }
        let trimmed = input.trim();
        if trimmed.is_empty() {
            continue;
        }

        let mut parts = trimmed.split_whitespace();
        let cmd = parts.next().unwrap_or("").to_lowercase();

        match dispatch(&mut codex, &cmd, parts) {
            Ok(true) => {}
            Ok(false) => break,
            Err(err) => eprintln!("Command failed: {}", err),
        }
    }
}

fn parse_db_path(args: Vec<String>) -> PathBuf {
    let mut path = PathBuf::from("./codex.sqlite");
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        if arg == "--db" {
            if let Some(value) = iter.next() {
                path = PathBuf::from(value);
            }
        }
    }
    path
}

/// Run one command. Returns `Ok(false)` when the loop should stop.
fn dispatch(
    codex: &mut Codex,
    cmd: &str,
    mut parts: SplitWhitespace,
) -> Result<bool, Box<dyn std::error::Error>> {
    match cmd {
        "quit" | "exit" => return Ok(false),
        "help" => println!("{}", COMMANDS),
        "summary" => print_summary(codex),
        "stats" => print_stats(codex),
        "history" => match parts.next().and_then(StatName::parse) {
            Some(stat) => print_history(codex, stat),
            None => println!("Usage: history <stat>"),
        },
        "gain" | "lose" => {
            let stat = parts.next().and_then(StatName::parse);
            let amount = parts.next().and_then(|raw| raw.parse::<u32>().ok());
            let rest = parts.collect::<Vec<_>>().join(" ");
            let source = if rest.is_empty() { "manual" } else { &rest };
            match (stat, amount) {
                (Some(stat), Some(amount)) => {
                    if cmd == "gain" {
                        codex.gain_stat_xp(stat, amount, source)?;
                        println!("{} +{} XP", stat, amount);
                    } else {
                        codex.lose_stat_xp(stat, amount, source)?;
                        println!("{} -{} XP (clamped at 0)", stat, amount);
                    }
                }
                _ => println!("Usage: {} <stat> <amount> [source]", cmd),
            }
        }
        "reset-stats" => {
            codex.reset_stats()?;
            println!("All stats reset to zero.");
        }
        "skills" => print_skills(codex),
        "skill" => match parts.next() {
            Some(raw) => print_skill(codex, &SkillId(raw.to_string())),
            None => println!("Usage: skill <id>"),
        },
        "learn" => {
            let stat = parts.next().and_then(StatName::parse);
            let difficulty = parts.next().and_then(|raw| raw.parse::<f64>().ok());
            let name = parts.collect::<Vec<_>>().join(" ");
            match (stat, difficulty) {
                (Some(stat), Some(difficulty)) if !name.is_empty() => {
                    let id = codex.create_skill(&name, "", stat, Some(difficulty))?;
                    println!("Learned skill {} ({})", name, id);
                }
                _ => println!("Usage: learn <stat> <difficulty> <name>"),
            }
        }
        "practice" | "atrophy" => {
            let id = parts.next().map(|raw| SkillId(raw.to_string()));
            let amount = parts.next().and_then(|raw| raw.parse::<u32>().ok());
            match (id, amount) {
                (Some(id), Some(amount)) => {
                    if cmd == "practice" {
                        codex.gain_skill_xp(&id, amount)?;
                    } else {
                        codex.lose_skill_xp(&id, amount)?;
                    }
                    print_skill(codex, &id);
                }
                _ => println!("Usage: {} <id> <amount>", cmd),
            }
        }
        "select" => {
            match parts.next() {
                Some("none") | None => codex.select_skill(None),
                Some(raw) => codex.select_skill(Some(SkillId(raw.to_string()))),
            }
            match codex.skills().selected_skill() {
                Some(skill) => println!("Selected: {} ({})", skill.name, skill.id),
                None => println!("Selection cleared."),
            }
        }
        "goals" => print_goals(codex),
        "add-goal" => add_goal_command(codex, parts.collect())?,
        "toggle" => match parts.next() {
            Some(raw) => {
                let id = GoalId(raw.to_string());
                match codex.toggle_goal(&id)? {
                    Some(outcome) if outcome.is_complete => {
                        println!("Goal complete. Rewards applied: {}", outcome.reward_applied);
                    }
                    Some(_) => println!("Goal reopened; rewards reversed."),
                    None => println!("No goal with id {}", id),
                }
            }
            None => println!("Usage: toggle <goal_id>"),
        },
        "delete-goal" => match parts.next() {
            Some(raw) => {
                codex.delete_goal(&GoalId(raw.to_string()))?;
                println!("Goal removed (granted XP stays).");
            }
            None => println!("Usage: delete-goal <goal_id>"),
        },
        "journal" => print_journal(codex),
        "note" => {
            let title = parts.collect::<Vec<_>>().join(" ");
            if title.is_empty() {
                println!("Usage: note <title>");
            } else {
                let id = codex.add_entry(EntryDraft {
                    title,
                    summary: String::new(),
                    source: "repl".to_string(),
                    tags: Vec::new(),
                })?;
                println!("Noted ({})", id);
            }
        }
        "tag-note" => {
            let id = parts.next().map(|raw| EntryId(raw.to_string()));
            let tags = parts.next().map(|raw| {
                raw.split(',')
                    .filter(|tag| !tag.is_empty())
                    .map(str::to_string)
                    .collect::<Vec<_>>()
            });
            match (id, tags) {
                (Some(id), Some(tags)) => {
                    codex.update_entry(
                        &id,
                        EntryPatch {
                            tags: Some(tags),
                            ..EntryPatch::default()
                        },
                    )?;
                    println!("Tags updated.");
                }
                _ => println!("Usage: tag-note <id> <tags,csv>"),
            }
        }
        "drop-note" => match parts.next() {
            Some(raw) => {
                codex.remove_entry(&EntryId(raw.to_string()))?;
                println!("Entry removed.");
            }
            None => println!("Usage: drop-note <id>"),
        },
        "tags" => println!("{}", codex.journal().all_tags().join(", ")),
        other => println!("Unknown command: {} (try 'help')", other),
    }
    Ok(true)
}

fn add_goal_command(codex: &mut Codex, args: Vec<&str>) -> Result<(), Box<dyn std::error::Error>> {
    let usage = "Usage: add-goal <value> <stat|-> <skill_ids,csv|-> <title>";
    if args.len() < 4 {
        println!("{}", usage);
        return Ok(());
    }
    let Ok(value) = args[0].parse::<u32>() else {
        println!("{}", usage);
        return Ok(());
    };
    let stat = match args[1] {
        "-" => None,
        raw => match StatName::parse(raw) {
            Some(stat) => Some(stat),
            None => {
                println!("Unknown stat: {}", raw);
                return Ok(());
            }
        },
    };
    let skill_ids = match args[2] {
        "-" => Vec::new(),
        raw => raw
            .split(',')
            .filter(|id| !id.is_empty())
            .map(|id| SkillId(id.to_string()))
            .collect(),
    };
    let title = args[3..].join(" ");

    let id = codex.add_goal(GoalDraft {
        title: title.clone(),
        description: String::new(),
        deadline: Utc::now() + Duration::days(7),
        reward: GoalReward::Xp { stat, value },
        tags: Vec::new(),
        skill_ids,
    })?;
    println!("Added goal '{}' ({})", title, id);
    Ok(())
}

fn print_summary(codex: &Codex) {
    let summary = codex.summary();
    println!("-- Stats --");
    for line in &summary.stats {
        println!(
            "{:<12} Lv {:<2} [{}] {} XP",
            line.name.as_str(),
            line.level,
            progress_bar(line.progress),
            line.xp
        );
    }
    println!(
        "-- {} skills, {} open goals, {} done, {} journal entries --",
        summary.skills.len(),
        summary.open_goals,
        summary.completed_goals,
        summary.journal_entries
    );
}

fn progress_bar(progress: u32) -> String {
    let filled = (progress / 10) as usize;
    format!("{}{}", "#".repeat(filled), "-".repeat(10 - filled))
}

fn print_stats(codex: &Codex) {
    for stat in codex.stats().all() {
        println!(
            "{:<12} {:>6} XP  Lv {:<2} ({}/100)  updated {}",
            stat.name.as_str(),
            stat.xp,
            codex.stats().level_of(stat.name),
            codex.stats().progress_of(stat.name),
            stat.last_updated.format("%Y-%m-%d %H:%M")
        );
    }
}

fn print_history(codex: &Codex, stat: StatName) {
    let entries = codex.stats().history_of(stat);
    if entries.is_empty() {
        println!("No history for {}.", stat);
        return;
    }
    for entry in entries {
        println!(
            "{} {:>+6}  {}",
            entry.timestamp.format("%Y-%m-%d %H:%M"),
            entry.amount,
            entry.source
        );
    }
}

fn print_skills(codex: &Codex) {
    let skills = codex.skills().skills_list();
    if skills.is_empty() {
        println!("No skills discovered yet (try 'learn').");
        return;
    }
    for skill in skills {
        println!(
            "{}  {} [{}] Lv {} ({}/{} XP) -> {}",
            skill.id,
            skill.name,
            skill.title,
            skill.level,
            skill.xp,
            skill.xp_to_next,
            skill.stat_affected
        );
    }
}

fn print_skill(codex: &Codex, id: &SkillId) {
    let Some(skill) = codex.skills().get(id) else {
        println!("No skill with id {}", id);
        return;
    };
    println!("{} [{}]", skill.name, skill.title);
    if !skill.description.is_empty() {
        println!("  {}", skill.description);
    }
    println!(
        "  Lv {} ({}/{} XP), difficulty x{}, feeds {}",
        skill.level, skill.xp, skill.xp_to_next, skill.difficulty, skill.stat_affected
    );
    for path in &skill.unlocked_paths {
        println!("  * {}", path);
    }
}

fn print_goals(codex: &Codex) {
    let goals = codex.goals().sorted_by_deadline();
    if goals.is_empty() {
        println!("No goals yet (try 'add-goal').");
        return;
    }
    for goal in goals {
        let mark = if goal.is_complete { "x" } else { " " };
        let reward = match &goal.reward {
            GoalReward::Xp { stat: Some(stat), value } => format!("{} XP -> {}", value, stat),
            GoalReward::Xp { stat: None, value } => format!("{} XP", value),
            GoalReward::Item { value } => format!("item ({})", value),
        };
        println!(
            "[{}] {}  {}  due {}  ({}, {} linked skills)",
            mark,
            goal.id,
            goal.title,
            goal.deadline.format("%Y-%m-%d"),
            reward,
            goal.skill_ids.len()
        );
    }
}

fn print_journal(codex: &Codex) {
    let entries = codex.journal().entries();
    if entries.is_empty() {
        println!("Journal is empty (try 'note').");
        return;
    }
    for entry in entries {
        println!(
            "{}  {}  [{}]  {}",
            entry.created_at.format("%Y-%m-%d"),
            entry.id,
            entry.tags.join(", "),
            entry.title
        );
    }
}
