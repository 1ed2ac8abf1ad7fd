//! Command-line front end for the Mindful Tracker core.
//!
//! # Responsibility
//! - Map one command per lifecycle operation onto `LifecycleManager`.
//! - Ask for confirmation before destructive operations.
//! - Report storage failures without aborting.

mod config;
mod render;

use anyhow::{anyhow, bail, Context};
use clap::{Parser, Subcommand};
use config::AppConfig;
use log::info;
use mindful_core::db::open_db;
use mindful_core::{
    badge_for_level, init_logging, read_import, write_export, Difficulty, ItemDraft, ItemEdit,
    ItemId, LifecycleManager, Outcome, Placement, SqliteStateStore, StateStore,
};
use std::io::{BufRead, Write};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "mindful", version)]
#[command(about = "Track tasks and goals; completing goals earns XP and levels")]
struct Cli {
    /// Directory holding the database and logs
    #[arg(long, env = "MINDFUL_DATA_DIR", value_name = "DIR", global = true)]
    data_dir: Option<PathBuf>,

    /// Log level (trace|debug|info|warn|error)
    #[arg(long, env = "MINDFUL_LOG_LEVEL", value_name = "LEVEL", global = true)]
    log_level: Option<String>,

    /// Answer yes to every confirmation prompt
    #[arg(short = 'y', long, global = true)]
    yes: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Show title, level, mood and the active list (default)
    Status,
    /// List active items
    List,
    /// List archived tasks
    Archived,
    /// List completed goals
    Milestones,
    /// Show XP and level details
    Xp,
    /// Create a task at the top of the list
    AddTask {
        title: String,
        #[arg(long, default_value = "💭")]
        icon: String,
        #[arg(long)]
        description: Option<String>,
    },
    /// Create a goal at the top of the list
    AddGoal {
        title: String,
        #[arg(long, default_value = "🎯")]
        icon: String,
        /// easy (50 XP), medium (100 XP) or hard (200 XP)
        #[arg(long, default_value = "easy")]
        difficulty: Difficulty,
        #[arg(long)]
        description: Option<String>,
    },
    /// Edit an item; omitted fields keep their value
    Edit {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        icon: Option<String>,
        /// Pass an empty string to remove the description
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        difficulty: Option<Difficulty>,
    },
    /// Toggle the resolved/focused flag
    Mark { id: String },
    /// Archive an item; goals award their XP
    Archive { id: String },
    /// Bring an archived item back to the top of the list
    Recover { id: String },
    /// Permanently delete an item
    Delete { id: String },
    /// Move an item before or after another active item
    Move {
        id: String,
        #[arg(
            long,
            value_name = "ID",
            conflicts_with = "before",
            required_unless_present = "before"
        )]
        after: Option<String>,
        #[arg(long, value_name = "ID")]
        before: Option<String>,
    },
    /// Rename the tracker
    Rename { title: String },
    /// Reset XP and level; items are kept
    ResetScore,
    /// Delete all stored data
    Wipe,
    /// Write a dated JSON backup
    Export {
        /// Target directory (defaults to the current directory)
        #[arg(long, value_name = "DIR")]
        dir: Option<PathBuf>,
    },
    /// Replace all data with a JSON backup
    Import { file: PathBuf },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::resolve(cli.data_dir, cli.log_level)?;

    std::fs::create_dir_all(&config.data_dir).with_context(|| {
        format!(
            "failed to create data directory `{}`",
            config.data_dir.display()
        )
    })?;
    init_logging(&config.log_level, config.log_dir())?;

    let conn = open_db(config.db_path())
        .with_context(|| format!("failed to open `{}`", config.db_path().display()))?;
    let mut manager = LifecycleManager::load(SqliteStateStore::new(&conn));

    run(cli.command.unwrap_or(Command::Status), &mut manager, cli.yes)
}

fn run<S: StateStore>(
    command: Command,
    manager: &mut LifecycleManager<S>,
    assume_yes: bool,
) -> anyhow::Result<()> {
    match command {
        Command::Status => {
            let stress = manager.stress();
            let xp = manager.xp_details();
            println!("{}", render::render_status(manager.state(), &stress, &xp));
        }
        Command::List => println!(
            "{}",
            render::render_list(manager.active_items(), false, "No active items.")
        ),
        Command::Archived => println!(
            "{}",
            render::render_list(manager.archived_tasks(), true, "No archived tasks.")
        ),
        Command::Milestones => println!(
            "{}",
            render::render_list(manager.milestones(), true, "No milestones yet.")
        ),
        Command::Xp => println!("{}", render::render_xp(&manager.xp_details())),
        Command::AddTask {
            title,
            icon,
            description,
        } => {
            let mut draft = ItemDraft::task(title, icon);
            draft.description = description;
            let outcome = manager.create_item(draft)?;
            report(&outcome, "Task created");
        }
        Command::AddGoal {
            title,
            icon,
            difficulty,
            description,
        } => {
            let mut draft = ItemDraft::goal(title, icon, difficulty);
            draft.description = description;
            let outcome = manager.create_item(draft)?;
            report(&outcome, "Goal created");
        }
        Command::Edit {
            id,
            title,
            icon,
            description,
            difficulty,
        } => {
            let id = resolve_id(manager, &id)?;
            let current = manager
                .find_item(&id)
                .ok_or_else(|| anyhow!("item disappeared: {id}"))?;
            let mut edit = ItemEdit::from_item(current);
            if let Some(title) = title {
                edit.title = title;
            }
            if let Some(icon) = icon {
                edit.icon = icon;
            }
            if description.is_some() {
                edit.description = description;
            }
            if difficulty.is_some() {
                edit.difficulty = difficulty;
            }
            let outcome = manager.edit_item(&id, edit)?;
            report(&outcome, "Item updated");
        }
        Command::Mark { id } => {
            let id = resolve_id(manager, &id)?;
            let outcome = manager.toggle_mark(&id);
            let message = match outcome.value() {
                Some(&true) => "Item marked",
                _ => "Item unmarked",
            };
            report(&outcome, message);
        }
        Command::Archive { id } => {
            let id = resolve_id(manager, &id)?;
            let outcome = manager.archive_item(&id);
            if let Some(receipt) = outcome.value() {
                if receipt.xp_awarded > 0 {
                    println!("Milestone completed! You earned {} XP.", receipt.xp_awarded);
                }
                if receipt.leveled_up() {
                    let badge = badge_for_level(receipt.level_after);
                    println!(
                        "Level up! You reached level {} {} ({}).",
                        receipt.level_after, badge.emoji, badge.title
                    );
                }
            }
            report(&outcome, "Item archived");
        }
        Command::Recover { id } => {
            let id = resolve_id(manager, &id)?;
            let outcome = manager.recover_item(&id);
            report(&outcome, "Item recovered");
        }
        Command::Delete { id } => {
            let id = resolve_id(manager, &id)?;
            if !confirm("Delete this item permanently?", assume_yes)? {
                return Ok(());
            }
            let outcome = manager.delete_item(&id);
            report(&outcome, "Item deleted");
        }
        Command::Move { id, after, before } => {
            let source = resolve_id(manager, &id)?;
            let (target, placement) = match (after, before) {
                (Some(target), _) => (target, Placement::After),
                (None, Some(target)) => (target, Placement::Before),
                (None, None) => bail!("either --after or --before is required"),
            };
            let target = resolve_id(manager, &target)?;
            let outcome = manager.move_item(&source, &target, placement);
            report(&outcome, "Item moved");
        }
        Command::Rename { title } => {
            let outcome = manager.rename_app(&title);
            if let Some(stored) = outcome.value() {
                println!("Title set to \"{stored}\".");
            }
            report(&outcome, "Title updated");
        }
        Command::ResetScore => {
            if !confirm(
                "Reset your level and XP? Tasks and goals are kept.",
                assume_yes,
            )? {
                return Ok(());
            }
            let outcome = manager.reset_score();
            report(&outcome, "Score reset to level 1, 0 XP");
        }
        Command::Wipe => {
            if !confirm(
                "Delete ALL stored data, including tasks and progress? This cannot be undone.",
                assume_yes,
            )? {
                return Ok(());
            }
            manager.clear_all().context("failed to delete data")?;
            println!("All data has been deleted.");
        }
        Command::Export { dir } => {
            let dir = match dir {
                Some(dir) => dir,
                None => std::env::current_dir().context("failed to read current directory")?,
            };
            if let Err(err) = manager.save() {
                eprintln!("warning: failed to save local state before export: {err}");
            }
            let date = chrono::Utc::now().date_naive();
            let path = write_export(&dir, manager.state(), date)?;
            println!("Data exported to {}", path.display());
        }
        Command::Import { file } => {
            let imported = read_import(&file)?;
            println!(
                "Backup contains {} items and {} XP.",
                imported.items.len(),
                imported.user.xp()
            );
            if !confirm(
                "Import this data? It will overwrite the current state.",
                assume_yes,
            )? {
                return Ok(());
            }
            let outcome = manager.replace_state(imported)?;
            info!("event=cli_import module=cli status=ok");
            report(&outcome, "Data imported");
        }
    }
    Ok(())
}

/// Resolves an exact id or a unique id prefix among all items.
fn resolve_id<S: StateStore>(
    manager: &LifecycleManager<S>,
    needle: &str,
) -> anyhow::Result<ItemId> {
    let needle = needle.trim();
    if needle.is_empty() {
        bail!("item id must not be empty");
    }

    let exact = ItemId::from(needle);
    if manager.find_item(&exact).is_some() {
        return Ok(exact);
    }

    let mut matches = manager
        .state()
        .items
        .iter()
        .filter(|item| item.id.as_str().starts_with(needle));
    match (matches.next(), matches.next()) {
        (Some(item), None) => Ok(item.id.clone()),
        (None, _) => bail!("no item matches `{needle}`"),
        (Some(_), Some(_)) => bail!("`{needle}` matches several items; use a longer prefix"),
    }
}

fn report<T>(outcome: &Outcome<T>, message: &str) {
    match outcome {
        Outcome::Applied {
            persisted: true, ..
        } => println!("{message}."),
        Outcome::Applied {
            persisted: false, ..
        } => eprintln!("{message}, but saving failed; the change will be lost on exit."),
        Outcome::Skipped => println!("Nothing changed."),
    }
}

fn confirm(prompt: &str, assume_yes: bool) -> anyhow::Result<bool> {
    if assume_yes {
        return Ok(true);
    }
    print!("{prompt} [y/N] ");
    std::io::stdout().flush()?;

    let mut answer = String::new();
    std::io::stdin().lock().read_line(&mut answer)?;
    let accepted = matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes");
    if !accepted {
        println!("Cancelled.");
    }
    Ok(accepted)
}
