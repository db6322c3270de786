//! Command-line driver for the progress tracker engine.
//!
//! # Responsibility
//! - Validate arguments and vocabulary strings at the boundary.
//! - Invoke repository operations and print their results.

use clap::{Parser, Subcommand};
use log::warn;
use progress_core::db::open_db;
use progress_core::{
    core_version, init_logging, ping, starter_tracks, Category, CoreConfig, SqliteKvStore,
    SystemClock, Tag, Track, TrackId, TrackRepository,
};
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(name = "progress_cli", version, about = "Track project progress")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Show all projects, or only the selected one
    List { id: Option<TrackId> },
    /// Create a project
    Add {
        name: String,
        #[arg(long, value_parser = Category::parse, default_value = "Other")]
        category: Category,
        /// Repeat for several tags
        #[arg(long = "tag", value_parser = Tag::parse)]
        tags: Vec<Tag>,
    },
    /// Mark a project as being renamed
    Edit { id: TrackId },
    /// Rename a project
    Rename { id: TrackId, name: String },
    /// Add 5% progress
    Advance { id: TrackId },
    /// Set progress back to 0
    Reset { id: TrackId },
    /// Remove a project
    Delete { id: TrackId },
    /// Check that the core library is linked
    Ping,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Commands::Ping = cli.command {
        println!("progress_core ping={} version={}", ping(), core_version());
        return ExitCode::SUCCESS;
    }

    let config = match CoreConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{err}");
            return ExitCode::from(2);
        }
    };
    if let Some(log_dir) = &config.log_dir {
        if let Err(err) = init_logging(config.log_level, log_dir) {
            eprintln!("logging disabled: {err}");
        }
    }

    let conn = match open_db(&config.db_path) {
        Ok(conn) => conn,
        Err(err) => {
            eprintln!("failed to open `{}`: {err}", config.db_path.display());
            return ExitCode::from(1);
        }
    };
    let mut repo =
        TrackRepository::open_with(SqliteKvStore::new(&conn), SystemClock, starter_tracks());

    run(&mut repo, cli.command);
    ExitCode::SUCCESS
}

fn run(repo: &mut TrackRepository<SqliteKvStore<'_>>, command: Commands) {
    match command {
        Commands::List { id } => {
            for track in repo.visible_tracks(id) {
                print_track(track);
            }
        }
        Commands::Add {
            name,
            category,
            tags,
        } => match repo.add_track(&name, category, tags) {
            Some(track) => print_track(track),
            None => eprintln!("project was not created: name is blank or no id is free"),
        },
        Commands::Edit { id } => print_one(repo.begin_renaming(id), id),
        Commands::Rename { id, name } => print_one(repo.rename_track(id, name), id),
        Commands::Advance { id } => {
            let outcome = repo.advance_progress(id);
            print_one(outcome.tracks, id);
            // The process exits right after printing, so no countdown is kept.
            if let Some(notification) = outcome.notification {
                println!("{}", notification.message);
            }
        }
        Commands::Reset { id } => print_one(repo.reset_progress(id), id),
        Commands::Delete { id } => {
            let remaining = repo.delete_track(id).len();
            println!("{remaining} project(s) remaining");
        }
        Commands::Ping => warn!("event=cli_dispatch module=cli status=noop command=ping"),
    }
}

fn print_one(tracks: &[Track], id: TrackId) {
    match tracks.iter().find(|track| track.id == id) {
        Some(track) => print_track(track),
        None => eprintln!("no project with id {id}"),
    }
}

fn print_track(track: &Track) {
    let tags = track
        .tags
        .iter()
        .map(|tag| tag.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    let editing = if track.is_editing { " (editing)" } else { "" };
    println!(
        "{:>14}  {:<24} {:>3}%  target={} [{}] {}{}",
        track.id, track.name, track.progress, track.target, track.category, tags, editing
    );
}
