//! Script Deck - main entry point
//!
//! Without a subcommand the ratatui navigator starts; every subcommand is a
//! one-shot, scriptable form of a navigator action.

use anyhow::{bail, Context, Result};
use ratatui::{backend::CrosstermBackend, Terminal};
use scriptdeck::app::{self, App};
use scriptdeck::catalog::{relative_to, Catalog, Script, Unit};
use scriptdeck::cli::{Cli, Commands};
use scriptdeck::launcher::{RunOptions, RunOutcome, TerminalPrompt};
use scriptdeck::logging;
use scriptdeck::preview::Preview;
use scriptdeck::session::{self, Session};
use std::io::stdout;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

fn main() -> Result<()> {
    let cli = Cli::parse_args();
    let home = session::resolve_home(cli.home).context("Failed to determine the app home")?;
    let _logging = logging::init(&home, cli.command.is_none());

    debug!(home = %home.display(), "Opening session");
    let mut session = Session::open(&home);

    match cli.command {
        None => run_tui(session),
        Some(command) => run_command(&mut session, command),
    }
}

/// Run the navigator on the alternate screen
fn run_tui(session: Session) -> Result<()> {
    info!("Starting navigator");
    app::enter_tui().context("Failed to initialize the terminal")?;

    let result = Terminal::new(CrosstermBackend::new(stdout()))
        .context("Failed to create terminal")
        .and_then(|mut terminal| {
            App::new(session)
                .run(&mut terminal)
                .context("Navigator failed")
        });

    // Always restore the terminal, even if the navigator failed
    let _ = app::leave_tui();
    result
}

fn run_command(session: &mut Session, command: Commands) -> Result<()> {
    let catalog = session.catalog();
    let base_dir = catalog.base_dir().to_path_buf();

    match command {
        Commands::Units => {
            for unit in catalog.units() {
                println!("{}) {}  {}", unit.key, unit.name, unit.path.display());
            }
        }
        Commands::Folders { unit } => {
            let unit = find_unit(&catalog, &unit)?;
            let folders = catalog.folders(&unit.path);
            if folders.is_empty() {
                println!("No subfolders (or the path does not exist).");
            }
            for folder in folders {
                println!("{}", folder.name);
            }
        }
        Commands::Scripts { unit, folder } => {
            let unit = find_unit(&catalog, &unit)?;
            let scripts = catalog.scripts(&unit.path.join(&folder));
            if scripts.is_empty() {
                println!("No scripts in this folder.");
            }
            print_scripts(session, &scripts, &base_dir);
        }
        Commands::Search { unit, query } => {
            let unit = find_unit(&catalog, &unit)?;
            let hits = catalog.search(&unit.path, &query);
            if hits.is_empty() {
                println!("No scripts found.");
            }
            print_scripts(session, &hits, &base_dir);
        }
        Commands::Recent => {
            let recent = session.list_recent();
            if recent.is_empty() {
                println!("No recent scripts yet.");
            }
            print_scripts(session, &recent, &base_dir);
        }
        Commands::Favorites => {
            let favorites = session.list_favorites();
            if favorites.is_empty() {
                println!("No favorites yet.");
            }
            print_scripts(session, &favorites, &base_dir);
        }
        Commands::Favorite { path } => {
            let script = existing_script(&path)?;
            if session.toggle_favorite(&script) {
                println!("{} marked as favorite.", script.name);
            } else {
                println!("{} removed from favorites.", script.name);
            }
        }
        Commands::Run {
            path,
            yes,
            no_args,
            args,
        } => {
            let script = existing_script(&path)?;
            let config = session.config.config();
            let options = RunOptions {
                confirm: config.confirm_before_run && !yes,
                prompt_for_args: config.ask_args_before_run && !no_args && args.is_empty(),
                args,
            };
            let outcome = session.run(&script, &options, &mut TerminalPrompt);
            println!("{outcome}");
            match outcome {
                RunOutcome::Completed(code) if code != 0 => std::process::exit(code),
                RunOutcome::Signaled(_) => std::process::exit(1),
                RunOutcome::LaunchFailed(msg) => bail!("Could not start {}: {msg}", script.name),
                _ => {}
            }
        }
        Commands::Preview { path, all } => {
            let limit = if all {
                usize::MAX
            } else {
                session.config.config().code_preview_lines
            };
            let preview = Preview::load(&path, limit)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            for line in preview.page(0) {
                println!("{line}");
            }
            if preview.paged {
                let shown = preview.page(0).len();
                println!(
                    "... {} more lines (use --all to print everything)",
                    preview.lines.len() - shown
                );
            }
        }
        Commands::Edit { path } => {
            session
                .launcher()
                .open_in_editor(&path)
                .context("Failed to open the editor")?;
        }
        Commands::Reveal { path } => {
            let folder = if path.is_dir() {
                path
            } else {
                path.parent().map(Path::to_path_buf).unwrap_or_else(|| PathBuf::from("."))
            };
            session.launcher().open_folder(&folder);
        }
        Commands::Config { path } => {
            if path {
                println!("{}", session.config.path().display());
            } else {
                let json = serde_json::to_string_pretty(session.config.config())
                    .context("Failed to serialize configuration")?;
                println!("{json}");
            }
        }
    }
    Ok(())
}

fn find_unit(catalog: &Catalog, key: &str) -> Result<Unit> {
    match catalog.unit(key) {
        Some(unit) => Ok(unit),
        None => {
            let keys: Vec<String> = catalog.units().into_iter().map(|u| u.key).collect();
            bail!("Unknown unit '{key}' (configured: {})", keys.join(", "))
        }
    }
}

fn existing_script(path: &Path) -> Result<Script> {
    if !path.is_file() {
        bail!("Script not found: {}", path.display());
    }
    Ok(Script::from_path(path))
}

fn print_scripts(session: &Session, scripts: &[Script], base_dir: &Path) {
    let favorites_enabled = session.config.config().favorites_enabled;
    for script in scripts {
        let star = if favorites_enabled && session.is_favorite(script) {
            "★ "
        } else {
            "  "
        };
        println!("{star}{}", relative_to(&script.path, base_dir));
    }
}
