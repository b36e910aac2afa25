//! Script launching and external openers.
//!
//! A run goes through a fixed protocol:
//!
//! ```text
//! Idle -> Confirming -> Cancelled
//!                    -> ArgsPrompt -> Launching -> Completed(code) | LaunchFailed
//! ```
//!
//! Confirmation and argument entry are delegated to a [`RunPrompt`] so the
//! navigator (or a test) decides how to ask. Every run that reaches the launch
//! step is logged and recorded as recent exactly once, before the child starts,
//! whether or not the interpreter can be executed.

use crate::catalog::Script;
use crate::config::Config;
use crate::error::{DeckError, Result};
use crate::event_log::{Event, EventLog};
use crate::state::StateStore;
use interrupt::InterruptShield;
use std::fmt;
use std::io::{self, BufRead, Write};
use std::path::Path;
use std::process::{Command, ExitStatus, Stdio};
use tracing::{debug, info, warn};

/// Terminal outcome of a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// Confirmation was declined; nothing was recorded or launched
    Cancelled,
    /// The child exited with this code
    Completed(i32),
    /// The child was killed by this signal (Unix)
    Signaled(i32),
    /// The child could not be started
    LaunchFailed(String),
}

impl RunOutcome {
    /// Exit code when the child ran to completion
    pub fn code(&self) -> Option<i32> {
        match self {
            Self::Completed(code) => Some(*code),
            _ => None,
        }
    }
}

impl fmt::Display for RunOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cancelled => write!(f, "Run cancelled"),
            Self::Completed(code) => write!(f, "Finished with exit code {code}"),
            Self::Signaled(signal) => write!(f, "Terminated by signal {signal}"),
            Self::LaunchFailed(msg) => write!(f, "Could not start script: {msg}"),
        }
    }
}

/// Source of answers for the interactive steps of a run
pub trait RunPrompt {
    /// Ask whether `script` should run
    fn confirm(&mut self, script: &Script) -> bool;

    /// Ask for a raw argument line (may be empty)
    fn arguments(&mut self, script: &Script) -> String;
}

/// Prompts on stdin/stdout. Used outside the alternate screen.
#[derive(Debug, Default)]
pub struct TerminalPrompt;

impl TerminalPrompt {
    fn ask(question: &str) -> String {
        print!("{question}");
        let _ = io::stdout().flush();
        let mut line = String::new();
        if let Err(e) = io::stdin().lock().read_line(&mut line) {
            warn!(error = %e, "Failed to read answer from stdin");
        }
        line.trim().to_string()
    }
}

impl RunPrompt for TerminalPrompt {
    fn confirm(&mut self, script: &Script) -> bool {
        is_affirmative(&Self::ask(&format!("Run '{}'? (y/n) > ", script.name)))
    }

    fn arguments(&mut self, _script: &Script) -> String {
        Self::ask("Arguments (optional, Enter for none) > ")
    }
}

/// `y`/`yes`, case-insensitive
pub fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

/// Split an argument line with shell quoting rules.
///
/// Unbalanced quotes fall back to plain whitespace splitting.
pub fn split_arguments(raw: &str) -> Vec<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Vec::new();
    }
    shell_words::split(raw).unwrap_or_else(|e| {
        debug!(error = %e, "Shell-style split failed, splitting on whitespace");
        raw.split_whitespace().map(str::to_string).collect()
    })
}

/// How a run should behave
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub confirm: bool,
    pub prompt_for_args: bool,
    /// Arguments used when `prompt_for_args` is false
    pub args: Vec<String>,
}

impl RunOptions {
    /// Options taken from the configuration flags
    pub fn from_config(config: &Config) -> Self {
        Self {
            confirm: config.confirm_before_run,
            prompt_for_args: config.ask_args_before_run,
            args: Vec::new(),
        }
    }
}

/// Runs scripts and opens paths in external applications.
#[derive(Debug, Clone)]
pub struct Launcher {
    interpreter: String,
    editor: String,
    recent_limit: usize,
    log: EventLog,
}

impl Launcher {
    pub fn new(config: &Config, log: EventLog) -> Self {
        Self {
            interpreter: config.interpreter.clone(),
            editor: config.preferred_editor.clone(),
            recent_limit: config.recent_limit,
            log,
        }
    }

    pub fn log(&self) -> &EventLog {
        &self.log
    }

    /// Run `script` to completion, blocking until the child exits.
    pub fn run(
        &self,
        state: &mut StateStore,
        script: &Script,
        options: &RunOptions,
        prompt: &mut dyn RunPrompt,
    ) -> RunOutcome {
        if options.confirm && !prompt.confirm(script) {
            info!(script = %script.path.display(), "Run cancelled by user");
            return RunOutcome::Cancelled;
        }

        let args = if options.prompt_for_args {
            split_arguments(&prompt.arguments(script))
        } else {
            options.args.clone()
        };

        self.launch(state, script, &args)
    }

    /// Log, record as recent, then execute `<interpreter> <script> <args...>`
    /// in the script's folder with inherited stdio.
    pub fn launch(&self, state: &mut StateStore, script: &Script, args: &[String]) -> RunOutcome {
        self.log.record(
            Event::Run,
            &format!("{} args={:?}", script.path.display(), args),
        );
        state.add_recent(&script.path, self.recent_limit);

        info!(
            interpreter = %self.interpreter,
            script = %script.path.display(),
            ?args,
            "Launching script"
        );

        let status = {
            let _shield = InterruptShield::raise();
            Command::new(&self.interpreter)
                .arg(&script.path)
                .args(args)
                .current_dir(script.folder())
                .stdin(Stdio::inherit())
                .stdout(Stdio::inherit())
                .stderr(Stdio::inherit())
                .status()
        };

        let outcome = match status {
            Ok(status) => outcome_from_status(status),
            Err(e) => RunOutcome::LaunchFailed(format!("{}: {}", self.interpreter, e)),
        };
        info!(script = %script.path.display(), outcome = %outcome, "Run finished");
        outcome
    }

    /// Open `path` with the configured editor, or the platform opener when
    /// none is configured. The editor is detached from this process.
    pub fn open_in_editor(&self, path: &Path) -> Result<()> {
        self.log.record(Event::OpenEditor, &path.display().to_string());

        let parts = split_arguments(&self.editor);
        let Some((program, editor_args)) = parts.split_first() else {
            return open::that_detached(path)
                .map_err(|e| DeckError::launch(format!("open {}: {e}", path.display())));
        };

        let mut child = Command::new(program)
            .args(editor_args)
            .arg(path)
            .spawn()
            .map_err(|e| DeckError::launch(format!("{program}: {e}")))?;
        debug!(editor = %program, pid = child.id(), "Editor started");

        // Reap the editor in the background so it never lingers as a zombie
        std::thread::spawn(move || {
            let _ = child.wait();
        });
        Ok(())
    }

    /// Reveal a folder in the platform file manager. Best effort.
    pub fn open_folder(&self, path: &Path) {
        self.log.record(Event::OpenFolder, &path.display().to_string());
        if let Err(e) = open::that_detached(path) {
            debug!(path = %path.display(), error = %e, "Could not open folder");
        }
    }
}

fn outcome_from_status(status: ExitStatus) -> RunOutcome {
    if let Some(code) = status.code() {
        return RunOutcome::Completed(code);
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return RunOutcome::Signaled(signal);
        }
    }
    RunOutcome::Completed(-1)
}

#[cfg(unix)]
mod interrupt {
    use signal_hook::consts::SIGINT;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::{Arc, OnceLock};
    use tracing::warn;

    /// While false, SIGINT no longer terminates this process
    static TERMINATE_ON_SIGINT: OnceLock<Option<Arc<AtomicBool>>> = OnceLock::new();

    fn flag() -> Option<&'static Arc<AtomicBool>> {
        TERMINATE_ON_SIGINT
            .get_or_init(|| {
                let flag = Arc::new(AtomicBool::new(true));
                match signal_hook::flag::register_conditional_default(SIGINT, Arc::clone(&flag)) {
                    Ok(_) => Some(flag),
                    Err(e) => {
                        warn!(error = %e, "Failed to install SIGINT handler");
                        None
                    }
                }
            })
            .as_ref()
    }

    /// Ctrl-C reaches the running child only, while this guard lives
    pub struct InterruptShield;

    impl InterruptShield {
        pub fn raise() -> Self {
            if let Some(flag) = flag() {
                flag.store(false, Ordering::SeqCst);
            }
            Self
        }
    }

    impl Drop for InterruptShield {
        fn drop(&mut self) {
            if let Some(flag) = flag() {
                flag.store(true, Ordering::SeqCst);
            }
        }
    }
}

#[cfg(not(unix))]
mod interrupt {
    pub struct InterruptShield;

    impl InterruptShield {
        pub fn raise() -> Self {
            Self
        }
    }
}
