mod shell;

use std::process::ExitCode;
use anyhow::{bail, Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use dotenv::dotenv;
use log::{debug, error};
use notas::config::{AuthMode, ConnectionConfig, SessionConfig, DEFAULT_ENDPOINT, ENV_API_KEY, ENV_API_URL, ENV_REQUIRE_KEY};
use notas::error::SyncError;
use notas::models::{GradeForm, GradeUpdate, GradeValue, RecordId};
use notas::sync::{Command, GradeSync, Outcome};
use notas::utils::api::HttpGradesApi;
use notas::utils::prompt::TerminalPrompter;
use simplelog::{ColorChoice, Config, LevelFilter, TermLogger, TerminalMode};

#[derive(Parser)]
#[command(name = "notas", version, about = "Lista, crea y borra notas en una API REST")]
struct Cli {
    /// URL of the grades collection
    #[arg(long, global = true, env = ENV_API_URL, default_value = DEFAULT_ENDPOINT)]
    url: String,

    /// Value sent in the x-api-key header
    #[arg(long, global = true, env = ENV_API_KEY)]
    api_key: Option<String>,

    /// Refuse to send requests without an API key
    #[arg(long, global = true, env = ENV_REQUIRE_KEY)]
    require_key: bool,

    /// More log output (-v debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Option<Cmd>,
}

#[derive(Subcommand)]
enum Cmd {
    /// Show every grade (default)
    List,
    /// Create a grade
    Add {
        #[arg(long)]
        class: String,
        #[arg(long)]
        student: String,
        #[arg(long)]
        grade: String,
    },
    /// Delete a grade by id
    Delete {
        id: String,
        /// Do not ask for confirmation
        #[arg(short, long)]
        yes: bool,
    },
    /// Show one grade by id
    Show { id: String },
    /// Change fields of a grade
    Update {
        id: String,
        #[arg(long)]
        class: Option<String>,
        #[arg(long)]
        student: Option<String>,
        #[arg(long)]
        grade: Option<String>,
    },
    /// Interactive session
    Shell,
}

impl Cli {
    fn log_level(&self) -> LevelFilter {
        match (self.quiet, self.verbose) {
            (true, _) => LevelFilter::Error,
            (false, 0) => LevelFilter::Info,
            (false, _) => LevelFilter::Debug,
        }
    }

    fn connection(&self) -> ConnectionConfig {
        let mut config = ConnectionConfig::fixed(self.url.clone());
        if let Some(key) = &self.api_key {
            config = config.with_api_key(key.clone());
        }
        if self.require_key {
            config.auth = AuthMode::Required;
        }
        config
    }
}

// Rejects ids that would make the request address the whole collection.
fn record_id(id: String) -> Result<RecordId> {
    let id = RecordId::new(id);
    if id.is_blank() {
        bail!("El ID de la nota no puede estar vacío");
    }
    Ok(id)
}

// Maps a parsed subcommand onto the synchronizer's command set.
fn to_command(cmd: Cmd) -> Result<Command> {
    Ok(match cmd {
        Cmd::List | Cmd::Shell => Command::Load,
        Cmd::Add { class, student, grade } => Command::Create(GradeForm::new(class, student, grade)),
        Cmd::Delete { id, .. } => Command::Delete(record_id(id)?),
        Cmd::Show { id } => Command::Show(record_id(id)?),
        Cmd::Update { id, class, student, grade } => Command::Update(
            record_id(id)?,
            GradeUpdate {
                class,
                student,
                grade: grade.as_deref().map(GradeValue::parse),
            },
        ),
    })
}

// Entry point for the async main function, powered by tokio runtime.
#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(code) => code,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<ExitCode> {
    // Loads environment variables from a `.env` file, if present, before clap
    // reads its env fallbacks.
    dotenv().ok();
    let cli = Cli::parse();

    // Initializes logging to the terminal, errors on stderr and the rest on stdout.
    TermLogger::init(cli.log_level(), Config::default(), TerminalMode::Mixed, ColorChoice::Auto)
        .context("Failed to initialise logging")?;

    // Seeds the session settings from flags and environment; the shell may edit them later.
    debug!("Using endpoint {}", cli.url);
    let session = SessionConfig::new(cli.connection());

    let assume_yes = matches!(cli.command, Some(Cmd::Delete { yes: true, .. }));
    let api = HttpGradesApi::new().context("Failed to build the HTTP client")?;
    let mut sync = GradeSync::new(api, session.clone(), TerminalPrompter::new(assume_yes));

    // Without a subcommand, just list the grades.
    let cmd = cli.command.unwrap_or(Cmd::List);
    if matches!(cmd, Cmd::Shell) {
        shell::run(&mut sync, &session).await.context("Shell input failed")?;
        return Ok(ExitCode::SUCCESS);
    }

    let result = sync.dispatch(to_command(cmd)?).await;

    // A single record is printed on its own; anything else shows the list as
    // it stands, placeholders included. A declined delete prints nothing.
    match &result {
        Ok(Outcome::Shown(record)) => println!("{:#?}", record),
        Err(SyncError::UserDeclined) => {}
        _ => print!("{}", sync.list()),
    }

    // Declining is not a failure; every other error already reached the user.
    Ok(match result {
        Ok(_) | Err(SyncError::UserDeclined) => ExitCode::SUCCESS,
        Err(_) => ExitCode::FAILURE,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_ids_are_rejected_before_dispatch() {
        assert!(to_command(Cmd::Delete { id: String::new(), yes: true }).is_err());
        assert!(to_command(Cmd::Show { id: "  ".to_string() }).is_err());
        assert!(to_command(Cmd::Update {
            id: String::new(),
            class: None,
            student: None,
            grade: Some("8".to_string()),
        })
        .is_err());
    }

    #[test]
    fn subcommands_map_to_commands() {
        assert_eq!(
            to_command(Cmd::Delete { id: "7".to_string(), yes: false }).unwrap(),
            Command::Delete(RecordId::new("7"))
        );
        assert_eq!(
            to_command(Cmd::Add {
                class: "Sci".to_string(),
                student: "Leo".to_string(),
                grade: "abc".to_string(),
            })
            .unwrap(),
            Command::Create(GradeForm::new("Sci", "Leo", "abc"))
        );
        assert_eq!(to_command(Cmd::List).unwrap(), Command::Load);
    }

    #[test]
    fn default_log_level_is_info() {
        let cli = Cli::parse_from(["notas", "list"]);
        assert_eq!(cli.log_level(), LevelFilter::Info);
        let cli = Cli::parse_from(["notas", "-v", "list"]);
        assert_eq!(cli.log_level(), LevelFilter::Debug);
        let cli = Cli::parse_from(["notas", "--quiet", "list"]);
        assert_eq!(cli.log_level(), LevelFilter::Error);
    }
}
