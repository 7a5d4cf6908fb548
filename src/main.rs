use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use record_workflow::config::DEFAULT_CONFIG_FILE;
use record_workflow::{
    config, init_telemetry, Collaborators, ConsoleNavigator, ConsoleNotificationSink, Fixture,
    MemoryRecordStore, RecordWorkflowConfig, ReferenceSet, SubmitOutcome, TargetRecord,
    WorkflowController, WorkflowState,
};

#[derive(Parser)]
#[command(name = "record-workflow")]
#[command(about = "Load, edit and save a member record against the active branches")]
#[command(long_about = "Loads a member record and the active branch list from a JSON fixture, \
                       lets you change the member's name, date of birth or branch, validates the \
                       branch against what was loaded, and saves the result back to the fixture.")]
struct Cli {
    /// Configuration file (defaults to record-workflow.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load a record and print it with the selectable branches
    Show {
        /// Record identifier
        #[arg(long)]
        id: String,
        /// Fixture file (overrides the configured path)
        #[arg(long)]
        fixture: Option<PathBuf>,
    },
    /// Edit a record; fields left out keep their loaded values
    Edit {
        /// Record identifier
        #[arg(long)]
        id: String,
        /// New name
        #[arg(long)]
        name: Option<String>,
        /// New date of birth (YYYY-MM-DD)
        #[arg(long)]
        date_of_birth: Option<String>,
        /// New branch id
        #[arg(long)]
        branch_id: Option<String>,
        /// Fixture file (overrides the configured path)
        #[arg(long)]
        fixture: Option<PathBuf>,
    },
    /// Write the default configuration as TOML
    InitConfig {
        /// Destination file
        #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
        path: PathBuf,
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let settings = match &cli.config {
        Some(path) => {
            RecordWorkflowConfig::load_env_file()?;
            RecordWorkflowConfig::load_from(Some(path.as_path()))?
        }
        None => config()?.clone(),
    };
    init_telemetry(&settings.observability)?;
    tracing::debug!(config = ?settings, "Configuration loaded");

    match cli.command {
        Commands::Show { id, fixture } => {
            let fixture_path = fixture.unwrap_or_else(|| PathBuf::from(&settings.fixture.path));
            show(&id, &fixture_path, &settings).await
        }
        Commands::Edit {
            id,
            name,
            date_of_birth,
            branch_id,
            fixture,
        } => {
            let fixture_path = fixture.unwrap_or_else(|| PathBuf::from(&settings.fixture.path));
            let changes = FormChanges {
                name,
                date_of_birth,
                branch_id,
            };
            edit(&id, &fixture_path, changes, &settings).await
        }
        Commands::InitConfig { path, force } => {
            if path.exists() && !force {
                bail!("{} already exists (use --force to overwrite)", path.display());
            }
            RecordWorkflowConfig::default().save_to_file(&path)?;
            println!("📝 Wrote default configuration to {}", path.display());
            Ok(())
        }
    }
}

/// Values entered on the command line "form"
struct FormChanges {
    name: Option<String>,
    date_of_birth: Option<String>,
    branch_id: Option<String>,
}

struct OpenWorkflow {
    controller: WorkflowController,
    records: Arc<MemoryRecordStore>,
    fixture: Fixture,
}

async fn open_workflow(
    id: &str,
    fixture_path: &Path,
    config: &RecordWorkflowConfig,
) -> Result<OpenWorkflow> {
    let fixture = Fixture::load(fixture_path)?;
    let (records, references) = fixture.clone().into_stores();
    let records = Arc::new(records);

    let controller = WorkflowController::new(
        id,
        Collaborators {
            records: records.clone(),
            references: Arc::new(references),
            notifications: Arc::new(ConsoleNotificationSink),
            navigator: Arc::new(ConsoleNavigator),
        },
        config.workflow.clone(),
    );
    controller.load().await;

    Ok(OpenWorkflow {
        controller,
        records,
        fixture,
    })
}

async fn show(id: &str, fixture_path: &Path, config: &RecordWorkflowConfig) -> Result<()> {
    let open = open_workflow(id, fixture_path, config).await?;
    match open.controller.state().await {
        WorkflowState::Ready { record, references } => {
            print_record(&record, &references);
            Ok(())
        }
        WorkflowState::Error { message } => bail!("{message}"),
        other => bail!("Workflow did not finish loading: {other:?}"),
    }
}

async fn edit(
    id: &str,
    fixture_path: &Path,
    changes: FormChanges,
    config: &RecordWorkflowConfig,
) -> Result<()> {
    let open = open_workflow(id, fixture_path, config).await?;

    let record = match open.controller.state().await {
        WorkflowState::Ready { record, .. } => record,
        WorkflowState::Error { message } => bail!("{message}"),
        other => bail!("Workflow did not finish loading: {other:?}"),
    };

    let mut form = record.as_edit();
    if let Some(name) = changes.name {
        if name.trim().is_empty() {
            bail!("Name must not be empty");
        }
        form.name = name;
    }
    if let Some(date_of_birth) = changes.date_of_birth {
        NaiveDate::parse_from_str(&date_of_birth, "%Y-%m-%d")
            .with_context(|| format!("Date of birth must be YYYY-MM-DD, got {date_of_birth}"))?;
        form.date_of_birth = date_of_birth;
    }
    if let Some(branch_id) = changes.branch_id {
        form.branch_id = branch_id;
    }

    match open.controller.submit(form).await {
        SubmitOutcome::Completed => {
            let fixture = Fixture {
                records: open.records.snapshot().await,
                branches: open.fixture.branches,
            };
            fixture.save(fixture_path)?;
            tracing::info!(record_id = %id, fixture = %fixture_path.display(), "Fixture updated");
            Ok(())
        }
        SubmitOutcome::Rejected { reason } => bail!("{reason}"),
        SubmitOutcome::Failed { message } => bail!("{message}"),
        SubmitOutcome::Ignored | SubmitOutcome::Discarded => {
            bail!("Submission was not processed")
        }
    }
}

fn print_record(record: &TargetRecord, references: &ReferenceSet) {
    let branch = match references.name_of(&record.branch_id) {
        Some(name) => format!("{} ({})", name, record.branch_id),
        None => format!("{} (inactive)", record.branch_id),
    };

    println!("📋 Record {}", record.id);
    println!("   Name:          {}", record.name);
    println!("   Date of birth: {}", record.date_of_birth);
    println!("   Branch:        {branch}");
    println!();
    println!("🏢 Branches:");
    for entry in references.iter() {
        let marker = if entry.id == record.branch_id { "*" } else { " " };
        println!("   {marker} {} - {}", entry.id, entry.name);
    }
}
