//! Runs one canvass operation against the configured lead store and CRM.
//!
//! Usage:
//!
//! ```text
//! lead_worker <operation> [payload-path]
//! ```
//!
//! The `operation` must be `sync`, `assign`, or `intake`. The `intake`
//! operation additionally requires a path to a JSON file deserialising into
//! an intake request, for example:
//!
//! ```json
//! {
//!   "first_name": "Jane",
//!   "last_name": "Doe",
//!   "email": "jane@example.com",
//!   "phone": "+1 (555) 123-4567",
//!   "city": "Toronto",
//!   "current_credit": "25000"
//! }
//! ```
//!
//! The operation report is written to stdout as JSON; diagnostics go to
//! stderr through `tracing`.

use canvass::assignment::adapters::{TemplateComposer, UniformTieBreak};
use canvass::assignment::services::{AssignmentError, AssignmentService};
use canvass::config::{AppConfig, ConfigError};
use canvass::crm::adapters::rest::RestCrmClient;
use canvass::crm::ports::CrmClientError;
use canvass::lead::adapters::postgres::{LeadPgPool, PostgresLeadRepository};
use canvass::lead::domain::LeadId;
use canvass::lead::services::{IntakeLeadRequest, IntakeOutcome, LeadIntakeError,
    LeadIntakeService};
use canvass::sync::services::{SyncError, SyncService};
use diesel::r2d2::{ConnectionManager, Pool};
use mockable::DefaultClock;
use serde::Serialize;
use std::env;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;
use tokio::runtime::Builder;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Boxed error type for the main result.
type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors that can occur while running a worker operation.
#[derive(Debug, Error)]
enum WorkerError {
    #[error("invalid arguments: {0}")]
    InvalidArgs(String),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("failed to build connection pool: {0}")]
    PoolInit(#[source] BoxError),
    #[error("runtime init failed: {0}")]
    RuntimeInit(#[source] std::io::Error),
    #[error(transparent)]
    Client(#[from] CrmClientError),
    #[error(transparent)]
    Sync(#[from] SyncError),
    #[error(transparent)]
    Assignment(#[from] AssignmentError),
    #[error(transparent)]
    Intake(#[from] LeadIntakeError),
    #[error("failed to read intake payload: {0}")]
    PayloadRead(#[source] std::io::Error),
    #[error("failed to parse intake payload: {0}")]
    PayloadParse(#[source] serde_json::Error),
    #[error("failed to write report: {0}")]
    Output(#[source] std::io::Error),
}

#[derive(Debug)]
enum Operation {
    Sync,
    Assign,
    Intake(PathBuf),
}

impl Operation {
    fn parse(mut args: impl Iterator<Item = String>) -> Result<Self, WorkerError> {
        let name = args.next().ok_or_else(|| {
            WorkerError::InvalidArgs("expected an operation: sync, assign, or intake".to_owned())
        })?;
        match name.as_str() {
            "sync" => Ok(Self::Sync),
            "assign" => Ok(Self::Assign),
            "intake" => {
                let path = args.next().ok_or_else(|| {
                    WorkerError::InvalidArgs("intake requires a payload path".to_owned())
                })?;
                Ok(Self::Intake(PathBuf::from(path)))
            }
            other => Err(WorkerError::InvalidArgs(format!(
                "unknown operation '{other}'; expected sync, assign, or intake"
            ))),
        }
    }
}

/// Intake summary mirrored to stdout.
#[derive(Debug, Serialize)]
struct IntakeSummary {
    status: &'static str,
    lead_id: LeadId,
}

impl From<IntakeOutcome> for IntakeSummary {
    fn from(outcome: IntakeOutcome) -> Self {
        match outcome {
            IntakeOutcome::Existing(lead_id) => Self {
                status: "existing",
                lead_id,
            },
            IntakeOutcome::Created(lead_id) => Self {
                status: "created",
                lead_id,
            },
        }
    }
}

fn main() -> Result<(), BoxError> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let operation = Operation::parse(env::args().skip(1))?;
    let runtime = Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(WorkerError::RuntimeInit)?;
    runtime.block_on(run(operation)).map_err(Into::into)
}

async fn run(operation: Operation) -> Result<(), WorkerError> {
    let config = AppConfig::from_env()?;
    tracing::info!(%config, "configuration loaded");

    let pool: LeadPgPool = Pool::builder()
        .build(ConnectionManager::new(config.database_url()))
        .map_err(|err| WorkerError::PoolInit(Box::new(err)))?;
    let repository = Arc::new(PostgresLeadRepository::new(pool));
    let crm = Arc::new(RestCrmClient::new(
        config.crm_rest_url(),
        config.crm_api_token(),
    )?);

    match operation {
        Operation::Sync => {
            let service = SyncService::new(repository, crm);
            let report = service.sync_unsynced().await?;
            emit(&report)
        }
        Operation::Assign => {
            let service = AssignmentService::new(
                crm,
                Arc::new(UniformTieBreak::from_entropy()),
                Arc::new(TemplateComposer::new()),
            );
            let report = service.auto_assign().await?;
            emit(&report)
        }
        Operation::Intake(path) => {
            let raw = std::fs::read_to_string(&path).map_err(WorkerError::PayloadRead)?;
            let request: IntakeLeadRequest =
                serde_json::from_str(&raw).map_err(WorkerError::PayloadParse)?;
            let service = LeadIntakeService::new(repository, Arc::new(DefaultClock));
            let outcome = service.intake(request).await?;
            emit(&IntakeSummary::from(outcome))
        }
    }
}

/// Writes the report as pretty JSON on stdout.
fn emit(report: &impl Serialize) -> Result<(), WorkerError> {
    let mut stdout = std::io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, report)
        .map_err(|err| WorkerError::Output(std::io::Error::other(err)))?;
    stdout.write_all(b"\n").map_err(WorkerError::Output)?;
    Ok(())
}
