use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use client_core::{load_settings, load_settings_from, Completion, LabClient};
use shared::{
    domain::{JobId, LabelId, OtuId, ReferenceId, SampleId},
    Request,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(about = "Drive the lab data API through the client state store")]
struct Cli {
    /// Overrides `api_url` from settings.
    #[arg(long)]
    api_url: Option<String>,
    /// Settings file; defaults to `labctl.toml` in the working directory.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Log in before running the command.
    #[arg(long)]
    username: Option<String>,
    #[arg(long, requires = "username")]
    password: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    Login {
        username: String,
        password: String,
        #[arg(long)]
        remember: bool,
    },
    Account,
    Settings,
    Samples {
        #[arg(long, default_value = "")]
        term: String,
        #[arg(long, default_value_t = 1)]
        page: u64,
        #[arg(long = "label")]
        labels: Vec<String>,
    },
    Sample {
        sample_id: String,
    },
    RemoveSample {
        sample_id: String,
    },
    References {
        #[arg(long, default_value = "")]
        term: String,
        #[arg(long, default_value_t = 1)]
        page: u64,
    },
    Otus {
        ref_id: String,
        #[arg(long, default_value = "")]
        term: String,
        #[arg(long)]
        verified: bool,
        #[arg(long, default_value_t = 1)]
        page: u64,
    },
    Otu {
        otu_id: String,
    },
    History {
        otu_id: String,
    },
    Jobs {
        #[arg(long, default_value_t = 1)]
        page: u64,
        #[arg(long = "state")]
        states: Vec<String>,
    },
    Job {
        job_id: String,
    },
    CancelJob {
        job_id: String,
    },
    Hmms {
        #[arg(long, default_value = "")]
        term: String,
        #[arg(long, default_value_t = 1)]
        page: u64,
    },
    /// Any request as JSON, e.g. `{"type": "LIST_LABELS"}`.
    Raw {
        json: String,
    },
}

impl Command {
    fn into_request(self) -> Result<Request> {
        let request = match self {
            Command::Login {
                username,
                password,
                remember,
            } => Request::Login {
                username,
                password,
                remember,
            },
            Command::Account => Request::GetAccount,
            Command::Settings => Request::GetSettings,
            Command::Samples { term, page, labels } => Request::FindSamples {
                term,
                page,
                labels: labels.into_iter().map(LabelId::new).collect(),
            },
            Command::Sample { sample_id } => Request::GetSample {
                sample_id: SampleId::new(sample_id),
            },
            Command::RemoveSample { sample_id } => Request::RemoveSample {
                sample_id: SampleId::new(sample_id),
            },
            Command::References { term, page } => Request::FindReferences { term, page },
            Command::Otus {
                ref_id,
                term,
                verified,
                page,
            } => Request::ListOtus {
                ref_id: ReferenceId::new(ref_id),
                term,
                verified,
                page,
            },
            Command::Otu { otu_id } => Request::GetOtu {
                otu_id: OtuId::new(otu_id),
            },
            Command::History { otu_id } => Request::GetOtuHistory {
                otu_id: OtuId::new(otu_id),
            },
            Command::Jobs { page, states } => Request::FindJobs { page, states },
            Command::Job { job_id } => Request::GetJob {
                job_id: JobId::new(job_id),
            },
            Command::CancelJob { job_id } => Request::CancelJob {
                job_id: JobId::new(job_id),
            },
            Command::Hmms { term, page } => Request::FindHmms { term, page },
            Command::Raw { json } => {
                serde_json::from_str(&json).context("request must be {\"type\": ..., \"payload\": ...}")?
            }
        };
        Ok(request)
    }
}

async fn run(client: &LabClient, request: Request) -> Result<()> {
    let category = request.category();
    match client.settle(request).await? {
        Completion::Succeeded(_) => Ok(()),
        Completion::Failed(failed) => bail!(
            "{category} failed with status {}: {}",
            failed.failure.status,
            failed.failure.message
        ),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut settings = match &cli.config {
        Some(path) => load_settings_from(path)?,
        None => load_settings()?,
    };
    if let Some(api_url) = cli.api_url {
        settings.api_url = api_url;
    }
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&settings.log_filter))
        .with_writer(std::io::stderr)
        .init();

    let client = LabClient::connect(&settings)?;

    if let Some(username) = cli.username {
        run(
            &client,
            Request::Login {
                username,
                password: cli.password.unwrap_or_default(),
                remember: false,
            },
        )
        .await?;
    }

    let request = cli.command.into_request()?;
    let domain = request.domain();
    run(&client, request).await?;

    if let Some(location) = client.history().current() {
        info!(location = %location, "labctl: navigated");
    }
    let state = client.state();
    println!("{}", serde_json::to_string_pretty(&state.slice_json(domain)?)?);
    Ok(())
}
