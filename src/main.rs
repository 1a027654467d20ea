// src/main.rs
use anyhow::{anyhow, Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use dialoguer::Confirm;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use closer_insight::analysis::{DateRange, HistoryFilter, ResultId, TypeFilter};
use closer_insight::config::{analysis_models, AnalysisModel, AppConfig, ModelId, SettingsPatch, Theme, UserPatch};
use closer_insight::error::AnalysisError;
use closer_insight::file::{FileManager, Profile};
use closer_insight::service::{
    AnalysisManager, Collaborators, FileKnowledge, KnowledgeSource, PlainTextExtractor,
    ReplayGenerator, SourceDocument, Submission,
};
use closer_insight::state::{AnalysisState, View};
use closer_insight::ui;

/// Sales-call analysis: structured reports, history and closer performance.
#[derive(Parser)]
#[command(name = "closer-insight", version, about)]
struct Cli {
    /// Configuration file (defaults to the user config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Data directory, overriding the configured one
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the analysis models
    Models,

    /// Analyze a transcript using a captured generator response
    Import {
        /// Transcript (.txt, .md or .pdf)
        transcript: PathBuf,
        /// Second part of a split call
        #[arg(long)]
        part2: Option<PathBuf>,
        /// Analysis model id
        #[arg(long, default_value = "next-level")]
        model: ModelId,
        /// Generator output (JSON, optionally fenced)
        #[arg(long)]
        response: PathBuf,
        /// Knowledge base file or directory used for enrichment
        #[arg(long)]
        knowledge: Option<PathBuf>,
    },

    /// Compare a second call against a surgical report
    SecondCall {
        report: ResultId,
        transcript: PathBuf,
        /// Generator comparison output (JSON, optionally fenced)
        #[arg(long)]
        response: PathBuf,
    },

    /// Print a stored report
    Show { id: ResultId },

    /// Remove the second-call comparison from a surgical report
    ClearSecondCall {
        id: ResultId,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },

    /// List stored analyses, newest first
    History(FilterArgs),

    /// Dashboard metrics over an optional date range
    Metrics {
        #[arg(long)]
        start: Option<NaiveDate>,
        #[arg(long)]
        end: Option<NaiveDate>,
    },

    /// Performance metrics with closer and type filters
    Performance(FilterArgs),

    /// Export the filtered history as CSV
    ExportCsv {
        output: PathBuf,
        #[command(flatten)]
        filter: FilterArgs,
    },

    /// Show or edit the local profile
    Profile {
        #[command(subcommand)]
        action: Option<ProfileCommand>,
    },
}

#[derive(Args, Debug, Clone, Default)]
struct FilterArgs {
    /// First day, inclusive (YYYY-MM-DD)
    #[arg(long)]
    start: Option<NaiveDate>,
    /// Last day, inclusive (YYYY-MM-DD)
    #[arg(long)]
    end: Option<NaiveDate>,
    /// Case-insensitive closer name fragment
    #[arg(long)]
    closer: Option<String>,
    /// venda-realizada, call-perdida, relatorio-cirurgico, relatorio-segunda-call or baseline-indicacao
    #[arg(long = "type", default_value = "")]
    result_type: TypeFilter,
}

impl FilterArgs {
    fn to_filter(&self) -> HistoryFilter {
        HistoryFilter {
            dates: DateRange::new(self.start, self.end),
            closer_name: self.closer.clone(),
            result_type: self.result_type,
            ..HistoryFilter::default()
        }
    }
}

#[derive(Subcommand)]
enum ProfileCommand {
    /// Update identity fields
    Set {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        company: Option<String>,
        #[arg(long)]
        cnpj: Option<String>,
        #[arg(long)]
        segment: Option<String>,
        #[arg(long)]
        team_size: Option<String>,
        #[arg(long)]
        website: Option<String>,
    },
    /// Update preferences
    Settings {
        #[arg(long, value_enum)]
        theme: Option<ThemeArg>,
        #[arg(long)]
        reduced_animations: Option<bool>,
        #[arg(long)]
        compact_sidebar: Option<bool>,
        #[arg(long)]
        auto_gain_control: Option<bool>,
        #[arg(long)]
        noise_suppression: Option<bool>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ThemeArg {
    Dark,
    Light,
    System,
}

impl From<ThemeArg> for Theme {
    fn from(arg: ThemeArg) -> Self {
        match arg {
            ThemeArg::Dark => Theme::Dark,
            ThemeArg::Light => Theme::Light,
            ThemeArg::System => Theme::System,
        }
    }
}

fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = match &cli.config {
        Some(path) => AppConfig::load_from(Some(path))?,
        None => AppConfig::load()?,
    };
    if let Some(dir) = &cli.data_dir {
        config.data_dir = Some(dir.clone());
    }
    init_tracing(&config);

    let files = FileManager::new(config.data_dir());
    files.create_data_structure()?;
    debug!(data_dir = %files.data_dir().display(), "data directory ready");

    let result = run(&cli, &config, &files).await;
    if let Err(e) = &result {
        debug!(error = ?e, "command failed");
    }
    result
}

async fn run(cli: &Cli, config: &AppConfig, files: &FileManager) -> Result<()> {
    match &cli.command {
        Commands::Models => {
            let models = analysis_models();
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&models)?);
            } else {
                print!("{}", ui::model_list(&models));
            }
            Ok(())
        }

        Commands::Import { transcript, part2, model, response, knowledge } => {
            let knowledge_source = knowledge
                .as_ref()
                .map(|path| Arc::new(FileKnowledge::new(path)) as Arc<dyn KnowledgeSource>);
            let manager = open(config, files, ReplayGenerator::new(response), knowledge_source).await?;

            let first = SourceDocument::from_path(transcript)?;
            let submission = match part2 {
                Some(path) => Submission::TwoPart(first, SourceDocument::from_path(path)?),
                None => Submission::Single(first),
            };
            let model = AnalysisModel::get(*model);
            let outcome = manager.submit(submission, &model, knowledge.is_some()).await;
            manager.flush().await;
            let id = outcome.map_err(user_facing)?;

            let state = manager.snapshot();
            print_notification(&state);
            let result = state.find(id).context("analysis missing from history")?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(result)?);
            } else {
                println!("{}", id);
                debug!(view = %state.current_view, "routed");
                print!("{}", ui::report_summary(result));
            }
            Ok(())
        }

        Commands::SecondCall { report, transcript, response } => {
            let manager = open(config, files, ReplayGenerator::new(response), None).await?;
            let document = SourceDocument::from_path(transcript)?;
            let outcome = manager.submit_second_call(*report, document).await;
            manager.flush().await;
            outcome.map_err(user_facing)?;

            let state = manager.snapshot();
            print_notification(&state);
            if let Some(result) = state.find(*report) {
                print!("{}", ui::report_summary(result));
            }
            Ok(())
        }

        Commands::Show { id } => {
            let manager = open(config, files, ReplayGenerator::none(), None).await?;
            manager.review(*id);
            let state = manager.snapshot();
            if state.current_view == View::Dashboard {
                return Err(anyhow!("Relatório não encontrado: {}", id));
            }
            let result = state.active.as_ref().context("no active report")?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(result)?);
            } else {
                print!("{}", ui::report_summary(result));
            }
            Ok(())
        }

        Commands::ClearSecondCall { id, yes } => {
            let manager = open(config, files, ReplayGenerator::none(), None).await?;
            let has_second_call = manager
                .store()
                .read(|s| s.find(*id).and_then(|r| r.second_call()).is_some());
            if !has_second_call {
                return Err(anyhow!("O relatório {} não possui análise da 2ª call", id));
            }

            manager.request_second_call_deletion(*id);
            let request = manager
                .snapshot()
                .confirmation
                .context("confirmation was not requested")?;
            let confirmed = *yes
                || Confirm::new()
                    .with_prompt(format!("{}: {}", request.title, request.message))
                    .default(false)
                    .interact()?;

            if confirmed {
                manager.confirm();
            } else {
                manager.cancel_confirmation();
            }
            manager.flush().await;
            print_notification(&manager.snapshot());
            Ok(())
        }

        Commands::History(args) => {
            let manager = open(config, files, ReplayGenerator::none(), None).await?;
            let filter = args.to_filter();
            let state = manager.snapshot();
            let results = filter.apply(&state.history);
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&results)?);
            } else {
                print!("{}", ui::history_table(&results));
            }
            Ok(())
        }

        Commands::Metrics { start, end } => {
            let manager = open(config, files, ReplayGenerator::none(), None).await?;
            manager.set_date_filter(*start, *end);
            print_metrics(cli, &manager.dashboard_metrics())
        }

        Commands::Performance(args) => {
            let manager = open(config, files, ReplayGenerator::none(), None).await?;
            print_metrics(cli, &manager.performance_metrics(&args.to_filter()))
        }

        Commands::ExportCsv { output, filter } => {
            let manager = open(config, files, ReplayGenerator::none(), None).await?;
            let state = manager.snapshot();
            let results = filter.to_filter().apply(&state.history);
            files.export_csv(&results, output)?;
            println!("{} análises exportadas para {}", results.len(), output.display());
            Ok(())
        }

        Commands::Profile { action } => {
            let manager = open(config, files, ReplayGenerator::none(), None).await?;
            match action {
                None => {}
                Some(ProfileCommand::Set { name, email, phone, company, cnpj, segment, team_size, website }) => {
                    manager.update_user(UserPatch {
                        name: name.clone(),
                        email: email.clone(),
                        avatar_url: None,
                        phone: phone.clone(),
                        company: company.clone(),
                        cnpj: cnpj.clone(),
                        segment: segment.clone(),
                        team_size: team_size.clone(),
                        website: website.clone(),
                    });
                    save_profile(files, &manager)?;
                    print_notification(&manager.snapshot());
                }
                Some(ProfileCommand::Settings {
                    theme,
                    reduced_animations,
                    compact_sidebar,
                    auto_gain_control,
                    noise_suppression,
                }) => {
                    manager.update_settings(SettingsPatch {
                        theme: theme.map(Theme::from),
                        reduced_animations: *reduced_animations,
                        compact_sidebar: *compact_sidebar,
                        auto_gain_control: *auto_gain_control,
                        noise_suppression: *noise_suppression,
                    });
                    save_profile(files, &manager)?;
                }
            }

            let state = manager.snapshot();
            if cli.json {
                let profile = Profile { user: state.user, settings: state.settings };
                println!("{}", serde_json::to_string_pretty(&profile)?);
            } else {
                print!("{}", ui::profile_summary(&state.user, &state.settings));
            }
            Ok(())
        }
    }
}

/// Builds the manager over the stored profile and history.
async fn open(
    config: &AppConfig,
    files: &FileManager,
    generator: ReplayGenerator,
    knowledge: Option<Arc<dyn KnowledgeSource>>,
) -> Result<AnalysisManager> {
    let profile = files.load_profile()?;
    let manager = AnalysisManager::new(
        AnalysisState::new(profile.user, profile.settings),
        Collaborators {
            generator: Arc::new(generator),
            extractor: Arc::new(PlainTextExtractor),
            repository: Arc::new(files.clone()),
            knowledge,
        },
        config,
    );
    manager.load_history().await;
    Ok(manager)
}

fn save_profile(files: &FileManager, manager: &AnalysisManager) -> Result<()> {
    let state = manager.snapshot();
    files.save_profile(&Profile { user: state.user, settings: state.settings })
}

fn print_metrics(cli: &Cli, metrics: &closer_insight::analysis::Metrics) -> Result<()> {
    if cli.json {
        println!("{}", serde_json::to_string_pretty(metrics)?);
    } else {
        print!("{}", ui::metrics_panel(metrics));
    }
    Ok(())
}

/// Keeps the cause chain and puts the user-facing message on top.
fn user_facing(err: AnalysisError) -> anyhow::Error {
    let message = err.user_message();
    anyhow::Error::new(err).context(message)
}

fn print_notification(state: &AnalysisState) {
    if let Some(notification) = &state.notification {
        eprintln!("{}", ui::notification_line(notification));
    }
}
