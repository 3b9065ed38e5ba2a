mod commands;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use lepcare_core::config::config_from_env_values;
use lepcare_core::PatientInput;
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "lepcare")]
#[command(about = "LepCare leprosy screening and treatment tracking CLI")]
struct Cli {
    /// YAML file of patients and treatments to load instead of the built-in sample data
    #[arg(long, global = true, env = "LEPCARE_FIXTURE")]
    fixture: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List the screening questions
    Questions,
    /// Run the symptom questionnaire
    Screen {
        /// Comma-separated answers in question order (e.g. "yes,no,not sure,no,no");
        /// asks interactively when omitted
        #[arg(long)]
        answers: Option<String>,
    },
    /// Screen a skin photo
    AnalyseImage {
        /// Path to a JPG, PNG or other image file
        path: PathBuf,
        /// Skip the simulated analysis delay
        #[arg(long)]
        no_delay: bool,
    },
    /// List patients
    Patients {
        /// Case-insensitive name or location filter
        #[arg(long)]
        search: Option<String>,
    },
    /// Register a patient
    AddPatient {
        #[arg(long)]
        name: String,
        /// Age in whole years
        #[arg(long)]
        age: String,
        #[arg(long)]
        phone: String,
        #[arg(long)]
        location: String,
        /// Paucibacillary (PB), Multibacillary (MB) or Suspected
        #[arg(long)]
        stage: String,
        /// Low, Medium or High (default: Medium)
        #[arg(long)]
        risk_level: Option<String>,
        /// Registration date (YYYY-MM-DD); defaults to today
        #[arg(long)]
        today: Option<NaiveDate>,
    },
    /// Show the treatment tracker
    Treatments {
        /// Reference date (YYYY-MM-DD); defaults to today
        #[arg(long)]
        today: Option<NaiveDate>,
    },
    /// Record one completed dose for a treatment
    CompleteDose {
        /// Treatment id
        id: String,
    },
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("lepcare_core=warn".parse()?),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let cfg = config_from_env_values(
        std::env::var("LEPCARE_FOLLOW_UP_DAYS").ok(),
        std::env::var("LEPCARE_ANALYSIS_DELAY_MS").ok(),
        std::env::var("LEPCARE_MAX_IMAGE_BYTES").ok(),
    )?;
    let today = chrono::Local::now().date_naive();
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Some(Commands::Questions) => commands::print_questions(&mut out)?,
        Some(Commands::Screen { answers }) => match answers {
            Some(answers) => commands::screen_answers(&answers, &mut out)?,
            None => {
                let stdin = std::io::stdin();
                if commands::run_wizard(stdin.lock(), &mut out)?.is_none() {
                    anyhow::bail!("questionnaire abandoned before the last question");
                }
            }
        },
        Some(Commands::AnalyseImage { path, no_delay }) => {
            let delay = if no_delay {
                Duration::ZERO
            } else {
                cfg.analysis_delay()
            };
            commands::analyse_image(&path, &cfg, delay, &mut out)?;
        }
        Some(Commands::Patients { search }) => {
            let data = commands::load_data(cli.fixture.as_deref(), &cfg)?;
            commands::list_patients(&data, search.as_deref(), &mut out)?;
        }
        Some(Commands::AddPatient {
            name,
            age,
            phone,
            location,
            stage,
            risk_level,
            today: registered_on,
        }) => {
            let mut data = commands::load_data(cli.fixture.as_deref(), &cfg)?;
            let input = PatientInput {
                name,
                age,
                phone,
                location,
                stage,
                risk_level: commands::parse_risk_level(risk_level.as_deref())?,
            };
            commands::add_patient(&mut data, input, registered_on.unwrap_or(today), &mut out)?;
        }
        Some(Commands::Treatments { today: on }) => {
            let data = commands::load_data(cli.fixture.as_deref(), &cfg)?;
            commands::list_treatments(&data.ledger, on.unwrap_or(today), &mut out)?;
        }
        Some(Commands::CompleteDose { id }) => {
            let mut data = commands::load_data(cli.fixture.as_deref(), &cfg)?;
            commands::complete_dose(&mut data.ledger, &id, &mut out)?;
        }
        None => {
            writeln!(out, "Use 'lepcare --help' for commands")?;
        }
    }

    Ok(())
}
