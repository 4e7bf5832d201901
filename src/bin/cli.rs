//! Sepsis Dashboard CLI
//!
//! Command-line front end for the sepsis prediction backend:
//! - Log in and out, inspect the current session
//! - List, add, show and delete patients
//! - Submit hourly biomarker values (inline or from CSV)
//! - Export a patient's risk trend as SVG
//! - Check values against the validation table

use anyhow::{bail, Context as _};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use sepsis_dashboard::api::{NewPatient, PatientClient, VitalSigns};
use sepsis_dashboard::chart::SvgSurface;
use sepsis_dashboard::config::{generate_default_config, Config};
use sepsis_dashboard::import::HourlyCsvImporter;
use sepsis_dashboard::session::{
    self, FileCookieJar, FileUserCache, LoginForm, SessionManager, UserCache,
};
use sepsis_dashboard::validation::{
    check_vital_signs, form_fields, validate, FieldCheck, FORM_SECTIONS,
};
use sepsis_dashboard::view::{ViewController, NO_HOURLY_DATA, NO_PATIENTS};
use sepsis_dashboard::{DashboardApi, ValidationTable};

#[derive(Parser)]
#[command(name = "sepsis-cli")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Command-line client for the sepsis risk monitoring backend")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Backend URL (overrides the config file)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Config file (default: standard locations)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format (table, json)
    #[arg(short, long, default_value = "table", global = true)]
    pub format: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List hospitals available at login
    Hospitals,

    /// Log in and store the session
    Login {
        /// Hospital ID (see `hospitals`)
        #[arg(long)]
        hospital: i64,
        #[arg(short, long)]
        username: String,
        #[arg(short, long, env = "SEPSIS_PASSWORD", hide_env_values = true)]
        password: String,
        /// Keep the session for 30 days
        #[arg(long)]
        remember_me: bool,
    },

    /// End the session
    Logout,

    /// Show the logged-in user
    Whoami,

    /// Change the current user's password
    ChangePassword {
        #[arg(long)]
        current: String,
        #[arg(long)]
        new: String,
    },

    /// List patients
    Patients,

    /// Add a patient admitted now
    AddPatient {
        /// Hospital patient identifier (e.g., P-12)
        patient_id: String,
        /// Full name
        name: String,
        #[arg(long)]
        age: Option<u32>,
        #[arg(long)]
        gender: Option<String>,
    },

    /// Show a patient with its hourly history
    Show {
        /// Backend patient key
        id: i64,
    },

    /// Delete a patient
    Delete {
        id: i64,
        /// Confirm deletion
        #[arg(long)]
        yes: bool,
    },

    /// Submit one hour of biomarker values
    Submit {
        id: i64,
        /// Hour index (default: next hour)
        #[arg(long)]
        hour: Option<u32>,
        /// Values as FIELD=VALUE; omitted fields are sent as null
        #[arg(short = 'v', long = "value")]
        values: Vec<String>,
        /// Send even if values fail client-side validation
        #[arg(long)]
        force: bool,
    },

    /// Submit hourly rows from a CSV file
    Import {
        id: i64,
        path: PathBuf,
        /// Name of the hour column
        #[arg(long, default_value = "hour")]
        hour_column: String,
        /// Field delimiter
        #[arg(long, default_value = ",")]
        delimiter: char,
        /// Parse and validate only
        #[arg(long)]
        dry_run: bool,
    },

    /// Write a patient's risk trend as SVG
    Chart {
        id: i64,
        #[arg(short, long, default_value = "risk-trend.svg")]
        output: PathBuf,
    },

    /// Check one value against the validation table
    Validate { field: String, value: String },

    /// List form fields and their accepted ranges
    Fields,

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Everything a command needs, built from the config
struct Context {
    config: Config,
    table: ValidationTable,
    sessions: SessionManager<FileCookieJar>,
    cache: FileUserCache,
    client: PatientClient,
    json: bool,
}

impl Context {
    fn new(cli: &Cli, mut config: Config) -> anyhow::Result<Self> {
        if let Some(url) = &cli.api_url {
            config.api.base_url = url.clone();
        }

        let table = config
            .validation_table()
            .context("Failed to load validation table")?;
        let state_dir = config.state_dir();

        let mut client = PatientClient::new(config.client_config())?;
        let sessions = SessionManager::new(FileCookieJar::new(&state_dir), client.is_secure());
        if let Some(token) = sessions.get_session() {
            client = client.with_session(token);
        }

        Ok(Self {
            cache: FileUserCache::new(&state_dir),
            json: cli.format == "json",
            config,
            table,
            sessions,
            client,
        })
    }

    fn require_session(&self) -> anyhow::Result<()> {
        if self.sessions.get_session().is_none() {
            bail!("Not logged in. Run `sepsis-cli login` first.");
        }
        Ok(())
    }

    fn controller(&self) -> ViewController<PatientClient, SvgSurface> {
        ViewController::with_table(self.client.clone(), SvgSurface::default(), self.table.clone())
    }
}

fn init_logging(config: &Config) {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG")
            .unwrap_or_else(|_| format!("sepsis_dashboard={}", config.logging.level)),
    );
    let registry = tracing_subscriber::registry().with(filter);

    if config.logging.format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

/// Print pending notifications; true if any was an error
fn flush_notifications<A: DashboardApi>(controller: &ViewController<A, SvgSurface>) -> bool {
    let mut failed = false;
    for n in controller.take_notifications() {
        if n.is_error() {
            eprintln!("{}", n.message);
            failed = true;
        } else {
            println!("{}", n.message);
        }
    }
    failed
}

fn parse_values(values: &[String]) -> anyhow::Result<VitalSigns> {
    let mut vital_signs: VitalSigns = form_fields().map(|f| (f.to_string(), None)).collect();

    for entry in values {
        let Some((field, raw)) = entry.split_once('=') else {
            bail!("Expected FIELD=VALUE, got '{}'", entry);
        };
        let raw = raw.trim();
        let value = if raw.is_empty() {
            None
        } else {
            match raw.parse::<f64>() {
                Ok(v) if v.is_finite() => Some(v),
                _ => bail!("{} is not a number: '{}'", field, raw),
            }
        };
        vital_signs.insert(field.trim().to_string(), value);
    }
    Ok(vital_signs)
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => Config::load_with_env(path)?,
        None => Config::load_default(),
    };
    init_logging(&config);
    let mut ctx = Context::new(&cli, config)?;

    match cli.command {
        Commands::Hospitals => {
            let hospitals = ctx.client.list_hospitals().await?;
            if ctx.json {
                println!("{}", serde_json::to_string_pretty(&hospitals)?);
            } else {
                println!("{:<6} {:<40} {:<10} {}", "ID", "Name", "Code", "City");
                println!("{}", "-".repeat(70));
                for h in hospitals {
                    println!(
                        "{:<6} {:<40} {:<10} {}",
                        h.id,
                        h.name,
                        h.code,
                        h.city.as_deref().unwrap_or("-")
                    );
                }
            }
        }

        Commands::Login {
            hospital,
            username,
            password,
            remember_me,
        } => {
            let form = LoginForm {
                hospital_id: Some(hospital),
                username,
                password,
                remember_me: remember_me || ctx.config.session.remember_me,
            };
            let user = session::login(&ctx.client, &mut ctx.sessions, &mut ctx.cache, &form)
                .await
                .map_err(|e| anyhow::anyhow!("{}", e))?;

            println!(
                "Logged in as {} ({})",
                user.username,
                user.hospital_name.as_deref().unwrap_or("-")
            );
        }

        Commands::Logout => {
            session::logout(&ctx.client, &mut ctx.sessions, &mut ctx.cache).await?;
            println!("Logged out");
        }

        Commands::Whoami => {
            ctx.require_session()?;
            match ctx.sessions.check_existing(&ctx.client).await {
                session::SessionProbe::Active(user) => {
                    ctx.cache.store(&user)?;
                    if ctx.json {
                        println!("{}", serde_json::to_string_pretty(&user)?);
                    } else {
                        println!("User:     {}", user.username);
                        if let Some(name) = &user.full_name {
                            println!("Name:     {}", name);
                        }
                        if let Some(hospital) = &user.hospital_name {
                            println!("Hospital: {}", hospital);
                        }
                        if let Some(role) = &user.role {
                            println!("Role:     {}", role);
                        }
                    }
                }
                session::SessionProbe::NoSession => {
                    if let Some(cached) = ctx.cache.load() {
                        tracing::debug!(username = %cached.username, "Cached user is stale");
                    }
                    bail!("Session is no longer valid. Please log in again.");
                }
            }
        }

        Commands::ChangePassword { current, new } => {
            ctx.require_session()?;
            session::change_password(&ctx.client, &current, &new)
                .await
                .map_err(|e| anyhow::anyhow!("{}", e))?;
            println!("Password changed");
        }

        Commands::Patients => {
            ctx.require_session()?;
            let controller = ctx.controller();
            controller.load_patients().await;
            if flush_notifications(&controller) {
                std::process::exit(1);
            }

            let state = controller.state();
            if ctx.json {
                println!("{}", serde_json::to_string_pretty(&state.patients)?);
            } else if state.patients.is_empty() {
                println!("{}", NO_PATIENTS);
            } else {
                println!(
                    "{:<6} {:<12} {:<28} {:<14} {:<10} {:<6} {}",
                    "Key", "ID", "Name", "Age", "Gender", "Hours", "Risk"
                );
                println!("{}", "-".repeat(96));
                for card in state.patient_cards() {
                    let risk = match (&card.risk, &card.risk_score) {
                        (Some(badge), Some(score)) => format!("{} ({})", badge.label, score),
                        _ => "-".to_string(),
                    };
                    println!(
                        "{:<6} {:<12} {:<28} {:<14} {:<10} {:<6} {}",
                        card.key, card.patient_id, card.name, card.age, card.gender,
                        card.total_hours, risk
                    );
                }
            }
        }

        Commands::AddPatient {
            patient_id,
            name,
            age,
            gender,
        } => {
            ctx.require_session()?;
            let controller = ctx.controller();
            let patient = NewPatient::admitted_now(&patient_id, &name, age, gender);
            let accepted = controller.add_patient(&patient).await;
            flush_notifications(&controller);
            if !accepted {
                std::process::exit(1);
            }
        }

        Commands::Show { id } => {
            ctx.require_session()?;
            let controller = ctx.controller();
            if !controller.show_detail(id).await {
                flush_notifications(&controller);
                std::process::exit(1);
            }

            let state = controller.state();
            if ctx.json {
                println!("{}", serde_json::to_string_pretty(&state.detail)?);
                return Ok(());
            }

            if let Some(header) = state.detail_header() {
                println!("{}", header.name);
                println!("{}", header.meta);
                println!();
            }

            let cards = state.hourly_cards();
            if cards.is_empty() {
                println!("{}", NO_HOURLY_DATA);
            }
            for card in cards {
                println!("{}  [{}]  Risk Skoru: {}", card.title, card.risk.label, card.risk_score);
                let recorded: Vec<String> = card
                    .vitals
                    .iter()
                    .map(|v| format!("{}: {}", v.name, v.value))
                    .collect();
                if !recorded.is_empty() {
                    println!("  {}", recorded.join(", "));
                }
            }
            println!();
            println!("Next hour: {}", state.next_hour);
        }

        Commands::Delete { id, yes } => {
            ctx.require_session()?;
            if !yes {
                bail!("Deleting a patient cannot be undone; pass --yes to confirm");
            }
            let controller = ctx.controller();
            if !controller.show_detail(id).await {
                flush_notifications(&controller);
                std::process::exit(1);
            }
            let deleted = controller.delete_current_patient(yes).await;
            flush_notifications(&controller);
            if !deleted {
                std::process::exit(1);
            }
        }

        Commands::Submit {
            id,
            hour,
            values,
            force,
        } => {
            ctx.require_session()?;
            let vital_signs = parse_values(&values)?;

            let problems = check_vital_signs(&ctx.table, &vital_signs);
            if !problems.is_empty() {
                for p in &problems {
                    eprintln!("{}", p);
                }
                if !force {
                    bail!("{} value(s) out of range; use --force to send anyway", problems.len());
                }
            }

            let controller = ctx.controller();
            if !controller.show_detail(id).await {
                flush_notifications(&controller);
                std::process::exit(1);
            }
            let hour = hour.unwrap_or(controller.state().next_hour);

            let saved = controller.submit_hourly(hour, vital_signs).await;
            flush_notifications(&controller);
            if !saved {
                std::process::exit(1);
            }
        }

        Commands::Import {
            id,
            path,
            hour_column,
            delimiter,
            dry_run,
        } => {
            ctx.require_session()?;
            if !delimiter.is_ascii() {
                bail!("Delimiter must be a single ASCII character");
            }

            let outcome = HourlyCsvImporter::new()
                .with_hour_column(&hour_column)
                .with_delimiter(delimiter as u8)
                .with_form_fields(true)
                .import(&path)
                .with_context(|| format!("Failed to read {:?}", path))?;

            println!("Rows parsed: {}", outcome.submissions.len());
            println!("Rows failed: {}", outcome.rows_failed);
            for error in outcome.errors.iter().take(10) {
                println!("  {}", error);
            }

            let problems = outcome.check(&ctx.table);
            for (hour, messages) in &problems {
                for m in messages {
                    println!("  Saat {}: {}", hour, m);
                }
            }

            if dry_run {
                return Ok(());
            }
            if !problems.is_empty() {
                bail!("{} hour(s) failed validation; nothing submitted", problems.len());
            }

            let controller = ctx.controller();
            if !controller.show_detail(id).await {
                flush_notifications(&controller);
                std::process::exit(1);
            }
            for submission in outcome.submissions {
                let saved = controller
                    .submit_hourly(submission.hour, submission.vital_signs)
                    .await;
                if flush_notifications(&controller) || !saved {
                    std::process::exit(1);
                }
            }
        }

        Commands::Chart { id, output } => {
            ctx.require_session()?;
            let controller = ctx.controller();
            if !controller.show_detail(id).await {
                flush_notifications(&controller);
                std::process::exit(1);
            }

            let svg = controller.with_surface(|s| s.document().map(str::to_string));
            let Some(svg) = svg else {
                bail!("Nothing was drawn");
            };
            std::fs::write(&output, svg)?;
            println!("Chart written to {:?}", output);
        }

        Commands::Validate { field, value } => match validate(&ctx.table, &field, &value) {
            FieldCheck::Valid => println!("OK"),
            FieldCheck::Invalid { message } => {
                eprintln!("{}", message);
                std::process::exit(1);
            }
        },

        Commands::Fields => {
            if ctx.json {
                println!("{}", serde_json::to_string_pretty(&ctx.table)?);
                return Ok(());
            }

            for section in FORM_SECTIONS {
                println!("{}", section.title);
                for field in section.fields {
                    match ctx.table.get(field) {
                        Some(rule) => println!(
                            "  {:<18} {:<32} {} - {} {}",
                            field, rule.display_name, rule.min, rule.max, rule.unit
                        ),
                        None => println!("  {:<18} (not validated)", field),
                    }
                }
            }
        }

        Commands::Config { output } => {
            let content = generate_default_config();
            match output {
                Some(path) => {
                    std::fs::write(&path, &content)?;
                    println!("Config written to {:?}", path);
                }
                None => print!("{}", content),
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(entries: &[&str]) -> Vec<String> {
        entries.iter().map(|e| e.to_string()).collect()
    }

    #[test]
    fn test_parse_values() {
        let vital_signs = parse_values(&values(&["HR=110", "Lactate="])).unwrap();

        assert_eq!(vital_signs.get("HR"), Some(&Some(110.0)));
        assert_eq!(vital_signs.get("Lactate"), Some(&None));
        assert_eq!(vital_signs.get("PCT"), Some(&None));
    }

    #[test]
    fn test_parse_values_rejects_non_finite() {
        for raw in ["HR=NaN", "Temp=inf", "Custom=-infinity", "HR=abc"] {
            let err = parse_values(&values(&[raw])).unwrap_err();
            assert!(err.to_string().contains("is not a number"), "{}", raw);
        }
        assert!(parse_values(&values(&["HR"])).is_err());
    }
}
