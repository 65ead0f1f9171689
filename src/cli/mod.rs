//! CLI command implementations for the scoring dashboard.
//!
//! Provides subcommand handlers for:
//! - `credit-dash serve` — run the web dashboard
//! - `credit-dash predict --gender ...` — score one applicant from flags
//! - `credit-dash clients list|show|predict` — explore the test dataset
//! - `credit-dash health` — check config, data files and API settings
//! - `credit-dash config show|init|set|reset` — configuration management

use std::path::Path;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use serde::Serialize;

use crate::applicant::{
    ApplicantRecord, Categorical, CreditHistory, Education, Gender, Married, PropertyArea,
    SelfEmployed,
};
use crate::config::{self, DashConfig};
use crate::lookup::ClientDataset;
use crate::scoring::{self, Assessment, PredictionClient, THRESHOLD_PCT};
use crate::web::{self, AppState};

/// Output format for result-printing commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
}

impl OutputFormat {
    pub fn from_str_opt(s: Option<&str>) -> Self {
        match s {
            Some("json") => Self::Json,
            _ => Self::Table,
        }
    }
}

// ---------------------------------------------------------------------------
// credit-dash serve
// ---------------------------------------------------------------------------

/// Start the dashboard, with optional command-line overrides of the
/// configured address and browser behavior.
pub fn run_serve(mut cfg: DashConfig, addr: Option<String>, no_browser: bool) -> Result<()> {
    if let Some(addr) = addr {
        cfg.server.addr = addr;
    }
    if no_browser {
        cfg.server.open_browser = false;
    }

    let state = AppState::new(cfg);
    web::serve(&state)
}

// ---------------------------------------------------------------------------
// credit-dash predict
// ---------------------------------------------------------------------------

/// Applicant attributes given on the command line.
///
/// Categorical flags take a French label, a dataset spelling (`Male`,
/// `Graduate`, `Semiurban`, ...) or the numeric code.
#[derive(Debug, Clone, Args)]
pub struct PredictArgs {
    /// Femme / Homme (or Female / Male, 0 / 1)
    #[arg(long)]
    pub gender: String,
    /// Non Marié(e) / Marié(e) (or No / Yes, 0 / 1)
    #[arg(long)]
    pub married: String,
    /// Number of dependents ("3+" counts as 3)
    #[arg(long, default_value = "0")]
    pub dependents: String,
    /// Supérieur / Non Supérieur (or Graduate / Not Graduate, 0 / 1)
    #[arg(long)]
    pub education: String,
    /// Non / Oui (or No / Yes, 0 / 1)
    #[arg(long)]
    pub self_employed: String,
    #[arg(long)]
    pub applicant_income: f64,
    #[arg(long, default_value_t = 0.0)]
    pub coapplicant_income: f64,
    /// Loan amount in thousands
    #[arg(long)]
    pub loan_amount: f64,
    /// Loan term in months (at least 1)
    #[arg(long)]
    pub loan_amount_term: f64,
    /// Mauvais / Bon (or 0 / 1)
    #[arg(long)]
    pub credit_history: String,
    /// Rurale / Urbaine / Semi-urbaine (or Rural / Urban / Semiurban, 0-2)
    #[arg(long)]
    pub property_area: String,
}

impl PredictArgs {
    /// Parse and validate the flags into a record.
    pub fn to_record(&self) -> Result<ApplicantRecord> {
        let dependents: f64 = self
            .dependents
            .trim()
            .trim_end_matches('+')
            .parse()
            .with_context(|| format!("invalid --dependents: {}", self.dependents))?;

        let record = ApplicantRecord {
            gender: Gender::parse(&self.gender)?,
            married: Married::parse(&self.married)?,
            dependents: crate::applicant::record::check_count("Dependents", dependents)?,
            education: Education::parse(&self.education)?,
            self_employed: SelfEmployed::parse(&self.self_employed)?,
            applicant_income: self.applicant_income,
            coapplicant_income: self.coapplicant_income,
            loan_amount: self.loan_amount,
            loan_amount_term: self.loan_amount_term,
            credit_history: CreditHistory::parse(&self.credit_history)?,
            property_area: PropertyArea::parse(&self.property_area)?,
        };
        record.validate()?;
        Ok(record)
    }
}

/// Score one applicant described by flags.
pub fn run_predict(cfg: &DashConfig, args: &PredictArgs, format: OutputFormat) -> Result<()> {
    let record = args.to_record()?;
    let client = PredictionClient::from_config(&cfg.api);
    let assessment = scoring::score(&client, &record)?;
    print_assessment(&assessment, format)
}

#[derive(Serialize)]
struct AssessmentJson<'a> {
    #[serde(flatten)]
    assessment: &'a Assessment,
    message: String,
}

fn print_assessment(assessment: &Assessment, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&AssessmentJson {
                assessment,
                message: assessment.message(),
            })
            .context("failed to serialize assessment")?;
            println!("{json}");
        }
        OutputFormat::Table => {
            let message = assessment.message();
            if assessment.is_approved() {
                println!("{} {}", "✓".green().bold(), message.green().bold());
            } else {
                println!("{} {}", "✗".red().bold(), message.red().bold());
            }
            println!(
                "  {} {:.4}",
                "Probabilité de défaut:".bold(),
                assessment.probability
            );
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// credit-dash clients list | show | predict
// ---------------------------------------------------------------------------

fn load_clients(cfg: &DashConfig) -> Result<ClientDataset> {
    Ok(ClientDataset::load(Path::new(&cfg.data.test_csv))?)
}

/// List the selectable client identifiers.
pub fn run_clients_list(cfg: &DashConfig, format: OutputFormat) -> Result<()> {
    let dataset = load_clients(cfg)?;
    let ids = dataset.ids();

    match format {
        OutputFormat::Json => {
            let json = serde_json::json!({
                "id_column": dataset.id_column(),
                "ids": ids,
            });
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
        OutputFormat::Table => {
            println!(
                "{} ({} {})",
                "Clients".bold().cyan(),
                ids.len(),
                dataset.id_column()
            );
            println!("{}", "=".repeat(40));
            for id in ids {
                println!("  {id}");
            }
        }
    }
    Ok(())
}

/// Show one client's fields, decoded for display.
pub fn run_clients_show(cfg: &DashConfig, id: &str, format: OutputFormat) -> Result<()> {
    let dataset = load_clients(cfg)?;
    let row = dataset.get(id)?;
    let cards = row.cards();

    match format {
        OutputFormat::Json => {
            let json = serde_json::json!({ "id": row.id(), "cards": cards });
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
        OutputFormat::Table => {
            println!("{} {}", "Client".bold().cyan(), row.id().bold());
            println!("{}", "=".repeat(40));
            let width = cards.iter().map(|c| c.label.chars().count()).max().unwrap_or(0);
            for card in &cards {
                println!("  {}  {}", format!("{:<width$}", card.label).dimmed(), card.value);
            }
        }
    }
    Ok(())
}

/// Re-encode a client row and score it.
pub fn run_clients_predict(cfg: &DashConfig, id: &str, format: OutputFormat) -> Result<()> {
    let dataset = load_clients(cfg)?;
    let record = dataset.get(id)?.to_record()?;
    let client = PredictionClient::from_config(&cfg.api);
    let assessment = scoring::score(&client, &record)?;
    print_assessment(&assessment, format)
}

// ---------------------------------------------------------------------------
// credit-dash health
// ---------------------------------------------------------------------------

/// Check configuration sources, data files and API settings.
pub fn run_health(cfg: &DashConfig) -> Result<()> {
    println!("{}", "credit-dash Health Check".bold().cyan());
    println!("{}", "=".repeat(40));

    let global_exists = config::global_config_file()
        .map(|p| p.exists())
        .unwrap_or(false);
    let project_exists = config::project_config_file()
        .map(|p| p.exists())
        .unwrap_or(false);
    print_health_item(
        "Global config",
        global_exists,
        if global_exists {
            "~/.credit-dash/config.toml found"
        } else {
            "not found (run `credit-dash config init` to create)"
        },
    );
    print_health_item(
        "Project config",
        project_exists,
        if project_exists {
            ".credit-dash.toml found"
        } else {
            "none (optional)"
        },
    );

    let client = PredictionClient::from_config(&cfg.api);
    print_health_item("Prediction API", true, &client.endpoint());
    print_health_item(
        "API timeout",
        true,
        &if cfg.api.timeout_ms > 0 {
            format!("{} ms", cfg.api.timeout_ms)
        } else {
            "client default".to_string()
        },
    );

    for (name, path) in [("Train data", &cfg.data.train_csv), ("Test data", &cfg.data.test_csv)] {
        let exists = Path::new(path).is_file();
        print_health_item(
            name,
            exists,
            &if exists {
                path.clone()
            } else {
                format!("{path} (missing)")
            },
        );
    }

    print_health_item("Threshold", true, &format!("{THRESHOLD_PCT}%"));
    print_health_item("Dashboard", true, &format!("http://{}", cfg.server.addr));

    Ok(())
}

fn print_health_item(name: &str, ok: bool, detail: &str) {
    let status = if ok {
        "✓".green().bold()
    } else {
        "✗".red().bold()
    };
    println!("  {} {:<25} {}", status, name, detail.dimmed());
}

// ---------------------------------------------------------------------------
// credit-dash config show | init | set | reset
// ---------------------------------------------------------------------------

/// Show the effective (merged) configuration as TOML.
pub fn run_config_show() -> Result<()> {
    let toml_str = config::show_effective_config()?;
    println!("{}", "Effective credit-dash Configuration".bold().cyan());
    println!("{}", "=".repeat(50));
    println!();
    println!("{toml_str}");

    let global_exists = config::global_config_file()
        .map(|p| p.exists())
        .unwrap_or(false);
    let project_exists = config::project_config_file()
        .map(|p| p.exists())
        .unwrap_or(false);
    println!("{}", "Sources (highest priority last):".dimmed());
    println!("  {} built-in defaults", "·".dimmed());
    print_source(global_exists, "~/.credit-dash/config.toml");
    print_source(project_exists, ".credit-dash.toml");
    println!(
        "  {} {}",
        "·".dimmed(),
        "CREDIT_DASH_* environment variables".dimmed()
    );

    Ok(())
}

fn print_source(exists: bool, name: &str) {
    if exists {
        println!("  {} {}", "✓".green(), name.dimmed());
    } else {
        println!("  {} {}", "·".dimmed(), format!("{name} (not found)").dimmed());
    }
}

/// Initialize a default config file at `~/.credit-dash/config.toml`.
pub fn run_config_init(force: bool) -> Result<()> {
    let path = config::init_config(force)?;
    println!(
        "{} Config written to {}",
        "✓".green().bold(),
        path.display()
    );
    println!("  {}", "Edit the file to point at your API and data.".dimmed());
    Ok(())
}

/// Set a single configuration value in the global config file.
pub fn run_config_set(key: &str, value: &str) -> Result<()> {
    config::set_config_value(key, value)?;
    println!("{} Set {} = {}", "✓".green().bold(), key.bold(), value);
    Ok(())
}

/// Reset configuration to defaults.
pub fn run_config_reset() -> Result<()> {
    let path = config::reset_config()?;
    println!(
        "{} Config reset to defaults at {}",
        "✓".green().bold(),
        path.display()
    );
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> PredictArgs {
        PredictArgs {
            gender: "Male".into(),
            married: "Marié(e)".into(),
            dependents: "3+".into(),
            education: "Graduate".into(),
            self_employed: "0".into(),
            applicant_income: 5000.0,
            coapplicant_income: 0.0,
            loan_amount: 128.0,
            loan_amount_term: 360.0,
            credit_history: "1.0".into(),
            property_area: "semiurban".into(),
        }
    }

    #[test]
    fn test_output_format_parsing() {
        assert_eq!(OutputFormat::from_str_opt(None), OutputFormat::Table);
        assert_eq!(OutputFormat::from_str_opt(Some("json")), OutputFormat::Json);
        assert_eq!(
            OutputFormat::from_str_opt(Some("unknown")),
            OutputFormat::Table
        );
    }

    #[test]
    fn predict_args_accept_labels_aliases_and_codes() {
        let record = args().to_record().unwrap();
        assert_eq!(record.gender, Gender::Male);
        assert_eq!(record.married, Married::Yes);
        assert_eq!(record.dependents, 3);
        assert_eq!(record.self_employed, SelfEmployed::No);
        assert_eq!(record.credit_history, CreditHistory::Good);
        assert_eq!(record.property_area, PropertyArea::Semiurban);
    }

    #[test]
    fn predict_args_reject_unknown_label() {
        let mut a = args();
        a.property_area = "Banlieue".into();
        assert!(a.to_record().is_err());
    }

    #[test]
    fn predict_args_enforce_minimum_term() {
        let mut a = args();
        a.loan_amount_term = 0.0;
        let err = a.to_record().unwrap_err();
        assert!(err.to_string().contains("Loan_Amount_Term"));
    }
}
