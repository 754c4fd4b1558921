#![forbid(unsafe_code)]
use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use rotaplan::{
    io,
    storage::RotaStore,
    GenerateRequest, GenerateResult, RotaEngine, Severity,
};
#[cfg(feature = "logging")]
use tracing_subscriber::{fmt::Subscriber, EnvFilter};

/// CLI minimaliste de génération de plannings (sans base de données)
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Active les logs (feature `logging`)
    #[arg(long, global = true)]
    log: bool,

    /// Répertoire des rotas générées
    #[arg(long, global = true, default_value = "rotas")]
    store: String,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Générer la rota d'une semaine et la stocker
    Generate {
        /// Lundi de la semaine (YYYY-MM-DD)
        #[arg(long)]
        week_start: String,
        /// CSV du personnel
        #[arg(long)]
        staff: String,
        /// JSON des templates d'horaires
        #[arg(long)]
        templates: String,
        /// CSV des absences (optionnel)
        #[arg(long)]
        absences: Option<String>,
        #[arg(long)]
        out_json: Option<String>,
        #[arg(long)]
        out_csv: Option<String>,
    },

    /// Afficher une semaine stockée
    Show {
        #[arg(long)]
        week_start: String,
    },

    /// Lister les semaines stockées
    List,

    /// Exporter une semaine stockée
    Export {
        #[arg(long)]
        week_start: String,
        #[arg(long)]
        out_json: Option<String>,
        #[arg(long)]
        out_csv: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    #[cfg(feature = "logging")]
    if cli.log {
        let _ = Subscriber::builder()
            .with_env_filter(EnvFilter::from_default_env())
            .try_init();
    }

    let store = RotaStore::new(&cli.store);

    let code = match cli.cmd {
        Commands::Generate {
            week_start,
            staff,
            templates,
            absences,
            out_json,
            out_csv,
        } => {
            let week_start = parse_monday(&week_start)?;
            // contrôle d'unicité avant toute invocation du moteur
            if store.exists(week_start) {
                anyhow::bail!("a rota is already stored for week {week_start}");
            }
            let staff = io::import_staff_csv(&staff)?;
            let templates = io::load_templates_json(&templates)?;
            let absences = match absences {
                Some(path) => io::import_absences_csv(path, &staff)?,
                None => Vec::new(),
            };
            let request = GenerateRequest {
                week_start,
                templates,
                staff,
                absences,
            };
            let result = RotaEngine::new().generate(&request)?;
            store.save(&result)?;
            if let Some(path) = out_json {
                io::export_result_json(path, &result)?;
            }
            if let Some(path) = out_csv {
                io::export_assignments_csv(path, &result)?;
            }
            print_summary(&result);
            if result.has_high_severity_warnings() {
                // code 2 = généré mais couverture incomplète
                2
            } else {
                0
            }
        }
        Commands::Show { week_start } => {
            let week_start = parse_monday(&week_start)?;
            let result = store.load(week_start)?;
            print_week(&result);
            0
        }
        Commands::List => {
            for week in store.list()? {
                println!("{week}");
            }
            0
        }
        Commands::Export {
            week_start,
            out_json,
            out_csv,
        } => {
            let week_start = parse_monday(&week_start)?;
            let result = store.load(week_start)?;
            if let Some(path) = out_json {
                io::export_result_json(path, &result)?;
            }
            if let Some(path) = out_csv {
                io::export_assignments_csv(path, &result)?;
            }
            0
        }
    };

    std::process::exit(code);
}

fn parse_monday(raw: &str) -> Result<NaiveDate> {
    raw.parse::<NaiveDate>()
        .with_context(|| format!("invalid date: {raw}"))
}

fn print_summary(result: &GenerateResult) {
    println!(
        "week {} → {} | {} assignment(s), {:.1}h, {} warning(s)",
        result.week_start,
        result.week_end,
        result.summary.total_assignments,
        result.summary.total_hours,
        result.summary.total_warnings
    );
    for u in &result.summary.staff_utilization {
        println!(
            "  {} | {:.1}h / contract {:.1}h / max {:.1}h | {} day(s)",
            u.name, u.hours, u.contracted_hours, u.max_hours_per_week, u.days_worked
        );
    }
    for w in result.all_warnings() {
        println!("  [{}] {}", severity_label(w.severity), w.message);
    }
}

fn print_week(result: &GenerateResult) {
    print_summary(result);
    for day in &result.days {
        if !day.has_operations {
            println!("{} {} | closed", day.date, day.weekday);
            continue;
        }
        println!("{} {}", day.date, day.weekday);
        for a in &day.assignments {
            println!(
                "  {} | {} | {} → {} | {:.1}h",
                a.staff_name,
                a.role.as_str(),
                a.start_hhmm(),
                a.end_hhmm(),
                a.hours
            );
        }
    }
}

fn severity_label(severity: Severity) -> &'static str {
    match severity {
        Severity::High => "high",
        Severity::Medium => "medium",
        Severity::Low => "low",
    }
}
