use clap::{Parser, Subcommand};
use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;

use homefaiba_sales::auth::{Authenticator, DemoAuthenticator, Session};
use homefaiba_sales::backend::{DataAccess, HttpDataAccess, InMemoryStore};
use homefaiba_sales::config::AppConfig;
use homefaiba_sales::error::{AppError, AppResult};
use homefaiba_sales::logging::init_tracing;
use homefaiba_sales::models::{ApplicationStatus, InstallationStatus};
use homefaiba_sales::reports::{
    count_applications, count_installations, filter_installations, search_applications,
    search_salesmen, CommissionSummary, DashboardStats, Leaderboard, RankBy, StatusFilter,
};
use homefaiba_sales::resource;
use homefaiba_sales::utils::{format_date, format_ksh, format_percent, status_label};
use homefaiba_sales::wizard::{Field, IntakeWizard, StepOutcome};

/// Seed data served by `serve` when no seed file is configured
const DEFAULT_SEED: &str = include_str!("../data/db.json");

#[derive(Parser, Debug)]
#[command(name = "homefaiba-sales")]
#[command(about = "HomeFaiba dealer and agent sales tooling")]
struct Args {
    /// Configuration file path (default: config.yaml)
    #[arg(short, long, default_value = "config.yaml")]
    config: String,

    /// Backend base URL (overrides config file)
    #[arg(long)]
    api_url: Option<String>,

    /// Demo login username
    #[arg(short, long)]
    username: Option<String>,

    /// Demo login password
    #[arg(short, long)]
    password: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the mock REST API
    Serve {
        /// Port to listen on (overrides config file)
        #[arg(long)]
        port: Option<u16>,
        /// Host to bind to (overrides config file)
        #[arg(long)]
        host: Option<String>,
        /// JSON seed document (overrides config file)
        #[arg(long)]
        seed: Option<String>,
    },
    /// Check credentials and show the resulting session
    Login,
    /// Compare the available packages
    Packages,
    /// Run the application intake wizard from a YAML answers file
    Intake {
        #[arg(long)]
        answers: String,
    },
    /// Application and salesmen counts for the signed-in user
    Dashboard,
    /// Search sales records
    Sales {
        #[arg(long, default_value = "")]
        search: String,
        #[arg(long, default_value = "all")]
        status: String,
    },
    /// Search the salesmen directory (dealers only)
    Salesmen {
        #[arg(long, default_value = "")]
        search: String,
    },
    /// Rank salesmen by sales or commission (dealers only)
    Leaderboard {
        #[arg(long, default_value = "sales")]
        by: String,
    },
    /// Commission statements for a period (default: latest)
    Commissions {
        #[arg(long)]
        period: Option<String>,
    },
    /// Mark a commission statement as paid (dealers only)
    MarkPaid { id: u32 },
    /// Installations for the signed-in agent
    Installations {
        #[arg(long, default_value = "all")]
        status: String,
    },
    /// Cancel an application
    Cancel { id: u32 },
    /// Deactivate a salesman (dealers only)
    Deactivate { id: u32 },
}

fn load_config(args: &Args) -> AppResult<AppConfig> {
    let config =
        if args.config == "config.yaml" && !std::path::Path::new("config.yaml").exists() {
            eprintln!("⚠️  No config.yaml found, using default configuration:");
            eprintln!("   - Mock API at http://localhost:3000");
            eprintln!("   - Demo logins agent/agent123 and dealer/dealer123");
            AppConfig::default_config()
        } else {
            AppConfig::load_from_file(&args.config)?
        };
    Ok(config)
}

/// Client for the configured backend, honouring `--api-url`
///
/// Only commands that read or write backend data build one.
fn data_access(args: &Args, config: &AppConfig) -> AppResult<HttpDataAccess> {
    let config = match &args.api_url {
        Some(api_url) => config.clone().with_api_url(api_url)?,
        None => config.clone(),
    };
    HttpDataAccess::new(&config.api)
}

fn login(args: &Args, config: &AppConfig) -> AppResult<Session> {
    let (Some(username), Some(password)) = (&args.username, &args.password) else {
        return Err(AppError::Authentication(
            "--username and --password are required for this command".to_string(),
        ));
    };
    DemoAuthenticator::new(config.demo_accounts.clone()).authenticate(username, password)
}

fn require_dealer(session: Session) -> AppResult<Session> {
    if session.is_dealer() {
        Ok(session)
    } else {
        Err(AppError::Authentication(
            "This command is only available to dealers".to_string(),
        ))
    }
}

async fn serve(
    mut config: AppConfig,
    port: Option<u16>,
    host: Option<String>,
    seed: Option<String>,
) -> AppResult<()> {
    if let Some(port) = port {
        config.server.port = port;
    }
    if let Some(host) = host {
        config.server.host = host;
    }

    let store = match seed.or(config.server.seed_file.clone()) {
        Some(path) => InMemoryStore::load_from_file(path)?,
        None => InMemoryStore::from_json_str(DEFAULT_SEED)?,
    };

    let app = resource::router(Arc::new(store));

    let host: std::net::IpAddr = config.server.host.parse().unwrap_or_else(|_| {
        eprintln!("Invalid host address: {}, using 127.0.0.1", config.server.host);
        [127, 0, 0, 1].into()
    });
    let addr = SocketAddr::from((host, config.server.port));
    println!("🚀 Mock sales API listening on {}", addr);
    for collection in homefaiba_sales::backend::Collection::ALL {
        println!("   📦 http://{}/{}", addr, collection);
    }

    let listener = TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn yaml_to_text(value: &serde_yaml::Value) -> String {
    match value {
        serde_yaml::Value::String(s) => s.clone(),
        serde_yaml::Value::Number(n) => n.to_string(),
        serde_yaml::Value::Bool(b) => b.to_string(),
        _ => String::new(),
    }
}

async fn run_intake(
    api: &dyn DataAccess,
    session: Session,
    config: &AppConfig,
    path: &str,
) -> AppResult<()> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| AppError::BadRequest(format!("Failed to read {}: {}", path, e)))?;
    let raw: BTreeMap<String, serde_yaml::Value> = serde_yaml::from_str(&content)?;
    let mut answers = BTreeMap::new();
    for (name, value) in &raw {
        answers.insert(name.parse::<Field>()?, yaml_to_text(value));
    }

    let mut wizard = IntakeWizard::start(session, &config.intake, api).await;
    if let Some(toast) = wizard.toast() {
        println!("{}", toast);
    }

    // Field order puts the id type ahead of the id value it would clear
    for field in Field::ALL {
        if let Some(value) = answers.get(&field) {
            wizard.field_changed(field, value)?;
        }
    }

    loop {
        let step = wizard.current_step();
        match wizard.next() {
            StepOutcome::Advanced(next) => println!("✅ {} complete, now on {}", step, next),
            StepOutcome::AtLastStep => break,
            StepOutcome::Blocked => {
                println!("❌ {} has problems:", step);
                for (field, message) in wizard.errors() {
                    println!("   - {}: {}", field, message);
                }
                return Err(AppError::Validation(wizard.errors().clone()));
            }
        }
    }

    match wizard.submit(api).await {
        Ok(receipt) => {
            println!("{}", receipt.toast);
            println!(
                "   Application {} for {} ({})",
                receipt.application.application_number,
                receipt.application.customer_name,
                receipt.application.customer_phone
            );
            Ok(())
        }
        Err(failure) => {
            if let Some(toast) = failure.wizard.toast() {
                println!("{}", toast);
            }
            Err(failure.error)
        }
    }
}

async fn run(args: Args) -> AppResult<()> {
    let config = load_config(&args)?;
    init_tracing(&config.logging.level);

    match &args.command {
        Command::Serve { port, host, seed } => {
            serve(config.clone(), *port, host.clone(), seed.clone()).await?;
        }
        Command::Login => {
            let session = login(&args, &config)?;
            println!("Welcome! Logged in as {}", session.role);
            println!("   Dealer: {}", session.dealer_id);
            if let Some(agent_id) = session.agent_id {
                println!("   Agent: {}", agent_id);
            }
        }
        Command::Packages => {
            let api = data_access(&args, &config)?;
            let packages = api.get_packages().await?;
            for package in &packages {
                println!(
                    "{} | {} | {}/month",
                    package.name,
                    package.speed,
                    format_ksh(package.price)
                );
                for feature in &package.features {
                    println!("   • {}", feature);
                }
            }
        }
        Command::Intake { answers } => {
            let api = data_access(&args, &config)?;
            let session = login(&args, &config)?;
            run_intake(&api, session, &config, answers).await?;
        }
        Command::Dashboard => {
            let api = data_access(&args, &config)?;
            let session = login(&args, &config)?;
            let stats = DashboardStats::load(&api, &session).await?;
            println!("Applications: {}", stats.total_applications);
            println!("   Pending: {}", stats.pending_applications);
            println!("   Active: {}", stats.active_applications);
            if session.is_dealer() {
                println!("Salesmen: {}", stats.total_salesmen);
            }
        }
        Command::Sales { search, status } => {
            let api = data_access(&args, &config)?;
            let session = login(&args, &config)?;
            let filter: StatusFilter<ApplicationStatus> = status.parse()?;
            let applications = api
                .get_applications(session.dealer_id, session.agent_scope())
                .await?;
            println!(
                "Total: {}  Active: {}",
                applications.len(),
                count_applications(&applications, ApplicationStatus::Active)
            );
            let hits = search_applications(&applications, search, filter);
            if hits.is_empty() {
                println!("No applications found");
            }
            for app in hits {
                println!(
                    "{}  {}  {}  {}, {}  {}  {}  {}",
                    app.application_number,
                    app.customer_name,
                    app.customer_phone,
                    app.physical_address.building,
                    app.physical_address.area,
                    app.package_name,
                    status_label(app.status.as_str()),
                    format_date(&app.submitted_at)
                );
            }
        }
        Command::Salesmen { search } => {
            let api = data_access(&args, &config)?;
            let session = require_dealer(login(&args, &config)?)?;
            let salesmen = api.get_salesmen(session.dealer_id).await?;
            println!("Total: {}", salesmen.len());
            let hits = search_salesmen(&salesmen, search);
            if hits.is_empty() {
                println!("No salesmen found");
            }
            for salesman in hits {
                println!(
                    "{}  {}  {}  {}  sales {}  {}  {}",
                    salesman.agent_id,
                    salesman.name,
                    salesman.email,
                    salesman.phone,
                    salesman.total_sales,
                    format_ksh(salesman.total_commission),
                    if salesman.is_active { "Active" } else { "Inactive" }
                );
            }
        }
        Command::Leaderboard { by } => {
            let api = data_access(&args, &config)?;
            let session = require_dealer(login(&args, &config)?)?;
            let rank_by: RankBy = by.parse()?;
            let salesmen = api.get_salesmen(session.dealer_id).await?;
            let board = Leaderboard::build(&salesmen, rank_by);
            for entry in &board.entries {
                println!(
                    "#{} {:?}  {}  sales {}  {}",
                    entry.rank,
                    entry.tier,
                    entry.salesman.name,
                    entry.salesman.total_sales,
                    format_ksh(entry.salesman.total_commission)
                );
            }
            let top_name = board
                .entries
                .first()
                .map_or("N/A", |entry| entry.salesman.name.as_str());
            println!("Top performer: {} ({} sales)", top_name, board.top_sales);
            println!("Average sales: {}", board.average_sales);
        }
        Command::Commissions { period } => {
            let api = data_access(&args, &config)?;
            let session = login(&args, &config)?;
            let commissions = api
                .get_commissions(session.dealer_id, session.agent_scope())
                .await?;
            let period = match period {
                Some(period) => period.clone(),
                None => homefaiba_sales::reports::commissions::periods(&commissions)
                    .into_iter()
                    .next()
                    .unwrap_or_default(),
            };
            let summary = CommissionSummary::for_period(&commissions, &period);
            if summary.statements.is_empty() {
                println!("No commission data for this period");
            }
            for c in &summary.statements {
                println!(
                    "#{}  {}  sales {}  activations {}  rate {}  {}  {}",
                    c.id,
                    c.agent_name,
                    c.total_sales,
                    c.successful_activations,
                    format_percent(c.commission_rate * 100.0),
                    format_ksh(c.total_commission),
                    if c.paid { "Paid" } else { "Unpaid" }
                );
            }
            println!("Period {}", summary.period);
            println!("   Revenue: {}", format_ksh(summary.total_revenue));
            println!("   Commission: {}", format_ksh(summary.total_commission));
            println!("   Activation rate: {}", format_percent(summary.activation_rate));
            println!("   Unpaid statements: {}", summary.unpaid_count);
        }
        Command::MarkPaid { id } => {
            let api = data_access(&args, &config)?;
            require_dealer(login(&args, &config)?)?;
            let commission = api.mark_commission_paid(*id).await?;
            println!("Commission for {} marked as paid", commission.agent_name);
        }
        Command::Installations { status } => {
            let api = data_access(&args, &config)?;
            let session = login(&args, &config)?;
            let agent_id = session.require_agent_id()?;
            let filter: StatusFilter<InstallationStatus> = status.parse()?;
            let installations = api.get_installations(agent_id).await?;
            println!(
                "Total: {}  Completed: {}",
                installations.len(),
                count_installations(&installations, InstallationStatus::Completed)
            );
            for installation in filter_installations(&installations, filter) {
                println!(
                    "{}  {}  {}  {}  {}  {}",
                    installation.application_number,
                    installation.customer_name,
                    installation.customer_phone,
                    installation.address,
                    status_label(installation.status.as_str()),
                    installation
                        .scheduled_date
                        .as_deref()
                        .map(format_date)
                        .unwrap_or_default()
                );
            }
        }
        Command::Cancel { id } => {
            let api = data_access(&args, &config)?;
            login(&args, &config)?;
            let application = api.cancel_application(*id).await?;
            println!("Application {} cancelled", application.application_number);
        }
        Command::Deactivate { id } => {
            let api = data_access(&args, &config)?;
            require_dealer(login(&args, &config)?)?;
            let salesman = api.deactivate_salesman(*id).await?;
            println!("{} deactivated", salesman.name);
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    if let Err(e) = run(args).await {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
