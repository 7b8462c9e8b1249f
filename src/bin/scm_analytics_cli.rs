use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{anyhow, Context, Result};
use chrono::Utc;
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use rand::rngs::StdRng;
use rand::SeedableRng;
use scm_analytics::{
    config::{init_tracing, load_config},
    models::{validate_records, Order, Product, Supplier},
    reports::{ReportFormat, ReportTable},
    services::{reports, simulation},
    AnalyticsService, FileAnalysisOutcome,
};
use serde::{de::DeserializeOwned, Serialize};
use tracing::debug;
use validator::Validate;

fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = load_config().context("failed to load configuration")?;
    if let Some(level) = &cli.log_level {
        config.log_level = level.clone();
    }
    init_tracing(config.log_level(), config.log_json);
    debug!(environment = %config.environment, "configuration loaded");

    let service = AnalyticsService::new(config);
    match cli.command {
        Commands::Forecast(args) => handle_forecast(&service, args, cli.json),
        Commands::Abc(args) => handle_abc(&service, args, cli.json),
        Commands::Eoq(args) => handle_eoq(&service, args, cli.json),
        Commands::Suppliers(args) => handle_suppliers(&service, args, cli.json),
        Commands::AnalyzeFile(args) => handle_analyze_file(&service, args),
        Commands::Dashboard(args) => handle_dashboard(&service, args, cli.json),
        Commands::Report(args) => handle_report(args, cli.json),
        Commands::Simulate(args) => handle_simulate(args, cli.json),
    }
}

#[derive(Parser)]
#[command(
    name = "scm-analytics",
    about = "Supply-chain analytics over JSON record files",
    version
)]
struct Cli {
    #[arg(
        long,
        global = true,
        action = ArgAction::SetTrue,
        help = "Render command output as pretty JSON"
    )]
    json: bool,
    #[arg(long, global = true, help = "Override the configured log level")]
    log_level: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Project daily demand for one product
    Forecast(ForecastArgs),
    /// Classify products into A/B/C value classes
    Abc(ProductsArgs),
    /// Economic order quantity and stock triage per product
    Eoq(ProductsArgs),
    /// Assign supplier risk tiers
    Suppliers(SuppliersArgs),
    /// Summarize a CSV or Excel file
    AnalyzeFile(AnalyzeFileArgs),
    /// Revenue, catalog and supplier headline figures
    Dashboard(DashboardArgs),
    /// Build an orders or inventory export table
    Report(ReportArgs),
    /// Generate one random purchase order
    Simulate(SimulateArgs),
}

#[derive(Args)]
struct ForecastArgs {
    #[arg(long, help = "Product to forecast")]
    product_id: i64,
    #[arg(long, help = "Path to a JSON array of orders")]
    orders: PathBuf,
    #[arg(long, help = "Days to project; defaults to the configured horizon")]
    horizon: Option<u32>,
}

#[derive(Args)]
struct ProductsArgs {
    #[arg(long, help = "Path to a JSON array of products")]
    products: PathBuf,
}

#[derive(Args)]
struct SuppliersArgs {
    #[arg(long, help = "Path to a JSON array of suppliers")]
    suppliers: PathBuf,
}

#[derive(Args)]
struct AnalyzeFileArgs {
    /// File to analyze (.csv, .xls or .xlsx)
    path: PathBuf,
}

#[derive(Args)]
struct DashboardArgs {
    #[arg(long)]
    products: PathBuf,
    #[arg(long)]
    orders: PathBuf,
    #[arg(long)]
    suppliers: PathBuf,
}

#[derive(Clone, Copy, ValueEnum)]
enum ReportKind {
    Orders,
    Inventory,
}

#[derive(Args)]
struct ReportArgs {
    #[arg(value_enum)]
    kind: ReportKind,
    #[arg(long, default_value = "excel", help = "Export format: excel or pdf")]
    format: String,
    #[arg(long)]
    products: PathBuf,
    #[arg(long)]
    suppliers: PathBuf,
    #[arg(long, help = "Orders file; required for the orders report")]
    orders: Option<PathBuf>,
}

#[derive(Args)]
struct SimulateArgs {
    #[arg(long)]
    products: PathBuf,
    #[arg(long)]
    suppliers: PathBuf,
    #[arg(long, help = "Existing orders, used to pick the next id")]
    orders: Option<PathBuf>,
    #[arg(long, help = "Seed for a reproducible order")]
    seed: Option<u64>,
}

fn handle_forecast(service: &AnalyticsService, args: ForecastArgs, json: bool) -> Result<()> {
    let orders: Vec<Order> = read_records(&args.orders)?;
    let horizon = args.horizon.unwrap_or(service.config().forecast_horizon);
    let forecast = service.forecast_with_horizon(args.product_id, horizon, &orders)?;

    if json {
        return print_json(&forecast);
    }
    println!("Demand forecast for product {}", args.product_id);
    for point in forecast.points() {
        println!("- {} • {:.2}", point.date, point.predicted_quantity);
    }
    Ok(())
}

fn handle_abc(service: &AnalyticsService, args: ProductsArgs, json: bool) -> Result<()> {
    let products: Vec<Product> = read_records(&args.products)?;
    let records = service.abc(&products);

    if json {
        return print_json(&records);
    }
    for r in &records {
        println!("- [{}] {} ({}) • value {:.2}", r.class, r.name, r.product_id, r.value);
    }
    Ok(())
}

fn handle_eoq(service: &AnalyticsService, args: ProductsArgs, json: bool) -> Result<()> {
    let products: Vec<Product> = read_records(&args.products)?;
    let records = service.eoq(&products);

    if json {
        return print_json(&records);
    }
    for r in &records {
        println!(
            "- {} ({}) • stock {} • eoq {:.1} • {}",
            r.name, r.id, r.current_stock, r.eoq, r.status
        );
    }
    Ok(())
}

fn handle_suppliers(service: &AnalyticsService, args: SuppliersArgs, json: bool) -> Result<()> {
    let suppliers: Vec<Supplier> = read_records(&args.suppliers)?;
    let rows = service.classify_suppliers(&suppliers);

    if json {
        return print_json(&rows);
    }
    for r in &rows {
        println!(
            "- {} ({}) • score {:.1} • delivery {:.1}d • defects {:.2}% • {} (predicted {})",
            r.name,
            r.id,
            r.reliability_score,
            r.delivery_time,
            r.defect_rate,
            r.tier,
            r.predicted_tier
        );
    }
    Ok(())
}

fn handle_analyze_file(service: &AnalyticsService, args: AnalyzeFileArgs) -> Result<()> {
    let bytes = fs::read(&args.path)
        .with_context(|| format!("failed to read {}", args.path.display()))?;
    let filename = args
        .path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| anyhow!("{} has no usable file name", args.path.display()))?;

    let outcome = service.analyze_file(&bytes, filename);
    print_json(&outcome)?;
    match outcome {
        FileAnalysisOutcome::Success(_) => Ok(()),
        FileAnalysisOutcome::Failure(body) => Err(anyhow!(body.error)),
    }
}

fn handle_dashboard(service: &AnalyticsService, args: DashboardArgs, json: bool) -> Result<()> {
    let products: Vec<Product> = read_records(&args.products)?;
    let orders: Vec<Order> = read_records(&args.orders)?;
    let suppliers: Vec<Supplier> = read_records(&args.suppliers)?;
    let stats = service.dashboard(&products, &orders, &suppliers);

    if json {
        return print_json(&stats);
    }
    println!("Total revenue:    {}", stats.total_revenue);
    println!("Total products:   {}", stats.total_products);
    println!("Low stock alerts: {}", stats.low_stock_alerts);
    println!("Active suppliers: {}", stats.active_suppliers);
    Ok(())
}

fn handle_report(args: ReportArgs, json: bool) -> Result<()> {
    let format: ReportFormat = args.format.parse()?;
    let products: Vec<Product> = read_records(&args.products)?;
    let suppliers: Vec<Supplier> = read_records(&args.suppliers)?;

    let table = match args.kind {
        ReportKind::Orders => {
            let path = args
                .orders
                .as_deref()
                .ok_or_else(|| anyhow!("--orders is required for the orders report"))?;
            let orders: Vec<Order> = read_records(path)?;
            reports::orders_report(&orders, &products, &suppliers)
        }
        ReportKind::Inventory => reports::inventory_report(&products, &suppliers),
    };

    if json {
        return print_json(&table.to_records());
    }
    render_table_header(&table, format);
    print!("{}", table.to_csv()?);
    Ok(())
}

fn render_table_header(table: &ReportTable, format: ReportFormat) {
    eprintln!(
        "{} • {} rows • {} ({})",
        table.title,
        table.len(),
        table.file_name(format),
        format.mime_type()
    );
}

fn handle_simulate(args: SimulateArgs, json: bool) -> Result<()> {
    let products: Vec<Product> = read_records(&args.products)?;
    let suppliers: Vec<Supplier> = read_records(&args.suppliers)?;
    let orders: Vec<Order> = match &args.orders {
        Some(path) => read_records(path)?,
        None => Vec::new(),
    };
    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let Some(sim) = simulation::simulate_order(&products, &suppliers, &orders, &mut rng, Utc::now())
    else {
        println!("No products or suppliers to simulate orders with.");
        return Ok(());
    };

    if json {
        return print_json(&sim);
    }
    println!(
        "Random order {} generated • {} x{} • {}",
        sim.order.id, sim.product_name, sim.order.quantity, sim.order.status
    );
    if let Some(level) = sim.new_stock_level {
        println!("Stock for product {} is now {}", sim.order.product_id, level);
    }
    Ok(())
}

fn read_records<T>(path: &Path) -> Result<Vec<T>>
where
    T: DeserializeOwned + Validate,
{
    let data = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let records: Vec<T> = serde_json::from_str(&data)
        .with_context(|| format!("failed to parse {}", path.display()))?;
    validate_records(&records).with_context(|| format!("invalid records in {}", path.display()))?;
    Ok(records)
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
