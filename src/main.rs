mod backend;
mod charts;
mod config;
mod handlers;
mod markdown;
mod model;
mod page;
mod preferences;
mod prompt;
mod reformatter;
mod session;
mod utils;

use backend::HttpQueryService;
use charts::HtmlChartRenderer;
use clap::{Parser, Subcommand, ValueEnum};
use config::{load_config_or_default, AppConfig};
use handlers::{Action, Context, Dispatcher, FormSnapshot, Outcome};
use page::BufferedPage;
use preferences::{render_listing, render_select, BRANDS, BUDGET_RANGES, CATEGORIES};
use reformatter::Reformatter;
use session::Session;
use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "shopfin-dash")]
#[command(about = "Shopping recommendations and stock analysis from the dashboard backends")]
struct Cli {
    /// Path to the JSON config file
    #[arg(long, global = true, default_value = "config.json")]
    config: String,
    /// Print the raw region HTML instead of terminal text
    #[arg(long, global = true)]
    html: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Ask the shopping backend for product recommendations
    Shop {
        #[arg(long)]
        category: Option<String>,
        /// Specific item within the category
        #[arg(long)]
        item: Option<String>,
        /// Preference values (comma-separated)
        #[arg(long = "pref", value_delimiter = ',')]
        preferences: Vec<String>,
        /// Budget range, e.g. "1000-5000" or "50000+"
        #[arg(long)]
        budget: Option<String>,
        #[arg(long)]
        brand: Option<String>,
        /// Additional requirements
        #[arg(long)]
        notes: Option<String>,
    },
    /// List the preference options for a category
    Preferences {
        #[arg(long)]
        category: String,
        /// Already selected values (comma-separated)
        #[arg(long, value_delimiter = ',')]
        selected: Vec<String>,
    },
    /// Stock price, analyst, company and news reports
    Stock {
        ticker: Option<String>,
        #[arg(long, value_enum, default_value = "all")]
        view: StockView,
    },
    /// Free-form analysis prompt for the finance backend
    Analyze { prompt: Option<String> },
    /// Price, volume or technical indicator chart
    Chart {
        ticker: Option<String>,
        #[arg(long, value_enum, default_value = "price")]
        kind: ChartKind,
    },
    /// Stocks grouped by sector
    Stocks {
        /// Only stocks whose ticker or name contains this text
        #[arg(long)]
        filter: Option<String>,
    },
    /// List the categories, budget ranges and brands the shop search knows
    Options,
    /// Reformat recommendation HTML from a file or stdin, offline
    Reformat {
        #[arg(long)]
        input: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum StockView {
    Price,
    Recommendations,
    Info,
    News,
    All,
}

impl StockView {
    fn actions(self) -> Vec<Action> {
        match self {
            StockView::Price => vec![Action::StockPrice],
            StockView::Recommendations => vec![Action::AnalystRecommendations],
            StockView::Info => vec![Action::CompanyInfo],
            StockView::News => vec![Action::CompanyNews],
            StockView::All => vec![
                Action::StockPrice,
                Action::AnalystRecommendations,
                Action::CompanyInfo,
                Action::CompanyNews,
            ],
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum ChartKind {
    Price,
    Volume,
    Technical,
}

impl ChartKind {
    fn action(self) -> Action {
        match self {
            ChartKind::Price => Action::PriceTrends,
            ChartKind::Volume => Action::VolumeAnalysis,
            ChartKind::Technical => Action::TechnicalIndicators,
        }
    }
}

/// Adds a field only when a value was given, so absent flags read as blank controls.
fn field(form: FormSnapshot, name: &str, value: Option<String>) -> FormSnapshot {
    match value {
        Some(v) => form.with(name, v),
        None => form,
    }
}

/// Translates a subcommand into the actions it fires, in order.
fn requests(command: Commands) -> Vec<(Action, FormSnapshot)> {
    match command {
        Commands::Shop { category, item, preferences, budget, brand, notes } => {
            let mut form = FormSnapshot::new();
            for pref in preferences {
                form = form.with("preferences", pref);
            }
            form = field(form, "category", category);
            form = field(form, "item", item);
            form = field(form, "budget", budget);
            form = field(form, "brand", brand);
            form = field(form, "notes", notes);
            vec![(Action::ShopSearch, form)]
        }
        Commands::Preferences { category, selected } => {
            let form = selected
                .into_iter()
                .fold(FormSnapshot::new().with("category", category), |form, value| {
                    form.with("preferences", value)
                });
            vec![(Action::CategoryChanged, form)]
        }
        Commands::Stock { ticker, view } => {
            let form = field(FormSnapshot::new(), "ticker", ticker);
            view.actions()
                .into_iter()
                .map(|action| (action, form.clone()))
                .collect()
        }
        Commands::Analyze { prompt } => {
            vec![(Action::CustomAnalysis, field(FormSnapshot::new(), "prompt", prompt))]
        }
        Commands::Chart { ticker, kind } => {
            vec![(kind.action(), field(FormSnapshot::new(), "ticker", ticker))]
        }
        Commands::Stocks { filter } => {
            vec![(Action::LoadStocks, field(FormSnapshot::new(), "filter", filter))]
        }
        Commands::Options | Commands::Reformat { .. } => Vec::new(),
    }
}

fn shop_options(html: bool) -> String {
    let catalogues = [
        ("category", "Categories", &CATEGORIES[..]),
        ("budget", "Budget ranges", &BUDGET_RANGES[..]),
        ("brand", "Brands", &BRANDS[..]),
    ];
    catalogues
        .iter()
        .map(|(id, title, choices)| {
            if html {
                format!("<select id=\"{id}\">\n{}</select>\n", render_select(choices, None))
            } else {
                render_listing(title, choices)
            }
        })
        .collect()
}

fn reformat_input(input: Option<PathBuf>, config: &AppConfig) -> ExitCode {
    let reformatter = match Reformatter::with_keywords(&config.feature_keywords) {
        Ok(r) => r,
        Err(e) => {
            error!("Invalid feature keywords: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let html = match input {
        Some(path) => fs::read_to_string(&path),
        None => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf).map(|_| buf)
        }
    };
    match html {
        Ok(html) => {
            print!("{}", reformatter.reformat(&html));
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Cannot read input: {}", e);
            ExitCode::FAILURE
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    // Logs go to stderr; stdout carries only the rendered output
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    std::panic::set_hook(Box::new(|panic_info| {
        error!("😱 Panic occurred: {}", panic_info);
    }));

    let cli = Cli::parse();

    let config = match load_config_or_default(&cli.config) {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Config load error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if let Commands::Options = cli.command {
        print!("{}", shop_options(cli.html));
        return ExitCode::SUCCESS;
    }
    if let Commands::Reformat { input } = cli.command {
        return reformat_input(input, &config);
    }

    let backend = match HttpQueryService::new(&config.backend) {
        Ok(b) => b,
        Err(e) => {
            error!("Failed to build HTTP client: {}", e);
            return ExitCode::FAILURE;
        }
    };
    let dispatcher = match Dispatcher::standard(&config) {
        Ok(d) => d,
        Err(e) => {
            error!("Failed to set up handlers: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let mut session = Session::new();
    let mut page = BufferedPage::new();
    let mut ctx = Context {
        backend: &backend,
        session: &mut session,
        charts: &HtmlChartRenderer,
    };

    let mut all_rendered = true;
    for (action, form) in requests(cli.command) {
        let outcome = dispatcher.dispatch(action, &form, &mut ctx, &mut page).await;
        info!("{:?} finished: {:?}", action, outcome);
        all_rendered &= outcome == Outcome::Rendered;
    }

    for alert in page.alerts() {
        eprintln!("⚠️  {}", alert);
    }
    if cli.html {
        print!("{}", page.render_html());
    } else {
        print!("{}", page.render_text());
    }

    if all_rendered {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
