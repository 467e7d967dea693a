//! Nova Search CLI - aggregated multi-source search from the command line.

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use nova_search::{
    server::{router, AppState},
    Category, Config, InsightsClient, SearchRequest, SearchService,
};

/// Nova Search - multi-source search aggregation CLI and server
#[derive(Parser)]
#[command(name = "nova-search")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run an aggregated search
    Search(SearchArgs),

    /// Run the HTTP server
    Serve(ServeArgs),

    /// List available search providers
    Providers,
}

#[derive(Parser)]
struct SearchArgs {
    /// Search query
    query: String,

    /// Source category (all, web, news, video, image, code, academic, community)
    #[arg(short = 't', long, default_value = "all")]
    category: Category,

    /// Maximum number of results to display
    #[arg(short, long, default_value = "20")]
    limit: usize,

    /// Output format
    #[arg(short, long, default_value = "text")]
    format: OutputFormat,
}

#[derive(Parser)]
struct ServeArgs {
    /// Bind address (overrides NOVA_BIND_ADDR)
    #[arg(short, long)]
    bind: Option<String>,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Human-readable text output
    Text,
    /// JSON output
    Json,
    /// Compact single-line output
    Compact,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Search(args) => run_search(args).await,
        Commands::Serve(args) => run_serve(args).await,
        Commands::Providers => list_providers(),
    }
}

fn list_providers() -> Result<()> {
    println!("Available search providers:\n");
    println!("  Keyless:");
    println!("    ddg      - DuckDuckGo (instant answers)");
    println!("    wiki     - Wikipedia");
    println!("    gh       - GitHub repositories");
    println!("    so       - Stack Overflow");
    println!("    hn       - Hacker News");
    println!("    rd       - Reddit");
    println!();
    println!("  Requires SERP_API_KEY:");
    println!("    web      - Google web search");
    println!("    news     - Google News");
    println!("    video    - YouTube");
    println!("    image    - Google Images");
    println!("    academic - Google Scholar");
    println!();
    println!("Usage: nova-search search \"query\" -t code");
    Ok(())
}

async fn run_search(args: SearchArgs) -> Result<()> {
    let config = Config::from_env();
    let service = SearchService::from_config(&config)?;

    let request = SearchRequest::new(&args.query)
        .with_category(args.category)
        .with_limit(args.limit)
        .with_session_id(uuid::Uuid::new_v4().to_string());
    let response = service.search(request).await?;

    match args.format {
        OutputFormat::Text => {
            println!(
                "\nSearch results for \"{}\" ({} of {} results, sources: {}):\n",
                response.query,
                response.results.len(),
                response.total,
                response.sources.join(", ")
            );

            for (i, result) in response.results.iter().enumerate() {
                println!("{}. {}", i + 1, result.title);
                println!("   URL: {}", result.url);
                if !result.description.is_empty() {
                    let description: String = result.description.chars().take(150).collect();
                    if description.len() < result.description.len() {
                        println!("   {}...", description);
                    } else {
                        println!("   {}", description);
                    }
                }
                println!("   Source: {} | Relevance: {:.2}", result.source, result.relevance);
                println!();
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Compact => {
            for result in &response.results {
                println!("{}\t{}", result.title, result.url);
            }
        }
    }

    Ok(())
}

async fn run_serve(args: ServeArgs) -> Result<()> {
    let mut config = Config::from_env();
    if let Some(bind) = args.bind {
        config.bind_addr = bind;
    }

    let service = SearchService::from_config(&config)?;
    let insights = config.openai_api_key.as_ref().map(InsightsClient::new);
    let state = AppState::new(service, insights);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    println!("nova-search listening on {}", config.bind_addr);
    axum::serve(listener, router(state)).await?;

    Ok(())
}
