//! Newsroom CLI
//!
//! Decorates the blocks of a saved page and queries article indexes.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use newsroom::{
    error::Result,
    models::{Config, SortKey},
    page::decorate_page,
    pipeline::{Action, FilterOptions, SearchInput, spawn_search_debouncer},
    services::{ArticleFetcher, HttpIndexSource, IndexSource, MemoryIndexSource},
};
use url::Url;

/// Newsroom - news block renderer
#[derive(Parser, Debug)]
#[command(
    name = "newsroom",
    version,
    about = "Decorates news site blocks from query indexes"
)]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "storage/config.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Decorate every supported block of a saved page
    Render {
        /// Page HTML file
        page: PathBuf,

        /// URL the page is served from (default: site origin)
        #[arg(long)]
        url: Option<Url>,

        /// Serve every query index from this local JSON file
        #[arg(long)]
        index: Option<PathBuf>,

        /// Select a facet tag in collection blocks
        #[arg(long)]
        tag: Option<String>,

        /// Type a search query into collection blocks
        #[arg(long)]
        search: Option<String>,

        /// Go to a page of collection blocks
        #[arg(long = "page")]
        page_number: Option<usize>,
    },

    /// Fetch articles and print them as JSON
    Query {
        /// Query index URLs or paths (default: the site's news index)
        #[arg(long = "source")]
        sources: Vec<String>,

        /// Serve every query index from this local JSON file
        #[arg(long)]
        index: Option<PathBuf>,

        /// Only featured articles
        #[arg(long)]
        featured: bool,

        #[arg(long)]
        category: Option<String>,

        #[arg(long)]
        tag: Option<String>,

        /// Generic `field:value` filter
        #[arg(long)]
        filter: Option<String>,

        /// Article paths to leave out
        #[arg(long = "exclude")]
        exclude: Vec<String>,

        /// `date` or `title`
        #[arg(long)]
        sort: Option<String>,

        /// Maximum number of articles (0 = all)
        #[arg(long, default_value_t = 0)]
        limit: usize,
    },

    /// Validate the configuration file
    Validate,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .target(env_logger::Target::Stderr)
        .init();
}

/// Build a fetcher for pages at `page_url`, offline when `index` is given.
fn build_fetcher(config: &Config, page_url: Url, index: Option<&Path>) -> Result<ArticleFetcher> {
    let source: Arc<dyn IndexSource> = match index {
        Some(path) => {
            log::info!("Serving query indexes from {}", path.display());
            Arc::new(MemoryIndexSource::from_file(path)?)
        }
        None => Arc::new(HttpIndexSource::new(&config.http)?),
    };
    Ok(ArticleFetcher::new(source, page_url, config.site.news_index.clone()))
}

/// Feed a query through the search debouncer as if it had been typed.
async fn typed_search(query: String, delay: Duration) -> Option<Action> {
    let (input, mut actions) = spawn_search_debouncer(delay);
    input.send(SearchInput::Changed(query)).await.ok()?;
    actions.recv().await
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = Config::load_or_default(&cli.config);
    log::debug!("Loaded configuration from {}", cli.config.display());

    match cli.command {
        Command::Render {
            page,
            url,
            index,
            tag,
            search,
            page_number,
        } => {
            let page_url = match url {
                Some(url) => url,
                None => config.site.origin_url()?,
            };
            let html = tokio::fs::read_to_string(&page).await?;
            let fetcher = build_fetcher(&config, page_url.clone(), index.as_deref())?;

            let mut decorated = decorate_page(&html, page_url, &fetcher, &config).await?;

            let mut actions = Vec::new();
            if let Some(tag) = tag {
                actions.push(Action::SelectTag(tag));
            }
            if let Some(query) = search {
                actions.extend(typed_search(query, config.collection.search_debounce()).await);
            }
            if let Some(page_number) = page_number {
                actions.push(Action::GoToPage(page_number));
            }

            for block in &mut decorated.blocks {
                for action in &actions {
                    block.dispatch(action.clone(), None);
                }
            }

            log::info!("Decorated {} blocks", decorated.blocks.len());
            println!("{}", decorated.to_html());
        }

        Command::Query {
            sources,
            index,
            featured,
            category,
            tag,
            filter,
            exclude,
            sort,
            limit,
        } => {
            let fetcher = build_fetcher(&config, config.site.origin_url()?, index.as_deref())?;
            let options = FilterOptions {
                featured,
                category,
                tag,
                filter,
                exclude_paths: exclude.into_iter().collect(),
                sort_by: sort.as_deref().and_then(SortKey::parse),
                limit,
            };

            let articles = fetcher.fetch_news_articles(&sources, &options).await;
            log::info!("Fetched {} articles", articles.len());
            println!("{}", serde_json::to_string_pretty(&articles)?);
        }

        Command::Validate => {
            log::info!("Validating configuration...");

            if let Err(e) = config.validate() {
                log::error!("Config validation failed: {}", e);
                return Err(e);
            }
            log::info!("✓ Config OK");
        }
    }

    Ok(())
}
