use clap::{Parser, Subcommand};
use log::debug;
use recipe_finder::display::{format_detail, format_results};
use recipe_finder::{ClientConfig, RecipeFinder, SearchForm};

#[derive(Parser)]
#[command(name = "recipe-finder", version, about = "Search recipes and show their details")]
struct Cli {
    /// API key (overrides RECIPE_FINDER__API_KEY and recipe_finder.toml)
    #[arg(long, global = true)]
    api_key: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Search the catalog
    Search {
        /// Recipe name or ingredients
        #[arg(long, default_value = "")]
        query: String,
        /// Cuisine type, e.g. Italian
        #[arg(long, default_value = "")]
        cuisine: String,
        /// Diet, e.g. Vegetarian
        #[arg(long, default_value = "")]
        diet: String,
        /// Maximum calories
        #[arg(long, default_value = "")]
        max_calories: String,
    },
    /// Show one recipe
    Show {
        /// Recipe id from search results
        id: i64,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let cli = Cli::parse();

    let config = ClientConfig::load_with_api_key(cli.api_key)?;
    debug!("Using recipe service at {}", config.base_url);
    let store = RecipeFinder::builder().config(config).build()?;

    match cli.command {
        Command::Search {
            query,
            cuisine,
            diet,
            max_calories,
        } => {
            let form = SearchForm {
                query,
                cuisine,
                diet,
                max_calories,
            };
            store.search(form.to_query()).await;
            println!("{}", format_results(&store.summaries()).trim_end());
        }
        Command::Show { id } => {
            store.fetch_detail(id).await;
            println!("{}", format_detail(store.detail().as_ref()).trim_end());
        }
    }

    Ok(())
}
