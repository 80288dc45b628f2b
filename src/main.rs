// src/main.rs
//
// Terminal front end: loads pages, waits for details, prints the filtered
// view, the page indicator and the preference state.

use anyhow::{Context, Result};
use clap::Parser;

use catalog_explorer::application::{CatalogExplorer, ItemCardDto, ToErrorResponse};
use catalog_explorer::config::ExplorerConfig;
use catalog_explorer::domain::{FilterCriteria, ItemId};

/// Browse the catalog with search, attribute filters and favorites
#[derive(Parser, Debug)]
#[command(name = "catalog-explorer")]
#[command(version)]
#[command(about = "Browse a paginated catalog with search, filters and favorites", long_about = None)]
struct Cli {
    /// Case-insensitive name search
    #[arg(short, long, value_name = "TEXT")]
    query: Option<String>,

    /// Required ability (repeatable; any match passes)
    #[arg(short, long, value_name = "NAME")]
    ability: Vec<String>,

    #[arg(long, value_name = "DM")]
    min_height: Option<u32>,

    #[arg(long, value_name = "DM")]
    max_height: Option<u32>,

    #[arg(long, value_name = "HG")]
    min_weight: Option<u32>,

    #[arg(long, value_name = "HG")]
    max_weight: Option<u32>,

    /// Number of pages to load
    #[arg(short, long, value_name = "N", default_value_t = 1)]
    pages: u32,

    /// Toggle an item in the favorites
    #[arg(short, long, value_name = "ID")]
    favorite: Option<ItemId>,

    /// Show the detail view for an item
    #[arg(long, value_name = "ID")]
    view: Option<ItemId>,

    /// Print JSON instead of text
    #[arg(long)]
    json: bool,
}

impl Cli {
    fn filter_criteria(&self) -> FilterCriteria {
        FilterCriteria {
            min_height: self.min_height,
            max_height: self.max_height,
            min_weight: self.min_weight,
            max_weight: self.max_weight,
            abilities: self.ability.iter().cloned().collect(),
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to build tokio runtime")?
        .block_on(run(cli))
}

async fn run(cli: Cli) -> Result<()> {
    // 1. CONFIGURATION
    let config = ExplorerConfig::from_env().context("Invalid configuration")?;

    // 2. COMPOSITION
    let explorer =
        CatalogExplorer::from_config(&config).context("Failed to initialize the explorer")?;
    explorer.hydrate_preferences();

    // 3. PAGES
    explorer
        .load_initial()
        .await
        .to_error_response()
        .map_err(anyhow::Error::msg)?;

    for _ in 1..cli.pages {
        if !explorer.has_next_page() {
            break;
        }
        explorer
            .advance()
            .await
            .to_error_response()
            .map_err(anyhow::Error::msg)?;
    }

    // 4. DETAILS
    explorer.settle_details().await;

    // 5. USER ACTIONS
    if let Some(id) = cli.favorite {
        let is_favorite = explorer.toggle_favorite(id);
        log::info!(
            "Item {} {} favorites",
            id,
            if is_favorite { "added to" } else { "removed from" }
        );
    }

    if let Some(query) = &cli.query {
        explorer.set_name_query(query.clone());
    }
    explorer.set_filter_criteria(cli.filter_criteria());

    let detail = match cli.view {
        Some(id) => Some(
            explorer
                .view_item(id)
                .await
                .to_error_response()
                .map_err(anyhow::Error::msg)?,
        ),
        None => None,
    };

    // 6. OUTPUT
    let cards = explorer.visible_cards();
    let indicator = explorer.page_indicator();
    let status = explorer.status();
    let preferences = explorer.preferences();

    if cli.json {
        let output = serde_json::json!({
            "items": cards,
            "page": indicator,
            "status": status,
            "preferences": preferences,
            "abilities": explorer.available_abilities(),
            "detail": detail,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    for card in &cards {
        println!("{}", format_card(card));
    }
    if cards.is_empty() {
        println!("No items match the current search and filters.");
    }

    println!();
    println!("{}", indicator.label());
    if status.is_fetching_details() {
        println!("Details still loading: {}", status.pending_details);
    }
    if !status.failed_details.is_empty() {
        println!("Details unavailable for: {:?}", status.failed_details);
    }

    if let Some(detail) = detail {
        println!();
        println!("{} {}", detail.display_number, detail.name);
        println!("  Height: {}", detail.height_label());
        println!("  Weight: {}", detail.weight_label());
        println!("  Types: {}", detail.types.join(", "));
        let abilities: Vec<&str> = detail.abilities.iter().map(|a| a.label.as_str()).collect();
        println!("  Abilities: {}", abilities.join(", "));
        for stat in &detail.stats {
            println!("  {:<16} {:>3}", stat.label, stat.base_value);
        }
    }

    println!();
    println!("Favorites: {:?}", preferences.favorites);
    println!("Recently viewed: {:?}", preferences.recently_viewed);

    Ok(())
}

fn format_card(card: &ItemCardDto) -> String {
    let marker = if card.is_favorite { "*" } else { " " };
    format!("{} {} {}", marker, card.display_number, card.name)
}
