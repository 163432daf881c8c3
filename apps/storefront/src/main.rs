use std::sync::Arc;

use anyhow::Result;
use catalog_core::{
    CatalogBrowser, CatalogEvent, CatalogService, CatalogView, ProductListing, StorefrontClient,
};
use clap::Parser;
use shared::domain::CategoryId;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;

mod config;
mod events;

use config::load_settings;
use events::describe_failure;

#[derive(Parser, Debug)]
struct Args {
    #[arg(long)]
    api_url: Option<String>,
    #[arg(long)]
    width: Option<usize>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().init();
    let args = Args::parse();

    let mut settings = load_settings();
    if let Some(api_url) = args.api_url {
        settings.api_base_url = api_url;
    }
    if let Some(width) = args.width.filter(|width| *width >= 1) {
        settings.strip_width = width;
    }

    info!(
        api = %settings.api_base_url,
        width = settings.strip_width,
        "storefront starting"
    );

    let client = Arc::new(StorefrontClient::new(settings.api_base_url.clone()));
    let service = CatalogService::new_with_browser(
        client.clone(),
        client,
        CatalogBrowser::new(settings.strip_width),
    );

    let mut events = service.subscribe_events();
    let printer = tokio::spawn(async move {
        while let Ok(event) = events.recv().await {
            if let CatalogEvent::Error(message) = event {
                eprintln!("{}", describe_failure(&message));
            }
        }
    });

    service.refresh().await;

    println!("commands: n(ext) p(rev) s <category-id> c(lear) r(efresh) q(uit)");
    render(&service.view().await);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match line.split_whitespace().collect::<Vec<_>>().as_slice() {
            ["q"] | ["quit"] => break,
            ["n"] | ["next"] => service.show_next().await,
            ["p"] | ["prev"] => service.show_prev().await,
            ["c"] | ["clear"] => service.clear_selection().await,
            ["r"] | ["refresh"] => service.refresh().await,
            ["s", id] | ["select", id] => match id.parse::<i64>() {
                Ok(id) => service.select_category(CategoryId(id)).await,
                Err(_) => println!("category id must be numeric"),
            },
            [] => {}
            other => println!("unknown command: {}", other.join(" ")),
        }
        render(&service.view().await);
    }

    printer.abort();
    Ok(())
}

fn render(view: &CatalogView) {
    let strip = &view.strip;
    if strip.categories.is_empty() {
        println!("(no categories loaded)");
    } else {
        let entries = strip
            .categories
            .iter()
            .map(|category| {
                let marker = if view.selection == Some(category.category_id) {
                    "*"
                } else {
                    ""
                };
                format!("[{}{} {}]", marker, category.category_id.0, category.label)
            })
            .collect::<Vec<_>>()
            .join(" ");
        let prev = if strip.has_prev { "<" } else { " " };
        let next = if strip.has_next { ">" } else { " " };
        println!("{prev} {entries} {next}");
    }

    match &view.listing {
        ProductListing::Loading => println!("  loading products..."),
        ProductListing::Empty => println!("  no products match the current selection"),
        ProductListing::Populated(products) => {
            for product in products {
                println!(
                    "  #{} {} ${}.{:02} (listed {})",
                    product.product_id.0,
                    product.name,
                    product.price_cents / 100,
                    product.price_cents % 100,
                    product.listed_at.format("%Y-%m-%d")
                );
            }
        }
    }
}
