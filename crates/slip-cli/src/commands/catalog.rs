//! Catalog command - browse the product master.

use std::path::PathBuf;

use clap::{Args, Subcommand};
use console::style;

use slip_core::models::catalog::category_label;
use slip_core::{Catalog, ProductCatalogEntry};

use super::{load_catalog, load_config};

/// Arguments for the catalog command.
#[derive(Args)]
pub struct CatalogArgs {
    #[command(subcommand)]
    command: CatalogCommand,

    /// Custom products JSON merged into the catalog
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,
}

#[derive(Subcommand)]
enum CatalogCommand {
    /// List products
    List {
        /// Only products with this category tag (e.g. "QS", "L")
        #[arg(long)]
        category: Option<String>,

        /// Print the list as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show one product by code
    Show {
        /// Product code
        code: String,
    },
}

pub async fn run(args: CatalogArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let catalog = load_catalog(&config, args.catalog.as_deref())?;

    match args.command {
        CatalogCommand::List { category, json } => list_products(&catalog, category.as_deref(), json),
        CatalogCommand::Show { code } => show_product(&catalog, &code),
    }
}

fn list_products(catalog: &Catalog, category: Option<&str>, json: bool) -> anyhow::Result<()> {
    let products: Vec<&ProductCatalogEntry> = match category {
        Some(tag) => catalog.by_category(tag).collect(),
        None => catalog.iter().collect(),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&products)?);
        return Ok(());
    }

    for product in &products {
        println!(
            "{}  {:<6}  ¥{:>6}  {}",
            product.code, product.category, product.price, product.name
        );
    }

    println!();
    println!("{} {} products", style("ℹ").blue(), products.len());

    Ok(())
}

fn show_product(catalog: &Catalog, code: &str) -> anyhow::Result<()> {
    let product = catalog
        .find_by_code(code)
        .ok_or_else(|| anyhow::anyhow!("Product not found: {}", code))?;

    println!("Code:     {}", product.code);
    println!("Name:     {}", product.name);
    println!("Price:    ¥{}", product.price);
    println!(
        "Category: {} ({})",
        product.category,
        category_label(&product.category)
    );

    match Catalog::builtin_section(&product.code) {
        Some(section) => {
            println!("Section:  {}", section.display_name());
            println!("Tax rate: {}%", section.tax_rate());
        }
        None => println!("Section:  {}", style("custom").yellow()),
    }

    Ok(())
}
