//! Catalog commands.

use anyhow::Result;
use cakeshop_catalog::{Category, Tier};
use serde::Serialize;

use super::{CatalogArgs, CatalogCommand};
use crate::context::Context;
use crate::output::truncate;

/// Run the catalog command.
pub async fn run(args: CatalogArgs, ctx: &Context) -> Result<()> {
    match args.command {
        CatalogCommand::Categories => list_categories(ctx).await,
    }
}

#[derive(Serialize)]
struct CategoryView<'a> {
    #[serde(flatten)]
    category: &'a Category,
    image_url: String,
}

#[derive(Serialize)]
struct CategoriesView<'a> {
    served_by: &'static str,
    categories: Vec<CategoryView<'a>>,
}

async fn list_categories(ctx: &Context) -> Result<()> {
    let chain = ctx.catalog_chain()?;
    let base_url = &ctx.config.catalog.base_url;

    let spinner = ctx.output.spinner("Fetching categories...");
    let response = chain.categories().await;
    spinner.finish_and_clear();

    for failure in &response.failures {
        ctx.output
            .debug(&format!("{} tier failed: {}", failure.tier, failure.error));
    }

    if ctx.output.is_json() {
        ctx.output.json(&CategoriesView {
            served_by: response.served_by.name(),
            categories: response
                .categories
                .iter()
                .map(|category| CategoryView {
                    category,
                    image_url: category.image_url(base_url),
                })
                .collect(),
        });
        return Ok(());
    }

    ctx.output.header("Categories");

    if response.served_by == Tier::Mock {
        ctx.output
            .warn("All catalog endpoints failed; showing built-in categories");
    } else if ctx.output.is_verbose() || response.served_by != Tier::Primary {
        ctx.output
            .info(&format!("Served by the {} endpoint", response.served_by));
    }

    if response.categories.is_empty() {
        ctx.output.info("No categories");
        return Ok(());
    }

    let widths = [8, 20, 40];
    for category in &response.categories {
        ctx.output.table_row(
            &[
                category.id.as_str(),
                truncate(&category.name, widths[1]).as_str(),
                truncate(&category.description, widths[2]).as_str(),
            ],
            &widths,
        );
        ctx.output.debug(&category.image_url(base_url));
    }

    Ok(())
}
