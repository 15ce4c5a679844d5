//! Cart commands.

use anyhow::{bail, Context as _, Result};
use cakeshop_cart::{CartStore, CartTotals, Currency, HydrationSource, LineItem, Money, ProductId};
use dialoguer::Confirm;
use serde::Serialize;

use super::{CartArgs, CartCommand};
use crate::context::Context;
use crate::output::truncate;

/// Run the cart command.
pub async fn run(args: CartArgs, ctx: &Context) -> Result<()> {
    let mut cart = ctx.open_cart()?;

    if cart.hydration() == HydrationSource::Unavailable {
        if args.command.mutates() {
            bail!(
                "Cart storage could not be read; refusing to overwrite {}",
                ctx.storage_dir().display()
            );
        }
        ctx.output.warn("Cart storage could not be read; showing the default cart");
    }

    match args.command {
        CartCommand::Show => show_cart(&cart, ctx),
        CartCommand::Add {
            id,
            name,
            price,
            image,
            variant,
            quantity,
        } => {
            let price = match Money::from_decimal_exact(price) {
                Some(price) => price,
                None => bail!("Invalid price: {} (at most two decimal places)", price),
            };
            let item = LineItem::new(id, name, price)
                .with_image(image)
                .with_variant(variant)
                .with_quantity(quantity);
            add_item(&mut cart, item, ctx)
        }
        CartCommand::Remove { id, variant } => remove_item(&mut cart, id, variant.as_deref(), ctx),
        CartCommand::Update {
            id,
            quantity,
            variant,
        } => update_quantity(&mut cart, id, quantity, variant.as_deref(), ctx),
        CartCommand::Clear { yes } => clear_cart(&mut cart, yes, ctx),
    }
}

#[derive(Serialize)]
struct CartView<'a> {
    currency: Currency,
    items: &'a [LineItem],
    totals: CartTotals,
}

fn show_cart(cart: &CartStore, ctx: &Context) -> Result<()> {
    let currency = ctx.config.cart.currency()?;
    let totals = cart.totals(&ctx.config.cart.shipping_policy()?);

    if ctx.output.is_json() {
        ctx.output.json(&CartView {
            currency,
            items: cart.items(),
            totals,
        });
        return Ok(());
    }

    ctx.output.header("Cart");

    if cart.is_empty() {
        ctx.output.info("Your cart is empty");
        return Ok(());
    }

    let widths = [6, 34, 16, 5, 12];
    ctx.output
        .table_row(&["ID", "Product", "Variant", "Qty", "Total"], &widths);
    for item in cart.items() {
        ctx.output.table_row(
            &[
                item.id.to_string().as_str(),
                truncate(&item.name, widths[1]).as_str(),
                truncate(&item.variant, widths[2]).as_str(),
                item.quantity.to_string().as_str(),
                currency.format(item.line_total()).as_str(),
            ],
            &widths,
        );
    }

    println!();
    ctx.output.kv("items", &totals.item_count.to_string());
    ctx.output.kv("subtotal", &currency.format(totals.subtotal));
    ctx.output.kv("shipping", &currency.format(totals.shipping));
    ctx.output.kv("total", &currency.format(totals.total));

    Ok(())
}

fn add_item(cart: &mut CartStore, item: LineItem, ctx: &Context) -> Result<()> {
    let label = format!("{} × {} ({})", item.quantity, item.name, item.variant);
    cart.add_item(item).context("Failed to add item")?;
    save(cart)?;

    ctx.output.success(&format!("Added {}", label));
    ctx.output.kv("cart count", &cart.cart_count().to_string());
    print_count(cart, ctx);
    Ok(())
}

fn remove_item(
    cart: &mut CartStore,
    id: ProductId,
    variant: Option<&str>,
    ctx: &Context,
) -> Result<()> {
    let removed = match variant {
        Some(variant) => usize::from(cart.remove_variant(id, variant)),
        None => cart.remove_item(id),
    };
    save(cart)?;

    if removed == 0 {
        ctx.output.warn(&format!("No cart entry for product {}", id));
    } else {
        ctx.output
            .success(&format!("Removed {} entr{} for product {}", removed, plural(removed), id));
    }
    print_count(cart, ctx);
    Ok(())
}

fn update_quantity(
    cart: &mut CartStore,
    id: ProductId,
    quantity: i64,
    variant: Option<&str>,
    ctx: &Context,
) -> Result<()> {
    if quantity < 1 {
        ctx.output
            .warn("Quantity must be at least 1; use `cakeshop cart remove` to drop an entry");
        print_count(cart, ctx);
        return Ok(());
    }

    let updated = match variant {
        Some(variant) => usize::from(
            cart.update_variant_quantity(id, variant, quantity)
                .context("Failed to update quantity")?,
        ),
        None => cart
            .update_quantity(id, quantity)
            .context("Failed to update quantity")?,
    };
    save(cart)?;

    if updated == 0 {
        ctx.output.warn(&format!("No cart entry for product {}", id));
    } else {
        ctx.output.success(&format!(
            "Set quantity {} on {} entr{} for product {}",
            quantity,
            updated,
            plural(updated),
            id
        ));
    }
    print_count(cart, ctx);
    Ok(())
}

fn clear_cart(cart: &mut CartStore, yes: bool, ctx: &Context) -> Result<()> {
    if cart.is_empty() {
        ctx.output.info("Cart is already empty");
        print_count(cart, ctx);
        return Ok(());
    }

    if !yes && !ctx.output.is_json() {
        let confirmed = Confirm::new()
            .with_prompt(format!("Remove all {} item(s) from the cart?", cart.cart_count()))
            .default(false)
            .interact()?;

        if !confirmed {
            ctx.output.warn("Clear cancelled");
            return Ok(());
        }
    }

    cart.clear();
    save(cart)?;

    ctx.output.success("Cart cleared");
    print_count(cart, ctx);
    Ok(())
}

/// Surface any write failure the store only logged.
fn save(cart: &CartStore) -> Result<()> {
    cart.flush().context("Failed to save cart")
}

fn print_count(cart: &CartStore, ctx: &Context) {
    if ctx.output.is_json() {
        ctx.output.json(&serde_json::json!({
            "count": cart.cart_count(),
            "items": cart.items(),
        }));
    }
}

fn plural(n: usize) -> &'static str {
    if n == 1 {
        "y"
    } else {
        "ies"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CliConfig;
    use crate::output::Output;
    use std::path::Path;

    fn context(dir: &Path) -> Context {
        Context {
            config: CliConfig::default(),
            config_path: None,
            output: Output::new(false, true),
            cwd: dir.to_path_buf(),
        }
    }

    fn cake(id: u64, variant: &str, quantity: u32) -> LineItem {
        LineItem::new(ProductId::new(id), "Chocolate cake", Money::from_major(3150))
            .with_variant(variant)
            .with_quantity(quantity)
    }

    fn slot(ctx: &Context) -> Option<Vec<u8>> {
        std::fs::read(ctx.storage_dir().join("cart.json")).ok()
    }

    #[test]
    fn test_add_merges_and_persists() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = context(dir.path());
        let mut cart = ctx.open_cart().unwrap();

        add_item(&mut cart, cake(5, "1 lb", 1), &ctx).unwrap();
        add_item(&mut cart, cake(5, "1 lb", 2), &ctx).unwrap();

        let reopened = ctx.open_cart().unwrap();
        assert_eq!(reopened.items().len(), 1);
        assert_eq!(reopened.cart_count(), 3);
    }

    #[test]
    fn test_update_below_one_leaves_slot_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = context(dir.path());
        let mut cart = ctx.open_cart().unwrap();
        add_item(&mut cart, cake(5, "1 lb", 2), &ctx).unwrap();
        let before = slot(&ctx);

        update_quantity(&mut cart, ProductId::new(5), 0, None, &ctx).unwrap();
        update_quantity(&mut cart, ProductId::new(5), -3, Some("1 lb"), &ctx).unwrap();

        assert_eq!(slot(&ctx), before);
        assert_eq!(cart.cart_count(), 2);
    }

    #[test]
    fn test_variant_flag_scopes_update_and_remove() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = context(dir.path());
        let mut cart = ctx.open_cart().unwrap();
        add_item(&mut cart, cake(5, "1 lb", 1), &ctx).unwrap();
        add_item(&mut cart, cake(5, "2 lb", 1), &ctx).unwrap();

        update_quantity(&mut cart, ProductId::new(5), 4, Some("2 lb"), &ctx).unwrap();
        assert_eq!(cart.get(ProductId::new(5), "1 lb").unwrap().quantity, 1);
        assert_eq!(cart.get(ProductId::new(5), "2 lb").unwrap().quantity, 4);

        remove_item(&mut cart, ProductId::new(5), Some("1 lb"), &ctx).unwrap();
        let reopened = ctx.open_cart().unwrap();
        assert_eq!(reopened.items().len(), 1);
        assert_eq!(reopened.items()[0].variant, "2 lb");

        remove_item(&mut cart, ProductId::new(5), None, &ctx).unwrap();
        assert!(cart.is_empty());
        assert_eq!(slot(&ctx), None);
    }

    #[test]
    fn test_clear_in_json_mode_skips_prompt() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = context(dir.path());
        let mut cart = ctx.open_cart().unwrap();
        add_item(&mut cart, cake(5, "1 lb", 2), &ctx).unwrap();

        clear_cart(&mut cart, false, &ctx).unwrap();

        assert!(cart.is_empty());
        assert_eq!(slot(&ctx), None);
    }

    #[test]
    fn test_save_surfaces_storage_errors() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = context(dir.path());
        let mut cart = ctx.open_cart().unwrap();
        std::fs::remove_dir_all(ctx.storage_dir()).unwrap();

        let err = add_item(&mut cart, cake(5, "1 lb", 1), &ctx).unwrap_err();

        assert!(format!("{:#}", err).contains("Failed to save cart"));
        assert_eq!(cart.cart_count(), 1);
    }

    #[tokio::test]
    async fn test_add_rejects_sub_cent_price() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = context(dir.path());
        let args = CartArgs {
            command: CartCommand::Add {
                id: ProductId::new(5),
                name: "Chocolate cake".into(),
                price: 19.999,
                image: String::new(),
                variant: "1 lb".into(),
                quantity: 1,
            },
        };

        let err = run(args, &ctx).await.unwrap_err();

        assert!(err.to_string().contains("at most two decimal places"));
        assert_eq!(slot(&ctx), None);
    }

    #[tokio::test]
    async fn test_unreadable_slot_refuses_mutations() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = context(dir.path());
        // A directory where the slot file should be cannot be read as one.
        std::fs::create_dir_all(ctx.storage_dir().join("cart.json")).unwrap();
        let args = CartArgs {
            command: CartCommand::Clear { yes: true },
        };

        let err = run(args, &ctx).await.unwrap_err();

        assert!(err.to_string().contains("could not be read"));
        assert!(ctx.storage_dir().join("cart.json").is_dir());
    }
}
