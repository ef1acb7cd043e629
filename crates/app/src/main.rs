use std::{process::ExitCode, str::FromStr};

use clap::{Args, Parser, Subcommand};
use engine::{CatalogEntry, Engine, Money, NewEntry, units};
use migration::{Migrator, MigratorTrait};
use rust_decimal::Decimal;

use basket::{Basket, LineItem};
use error::{AppError, Result};
use settings::Settings;

mod basket;
mod error;
mod settings;

#[derive(Parser, Debug)]
#[command(name = "pantry")]
#[command(about = "Ingredient catalog and unit-aware price calculator")]
struct Cli {
    /// Optional config file path (TOML).
    #[arg(long)]
    config: Option<String>,

    /// Database connection string, overrides the configured one.
    #[arg(long, env = "DATABASE_URL")]
    database_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List units, optionally only those convertible with `--of`.
    Units(UnitsArgs),
    /// Maintain the ingredient catalog.
    Catalog(Catalog),
    /// Price a quantity of one catalog entry.
    Quote(QuoteArgs),
    /// Price several entries and print the total.
    Basket(BasketArgs),
}

#[derive(Args, Debug)]
struct UnitsArgs {
    #[arg(long)]
    of: Option<String>,
}

#[derive(Args, Debug)]
struct Catalog {
    #[command(subcommand)]
    command: CatalogCommand,
}

#[derive(Subcommand, Debug)]
enum CatalogCommand {
    List(ListArgs),
    Add(EntryArgs),
    Update(UpdateArgs),
    Remove(RemoveArgs),
}

#[derive(Args, Debug)]
struct ListArgs {
    #[arg(long)]
    json: bool,
}

#[derive(Args, Debug)]
struct EntryArgs {
    #[arg(long)]
    name: String,
    /// Quantity bought, in `--unit`.
    #[arg(long, value_parser = parse_quantity)]
    quantity: Decimal,
    /// Total price paid for `--quantity`.
    #[arg(long, value_parser = parse_price)]
    price: Decimal,
    #[arg(long)]
    unit: String,
    #[arg(long)]
    description: Option<String>,
}

#[derive(Args, Debug)]
struct UpdateArgs {
    id: i32,
    #[command(flatten)]
    entry: EntryArgs,
}

#[derive(Args, Debug)]
struct RemoveArgs {
    id: i32,
}

#[derive(Args, Debug)]
struct QuoteArgs {
    id: i32,
    #[arg(value_parser = parse_quantity)]
    quantity: Decimal,
    unit: String,
}

#[derive(Args, Debug)]
struct BasketArgs {
    /// Items as `id:quantity:unit`, e.g. `3:250:г`.
    #[arg(required = true)]
    items: Vec<BasketItem>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct BasketItem {
    id: i32,
    quantity: Decimal,
    unit: String,
}

impl FromStr for BasketItem {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let mut parts = s.splitn(3, ':');
        let (Some(id), Some(quantity), Some(unit)) = (parts.next(), parts.next(), parts.next())
        else {
            return Err(format!("expected id:quantity:unit, got \"{s}\""));
        };
        let id = id
            .trim()
            .parse()
            .map_err(|_| format!("invalid catalog id \"{id}\""))?;
        Ok(Self {
            id,
            quantity: parse_quantity(quantity)?,
            unit: unit.trim().to_string(),
        })
    }
}

/// Quantities typed by the user: `.` or `,` separator, strictly positive.
fn parse_quantity(raw: &str) -> std::result::Result<Decimal, String> {
    let quantity = Decimal::from_str(&raw.trim().replace(',', "."))
        .map_err(|_| format!("invalid quantity \"{raw}\""))?;
    if quantity <= Decimal::ZERO {
        return Err("quantity must be greater than 0".to_string());
    }
    Ok(quantity)
}

fn parse_price(raw: &str) -> std::result::Result<Decimal, String> {
    let price = Money::from_str(raw).map_err(|err| err.to_string())?;
    if !price.is_positive() {
        return Err("price must be greater than 0".to_string());
    }
    Ok(price.amount())
}

impl From<EntryArgs> for NewEntry {
    fn from(args: EntryArgs) -> Self {
        Self {
            name: args.name,
            description: args.description,
            quantity: args.quantity,
            total_price: args.price,
            unit: args.unit,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    if let Err(err) = units::check_catalog() {
        eprintln!("fatal: {err}");
        return ExitCode::FAILURE;
    }

    let cli = Cli::parse();
    let settings = match Settings::new(cli.config.as_deref()) {
        Ok(settings) => settings,
        Err(err) => {
            eprintln!("config error: {err}");
            return ExitCode::FAILURE;
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "pantry={level},engine={level}",
            level = settings.app.level
        ))
        .with_writer(std::io::stderr)
        .init();

    match run(cli, settings).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli, settings: Settings) -> Result<()> {
    if let Command::Units(args) = &cli.command {
        return print_units(args.of.as_deref());
    }

    let url = cli
        .database_url
        .clone()
        .unwrap_or_else(|| settings.database.url());
    let engine = connect_engine(&url).await?;

    match cli.command {
        Command::Units(_) => Ok(()),
        Command::Catalog(Catalog { command }) => match command {
            CatalogCommand::List(args) => {
                let entries = engine.entries().await?;
                if args.json {
                    println!("{}", serde_json::to_string_pretty(&entries)?);
                } else {
                    print_entries(&entries);
                }
                Ok(())
            }
            CatalogCommand::Add(args) => {
                let id = engine.create_entry(&args.into()).await?;
                let entry = engine.entry(id).await?;
                println!(
                    "created {id}: {} ({} per {})",
                    entry.name, entry.price, entry.unit_symbol
                );
                Ok(())
            }
            CatalogCommand::Update(UpdateArgs { id, entry }) => {
                let current = engine.entry(id).await?;
                warn_if_category_changes(&current, &entry.unit);
                engine.update_entry(id, &entry.into()).await?;
                println!("updated {id}");
                Ok(())
            }
            CatalogCommand::Remove(RemoveArgs { id }) => {
                engine.delete_entry(id).await?;
                println!("removed {id}");
                Ok(())
            }
        },
        Command::Quote(args) => {
            let mut basket = Basket::new();
            let item = price_item(&engine, args.id, args.quantity, &args.unit).await?;
            basket.add(item);
            print_basket(&basket);
            Ok(())
        }
        Command::Basket(args) => {
            let mut basket = Basket::new();
            for item in args.items {
                basket.add(price_item(&engine, item.id, item.quantity, &item.unit).await?);
            }
            print_basket(&basket);
            Ok(())
        }
    }
}

async fn connect_engine(url: &str) -> Result<Engine> {
    tracing::debug!("connecting to {url}");
    let database = sea_orm::Database::connect(url).await?;
    Migrator::up(&database, None).await?;
    Ok(Engine::builder().database(database).build()?)
}

/// Prices one line. The requested unit must be convertible with the entry's
/// unit; the engine itself would silently price a foreign unit 1:1.
async fn price_item(engine: &Engine, id: i32, quantity: Decimal, unit: &str) -> Result<LineItem> {
    let entry = engine.entry(id).await?;
    let allowed = units::units_same_category_as(&entry.unit_symbol).unwrap_or_default();
    if !allowed.iter().any(|symbol| *symbol == unit) {
        return Err(AppError::Input(format!(
            "\"{unit}\" cannot be used for {} (priced per {}); choose one of: {}",
            entry.name,
            entry.unit_symbol,
            allowed.join(", ")
        )));
    }

    let cost = engine.quote(id, quantity, unit).await?;
    Ok(LineItem {
        name: entry.name,
        quantity,
        unit: unit.to_string(),
        cost,
    })
}

fn warn_if_category_changes(current: &CatalogEntry, new_unit: &str) {
    let before = units::category_of(&current.unit_symbol);
    let after = units::category_of(new_unit.trim());
    if before.is_some() && after.is_some() && before != after {
        tracing::warn!(
            id = current.id,
            from = %current.unit_symbol,
            to = %new_unit,
            "catalog entry changes unit category"
        );
    }
}

fn print_units(of: Option<&str>) -> Result<()> {
    let symbols = match of {
        Some(symbol) => units::units_same_category_as(symbol)
            .ok_or_else(|| AppError::Input(format!("unknown unit \"{symbol}\"")))?,
        None => units::all_symbols(),
    };
    for symbol in symbols {
        let category = units::category_of(symbol)
            .map(|category| category.label())
            .unwrap_or_default();
        println!("{symbol:<4} {category}");
    }
    Ok(())
}

fn print_entries(entries: &[CatalogEntry]) {
    println!(
        "{:>4}  {:<24} {:<28} {:<4} {:>10}",
        "ID", "Название", "Описание", "Ед.", "Цена"
    );
    for entry in entries {
        println!(
            "{:>4}  {:<24} {:<28} {:<4} {:>10}",
            entry.id,
            entry.name,
            entry.description.as_deref().unwrap_or(""),
            entry.unit_symbol,
            entry.price
        );
    }
}

fn print_basket(basket: &Basket) {
    for item in basket.items() {
        println!(
            "{:<24} {:>10} {:<4} {:>10}",
            item.name, item.quantity, item.unit, item.cost
        );
    }
    println!("{}", basket.summary());
}
