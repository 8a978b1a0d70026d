//! # Seed Data Loader
//!
//! Loads the reference catalog fixture for development.
//!
//! ## Usage
//! ```bash
//! # Seed the default database file
//! cargo run -p catalog-db --bin seed
//!
//! # Specify a database path
//! cargo run -p catalog-db --bin seed -- --db ./data/catalog.db
//! ```
//!
//! ## Fixture
//! 3 categories (Books, Electronics, Computers) and 25 products, 21 of them
//! named "PC Gamer ...". After loading, the known counts are verified:
//! 25 products total, 21 matching "PC Gamer", 0 matching "Camera".

use std::env;

use chrono::{TimeZone, Utc};

use catalog_core::{PageRequest, ProductFields, ProductFilter};
use catalog_db::{Database, DbConfig};

/// (name, price, category slot) - slot 0 = Books, 1 = Electronics,
/// 2 = Computers.
const PRODUCTS: &[(&str, f64, usize)] = &[
    ("The Lord of the Rings", 90.5, 0),
    ("Smart TV", 2190.0, 1),
    ("Macbook Pro", 1250.0, 2),
    ("PC Gamer", 1200.0, 2),
    ("Rails for Dummies", 100.99, 0),
    ("PC Gamer Ex", 1350.0, 2),
    ("PC Gamer X", 1350.0, 2),
    ("PC Gamer Alfa", 1850.0, 2),
    ("PC Gamer Tera", 1950.0, 2),
    ("PC Gamer Y", 1700.0, 2),
    ("PC Gamer Nitro", 1450.0, 2),
    ("PC Gamer Card", 1850.0, 2),
    ("PC Gamer Plus", 1350.0, 2),
    ("PC Gamer Hera", 2250.0, 2),
    ("PC Gamer Weed", 2200.0, 2),
    ("PC Gamer Max", 2340.0, 2),
    ("PC Gamer Turbo", 1280.0, 2),
    ("PC Gamer Hot", 1450.0, 2),
    ("PC Gamer Ez", 1750.0, 2),
    ("PC Gamer Tr", 1650.0, 2),
    ("PC Gamer Tx", 1680.0, 2),
    ("PC Gamer Er", 1850.0, 2),
    ("PC Gamer Min", 2250.0, 2),
    ("PC Gamer Boo", 1250.0, 2),
    ("PC Gamer Foo", 1200.0, 2),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    // Parse command line arguments
    let args: Vec<String> = env::args().collect();
    let mut db_path = String::from("./catalog_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Catalog Seed Data Loader");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./catalog_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("Catalog Seed Data Loader");
    println!("========================");
    println!("Database: {db_path}");
    println!();

    // Connect; migrations run on connect
    let db = Database::new(DbConfig::new(&db_path)).await?;
    println!("Connected, migrations applied");

    // Skip loading when the catalog is already populated
    let existing = db
        .products()
        .search(&ProductFilter::all(), PageRequest::first(1))
        .await?;
    if existing.total_elements > 0 {
        println!(
            "Database already has {} products, skipping seed.",
            existing.total_elements
        );
        println!("Delete the database file to regenerate.");
        return Ok(());
    }

    println!("Loading fixture...");

    let categories = db.categories();
    let books = categories.create("Books").await?.id;
    let electronics = categories.create("Electronics").await?.id;
    let computers = categories.create("Computers").await?.id;
    let slots = [books, electronics, computers];

    let products = db.products();
    let release_date = Utc.with_ymd_and_hms(2020, 7, 14, 10, 0, 0).unwrap();

    for (index, (name, price, slot)) in PRODUCTS.iter().enumerate() {
        let fields = ProductFields {
            name: name.to_string(),
            description: "Lorem ipsum dolor sit amet, consectetur adipiscing elit.".to_string(),
            price: *price,
            release_date,
            image_url: format!("https://img.example.com/products/{}-big.jpg", index + 1),
        };
        products.create(fields, &[slots[*slot]]).await?;
    }

    println!("Loaded 3 categories and {} products", PRODUCTS.len());

    // Verify the reference counts
    println!();
    println!("Verifying search counts...");

    let all = products
        .search(&ProductFilter::all(), PageRequest::first(10))
        .await?;
    println!("  all products:      {} (expected 25)", all.total_elements);

    let pc_gamer = products
        .search(&ProductFilter::by_name("PC Gamer"), PageRequest::first(10))
        .await?;
    println!("  name 'PC Gamer':   {} (expected 21)", pc_gamer.total_elements);

    let camera = products
        .search(&ProductFilter::by_name("Camera"), PageRequest::first(10))
        .await?;
    println!("  name 'Camera':     {} (expected 0)", camera.total_elements);

    println!();
    println!("Seed complete!");

    Ok(())
}
