//! Deterministic product catalog fixture
//!
//! Seeds the schema from `manifests/migrations/catalog/` with a fixed data set:
//! 100 products created one hour apart (id 100 is the newest), seven
//! categories, zero to two images and zero to four ratings per product.

use chrono::{DateTime, Duration, TimeZone, Utc};
use sea_orm::{ConnectionTrait, DatabaseConnection, DbErr};

use crate::TestDataBuilder;

pub const PRODUCT_COUNT: u64 = 100;

/// Cheapest product overall
pub const CHEAPEST: &str = "Cereal";
pub const CHEAPEST_PRICE: f64 = 1.99;

/// Most expensive product overall
pub const MOST_EXPENSIVE: &str = "QuantumLeap X1 Laptop";
pub const MOST_EXPENSIVE_PRICE: f64 = 1499.99;

/// The only product whose name or description contains "drone"
pub const DRONE: &str = "Stealth Drone Pro";

/// Products sharing [`TIED_PRICE`], for tie-break ordering
pub const TIED_IDS: [i64; 5] = [90, 91, 92, 93, 94];
pub const TIED_PRICE: f64 = 25.0;

pub const CATEGORIES: [&str; 7] = [
    "Electronics",
    "Food",
    "Clothing",
    "Books",
    "Home",
    "Toys",
    "Sports",
];

const SEED: u64 = 0x00C0_FFEE;

#[derive(Debug, Clone)]
pub struct SeedProduct {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub category_id: Option<i64>,
    pub created_at: DateTime<Utc>,
}

fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0)
        .single()
        .unwrap_or_else(Utc::now)
}

/// The product rows the fixture inserts, in id order
pub fn products() -> Vec<SeedProduct> {
    let builder = TestDataBuilder::new(SEED);

    (1..=PRODUCT_COUNT as i64)
        .map(|id| {
            let (name, description, price, category_id) = match id {
                7 => (
                    CHEAPEST.to_string(),
                    "Crunchy breakfast cereal".to_string(),
                    CHEAPEST_PRICE,
                    Some(2),
                ),
                42 => (
                    MOST_EXPENSIVE.to_string(),
                    "Ultra-thin laptop with a 16 inch display".to_string(),
                    MOST_EXPENSIVE_PRICE,
                    Some(1),
                ),
                63 => (
                    DRONE.to_string(),
                    "Quiet quadcopter with a 4K camera".to_string(),
                    899.0,
                    Some(1),
                ),
                _ => {
                    let price = if TIED_IDS.contains(&id) {
                        TIED_PRICE
                    } else {
                        5.49 + ((id * 37) % 1000) as f64 / 10.0
                    };
                    let category_id = if id % 17 == 0 {
                        None
                    } else {
                        Some(builder.number(id as u64, 1..=CATEGORIES.len() as u64) as i64)
                    };
                    (
                        format!("Catalog Item {id:03}"),
                        format!("Everyday catalog item number {id}"),
                        (price * 100.0).round() / 100.0,
                        category_id,
                    )
                }
            };

            SeedProduct {
                id,
                name,
                description,
                price,
                category_id,
                created_at: base_time() + Duration::hours(id),
            }
        })
        .collect()
}

/// Insert the fixture into an empty, migrated database
pub async fn seed_catalog(db: &DatabaseConnection) -> Result<(), DbErr> {
    let builder = TestDataBuilder::new(SEED);

    let categories = CATEGORIES
        .iter()
        .enumerate()
        .map(|(i, name)| format!("({}, '{}')", i + 1, name))
        .collect::<Vec<_>>()
        .join(", ");
    db.execute_unprepared(&format!(
        "INSERT INTO categories (id, name) VALUES {categories}"
    ))
    .await?;

    let products = products();
    let rows = products
        .iter()
        .map(|p| {
            format!(
                "({}, '{}', '{}', {}, {}, '{}')",
                p.id,
                p.name,
                p.description,
                p.price,
                p.category_id
                    .map(|id| id.to_string())
                    .unwrap_or_else(|| "NULL".to_string()),
                p.created_at.to_rfc3339()
            )
        })
        .collect::<Vec<_>>()
        .join(", ");
    db.execute_unprepared(&format!(
        "INSERT INTO products (id, name, description, price, category_id, created_at) VALUES {rows}"
    ))
    .await?;

    let mut images = Vec::new();
    let mut ratings = Vec::new();
    for p in &products {
        // reverse order: the first image by id is the last url
        for n in (1..=(p.id % 3)).rev() {
            let alt_text = if n == 1 {
                format!("'{} front'", p.name)
            } else {
                "NULL".to_string()
            };
            images.push(format!(
                "({}, 'https://cdn.example.com/products/{}/{}.jpg', {})",
                p.id, p.id, n, alt_text
            ));
        }
        for n in 0..(p.id % 5) {
            let score = builder.number((p.id * 10 + n) as u64, 1..=5);
            ratings.push(format!("({}, {})", p.id, score));
        }
    }
    db.execute_unprepared(&format!(
        "INSERT INTO product_images (product_id, url, alt_text) VALUES {}",
        images.join(", ")
    ))
    .await?;
    db.execute_unprepared(&format!(
        "INSERT INTO ratings (product_id, score) VALUES {}",
        ratings.join(", ")
    ))
    .await?;

    db.execute_unprepared(
        "SELECT setval('categories_id_seq', (SELECT MAX(id) FROM categories)), \
         setval('products_id_seq', (SELECT MAX(id) FROM products))",
    )
    .await?;

    tracing::info!(
        products = products.len(),
        images = images.len(),
        ratings = ratings.len(),
        "Seeded catalog fixture"
    );
    Ok(())
}
