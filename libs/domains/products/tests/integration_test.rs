//! Integration tests for Products domain
//!
//! These tests run the listing and lookup queries against a real PostgreSQL
//! (testcontainers) seeded with the catalog fixture, and check:
//! - Filters, ordering and keyset pagination
//! - Total counts against independent aggregate queries
//! - Image and rating projections

use std::collections::HashSet;

use domain_products::*;
use sea_orm::{DatabaseConnection, DbBackend, FromQueryResult, Statement, Value};
use test_utils::{TestDatabase, assertions::*, catalog};

#[derive(FromQueryResult)]
struct Total {
    total: i64,
}

async fn count(db: &DatabaseConnection, sql: &str, values: Vec<Value>) -> u64 {
    let stmt = Statement::from_sql_and_values(DbBackend::Postgres, sql, values);
    Total::find_by_statement(stmt)
        .one(db)
        .await
        .unwrap()
        .map(|row| row.total as u64)
        .unwrap_or(0)
}

#[derive(FromQueryResult)]
struct Average {
    average: f64,
}

/// Collect every page of a listing by following `next_cursor`
async fn walk(repo: &PgProductRepository, options: ListOptions) -> Vec<Vec<ProductSummary>> {
    let mut pages = Vec::new();
    let mut next = options.clone();

    loop {
        let page = repo.list(next.clone()).await.unwrap();
        let cursor = page.next_cursor.clone();
        pages.push(page.products);

        match cursor {
            Some(cursor) => next = options.clone().after(cursor),
            None => break,
        }
        assert!(pages.len() <= 100, "pagination does not terminate");
    }

    pages
}

// ============================================================================
// Listing
// ============================================================================

#[tokio::test]
async fn test_default_listing() {
    let db = TestDatabase::seeded().await;
    let repo = PgProductRepository::new(db.connection());

    let page = repo.list(ListOptions::default()).await.unwrap();

    assert_eq!(page.products.len(), 20);
    assert_eq!(page.total_count, catalog::PRODUCT_COUNT);
    assert_eq!(page.total_pages, 5);
    assert_eq!(page.limit, 20);
    assert_eq!(page.products[0].id, 100, "newest product comes first");
    assert_ordered_by(
        &page.products,
        |p| p.created_at,
        |p| p.id,
        true,
        "created_at desc",
    );
    assert!(page.next_cursor.is_some());
}

#[tokio::test]
async fn test_price_ordering_and_tie_break() {
    let db = TestDatabase::seeded().await;
    let repo = PgProductRepository::new(db.connection());

    let asc = repo
        .list(
            ListOptions::default()
                .sorted_by(SortField::Price, SortOrder::Asc)
                .with_limit(100),
        )
        .await
        .unwrap();
    assert_eq!(asc.products[0].name, catalog::CHEAPEST);
    assert_eq!(asc.products[0].price, catalog::CHEAPEST_PRICE);
    assert_ordered_by(&asc.products, |p| p.price, |p| p.id, false, "price asc");

    let tied: Vec<i64> = asc
        .products
        .iter()
        .filter(|p| p.price == catalog::TIED_PRICE)
        .map(|p| p.id)
        .collect();
    assert_eq!(tied, catalog::TIED_IDS.to_vec());

    let desc = repo
        .list(ListOptions::default().sorted_by(SortField::Price, SortOrder::Desc))
        .await
        .unwrap();
    assert_eq!(desc.products[0].name, catalog::MOST_EXPENSIVE);
    assert_ordered_by(&desc.products, |p| p.price, |p| p.id, true, "price desc");
}

#[tokio::test]
async fn test_search_is_case_insensitive_substring() {
    let db = TestDatabase::seeded().await;
    let repo = PgProductRepository::new(db.connection());

    for term in ["drone", "DRONE", "Dron"] {
        let page = repo
            .list(ListOptions::default().with_filters(Filters {
                search: Some(term.to_string()),
                ..Default::default()
            }))
            .await
            .unwrap();

        assert_eq!(page.total_count, 1, "search {term:?}");
        assert_eq!(page.total_pages, 1);
        assert_eq!(page.products.len(), 1);
        assert_eq!(page.products[0].name, catalog::DRONE);
        assert_eq!(page.next_cursor, None);
    }

    // description match
    let page = repo
        .list(ListOptions::default().with_filters(Filters {
            search: Some("quadcopter".to_string()),
            ..Default::default()
        }))
        .await
        .unwrap();
    assert_eq!(page.products[0].name, catalog::DRONE);
}

#[tokio::test]
async fn test_price_range_filter() {
    let db = TestDatabase::seeded().await;
    let repo = PgProductRepository::new(db.connection());

    let page = repo
        .list(
            ListOptions::default()
                .with_filters(Filters {
                    price_min: Some(50.0),
                    price_max: Some(60.0),
                    ..Default::default()
                })
                .with_limit(100),
        )
        .await
        .unwrap();

    let expected = count(
        &db.connection,
        "SELECT COUNT(*) AS total FROM products WHERE price BETWEEN $1 AND $2",
        vec![50.0_f64.into(), 60.0_f64.into()],
    )
    .await;

    assert!(expected > 0);
    assert_eq!(page.total_count, expected);
    assert_eq!(page.products.len() as u64, expected);
    assert!(page.products.iter().all(|p| (50.0..=60.0).contains(&p.price)));
}

#[tokio::test]
async fn test_inverted_price_range_is_empty() {
    let db = TestDatabase::seeded().await;
    let repo = PgProductRepository::new(db.connection());

    let page = repo
        .list(ListOptions::default().with_filters(Filters {
            price_min: Some(60.0),
            price_max: Some(50.0),
            ..Default::default()
        }))
        .await
        .unwrap();

    assert!(page.products.is_empty());
    assert_eq!(page.total_count, 0);
    assert_eq!(page.total_pages, 0);
    assert_eq!(page.next_cursor, None);
}

#[tokio::test]
async fn test_min_rating_filter_matches_grouped_count() {
    let db = TestDatabase::seeded().await;
    let repo = PgProductRepository::new(db.connection());

    for min_rating in 1..=5 {
        let page = repo
            .list(
                ListOptions::default()
                    .with_filters(Filters {
                        min_rating: Some(min_rating),
                        ..Default::default()
                    })
                    .with_limit(100),
            )
            .await
            .unwrap();

        let expected = count(
            &db.connection,
            "SELECT COUNT(*) AS total FROM (\
             SELECT product_id FROM ratings GROUP BY product_id HAVING AVG(score) >= $1\
             ) AS rated",
            vec![min_rating.into()],
        )
        .await;

        assert_eq!(page.total_count, expected, "min_rating {min_rating}");
        assert_eq!(page.products.len() as u64, expected);
        assert!(
            page.products
                .iter()
                .all(|p| p.average_rating >= min_rating as f64)
        );
    }
}

#[tokio::test]
async fn test_combined_filters_keep_count_consistent() {
    let db = TestDatabase::seeded().await;
    let repo = PgProductRepository::new(db.connection());

    let filters = Filters {
        price_min: Some(20.0),
        price_max: Some(90.0),
        search: Some("item".to_string()),
        min_rating: Some(3),
    };

    let pages = walk(
        &repo,
        ListOptions::default()
            .with_filters(filters.clone())
            .sorted_by(SortField::Price, SortOrder::Asc)
            .with_limit(4),
    )
    .await;
    let seen: Vec<&ProductSummary> = pages.iter().flatten().collect();

    let first = repo
        .list(ListOptions::default().with_filters(filters).with_limit(4))
        .await
        .unwrap();

    assert_eq!(seen.len() as u64, first.total_count);
    assert!(seen.iter().all(|p| {
        (20.0..=90.0).contains(&p.price)
            && p.name.to_lowercase().contains("item")
            && p.average_rating >= 3.0
    }));
}

// ============================================================================
// Cursor pagination
// ============================================================================

#[tokio::test]
async fn test_cursor_walk_visits_every_product_once() {
    let db = TestDatabase::seeded().await;
    let repo = PgProductRepository::new(db.connection());

    for (field, order) in [
        (SortField::Price, SortOrder::Asc),
        (SortField::Price, SortOrder::Desc),
        (SortField::CreatedAt, SortOrder::Desc),
        (SortField::CreatedAt, SortOrder::Asc),
    ] {
        let pages = walk(
            &repo,
            ListOptions::default().sorted_by(field, order).with_limit(7),
        )
        .await;

        assert_eq!(pages.len(), 15, "{field} {order}");
        assert!(pages[..14].iter().all(|page| page.len() == 7));
        assert_eq!(pages[14].len(), 2);

        let ids: Vec<i64> = pages.iter().flatten().map(|p| p.id).collect();
        let unique: HashSet<i64> = ids.iter().copied().collect();
        assert_eq!(ids.len(), 100);
        assert_eq!(unique.len(), 100, "no product appears on two pages");

        let all: Vec<ProductSummary> = pages.into_iter().flatten().collect();
        let descending = order == SortOrder::Desc;
        match field {
            SortField::Price => {
                assert_ordered_by(&all, |p| p.price, |p| p.id, descending, "walk by price")
            }
            SortField::CreatedAt => assert_ordered_by(
                &all,
                |p| p.created_at,
                |p| p.id,
                descending,
                "walk by created_at",
            ),
        }
    }
}

#[tokio::test]
async fn test_cursor_does_not_change_total() {
    let db = TestDatabase::seeded().await;
    let repo = PgProductRepository::new(db.connection());

    let options = ListOptions::default()
        .sorted_by(SortField::Price, SortOrder::Asc)
        .with_limit(5);
    let first = repo.list(options.clone()).await.unwrap();
    let cursor = assert_some(first.next_cursor.clone(), "first page is full");
    assert_eq!(cursor[0], first.products[4].price.to_string());
    assert_eq!(cursor[1], first.products[4].id.to_string());

    let second = repo.list(options.after(cursor)).await.unwrap();
    assert_eq!(second.total_count, first.total_count);
    assert_eq!(second.total_pages, first.total_pages);
    let last = &first.products[4];
    for product in &second.products {
        assert!(
            (product.price, product.id) > (last.price, last.id),
            "product {} is not after cursor ({}, {})",
            product.id,
            last.price,
            last.id
        );
    }
}

#[tokio::test]
async fn test_malformed_cursor_returns_first_page() {
    let db = TestDatabase::seeded().await;
    let repo = PgProductRepository::new(db.connection());

    let first = repo.list(ListOptions::default()).await.unwrap();

    for cursor in [vec!["only-one"], vec!["a", "b", "c"], vec!["yesterday", "5"]] {
        let page = repo
            .list(ListOptions::default().after(cursor.clone()))
            .await
            .unwrap();
        let ids: Vec<i64> = page.products.iter().map(|p| p.id).collect();
        let expected: Vec<i64> = first.products.iter().map(|p| p.id).collect();
        assert_eq!(ids, expected, "cursor {cursor:?}");
    }
}

// ============================================================================
// Projections
// ============================================================================

#[tokio::test]
async fn test_listing_projects_first_image_and_rounded_rating() {
    let db = TestDatabase::seeded().await;
    let repo = PgProductRepository::new(db.connection());

    let page = repo
        .list(ListOptions::default().with_limit(100))
        .await
        .unwrap();

    for product in &page.products {
        match product.id % 3 {
            0 => assert_eq!(product.image, None, "product {}", product.id),
            1 => {
                let image = assert_some(product.image.clone(), "single image");
                assert!(image.url.ends_with(&format!("/{}/1.jpg", product.id)));
                assert!(image.alt_text.is_some());
            }
            _ => {
                let image = assert_some(product.image.clone(), "two images");
                assert!(image.url.ends_with(&format!("/{}/2.jpg", product.id)));
                assert_eq!(image.alt_text, None);
            }
        }

        if product.id % 5 == 0 {
            assert_eq!(product.average_rating, 0.0);
        }
        let rounded = (product.average_rating * 100.0).round() / 100.0;
        assert!((product.average_rating - rounded).abs() < 1e-9);

        if product.id % 17 == 0 {
            assert_eq!(product.category_data, None);
        } else {
            assert!(product.category_data.is_some());
        }
    }
}

// ============================================================================
// Single-item fetch
// ============================================================================

#[tokio::test]
async fn test_get_by_id_full_record() {
    let db = TestDatabase::seeded().await;
    let repo = PgProductRepository::new(db.connection());

    let cereal = assert_some(repo.get_by_id(7).await.unwrap(), "cereal exists");
    assert_eq!(cereal.name, catalog::CHEAPEST);
    assert_eq!(cereal.description, "Crunchy breakfast cereal");
    assert_eq!(
        cereal.category_data,
        Some(CategoryRef {
            id: 2,
            name: "Food".to_string()
        })
    );
    assert_eq!(cereal.images.len(), 1);

    let expected = Average::find_by_statement(Statement::from_sql_and_values(
        DbBackend::Postgres,
        "SELECT COALESCE(AVG(score), 0)::float8 AS average FROM ratings WHERE product_id = $1",
        [7_i64.into()],
    ))
    .one(&db.connection)
    .await
    .unwrap()
    .unwrap();
    assert!((cereal.average_rating - expected.average).abs() < 1e-9);

    // two images, ordered by image id; two ratings
    let product = assert_some(repo.get_by_id(32).await.unwrap(), "product 32 exists");
    let urls: Vec<&str> = product.images.iter().map(|i| i.url.as_str()).collect();
    assert_eq!(
        urls,
        vec![
            "https://cdn.example.com/products/32/2.jpg",
            "https://cdn.example.com/products/32/1.jpg",
        ]
    );
    assert!(product.average_rating > 0.0);
}

#[tokio::test]
async fn test_get_by_id_without_images_or_ratings() {
    let db = TestDatabase::seeded().await;
    let repo = PgProductRepository::new(db.connection());

    let product = assert_some(repo.get_by_id(15).await.unwrap(), "product 15 exists");
    assert!(product.images.is_empty());
    assert_eq!(product.average_rating, 0.0);
}

#[tokio::test]
async fn test_get_missing_product() {
    let db = TestDatabase::seeded().await;
    let repo = PgProductRepository::new(db.connection());

    assert!(repo.get_by_id(100_000).await.unwrap().is_none());

    let service = ProductService::new(repo);
    let err = service.get_product(100_000).await.unwrap_err();
    assert!(matches!(err, ProductError::NotFound(100_000)));
}
