//! HTTP handlers for Products API

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};
use axum_helpers::errors::responses::{
    BadRequestValidationResponse, InternalServerErrorResponse, NotFoundResponse,
    ServiceUnavailableResponse,
};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::ProductResult;
use crate::models::{CategoryRef, Product, ProductImage, ProductPage, ProductSummary};
use crate::options::{SortField, SortOrder};
use crate::repository::ProductRepository;
use crate::service::ProductService;
use crate::validation::{ListProductsQuery, parse_product_id, validate_list_query};

/// OpenAPI documentation for Products API
#[derive(OpenApi)]
#[openapi(
    paths(list_products, get_product),
    components(
        schemas(
            Product, ProductSummary, ProductPage, ProductImage, CategoryRef,
            SortField, SortOrder
        ),
        responses(
            NotFoundResponse,
            BadRequestValidationResponse,
            InternalServerErrorResponse,
            ServiceUnavailableResponse
        )
    ),
    tags(
        (name = "Products", description = "Product catalog queries")
    )
)]
pub struct ApiDoc;

/// Create the products router with all HTTP endpoints
pub fn router<R: ProductRepository + 'static>(service: ProductService<R>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route("/", get(list_products))
        .route("/{id}", get(get_product))
        .with_state(shared_service)
}

/// List products with filters, sorting and cursor pagination
#[utoipa::path(
    get,
    path = "",
    tag = "Products",
    params(ListProductsQuery),
    responses(
        (status = 200, description = "One page of products", body = ProductPage),
        (status = 400, response = BadRequestValidationResponse),
        (status = 500, response = InternalServerErrorResponse),
        (status = 503, response = ServiceUnavailableResponse)
    )
)]
async fn list_products<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    Query(query): Query<ListProductsQuery>,
) -> ProductResult<Json<ProductPage>> {
    let options = validate_list_query(&query)?;
    let page = service.list_products(options).await?;
    Ok(Json(page))
}

/// Get a product by ID
#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Products",
    params(
        ("id" = i64, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Product found", body = Product),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_product<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    Path(id): Path<String>,
) -> ProductResult<Json<Product>> {
    let id = parse_product_id(&id)?;
    let product = service.get_product(id).await?;
    Ok(Json(product))
}
