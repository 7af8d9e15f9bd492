use actix_web::{web, HttpResponse};
use bigdecimal::BigDecimal;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::db::DbPool;
use crate::errors::AppError;
use crate::infrastructure::models::{NewProductRow, ProductRow};
use crate::schema::products;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateProductRequest {
    pub name: String,
    /// Decimal price as a string to avoid floating-point issues, e.g. "9.99"
    pub price: String,
    pub quantity: i32,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProductResponse {
    pub id: Uuid,
    pub name: String,
    pub price: String,
    pub quantity: i32,
}

fn to_response(row: ProductRow) -> ProductResponse {
    ProductResponse {
        id: row.id,
        name: row.name,
        price: row.price.to_string(),
        quantity: row.quantity,
    }
}

/// POST /products
#[utoipa::path(
    post,
    path = "/products",
    request_body = CreateProductRequest,
    responses(
        (status = 201, description = "Product created successfully", body = ProductResponse),
        (status = 400, description = "Invalid price"),
        (status = 409, description = "A product with this name already exists"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "products"
)]
pub async fn create_product(
    pool: web::Data<DbPool>,
    body: web::Json<CreateProductRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    let price = BigDecimal::from_str(&body.price)
        .map_err(|e| AppError::Validation(format!("invalid price '{}': {}", body.price, e)))?;

    let row: ProductRow = web::block(move || {
        let mut conn = pool.get()?;

        diesel::insert_into(products::table)
            .values(&NewProductRow {
                id: Uuid::new_v4(),
                name: body.name,
                price,
                quantity: body.quantity,
            })
            .returning(ProductRow::as_returning())
            .get_result(&mut conn)
            .map_err(|e| match e {
                diesel::result::Error::DatabaseError(
                    diesel::result::DatabaseErrorKind::UniqueViolation,
                    _,
                ) => AppError::Conflict("a product with this name already exists".to_string()),
                other => AppError::from(other),
            })
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Created().json(to_response(row)))
}

/// GET /products
#[utoipa::path(
    get,
    path = "/products",
    responses(
        (status = 200, description = "All catalog products", body = [ProductResponse]),
        (status = 500, description = "Internal server error"),
    ),
    tag = "products"
)]
pub async fn list_products(pool: web::Data<DbPool>) -> Result<HttpResponse, AppError> {
    let rows: Vec<ProductRow> = web::block(move || {
        let mut conn = pool.get()?;

        products::table
            .select(ProductRow::as_select())
            .order(products::name.asc())
            .load(&mut conn)
            .map_err(AppError::from)
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    let items: Vec<ProductResponse> = rows.into_iter().map(to_response).collect();
    Ok(HttpResponse::Ok().json(items))
}
