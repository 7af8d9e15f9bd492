use actix_web::{web, HttpResponse};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::application::place_order::PlaceOrderService;
use crate::db::DbPool;
use crate::domain::order::{OrderView, OrderedProduct};
use crate::errors::AppError;
use crate::infrastructure::models::{OrderLineRow, OrderRow};
use crate::infrastructure::{
    DieselCustomerRepository, DieselOrderRepository, DieselProductRepository,
};
use crate::schema::{order_lines, orders};

// Request / response DTOs

#[derive(Debug, Deserialize, ToSchema)]
pub struct OrderProductRequest {
    pub id: Uuid,
    pub quantity: i32,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateOrderRequest {
    pub customer_id: Uuid,
    pub products: Vec<OrderProductRequest>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderLineResponse {
    pub id: Uuid,
    pub product_id: Uuid,
    pub quantity: i32,
    /// Catalog price at placement time, as a decimal string, e.g. "9.99"
    pub unit_price: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderResponse {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub created_at: String,
    pub lines: Vec<OrderLineResponse>,
}

fn to_response(order: OrderView) -> OrderResponse {
    OrderResponse {
        id: order.id,
        customer_id: order.customer_id,
        created_at: order.created_at.to_rfc3339(),
        lines: order
            .lines
            .into_iter()
            .map(|l| OrderLineResponse {
                id: l.id,
                product_id: l.product_id,
                quantity: l.quantity,
                unit_price: l.unit_price.to_string(),
            })
            .collect(),
    }
}

// Handlers

/// POST /orders
///
/// Places an order: validates the customer and the requested products
/// against the catalog, persists the order with price snapshots, then
/// writes back the decremented stock levels.
#[utoipa::path(
    post,
    path = "/orders",
    request_body = CreateOrderRequest,
    responses(
        (status = 201, description = "Order placed successfully", body = OrderResponse),
        (status = 400, description = "Unknown customer, unknown product or insufficient stock"),
        (status = 409, description = "Stock changed concurrently, order was not fulfilled atomically"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn create_order(
    pool: web::Data<DbPool>,
    body: web::Json<CreateOrderRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    let pool = pool.get_ref().clone();

    let order = web::block(move || {
        let service = PlaceOrderService::new(
            DieselCustomerRepository::new(pool.clone()),
            DieselProductRepository::new(pool.clone()),
            DieselOrderRepository::new(pool),
        );

        let requested: Vec<OrderedProduct> = body
            .products
            .into_iter()
            .map(|p| OrderedProduct {
                product_id: p.id,
                quantity: p.quantity,
            })
            .collect();

        service
            .place_order(body.customer_id, requested)
            .map_err(AppError::from)
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Created().json(to_response(order)))
}

/// GET /orders/{id}
///
/// Returns the order together with its lines.
#[utoipa::path(
    get,
    path = "/orders/{id}",
    params(
        ("id" = Uuid, Path, description = "Order UUID"),
    ),
    responses(
        (status = 200, description = "Order found", body = OrderResponse),
        (status = 404, description = "Order not found"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn get_order(
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let order_id = path.into_inner();

    let result = web::block(move || {
        let mut conn = pool.get()?;

        let order = orders::table
            .filter(orders::id.eq(order_id))
            .select(OrderRow::as_select())
            .first(&mut conn)
            .optional()?;

        let Some(order) = order else {
            return Ok::<_, AppError>(None);
        };

        let lines = order_lines::table
            .filter(order_lines::order_id.eq(order.id))
            .select(OrderLineRow::as_select())
            .load(&mut conn)?;

        let line_responses: Vec<OrderLineResponse> = lines
            .into_iter()
            .map(|l| OrderLineResponse {
                id: l.id,
                product_id: l.product_id,
                quantity: l.quantity,
                unit_price: l.unit_price.to_string(),
            })
            .collect();

        Ok(Some(OrderResponse {
            id: order.id,
            customer_id: order.customer_id,
            created_at: order.created_at.to_rfc3339(),
            lines: line_responses,
        }))
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    match result {
        Some(order) => Ok(HttpResponse::Ok().json(order)),
        None => Err(AppError::NotFound),
    }
}
