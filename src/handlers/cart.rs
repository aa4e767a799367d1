use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::application::cart_service::CartSummary;
use crate::auth::AuthUser;
use crate::domain::cart::{CartLine, CartLineInput};
use crate::errors::AppError;
use crate::response::ApiResponse;
use crate::AppState;

// ── Request / response DTOs ──────────────────────────────────────────────────

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddCartLineRequest {
    pub product_id: i32,
    pub variant_id: Option<i32>,
    pub size_id: Option<i32>,
    /// Defaults to 1.
    #[serde(default = "default_quantity")]
    pub quantity: i32,
}

fn default_quantity() -> i32 {
    1
}

impl From<AddCartLineRequest> for CartLineInput {
    fn from(req: AddCartLineRequest) -> Self {
        CartLineInput {
            product_id: req.product_id,
            variant_id: req.variant_id,
            size_id: req.size_id,
            quantity: req.quantity,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CartLineResponse {
    pub id: i32,
    pub product_id: i32,
    pub title: String,
    pub image: Option<String>,
    pub variant: Option<String>,
    pub size: Option<String>,
    /// Decimal amounts are rendered as strings, e.g. "27000"
    pub base_price: String,
    pub quantity: i32,
    /// Units of the product currently in stock.
    pub stock: i32,
    pub subtotal: String,
}

impl From<CartLine> for CartLineResponse {
    fn from(line: CartLine) -> Self {
        let subtotal = line.subtotal().to_string();
        CartLineResponse {
            id: line.id,
            product_id: line.product.id,
            title: line.product.title,
            image: line.product.image,
            variant: line.variant.map(|v| v.name),
            size: line.size.map(|s| s.name),
            base_price: line.product.base_price.to_string(),
            quantity: line.quantity,
            stock: line.product.stock,
            subtotal,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CartResponse {
    pub items: Vec<CartLineResponse>,
    pub total: String,
}

impl From<CartSummary> for CartResponse {
    fn from(summary: CartSummary) -> Self {
        CartResponse {
            items: summary.lines.into_iter().map(CartLineResponse::from).collect(),
            total: summary.total.to_string(),
        }
    }
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// POST /cart
///
/// Adds a batch of lines to the caller's cart. A line matching an existing
/// product/variant/size combination raises that line's quantity. The batch
/// is applied as a whole or not at all.
#[utoipa::path(
    post,
    path = "/cart",
    request_body = Vec<AddCartLineRequest>,
    responses(
        (status = 200, description = "Items added successfully", body = Vec<CartLineResponse>),
        (status = 400, description = "Empty batch, bad quantity or not enough stock"),
        (status = 401, description = "Missing or invalid bearer token"),
        (status = 404, description = "Product, variant or size not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "cart"
)]
pub async fn add_to_cart(
    user: AuthUser,
    state: web::Data<AppState>,
    body: web::Json<Vec<AddCartLineRequest>>,
) -> Result<HttpResponse, AppError> {
    let lines: Vec<CartLineInput> = body.into_inner().into_iter().map(Into::into).collect();

    let added = web::block(move || state.carts.add_lines(user.id, lines)).await??;

    let data: Vec<CartLineResponse> = added.into_iter().map(Into::into).collect();
    Ok(HttpResponse::Ok().json(ApiResponse::ok("Items added successfully", data)))
}

/// GET /cart
#[utoipa::path(
    get,
    path = "/cart",
    responses(
        (status = 200, description = "Cart fetched successfully", body = CartResponse),
        (status = 401, description = "Missing or invalid bearer token"),
    ),
    security(("bearer_auth" = [])),
    tag = "cart"
)]
pub async fn get_cart(
    user: AuthUser,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let summary = web::block(move || state.carts.list_lines(user.id)).await??;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(
        "Cart fetched successfully",
        CartResponse::from(summary),
    )))
}

/// DELETE /cart/{id}
#[utoipa::path(
    delete,
    path = "/cart/{id}",
    params(
        ("id" = i32, Path, description = "Cart line id"),
    ),
    responses(
        (status = 200, description = "Cart item deleted successfully"),
        (status = 400, description = "Invalid cart id"),
        (status = 401, description = "Missing or invalid bearer token"),
        (status = 404, description = "Cart item not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "cart"
)]
pub async fn delete_cart_item(
    user: AuthUser,
    state: web::Data<AppState>,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    let line_id = path.into_inner();

    web::block(move || state.carts.remove_line(user.id, line_id)).await??;

    Ok(HttpResponse::Ok().json(ApiResponse::message("Cart item deleted successfully")))
}
