use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::application::checkout_service::CheckoutRequest;
use crate::auth::{AdminUser, AuthUser};
use crate::domain::transaction::{
    ContactOverrides, ListResult, PageRequest, TransactionItemView, TransactionView,
};
use crate::errors::AppError;
use crate::response::{ApiResponse, Page};
use crate::AppState;

use super::PageParams;

// ── Request / response DTOs ──────────────────────────────────────────────────

/// Contact fields left out (or blank) fall back to the caller's profile.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateTransactionRequest {
    pub fullname: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub payment_method_id: i32,
    pub shipping_id: i32,
}

impl From<CreateTransactionRequest> for CheckoutRequest {
    fn from(req: CreateTransactionRequest) -> Self {
        CheckoutRequest {
            contact: ContactOverrides {
                fullname: req.fullname,
                email: req.email,
                phone: req.phone,
                address: req.address,
            },
            payment_method_id: req.payment_method_id,
            shipping_id: req.shipping_id,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStatusRequest {
    /// 1 = Done, 2 = Pending, 3 = OnProgress, 4 = Waiting
    pub status_id: i32,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TransactionItemResponse {
    pub id: i32,
    pub product_id: i32,
    pub title: String,
    pub variant: Option<String>,
    pub size: Option<String>,
    pub quantity: i32,
    pub subtotal: String,
}

impl From<TransactionItemView> for TransactionItemResponse {
    fn from(item: TransactionItemView) -> Self {
        TransactionItemResponse {
            id: item.id,
            product_id: item.product_id,
            title: item.title,
            variant: item.variant,
            size: item.size,
            quantity: item.quantity,
            subtotal: item.subtotal.to_string(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TransactionResponse {
    pub id: i32,
    pub user_id: i32,
    pub invoice_number: String,
    pub fullname: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub payment_method: String,
    pub shipping: String,
    pub status: String,
    pub status_id: i32,
    /// Decimal amounts are rendered as strings, e.g. "44000"
    pub items_total: String,
    pub shipping_fee: String,
    pub tax_amount: String,
    pub total: String,
    pub created_at: String,
    pub updated_at: String,
    /// Empty in listings; filled in on the detail endpoints.
    pub items: Vec<TransactionItemResponse>,
}

impl From<TransactionView> for TransactionResponse {
    fn from(tx: TransactionView) -> Self {
        TransactionResponse {
            id: tx.id,
            user_id: tx.user_id,
            invoice_number: tx.invoice_number,
            fullname: tx.fullname,
            email: tx.email,
            phone: tx.phone,
            address: tx.address,
            payment_method: tx.payment_method,
            shipping: tx.shipping,
            status: tx.status.to_string(),
            status_id: tx.status.id(),
            items_total: tx.items_total.to_string(),
            shipping_fee: tx.shipping_fee.to_string(),
            tax_amount: tx.tax_amount.to_string(),
            total: tx.total.to_string(),
            created_at: tx.created_at.to_rfc3339(),
            updated_at: tx.updated_at.to_rfc3339(),
            items: tx.items.into_iter().map(Into::into).collect(),
        }
    }
}

fn paged(
    message: &str,
    base_url: &str,
    request: PageRequest,
    result: ListResult,
) -> ApiResponse<Vec<TransactionResponse>> {
    let page = Page::new(base_url, request, result.total);
    let items = result.items.into_iter().map(Into::into).collect();
    ApiResponse::paged(message, items, page)
}

// ── Customer handlers ────────────────────────────────────────────────────────

/// POST /transactions
///
/// Checks out the caller's whole cart: prices it, takes the stock and stores
/// the transaction in one step. On success the cart is empty.
#[utoipa::path(
    post,
    path = "/transactions",
    request_body = CreateTransactionRequest,
    responses(
        (status = 201, description = "Transaction created successfully", body = TransactionResponse),
        (status = 400, description = "Empty cart or missing contact information"),
        (status = 401, description = "Missing or invalid bearer token"),
        (status = 404, description = "User, shipping or payment method not found"),
        (status = 409, description = "Stock ran out or the cart changed during checkout"),
    ),
    security(("bearer_auth" = [])),
    tag = "transactions"
)]
pub async fn create_transaction(
    user: AuthUser,
    state: web::Data<AppState>,
    body: web::Json<CreateTransactionRequest>,
) -> Result<HttpResponse, AppError> {
    let request = CheckoutRequest::from(body.into_inner());

    let tx = web::block(move || state.checkout.checkout(user.id, request)).await??;

    Ok(HttpResponse::Created().json(ApiResponse::ok(
        "Transaction created successfully",
        TransactionResponse::from(tx),
    )))
}

/// GET /transactions/history
///
/// The caller's own transactions, newest first, without items.
#[utoipa::path(
    get,
    path = "/transactions/history",
    params(PageParams),
    responses(
        (status = 200, description = "Paginated transaction history", body = Vec<TransactionResponse>),
        (status = 401, description = "Missing or invalid bearer token"),
    ),
    security(("bearer_auth" = [])),
    tag = "transactions"
)]
pub async fn transaction_history(
    user: AuthUser,
    state: web::Data<AppState>,
    query: web::Query<PageParams>,
) -> Result<HttpResponse, AppError> {
    let page = PageRequest::from(query.into_inner());

    let result = web::block(move || state.transactions.history(user.id, page)).await??;

    Ok(HttpResponse::Ok().json(paged(
        "Transaction history fetched successfully",
        "/transactions/history",
        page,
        result,
    )))
}

/// GET /transactions/history/{id}
#[utoipa::path(
    get,
    path = "/transactions/history/{id}",
    params(
        ("id" = i32, Path, description = "Transaction id"),
    ),
    responses(
        (status = 200, description = "Transaction detail", body = TransactionResponse),
        (status = 401, description = "Missing or invalid bearer token"),
        (status = 404, description = "No such transaction for this user"),
    ),
    security(("bearer_auth" = [])),
    tag = "transactions"
)]
pub async fn transaction_history_detail(
    user: AuthUser,
    state: web::Data<AppState>,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();

    let tx = web::block(move || state.transactions.history_detail(user.id, id)).await??;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(
        "Transaction detail fetched successfully",
        TransactionResponse::from(tx),
    )))
}

// ── Admin handlers ───────────────────────────────────────────────────────────

/// GET /transactions
#[utoipa::path(
    get,
    path = "/transactions",
    params(PageParams),
    responses(
        (status = 200, description = "Paginated list of all transactions", body = Vec<TransactionResponse>),
        (status = 401, description = "Missing or invalid bearer token"),
        (status = 403, description = "Admin access only"),
    ),
    security(("bearer_auth" = [])),
    tag = "transactions"
)]
pub async fn list_transactions(
    _admin: AdminUser,
    state: web::Data<AppState>,
    query: web::Query<PageParams>,
) -> Result<HttpResponse, AppError> {
    let page = PageRequest::from(query.into_inner());

    let result = web::block(move || state.transactions.list(page)).await??;

    Ok(HttpResponse::Ok().json(paged(
        "Transactions fetched successfully",
        "/transactions",
        page,
        result,
    )))
}

/// GET /transactions/{id}
#[utoipa::path(
    get,
    path = "/transactions/{id}",
    params(
        ("id" = i32, Path, description = "Transaction id"),
    ),
    responses(
        (status = 200, description = "Transaction detail", body = TransactionResponse),
        (status = 401, description = "Missing or invalid bearer token"),
        (status = 403, description = "Admin access only"),
        (status = 404, description = "Transaction not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "transactions"
)]
pub async fn get_transaction(
    _admin: AdminUser,
    state: web::Data<AppState>,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();

    let tx = web::block(move || state.transactions.get(id)).await??;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(
        "Transaction fetched successfully",
        TransactionResponse::from(tx),
    )))
}

/// PATCH /transactions/{id}/status
#[utoipa::path(
    patch,
    path = "/transactions/{id}/status",
    params(
        ("id" = i32, Path, description = "Transaction id"),
    ),
    request_body = UpdateStatusRequest,
    responses(
        (status = 200, description = "Status updated", body = TransactionResponse),
        (status = 400, description = "Unknown status id"),
        (status = 401, description = "Missing or invalid bearer token"),
        (status = 403, description = "Admin access only"),
        (status = 404, description = "Transaction not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "transactions"
)]
pub async fn update_transaction_status(
    _admin: AdminUser,
    state: web::Data<AppState>,
    path: web::Path<i32>,
    body: web::Json<UpdateStatusRequest>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let status_id = body.into_inner().status_id;

    let tx = web::block(move || state.transactions.set_status(id, status_id)).await??;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(
        "Transaction status updated successfully",
        TransactionResponse::from(tx),
    )))
}

/// DELETE /transactions/{id}
#[utoipa::path(
    delete,
    path = "/transactions/{id}",
    params(
        ("id" = i32, Path, description = "Transaction id"),
    ),
    responses(
        (status = 200, description = "Transaction deleted successfully"),
        (status = 401, description = "Missing or invalid bearer token"),
        (status = 403, description = "Admin access only"),
        (status = 404, description = "Transaction not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "transactions"
)]
pub async fn delete_transaction(
    _admin: AdminUser,
    state: web::Data<AppState>,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();

    web::block(move || state.transactions.delete(id)).await??;

    Ok(HttpResponse::Ok().json(ApiResponse::message("Transaction deleted successfully")))
}
