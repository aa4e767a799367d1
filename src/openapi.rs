use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::handlers::{self, cart, transactions};
use crate::response::{Links, Pagination};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Coffee Checkout API",
        version = "0.1.0",
        description = "Cart and checkout backend for a coffee shop. Every response uses the \
                       `{success, message, data?, error?, pagination?, links?}` envelope."
    ),
    paths(
        handlers::health,
        cart::add_to_cart,
        cart::get_cart,
        cart::delete_cart_item,
        transactions::create_transaction,
        transactions::transaction_history,
        transactions::transaction_history_detail,
        transactions::list_transactions,
        transactions::get_transaction,
        transactions::update_transaction_status,
        transactions::delete_transaction,
    ),
    components(schemas(
        cart::AddCartLineRequest,
        cart::CartLineResponse,
        cart::CartResponse,
        transactions::CreateTransactionRequest,
        transactions::UpdateStatusRequest,
        transactions::TransactionItemResponse,
        transactions::TransactionResponse,
        Pagination,
        Links,
    )),
    modifiers(&BearerAuth),
    tags(
        (name = "health", description = "Liveness check"),
        (name = "cart", description = "The caller's shopping cart"),
        (name = "transactions", description = "Checkout and order history"),
    )
)]
pub struct ApiDoc;

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_every_route() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&str> = doc.paths.paths.keys().map(String::as_str).collect();

        for expected in [
            "/",
            "/cart",
            "/cart/{id}",
            "/transactions",
            "/transactions/history",
            "/transactions/history/{id}",
            "/transactions/{id}",
            "/transactions/{id}/status",
        ] {
            assert!(paths.contains(&expected), "missing {expected}");
        }
    }

    #[test]
    fn bearer_scheme_is_registered() {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("bearer_auth"));
    }
}
