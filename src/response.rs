//! The JSON envelope every endpoint answers with:
//! `{success, message, data?, error?, pagination?, links?}`.

use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::transaction::PageRequest;

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Machine-readable error kind, e.g. `EmptyCart`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub links: Option<Links>,
}

impl<T> ApiResponse<T> {
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Some(data),
            error: None,
            pagination: None,
            links: None,
        }
    }

    pub fn paged(message: impl Into<String>, data: T, page: Page) -> Self {
        Self {
            pagination: Some(page.pagination),
            links: Some(page.links),
            ..Self::ok(message, data)
        }
    }
}

impl ApiResponse<()> {
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: None,
            error: None,
            pagination: None,
            links: None,
        }
    }

    pub fn failure(message: impl Into<String>, kind: &str) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: None,
            error: Some(kind.to_string()),
            pagination: None,
            links: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: i64,
    pub limit: i64,
    pub total_items: i64,
    pub total_pages: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct Links {
    pub next: Option<String>,
    pub back: Option<String>,
}

pub struct Page {
    pub pagination: Pagination,
    pub links: Links,
}

impl Page {
    /// Pagination metadata for `total_items` rows served from `base_url`.
    pub fn new(base_url: &str, request: PageRequest, total_items: i64) -> Self {
        let PageRequest { page, limit } = request;
        let total_pages = (total_items + limit - 1) / limit;
        let link = |target: i64| format!("{base_url}?limit={limit}&page={target}");

        Self {
            pagination: Pagination {
                page,
                limit,
                total_items,
                total_pages,
            },
            links: Links {
                next: (page < total_pages).then(|| link(page + 1)),
                back: (page > 1).then(|| link(page - 1)),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn middle_page_links_both_ways() {
        let page = Page::new("/transactions", PageRequest::new(Some(2), Some(10)), 25);

        assert_eq!(page.pagination.total_pages, 3);
        assert_eq!(page.links.next.as_deref(), Some("/transactions?limit=10&page=3"));
        assert_eq!(page.links.back.as_deref(), Some("/transactions?limit=10&page=1"));
    }

    #[test]
    fn empty_listing_has_no_links() {
        let page = Page::new("/transactions/history", PageRequest::new(None, None), 0);

        assert_eq!(page.pagination.total_pages, 0);
        assert_eq!(page.links, Links { next: None, back: None });
    }

    #[test]
    fn failure_envelope_omits_data() {
        let json = serde_json::to_value(ApiResponse::failure("Cart is empty", "EmptyCart"))
            .expect("serialize");

        assert_eq!(
            json,
            serde_json::json!({"success": false, "message": "Cart is empty", "error": "EmptyCart"})
        );
    }
}
