//! Listing, filter and dashboard types

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

use super::order::OrderStatus;
use super::product::Gender;

/// Page size used when none is chosen
pub const DEFAULT_PAGE_LIMIT: u32 = 20;

/// Page sizes offered by the list screens
pub const PAGE_LIMITS: [u32; 3] = [10, 20, 50];

/// One page of a list endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct Page<T> {
    /// Items on this page
    #[serde(default, deserialize_with = "null_default")]
    pub items: Vec<T>,

    /// Total number of matching items
    #[serde(default, deserialize_with = "null_default")]
    pub total: u64,

    /// Page number reported by the server
    #[serde(default)]
    pub page: Option<u32>,
}

impl<T> Page<T> {
    /// Number of pages for `limit` items per page, never less than one
    pub fn page_count(&self, limit: u32) -> u32 {
        if limit == 0 {
            return 1;
        }
        let pages = self.total.div_ceil(u64::from(limit)).max(1);
        u32::try_from(pages).unwrap_or(u32::MAX)
    }

    /// The server's page number, or `requested` when it did not report one
    pub fn current_page(&self, requested: u32) -> u32 {
        self.page.filter(|p| *p > 0).unwrap_or(requested)
    }
}

/// Filters for the orders list
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderFilters {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub status: Option<OrderStatus>,
    /// Customer object id
    pub user: Option<String>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

/// Filters for the products list
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductFilters {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    /// Free-text search over name, brand and tags
    pub q: Option<String>,
    pub category: Option<String>,
    pub gender: Option<Gender>,
    pub brand: Option<String>,
    pub is_active: Option<bool>,
}

/// Counters shown on the dashboard
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardStats {
    pub orders_count: u64,
    pub products_count: u64,
}

/// Deserialize `null` as the type's default
pub(crate) fn null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
