// src/services/storefront.rs

//! Storefront promotions service.
//!
//! Fetches the free-games promotions feed and normalizes catalog elements
//! into promotion records. A record survives normalization when the element
//! is free right now: zero discount price and an active promotional window.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;

use crate::error::{AppError, Result};
use crate::models::{Config, PromotionRecord};
use crate::utils::claim_url;
use crate::utils::http::create_async_client;

/// Preferred key-image types for the announcement cover, in order.
const WIDE_IMAGE_TYPES: [&str; 2] = ["DieselStoreFrontWide", "OfferImageWide"];

/// Source of the current free promotions.
#[async_trait]
pub trait PromotionSource: Send + Sync {
    /// Fetch the currently free promotions, normalized, in feed order.
    async fn fetch_free_games(&self) -> Result<Vec<PromotionRecord>>;
}

/// Client for the storefront free-games promotions endpoint.
pub struct EpicStorefront {
    client: Client,
    api_url: String,
    region: String,
}

impl EpicStorefront {
    /// Create a storefront client from configuration.
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self {
            client: create_async_client(config)?,
            api_url: config.api_url.clone(),
            region: config.epic_games_region.clone(),
        })
    }

    async fn fetch(&self) -> Result<Vec<PromotionRecord>> {
        log::info!("Fetching free games for region {}", self.region);

        let response = self
            .client
            .get(&self.api_url)
            .query(&[
                ("locale", "en-US"),
                ("country", self.region.as_str()),
                ("allowCountries", self.region.as_str()),
            ])
            .send()
            .await
            .map_err(|e| AppError::fetch(&self.api_url, e))?
            .error_for_status()
            .map_err(|e| AppError::fetch(&self.api_url, e))?;

        let feed: PromotionsFeed = response
            .json()
            .await
            .map_err(|e| AppError::fetch(&self.api_url, e))?;

        let records = normalize(feed, Utc::now());
        log::info!("Found {} free games", records.len());
        Ok(records)
    }
}

#[async_trait]
impl PromotionSource for EpicStorefront {
    async fn fetch_free_games(&self) -> Result<Vec<PromotionRecord>> {
        self.fetch().await
    }
}

// Wire format of the promotions endpoint, limited to the fields we read.
// Elements stay raw JSON so one malformed entry cannot fail the whole feed.

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct PromotionsFeed {
    data: FeedData,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct FeedData {
    #[serde(rename = "Catalog")]
    catalog: Catalog,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
struct Catalog {
    search_store: SearchStore,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct SearchStore {
    elements: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
struct CatalogElement {
    id: String,
    title: String,
    product_slug: Option<String>,
    url_slug: Option<String>,
    key_images: Vec<KeyImage>,
    price: PriceInfo,
    promotions: Option<PromotionBlock>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct KeyImage {
    #[serde(rename = "type")]
    image_type: String,
    url: String,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
struct PriceInfo {
    total_price: TotalPrice,
}

#[derive(Debug, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct TotalPrice {
    original_price: i64,
    discount_price: i64,
    currency_code: String,
}

impl Default for TotalPrice {
    fn default() -> Self {
        Self {
            original_price: 0,
            discount_price: 0,
            currency_code: "USD".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
struct PromotionBlock {
    promotional_offers: Vec<OfferGroup>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
struct OfferGroup {
    promotional_offers: Vec<PromotionalOffer>,
}

#[derive(Debug, Deserialize, Clone, Copy)]
#[serde(rename_all = "camelCase")]
struct PromotionalOffer {
    start_date: DateTime<Utc>,
    end_date: DateTime<Utc>,
}

/// Normalize the raw feed into promotion records, in feed order.
fn normalize(feed: PromotionsFeed, now: DateTime<Utc>) -> Vec<PromotionRecord> {
    let elements = feed.data.catalog.search_store.elements;
    let mut records = Vec::new();

    for value in elements {
        let element: CatalogElement = match serde_json::from_value(value) {
            Ok(element) => element,
            Err(e) => {
                log::warn!("Skipping malformed catalog element: {e}");
                continue;
            }
        };

        if let Some(record) = normalize_element(element, now) {
            records.push(record);
        }
    }

    records
}

/// Turn one catalog element into a record, or None if it is not a currently
/// free promotion.
fn normalize_element(element: CatalogElement, now: DateTime<Utc>) -> Option<PromotionRecord> {
    let offer = active_offer(&element, now)?;

    if element.price.total_price.discount_price != 0 {
        return None;
    }

    let slug = element
        .product_slug
        .as_deref()
        .or(element.url_slug.as_deref())
        .filter(|s| !s.is_empty());

    let id = match slug {
        Some(slug) => slug.to_string(),
        None if !element.id.is_empty() => element.id.clone(),
        None => {
            log::warn!("Skipping element '{}' without a usable id", element.title);
            return None;
        }
    };

    Some(PromotionRecord {
        id,
        title: element.title.clone(),
        start_time: offer.start_date,
        end_time: offer.end_date,
        original_price: element.price.total_price.original_price,
        discount_price: element.price.total_price.discount_price,
        currency_code: element.price.total_price.currency_code.clone(),
        image_url: cover_image(&element.key_images),
        claim_url: slug.map(claim_url).unwrap_or_default(),
    })
}

/// The first promotional offer of the first offer group, if it is active.
fn active_offer(element: &CatalogElement, now: DateTime<Utc>) -> Option<PromotionalOffer> {
    let offer = element
        .promotions
        .as_ref()?
        .promotional_offers
        .first()?
        .promotional_offers
        .first()?;

    (offer.start_date <= now && now <= offer.end_date).then_some(*offer)
}

/// Pick the wide storefront image, falling back to the first image.
fn cover_image(images: &[KeyImage]) -> String {
    images
        .iter()
        .find(|img| WIDE_IMAGE_TYPES.contains(&img.image_type.as_str()))
        .or_else(|| images.first())
        .map(|img| img.url.clone())
        .unwrap_or_default()
}
