//! Typed results decoded from normalized responses.
//!
//! Each operation's payload is decoded exactly once, here, so callers never
//! index into loosely-typed maps.

use crate::error::{Error, Result};
use crate::paapi::xml::Value;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// A monetary amount in minor units (cents).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Price {
    /// Amount in minor units
    pub amount: i64,
    /// Currency code (USD, EUR, etc.)
    pub currency_code: String,
    /// Vendor-formatted display string, when present
    pub formatted: Option<String>,
}

impl Price {
    pub(crate) fn decode(value: &Value) -> Option<Self> {
        Some(Self {
            amount: value.text_of("Amount")?.parse().ok()?,
            currency_code: value.text_of("CurrencyCode").unwrap_or_default().to_string(),
            formatted: value.text_of("FormattedPrice").map(str::to_string),
        })
    }

    /// Amount in major units (dollars, euros, ...).
    pub fn as_major_units(&self) -> f64 {
        self.amount as f64 / 100.0
    }
}

/// A catalog item from lookup/search responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    /// Amazon Standard Identification Number
    pub asin: String,
    /// Product title
    pub title: Option<String>,
    /// Full product URL
    pub detail_page_url: Option<String>,
    /// Brand, when the response group includes attributes
    pub brand: Option<String>,
    /// List price, when the response group includes attributes
    pub list_price: Option<Price>,
}

impl Item {
    pub(crate) fn decode(value: &Value) -> Option<Self> {
        let attributes = value.get("ItemAttributes");
        Some(Self {
            asin: value.text_of("ASIN")?.to_string(),
            title: attributes.and_then(|a| a.text_of("Title")).map(str::to_string),
            detail_page_url: value.text_of("DetailPageURL").map(str::to_string),
            brand: attributes.and_then(|a| a.text_of("Brand")).map(str::to_string),
            list_price: attributes.and_then(|a| a.get("ListPrice")).and_then(Price::decode),
        })
    }

    /// Decodes every `Item` under an `Items` payload, skipping (and logging)
    /// entries that do not carry an ASIN.
    pub(crate) fn decode_list(items_payload: &Value) -> Vec<Item> {
        let Some(item_nodes) = items_payload.get("Item") else {
            return Vec::new();
        };
        item_nodes
            .items()
            .into_iter()
            .filter_map(|node| {
                let item = Item::decode(node);
                if item.is_none() {
                    warn!("Skipping item without an ASIN");
                }
                item
            })
            .collect()
    }
}

/// A node in the browse hierarchy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrowseNode {
    pub id: String,
    pub name: Option<String>,
    pub children: Vec<BrowseNode>,
}

impl BrowseNode {
    pub(crate) fn decode(value: &Value) -> Option<Self> {
        let children = value
            .path(&["Children", "BrowseNode"])
            .map(|nodes| nodes.items().into_iter().filter_map(BrowseNode::decode).collect())
            .unwrap_or_default();

        Some(Self {
            id: value.text_of("BrowseNodeId")?.to_string(),
            name: value.text_of("Name").map(str::to_string),
            children,
        })
    }

    pub(crate) fn decode_list(payload: &Value) -> Vec<BrowseNode> {
        let Some(nodes) = payload.get("BrowseNode") else {
            return Vec::new();
        };
        nodes.items().into_iter().filter_map(BrowseNode::decode).collect()
    }
}

/// One line of a remote cart. The cart-item id is assigned remotely and is
/// opaque to this client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    pub cart_item_id: String,
    /// ASIN or offer-listing id
    pub item_id: String,
    pub title: Option<String>,
    pub quantity: u32,
    pub price: Option<Price>,
}

impl CartItem {
    fn decode(value: &Value) -> Option<Self> {
        Some(Self {
            cart_item_id: value.text_of("CartItemId")?.to_string(),
            item_id: value.text_of("ASIN")?.to_string(),
            title: value.text_of("Title").map(str::to_string),
            quantity: value.text_of("Quantity")?.parse().ok()?,
            price: value.get("Price").and_then(Price::decode),
        })
    }
}

/// The quantity echo of one CartModify line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartModification {
    pub cart_item_id: String,
    pub quantity: u32,
}

/// A decoded `Cart` payload.
///
/// Create/add/get responses carry the full `CartItems` list; modify responses
/// only echo the requested changes, which land in `modifications`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartSnapshot {
    pub cart_id: String,
    pub hmac: String,
    pub purchase_url: Option<String>,
    pub subtotal: Option<Price>,
    pub items: Vec<CartItem>,
    pub modifications: Vec<CartModification>,
}

impl CartSnapshot {
    /// Decodes a `Cart` payload; cart id and HMAC are mandatory.
    pub(crate) fn decode(cart: &Value) -> Result<Self> {
        let cart_id = cart
            .text_of("CartId")
            .ok_or_else(|| Error::Xml("CartId missing from Cart response".into()))?
            .to_string();
        let hmac = cart
            .text_of("HMAC")
            .ok_or_else(|| Error::Xml("HMAC missing from Cart response".into()))?
            .to_string();

        let items = cart
            .path(&["CartItems", "CartItem"])
            .map(|nodes| {
                nodes
                    .items()
                    .into_iter()
                    .filter_map(|node| {
                        let item = CartItem::decode(node);
                        if item.is_none() {
                            warn!("Skipping cart item with missing fields");
                        }
                        item
                    })
                    .collect()
            })
            .unwrap_or_default();

        let modifications = cart
            .path(&["Request", "CartModifyRequest", "Items", "Item"])
            .map(|nodes| {
                nodes
                    .items()
                    .into_iter()
                    .filter_map(|node| {
                        Some(CartModification {
                            cart_item_id: node.text_of("CartItemId")?.to_string(),
                            quantity: node.text_of("Quantity")?.parse().ok()?,
                        })
                    })
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            cart_id,
            hmac,
            purchase_url: cart
                .text_of("PurchaseURL")
                .filter(|url| !url.is_empty())
                .map(str::to_string),
            subtotal: cart.get("SubTotal").and_then(Price::decode),
            items,
            modifications,
        })
    }
}
