//! Operation facade over the signed transport.

use crate::config::{ClientConfig, Credentials};
use crate::error::{Error, Result};
use crate::paapi::models::{BrowseNode, CartSnapshot, Item};
use crate::paapi::operation::Operation;
use crate::paapi::params::{
    positional_params, validate_asins, ItemIdType, ItemIds, Quantities,
};
use crate::paapi::transport::Transport;
use crate::paapi::xml::Value;
use async_trait::async_trait;
use tracing::info;

/// Most item ids the vendor accepts per ItemLookup request.
pub const ITEM_LOOKUP_MAX: usize = 10;

/// Response group sent with lookups when the caller does not pick one.
pub const DEFAULT_LOOKUP_RESPONSE_GROUP: &str = "ItemAttributes,OfferFull,Offers,Images,Large";

/// Parameters for an ItemSearch call. All fields are optional; `extra` passes
/// any further vendor parameter (e.g. `BrowseNode`, `Sort`) through untouched.
#[derive(Debug, Clone, Default)]
pub struct SearchQuery {
    pub keywords: Option<String>,
    pub search_index: Option<String>,
    pub response_group: Option<String>,
    pub page: Option<u32>,
    pub extra: Vec<(String, String)>,
}

impl SearchQuery {
    pub fn keywords(keywords: impl Into<String>) -> Self {
        Self {
            keywords: Some(keywords.into()),
            ..Self::default()
        }
    }

    pub fn search_index(mut self, index: impl Into<String>) -> Self {
        self.search_index = Some(index.into());
        self
    }

    pub fn response_group(mut self, group: impl Into<String>) -> Self {
        self.response_group = Some(group.into());
        self
    }

    pub fn page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra.push((key.into(), value.into()));
        self
    }
}

/// Product Advertising API operations.
///
/// The cart model is generic over this trait so tests can substitute a fake
/// remote cart for [`PaapiClient`].
#[async_trait]
pub trait ProductAdvertising: Send + Sync {
    async fn item_search(&self, query: SearchQuery) -> Result<Vec<Item>>;

    async fn item_lookup(&self, ids: ItemIds, response_group: Option<&str>) -> Result<Vec<Item>>;

    async fn similarity_lookup(&self, ids: ItemIds, id_type: ItemIdType) -> Result<Vec<Item>>;

    async fn browse_node_lookup(
        &self,
        node_id: u64,
        response_group: Option<&str>,
    ) -> Result<Vec<BrowseNode>>;

    async fn cart_create(
        &self,
        ids: ItemIds,
        quantities: Quantities,
        id_type: ItemIdType,
    ) -> Result<CartSnapshot>;

    async fn cart_add(
        &self,
        cart_id: &str,
        hmac: &str,
        ids: ItemIds,
        quantities: Quantities,
        id_type: ItemIdType,
    ) -> Result<CartSnapshot>;

    async fn cart_modify(
        &self,
        cart_id: &str,
        hmac: &str,
        cart_item_ids: &[String],
        quantities: Quantities,
    ) -> Result<CartSnapshot>;

    async fn cart_get(&self, cart_id: &str, cart_item_id: &str, hmac: &str)
        -> Result<CartSnapshot>;

    async fn cart_clear(&self, cart_id: &str, hmac: &str) -> Result<CartSnapshot>;
}

/// Client for the legacy Product Advertising API.
pub struct PaapiClient {
    transport: Transport,
}

impl PaapiClient {
    /// Creates a client; credentials and configuration are validated up front.
    pub fn new(credentials: Credentials, config: &ClientConfig) -> Result<Self> {
        Ok(Self {
            transport: Transport::new(credentials, config)?,
        })
    }

    /// Creates a client against a custom host (for testing).
    pub fn with_base_url(
        credentials: Credentials,
        config: &ClientConfig,
        base_url: Option<String>,
    ) -> Result<Self> {
        let host = base_url.map(|url| {
            url.trim_start_matches("http://")
                .trim_start_matches("https://")
                .trim_end_matches('/')
                .to_string()
        });
        Ok(Self {
            transport: Transport::with_host(credentials, config, host)?,
        })
    }

    /// Dispatches and pulls the logical result out of the payload.
    async fn call(&self, operation: Operation, params: Vec<(String, String)>) -> Result<Value> {
        let payload = self.transport.execute(operation, &params).await?;
        payload
            .get(operation.result_root())
            .cloned()
            .ok_or_else(|| {
                Error::Xml(format!(
                    "{} missing from {} response",
                    operation.result_root(),
                    operation
                ))
            })
    }

    fn cart_reference(cart_id: &str, hmac: &str) -> Result<Vec<(String, String)>> {
        if cart_id.is_empty() {
            return Err(Error::Validation("CartId is required".into()));
        }
        if hmac.is_empty() {
            return Err(Error::Validation("HMAC is required".into()));
        }
        Ok(vec![
            ("CartId".to_string(), cart_id.to_string()),
            ("HMAC".to_string(), hmac.to_string()),
        ])
    }

    fn cart_lines(
        ids: &ItemIds,
        quantities: &Quantities,
        id_type: ItemIdType,
    ) -> Result<Vec<(String, String)>> {
        if ids.is_empty() {
            return Err(Error::Validation("at least one item id is required".into()));
        }
        if id_type == ItemIdType::Asin {
            validate_asins(ids.iter())?;
        }
        let quantities = quantities.broadcast(ids.len())?;
        Ok(positional_params(id_type.field(), ids.as_slice(), &quantities))
    }
}

#[async_trait]
impl ProductAdvertising for PaapiClient {
    async fn item_search(&self, query: SearchQuery) -> Result<Vec<Item>> {
        let mut params = Vec::new();
        if let Some(keywords) = &query.keywords {
            params.push(("Keywords".to_string(), keywords.clone()));
        }
        if let Some(index) = &query.search_index {
            params.push(("SearchIndex".to_string(), index.clone()));
        }
        if let Some(group) = &query.response_group {
            params.push(("ResponseGroup".to_string(), group.clone()));
        }
        if let Some(page) = query.page {
            params.push(("ItemPage".to_string(), page.to_string()));
        }
        params.extend(query.extra.iter().cloned());

        if params.is_empty() {
            return Err(Error::Validation(
                "ItemSearch needs at least one search parameter".into(),
            ));
        }

        let items = self.call(Operation::ItemSearch, params).await?;
        Ok(Item::decode_list(&items))
    }

    async fn item_lookup(&self, ids: ItemIds, response_group: Option<&str>) -> Result<Vec<Item>> {
        if ids.is_empty() {
            return Err(Error::Validation("at least one item id is required".into()));
        }
        validate_asins(ids.iter())?;

        let group = response_group.unwrap_or(DEFAULT_LOOKUP_RESPONSE_GROUP);
        let mut results = Vec::with_capacity(ids.len());

        // the vendor caps ItemId at ten per request
        for chunk in ids.chunks(ITEM_LOOKUP_MAX) {
            info!("Looking up {} items", chunk.len());
            let params = vec![
                ("ItemId".to_string(), chunk.join(",")),
                ("ResponseGroup".to_string(), group.to_string()),
            ];
            let items = self.call(Operation::ItemLookup, params).await?;
            results.extend(Item::decode_list(&items));
        }

        Ok(results)
    }

    async fn similarity_lookup(&self, ids: ItemIds, id_type: ItemIdType) -> Result<Vec<Item>> {
        if ids.is_empty() {
            return Err(Error::Validation("at least one item id is required".into()));
        }
        if id_type == ItemIdType::Asin {
            validate_asins(ids.iter())?;
        }

        let params = vec![
            ("ItemId".to_string(), ids.as_slice().join(",")),
            ("ItemIdType".to_string(), id_type.field().to_string()),
        ];
        let items = self.call(Operation::SimilarityLookup, params).await?;
        Ok(Item::decode_list(&items))
    }

    async fn browse_node_lookup(
        &self,
        node_id: u64,
        response_group: Option<&str>,
    ) -> Result<Vec<BrowseNode>> {
        let mut params = vec![("BrowseNodeId".to_string(), node_id.to_string())];
        if let Some(group) = response_group {
            params.push(("ResponseGroup".to_string(), group.to_string()));
        }

        let nodes = self.call(Operation::BrowseNodeLookup, params).await?;
        Ok(BrowseNode::decode_list(&nodes))
    }

    async fn cart_create(
        &self,
        ids: ItemIds,
        quantities: Quantities,
        id_type: ItemIdType,
    ) -> Result<CartSnapshot> {
        let params = Self::cart_lines(&ids, &quantities, id_type)?;
        info!("Creating a cart with {} item(s)", ids.len());
        let cart = self.call(Operation::CartCreate, params).await?;
        CartSnapshot::decode(&cart)
    }

    async fn cart_add(
        &self,
        cart_id: &str,
        hmac: &str,
        ids: ItemIds,
        quantities: Quantities,
        id_type: ItemIdType,
    ) -> Result<CartSnapshot> {
        let mut params = Self::cart_reference(cart_id, hmac)?;
        params.extend(Self::cart_lines(&ids, &quantities, id_type)?);
        info!("Adding {} item(s) to cart {}", ids.len(), cart_id);
        let cart = self.call(Operation::CartAdd, params).await?;
        CartSnapshot::decode(&cart)
    }

    async fn cart_modify(
        &self,
        cart_id: &str,
        hmac: &str,
        cart_item_ids: &[String],
        quantities: Quantities,
    ) -> Result<CartSnapshot> {
        if cart_item_ids.is_empty() {
            return Err(Error::Validation(
                "at least one cart item id is required".into(),
            ));
        }
        let mut params = Self::cart_reference(cart_id, hmac)?;
        let quantities = quantities.broadcast(cart_item_ids.len())?;
        params.extend(positional_params("CartItemId", cart_item_ids, &quantities));

        info!("Modifying {} line(s) in cart {}", cart_item_ids.len(), cart_id);
        let cart = self.call(Operation::CartModify, params).await?;
        CartSnapshot::decode(&cart)
    }

    async fn cart_get(
        &self,
        cart_id: &str,
        cart_item_id: &str,
        hmac: &str,
    ) -> Result<CartSnapshot> {
        if cart_item_id.is_empty() {
            return Err(Error::Validation("CartItemId is required".into()));
        }
        let mut params = Self::cart_reference(cart_id, hmac)?;
        params.push(("CartItemId".to_string(), cart_item_id.to_string()));

        let cart = self.call(Operation::CartGet, params).await?;
        CartSnapshot::decode(&cart)
    }

    async fn cart_clear(&self, cart_id: &str, hmac: &str) -> Result<CartSnapshot> {
        let params = Self::cart_reference(cart_id, hmac)?;
        info!("Clearing cart {}", cart_id);
        let cart = self.call(Operation::CartClear, params).await?;
        CartSnapshot::decode(&cart)
    }
}
