//! Local mirror of a remote shopping cart.
//!
//! The mirror tracks the remote cart's binding (id, HMAC) and line items, and
//! reconciles after every call. Operations that need a bound cart are logged
//! and skipped when no cart exists yet; item references that do not resolve
//! to a known line are logged and dropped rather than failing the whole call.

use crate::error::Result;
use crate::paapi::client::ProductAdvertising;
use crate::paapi::models::{CartItem, CartSnapshot, Price};
use crate::paapi::params::{ItemIdType, ItemIds, Quantities};
use tracing::{info, warn};

#[derive(Debug, Clone)]
struct Binding {
    cart_id: String,
    hmac: String,
    purchase_url: Option<String>,
    subtotal: Option<Price>,
}

/// A stateful cart over any [`ProductAdvertising`] client.
///
/// Lines are keyed by ASIN unless the cart is built with
/// [`Cart::with_id_type`], in which case every item identifier handed to
/// `create`/`add` is sent as that kind instead.
pub struct Cart<C> {
    client: C,
    id_type: ItemIdType,
    binding: Option<Binding>,
    items: Vec<CartItem>,
}

impl<C: ProductAdvertising> Cart<C> {
    /// Wraps a client with an unbound, ASIN-keyed cart.
    pub fn new(client: C) -> Self {
        Self::with_id_type(client, ItemIdType::Asin)
    }

    /// Wraps a client with an unbound cart keyed by the given identifier
    /// kind, e.g. offer-listing ids.
    pub fn with_id_type(client: C, id_type: ItemIdType) -> Self {
        Self {
            client,
            id_type,
            binding: None,
            items: Vec::new(),
        }
    }

    pub fn is_bound(&self) -> bool {
        self.binding.is_some()
    }

    pub fn cart_id(&self) -> Option<&str> {
        self.binding.as_ref().map(|b| b.cart_id.as_str())
    }

    pub fn hmac(&self) -> Option<&str> {
        self.binding.as_ref().map(|b| b.hmac.as_str())
    }

    pub fn purchase_url(&self) -> Option<&str> {
        self.binding.as_ref().and_then(|b| b.purchase_url.as_deref())
    }

    pub fn subtotal(&self) -> Option<&Price> {
        self.binding.as_ref().and_then(|b| b.subtotal.as_ref())
    }

    /// Current line items, in remote order.
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Quantity of an item in the mirror, 0 when absent.
    pub fn quantity_of(&self, item_id: &str) -> u32 {
        self.items
            .iter()
            .find(|item| item.item_id == item_id)
            .map(|item| item.quantity)
            .unwrap_or(0)
    }

    /// Creates a fresh remote cart with the given items, replacing any
    /// previous binding.
    pub async fn create(
        &mut self,
        ids: impl Into<ItemIds>,
        quantities: impl Into<Quantities>,
    ) -> Result<()> {
        let snapshot = self
            .client
            .cart_create(ids.into(), quantities.into(), self.id_type)
            .await?;
        self.rebind(snapshot);
        Ok(())
    }

    /// Adds items, creating the cart first when unbound. Items already in the
    /// cart are modified to their summed quantity instead of being re-added,
    /// so one item never splits across two lines.
    pub async fn add(
        &mut self,
        ids: impl Into<ItemIds>,
        quantities: impl Into<Quantities>,
    ) -> Result<()> {
        let ids = ids.into();
        let quantities = quantities.into().broadcast(ids.len())?;

        let Some(binding) = self.binding.clone() else {
            let snapshot = self
                .client
                .cart_create(ids, Quantities::PerItem(quantities), self.id_type)
                .await?;
            self.rebind(snapshot);
            return Ok(());
        };

        let mut updates: Vec<(String, u32)> = Vec::new();
        let mut additions: Vec<String> = Vec::new();
        let mut addition_quantities: Vec<u32> = Vec::new();

        for (id, quantity) in ids.iter().zip(quantities) {
            match self.items.iter().find(|item| item.item_id == id) {
                Some(existing) => updates.push((id.to_string(), existing.quantity + quantity)),
                None => {
                    additions.push(id.to_string());
                    addition_quantities.push(quantity);
                }
            }
        }

        if !updates.is_empty() {
            let (ids, quantities): (Vec<String>, Vec<u32>) = updates.into_iter().unzip();
            self.modify(ids, quantities).await?;
        }

        if !additions.is_empty() {
            // re-read the binding, the modify above may have rotated the HMAC
            let binding = self.binding.clone().unwrap_or(binding);
            info!("Adding {} new line(s) to cart {}", additions.len(), binding.cart_id);
            let snapshot = self
                .client
                .cart_add(
                    &binding.cart_id,
                    &binding.hmac,
                    ItemIds::from(additions),
                    Quantities::PerItem(addition_quantities),
                    self.id_type,
                )
                .await?;
            self.rebind(snapshot);
        }

        Ok(())
    }

    /// Decrements items by `quantity`, or removes them entirely when
    /// `quantity` is None or 0. Quantities never go below zero; removing more
    /// than present deletes the line.
    pub async fn remove(
        &mut self,
        ids: impl Into<ItemIds>,
        quantity: Option<u32>,
    ) -> Result<()> {
        let ids = ids.into();
        let mut refs: Vec<String> = Vec::new();
        let mut targets: Vec<u32> = Vec::new();

        for id in ids.iter() {
            let Some(current) = self.items.iter().find(|item| item.item_id == id) else {
                warn!("Cannot remove {}: not in the cart", id);
                continue;
            };
            let target = match quantity {
                Some(q) if q > 0 => current.quantity.saturating_sub(q),
                _ => 0,
            };
            refs.push(id.to_string());
            targets.push(target);
        }

        if refs.is_empty() {
            warn!("Nothing to remove");
            return Ok(());
        }

        self.modify(refs, targets).await
    }

    /// Sets line quantities. References may be item ids or cart-item ids;
    /// unknown references are logged and dropped. A quantity of zero deletes
    /// the line.
    pub async fn modify(
        &mut self,
        refs: impl Into<ItemIds>,
        quantities: impl Into<Quantities>,
    ) -> Result<()> {
        let Some(binding) = self.binding.clone() else {
            warn!("Cannot modify an uninitialized cart");
            return Ok(());
        };

        let refs = refs.into();
        let quantities = quantities.into().broadcast(refs.len())?;

        let mut cart_item_ids: Vec<String> = Vec::new();
        let mut line_quantities: Vec<u32> = Vec::new();
        for (reference, quantity) in refs.iter().zip(quantities) {
            match self.resolve(reference) {
                Some(cart_item_id) => {
                    cart_item_ids.push(cart_item_id);
                    line_quantities.push(quantity);
                }
                None => warn!("Cannot modify {}: not in the cart", reference),
            }
        }

        if cart_item_ids.is_empty() {
            warn!("No cart lines matched, nothing to modify");
            return Ok(());
        }

        let snapshot = self
            .client
            .cart_modify(
                &binding.cart_id,
                &binding.hmac,
                &cart_item_ids,
                Quantities::PerItem(line_quantities),
            )
            .await?;
        self.apply_modifications(snapshot);
        Ok(())
    }

    /// Empties the remote cart. The binding survives so the cart can be
    /// reused; unbound carts are a logged no-op.
    pub async fn clear(&mut self) -> Result<()> {
        let Some(binding) = self.binding.clone() else {
            warn!("Cannot clear an uninitialized cart");
            return Ok(());
        };

        let snapshot = self.client.cart_clear(&binding.cart_id, &binding.hmac).await?;
        self.rebind(snapshot);
        Ok(())
    }

    /// Binds to an existing remote cart and mirrors its current contents.
    pub async fn get(&mut self, cart_id: &str, cart_item_id: &str, hmac: &str) -> Result<()> {
        let snapshot = self.client.cart_get(cart_id, cart_item_id, hmac).await?;
        self.rebind(snapshot);
        Ok(())
    }

    /// Maps an item id or cart-item id onto the remote line id.
    fn resolve(&self, reference: &str) -> Option<String> {
        self.items
            .iter()
            .find(|item| item.item_id == reference || item.cart_item_id == reference)
            .map(|item| item.cart_item_id.clone())
    }

    /// Replaces the mirror wholesale from a full snapshot.
    fn rebind(&mut self, snapshot: CartSnapshot) {
        self.binding = Some(Binding {
            cart_id: snapshot.cart_id,
            hmac: snapshot.hmac,
            purchase_url: snapshot.purchase_url,
            subtotal: snapshot.subtotal,
        });
        self.items = snapshot.items;
    }

    /// Patches the mirror from a modify response, which only echoes the
    /// changed lines.
    fn apply_modifications(&mut self, snapshot: CartSnapshot) {
        for modification in &snapshot.modifications {
            if modification.quantity == 0 {
                self.items
                    .retain(|item| item.cart_item_id != modification.cart_item_id);
            } else if let Some(item) = self
                .items
                .iter_mut()
                .find(|item| item.cart_item_id == modification.cart_item_id)
            {
                item.quantity = modification.quantity;
            }
        }

        if let Some(binding) = self.binding.as_mut() {
            binding.cart_id = snapshot.cart_id;
            binding.hmac = snapshot.hmac;
            if snapshot.purchase_url.is_some() {
                binding.purchase_url = snapshot.purchase_url;
            }
            if snapshot.subtotal.is_some() {
                binding.subtotal = snapshot.subtotal;
            }
        }
    }
}
