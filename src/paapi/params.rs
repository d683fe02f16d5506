//! Input normalization and validation at the facade boundary.
//!
//! Callers may hand over a comma-joined string, a vector, or a slice; the
//! conversions here always produce one ordered sequence, used uniformly by
//! every operation.

use crate::error::{Error, Result};

/// Maximum item quantity the cart operations accept.
pub const MAX_QUANTITY: u32 = 999;

/// An ordered sequence of item identifiers (ASINs or offer-listing ids).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemIds(Vec<String>);

impl ItemIds {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    /// Splits into chunks for batched requests.
    pub fn chunks(&self, size: usize) -> impl Iterator<Item = &[String]> {
        self.0.chunks(size)
    }
}

impl From<&str> for ItemIds {
    /// Splits on commas and trims, so `"B0A,B0B"` and `["B0A", "B0B"]` are
    /// the same input.
    fn from(s: &str) -> Self {
        ItemIds(
            s.split(',')
                .map(str::trim)
                .filter(|part| !part.is_empty())
                .map(str::to_string)
                .collect(),
        )
    }
}

impl From<String> for ItemIds {
    fn from(s: String) -> Self {
        ItemIds::from(s.as_str())
    }
}

impl From<Vec<String>> for ItemIds {
    fn from(ids: Vec<String>) -> Self {
        ItemIds(ids)
    }
}

impl From<&[&str]> for ItemIds {
    fn from(ids: &[&str]) -> Self {
        ItemIds(ids.iter().map(|id| id.to_string()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for ItemIds {
    fn from(ids: [&str; N]) -> Self {
        ItemIds::from(&ids[..])
    }
}

/// Quantities for a sequence of items: one value broadcast to every item, or
/// one value per item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Quantities {
    Single(u32),
    PerItem(Vec<u32>),
}

impl Quantities {
    /// Expands to one quantity per item, validating the range and, for the
    /// per-item form, that the lengths line up.
    pub fn broadcast(&self, item_count: usize) -> Result<Vec<u32>> {
        let quantities = match self {
            Quantities::Single(q) => vec![*q; item_count],
            Quantities::PerItem(qs) => {
                if qs.len() != item_count {
                    return Err(Error::Validation(format!(
                        "{} quantities given for {} items",
                        qs.len(),
                        item_count
                    )));
                }
                qs.clone()
            }
        };
        validate_quantities(&quantities)?;
        Ok(quantities)
    }
}

impl From<u32> for Quantities {
    fn from(q: u32) -> Self {
        Quantities::Single(q)
    }
}

impl From<Vec<u32>> for Quantities {
    fn from(qs: Vec<u32>) -> Self {
        Quantities::PerItem(qs)
    }
}

/// The identifier kind for cart lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ItemIdType {
    #[default]
    Asin,
    OfferListingId,
}

impl ItemIdType {
    /// Returns the positional parameter field name.
    pub fn field(&self) -> &'static str {
        match self {
            ItemIdType::Asin => "ASIN",
            ItemIdType::OfferListingId => "OfferListingId",
        }
    }
}

fn is_valid_asin(id: &str) -> bool {
    id.len() == 10 && id.as_bytes()[0].eq_ignore_ascii_case(&b'B')
}

/// Checks every id in a batch; any failure names all offenders.
pub fn validate_asins<'a>(ids: impl IntoIterator<Item = &'a str>) -> Result<()> {
    let bad: Vec<&str> = ids.into_iter().filter(|id| !is_valid_asin(id)).collect();
    if bad.is_empty() {
        Ok(())
    } else {
        Err(Error::Validation(format!(
            "invalid ASINs: \"{}\". An ASIN is 10 characters long and starts with \"B\"",
            bad.join(", ")
        )))
    }
}

/// Checks every quantity is within `0..=999`.
pub fn validate_quantities(quantities: &[u32]) -> Result<()> {
    for &quantity in quantities {
        if quantity > MAX_QUANTITY {
            return Err(Error::Validation(format!(
                "invalid quantity {}: quantity must be between 0 and {}, inclusive",
                quantity, MAX_QUANTITY
            )));
        }
    }
    Ok(())
}

/// Builds the positional `Item.<i>.<Field>` parameters in list order.
pub fn positional_params(
    field: &str,
    ids: &[String],
    quantities: &[u32],
) -> Vec<(String, String)> {
    ids.iter()
        .zip(quantities)
        .enumerate()
        .flat_map(|(i, (id, quantity))| {
            [
                (format!("Item.{}.{}", i, field), id.clone()),
                (format!("Item.{}.Quantity", i), quantity.to_string()),
            ]
        })
        .collect()
}
