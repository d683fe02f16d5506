//! Client for Amazon's legacy Product Advertising API.
//!
//! Every request is a signed GET against a marketplace's `/onca/xml` endpoint;
//! responses come back as XML and are normalized into typed results. On top of
//! the per-operation client sits [`Cart`], a local mirror of a remote shopping
//! cart that reconciles itself after every call.
//!
//! ```no_run
//! use amz_paapi::{Cart, ClientConfig, Credentials, PaapiClient};
//!
//! # async fn run() -> amz_paapi::Result<()> {
//! let credentials = Credentials::new("mytag-20", "ACCESSKEY", "SECRET")?;
//! let client = PaapiClient::new(credentials, &ClientConfig::default())?;
//!
//! let mut cart = Cart::new(client);
//! cart.create("B00JM5GW10", 1).await?;
//! cart.add("B00JM5GW10,B00ABCDEF0", 2).await?;
//! println!("checkout at {:?}", cart.purchase_url());
//! # Ok(())
//! # }
//! ```

pub mod cart;
pub mod config;
pub mod error;
pub mod paapi;

pub use cart::Cart;
pub use config::{ClientConfig, Credentials};
pub use error::{Error, Result};
pub use paapi::{
    BrowseNode, CartItem, CartSnapshot, Item, ItemIdType, ItemIds, PaapiClient, Price,
    ProductAdvertising, Quantities, Region, SearchQuery,
};
