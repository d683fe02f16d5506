//! Marketplace regions and their fixed service hostnames.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Request path shared by every marketplace endpoint.
pub const SERVICE_PATH: &str = "/onca/xml";

/// Supported Product Advertising API marketplaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Region {
    #[default]
    Us,
    Uk,
    Ca,
    Cn,
    De,
    Es,
    Fr,
    In,
    It,
    Jp,
    Br,
    Mx,
}

impl Region {
    /// Returns the service hostname for this marketplace.
    pub fn host(&self) -> &'static str {
        match self {
            Region::Us => "webservices.amazon.com",
            Region::Uk => "webservices.amazon.co.uk",
            Region::Ca => "webservices.amazon.ca",
            Region::Cn => "webservices.amazon.cn",
            Region::De => "webservices.amazon.de",
            Region::Es => "webservices.amazon.es",
            Region::Fr => "webservices.amazon.fr",
            Region::In => "webservices.amazon.in",
            Region::It => "webservices.amazon.it",
            Region::Jp => "webservices.amazon.co.jp",
            Region::Br => "webservices.amazon.com.br",
            Region::Mx => "webservices.amazon.com.mx",
        }
    }

    /// Returns the full endpoint URL for this marketplace.
    pub fn endpoint(&self) -> String {
        format!("http://{}{}", self.host(), SERVICE_PATH)
    }

    /// Returns all supported regions.
    pub fn all() -> &'static [Region] {
        &[
            Region::Us,
            Region::Uk,
            Region::Ca,
            Region::Cn,
            Region::De,
            Region::Es,
            Region::Fr,
            Region::In,
            Region::It,
            Region::Jp,
            Region::Br,
            Region::Mx,
        ]
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let code = match self {
            Region::Us => "us",
            Region::Uk => "uk",
            Region::Ca => "ca",
            Region::Cn => "cn",
            Region::De => "de",
            Region::Es => "es",
            Region::Fr => "fr",
            Region::In => "in",
            Region::It => "it",
            Region::Jp => "jp",
            Region::Br => "br",
            Region::Mx => "mx",
        };
        write!(f, "{}", code)
    }
}

impl FromStr for Region {
    type Err = RegionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "us" => Ok(Region::Us),
            "uk" | "gb" => Ok(Region::Uk),
            "ca" => Ok(Region::Ca),
            "cn" => Ok(Region::Cn),
            "de" => Ok(Region::De),
            "es" => Ok(Region::Es),
            "fr" => Ok(Region::Fr),
            "in" => Ok(Region::In),
            "it" => Ok(Region::It),
            "jp" => Ok(Region::Jp),
            "br" => Ok(Region::Br),
            "mx" => Ok(Region::Mx),
            _ => Err(RegionParseError(s.to_string())),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RegionParseError(String);

impl fmt::Display for RegionParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Unsupported region '{}'. Valid regions: us, uk, ca, cn, de, es, fr, in, it, jp, br, mx",
            self.0
        )
    }
}

impl std::error::Error for RegionParseError {}
