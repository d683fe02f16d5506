//! The closed set of supported API operations.

use std::fmt;

/// Operations the client can issue. Anything outside this set never reaches
/// the signer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    BrowseNodeLookup,
    ItemSearch,
    ItemLookup,
    SimilarityLookup,
    CartAdd,
    CartClear,
    CartCreate,
    CartGet,
    CartModify,
}

impl Operation {
    /// Returns the wire name sent as the `Operation` parameter.
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::BrowseNodeLookup => "BrowseNodeLookup",
            Operation::ItemSearch => "ItemSearch",
            Operation::ItemLookup => "ItemLookup",
            Operation::SimilarityLookup => "SimilarityLookup",
            Operation::CartAdd => "CartAdd",
            Operation::CartClear => "CartClear",
            Operation::CartCreate => "CartCreate",
            Operation::CartGet => "CartGet",
            Operation::CartModify => "CartModify",
        }
    }

    /// Returns the payload key the response nests its result under.
    pub fn result_root(&self) -> &'static str {
        match self {
            Operation::BrowseNodeLookup => "BrowseNodes",
            Operation::ItemSearch | Operation::ItemLookup | Operation::SimilarityLookup => "Items",
            Operation::CartAdd
            | Operation::CartClear
            | Operation::CartCreate
            | Operation::CartGet
            | Operation::CartModify => "Cart",
        }
    }

    /// Returns the success envelope name, `<OperationResponse>`.
    pub fn response_envelope(&self) -> String {
        format!("{}Response", self.as_str())
    }

    /// Returns the failure envelope name, `<OperationErrorResponse>`.
    pub fn error_envelope(&self) -> String {
        format!("{}ErrorResponse", self.as_str())
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
