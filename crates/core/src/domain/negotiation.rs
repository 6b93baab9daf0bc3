use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::{DomainError, FieldError};

/// Which side of the deal the assistant is coaching.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NegotiationRole {
    Buyer,
    Seller,
}

impl NegotiationRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Buyer => "buyer",
            Self::Seller => "seller",
        }
    }
}

/// Speaker of a single transcript line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnRole {
    Buyer,
    Seller,
    Assistant,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NegotiationTurn {
    pub role: TurnRole,
    pub message: String,
}

/// One full negotiation call. The transcript is owned by the caller and
/// passed in whole on every call; the engines hold no session state.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NegotiationRequest {
    pub car_description: String,
    pub role: NegotiationRole,
    pub initial_price: Decimal,
    pub target_price: Decimal,
    /// Seller floor, when the requester is selling.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum_acceptable_price: Option<Decimal>,
    /// Buyer ceiling, when the requester is buying.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub buyer_budget: Option<Decimal>,
    #[serde(default)]
    pub history: Vec<NegotiationTurn>,
}

impl NegotiationRequest {
    pub fn validate(&self) -> Result<(), DomainError> {
        let mut fields = Vec::new();

        if self.car_description.trim().is_empty() {
            fields.push(FieldError::new("car_description", "car description is required"));
        }
        if self.history.iter().any(|turn| turn.message.trim().is_empty()) {
            fields.push(FieldError::new("history", "transcript messages cannot be empty"));
        }

        if fields.is_empty() {
            Ok(())
        } else {
            Err(DomainError::Validation(fields))
        }
    }
}

/// The assistant's next move. Returned verbatim from the collaborator; the
/// proposed price is deliberately not clamped to the floor, budget, or
/// target supplied in the request.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NegotiationReply {
    pub suggested_message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proposed_price: Option<Decimal>,
}
