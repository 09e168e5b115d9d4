//! Transaction categories.
//!
//! The set is closed. `income` is the only inflow-typed tag; every other
//! category settles as an outflow.

use serde::{Deserialize, Serialize};

use crate::EngineError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Housing,
    Food,
    Transportation,
    Healthcare,
    Education,
    Income,
    Bills,
    Shopping,
    Investment,
    Entertainment,
    Other,
}

impl Category {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Housing => "housing",
            Self::Food => "food",
            Self::Transportation => "transportation",
            Self::Healthcare => "healthcare",
            Self::Education => "education",
            Self::Income => "income",
            Self::Bills => "bills",
            Self::Shopping => "shopping",
            Self::Investment => "investment",
            Self::Entertainment => "entertainment",
            Self::Other => "other",
        }
    }

    /// `true` for the inflow-typed category: settlement credits the balance
    /// instead of debiting it.
    pub fn is_income(self) -> bool {
        matches!(self, Self::Income)
    }
}

impl TryFrom<&str> for Category {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim() {
            "housing" => Ok(Self::Housing),
            "food" => Ok(Self::Food),
            "transportation" => Ok(Self::Transportation),
            "healthcare" => Ok(Self::Healthcare),
            "education" => Ok(Self::Education),
            "income" => Ok(Self::Income),
            "bills" => Ok(Self::Bills),
            "shopping" => Ok(Self::Shopping),
            "investment" => Ok(Self::Investment),
            "entertainment" => Ok(Self::Entertainment),
            "other" => Ok(Self::Other),
            "" => Err(EngineError::Validation(
                "category must not be empty".to_string(),
            )),
            other => Err(EngineError::Validation(format!(
                "invalid category: {other}"
            ))),
        }
    }
}
