use std::fmt;
use thiserror::Error;

pub type BidId = String;
pub type BidIdRef<'s> = &'s str;
pub type Amount = f64;

/// Id carried by the list's sentinel node.
///
/// Doubles as the "not found" marker returned by [`crate::bid_list::BidList::search`],
/// so it is never a valid id for a real bid.
pub const RESERVED_BID_ID: BidIdRef<'static> = "__dummy__";

/// Currency symbol stripped from amounts before parsing
pub const CURRENCY_SYMBOL: char = '$';

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Bid {
    pub bid_id: BidId,
    pub title: String,
    pub fund: String,
    pub amount: Amount,
}

impl Bid {
    pub fn new(
        bid_id: impl Into<BidId>,
        title: impl Into<String>,
        fund: impl Into<String>,
        amount: Amount,
    ) -> Self {
        Self {
            bid_id: bid_id.into(),
            title: title.into(),
            fund: fund.into(),
            amount,
        }
    }

    /// The "not found" marker
    pub fn absent() -> Self {
        Self {
            bid_id: RESERVED_BID_ID.to_owned(),
            ..Self::default()
        }
    }

    pub fn is_absent(&self) -> bool {
        self.bid_id == RESERVED_BID_ID
    }
}

impl fmt::Display for Bid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} | {} | {}",
            self.bid_id, self.title, self.amount, self.fund
        )
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AmountError {
    #[error("amount is empty")]
    Empty,
    #[error("invalid amount: {0:?}")]
    Invalid(String),
}

/// Thousands separator stripped from amounts before parsing
pub const GROUPING_SEPARATOR: char = ',';

/// Parse a currency string like `$1,234.50` into an [`Amount`]
///
/// Every occurrence of `symbol` and of [`GROUPING_SEPARATOR`] is removed
/// before conversion.
pub fn parse_amount(text: &str, symbol: char) -> Result<Amount, AmountError> {
    let stripped: String = text
        .chars()
        .filter(|&c| c != symbol && c != GROUPING_SEPARATOR)
        .collect();
    let stripped = stripped.trim();

    if stripped.is_empty() {
        return Err(AmountError::Empty);
    }

    match stripped.parse::<Amount>() {
        Ok(amount) if amount.is_finite() => Ok(amount),
        _ => Err(AmountError::Invalid(text.to_owned())),
    }
}
