//! CSV bid loader
//!
//! Reads the monthly sales export and appends one [`Bid`] per row. Columns
//! are picked by position, the header row is skipped.
use crate::bid::{parse_amount, AmountError, Bid, CURRENCY_SYMBOL, RESERVED_BID_ID};
use crate::bid_list::BidList;
use std::{
    fs::File,
    io::{self, Read},
    path::{Path, PathBuf},
};
use thiserror::Error;
use tracing::{info, warn};

pub const TITLE_COLUMN: usize = 0;
pub const ID_COLUMN: usize = 1;
pub const AMOUNT_COLUMN: usize = 4;
pub const FUND_COLUMN: usize = 8;

/// Errors stopping a load
///
/// `row` is the 1-based data row, not counting the header.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("failed to open {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("row {row}: {source}")]
    Csv {
        row: usize,
        #[source]
        source: csv::Error,
    },
    #[error("row {row}: missing column {column}")]
    MissingColumn { row: usize, column: usize },
    #[error("row {row}: {source}")]
    Amount {
        row: usize,
        #[source]
        source: AmountError,
    },
}

/// Load bids from a CSV file, appending them to `list`
///
/// Returns the number of bids appended.
pub fn load_bids(path: impl AsRef<Path>, list: &mut BidList) -> Result<usize, LoadError> {
    let path = path.as_ref();
    info!(path = %path.display(), "loading bids");

    let file = File::open(path).map_err(|source| LoadError::Io {
        path: path.to_owned(),
        source,
    })?;

    load_bids_from_reader(file, list)
}

/// Load bids from any CSV source, appending them to `list`
///
/// Rows are appended as they are read, so on error the list keeps every
/// bid from the rows before the bad one. Ids are not checked for duplicates.
pub fn load_bids_from_reader<R: Read>(reader: R, list: &mut BidList) -> Result<usize, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut appended = 0;
    for (i, record) in reader.records().enumerate() {
        let row = i + 1;
        let record = record.map_err(|source| LoadError::Csv { row, source })?;
        let bid = bid_from_record(row, &record)?;

        if bid.bid_id == RESERVED_BID_ID {
            warn!(row, "skipping bid with reserved id");
            continue;
        }

        list.append(bid);
        appended += 1;
    }

    info!(appended, "bids loaded");
    Ok(appended)
}

fn bid_from_record(row: usize, record: &csv::StringRecord) -> Result<Bid, LoadError> {
    let column = |column: usize| {
        record
            .get(column)
            .ok_or_else(|| LoadError::MissingColumn { row, column })
    };

    let amount = parse_amount(column(AMOUNT_COLUMN)?, CURRENCY_SYMBOL)
        .map_err(|source| LoadError::Amount { row, source })?;

    Ok(Bid::new(
        column(ID_COLUMN)?,
        column(TITLE_COLUMN)?,
        column(FUND_COLUMN)?,
        amount,
    ))
}
