use crate::{
    bid::AmountError,
    bid_list::BidList,
    loader::{load_bids, load_bids_from_reader, LoadError},
};
use anyhow::Result;
use std::io::Write;

const HEADER: &str =
    "ArticleTitle,ArticleID,Department,CloseDate,WinningBid,InventoryID,VehicleID,ReceiptNumber,Fund\n";

fn csv(rows: &[&str]) -> String {
    let mut out = HEADER.to_owned();
    for row in rows {
        out.push_str(row);
        out.push('\n');
    }
    out
}

#[test]
fn maps_positional_columns() -> Result<()> {
    let data = csv(&[
        "Table,97990,General Services,12/6/2016,$12.00,,,R1,General Fund",
        "\"Chair, Office\",98109,General Services,12/6/2016,$27.50,,,R2,Enterprise",
    ]);

    let mut list = BidList::new();
    assert_eq!(load_bids_from_reader(data.as_bytes(), &mut list)?, 2);
    list.assert_invariants();

    let chair = list.search("98109");
    assert_eq!(chair.title, "Chair, Office");
    assert_eq!(chair.fund, "Enterprise");
    assert_eq!(chair.amount, 27.5);

    assert_eq!(
        list.iter().map(|bid| bid.bid_id.as_str()).collect::<Vec<_>>(),
        ["97990", "98109"]
    );
    Ok(())
}

#[test]
fn grouped_amount_does_not_stop_the_load() -> Result<()> {
    let data = csv(&[
        "A,1,d,c,$12.00,,,r,f",
        "B,2,d,c,\"$1,234.00\",,,r,f",
        "C,3,d,c,$3.00,,,r,f",
    ]);

    let mut list = BidList::new();
    assert_eq!(load_bids_from_reader(data.as_bytes(), &mut list)?, 3);

    assert_eq!(list.search("2").amount, 1234.0);
    assert_eq!(list.search("3").amount, 3.0);
    list.assert_invariants();
    Ok(())
}

#[test]
fn keeps_duplicate_ids() -> Result<()> {
    let data = csv(&[
        "A,1,d,c,$1,,,r,f",
        "B,1,d,c,$2,,,r,f",
    ]);

    let mut list = BidList::new();
    load_bids_from_reader(data.as_bytes(), &mut list)?;

    assert_eq!(list.len(), 2);
    assert_eq!(list.search("1").title, "A");
    Ok(())
}

#[test]
fn appends_after_existing_bids() -> Result<()> {
    let mut list = BidList::new();
    list.append(crate::bid::Bid::new("0", "Existing", "f", 1.0));

    load_bids_from_reader(csv(&["A,1,d,c,$1,,,r,f"]).as_bytes(), &mut list)?;

    assert_eq!(list.len(), 2);
    assert_eq!(list.iter().last().map(|bid| bid.title.as_str()), Some("A"));
    Ok(())
}

#[test]
fn bad_amount_stops_but_keeps_earlier_rows() {
    let data = csv(&[
        "A,1,d,c,$1,,,r,f",
        "B,2,d,c,$2,,,r,f",
        "C,3,d,c,lots,,,r,f",
        "D,4,d,c,$4,,,r,f",
    ]);

    let mut list = BidList::new();
    let err = load_bids_from_reader(data.as_bytes(), &mut list).unwrap_err();

    match err {
        LoadError::Amount { row, source } => {
            assert_eq!(row, 3);
            assert_eq!(source, AmountError::Invalid("lots".to_owned()));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(list.len(), 2);
    assert!(list.search("4").is_absent());
    list.assert_invariants();
}

#[test]
fn short_row_is_missing_column() {
    let data = csv(&["A,1,d,c,$1,,,r,f", "B,2,d,c,$2"]);

    let mut list = BidList::new();
    let err = load_bids_from_reader(data.as_bytes(), &mut list).unwrap_err();

    assert!(matches!(err, LoadError::MissingColumn { row: 2, column: 8 }));
    assert_eq!(list.len(), 1);
}

#[test]
fn skips_reserved_id() -> Result<()> {
    let data = csv(&["A,__dummy__,d,c,$1,,,r,f", "B,2,d,c,$2,,,r,f"]);

    let mut list = BidList::new();
    assert_eq!(load_bids_from_reader(data.as_bytes(), &mut list)?, 1);
    assert_eq!(list.len(), 1);
    Ok(())
}

#[test]
fn header_only_loads_nothing() -> Result<()> {
    let mut list = BidList::new();
    assert_eq!(load_bids_from_reader(HEADER.as_bytes(), &mut list)?, 0);
    assert!(list.is_empty());
    Ok(())
}

#[test]
fn loads_from_a_file() -> Result<()> {
    let mut file = tempfile::NamedTempFile::new()?;
    file.write_all(csv(&["A,1,d,c,$1.25,,,r,f"]).as_bytes())?;
    file.flush()?;

    let mut list = BidList::new();
    assert_eq!(load_bids(file.path(), &mut list)?, 1);
    assert_eq!(list.search("1").amount, 1.25);
    Ok(())
}

#[test]
fn missing_file_is_io_error() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("missing.csv");

    let mut list = BidList::new();
    let err = load_bids(&path, &mut list).unwrap_err();

    assert!(matches!(err, LoadError::Io { path: p, .. } if p == path));
    assert!(list.is_empty());
    Ok(())
}
