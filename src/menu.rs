//! Interactive menu
//!
//! The command loop driving a [`BidList`]: entering a bid by hand, the
//! one-shot CSV load, listing, finding and removing bids.
use crate::bid::{parse_amount, Bid, BidId, CURRENCY_SYMBOL, RESERVED_BID_ID};
use crate::bid_list::{BidList, ListError};
use crate::loader;
use anyhow::Result;
use std::{
    io::{self, BufRead, Write},
    path::PathBuf,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    time::{Duration, Instant},
};
use tracing::{debug, warn};

pub const DEFAULT_CSV_PATH: &str = "eBid_Monthly_Sales_Dec_2016.csv";
pub const DEFAULT_BID_KEY: &str = "98109";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MenuConfig {
    pub csv_path: PathBuf,
    /// Bid id used by find/remove when the user just presses enter
    pub bid_key: BidId,
}

impl Default for MenuConfig {
    fn default() -> Self {
        Self {
            csv_path: PathBuf::from(DEFAULT_CSV_PATH),
            bid_key: DEFAULT_BID_KEY.to_owned(),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Choice {
    EnterBid,
    LoadBids,
    DisplayAll,
    FindBid,
    RemoveBid,
    Exit,
}

impl Choice {
    pub fn parse(input: &str) -> Option<Self> {
        use Choice::*;
        Some(match input.trim() {
            "1" => EnterBid,
            "2" => LoadBids,
            "3" => DisplayAll,
            "4" => FindBid,
            "5" => RemoveBid,
            "9" => Exit,
            _ => return None,
        })
    }
}

/// Render one bid as `id: title | amount | fund`
pub fn display_bid(out: &mut impl Write, bid: &Bid) -> io::Result<()> {
    writeln!(out, "{bid}")
}

pub fn display_all(out: &mut impl Write, list: &BidList) -> io::Result<()> {
    for bid in list {
        display_bid(out, bid)?;
    }
    Ok(())
}

fn display_time(out: &mut impl Write, elapsed: Duration) -> io::Result<()> {
    writeln!(out, "time: {} milliseconds", elapsed.as_millis())?;
    writeln!(out, "time: {} seconds", elapsed.as_secs_f64())
}

pub struct Menu<R, W> {
    input: R,
    output: W,
    list: BidList,
    config: MenuConfig,
    /// Bids can be loaded from the CSV file only once per run
    loaded: bool,
    stop: Arc<AtomicBool>,
}

impl<R: BufRead, W: Write> Menu<R, W> {
    pub fn new(input: R, output: W, config: MenuConfig) -> Self {
        Self {
            input,
            output,
            list: BidList::new(),
            config,
            loaded: false,
            stop: Default::default(),
        }
    }

    pub fn with_list(self, list: BidList) -> Self {
        Self { list, ..self }
    }

    /// Flag checked before every command; once set the loop exits
    pub fn with_stop_flag(self, stop: Arc<AtomicBool>) -> Self {
        Self { stop, ..self }
    }

    pub fn list(&self) -> &BidList {
        &self.list
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// Run until the user exits, input ends, or the stop flag is set
    pub fn run(&mut self) -> Result<()> {
        while !self.stopped() {
            self.print_menu()?;

            let line = match self.prompt("Enter choice: ")? {
                Some(line) => line,
                None => break,
            };
            if self.stopped() {
                break;
            }

            match Choice::parse(&line) {
                Some(Choice::Exit) => break,
                Some(choice) => self.handle(choice)?,
                None => debug!(input = %line, "unknown choice"),
            }
        }

        writeln!(self.output, "Thank you for using this program! Goodbye.")?;
        Ok(())
    }

    pub fn handle(&mut self, choice: Choice) -> Result<()> {
        debug!(?choice, "handling");
        match choice {
            Choice::EnterBid => self.enter_bid(),
            Choice::LoadBids => self.load_bids(),
            Choice::DisplayAll => Ok(display_all(&mut self.output, &self.list)?),
            Choice::FindBid => self.find_bid(),
            Choice::RemoveBid => self.remove_bid(),
            Choice::Exit => Ok(()),
        }
    }

    fn stopped(&self) -> bool {
        self.stop.load(Ordering::SeqCst)
    }

    fn print_menu(&mut self) -> io::Result<()> {
        writeln!(self.output, "Menu:")?;
        writeln!(self.output, "  1. Enter a Bid")?;
        writeln!(self.output, "  2. Load Bids")?;
        writeln!(self.output, "  3. Display All Bids")?;
        writeln!(self.output, "  4. Find Bid")?;
        writeln!(self.output, "  5. Remove Bid")?;
        writeln!(self.output, "  9. Exit")
    }

    /// Returns `None` at end of input
    fn prompt(&mut self, text: &str) -> io::Result<Option<String>> {
        write!(self.output, "{text}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_owned()))
    }

    /// Ask for a bid id, falling back to (and then remembering) the default key
    fn prompt_bid_key(&mut self) -> io::Result<Option<BidId>> {
        let text = format!("Enter Bid Id [{}]: ", self.config.bid_key);
        Ok(self.prompt(&text)?.map(|key| {
            if !key.is_empty() {
                self.config.bid_key = key;
            }
            self.config.bid_key.clone()
        }))
    }

    /// Prompt for every field of a new bid
    ///
    /// Returns `None` if input ended or a field was rejected.
    fn read_bid(&mut self) -> Result<Option<Bid>> {
        let Some(bid_id) = self.prompt("Enter Id: ")? else {
            return Ok(None);
        };
        if bid_id.is_empty() {
            writeln!(self.output, "Bid Id can not be empty.")?;
            return Ok(None);
        }
        if bid_id == RESERVED_BID_ID {
            writeln!(self.output, "Bid Id {bid_id} is reserved.")?;
            return Ok(None);
        }

        let Some(title) = self.prompt("Enter title: ")? else {
            return Ok(None);
        };
        let Some(fund) = self.prompt("Enter fund: ")? else {
            return Ok(None);
        };
        let Some(amount) = self.prompt("Enter amount: ")? else {
            return Ok(None);
        };

        match parse_amount(&amount, CURRENCY_SYMBOL) {
            Ok(amount) => Ok(Some(Bid::new(bid_id, title, fund, amount))),
            Err(e) => {
                writeln!(self.output, "{e}")?;
                Ok(None)
            }
        }
    }

    fn enter_bid(&mut self) -> Result<()> {
        let Some(bid) = self.read_bid()? else {
            return Ok(());
        };

        if self.list.search(&bid.bid_id).is_absent() {
            display_bid(&mut self.output, &bid)?;
            self.list.append(bid);
        } else {
            writeln!(self.output, "bidID already in use.")?;
        }
        Ok(())
    }

    fn load_bids(&mut self) -> Result<()> {
        if self.loaded {
            writeln!(self.output, "Bids already loaded once.")?;
            writeln!(
                self.output,
                "Restart program to load another or same set of bids."
            )?;
            return Ok(());
        }

        writeln!(
            self.output,
            "Loading CSV file {}",
            self.config.csv_path.display()
        )?;

        let started = Instant::now();
        if let Err(e) = loader::load_bids(&self.config.csv_path, &mut self.list) {
            warn!(error = %e, "loading bids failed");
            writeln!(self.output, "{e}")?;
        }
        let elapsed = started.elapsed();

        writeln!(self.output, "{} bids read", self.list.len())?;
        display_time(&mut self.output, elapsed)?;

        self.loaded = true;
        Ok(())
    }

    fn find_bid(&mut self) -> Result<()> {
        let Some(bid_key) = self.prompt_bid_key()? else {
            return Ok(());
        };

        let started = Instant::now();
        let bid = self.list.search(&bid_key);
        let elapsed = started.elapsed();

        if bid.is_absent() {
            writeln!(self.output, "Bid Id {bid_key} not found.")?;
        } else {
            display_bid(&mut self.output, &bid)?;
        }
        display_time(&mut self.output, elapsed)?;
        Ok(())
    }

    fn remove_bid(&mut self) -> Result<()> {
        let Some(bid_key) = self.prompt_bid_key()? else {
            return Ok(());
        };

        match self.list.remove(&bid_key) {
            Ok(_bid) => writeln!(self.output, "Bid removed.")?,
            Err(ListError::NotFound(_)) => writeln!(self.output, "bidID not found in list.")?,
            Err(ListError::Reserved) => debug!("ignoring removal of the reserved id"),
        }
        Ok(())
    }
}
