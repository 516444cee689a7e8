pub mod bid;
pub mod bid_list;
pub mod loader;
pub mod menu;

#[cfg(test)]
mod tests;
