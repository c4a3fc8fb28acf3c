//! Quote domain - refresh scheduling for swap quotes

mod quote_refresher;

pub use quote_refresher::{QuoteRefresher, DEFAULT_QUOTE_DEBOUNCE};
