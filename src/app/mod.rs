pub mod batch;

pub use batch::{quote_csv, quote_csv_file, BatchSummary};
