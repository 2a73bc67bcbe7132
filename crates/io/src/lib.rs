//! File I/O for network audits: load the master and dump workbooks into
//! tables, and export report tables to Excel or CSV.

pub mod csv;
pub mod export;
pub mod loader;
pub mod xlsx;

pub use loader::{load_session, load_table, load_table_set, SourceFormat};
