// ============================================================
// CSV DOMAIN LAYER
// ============================================================
// Row value type and header normalization
// No I/O, no async

mod csv_row;

pub use csv_row::{normalize_header, trim_field, CsvRow};
