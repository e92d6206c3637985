// ============================================================
// CSV INFRASTRUCTURE LAYER
// ============================================================
// Lenient line-oriented CSV parsing

mod csv_parser;

pub use csv_parser::CsvParser;
