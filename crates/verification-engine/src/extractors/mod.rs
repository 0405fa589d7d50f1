pub mod fields;
pub mod values;

pub use fields::{extract_fields, extract_key_fields, ExtractedRecord};
pub use values::{parse_amount, parse_date};
