pub mod property_card;
pub mod value;

pub use property_card::property_card;
pub use value::{format_float_grouped, format_int, value_cell};
