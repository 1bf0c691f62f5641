pub mod scenarios;
pub mod time_value;
