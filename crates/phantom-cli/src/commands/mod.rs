pub mod generate;
pub mod options;
