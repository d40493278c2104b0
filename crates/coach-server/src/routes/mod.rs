pub mod records;
pub mod wizards;
