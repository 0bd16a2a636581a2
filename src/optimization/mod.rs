pub mod balance;
pub mod report;
pub mod settlement;
