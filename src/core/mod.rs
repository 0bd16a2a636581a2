pub mod directory;
pub mod error;
pub mod expense;
pub mod group;
pub mod ledger;
pub mod money;
pub mod party;
