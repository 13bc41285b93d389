pub mod addresses;
pub mod catalog;
pub mod categories;
pub mod orders;
pub mod payments;
pub mod reports;
pub mod users;
