pub mod address;
pub mod catalog_item;
pub mod category;
pub mod order;
pub mod order_line;
pub mod payment;
pub mod user;
