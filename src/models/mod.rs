pub mod cart;
pub mod customer;
pub mod draft;
pub mod inventory;
pub mod product;
pub mod sale;
pub mod supplier;
