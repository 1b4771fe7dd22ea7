pub mod backup;
pub mod cart;
pub mod catalog;
pub mod coupons;
pub mod settings;
