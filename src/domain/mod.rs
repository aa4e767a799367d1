pub mod cart;
pub mod catalog;
pub mod errors;
pub mod ports;
pub mod pricing;
pub mod transaction;
