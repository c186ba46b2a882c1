pub mod session;
pub mod shop;
