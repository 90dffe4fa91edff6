//! The service catalog page: categories of orderable services, one
//! selected service per category, and the order flow behind it.

pub mod command;
pub mod controller;
pub mod currency;
pub mod message;
pub mod model;
pub mod order_dialog;
pub mod screen;
pub mod selection;

pub use model::{CatalogResponse, Service, ServiceCategory};
pub use screen::CatalogScreen;
