pub mod auth;
pub mod category;
pub mod product;
pub mod store;
pub mod variant;
