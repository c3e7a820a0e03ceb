pub mod auth;
pub mod category;
pub mod product;
pub mod shared;
pub mod store;
pub mod variant;
