pub mod admin;
pub mod category;
pub mod product;
pub mod product_image;
pub mod product_item;
pub mod store;
pub mod variant;
pub mod variant_option;
