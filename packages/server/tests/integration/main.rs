mod category;
mod common;
mod store;
mod variant;
