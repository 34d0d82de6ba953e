mod errors;
mod item_service;

pub use errors::{ItemApplicationError, Result};
pub use item_service::{
    ServiceDependencies, get_item_detail, list_items, purchase_item, register_item,
};
