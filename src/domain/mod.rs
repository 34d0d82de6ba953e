pub mod commands;
pub mod errors;
pub mod item;
pub mod member;
pub mod transaction_history;
pub mod value_objects;

pub use errors::*;
pub use member::*;
pub use transaction_history::*;
pub use value_objects::*;
