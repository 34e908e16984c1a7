pub mod error;
pub mod model;
pub mod utils;

pub use error::ModelError;
pub use model::*;
