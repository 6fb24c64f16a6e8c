pub mod category_id;
pub mod validation;

pub use category_id::CategoryId;
pub use validation::ValidatedJson;
