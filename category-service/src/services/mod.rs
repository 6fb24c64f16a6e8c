pub mod database;
pub mod memory;
pub mod metrics;
pub mod store;

pub use database::MongoDb;
pub use memory::InMemoryCategoryStore;
pub use metrics::{get_metrics, init_metrics, record_category_operation};
pub use store::{duplicate_name_error, CategoryStore};
