pub mod categories;
pub mod health;

pub use categories::{
    create_category, delete_category, get_category, list_categories, update_category,
};
pub use health::{health_check, metrics_endpoint, readiness_check};
