pub mod categories;

pub use categories::{
    CategoryResponse, CreateCategoryRequest, MessageResponse, UpdateCategoryRequest,
};
