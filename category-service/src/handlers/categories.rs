use crate::dtos::{
    CategoryResponse, CreateCategoryRequest, MessageResponse, UpdateCategoryRequest,
};
use crate::models::{Category, CategoryChanges};
use crate::services::record_category_operation;
use crate::startup::AppState;
use crate::utils::{CategoryId, ValidatedJson};
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use service_core::error::AppError;

fn category_not_found() -> AppError {
    AppError::NotFound(anyhow::anyhow!("Category not found"))
}

/// Count the outcome of `operation` and hand the result back unchanged.
fn observe<T>(operation: &'static str, result: Result<T, AppError>) -> Result<T, AppError> {
    let outcome = match &result {
        Ok(_) => "success",
        Err(AppError::NotFound(_)) => "not_found",
        Err(e) if e.status_code().is_client_error() => "client_error",
        Err(_) => "server_error",
    };
    record_category_operation(operation, outcome);
    result
}

pub async fn create_category(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<CreateCategoryRequest>,
) -> Result<impl IntoResponse, AppError> {
    // `ValidatedJson` has already enforced `required`; this only unwraps.
    let name = req
        .name
        .ok_or_else(|| AppError::BadRequest(anyhow::anyhow!("name is required")))?;
    let category = Category::new(name, req.description);

    let created = observe(
        "create",
        state
            .store
            .insert(category)
            .await
            .map_err(AppError::into_client_error),
    )?;

    tracing::info!(category_id = %created.id, name = %created.name, "Category created");
    Ok((StatusCode::CREATED, Json(CategoryResponse::from(created))))
}

pub async fn list_categories(
    State(state): State<AppState>,
) -> Result<Json<Vec<CategoryResponse>>, AppError> {
    let categories = observe("list", state.store.list().await)?;

    Ok(Json(
        categories.into_iter().map(CategoryResponse::from).collect(),
    ))
}

pub async fn get_category(
    State(state): State<AppState>,
    CategoryId(id): CategoryId,
) -> Result<Json<CategoryResponse>, AppError> {
    let result = state
        .store
        .find_by_id(&id)
        .await
        .map_err(AppError::into_client_error)
        .and_then(|found| found.ok_or_else(category_not_found));

    let category = observe("get", result)?;
    Ok(Json(CategoryResponse::from(category)))
}

pub async fn update_category(
    State(state): State<AppState>,
    CategoryId(id): CategoryId,
    ValidatedJson(req): ValidatedJson<UpdateCategoryRequest>,
) -> Result<Json<CategoryResponse>, AppError> {
    let changes = CategoryChanges::from(req);

    // Nothing to write: answer with the stored record, as an empty `$set` would.
    let result = if changes.is_empty() {
        state.store.find_by_id(&id).await
    } else {
        state.store.update(&id, changes).await
    };

    let category = observe(
        "update",
        result
            .map_err(AppError::into_client_error)
            .and_then(|found| found.ok_or_else(category_not_found)),
    )?;

    tracing::info!(category_id = %category.id, "Category updated");
    Ok(Json(CategoryResponse::from(category)))
}

pub async fn delete_category(
    State(state): State<AppState>,
    CategoryId(id): CategoryId,
) -> Result<Json<MessageResponse>, AppError> {
    let result = state
        .store
        .delete(&id)
        .await
        .map_err(AppError::into_client_error)
        .and_then(|deleted| {
            if deleted {
                Ok(())
            } else {
                Err(category_not_found())
            }
        });

    observe("delete", result)?;

    tracing::info!(category_id = %id, "Category deleted");
    Ok(Json(MessageResponse {
        message: "Category deleted successfully".to_string(),
    }))
}
