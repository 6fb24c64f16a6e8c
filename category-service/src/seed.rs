//! Fixed sample categories ensured at startup.

use crate::models::Category;
use crate::services::CategoryStore;
use service_core::error::AppError;

pub const SEED_CATEGORIES: [(&str, &str); 7] = [
    ("NIKE Shoes", "High-quality sports shoes from NIKE"),
    ("NIKE Sportswear", "Premium sportswear collection from NIKE"),
    (
        "NIKE Accessories",
        "Accessories like caps, bags, and socks from NIKE",
    ),
    (
        "NIKE Running Gear",
        "Top running gear including leggings, jackets, and shoes",
    ),
    (
        "NIKE Training Equipment",
        "Training tools such as resistance bands and dumbbells",
    ),
    (
        "NIKE Football",
        "Football boots, jerseys, and accessories for soccer lovers",
    ),
    (
        "NIKE Basketball",
        "Basketball shoes, jerseys, and professional gear",
    ),
];

/// Inserts every seed category whose name is not yet taken, in list order.
///
/// Returns how many were inserted; running it again against the same store inserts nothing.
pub async fn seed_categories<S>(store: &S) -> Result<usize, AppError>
where
    S: CategoryStore + ?Sized,
{
    let mut inserted = 0;

    for (name, description) in SEED_CATEGORIES {
        if store.find_by_name(name).await?.is_some() {
            tracing::debug!(name = %name, "Seed category already present");
            continue;
        }

        match store
            .insert(Category::new(name.to_string(), Some(description.to_string())))
            .await
        {
            Ok(_) => {
                inserted += 1;
                tracing::info!(name = %name, "Category added");
            }
            // Another instance seeded the same name between the lookup and the insert.
            Err(AppError::BadRequest(_)) => {
                tracing::debug!(name = %name, "Seed category inserted concurrently");
            }
            Err(e) => return Err(e),
        }
    }

    Ok(inserted)
}
