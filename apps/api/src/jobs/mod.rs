pub mod handlers;

use sqlx::SqlitePool;

use crate::models::job::JobListingRow;

/// Returns every listing in the `jobs` table, in table order.
pub async fn list_jobs(pool: &SqlitePool) -> Result<Vec<JobListingRow>, sqlx::Error> {
    sqlx::query_as::<_, JobListingRow>(
        r#"
        SELECT job_title, company_name, clean_location, work_style, work_type,
               CAST(min_salary AS REAL) AS min_salary,
               CAST(max_salary AS REAL) AS max_salary,
               job_description
        FROM jobs
        "#,
    )
    .fetch_all(pool)
    .await
}
