use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row of the `jobs` table, flattened to the fields the UI consumes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct JobListingRow {
    pub job_title: Option<String>,
    pub company_name: Option<String>,
    #[sqlx(rename = "clean_location")]
    pub location: Option<String>,
    pub work_style: Option<String>,
    pub work_type: Option<String>,
    pub min_salary: Option<f64>,
    pub max_salary: Option<f64>,
    pub job_description: Option<String>,
}
