//! Dynamic filter / sort / pagination over the `jobs` table.
//!
//! Filters become a list of independent [`Predicate`]s. The SQL is built by
//! folding over only the predicates that are present, AND-combined. Sort
//! columns and directions come from allow-listed enums and are the only
//! identifiers ever rendered into the SQL text; every value is a bind
//! parameter.

use serde::{Deserialize, Serialize};
use sqlx::{PgPool, Postgres, QueryBuilder};
use typed_builder::TypedBuilder;

use super::Job;
use crate::common::PageRequest;
use crate::domains::jobs::errors::JobsError;

/// Columns a predicate or sort may reference
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Title,
    Location,
    Company,
    SalaryMin,
    SalaryMax,
    JobType,
    IsRemote,
    Skills,
    ExperienceYears,
    PostedDate,
}

impl Column {
    pub fn as_sql(&self) -> &'static str {
        match self {
            Column::Title => "title",
            Column::Location => "location",
            Column::Company => "company",
            Column::SalaryMin => "salary_min",
            Column::SalaryMax => "salary_max",
            Column::JobType => "job_type",
            Column::IsRemote => "is_remote",
            Column::Skills => "skills",
            Column::ExperienceYears => "experience_years",
            Column::PostedDate => "posted_date",
        }
    }
}

/// One filter condition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    /// Case-insensitive substring match.
    Contains(Column, String),
    /// Case-insensitive exact match.
    EqualsIgnoreCase(Column, String),
    /// Inclusive lower bound.
    AtLeast(Column, i32),
    /// Inclusive upper bound.
    AtMost(Column, i32),
    Is(Column, bool),
    /// Array column, rendered as text, contains any of the lowercase tokens.
    ArrayTextContainsAny(Column, Vec<String>),
}

impl Predicate {
    fn push_sql(&self, builder: &mut QueryBuilder<'_, Postgres>) {
        match self {
            Predicate::Contains(column, value) => {
                builder.push(format!("LOWER({}) LIKE LOWER(", column.as_sql()));
                builder.push_bind(format!("%{}%", escape_like(value)));
                builder.push(")");
            }
            Predicate::EqualsIgnoreCase(column, value) => {
                builder.push(format!("LOWER({}) = LOWER(", column.as_sql()));
                builder.push_bind(value.clone());
                builder.push(")");
            }
            Predicate::AtLeast(column, value) => {
                builder.push(format!("{} >= ", column.as_sql()));
                builder.push_bind(*value);
            }
            Predicate::AtMost(column, value) => {
                builder.push(format!("{} <= ", column.as_sql()));
                builder.push_bind(*value);
            }
            Predicate::Is(column, value) => {
                builder.push(format!("{} = ", column.as_sql()));
                builder.push_bind(*value);
            }
            Predicate::ArrayTextContainsAny(column, tokens) => {
                let patterns: Vec<String> = tokens
                    .iter()
                    .map(|token| format!("%{}%", escape_like(token)))
                    .collect();
                builder.push(format!("LOWER({}::text) LIKE ANY(", column.as_sql()));
                builder.push_bind(patterns);
                builder.push(")");
            }
        }
    }
}

/// Append `WHERE p1 AND p2 ...`, or nothing when there are no predicates.
pub fn push_where(builder: &mut QueryBuilder<'_, Postgres>, predicates: &[Predicate]) {
    for (i, predicate) in predicates.iter().enumerate() {
        builder.push(if i == 0 { " WHERE " } else { " AND " });
        predicate.push_sql(builder);
    }
}

/// Escape LIKE wildcards so user input matches literally.
fn escape_like(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

// =============================================================================
// Filters
// =============================================================================

/// Optional, independently applied filters. Empty strings count as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, TypedBuilder)]
#[serde(rename_all = "camelCase")]
pub struct JobFilters {
    #[builder(default, setter(into, strip_option))]
    pub title: Option<String>,
    #[builder(default, setter(into, strip_option))]
    pub location: Option<String>,
    #[builder(default, setter(into, strip_option))]
    pub company: Option<String>,
    #[builder(default, setter(strip_option))]
    pub min_salary: Option<i32>,
    #[builder(default, setter(strip_option))]
    pub max_salary: Option<i32>,
    #[builder(default, setter(into, strip_option))]
    pub job_type: Option<String>,
    #[builder(default, setter(strip_option))]
    pub remote: Option<bool>,
    /// Comma-separated; a job matches if it has any of them.
    #[builder(default, setter(into, strip_option))]
    pub skills: Option<String>,
    #[builder(default, setter(strip_option))]
    pub min_experience: Option<i32>,
    #[builder(default, setter(strip_option))]
    pub max_experience: Option<i32>,
}

impl JobFilters {
    /// Turn the present filters into predicates.
    ///
    /// `min_salary` bounds `salary_min` from below and `max_salary` bounds
    /// `salary_max` from above; this is not a range-overlap test.
    pub fn predicates(&self) -> Result<Vec<Predicate>, JobsError> {
        let mut predicates = Vec::new();

        if let Some(title) = non_empty(&self.title) {
            predicates.push(Predicate::Contains(Column::Title, title.to_string()));
        }
        if let Some(location) = non_empty(&self.location) {
            predicates.push(Predicate::Contains(Column::Location, location.to_string()));
        }
        if let Some(company) = non_empty(&self.company) {
            predicates.push(Predicate::Contains(Column::Company, company.to_string()));
        }
        if let Some(min_salary) = non_negative("minSalary", self.min_salary)? {
            predicates.push(Predicate::AtLeast(Column::SalaryMin, min_salary));
        }
        if let Some(max_salary) = non_negative("maxSalary", self.max_salary)? {
            predicates.push(Predicate::AtMost(Column::SalaryMax, max_salary));
        }
        if let Some(job_type) = non_empty(&self.job_type) {
            predicates.push(Predicate::EqualsIgnoreCase(Column::JobType, job_type.to_string()));
        }
        if let Some(remote) = self.remote {
            predicates.push(Predicate::Is(Column::IsRemote, remote));
        }
        if let Some(skills) = non_empty(&self.skills) {
            let tokens = skill_tokens(skills);
            if !tokens.is_empty() {
                predicates.push(Predicate::ArrayTextContainsAny(Column::Skills, tokens));
            }
        }
        if let Some(min_experience) = non_negative("minExperience", self.min_experience)? {
            predicates.push(Predicate::AtLeast(Column::ExperienceYears, min_experience));
        }
        if let Some(max_experience) = non_negative("maxExperience", self.max_experience)? {
            predicates.push(Predicate::AtMost(Column::ExperienceYears, max_experience));
        }

        Ok(predicates)
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn non_negative(name: &str, value: Option<i32>) -> Result<Option<i32>, JobsError> {
    match value {
        Some(v) if v < 0 => Err(JobsError::InvalidFilter(format!(
            "{} must not be negative",
            name
        ))),
        other => Ok(other),
    }
}

/// "React, node.js,,Go" -> ["react", "node.js", "go"]
pub fn skill_tokens(skills: &str) -> Vec<String> {
    skills
        .split(',')
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}

// =============================================================================
// Sorting
// =============================================================================

/// Allow-listed sort fields
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortField {
    #[default]
    PostedDate,
    SalaryMin,
    SalaryMax,
    Title,
    Company,
}

impl SortField {
    pub fn column(&self) -> Column {
        match self {
            SortField::PostedDate => Column::PostedDate,
            SortField::SalaryMin => Column::SalaryMin,
            SortField::SalaryMax => Column::SalaryMax,
            SortField::Title => Column::Title,
            SortField::Company => Column::Company,
        }
    }
}

impl std::str::FromStr for SortField {
    type Err = JobsError;

    fn from_str(s: &str) -> Result<Self, JobsError> {
        match s {
            "postedDate" => Ok(SortField::PostedDate),
            "salaryMin" => Ok(SortField::SalaryMin),
            "salaryMax" => Ok(SortField::SalaryMax),
            "title" => Ok(SortField::Title),
            "company" => Ok(SortField::Company),
            _ => Err(JobsError::InvalidSortField(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn as_sql(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

impl std::str::FromStr for SortOrder {
    type Err = JobsError;

    fn from_str(s: &str) -> Result<Self, JobsError> {
        match s.to_ascii_uppercase().as_str() {
            "ASC" => Ok(SortOrder::Asc),
            "DESC" => Ok(SortOrder::Desc),
            _ => Err(JobsError::InvalidSortOrder(s.to_string())),
        }
    }
}

/// Sort specification; defaults to newest first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JobSort {
    pub field: SortField,
    pub order: SortOrder,
}

impl JobSort {
    pub fn new(field: SortField, order: SortOrder) -> Self {
        Self { field, order }
    }

    /// Parse optional raw sort input, rejecting anything off the allow-list.
    pub fn parse(field: Option<&str>, order: Option<&str>) -> Result<Self, JobsError> {
        Ok(Self {
            field: field.map(str::parse::<SortField>).transpose()?.unwrap_or_default(),
            order: order.map(str::parse::<SortOrder>).transpose()?.unwrap_or_default(),
        })
    }

    /// `ORDER BY` clause. NULLs sort last either way and `id` breaks ties so
    /// consecutive pages never overlap.
    fn push_sql(&self, builder: &mut QueryBuilder<'_, Postgres>) {
        builder.push(format!(
            " ORDER BY {} {} NULLS LAST, id ASC",
            self.field.column().as_sql(),
            self.order.as_sql()
        ));
    }
}

// =============================================================================
// Query execution
// =============================================================================

/// A complete read request against the store
#[derive(Debug, Clone)]
pub struct JobQuery {
    pub filters: JobFilters,
    pub sort: JobSort,
    pub page: PageRequest,
}

impl Job {
    /// Find one page of jobs plus the total number matching the filters.
    pub async fn find_page(query: &JobQuery, pool: &PgPool) -> Result<(Vec<Self>, i64), JobsError> {
        let predicates = query.filters.predicates()?;

        let mut count_query = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM jobs");
        push_where(&mut count_query, &predicates);
        let total = count_query
            .build_query_scalar::<i64>()
            .fetch_one(pool)
            .await?;

        let mut page_query = QueryBuilder::<Postgres>::new("SELECT * FROM jobs");
        push_where(&mut page_query, &predicates);
        query.sort.push_sql(&mut page_query);
        page_query.push(" LIMIT ");
        page_query.push_bind(query.page.fetch_limit());
        page_query.push(" OFFSET ");
        page_query.push_bind(query.page.offset());

        let jobs = page_query.build_query_as::<Job>().fetch_all(pool).await?;

        Ok((jobs, total))
    }
}
