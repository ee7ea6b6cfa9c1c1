use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::PgPool;
use sqlx::Postgres;
use sqlx::QueryBuilder;
use uuid::Uuid;

use crate::domain::job::errors::JobError;
use crate::domain::job::models::Job;
use crate::domain::job::models::JobDetails;
use crate::domain::job::models::JobId;
use crate::domain::job::models::JobStatus;
use crate::domain::job::models::Page;
use crate::domain::job::models::SalaryRange;
use crate::domain::job::ports::JobRepository;
use crate::domain::job::query::JobFilter;
use crate::domain::job::query::JobQuery;
use crate::domain::job::query::SortDirection;
use crate::domain::user::models::UserId;

const JOB_COLUMNS: &str = "id, employer_id, title, description, location, min_salary, max_salary, \
     currency, job_type, employment_type, skills, experience, education, benefits, \
     contact_email, contact_phone, deadline, status, views, applications, posted_at";

#[derive(sqlx::FromRow)]
struct JobRow {
    id: Uuid,
    employer_id: Uuid,
    title: String,
    description: String,
    location: String,
    min_salary: f64,
    max_salary: f64,
    currency: Option<String>,
    job_type: String,
    employment_type: Option<String>,
    skills: Vec<String>,
    experience: Option<String>,
    education: Option<String>,
    benefits: Vec<String>,
    contact_email: Option<String>,
    contact_phone: Option<String>,
    deadline: Option<DateTime<Utc>>,
    status: String,
    views: i64,
    applications: i64,
    posted_at: DateTime<Utc>,
}

impl TryFrom<JobRow> for Job {
    type Error = JobError;

    fn try_from(r: JobRow) -> Result<Self, Self::Error> {
        Ok(Job {
            id: JobId(r.id),
            employer_id: UserId(r.employer_id),
            details: JobDetails {
                title: r.title,
                description: r.description,
                location: r.location,
                salary: SalaryRange::new(r.min_salary, r.max_salary, r.currency)?,
                job_type: r.job_type.parse()?,
                employment_type: r.employment_type.map(|e| e.parse()).transpose()?,
                skills: r.skills,
                experience: r.experience,
                education: r.education,
                benefits: r.benefits,
                contact_email: r.contact_email,
                contact_phone: r.contact_phone,
                deadline: r.deadline,
            },
            status: r.status.parse()?,
            views: r.views,
            applications: r.applications,
            posted_at: r.posted_at,
        })
    }
}

pub struct PostgresJobRepository {
    pool: PgPool,
}

impl PostgresJobRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Escape LIKE metacharacters so user text only ever matches literally.
fn like_pattern(text: &str) -> String {
    let mut pattern = String::with_capacity(text.len() + 2);
    pattern.push('%');
    for c in text.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

fn push_where(builder: &mut QueryBuilder<'_, Postgres>, query: &JobQuery) {
    builder
        .push(" WHERE status = ")
        .push_bind(query.status.as_str());

    match &query.filter {
        JobFilter::TitleContains(text) => {
            builder.push(" AND title ILIKE ").push_bind(like_pattern(text));
        }
        JobFilter::LocationContains(text) => {
            builder
                .push(" AND location ILIKE ")
                .push_bind(like_pattern(text));
        }
        JobFilter::JobType(job_type) => {
            builder.push(" AND job_type = ").push_bind(job_type.as_str());
        }
        JobFilter::All => {}
    }
}

fn order_by(query: &JobQuery) -> String {
    // Nulls sort as the smallest value in either direction
    let nulls = match query.sort.direction {
        SortDirection::Asc => "NULLS FIRST",
        SortDirection::Desc => "NULLS LAST",
    };
    format!(
        " ORDER BY {column} {dir} {nulls}, id {dir}",
        column = query.sort.field.column(),
        dir = query.sort.direction.as_sql(),
        nulls = nulls,
    )
}

#[async_trait]
impl JobRepository for PostgresJobRepository {
    async fn create(&self, job: Job) -> Result<Job, JobError> {
        let d = &job.details;

        sqlx::query(
            r#"
            INSERT INTO jobs (
                id, employer_id, title, description, location, min_salary, max_salary,
                currency, job_type, employment_type, skills, experience, education, benefits,
                contact_email, contact_phone, deadline, status, views, applications, posted_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14,
                    $15, $16, $17, $18, $19, $20, $21)
            "#,
        )
        .bind(job.id.0)
        .bind(job.employer_id.0)
        .bind(&d.title)
        .bind(&d.description)
        .bind(&d.location)
        .bind(d.salary.min())
        .bind(d.salary.max())
        .bind(d.salary.currency())
        .bind(d.job_type.as_str())
        .bind(d.employment_type.map(|e| e.as_str()))
        .bind(&d.skills)
        .bind(&d.experience)
        .bind(&d.education)
        .bind(&d.benefits)
        .bind(&d.contact_email)
        .bind(&d.contact_phone)
        .bind(d.deadline)
        .bind(job.status.as_str())
        .bind(job.views)
        .bind(job.applications)
        .bind(job.posted_at)
        .execute(&self.pool)
        .await
        .map_err(|e| JobError::StoreUnavailable(e.to_string()))?;

        Ok(job)
    }

    async fn find_by_id(&self, id: &JobId) -> Result<Option<Job>, JobError> {
        let sql = format!("SELECT {} FROM jobs WHERE id = $1", JOB_COLUMNS);

        let row = sqlx::query_as::<_, JobRow>(&sql)
            .bind(id.0)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| JobError::StoreUnavailable(e.to_string()))?;

        row.map(Job::try_from).transpose()
    }

    async fn find_and_increment_views(&self, id: &JobId) -> Result<Option<Job>, JobError> {
        let sql = format!(
            "UPDATE jobs SET views = views + 1 WHERE id = $1 RETURNING {}",
            JOB_COLUMNS
        );

        let row = sqlx::query_as::<_, JobRow>(&sql)
            .bind(id.0)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| JobError::StoreUnavailable(e.to_string()))?;

        row.map(Job::try_from).transpose()
    }

    async fn search(&self, query: &JobQuery) -> Result<Page<Job>, JobError> {
        let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM jobs");
        push_where(&mut count, query);

        let total: i64 = count
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .map_err(|e| JobError::StoreUnavailable(e.to_string()))?;

        let mut select = QueryBuilder::<Postgres>::new(format!("SELECT {} FROM jobs", JOB_COLUMNS));
        push_where(&mut select, query);
        select.push(order_by(query));
        select
            .push(" LIMIT ")
            .push_bind(i64::from(query.page.size))
            .push(" OFFSET ")
            .push_bind(i64::try_from(query.page.offset()).unwrap_or(i64::MAX));

        let rows = select
            .build_query_as::<JobRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| JobError::StoreUnavailable(e.to_string()))?;

        let content = rows
            .into_iter()
            .map(Job::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Page {
            content,
            page: query.page.index,
            size: query.page.size,
            total_elements: u64::try_from(total).unwrap_or(0),
        })
    }

    async fn update(&self, job: Job, expected_status: JobStatus) -> Result<Option<Job>, JobError> {
        let d = &job.details;
        let sql = format!(
            r#"
            UPDATE jobs
            SET title = $3, description = $4, location = $5, min_salary = $6, max_salary = $7,
                currency = $8, job_type = $9, employment_type = $10, skills = $11,
                experience = $12, education = $13, benefits = $14, contact_email = $15,
                contact_phone = $16, deadline = $17, status = $18
            WHERE id = $1 AND status = $2
            RETURNING {}
            "#,
            JOB_COLUMNS
        );

        let row = sqlx::query_as::<_, JobRow>(&sql)
            .bind(job.id.0)
            .bind(expected_status.as_str())
            .bind(&d.title)
            .bind(&d.description)
            .bind(&d.location)
            .bind(d.salary.min())
            .bind(d.salary.max())
            .bind(d.salary.currency())
            .bind(d.job_type.as_str())
            .bind(d.employment_type.map(|e| e.as_str()))
            .bind(&d.skills)
            .bind(&d.experience)
            .bind(&d.education)
            .bind(&d.benefits)
            .bind(&d.contact_email)
            .bind(&d.contact_phone)
            .bind(d.deadline)
            .bind(job.status.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| JobError::StoreUnavailable(e.to_string()))?;

        if let Some(r) = row {
            return Job::try_from(r).map(Some);
        }

        // No row matched: either the job is gone or its status moved
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM jobs WHERE id = $1)")
            .bind(job.id.0)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| JobError::StoreUnavailable(e.to_string()))?;

        if exists {
            Ok(None)
        } else {
            Err(JobError::NotFound(job.id.to_string()))
        }
    }

    async fn delete(&self, id: &JobId) -> Result<(), JobError> {
        let result = sqlx::query("DELETE FROM jobs WHERE id = $1")
            .bind(id.0)
            .execute(&self.pool)
            .await
            .map_err(|e| JobError::StoreUnavailable(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(JobError::NotFound(id.to_string()));
        }

        Ok(())
    }
}
