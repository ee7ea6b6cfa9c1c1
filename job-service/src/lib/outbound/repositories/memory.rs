//! Process-local stores backed by `tokio::sync::RwLock`.
//!
//! Used when `database.backend = "memory"` and by the integration tests.
//! Each mutation happens under a single write guard, which gives the same
//! uniqueness and atomic-increment guarantees as the Postgres adapters.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::job::errors::JobError;
use crate::domain::job::models::Job;
use crate::domain::job::models::JobId;
use crate::domain::job::models::JobStatus;
use crate::domain::job::models::Page;
use crate::domain::job::ports::JobRepository;
use crate::domain::job::query::JobFilter;
use crate::domain::job::query::JobQuery;
use crate::domain::job::query::SortDirection;
use crate::domain::job::query::SortField;
use crate::domain::user::errors::UserError;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::models::Username;
use crate::domain::user::ports::UserRepository;

#[derive(Debug, Clone, Default)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<HashMap<UserId, User>>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: User) -> Result<User, UserError> {
        let mut users = self.users.write().await;

        if users.values().any(|u| u.username == user.username) {
            return Err(UserError::DuplicateUsername(
                user.username.as_str().to_string(),
            ));
        }
        if users.values().any(|u| u.email == user.email) {
            return Err(UserError::DuplicateEmail(user.email.as_str().to_string()));
        }

        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError> {
        Ok(self.users.read().await.get(id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, UserError> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|u| u.username.as_str() == username)
            .cloned())
    }

    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<User>, UserError> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|u| &u.email == email)
            .cloned())
    }

    async fn exists_by_username(&self, username: &Username) -> Result<bool, UserError> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .any(|u| &u.username == username))
    }

    async fn exists_by_email(&self, email: &EmailAddress) -> Result<bool, UserError> {
        Ok(self.users.read().await.values().any(|u| &u.email == email))
    }
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryJobRepository {
    jobs: Arc<RwLock<HashMap<JobId, Job>>>,
}

impl InMemoryJobRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl JobRepository for InMemoryJobRepository {
    async fn create(&self, job: Job) -> Result<Job, JobError> {
        self.jobs.write().await.insert(job.id, job.clone());
        Ok(job)
    }

    async fn find_by_id(&self, id: &JobId) -> Result<Option<Job>, JobError> {
        Ok(self.jobs.read().await.get(id).cloned())
    }

    async fn find_and_increment_views(&self, id: &JobId) -> Result<Option<Job>, JobError> {
        let mut jobs = self.jobs.write().await;

        Ok(jobs.get_mut(id).map(|job| {
            job.views += 1;
            job.clone()
        }))
    }

    async fn search(&self, query: &JobQuery) -> Result<Page<Job>, JobError> {
        let jobs = self.jobs.read().await;

        let mut matching: Vec<&Job> = jobs
            .values()
            .filter(|job| job.status == query.status && matches_filter(job, &query.filter))
            .collect();

        matching.sort_by(|a, b| {
            let ordering = compare(a, b, query.sort.field).then_with(|| a.id.0.cmp(&b.id.0));
            match query.sort.direction {
                SortDirection::Asc => ordering,
                SortDirection::Desc => ordering.reverse(),
            }
        });

        let total_elements = matching.len() as u64;
        let offset = usize::try_from(query.page.offset()).unwrap_or(usize::MAX);
        let content = matching
            .into_iter()
            .skip(offset)
            .take(query.page.size as usize)
            .cloned()
            .collect();

        Ok(Page {
            content,
            page: query.page.index,
            size: query.page.size,
            total_elements,
        })
    }

    async fn update(&self, job: Job, expected_status: JobStatus) -> Result<Option<Job>, JobError> {
        let mut jobs = self.jobs.write().await;

        match jobs.get_mut(&job.id) {
            Some(stored) if stored.status != expected_status => Ok(None),
            Some(stored) => {
                // Counters may have moved since the caller loaded the job
                let views = stored.views;
                let applications = stored.applications;
                *stored = Job {
                    views,
                    applications,
                    ..job
                };
                Ok(Some(stored.clone()))
            }
            None => Err(JobError::NotFound(job.id.to_string())),
        }
    }

    async fn delete(&self, id: &JobId) -> Result<(), JobError> {
        self.jobs
            .write()
            .await
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| JobError::NotFound(id.to_string()))
    }
}

fn matches_filter(job: &Job, filter: &JobFilter) -> bool {
    match filter {
        JobFilter::TitleContains(text) => contains_ignore_case(&job.details.title, text),
        JobFilter::LocationContains(text) => contains_ignore_case(&job.details.location, text),
        JobFilter::JobType(job_type) => job.details.job_type == *job_type,
        JobFilter::All => true,
    }
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

fn compare(a: &Job, b: &Job, field: SortField) -> Ordering {
    match field {
        SortField::PostedAt => a.posted_at.cmp(&b.posted_at),
        SortField::Title => a.details.title.cmp(&b.details.title),
        SortField::Location => a.details.location.cmp(&b.details.location),
        SortField::Views => a.views.cmp(&b.views),
        SortField::Applications => a.applications.cmp(&b.applications),
        SortField::Deadline => a.details.deadline.cmp(&b.details.deadline),
        SortField::MinSalary => a.details.salary.min().total_cmp(&b.details.salary.min()),
        SortField::MaxSalary => a.details.salary.max().total_cmp(&b.details.salary.max()),
    }
}
