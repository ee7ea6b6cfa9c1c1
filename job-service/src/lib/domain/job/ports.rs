use async_trait::async_trait;

use crate::domain::authorization::Actor;
use crate::domain::job::errors::JobError;
use crate::domain::job::models::CreateJobCommand;
use crate::domain::job::models::Job;
use crate::domain::job::models::JobId;
use crate::domain::job::models::JobStatus;
use crate::domain::job::models::Page;
use crate::domain::job::models::UpdateJobCommand;
use crate::domain::job::query::JobQuery;
use crate::domain::job::query::JobQueryParams;

/// Port for job posting operations.
#[async_trait]
pub trait JobServicePort: Send + Sync + 'static {
    /// List active postings matching the parameters.
    ///
    /// # Errors
    /// * `Validation` - The job type filter is not a job type code
    /// * `StoreUnavailable` - Store operation failed
    async fn list_jobs(&self, params: JobQueryParams) -> Result<Page<Job>, JobError>;

    /// Fetch one posting, counting the read as a view.
    ///
    /// # Returns
    /// The posting with its incremented view count
    ///
    /// # Errors
    /// * `NotFound` - Job does not exist
    /// * `StoreUnavailable` - Store operation failed
    async fn get_job(&self, id: &JobId) -> Result<Job, JobError>;

    /// Publish a posting owned by the acting employer.
    ///
    /// # Errors
    /// * `Denied` - Actor is anonymous or not an employer
    /// * `Validation` - Posting content is invalid
    /// * `StoreUnavailable` - Store operation failed
    async fn create_job(&self, actor: &Actor, command: CreateJobCommand) -> Result<Job, JobError>;

    /// Replace a posting's content.
    ///
    /// # Errors
    /// * `Denied` - Actor is anonymous, a worker, or not the owner
    /// * `NotFound` - Job does not exist
    /// * `Validation` - Posting content is invalid
    /// * `InvalidStatusTransition` - Requested status is not reachable
    /// * `StoreUnavailable` - Store operation failed
    async fn update_job(
        &self,
        actor: &Actor,
        id: &JobId,
        command: UpdateJobCommand,
    ) -> Result<Job, JobError>;

    /// Remove a posting.
    ///
    /// # Errors
    /// * `Denied` - Actor is anonymous, a worker, or not the owner
    /// * `NotFound` - Job does not exist
    /// * `StoreUnavailable` - Store operation failed
    async fn delete_job(&self, actor: &Actor, id: &JobId) -> Result<(), JobError>;
}

/// Persistence operations for job postings.
#[async_trait]
pub trait JobRepository: Send + Sync + 'static {
    /// Persist a new posting.
    ///
    /// # Errors
    /// * `StoreUnavailable` - Store operation failed
    async fn create(&self, job: Job) -> Result<Job, JobError>;

    /// Retrieve a posting by identifier.
    ///
    /// # Errors
    /// * `StoreUnavailable` - Store operation failed
    async fn find_by_id(&self, id: &JobId) -> Result<Option<Job>, JobError>;

    /// Atomically add one to the view counter and return the updated
    /// posting. Concurrent calls must never lose an increment.
    ///
    /// # Errors
    /// * `StoreUnavailable` - Store operation failed
    async fn find_and_increment_views(&self, id: &JobId) -> Result<Option<Job>, JobError>;

    /// Run a resolved query and return the requested page with totals.
    ///
    /// # Errors
    /// * `StoreUnavailable` - Store operation failed
    async fn search(&self, query: &JobQuery) -> Result<Page<Job>, JobError>;

    /// Overwrite a stored posting, provided its status is still
    /// `expected_status`. The check and the write happen atomically.
    ///
    /// # Returns
    /// The stored posting, or `None` when the status moved since the caller
    /// loaded it
    ///
    /// # Errors
    /// * `NotFound` - Job does not exist
    /// * `StoreUnavailable` - Store operation failed
    async fn update(&self, job: Job, expected_status: JobStatus) -> Result<Option<Job>, JobError>;

    /// Delete a posting.
    ///
    /// # Errors
    /// * `NotFound` - Job does not exist
    /// * `StoreUnavailable` - Store operation failed
    async fn delete(&self, id: &JobId) -> Result<(), JobError>;
}
