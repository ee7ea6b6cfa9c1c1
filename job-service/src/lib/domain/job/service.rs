use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::authorization::authorize;
use crate::domain::authorization::Actor;
use crate::domain::authorization::Decision;
use crate::domain::authorization::DenyReason;
use crate::domain::authorization::Operation;
use crate::domain::job::errors::JobError;
use crate::domain::job::models::CreateJobCommand;
use crate::domain::job::models::Job;
use crate::domain::job::models::JobId;
use crate::domain::job::models::JobStatus;
use crate::domain::job::models::Page;
use crate::domain::job::models::UpdateJobCommand;
use crate::domain::job::ports::JobRepository;
use crate::domain::job::ports::JobServicePort;
use crate::domain::job::query::JobQueryParams;
use crate::domain::job::query::PageLimits;
use crate::domain::user::models::Role;
use crate::domain::user::ports::UserRepository;

/// Domain service implementation for job postings.
///
/// Every mutation is checked against the authorization policy before it
/// reaches the store.
pub struct JobService<JR, UR>
where
    JR: JobRepository,
    UR: UserRepository,
{
    jobs: Arc<JR>,
    users: Arc<UR>,
    limits: PageLimits,
}

impl<JR, UR> JobService<JR, UR>
where
    JR: JobRepository,
    UR: UserRepository,
{
    /// Create a new job service with injected dependencies.
    ///
    /// # Arguments
    /// * `jobs` - Job store implementation
    /// * `users` - Credential store, used to confirm the posting employer
    /// * `limits` - Paging bounds for listings
    pub fn new(jobs: Arc<JR>, users: Arc<UR>, limits: PageLimits) -> Self {
        Self {
            jobs,
            users,
            limits,
        }
    }

    /// Load a job the actor intends to modify.
    ///
    /// Identity and role are checked before the lookup so that anonymous
    /// callers and workers learn nothing about which ids exist.
    async fn load_for_change(
        &self,
        actor: &Actor,
        operation: Operation,
        id: &JobId,
    ) -> Result<Job, JobError> {
        if let Decision::Deny(reason @ (DenyReason::Unauthenticated | DenyReason::InsufficientRole)) =
            authorize(actor, operation, None)
        {
            return Err(self.denied(actor, operation, reason));
        }

        let job = self
            .jobs
            .find_by_id(id)
            .await?
            .ok_or_else(|| JobError::NotFound(id.to_string()))?;

        authorize(actor, operation, Some(&job.employer_id))
            .into_result()
            .map_err(|reason| self.denied(actor, operation, reason))?;

        Ok(job)
    }

    const MAX_UPDATE_ATTEMPTS: usize = 3;

    fn denied(&self, actor: &Actor, operation: Operation, reason: DenyReason) -> JobError {
        tracing::warn!(
            actor = ?actor.user_id(),
            %operation,
            %reason,
            "Operation denied"
        );
        JobError::Denied(reason)
    }
}

#[async_trait]
impl<JR, UR> JobServicePort for JobService<JR, UR>
where
    JR: JobRepository,
    UR: UserRepository,
{
    async fn list_jobs(&self, params: JobQueryParams) -> Result<Page<Job>, JobError> {
        let query = params.build(&self.limits)?;
        tracing::debug!(?query, "Searching jobs");

        self.jobs.search(&query).await
    }

    async fn get_job(&self, id: &JobId) -> Result<Job, JobError> {
        self.jobs
            .find_and_increment_views(id)
            .await?
            .ok_or_else(|| JobError::NotFound(id.to_string()))
    }

    async fn create_job(&self, actor: &Actor, command: CreateJobCommand) -> Result<Job, JobError> {
        authorize(actor, Operation::CreateJob, None)
            .into_result()
            .map_err(|reason| self.denied(actor, Operation::CreateJob, reason))?;

        let employer_id = actor
            .user_id()
            .ok_or(JobError::Denied(DenyReason::Unauthenticated))?;

        // The token's role is a snapshot; the stored account decides.
        let employer = self
            .users
            .find_by_id(&employer_id)
            .await
            .map_err(|e| JobError::StoreUnavailable(e.to_string()))?;
        match employer {
            Some(user) if user.active && user.role == Role::Employer => {}
            Some(user) if user.active => {
                return Err(self.denied(actor, Operation::CreateJob, DenyReason::InsufficientRole))
            }
            _ => {
                return Err(self.denied(actor, Operation::CreateJob, DenyReason::Unauthenticated))
            }
        }

        let details = command.details.validated()?;

        let job = Job {
            id: JobId::new(),
            employer_id,
            details,
            status: JobStatus::Active,
            views: 0,
            applications: 0,
            posted_at: Utc::now(),
        };

        let created = self.jobs.create(job).await?;
        tracing::info!(
            job_id = %created.id,
            employer_id = %created.employer_id,
            "Job created"
        );

        Ok(created)
    }

    async fn update_job(
        &self,
        actor: &Actor,
        id: &JobId,
        command: UpdateJobCommand,
    ) -> Result<Job, JobError> {
        // The write only lands if the status is still the one checked below.
        // A status moves at most once, so a reload settles it.
        for _ in 0..Self::MAX_UPDATE_ATTEMPTS {
            let mut job = self.load_for_change(actor, Operation::UpdateJob, id).await?;
            let loaded_status = job.status;
            let details = command.details.clone().validated()?;

            if let Some(next) = command.status {
                if !loaded_status.can_transition_to(next) {
                    return Err(JobError::InvalidStatusTransition {
                        from: loaded_status,
                        to: next,
                    });
                }
                job.status = next;
            }
            job.details = details;

            match self.jobs.update(job, loaded_status).await? {
                Some(updated) => {
                    tracing::info!(job_id = %updated.id, status = %updated.status, "Job updated");
                    return Ok(updated);
                }
                None => {
                    tracing::warn!(
                        job_id = %id,
                        %loaded_status,
                        "Job status changed during update, reloading"
                    );
                }
            }
        }

        Err(JobError::Conflict(id.to_string()))
    }

    async fn delete_job(&self, actor: &Actor, id: &JobId) -> Result<(), JobError> {
        self.load_for_change(actor, Operation::DeleteJob, id).await?;

        self.jobs.delete(id).await?;
        tracing::info!(job_id = %id, "Job deleted");

        Ok(())
    }
}
