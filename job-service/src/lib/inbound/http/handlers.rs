use axum::extract::rejection::JsonRejection;
use axum::extract::rejection::QueryRejection;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use crate::domain::authorization::DenyReason;
use crate::domain::job::errors::JobError;
use crate::domain::job::models::Job;
use crate::domain::job::models::JobDetails;
use crate::domain::job::models::Page;
use crate::domain::job::models::SalaryRange;
use crate::domain::user::models::User;
use crate::user::errors::UserError;

pub mod create_job;
pub mod delete_job;
pub mod get_job;
pub mod list_jobs;
pub mod login;
pub mod logout;
pub mod register;
pub mod update_job;

/// Message returned for every failed login, whatever the cause.
pub const INVALID_LOGIN_MESSAGE: &str = "Invalid username or password";

#[derive(Debug, Clone)]
pub struct ApiSuccess<T: Serialize + PartialEq>(StatusCode, Json<ApiResponseBody<T>>);

impl<T> PartialEq for ApiSuccess<T>
where
    T: Serialize + PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0 && self.1 .0 == other.1 .0
    }
}

impl<T: Serialize + PartialEq> ApiSuccess<T> {
    pub fn new(status: StatusCode, data: T) -> Self {
        ApiSuccess(status, Json(ApiResponseBody::new(status, data)))
    }
}

impl<T: Serialize + PartialEq> IntoResponse for ApiSuccess<T> {
    fn into_response(self) -> Response {
        (self.0, self.1).into_response()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    InternalServerError(String),
    BadRequest(String),
    NotFound(String),
    Unauthorized(String),
    Forbidden(String),
    Conflict(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::InternalServerError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg),
        };

        (status, Json(ApiResponseBody::new_error(status, message))).into_response()
    }
}

impl From<UserError> for ApiError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::InvalidUserId(_)
            | UserError::InvalidUsername(_)
            | UserError::InvalidEmail(_)
            | UserError::InvalidRole(_)
            | UserError::InvalidName(_)
            | UserError::InvalidPassword(_)
            | UserError::DuplicateUsername(_)
            | UserError::DuplicateEmail(_) => ApiError::BadRequest(err.to_string()),
            UserError::NotFound(_) => ApiError::NotFound(err.to_string()),
            UserError::InvalidCredentials => ApiError::BadRequest(INVALID_LOGIN_MESSAGE.to_string()),
            UserError::Credential(_) | UserError::StoreUnavailable(_) => {
                tracing::error!(error = %err, "User operation failed");
                ApiError::InternalServerError("Internal server error".to_string())
            }
        }
    }
}

impl From<JobError> for ApiError {
    fn from(err: JobError) -> Self {
        match err {
            JobError::InvalidJobId(_)
            | JobError::Validation(_)
            | JobError::InvalidStatusTransition { .. } => ApiError::BadRequest(err.to_string()),
            JobError::Denied(DenyReason::Unauthenticated) => ApiError::Unauthorized(err.to_string()),
            JobError::Denied(DenyReason::InsufficientRole | DenyReason::NotOwner) => {
                ApiError::Forbidden(err.to_string())
            }
            JobError::NotFound(_) => ApiError::NotFound(err.to_string()),
            JobError::Conflict(_) => ApiError::Conflict(err.to_string()),
            JobError::StoreUnavailable(_) => {
                tracing::error!(error = %err, "Job operation failed");
                ApiError::InternalServerError("Internal server error".to_string())
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiResponseBody<T: Serialize + PartialEq> {
    status_code: u16,
    data: T,
}

impl<T: Serialize + PartialEq> ApiResponseBody<T> {
    pub fn new(status_code: StatusCode, data: T) -> Self {
        Self {
            status_code: status_code.as_u16(),
            data,
        }
    }
}

impl ApiResponseBody<ApiErrorData> {
    pub fn new_error(status_code: StatusCode, message: String) -> Self {
        Self {
            status_code: status_code.as_u16(),
            data: ApiErrorData { message },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiErrorData {
    pub message: String,
}

/// Public view of an account. Never carries the password hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserData {
    pub id: String,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: String,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for UserData {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.to_string(),
            username: user.username.as_str().to_string(),
            email: user.email.as_str().to_string(),
            first_name: user.first_name.as_str().to_string(),
            last_name: user.last_name.as_str().to_string(),
            role: user.role.as_str().to_string(),
            active: user.active,
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobData {
    pub id: String,
    pub employer_id: String,
    pub title: String,
    pub description: String,
    pub location: String,
    pub min_salary: f64,
    pub max_salary: f64,
    pub currency: Option<String>,
    pub job_type: String,
    pub employment_type: Option<String>,
    pub skills: Vec<String>,
    pub experience: Option<String>,
    pub education: Option<String>,
    pub benefits: Vec<String>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub deadline: Option<DateTime<Utc>>,
    pub status: String,
    pub views: i64,
    pub applications: i64,
    pub posted_at: DateTime<Utc>,
}

impl From<&Job> for JobData {
    fn from(job: &Job) -> Self {
        let d = &job.details;
        Self {
            id: job.id.to_string(),
            employer_id: job.employer_id.to_string(),
            title: d.title.clone(),
            description: d.description.clone(),
            location: d.location.clone(),
            min_salary: d.salary.min(),
            max_salary: d.salary.max(),
            currency: d.salary.currency().map(str::to_string),
            job_type: d.job_type.as_str().to_string(),
            employment_type: d.employment_type.map(|e| e.as_str().to_string()),
            skills: d.skills.clone(),
            experience: d.experience.clone(),
            education: d.education.clone(),
            benefits: d.benefits.clone(),
            contact_email: d.contact_email.clone(),
            contact_phone: d.contact_phone.clone(),
            deadline: d.deadline,
            status: job.status.as_str().to_string(),
            views: job.views,
            applications: job.applications,
            posted_at: job.posted_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageData<T: Serialize + PartialEq> {
    pub content: Vec<T>,
    pub page: u32,
    pub size: u32,
    pub total_elements: u64,
    pub total_pages: u64,
}

impl From<Page<Job>> for PageData<JobData> {
    fn from(page: Page<Job>) -> Self {
        let total_pages = page.total_pages();
        let page = page.map(|ref job| JobData::from(job));
        Self {
            content: page.content,
            page: page.page,
            size: page.size,
            total_elements: page.total_elements,
            total_pages,
        }
    }
}

/// Employer-supplied posting content, shared by create and update.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobDetailsRequest {
    title: String,
    description: String,
    location: String,
    min_salary: f64,
    max_salary: f64,
    currency: Option<String>,
    job_type: String,
    employment_type: Option<String>,
    #[serde(default)]
    skills: Vec<String>,
    experience: Option<String>,
    education: Option<String>,
    #[serde(default)]
    benefits: Vec<String>,
    contact_email: Option<String>,
    contact_phone: Option<String>,
    deadline: Option<DateTime<Utc>>,
}

impl JobDetailsRequest {
    fn try_into_details(self) -> Result<JobDetails, JobError> {
        Ok(JobDetails {
            title: self.title,
            description: self.description,
            location: self.location,
            salary: SalaryRange::new(self.min_salary, self.max_salary, self.currency)?,
            job_type: self.job_type.parse()?,
            employment_type: self.employment_type.map(|e| e.parse()).transpose()?,
            skills: self.skills,
            experience: self.experience,
            education: self.education,
            benefits: self.benefits,
            contact_email: self.contact_email,
            contact_phone: self.contact_phone,
            deadline: self.deadline,
        })
    }
}
