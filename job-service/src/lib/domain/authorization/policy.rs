//! Role and ownership rules for job operations.
//!
//! `authorize` is a total, pure function: it performs no I/O and every
//! well-formed input yields a decision. Callers turn a `Deny` into an error
//! response; a denial is always terminal for the request.

use std::fmt;

use crate::domain::user::models::Role;
use crate::domain::user::models::SessionIdentity;
use crate::domain::user::models::UserId;

/// The caller of an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Actor {
    /// No (or no usable) session.
    Anonymous,
    Authenticated { user_id: UserId, role: Role },
}

impl Actor {
    pub fn authenticated(user_id: UserId, role: Role) -> Self {
        Actor::Authenticated { user_id, role }
    }

    pub fn user_id(&self) -> Option<UserId> {
        match self {
            Actor::Anonymous => None,
            Actor::Authenticated { user_id, .. } => Some(*user_id),
        }
    }
}

impl From<SessionIdentity> for Actor {
    fn from(identity: SessionIdentity) -> Self {
        Actor::authenticated(identity.user_id, identity.role)
    }
}

impl From<Option<SessionIdentity>> for Actor {
    fn from(identity: Option<SessionIdentity>) -> Self {
        identity.map_or(Actor::Anonymous, Actor::from)
    }
}

/// Operations subject to access control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    ReadJob,
    CreateJob,
    UpdateJob,
    DeleteJob,
}

impl Operation {
    pub fn requires_identity(&self) -> bool {
        !matches!(self, Operation::ReadJob)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Operation::ReadJob => "read job",
            Operation::CreateJob => "create job",
            Operation::UpdateJob => "update job",
            Operation::DeleteJob => "delete job",
        })
    }
}

/// Why an operation was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum DenyReason {
    #[error("Authentication required")]
    Unauthenticated,

    #[error("Insufficient role for this operation")]
    InsufficientRole,

    #[error("Only the owning employer may modify this job")]
    NotOwner,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny(DenyReason),
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allow)
    }

    /// # Errors
    /// The deny reason, if any.
    pub fn into_result(self) -> Result<(), DenyReason> {
        match self {
            Decision::Allow => Ok(()),
            Decision::Deny(reason) => Err(reason),
        }
    }
}

/// Decide whether `actor` may perform `operation`.
///
/// `resource_owner` is the employer recorded on the job for update/delete.
/// It is ignored for reads and creation. When it is `None` for an
/// update/delete, ownership cannot be shown and an employer is refused with
/// `NotOwner`; identity and role checks still come first, so callers may
/// gate on those before loading the resource.
///
/// Rules, first match wins:
/// 1. reads are always allowed;
/// 2. anonymous actors are refused (`Unauthenticated`);
/// 3. creation needs `EMPLOYER`;
/// 4. update/delete needs `ADMIN`, or `EMPLOYER` owning the job.
pub fn authorize(actor: &Actor, operation: Operation, resource_owner: Option<&UserId>) -> Decision {
    if !operation.requires_identity() {
        return Decision::Allow;
    }

    let (user_id, role) = match actor {
        Actor::Anonymous => return Decision::Deny(DenyReason::Unauthenticated),
        Actor::Authenticated { user_id, role } => (user_id, *role),
    };

    match operation {
        Operation::ReadJob => Decision::Allow,
        Operation::CreateJob => match role {
            Role::Employer => Decision::Allow,
            Role::Worker | Role::Admin => Decision::Deny(DenyReason::InsufficientRole),
        },
        Operation::UpdateJob | Operation::DeleteJob => match role {
            Role::Admin => Decision::Allow,
            Role::Employer if resource_owner == Some(user_id) => Decision::Allow,
            Role::Employer => Decision::Deny(DenyReason::NotOwner),
            Role::Worker => Decision::Deny(DenyReason::InsufficientRole),
        },
    }
}
