//! Role-based access guard.
//!
//! Authorisation consults only the caller's primary role (the first
//! assignment); a user whose allowed role appears later in the list is still
//! rejected. No authenticated session is `401`; an authenticated session with
//! a disallowed primary role is `403`.

use crate::domain::account::{Role, SessionUser};
use crate::domain::Error;

use super::session::SessionContext;

/// Require an authenticated session whose primary role is in `allowed`.
pub fn require_role(session: &SessionContext, allowed: &[Role]) -> Result<SessionUser, Error> {
    let user = session.require_user()?;
    let primary = user
        .primary_role()
        .ok_or_else(|| Error::forbidden("no role assigned"))?;
    if !allowed.contains(&primary) {
        return Err(Error::forbidden("insufficient role"));
    }
    Ok(user)
}

/// Allowed roles for the trip and itinerary endpoints.
pub const USER_OR_ADMIN: &[Role] = &[Role::User, Role::Admin];
