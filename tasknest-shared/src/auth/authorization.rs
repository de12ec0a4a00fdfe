/// Ownership checks
///
/// Every mutate/delete/detail operation on an owned entity must verify that
/// the requester is the entity's owner before proceeding. That rule lives
/// here as one reusable predicate instead of being repeated in each handler;
/// the handler looks the entity up, then calls [`require_ownership`] with
/// the entity's `user_id`.
///
/// # Example
///
/// ```
/// use tasknest_shared::auth::authorization::require_ownership;
/// use tasknest_shared::auth::middleware::AuthContext;
/// use uuid::Uuid;
///
/// let owner = Uuid::new_v4();
/// let auth = AuthContext::from_jwt(owner);
///
/// assert!(require_ownership(&auth, owner).is_ok());
/// assert!(require_ownership(&auth, Uuid::new_v4()).is_err());
/// ```

use uuid::Uuid;

use super::middleware::AuthContext;

/// Error type for authorization checks
#[derive(Debug, thiserror::Error)]
pub enum AuthzError {
    /// Requester does not own the resource
    #[error("Not authorized to access this resource")]
    NotOwner,
}

/// Checks that the requester owns a resource
///
/// # Arguments
///
/// * `auth` - Authentication context of the requester
/// * `resource_owner_id` - Owner ID stored on the resource
///
/// # Returns
///
/// `Ok(())` if the requester is the owner, `AuthzError::NotOwner` otherwise
pub fn require_ownership(auth: &AuthContext, resource_owner_id: Uuid) -> Result<(), AuthzError> {
    if auth.user_id != resource_owner_id {
        return Err(AuthzError::NotOwner);
    }

    Ok(())
}
