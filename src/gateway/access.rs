use super::Rejection;
use crate::types::{AccessMode, Permission, Pusher, Visibility};

/// Computes the bits a pusher holds on a repository.
///
/// The owner holds everything. Anyone else is governed by their explicit
/// grant if one exists, otherwise by the repository's visibility. Unknown
/// visibilities and grant modes grant nothing, and MANAGE is never granted
/// to a non-owner.
pub fn held_permission(
    pusher_id: i64,
    owner_id: i64,
    visibility: &Visibility,
    grant: Option<&AccessMode>,
) -> Permission {
    if pusher_id == owner_id {
        return Permission::ALL;
    }

    match grant {
        None => match visibility {
            Visibility::Public | Visibility::Unlisted => Permission::READ,
            Visibility::Private | Visibility::Autocreated | Visibility::Other(_) => {
                Permission::NONE
            }
        },
        Some(AccessMode::ReadOnly) => Permission::READ,
        Some(AccessMode::ReadWrite) => Permission::READ.union(Permission::WRITE),
        Some(AccessMode::Other(_)) => Permission::NONE,
    }
}

/// Denies unless `held` covers every bit of `required`. The rejection never
/// says whether the repository is private or the grant is missing.
pub fn check_access(required: Permission, held: Permission) -> Result<(), Rejection> {
    if held.has(required) {
        Ok(())
    } else {
        Err(Rejection::AccessDenied)
    }
}

/// Refuses suspended accounts regardless of what they would otherwise hold.
pub fn check_suspension(pusher: &Pusher, support_contact: &str) -> Result<(), Rejection> {
    if !pusher.user_type.is_suspended() {
        return Ok(());
    }

    Err(Rejection::Suspended {
        notice: pusher.suspension_notice.clone().unwrap_or_default(),
        contact: support_contact.to_string(),
    })
}
