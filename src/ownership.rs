//! Fetch-then-check access control shared by every user owned resource.
//!
//! Loading a resource and checking its owner are two separate steps:
//! [require_found] turns a missing row into [Error::NotFound] and
//! [assert_owner] turns a row owned by someone else into [Error::Forbidden].
//! The existence check always runs first, so a missing resource is reported as
//! 404 even to callers that could never own it.

use crate::{Error, auth::UserID};

/// A resource that belongs to exactly one user.
pub trait Owned {
    /// The capitalised name of the resource used in messages, e.g. "Category".
    const NAME: &'static str;

    /// The ID of the user that owns the resource.
    fn owner(&self) -> UserID;
}

/// What the caller is trying to do with a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Read the resource.
    Read,
    /// Modify the resource.
    Update,
    /// Remove the resource.
    Delete,
    /// Reference the resource from another resource, e.g. a transaction's category.
    Use,
}

impl Access {
    fn verb(self) -> &'static str {
        match self {
            Access::Read => "access",
            Access::Update => "update",
            Access::Delete => "delete",
            Access::Use => "use",
        }
    }
}

/// Return the resource or [Error::NotFound] if there is none.
pub fn require_found<T: Owned>(resource: Option<T>) -> Result<T, Error> {
    resource.ok_or_else(|| Error::NotFound(format!("{} not found", T::NAME)))
}

/// Check that `caller` owns `resource`.
///
/// # Errors
/// Returns [Error::Forbidden] if the resource belongs to another user.
pub fn assert_owner<T: Owned>(resource: &T, caller: UserID, access: Access) -> Result<(), Error> {
    if resource.owner() == caller {
        Ok(())
    } else {
        Err(Error::Forbidden(format!(
            "Not authorized to {} this {}",
            access.verb(),
            T::NAME.to_lowercase()
        )))
    }
}

/// [require_found] followed by [assert_owner].
pub fn load_owned<T: Owned>(
    resource: Option<T>,
    caller: UserID,
    access: Access,
) -> Result<T, Error> {
    let resource = require_found(resource)?;
    assert_owner(&resource, caller, access)?;

    Ok(resource)
}

#[cfg(test)]
mod tests {
    use crate::{Error, auth::UserID};

    use super::{Access, Owned, assert_owner, load_owned, require_found};

    #[derive(Debug, PartialEq)]
    struct Widget {
        owner: UserID,
    }

    impl Owned for Widget {
        const NAME: &'static str = "Widget";

        fn owner(&self) -> UserID {
            self.owner
        }
    }

    #[test]
    fn missing_resource_is_not_found() {
        let got = require_found::<Widget>(None);

        assert_eq!(got, Err(Error::NotFound("Widget not found".to_owned())));
    }

    #[test]
    fn owner_passes_check() {
        let widget = Widget {
            owner: UserID::new(1),
        };

        assert_eq!(assert_owner(&widget, UserID::new(1), Access::Update), Ok(()));
    }

    #[test]
    fn non_owner_is_forbidden_with_access_specific_message() {
        let widget = Widget {
            owner: UserID::new(1),
        };

        let cases = [
            (Access::Read, "Not authorized to access this widget"),
            (Access::Update, "Not authorized to update this widget"),
            (Access::Delete, "Not authorized to delete this widget"),
            (Access::Use, "Not authorized to use this widget"),
        ];

        for (access, message) in cases {
            assert_eq!(
                assert_owner(&widget, UserID::new(2), access),
                Err(Error::Forbidden(message.to_owned()))
            );
        }
    }

    #[test]
    fn load_owned_checks_existence_before_ownership() {
        let got = load_owned::<Widget>(None, UserID::new(2), Access::Read);

        assert_eq!(got, Err(Error::NotFound("Widget not found".to_owned())));
    }

    #[test]
    fn load_owned_returns_resource_for_owner() {
        let got = load_owned(
            Some(Widget {
                owner: UserID::new(3),
            }),
            UserID::new(3),
            Access::Read,
        );

        assert_eq!(
            got,
            Ok(Widget {
                owner: UserID::new(3)
            })
        );
    }
}
