//! Per-request context.
//!
//! Every operation receives the acting principal, the hotel the principal
//! is scoped to, and the local calendar date explicitly. Nothing is read
//! from ambient global state.

use std::fmt;
use std::str::FromStr;

use chrono::{FixedOffset, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::booking::ValidationError;
use crate::error::{Error, Result};
use crate::HotelId;

/// Role of an authenticated principal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// May act on every hotel and tear hotels down.
    Admin,
    /// May act only on the hotel in scope.
    Manager,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Admin => f.write_str("admin"),
            Self::Manager => f.write_str("manager"),
        }
    }
}

impl FromStr for Role {
    type Err = ValidationError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "admin" => Ok(Self::Admin),
            "manager" => Ok(Self::Manager),
            other => Err(ValidationError {
                field: "role".into(),
                message: format!("unknown role '{other}'"),
            }),
        }
    }
}

/// The authenticated caller, as established by an outer layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    /// User name recorded in audit entries.
    pub username: String,
    /// Role.
    pub role: Role,
}

impl Principal {
    /// Creates an administrator principal.
    #[must_use]
    pub fn admin(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            role: Role::Admin,
        }
    }

    /// Creates a manager principal.
    #[must_use]
    pub fn manager(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            role: Role::Manager,
        }
    }
}

/// A stored user account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserAccount {
    /// Row identifier.
    pub id: i64,
    /// Unique login name.
    pub username: String,
    /// Role.
    pub role: Role,
    /// Hotel the user is attached to, if any.
    pub hotel_id: Option<i64>,
}

/// Context passed into every operation.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use innkeep::{HotelId, Principal, RequestContext};
///
/// let hotel = HotelId::try_from(3).unwrap();
/// let ctx = RequestContext::new(Principal::manager("mira"))
///     .with_hotel_scope(Some(hotel))
///     .with_today(NaiveDate::from_ymd_opt(2030, 1, 1).unwrap());
///
/// assert!(ctx.authorize_hotel(hotel).is_ok());
/// assert!(ctx.authorize_hotel(HotelId::try_from(4).unwrap()).is_err());
/// assert!(ctx.require_admin("delete hotel").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    principal: Principal,
    hotel_scope: Option<HotelId>,
    today: NaiveDate,
}

impl RequestContext {
    /// Creates a context for `principal` with no hotel scope and today's
    /// UTC date.
    #[must_use]
    pub fn new(principal: Principal) -> Self {
        Self {
            principal,
            hotel_scope: None,
            today: Utc::now().date_naive(),
        }
    }

    /// Restricts the context to one hotel.
    #[must_use]
    pub fn with_hotel_scope(mut self, hotel_id: Option<HotelId>) -> Self {
        self.hotel_scope = hotel_id;
        self
    }

    /// Sets "today" from the current instant in the given fixed offset.
    #[must_use]
    pub fn with_utc_offset(mut self, offset: FixedOffset) -> Self {
        self.today = Utc::now().with_timezone(&offset).date_naive();
        self
    }

    /// Overrides "today".
    #[must_use]
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }

    /// The acting principal.
    #[must_use]
    pub const fn principal(&self) -> &Principal {
        &self.principal
    }

    /// The hotel the principal is restricted to, if any.
    #[must_use]
    pub const fn hotel_scope(&self) -> Option<HotelId> {
        self.hotel_scope
    }

    /// The local calendar date for the request.
    #[must_use]
    pub const fn today(&self) -> NaiveDate {
        self.today
    }

    /// Checks that the principal may act on `hotel_id`.
    ///
    /// Administrators may act on any hotel unless explicitly scoped;
    /// managers only on their scoped hotel.
    ///
    /// # Errors
    ///
    /// Returns `Unauthorized` if the hotel is outside the principal's scope.
    pub fn authorize_hotel(&self, hotel_id: HotelId) -> Result<()> {
        match (self.principal.role, self.hotel_scope) {
            (_, Some(scope)) if scope == hotel_id => Ok(()),
            (Role::Admin, None) => Ok(()),
            _ => Err(Error::Unauthorized {
                details: format!(
                    "{} ({}) may not act on hotel {hotel_id}",
                    self.principal.username, self.principal.role
                ),
            }),
        }
    }

    /// Checks that the principal is an administrator.
    ///
    /// # Errors
    ///
    /// Returns `Unauthorized` for non-administrators.
    pub fn require_admin(&self, operation: &str) -> Result<()> {
        if self.principal.role == Role::Admin {
            Ok(())
        } else {
            Err(Error::Unauthorized {
                details: format!(
                    "{operation} requires an administrator; {} is a {}",
                    self.principal.username, self.principal.role
                ),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hotel(id: i64) -> HotelId {
        HotelId::try_from(id).unwrap()
    }

    #[test]
    fn test_unscoped_admin_reaches_every_hotel() {
        let ctx = RequestContext::new(Principal::admin("root"));
        assert!(ctx.authorize_hotel(hotel(1)).is_ok());
        assert!(ctx.authorize_hotel(hotel(99)).is_ok());
        assert!(ctx.require_admin("delete hotel").is_ok());
    }

    #[test]
    fn test_scoped_admin_is_restricted() {
        let ctx = RequestContext::new(Principal::admin("root")).with_hotel_scope(Some(hotel(1)));
        assert!(ctx.authorize_hotel(hotel(1)).is_ok());
        assert!(ctx.authorize_hotel(hotel(2)).is_err());
    }

    #[test]
    fn test_unscoped_manager_reaches_nothing() {
        let ctx = RequestContext::new(Principal::manager("mira"));
        let err = ctx.authorize_hotel(hotel(1)).unwrap_err();
        assert!(matches!(err, Error::Unauthorized { .. }));
    }

    #[test]
    fn test_role_parse() {
        assert_eq!("Admin".parse::<Role>().unwrap(), Role::Admin);
        assert_eq!("manager".parse::<Role>().unwrap(), Role::Manager);
        assert!("guest".parse::<Role>().is_err());
    }

    #[test]
    fn test_today_override() {
        let date = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let ctx = RequestContext::new(Principal::admin("root")).with_today(date);
        assert_eq!(ctx.today(), date);
    }
}
