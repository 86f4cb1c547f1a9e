//! Tenant provisioning: hotels, their dynamic tables, user accounts, and
//! manager assignments. All of it is administrator-only.

use serde::{Deserialize, Serialize};

use crate::context::{RequestContext, Role, UserAccount};
use crate::database::{create_tenant_tables, Database};
use crate::error::{Error, Result};
use crate::{Hotel, HotelId, NewHotel};

/// A newly provisioned hotel with the names of its dynamic tables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProvisionedHotel {
    /// The stored hotel row.
    pub hotel: Hotel,
    /// Name of the hotel's rooms table.
    pub rooms_table: String,
    /// Name of the hotel's bookings table.
    pub bookings_table: String,
}

/// Creates a hotel and its dynamic table pair in one transaction.
///
/// # Errors
///
/// - [`Error::Unauthorized`] unless the principal is an administrator
/// - [`Error::Validation`] for a blank name
/// - [`Error::TransactionFailure`] if any statement is rejected; nothing is
///   left behind in that case
pub fn create_hotel(
    db: &mut Database,
    ctx: &RequestContext,
    hotel: &NewHotel,
) -> Result<ProvisionedHotel> {
    ctx.require_admin("create hotel")?;
    hotel.validate()?;

    let provisioned = db.write("create hotel", |tx| {
        let id = Database::insert_hotel(tx, hotel)?;
        let tables = create_tenant_tables(tx, id)?;
        let stored = Database::get_hotel(tx, id)?
            .ok_or_else(|| Error::not_found(format!("hotel {id}")))?;
        Ok(ProvisionedHotel {
            hotel: stored,
            rooms_table: tables.rooms().to_string(),
            bookings_table: tables.bookings().to_string(),
        })
    })?;

    log::info!(
        "provisioned hotel {} ({})",
        provisioned.hotel.id,
        provisioned.hotel.name
    );
    Ok(provisioned)
}

/// Creates a user account, optionally attached to a hotel.
///
/// # Errors
///
/// - [`Error::Unauthorized`] unless the principal is an administrator
/// - [`Error::Validation`] for a blank username
/// - [`Error::NotFound`] if `hotel_id` names a missing hotel
/// - [`Error::TransactionFailure`] if the username is taken
pub fn create_user(
    db: &mut Database,
    ctx: &RequestContext,
    username: &str,
    role: Role,
    hotel_id: Option<HotelId>,
) -> Result<UserAccount> {
    ctx.require_admin("create user")?;
    let username = username.trim();
    if username.is_empty() {
        return Err(Error::validation("username", "username must be non-empty"));
    }

    db.write("create user", |tx| {
        if let Some(hotel_id) = hotel_id {
            if !Database::hotel_exists(tx, hotel_id)? {
                return Err(Error::not_found(format!("hotel {hotel_id}")));
            }
        }
        let id = Database::insert_user(tx, username, role, hotel_id)?;
        Ok(UserAccount {
            id,
            username: username.to_string(),
            role,
            hotel_id: hotel_id.map(HotelId::value),
        })
    })
}

/// Assigns an existing manager account to a hotel.
///
/// # Errors
///
/// - [`Error::Unauthorized`] unless the principal is an administrator
/// - [`Error::NotFound`] if the hotel or user does not exist
/// - [`Error::Validation`] if the user is not a manager
pub fn assign_manager(
    db: &mut Database,
    ctx: &RequestContext,
    hotel_id: HotelId,
    username: &str,
) -> Result<UserAccount> {
    ctx.require_admin("assign manager")?;

    db.write("assign manager", |tx| {
        if !Database::hotel_exists(tx, hotel_id)? {
            return Err(Error::not_found(format!("hotel {hotel_id}")));
        }
        let user = Database::find_user(tx, username)?
            .ok_or_else(|| Error::not_found(format!("user {username}")))?;
        if user.role != Role::Manager {
            return Err(Error::validation(
                "role",
                format!("{username} is a {}, not a manager", user.role),
            ));
        }
        Database::assign_manager(tx, hotel_id, user.id)?;
        Ok(UserAccount {
            hotel_id: Some(hotel_id.value()),
            ..user
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::Principal;
    use crate::database::test_util::create_test_database;
    use crate::database::{probe, TenantTables};

    fn admin() -> RequestContext {
        RequestContext::new(Principal::admin("root"))
    }

    #[test]
    fn test_create_hotel_provisions_tables() {
        let mut db = create_test_database();
        let provisioned = create_hotel(&mut db, &admin(), &NewHotel::named("Lakeside")).unwrap();

        assert_eq!(provisioned.hotel.name, "Lakeside");
        let presence = probe(
            db.connection(),
            &TenantTables::for_hotel(provisioned.hotel.id),
        )
        .unwrap();
        assert!(presence.rooms && presence.bookings);
        assert_eq!(
            provisioned.rooms_table,
            format!("rooms_hotel_{}", provisioned.hotel.id)
        );
    }

    #[test]
    fn test_manager_cannot_create_hotel() {
        let mut db = create_test_database();
        let ctx = RequestContext::new(Principal::manager("mira"));
        let err = create_hotel(&mut db, &ctx, &NewHotel::named("Nope")).unwrap_err();
        assert!(matches!(err, Error::Unauthorized { .. }));
        assert!(Database::list_hotels(db.connection()).unwrap().is_empty());
    }

    #[test]
    fn test_assign_manager() {
        let mut db = create_test_database();
        let hotel = create_hotel(&mut db, &admin(), &NewHotel::named("Summit"))
            .unwrap()
            .hotel
            .id;
        create_user(&mut db, &admin(), "mira", Role::Manager, None).unwrap();
        create_user(&mut db, &admin(), "boss", Role::Admin, None).unwrap();

        let assigned = assign_manager(&mut db, &admin(), hotel, "mira").unwrap();
        assert_eq!(assigned.hotel_id, Some(hotel.value()));

        let err = assign_manager(&mut db, &admin(), hotel, "boss").unwrap_err();
        assert!(matches!(err, Error::Validation { .. }));
        let err = assign_manager(&mut db, &admin(), hotel, "ghost").unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_duplicate_username_rejected() {
        let mut db = create_test_database();
        create_user(&mut db, &admin(), "mira", Role::Manager, None).unwrap();
        let err = create_user(&mut db, &admin(), "mira", Role::Manager, None).unwrap_err();
        assert!(matches!(err, Error::TransactionFailure { .. }));
    }
}
