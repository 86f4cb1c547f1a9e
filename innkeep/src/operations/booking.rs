//! Booking creation.
//!
//! A booking is written in one immediate transaction: guest row, booking
//! row, room status, and the `created` history record. The availability
//! rule is re-checked after the write lock is held, so two callers racing
//! for the same room serialize and the second one sees the first booking.

use std::collections::BTreeSet;

use chrono::Utc;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection};
use serde::{Deserialize, Serialize};

use crate::audit::{self, AuditAction, AuditEntry};
use crate::booking::{
    BookingId, BookingRequest, BookingStatus, BookingTotals, GuestInfo, StayInterval, DATE_FORMAT,
    TIME_FORMAT,
};
use crate::context::RequestContext;
use crate::database::{quote_identifier, require_table, Database, TenantTables};
use crate::error::{in_transaction, Error, Result};
use crate::room::{RoomId, RoomStatus};
use crate::{HotelId, Money};

use super::availability::find_conflicts;

/// Columns a bookings table must have to accept a booking.
pub const MANDATORY_BOOKING_COLUMNS: [&str; 4] =
    ["room_id", "checkin_date", "checkout_date", "status"];

const INSERT_GUEST: &str = r"
    INSERT INTO guests (name, phone, email, nid, address, created_at)
    VALUES (?, ?, ?, ?, ?, ?)
";

/// What a successful booking returns to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingReceipt {
    /// New booking id.
    pub booking_id: BookingId,
    /// Hotel booked.
    pub hotel_id: HotelId,
    /// Room booked.
    pub room_id: RoomId,
    /// Guest row created for this booking.
    pub guest_id: i64,
    /// Human-facing reference code, `BK-<hotel>-<booking>`.
    pub reference: String,
    /// The stay as stored.
    pub stay: StayInterval,
    /// Status of the new booking.
    pub status: BookingStatus,
    /// Computed charges.
    pub totals: BookingTotals,
}

/// Builds the reference code for a booking.
#[must_use]
pub fn booking_reference(hotel_id: HotelId, booking_id: BookingId) -> String {
    format!("BK-{hotel_id}-{booking_id}")
}

fn money(amount: Money) -> Value {
    Value::Integer(amount.minor())
}

fn text(value: Option<&str>) -> Value {
    value.map_or(Value::Null, |s| Value::Text(s.to_string()))
}

/// Every logical booking field paired with the column it is stored in.
fn booking_fields(
    request: &BookingRequest,
    guest_id: i64,
    totals: &BookingTotals,
    created_by: &str,
) -> Vec<(&'static str, Value)> {
    let guest = &request.guest;
    let stay = &request.stay;
    let charges = &request.charges;
    vec![
        ("room_id", Value::Integer(request.room_id.0)),
        ("guest_id", Value::Integer(guest_id)),
        ("guest_name", Value::Text(guest.name.trim().to_string())),
        ("guest_phone", Value::Text(guest.phone.trim().to_string())),
        ("guest_email", text(guest.email.as_deref())),
        ("guest_nid", text(guest.nid.as_deref())),
        ("guest_address", text(guest.address.as_deref())),
        (
            "checkin_date",
            Value::Text(stay.checkin_date().format(DATE_FORMAT).to_string()),
        ),
        (
            "checkin_time",
            text(
                stay.checkin_time()
                    .map(|t| t.format(TIME_FORMAT).to_string())
                    .as_deref(),
            ),
        ),
        (
            "checkout_date",
            Value::Text(stay.checkout_date().format(DATE_FORMAT).to_string()),
        ),
        (
            "checkout_time",
            text(
                stay.checkout_time()
                    .map(|t| t.format(TIME_FORMAT).to_string())
                    .as_deref(),
            ),
        ),
        ("nights", Value::Integer(totals.nights)),
        ("room_price", money(totals.room_price)),
        ("room_total", money(totals.room_total)),
        ("breakfast_price", money(charges.breakfast.price)),
        ("breakfast_qty", Value::Integer(i64::from(charges.breakfast.quantity))),
        ("breakfast_total", money(totals.breakfast_total)),
        ("lunch_price", money(charges.lunch.price)),
        ("lunch_qty", Value::Integer(i64::from(charges.lunch.quantity))),
        ("lunch_total", money(totals.lunch_total)),
        ("dinner_price", money(charges.dinner.price)),
        ("dinner_qty", Value::Integer(i64::from(charges.dinner.quantity))),
        ("dinner_total", money(totals.dinner_total)),
        ("meal_total", money(totals.meal_total)),
        ("discount", money(totals.discount)),
        ("amount_due", money(totals.amount_due)),
        ("paid", money(totals.paid)),
        ("due", money(totals.due)),
        ("status", Value::Text(BookingStatus::Active.as_str().to_string())),
        ("notes", text(request.notes.as_deref())),
        ("created_by", Value::Text(created_by.to_string())),
        ("created_at", Value::Text(Utc::now().to_rfc3339())),
    ]
}

fn check_mandatory_columns(table: &str, columns: &BTreeSet<String>) -> Result<()> {
    let missing: Vec<_> = MANDATORY_BOOKING_COLUMNS
        .iter()
        .filter(|c| !columns.contains(**c))
        .copied()
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(Error::SchemaInconsistency {
            table: table.to_string(),
            details: format!("missing required column(s): {}", missing.join(", ")),
        })
    }
}

fn insert_guest(conn: &Connection, guest: &GuestInfo) -> Result<i64> {
    conn.execute(
        INSERT_GUEST,
        params![
            guest.name.trim(),
            guest.phone.trim(),
            guest.email,
            guest.nid,
            guest.address,
            Utc::now().to_rfc3339(),
        ],
    )
    .map_err(in_transaction("insert guest"))?;
    Ok(conn.last_insert_rowid())
}

/// Inserts the present subset of `fields` into `table` and returns the new
/// row id.
fn insert_present_columns(
    conn: &Connection,
    table: &str,
    columns: &BTreeSet<String>,
    fields: Vec<(&'static str, Value)>,
) -> Result<i64> {
    let (names, values): (Vec<_>, Vec<_>) = fields
        .into_iter()
        .filter(|(name, _)| columns.contains(*name))
        .unzip();
    let skipped = columns.len().saturating_sub(names.len());
    if skipped > 0 {
        log::debug!("{table}: {skipped} column(s) left at their defaults");
    }

    let quoted = names
        .iter()
        .map(|name| quote_identifier(name))
        .collect::<Result<Vec<_>>>()?;
    let placeholders = vec!["?"; quoted.len()].join(", ");
    let sql = format!(
        "INSERT INTO {} ({}) VALUES ({placeholders})",
        quote_identifier(table)?,
        quoted.join(", ")
    );
    conn.execute(&sql, params_from_iter(values))
        .map_err(in_transaction("insert booking"))?;
    Ok(conn.last_insert_rowid())
}

/// Creates a booking.
///
/// The caller must be allowed to act on the hotel. Inputs are validated
/// before any lock is taken; everything after runs in one immediate
/// transaction that either commits in full or leaves no trace.
///
/// # Errors
///
/// - [`Error::Unauthorized`] if the principal may not act on the hotel
/// - [`Error::Validation`] for bad guest fields, dates, or amounts
/// - [`Error::NotFound`] if the hotel or room does not exist
/// - [`Error::SchemaInconsistency`] if a dynamic table or mandatory column
///   is missing
/// - [`Error::Conflict`] if an active booking blocks the stay
/// - [`Error::TransactionFailure`] if the store rejects a write
/// - [`Error::LockTimeout`] if the write lock cannot be obtained
pub fn create_booking(
    db: &mut Database,
    ctx: &RequestContext,
    request: &BookingRequest,
) -> Result<BookingReceipt> {
    ctx.authorize_hotel(request.hotel_id)?;
    request.validate(ctx.today())?;

    let hotel_id = request.hotel_id;
    let tables = TenantTables::for_hotel(hotel_id);
    let created_by = ctx.principal().username.clone();

    let receipt = db.write("create booking", |tx| {
        if !Database::hotel_exists(tx, hotel_id)? {
            return Err(Error::not_found(format!("hotel {hotel_id}")));
        }
        let room_columns = require_table(tx, tables.rooms())?;
        let booking_columns = require_table(tx, tables.bookings())?;
        check_mandatory_columns(tables.bookings(), &booking_columns)?;

        let room = Database::get_room(tx, &tables, request.room_id)?.ok_or_else(|| {
            Error::not_found(format!("room {} in hotel {hotel_id}", request.room_id))
        })?;

        let conflicts = find_conflicts(tx, &tables, room.id, &request.stay)?;
        if !conflicts.is_empty() {
            log::info!(
                "room {} in hotel {hotel_id} is taken for {}..{}",
                room.room_number,
                request.stay.checkin_date(),
                request.stay.checkout_date()
            );
            return Err(Error::Conflict {
                details: format!(
                    "room {} is not available from {} to {}",
                    room.room_number,
                    request.stay.checkin_date(),
                    request.stay.checkout_date()
                ),
                conflicts,
            });
        }

        let totals = BookingTotals::compute(room.price, request.stay.nights(), &request.charges)?;

        let guest_id = insert_guest(tx, &request.guest)?;
        let fields = booking_fields(request, guest_id, &totals, &created_by);
        let booking_id = BookingId(insert_present_columns(
            tx,
            tables.bookings(),
            &booking_columns,
            fields,
        )?);

        let reference = booking_reference(hotel_id, booking_id);
        if booking_columns.contains("reference") {
            tx.execute(
                &format!(
                    "UPDATE {} SET reference = ? WHERE id = ?",
                    quote_identifier(tables.bookings())?
                ),
                params![reference, booking_id.0],
            )
            .map_err(in_transaction("store booking reference"))?;
        }

        if room_columns.contains("status") {
            tx.execute(
                &format!(
                    "UPDATE {} SET status = ? WHERE id = ?",
                    quote_identifier(tables.rooms())?
                ),
                params![RoomStatus::Booked.as_str(), room.id],
            )
            .map_err(in_transaction("mark room booked"))?;
        } else {
            log::debug!("{} has no status column; room status not cached", tables.rooms());
        }

        let receipt = BookingReceipt {
            booking_id,
            hotel_id,
            room_id: room.id,
            guest_id,
            reference,
            stay: request.stay,
            status: BookingStatus::Active,
            totals,
        };

        audit::append(
            tx,
            &AuditEntry {
                hotel_id,
                booking_id,
                action: AuditAction::Created,
                old_values: None,
                new_values: Some(serde_json::json!({
                    "booking": &receipt,
                    "guest": &request.guest,
                    "charges": &request.charges,
                    "notes": &request.notes,
                })),
                changed_by: Some(created_by.clone()),
            },
        )?;

        Ok(receipt)
    })?;

    log::info!(
        "booked room {} in hotel {hotel_id} as {}",
        receipt.room_id,
        receipt.reference
    );
    Ok(receipt)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::booking::{Charges, MealAddon};
    use crate::context::Principal;
    use crate::database::create_tenant_tables;
    use crate::database::test_util::create_test_database;
    use crate::NewHotel;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, day).unwrap()
    }

    fn admin() -> RequestContext {
        RequestContext::new(Principal::admin("root")).with_today(d(1))
    }

    fn setup(db: &Database) -> HotelId {
        let conn = db.connection();
        let hotel = Database::insert_hotel(conn, &NewHotel::named("Test Inn")).unwrap();
        create_tenant_tables(conn, hotel).unwrap();
        conn.execute(
            &format!("INSERT INTO rooms_hotel_{hotel} (room_number, price) VALUES ('101', 100000)"),
            [],
        )
        .unwrap();
        hotel
    }

    fn request(hotel: HotelId, checkin: u32, checkout: u32) -> BookingRequest {
        BookingRequest::new(
            hotel,
            RoomId(1),
            GuestInfo::new("Ada Lovelace", "555-0100"),
            StayInterval::new(d(checkin), d(checkout)).unwrap(),
        )
    }

    fn count(db: &Database, sql: &str) -> i64 {
        db.connection().query_row(sql, [], |row| row.get(0)).unwrap()
    }

    #[test]
    fn test_create_booking_computes_totals() {
        let mut db = create_test_database();
        let hotel = setup(&db);
        let charges = Charges {
            breakfast: MealAddon::new(Money::from_major(100), 3),
            discount: Money::from_major(200),
            paid: Money::from_major(2500),
            ..Charges::default()
        };

        let receipt =
            create_booking(&mut db, &admin(), &request(hotel, 10, 13).with_charges(charges))
                .unwrap();

        assert_eq!(receipt.totals.nights, 3);
        assert_eq!(receipt.totals.room_total, Money::from_major(3000));
        assert_eq!(receipt.totals.meal_total, Money::from_major(300));
        assert_eq!(receipt.totals.amount_due, Money::from_major(3100));
        assert_eq!(receipt.totals.due, Money::from_major(600));
        assert_eq!(receipt.reference, format!("BK-{hotel}-{}", receipt.booking_id));

        let status: String = db
            .connection()
            .query_row(
                &format!("SELECT status FROM rooms_hotel_{hotel} WHERE id = 1"),
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(status, "booked");

        let history = audit::list(db.connection(), hotel, Some(receipt.booking_id)).unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].action, AuditAction::Created);
        assert_eq!(history[0].changed_by.as_deref(), Some("root"));
    }

    #[test]
    fn test_second_overlapping_booking_conflicts() {
        let mut db = create_test_database();
        let hotel = setup(&db);
        create_booking(&mut db, &admin(), &request(hotel, 10, 13)).unwrap();

        let err = create_booking(&mut db, &admin(), &request(hotel, 12, 14)).unwrap_err();
        match err {
            Error::Conflict { conflicts, .. } => assert_eq!(conflicts.len(), 1),
            other => panic!("expected conflict, got {other:?}"),
        }
        assert_eq!(count(&db, "SELECT COUNT(*) FROM guests"), 1);
    }

    #[test]
    fn test_past_checkin_rejected_before_any_write() {
        let mut db = create_test_database();
        let hotel = setup(&db);
        let ctx = admin().with_today(d(20));

        let err = create_booking(&mut db, &ctx, &request(hotel, 10, 12)).unwrap_err();
        assert!(matches!(err, Error::Validation { .. }));
        assert_eq!(count(&db, "SELECT COUNT(*) FROM guests"), 0);
    }

    #[test]
    fn test_manager_of_other_hotel_unauthorized() {
        let mut db = create_test_database();
        let hotel = setup(&db);
        let ctx = RequestContext::new(Principal::manager("mira"))
            .with_hotel_scope(Some(HotelId::try_from(hotel.value() + 1).unwrap()))
            .with_today(d(1));

        let err = create_booking(&mut db, &ctx, &request(hotel, 10, 12)).unwrap_err();
        assert!(matches!(err, Error::Unauthorized { .. }));
    }

    #[test]
    fn test_missing_bookings_table_is_schema_inconsistency() {
        let mut db = create_test_database();
        let hotel = setup(&db);
        db.connection()
            .execute(&format!("DROP TABLE bookings_hotel_{hotel}"), [])
            .unwrap();

        let err = create_booking(&mut db, &admin(), &request(hotel, 10, 12)).unwrap_err();
        assert!(matches!(err, Error::SchemaInconsistency { .. }));
        assert_eq!(count(&db, "SELECT COUNT(*) FROM guests"), 0);
    }

    #[test]
    fn test_unknown_room_not_found() {
        let mut db = create_test_database();
        let hotel = setup(&db);
        let mut req = request(hotel, 10, 12);
        req.room_id = RoomId(77);

        let err = create_booking(&mut db, &admin(), &req).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_discount_above_gross_rejected() {
        let mut db = create_test_database();
        let hotel = setup(&db);
        let charges = Charges {
            discount: Money::from_major(5000),
            ..Charges::default()
        };

        let err = create_booking(&mut db, &admin(), &request(hotel, 10, 11).with_charges(charges))
            .unwrap_err();
        assert!(matches!(err, Error::Validation { ref field, .. } if field == "discount"));
        assert_eq!(count(&db, "SELECT COUNT(*) FROM guests"), 0);
    }
}
