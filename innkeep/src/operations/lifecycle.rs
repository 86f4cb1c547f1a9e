//! Booking status transitions and history queries.

use rusqlite::params;
use serde_json::json;

use crate::audit::{self, AuditAction, AuditEntry, AuditRecord};
use crate::booking::{BookingId, BookingStatus, BookingSummary};
use crate::context::RequestContext;
use crate::database::{quote_identifier, require_table, Database, TenantTables};
use crate::error::{in_transaction, Error, Result};
use crate::room::RoomStatus;
use crate::HotelId;

/// Moves a booking to `next`.
///
/// Permitted moves are `active → checked_in → checked_out` and
/// `active | checked_in → cancelled`. When the booking stops holding its
/// room and no other booking holds it, the room's cached status goes back
/// to `available`. Every transition appends an `updated` history record.
///
/// # Errors
///
/// - [`Error::Unauthorized`] if the principal may not act on the hotel
/// - [`Error::NotFound`] if the hotel or booking does not exist
/// - [`Error::Validation`] if the move is not permitted
/// - [`Error::SchemaInconsistency`] if the bookings table or its `status`
///   column is missing
pub fn transition_booking(
    db: &mut Database,
    ctx: &RequestContext,
    hotel_id: HotelId,
    booking_id: BookingId,
    next: BookingStatus,
) -> Result<BookingSummary> {
    ctx.authorize_hotel(hotel_id)?;
    let tables = TenantTables::for_hotel(hotel_id);
    let changed_by = ctx.principal().username.clone();

    let summary = db.write("transition booking", |tx| {
        if !Database::hotel_exists(tx, hotel_id)? {
            return Err(Error::not_found(format!("hotel {hotel_id}")));
        }
        let columns = require_table(tx, tables.bookings())?;
        if !columns.contains("status") {
            return Err(Error::SchemaInconsistency {
                table: tables.bookings().to_string(),
                details: "missing required column(s): status".into(),
            });
        }

        let current = Database::get_booking(tx, &tables, booking_id)?.ok_or_else(|| {
            Error::not_found(format!("booking {booking_id} in hotel {hotel_id}"))
        })?;
        if !current.status.can_transition_to(next) {
            return Err(Error::validation(
                "status",
                format!("cannot move booking from {} to {next}", current.status),
            ));
        }

        let bookings = quote_identifier(tables.bookings())?;
        let sql = if columns.contains("updated_at") {
            format!("UPDATE {bookings} SET status = ?, updated_at = datetime('now') WHERE id = ?")
        } else {
            format!("UPDATE {bookings} SET status = ? WHERE id = ?")
        };
        tx.execute(&sql, params![next.as_str(), booking_id.0])
            .map_err(in_transaction("update booking status"))?;

        if !next.holds_room() {
            let still_held = !Database::holding_bookings(tx, &tables, current.room_id)?.is_empty();
            let room_columns = crate::database::table_columns(tx, tables.rooms())?;
            if !still_held && room_columns.contains("status") {
                tx.execute(
                    &format!(
                        "UPDATE {} SET status = ? WHERE id = ? AND status = ?",
                        quote_identifier(tables.rooms())?
                    ),
                    params![
                        RoomStatus::Available.as_str(),
                        current.room_id,
                        RoomStatus::Booked.as_str()
                    ],
                )
                .map_err(in_transaction("release room"))?;
            }
        }

        audit::append(
            tx,
            &AuditEntry {
                hotel_id,
                booking_id,
                action: AuditAction::Updated,
                old_values: Some(json!({ "status": current.status })),
                new_values: Some(json!({ "status": next })),
                changed_by: Some(changed_by.clone()),
            },
        )?;

        Ok(BookingSummary {
            status: next,
            ..current
        })
    })?;

    log::info!("booking {booking_id} in hotel {hotel_id} is now {next}");
    Ok(summary)
}

/// Lists the history of a hotel's bookings, oldest first.
///
/// Records remain readable after the hotel is deleted.
///
/// # Errors
///
/// Returns [`Error::Unauthorized`] if the principal may not act on the
/// hotel, or an error if the query fails.
pub fn booking_history(
    db: &Database,
    ctx: &RequestContext,
    hotel_id: HotelId,
    booking_id: Option<BookingId>,
) -> Result<Vec<AuditRecord>> {
    ctx.authorize_hotel(hotel_id)?;
    audit::list(db.connection(), hotel_id, booking_id)
}
