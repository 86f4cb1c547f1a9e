//! Room inventory: add, list, and partially update rooms in a hotel's
//! dynamic rooms table.

use rusqlite::types::Value;
use rusqlite::params_from_iter;

use crate::context::RequestContext;
use crate::database::{quote_identifier, require_table, Database, TenantTables};
use crate::error::{in_transaction, Error, Result};
use crate::room::{NewRoom, Room, RoomId, RoomUpdate};
use crate::HotelId;

fn require_hotel(conn: &rusqlite::Connection, hotel_id: HotelId) -> Result<()> {
    if Database::hotel_exists(conn, hotel_id)? {
        Ok(())
    } else {
        Err(Error::not_found(format!("hotel {hotel_id}")))
    }
}

/// Adds a room to a hotel.
///
/// # Errors
///
/// - [`Error::Unauthorized`] if the principal may not act on the hotel
/// - [`Error::Validation`] for a blank room number or negative price
/// - [`Error::NotFound`] if the hotel does not exist
/// - [`Error::SchemaInconsistency`] if the rooms table is missing
/// - [`Error::TransactionFailure`] if the insert is rejected, e.g. for a
///   duplicate room number
pub fn add_room(
    db: &mut Database,
    ctx: &RequestContext,
    hotel_id: HotelId,
    room: &NewRoom,
) -> Result<Room> {
    ctx.authorize_hotel(hotel_id)?;
    room.validate()?;
    let tables = TenantTables::for_hotel(hotel_id);

    db.write("add room", |tx| {
        require_hotel(tx, hotel_id)?;
        let columns = require_table(tx, tables.rooms())?;

        let mut names = vec!["room_number"];
        let mut values = vec![Value::Text(room.room_number.trim().to_string())];
        for (name, value) in [
            ("price", Some(Value::Integer(room.price.minor()))),
            ("category", room.category.clone().map(Value::Text)),
            ("description", room.description.clone().map(Value::Text)),
        ] {
            match value {
                Some(value) if columns.contains(name) => {
                    names.push(name);
                    values.push(value);
                }
                Some(_) => {
                    return Err(Error::SchemaInconsistency {
                        table: tables.rooms().to_string(),
                        details: format!("column '{name}' does not exist"),
                    });
                }
                None => {}
            }
        }

        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            quote_identifier(tables.rooms())?,
            names
                .iter()
                .map(|n| quote_identifier(n))
                .collect::<Result<Vec<_>>>()?
                .join(", "),
            vec!["?"; names.len()].join(", ")
        );
        tx.execute(&sql, params_from_iter(values))
            .map_err(in_transaction("insert room"))?;
        let id = RoomId(tx.last_insert_rowid());

        Database::get_room(tx, &tables, id)?
            .ok_or_else(|| Error::not_found(format!("room {id} in hotel {hotel_id}")))
    })
}

/// Lists a hotel's rooms.
///
/// # Errors
///
/// - [`Error::Unauthorized`] if the principal may not act on the hotel
/// - [`Error::NotFound`] if the hotel does not exist
pub fn list_rooms(db: &Database, ctx: &RequestContext, hotel_id: HotelId) -> Result<Vec<Room>> {
    ctx.authorize_hotel(hotel_id)?;
    require_hotel(db.connection(), hotel_id)?;
    Database::list_rooms(db.connection(), &TenantTables::for_hotel(hotel_id))
}

/// Applies a partial update to a room. Only supplied fields change.
///
/// # Errors
///
/// - [`Error::Unauthorized`] if the principal may not act on the hotel
/// - [`Error::Validation`] for an empty update or a negative price
/// - [`Error::NotFound`] if the hotel or room does not exist
/// - [`Error::SchemaInconsistency`] if the rooms table, or the column of a
///   supplied field, is missing
pub fn update_room(
    db: &mut Database,
    ctx: &RequestContext,
    hotel_id: HotelId,
    room_id: RoomId,
    update: &RoomUpdate,
) -> Result<Room> {
    ctx.authorize_hotel(hotel_id)?;
    update.validate()?;
    let tables = TenantTables::for_hotel(hotel_id);

    let room = db.write("update room", |tx| {
        require_hotel(tx, hotel_id)?;
        let columns = require_table(tx, tables.rooms())?;

        let supplied = [
            ("price", update.price.map(|p| Value::Integer(p.minor()))),
            ("category", update.category.clone().map(Value::Text)),
            ("description", update.description.clone().map(Value::Text)),
        ];

        let mut assignments = Vec::new();
        let mut values = Vec::new();
        for (name, value) in supplied {
            let Some(value) = value else { continue };
            if !columns.contains(name) {
                return Err(Error::SchemaInconsistency {
                    table: tables.rooms().to_string(),
                    details: format!("column '{name}' does not exist"),
                });
            }
            assignments.push(format!("{} = ?", quote_identifier(name)?));
            values.push(value);
        }
        values.push(Value::Integer(room_id.0));

        let sql = format!(
            "UPDATE {} SET {} WHERE id = ?",
            quote_identifier(tables.rooms())?,
            assignments.join(", ")
        );
        let changed = tx
            .execute(&sql, params_from_iter(values))
            .map_err(in_transaction("update room"))?;
        if changed == 0 {
            return Err(Error::not_found(format!("room {room_id} in hotel {hotel_id}")));
        }

        Database::get_room(tx, &tables, room_id)?
            .ok_or_else(|| Error::not_found(format!("room {room_id} in hotel {hotel_id}")))
    })?;

    log::info!("updated room {} in hotel {hotel_id}", room.room_number);
    Ok(room)
}
