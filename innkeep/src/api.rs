//! JSON boundary.
//!
//! Each handler takes a camelCase request body and returns an
//! [`ApiResponse`]; none of them return an error. Failures are reported as
//! `{"success": false, "error": <kind>, "message": ...}`. Required fields
//! are modelled as `Option` so that a missing field is reported as
//! `bad_request` naming the field, instead of a generic parse failure.
//!
//! # Examples
//!
//! ```no_run
//! use innkeep::api::{self, AvailabilityQuery};
//! use innkeep::{Database, DatabaseConfig, Principal, RequestContext};
//!
//! let db = Database::open(DatabaseConfig::new("/tmp/innkeep.db")).unwrap();
//! let ctx = RequestContext::new(Principal::admin("root"));
//! let response = api::from_json(
//!     r#"{"hotelId": 1, "roomId": 4, "checkinDate": "2030-06-01", "checkoutDate": "2030-06-03"}"#,
//!     |query: AvailabilityQuery| api::availability(&db, &ctx, &query),
//! );
//! println!("{}", serde_json::to_string_pretty(&response).unwrap());
//! ```

use chrono::{NaiveDate, NaiveTime};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::audit::AuditRecord;
use crate::booking::{
    parse_time, BookingId, BookingRequest, BookingStatus, BookingSummary, BookingTotals, Charges,
    ConflictingBooking, GuestInfo, MealAddon, StayInterval,
};
use crate::config::Config;
use crate::context::RequestContext;
use crate::database::Database;
use crate::error::{Error, ErrorKind, Result};
use crate::operations::{self, DeletionResult, ProvisionedHotel, TeardownOptions};
use crate::room::{NewRoom, Room, RoomId, RoomUpdate};
use crate::{HotelId, Money, NewHotel};

/// Envelope for every handler result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiResponse<T> {
    /// True if the operation succeeded.
    pub success: bool,
    /// The payload, flattened into the envelope.
    #[serde(flatten)]
    pub data: Option<T>,
    /// Failure classification.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorKind>,
    /// Human-readable outcome.
    pub message: String,
}

impl<T> ApiResponse<T> {
    /// A successful response.
    pub fn ok(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            message: message.into(),
        }
    }

    /// A failed response carrying `err`'s kind and text.
    pub fn failure(err: &Error) -> Self {
        Self::failure_with(err, err.to_string())
    }

    /// A failed response with a custom message.
    pub fn failure_with(err: &Error, message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(err.kind()),
            message: message.into(),
        }
    }

    fn from_result(result: Result<T>, message: impl FnOnce(&T) -> String) -> Self {
        match result {
            Ok(data) => {
                let message = message(&data);
                Self::ok(data, message)
            }
            Err(err) => {
                log::debug!("request failed: {err}");
                Self::failure(&err)
            }
        }
    }
}

/// Parses `body` and passes it to `handler`.
///
/// A body that does not parse yields a `bad_request` response.
pub fn from_json<Req, T>(body: &str, handler: impl FnOnce(Req) -> ApiResponse<T>) -> ApiResponse<T>
where
    Req: DeserializeOwned,
{
    match serde_json::from_str::<Req>(body) {
        Ok(request) => handler(request),
        Err(e) => ApiResponse::failure_with(
            &Error::Serialization(e),
            "request body is not valid JSON for this operation",
        ),
    }
}

fn require<T>(field: &str, value: Option<T>) -> Result<T> {
    value.ok_or_else(|| Error::validation(field, format!("missing required field '{field}'")))
}

fn hotel_id(value: Option<i64>) -> Result<HotelId> {
    Ok(HotelId::try_from(require("hotelId", value)?)?)
}

fn time_field(
    field: &str,
    value: Option<&str>,
    default: Option<NaiveTime>,
) -> Result<Option<NaiveTime>> {
    match value {
        Some(text) => parse_time(text)
            .map(Some)
            .ok_or_else(|| Error::validation(field, format!("invalid time '{text}'"))),
        None => Ok(default),
    }
}

/// Availability query body.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityQuery {
    /// Hotel.
    pub hotel_id: Option<i64>,
    /// Room.
    pub room_id: Option<i64>,
    /// First night.
    pub checkin_date: Option<NaiveDate>,
    /// Departure day.
    pub checkout_date: Option<NaiveDate>,
}

/// Availability payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityBody {
    /// True when nothing blocks the stay.
    pub available: bool,
    /// Blocking bookings.
    pub conflicts: Vec<ConflictingBooking>,
}

/// Checks room availability.
///
/// Conflicts carry guest names, so the principal must be allowed to act on
/// the hotel.
pub fn availability(
    db: &Database,
    ctx: &RequestContext,
    query: &AvailabilityQuery,
) -> ApiResponse<AvailabilityBody> {
    let result = (|| {
        let hotel = hotel_id(query.hotel_id)?;
        ctx.authorize_hotel(hotel)?;
        let room = RoomId(require("roomId", query.room_id)?);
        let checkin = require("checkinDate", query.checkin_date)?;
        let checkout = require("checkoutDate", query.checkout_date)?;
        let report = operations::is_available(db.connection(), hotel, room, checkin, checkout)?;
        Ok(AvailabilityBody {
            available: report.available,
            conflicts: report.conflicts,
        })
    })();

    ApiResponse::from_result(result, |body| {
        if body.available {
            "Room is available".to_string()
        } else {
            format!(
                "Room is not available for the selected dates ({} conflicting booking(s))",
                body.conflicts.len()
            )
        }
    })
}

/// Booking creation body.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingRequest {
    /// Hotel.
    pub hotel_id: Option<i64>,
    /// Room.
    pub room_id: Option<i64>,
    /// Guest name.
    pub guest_name: Option<String>,
    /// Guest phone.
    pub guest_phone: Option<String>,
    /// Guest email.
    pub guest_email: Option<String>,
    /// Guest national id.
    pub guest_nid: Option<String>,
    /// Guest address.
    pub guest_address: Option<String>,
    /// First night.
    pub checkin_date: Option<NaiveDate>,
    /// Departure day.
    pub checkout_date: Option<NaiveDate>,
    /// Arrival time, `HH:MM:SS`.
    pub checkin_time: Option<String>,
    /// Departure time, `HH:MM:SS`.
    pub checkout_time: Option<String>,
    /// Breakfast unit price.
    pub breakfast_price: Option<Money>,
    /// Breakfast servings.
    pub breakfast_quantity: Option<u32>,
    /// Lunch unit price.
    pub lunch_price: Option<Money>,
    /// Lunch servings.
    pub lunch_quantity: Option<u32>,
    /// Dinner unit price.
    pub dinner_price: Option<Money>,
    /// Dinner servings.
    pub dinner_quantity: Option<u32>,
    /// Discount.
    pub discount: Option<Money>,
    /// Amount paid.
    pub paid: Option<Money>,
    /// Notes.
    pub notes: Option<String>,
}

impl CreateBookingRequest {
    fn meal(price: Option<Money>, quantity: Option<u32>) -> MealAddon {
        MealAddon::new(price.unwrap_or_default(), quantity.unwrap_or_default())
    }

    /// Converts the body into a [`BookingRequest`], filling absent times
    /// from `config`.
    ///
    /// # Errors
    ///
    /// Returns a validation error for missing or malformed fields.
    pub fn into_request(self, config: &Config) -> Result<BookingRequest> {
        let hotel = hotel_id(self.hotel_id)?;
        let room = RoomId(require("roomId", self.room_id)?);
        let guest = GuestInfo {
            name: require("guestName", self.guest_name)?,
            phone: require("guestPhone", self.guest_phone)?,
            email: self.guest_email,
            nid: self.guest_nid,
            address: self.guest_address,
        };
        let stay = StayInterval::new(
            require("checkinDate", self.checkin_date)?,
            require("checkoutDate", self.checkout_date)?,
        )?
        .with_checkin_time(time_field(
            "checkinTime",
            self.checkin_time.as_deref(),
            config.checkin_time(),
        )?)
        .with_checkout_time(time_field(
            "checkoutTime",
            self.checkout_time.as_deref(),
            config.checkout_time(),
        )?);
        let charges = Charges {
            breakfast: Self::meal(self.breakfast_price, self.breakfast_quantity),
            lunch: Self::meal(self.lunch_price, self.lunch_quantity),
            dinner: Self::meal(self.dinner_price, self.dinner_quantity),
            discount: self.discount.unwrap_or_default(),
            paid: self.paid.unwrap_or_default(),
        };

        Ok(BookingRequest::new(hotel, room, guest, stay)
            .with_charges(charges)
            .with_notes(self.notes))
    }
}

/// Booking creation payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingCreatedBody {
    /// New booking.
    pub booking_id: BookingId,
    /// Reference code.
    pub reference: String,
    /// Currency of the amounts.
    pub currency: String,
    /// Charges breakdown.
    #[serde(flatten)]
    pub totals: BookingTotals,
}

/// Creates a booking.
pub fn create_booking(
    db: &mut Database,
    ctx: &RequestContext,
    config: &Config,
    body: CreateBookingRequest,
) -> ApiResponse<BookingCreatedBody> {
    let result = body.into_request(config).and_then(|request| {
        let receipt = operations::create_booking(db, ctx, &request)?;
        Ok(BookingCreatedBody {
            booking_id: receipt.booking_id,
            reference: receipt.reference,
            currency: config.currency().to_string(),
            totals: receipt.totals,
        })
    });

    ApiResponse::from_result(result, |body| {
        format!("Booking {} confirmed, {} due", body.reference, body.totals.due)
    })
}

/// Room update body. Only supplied fields change.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRoomRequest {
    /// Hotel.
    pub hotel_id: Option<i64>,
    /// Room.
    pub room_id: Option<i64>,
    /// New nightly price.
    pub price: Option<Money>,
    /// New category.
    pub category: Option<String>,
    /// New description.
    pub description: Option<String>,
}

/// Payload carrying one room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoomBody {
    /// The room.
    pub room: Room,
}

/// Payload carrying a hotel's rooms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoomsBody {
    /// The rooms, by id.
    pub rooms: Vec<Room>,
}

/// Partially updates a room.
pub fn update_room(
    db: &mut Database,
    ctx: &RequestContext,
    body: UpdateRoomRequest,
) -> ApiResponse<RoomBody> {
    let result = (|| {
        let hotel = hotel_id(body.hotel_id)?;
        let room = RoomId(require("roomId", body.room_id)?);
        let update = RoomUpdate {
            price: body.price,
            category: body.category,
            description: body.description,
        };
        let room = operations::update_room(db, ctx, hotel, room, &update)?;
        Ok(RoomBody { room })
    })();

    ApiResponse::from_result(result, |body| {
        format!("Room {} updated", body.room.room_number)
    })
}

/// Room creation body.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddRoomRequest {
    /// Hotel.
    pub hotel_id: Option<i64>,
    /// Room number.
    pub room_number: Option<String>,
    /// Nightly price.
    pub price: Option<Money>,
    /// Category.
    pub category: Option<String>,
    /// Description.
    pub description: Option<String>,
}

/// Adds a room to a hotel.
pub fn add_room(
    db: &mut Database,
    ctx: &RequestContext,
    body: AddRoomRequest,
) -> ApiResponse<RoomBody> {
    let result = (|| {
        let hotel = hotel_id(body.hotel_id)?;
        let room = NewRoom {
            room_number: require("roomNumber", body.room_number)?,
            category: body.category,
            price: require("price", body.price)?,
            description: body.description,
        };
        let room = operations::add_room(db, ctx, hotel, &room)?;
        Ok(RoomBody { room })
    })();

    ApiResponse::from_result(result, |body| {
        format!("Room {} added", body.room.room_number)
    })
}

/// Body naming one hotel.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HotelRequest {
    /// Hotel.
    pub hotel_id: Option<i64>,
}

/// Lists a hotel's rooms.
pub fn list_rooms(
    db: &Database,
    ctx: &RequestContext,
    body: &HotelRequest,
) -> ApiResponse<RoomsBody> {
    let result = hotel_id(body.hotel_id)
        .and_then(|hotel| operations::list_rooms(db, ctx, hotel))
        .map(|rooms| RoomsBody { rooms });
    ApiResponse::from_result(result, |body| format!("{} room(s)", body.rooms.len()))
}

/// Hotel deletion body.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteHotelRequest {
    /// Hotel.
    pub hotel_id: Option<i64>,
    /// Only describe the plan.
    #[serde(default)]
    pub dry_run: bool,
}

/// Deletes a hotel and its whole footprint.
///
/// The message distinguishes a missing hotel, a completed deletion with its
/// dependent row count, and a failure that was rolled back.
pub fn delete_hotel(
    db: &mut Database,
    ctx: &RequestContext,
    body: &DeleteHotelRequest,
) -> ApiResponse<DeletionResult> {
    let hotel = match hotel_id(body.hotel_id) {
        Ok(hotel) => hotel,
        Err(err) => return ApiResponse::failure(&err),
    };

    match operations::teardown(db, ctx, TeardownOptions::new(hotel).with_dry_run(body.dry_run)) {
        Ok(result) => {
            let message = if result.dry_run {
                result.message()
            } else {
                format!(
                    "Hotel '{}' deleted with {} dependent rows removed",
                    result.hotel_name, result.dependent_rows
                )
            };
            ApiResponse::ok(result, message)
        }
        Err(err @ Error::NotFound { .. }) => {
            ApiResponse::failure_with(&err, format!("Hotel {hotel} not found"))
        }
        Err(err @ (Error::Unauthorized { .. } | Error::LockTimeout { .. })) => {
            ApiResponse::failure(&err)
        }
        Err(err) => ApiResponse::failure_with(
            &err,
            format!("Hotel deletion failed, all changes rolled back: {err}"),
        ),
    }
}

/// Status transition body.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransitionRequest {
    /// Hotel.
    pub hotel_id: Option<i64>,
    /// Booking.
    pub booking_id: Option<i64>,
    /// Target status (`checked_in`, `checked_out`, `cancelled`).
    pub status: Option<String>,
}

/// Payload carrying one booking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BookingBody {
    /// The booking.
    pub booking: BookingSummary,
}

/// Moves a booking to a new status.
pub fn transition(
    db: &mut Database,
    ctx: &RequestContext,
    body: &TransitionRequest,
) -> ApiResponse<BookingBody> {
    let result = (|| {
        let hotel = hotel_id(body.hotel_id)?;
        let booking = BookingId(require("bookingId", body.booking_id)?);
        let status: BookingStatus = require("status", body.status.as_deref())?.parse()?;
        let booking = operations::transition_booking(db, ctx, hotel, booking, status)?;
        Ok(BookingBody { booking })
    })();

    ApiResponse::from_result(result, |body| {
        format!("Booking {} is now {}", body.booking.id, body.booking.status)
    })
}

/// History query body.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryRequest {
    /// Hotel.
    pub hotel_id: Option<i64>,
    /// Restrict to one booking.
    pub booking_id: Option<i64>,
}

/// History payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryBody {
    /// Records, oldest first.
    pub records: Vec<AuditRecord>,
}

/// Lists booking history for a hotel.
pub fn history(
    db: &Database,
    ctx: &RequestContext,
    body: &HistoryRequest,
) -> ApiResponse<HistoryBody> {
    let result = hotel_id(body.hotel_id)
        .and_then(|hotel| {
            operations::booking_history(db, ctx, hotel, body.booking_id.map(BookingId))
        })
        .map(|records| HistoryBody { records });
    ApiResponse::from_result(result, |body| format!("{} record(s)", body.records.len()))
}

/// Hotel creation body.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateHotelRequest {
    /// Name.
    pub name: Option<String>,
    /// Address.
    pub address: Option<String>,
    /// Phone.
    pub phone: Option<String>,
    /// Email.
    pub email: Option<String>,
    /// Owning user.
    pub owner_id: Option<i64>,
}

/// Provisions a hotel and its tables.
pub fn create_hotel(
    db: &mut Database,
    ctx: &RequestContext,
    body: CreateHotelRequest,
) -> ApiResponse<ProvisionedHotel> {
    let result = require("name", body.name).and_then(|name| {
        let hotel = NewHotel {
            name,
            address: body.address,
            phone: body.phone,
            email: body.email,
            owner_id: body.owner_id,
        };
        operations::create_hotel(db, ctx, &hotel)
    });
    ApiResponse::from_result(result, |p| {
        format!("Hotel '{}' created with id {}", p.hotel.name, p.hotel.id)
    })
}
