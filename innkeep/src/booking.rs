//! Booking types: stay intervals, guest snapshots, charges, and statuses.
//!
//! The conflict rule between an existing stay and a requested one lives
//! here as a pure function so the availability engine applies exactly the
//! same rule inside and outside transactions.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::room::RoomId;
use crate::{HotelId, Money};

/// Checkouts strictly after this time block a same-day check-in.
pub const LATE_CHECKOUT_CUTOFF: NaiveTime = match NaiveTime::from_hms_opt(11, 0, 0) {
    Some(t) => t,
    None => panic!("invalid cutoff"),
};

/// Storage format for times (`HH:MM:SS`, 24-hour).
pub const TIME_FORMAT: &str = "%H:%M:%S";

/// Storage format for dates.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Identifier of a booking row within its hotel's bookings table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookingId(pub i64);

impl fmt::Display for BookingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Booking lifecycle status.
///
/// `Active` and `CheckedIn` bookings hold their room; the other two do not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    /// Confirmed, guest not yet arrived.
    Active,
    /// Guest in the room.
    CheckedIn,
    /// Guest left.
    CheckedOut,
    /// Booking withdrawn.
    Cancelled,
}

impl BookingStatus {
    /// Statuses that reserve the room for the booking's interval.
    pub const HOLDING: [Self; 2] = [Self::Active, Self::CheckedIn];

    /// The stored representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::CheckedIn => "checked_in",
            Self::CheckedOut => "checked_out",
            Self::Cancelled => "cancelled",
        }
    }

    /// Returns true if a booking in this status holds its room.
    #[must_use]
    pub const fn holds_room(self) -> bool {
        matches!(self, Self::Active | Self::CheckedIn)
    }

    /// Returns true if `next` is a permitted successor of this status.
    ///
    /// # Examples
    ///
    /// ```
    /// use innkeep::BookingStatus;
    ///
    /// assert!(BookingStatus::Active.can_transition_to(BookingStatus::CheckedIn));
    /// assert!(BookingStatus::CheckedIn.can_transition_to(BookingStatus::Cancelled));
    /// assert!(!BookingStatus::CheckedOut.can_transition_to(BookingStatus::Active));
    /// ```
    #[must_use]
    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Active, Self::CheckedIn)
                | (Self::CheckedIn, Self::CheckedOut)
                | (Self::Active | Self::CheckedIn, Self::Cancelled)
        )
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookingStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(Self::Active),
            "checked_in" => Ok(Self::CheckedIn),
            "checked_out" => Ok(Self::CheckedOut),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(ValidationError {
                field: "status".into(),
                message: format!("unknown booking status '{other}'"),
            }),
        }
    }
}

/// A stay: check-in and check-out dates with their times of day.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use innkeep::StayInterval;
///
/// let d = |day| NaiveDate::from_ymd_opt(2024, 6, day).unwrap();
/// let stay = StayInterval::new(d(1), d(3)).unwrap();
/// assert_eq!(stay.nights(), 2);
///
/// // Same-day stays are rejected.
/// assert!(StayInterval::new(d(3), d(3)).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StayInterval {
    checkin_date: NaiveDate,
    checkout_date: NaiveDate,
    checkin_time: Option<NaiveTime>,
    checkout_time: Option<NaiveTime>,
}

impl StayInterval {
    /// Creates a stay between two dates without explicit times.
    ///
    /// # Errors
    ///
    /// Returns an error unless `checkout_date` is after `checkin_date`.
    pub fn new(checkin_date: NaiveDate, checkout_date: NaiveDate) -> Result<Self, ValidationError> {
        if checkout_date <= checkin_date {
            return Err(ValidationError {
                field: "checkout_date".into(),
                message: format!(
                    "checkout date {checkout_date} must be after checkin date {checkin_date}"
                ),
            });
        }
        Ok(Self {
            checkin_date,
            checkout_date,
            checkin_time: None,
            checkout_time: None,
        })
    }

    /// Builds a stay from stored values without re-validating the order.
    ///
    /// Stored rows may predate validation; the conflict rule still applies
    /// to them as written.
    #[must_use]
    pub const fn from_stored(
        checkin_date: NaiveDate,
        checkout_date: NaiveDate,
        checkout_time: Option<NaiveTime>,
    ) -> Self {
        Self {
            checkin_date,
            checkout_date,
            checkin_time: None,
            checkout_time,
        }
    }

    /// Sets the check-in time.
    #[must_use]
    pub const fn with_checkin_time(mut self, time: Option<NaiveTime>) -> Self {
        self.checkin_time = time;
        self
    }

    /// Sets the check-out time.
    #[must_use]
    pub const fn with_checkout_time(mut self, time: Option<NaiveTime>) -> Self {
        self.checkout_time = time;
        self
    }

    /// Check-in date.
    #[must_use]
    pub const fn checkin_date(&self) -> NaiveDate {
        self.checkin_date
    }

    /// Check-out date.
    #[must_use]
    pub const fn checkout_date(&self) -> NaiveDate {
        self.checkout_date
    }

    /// Check-in time, if recorded.
    #[must_use]
    pub const fn checkin_time(&self) -> Option<NaiveTime> {
        self.checkin_time
    }

    /// Check-out time, if recorded.
    #[must_use]
    pub const fn checkout_time(&self) -> Option<NaiveTime> {
        self.checkout_time
    }

    /// Whole nights between the two dates.
    #[must_use]
    pub fn nights(&self) -> i64 {
        (self.checkout_date - self.checkin_date).num_days()
    }

    /// Returns true if this stay checks out after the cutoff.
    ///
    /// A stay without a recorded checkout time is treated as on time.
    #[must_use]
    pub fn is_late_checkout(&self) -> bool {
        self.checkout_time.is_some_and(|t| t > LATE_CHECKOUT_CUTOFF)
    }

    /// Standard half-open interval overlap on calendar dates.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.checkin_date < other.checkout_date && self.checkout_date > other.checkin_date
    }

    /// Returns true if this existing stay blocks the `requested` one.
    ///
    /// A requested stay is blocked when the date ranges overlap, or when
    /// this stay checks out late on the date the requested stay starts or
    /// ends.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::{NaiveDate, NaiveTime};
    /// use innkeep::StayInterval;
    ///
    /// let d = |day| NaiveDate::from_ymd_opt(2024, 6, day).unwrap();
    /// let t = |h| NaiveTime::from_hms_opt(h, 0, 0);
    /// let requested = StayInterval::new(d(3), d(5)).unwrap();
    ///
    /// let on_time = StayInterval::new(d(1), d(3)).unwrap().with_checkout_time(t(10));
    /// assert!(!on_time.conflicts_with(&requested));
    ///
    /// let late = StayInterval::new(d(1), d(3)).unwrap().with_checkout_time(t(12));
    /// assert!(late.conflicts_with(&requested));
    /// ```
    #[must_use]
    pub fn conflicts_with(&self, requested: &Self) -> bool {
        if self.overlaps(requested) {
            return true;
        }
        if !self.is_late_checkout() {
            return false;
        }
        requested.checkin_date == self.checkout_date
            || requested.checkout_date == self.checkout_date
    }
}

/// An active booking that blocks a requested stay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConflictingBooking {
    /// The blocking booking.
    pub booking_id: BookingId,
    /// Guest name on the booking, when the table records it.
    pub guest_name: Option<String>,
    /// Check-in date of the blocking booking.
    pub checkin_date: NaiveDate,
    /// Check-out date of the blocking booking.
    pub checkout_date: NaiveDate,
    /// Check-out time of the blocking booking, when recorded.
    pub checkout_time: Option<NaiveTime>,
}

/// Guest details captured at booking time.
///
/// These are copied onto the booking row so the booking stays readable
/// even if the guest record changes later.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuestInfo {
    /// Full name (required).
    pub name: String,
    /// Contact phone (required).
    pub phone: String,
    /// Contact email.
    #[serde(default)]
    pub email: Option<String>,
    /// National identity number.
    #[serde(default)]
    pub nid: Option<String>,
    /// Postal address.
    #[serde(default)]
    pub address: Option<String>,
}

impl GuestInfo {
    /// Creates guest details with the required fields.
    #[must_use]
    pub fn new(name: impl Into<String>, phone: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            phone: phone.into(),
            ..Self::default()
        }
    }

    /// Checks required fields.
    ///
    /// # Errors
    ///
    /// Returns an error if name or phone is blank.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError {
                field: "guest_name".into(),
                message: "guest name is required".into(),
            });
        }
        if self.phone.trim().is_empty() {
            return Err(ValidationError {
                field: "guest_phone".into(),
                message: "guest phone is required".into(),
            });
        }
        Ok(())
    }
}

/// One meal add-on: unit price and quantity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MealAddon {
    /// Unit price.
    #[serde(default)]
    pub price: Money,
    /// Number of servings.
    #[serde(default)]
    pub quantity: u32,
}

impl MealAddon {
    /// Creates a meal add-on.
    #[must_use]
    pub const fn new(price: Money, quantity: u32) -> Self {
        Self { price, quantity }
    }

    /// Price times quantity, or `None` on overflow.
    #[must_use]
    pub fn subtotal(&self) -> Option<Money> {
        self.price.checked_mul(i64::from(self.quantity))
    }
}

/// Requested extras and payments for a booking.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Charges {
    /// Breakfast add-on.
    #[serde(default)]
    pub breakfast: MealAddon,
    /// Lunch add-on.
    #[serde(default)]
    pub lunch: MealAddon,
    /// Dinner add-on.
    #[serde(default)]
    pub dinner: MealAddon,
    /// Discount off the gross amount.
    #[serde(default)]
    pub discount: Money,
    /// Amount paid up front.
    #[serde(default)]
    pub paid: Money,
}

impl Charges {
    fn validate(&self) -> Result<(), ValidationError> {
        let amounts = [
            ("breakfast_price", self.breakfast.price),
            ("lunch_price", self.lunch.price),
            ("dinner_price", self.dinner.price),
            ("discount", self.discount),
            ("paid", self.paid),
        ];
        for (field, amount) in amounts {
            if amount.is_negative() {
                return Err(ValidationError {
                    field: field.into(),
                    message: "amount must not be negative".into(),
                });
            }
        }
        Ok(())
    }
}

/// Computed financial breakdown of a booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingTotals {
    /// Nights stayed.
    pub nights: i64,
    /// Nightly price at booking time.
    pub room_price: Money,
    /// `room_price × nights`.
    pub room_total: Money,
    /// Breakfast subtotal.
    pub breakfast_total: Money,
    /// Lunch subtotal.
    pub lunch_total: Money,
    /// Dinner subtotal.
    pub dinner_total: Money,
    /// Sum of meal subtotals.
    pub meal_total: Money,
    /// Discount applied.
    pub discount: Money,
    /// `room_total + meal_total − discount`.
    pub amount_due: Money,
    /// Amount paid.
    pub paid: Money,
    /// `max(0, amount_due − paid)`.
    pub due: Money,
}

impl BookingTotals {
    /// Computes the breakdown for a stay.
    ///
    /// # Errors
    ///
    /// Returns an error if the discount exceeds the gross amount, or if any
    /// amount overflows.
    ///
    /// # Examples
    ///
    /// ```
    /// use innkeep::{BookingTotals, Charges, MealAddon, Money};
    ///
    /// let charges = Charges {
    ///     breakfast: MealAddon::new(Money::from_major(100), 3),
    ///     discount: Money::from_major(200),
    ///     paid: Money::from_major(2500),
    ///     ..Charges::default()
    /// };
    /// let totals = BookingTotals::compute(Money::from_major(1000), 3, &charges).unwrap();
    /// assert_eq!(totals.room_total, Money::from_major(3000));
    /// assert_eq!(totals.amount_due, Money::from_major(3100));
    /// assert_eq!(totals.due, Money::from_major(600));
    /// ```
    pub fn compute(
        room_price: Money,
        nights: i64,
        charges: &Charges,
    ) -> Result<Self, ValidationError> {
        let room_total = room_price.checked_mul(nights).ok_or_else(overflow)?;
        let breakfast_total = charges.breakfast.subtotal().ok_or_else(overflow)?;
        let lunch_total = charges.lunch.subtotal().ok_or_else(overflow)?;
        let dinner_total = charges.dinner.subtotal().ok_or_else(overflow)?;
        let meal_total = breakfast_total
            .checked_add(lunch_total)
            .and_then(|sum| sum.checked_add(dinner_total))
            .ok_or_else(overflow)?;
        let gross = room_total.checked_add(meal_total).ok_or_else(overflow)?;
        if charges.discount > gross {
            return Err(ValidationError {
                field: "discount".into(),
                message: format!("discount {} exceeds gross amount {gross}", charges.discount),
            });
        }
        let amount_due = gross.checked_sub(charges.discount).ok_or_else(overflow)?;
        let due = amount_due.checked_sub(charges.paid).ok_or_else(overflow)?;
        Ok(Self {
            nights,
            room_price,
            room_total,
            breakfast_total,
            lunch_total,
            dinner_total,
            meal_total,
            discount: charges.discount,
            amount_due,
            paid: charges.paid,
            due: due.at_least_zero(),
        })
    }
}

fn overflow() -> ValidationError {
    ValidationError {
        field: "amount".into(),
        message: "booking amounts exceed the supported range".into(),
    }
}

/// A request to book a room.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use innkeep::{BookingRequest, GuestInfo, HotelId, RoomId, StayInterval};
///
/// let d = |day| NaiveDate::from_ymd_opt(2030, 6, day).unwrap();
/// let request = BookingRequest::new(
///     HotelId::try_from(1).unwrap(),
///     RoomId(4),
///     GuestInfo::new("Ada Lovelace", "+44 20 0000"),
///     StayInterval::new(d(1), d(3)).unwrap(),
/// );
/// assert!(request.validate(d(1)).is_ok());
/// assert!(request.validate(d(2)).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingRequest {
    /// Target hotel.
    pub hotel_id: HotelId,
    /// Target room.
    pub room_id: RoomId,
    /// Guest details.
    pub guest: GuestInfo,
    /// Requested stay.
    pub stay: StayInterval,
    /// Extras and payments.
    pub charges: Charges,
    /// Free-form notes.
    pub notes: Option<String>,
}

impl BookingRequest {
    /// Creates a request with no extras.
    #[must_use]
    pub fn new(hotel_id: HotelId, room_id: RoomId, guest: GuestInfo, stay: StayInterval) -> Self {
        Self {
            hotel_id,
            room_id,
            guest,
            stay,
            charges: Charges::default(),
            notes: None,
        }
    }

    /// Sets the charges.
    #[must_use]
    pub const fn with_charges(mut self, charges: Charges) -> Self {
        self.charges = charges;
        self
    }

    /// Sets the notes.
    #[must_use]
    pub fn with_notes(mut self, notes: Option<String>) -> Self {
        self.notes = notes;
        self
    }

    /// Checks the preconditions that do not need the database.
    ///
    /// # Errors
    ///
    /// Returns an error if guest fields are missing, the stay starts before
    /// `today`, or any amount is negative.
    pub fn validate(&self, today: NaiveDate) -> Result<(), ValidationError> {
        self.guest.validate()?;
        if self.stay.checkin_date < today {
            return Err(ValidationError {
                field: "checkin_date".into(),
                message: format!(
                    "checkin date {} is before today ({today})",
                    self.stay.checkin_date
                ),
            });
        }
        if self.stay.checkout_date <= self.stay.checkin_date {
            return Err(ValidationError {
                field: "checkout_date".into(),
                message: "checkout date must be after checkin date".into(),
            });
        }
        self.charges.validate()
    }
}

/// A booking as read back from a hotel's bookings table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingSummary {
    /// Row identifier.
    pub id: BookingId,
    /// Booked room.
    pub room_id: RoomId,
    /// Guest name, when the table records it.
    pub guest_name: Option<String>,
    /// The stay.
    pub stay: StayInterval,
    /// Current status.
    pub status: BookingStatus,
}

/// Validation error for booking inputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// The field that failed validation.
    pub field: String,
    /// A description of the validation failure.
    pub message: String,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "validation error for '{}': {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

/// Parses a stored `HH:MM:SS` time, accepting `HH:MM` as well.
#[must_use]
pub fn parse_time(value: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(value, TIME_FORMAT)
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M"))
        .ok()
}
