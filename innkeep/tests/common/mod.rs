//! Common test utilities for integration tests.
//!
//! This module provides helper functions and fixture builders for testing
//! the innkeep library.

pub mod database;

use chrono::{NaiveDate, NaiveTime};

use innkeep::{
    BookingRequest, Charges, GuestInfo, HotelId, Principal, RequestContext, RoomId, StayInterval,
};

/// A date in June 2024, the month every scenario here is set in.
#[allow(dead_code)]
pub fn june(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, day).unwrap()
}

/// A wall-clock time on the hour.
#[allow(dead_code)]
pub fn at(hour: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, 0, 0).unwrap()
}

/// The "today" every context here runs on.
#[allow(dead_code)]
pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()
}

/// An administrator context whose "today" is 1 May 2024, so June stays
/// are in the future.
#[allow(dead_code)]
pub fn admin() -> RequestContext {
    RequestContext::new(Principal::admin("root")).with_today(today())
}

/// A manager context scoped to `hotel`.
#[allow(dead_code)]
pub fn manager_of(hotel: HotelId) -> RequestContext {
    RequestContext::new(Principal::manager("mira"))
        .with_hotel_scope(Some(hotel))
        .with_today(today())
}

/// Builder for booking requests with sensible defaults.
///
/// Defaults:
/// - guest: "Ada Guest", phone "555-0100"
/// - stay: 1 June to 3 June 2024, no times
/// - charges: none
#[allow(dead_code)]
pub struct BookingFixture {
    hotel: HotelId,
    room: RoomId,
    guest: GuestInfo,
    checkin: NaiveDate,
    checkout: NaiveDate,
    checkout_time: Option<NaiveTime>,
    charges: Charges,
}

#[allow(dead_code)]
impl BookingFixture {
    /// Creates a fixture for `room` in `hotel`.
    pub fn new(hotel: HotelId, room: RoomId) -> Self {
        Self {
            hotel,
            room,
            guest: GuestInfo::new("Ada Guest", "555-0100"),
            checkin: june(1),
            checkout: june(3),
            checkout_time: None,
            charges: Charges::default(),
        }
    }

    /// Sets the stay dates.
    pub fn stay(mut self, checkin: NaiveDate, checkout: NaiveDate) -> Self {
        self.checkin = checkin;
        self.checkout = checkout;
        self
    }

    /// Sets the check-out time.
    pub fn checkout_at(mut self, time: NaiveTime) -> Self {
        self.checkout_time = Some(time);
        self
    }

    /// Sets the guest name.
    pub fn guest(mut self, name: &str) -> Self {
        self.guest.name = name.to_string();
        self
    }

    /// Sets the charges.
    pub fn charges(mut self, charges: Charges) -> Self {
        self.charges = charges;
        self
    }

    /// Builds the request.
    ///
    /// # Panics
    ///
    /// Panics if the stay dates are not ordered. This is acceptable in
    /// test code where we want to fail fast on invalid fixtures.
    pub fn build(self) -> BookingRequest {
        let stay = StayInterval::new(self.checkin, self.checkout)
            .expect("fixture should have an ordered stay")
            .with_checkout_time(self.checkout_time);
        BookingRequest::new(self.hotel, self.room, self.guest, stay).with_charges(self.charges)
    }
}
