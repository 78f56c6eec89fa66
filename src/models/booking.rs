use anyhow::{anyhow, Result};
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

wire_enum! {
    BookingStatus {
        Pending => "PENDING",
        Confirmed => "CONFIRMED",
        Cancelled => "CANCELLED",
        Completed => "COMPLETED",
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingUser {
    pub id: i64,
    pub full_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingPayment {
    pub id: i64,
    pub status: String,
    pub payment_type: String,
    pub amount: f64,
    #[serde(default)]
    pub deposit_amount: f64,
    #[serde(default)]
    pub remaining_amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: i64,
    pub court_id: i64,
    pub court_name: String,
    #[serde(default)]
    pub court_address: String,
    pub court_number: u32,
    pub booking_date: String,
    pub start_time: String,
    pub end_time: String,
    pub total_price: f64,
    pub status: BookingStatus,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub user: Option<BookingUser>,
    #[serde(default)]
    pub payment: Option<BookingPayment>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingRequest {
    pub court_id: i64,
    pub court_number: u32,
    pub booking_date: String,
    pub start_time: String,
    pub end_time: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl BookingRequest {
    /// Build a request from user input. Date must be YYYY-MM-DD, times
    /// HH:MM, and the slot must end after it starts.
    pub fn parse(
        court_id: i64,
        court_number: u32,
        date: &str,
        start: &str,
        end: &str,
        notes: Option<String>,
    ) -> Result<Self> {
        let date = NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .map_err(|_| anyhow!("Invalid date '{}', expected YYYY-MM-DD", date))?;
        let start_time = NaiveTime::parse_from_str(start, "%H:%M")
            .map_err(|_| anyhow!("Invalid start time '{}', expected HH:MM", start))?;
        let end_time = NaiveTime::parse_from_str(end, "%H:%M")
            .map_err(|_| anyhow!("Invalid end time '{}', expected HH:MM", end))?;
        if end_time <= start_time {
            return Err(anyhow!("End time must be after start time"));
        }

        Ok(Self {
            court_id,
            court_number,
            booking_date: date.format("%Y-%m-%d").to_string(),
            start_time: start_time.format("%H:%M").to_string(),
            end_time: end_time.format("%H:%M").to_string(),
            notes: notes.filter(|n| !n.trim().is_empty()),
        })
    }
}

/// Counts shown on the admin dashboard
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookingTally {
    pub total: usize,
    pub pending: usize,
    pub confirmed: usize,
    pub completed: usize,
}

impl BookingTally {
    pub fn from_bookings(bookings: &[Booking]) -> Self {
        let count = |status: BookingStatus| bookings.iter().filter(|b| b.status == status).count();
        Self {
            total: bookings.len(),
            pending: count(BookingStatus::Pending),
            confirmed: count(BookingStatus::Confirmed),
            completed: count(BookingStatus::Completed),
        }
    }
}
