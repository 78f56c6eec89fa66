use crate::api::{Ack, ApiClient, ApiError, ApiResponse, Page, PageQuery, Query};
use crate::models::booking::{Booking, BookingRequest, BookingStatus, BookingTally};

/// How many bookings the dashboard tallies over
pub const DASHBOARD_SAMPLE: u32 = 100;
/// How many of those are listed as recent
pub const DASHBOARD_RECENT: usize = 10;

pub struct BookingService<'a> {
    pub(super) api: &'a ApiClient,
}

/// Admin dashboard summary
#[derive(Debug, Clone, Default)]
pub struct Dashboard {
    pub tally: BookingTally,
    pub recent: Vec<Booking>,
}

/// Which bookings the dashboard summarizes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DashboardScope {
    /// Every booking; admin only on the backend
    All,
    /// Bookings on the signed-in owner's courts
    Owned,
}

impl BookingService<'_> {
    pub fn default_paging() -> PageQuery {
        PageQuery::new(0, 10)
    }

    pub fn create(&self, request: &BookingRequest) -> Result<ApiResponse<Booking>, ApiError> {
        self.api.post("bookings", request)
    }

    pub fn mine(&self, paging: &PageQuery) -> Result<ApiResponse<Page<Booking>>, ApiError> {
        self.api.get("bookings/my-bookings", paging.to_query())
    }

    pub fn get(&self, id: i64) -> Result<ApiResponse<Booking>, ApiError> {
        self.api.get(&format!("bookings/{}", id), Query::new())
    }

    pub fn cancel(&self, id: i64) -> Result<Ack, ApiError> {
        self.api.delete(&format!("bookings/{}", id))
    }

    /// Bookings on courts owned by the signed-in owner
    pub fn for_owner(&self, paging: &PageQuery) -> Result<ApiResponse<Page<Booking>>, ApiError> {
        self.api.get("bookings/owner-bookings", paging.to_query())
    }

    pub fn for_court(&self, court_id: i64) -> Result<ApiResponse<Vec<Booking>>, ApiError> {
        self.api
            .get(&format!("bookings/court/{}", court_id), Query::new())
    }

    pub fn all(&self, paging: &PageQuery) -> Result<ApiResponse<Page<Booking>>, ApiError> {
        self.api.get("bookings/all", paging.to_query())
    }

    pub fn set_status(
        &self,
        id: i64,
        status: BookingStatus,
    ) -> Result<ApiResponse<Booking>, ApiError> {
        self.api.patch(
            &format!("bookings/{}/status", id),
            Query::new().with("status", status.as_str()),
        )
    }

    /// Tally the first page of bookings in scope and keep the most recent rows
    pub fn dashboard(&self, scope: DashboardScope) -> Result<Dashboard, ApiError> {
        let sample = PageQuery::new(0, DASHBOARD_SAMPLE);
        let page = match scope {
            DashboardScope::All => self.all(&sample)?,
            DashboardScope::Owned => self.for_owner(&sample)?,
        }
        .into_data()?;
        let tally = BookingTally::from_bookings(&page.content);

        let mut recent = page.content;
        recent.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        recent.truncate(DASHBOARD_RECENT);

        Ok(Dashboard { tally, recent })
    }
}
