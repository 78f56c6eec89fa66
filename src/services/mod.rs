//! One wrapper per backend domain. Each method maps to exactly one HTTP
//! call and returns the backend's envelope untouched, except where noted.

pub mod admin_users;
pub mod auth;
pub mod bookings;
pub mod categories;
pub mod courts;
pub mod orders;
pub mod payments;
pub mod products;
pub mod reviews;
pub mod upload;
pub mod users;

use crate::api::ApiClient;

impl ApiClient {
    pub fn auth(&self) -> auth::AuthService<'_> {
        auth::AuthService::new(self)
    }

    pub fn users(&self) -> users::UserService<'_> {
        users::UserService { api: self }
    }

    pub fn courts(&self) -> courts::CourtService<'_> {
        courts::CourtService { api: self }
    }

    pub fn bookings(&self) -> bookings::BookingService<'_> {
        bookings::BookingService { api: self }
    }

    pub fn products(&self) -> products::ProductService<'_> {
        products::ProductService { api: self }
    }

    pub fn categories(&self) -> categories::CategoryService<'_> {
        categories::CategoryService { api: self }
    }

    pub fn orders(&self) -> orders::OrderService<'_> {
        orders::OrderService { api: self }
    }

    pub fn reviews(&self) -> reviews::ReviewService<'_> {
        reviews::ReviewService { api: self }
    }

    pub fn admin_users(&self) -> admin_users::AdminUserService<'_> {
        admin_users::AdminUserService { api: self }
    }

    pub fn payments(&self) -> payments::PaymentService<'_> {
        payments::PaymentService { api: self }
    }

    pub fn uploads(&self) -> upload::UploadService<'_> {
        upload::UploadService { api: self }
    }
}
