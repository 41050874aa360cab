pub mod admin;
pub mod admin_bookings;
pub mod admin_login;
pub mod admin_register;
pub mod admin_users;
pub mod home;
pub mod not_found;
pub mod welcome;

use visvas_shared::Landing;

use crate::{api, router::Route};

/// Where to go once login or registration stored a session. A backend
/// `redirectTo` of the welcome path wins; otherwise the session's role
/// decides.
pub(crate) fn route_after_auth(redirect_to: Option<&str>) -> Route {
    if redirect_to == Some(Landing::Welcome.path()) {
        return Route::Welcome;
    }
    Route::from_landing(api::session().landing())
}
