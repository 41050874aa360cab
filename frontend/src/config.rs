/// Configuration for the frontend application

/// Backend origin. Baked in at compile time from `VISVAS_API_BASE`; the
/// default matches the backend's local dev port.
pub const API_BASE: &str = match option_env!("VISVAS_API_BASE") {
    Some(url) => url,
    None => "http://localhost:5000",
};
