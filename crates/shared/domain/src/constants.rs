//! Well-known strings shared by slices, templates and the API docs.

pub const BRAND: &str = "Handyman";

pub const SYSTEM_TAG: &str = "System";
pub const REGIONS_TAG: &str = "Regions";
pub const REGISTRATION_TAG: &str = "Registration";
pub const AUTH_TAG: &str = "Auth";
pub const PAGES_TAG: &str = "Pages";

pub const USER: &str = "user";
pub const TECHNICIAN: &str = "technician";

pub const HOME_PATH: &str = "/";
pub const LOGIN_PATH: &str = "/auth/login";
pub const LOGOUT_PATH: &str = "/auth/logout";
pub const REGISTER_PATH: &str = "/auth/register";
pub const DASHBOARD_PATH: &str = "/dashboard";
