use askama::Template;
use handy_domain::constants::{BRAND, HOME_PATH, LOGIN_PATH, REGISTER_PATH};

#[derive(Template)]
#[template(path = "login.html")]
pub struct LoginPage<'a> {
    pub brand: &'a str,
    pub home_path: &'a str,
    pub login_path: &'a str,
    pub register_path: &'a str,
    pub email: &'a str,
    pub error: &'a str,
}

impl<'a> LoginPage<'a> {
    pub const fn new(email: &'a str) -> Self {
        Self {
            brand: BRAND,
            home_path: HOME_PATH,
            login_path: LOGIN_PATH,
            register_path: REGISTER_PATH,
            email,
            error: "",
        }
    }

    #[must_use]
    pub const fn with_error(mut self, error: &'a str) -> Self {
        self.error = error;
        self
    }
}
