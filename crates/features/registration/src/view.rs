use crate::form::RegistrationForm;
use askama::Template;
use handy_domain::constants::{BRAND, HOME_PATH, LOGIN_PATH, REGISTER_PATH};
use handy_domain::navigation::Redirect;
use handy_domain::regions::RegionDirectory;

pub const EXPIRED_NOTICE: &str = "Your form expired, please fill it in again.";
pub const SUCCESS_MESSAGE: &str = "Registration successful! Please check your email to confirm.";

#[derive(Debug)]
pub struct SelectOption<'a> {
    pub value: &'a str,
    pub selected: bool,
}

#[derive(Template)]
#[template(path = "register.html")]
pub struct RegisterPage<'a> {
    pub brand: &'a str,
    pub home_path: &'a str,
    pub login_path: &'a str,
    pub register_path: &'a str,
    pub form_id: &'a str,
    pub name: &'a str,
    pub email: &'a str,
    pub password_kept: bool,
    pub confirm_kept: bool,
    pub is_technician: bool,
    pub skill: &'a str,
    pub regions: Vec<SelectOption<'a>>,
    pub locality_enabled: bool,
    pub localities: Vec<SelectOption<'a>>,
    pub address: &'a str,
    pub error: String,
    pub notice: &'a str,
}

impl<'a> RegisterPage<'a> {
    pub fn new(form_id: &'a str, form: &'a RegistrationForm, regions: &'a RegionDirectory) -> Self {
        let options = |values: Vec<&'a str>, current: &str| {
            values
                .into_iter()
                .map(|value| SelectOption { value, selected: value == current })
                .collect::<Vec<_>>()
        };

        Self {
            brand: BRAND,
            home_path: HOME_PATH,
            login_path: LOGIN_PATH,
            register_path: REGISTER_PATH,
            form_id,
            name: &form.name,
            email: &form.email,
            password_kept: !form.password.is_empty(),
            confirm_kept: !form.confirm_password.is_empty(),
            is_technician: form.skill_visible(),
            skill: &form.skill,
            regions: options(regions.regions().collect(), &form.region),
            locality_enabled: form.locality_enabled(),
            localities: options(
                form.locality_options(regions).iter().map(String::as_str).collect(),
                &form.locality,
            ),
            address: &form.address,
            error: String::new(),
            notice: "",
        }
    }

    #[must_use]
    pub fn with_error(mut self, error: impl ToString) -> Self {
        self.error = error.to_string();
        self
    }

    #[must_use]
    pub const fn with_notice(mut self, notice: &'a str) -> Self {
        self.notice = notice;
        self
    }
}

/// Confirmation shown while the delayed redirect to login is pending.
#[derive(Template)]
#[template(path = "registered.html")]
pub struct RegisteredPage<'a> {
    pub brand: &'a str,
    pub message: &'a str,
    pub target: &'a str,
    pub delay_secs: u64,
}

impl<'a> RegisteredPage<'a> {
    pub fn new(redirect: &'a Redirect) -> Self {
        Self {
            brand: BRAND,
            message: SUCCESS_MESSAGE,
            target: &redirect.to,
            delay_secs: redirect.delay_secs(),
        }
    }
}
