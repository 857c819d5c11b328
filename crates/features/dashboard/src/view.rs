use crate::catalog::{SLIDES, STATS, SlideIndex, Stat, TECHNICIANS, Technician};
use askama::Template;
use handy_domain::account::Role;
use handy_domain::constants::{
    BRAND, DASHBOARD_PATH, LOGIN_PATH, LOGOUT_PATH, REGISTER_PATH, TECHNICIAN, USER,
};

#[derive(Template)]
#[template(path = "landing.html")]
pub struct LandingPage {
    pub brand: &'static str,
    pub book_href: String,
    pub become_href: String,
    pub login_path: &'static str,
}

impl Default for LandingPage {
    fn default() -> Self {
        Self {
            brand: BRAND,
            book_href: format!("{REGISTER_PATH}?role={USER}"),
            become_href: format!("{REGISTER_PATH}?role={TECHNICIAN}"),
            login_path: LOGIN_PATH,
        }
    }
}

#[derive(Template)]
#[template(path = "dashboard.html")]
pub struct DashboardPage<'a> {
    pub brand: &'a str,
    pub initial: char,
    pub greeting: &'a str,
    pub role: &'a str,
    pub logout_path: &'a str,
    pub image: &'a str,
    pub caption: &'a str,
    pub current: usize,
    pub total: usize,
    pub prev_href: String,
    pub next_href: String,
    pub stats: &'a [Stat],
    pub technicians: &'a [Technician],
}

impl<'a> DashboardPage<'a> {
    pub fn new(initial: char, full_name: Option<&'a str>, role: Option<Role>, slide: SlideIndex) -> Self {
        let shown = slide.slide();
        Self {
            brand: BRAND,
            initial,
            greeting: full_name.unwrap_or(""),
            role: role.map_or("", Role::as_str),
            logout_path: LOGOUT_PATH,
            image: shown.image,
            caption: shown.caption,
            current: slide.get() + 1,
            total: SLIDES.len(),
            prev_href: format!("{DASHBOARD_PATH}?slide={}", slide.prev().get()),
            next_href: format!("{DASHBOARD_PATH}?slide={}", slide.next().get()),
            stats: &STATS,
            technicians: &TECHNICIANS,
        }
    }
}
