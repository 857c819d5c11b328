use crate::error::RegistrationError;
use crate::form::{FormField, RegistrationForm};
use crate::view::{EXPIRED_NOTICE, RegisterPage, RegisteredPage};
use crate::Registration;
use axum::Form;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use handy_derive::api_handler;
use handy_domain::account::Role;
use handy_domain::constants::REGISTRATION_TAG;
use handy_domain::navigation::Redirect;
use handy_domain::regions::RegionDirectory;
use handy_kernel::server::error::WebError;
use handy_kernel::server::render::{redirect, render};
use handy_kernel::server::state::AppState;
use serde::Deserialize;
use strum_macros::EnumString;
use tracing::{info, warn};
use utoipa::{IntoParams, ToSchema};
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

/// `GET`/`POST /auth/register`.
pub fn router() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().routes(routes!(show_form, post_form))
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub(crate) struct RegisterQuery {
    /// `user` (default) or `technician`
    role: Option<String>,
}

/// What the posting button asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString)]
#[strum(serialize_all = "kebab-case")]
enum Intent {
    Refresh,
    RoleUser,
    RoleTechnician,
    Submit,
}

/// A posted registration form. Absent inputs leave their field unchanged;
/// password inputs are never echoed back, so an empty one does too.
#[derive(Default, Deserialize, ToSchema)]
#[serde(default)]
pub(crate) struct RegisterInput {
    form_id: String,
    /// `refresh`, `role-user`, `role-technician` or `submit`
    intent: String,
    name: Option<String>,
    email: Option<String>,
    password: Option<String>,
    confirm_password: Option<String>,
    skill: Option<String>,
    region: Option<String>,
    locality: Option<String>,
    address: Option<String>,
}

impl RegisterInput {
    /// Applies the posted values. After a region change the posted locality
    /// is kept only if it belongs to the new region; otherwise it is a stale
    /// choice from the previous region's list.
    fn apply_to(&self, form: &mut RegistrationForm, regions: &RegionDirectory) {
        let region_changed = self.region.as_deref().is_some_and(|region| region != form.region);
        if region_changed && let Some(region) = &self.region {
            form.set_field(FormField::Region, region.as_str());
        }

        let plain = [
            (FormField::Name, &self.name),
            (FormField::Email, &self.email),
            (FormField::Skill, &self.skill),
            (FormField::Address, &self.address),
        ];
        for (field, value) in plain {
            if let Some(value) = value.as_deref().filter(|v| *v != form.get(field)) {
                form.set_field(field, value);
            }
        }

        if let Some(locality) = self.locality.as_deref()
            && locality != form.locality
            && (!region_changed || regions.contains(&form.region, locality))
        {
            form.set_field(FormField::Locality, locality);
        }

        for (field, value) in
            [(FormField::Password, &self.password), (FormField::ConfirmPassword, &self.confirm_password)]
        {
            if let Some(value) = value.as_deref().filter(|v| !v.is_empty()) {
                form.set_field(field, value);
            }
        }
    }
}

#[api_handler(
    get,
    path = "/auth/register",
    params(RegisterQuery),
    responses((status = OK, description = "Fresh registration form", content_type = "text/html", body = String)),
    tag = REGISTRATION_TAG,
)]
pub(crate) async fn show_form(
    State(state): State<AppState>,
    Query(query): Query<RegisterQuery>,
) -> Result<Response, WebError> {
    let slice = state.try_get_slice::<Registration>()?;
    let role = query.role.as_deref().and_then(|r| r.parse::<Role>().ok()).unwrap_or_default();

    let form_id = slice.forms.open(role);
    let form = RegistrationForm::with_role(role);
    Ok(render(&RegisterPage::new(&form_id, &form, slice.registrar.regions()))?.into_response())
}

#[api_handler(
    post,
    path = "/auth/register",
    request_body(content = RegisterInput, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = OK, description = "Form re-rendered, or confirmation page", content_type = "text/html", body = String),
        (status = SEE_OTHER, description = "Registered; continue to login"),
        (status = UNPROCESSABLE_ENTITY, description = "Submission failed; form shown with the reason", content_type = "text/html", body = String),
    ),
    tag = REGISTRATION_TAG,
)]
pub(crate) async fn post_form(
    State(state): State<AppState>,
    Form(input): Form<RegisterInput>,
) -> Result<Response, WebError> {
    let slice = state.try_get_slice::<Registration>()?.clone();
    let regions = slice.registrar.regions();
    let intent = input.intent.parse().unwrap_or(Intent::Refresh);

    let edit = |form: &mut RegistrationForm| {
        input.apply_to(form, regions);
        match intent {
            Intent::RoleUser => form.set_role(Role::User),
            Intent::RoleTechnician => form.set_role(Role::Technician),
            Intent::Refresh | Intent::Submit => {},
        }
    };

    if intent != Intent::Submit {
        let Some(form) = slice.forms.update(&input.form_id, edit) else {
            return expired(&slice);
        };
        return Ok(render(&RegisterPage::new(&input.form_id, &form, regions))?.into_response());
    }

    // A duplicate submit is turned away before it can touch the stored values.
    let (form, outcome) = match slice.forms.begin_submit(&input.form_id, edit) {
        Ok(Some(snapshot)) => {
            let outcome =
                run_submission(slice.clone(), input.form_id.clone(), snapshot.clone()).await;
            (snapshot, outcome)
        },
        Ok(None) => return expired(&slice),
        Err(err) => (slice.forms.snapshot(&input.form_id).unwrap_or_default(), Err(err)),
    };

    match outcome {
        Ok(next) if next.is_immediate() => Ok(redirect(&next.to)),
        Ok(next) => Ok(render(&RegisteredPage::new(&next))?.into_response()),
        Err(err) => {
            warn!(form = %input.form_id, kind = err.kind(), "Registration rejected");
            let page = RegisterPage::new(&input.form_id, &form, regions).with_error(&err);
            Ok((StatusCode::UNPROCESSABLE_ENTITY, render(&page)?).into_response())
        },
    }
}

fn expired(slice: &Registration) -> Result<Response, WebError> {
    info!("Post against an expired registration form");
    let form_id = slice.forms.open(Role::default());
    let form = RegistrationForm::default();
    let page =
        RegisterPage::new(&form_id, &form, slice.registrar.regions()).with_notice(EXPIRED_NOTICE);
    Ok(render(&page)?.into_response())
}

/// Submits on a detached task so the backend calls complete even if the
/// browser goes away; the outcome is then recorded on the form instance.
async fn run_submission(
    slice: Registration,
    form_id: String,
    form: RegistrationForm,
) -> Result<Redirect, RegistrationError> {
    let task = tokio::spawn(async move {
        let outcome = slice.registrar.submit(&form).await;
        slice.forms.finish_submit(&form_id, outcome.is_ok());
        outcome
    });

    task.await.map_err(|err| RegistrationError::Internal {
        message: err.to_string().into(),
        context: Some("registration task".into()),
    })?
}

#[cfg(test)]
mod tests {
    use super::*;

    fn directory() -> RegionDirectory {
        RegionDirectory::new([("Lagos", vec!["Ikeja", "Lekki"]), ("Abuja", vec!["Garki"])])
    }

    fn posted(region: Option<&str>, locality: Option<&str>) -> RegisterInput {
        RegisterInput {
            region: region.map(str::to_owned),
            locality: locality.map(str::to_owned),
            ..RegisterInput::default()
        }
    }

    #[test]
    fn region_change_ignores_stale_locality() {
        let mut form = RegistrationForm::default();
        form.set_field(FormField::Region, "Lagos");
        form.set_field(FormField::Locality, "Lekki");

        posted(Some("Abuja"), Some("Lekki")).apply_to(&mut form, &directory());
        assert_eq!(form.region, "Abuja");
        assert_eq!(form.locality, "");
    }

    #[test]
    fn region_and_its_locality_in_one_post() {
        let mut form = RegistrationForm::default();
        posted(Some("Lagos"), Some("Lekki")).apply_to(&mut form, &directory());
        assert_eq!(form.region, "Lagos");
        assert_eq!(form.locality, "Lekki");

        posted(Some("Abuja"), Some("Garki")).apply_to(&mut form, &directory());
        assert_eq!(form.region, "Abuja");
        assert_eq!(form.locality, "Garki");
    }

    #[test]
    fn locality_applies_when_region_is_unchanged() {
        let mut form = RegistrationForm::default();
        form.set_field(FormField::Region, "Lagos");

        posted(Some("Lagos"), Some("Ikeja")).apply_to(&mut form, &directory());
        assert_eq!(form.locality, "Ikeja");

        posted(Some("Lagos"), None).apply_to(&mut form, &directory());
        assert_eq!(form.locality, "Ikeja");
    }

    #[test]
    fn empty_password_keeps_the_stored_one() {
        let mut form = RegistrationForm::default();
        let input = RegisterInput { password: Some("secret-1".to_owned()), ..RegisterInput::default() };
        input.apply_to(&mut form, &directory());

        let input = RegisterInput { password: Some(String::new()), ..RegisterInput::default() };
        input.apply_to(&mut form, &directory());
        assert_eq!(form.password, "secret-1");
    }

    #[test]
    fn intents_parse_from_button_values() {
        assert_eq!("role-technician".parse::<Intent>().unwrap(), Intent::RoleTechnician);
        assert_eq!("submit".parse::<Intent>().unwrap(), Intent::Submit);
        assert!("delete".parse::<Intent>().is_err());
    }
}
