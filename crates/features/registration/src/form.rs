//! Registration form state and the values derived from it.

use handy_domain::account::Role;
use handy_domain::regions::RegionDirectory;
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

/// Editable text fields. The role is switched with [`RegistrationForm::set_role`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr, Display, EnumIter, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum FormField {
    Name,
    Email,
    Password,
    ConfirmPassword,
    Skill,
    Region,
    Locality,
    Address,
}

impl FormField {
    /// Label shown next to the input and in "is required" messages.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Name => "Full name",
            Self::Email => "Email",
            Self::Password => "Password",
            Self::ConfirmPassword => "Confirm password",
            Self::Skill => "Skill",
            Self::Region => "State",
            Self::Locality => "City",
            Self::Address => "Address",
        }
    }
}

/// Field values of one registration attempt.
///
/// Only raw input is stored; visibility and option lists are computed on
/// demand from it.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct RegistrationForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub role: Role,
    pub skill: String,
    pub region: String,
    pub locality: String,
    pub address: String,
}

impl std::fmt::Debug for RegistrationForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistrationForm")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("role", &self.role)
            .field("skill", &self.skill)
            .field("region", &self.region)
            .field("locality", &self.locality)
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}

impl RegistrationForm {
    #[must_use]
    pub fn with_role(role: Role) -> Self {
        Self { role, ..Self::default() }
    }

    /// Updates exactly one field. Setting the region also clears the locality,
    /// which may not belong to the new region.
    pub fn set_field(&mut self, field: FormField, value: impl Into<String>) {
        let value = value.into();
        match field {
            FormField::Name => self.name = value,
            FormField::Email => self.email = value,
            FormField::Password => self.password = value,
            FormField::ConfirmPassword => self.confirm_password = value,
            FormField::Skill => self.skill = value,
            FormField::Region => {
                self.region = value;
                self.locality.clear();
            },
            FormField::Locality => self.locality = value,
            FormField::Address => self.address = value,
        }
    }

    /// Switches role. The skill text is kept so flipping back restores it;
    /// it is only sent for technicians.
    pub const fn set_role(&mut self, role: Role) {
        self.role = role;
    }

    #[must_use]
    pub fn get(&self, field: FormField) -> &str {
        match field {
            FormField::Name => &self.name,
            FormField::Email => &self.email,
            FormField::Password => &self.password,
            FormField::ConfirmPassword => &self.confirm_password,
            FormField::Skill => &self.skill,
            FormField::Region => &self.region,
            FormField::Locality => &self.locality,
            FormField::Address => &self.address,
        }
    }

    /// Whether the skill input is shown and required.
    #[must_use]
    pub const fn skill_visible(&self) -> bool {
        self.role.requires_skill()
    }

    /// The locality selector is active once a region is chosen.
    #[must_use]
    pub fn locality_enabled(&self) -> bool {
        !self.region.is_empty()
    }

    /// Locality options for the current region; empty when none or unknown.
    #[must_use]
    pub fn locality_options<'d>(&self, regions: &'d RegionDirectory) -> &'d [String] {
        if self.locality_enabled() { regions.localities(&self.region) } else { &[] }
    }

    /// Skill as transmitted: only technicians send one.
    #[must_use]
    pub fn submitted_skill(&self) -> Option<&str> {
        self.role.requires_skill().then_some(self.skill.trim())
    }
}
