use chrono::NaiveDateTime;
use diesel::SqliteConnection;
use serde::{Deserialize, Serialize};

use super::{derive_slug, duplicate, image_path, IMAGE_MAX_LENGTH, SLUG_MAX_LENGTH};
use crate::contacts::error::ContactsError;
use crate::contacts::models::{Company, CompanyChanges, NewCompany, COMPANY_LOGO_DIR};
use crate::core::shared::utils::non_blank;
use crate::core::validation::Validator;

pub const COMPANY_NAME_MAX_LENGTH: usize = 200;
pub const COMPANY_NICKNAME_MAX_LENGTH: usize = 50;

/// Name, nickname and about. The slug comes from the name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyCreateForm {
    pub name: String,
    #[serde(default)]
    pub nickname: String,
    #[serde(default)]
    pub about: String,
}

impl CompanyCreateForm {
    pub const FIELDS: &'static [&'static str] = &["name", "nickname", "about"];

    pub fn clean(
        &self,
        conn: &mut SqliteConnection,
        now: NaiveDateTime,
    ) -> Result<NewCompany, ContactsError> {
        let mut errors = Validator::new()
            .required(&self.name, "name", COMPANY_NAME_MAX_LENGTH)
            .optional(Some(&self.nickname), "nickname", COMPANY_NICKNAME_MAX_LENGTH)
            .result();

        let mut slug = String::new();
        if !errors.has_error_for("name") {
            match derive_slug(&self.name, "name") {
                Ok(derived) => {
                    if Company::slug_taken(conn, &derived, None)? {
                        errors.add_error(duplicate("name", &derived));
                    }
                    slug = derived;
                }
                Err(e) => errors.add_error(e),
            }
        }

        if !errors.is_valid() {
            return Err(errors.into());
        }

        Ok(NewCompany {
            name: self.name.trim().to_string(),
            nickname: non_blank(Some(&self.nickname)),
            slug,
            about: non_blank(Some(&self.about)),
            logo: String::new(),
            date_added: now,
            date_modified: now,
        })
    }
}

/// Every editable company field. `logo`: `None` keeps the stored image,
/// `Some("")` clears it, anything else replaces it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyUpdateForm {
    pub name: String,
    #[serde(default)]
    pub nickname: String,
    pub slug: String,
    #[serde(default)]
    pub about: String,
    #[serde(default)]
    pub logo: Option<String>,
}

impl CompanyUpdateForm {
    pub const FIELDS: &'static [&'static str] = &["name", "nickname", "slug", "about", "logo"];

    pub fn from_company(company: &Company) -> Self {
        Self {
            name: company.name.clone(),
            nickname: company.nickname.clone().unwrap_or_default(),
            slug: company.slug.clone(),
            about: company.about.clone().unwrap_or_default(),
            logo: None,
        }
    }

    pub fn clean(
        &self,
        conn: &mut SqliteConnection,
        company: &Company,
        now: NaiveDateTime,
    ) -> Result<CompanyChanges, ContactsError> {
        let slug = self.slug.trim();
        let mut errors = Validator::new()
            .required(&self.name, "name", COMPANY_NAME_MAX_LENGTH)
            .optional(Some(&self.nickname), "nickname", COMPANY_NICKNAME_MAX_LENGTH)
            .slug(slug, "slug", SLUG_MAX_LENGTH)
            .image(self.logo.as_deref(), "logo", IMAGE_MAX_LENGTH)
            .result();

        if !errors.has_error_for("slug") && Company::slug_taken(conn, slug, Some(company.id))? {
            errors.add_error(duplicate("slug", slug));
        }

        if !errors.is_valid() {
            return Err(errors.into());
        }

        let logo = match self.logo.as_deref().map(str::trim) {
            None => company.logo.clone(),
            Some("") => String::new(),
            Some(name) => image_path(COMPANY_LOGO_DIR, name),
        };

        Ok(CompanyChanges {
            name: self.name.trim().to_string(),
            nickname: non_blank(Some(&self.nickname)),
            slug: slug.to_string(),
            about: non_blank(Some(&self.about)),
            logo,
            date_modified: now,
        })
    }
}
