use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::contacts::models::{
    DetailKind, DetailRecord, EmailAddress, EmailAddressValues, ImService, InstantMessenger,
    InstantMessengerValues, Location, PhoneNumber, PhoneNumberValues, SpecialDate,
    SpecialDateValues, StreetAddress, StreetAddressValues, WebSite, WebSiteValues,
};
use crate::core::validation::{ValidationError, ValidationResult, Validator};

pub const PHONE_NUMBER_MAX_LENGTH: usize = 50;
pub const IM_ACCOUNT_MAX_LENGTH: usize = 100;
pub const URL_MAX_LENGTH: usize = 200;
pub const CITY_MAX_LENGTH: usize = 200;
pub const PROVINCE_MAX_LENGTH: usize = 200;
pub const POSTAL_CODE_MAX_LENGTH: usize = 10;
pub const COUNTRY_MAX_LENGTH: usize = 100;
pub const OCCASION_MAX_LENGTH: usize = 200;

/// `(format, separator, index of the year part, digits in the year part)`.
/// chrono's `%Y` also reads short years, so the width is checked first.
const DATE_INPUT_FORMATS: &[(&str, char, usize, usize)] = &[
    ("%Y-%m-%d", '-', 0, 4),
    ("%m/%d/%Y", '/', 2, 4),
    ("%m/%d/%y", '/', 2, 2),
];

/// One row of an inline form set.
pub trait DetailForm: Clone + Default + std::fmt::Debug {
    type Record: DetailRecord;
    const PREFIX: &'static str;

    /// Primary key of the record this row edits; `None` for a new row.
    fn id(&self) -> Option<i32>;
    fn marked_for_deletion(&self) -> bool;
    /// Whether any data field differs from a blank row.
    fn has_changed(&self) -> bool;
    fn initial(record: &Self::Record) -> Self;
    fn clean(
        &self,
        locations: &[Location],
    ) -> Result<<Self::Record as DetailRecord>::Values, ValidationResult>;
}

/// Error for a location the given detail kind may not use, if any.
pub fn location_error(kind: DetailKind, location: &Location) -> Option<ValidationError> {
    let rule = kind.location_rule()?;
    if rule.allows(location) {
        None
    } else {
        Some(ValidationError::LocationNotAllowed {
            field: "location".to_string(),
            location: location.name.clone(),
            kind: kind.verbose_name().to_string(),
        })
    }
}

fn check_location(
    kind: DetailKind,
    location: Option<i32>,
    locations: &[Location],
) -> Result<i32, ValidationError> {
    let id = location.ok_or_else(|| ValidationError::Required("location".to_string()))?;
    let location = locations
        .iter()
        .find(|l| l.id == id)
        .ok_or_else(|| ValidationError::UnknownReference {
            field: "location".to_string(),
            id,
        })?;
    match location_error(kind, location) {
        Some(e) => Err(e),
        None => Ok(id),
    }
}

fn parse_date(value: &str, field: &str) -> Result<NaiveDate, ValidationError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ValidationError::Required(field.to_string()));
    }
    DATE_INPUT_FORMATS
        .iter()
        .filter(|(_, separator, index, digits)| {
            value.split(*separator).nth(*index).is_some_and(|year| {
                year.len() == *digits && year.bytes().all(|b| b.is_ascii_digit())
            })
        })
        .find_map(|(format, ..)| NaiveDate::parse_from_str(value, format).ok())
        .ok_or_else(|| ValidationError::InvalidDate {
            field: field.to_string(),
            value: value.to_string(),
        })
}

fn finish<V>(errors: ValidationResult, values: impl FnOnce() -> V) -> Result<V, ValidationResult> {
    if errors.is_valid() {
        Ok(values())
    } else {
        Err(errors)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhoneNumberForm {
    #[serde(default)]
    pub id: Option<i32>,
    #[serde(default)]
    pub phone_number: String,
    #[serde(default)]
    pub location: Option<i32>,
    #[serde(default)]
    pub delete: bool,
}

impl DetailForm for PhoneNumberForm {
    type Record = PhoneNumber;
    const PREFIX: &'static str = "phone_number";

    fn id(&self) -> Option<i32> {
        self.id
    }

    fn marked_for_deletion(&self) -> bool {
        self.delete
    }

    fn has_changed(&self) -> bool {
        !self.phone_number.trim().is_empty() || self.location.is_some()
    }

    fn initial(record: &PhoneNumber) -> Self {
        Self {
            id: Some(record.id),
            phone_number: record.phone_number.clone(),
            location: Some(record.location_id),
            delete: false,
        }
    }

    fn clean(&self, locations: &[Location]) -> Result<PhoneNumberValues, ValidationResult> {
        let location = check_location(DetailKind::PhoneNumber, self.location, locations);
        let errors = Validator::new()
            .required(&self.phone_number, "phone_number", PHONE_NUMBER_MAX_LENGTH)
            .custom(|| location.as_ref().err().cloned())
            .result();
        finish(errors, || PhoneNumberValues {
            phone_number: self.phone_number.trim().to_string(),
            location_id: location.unwrap_or_default(),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailAddressForm {
    #[serde(default)]
    pub id: Option<i32>,
    #[serde(default)]
    pub email_address: String,
    #[serde(default)]
    pub location: Option<i32>,
    #[serde(default)]
    pub delete: bool,
}

impl DetailForm for EmailAddressForm {
    type Record = EmailAddress;
    const PREFIX: &'static str = "email_address";

    fn id(&self) -> Option<i32> {
        self.id
    }

    fn marked_for_deletion(&self) -> bool {
        self.delete
    }

    fn has_changed(&self) -> bool {
        !self.email_address.trim().is_empty() || self.location.is_some()
    }

    fn initial(record: &EmailAddress) -> Self {
        Self {
            id: Some(record.id),
            email_address: record.email_address.clone(),
            location: Some(record.location_id),
            delete: false,
        }
    }

    fn clean(&self, locations: &[Location]) -> Result<EmailAddressValues, ValidationResult> {
        let location = check_location(DetailKind::EmailAddress, self.location, locations);
        let errors = Validator::new()
            .email(&self.email_address, "email_address")
            .custom(|| location.as_ref().err().cloned())
            .result();
        finish(errors, || EmailAddressValues {
            email_address: self.email_address.trim().to_string(),
            location_id: location.unwrap_or_default(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstantMessengerForm {
    #[serde(default)]
    pub id: Option<i32>,
    #[serde(default)]
    pub im_account: String,
    #[serde(default = "default_service")]
    pub service: String,
    #[serde(default)]
    pub location: Option<i32>,
    #[serde(default)]
    pub delete: bool,
}

fn default_service() -> String {
    ImService::default().as_str().to_string()
}

impl Default for InstantMessengerForm {
    fn default() -> Self {
        Self {
            id: None,
            im_account: String::new(),
            service: default_service(),
            location: None,
            delete: false,
        }
    }
}

impl DetailForm for InstantMessengerForm {
    type Record = InstantMessenger;
    const PREFIX: &'static str = "instant_messenger";

    fn id(&self) -> Option<i32> {
        self.id
    }

    fn marked_for_deletion(&self) -> bool {
        self.delete
    }

    fn has_changed(&self) -> bool {
        !self.im_account.trim().is_empty()
            || self.location.is_some()
            || self.service.trim() != ImService::default().as_str()
    }

    fn initial(record: &InstantMessenger) -> Self {
        Self {
            id: Some(record.id),
            im_account: record.im_account.clone(),
            service: record.service.as_str().to_string(),
            location: Some(record.location_id),
            delete: false,
        }
    }

    fn clean(&self, locations: &[Location]) -> Result<InstantMessengerValues, ValidationResult> {
        let location = check_location(DetailKind::InstantMessenger, self.location, locations);
        let service = self.service.trim().parse::<ImService>();
        let errors = Validator::new()
            .required(&self.im_account, "im_account", IM_ACCOUNT_MAX_LENGTH)
            .custom(|| location.as_ref().err().cloned())
            .custom(|| {
                service.as_ref().err().map(|e| ValidationError::InvalidChoice {
                    field: "service".to_string(),
                    value: e.0.clone(),
                })
            })
            .result();
        finish(errors, || InstantMessengerValues {
            im_account: self.im_account.trim().to_string(),
            location_id: location.unwrap_or_default(),
            service: service.unwrap_or_default(),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebSiteForm {
    #[serde(default)]
    pub id: Option<i32>,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub location: Option<i32>,
    #[serde(default)]
    pub delete: bool,
}

impl DetailForm for WebSiteForm {
    type Record = WebSite;
    const PREFIX: &'static str = "web_site";

    fn id(&self) -> Option<i32> {
        self.id
    }

    fn marked_for_deletion(&self) -> bool {
        self.delete
    }

    fn has_changed(&self) -> bool {
        !self.url.trim().is_empty() || self.location.is_some()
    }

    fn initial(record: &WebSite) -> Self {
        Self {
            id: Some(record.id),
            url: record.url.clone(),
            location: Some(record.location_id),
            delete: false,
        }
    }

    fn clean(&self, locations: &[Location]) -> Result<WebSiteValues, ValidationResult> {
        let location = check_location(DetailKind::WebSite, self.location, locations);
        let errors = Validator::new()
            .url(&self.url, "url", URL_MAX_LENGTH)
            .custom(|| location.as_ref().err().cloned())
            .result();
        finish(errors, || WebSiteValues {
            url: self.url.trim().to_string(),
            location_id: location.unwrap_or_default(),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreetAddressForm {
    #[serde(default)]
    pub id: Option<i32>,
    #[serde(default)]
    pub street: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub province: String,
    #[serde(default)]
    pub postal_code: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub location: Option<i32>,
    #[serde(default)]
    pub delete: bool,
}

impl DetailForm for StreetAddressForm {
    type Record = StreetAddress;
    const PREFIX: &'static str = "street_address";

    fn id(&self) -> Option<i32> {
        self.id
    }

    fn marked_for_deletion(&self) -> bool {
        self.delete
    }

    fn has_changed(&self) -> bool {
        [
            &self.street,
            &self.city,
            &self.province,
            &self.postal_code,
            &self.country,
        ]
        .iter()
        .any(|v| !v.trim().is_empty())
            || self.location.is_some()
    }

    fn initial(record: &StreetAddress) -> Self {
        Self {
            id: Some(record.id),
            street: record.street.clone(),
            city: record.city.clone(),
            province: record.province.clone(),
            postal_code: record.postal_code.clone(),
            country: record.country.clone(),
            location: Some(record.location_id),
            delete: false,
        }
    }

    fn clean(&self, locations: &[Location]) -> Result<StreetAddressValues, ValidationResult> {
        let location = check_location(DetailKind::StreetAddress, self.location, locations);
        let errors = Validator::new()
            .optional(Some(&self.city), "city", CITY_MAX_LENGTH)
            .optional(Some(&self.province), "province", PROVINCE_MAX_LENGTH)
            .optional(Some(&self.postal_code), "postal_code", POSTAL_CODE_MAX_LENGTH)
            .required(&self.country, "country", COUNTRY_MAX_LENGTH)
            .custom(|| location.as_ref().err().cloned())
            .result();
        finish(errors, || StreetAddressValues {
            street: self.street.trim().to_string(),
            city: self.city.trim().to_string(),
            province: self.province.trim().to_string(),
            postal_code: self.postal_code.trim().to_string(),
            country: self.country.trim().to_string(),
            location_id: location.unwrap_or_default(),
        })
    }
}

/// `date` is the raw submitted text: `YYYY-MM-DD`, `MM/DD/YYYY` or `MM/DD/YY`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecialDateForm {
    #[serde(default)]
    pub id: Option<i32>,
    #[serde(default)]
    pub occasion: String,
    #[serde(default)]
    pub date: String,
    #[serde(default = "default_every_year")]
    pub every_year: bool,
    #[serde(default)]
    pub delete: bool,
}

fn default_every_year() -> bool {
    true
}

impl Default for SpecialDateForm {
    fn default() -> Self {
        Self {
            id: None,
            occasion: String::new(),
            date: String::new(),
            every_year: default_every_year(),
            delete: false,
        }
    }
}

impl DetailForm for SpecialDateForm {
    type Record = SpecialDate;
    const PREFIX: &'static str = "special_date";

    fn id(&self) -> Option<i32> {
        self.id
    }

    fn marked_for_deletion(&self) -> bool {
        self.delete
    }

    fn has_changed(&self) -> bool {
        !self.occasion.trim().is_empty() || !self.date.trim().is_empty() || !self.every_year
    }

    fn initial(record: &SpecialDate) -> Self {
        Self {
            id: Some(record.id),
            occasion: record.occasion.clone(),
            date: record.date.format("%Y-%m-%d").to_string(),
            every_year: record.every_year,
            delete: false,
        }
    }

    fn clean(&self, _locations: &[Location]) -> Result<SpecialDateValues, ValidationResult> {
        let date = parse_date(&self.date, "date");
        let errors = Validator::new()
            .required(&self.occasion, "occasion", OCCASION_MAX_LENGTH)
            .custom(|| date.as_ref().err().cloned())
            .result();
        finish(errors, || SpecialDateValues {
            occasion: self.occasion.trim().to_string(),
            date: date.unwrap_or_default(),
            every_year: self.every_year,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;

    fn stamp() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 1)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .unwrap()
    }

    fn locations() -> Vec<Location> {
        let make = |id: i32, name: &str, is_phone: bool, is_street_address: bool| Location {
            id,
            name: name.to_string(),
            slug: name.to_lowercase(),
            is_phone,
            is_street_address,
            weight: 0,
            date_added: stamp(),
            date_modified: stamp(),
        };
        vec![
            make(1, "Work", false, false),
            make(2, "Mobile", true, false),
            make(3, "Mailing", false, true),
        ]
    }

    #[test]
    fn test_phone_number_rejects_street_address_location() {
        let form = PhoneNumberForm {
            phone_number: "555-0100".to_string(),
            location: Some(3),
            ..Default::default()
        };
        let errors = form.clean(&locations()).unwrap_err();
        assert!(matches!(
            errors.errors(),
            [ValidationError::LocationNotAllowed { location, .. }] if location == "Mailing"
        ));

        let ok = PhoneNumberForm {
            location: Some(2),
            ..form
        };
        assert_eq!(ok.clean(&locations()).unwrap().location_id, 2);
    }

    #[test]
    fn test_email_web_site_and_im_reject_flagged_locations() {
        for location in [2, 3] {
            let email = EmailAddressForm {
                email_address: "ada@example.com".to_string(),
                location: Some(location),
                ..Default::default()
            };
            assert!(email.clean(&locations()).unwrap_err().has_error_for("location"));

            let site = WebSiteForm {
                url: "https://example.com".to_string(),
                location: Some(location),
                ..Default::default()
            };
            assert!(site.clean(&locations()).unwrap_err().has_error_for("location"));

            let im = InstantMessengerForm {
                im_account: "ada".to_string(),
                location: Some(location),
                ..Default::default()
            };
            assert!(im.clean(&locations()).unwrap_err().has_error_for("location"));
        }
    }

    #[test]
    fn test_street_address_rejects_phone_location() {
        let form = StreetAddressForm {
            city: "London".to_string(),
            country: "UK".to_string(),
            location: Some(2),
            ..Default::default()
        };
        assert!(form.clean(&locations()).unwrap_err().has_error_for("location"));

        let ok = StreetAddressForm {
            location: Some(3),
            ..form
        };
        let values = ok.clean(&locations()).unwrap();
        assert_eq!(values.city, "London");
        assert_eq!(values.street, "");
    }

    #[test]
    fn test_instant_messenger_service_must_be_known() {
        let form = InstantMessengerForm {
            im_account: "ada".to_string(),
            service: "telegram".to_string(),
            location: Some(1),
            ..Default::default()
        };
        let errors = form.clean(&locations()).unwrap_err();
        assert_eq!(
            errors.errors(),
            &[ValidationError::InvalidChoice {
                field: "service".to_string(),
                value: "telegram".to_string(),
            }]
        );

        let ok = InstantMessengerForm {
            service: "google-talk".to_string(),
            ..form
        };
        assert_eq!(ok.clean(&locations()).unwrap().service, ImService::GoogleTalk);
    }

    #[test]
    fn test_missing_and_unknown_location() {
        let form = WebSiteForm {
            url: "https://example.com".to_string(),
            ..Default::default()
        };
        assert_eq!(
            form.clean(&locations()).unwrap_err().errors(),
            &[ValidationError::Required("location".to_string())]
        );

        let unknown = WebSiteForm {
            location: Some(99),
            ..form
        };
        assert!(matches!(
            unknown.clean(&locations()).unwrap_err().errors(),
            [ValidationError::UnknownReference { id: 99, .. }]
        ));
    }

    #[test]
    fn test_special_date_formats() {
        let form = SpecialDateForm {
            occasion: "Birthday".to_string(),
            date: "12/10/1815".to_string(),
            ..Default::default()
        };
        let values = form.clean(&[]).unwrap();
        assert_eq!(values.date, NaiveDate::from_ymd_opt(1815, 12, 10).unwrap());
        assert!(values.every_year);

        let bad = SpecialDateForm {
            date: "someday".to_string(),
            ..form
        };
        assert!(bad.clean(&[]).unwrap_err().has_error_for("date"));
    }

    #[test]
    fn test_special_date_year_width() {
        let parse = |date: &str| {
            SpecialDateForm {
                occasion: "Anniversary".to_string(),
                date: date.to_string(),
                ..Default::default()
            }
            .clean(&[])
            .map(|values| values.date)
        };
        let ymd = |y, m, d| NaiveDate::from_ymd_opt(y, m, d).unwrap();

        assert_eq!(parse("2015-12-10").unwrap(), ymd(2015, 12, 10));
        assert_eq!(parse("12/10/2015").unwrap(), ymd(2015, 12, 10));
        assert_eq!(parse("12/10/15").unwrap(), ymd(2015, 12, 10));
        assert_eq!(parse("3/4/99").unwrap(), ymd(1999, 3, 4));

        for date in ["15-12-10", "12/10/015", "12/10/5", "2015/12/10", "12-10-2015"] {
            assert!(parse(date).unwrap_err().has_error_for("date"), "{date}");
        }
    }

    #[test]
    fn test_blank_rows_are_unchanged() {
        assert!(!PhoneNumberForm::default().has_changed());
        assert!(!InstantMessengerForm::default().has_changed());
        assert!(!SpecialDateForm::default().has_changed());
        assert!(!StreetAddressForm::default().has_changed());
        assert!(SpecialDateForm {
            every_year: false,
            ..Default::default()
        }
        .has_changed());
    }
}
