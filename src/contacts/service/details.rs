use chrono::NaiveDateTime;
use diesel::SqliteConnection;
use log::{debug, info};
use serde::Serialize;

use super::ContactsService;
use crate::contacts::error::ContactsError;
use crate::contacts::forms::{
    location_error, CompanyUpdateForm, DetailForm, EmailAddressForm, FormErrors, InlineFormSet,
    InstantMessengerForm, PersonUpdateForm, PhoneNumberForm, RowAction, SpecialDateForm,
    StreetAddressForm, Values, WebSiteForm,
};
use crate::contacts::models::{
    Company, DetailRecord, DetailValues, EmailAddress, InstantMessenger, Located, Location, Note,
    Person, PhoneNumber, SpecialDate, StreetAddress, Summary, WebSite,
};
use crate::contacts::owner::{Owner, OwnerRef};
use crate::core::shared::utils::now;
use crate::core::validation::{ValidationError, ValidationResult};

/// The six inline form sets edited alongside a company or person.
#[derive(Debug, Clone)]
pub struct DetailFormSets {
    pub phone_numbers: InlineFormSet<PhoneNumberForm>,
    pub email_addresses: InlineFormSet<EmailAddressForm>,
    pub instant_messengers: InlineFormSet<InstantMessengerForm>,
    pub web_sites: InlineFormSet<WebSiteForm>,
    pub street_addresses: InlineFormSet<StreetAddressForm>,
    pub special_dates: InlineFormSet<SpecialDateForm>,
}

impl DetailFormSets {
    /// Form sets with no rows, for submissions that touch one kind only.
    pub fn empty(owner: OwnerRef) -> Self {
        Self {
            phone_numbers: InlineFormSet::empty(owner),
            email_addresses: InlineFormSet::empty(owner),
            instant_messengers: InlineFormSet::empty(owner),
            web_sites: InlineFormSet::empty(owner),
            street_addresses: InlineFormSet::empty(owner),
            special_dates: InlineFormSet::empty(owner),
        }
    }

    pub fn load(conn: &mut SqliteConnection, owner: OwnerRef) -> Result<Self, ContactsError> {
        Ok(Self {
            phone_numbers: InlineFormSet::load(conn, owner)?,
            email_addresses: InlineFormSet::load(conn, owner)?,
            instant_messengers: InlineFormSet::load(conn, owner)?,
            web_sites: InlineFormSet::load(conn, owner)?,
            street_addresses: InlineFormSet::load(conn, owner)?,
            special_dates: InlineFormSet::load(conn, owner)?,
        })
    }

    fn owners(&self) -> [OwnerRef; 6] {
        [
            self.phone_numbers.owner,
            self.email_addresses.owner,
            self.instant_messengers.owner,
            self.web_sites.owner,
            self.street_addresses.owner,
            self.special_dates.owner,
        ]
    }
}

/// Everything attached to one owner.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OwnerDetails {
    pub owner: Owner,
    pub phone_numbers: Vec<PhoneNumber>,
    pub email_addresses: Vec<EmailAddress>,
    pub instant_messengers: Vec<InstantMessenger>,
    pub web_sites: Vec<WebSite>,
    pub street_addresses: Vec<StreetAddress>,
    pub special_dates: Vec<SpecialDate>,
    pub notes: Vec<Note>,
}

impl OwnerDetails {
    fn load(conn: &mut SqliteConnection, owner: Owner) -> Result<Self, ContactsError> {
        let r = owner.owner_ref();
        Ok(Self {
            phone_numbers: PhoneNumber::list_for(conn, r)?,
            email_addresses: EmailAddress::list_for(conn, r)?,
            instant_messengers: InstantMessenger::list_for(conn, r)?,
            web_sites: WebSite::list_for(conn, r)?,
            street_addresses: StreetAddress::list_for(conn, r)?,
            special_dates: SpecialDate::list_for(conn, r)?,
            notes: Note::list_for(conn, r)?,
            owner,
        })
    }
}

/// Validated row actions for all six kinds.
struct PendingRows {
    phone_numbers: Vec<RowAction<Values<PhoneNumberForm>>>,
    email_addresses: Vec<RowAction<Values<EmailAddressForm>>>,
    instant_messengers: Vec<RowAction<Values<InstantMessengerForm>>>,
    web_sites: Vec<RowAction<Values<WebSiteForm>>>,
    street_addresses: Vec<RowAction<Values<StreetAddressForm>>>,
    special_dates: Vec<RowAction<Values<SpecialDateForm>>>,
}

fn validate_set<F: DetailForm>(
    conn: &mut SqliteConnection,
    set: &InlineFormSet<F>,
    locations: &[Location],
    errors: &mut FormErrors,
) -> Result<Vec<RowAction<Values<F>>>, ContactsError> {
    let existing = F::Record::list_for(conn, set.owner)?;
    match set.validate(&existing, locations) {
        Ok(actions) => Ok(actions),
        Err(rows) => {
            errors.add_rows(F::PREFIX, rows);
            Ok(Vec::new())
        }
    }
}

/// Validate every form set, merging their row errors into `errors`.
fn validate_sets(
    conn: &mut SqliteConnection,
    sets: &DetailFormSets,
    errors: &mut FormErrors,
) -> Result<PendingRows, ContactsError> {
    let locations = Location::all(conn)?;
    Ok(PendingRows {
        phone_numbers: validate_set(conn, &sets.phone_numbers, &locations, errors)?,
        email_addresses: validate_set(conn, &sets.email_addresses, &locations, errors)?,
        instant_messengers: validate_set(conn, &sets.instant_messengers, &locations, errors)?,
        web_sites: validate_set(conn, &sets.web_sites, &locations, errors)?,
        street_addresses: validate_set(conn, &sets.street_addresses, &locations, errors)?,
        special_dates: validate_set(conn, &sets.special_dates, &locations, errors)?,
    })
}

/// Detail write path: the owner must exist and the location must suit the
/// record kind, whatever produced the values.
fn check_write<R: DetailRecord>(
    conn: &mut SqliteConnection,
    owner: OwnerRef,
    values: &R::Values,
) -> Result<(), ContactsError> {
    if !Owner::exists(conn, owner)? {
        return Err(ContactsError::not_found(owner.kind.as_str(), owner.id));
    }
    if let Some(location_id) = values.location_id() {
        let location = Location::find(conn, location_id)?.ok_or_else(|| {
            ContactsError::from(ValidationResult::from(ValidationError::UnknownReference {
                field: "location".to_string(),
                id: location_id,
            }))
        })?;
        if let Some(e) = location_error(R::KIND, &location) {
            return Err(ValidationResult::from(e).into());
        }
    }
    Ok(())
}

fn apply_rows<R: DetailRecord>(
    conn: &mut SqliteConnection,
    owner: OwnerRef,
    actions: Vec<RowAction<R::Values>>,
    now: NaiveDateTime,
) -> Result<(), ContactsError> {
    for action in actions {
        match action {
            RowAction::Create(values) => {
                check_write::<R>(conn, owner, &values)?;
                let record = R::insert(conn, owner, &values, now)?;
                debug!("Added {} {} to {owner}", R::KIND, record.id());
            }
            RowAction::Update { id, values } => {
                check_write::<R>(conn, owner, &values)?;
                R::update(conn, id, &values, now)?;
                debug!("Updated {} {id} of {owner}", R::KIND);
            }
            RowAction::Delete(id) => {
                R::delete(conn, id)?;
                debug!("Deleted {} {id} of {owner}", R::KIND);
            }
        }
    }
    Ok(())
}

fn apply_pending(
    conn: &mut SqliteConnection,
    owner: OwnerRef,
    rows: PendingRows,
    now: NaiveDateTime,
) -> Result<(), ContactsError> {
    apply_rows::<PhoneNumber>(conn, owner, rows.phone_numbers, now)?;
    apply_rows::<EmailAddress>(conn, owner, rows.email_addresses, now)?;
    apply_rows::<InstantMessenger>(conn, owner, rows.instant_messengers, now)?;
    apply_rows::<WebSite>(conn, owner, rows.web_sites, now)?;
    apply_rows::<StreetAddress>(conn, owner, rows.street_addresses, now)?;
    apply_rows::<SpecialDate>(conn, owner, rows.special_dates, now)?;
    Ok(())
}

fn require_owner(conn: &mut SqliteConnection, owner: OwnerRef) -> Result<Owner, ContactsError> {
    Owner::resolve(conn, owner)?.ok_or_else(|| ContactsError::not_found(owner.kind.as_str(), owner.id))
}

fn check_bound_owner(sets: &DetailFormSets, owner: OwnerRef) -> Result<(), ContactsError> {
    if sets.owners().iter().all(|bound| *bound == owner) {
        Ok(())
    } else {
        Err(ValidationResult::from(ValidationError::UnknownReference {
            field: "owner".to_string(),
            id: owner.id,
        })
        .into())
    }
}

/// Remove every detail record and note of `owner`.
pub(super) fn delete_owner_records(
    conn: &mut SqliteConnection,
    owner: OwnerRef,
) -> Result<usize, ContactsError> {
    let removed = PhoneNumber::delete_for_owner(conn, owner)?
        + EmailAddress::delete_for_owner(conn, owner)?
        + InstantMessenger::delete_for_owner(conn, owner)?
        + WebSite::delete_for_owner(conn, owner)?
        + StreetAddress::delete_for_owner(conn, owner)?
        + SpecialDate::delete_for_owner(conn, owner)?
        + Note::delete_for_owner(conn, owner)?;
    Ok(removed)
}

impl ContactsService {
    /// Form sets pre-filled with the owner's records plus one blank row each.
    pub fn detail_formsets(&self, owner: OwnerRef) -> Result<DetailFormSets, ContactsError> {
        self.read(|conn| {
            require_owner(conn, owner)?;
            DetailFormSets::load(conn, owner)
        })
    }

    /// Validate and save all six form sets of one owner as a unit.
    pub fn save_details(
        &self,
        owner: OwnerRef,
        sets: &DetailFormSets,
    ) -> Result<OwnerDetails, ContactsError> {
        self.write("save details", |conn| {
            let resolved = require_owner(conn, owner)?;
            check_bound_owner(sets, owner)?;

            let mut errors = FormErrors::new();
            let rows = validate_sets(conn, sets, &mut errors)?;
            if !errors.is_empty() {
                return Err(errors.into());
            }

            apply_pending(conn, owner, rows, now())?;
            info!("Saved details of {owner}");
            OwnerDetails::load(conn, resolved)
        })
    }

    /// Company update form and its detail form sets, validated together and
    /// saved in one transaction.
    pub fn update_company_with_details(
        &self,
        id: i32,
        form: &CompanyUpdateForm,
        sets: &DetailFormSets,
    ) -> Result<OwnerDetails, ContactsError> {
        let owner = OwnerRef::company(id);
        self.write("update company", |conn| {
            let company = Company::find(conn, id)?
                .ok_or_else(|| ContactsError::not_found("company", id))?;
            check_bound_owner(sets, owner)?;
            let stamp = now();

            let mut errors = FormErrors::new();
            let changes = match form.clean(conn, &company, stamp) {
                Ok(changes) => Some(changes),
                Err(ContactsError::Invalid(e)) => {
                    errors.fields.merge(e.fields);
                    None
                }
                Err(e) => return Err(e),
            };
            let rows = validate_sets(conn, sets, &mut errors)?;

            let changes = match changes {
                Some(changes) if errors.is_empty() => changes,
                _ => return Err(errors.into()),
            };

            let company = Company::update(conn, id, &changes)?;
            apply_pending(conn, owner, rows, stamp)?;
            info!("Updated company {} with details", company.id);
            OwnerDetails::load(conn, Owner::Company(company))
        })
    }

    /// Person update form and its detail form sets, validated together and
    /// saved in one transaction.
    pub fn update_person_with_details(
        &self,
        id: i32,
        form: &PersonUpdateForm,
        sets: &DetailFormSets,
    ) -> Result<OwnerDetails, ContactsError> {
        let owner = OwnerRef::person(id);
        self.write("update person", |conn| {
            if !Person::exists(conn, id)? {
                return Err(ContactsError::not_found("person", id));
            }
            check_bound_owner(sets, owner)?;
            let stamp = now();

            let mut errors = FormErrors::new();
            let changes = match form.clean(conn, stamp) {
                Ok(changes) => Some(changes),
                Err(ContactsError::Invalid(e)) => {
                    errors.fields.merge(e.fields);
                    None
                }
                Err(e) => return Err(e),
            };
            let rows = validate_sets(conn, sets, &mut errors)?;

            let changes = match changes {
                Some(changes) if errors.is_empty() => changes,
                _ => return Err(errors.into()),
            };

            let person = Person::update(conn, id, &changes)?;
            apply_pending(conn, owner, rows, stamp)?;
            info!("Updated person {} with details", person.id);
            OwnerDetails::load(conn, Owner::Person(person))
        })
    }

    /// Attach one detail record outside of a form set. The same owner and
    /// location checks apply.
    pub fn add_detail<R: DetailRecord>(
        &self,
        owner: OwnerRef,
        values: &R::Values,
    ) -> Result<R, ContactsError> {
        self.write("add detail", |conn| {
            check_write::<R>(conn, owner, values)?;
            let record = R::insert(conn, owner, values, now())?;
            info!("Added {} {} to {owner}", R::KIND, record.id());
            Ok(record)
        })
    }

    pub fn update_detail<R: DetailRecord>(
        &self,
        owner: OwnerRef,
        id: i32,
        values: &R::Values,
    ) -> Result<R, ContactsError> {
        self.write("update detail", |conn| {
            if R::find_for(conn, owner, id)?.is_none() {
                return Err(ContactsError::not_found(R::KIND.as_str(), id));
            }
            check_write::<R>(conn, owner, values)?;
            Ok(R::update(conn, id, values, now())?)
        })
    }

    pub fn delete_detail<R: DetailRecord>(&self, owner: OwnerRef, id: i32) -> Result<(), ContactsError> {
        self.write("delete detail", |conn| {
            if R::find_for(conn, owner, id)?.is_none() {
                return Err(ContactsError::not_found(R::KIND.as_str(), id));
            }
            R::delete(conn, id)?;
            info!("Deleted {} {id} of {owner}", R::KIND);
            Ok(())
        })
    }

    pub fn details_of<R: DetailRecord>(&self, owner: OwnerRef) -> Result<Vec<R>, ContactsError> {
        self.read(|conn| Ok(R::list_for(conn, owner)?))
    }

    /// Every detail list and the notes of one owner.
    pub fn owner_details(&self, owner: OwnerRef) -> Result<OwnerDetails, ContactsError> {
        self.read(|conn| {
            let resolved = require_owner(conn, owner)?;
            OwnerDetails::load(conn, resolved)
        })
    }

    /// The company or person a detail record belongs to.
    pub fn detail_owner<R: DetailRecord>(&self, record: &R) -> Result<Owner, ContactsError> {
        self.read(|conn| require_owner(conn, record.owner()))
    }

    /// Pair records with their locations for display.
    pub fn locate<R: DetailRecord + Summary>(
        &self,
        records: Vec<R>,
    ) -> Result<Vec<Located<R>>, ContactsError> {
        self.read(|conn| {
            let locations = Location::all(conn)?;
            records
                .into_iter()
                .map(|record| {
                    let location_id = record.location_id().unwrap_or_default();
                    let location = locations
                        .iter()
                        .find(|l| l.id == location_id)
                        .cloned()
                        .ok_or_else(|| ContactsError::not_found("location", location_id))?;
                    Ok(Located { record, location })
                })
                .collect()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contacts::models::{EmailAddressValues, PhoneNumberValues};
    use crate::core::shared::test_utils::{add_company, add_person, location, seeded_service};
    use crate::{assert_err, assert_ok};

    #[test]
    fn test_formsets_start_with_blank_rows() {
        let service = seeded_service();
        let acme = add_company(&service, "Acme");
        let sets = assert_ok!(service.detail_formsets(OwnerRef::company(acme.id)));
        assert_eq!(sets.phone_numbers.forms, vec![PhoneNumberForm::default()]);
        assert_eq!(sets.special_dates.forms.len(), 1);

        // Untouched blank rows save nothing.
        let details = assert_ok!(service.save_details(OwnerRef::company(acme.id), &sets));
        assert!(details.phone_numbers.is_empty());
        assert!(details.special_dates.is_empty());
    }

    #[test]
    fn test_save_details_is_all_or_nothing() {
        let service = seeded_service();
        let ada = add_person(&service, "Ada", "Lovelace");
        let owner = OwnerRef::person(ada.id);
        let home = location(&service, "home");
        let mailing = location(&service, "mailing");

        let mut sets = DetailFormSets::empty(owner);
        sets.email_addresses.forms.push(EmailAddressForm {
            email_address: "ada@example.com".to_string(),
            location: Some(home.id),
            ..Default::default()
        });
        sets.phone_numbers.forms.push(PhoneNumberForm {
            phone_number: "555-0100".to_string(),
            location: Some(home.id),
            ..Default::default()
        });
        sets.phone_numbers.forms.push(PhoneNumberForm {
            phone_number: "555-0199".to_string(),
            location: Some(mailing.id),
            ..Default::default()
        });

        let err = assert_err!(service.save_details(owner, &sets));
        let errors = err.form_errors().unwrap();
        assert!(errors.row("phone_number", 1).unwrap().has_error_for("location"));
        assert!(errors.row("phone_number", 0).is_none());
        assert!(assert_ok!(service.details_of::<EmailAddress>(owner)).is_empty());
        assert!(assert_ok!(service.details_of::<PhoneNumber>(owner)).is_empty());

        sets.phone_numbers.forms.pop();
        let details = assert_ok!(service.save_details(owner, &sets));
        assert_eq!(details.phone_numbers.len(), 1);
        assert_eq!(details.email_addresses[0].email_address, "ada@example.com");

        let mut reloaded = assert_ok!(service.detail_formsets(owner));
        assert_eq!(reloaded.phone_numbers.forms.len(), 2);
        reloaded.phone_numbers.forms[0].delete = true;
        reloaded.email_addresses.forms[0].email_address = "countess@example.com".to_string();
        let details = assert_ok!(service.save_details(owner, &reloaded));
        assert!(details.phone_numbers.is_empty());
        assert_eq!(details.email_addresses[0].email_address, "countess@example.com");
    }

    #[test]
    fn test_foreign_row_id_rejected() {
        let service = seeded_service();
        let ada = add_person(&service, "Ada", "Lovelace");
        let grace = add_person(&service, "Grace", "Hopper");
        let work = location(&service, "work");
        let theirs = assert_ok!(service.add_detail::<PhoneNumber>(
            OwnerRef::person(grace.id),
            &PhoneNumberValues {
                phone_number: "555-0100".to_string(),
                location_id: work.id,
            },
        ));

        let owner = OwnerRef::person(ada.id);
        let mut sets = DetailFormSets::empty(owner);
        sets.phone_numbers.forms.push(PhoneNumberForm {
            id: Some(theirs.id),
            phone_number: "555-0111".to_string(),
            location: Some(work.id),
            delete: false,
        });
        let err = assert_err!(service.save_details(owner, &sets));
        assert!(err.form_errors().unwrap().row("phone_number", 0).unwrap().has_error_for("id"));
        assert_eq!(
            assert_ok!(service.details_of::<PhoneNumber>(OwnerRef::person(grace.id)))[0].phone_number,
            "555-0100"
        );

        assert_err!(service.save_details(OwnerRef::person(grace.id), &sets));
    }

    #[test]
    fn test_update_with_details_reports_both() {
        let service = seeded_service();
        let acme = add_company(&service, "Acme");
        let owner = OwnerRef::company(acme.id);
        let mobile = location(&service, "mobile");

        let mut form = CompanyUpdateForm::from_company(&acme);
        form.name = String::new();
        let mut sets = DetailFormSets::empty(owner);
        sets.web_sites.forms.push(WebSiteForm {
            url: "http://acme.example".to_string(),
            location: Some(mobile.id),
            ..Default::default()
        });

        let err = assert_err!(service.update_company_with_details(acme.id, &form, &sets));
        let errors = err.form_errors().unwrap();
        assert!(errors.fields.has_error_for("name"));
        assert!(errors.row("web_site", 0).unwrap().has_error_for("location"));

        form.name = "Acme Corp".to_string();
        sets.web_sites.forms[0].location = Some(location(&service, "work").id);
        let details = assert_ok!(service.update_company_with_details(acme.id, &form, &sets));
        assert_eq!(details.web_sites[0].url, "http://acme.example");
        assert!(matches!(details.owner, Owner::Company(ref c) if c.name == "Acme Corp"));
    }

    #[test]
    fn test_write_path_rechecks_location() {
        let service = seeded_service();
        let acme = add_company(&service, "Acme");
        let owner = OwnerRef::company(acme.id);

        let err = assert_err!(service.add_detail::<EmailAddress>(
            owner,
            &EmailAddressValues {
                email_address: "sales@acme.example".to_string(),
                location_id: location(&service, "fax").id,
            },
        ));
        assert!(err.form_errors().unwrap().fields.has_error_for("location"));

        assert_err!(service.add_detail::<EmailAddress>(
            OwnerRef::person(acme.id + 1000),
            &EmailAddressValues {
                email_address: "sales@acme.example".to_string(),
                location_id: location(&service, "work").id,
            },
        ));

        let email = assert_ok!(service.add_detail::<EmailAddress>(
            owner,
            &EmailAddressValues {
                email_address: "sales@acme.example".to_string(),
                location_id: location(&service, "work").id,
            },
        ));
        assert!(matches!(assert_ok!(service.detail_owner(&email)), Owner::Company(_)));

        let located = assert_ok!(service.locate(vec![email.clone()]));
        assert_eq!(located[0].to_string(), "sales@acme.example (Work)");

        assert_err!(service.delete_detail::<EmailAddress>(OwnerRef::person(1), email.id));
        assert_ok!(service.delete_detail::<EmailAddress>(owner, email.id));
    }
}
