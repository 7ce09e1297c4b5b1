use log::info;

use super::details::delete_owner_records;
use super::ContactsService;
use crate::contacts::error::{map_unique_violation, ContactsError};
use crate::contacts::forms::{CompanyCreateForm, CompanyUpdateForm};
use crate::contacts::models::{Company, Person};
use crate::contacts::owner::OwnerRef;
use crate::core::shared::utils::now;

impl ContactsService {
    pub fn create_company(&self, form: &CompanyCreateForm) -> Result<Company, ContactsError> {
        self.write("create company", |conn| {
            let new = form.clean(conn, now())?;
            let company = Company::insert(conn, &new)
                .map_err(|e| map_unique_violation(e, "name", &new.slug))?;
            info!("Created company {} ({})", company.id, company.slug);
            Ok(company)
        })
    }

    pub fn update_company(
        &self,
        id: i32,
        form: &CompanyUpdateForm,
    ) -> Result<Company, ContactsError> {
        self.write("update company", |conn| {
            let company = Company::find(conn, id)?
                .ok_or_else(|| ContactsError::not_found("company", id))?;
            let changes = form.clean(conn, &company, now())?;
            let company = Company::update(conn, id, &changes)
                .map_err(|e| map_unique_violation(e, "slug", &changes.slug))?;
            info!("Updated company {}", company.id);
            Ok(company)
        })
    }

    pub fn get_company(&self, id: i32) -> Result<Company, ContactsError> {
        self.read(|conn| Company::find(conn, id)?.ok_or_else(|| ContactsError::not_found("company", id)))
    }

    pub fn company_by_slug(&self, slug: &str) -> Result<Company, ContactsError> {
        self.read(|conn| {
            Company::by_slug(conn, slug)?.ok_or_else(|| ContactsError::SlugNotFound {
                entity: "company",
                slug: slug.to_string(),
            })
        })
    }

    /// All companies ordered by name.
    pub fn list_companies(&self) -> Result<Vec<Company>, ContactsError> {
        self.read(|conn| Ok(Company::all(conn)?))
    }

    /// People whose employer is the company.
    pub fn company_people(&self, id: i32) -> Result<Vec<Person>, ContactsError> {
        self.read(|conn| Ok(Person::for_company(conn, id)?))
    }

    /// Delete a company, its details and notes, and the people it employs
    /// together with their details and notes. Group memberships go with the
    /// rows.
    pub fn delete_company(&self, id: i32) -> Result<(), ContactsError> {
        self.write("delete company", |conn| {
            if !Company::exists(conn, id)? {
                return Err(ContactsError::not_found("company", id));
            }
            let employees = Person::ids_for_company(conn, id)?;
            for person_id in &employees {
                delete_owner_records(conn, OwnerRef::person(*person_id))?;
                Person::delete(conn, *person_id)?;
            }
            let removed = delete_owner_records(conn, OwnerRef::company(id))?;
            Company::delete(conn, id)?;
            info!(
                "Deleted company {id} with {removed} detail records and {} people",
                employees.len()
            );
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contacts::models::PhoneNumberValues;
    use crate::contacts::models::{DetailRecord, PhoneNumber};
    use crate::core::shared::test_utils::{add_company, location, seeded_service, test_service};
    use crate::{assert_err, assert_ok};

    #[test]
    fn test_create_company_derives_slug_and_blanks() {
        let service = test_service();
        let company = assert_ok!(service.create_company(&CompanyCreateForm {
            name: "Acme".to_string(),
            nickname: String::new(),
            about: String::new(),
        }));
        assert_eq!(company.slug, "acme");
        assert_eq!(company.nickname, None);
        assert_eq!(company.about, None);
        assert_eq!(company.date_added, company.date_modified);

        let found = assert_ok!(service.company_by_slug("acme"));
        assert_eq!(found, company);
    }

    #[test]
    fn test_duplicate_company_slug_rejected() {
        let service = test_service();
        add_company(&service, "Acme");
        let err = assert_err!(service.create_company(&CompanyCreateForm {
            name: "ACME".to_string(),
            ..Default::default()
        }));
        let fields = &err.form_errors().unwrap().fields;
        assert!(fields.has_error_for("name"));
        assert!(!fields.has_error_for("slug"));
        assert_eq!(assert_ok!(service.list_companies()).len(), 1);
    }

    #[test]
    fn test_update_company_logo_and_slug() {
        let service = test_service();
        let acme = add_company(&service, "Acme");
        let other = add_company(&service, "Other");

        let mut form = CompanyUpdateForm::from_company(&acme);
        form.logo = Some("logo.png".to_string());
        form.nickname = "ACME".to_string();
        let updated = assert_ok!(service.update_company(acme.id, &form));
        assert_eq!(updated.logo, "contacts/companies/logo.png");
        assert_eq!(updated.nickname.as_deref(), Some("ACME"));

        form.logo = None;
        let kept = assert_ok!(service.update_company(acme.id, &form));
        assert_eq!(kept.logo, "contacts/companies/logo.png");

        form.logo = Some(String::new());
        let cleared = assert_ok!(service.update_company(acme.id, &form));
        assert_eq!(cleared.logo, "");

        form.slug = other.slug.clone();
        let err = assert_err!(service.update_company(acme.id, &form));
        assert!(err.form_errors().unwrap().fields.has_error_for("slug"));

        form.slug = "bad slug".to_string();
        let err = assert_err!(service.update_company(acme.id, &form));
        assert!(err.form_errors().unwrap().fields.has_error_for("slug"));
    }

    #[test]
    fn test_delete_company_removes_people_and_details() {
        let service = seeded_service();
        let acme = add_company(&service, "Acme");
        let person = assert_ok!(service.create_person(&crate::contacts::forms::PersonCreateForm {
            first_name: "Wile".to_string(),
            last_name: "Coyote".to_string(),
            company: Some(acme.id),
            ..Default::default()
        }));
        let work = location(&service, "work");
        for owner in [OwnerRef::company(acme.id), OwnerRef::person(person.id)] {
            assert_ok!(service.add_detail::<PhoneNumber>(
                owner,
                &PhoneNumberValues {
                    phone_number: "555-0100".to_string(),
                    location_id: work.id,
                },
            ));
        }

        assert_ok!(service.delete_company(acme.id));
        assert!(service.get_person(person.id).is_err());
        let mut conn = service.pool().get().unwrap();
        assert_eq!(PhoneNumber::count(&mut conn).unwrap(), 0);
    }

    #[test]
    fn test_missing_company() {
        let service = test_service();
        assert!(matches!(
            service.get_company(42),
            Err(ContactsError::NotFound { entity: "company", id: 42 })
        ));
        assert!(matches!(
            service.delete_company(42),
            Err(ContactsError::NotFound { .. })
        ));
    }
}
