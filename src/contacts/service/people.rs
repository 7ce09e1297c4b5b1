use log::info;

use super::details::delete_owner_records;
use super::ContactsService;
use crate::contacts::error::{map_unique_violation, ContactsError};
use crate::contacts::forms::{duplicate, PersonCreateForm, PersonUpdateForm};
use crate::contacts::models::Person;
use crate::contacts::owner::OwnerRef;
use crate::core::shared::utils::now;
use crate::core::validation::ValidationResult;

impl ContactsService {
    pub fn create_person(&self, form: &PersonCreateForm) -> Result<Person, ContactsError> {
        self.write("create person", |conn| {
            let new = form.clean(conn, now())?;
            let person = Person::insert(conn, &new)
                .map_err(|e| map_unique_violation(e, "last_name", &new.slug))?;
            info!("Created person {} ({})", person.id, person.slug);
            Ok(person)
        })
    }

    pub fn update_person(&self, id: i32, form: &PersonUpdateForm) -> Result<Person, ContactsError> {
        self.write("update person", |conn| {
            if !Person::exists(conn, id)? {
                return Err(ContactsError::not_found("person", id));
            }
            let changes = form.clean(conn, now())?;
            let person = Person::update(conn, id, &changes)?;
            info!("Updated person {}", person.id);
            Ok(person)
        })
    }

    pub fn get_person(&self, id: i32) -> Result<Person, ContactsError> {
        self.read(|conn| Person::find(conn, id)?.ok_or_else(|| ContactsError::not_found("person", id)))
    }

    pub fn person_by_slug(&self, slug: &str) -> Result<Person, ContactsError> {
        self.read(|conn| {
            Person::by_slug(conn, slug)?.ok_or_else(|| ContactsError::SlugNotFound {
                entity: "person",
                slug: slug.to_string(),
            })
        })
    }

    /// All people ordered by last then first name.
    pub fn list_people(&self) -> Result<Vec<Person>, ContactsError> {
        self.read(|conn| Ok(Person::all(conn)?))
    }

    /// The person linked to a user account, if any.
    pub fn person_for_user(&self, user_id: i32) -> Result<Option<Person>, ContactsError> {
        self.read(|conn| Ok(Person::by_user(conn, user_id)?))
    }

    /// Link a person to a user account, or unlink with `None`. A user account
    /// belongs to at most one person.
    pub fn link_user(&self, id: i32, user_id: Option<i32>) -> Result<Person, ContactsError> {
        self.write("link user", |conn| {
            if !Person::exists(conn, id)? {
                return Err(ContactsError::not_found("person", id));
            }
            if let Some(user_id) = user_id {
                if let Some(other) = Person::by_user(conn, user_id)? {
                    if other.id != id {
                        return Err(
                            ValidationResult::from(duplicate("user", &user_id.to_string())).into()
                        );
                    }
                }
            }
            let person = Person::set_user(conn, id, user_id, now())
                .map_err(|e| map_unique_violation(e, "user", &format!("{user_id:?}")))?;
            info!("Person {id} linked to user {user_id:?}");
            Ok(person)
        })
    }

    /// Delete a person with their details and notes.
    pub fn delete_person(&self, id: i32) -> Result<(), ContactsError> {
        self.write("delete person", |conn| {
            if !Person::exists(conn, id)? {
                return Err(ContactsError::not_found("person", id));
            }
            let removed = delete_owner_records(conn, OwnerRef::person(id))?;
            Person::delete(conn, id)?;
            info!("Deleted person {id} with {removed} detail records");
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::shared::test_utils::{add_company, add_person, test_service};
    use crate::{assert_err, assert_ok};

    #[test]
    fn test_create_person_requires_first_name() {
        let service = test_service();
        let err = assert_err!(service.create_person(&PersonCreateForm {
            last_name: "Lovelace".to_string(),
            ..Default::default()
        }));
        assert!(err.form_errors().unwrap().fields.has_error_for("first_name"));
        assert!(assert_ok!(service.list_people()).is_empty());
    }

    #[test]
    fn test_same_name_reported_on_last_name() {
        let service = test_service();
        add_person(&service, "John", "Smith");
        let err = assert_err!(service.create_person(&PersonCreateForm {
            first_name: "John".to_string(),
            last_name: "Smith".to_string(),
            ..Default::default()
        }));
        let fields = &err.form_errors().unwrap().fields;
        assert!(fields.has_error_for("last_name"));
        assert!(!fields.has_error_for("slug"));
        assert_eq!(assert_ok!(service.list_people()).len(), 1);
    }

    #[test]
    fn test_create_person_with_company() {
        let service = test_service();
        let company = add_company(&service, "Analytical Engines");
        let person = assert_ok!(service.create_person(&PersonCreateForm {
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            title: "Programmer".to_string(),
            company: Some(company.id),
            about: String::new(),
        }));
        assert_eq!(person.slug, "ada-lovelace");
        assert_eq!(person.fullname(), "Ada Lovelace");
        assert_eq!(person.company_id, Some(company.id));
        assert_eq!(assert_ok!(service.company_people(company.id)), vec![person]);

        let err = assert_err!(service.create_person(&PersonCreateForm {
            first_name: "Charles".to_string(),
            last_name: "Babbage".to_string(),
            company: Some(999),
            ..Default::default()
        }));
        assert!(err.form_errors().unwrap().fields.has_error_for("company"));
    }

    #[test]
    fn test_update_person_recomputes_fullname() {
        let service = test_service();
        let person = add_person(&service, "Ada", "Byron");
        let mut form = PersonUpdateForm::from_person(&person);
        form.last_name = "Lovelace".to_string();
        let updated = assert_ok!(service.update_person(person.id, &form));
        assert_eq!(updated.fullname(), "Ada Lovelace");
        assert_eq!(updated.slug, person.slug);
    }

    #[test]
    fn test_people_ordered_by_last_then_first_name() {
        let service = test_service();
        add_person(&service, "Grace", "Hopper");
        add_person(&service, "Ada", "Lovelace");
        add_person(&service, "Alan", "Hopper");
        let names: Vec<String> = assert_ok!(service.list_people())
            .iter()
            .map(Person::fullname)
            .collect();
        assert_eq!(names, vec!["Alan Hopper", "Grace Hopper", "Ada Lovelace"]);
    }

    #[test]
    fn test_user_links_one_person() {
        let service = test_service();
        let ada = add_person(&service, "Ada", "Lovelace");
        let grace = add_person(&service, "Grace", "Hopper");

        let linked = assert_ok!(service.link_user(ada.id, Some(7)));
        assert_eq!(linked.user_id, Some(7));
        assert_eq!(assert_ok!(service.person_for_user(7)).map(|p| p.id), Some(ada.id));
        assert_ok!(service.link_user(ada.id, Some(7)));

        let err = assert_err!(service.link_user(grace.id, Some(7)));
        assert!(err.form_errors().unwrap().fields.has_error_for("user"));

        assert_ok!(service.link_user(ada.id, None));
        assert_ok!(service.link_user(grace.id, Some(7)));
    }
}
