use crate::contacts::forms::{CompanyCreateForm, LocationForm, PersonCreateForm};
use crate::contacts::models::{Company, Location, Person};
use crate::contacts::ContactsService;
use crate::core::config::ContactsConfig;
use crate::tests::test_util::setup;

/// A service over a fresh, migrated in-memory database.
pub fn test_service() -> ContactsService {
    setup();
    ContactsService::from_config(&ContactsConfig::in_memory()).expect("in-memory store")
}

/// A service with the default locations already seeded.
pub fn seeded_service() -> ContactsService {
    let service = test_service();
    service.seed_default_locations().expect("seed locations");
    service
}

pub fn location(service: &ContactsService, slug: &str) -> Location {
    service
        .list_locations()
        .expect("locations")
        .into_iter()
        .find(|l| l.slug == slug)
        .unwrap_or_else(|| panic!("no location {slug}"))
}

pub fn add_location(
    service: &ContactsService,
    name: &str,
    is_phone: bool,
    is_street_address: bool,
) -> Location {
    service
        .create_location(&LocationForm {
            name: name.to_string(),
            is_phone,
            is_street_address,
            ..Default::default()
        })
        .expect("create location")
}

pub fn add_company(service: &ContactsService, name: &str) -> Company {
    service
        .create_company(&CompanyCreateForm {
            name: name.to_string(),
            ..Default::default()
        })
        .expect("create company")
}

pub fn add_person(service: &ContactsService, first: &str, last: &str) -> Person {
    service
        .create_person(&PersonCreateForm {
            first_name: first.to_string(),
            last_name: last.to_string(),
            ..Default::default()
        })
        .expect("create person")
}
