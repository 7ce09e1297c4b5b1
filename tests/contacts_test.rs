#[cfg(test)]
mod contacts_integration_tests {
    use chrono::NaiveDate;
    use contacts::contacts::forms::{
        CompanyCreateForm, GroupCreateForm, GroupUpdateForm, InstantMessengerForm, LocationForm,
        PersonCreateForm, StreetAddressForm,
    };
    use contacts::contacts::models::{
        DetailRecord, EmailAddress, EmailAddressValues, InstantMessenger, PhoneNumber,
        PhoneNumberValues, SpecialDate, SpecialDateValues, StreetAddress, StreetAddressValues,
        WebSite, WebSiteValues,
    };
    use contacts::contacts::service::DetailFormSets;
    use contacts::contacts::OwnerRef;
    use contacts::core::bootstrap::{table_counts, BootstrapManager};
    use contacts::{ContactsConfig, ContactsError, ContactsService};

    fn service() -> ContactsService {
        let mut config = ContactsConfig::in_memory();
        config.bootstrap.seed_locations = true;
        BootstrapManager::new(config).start().expect("start store")
    }

    fn location_id(service: &ContactsService, slug: &str) -> i32 {
        service
            .list_locations()
            .expect("locations")
            .into_iter()
            .find(|l| l.slug == slug)
            .map(|l| l.id)
            .expect("seeded location")
    }

    fn company(service: &ContactsService, name: &str) -> i32 {
        service
            .create_company(&CompanyCreateForm {
                name: name.to_string(),
                ..Default::default()
            })
            .expect("create company")
            .id
    }

    fn person(service: &ContactsService, first: &str, last: &str) -> i32 {
        service
            .create_person(&PersonCreateForm {
                first_name: first.to_string(),
                last_name: last.to_string(),
                ..Default::default()
            })
            .expect("create person")
            .id
    }

    fn has_field_error(err: &ContactsError, field: &str) -> bool {
        err.form_errors()
            .map(|e| e.fields.has_error_for(field))
            .unwrap_or(false)
    }

    #[test]
    fn test_company_retrievable_by_slug() {
        let service = service();
        let id = company(&service, "Acme");
        let found = service.company_by_slug("acme").expect("by slug");
        assert_eq!(found.id, id);
        assert_eq!(found.to_string(), "Acme");
        assert!(matches!(
            service.company_by_slug("missing"),
            Err(ContactsError::SlugNotFound { .. })
        ));
    }

    #[test]
    fn test_duplicate_slugs_rejected_for_every_entity() {
        let service = service();
        company(&service, "Acme");
        let err = service
            .create_company(&CompanyCreateForm {
                name: "acme".to_string(),
                ..Default::default()
            })
            .unwrap_err();
        assert!(has_field_error(&err, "name"));

        person(&service, "Ada", "Lovelace");
        let err = service
            .create_person(&PersonCreateForm {
                first_name: "ADA".to_string(),
                last_name: "Lovelace".to_string(),
                ..Default::default()
            })
            .unwrap_err();
        assert!(has_field_error(&err, "last_name"));

        let group = GroupCreateForm {
            name: "Friends".to_string(),
            about: String::new(),
        };
        service.create_group(&group).expect("first group");
        assert!(has_field_error(&service.create_group(&group).unwrap_err(), "name"));

        let err = service
            .create_location(&LocationForm {
                name: "Work".to_string(),
                ..Default::default()
            })
            .unwrap_err();
        assert!(has_field_error(&err, "slug"));
    }

    #[test]
    fn test_person_without_first_name_creates_nothing() {
        let service = service();
        let err = service
            .create_person(&PersonCreateForm {
                last_name: "Hopper".to_string(),
                ..Default::default()
            })
            .unwrap_err();
        assert!(has_field_error(&err, "first_name"));
        assert!(err.is_user_error());
        assert!(service.list_people().expect("people").is_empty());
    }

    #[test]
    fn test_person_fullname() {
        let service = service();
        let id = person(&service, "Grace", "Hopper");
        let grace = service.get_person(id).expect("person");
        assert_eq!(grace.fullname(), "Grace Hopper");
        assert_eq!(grace.to_string(), "Grace Hopper");
    }

    #[test]
    fn test_location_rules_on_write() {
        let service = service();
        let owner = OwnerRef::company(company(&service, "Acme"));
        let mobile = location_id(&service, "mobile");
        let mailing = location_id(&service, "mailing");

        let err = service
            .add_detail::<PhoneNumber>(
                owner,
                &PhoneNumberValues {
                    phone_number: "555-0100".to_string(),
                    location_id: mailing,
                },
            )
            .unwrap_err();
        assert!(has_field_error(&err, "location"));

        let err = service
            .add_detail::<EmailAddress>(
                owner,
                &EmailAddressValues {
                    email_address: "info@acme.example".to_string(),
                    location_id: mobile,
                },
            )
            .unwrap_err();
        assert!(has_field_error(&err, "location"));

        let err = service
            .add_detail::<WebSite>(
                owner,
                &WebSiteValues {
                    url: "http://acme.example".to_string(),
                    location_id: mailing,
                },
            )
            .unwrap_err();
        assert!(has_field_error(&err, "location"));

        let err = service
            .add_detail::<StreetAddress>(
                owner,
                &StreetAddressValues {
                    street: "1 Desert Road".to_string(),
                    city: "Mesa".to_string(),
                    province: "AZ".to_string(),
                    postal_code: "85201".to_string(),
                    country: "USA".to_string(),
                    location_id: mobile,
                },
            )
            .unwrap_err();
        assert!(has_field_error(&err, "location"));

        service
            .add_detail::<PhoneNumber>(
                owner,
                &PhoneNumberValues {
                    phone_number: "555-0100".to_string(),
                    location_id: mobile,
                },
            )
            .expect("phone on a phone location");
        service
            .add_detail::<StreetAddress>(
                owner,
                &StreetAddressValues {
                    street: "1 Desert Road".to_string(),
                    city: "Mesa".to_string(),
                    province: "AZ".to_string(),
                    postal_code: "85201".to_string(),
                    country: "USA".to_string(),
                    location_id: mailing,
                },
            )
            .expect("street address on a mailing location");
    }

    #[test]
    fn test_instant_messenger_rows() {
        let service = service();
        let owner = OwnerRef::person(person(&service, "Ada", "Lovelace"));
        let work = location_id(&service, "work");
        let fax = location_id(&service, "fax");

        let mut sets = DetailFormSets::empty(owner);
        sets.instant_messengers.forms.push(InstantMessengerForm {
            im_account: "ada".to_string(),
            service: "carrier-pigeon".to_string(),
            location: Some(work),
            ..Default::default()
        });
        sets.instant_messengers.forms.push(InstantMessengerForm {
            im_account: "ada".to_string(),
            service: "jabber".to_string(),
            location: Some(fax),
            ..Default::default()
        });
        let err = service.save_details(owner, &sets).unwrap_err();
        let errors = err.form_errors().expect("form errors");
        assert!(errors.row("instant_messenger", 0).unwrap().has_error_for("service"));
        assert!(errors.row("instant_messenger", 1).unwrap().has_error_for("location"));

        sets.instant_messengers.forms[0].service = "skype".to_string();
        sets.instant_messengers.forms[1].location = Some(work);
        let details = service.save_details(owner, &sets).expect("save");
        assert_eq!(details.instant_messengers.len(), 2);
        assert_eq!(service.details_of::<InstantMessenger>(owner).unwrap().len(), 2);
    }

    #[test]
    fn test_formset_with_one_bad_row_writes_nothing() {
        let service = service();
        let owner = OwnerRef::company(company(&service, "Acme"));
        let work = location_id(&service, "work");

        let mut sets = DetailFormSets::empty(owner);
        sets.street_addresses.forms.push(StreetAddressForm {
            street: "1 Desert Road".to_string(),
            city: "Mesa".to_string(),
            province: "AZ".to_string(),
            postal_code: "85201".to_string(),
            country: "USA".to_string(),
            location: Some(work),
            ..Default::default()
        });
        sets.street_addresses.forms.push(StreetAddressForm {
            street: "2 Desert Road".to_string(),
            location: Some(work),
            ..Default::default()
        });

        let err = service.save_details(owner, &sets).unwrap_err();
        let errors = err.form_errors().expect("form errors");
        assert!(errors.row("street_address", 0).is_none());
        assert!(errors.row("street_address", 1).unwrap().has_error_for("country"));
        assert!(service.details_of::<StreetAddress>(owner).unwrap().is_empty());
    }

    #[test]
    fn test_deleting_owner_removes_details() {
        let service = service();
        let id = person(&service, "Ada", "Lovelace");
        let owner = OwnerRef::person(id);
        service
            .add_detail::<EmailAddress>(
                owner,
                &EmailAddressValues {
                    email_address: "ada@example.com".to_string(),
                    location_id: location_id(&service, "home"),
                },
            )
            .expect("email");
        service.add_note(owner, "First programmer", None).expect("note");

        service.delete_person(id).expect("delete");
        assert!(service.details_of::<EmailAddress>(owner).unwrap().is_empty());
        assert!(service.list_notes(owner).unwrap().is_empty());
        assert!(matches!(
            service.owner_details(owner),
            Err(ContactsError::NotFound { .. })
        ));
    }

    #[test]
    fn test_deleting_location_removes_its_details() {
        let service = service();
        let owner = OwnerRef::company(company(&service, "Acme"));
        let cabin = service
            .create_location(&LocationForm {
                name: "Cabin".to_string(),
                weight: 7,
                ..Default::default()
            })
            .expect("location");
        service
            .add_detail::<PhoneNumber>(
                owner,
                &PhoneNumberValues {
                    phone_number: "555-0142".to_string(),
                    location_id: cabin.id,
                },
            )
            .expect("phone");

        service.delete_location(cabin.id).expect("delete location");
        assert!(service.details_of::<PhoneNumber>(owner).unwrap().is_empty());
    }

    #[test]
    fn test_company_delete_cascades_to_employees() {
        let service = service();
        let acme = company(&service, "Acme");
        let wile = service
            .create_person(&PersonCreateForm {
                first_name: "Wile".to_string(),
                last_name: "Coyote".to_string(),
                company: Some(acme),
                ..Default::default()
            })
            .expect("employee")
            .id;
        let other = person(&service, "Road", "Runner");

        service.delete_company(acme).expect("delete company");
        assert!(service.get_person(wile).is_err());
        assert!(service.get_person(other).is_ok());
    }

    #[test]
    fn test_group_membership() {
        let service = service();
        let ada = person(&service, "Ada", "Lovelace");
        let acme = company(&service, "Acme");
        let group = service
            .create_group(&GroupCreateForm {
                name: "Customers".to_string(),
                about: String::new(),
            })
            .expect("group");
        service
            .update_group(
                group.id,
                &GroupUpdateForm {
                    name: group.name.clone(),
                    about: String::new(),
                    people: vec![ada],
                    companies: vec![acme],
                },
            )
            .expect("members");

        let members = service.group_members(group.id).expect("members");
        assert_eq!(members.people.len(), 1);
        assert_eq!(members.companies[0].id, acme);

        service.delete_company(acme).expect("delete company");
        let members = service.group_members(group.id).expect("members");
        assert!(members.companies.is_empty());
        assert_eq!(members.people.len(), 1);
    }

    #[test]
    fn test_user_account_links_one_person() {
        let service = service();
        let ada = person(&service, "Ada", "Lovelace");
        let grace = person(&service, "Grace", "Hopper");
        service.link_user(ada, Some(1)).expect("link");
        let err = service.link_user(grace, Some(1)).unwrap_err();
        assert!(has_field_error(&err, "user"));
        assert_eq!(service.person_for_user(1).unwrap().map(|p| p.id), Some(ada));
    }

    #[test]
    fn test_recurring_special_dates_in_range() {
        let service = service();
        let owner = OwnerRef::person(person(&service, "Ada", "Lovelace"));
        let day = |y, m, d| NaiveDate::from_ymd_opt(y, m, d).unwrap();
        for (occasion, date, every_year) in [
            ("Birthday", day(1990, 3, 10), true),
            ("Launch", day(2024, 3, 5), false),
            ("Anniversary", day(2025, 3, 20), false),
        ] {
            service
                .add_detail::<SpecialDate>(
                    owner,
                    &SpecialDateValues {
                        occasion: occasion.to_string(),
                        date,
                        every_year,
                    },
                )
                .expect("special date");
        }

        let found = service
            .special_dates_between(day(2025, 3, 1), day(2025, 3, 31))
            .expect("range");
        let seen: Vec<(NaiveDate, &str)> = found
            .iter()
            .map(|o| (o.on, o.special_date.occasion.as_str()))
            .collect();
        assert_eq!(
            seen,
            vec![(day(2025, 3, 10), "Birthday"), (day(2025, 3, 20), "Anniversary")]
        );

        let upcoming = service.upcoming_special_dates(day(2026, 3, 3), 7).expect("upcoming");
        assert_eq!(upcoming.len(), 1);
        assert_eq!(upcoming[0].on, day(2026, 3, 10));
    }

    #[test]
    fn test_file_database_persists_between_services() {
        let dir = tempfile::tempdir().expect("temp dir");
        let mut config = ContactsConfig::in_memory();
        config.database.url = dir.path().join("contacts.db").to_string_lossy().into_owned();
        config.database.pool_size = 2;

        {
            let service = ContactsService::from_config(&config).expect("open");
            company(&service, "Acme");
        }

        let service = ContactsService::from_config(&config).expect("reopen");
        assert_eq!(service.company_by_slug("acme").expect("persisted").name, "Acme");
        let counts = table_counts(&service).expect("counts");
        let companies = counts
            .iter()
            .find(|c| c.table == "contacts_companies")
            .expect("companies row");
        assert_eq!(companies.rows, 1);
        let mut conn = service.pool().get().expect("conn");
        assert_eq!(PhoneNumber::count(&mut conn).expect("count"), 0);
    }
}
