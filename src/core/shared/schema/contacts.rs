diesel::table! {
    contacts_companies (id) {
        id -> Integer,
        name -> Varchar,
        nickname -> Nullable<Varchar>,
        slug -> Varchar,
        about -> Nullable<Text>,
        logo -> Varchar,
        date_added -> Timestamp,
        date_modified -> Timestamp,
    }
}

diesel::table! {
    contacts_people (id) {
        id -> Integer,
        first_name -> Varchar,
        last_name -> Varchar,
        middle_name -> Nullable<Varchar>,
        suffix -> Nullable<Varchar>,
        nickname -> Varchar,
        slug -> Varchar,
        title -> Varchar,
        company_id -> Nullable<Integer>,
        about -> Text,
        photo -> Varchar,
        user_id -> Nullable<Integer>,
        date_added -> Timestamp,
        date_modified -> Timestamp,
    }
}

diesel::table! {
    contacts_groups (id) {
        id -> Integer,
        name -> Varchar,
        slug -> Varchar,
        about -> Text,
        date_added -> Timestamp,
        date_modified -> Timestamp,
    }
}

diesel::table! {
    contacts_groups_people (id) {
        id -> Integer,
        group_id -> Integer,
        person_id -> Integer,
    }
}

diesel::table! {
    contacts_groups_companies (id) {
        id -> Integer,
        group_id -> Integer,
        company_id -> Integer,
    }
}

diesel::table! {
    contacts_locations (id) {
        id -> Integer,
        name -> Varchar,
        slug -> Varchar,
        is_phone -> Bool,
        is_street_address -> Bool,
        weight -> Integer,
        date_added -> Timestamp,
        date_modified -> Timestamp,
    }
}

diesel::table! {
    contacts_phone_numbers (id) {
        id -> Integer,
        owner_kind -> Varchar,
        owner_id -> Integer,
        phone_number -> Varchar,
        location_id -> Integer,
        date_added -> Timestamp,
        date_modified -> Timestamp,
    }
}

diesel::table! {
    contacts_email_addresses (id) {
        id -> Integer,
        owner_kind -> Varchar,
        owner_id -> Integer,
        email_address -> Varchar,
        location_id -> Integer,
        date_added -> Timestamp,
        date_modified -> Timestamp,
    }
}

diesel::table! {
    contacts_instant_messengers (id) {
        id -> Integer,
        owner_kind -> Varchar,
        owner_id -> Integer,
        im_account -> Varchar,
        location_id -> Integer,
        service -> Varchar,
        date_added -> Timestamp,
        date_modified -> Timestamp,
    }
}

diesel::table! {
    contacts_web_sites (id) {
        id -> Integer,
        owner_kind -> Varchar,
        owner_id -> Integer,
        url -> Varchar,
        location_id -> Integer,
        date_added -> Timestamp,
        date_modified -> Timestamp,
    }
}

diesel::table! {
    contacts_street_addresses (id) {
        id -> Integer,
        owner_kind -> Varchar,
        owner_id -> Integer,
        street -> Text,
        city -> Varchar,
        province -> Varchar,
        postal_code -> Varchar,
        country -> Varchar,
        location_id -> Integer,
        date_added -> Timestamp,
        date_modified -> Timestamp,
    }
}

diesel::table! {
    contacts_special_dates (id) {
        id -> Integer,
        owner_kind -> Varchar,
        owner_id -> Integer,
        occasion -> Text,
        date -> Date,
        every_year -> Bool,
        date_added -> Timestamp,
        date_modified -> Timestamp,
    }
}

diesel::table! {
    contacts_notes (id) {
        id -> Integer,
        owner_kind -> Varchar,
        owner_id -> Integer,
        comment -> Text,
        submitted_by -> Nullable<Integer>,
        submit_date -> Timestamp,
    }
}

diesel::joinable!(contacts_people -> contacts_companies (company_id));
diesel::joinable!(contacts_groups_people -> contacts_groups (group_id));
diesel::joinable!(contacts_groups_people -> contacts_people (person_id));
diesel::joinable!(contacts_groups_companies -> contacts_groups (group_id));
diesel::joinable!(contacts_groups_companies -> contacts_companies (company_id));
diesel::joinable!(contacts_phone_numbers -> contacts_locations (location_id));
diesel::joinable!(contacts_email_addresses -> contacts_locations (location_id));
diesel::joinable!(contacts_instant_messengers -> contacts_locations (location_id));
diesel::joinable!(contacts_web_sites -> contacts_locations (location_id));
diesel::joinable!(contacts_street_addresses -> contacts_locations (location_id));

diesel::allow_tables_to_appear_in_same_query!(
    contacts_companies,
    contacts_people,
    contacts_groups,
    contacts_groups_people,
    contacts_groups_companies,
    contacts_locations,
    contacts_phone_numbers,
    contacts_email_addresses,
    contacts_instant_messengers,
    contacts_web_sites,
    contacts_street_addresses,
    contacts_special_dates,
    contacts_notes,
);
