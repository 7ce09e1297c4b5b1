use log::{info, trace};
use serde::Serialize;

use crate::contacts::error::ContactsError;
use crate::contacts::models::{
    Company, DetailRecord, EmailAddress, Group, InstantMessenger, Location, Note, Person,
    PhoneNumber, SpecialDate, StreetAddress, WebSite,
};
use crate::contacts::ContactsService;
use crate::core::config::ContactsConfig;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableCount {
    pub table: &'static str,
    pub rows: i64,
}

/// Brings a store up from configuration: pool, migrations, stock data.
#[derive(Debug)]
pub struct BootstrapManager {
    config: ContactsConfig,
}

impl BootstrapManager {
    pub fn new(config: ContactsConfig) -> Self {
        trace!("Initializing BootstrapManager for {}", config.database.url);
        Self { config }
    }

    pub fn config(&self) -> &ContactsConfig {
        &self.config
    }

    /// Open the store. Migrations run when `database.run_migrations` is set;
    /// default locations are seeded when `bootstrap.seed_locations` is set.
    pub fn start(&self) -> Result<ContactsService, ContactsError> {
        let service = ContactsService::from_config(&self.config)?;
        if self.config.bootstrap.seed_locations {
            let added = service.seed_default_locations()?;
            info!("Bootstrap seeded {added} locations");
        }
        info!("Contacts store ready at {}", self.config.database.url);
        Ok(service)
    }
}

/// Row count of every contacts table.
pub fn table_counts(service: &ContactsService) -> Result<Vec<TableCount>, ContactsError> {
    let mut conn = service.pool().get()?;
    let conn = &mut *conn;
    let count = |table: &'static str, rows: i64| TableCount { table, rows };
    Ok(vec![
        count("contacts_companies", Company::count(conn)?),
        count("contacts_people", Person::count(conn)?),
        count("contacts_groups", Group::count(conn)?),
        count("contacts_locations", Location::count(conn)?),
        count("contacts_phone_numbers", PhoneNumber::count(conn)?),
        count("contacts_email_addresses", EmailAddress::count(conn)?),
        count("contacts_instant_messengers", InstantMessenger::count(conn)?),
        count("contacts_web_sites", WebSite::count(conn)?),
        count("contacts_street_addresses", StreetAddress::count(conn)?),
        count("contacts_special_dates", SpecialDate::count(conn)?),
        count("contacts_notes", Note::count(conn)?),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contacts::service::DEFAULT_LOCATIONS;

    #[test]
    fn test_start_seeds_when_configured() {
        let mut config = ContactsConfig::in_memory();
        config.bootstrap.seed_locations = true;
        let service = BootstrapManager::new(config).start().expect("start");

        let locations = service.list_locations().expect("locations");
        assert_eq!(locations.len(), DEFAULT_LOCATIONS.len());
        assert_eq!(service.seed_default_locations().expect("reseed"), 0);

        let counts = table_counts(&service).expect("counts");
        let locations_row = counts
            .iter()
            .find(|c| c.table == "contacts_locations")
            .expect("locations row");
        assert_eq!(locations_row.rows, DEFAULT_LOCATIONS.len() as i64);
        assert_eq!(counts.len(), 11);
    }

    #[test]
    fn test_start_without_seeding() {
        let service = BootstrapManager::new(ContactsConfig::in_memory())
            .start()
            .expect("start");
        assert!(service.list_locations().expect("locations").is_empty());
    }
}
