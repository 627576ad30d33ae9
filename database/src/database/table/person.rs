use crate::model::person::Person;

use super::{
    row::{require_not_blank, Row},
    table::{distinct, ApplyErrors, Table},
};

pub type PersonTable = Table<Person>;

impl Row for Person {
    type Key = String;

    const ENTITY: &'static str = "person";

    fn key(&self) -> Self::Key {
        self.email.clone()
    }

    fn validate(&self) -> Result<(), ApplyErrors> {
        require_not_blank("email", &self.email)?;
        require_not_blank("firstName", &self.first_name)?;
        require_not_blank("lastName", &self.last_name)
    }
}

impl Table<Person> {
    pub fn get_by_email(&self, email: &str) -> Option<&Person> {
        self.iter().find(|person| person.email == email)
    }

    #[tracing::instrument(skip(self))]
    pub fn emails_by_city(&self, city: &str) -> Vec<String> {
        distinct(
            self.iter()
                .filter(|person| person.city == city)
                .map(|person| person.email.clone()),
        )
    }

    pub fn by_last_name(&self, last_name: &str) -> Vec<&Person> {
        self.iter()
            .filter(|person| person.last_name == last_name)
            .collect()
    }

    pub fn by_address(&self, address: &str) -> Vec<&Person> {
        self.iter()
            .filter(|person| person.address == address)
            .collect()
    }

    /// Distinct phones of the whole table whenever `persons` is not empty, the subset
    /// itself is not used to filter. Alert clients depend on this behaviour
    #[tracing::instrument(skip_all, fields(persons = persons.len()))]
    pub fn phones_for(&self, persons: &[&Person]) -> Vec<String> {
        if persons.is_empty() {
            return vec![];
        }

        distinct(self.iter().map(|person| person.phone.clone()))
    }
}
