use std::{collections::HashSet, hash::Hash};

use thiserror::Error;

use crate::{
    consts::consts::FullName,
    database::utils::date::DateError,
    model::{
        dataset::DataSet, fire_station::FireStation, medical_record::MedicalRecord,
        person::Person,
    },
};

use super::row::Row;

/// How an error should be reported to whoever sent the statement
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum ErrorKind {
    NotFound,
    Conflict,
    InvalidArgument,
    MissingData,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ApplyErrors {
    // CRUD - GET
    #[error("Not found, {entity} does not exist: {key}")]
    CannotGetDoesNotExist { entity: &'static str, key: String },

    // CRUD - CREATE
    #[error("Cannot create, {entity} already exists: {key}")]
    CannotCreateWhenAlreadyExists { entity: &'static str, key: String },

    // CRUD - UPDATE
    #[error("Cannot update, {entity} does not exist: {key}")]
    CannotUpdateDoesNotExist { entity: &'static str, key: String },

    // CRUD - DELETE
    #[error("Cannot delete, {entity} does not exist: {key}")]
    CannotDeleteDoesNotExist { entity: &'static str, key: String },

    // Constraints
    #[error("Cannot update row as another {entity} already exists with this key: {key}")]
    UniqueConstraintViolation { entity: &'static str, key: String },

    #[error("Cannot set field to null: {0}")]
    NotNullConstraintViolation(String),

    #[error("Invalid {field}: {message}")]
    InvalidField { field: &'static str, message: String },

    // Joins
    #[error("Medical record is required but missing for: {0}")]
    MissingMedicalRecord(FullName),

    #[error("Cannot compute the age of {person}: {source}")]
    UnusableBirthdate {
        person: FullName,
        #[source]
        source: DateError,
    },
}

impl ApplyErrors {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ApplyErrors::CannotGetDoesNotExist { .. }
            | ApplyErrors::CannotUpdateDoesNotExist { .. }
            | ApplyErrors::CannotDeleteDoesNotExist { .. } => ErrorKind::NotFound,
            ApplyErrors::CannotCreateWhenAlreadyExists { .. }
            | ApplyErrors::UniqueConstraintViolation { .. } => ErrorKind::Conflict,
            ApplyErrors::NotNullConstraintViolation(_) | ApplyErrors::InvalidField { .. } => {
                ErrorKind::InvalidArgument
            }
            ApplyErrors::MissingMedicalRecord(_) | ApplyErrors::UnusableBirthdate { .. } => {
                ErrorKind::MissingData
            }
        }
    }
}

/// Ordered, in-memory collection of rows with unique natural keys
#[derive(Clone, Debug)]
pub struct Table<R: Row> {
    rows: Vec<R>,
}

impl<R: Row> Default for Table<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Row> Table<R> {
    pub fn new() -> Self {
        Self { rows: Vec::new() }
    }

    /// Keeps the given order, rows are neither validated nor deduplicated
    pub fn from_rows(rows: Vec<R>) -> Self {
        Self { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn list(&self) -> &[R] {
        &self.rows
    }

    pub fn iter(&self) -> std::slice::Iter<'_, R> {
        self.rows.iter()
    }

    pub fn find(&self, key: &R::Key) -> Option<&R> {
        self.position(key).map(|index| &self.rows[index])
    }

    fn position(&self, key: &R::Key) -> Option<usize> {
        self.rows.iter().position(|row| &row.key() == key)
    }

    /// Returns false and leaves the table untouched when the key is already present
    pub fn add(&mut self, row: R) -> bool {
        let key = row.key();

        if self.position(&key).is_some() {
            log::warn!("Cannot add {}, key already exists: {}", R::ENTITY, key);
            return false;
        }

        self.rows.push(row);
        log::info!("Added {}: {}", R::ENTITY, key);

        true
    }

    /// Replaces the whole row in place
    pub fn update(&mut self, key: &R::Key, row: R) -> Result<&R, ApplyErrors> {
        let index = self
            .position(key)
            .ok_or_else(|| ApplyErrors::CannotUpdateDoesNotExist {
                entity: R::ENTITY,
                key: key.to_string(),
            })?;

        let new_key = row.key();

        // Edge case: the replacement may carry a new key, it must not take over another row's key
        if &new_key != key && self.position(&new_key).is_some() {
            return Err(ApplyErrors::UniqueConstraintViolation {
                entity: R::ENTITY,
                key: new_key.to_string(),
            });
        }

        self.rows[index] = row;
        log::info!("Updated {}: {} -> {}", R::ENTITY, key, new_key);

        Ok(&self.rows[index])
    }

    /// Returns false when no row has the key
    pub fn delete(&mut self, key: &R::Key) -> bool {
        match self.position(key) {
            Some(index) => {
                self.rows.remove(index);
                log::info!("Deleted {}: {}", R::ENTITY, key);
                true
            }
            None => {
                log::warn!("Cannot delete {}, key does not exist: {}", R::ENTITY, key);
                false
            }
        }
    }
}

/// The three tables loaded from the data file
#[derive(Clone, Debug, Default)]
pub struct Tables {
    pub persons: Table<Person>,
    pub fire_stations: Table<FireStation>,
    pub medical_records: Table<MedicalRecord>,
}

impl Tables {
    pub fn from_data_set(data_set: DataSet) -> Self {
        Self {
            persons: Table::from_rows(data_set.persons),
            fire_stations: Table::from_rows(data_set.firestations),
            medical_records: Table::from_rows(data_set.medical_records),
        }
    }
}

/// Keeps the first occurrence of every value
pub fn distinct<T, I>(values: I) -> Vec<T>
where
    T: Eq + Hash + Clone,
    I: IntoIterator<Item = T>,
{
    let mut seen = HashSet::new();

    values
        .into_iter()
        .filter(|value| seen.insert(value.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::dataset::test_utils::FIXTURE;

    fn person(first_name: &str, email: &str) -> Person {
        Person::new(
            first_name,
            "Doe",
            "123 Street",
            "City",
            "12345",
            "123-456-7890",
            email,
        )
    }

    fn table() -> Table<Person> {
        Table::from_rows(vec![
            person("John", "john.doe@example.com"),
            person("Jane", "jane.doe@example.com"),
        ])
    }

    mod add {
        use super::*;

        #[test]
        fn add_happy_path() {
            let mut table = table();

            assert!(table.add(person("Jim", "jim.doe@example.com")));
            assert_eq!(table.len(), 3);
            assert_eq!(table.list()[2].first_name, "Jim");
        }

        #[test_log::test]
        fn add_duplicate_key_returns_false() {
            let mut table = table();

            let added = table.add(person("Someone Else", "john.doe@example.com"));

            assert!(!added, "A second row with the same email should be refused");
            assert_eq!(table.len(), 2, "Table size should be unchanged");
            assert_eq!(table.list()[0].first_name, "John");
        }
    }

    mod update {
        use super::*;

        #[test]
        fn update_replaces_in_place() {
            let mut table = table();

            let mut updated = person("John", "john.doe@example.com");
            updated.city = "Culver".to_string();

            let result = table
                .update(&"john.doe@example.com".to_string(), updated.clone())
                .unwrap();

            assert_eq!(result, &updated);
            assert_eq!(table.list()[0], updated, "Position should be preserved");
            assert_eq!(table.len(), 2);
        }

        #[test]
        fn update_can_change_key() {
            let mut table = table();

            table
                .update(
                    &"john.doe@example.com".to_string(),
                    person("John", "john@example.com"),
                )
                .unwrap();

            assert!(table.find(&"john@example.com".to_string()).is_some());
            assert!(table.find(&"john.doe@example.com".to_string()).is_none());
        }

        #[test]
        fn update_missing_key() {
            let mut table = table();

            let result = table.update(
                &"nobody@example.com".to_string(),
                person("Nobody", "nobody@example.com"),
            );

            let error = result.unwrap_err();

            assert_eq!(
                error,
                ApplyErrors::CannotUpdateDoesNotExist {
                    entity: "person",
                    key: "nobody@example.com".to_string()
                }
            );
            assert_eq!(error.kind(), ErrorKind::NotFound);
        }

        #[test]
        fn update_cannot_take_another_rows_key() {
            let mut table = table();

            let result = table.update(
                &"john.doe@example.com".to_string(),
                person("John", "jane.doe@example.com"),
            );

            assert_eq!(result.unwrap_err().kind(), ErrorKind::Conflict);
            assert_eq!(table.list()[0].email, "john.doe@example.com");
        }
    }

    mod delete {
        use super::*;

        #[test]
        fn delete_happy_path() {
            let mut table = table();

            assert!(table.delete(&"john.doe@example.com".to_string()));
            assert_eq!(table.len(), 1);
            assert_eq!(table.list()[0].first_name, "Jane");
        }

        #[test]
        fn delete_missing_key_returns_false() {
            let mut table = table();

            assert!(!table.delete(&"nobody@example.com".to_string()));
            assert_eq!(table.len(), 2);
        }
    }

    mod load {
        use super::*;

        #[test]
        fn tables_list_fixture_rows_in_order() {
            let data_set = DataSet::from_json(FIXTURE).unwrap();

            let tables = Tables::from_data_set(data_set.clone());

            assert_eq!(tables.persons.list(), data_set.persons.as_slice());
            assert_eq!(tables.fire_stations.list(), data_set.firestations.as_slice());
            assert_eq!(
                tables.medical_records.list(),
                data_set.medical_records.as_slice()
            );
        }
    }

    #[test]
    fn distinct_keeps_first_occurrence_order() {
        let values = vec!["b", "a", "b", "c", "a"];

        assert_eq!(distinct(values), vec!["b", "a", "c"]);
    }

    #[test]
    fn error_kind_display() {
        assert_eq!(ErrorKind::InvalidArgument.to_string(), "invalid_argument");
        assert_eq!(ErrorKind::NotFound.to_string(), "not_found");
    }
}
