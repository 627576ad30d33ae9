use std::{
    thread::{self, JoinHandle},
    time::Instant,
};

use chrono::NaiveDate;
use num_format::{Locale, ToFormattedString};

use crate::model::{
    dataset::{DataSet, DataSetError},
    statement::{Statement, StatementResult},
};

use super::{
    aggregation,
    commands::{Control, DatabaseCommand, DatabaseCommandRequest, DatabaseCommandResponse},
    options::DatabaseOptions,
    request_manager::RequestManager,
    table::{
        row::Row,
        table::{ApplyErrors, Table, Tables},
    },
    utils::date,
};

pub struct Database {
    pub tables: Tables,
    database_options: DatabaseOptions,
}

impl Database {
    pub fn new(tables: Tables, options: DatabaseOptions) -> Self {
        Self {
            tables,
            database_options: options,
        }
    }

    pub fn from_data_set(data_set: DataSet, options: DatabaseOptions) -> Self {
        Self::new(Tables::from_data_set(data_set), options)
    }

    /// Reads the data file named in the options, the tables keep the file order
    pub fn load(options: DatabaseOptions) -> Result<Self, DataSetError> {
        log::info!("Data File Location: [{}]", options.data_file.display());

        let now = Instant::now();

        let data_set = DataSet::load(&options.data_file)?;
        let database = Self::from_data_set(data_set, options);

        log::info!(
            "✅ Successful Load [Duration: {}ms]",
            now.elapsed().as_millis(),
        );

        log::info!(
            "📀 Data            [Persons: {}, FireStations: {}, MedicalRecords: {}]",
            database.tables.persons.len().to_formatted_string(&Locale::en),
            database
                .tables
                .fire_stations
                .len()
                .to_formatted_string(&Locale::en),
            database
                .tables
                .medical_records
                .len()
                .to_formatted_string(&Locale::en),
        );

        Ok(database)
    }

    /// Moves the database onto its own thread, every command sent through the returned
    /// request manager is processed one at a time
    pub fn run(self) -> (RequestManager, JoinHandle<()>) {
        let (database_sender, database_receiver) = flume::unbounded::<DatabaseCommandRequest>();

        let request_manager =
            RequestManager::new(database_sender, self.database_options.request_timeout);

        let handle = thread::spawn(move || self.command_loop(database_receiver));

        (request_manager, handle)
    }

    fn command_loop(mut self, database_receiver: flume::Receiver<DatabaseCommandRequest>) {
        // Ends once every request manager has been dropped
        while let Ok(DatabaseCommandRequest { resolver, command }) = database_receiver.recv() {
            log::debug!("Received command: {}", command.log_format());

            let response = match command {
                DatabaseCommand::Statement(statement) => {
                    let is_mutation = statement.is_mutation();
                    let response = self.apply(statement);

                    if let (true, Err(err)) = (is_mutation, &response) {
                        log::warn!("⚠️  Rejected: {}", err);
                    }

                    response
                }
                DatabaseCommand::Control(Control::Shutdown) => {
                    log::info!("🛑 Shutting down database");

                    let _ = resolver.send(Ok(StatementResult::SuccessStatus(
                        "Successfully shutdown database".to_string(),
                    )));

                    return;
                }
            };

            // The caller may have timed out and dropped its receiver
            if resolver.send(response).is_err() {
                log::warn!("Could not send response, requester has gone away");
            }
        }

        log::info!("All request managers dropped, database thread exiting");
    }

    pub fn apply(&mut self, statement: Statement) -> DatabaseCommandResponse {
        self.apply_at(statement, date::today())
    }

    /// Applies a statement using `today` for every age computation
    pub fn apply_at(&mut self, statement: Statement, today: NaiveDate) -> DatabaseCommandResponse {
        let tables = &mut self.tables;

        match statement {
            // Persons
            Statement::ListPersons => Ok(StatementResult::Persons(tables.persons.list().to_vec())),
            Statement::GetPerson(email) => get(&tables.persons, &email).map(StatementResult::Person),
            Statement::AddPerson(person) => {
                add(&mut tables.persons, person).map(StatementResult::Person)
            }
            Statement::UpdatePerson(email, person) => {
                update(&mut tables.persons, &email, person).map(StatementResult::Person)
            }
            Statement::RemovePerson(email) => remove(&mut tables.persons, &email),

            // Fire stations
            Statement::ListFireStations => Ok(StatementResult::FireStations(
                tables.fire_stations.list().to_vec(),
            )),
            Statement::GetFireStations(station) => Ok(StatementResult::FireStations(
                tables
                    .fire_stations
                    .by_station(station)
                    .into_iter()
                    .cloned()
                    .collect(),
            )),
            Statement::AddFireStation(fire_station) => {
                add(&mut tables.fire_stations, fire_station).map(StatementResult::FireStation)
            }
            Statement::UpdateFireStation(key, fire_station) => {
                update(&mut tables.fire_stations, &key, fire_station)
                    .map(StatementResult::FireStation)
            }
            Statement::RemoveFireStation(key) => remove(&mut tables.fire_stations, &key),

            // Medical records
            Statement::ListMedicalRecords => Ok(StatementResult::MedicalRecords(
                tables.medical_records.list().to_vec(),
            )),
            Statement::GetMedicalRecord(name) => {
                get(&tables.medical_records, &name).map(StatementResult::MedicalRecord)
            }
            Statement::AddMedicalRecord(record) => {
                add(&mut tables.medical_records, record).map(StatementResult::MedicalRecord)
            }
            Statement::UpdateMedicalRecord(name, record) => {
                update(&mut tables.medical_records, &name, record)
                    .map(StatementResult::MedicalRecord)
            }
            Statement::RemoveMedicalRecord(name) => remove(&mut tables.medical_records, &name),

            // Alerts
            Statement::CommunityEmail(city) => Ok(StatementResult::Strings(
                aggregation::community_email(tables, &city),
            )),
            Statement::PersonInfo(last_name) => {
                aggregation::person_info_by_last_name(tables, &last_name, today)
                    .map(StatementResult::PersonInfos)
            }
            Statement::Flood(stations) => {
                aggregation::flood(tables, &stations, today).map(StatementResult::StationResidents)
            }
            Statement::Fire(address) => {
                aggregation::fire(tables, &address, today).map(StatementResult::StationResidents)
            }
            Statement::PhoneAlert(station) => Ok(StatementResult::Strings(
                aggregation::phone_alert(tables, station),
            )),
            Statement::ChildAlert(address) => {
                aggregation::child_alert(tables, &address, today).map(StatementResult::ChildAlerts)
            }
            Statement::Coverage(station) => {
                aggregation::coverage_by_station(tables, station, today)
                    .map(StatementResult::Coverage)
            }
        }
    }
}

fn get<R: Row>(table: &Table<R>, key: &R::Key) -> Result<R, ApplyErrors> {
    table
        .find(key)
        .cloned()
        .ok_or_else(|| ApplyErrors::CannotGetDoesNotExist {
            entity: R::ENTITY,
            key: key.to_string(),
        })
}

fn add<R: Row>(table: &mut Table<R>, row: R) -> Result<R, ApplyErrors> {
    row.validate()?;

    if !table.add(row.clone()) {
        return Err(ApplyErrors::CannotCreateWhenAlreadyExists {
            entity: R::ENTITY,
            key: row.key().to_string(),
        });
    }

    Ok(row)
}

fn update<R: Row>(table: &mut Table<R>, key: &R::Key, row: R) -> Result<R, ApplyErrors> {
    row.validate()?;

    table.update(key, row).cloned()
}

fn remove<R: Row>(table: &mut Table<R>, key: &R::Key) -> DatabaseCommandResponse {
    if !table.delete(key) {
        return Err(ApplyErrors::CannotDeleteDoesNotExist {
            entity: R::ENTITY,
            key: key.to_string(),
        });
    }

    Ok(StatementResult::SuccessStatus(format!(
        "Deleted {}: {}",
        R::ENTITY,
        key
    )))
}

pub mod test_utils {
    use crate::model::dataset::{test_utils::FIXTURE, DataSet};

    use super::{Database, DatabaseOptions};

    /// Database holding the fixture rows, not yet running
    pub fn fixture_database() -> Database {
        let data_set = DataSet::from_json(FIXTURE).unwrap_or_default();

        Database::from_data_set(data_set, DatabaseOptions::default())
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::test_utils::fixture_database;
    use super::*;
    use crate::{
        consts::consts::{FireStationKey, FullName, StationNumber},
        database::table::table::ErrorKind,
        model::{fire_station::FireStation, medical_record::MedicalRecord, person::Person},
    };

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 14).unwrap()
    }

    fn new_person() -> Person {
        Person::new(
            "Jane",
            "Doe",
            "123 Street",
            "Culver",
            "97451",
            "841-874-0000",
            "jane.doe@example.com",
        )
    }

    mod persons {
        use super::*;

        #[test]
        fn add_then_get() {
            let mut database = fixture_database();

            let added = database.apply(Statement::AddPerson(new_person()));

            assert_eq!(added, Ok(StatementResult::Person(new_person())));
            assert_eq!(
                database.apply(Statement::GetPerson("jane.doe@example.com".to_string())),
                Ok(StatementResult::Person(new_person()))
            );
        }

        #[test_log::test]
        fn add_existing_email_is_a_conflict() {
            let mut database = fixture_database();
            let mut duplicate = new_person();
            duplicate.email = "drk@email.com".to_string();

            let error = database
                .apply(Statement::AddPerson(duplicate))
                .unwrap_err();

            assert_eq!(error.kind(), ErrorKind::Conflict);
            assert_eq!(database.tables.persons.len(), 5, "Store size should be unchanged");
        }

        #[test]
        fn add_blank_name_is_invalid() {
            let mut database = fixture_database();
            let mut person = new_person();
            person.first_name = "".to_string();

            let error = database.apply(Statement::AddPerson(person)).unwrap_err();

            assert_eq!(error.kind(), ErrorKind::InvalidArgument);
        }

        #[test]
        fn get_missing_is_not_found() {
            let mut database = fixture_database();

            let error = database
                .apply(Statement::GetPerson("nobody@email.com".to_string()))
                .unwrap_err();

            assert_eq!(
                error,
                ApplyErrors::CannotGetDoesNotExist {
                    entity: "person",
                    key: "nobody@email.com".to_string()
                }
            );
        }

        #[test]
        fn update_then_remove() {
            let mut database = fixture_database();
            let mut updated = database.tables.persons.list()[1].clone();
            updated.city = "Springfield".to_string();

            assert_eq!(
                database.apply(Statement::UpdatePerson(
                    "drk@email.com".to_string(),
                    updated.clone()
                )),
                Ok(StatementResult::Person(updated))
            );
            assert_eq!(
                database.apply(Statement::RemovePerson("drk@email.com".to_string())),
                Ok(StatementResult::SuccessStatus(
                    "Deleted person: drk@email.com".to_string()
                ))
            );
            assert_eq!(
                database
                    .apply(Statement::RemovePerson("drk@email.com".to_string()))
                    .unwrap_err()
                    .kind(),
                ErrorKind::NotFound
            );
        }
    }

    mod fire_stations {
        use super::*;

        #[test]
        fn get_by_station_returns_a_list() {
            let mut database = fixture_database();

            assert_eq!(
                database.apply(Statement::GetFireStations(StationNumber(3))),
                Ok(StatementResult::FireStations(vec![FireStation::new(
                    "1509 Culver St",
                    3
                )]))
            );
            assert_eq!(
                database.apply(Statement::GetFireStations(StationNumber(42))),
                Ok(StatementResult::FireStations(vec![]))
            );
        }

        #[test]
        fn station_zero_is_invalid() {
            let mut database = fixture_database();

            let error = database
                .apply(Statement::AddFireStation(FireStation::new("1 Main St", 0)))
                .unwrap_err();

            assert_eq!(error.kind(), ErrorKind::InvalidArgument);
        }

        #[test]
        fn update_missing_mapping_is_not_found() {
            let mut database = fixture_database();

            let error = database
                .apply(Statement::UpdateFireStation(
                    FireStationKey::new("1509 Culver St", StationNumber(9)),
                    FireStation::new("1509 Culver St", 5),
                ))
                .unwrap_err();

            assert_eq!(error.kind(), ErrorKind::NotFound);
        }

        #[test]
        fn remaps_an_address() {
            let mut database = fixture_database();

            database
                .apply(Statement::UpdateFireStation(
                    FireStationKey::new("644 Gershwin Cir", StationNumber(1)),
                    FireStation::new("644 Gershwin Cir", 2),
                ))
                .unwrap();

            assert_eq!(
                database.apply_at(Statement::PhoneAlert(StationNumber(1)), today()),
                Ok(StatementResult::Strings(vec![]))
            );
        }
    }

    mod medical_records {
        use super::*;

        #[test]
        fn remove_missing_record() {
            let mut database = fixture_database();

            let result = database.apply(Statement::RemoveMedicalRecord(FullName::new(
                "Nobody", "Here",
            )));

            assert_eq!(result.unwrap_err().kind(), ErrorKind::NotFound);
            assert_eq!(database.tables.medical_records.len(), 5);
        }

        #[test]
        fn malformed_birthdate_is_invalid() {
            let mut database = fixture_database();

            let error = database
                .apply(Statement::UpdateMedicalRecord(
                    FullName::new("John", "Boyd"),
                    MedicalRecord::new("John", "Boyd", Some("1984-03-06"), &[], &[]),
                ))
                .unwrap_err();

            assert_eq!(error.kind(), ErrorKind::InvalidArgument);
        }

        #[test]
        fn removing_a_record_breaks_the_coverage_report() {
            let mut database = fixture_database();

            database
                .apply(Statement::RemoveMedicalRecord(FullName::new(
                    "Tenley", "Boyd",
                )))
                .unwrap();

            let error = database
                .apply_at(Statement::Coverage(StationNumber(3)), today())
                .unwrap_err();

            assert_eq!(error.kind(), ErrorKind::MissingData);
        }
    }

    mod alerts {
        use super::*;

        #[test]
        fn coverage() {
            let mut database = fixture_database();

            let result = database.apply_at(Statement::Coverage(StationNumber(4)), today());

            let report = match result {
                Ok(StatementResult::Coverage(report)) => report,
                other => panic!("Expected a coverage report, got {:?}", other),
            };

            assert_eq!(report.adult_count, 2);
            assert_eq!(report.children_count, 1);
        }

        #[test]
        fn community_email() {
            let mut database = fixture_database();

            assert_eq!(
                database.apply(Statement::CommunityEmail("Elsewhere".to_string())),
                Ok(StatementResult::Strings(vec!["gramps@email.com".to_string()]))
            );
        }
    }

    mod run {
        use std::time::Duration;

        use super::*;
        use crate::database::request_manager::RequestManagerError;

        #[test_log::test]
        fn serves_requests_until_shutdown() {
            let (request_manager, handle) = fixture_database().run();

            assert_eq!(request_manager.send_list_persons().unwrap().len(), 5);

            request_manager.send_add_person(new_person()).unwrap();
            assert_eq!(request_manager.send_list_persons().unwrap().len(), 6);

            assert_eq!(
                request_manager.send_shutdown_request().unwrap(),
                "Successfully shutdown database"
            );
            handle.join().unwrap();

            assert!(matches!(
                request_manager.send_list_persons(),
                Err(RequestManagerError::DatabaseUnavailable)
            ));
        }

        #[test]
        fn concurrent_adds_are_serialised() {
            let database = Database::new(
                Tables::default(),
                DatabaseOptions::default().set_request_timeout(Duration::from_secs(5)),
            );
            let (request_manager, handle) = database.run();

            let workers: Vec<_> = (0..4)
                .map(|thread_id| {
                    let request_manager = request_manager.clone();

                    thread::spawn(move || {
                        for index in 0..25 {
                            let email = format!("{}-{}@example.com", thread_id, index);
                            let person =
                                Person::new("First", "Last", "Address", "City", "1", "1", &email);

                            request_manager.send_add_person(person).unwrap();
                        }
                    })
                })
                .collect();

            for worker in workers {
                worker.join().unwrap();
            }

            assert_eq!(request_manager.send_list_persons().unwrap().len(), 100);

            request_manager.send_shutdown_request().unwrap();
            handle.join().unwrap();
        }

        #[test]
        fn dropping_every_request_manager_stops_the_thread() {
            let (request_manager, handle) = fixture_database().run();

            drop(request_manager);

            handle.join().unwrap();
        }
    }
}
