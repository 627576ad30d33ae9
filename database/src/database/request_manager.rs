use std::time::Duration;

use thiserror::Error;

use crate::{
    consts::consts::{FireStationKey, FullName, StationNumber},
    model::{
        fire_station::FireStation,
        medical_record::MedicalRecord,
        person::Person,
        report::{ChildAlert, CoverageReport, PersonInfo, StationResidents},
        statement::{Statement, StatementResult},
    },
};

use super::{
    commands::{Control, DatabaseCommand, DatabaseCommandRequest, DatabaseCommandResponse},
    table::table::ApplyErrors,
};

#[derive(Error, Debug)]
pub enum RequestManagerError {
    #[error("Database took too long to respond to the request")]
    DatabaseTimeout,
    #[error("Database is not running")]
    DatabaseUnavailable,
    #[error(transparent)]
    Apply(#[from] ApplyErrors),
    #[error("Database answered with an unexpected result: {0}")]
    UnexpectedResult(&'static str),
}

/// Goal of the request manager is to provide a simple, typed interface for interacting with the database
///
/// 1. Typed operations, one per statement, these unwrap the matching statement result
/// 2. Generic statement based API, you need to know which statement maps to which result
///
/// Cloning is cheap, every clone talks to the same database thread
#[derive(Clone)]
pub struct RequestManager {
    database_sender: flume::Sender<DatabaseCommandRequest>,
    timeout: Duration,
}

fn unexpected(result: StatementResult) -> RequestManagerError {
    RequestManagerError::UnexpectedResult(result.name())
}

impl RequestManager {
    pub fn new(database_sender: flume::Sender<DatabaseCommandRequest>, timeout: Duration) -> Self {
        Self {
            database_sender,
            timeout,
        }
    }

    // -- Persons

    pub fn send_list_persons(&self) -> Result<Vec<Person>, RequestManagerError> {
        match self.send_statement(Statement::ListPersons)? {
            StatementResult::Persons(persons) => Ok(persons),
            result => Err(unexpected(result)),
        }
    }

    pub fn send_get_person(&self, email: &str) -> Result<Person, RequestManagerError> {
        self.expect_person(Statement::GetPerson(email.to_string()))
    }

    pub fn send_add_person(&self, person: Person) -> Result<Person, RequestManagerError> {
        self.expect_person(Statement::AddPerson(person))
    }

    pub fn send_update_person(
        &self,
        email: &str,
        person: Person,
    ) -> Result<Person, RequestManagerError> {
        self.expect_person(Statement::UpdatePerson(email.to_string(), person))
    }

    pub fn send_remove_person(&self, email: &str) -> Result<String, RequestManagerError> {
        self.expect_status(Statement::RemovePerson(email.to_string()))
    }

    fn expect_person(&self, statement: Statement) -> Result<Person, RequestManagerError> {
        match self.send_statement(statement)? {
            StatementResult::Person(person) => Ok(person),
            result => Err(unexpected(result)),
        }
    }

    // -- Fire stations

    pub fn send_list_fire_stations(&self) -> Result<Vec<FireStation>, RequestManagerError> {
        self.expect_fire_stations(Statement::ListFireStations)
    }

    pub fn send_get_fire_stations(
        &self,
        station: StationNumber,
    ) -> Result<Vec<FireStation>, RequestManagerError> {
        self.expect_fire_stations(Statement::GetFireStations(station))
    }

    pub fn send_add_fire_station(
        &self,
        fire_station: FireStation,
    ) -> Result<FireStation, RequestManagerError> {
        self.expect_fire_station(Statement::AddFireStation(fire_station))
    }

    pub fn send_update_fire_station(
        &self,
        key: FireStationKey,
        fire_station: FireStation,
    ) -> Result<FireStation, RequestManagerError> {
        self.expect_fire_station(Statement::UpdateFireStation(key, fire_station))
    }

    pub fn send_remove_fire_station(
        &self,
        key: FireStationKey,
    ) -> Result<String, RequestManagerError> {
        self.expect_status(Statement::RemoveFireStation(key))
    }

    fn expect_fire_station(&self, statement: Statement) -> Result<FireStation, RequestManagerError> {
        match self.send_statement(statement)? {
            StatementResult::FireStation(fire_station) => Ok(fire_station),
            result => Err(unexpected(result)),
        }
    }

    fn expect_fire_stations(
        &self,
        statement: Statement,
    ) -> Result<Vec<FireStation>, RequestManagerError> {
        match self.send_statement(statement)? {
            StatementResult::FireStations(fire_stations) => Ok(fire_stations),
            result => Err(unexpected(result)),
        }
    }

    // -- Medical records

    pub fn send_list_medical_records(&self) -> Result<Vec<MedicalRecord>, RequestManagerError> {
        match self.send_statement(Statement::ListMedicalRecords)? {
            StatementResult::MedicalRecords(records) => Ok(records),
            result => Err(unexpected(result)),
        }
    }

    pub fn send_get_medical_record(
        &self,
        name: FullName,
    ) -> Result<MedicalRecord, RequestManagerError> {
        self.expect_medical_record(Statement::GetMedicalRecord(name))
    }

    pub fn send_add_medical_record(
        &self,
        record: MedicalRecord,
    ) -> Result<MedicalRecord, RequestManagerError> {
        self.expect_medical_record(Statement::AddMedicalRecord(record))
    }

    pub fn send_update_medical_record(
        &self,
        name: FullName,
        record: MedicalRecord,
    ) -> Result<MedicalRecord, RequestManagerError> {
        self.expect_medical_record(Statement::UpdateMedicalRecord(name, record))
    }

    pub fn send_remove_medical_record(&self, name: FullName) -> Result<String, RequestManagerError> {
        self.expect_status(Statement::RemoveMedicalRecord(name))
    }

    fn expect_medical_record(
        &self,
        statement: Statement,
    ) -> Result<MedicalRecord, RequestManagerError> {
        match self.send_statement(statement)? {
            StatementResult::MedicalRecord(record) => Ok(record),
            result => Err(unexpected(result)),
        }
    }

    // -- Alerts

    pub fn send_community_email(&self, city: &str) -> Result<Vec<String>, RequestManagerError> {
        self.expect_strings(Statement::CommunityEmail(city.to_string()))
    }

    pub fn send_person_info(&self, last_name: &str) -> Result<Vec<PersonInfo>, RequestManagerError> {
        match self.send_statement(Statement::PersonInfo(last_name.to_string()))? {
            StatementResult::PersonInfos(person_infos) => Ok(person_infos),
            result => Err(unexpected(result)),
        }
    }

    pub fn send_flood(
        &self,
        stations: Vec<StationNumber>,
    ) -> Result<Vec<StationResidents>, RequestManagerError> {
        self.expect_station_residents(Statement::Flood(stations))
    }

    pub fn send_fire(&self, address: &str) -> Result<Vec<StationResidents>, RequestManagerError> {
        self.expect_station_residents(Statement::Fire(address.to_string()))
    }

    pub fn send_phone_alert(
        &self,
        station: StationNumber,
    ) -> Result<Vec<String>, RequestManagerError> {
        self.expect_strings(Statement::PhoneAlert(station))
    }

    pub fn send_child_alert(&self, address: &str) -> Result<Vec<ChildAlert>, RequestManagerError> {
        match self.send_statement(Statement::ChildAlert(address.to_string()))? {
            StatementResult::ChildAlerts(alerts) => Ok(alerts),
            result => Err(unexpected(result)),
        }
    }

    pub fn send_coverage(
        &self,
        station: StationNumber,
    ) -> Result<CoverageReport, RequestManagerError> {
        match self.send_statement(Statement::Coverage(station))? {
            StatementResult::Coverage(report) => Ok(report),
            result => Err(unexpected(result)),
        }
    }

    fn expect_strings(&self, statement: Statement) -> Result<Vec<String>, RequestManagerError> {
        match self.send_statement(statement)? {
            StatementResult::Strings(values) => Ok(values),
            result => Err(unexpected(result)),
        }
    }

    fn expect_station_residents(
        &self,
        statement: Statement,
    ) -> Result<Vec<StationResidents>, RequestManagerError> {
        match self.send_statement(statement)? {
            StatementResult::StationResidents(households) => Ok(households),
            result => Err(unexpected(result)),
        }
    }

    fn expect_status(&self, statement: Statement) -> Result<String, RequestManagerError> {
        match self.send_statement(statement)? {
            StatementResult::SuccessStatus(status) => Ok(status),
            result => Err(unexpected(result)),
        }
    }

    // -- Generic

    /// Sends a shutdown request to the database and returns the database's response
    pub fn send_shutdown_request(&self) -> Result<String, RequestManagerError> {
        match self.send_database_request(DatabaseCommand::Control(Control::Shutdown))? {
            StatementResult::SuccessStatus(status) => Ok(status),
            result => Err(unexpected(result)),
        }
    }

    /// Sends a single statement to the database and returns its result
    pub fn send_statement(
        &self,
        statement: Statement,
    ) -> Result<StatementResult, RequestManagerError> {
        self.send_database_request(DatabaseCommand::Statement(statement))
    }

    pub fn send_database_request(
        &self,
        command: DatabaseCommand,
    ) -> Result<StatementResult, RequestManagerError> {
        let (resolver, resolver_receiver) = oneshot::channel::<DatabaseCommandResponse>();

        let request = DatabaseCommandRequest { resolver, command };

        // Sends the request to the database worker, database will respond
        //  on the resolver once it's finished processing the command
        self.database_sender
            .send(request)
            .map_err(|_| RequestManagerError::DatabaseUnavailable)?;

        match resolver_receiver.recv_timeout(self.timeout) {
            Ok(response) => Ok(response?),
            Err(oneshot::RecvTimeoutError::Timeout) => Err(RequestManagerError::DatabaseTimeout),
            Err(oneshot::RecvTimeoutError::Disconnected) => {
                Err(RequestManagerError::DatabaseUnavailable)
            }
        }
    }
}
