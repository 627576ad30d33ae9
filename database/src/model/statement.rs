use crate::consts::consts::{FireStationKey, FullName, StationNumber};

use super::{
    fire_station::FireStation,
    medical_record::MedicalRecord,
    person::Person,
    report::{ChildAlert, CoverageReport, PersonInfo, StationResidents},
};

#[derive(Clone, Debug, PartialEq)]
pub enum Statement {
    // -- Persons, keyed by email
    ListPersons,
    GetPerson(String),
    AddPerson(Person),
    UpdatePerson(String, Person),
    RemovePerson(String),

    // -- Fire stations, keyed by (address, station)
    ListFireStations,
    /// Returns every mapping that shares the station number
    GetFireStations(StationNumber),
    AddFireStation(FireStation),
    UpdateFireStation(FireStationKey, FireStation),
    RemoveFireStation(FireStationKey),

    // -- Medical records, keyed by (first name, last name)
    ListMedicalRecords,
    GetMedicalRecord(FullName),
    AddMedicalRecord(MedicalRecord),
    UpdateMedicalRecord(FullName, MedicalRecord),
    RemoveMedicalRecord(FullName),

    // -- Alert queries, join the three tables
    /// Distinct emails of everyone living in a city
    CommunityEmail(String),
    /// Person info of everyone sharing a last name
    PersonInfo(String),
    /// Residents per station, for each requested station
    Flood(Vec<StationNumber>),
    /// Residents of an address, for each station serving it
    Fire(String),
    PhoneAlert(StationNumber),
    ChildAlert(String),
    Coverage(StationNumber),
}

impl Statement {
    pub fn is_mutation(&self) -> bool {
        match self {
            Statement::AddPerson(_)
            | Statement::UpdatePerson(_, _)
            | Statement::RemovePerson(_)
            | Statement::AddFireStation(_)
            | Statement::UpdateFireStation(_, _)
            | Statement::RemoveFireStation(_)
            | Statement::AddMedicalRecord(_)
            | Statement::UpdateMedicalRecord(_, _)
            | Statement::RemoveMedicalRecord(_) => true,
            Statement::ListPersons
            | Statement::GetPerson(_)
            | Statement::ListFireStations
            | Statement::GetFireStations(_)
            | Statement::ListMedicalRecords
            | Statement::GetMedicalRecord(_)
            | Statement::CommunityEmail(_)
            | Statement::PersonInfo(_)
            | Statement::Flood(_)
            | Statement::Fire(_)
            | Statement::PhoneAlert(_)
            | Statement::ChildAlert(_)
            | Statement::Coverage(_) => false,
        }
    }
}

#[derive(Clone, Debug, PartialEq, strum::IntoStaticStr)]
pub enum StatementResult {
    /// Used for database status messages
    SuccessStatus(String),
    Person(Person),
    Persons(Vec<Person>),
    FireStation(FireStation),
    FireStations(Vec<FireStation>),
    MedicalRecord(MedicalRecord),
    MedicalRecords(Vec<MedicalRecord>),
    /// Emails or phone numbers
    Strings(Vec<String>),
    PersonInfos(Vec<PersonInfo>),
    StationResidents(Vec<StationResidents>),
    ChildAlerts(Vec<ChildAlert>),
    Coverage(CoverageReport),
}

impl StatementResult {
    pub fn name(&self) -> &'static str {
        self.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_store_changes_are_mutations() {
        let add = Statement::AddFireStation(FireStation::new("1509 Culver St", 3));
        let coverage = Statement::Coverage(StationNumber(3));

        assert!(add.is_mutation());
        assert!(!coverage.is_mutation());
    }

    #[test]
    fn result_name() {
        assert_eq!(StatementResult::Strings(vec![]).name(), "Strings");
    }
}
