//! Read-only queries joining persons, fire stations and medical records.
//!
//! Every function receives the current date so the age based splits stay deterministic.

use chrono::NaiveDate;

use crate::{
    consts::consts::{StationNumber, CHILD_MAX_AGE},
    model::{
        person::Person,
        report::{ChildAlert, CoverageReport, CoveredPerson, PersonInfo, StationResidents},
    },
};

use super::{
    table::table::{ApplyErrors, Tables},
    utils::date::calculate_age,
};

/// Age of a person whose medical record and birthdate are required
fn strict_age(tables: &Tables, person: &Person, today: NaiveDate) -> Result<i32, ApplyErrors> {
    let record = tables
        .medical_records
        .for_person(person)
        .ok_or_else(|| ApplyErrors::MissingMedicalRecord(person.full_name()))?;

    calculate_age(record.birthdate.as_deref(), today).map_err(|source| {
        ApplyErrors::UnusableBirthdate {
            person: person.full_name(),
            source,
        }
    })
}

/// A missing record or birthdate gives age 0 and empty lists, a malformed birthdate is
/// still an error
#[tracing::instrument(skip_all, fields(persons = persons.len()))]
pub fn person_info(
    tables: &Tables,
    persons: &[&Person],
    today: NaiveDate,
) -> Result<Vec<PersonInfo>, ApplyErrors> {
    persons
        .iter()
        .map(|person| {
            let record = tables.medical_records.for_person(person);

            let age = match record.and_then(|record| record.birthdate.as_deref()) {
                Some(birthdate) => calculate_age(Some(birthdate), today).map_err(|source| {
                    ApplyErrors::UnusableBirthdate {
                        person: person.full_name(),
                        source,
                    }
                })?,
                None => 0,
            };

            Ok(PersonInfo {
                first_name: person.first_name.clone(),
                last_name: person.last_name.clone(),
                address: person.address.clone(),
                age,
                phone: person.phone.clone(),
                email: person.email.clone(),
                medications: record.map(|r| r.medications.clone()).unwrap_or_default(),
                allergies: record.map(|r| r.allergies.clone()).unwrap_or_default(),
            })
        })
        .collect()
}

#[tracing::instrument(skip(tables))]
pub fn child_alert(
    tables: &Tables,
    address: &str,
    today: NaiveDate,
) -> Result<Vec<ChildAlert>, ApplyErrors> {
    let residents = tables.persons.by_address(address);

    let ages = residents
        .iter()
        .map(|person| strict_age(tables, person, today))
        .collect::<Result<Vec<i32>, ApplyErrors>>()?;

    let alerts = residents
        .iter()
        .zip(&ages)
        .enumerate()
        .filter(|(_, (_, age))| **age <= CHILD_MAX_AGE)
        .map(|(index, (child, age))| ChildAlert {
            first_name: child.first_name.clone(),
            last_name: child.last_name.clone(),
            age: *age,
            family_members: residents
                .iter()
                .enumerate()
                .filter(|(other, _)| *other != index)
                .map(|(_, member)| member.display_name())
                .collect(),
        })
        .collect();

    Ok(alerts)
}

#[tracing::instrument(skip(tables))]
pub fn coverage_by_station(
    tables: &Tables,
    station: StationNumber,
    today: NaiveDate,
) -> Result<CoverageReport, ApplyErrors> {
    let addresses = tables.fire_stations.addresses_for(station);

    let mut report = CoverageReport::default();

    for person in tables
        .persons
        .iter()
        .filter(|person| addresses.contains(&person.address))
    {
        if strict_age(tables, person, today)? > CHILD_MAX_AGE {
            report.adult_count += 1;
        } else {
            report.children_count += 1;
        }

        report.persons.push(CoveredPerson {
            first_name: person.first_name.clone(),
            last_name: person.last_name.clone(),
            address: person.address.clone(),
            phone_number: person.phone.clone(),
        });
    }

    Ok(report)
}

pub fn community_email(tables: &Tables, city: &str) -> Vec<String> {
    tables.persons.emails_by_city(city)
}

#[tracing::instrument(skip(tables))]
pub fn person_info_by_last_name(
    tables: &Tables,
    last_name: &str,
    today: NaiveDate,
) -> Result<Vec<PersonInfo>, ApplyErrors> {
    person_info(tables, &tables.persons.by_last_name(last_name), today)
}

fn residents_of<'a>(tables: &'a Tables, addresses: &[String]) -> Vec<&'a Person> {
    addresses
        .iter()
        .flat_map(|address| tables.persons.by_address(address))
        .collect()
}

/// Stations are answered in the order they were requested
#[tracing::instrument(skip(tables))]
pub fn flood(
    tables: &Tables,
    stations: &[StationNumber],
    today: NaiveDate,
) -> Result<Vec<StationResidents>, ApplyErrors> {
    let mut households = Vec::new();

    for station in stations {
        let addresses = tables.fire_stations.addresses_for(*station);
        if addresses.is_empty() {
            continue;
        }

        let person_infos = person_info(tables, &residents_of(tables, &addresses), today)?;
        if person_infos.is_empty() {
            continue;
        }

        households.push(StationResidents {
            station: *station,
            person_infos,
        });
    }

    Ok(households)
}

/// One entry per station serving the address, stations without residents are dropped
#[tracing::instrument(skip(tables))]
pub fn fire(
    tables: &Tables,
    address: &str,
    today: NaiveDate,
) -> Result<Vec<StationResidents>, ApplyErrors> {
    let residents = tables.persons.by_address(address);
    if residents.is_empty() {
        return Ok(vec![]);
    }

    tables
        .fire_stations
        .by_address(address)
        .into_iter()
        .map(|fire_station| {
            Ok(StationResidents {
                station: fire_station.station,
                person_infos: person_info(tables, &residents, today)?,
            })
        })
        .collect()
}

#[tracing::instrument(skip(tables))]
pub fn phone_alert(tables: &Tables, station: StationNumber) -> Vec<String> {
    let addresses = tables.fire_stations.addresses_for(station);
    if addresses.is_empty() {
        return vec![];
    }

    tables
        .persons
        .phones_for(&residents_of(tables, &addresses))
}
