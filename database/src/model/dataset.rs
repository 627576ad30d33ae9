use std::{
    fs::File,
    io::{self, BufReader},
    path::{Path, PathBuf},
};

use serde::Deserialize;
use thiserror::Error;

use super::{fire_station::FireStation, medical_record::MedicalRecord, person::Person};

#[derive(Error, Debug)]
pub enum DataSetError {
    #[error("Unable to open data file {path}: {source}")]
    UnableToOpen {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Unable to parse data file {path}: {source}")]
    UnableToParseFile {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Unable to parse data: {0}")]
    UnableToParse(#[from] serde_json::Error),
}

/// The single JSON document every table is loaded from on startup
///
/// Unknown keys are ignored and a missing collection is loaded as empty
#[derive(Deserialize, Clone, Debug, Default, PartialEq)]
pub struct DataSet {
    #[serde(default)]
    pub persons: Vec<Person>,
    #[serde(default)]
    pub firestations: Vec<FireStation>,
    #[serde(default, rename = "medicalrecords")]
    pub medical_records: Vec<MedicalRecord>,
}

impl DataSet {
    pub fn load(path: &Path) -> Result<Self, DataSetError> {
        let file = File::open(path).map_err(|source| DataSetError::UnableToOpen {
            path: path.to_path_buf(),
            source,
        })?;

        serde_json::from_reader(BufReader::new(file)).map_err(|source| {
            DataSetError::UnableToParseFile {
                path: path.to_path_buf(),
                source,
            }
        })
    }

    pub fn from_json(json: &str) -> Result<Self, DataSetError> {
        Ok(serde_json::from_str(json)?)
    }
}

pub mod test_utils {
    /// Trimmed down copy of the production data file, keeps its string encoded numbers.
    /// Tenley Boyd is the only child before 2031, ages are asserted against a fixed date
    pub const FIXTURE: &str = r#"{
        "persons": [
            { "firstName":"John", "lastName":"Boyd", "address":"1509 Culver St", "city":"Culver", "zip":"97451", "phone":"841-874-6512", "email":"jaboyd@email.com" },
            { "firstName":"Jacob", "lastName":"Boyd", "address":"1509 Culver St", "city":"Culver", "zip":"97451", "phone":"841-874-6513", "email":"drk@email.com" },
            { "firstName":"Tenley", "lastName":"Boyd", "address":"1509 Culver St", "city":"Culver", "zip":"97451", "phone":"841-874-6512", "email":"tenz@email.com" },
            { "firstName":"Peter", "lastName":"Duncan", "address":"644 Gershwin Cir", "city":"Culver", "zip":"97451", "phone":"841-874-6512", "email":"jaboyd2@email.com" },
            { "firstName":"Eric", "lastName":"Cadigan", "address":"951 LoneTree Rd", "city":"Elsewhere", "zip":"97451", "phone":"841-874-7458", "email":"gramps@email.com" }
        ],
        "firestations": [
            { "address":"1509 Culver St", "station":"3" },
            { "address":"644 Gershwin Cir", "station":"1" },
            { "address":"951 LoneTree Rd", "station":"2" },
            { "address":"1509 Culver St", "station":"4" }
        ],
        "medicalrecords": [
            { "firstName":"John", "lastName":"Boyd", "birthdate":"06/03/1984", "medications":["aznol:350mg", "hydrapermazol:100mg"], "allergies":["nillacilan"] },
            { "firstName":"Jacob", "lastName":"Boyd", "birthdate":"06/03/1989", "medications":["pharmacol:5000mg"], "allergies":[] },
            { "firstName":"Tenley", "lastName":"Boyd", "birthdate":"18/02/2012", "medications":[], "allergies":["peanut"] },
            { "firstName":"Peter", "lastName":"Duncan", "birthdate":"06/09/2000", "medications":[], "allergies":["shellfish"] },
            { "firstName":"Eric", "lastName":"Cadigan", "birthdate":"06/08/1945", "medications":["tradoxidine:400mg"], "allergies":[] }
        ]
    }"#;
}
