use crate::{
    consts::consts::FullName,
    database::utils::date::parse_birthdate,
    model::{medical_record::MedicalRecord, person::Person},
};

use super::{
    row::{require_not_blank, Row},
    table::{ApplyErrors, Table},
};

pub type MedicalRecordTable = Table<MedicalRecord>;

impl Row for MedicalRecord {
    type Key = FullName;

    const ENTITY: &'static str = "medical record";

    fn key(&self) -> Self::Key {
        self.full_name()
    }

    fn validate(&self) -> Result<(), ApplyErrors> {
        require_not_blank("firstName", &self.first_name)?;
        require_not_blank("lastName", &self.last_name)?;

        if let Some(birthdate) = &self.birthdate {
            parse_birthdate(birthdate).map_err(|e| ApplyErrors::InvalidField {
                field: "birthdate",
                message: e.to_string(),
            })?;
        }

        Ok(())
    }
}

impl Table<MedicalRecord> {
    pub fn get_by_name(&self, first_name: &str, last_name: &str) -> Option<&MedicalRecord> {
        self.iter()
            .find(|record| record.first_name == first_name && record.last_name == last_name)
    }

    pub fn for_person(&self, person: &Person) -> Option<&MedicalRecord> {
        self.get_by_name(&person.first_name, &person.last_name)
    }
}
