//! Response shapes assembled by the aggregation queries, never stored

use serde::{Deserialize, Serialize};

use crate::consts::consts::StationNumber;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PersonInfo {
    pub first_name: String,
    pub last_name: String,
    pub address: String,
    /// 0 when the medical record or its birthdate is missing
    pub age: i32,
    pub phone: String,
    pub email: String,
    pub medications: Vec<String>,
    pub allergies: Vec<String>,
}

/// Residents reachable from one station, used by the flood and fire queries
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StationResidents {
    pub station: StationNumber,
    pub person_infos: Vec<PersonInfo>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChildAlert {
    pub first_name: String,
    pub last_name: String,
    pub age: i32,
    /// "First Last" of everyone else living at the address
    pub family_members: Vec<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CoveredPerson {
    pub first_name: String,
    pub last_name: String,
    pub address: String,
    pub phone_number: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct CoverageReport {
    pub persons: Vec<CoveredPerson>,
    pub adult_count: usize,
    pub children_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coverage_report_uses_camel_case() {
        let report = CoverageReport {
            persons: vec![CoveredPerson {
                first_name: "John".to_string(),
                last_name: "Doe".to_string(),
                address: "123 Street".to_string(),
                phone_number: "123-456-7890".to_string(),
            }],
            adult_count: 1,
            children_count: 0,
        };

        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "persons": [{
                    "firstName": "John",
                    "lastName": "Doe",
                    "address": "123 Street",
                    "phoneNumber": "123-456-7890"
                }],
                "adultCount": 1,
                "childrenCount": 0
            })
        );
    }
}
