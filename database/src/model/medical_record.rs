use serde::{Deserialize, Serialize};

use crate::consts::consts::FullName;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MedicalRecord {
    pub first_name: String,
    pub last_name: String,
    /// `dd/mm/yyyy`, may be missing in the data file
    #[serde(default)]
    pub birthdate: Option<String>,
    #[serde(default)]
    pub medications: Vec<String>,
    #[serde(default)]
    pub allergies: Vec<String>,
}

impl MedicalRecord {
    pub fn new(
        first_name: &str,
        last_name: &str,
        birthdate: Option<&str>,
        medications: &[&str],
        allergies: &[&str],
    ) -> Self {
        MedicalRecord {
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            birthdate: birthdate.map(str::to_string),
            medications: medications.iter().map(|m| m.to_string()).collect(),
            allergies: allergies.iter().map(|a| a.to_string()).collect(),
        }
    }

    pub fn full_name(&self) -> FullName {
        FullName::new(&self.first_name, &self.last_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_lists_default_to_empty() {
        let json = r#"{ "firstName": "John", "lastName": "Boyd", "birthdate": "03/06/1984" }"#;

        let record: MedicalRecord = serde_json::from_str(json).unwrap();

        assert_eq!(record.birthdate.as_deref(), Some("03/06/1984"));
        assert!(record.medications.is_empty());
        assert!(record.allergies.is_empty());
    }

    #[test]
    fn birthdate_can_be_null() {
        let json = r#"{ "firstName": "John", "lastName": "Boyd", "birthdate": null,
            "medications": ["aznol:350mg"], "allergies": ["nillacilan"] }"#;

        let record: MedicalRecord = serde_json::from_str(json).unwrap();

        assert_eq!(record.birthdate, None);
        assert_eq!(record.medications, vec!["aznol:350mg".to_string()]);
        assert_eq!(record.full_name(), FullName::new("John", "Boyd"));
    }
}
