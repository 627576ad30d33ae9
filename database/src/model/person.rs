use serde::{Deserialize, Serialize};

use crate::consts::consts::{string_or_number, FullName};

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    pub first_name: String,
    pub last_name: String,
    pub address: String,
    pub city: String,
    #[serde(deserialize_with = "string_or_number")]
    pub zip: String,
    pub phone: String,
    pub email: String,
}

impl Person {
    pub fn new(
        first_name: &str,
        last_name: &str,
        address: &str,
        city: &str,
        zip: &str,
        phone: &str,
        email: &str,
    ) -> Self {
        Person {
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            address: address.to_string(),
            city: city.to_string(),
            zip: zip.to_string(),
            phone: phone.to_string(),
            email: email.to_string(),
        }
    }

    /// Key used to find this person's medical record
    pub fn full_name(&self) -> FullName {
        FullName::new(&self.first_name, &self.last_name)
    }

    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}
