use serde::{Deserialize, Serialize};

use crate::consts::consts::{FireStationKey, StationNumber};

/// One address to station mapping, an address can appear once per station
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct FireStation {
    pub address: String,
    pub station: StationNumber,
}

impl FireStation {
    pub fn new(address: &str, station: u32) -> Self {
        FireStation {
            address: address.to_string(),
            station: StationNumber(station),
        }
    }

    pub fn key(&self) -> FireStationKey {
        FireStationKey::new(&self.address, self.station)
    }
}
