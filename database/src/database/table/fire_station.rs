use crate::{
    consts::consts::{FireStationKey, StationNumber},
    model::fire_station::FireStation,
};

use super::{
    row::{require_not_blank, Row},
    table::{distinct, ApplyErrors, Table},
};

pub type FireStationTable = Table<FireStation>;

impl Row for FireStation {
    type Key = FireStationKey;

    const ENTITY: &'static str = "fire station";

    fn key(&self) -> Self::Key {
        FireStation::key(self)
    }

    fn validate(&self) -> Result<(), ApplyErrors> {
        require_not_blank("address", &self.address)?;

        if self.station.to_number() == 0 {
            return Err(ApplyErrors::InvalidField {
                field: "station",
                message: "Station number must be greater than 0".to_string(),
            });
        }

        Ok(())
    }
}

impl Table<FireStation> {
    /// Every mapping sharing the station number, in table order
    pub fn by_station(&self, station: StationNumber) -> Vec<&FireStation> {
        self.iter()
            .filter(|fire_station| fire_station.station == station)
            .collect()
    }

    #[tracing::instrument(skip(self))]
    pub fn addresses_for(&self, station: StationNumber) -> Vec<String> {
        distinct(
            self.by_station(station)
                .into_iter()
                .map(|fire_station| fire_station.address.clone()),
        )
    }

    pub fn by_address(&self, address: &str) -> Vec<&FireStation> {
        self.iter()
            .filter(|fire_station| fire_station.address == address)
            .collect()
    }
}
