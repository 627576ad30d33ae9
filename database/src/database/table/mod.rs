pub mod fire_station;
pub mod medical_record;
pub mod person;
pub mod row;
pub mod table;
