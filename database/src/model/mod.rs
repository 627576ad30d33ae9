pub mod dataset;
pub mod fire_station;
pub mod medical_record;
pub mod person;
pub mod report;
pub mod statement;
