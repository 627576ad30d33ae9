use actix_web::{
    delete, get, http::header, post, put,
    web::{self, Data, Json, Path, Query},
    HttpResponse,
};
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use safetynet_database::{
    consts::consts::{FireStationKey, FullName, StationNumber},
    database::request_manager::{RequestManager, RequestManagerError},
    model::{fire_station::FireStation, medical_record::MedicalRecord, person::Person},
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::ApiError;

/// Runs the blocking database round trip on actix's blocking pool
async fn send<T, F>(request_manager: Data<RequestManager>, request: F) -> Result<T, ApiError>
where
    F: FnOnce(&RequestManager) -> Result<T, RequestManagerError> + Send + 'static,
    T: Send + 'static,
{
    web::block(move || request(request_manager.get_ref()))
        .await
        .map_err(|_| ApiError::Blocking)?
        .map_err(ApiError::from)
}

/// Empty lists are answered with 404 and an empty array
fn list_response<T: Serialize>(values: Vec<T>) -> HttpResponse {
    if values.is_empty() {
        HttpResponse::NotFound().json(values)
    } else {
        HttpResponse::Ok().json(values)
    }
}

/// Characters that cannot appear inside a single path segment
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// `Location` value built from key fields, each percent-encoded as its own segment
fn location(resource: &str, segments: &[&str]) -> String {
    segments.iter().fold(format!("/{}", resource), |path, segment| {
        format!("{}/{}", path, utf8_percent_encode(segment, PATH_SEGMENT))
    })
}

fn parse_station(name: &'static str, value: &str) -> Result<StationNumber, ApiError> {
    value
        .parse::<StationNumber>()
        .map_err(|e| ApiError::InvalidParameter {
            name,
            message: e.to_string(),
        })
}

#[derive(Deserialize, Debug)]
pub struct CityQuery {
    city: String,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct LastNameQuery {
    last_name: String,
}

#[derive(Deserialize, Debug)]
pub struct StationsQuery {
    /// Comma separated station numbers, e.g. `1,2`
    stations: String,
}

#[derive(Deserialize, Debug)]
pub struct AddressQuery {
    address: String,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct PhoneAlertQuery {
    fire_station_number: String,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct CoverageQuery {
    station_number: Option<String>,
}

// -- Alerts

#[get("/communityEmail")]
async fn community_email(
    request_manager: Data<RequestManager>,
    query: Query<CityQuery>,
) -> Result<HttpResponse, ApiError> {
    let CityQuery { city } = query.into_inner();

    let emails = send(request_manager, move |rm| rm.send_community_email(&city)).await?;

    Ok(list_response(emails))
}

#[get("/personInfo")]
async fn person_info(
    request_manager: Data<RequestManager>,
    query: Query<LastNameQuery>,
) -> Result<HttpResponse, ApiError> {
    let LastNameQuery { last_name } = query.into_inner();

    let person_infos = send(request_manager, move |rm| rm.send_person_info(&last_name)).await?;

    Ok(list_response(person_infos))
}

#[get("/flood/stations")]
async fn flood(
    request_manager: Data<RequestManager>,
    query: Query<StationsQuery>,
) -> Result<HttpResponse, ApiError> {
    let stations = query
        .stations
        .split(',')
        .map(|station| parse_station("stations", station))
        .collect::<Result<Vec<StationNumber>, ApiError>>()?;

    let households = send(request_manager, move |rm| rm.send_flood(stations)).await?;

    Ok(list_response(households))
}

#[get("/fire")]
async fn fire(
    request_manager: Data<RequestManager>,
    query: Query<AddressQuery>,
) -> Result<HttpResponse, ApiError> {
    let AddressQuery { address } = query.into_inner();

    let households = send(request_manager, move |rm| rm.send_fire(&address)).await?;

    Ok(list_response(households))
}

#[get("/phoneAlert")]
async fn phone_alert(
    request_manager: Data<RequestManager>,
    query: Query<PhoneAlertQuery>,
) -> Result<HttpResponse, ApiError> {
    let station = parse_station("fireStationNumber", &query.fire_station_number)?;

    let phones = send(request_manager, move |rm| rm.send_phone_alert(station)).await?;

    Ok(list_response(phones))
}

#[get("/childAlert")]
async fn child_alert(
    request_manager: Data<RequestManager>,
    query: Query<AddressQuery>,
) -> Result<HttpResponse, ApiError> {
    let AddressQuery { address } = query.into_inner();

    let alerts = send(request_manager, move |rm| rm.send_child_alert(&address)).await?;

    Ok(list_response(alerts))
}

// -- Fire stations

/// Coverage report when `stationNumber` is given, every mapping otherwise
#[get("/firestation")]
async fn get_fire_stations(
    request_manager: Data<RequestManager>,
    query: Query<CoverageQuery>,
) -> Result<HttpResponse, ApiError> {
    let Some(station_number) = &query.station_number else {
        let fire_stations = send(request_manager, |rm| rm.send_list_fire_stations()).await?;

        return Ok(list_response(fire_stations));
    };

    let station = parse_station("stationNumber", station_number)?;

    let report = send(request_manager, move |rm| rm.send_coverage(station)).await?;

    if report.persons.is_empty() {
        return Ok(HttpResponse::NotFound().json(json!({})));
    }

    Ok(HttpResponse::Ok().json(report))
}

#[get("/firestation/{stationNumber}")]
async fn get_fire_stations_by_number(
    request_manager: Data<RequestManager>,
    path: Path<String>,
) -> Result<HttpResponse, ApiError> {
    let station = parse_station("stationNumber", &path)?;

    let fire_stations = send(request_manager, move |rm| rm.send_get_fire_stations(station)).await?;

    Ok(list_response(fire_stations))
}

#[post("/firestation")]
async fn post_fire_station(
    request_manager: Data<RequestManager>,
    body: Json<FireStation>,
) -> Result<HttpResponse, ApiError> {
    let fire_station = body.into_inner();

    let created = send(request_manager, move |rm| rm.send_add_fire_station(fire_station)).await?;

    Ok(HttpResponse::Created()
        .insert_header((
            header::LOCATION,
            location("firestation", &[&created.station.to_string()]),
        ))
        .json(created))
}

fn fire_station_key(path: Path<(String, String)>) -> Result<FireStationKey, ApiError> {
    let (address, station) = path.into_inner();

    Ok(FireStationKey::new(
        &address,
        parse_station("station", &station)?,
    ))
}

#[put("/firestation/{address}/{station}")]
async fn put_fire_station(
    request_manager: Data<RequestManager>,
    path: Path<(String, String)>,
    body: Json<FireStation>,
) -> Result<HttpResponse, ApiError> {
    let key = fire_station_key(path)?;
    let fire_station = body.into_inner();

    let updated = send(request_manager, move |rm| {
        rm.send_update_fire_station(key, fire_station)
    })
    .await?;

    Ok(HttpResponse::Ok().json(updated))
}

#[delete("/firestation/{address}/{station}")]
async fn delete_fire_station(
    request_manager: Data<RequestManager>,
    path: Path<(String, String)>,
) -> Result<HttpResponse, ApiError> {
    let key = fire_station_key(path)?;

    let status = send(request_manager, move |rm| rm.send_remove_fire_station(key)).await?;
    log::debug!("{}", status);

    Ok(HttpResponse::Ok().finish())
}

// -- Persons

#[get("/person")]
async fn list_persons(request_manager: Data<RequestManager>) -> Result<HttpResponse, ApiError> {
    let persons = send(request_manager, |rm| rm.send_list_persons()).await?;

    Ok(list_response(persons))
}

#[get("/person/{email}")]
async fn get_person(
    request_manager: Data<RequestManager>,
    path: Path<String>,
) -> Result<HttpResponse, ApiError> {
    let email = path.into_inner();

    let person = send(request_manager, move |rm| rm.send_get_person(&email)).await?;

    Ok(HttpResponse::Ok().json(person))
}

#[post("/person")]
async fn post_person(
    request_manager: Data<RequestManager>,
    body: Json<Person>,
) -> Result<HttpResponse, ApiError> {
    let person = body.into_inner();

    let created = send(request_manager, move |rm| rm.send_add_person(person)).await?;

    Ok(HttpResponse::Created()
        .insert_header((header::LOCATION, location("person", &[&created.email])))
        .json(created))
}

#[put("/person/{email}")]
async fn put_person(
    request_manager: Data<RequestManager>,
    path: Path<String>,
    body: Json<Person>,
) -> Result<HttpResponse, ApiError> {
    let email = path.into_inner();
    let person = body.into_inner();

    let updated = send(request_manager, move |rm| rm.send_update_person(&email, person)).await?;

    Ok(HttpResponse::Ok().json(updated))
}

#[delete("/person/{email}")]
async fn delete_person(
    request_manager: Data<RequestManager>,
    path: Path<String>,
) -> Result<HttpResponse, ApiError> {
    let email = path.into_inner();

    let status = send(request_manager, move |rm| rm.send_remove_person(&email)).await?;
    log::debug!("{}", status);

    Ok(HttpResponse::Ok().finish())
}

// -- Medical records

#[get("/medicalRecord")]
async fn list_medical_records(
    request_manager: Data<RequestManager>,
) -> Result<HttpResponse, ApiError> {
    let records = send(request_manager, |rm| rm.send_list_medical_records()).await?;

    Ok(list_response(records))
}

fn full_name(path: Path<(String, String)>) -> FullName {
    let (first_name, last_name) = path.into_inner();

    FullName::new(&first_name, &last_name)
}

#[get("/medicalRecord/{firstName}/{lastName}")]
async fn get_medical_record(
    request_manager: Data<RequestManager>,
    path: Path<(String, String)>,
) -> Result<HttpResponse, ApiError> {
    let name = full_name(path);

    let record = send(request_manager, move |rm| rm.send_get_medical_record(name)).await?;

    Ok(HttpResponse::Ok().json(record))
}

#[post("/medicalRecord")]
async fn post_medical_record(
    request_manager: Data<RequestManager>,
    body: Json<MedicalRecord>,
) -> Result<HttpResponse, ApiError> {
    let record = body.into_inner();

    let created = send(request_manager, move |rm| rm.send_add_medical_record(record)).await?;

    Ok(HttpResponse::Created()
        .insert_header((
            header::LOCATION,
            location("medicalRecord", &[&created.first_name, &created.last_name]),
        ))
        .json(created))
}

#[put("/medicalRecord/{firstName}/{lastName}")]
async fn put_medical_record(
    request_manager: Data<RequestManager>,
    path: Path<(String, String)>,
    body: Json<MedicalRecord>,
) -> Result<HttpResponse, ApiError> {
    let name = full_name(path);
    let record = body.into_inner();

    let updated = send(request_manager, move |rm| {
        rm.send_update_medical_record(name, record)
    })
    .await?;

    Ok(HttpResponse::Ok().json(updated))
}

#[delete("/medicalRecord/{firstName}/{lastName}")]
async fn delete_medical_record(
    request_manager: Data<RequestManager>,
    path: Path<(String, String)>,
) -> Result<HttpResponse, ApiError> {
    let name = full_name(path);

    let status = send(request_manager, move |rm| rm.send_remove_medical_record(name)).await?;
    log::debug!("{}", status);

    Ok(HttpResponse::Ok().finish())
}

/// Extractor failures answer with the same JSON body as every other error
fn extractor_configs(config: &mut web::ServiceConfig) {
    config
        .app_data(web::JsonConfig::default().error_handler(|err, _| {
            ApiError::InvalidParameter {
                name: "body",
                message: err.to_string(),
            }
            .into()
        }))
        .app_data(web::QueryConfig::default().error_handler(|err, _| {
            ApiError::InvalidParameter {
                name: "query",
                message: err.to_string(),
            }
            .into()
        }))
        .app_data(web::PathConfig::default().error_handler(|err, _| {
            ApiError::InvalidParameter {
                name: "path",
                message: err.to_string(),
            }
            .into()
        }));
}

pub fn configure(config: &mut web::ServiceConfig) {
    extractor_configs(config);

    config
        .service(community_email)
        .service(person_info)
        .service(flood)
        .service(fire)
        .service(phone_alert)
        .service(child_alert)
        .service(get_fire_stations)
        .service(get_fire_stations_by_number)
        .service(post_fire_station)
        .service(put_fire_station)
        .service(delete_fire_station)
        .service(list_persons)
        .service(get_person)
        .service(post_person)
        .service(put_person)
        .service(delete_person)
        .service(list_medical_records)
        .service(get_medical_record)
        .service(post_medical_record)
        .service(put_medical_record)
        .service(delete_medical_record);
}
