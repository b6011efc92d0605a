use actix_web::HttpResponse;
use actix_web::http::header::ContentType;
use serde::Serialize;
use serde_json::{Map, Value as JsonValue};
use udd_resource::{Resource, Udd};

use crate::error::Result;

/// Full representation of `resource`: direct fields plus every computed
/// field. Linked resources inside computed fields appear as references.
pub(crate) fn document(udd: &Udd, resource: &Resource) -> Result<JsonValue> {
    let mut object = Map::new();
    for (field, value) in resource.fields() {
        object.insert(field.to_owned(), serde_json::to_value(value)?);
    }
    for (field, linked) in udd.computed_all(resource)? {
        object.insert(field.to_owned(), serde_json::to_value(&*linked)?);
    }
    Ok(JsonValue::Object(object))
}

pub(crate) fn to_body(data: &impl Serialize) -> Result<String> {
    Ok(serde_json::to_string_pretty(data)?)
}

pub(crate) fn json(body: String) -> HttpResponse {
    HttpResponse::Ok()
        .insert_header(ContentType::json())
        .body(body)
}
