use std::collections::BTreeMap;
use std::sync::Arc;

use actix_web::{HttpResponse, web};
use serde_json::json;
use udd_resource::{Fetched, Filters, Udd};
use udd_store_db::Value;

use crate::error::Result;
use crate::render;

type Query = web::Query<Vec<(String, String)>>;

// Repeated keys keep their first value.
fn filters(query: Vec<(String, String)>) -> Filters {
    let mut filters = Filters::new();
    for (field, value) in query {
        filters.entry(field).or_insert(value);
    }
    filters
}

/// `GET /{resource}`: every instance matching the query-string filters.
pub(crate) async fn list(
    udd: web::Data<Udd>,
    resource: web::Path<String>,
    query: Query,
) -> Result<HttpResponse> {
    fetch(
        udd.into_inner(),
        resource.into_inner(),
        None,
        filters(query.into_inner()),
    )
    .await
}

/// `GET /{resource}/{key...}`: one path segment per primary-key field.
pub(crate) async fn get(
    udd: web::Data<Udd>,
    path: web::Path<(String, String)>,
    query: Query,
) -> Result<HttpResponse> {
    let (resource, key) = path.into_inner();
    let key = key
        .split('/')
        .filter(|segment| !segment.is_empty())
        .map(Value::from)
        .collect::<Vec<_>>();
    let key = (!key.is_empty()).then_some(key);
    fetch(udd.into_inner(), resource, key, filters(query.into_inner())).await
}

async fn fetch(
    udd: Arc<Udd>,
    resource: String,
    key: Option<Vec<Value>>,
    filters: Filters,
) -> Result<HttpResponse> {
    let body = web::block(move || -> Result<String> {
        let ty = udd.resolve(&resource)?;
        match udd.fetch(&ty, key.as_deref(), &filters)? {
            Fetched::One(found) => render::to_body(&render::document(&udd, &found)?),
            Fetched::Many(found) => {
                let documents = found
                    .iter()
                    .map(|r| render::document(&udd, r))
                    .collect::<Result<Vec<_>>>()?;
                render::to_body(&documents)
            }
        }
    })
    .await??;
    Ok(render::json(body))
}

/// `GET /{resource}/doc`: field lists and computed field documentation.
pub(crate) async fn doc(udd: web::Data<Udd>, resource: web::Path<String>) -> Result<HttpResponse> {
    let ty = udd.resolve(&resource)?;
    let computed = ty
        .computed()
        .iter()
        .map(|field| (field.name, field.doc))
        .collect::<BTreeMap<_, _>>();
    let doc = json!({
        "computed fields": computed,
        "fields from database": ty.fields(),
        "primary key": ty.primary_key(),
    });
    Ok(render::json(render::to_body(&doc)?))
}
