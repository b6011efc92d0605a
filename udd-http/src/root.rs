use std::collections::BTreeMap;

use actix_web::{HttpResponse, web};
use serde::Serialize;
use udd_resource::Udd;

use crate::error::Result;
use crate::{CARGO_HOME_PAGE, render};

#[derive(Serialize)]
struct Directory {
    info: &'static str,
    doc: &'static str,
    resources: BTreeMap<&'static str, Entry>,
}

#[derive(Serialize)]
struct Entry {
    path: &'static str,
    doc: &'static str,
}

pub(crate) async fn get(udd: web::Data<Udd>) -> Result<HttpResponse> {
    let resources = udd
        .registry()
        .list()
        .map(|(path, ty)| (path, Entry { path, doc: ty.doc() }))
        .collect();
    let directory = Directory {
        info: "This is a JSON API for the Ultimate Debian Database.",
        doc: CARGO_HOME_PAGE,
        resources,
    };
    Ok(render::json(render::to_body(&directory)?))
}
