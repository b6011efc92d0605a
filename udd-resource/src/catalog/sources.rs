// SPDX-FileCopyrightText: 2026 udd-api contributors
// SPDX-License-Identifier: MIT

use crate::error::Result;
use crate::relation::Relation;
use crate::schema::{ComputedField, ResourceType};

use super::SOURCES;

pub(super) fn types() -> Result<Vec<ResourceType>> {
    Ok(vec![
        ResourceType::builder(SOURCES)
            .doc("Source packages, one per version and suite")
            .tables(&["sources"])
            .fields(&[
                "source",
                "version",
                "maintainer",
                "maintainer_name",
                "maintainer_email",
                "format",
                "architecture",
                "standards_version",
                "homepage",
                "build_depends",
                "build_depends_indep",
                "vcs_type",
                "vcs_url",
                "vcs_browser",
                "section",
                "priority",
                "distribution",
                "release",
                "component",
            ])
            .primary_key(&["source", "version", "distribution", "release", "component"])
            .computed([ComputedField::linked(
                "Uploaders of this source package, as (uploader, name, email)",
                Relation::new("uploaders", &["uploader", "name", "email"]),
            )])
            .build()?,
    ])
}
