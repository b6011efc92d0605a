// SPDX-FileCopyrightText: 2026 udd-api contributors
// SPDX-License-Identifier: MIT

//! Binary packages.
//!
//! `packages` is the set of distinct binary package names; each concrete
//! build (version, architecture, suite) is a `subpackages` row of the same
//! table.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use tracing::warn;

use crate::error::{Result, display_key};
use crate::linked::Linked;
use crate::relation::Relation;
use crate::resource::Resource;
use crate::schema::{ComputedField, ResourceType};
use crate::udd::{Filters, Udd};

use super::{PACKAGES, SUBPACKAGES};

const TABLE: &str = "packages";

const SUBPACKAGE_FIELDS: &[&str] = &[
    "package",
    "version",
    "architecture",
    "maintainer",
    "maintainer_name",
    "maintainer_email",
    "description",
    "description_md5",
    "source",
    "source_version",
    "essential",
    "depends",
    "recommends",
    "suggests",
    "pre_depends",
    "installed_size",
    "homepage",
    "size",
    "section",
    "priority",
    "provides",
    "conflicts",
    "distribution",
    "release",
    "component",
];

const DESCRIPTIONS: Relation = Relation::new(
    "descriptions",
    &["language", "description", "long_description"],
)
.excluding(&["version", "architecture"]);

// The lintian junction is keyed by package name only.
const LINTIAN: Relation = Relation::new(
    "lintian",
    &["version", "architecture", "tag", "tag_type", "information"],
)
.excluding(&[
    "version",
    "architecture",
    "distribution",
    "release",
    "component",
]);

fn subpackages(udd: &Udd, package: &Resource) -> Result<Linked> {
    let ty = udd.resolve(SUBPACKAGES)?;
    let filters = Filters::from([("package".to_owned(), package.key()[0].to_string())]);
    udd.filter(&ty, &filters).map(Linked::Objects)
}

// The table does not enforce one row per language; the first one wins.
fn descriptions(udd: &Udd, subpackage: &Resource) -> Result<Linked> {
    let mut by_language = BTreeMap::new();
    for mut row in udd.linked_rows(subpackage, &DESCRIPTIONS)? {
        let language = row.remove(0).to_string();
        match by_language.entry(language) {
            Entry::Vacant(entry) => {
                entry.insert(row);
            }
            Entry::Occupied(entry) => warn!(
                "{}/{}: ignoring duplicate {:?} description",
                subpackage.path(),
                display_key(subpackage.key()),
                entry.key()
            ),
        }
    }
    Ok(Linked::Keyed(by_language))
}

fn lintian(udd: &Udd, subpackage: &Resource) -> Result<Linked> {
    let version = subpackage.get("version");
    let architecture = subpackage.get("architecture");
    let tags = udd
        .linked_rows(subpackage, &LINTIAN)?
        .into_iter()
        .filter(|row| Some(&row[0]) == version && Some(&row[1]) == architecture)
        .map(|mut row| row.split_off(2))
        .collect();
    Ok(Linked::Tuples(tags))
}

pub(super) fn types() -> Result<Vec<ResourceType>> {
    Ok(vec![
        ResourceType::builder(PACKAGES)
            .doc("Binary package names, across every version and architecture")
            .distinct(TABLE)
            .fields(&["package"])
            .computed([
                ComputedField::custom(
                    "subpackages",
                    "Every version, architecture and suite of this package",
                    subpackages,
                ),
                ComputedField::linked("Debtags of this package", Relation::new("tags", &["tag"])),
            ])
            .build()?,
        ResourceType::builder(SUBPACKAGES)
            .doc("Binary packages, one per version, architecture and suite")
            .tables(&[TABLE])
            .fields(SUBPACKAGE_FIELDS)
            .primary_key(&[
                "package",
                "version",
                "architecture",
                "distribution",
                "release",
                "component",
            ])
            .computed([
                ComputedField::custom(
                    "descriptions",
                    "Translated descriptions, as language: (description, long_description)",
                    descriptions,
                ),
                ComputedField::custom(
                    "lintian",
                    "Lintian tags for this version and architecture, as (tag, tag_type, information)",
                    lintian,
                ),
            ])
            .build()?,
    ])
}
