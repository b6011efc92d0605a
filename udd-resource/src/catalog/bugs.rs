// SPDX-FileCopyrightText: 2026 udd-api contributors
// SPDX-License-Identifier: MIT

//! Bugs, active and archived.
//!
//! Every bug lives either in `bugs` or in `archived_bugs`, each table with
//! its own set of junction tables. The combined type looks in both and
//! keeps the table of origin as part of identity, since a bug can be
//! archived between two fetches.

use crate::error::Result;
use crate::linked::Linked;
use crate::relation::Relation;
use crate::resource::Resource;
use crate::schema::{ComputedField, Identity, ResourceType};
use crate::udd::Udd;

use super::{ACTIVE_BUGS, ARCHIVED_BUGS, BUGS};

const ACTIVE_TABLE: &str = "bugs";
const ARCHIVED_TABLE: &str = "archived_bugs";

const FIELDS: &[&str] = &[
    "id",
    "package",
    "source",
    "arrival",
    "status",
    "severity",
    "submitter",
    "submitter_name",
    "submitter_email",
    "owner",
    "owner_name",
    "owner_email",
    "done",
    "done_name",
    "done_email",
    "done_date",
    "title",
    "last_modified",
    "forwarded",
    "affects_oldstable",
    "affects_stable",
    "affects_testing",
    "affects_unstable",
    "affects_experimental",
];

const TARGETS: &[&str] = &[ACTIVE_BUGS, ARCHIVED_BUGS];

// Usertags are only recorded for active bugs.
const USERTAGS: Relation = Relation::new("usertags", &["email", "tag"]).base_table(ACTIVE_TABLE);

fn usertags(udd: &Udd, bug: &Resource) -> Result<Linked> {
    if bug.table() == ARCHIVED_TABLE {
        return Ok(Linked::Tuples(Vec::new()));
    }
    udd.fetch_linked(bug, &USERTAGS)
}

fn computed() -> Vec<ComputedField> {
    vec![
        ComputedField::linked(
            "Bugs blocked by this bug",
            Relation::new("blocks", &["blocked"]).targets(TARGETS),
        ),
        ComputedField::linked(
            "Bugs blocking this bug",
            Relation::new("blockedby", &["blocker"]).targets(TARGETS),
        ),
        ComputedField::linked(
            "Bugs merged with this bug",
            Relation::new("merged_with", &["merged_with"]).targets(TARGETS),
        ),
        ComputedField::linked(
            "Versions in which this bug is fixed",
            Relation::new("fixed_in", &["version"]),
        ),
        ComputedField::linked(
            "Versions in which this bug was found",
            Relation::new("found_in", &["version"]),
        ),
        ComputedField::linked("Tags of this bug", Relation::new("tags", &["tag"])),
        ComputedField::custom(
            "usertags",
            "User tags of this bug, as (email, tag) pairs",
            usertags,
        ),
        ComputedField::linked(
            "Packages this bug is filed against, as (package, source) pairs",
            Relation::new("packages", &["package", "source"]),
        ),
    ]
}

pub(super) fn types() -> Result<Vec<ResourceType>> {
    Ok(vec![
        ResourceType::builder(BUGS)
            .doc("Bugs from the Debian BTS, active or archived")
            .tables(&[ACTIVE_TABLE, ARCHIVED_TABLE])
            .fields(FIELDS)
            .identity(Identity::PerTable)
            .computed(computed())
            .build()?,
        ResourceType::builder(ACTIVE_BUGS)
            .doc("Active bugs from the Debian BTS")
            .tables(&[ACTIVE_TABLE])
            .fields(FIELDS)
            .computed(computed())
            .build()?,
        ResourceType::builder(ARCHIVED_BUGS)
            .doc("Archived bugs from the Debian BTS")
            .tables(&[ARCHIVED_TABLE])
            .fields(FIELDS)
            .computed(computed())
            .build()?,
    ])
}
