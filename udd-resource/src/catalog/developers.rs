// SPDX-FileCopyrightText: 2026 udd-api contributors
// SPDX-License-Identifier: MIT

use crate::error::Result;
use crate::relation::Relation;
use crate::schema::{ComputedField, ResourceType};

use super::DEVELOPERS;

// Identity data comes from carnivore, which stores one row per known
// address, name and key.
const BASE: &str = "carnivore";

pub(super) fn types() -> Result<Vec<ResourceType>> {
    Ok(vec![
        ResourceType::builder(DEVELOPERS)
            .doc("Debian developers and contributors, as known by carnivore")
            .tables(&["carnivore_login"])
            .fields(&["id", "login"])
            .computed([
                ComputedField::linked(
                    "Email addresses of this developer",
                    Relation::new("emails", &["email"]).base_table(BASE),
                ),
                ComputedField::linked(
                    "Names of this developer",
                    Relation::new("names", &["name"]).base_table(BASE),
                ),
                ComputedField::linked(
                    "Keys of this developer, as (key, key_type) pairs",
                    Relation::new("keys", &["key", "key_type"]).base_table(BASE),
                ),
            ])
            .build()?,
    ])
}
