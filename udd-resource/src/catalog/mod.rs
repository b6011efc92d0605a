// SPDX-FileCopyrightText: 2026 udd-api contributors
// SPDX-License-Identifier: MIT

//! The resource types served by the API.

mod bugs;
mod developers;
mod packages;
mod popcon;
mod sources;

use crate::error::Result;
use crate::registry::Registry;

pub const BUGS: &str = "bugs";
pub const ACTIVE_BUGS: &str = "active_bugs";
pub const ARCHIVED_BUGS: &str = "archived_bugs";
pub const DEVELOPERS: &str = "developers";
pub const PACKAGES: &str = "packages";
pub const SUBPACKAGES: &str = "subpackages";
pub const SOURCES: &str = "sources";
pub const POPCON: &str = "popcon";
pub const POPCON_SRC: &str = "popcon_src";
pub const POPCON_SRC_AVERAGE: &str = "popcon_src_average";

/// Registry holding every catalog type.
///
/// Fails if two types share a path or a relation targets an unknown type.
pub fn registry() -> Result<Registry> {
    let mut registry = Registry::new();
    for ty in bugs::types()?
        .into_iter()
        .chain(developers::types()?)
        .chain(packages::types()?)
        .chain(sources::types()?)
        .chain(popcon::types()?)
    {
        registry.register(ty)?;
    }
    registry.check_targets()?;
    Ok(registry)
}
