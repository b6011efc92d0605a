// SPDX-FileCopyrightText: 2026 udd-api contributors
// SPDX-License-Identifier: MIT

use crate::error::Result;
use crate::schema::ResourceType;

use super::{POPCON, POPCON_SRC, POPCON_SRC_AVERAGE};

pub(super) fn types() -> Result<Vec<ResourceType>> {
    Ok(vec![
        ResourceType::builder(POPCON)
            .doc("Popularity contest figures per binary package")
            .tables(&["popcon"])
            .fields(&["package", "insts", "vote", "olde", "recent", "nofiles"])
            .build()?,
        ResourceType::builder(POPCON_SRC)
            .doc("Popularity contest figures per source package, summed over its binaries")
            .tables(&["popcon_src"])
            .fields(&["source", "insts", "vote", "olde", "recent", "nofiles"])
            .build()?,
        ResourceType::builder(POPCON_SRC_AVERAGE)
            .doc("Popularity contest figures per source package, averaged over its binaries")
            .tables(&["popcon_src_average"])
            .fields(&["source", "insts", "vote", "olde", "recent", "nofiles"])
            .build()?,
    ])
}
