// SPDX-FileCopyrightText: 2026 udd-api contributors
// SPDX-License-Identifier: MIT

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::schema::{ResourceType, Strategy};

/// Resource types keyed by path.
#[derive(Debug, Default)]
pub struct Registry {
    types: BTreeMap<&'static str, Arc<ResourceType>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a type under its path. Paths are unique.
    pub fn register(&mut self, ty: ResourceType) -> Result<Arc<ResourceType>> {
        let path = ty.path();
        if self.types.contains_key(path) {
            return Err(Error::DuplicatePath(path));
        }
        let ty = Arc::new(ty);
        self.types.insert(path, Arc::clone(&ty));
        Ok(ty)
    }

    pub fn resolve(&self, path: &str) -> Result<Arc<ResourceType>> {
        self.types
            .get(path)
            .cloned()
            .ok_or_else(|| Error::ResourceNotFound(path.to_owned()))
    }

    /// Every registered type, ordered by path.
    pub fn list(&self) -> impl Iterator<Item = (&'static str, &Arc<ResourceType>)> {
        self.types.iter().map(|(path, ty)| (*path, ty))
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Check that every relation target names a registered type.
    pub fn check_targets(&self) -> Result<()> {
        for ty in self.types.values() {
            for field in ty.computed() {
                let Strategy::Relation(relation) = &field.strategy else {
                    continue;
                };
                for target in relation.targets {
                    if !self.types.contains_key(target) {
                        return Err(Error::InvalidDeclaration {
                            resource: ty.path(),
                            reason: format!(
                                "computed field '{}' targets unregistered resource '{target}'",
                                field.name
                            ),
                        });
                    }
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::relation::Relation;
    use crate::schema::ComputedField;

    fn popcon(path: &'static str) -> ResourceType {
        ResourceType::builder(path)
            .tables(&["popcon"])
            .fields(&["package", "insts"])
            .build()
            .unwrap()
    }

    #[test]
    fn test_register_and_resolve() {
        let mut registry = Registry::new();
        let ty = registry.register(popcon("popcon")).unwrap();
        assert!(Arc::ptr_eq(&registry.resolve("popcon").unwrap(), &ty));
        assert!(matches!(
            registry.resolve("popcorn"),
            Err(Error::ResourceNotFound(p)) if p == "popcorn"
        ));
    }

    #[test]
    fn test_duplicate_path() {
        let mut registry = Registry::new();
        registry.register(popcon("popcon")).unwrap();
        assert!(matches!(
            registry.register(popcon("popcon")),
            Err(Error::DuplicatePath("popcon"))
        ));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_dangling_target() {
        let mut registry = Registry::new();
        registry
            .register(
                ResourceType::builder("bugs")
                    .tables(&["bugs"])
                    .fields(&["id"])
                    .computed([ComputedField::linked(
                        "",
                        Relation::new("blocks", &["blocked"]).targets(&["active_bugs"]),
                    )])
                    .build()
                    .unwrap(),
            )
            .unwrap();
        assert!(registry.check_targets().is_err());
    }
}
