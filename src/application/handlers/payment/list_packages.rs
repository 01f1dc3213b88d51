//! ListPackagesHandler - Query handler for the package catalog.

use std::sync::Arc;

use crate::domain::payment::{PackageCatalog, TrainingPackage};

pub struct ListPackagesHandler {
    catalog: Arc<PackageCatalog>,
}

impl ListPackagesHandler {
    pub fn new(catalog: Arc<PackageCatalog>) -> Self {
        Self { catalog }
    }

    pub fn handle(&self) -> Vec<TrainingPackage> {
        self.catalog.all().to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn returns_catalog_in_order() {
        let handler = ListPackagesHandler::new(Arc::new(PackageCatalog::standard().clone()));

        let ids: Vec<String> = handler
            .handle()
            .into_iter()
            .map(|p| p.id.to_string())
            .collect();

        assert_eq!(ids, vec!["basic", "standard", "premium", "unlimited"]);
    }
}
