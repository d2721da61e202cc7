use leptos::prelude::*;

use provmap_shared::LocationSelection;

use crate::catalog::CatalogItem;

/// Selection shared between the catalog and the map.
///
/// Constructed by the app and handed to [`crate::map_view::MapView`] as a prop.
#[derive(Clone, Copy)]
pub(crate) struct SelectionStore {
    /// Catalog item picked in the item list.
    pub item: RwSignal<Option<CatalogItem>>,
    /// Region last reported by the map.
    pub location: RwSignal<Option<LocationSelection>>,
}

impl SelectionStore {
    pub(crate) fn new() -> Self {
        Self {
            item: RwSignal::new(None),
            location: RwSignal::new(None),
        }
    }

    /// A new pick drops the region filter until the map reports again.
    pub(crate) fn pick_item(&self, item: Option<CatalogItem>) {
        self.location.set(None);
        self.item.set(item);
    }

    pub(crate) fn region_name(&self) -> Option<String> {
        self.location.with(|l| l.as_ref().map(|l| l.name.clone()))
    }
}
