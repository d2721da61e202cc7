use serde::Deserialize;

use provmap_shared::ExternalItem;

const CATALOG_JSON: &str = include_str!("../data/catalog.json");

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub(crate) struct CatalogItem {
    pub id: String,
    pub name: String,
    /// Free text as written by the seller, not a canonical region name.
    pub province: String,
    pub village: String,
    pub ethnic: String,
    /// VND.
    pub price: u64,
}

impl CatalogItem {
    pub(crate) fn as_external(&self) -> ExternalItem {
        ExternalItem::new(self.id.clone(), self.province.clone())
    }
}

pub(crate) fn load_catalog() -> Vec<CatalogItem> {
    match serde_json::from_str(CATALOG_JSON) {
        Ok(items) => items,
        Err(e) => {
            web_sys::console::warn_1(&format!("Catalog parse failed: {e}").into());
            Vec::new()
        }
    }
}

/// Items whose province text mentions `region`; everything when no region is selected.
pub(crate) fn items_in_region<'a>(
    items: &'a [CatalogItem],
    region: Option<&str>,
) -> Vec<&'a CatalogItem> {
    match region {
        Some(region) => items
            .iter()
            .filter(|i| i.province.contains(region))
            .collect(),
        None => items.iter().collect(),
    }
}

pub(crate) fn format_price(vnd: u64) -> String {
    let digits = vnd.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 2);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push('.');
        }
        out.push(ch);
    }
    out.push_str(" ₫");
    out
}
