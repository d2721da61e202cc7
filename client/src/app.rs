use leptos::prelude::*;
use wasm_bindgen::JsCast;

use crate::catalog::{self, CatalogItem, format_price, items_in_region};
use crate::map_view::MapView;
use crate::selection::SelectionStore;

#[component]
pub fn App() -> impl IntoView {
    let store = SelectionStore::new();
    let items: StoredValue<Vec<CatalogItem>> = StoredValue::new(catalog::load_catalog());

    let on_pick = move |e: web_sys::Event| {
        let Some(target) = e.target() else {
            return;
        };
        let Ok(select) = target.dyn_into::<web_sys::HtmlSelectElement>() else {
            return;
        };
        let id = select.value();
        let picked = items.with_value(|items| items.iter().find(|i| i.id == id).cloned());
        store.pick_item(picked);
    };

    let visible = move || {
        let region = store.region_name();
        items.with_value(|items| {
            items_in_region(items, region.as_deref())
                .into_iter()
                .cloned()
                .collect::<Vec<_>>()
        })
    };

    view! {
        <div class="artisans-layout" style="display: grid; grid-template-columns: minmax(0, 3fr) minmax(0, 2fr); gap: 24px; padding: 24px;">
            <MapView store=store />
            <div class="catalog-panel">
                <label style="display: block; margin-bottom: 12px;">
                    "Sản phẩm "
                    <select
                        prop:value=move || store.item.with(|i| i.as_ref().map(|i| i.id.clone()).unwrap_or_default())
                        on:change=on_pick
                    >
                        <option value="">"Tất cả"</option>
                        {items.with_value(|items| {
                            items
                                .iter()
                                .map(|item| view! {
                                    <option value=item.id.clone()>{format!("{} ({})", item.name, item.province)}</option>
                                })
                                .collect_view()
                        })}
                    </select>
                </label>
                <h4 style="margin: 0 0 8px;">
                    {move || match store.region_name() {
                        Some(region) => format!("Sản phẩm từ {region}"),
                        None => "Tất cả sản phẩm".to_string(),
                    }}
                </h4>
                <ul class="product-list" style="list-style: none; padding: 0; margin: 0;">
                    <For
                        each=visible
                        key=|item| item.id.clone()
                        let:item
                    >
                        <li class="product-card" style="padding: 8px 0; border-bottom: 1px solid var(--bg);">
                            <div style="font-weight: 600;">{item.name.clone()}</div>
                            <div class="product-province">
                                {format!("{} · {}, {}", item.ethnic, item.village, item.province)}
                            </div>
                            <div>{format_price(item.price)}</div>
                        </li>
                    </For>
                </ul>
            </div>
        </div>
    }
}
