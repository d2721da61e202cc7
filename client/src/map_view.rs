use leptos::prelude::*;
use std::rc::Rc;

use gloo_timers::callback::Timeout;
use provmap_shared::config::{CANVAS_HEIGHT, CANVAS_WIDTH};
use provmap_shared::style::{self, Label};
use provmap_shared::{
    BUNDLED_TOPOLOGY, ColorToken, InteractionController, LocationCallback, LocationSelection,
    MapConfig, MapStatus, RegionKind, RegionMap, RegionStyle, SelectionMarker, ViewTransform,
};

use crate::selection::SelectionStore;

const MARKER_CSS: &str = "@keyframes provmap-pulse { 0%, 100% { transform: scale(1); opacity: 0.8; } 50% { transform: scale(2); opacity: 0.4; } } \
.selection-marker { transform-box: fill-box; transform-origin: center; animation: provmap-pulse 2s ease-in-out infinite; }";

/// Drawable region, precomputed once after load.
#[derive(Clone)]
struct RegionPath {
    id: String,
    kind: RegionKind,
    d: String,
}

struct LoadedMap {
    regions: Vec<RegionPath>,
    labels: Vec<Label>,
    controller: InteractionController,
}

fn load_map(store: SelectionStore) -> Result<LoadedMap, provmap_shared::LoadError> {
    let config = MapConfig::default();
    let map = Rc::new(RegionMap::load(BUNDLED_TOPOLOGY, &config)?);
    let regions = map
        .features()
        .iter()
        .map(|f| RegionPath {
            id: f.id.clone(),
            kind: f.kind,
            d: map.region_path(f),
        })
        .collect();
    let location = store.location;
    let callback: LocationCallback = Box::new(move |selection: Option<&LocationSelection>| {
        location.set(selection.cloned());
    });
    let controller = InteractionController::new(map, &config).on_location_select(callback);
    let labels = style::region_labels(controller.map(), controller.zoom().centroid_strategy());
    Ok(LoadedMap {
        regions,
        labels,
        controller,
    })
}

/// Vietnam province map with click-to-zoom and catalog-driven auto-zoom.
#[component]
pub fn MapView(store: SelectionStore) -> impl IntoView {
    let status = RwSignal::new(MapStatus::Loading);
    let transform = RwSignal::new(ViewTransform::IDENTITY);
    let selected = RwSignal::new(None::<String>);
    let hovered = RwSignal::new(None::<String>);
    let regions = RwSignal::new(Vec::<RegionPath>::new());
    let labels = RwSignal::new(Vec::<Label>::new());
    let marker = RwSignal::new(None::<SelectionMarker>);

    let controller = StoredValue::new_local(None::<InteractionController>);
    // Pending auto-zoom timer; replaced (and the old one cancelled) on every item change.
    let pending_timeout = StoredValue::new_local(None::<Timeout>);

    let cancel_timer = move || {
        pending_timeout.try_update_value(|slot| {
            if let Some(stale) = slot.take() {
                stale.cancel();
            }
        });
    };

    let sync = move || {
        controller.try_with_value(|c| {
            let Some(c) = c else {
                return;
            };
            let region = c.selection().selected_region_id.clone();
            marker.set(SelectionMarker::place(
                c.map(),
                region.as_deref(),
                store.item.with_untracked(Option::is_some),
                c.zoom().centroid_strategy(),
            ));
            transform.set(c.transform());
            selected.set(region);
        });
    };

    let loaded = load_map(store);
    status.set(MapStatus::of(&loaded));
    match loaded {
        Ok(loaded) => {
            web_sys::console::info_1(
                &format!("Map ready: {} regions", loaded.regions.len()).into(),
            );
            regions.set(loaded.regions);
            labels.set(loaded.labels);
            controller.set_value(Some(loaded.controller));
        }
        Err(e) => {
            web_sys::console::warn_1(&format!("Map load failed: {e}").into());
        }
    }

    Effect::new(move || {
        let item = store.item.get();
        let external = item.as_ref().map(|i| i.as_external());
        let task = controller
            .try_update_value(|c| {
                c.as_mut()
                    .and_then(|c| c.set_external_item(external.as_ref()))
            })
            .flatten();
        sync();
        let Some(task) = task else {
            return;
        };
        cancel_timer();
        let timeout = Timeout::new(task.delay_ms(), move || {
            let ran = controller
                .try_update_value(|c| c.as_mut().is_some_and(|c| c.run_deferred(task)))
                .unwrap_or(false);
            if ran {
                sync();
            }
        });
        pending_timeout.set_value(Some(timeout));
    });

    on_cleanup(move || {
        cancel_timer();
        controller.try_update_value(|c| {
            if let Some(c) = c.as_mut() {
                c.dispose();
            }
        });
    });

    let on_region_click = move |id: String| {
        let location = controller
            .try_update_value(|c| c.as_mut().and_then(|c| c.click_region(&id)))
            .flatten();
        if location.is_some() {
            cancel_timer();
        }
        sync();
    };

    let on_reset = move |_: web_sys::MouseEvent| {
        cancel_timer();
        controller.try_update_value(|c| {
            if let Some(c) = c.as_mut() {
                c.reset_zoom();
            }
        });
        sync();
    };

    let header = move || match status.get() {
        MapStatus::Loading => "Đang tải bản đồ Việt Nam...".to_string(),
        MapStatus::Failed(_) => "Không thể tải bản đồ".to_string(),
        MapStatus::Ready if transform.get().zoomed => {
            "Bản đồ hành chính Việt Nam (Đã zoom)".to_string()
        }
        MapStatus::Ready => "Bản đồ hành chính Việt Nam".to_string(),
    };

    view! {
        <div class="interactive-map">
            <style>{MARKER_CSS}</style>
            <div class="map-header" style="display: flex; align-items: center; justify-content: space-between; gap: 12px;">
                <h3 style="margin: 0;">{header}</h3>
                <div class="map-controls" style="display: flex; align-items: center; gap: 8px;">
                    {move || selected.get().map(|name| view! {
                        <span class="selected-location">{name}</span>
                    })}
                    <button
                        class="btn ghost small"
                        disabled=move || !status.get().is_ready()
                        on:click=on_reset
                    >
                        {move || if transform.get().zoomed { "Zoom Out" } else { "Reset" }}
                    </button>
                </div>
            </div>

            <div class="map-container">
                <Show
                    when=move || status.get().is_ready()
                    fallback=move || view! {
                        <div style="height: 400px; display: flex; align-items: center; justify-content: center; background: var(--bg-light);">
                            {move || match status.get() {
                                MapStatus::Failed(reason) => reason,
                                _ => "Đang xử lý dữ liệu TopoJSON...".to_string(),
                            }}
                        </div>
                    }
                >
                    <svg
                        viewBox=format!("0 0 {CANVAS_WIDTH} {CANVAS_HEIGHT}")
                        class="vietnam-map"
                        style="width: 100%; height: 500px; background: var(--bg-light);"
                    >
                        <g
                            transform=move || transform.get().svg_transform()
                            style="transition: transform 0.8s ease-in-out;"
                        >
                            <For
                                each=move || regions.get()
                                key=|r| r.id.clone()
                                let:region
                            >
                                {
                                    let RegionPath { id, kind, d } = region;
                                    let region_style = {
                                        let id = id.clone();
                                        move || {
                                            let is_selected = selected.with(|s| s.as_deref() == Some(id.as_str()));
                                            let is_hovered = hovered.with(|h| h.as_deref() == Some(id.as_str()));
                                            RegionStyle::for_region(kind, is_selected, is_hovered)
                                        }
                                    };
                                    let fill = region_style.clone();
                                    let stroke = region_style.clone();
                                    let width = region_style.clone();
                                    let opacity = region_style;
                                    let click_id = id.clone();
                                    let enter_id = id.clone();
                                    let leave_id = id;
                                    view! {
                                        <path
                                            d=d
                                            class="province-path"
                                            fill=move || fill().fill.css_var()
                                            stroke=move || stroke().stroke.css_var()
                                            stroke-width=move || width().stroke_width.to_string()
                                            opacity=move || opacity().opacity.to_string()
                                            style="cursor: pointer; transition: all 0.3s ease;"
                                            on:click=move |_| on_region_click(click_id.clone())
                                            on:mouseenter=move |_| hovered.set(Some(enter_id.clone()))
                                            on:mouseleave=move |_| {
                                                hovered.update(|h| {
                                                    if h.as_deref() == Some(leave_id.as_str()) {
                                                        *h = None;
                                                    }
                                                });
                                            }
                                        />
                                    }
                                }
                            </For>
                            <For
                                each=move || labels.get()
                                key=|l| l.text.clone()
                                let:label
                            >
                                <text
                                    x=label.x.to_string()
                                    y=label.y.to_string()
                                    font-size="10"
                                    fill=ColorToken::Text.css_var()
                                    text-anchor="middle"
                                    pointer-events="none"
                                    style="font-weight: 600; text-shadow: 0 1px 2px rgba(255,255,255,0.8);"
                                >
                                    {label.text.clone()}
                                </text>
                            </For>
                            {move || marker.get().map(|m| view! {
                                <circle
                                    class="selection-marker"
                                    cx=m.x.to_string()
                                    cy=m.y.to_string()
                                    r="10"
                                    fill="none"
                                    stroke=ColorToken::Accent.css_var()
                                    stroke-width="3"
                                    stroke-dasharray="6,3"
                                    opacity="0.8"
                                />
                            })}
                        </g>
                    </svg>
                </Show>

                <div class="map-legend" style="display: flex; gap: 16px; margin-top: 8px; font-size: 0.8rem;">
                    <LegendItem color=ColorToken::Bg.css_var() label="Tỉnh/Thành phố" />
                    <LegendItem color=ColorToken::Secondary.css_var() label="Hoàng Sa & Trường Sa" />
                    <LegendItem color=ColorToken::Accent.css_var() label="Được chọn" />
                    <LegendItem color=ColorToken::Primary.css_var() label="Hover" faded=true />
                </div>
            </div>

            {move || selected.get().map(|name| view! {
                <div class="location-info">
                    <h4>{name}</h4>
                    <p>"Tỉnh/thành phố được chọn trên bản đồ"</p>
                </div>
            })}
        </div>
    }
}

#[component]
fn LegendItem(
    color: &'static str,
    label: &'static str,
    #[prop(optional)] faded: bool,
) -> impl IntoView {
    let swatch = format!(
        "width: 14px; height: 14px; border-radius: 3px; background: {color}; opacity: {};",
        if faded { 0.3 } else { 1.0 }
    );
    view! {
        <div class="legend-item" style="display: flex; align-items: center; gap: 6px;">
            <div class="legend-color" style=swatch></div>
            <span>{label}</span>
        </div>
    }
}
