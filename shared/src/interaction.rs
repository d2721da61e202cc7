//! Reconciles region clicks and externally selected catalog items into one
//! selection, drives the zoom controller, and reports location changes.

use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::config::MapConfig;
use crate::geometry::Position;
use crate::region_map::RegionMap;
use crate::resolver::NameResolver;
use crate::viewport::{ViewTransform, ZoomController};

/// Payload of the location-selection callback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationSelection {
    pub name: String,
    pub coordinates: Position,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectionState {
    pub selected_region_id: Option<String>,
    pub selected_location: Option<LocationSelection>,
}

/// The collaborator's "current catalog item", reduced to what the map reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalItem {
    pub id: String,
    /// Free-text place name, e.g. `"TP. Hồ Chí Minh"`.
    #[serde(default)]
    pub province: Option<String>,
}

impl ExternalItem {
    pub fn new(id: impl Into<String>, province: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            province: Some(province.into()),
        }
    }
}

/// Invoked with `None` for resets, clears and unresolvable items alike.
pub type LocationCallback = Box<dyn FnMut(Option<&LocationSelection>)>;

/// Handle for a deferred auto-zoom. Only the most recently issued task can
/// run; earlier ones are invalidated as soon as a new one is scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeferredTask {
    id: u64,
    delay_ms: u32,
}

impl DeferredTask {
    pub fn delay_ms(&self) -> u32 {
        self.delay_ms
    }
}

#[derive(Debug, Clone, PartialEq)]
enum DeferredAction {
    ZoomTo(String),
    Reset,
}

#[derive(Debug)]
struct Pending {
    task: DeferredTask,
    action: DeferredAction,
}

pub struct InteractionController {
    map: Rc<RegionMap>,
    resolver: NameResolver,
    zoom: ZoomController,
    selection: SelectionState,
    defer_ms: u32,
    next_task_id: u64,
    pending: Option<Pending>,
    last_item: Option<ExternalItem>,
    on_location_select: Option<LocationCallback>,
    disposed: bool,
}

impl std::fmt::Debug for InteractionController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InteractionController")
            .field("zoom", &self.zoom)
            .field("selection", &self.selection)
            .field("pending", &self.pending)
            .field("last_item", &self.last_item)
            .field("disposed", &self.disposed)
            .finish_non_exhaustive()
    }
}

impl InteractionController {
    pub fn new(map: Rc<RegionMap>, config: &MapConfig) -> Self {
        Self {
            map,
            resolver: NameResolver::default(),
            zoom: ZoomController::default(),
            selection: SelectionState::default(),
            defer_ms: config.auto_zoom_defer_ms,
            next_task_id: 0,
            pending: None,
            last_item: None,
            on_location_select: None,
            disposed: false,
        }
    }

    pub fn with_resolver(mut self, resolver: NameResolver) -> Self {
        self.resolver = resolver;
        self
    }

    pub fn with_zoom(mut self, zoom: ZoomController) -> Self {
        self.zoom = zoom;
        self
    }

    pub fn on_location_select(mut self, callback: LocationCallback) -> Self {
        self.on_location_select = Some(callback);
        self
    }

    pub fn map(&self) -> &RegionMap {
        &self.map
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn transform(&self) -> ViewTransform {
        self.zoom.transform()
    }

    pub fn zoom(&self) -> &ZoomController {
        &self.zoom
    }

    pub fn pending_task(&self) -> Option<DeferredTask> {
        self.pending.as_ref().map(|p| p.task)
    }

    /// A user clicked a rendered region. Overrides any pending auto-zoom from
    /// the external item.
    pub fn click_region(&mut self, name: &str) -> Option<LocationSelection> {
        if self.disposed {
            return None;
        }
        if self.map.get(name).is_none() {
            tracing::warn!(region = name, "click on unknown region");
            return None;
        }
        self.cancel_pending();
        self.apply_zoom(name)
    }

    /// The collaborator's current item changed. Returns the deferred task the
    /// host must run after [`DeferredTask::delay_ms`], if one was scheduled.
    ///
    /// Re-supplying the item already seen is a no-op, so a click selection
    /// survives re-renders that pass the same item again.
    pub fn set_external_item(&mut self, item: Option<&ExternalItem>) -> Option<DeferredTask> {
        if self.disposed || item == self.last_item.as_ref() {
            return None;
        }
        self.last_item = item.cloned();

        let Some(item) = item else {
            return Some(self.schedule(DeferredAction::Reset));
        };
        let Some(place) = item.province.as_deref().filter(|p| !p.trim().is_empty()) else {
            self.cancel_pending();
            return None;
        };

        match self.resolver.resolve(place, self.map.features()) {
            Some(feature) => {
                let name = feature.id.clone();
                self.selection.selected_region_id = Some(name.clone());
                self.selection.selected_location = None;
                Some(self.schedule(DeferredAction::ZoomTo(name)))
            }
            None => {
                self.selection = SelectionState::default();
                Some(self.schedule(DeferredAction::Reset))
            }
        }
    }

    /// Run a deferred task. Stale or cancelled tasks, and any task after
    /// [`dispose`](Self::dispose), do nothing and return `false`.
    pub fn run_deferred(&mut self, task: DeferredTask) -> bool {
        if self.disposed {
            return false;
        }
        let Some(pending) = self.pending.take_if(|p| p.task == task) else {
            tracing::debug!(task = task.id, "ignoring stale deferred task");
            return false;
        };
        match pending.action {
            DeferredAction::ZoomTo(name) => {
                self.apply_zoom(&name);
            }
            DeferredAction::Reset => self.reset_zoom(),
        }
        true
    }

    /// Back to the identity transform with nothing selected.
    pub fn reset_zoom(&mut self) {
        if self.disposed {
            return;
        }
        self.cancel_pending();
        self.zoom.reset();
        self.selection = SelectionState::default();
        self.emit(None);
    }

    /// Cancel whatever is pending and refuse further work.
    pub fn dispose(&mut self) {
        self.cancel_pending();
        self.on_location_select = None;
        self.disposed = true;
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    fn apply_zoom(&mut self, name: &str) -> Option<LocationSelection> {
        let feature = self.map.get(name)?;
        let target = self.zoom.zoom_to_feature(&self.map, feature)?;
        let location = LocationSelection {
            name: name.to_string(),
            coordinates: target.centroid,
        };
        self.selection.selected_region_id = Some(location.name.clone());
        self.selection.selected_location = Some(location.clone());
        self.emit(Some(&location));
        Some(location)
    }

    fn schedule(&mut self, action: DeferredAction) -> DeferredTask {
        self.cancel_pending();
        self.next_task_id += 1;
        let task = DeferredTask {
            id: self.next_task_id,
            delay_ms: self.defer_ms,
        };
        tracing::debug!(
            task = task.id,
            ?action,
            delay_ms = task.delay_ms,
            "scheduled deferred zoom"
        );
        self.pending = Some(Pending { task, action });
        task
    }

    fn cancel_pending(&mut self) {
        if let Some(stale) = self.pending.take() {
            tracing::debug!(task = stale.task.id, "cancelled deferred zoom");
        }
    }

    fn emit(&mut self, selection: Option<&LocationSelection>) {
        if let Some(callback) = self.on_location_select.as_mut() {
            callback(selection);
        }
    }
}
