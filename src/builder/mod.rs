//! Route builder orchestrator
//!
//! Wires the map surface, geocoder, stop sequence, editor panel, search
//! overlay, and route renderer together:
//!
//! - surface click: geocode, append a stop, select it, open the panel
//! - marker click: select the stop, open the panel (no geocoding)
//! - panel save / delete, list reorder: mutate the sequence
//!
//! After every mutation the tour form is handed the new stop list, markers
//! are redrawn, and the renderer recomputes the route if positions moved.
//! Events are handled one at a time through `&mut self`, so mutations apply
//! in the order they arrive.

use crate::config::Config;
use crate::coord::Coordinates;
use crate::error::{Error, Result};
use crate::directions::DirectionsBackend;
use crate::geo::{GeocodeBackend, GeocodeClient, SearchResult};
use crate::lifecycle::Lifecycle;
use crate::map::{MapEvent, MapSdk, MapSurface, MarkerSpec, SdkEvent};
use crate::panel::StopEditorPanel;
use crate::render::{RouteRenderer, RouteState};
use crate::search::{SearchOverlay, SearchSettings};
use crate::stop::{Stop, StopId, StopLocation, StopSequence};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Receives the stop list after every mutation
///
/// The form owns persistence; the builder never saves anything itself.
pub trait TourForm: Send {
    fn stops_changed(&mut self, tour_id: &str, stops: &[Stop]);
}

impl<F> TourForm for F
where
    F: FnMut(&str, &[Stop]) + Send,
{
    fn stops_changed(&mut self, tour_id: &str, stops: &[Stop]) {
        self(tour_id, stops)
    }
}

/// Camera and mount settings
#[derive(Debug, Clone)]
pub struct BuilderSettings {
    pub container: String,
    pub initial_center: Coordinates,
    pub initial_zoom: f64,
    pub selected_zoom: f64,
    pub fit_padding: f64,
    pub search: SearchSettings,
}

impl BuilderSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            container: config.map.container.clone(),
            initial_center: config.default_center(),
            initial_zoom: config.map.initial_zoom,
            selected_zoom: config.map.selected_zoom,
            fit_padding: config.map.fit_padding,
            search: SearchSettings::from_config(config),
        }
    }
}

impl Default for BuilderSettings {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

/// Everything except the map itself, for rendering or inspection
#[derive(Debug, Clone, Serialize)]
pub struct BuilderState {
    pub tour_id: String,
    pub stops: Vec<Stop>,
    pub selected: Option<StopId>,
    pub panel: StopEditorPanel,
    pub route: RouteState,
    pub search_query: String,
    pub search_results: Vec<SearchResult>,
    pub search_open: bool,
}

/// The interactive tour-route builder for one tour draft
pub struct RouteBuilder<S, G, D, F>
where
    S: MapSdk,
{
    tour_id: String,
    surface: MapSurface<S>,
    geocoder: GeocodeClient<Arc<G>>,
    search: SearchOverlay<G>,
    renderer: RouteRenderer<D>,
    sequence: StopSequence,
    selected: Option<StopId>,
    panel: StopEditorPanel,
    form: F,
    settings: BuilderSettings,
    lifecycle: Lifecycle,
}

impl<S, G, D, F> RouteBuilder<S, G, D, F>
where
    S: MapSdk,
    G: GeocodeBackend + 'static,
    D: DirectionsBackend,
    F: TourForm,
{
    /// Mount the builder: create the viewport, draw the initial stops, and
    /// derive their route
    pub async fn mount(
        tour_id: impl Into<String>,
        stops: Vec<Stop>,
        sdk: S,
        geocoder: Arc<G>,
        directions: D,
        form: F,
        settings: BuilderSettings,
    ) -> Result<Self> {
        let tour_id = tour_id.into();
        let lifecycle = Lifecycle::new();
        let sequence = StopSequence::from_stops(stops.clone());
        let normalized = sequence.stops() != stops.as_slice();

        let mut surface = MapSurface::new(sdk);
        surface.initialize(
            &settings.container,
            settings.initial_center,
            settings.initial_zoom,
        )?;

        let search = SearchOverlay::new(
            Arc::clone(&geocoder),
            settings.search.clone(),
            lifecycle.clone(),
        );

        let mut builder = Self {
            tour_id,
            surface,
            geocoder: GeocodeClient::new(geocoder),
            search,
            renderer: RouteRenderer::new(directions),
            sequence,
            selected: None,
            panel: StopEditorPanel::new(),
            form,
            settings,
            lifecycle,
        };

        info!(
            "Mounted route builder for tour {} with {} stops",
            builder.tour_id,
            builder.sequence.len()
        );

        if normalized {
            // Stored numbering had gaps or duplicates; hand back the fixed list
            builder
                .form
                .stops_changed(&builder.tour_id, builder.sequence.stops());
        }
        builder.refresh_markers()?;
        builder.fit_camera()?;
        builder.recompute_route().await?;
        Ok(builder)
    }

    fn ensure_live(&self) -> Result<()> {
        if self.lifecycle.is_torn_down() {
            return Err(Error::TornDown);
        }
        Ok(())
    }

    /// Feed raw SDK input through the surface and act on it
    pub async fn handle_sdk_event(&mut self, event: SdkEvent) -> Result<()> {
        self.ensure_live()?;
        match self.surface.handle_sdk_event(event) {
            Some(event) => self.handle_event(event).await,
            None => Ok(()),
        }
    }

    /// React to a surface event
    pub async fn handle_event(&mut self, event: MapEvent) -> Result<()> {
        match event {
            MapEvent::SurfaceClick { coordinate } => {
                self.on_surface_click(coordinate).await?;
                Ok(())
            }
            MapEvent::MarkerClick { marker_id } => self.on_marker_click(&StopId::new(marker_id)),
        }
    }

    /// Place a new stop where the map was clicked
    pub async fn on_surface_click(&mut self, coordinate: Coordinates) -> Result<StopId> {
        self.ensure_live()?;
        coordinate.validate()?;

        let address = self
            .lifecycle
            .guard(self.geocoder.address_for(coordinate))
            .await
            .ok_or(Error::TornDown)?;

        let stop = Stop::new(
            self.sequence.next_sequence_no(),
            StopLocation::from_address(coordinate, address),
        );
        let id = stop.id.clone();
        debug!("Adding stop {} at {:?}", id, coordinate);

        self.sequence = self.sequence.insert(stop.clone());
        self.selected = Some(id.clone());
        self.panel.open(&stop, true);

        self.after_mutation(true).await?;
        self.focus_selected()?;
        Ok(id)
    }

    /// Select a stop from its marker
    pub fn on_marker_click(&mut self, id: &StopId) -> Result<()> {
        self.ensure_live()?;
        let stop = self
            .sequence
            .get(id)
            .ok_or_else(|| Error::UnknownStop(id.to_string()))?
            .clone();

        self.selected = Some(stop.id.clone());
        self.panel.open(&stop, false);
        self.refresh_markers()?;
        self.focus_selected()
    }

    /// Commit the panel draft to the selected stop
    ///
    /// An empty name is rejected and leaves the sequence untouched.
    pub async fn save_panel(&mut self) -> Result<()> {
        self.ensure_live()?;
        let (id, patch) = self.panel.save()?;
        self.sequence = self.sequence.update(&id, &patch);
        self.after_mutation(false).await
    }

    /// Delete the stop bound to the panel
    pub async fn delete_selected(&mut self) -> Result<()> {
        self.ensure_live()?;
        let Some(id) = self.panel.delete().or_else(|| self.selected.take()) else {
            return Err(Error::UnknownStop("no stop selected".to_string()));
        };
        self.selected = None;
        self.sequence = self.sequence.remove(&id);
        self.after_mutation(true).await
    }

    /// Adopt a drag-and-drop order
    pub async fn reorder(&mut self, new_order: Vec<Stop>) -> Result<()> {
        self.ensure_live()?;
        self.sequence = self.sequence.reorder(new_order)?;
        self.after_mutation(false).await
    }

    /// Adopt a drag-and-drop order given as ids
    pub async fn reorder_ids(&mut self, ids: &[StopId]) -> Result<()> {
        self.ensure_live()?;
        self.sequence = self.sequence.reorder_ids(ids)?;
        self.after_mutation(false).await
    }

    /// Close the panel and drop the selection
    pub fn close_panel(&mut self) -> Result<()> {
        self.ensure_live()?;
        self.panel.close();
        self.selected = None;
        self.refresh_markers()
    }

    pub fn panel_mut(&mut self) -> &mut StopEditorPanel {
        &mut self.panel
    }

    /// A keystroke in the search box
    pub fn search_input(&mut self, text: impl Into<String>) {
        self.search.input(text);
    }

    /// Enter pressed in the search box
    pub async fn search_submit(&mut self) -> Result<Option<SearchResult>> {
        self.ensure_live()?;
        self.search.submit(&mut self.surface).await
    }

    /// Pick one of the listed search results
    pub fn search_select(&mut self, index: usize) -> Result<Option<SearchResult>> {
        self.ensure_live()?;
        self.search.select(index, &mut self.surface)
    }

    /// Click outside the search box
    pub fn search_dismiss(&mut self) {
        self.search.dismiss();
    }

    /// Apply search responses that have arrived since the last call
    pub fn poll_search(&mut self) -> usize {
        self.search.drain()
    }

    pub fn search(&self) -> &SearchOverlay<G> {
        &self.search
    }

    async fn after_mutation(&mut self, size_changed: bool) -> Result<()> {
        self.form.stops_changed(&self.tour_id, self.sequence.stops());
        self.refresh_markers()?;
        if size_changed {
            self.fit_camera()?;
        }
        if !self.renderer.is_current(self.sequence.stops()) {
            self.recompute_route().await?;
        }
        Ok(())
    }

    fn markers(&self) -> Vec<MarkerSpec> {
        self.sequence
            .iter()
            .map(|stop| MarkerSpec {
                id: stop.id.to_string(),
                coordinate: stop.coordinates(),
                selected: self.selected.as_ref() == Some(&stop.id),
                label: format!("{}. {}", stop.sequence_no, stop.name),
            })
            .collect()
    }

    fn refresh_markers(&mut self) -> Result<()> {
        let markers = self.markers();
        self.surface.set_markers(&markers)
    }

    /// Frame every stop; a lone stop is focused instead
    fn fit_camera(&mut self) -> Result<()> {
        let coordinates: Vec<Coordinates> = self.sequence.iter().map(|s| s.coordinates()).collect();
        match coordinates.as_slice() {
            [] => Ok(()),
            [only] => self.surface.focus_on(*only, self.settings.selected_zoom),
            _ => self.surface.fit_bounds(&coordinates, self.settings.fit_padding),
        }
    }

    fn focus_selected(&mut self) -> Result<()> {
        let Some(stop) = self.selected.as_ref().and_then(|id| self.sequence.get(id)) else {
            return Ok(());
        };
        let coordinate = stop.coordinates();
        self.surface.focus_on(coordinate, self.settings.selected_zoom)
    }

    async fn recompute_route(&mut self) -> Result<()> {
        let generation = self.renderer.begin(self.sequence.stops());
        let state = self
            .lifecycle
            .guard(self.renderer.derive(self.sequence.stops()))
            .await;

        match state {
            Some(state) => {
                self.renderer.apply(generation, state, &mut self.surface)?;
                Ok(())
            }
            None => {
                warn!("Route recompute abandoned: builder torn down");
                Err(Error::TornDown)
            }
        }
    }

    /// Unmount: abandon in-flight requests and release the map
    pub fn teardown(&mut self) {
        if self.lifecycle.is_torn_down() && self.surface.is_torn_down() {
            return;
        }
        self.lifecycle.teardown();
        self.search.teardown();
        self.panel.close();
        self.selected = None;
        self.surface.teardown();
        info!("Route builder for tour {} torn down", self.tour_id);
    }

    /// Handle for tearing down from outside while an operation is awaiting
    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle.clone()
    }

    pub fn is_torn_down(&self) -> bool {
        self.lifecycle.is_torn_down()
    }

    pub fn tour_id(&self) -> &str {
        &self.tour_id
    }

    pub fn stops(&self) -> &[Stop] {
        self.sequence.stops()
    }

    pub fn selected(&self) -> Option<&StopId> {
        self.selected.as_ref()
    }

    pub fn panel(&self) -> &StopEditorPanel {
        &self.panel
    }

    pub fn route(&self) -> &RouteState {
        self.renderer.state()
    }

    pub fn surface(&self) -> &MapSurface<S> {
        &self.surface
    }

    pub fn form(&self) -> &F {
        &self.form
    }

    pub fn state(&self) -> BuilderState {
        BuilderState {
            tour_id: self.tour_id.clone(),
            stops: self.sequence.stops().to_vec(),
            selected: self.selected.clone(),
            panel: self.panel.clone(),
            route: self.renderer.state().clone(),
            search_query: self.search.query().to_string(),
            search_results: self.search.results().to_vec(),
            search_open: self.search.is_open(),
        }
    }
}
