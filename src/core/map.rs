use crate::{
    animation::transitions::{ImmediatePresenter, Transition, TransitionPresenter},
    core::{
        config::GeoMapConfig,
        constants::{HOVER_OPACITY, HOVER_STROKE_BOOST},
        geo::{LatLng, Point, Size},
        viewport::{ViewportController, ViewportState},
    },
    data::{
        binding::{CollectionChange, RegionDataItem, RegionDataSource},
        geojson::GeoJson,
        properties::GeoFeatureProperties,
        source::GeoJsonSource,
    },
    input::{
        events::{InputEvent, MapEvent, MouseButton},
        handler::EventManager,
    },
    layers::{
        flatten::GeometryFlattener,
        layout::{InsetLayout, Layout},
        path::{outline_silhouette, PathBuilder, PathId, PathKind, PathShape, RegionPath},
        style::{Color, DropShadow, PathStyle},
    },
    spatial::index::RegionIndex,
    ui::tooltip::{TooltipModel, TooltipPlacement},
    Result,
};
use crossbeam_channel::Receiver;
use fxhash::FxHashMap;
use log::{debug, warn};
use std::sync::Arc;

/// Placement of the map canvas inside the widget.
///
/// A canvas point `p` is drawn at `offset + p * scale`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasTransform {
    pub offset: Point,
    pub scale: f64,
}

impl CanvasTransform {
    pub fn to_widget(&self, canvas: Point) -> Point {
        self.offset.add(&canvas.multiply(self.scale))
    }

    pub fn to_canvas(&self, widget: Point) -> Point {
        widget.subtract(&self.offset).multiply(1.0 / self.scale)
    }
}

/// Interactive GeoJSON boundary map.
///
/// Owns the parsed document, the region paths of the latest draw pass and the
/// pan/zoom state. All methods run on the caller's thread; only
/// [`GeoMap::reload`] suspends, and the draw pass starts after it resumes.
pub struct GeoMap {
    config: GeoMapConfig,
    source: Option<Box<dyn GeoJsonSource>>,
    document: Option<GeoJson>,
    size: Size,
    controller: ViewportController,
    index: RegionIndex,
    outline: Option<PathShape>,
    main_layout: Option<Layout>,
    inset_layout: Option<InsetLayout>,
    hovered: Option<PathId>,
    cursor: Option<Point>,
    tooltip: Option<TooltipModel>,
    tooltip_values: FxHashMap<i64, serde_json::Value>,
    data_items: Vec<RegionDataItem>,
    data_changes: Option<Receiver<CollectionChange>>,
    presenter: Box<dyn TransitionPresenter>,
    events: EventManager,
}

impl GeoMap {
    pub fn new(config: GeoMapConfig) -> Result<Self> {
        config.validate()?;
        let controller = ViewportController::new(
            config.margin,
            config.enable_zooming_and_panning,
            config.animation_duration(),
        );
        Ok(Self {
            config,
            source: None,
            document: None,
            size: Size::default(),
            controller,
            index: RegionIndex::new(),
            outline: None,
            main_layout: None,
            inset_layout: None,
            hovered: None,
            cursor: None,
            tooltip: None,
            tooltip_values: FxHashMap::default(),
            data_items: Vec::new(),
            data_changes: None,
            presenter: Box::new(ImmediatePresenter),
            events: EventManager::new(),
        })
    }

    pub fn config(&self) -> &GeoMapConfig {
        &self.config
    }

    /// Replaces the configuration and redraws in place
    pub fn set_config(&mut self, config: GeoMapConfig) -> Result<()> {
        config.validate()?;
        self.controller.set_enabled(config.enable_zooming_and_panning);
        self.controller.set_margin(config.margin);
        self.controller.set_duration(config.animation_duration());
        self.config = config;
        self.redraw();
        Ok(())
    }

    pub fn set_presenter(&mut self, presenter: Box<dyn TransitionPresenter>) {
        self.presenter = presenter;
    }

    /// Extra tooltip content keyed by `ad_code`
    pub fn set_tooltip_values(&mut self, values: FxHashMap<i64, serde_json::Value>) {
        self.tooltip_values = values;
    }

    // --- source -------------------------------------------------------------------------------

    /// Assigns a new source. The current map stays until [`GeoMap::reload`]
    /// delivers a document from it.
    pub fn set_source(&mut self, source: impl GeoJsonSource + 'static) {
        self.set_boxed_source(Box::new(source));
    }

    pub fn set_boxed_source(&mut self, source: Box<dyn GeoJsonSource>) {
        debug!("map source set to {}", source.describe());
        self.source = Some(source);
    }

    /// Fetches the source and redraws with the new document.
    ///
    /// Returns false and keeps the current map when the source yields no data.
    pub async fn reload(&mut self) -> bool {
        let fetched = match &self.source {
            Some(source) => source.fetch().await,
            None => {
                debug!("reload requested without a source");
                None
            }
        };
        match fetched {
            Some(document) => self.set_document(document),
            None => false,
        }
    }

    /// Draws an already parsed document at scale 1, centered.
    ///
    /// Empty documents are ignored like failed fetches.
    pub fn set_document(&mut self, document: GeoJson) -> bool {
        if document.is_empty() {
            warn!("GeoJSON document has no features, keeping the current map");
            return false;
        }
        self.document = Some(document);
        self.controller.reset();
        self.redraw();
        true
    }

    pub fn document(&self) -> Option<&GeoJson> {
        self.document.as_ref()
    }

    // --- geometry -----------------------------------------------------------------------------

    pub fn size(&self) -> Size {
        self.size
    }

    /// New widget size: re-lays out the cached document and reflows the pan
    pub fn resize(&mut self, size: Size) {
        self.size = size;
        if let Some(content) = self.draw_pass() {
            self.controller.resize(size, content);
        }
    }

    /// Draw pass over the cached document keeping the current pan and zoom
    pub fn redraw(&mut self) {
        if let Some(content) = self.draw_pass() {
            self.controller.set_geometry(self.size, content);
        }
    }

    /// Rebuilds every path from the cached document. Returns the main content
    /// size, or `None` when the pass was skipped or laid out nothing.
    fn draw_pass(&mut self) -> Option<Size> {
        if !self.size.is_drawable() {
            debug!("size {:?} not drawable, skipping draw pass", self.size);
            return None;
        }
        let document = self.document.as_ref()?;
        debug!("draw pass over {} features", document.features().len());

        let generation = self.index.clear();
        self.hovered = None;
        self.tooltip = None;
        self.outline = None;
        self.main_layout = None;
        self.inset_layout = None;
        self.presenter.present(Transition::fade_in());

        let mut next_ad_code = 0;
        let mut flattener = GeometryFlattener::new(&self.config.detached_regions);
        for (position, feature) in document.features().iter().enumerate() {
            let properties =
                match GeoFeatureProperties::parse(feature.properties.as_ref(), &mut next_ad_code) {
                    Ok(properties) => Arc::new(properties),
                    Err(e) => {
                        warn!("skipping feature #{}: {}", position, e);
                        continue;
                    }
                };
            match &feature.geometry {
                Some(geometry) => flattener.flatten(geometry, &properties, false),
                None => debug!("feature {} has no geometry", properties.ad_code),
            }
        }
        let flattened = flattener.finish();

        let layout = match Layout::compute(&flattened.main, self.size, &self.config.margin) {
            Some(layout) => layout,
            None => {
                self.finish_pass(Vec::new());
                return None;
            }
        };

        let mut builder = PathBuilder::new(&self.config, generation);
        builder.build_paths(&layout.map_sequences(&flattened.main), PathKind::Region);

        if !flattened.expand.is_empty() {
            let zoom = self.config.inset_zoom_for(flattened.detached.as_ref());
            match InsetLayout::compute(&flattened.expand, &layout, &self.config.margin, zoom) {
                Some(inset) => {
                    let pixels = inset.layout.map_sequences(&flattened.expand);
                    builder.build_paths(&pixels, PathKind::InsetRegion);
                    if let Some(first) = pixels.first() {
                        builder.build_frame(&inset.frame, Arc::clone(&first.properties));
                    }
                    self.inset_layout = Some(inset);
                }
                None => debug!("inset not drawable at zoom {}", zoom),
            }
        }

        let paths = builder.finish();
        if self.config.enable_outlined {
            self.outline = outline_silhouette(&paths);
        }
        let content = layout.content;
        self.main_layout = Some(layout);
        self.finish_pass(paths);
        Some(content)
    }

    fn finish_pass(&mut self, paths: Vec<RegionPath>) {
        self.index.install(paths);
        let items = self.data_items.clone();
        for item in &items {
            self.apply_fill(item.ad_code, item.fill, true);
        }
        debug!("draw pass produced {} paths", self.index.len());
        self.events.emit(MapEvent::Redrawn {
            paths: self.index.len(),
        });
    }

    // --- scene --------------------------------------------------------------------------------

    /// Region paths of the latest draw pass in drawing order
    pub fn paths(&self) -> &[RegionPath] {
        self.index.paths()
    }

    pub fn index(&self) -> &RegionIndex {
        &self.index
    }

    pub fn path(&self, id: PathId) -> Option<&RegionPath> {
        self.index.get(id)
    }

    pub fn path_for_ad_code(&self, ad_code: i64) -> Option<&RegionPath> {
        self.index.find_by_ad_code(ad_code)
    }

    pub fn main_layout(&self) -> Option<&Layout> {
        self.main_layout.as_ref()
    }

    pub fn inset_layout(&self) -> Option<&InsetLayout> {
        self.inset_layout.as_ref()
    }

    /// Silhouette of all regions in outlined mode, drawn beneath the fills
    pub fn outline(&self) -> Option<(&PathShape, PathStyle)> {
        self.outline.as_ref().map(|shape| {
            (
                shape,
                PathStyle::stroked(self.config.outlined_stroke, self.config.outlined_stroke_width),
            )
        })
    }

    pub fn drop_shadow(&self) -> Option<DropShadow> {
        if !self.config.enable_drop_shadow {
            return None;
        }
        let color = if self.config.enable_outlined {
            self.config.outlined_stroke
        } else {
            self.config.shape_stroke
        };
        Some(DropShadow::new(color))
    }

    /// Style of `path` including hover highlighting
    pub fn effective_style(&self, path: &RegionPath) -> PathStyle {
        let mut style = path.style.clone();
        if self.hovered == Some(path.id) {
            style.opacity = HOVER_OPACITY;
            style.stroke_width += HOVER_STROKE_BOOST;
        }
        style
    }

    /// Paths with their effective style, hovered path last so it draws on top
    pub fn draw_list(&self) -> Vec<(&RegionPath, PathStyle)> {
        let mut list: Vec<_> = self
            .paths()
            .iter()
            .map(|path| (path, self.effective_style(path)))
            .collect();
        list.sort_by_key(|(path, _)| self.hovered == Some(path.id));
        list
    }

    pub fn canvas_transform(&self) -> CanvasTransform {
        CanvasTransform {
            offset: self.controller.canvas_offset(),
            scale: self.controller.scale(),
        }
    }

    pub fn viewport_state(&self) -> ViewportState {
        self.controller.state()
    }

    /// Geographic position under a widget point, on the main map
    pub fn location_at(&self, position: Point) -> Option<LatLng> {
        let layout = self.main_layout.as_ref()?;
        let world = layout.from_pixel(self.canvas_transform().to_canvas(position));
        Some(LatLng::new(world.y, world.x))
    }

    // --- hover and tooltip --------------------------------------------------------------------

    pub fn hovered(&self) -> Option<PathId> {
        self.hovered
    }

    pub fn tooltip(&self) -> Option<&TooltipModel> {
        self.tooltip.as_ref()
    }

    /// Where a tooltip of `tooltip_size` goes for the last pointer position
    pub fn tooltip_placement(&self, tooltip_size: Size) -> Option<TooltipPlacement> {
        self.tooltip.as_ref()?;
        let cursor = self.cursor?;
        Some(TooltipPlacement::near_cursor(cursor, tooltip_size, self.size))
    }

    fn update_hover(&mut self, position: Point) {
        self.cursor = Some(position);
        let canvas = self.canvas_transform().to_canvas(position);
        let hit = self.index.hit_test(&canvas);
        if hit == self.hovered {
            return;
        }
        self.leave_hovered();
        if let Some(path) = hit.and_then(|id| self.index.get(id)) {
            let properties = Arc::clone(&path.properties);
            self.tooltip = Some(TooltipModel::for_region(
                Arc::clone(&properties),
                &self.config,
                &self.tooltip_values,
            ));
            self.hovered = hit;
            self.events.emit(MapEvent::RegionEntered { properties });
        }
    }

    fn leave_hovered(&mut self) {
        if let Some(path) = self.hovered.take().and_then(|id| self.index.get(id)) {
            let properties = Arc::clone(&path.properties);
            self.events.emit(MapEvent::RegionLeft { properties });
        }
        self.tooltip = None;
    }

    // --- input --------------------------------------------------------------------------------

    pub fn handle_input(&mut self, event: InputEvent) {
        match event {
            InputEvent::MouseMove { position } => {
                if self.config.shape_hoverable {
                    self.update_hover(position);
                }
            }
            InputEvent::MouseLeave => {
                self.cursor = None;
                self.leave_hovered();
            }
            InputEvent::MouseDown {
                position,
                button: MouseButton::Left,
                click_count,
            } => {
                if click_count > 1 {
                    self.region_double_clicked(position);
                } else {
                    self.controller.drag_start(position, click_count);
                }
            }
            InputEvent::MouseDown {
                button: MouseButton::Right,
                click_count,
                ..
            } if click_count > 1 => {
                self.events.emit(MapEvent::MapRightDoubleClicked);
            }
            InputEvent::MouseUp {
                position,
                button: MouseButton::Left,
            } => {
                let transitions = self.controller.drag_end(position);
                self.present_all(transitions);
            }
            InputEvent::Scroll { delta, position } => {
                let cursor = self.canvas_transform().to_canvas(position);
                let before = self.controller.scale();
                let transitions = self.controller.wheel(delta, cursor);
                self.present_all(transitions);
                self.scale_changed(before);
            }
            InputEvent::Resize { size } => self.resize(size),
            InputEvent::MouseDown { .. } | InputEvent::MouseUp { .. } => {}
        }
    }

    /// Programmatic zoom around the content center, animated
    pub fn set_scale(&mut self, scale: f64) {
        let before = self.controller.scale();
        let transitions = self.controller.set_scale(scale);
        self.present_all(transitions);
        self.scale_changed(before);
    }

    pub fn scale(&self) -> f64 {
        self.controller.scale()
    }

    fn region_double_clicked(&mut self, position: Point) {
        let canvas = self.canvas_transform().to_canvas(position);
        if let Some(path) = self.index.hit_test(&canvas).and_then(|id| self.index.get(id)) {
            let properties = Arc::clone(&path.properties);
            self.events.emit(MapEvent::RegionDoubleClicked { properties });
        }
    }

    fn scale_changed(&mut self, before: f64) {
        let scale = self.controller.scale();
        if scale != before {
            self.events.emit(MapEvent::ScaleChanged { scale });
        }
    }

    fn present_all(&mut self, transitions: Vec<Transition>) {
        for transition in transitions {
            self.presenter.present(transition);
        }
    }

    // --- events -------------------------------------------------------------------------------

    pub fn on<F>(&mut self, event_type: &str, callback: F)
    where
        F: Fn(&MapEvent) + Send + Sync + 'static,
    {
        self.events.on(event_type, callback);
    }

    pub fn process_events(&mut self) -> Vec<MapEvent> {
        self.events.process_events()
    }

    // --- data binding -------------------------------------------------------------------------

    /// Binds the region fills to `source`, replacing any previous binding
    pub fn bind_data(&mut self, source: &mut RegionDataSource) {
        let old = std::mem::take(&mut self.data_items);
        self.revert_items(old);
        self.data_changes = Some(source.subscribe());
        let items = source.items().to_vec();
        self.apply_items(&items);
        self.data_items = items;
    }

    pub fn unbind_data(&mut self) {
        self.data_changes = None;
        let old = std::mem::take(&mut self.data_items);
        self.revert_items(old);
    }

    pub fn data_items(&self) -> &[RegionDataItem] {
        &self.data_items
    }

    /// Applies pending collection changes; returns how many were handled
    pub fn sync_data(&mut self) -> usize {
        let changes: Vec<CollectionChange> = match &self.data_changes {
            Some(rx) => rx.try_iter().collect(),
            None => return 0,
        };
        for change in &changes {
            match change {
                CollectionChange::Added(items) => {
                    self.data_items.extend_from_slice(items);
                    self.apply_items(items);
                }
                CollectionChange::Removed(items) => {
                    for item in items {
                        if let Some(at) = self.data_items.iter().position(|i| i == item) {
                            self.data_items.remove(at);
                        }
                    }
                    self.revert_items(items.clone());
                }
                CollectionChange::Reset { old, new } => {
                    self.revert_items(old.clone());
                    self.data_items = new.clone();
                    self.apply_items(new);
                }
            }
        }
        changes.len()
    }

    fn apply_items(&mut self, items: &[RegionDataItem]) {
        for item in items {
            self.apply_fill(item.ad_code, item.fill, true);
        }
    }

    fn revert_items(&mut self, items: Vec<RegionDataItem>) {
        let default_fill = self.config.shape_fill;
        for item in items {
            self.apply_fill(item.ad_code, default_fill, false);
        }
    }

    /// Sets the fill of the region drawn for `ad_code` and presents the change.
    /// New data always animates from the default fill.
    fn apply_fill(&mut self, ad_code: i64, fill: Color, from_default: bool) {
        let (id, current) = match self.index.find_by_ad_code(ad_code) {
            Some(path) => (path.id, path.style.fill.unwrap_or(self.config.shape_fill)),
            None => {
                debug!("no region drawn for ad_code {}", ad_code);
                return;
            }
        };
        let from = if from_default {
            self.config.shape_fill
        } else {
            current
        };
        if self.index.set_fill(id, fill) {
            self.presenter.present(Transition::fill(
                id,
                from,
                fill,
                self.config.animation_duration(),
            ));
        }
    }
}

impl std::fmt::Debug for GeoMap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeoMap")
            .field("size", &self.size)
            .field("paths", &self.index.len())
            .field("viewport", &self.controller.state())
            .field("has_document", &self.document.is_some())
            .finish()
    }
}
