use geomap::prelude::*;
use geomap::TransitionValue;

const SQUARE: &str = r#"{"type":"FeatureCollection","features":[{"type":"Feature",
    "properties":{"adcode":1,"name":"Square","center":[100.5,30.5]},
    "geometry":{"type":"Polygon","coordinates":[[[100,30],[101,30],[101,31],[100,31],[100,30]]]}}]}"#;

const PROVINCES: &str = r#"{"type":"FeatureCollection","features":[
    {"type":"Feature","properties":{"adcode":440000,"name":"Guangdong"},
     "geometry":{"type":"Polygon","coordinates":[[[110,21],[117,21],[117,25],[110,25],[110,21]]]}},
    {"type":"Feature","properties":{"adcode":450000,"name":"Guangxi"},
     "geometry":{"type":"Polygon","coordinates":[[[104,21],[110,21],[110,26],[104,26],[104,21]]]}},
    {"type":"Feature","properties":{"adcode":460300,"name":"Sansha"},
     "geometry":{"type":"MultiPolygon","coordinates":[
        [[[111,16],[112,16],[112,17],[111,16]]],
        [[[114,9],[115,9],[115,10],[114,9]]]]}}]}"#;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

async fn loaded_map(json: &'static str, config: GeoMapConfig) -> (GeoMap, RecordingPresenter) {
    init_logging();
    let recorder = RecordingPresenter::new();
    let mut map = GeoMapBuilder::new()
        .with_config(config)
        .with_source(StrSource::new(json))
        .with_size(800.0, 600.0)
        .with_presenter(recorder.clone())
        .build()
        .unwrap();
    assert!(map.reload().await);
    recorder.take();
    (map, recorder)
}

#[tokio::test]
async fn test_square_fits_viewport() {
    let (map, _) = loaded_map(SQUARE, GeoMapConfig::default()).await;

    assert_eq!(map.paths().len(), 1);
    let path = &map.paths()[0];
    assert_eq!(path.ad_code(), 1);
    assert_eq!(path.shape.figures.len(), 1);
    assert_eq!(path.shape.figures[0].points.len(), 4);
    assert!(path.shape.figures[0].closed);

    let bounds = path.shape.bounds().unwrap();
    assert!(bounds.min.x >= 20.0 - 1e-9 && bounds.max.x <= 780.0 + 1e-9);
    assert!(bounds.min.y >= 20.0 - 1e-9 && bounds.max.y <= 580.0 + 1e-9);

    // pixel aspect follows the Mercator aspect at 30°N, up to the margins
    let sw = project(30.0, 100.0);
    let ne = project(31.0, 101.0);
    let mercator_aspect = (ne.x - sw.x) / (ne.y - sw.y);
    let pixel_aspect = bounds.width() / bounds.height();
    assert!((pixel_aspect - mercator_aspect).abs() < 0.02);
    assert!(pixel_aspect < 1.0);

    // height binds, so the content is centered horizontally
    let transform = map.canvas_transform();
    let left = transform.to_widget(bounds.min).x;
    let right = 800.0 - transform.to_widget(bounds.max).x;
    assert!((left - right).abs() < 1e-9);
    assert_eq!(transform.scale, 1.0);
}

#[tokio::test]
async fn test_properties_reach_tooltip() {
    let (mut map, _) = loaded_map(SQUARE, GeoMapConfig::default()).await;
    let bounds = map.paths()[0].shape.bounds().unwrap();
    let inside = map.canvas_transform().to_widget(bounds.center());

    map.handle_input(InputEvent::MouseMove { position: inside });
    let tooltip = map.tooltip().unwrap();
    assert_eq!(tooltip.label.as_deref(), Some("Square"));
    assert_eq!(tooltip.properties.center, Some(LatLng::new(30.5, 100.5)));
}

#[tokio::test]
async fn test_adding_data_item_triggers_one_fill_transition() {
    let (mut map, recorder) = loaded_map(PROVINCES, GeoMapConfig::default()).await;
    let mut data = RegionDataSource::new();
    map.bind_data(&mut data);
    assert!(recorder.take().is_empty());

    let fill = Color::rgb(200, 40, 40);
    data.push(RegionDataItem::new(450000, fill));
    assert_eq!(map.sync_data(), 1);

    let transitions = recorder.take();
    assert_eq!(transitions.len(), 1);
    let target = map.path_for_ad_code(450000).unwrap();
    assert_eq!(transitions[0].target_path(), Some(target.id));
    assert_eq!(
        transitions[0].final_value(),
        TransitionValue::Fill(target.id, fill)
    );
    assert_eq!(target.style.fill, Some(fill));
    assert_eq!(
        map.path_for_ad_code(440000).unwrap().style.fill,
        Some(GeoMapConfig::default().shape_fill)
    );
}

#[tokio::test]
async fn test_unknown_and_removed_data_items() {
    let (mut map, recorder) = loaded_map(PROVINCES, GeoMapConfig::default()).await;
    let mut data = RegionDataSource::new();
    map.bind_data(&mut data);

    data.push(RegionDataItem::new(999999, Color::RED));
    map.sync_data();
    assert!(recorder.take().is_empty());

    data.push(RegionDataItem::new(440000, Color::RED));
    data.remove(440000);
    assert_eq!(map.sync_data(), 2);
    let transitions = recorder.take();
    assert_eq!(transitions.len(), 2);
    let default_fill = map.config().shape_fill;
    assert_eq!(
        map.path_for_ad_code(440000).unwrap().style.fill,
        Some(default_fill)
    );
    assert_eq!(map.data_items().len(), 1);
}

#[tokio::test]
async fn test_bound_data_survives_redraw() {
    let (mut map, _) = loaded_map(PROVINCES, GeoMapConfig::default()).await;
    let mut data = RegionDataSource::from_items([RegionDataItem::new(440000, Color::RED)]);
    map.bind_data(&mut data);

    map.resize(Size::new(1024.0, 768.0));
    assert_eq!(
        map.path_for_ad_code(440000).unwrap().style.fill,
        Some(Color::RED)
    );

    data.clear();
    map.sync_data();
    assert_eq!(
        map.path_for_ad_code(440000).unwrap().style.fill,
        Some(map.config().shape_fill)
    );
}

#[tokio::test]
async fn test_wheel_zoom_scenario() {
    let config = GeoMapConfig {
        enable_zooming_and_panning: true,
        ..GeoMapConfig::default()
    };
    let (mut map, recorder) = loaded_map(SQUARE, config).await;
    let cursor = Point::new(400.0, 300.0);

    map.handle_input(InputEvent::Scroll { delta: 120.0, position: cursor });
    assert!((map.scale() - 1.05).abs() < 1e-12);
    assert_eq!(map.viewport_state().pan, Point::new(0.0, 0.0));
    assert!(recorder.take().iter().all(|t| t.is_instant()));

    map.handle_input(InputEvent::Scroll { delta: 120.0, position: cursor });
    assert!((map.scale() - 1.10).abs() < 1e-12);
    assert_ne!(map.viewport_state().pan, Point::new(0.0, 0.0));

    for _ in 0..5 {
        map.handle_input(InputEvent::Scroll { delta: -120.0, position: cursor });
    }
    assert_eq!(map.scale(), 1.0);
    assert_eq!(map.viewport_state().pan, Point::new(0.0, 0.0));

    let scale_events = map
        .process_events()
        .into_iter()
        .filter(|e| matches!(e, MapEvent::ScaleChanged { .. }))
        .count();
    assert_eq!(scale_events, 4);
}

#[tokio::test]
async fn test_drag_keeps_rest_position_at_scale_one() {
    let config = GeoMapConfig {
        enable_zooming_and_panning: true,
        ..GeoMapConfig::default()
    };
    let (mut map, _) = loaded_map(SQUARE, config).await;
    let before = map.canvas_transform();
    map.handle_input(InputEvent::MouseDown {
        position: Point::new(100.0, 100.0),
        button: MouseButton::Left,
        click_count: 1,
    });
    map.handle_input(InputEvent::MouseUp {
        position: Point::new(300.0, 250.0),
        button: MouseButton::Left,
    });
    assert_eq!(map.canvas_transform(), before);

    map.set_scale(2.0);
    let zoomed = map.canvas_transform();
    map.handle_input(InputEvent::MouseDown {
        position: Point::new(100.0, 100.0),
        button: MouseButton::Left,
        click_count: 1,
    });
    map.handle_input(InputEvent::MouseUp {
        position: Point::new(90.0, 95.0),
        button: MouseButton::Left,
    });
    let dragged = map.canvas_transform();
    assert!((dragged.offset.x - (zoomed.offset.x - 10.0)).abs() < 1e-9);
    assert!((dragged.offset.y - (zoomed.offset.y - 5.0)).abs() < 1e-9);
}

#[tokio::test]
async fn test_whole_feature_goes_to_inset() {
    let (map, _) = loaded_map(PROVINCES, GeoMapConfig::china()).await;

    let main: Vec<i64> = map
        .paths()
        .iter()
        .filter(|p| p.kind == PathKind::Region)
        .map(|p| p.ad_code())
        .collect();
    assert_eq!(main, vec![440000, 450000]);

    let inset: Vec<&RegionPath> = map
        .paths()
        .iter()
        .filter(|p| p.kind == PathKind::InsetRegion)
        .collect();
    assert_eq!(inset.len(), 1);
    assert_eq!(inset[0].ad_code(), 460300);
    assert_eq!(inset[0].shape.figures.len(), 2);

    let frame = map.paths().last().unwrap();
    assert_eq!(frame.kind, PathKind::InsetFrame);
    assert_eq!(frame.ad_code(), 460300);
    assert!((map.inset_layout().unwrap().zoom - 0.002).abs() < 1e-12);

    // inset frame shares the main content's bottom-right corner
    let main_corner = map.main_layout().unwrap().pixel_bounds().max;
    let frame_corner = map.inset_layout().unwrap().frame.max;
    assert!((main_corner.x - frame_corner.x).abs() < 1e-9);
    assert!((main_corner.y - frame_corner.y).abs() < 1e-9);
}

#[tokio::test]
async fn test_handles_go_stale_after_redraw() {
    let (mut map, _) = loaded_map(PROVINCES, GeoMapConfig::default()).await;
    let old = map.path_for_ad_code(440000).unwrap().id;
    assert!(map.path(old).is_some());

    map.resize(Size::new(640.0, 480.0));
    assert!(map.path(old).is_none());
    let fresh = map.path_for_ad_code(440000).unwrap().id;
    assert_ne!(fresh, old);
    assert!(map.path(fresh).is_some());
}

#[tokio::test]
async fn test_failed_reload_keeps_previous_map() {
    let (mut map, _) = loaded_map(PROVINCES, GeoMapConfig::default()).await;
    let before: Vec<i64> = map.paths().iter().map(|p| p.ad_code()).collect();

    map.set_source(FileSource::new("/no/such/geo.json"));
    assert!(!map.reload().await);
    let after: Vec<i64> = map.paths().iter().map(|p| p.ad_code()).collect();
    assert_eq!(before, after);

    // cached document still serves resizes
    map.resize(Size::new(400.0, 300.0));
    assert_eq!(map.paths().len(), before.len());
}
