use std::io::Write;
use std::time::{Duration, Instant};

use eframe::egui::{Vec2, vec2};

use graph_lens::GraphExplorer;
use graph_lens::config::LayoutConfig;
use graph_lens::graph::{GraphSnapshot, RawSnapshot, collect_snapshot, demo_snapshot};
use graph_lens::interaction::{InteractionOutcome, PointerEvent};
use graph_lens::render::Scene;

const SURFACE: Vec2 = vec2(800.0, 600.0);

fn with_ethics() -> GraphSnapshot {
    GraphSnapshot::builder()
        .node("AI Research", "topic", None)
        .node("Machine Learning", "topic", None)
        .node("Neural Networks", "concept", None)
        .node("Data Science", "field", None)
        .node("Ethics", "concept", Some("Moral questions raised by AI"))
        .edge("AI Research", "Machine Learning", "includes")
        .edge("Machine Learning", "Neural Networks", "uses")
        .edge("Machine Learning", "Data Science", "overlaps")
        .edge("AI Research", "Ethics", "raises")
        .build()
        .unwrap()
}

fn settle(explorer: &mut GraphExplorer, now: Instant) {
    for _ in 0..2000 {
        if !explorer.frame(now).animating {
            return;
        }
    }
    panic!("layout never settled");
}

#[test]
fn first_load_flags_every_node() {
    let mut explorer = GraphExplorer::new(LayoutConfig::default(), SURFACE);
    let report = explorer.merge(demo_snapshot(), Instant::now());

    assert_eq!(
        report.new_node_ids,
        vec!["AI Research", "Machine Learning", "Neural Networks", "Data Science"]
    );
    assert_eq!(report.new_edges.len(), 3);
    assert_eq!((report.node_count, report.edge_count), (4, 3));

    let model = explorer.model();
    for &(source, target) in model.edge_endpoints() {
        assert!(source < model.node_count() && target < model.node_count());
    }
    let Scene::Graph(scene) = explorer.scene() else {
        panic!("expected a graph scene");
    };
    assert_eq!(scene.nodes.len(), 4);
    assert_eq!(scene.edges.len(), 3);
}

#[test]
fn incremental_ingest_reports_only_additions_and_keeps_layout() {
    let now = Instant::now();
    let mut explorer = GraphExplorer::new(LayoutConfig::default(), SURFACE);
    explorer.merge(demo_snapshot(), now);
    settle(&mut explorer, now);

    let before = explorer
        .layout()
        .bodies()
        .iter()
        .map(|body| (body.id.clone(), body.position))
        .collect::<Vec<_>>();

    let report = explorer.merge(with_ethics(), now);
    assert_eq!(report.new_node_ids, vec!["Ethics"]);
    assert_eq!(
        report.new_edges,
        vec![(
            "AI Research".to_owned(),
            "Ethics".to_owned(),
            "raises".to_owned()
        )]
    );

    for (id, position) in before {
        assert!(explorer.model().contains_node(&id));
        assert_eq!(explorer.layout().position(&id), Some(position));
    }
    assert!(explorer.highlight().contains("Ethics"));
    assert!(!explorer.highlight().contains("AI Research"));
}

#[test]
fn repeating_a_snapshot_adds_nothing() {
    let now = Instant::now();
    let mut explorer = GraphExplorer::new(LayoutConfig::default(), SURFACE);
    explorer.merge(with_ethics(), now);

    let report = explorer.merge(with_ethics(), now);
    assert!(report.is_empty());
    assert!(explorer.highlight().is_empty());
}

#[test]
fn drag_then_release_reheats_and_settles() {
    let now = Instant::now();
    let mut explorer = GraphExplorer::new(LayoutConfig::default(), SURFACE);
    explorer.merge(demo_snapshot(), now);
    explorer.merge(with_ethics(), now);
    settle(&mut explorer, now);
    assert!(explorer.layout().is_quiescent());

    let viewport = *explorer.surface().viewport();
    let grab = viewport.world_to_screen(explorer.layout().position("Ethics").unwrap());
    let target = viewport.world_to_screen(vec2(100.0, 200.0));
    let neighbour_before = explorer.layout().position("AI Research").unwrap();

    assert_eq!(
        explorer.handle_pointer(PointerEvent::Down { position: grab }),
        InteractionOutcome::DragStarted("Ethics".to_owned())
    );
    explorer.handle_pointer(PointerEvent::Move { position: target });
    let pinned_at = explorer.layout().position("Ethics").unwrap();
    assert!((pinned_at - vec2(100.0, 200.0)).length() < 0.01);

    for _ in 0..60 {
        explorer.frame(now);
        assert_eq!(explorer.layout().position("Ethics"), Some(pinned_at));
    }
    assert!(explorer.layout().alpha() > 0.1);

    explorer.handle_pointer(PointerEvent::Up { position: target });
    assert!(!explorer.layout().body("Ethics").unwrap().is_pinned());

    for _ in 0..30 {
        explorer.frame(now);
    }
    let neighbour_after = explorer.layout().position("AI Research").unwrap();
    assert!((neighbour_after - neighbour_before).length() > 1.0);

    settle(&mut explorer, now);
    let last = explorer.frame(now);
    assert!(last.tick.max_displacement < 0.01);
}

#[test]
fn highlight_expires_three_seconds_after_merge() {
    let start = Instant::now();
    let mut explorer = GraphExplorer::new(LayoutConfig::default(), SURFACE);
    explorer.merge(demo_snapshot(), start);
    explorer.merge(with_ethics(), start);

    explorer.frame(start + Duration::from_millis(2999));
    assert!(explorer.highlight().contains("Ethics"));

    let report = explorer.frame(start + Duration::from_millis(3000));
    assert!(report.highlight_expired);
    assert!(explorer.highlight().is_empty());
}

#[test]
fn wheel_zoom_stays_within_bounds() {
    let mut explorer = GraphExplorer::with_snapshot(LayoutConfig::default(), SURFACE, demo_snapshot());
    let position = vec2(400.0, 300.0).to_pos2();

    for _ in 0..100 {
        explorer.handle_pointer(PointerEvent::Wheel {
            position,
            delta: 1000.0,
        });
    }
    assert_eq!(explorer.surface().viewport().scale, 4.0);

    for _ in 0..100 {
        explorer.handle_pointer(PointerEvent::Wheel {
            position,
            delta: -1000.0,
        });
    }
    assert_eq!(explorer.surface().viewport().scale, 0.1);
}

#[test]
fn teardown_cancels_everything() {
    let now = Instant::now();
    let mut explorer = GraphExplorer::new(LayoutConfig::default(), SURFACE);
    explorer.merge(demo_snapshot(), now);

    let viewport = *explorer.surface().viewport();
    let grab = viewport.world_to_screen(explorer.layout().position("Data Science").unwrap());
    explorer.handle_pointer(PointerEvent::Move { position: grab });
    assert!(explorer.interaction().tooltip().is_some());
    explorer.handle_pointer(PointerEvent::Down { position: grab });

    explorer.teardown();
    assert!(explorer.is_torn_down());
    assert!(explorer.interaction().tooltip().is_none());
    assert!(explorer.interaction().dragging().is_none());
    assert!(!explorer.layout().body("Data Science").unwrap().is_pinned());
    assert!(!explorer.layout().is_running());

    let positions = explorer.layout().bodies().to_vec();
    assert_eq!(
        explorer.handle_pointer(PointerEvent::Down { position: grab }),
        InteractionOutcome::Ignored
    );
    assert_eq!(explorer.handle_pointer(PointerEvent::Leave), InteractionOutcome::Ignored);
    let frame = explorer.frame(now);
    assert!(!frame.animating);
    assert_eq!(explorer.layout().bodies(), positions.as_slice());
}

#[test]
fn empty_snapshot_shows_placeholder() {
    let now = Instant::now();
    let mut explorer = GraphExplorer::with_snapshot(LayoutConfig::default(), SURFACE, demo_snapshot());

    let report = explorer.ingest_raw(RawSnapshot::default(), now).unwrap();
    assert!(report.is_empty());
    assert_eq!(report.node_count, 0);
    assert!(explorer.scene().is_empty());
}

#[test]
fn triplet_file_merges_into_the_graph() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{"triplets": [
            {{"source": "AI Research", "source_type": "topic", "target": "Ethics",
              "target_type": "concept", "target_desc": "Moral questions", "relation": "raises"}}
        ]}}"#
    )
    .unwrap();

    let collected = collect_snapshot(file.path()).unwrap();
    let mut explorer = GraphExplorer::with_snapshot(LayoutConfig::default(), SURFACE, demo_snapshot());
    let report = explorer.merge(collected.snapshot, Instant::now());

    assert_eq!(report.new_node_ids, vec!["Ethics"]);
    assert_eq!(report.node_count, 2);
    assert_eq!(
        explorer.model().node("Ethics").unwrap().description.as_deref(),
        Some("Moral questions")
    );
}
