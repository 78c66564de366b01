// Integration tests for topomap
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde_json::json;
use topomap_core::{
    area_filter, build_graph, combine_edges, create_places, create_rooms, group_by_place, keys,
    AggregatorTable, Bounds, ConnectionRecord, DeviceRecord, Graph, PixelScale, Simplifier,
    SimplifyConfig, Viewport,
};
use topomap_records::{load_dump, write_graph, TopologyDump};

fn netbox(id: &str, lon: f64, lat: f64, room: &str) -> DeviceRecord {
    DeviceRecord::new(id, lon, lat)
        .with_property(keys::ROOM_ID, json!(room))
        .with_property(keys::ROOM, json!(format!("Room {}", room)))
        .with_property(keys::LOAD, json!(0.25))
}

fn random_topology(seed: u64, devices: usize, links: usize) -> Graph {
    let mut rng = StdRng::seed_from_u64(seed);
    let records: Vec<DeviceRecord> = (0..devices)
        .map(|i| {
            let room = rng.random_range(0..devices / 3 + 1);
            // devices in one room share a position, give or take a few metres
            let lon = 5.0 + (room % 17) as f64 * 0.3 + rng.random_range(0.0..0.0005);
            let lat = 58.0 + (room / 17) as f64 * 0.3 + rng.random_range(0.0..0.0005);
            netbox(&i.to_string(), lon, lat, &format!("room{}", room))
        })
        .collect();
    let connections: Vec<ConnectionRecord> = (0..links)
        .map(|_| {
            let from = rng.random_range(0..devices + 2);
            let to = rng.random_range(0..devices + 2);
            ConnectionRecord::new(from.to_string(), to.to_string())
                .with_property(keys::SPEED, json!(rng.random_range(1..=10) * 100))
                .with_property(keys::LOAD_IN, json!(rng.random_range(0.0..1.0)))
                .with_property(keys::LOAD_OUT, json!(rng.random_range(0.0..1.0)))
        })
        .collect();
    build_graph(records, connections)
}

fn assert_no_self_loops(graph: &Graph) {
    assert!(graph.edges().values().all(|e| e.source != e.target));
}

#[test]
fn test_same_room_scenario() {
    let graph = build_graph(
        vec![netbox("A", 0.0, 0.0, "r"), netbox("B", 0.0, 0.0001, "r")],
        vec![],
    );
    let graph = create_rooms(graph, &AggregatorTable::rooms()).unwrap();
    assert_eq!(graph.node_count(), 1);
    let room = graph.nodes().values().next().unwrap();
    assert_eq!(room.property(keys::NUM_NETBOXES), Some(&json!(2)));
}

#[test]
fn test_boundary_crossing_scenario() {
    let graph = build_graph(
        vec![DeviceRecord::new("in", 5.0, 5.0), DeviceRecord::new("out", 20.0, 20.0)],
        vec![ConnectionRecord::new("in", "out")],
    );
    let graph = area_filter(graph, &Bounds::new(0.0, 10.0, 0.0, 10.0));
    assert!(graph.contains_node("in"));
    assert!(graph.contains_node("out"));
    assert!(graph.edge("in-out").is_some());
}

#[test]
fn test_reverse_duplicate_links_scenario() {
    let graph = build_graph(
        vec![DeviceRecord::new("A", 0.0, 0.0), DeviceRecord::new("B", 1.0, 1.0)],
        vec![
            ConnectionRecord::new("A", "B")
                .with_link_id("uplink")
                .with_property(keys::SPEED, json!(1000))
                .with_property(keys::LOAD_IN, json!(7.0))
                .with_property(keys::LOAD_OUT, json!(1.0)),
            ConnectionRecord::new("B", "A")
                .with_link_id("downlink")
                .with_property(keys::SPEED, json!(1000))
                .with_property(keys::LOAD_IN, json!(2.0))
                .with_property(keys::LOAD_OUT, json!(5.0)),
        ],
    );
    let graph = combine_edges(graph, &AggregatorTable::edges()).unwrap();
    assert_eq!(graph.edge_count(), 1);
    let edge = graph.edge("ce[uplink;downlink]").unwrap();
    // raw sums would be 9 in / 6 out
    assert_eq!(edge.property(keys::LOAD_IN), Some(&json!(12.0)));
    assert_eq!(edge.property(keys::LOAD_OUT), Some(&json!(3.0)));
}

#[test]
fn test_invariants_hold_after_every_stage() {
    let bounds = Bounds::new(5.0, 8.0, 58.0, 60.0);
    let viewport = Viewport::new(640.0, 480.0);
    for seed in 0..8 {
        let graph = random_topology(seed, 120, 300);
        assert!(graph.validate().is_ok());

        let filtered = area_filter(graph.clone(), &bounds);
        filtered.validate().unwrap();
        assert!(filtered.node_count() <= graph.node_count());
        assert_eq!(area_filter(filtered.clone(), &bounds), filtered);

        let rooms = create_rooms(filtered.clone(), &AggregatorTable::rooms()).unwrap();
        rooms.validate().unwrap();
        assert_no_self_loops(&rooms);
        assert!(rooms.node_count() <= filtered.node_count());

        let places = create_places(rooms.clone(), &bounds, &viewport, 25.0, &AggregatorTable::places()).unwrap();
        places.validate().unwrap();
        assert_no_self_loops(&places);
        assert!(places.node_count() <= rooms.node_count());

        let combined = combine_edges(places.clone(), &AggregatorTable::edges()).unwrap();
        combined.validate().unwrap();
        assert!(combined.edge_count() <= places.edge_count());
        assert_eq!(combined.node_count(), places.node_count());

        // a second pass finds nothing left to merge
        let again = combine_edges(combined.clone(), &AggregatorTable::edges()).unwrap();
        assert_eq!(again.edge_count(), combined.edge_count());

        // netbox counts are preserved through rooms and places
        let netboxes: i64 = places
            .nodes()
            .values()
            .map(|n| n.property(keys::NUM_NETBOXES).and_then(|v| v.as_i64()).unwrap())
            .sum();
        assert_eq!(netboxes as usize, filtered.node_count());
    }
}

#[test]
fn test_separated_places_keep_their_distance() {
    let bounds = Bounds::new(0.0, 10.0, 0.0, 10.0);
    let viewport = Viewport::new(1000.0, 1000.0);
    let limit = 40.0;
    let mut rng = StdRng::seed_from_u64(42);

    // clusters 2 degrees (200 px) apart, members within 0.05 degrees
    let mut records = Vec::new();
    for cluster in 0..9 {
        let (cx, cy) = (1.0 + (cluster % 3) as f64 * 2.0, 1.0 + (cluster / 3) as f64 * 2.0);
        for member in 0..5 {
            let id = format!("{}-{}", cluster, member);
            records.push(netbox(
                &id,
                cx + rng.random_range(-0.05..0.05),
                cy + rng.random_range(-0.05..0.05),
                &id,
            ));
        }
    }
    let graph = create_rooms(build_graph(records, vec![]), &AggregatorTable::rooms()).unwrap();
    let scale = PixelScale::new(&bounds, &viewport).unwrap();
    assert_eq!(group_by_place(&graph, &scale, limit).len(), 9);

    let places = create_places(graph, &bounds, &viewport, limit, &AggregatorTable::places()).unwrap();
    let centroids: Vec<_> = places.nodes().values().map(|n| (n.lon, n.lat)).collect();
    for (i, a) in centroids.iter().enumerate() {
        for b in &centroids[i + 1..] {
            assert!(scale.distance(*a, *b) >= limit);
        }
    }
}

#[test]
fn test_dump_to_file_pipeline() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("dump.json");
    let output = dir.path().join("map.json");
    std::fs::write(
        &input,
        json!({
            "netboxes": [
                {"netboxid": 1, "sysname": "gw1", "lon": 10.39, "lat": 63.42, "roomid": "hq", "room": "HQ", "load": 0.1},
                {"netboxid": 2, "sysname": "sw1", "lon": 10.39, "lat": 63.42, "roomid": "hq", "room": "HQ", "load": "0.9"},
                {"netboxid": 3, "sysname": "gw2", "lon": 10.90, "lat": 63.90, "roomid": "dc", "room": "DC", "load": 0.5},
                {"netboxid": 4, "sysname": "ghost", "roomid": "nowhere"}
            ],
            "connections": [
                {"from_netboxid": 1, "netboxid": 2, "netident": "core", "speed": 10000, "load_in": 1, "load_out": 1},
                {"from_netboxid": 1, "netboxid": 3, "netident": "wan-a", "speed": 1000, "load_in": 4, "load_out": 2},
                {"from_netboxid": 3, "netboxid": 2, "netident": "wan-b", "speed": 1000, "load_in": 3, "load_out": 8},
                {"from_netboxid": 4, "netboxid": 1, "speed": 100}
            ]
        })
        .to_string(),
    )
    .unwrap();

    let dump: TopologyDump = load_dump(&input).unwrap();
    let config = SimplifyConfig::new(
        Bounds::new(10.0, 11.0, 63.0, 64.0),
        Viewport::new(800.0, 600.0),
        30.0,
    );
    let graph = Simplifier::new(config).unwrap().simplify(dump.into_graph()).unwrap();
    write_graph(&output, &graph).unwrap();

    let written: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
    let nodes = written["nodes"].as_object().unwrap();
    assert_eq!(nodes.len(), 2);

    let hq = &nodes["cn[cn[1;2]]"];
    assert_eq!(hq["properties"]["num_netboxes"], json!(2));
    assert_eq!(hq["properties"]["load"], json!(0.9));
    assert_eq!(hq["properties"]["rooms"][0]["properties"]["name"], json!("HQ"));

    let edges = written["edges"].as_object().unwrap();
    assert_eq!(edges.len(), 1);
    let wan = &edges["ce[wan-a;wan-b]"];
    assert_eq!(wan["source"], json!("cn[cn[1;2]]"));
    assert_eq!(wan["properties"]["speed"], json!(2000));
    // wan-b is flipped onto wan-a's direction: in 4 + 8, out 2 + 3
    assert_eq!(wan["properties"]["load_in"], json!(12));
    assert_eq!(wan["properties"]["load_out"], json!(5));
    assert_eq!(wan["properties"]["subedges"].as_array().unwrap().len(), 2);
}
