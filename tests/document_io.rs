//! Integration tests for reading and writing whole car documents.

use std::path::Path;

use aaron::bounds::{BoundNode, PointCloud, ShapeKind};
use aaron::document::{CarDocument, SpoilerType, UsageType};
use aaron::hash::hash;
use aaron::scene::{BoundProperties, SceneBuilder, SceneSource, WorldTransform};
use aaron::session::Session;
use aaron::settings::Settings;
use aaron::util::DVec3;
use aaron::Error;

use serde_json::{json, Value};
use tempfile::{tempdir, NamedTempFile};

fn car_json() -> Value {
    json!({
        "CarTypeName": "GT2",
        "BaseModelName": "GT2",
        "ManufacturerName": "PORSCHE",
        "UsageType": "Racing",
        "DefaultBasePaint": hash("GLOSS_WHITE"),
        "Skinnable": true,
        "DefaultSkinNumber": 1,
        "BoundsPack": {
            "Entries": [
                {
                    "Orientation": {"X": 0, "Y": 0, "Z": 0, "W": 32767},
                    "Position": {"X": 10, "Y": 20, "Z": 30},
                    "Flags": "kBounds_PrimVsWorld, kBounds_Box",
                    "HalfDimensions": {"X": 1000, "Y": 500, "Z": 2000},
                    "NumChildren": 2,
                    "PCloudIndex": 255,
                    "Pivot": {"X": 0, "Y": 500, "Z": 0},
                    "ChildIndex": 1,
                    "AttributeName": 0,
                    "Surface": hash("METAL"),
                    "NameHash": hash("BODY")
                },
                {
                    "Orientation": {"X": 0, "Y": 23170, "Z": 0, "W": 23170},
                    "Position": {"X": 800, "Y": -125, "Z": 1250},
                    "Flags": "kBounds_PrimVsGround, kBounds_Sphere",
                    "HalfDimensions": {"X": 350, "Y": 350, "Z": 350},
                    "NumChildren": 0,
                    "PCloudIndex": 255,
                    "Pivot": {"X": 800, "Y": 375, "Z": 1250},
                    "ChildIndex": -1,
                    "AttributeName": 0,
                    "Surface": hash("RUBBER"),
                    "NameHash": hash("WHEEL_FL")
                },
                {
                    "Orientation": {"X": 0, "Y": 0, "Z": 0, "W": 32767},
                    "Position": {"X": 0, "Y": 500, "Z": -1800},
                    "Flags": "kBounds_MeshVsGround, kBounds_Box",
                    "HalfDimensions": {"X": 700, "Y": 100, "Z": 200},
                    "NumChildren": 0,
                    "PCloudIndex": 0,
                    "Pivot": {"X": 0, "Y": 1000, "Z": -1800},
                    "ChildIndex": -1,
                    "AttributeName": 0,
                    "Surface": 0,
                    "NameHash": hash("SPOILER")
                }
            ],
            "PointClouds": [
                {"Vertices": [
                    {"X": -0.75, "Y": 0.125, "Z": 0.25},
                    {"X": 0.75, "Y": 0.125, "Z": 0.25},
                    {"X": 0.0, "Y": -0.125, "Z": -0.25}
                ]}
            ]
        },
        "Spoiler": {"SpoilerType": "Large"}
    })
}

fn write_car(dir: &Path, name: &str, value: &Value) -> std::path::PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, serde_json::to_string_pretty(value).unwrap()).unwrap();
    path
}

fn write_dictionary(dir: &Path) -> std::path::PathBuf {
    let path = dir.join("strings.json");
    let names = json!(["BODY", "WHEEL_FL", "SPOILER", "METAL", "RUBBER", "GLOSS_WHITE"]);
    std::fs::write(&path, names.to_string()).unwrap();
    path
}

#[test]
fn test_open_and_decode() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = write_car(dir.path(), "gt2.json", &car_json());
    let dict = write_dictionary(dir.path());

    let mut session = Session::default();
    session.set_dictionary_path(Some(dict));
    let loaded = session.load(&path).expect("Failed to load car");

    let doc = &loaded.document;
    assert_eq!(doc.manufacturer_name, "PORSCHE");
    assert_eq!(doc.usage_type, UsageType::Racing);
    assert_eq!(doc.spoiler_type(), Some(SpoilerType::Large));
    assert_eq!(doc.default_base_paint_name(session.resolver()), "GLOSS_WHITE");

    assert_eq!(loaded.forest.len(), 1);
    let body = &loaded.forest[0];
    assert_eq!(body.bound_name.to_string(), "BODY");
    assert_eq!(body.surface.to_string(), "METAL");
    assert_eq!(body.shape, ShapeKind::Box);
    assert_eq!(body.children.len(), 2);
    // engine (0, 500, 0) mm -> host (0, 0, 0.5) m
    assert_eq!(body.pivot, DVec3::new(0.0, 0.0, 0.5));
    assert_eq!(body.half_dimensions, DVec3::new(2.0, 1.0, 0.5));

    let spoiler = &body.children[1];
    assert_eq!(spoiler.bound_name.to_string(), "SPOILER");
    let cloud = spoiler.point_cloud.as_ref().expect("spoiler has a point cloud");
    assert_eq!(cloud.len(), 3);
    assert_eq!(cloud.vertices[0], DVec3::new(0.25, -0.75, 0.125));
}

#[test]
fn test_world_mode_positions() {
    let dir = tempdir().unwrap();
    let path = write_car(dir.path(), "gt2.json", &car_json());

    let mut session = Session::default();
    session.set_use_pivot(false);
    let loaded = session.load(&path).unwrap();

    let body = &loaded.forest[0];
    // root: raw Position
    assert_eq!(body.position, DVec3::new(0.03, 0.01, 0.02));
    // child: parent pivot + Position
    let wheel = &body.children[0];
    assert_eq!(wheel.position, DVec3::new(1.25, 0.8, 0.5 - 0.125));
}

#[test]
fn test_save_roundtrip() {
    let dir = tempdir().unwrap();
    let path = write_car(dir.path(), "gt2.json", &car_json());
    let dict = write_dictionary(dir.path());

    let mut session = Session::default();
    session.set_dictionary_path(Some(dict));
    let loaded = session.load(&path).unwrap();

    let out = session.save_path_for(&path);
    assert!(out.to_string_lossy().ends_with("gt2.json_saved.json"));
    session.save(&loaded.document, &loaded.forest, &out).expect("Failed to save");

    let saved: Value = serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
    let original = car_json();
    for key in ["CarTypeName", "ManufacturerName", "UsageType", "DefaultBasePaint", "Spoiler"] {
        assert_eq!(saved[key], original[key], "{} changed", key);
    }

    let entries = saved["BoundsPack"]["Entries"].as_array().unwrap();
    let src = original["BoundsPack"]["Entries"].as_array().unwrap();
    assert_eq!(entries.len(), 3);
    for (i, (a, b)) in entries.iter().zip(src).enumerate() {
        for key in ["Orientation", "Flags", "HalfDimensions", "NumChildren", "PCloudIndex",
                    "Pivot", "ChildIndex", "AttributeName", "Surface", "NameHash"] {
            assert_eq!(a[key], b[key], "entry {} {} changed", i, key);
        }
    }
    // Root Position is not stored; child Position is relative to the parent pivot.
    assert_eq!(entries[0]["Position"], json!({"X": 0, "Y": 0, "Z": 0}));
    assert_eq!(entries[1]["Position"], json!({"X": 800, "Y": -125, "Z": 1250}));
    assert_eq!(saved["BoundsPack"]["PointClouds"], original["BoundsPack"]["PointClouds"]);
}

#[test]
fn test_resave_is_stable() {
    let dir = tempdir().unwrap();
    let path = write_car(dir.path(), "gt2.json", &car_json());
    let first = dir.path().join("first.json");
    let second = dir.path().join("second.json");
    {
        let mut session = Session::default();
        let loaded = session.load(&path).unwrap();
        session.save(&loaded.document, &loaded.forest, &first).unwrap();
    }
    {
        let mut session = Session::default();
        let loaded = session.load(&first).unwrap();
        session.save(&loaded.document, &loaded.forest, &second).unwrap();
    }

    let a = std::fs::read_to_string(&first).unwrap();
    let b = std::fs::read_to_string(&second).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_save_without_bounds_drops_section() {
    let dir = tempdir().unwrap();
    let path = write_car(dir.path(), "gt2.json", &car_json());
    let mut session = Session::default();
    let loaded = session.load(&path).unwrap();

    let out = dir.path().join("empty.json");
    session.save(&loaded.document, &[], &out).unwrap();
    let saved = CarDocument::open(&out).unwrap();
    assert!(saved.bounds_pack.is_none());
    assert_eq!(saved.spoiler_type(), Some(SpoilerType::Large));
}

#[test]
fn test_unknown_flag_reports_entry() {
    let mut value = car_json();
    value["BoundsPack"]["Entries"][2]["Flags"] = json!("kBounds_Box, kBounds_Hovering");
    let file = NamedTempFile::new().unwrap();
    std::fs::write(file.path(), value.to_string()).unwrap();

    let err = Session::default().load(file.path()).unwrap_err();
    assert_eq!(err.entry_index(), Some(2));
    assert!(err.to_string().contains("kBounds_Hovering"));
}

#[test]
fn test_missing_file() {
    let err = CarDocument::open("/definitely/not/here.json").unwrap_err();
    assert!(matches!(err, Error::FileNotFound(_)));
}

#[test]
fn test_not_json() {
    let file = NamedTempFile::new().unwrap();
    std::fs::write(file.path(), "{ not json").unwrap();
    assert!(CarDocument::open(file.path()).unwrap_err().is_malformed());
}

/// Records what the session asks the host to create.
#[derive(Default)]
struct RecordingScene {
    nodes: Vec<(Option<usize>, String, WorldTransform)>,
    clouds: Vec<(usize, Option<usize>, usize, DVec3)>,
}

impl SceneBuilder for RecordingScene {
    type Handle = usize;

    fn create_node(
        &mut self,
        parent: Option<usize>,
        node: &BoundNode,
        world: WorldTransform,
    ) -> aaron::Result<usize> {
        self.nodes.push((parent, node.bound_name.to_string(), world));
        Ok(self.nodes.len() - 1)
    }

    fn attach_point_cloud(
        &mut self,
        owner: usize,
        parent: Option<usize>,
        cloud: &PointCloud,
        anchor: DVec3,
    ) -> aaron::Result<()> {
        self.clouds.push((owner, parent, cloud.len(), anchor));
        Ok(())
    }
}

#[test]
fn test_load_into_scene() {
    let dir = tempdir().unwrap();
    let path = write_car(dir.path(), "gt2.json", &car_json());
    let dict = write_dictionary(dir.path());

    let mut settings = Settings::default();
    settings.dictionary_path = Some(dict);
    let mut session = Session::new(settings);

    let mut scene = RecordingScene::default();
    let (doc, roots) = session.load_into(&path, &mut scene).unwrap();
    assert_eq!(doc.car_type_name, "GT2");
    assert_eq!(roots, vec![0]);

    let names: Vec<&str> = scene.nodes.iter().map(|(_, n, _)| n.as_str()).collect();
    assert_eq!(names, vec!["BODY", "WHEEL_FL", "SPOILER"]);
    assert_eq!(scene.nodes[1].0, Some(0));
    assert_eq!(scene.nodes[2].2.scale, DVec3::new(0.2, 0.7, 0.1));

    // The spoiler's point cloud sits under the body at the body's pivot.
    assert_eq!(scene.clouds, vec![(2, Some(0), 3, DVec3::new(0.0, 0.0, 0.5))]);
}

/// Minimal host scene: an arena the session can both build and save from.
#[derive(Default)]
struct HostScene {
    nodes: Vec<HostNode>,
}

struct HostNode {
    parent: Option<usize>,
    children: Vec<usize>,
    world: WorldTransform,
    pivot: DVec3,
    bound: BoundProperties,
    cloud: Option<PointCloud>,
}

impl SceneBuilder for HostScene {
    type Handle = usize;

    fn create_node(
        &mut self,
        parent: Option<usize>,
        node: &BoundNode,
        world: WorldTransform,
    ) -> aaron::Result<usize> {
        let handle = self.nodes.len();
        self.nodes.push(HostNode {
            parent,
            children: Vec::new(),
            world,
            pivot: node.pivot,
            bound: BoundProperties::of(node),
            cloud: None,
        });
        if let Some(parent) = parent {
            self.nodes[parent].children.push(handle);
        }
        Ok(handle)
    }

    fn attach_point_cloud(
        &mut self,
        owner: usize,
        _parent: Option<usize>,
        cloud: &PointCloud,
        _anchor: DVec3,
    ) -> aaron::Result<()> {
        self.nodes[owner].cloud = Some(cloud.clone());
        Ok(())
    }
}

impl SceneSource for HostScene {
    type Node = usize;

    fn roots(&self) -> Vec<usize> {
        (0..self.nodes.len()).filter(|&i| self.nodes[i].parent.is_none()).collect()
    }

    fn list_children(&self, node: usize) -> Vec<usize> {
        self.nodes[node].children.clone()
    }

    fn world_transform(&self, node: usize) -> WorldTransform {
        self.nodes[node].world
    }

    fn pivot(&self, node: usize) -> DVec3 {
        self.nodes[node].pivot
    }

    fn bound(&self, node: usize) -> BoundProperties {
        self.nodes[node].bound.clone()
    }

    fn point_cloud(&self, node: usize) -> Option<&PointCloud> {
        self.nodes[node].cloud.as_ref()
    }
}

#[test]
fn test_save_scene_matches_save() {
    let dir = tempdir().unwrap();
    let path = write_car(dir.path(), "gt2.json", &car_json());
    let dict = write_dictionary(dir.path());

    let mut settings = Settings::default();
    settings.dictionary_path = Some(dict);
    let mut session = Session::new(settings);

    let loaded = session.load(&path).unwrap();
    let from_forest = dir.path().join("forest.json");
    session.save(&loaded.document, &loaded.forest, &from_forest).unwrap();

    let mut scene = HostScene::default();
    let (doc, _) = session.load_into(&path, &mut scene).unwrap();
    let from_scene = dir.path().join("scene.json");
    session.save_scene(&doc, &scene, &from_scene).expect("Failed to save scene");

    let a = std::fs::read_to_string(&from_forest).unwrap();
    let b = std::fs::read_to_string(&from_scene).unwrap();
    assert_eq!(a, b);

    // An empty scene drops the bounds section.
    let empty = dir.path().join("empty_scene.json");
    session.save_scene(&doc, &HostScene::default(), &empty).unwrap();
    assert!(CarDocument::open(&empty).unwrap().bounds_pack.is_none());
}
