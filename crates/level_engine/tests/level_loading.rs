//! Integration tests over whole level files

use std::collections::HashMap;
use std::io::Write;

use approx::assert_relative_eq;
use level_engine::controllers::{
    EmptyController, InputAction, InputBindingsController, MeshLoaderController, OrthographicCameraController,
    PerspectiveCameraController, PlaneMeshController, PointLightController, StoreController, TextureController,
    TextureWrap, WaypointController,
};
use level_engine::prelude::*;

const SHOWCASE: &str = r#"
# Showcase level
Set cam_size 6
Set tint 1 0.5 0.25 1
InitialCamera 1

Object camera
  Position 0 0 10
  Controller OrthographicCamera
    Id 1
    Size ${cam_size}
  End
End

Object
  Position 1 2
  Rotation 90
  Scale 2 2
  Mesh ship Z_Up
  Texture hull
    Wrap ClampToEdge
  End
  Controller PlaneMesh
    Color ${tint}
  End
End

Object "light"
  Position 0 5 0
  Controller PointLight
    # warm
    Color 1 0.9 0.8
    Range 25
  End
End
"#;

struct Harness {
    registry: ControllerRegistry,
    assets: AssetCatalog,
}

impl Harness {
    fn new() -> Self {
        let mut assets = AssetCatalog::new();
        assets.insert("hull", AssetKind::Texture).unwrap();
        assets.insert("ship", AssetKind::Mesh).unwrap();
        Self {
            registry: ControllerRegistry::with_builtins().unwrap(),
            assets,
        }
    }

    fn load(&self, source: &str) -> Result<Level, LevelError> {
        LevelLoader::new(&self.registry, &self.assets).load_str(source)
    }
}

#[test]
fn test_showcase_level() {
    let harness = Harness::new();
    let level = harness.load(SHOWCASE).unwrap();

    assert_eq!(level.initial_camera, 1);
    assert_eq!(level.len(), 3);

    let camera = level.object_by_name("camera").unwrap();
    assert_relative_eq!(camera.transform.position, Vec3::new(0.0, 0.0, 10.0));
    let ortho = camera.controller::<OrthographicCameraController>().unwrap();
    assert_eq!(ortho.id, 1);
    assert_relative_eq!(ortho.size, 6.0);

    let ship = level.object(ObjectRef(1)).unwrap();
    assert!(ship.name.is_none());
    assert_relative_eq!(ship.transform.position, Vec3::new(1.0, 2.0, 0.0));
    assert_relative_eq!(ship.transform.rotation, Vec3::new(0.0, 0.0, 90.0));
    assert_relative_eq!(ship.transform.scale, Vec3::new(2.0, 2.0, 0.0));
    assert_eq!(
        ship.controller::<MeshLoaderController>(),
        Some(&MeshLoaderController::new("ship", true))
    );
    let texture = ship.controller::<TextureController>().unwrap();
    assert_eq!(texture.wrap, TextureWrap::ClampToEdge);
    assert_eq!(texture.texture, Some(harness.assets.resolve("hull").unwrap()));
    let plane = ship.controller::<PlaneMeshController>().unwrap();
    assert_relative_eq!(plane.color, Vec4::new(1.0, 0.5, 0.25, 1.0));
    assert_relative_eq!(plane.size, Vec2::new(1.0, 1.0));

    let light = level.object_by_name("light").unwrap();
    let point = light.controller::<PointLightController>().unwrap();
    assert_relative_eq!(point.color, Vec3::new(1.0, 0.9, 0.8));
    assert_relative_eq!(point.range, 25.0);
    assert_relative_eq!(point.intensity, 1.0);
}

#[test]
fn test_object_indices_increase_named_or_not() {
    let level = Harness::new()
        .load("Object\nEnd\nObject a\nEnd\nObject\nEnd\nObject b\nEnd")
        .unwrap();
    let indices: Vec<u32> = level.objects().map(|(reference, _)| reference.index()).collect();
    assert_eq!(indices, vec![0, 1, 2, 3]);
    assert_eq!(level.find("a"), Some(ObjectRef(1)));
    assert_eq!(level.find("b"), Some(ObjectRef(3)));
}

#[test]
fn test_variables_substitute_once_and_track_redefinition() {
    let source = "\
Set inner 7
Set outer ${inner}
Set literal ${missing}
Object
  Position ${outer} ${inner}
End
Set inner 9
Object
  Position ${inner} 0
End
Object \"${literal}\"
End
";
    let level = Harness::new().load(source).unwrap();
    assert_relative_eq!(
        level.object(ObjectRef(0)).unwrap().transform.position,
        Vec3::new(7.0, 7.0, 0.0)
    );
    assert_relative_eq!(
        level.object(ObjectRef(1)).unwrap().transform.position,
        Vec3::new(9.0, 0.0, 0.0)
    );
    assert!(level.object_by_name("${missing}").is_some());
}

#[test]
fn test_rotation_two_values_is_rejected() {
    let err = Harness::new()
        .load("Object\n  Rotation 1 2\nEnd")
        .unwrap_err();
    assert!(matches!(
        err,
        LevelError::Syntax { line_number: 2, object: Some(0), .. }
    ));
}

#[test]
fn test_sequence_replaced_and_map_accumulated() {
    let source = "\
Object mover
  Controller Waypoint
    Waypoints
      1 0 0
      2 0 0
    End
    Waypoints
      5 5 5
    End
    Speed 0.5
    Loop true
  End
  Controller InputBindings
    Bindings
      W MoveForward
    End
    Bindings
      S MoveBackward
      W Fire
    End
  End
End
";
    let level = Harness::new().load(source).unwrap();
    let mover = level.object_by_name("mover").unwrap();

    let path = mover.controller::<WaypointController>().unwrap();
    assert_eq!(path.waypoints.len(), 1);
    assert_relative_eq!(path.waypoints[0], Vec3::new(5.0, 5.0, 5.0));
    assert!(path.looping);

    let bindings = mover.controller::<InputBindingsController>().unwrap();
    assert_eq!(bindings.bindings.len(), 2);
    assert_eq!(bindings.action("W"), Some(InputAction::Fire));
    assert_eq!(bindings.action("S"), Some(InputAction::MoveBackward));
}

#[test]
fn test_variables_reach_nested_block_lines() {
    let source = "\
Set far 10
Set height 2.5
Set ahead W
Set retreat MoveBackward
Object patrol
  Controller Waypoint
    Waypoints
      0 0 0
      ${far} ${height} 0
    End
  End
  Controller InputBindings
    Bindings
      ${ahead} MoveForward
      S ${retreat}
    End
  End
End
";
    let level = Harness::new().load(source).unwrap();
    let patrol = level.object_by_name("patrol").unwrap();

    let path = patrol.controller::<WaypointController>().unwrap();
    assert_eq!(path.waypoints.len(), 2);
    assert_relative_eq!(path.waypoints[1], Vec3::new(10.0, 2.5, 0.0));

    let bindings = patrol.controller::<InputBindingsController>().unwrap();
    assert_eq!(bindings.action("W"), Some(InputAction::MoveForward));
    assert_eq!(bindings.action("S"), Some(InputAction::MoveBackward));
    assert_eq!(bindings.action("${ahead}"), None);
}

#[test]
fn test_quoted_map_key_is_single_token() {
    let source = "\
Object
  Controller InputBindings
    Bindings
      \"Space\" Jump
    End
  End
End
";
    let level = Harness::new().load(source).unwrap();
    let bindings = level
        .object(ObjectRef(0))
        .and_then(LevelObject::controller::<InputBindingsController>)
        .unwrap();
    assert_eq!(bindings.action("Space"), Some(InputAction::Jump));
}

#[test]
fn test_store_controller_strings_and_tags() {
    let source = r#"
Object chest
  Controller Store
    Strings
      label "Old \"oak\" chest"
      note plain words here
    End
    Numbers
      gold 12.5
    End
    Flags
      locked TRUE
    End
    Tags
      loot
      container
    End
  End
End
"#;
    let level = Harness::new().load(source).unwrap();
    let store = level
        .object_by_name("chest")
        .and_then(LevelObject::controller::<StoreController>)
        .unwrap();
    assert_eq!(store.string("label"), Some("Old \"oak\" chest"));
    assert_eq!(store.string("note"), Some("plain words here"));
    assert_eq!(store.number("gold"), Some(12.5));
    assert!(store.flag("locked"));
    assert_eq!(store.tags, vec!["loot".to_string(), "container".to_string()]);
}

#[test]
fn test_empty_marker_consumes_no_body() {
    let source = "\
Object
  Controller Empty Empty
  Position 3 3 3
End
";
    let level = Harness::new().load(source).unwrap();
    let object = level.object(ObjectRef(0)).unwrap();
    assert!(object.controller::<EmptyController>().is_some());
    assert_relative_eq!(object.transform.position, Vec3::new(3.0, 3.0, 3.0));
}

#[test]
fn test_unknown_attribute_aborts_load() {
    let err = Harness::new()
        .load("Object\n  Controller PerspCamera\n    FieldOfView 60\n  End\nEnd")
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "Cannot set setting FieldOfView on controllers::rendering::PerspectiveCameraController"
    );
}

#[test]
fn test_unknown_texture_propagates_lookup_failure() {
    let err = Harness::new()
        .load("Object\n  Texture nowhere\n    Wrap Repeat\n  End\nEnd")
        .unwrap_err();
    assert!(matches!(err, LevelError::Asset(AssetError::NotFound(ref name)) if name == "nowhere"));
}

#[test]
fn test_texture_attribute_is_not_settable() {
    let err = Harness::new()
        .load("Object\n  Texture hull\n    Texture other\n  End\nEnd")
        .unwrap_err();
    assert_eq!(err.to_string(), "Non-serializable type AssetHandle");
}

#[test]
fn test_unknown_enum_constant() {
    let err = Harness::new()
        .load("Object\n  Texture hull\n    Filter nearest\n  End\nEnd")
        .unwrap_err();
    assert!(matches!(err, LevelError::UnknownEnumValue { ref token, .. } if token == "nearest"));
}

#[test]
fn test_unterminated_object_is_reported() {
    let err = Harness::new().load("Object\n  Position 1 1\n").unwrap_err();
    assert!(matches!(err, LevelError::UnexpectedEndOfInput { block: "Object" }));
}

#[test]
fn test_short_name_and_full_name_resolve_the_same_type() {
    let source = "\
Object
  Controller PerspCamera Empty
  Controller PerspectiveCamera Empty
  Controller controllers::rendering::PerspectiveCameraController Empty
End
";
    let level = Harness::new().load(source).unwrap();
    let object = level.object(ObjectRef(0)).unwrap();
    assert_eq!(object.controllers_of::<PerspectiveCameraController>().count(), 3);
}

#[derive(Debug, Default)]
struct InventoryController {
    slots: Option<HashMap<String, u32>>,
    capacity: u32,
}

impl Controller for InventoryController {
    fn type_name(&self) -> &'static str {
        Self::TYPE_NAME
    }
}

impl Describe for InventoryController {
    const TYPE_NAME: &'static str = "controllers::storage::InventoryController";

    fn describe(attributes: &mut AttributeBuilder<Self>) {
        attributes
            .map("Slots", |c| c.slots.as_mut())
            .scalar("Capacity", |c, v| c.capacity = v);
    }
}

#[test]
fn test_custom_controller_registration() {
    let mut harness = Harness::new();
    harness.registry.register::<InventoryController>().unwrap();

    let level = harness
        .load("Object\n  Controller Inventory\n    Capacity 8\n  End\nEnd")
        .unwrap();
    let inventory = level
        .object(ObjectRef(0))
        .and_then(LevelObject::controller::<InventoryController>)
        .unwrap();
    assert_eq!(inventory.capacity, 8);
    assert!(inventory.slots.is_none());
}

#[test]
fn test_map_without_instance_is_reported() {
    let mut harness = Harness::new();
    harness.registry.register::<InventoryController>().unwrap();

    let err = harness
        .load("Object\n  Controller Inventory\n    Slots\n      sword 1\n    End\n  End\nEnd")
        .unwrap_err();
    assert!(matches!(
        err,
        LevelError::MissingMapInstance { ref name, controller: "controllers::storage::InventoryController" } if name == "Slots"
    ));
}

#[test]
fn test_lifecycle_after_load() {
    let source = "\
Object cam
  Controller Empty Empty
End
Object patrol
  Position 0 0 0
  Controller Waypoint
    Waypoints
      4 0 0
    End
    Speed 1
  End
End
";
    let mut level = Harness::new().load(source).unwrap();
    let camera = level.find("cam").unwrap();
    level.init();
    level.update();
    level.update();
    level.render(camera);
    level.destroy();

    let patrol = level.object_by_name("patrol").unwrap();
    let path = patrol.controller::<WaypointController>().unwrap();
    assert_relative_eq!(path.position, Vec3::new(2.0, 0.0, 0.0));

    let empty = level.object(camera).and_then(LevelObject::controller::<EmptyController>).unwrap();
    assert_eq!((empty.inits, empty.updates, empty.renders), (1, 2, 1));
    assert!(empty.destroyed);
}

#[test]
fn test_load_file_and_missing_file() {
    let harness = Harness::new();
    let loader = LevelLoader::new(&harness.registry, &harness.assets);

    let mut file = tempfile::Builder::new().suffix(".lvl").tempfile().unwrap();
    file.write_all(b"InitialCamera 3\nObject\nEnd\n").unwrap();
    assert!(loader.can_load(file.path()));

    let level = loader.load_file(file.path()).unwrap();
    assert_eq!(level.initial_camera, 3);
    assert_eq!(level.len(), 1);

    let missing = file.path().with_extension("missing.lvl");
    assert!(matches!(loader.load_file(missing), Err(LevelError::Io(_))));
}

#[test]
fn test_assets_from_scanned_directory() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("brick.png"), b"").unwrap();
    std::fs::write(dir.path().join("notes.txt"), b"").unwrap();

    let mut assets = AssetCatalog::new();
    assert_eq!(assets.scan_dir(dir.path()).unwrap(), 1);
    let registry = ControllerRegistry::with_builtins().unwrap();

    let level = LevelLoader::new(&registry, &assets)
        .load_str("Object wall\n  Texture brick Empty\nEnd")
        .unwrap();
    let texture = level
        .object_by_name("wall")
        .and_then(LevelObject::controller::<TextureController>)
        .unwrap();
    assert_eq!(texture.texture.map(|h| h.kind()), Some(AssetKind::Texture));
}

#[test]
fn test_loader_config_round_trip_through_toml() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("loader.toml");
    let config = LoaderConfig::default().with_extensions(["lvl", "level"]).with_log_filter("debug");
    config.save_to_file(&path).unwrap();

    let loaded = LoaderConfig::load_from_file(&path).unwrap();
    assert_eq!(loaded, config);

    let registry = ControllerRegistry::new();
    let assets = AssetCatalog::new();
    let loader = LevelLoader::new(&registry, &assets).with_config(loaded);
    assert!(loader.can_load("intro.level"));
}
