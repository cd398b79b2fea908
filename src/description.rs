use std::fs;
use std::path::Path;

use serde::{ Serialize, Deserialize };

use crate::camera::Camera;
use crate::color::Color;
use crate::error::SceneError;
use crate::light::PointLight;
use crate::scene::{ Scene, SceneConfig };
use crate::shape::Shape;
use crate::surface::Surface;
use crate::transform::Transform;

/// A scene file, as JSON.
///
/// ```json
/// {
///   "camera": { "focal": 22, "sensor_width": 16, "sensor_height": 9,
///               "width": 960,
///               "transform": [ { "op": "translate", "x": 0, "y": 2, "z": 30 } ] },
///   "ambient": { "r": 0.2, "g": 0.2, "b": 0.2 },
///   "lights": [ { "color": { "r": 1, "g": 1, "b": 1 },
///                 "transform": [ { "op": "translate", "x": 0, "y": 8, "z": 0 } ] } ],
///   "objects": [ { "type": "sphere", "name": "ball",
///                  "surface": { "preset": "white", "ks": 0.1 } } ]
/// }
/// ```
///
/// `ambient`, `background`, `max_depth` and `debug_pixel` are optional and
/// default like `SceneConfig`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SceneJson {
    camera: CameraJson,

    #[serde(default)]
    lights: Vec<LightJson>,

    #[serde(default)]
    objects: Vec<ObjectJson>,

    #[serde(flatten)]
    config: SceneConfig,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CameraJson {
    focal: f64,
    sensor_width: f64,
    sensor_height: f64,
    width: usize,

    #[serde(default)]
    transform: Vec<TransformOp>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LightJson {
    #[serde(default = "Color::white")]
    color: Color,

    #[serde(default)]
    sun: bool,

    #[serde(default)]
    transform: Vec<TransformOp>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapeKind {
    Plane,
    Sphere,
    Cube,
    #[serde(alias = "bb")]
    BoundingBox,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ObjectJson {
    #[serde(rename = "type")]
    kind: ShapeKind,

    name: Option<String>,

    #[serde(default)]
    surface: SurfaceJson,

    #[serde(default)]
    transform: Vec<TransformOp>,

    #[serde(default)]
    children: Vec<ObjectJson>,
}

/// A surface preset (`"default"` when omitted), with fields optionally
/// overridden one by one.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct SurfaceJson {
    preset: Option<String>,
    ka: Option<f64>,
    kd: Option<f64>,
    ks: Option<f64>,
    color: Option<Color>,
    phong: Option<f64>,
}

/// One step of a transform. Steps apply in the order they are listed.
/// Angles are in degrees.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum TransformOp {
    Translate { x: f64, y: f64, z: f64 },
    Scale { x: f64, y: f64, z: f64 },
    RotateX { degrees: f64 },
    RotateY { degrees: f64 },
    RotateZ { degrees: f64 },
}

impl TransformOp {
    /// Applies the step to `t`. `what` names the transformed entity in
    /// errors.
    fn apply(&self, t: &mut Transform, what: &str) -> Result<(), SceneError> {
        match *self {
            TransformOp::Translate { x, y, z } => t.translate(x, y, z),
            TransformOp::Scale { x, y, z } => {
                if x == 0.0 || y == 0.0 || z == 0.0 {
                    return Err(SceneError::ZeroScale(what.to_string()));
                }
                t.scale(x, y, z)
            },
            TransformOp::RotateX { degrees } => t.rotate_x(degrees.to_radians()),
            TransformOp::RotateY { degrees } => t.rotate_y(degrees.to_radians()),
            TransformOp::RotateZ { degrees } => t.rotate_z(degrees.to_radians()),
        }

        Ok(())
    }
}

fn apply_all(ops: &[TransformOp], t: &mut Transform, what: &str) -> Result<(), SceneError> {
    ops.iter().try_for_each(|op| op.apply(t, what))
}

impl TryFrom<&SurfaceJson> for Surface {
    type Error = SceneError;

    fn try_from(json: &SurfaceJson) -> Result<Surface, SceneError> {
        let preset = json.preset.as_deref().unwrap_or("default");
        let mut surface = Surface::preset(preset)
            .ok_or_else(|| SceneError::UnknownPreset(preset.to_string()))?;

        if let Some(ka) = json.ka { surface.ka = ka; }
        if let Some(kd) = json.kd { surface.kd = kd; }
        if let Some(ks) = json.ks { surface.ks = ks; }
        if let Some(color) = json.color { surface.color = color; }
        if let Some(phong) = json.phong { surface.phong = phong; }

        Ok(surface)
    }
}

impl TryFrom<&ObjectJson> for Shape {
    type Error = SceneError;

    fn try_from(json: &ObjectJson) -> Result<Shape, SceneError> {
        let mut shape = match json.kind {
            ShapeKind::Plane => Shape::plane(),
            ShapeKind::Sphere => Shape::sphere(),
            ShapeKind::Cube => Shape::cube(),
            ShapeKind::BoundingBox => Shape::bounding_box(),
        };

        shape.set_name(json.name.as_deref().unwrap_or(""));

        if json.kind == ShapeKind::BoundingBox {
            let children = json.children.iter()
                .map(Shape::try_from)
                .collect::<Result<Vec<_>, _>>()?;
            shape.add_objects(children);
        } else {
            if !json.children.is_empty() {
                return Err(SceneError::UnexpectedChildren(shape.name().to_string()));
            }
            shape.surface = Surface::try_from(&json.surface)?;
        }

        let name = shape.name().to_string();
        apply_all(&json.transform, &mut shape.transform, &name)?;
        Ok(shape)
    }
}

impl TryFrom<&LightJson> for PointLight {
    type Error = SceneError;

    fn try_from(json: &LightJson) -> Result<PointLight, SceneError> {
        let mut light = PointLight::new(json.color);
        light.set_sun(json.sun);
        apply_all(&json.transform, &mut light.transform, "light")?;

        Ok(light)
    }
}

impl TryFrom<&CameraJson> for Camera {
    type Error = SceneError;

    fn try_from(json: &CameraJson) -> Result<Camera, SceneError> {
        if !(json.focal > 0.0 && json.sensor_width > 0.0 && json.sensor_height > 0.0)
            || json.width == 0 {
            return Err(SceneError::InvalidCamera);
        }

        let mut camera = Camera::new(json.focal, json.sensor_width, json.sensor_height,
            json.width);
        apply_all(&json.transform, &mut camera.transform, "camera")?;

        Ok(camera)
    }
}

impl TryFrom<SceneJson> for Scene {
    type Error = SceneError;

    fn try_from(json: SceneJson) -> Result<Scene, SceneError> {
        let camera = Camera::try_from(&json.camera)?;
        let mut scene = Scene::with_config(camera, json.config);

        for light in json.lights.iter() {
            scene.add_light(PointLight::try_from(light)?);
        }

        let objects = json.objects.iter()
            .map(Shape::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        scene.add_objects(objects);

        Ok(scene)
    }
}

/// Parses a scene description.
pub fn parse(json: &str) -> Result<Scene, SceneError> {
    let scene_json: SceneJson = serde_json::from_str(json)?;
    Scene::try_from(scene_json)
}

/// Loads a scene description from a JSON file.
pub fn load(path: &Path) -> Result<Scene, SceneError> {
    parse(&fs::read_to_string(path)?)
}

#[cfg(test)]
const ROOM: &str = r#"{
    "camera": {
        "focal": 22, "sensor_width": 16, "sensor_height": 9, "width": 320,
        "transform": [
            { "op": "translate", "x": 0, "y": 2, "z": 30 },
            { "op": "rotate_x", "degrees": -22.5 }
        ]
    },
    "ambient": { "r": 0.2, "g": 0.2, "b": 0.2 },
    "max_depth": 3,
    "lights": [
        { "transform": [ { "op": "translate", "x": 0, "y": 8, "z": 0.6 } ] },
        { "color": { "r": 1, "g": 0.2, "b": 0.1 }, "sun": true }
    ],
    "objects": [
        { "type": "plane", "name": "floor", "surface": { "preset": "ocher" },
          "transform": [ { "op": "scale", "x": 21, "y": 21, "z": 21 } ] },
        { "type": "bb", "name": "pair", "children": [
            { "type": "sphere", "surface": { "preset": "white", "ks": 0.1 },
              "transform": [ { "op": "translate", "x": -2, "y": 1, "z": 0.5 } ] },
            { "type": "cube", "name": "block" }
        ] }
    ]
}"#;

#[test]
fn parse_scene_file() {
    let scene = parse(ROOM).unwrap();

    assert_eq!((scene.camera.width, scene.camera.height), (320, 180));
    assert_eq!(scene.config.max_depth, 3);
    assert_eq!(scene.config.ambient, Color::rgb(0.2, 0.2, 0.2));
    assert_eq!(scene.config.background, Color::rgb(0.1, 0.1, 0.1));
    assert_eq!(scene.lights().len(), 2);
    assert!(scene.lights()[1].is_sun());

    let objects = scene.objects();
    assert_eq!(objects.len(), 2);
    assert_eq!(objects[0].name(), "plane:floor");
    assert_eq!(objects[0].surface, crate::surface::OCHER);
    assert_eq!(objects[1].name(), "bb:pair");

    let children = objects[1].children().unwrap();
    assert_eq!(children[0].surface.ks, 0.1);
    assert_eq!(children[0].surface.kd, crate::surface::WHITE.kd);
    assert_eq!(children[1].name(), "cube:block");
    assert_eq!(children[1].surface, Surface::default());

    let (min, max) = objects[1].min_max();
    assert_eq!(min, crate::vector::Point3::new(-3.0, -1.0, -1.0));
    assert_eq!(max, crate::vector::Point3::new(1.0, 2.0, 1.5));
}

#[test]
fn unknown_preset_is_an_error() {
    let json = ROOM.replace("\"ocher\"", "\"velvet\"");

    match parse(&json) {
        Err(SceneError::UnknownPreset(name)) => assert_eq!(name, "velvet"),
        other => panic!("unexpected result: {:?}", other.map(|_| ())),
    }
}

#[test]
fn zero_scale_is_an_error() {
    let json = ROOM.replace("\"x\": 21", "\"x\": 0");

    match parse(&json) {
        Err(SceneError::ZeroScale(name)) => assert_eq!(name, "plane:floor"),
        other => panic!("unexpected result: {:?}", other.map(|_| ())),
    }
}

#[test]
fn children_only_on_bounding_boxes() {
    let json = ROOM.replace("\"type\": \"bb\"", "\"type\": \"sphere\"");

    assert!(matches!(parse(&json), Err(SceneError::UnexpectedChildren(_))));
}

#[test]
fn malformed_json_is_an_error() {
    assert!(matches!(parse("{ \"camera\": "), Err(SceneError::Json(_))));
    assert!(matches!(load(Path::new("/nonexistent/scene.json")), Err(SceneError::Io(_))));
}

#[test]
fn bundled_scene_parses() {
    let scene = parse(include_str!("../scenes/room.json")).unwrap();

    assert_eq!((scene.camera.width, scene.camera.height), (960, 540));
    assert_eq!(scene.objects().len(), 5);
    assert_eq!(scene.objects()[1].children().unwrap().len(), 2);
}
