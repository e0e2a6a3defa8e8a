use crate::light::Light;
use crate::object::{Color, ObjectDescription, Shape, SwitchState};
use glam::DVec3;
use serde::{Deserialize, Serialize};
use std::f64::consts::{FRAC_PI_2, PI};

const WALL: Color = Color(0xcccccc);
const FLOOR: Color = Color(0xaaaaaa);
const WOOD: Color = Color(0x8b4513);

/// Serializable list of objects and lights. Order is preserved into the built scene.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SceneDescription {
    #[serde(default)]
    pub objects: Vec<ObjectDescription>,
    #[serde(default)]
    pub lights: Vec<Light>,
}

fn cuboid(name: &str, size: [f64; 3], position: [f64; 3], color: Color) -> ObjectDescription {
    ObjectDescription::new(
        name,
        Shape::Box {
            size: DVec3::from_array(size),
        },
        DVec3::from_array(position),
        color,
    )
}

impl SceneDescription {
    /// The furnished 10 x 10 room: walls, floor, desk, bed, clothes hanger,
    /// a chair and a red floor switch, lit by ambient fill and one sun.
    pub fn default_room() -> Self {
        let mut objects = vec![
            cuboid("wall_back", [10.0, 5.0, 0.5], [0.0, 2.5, -5.0], WALL),
            cuboid("wall_front", [10.0, 5.0, 0.5], [0.0, 2.5, 5.0], WALL),
            cuboid("wall_left", [0.5, 5.0, 10.0], [-5.0, 2.5, 0.0], WALL),
            cuboid("wall_right", [0.5, 5.0, 10.0], [5.0, 2.5, 0.0], WALL),
            ObjectDescription::new(
                "floor",
                Shape::Plane {
                    width: 10.0,
                    height: 10.0,
                },
                DVec3::ZERO,
                FLOOR,
            )
            .rotated(DVec3::new(-FRAC_PI_2, 0.0, 0.0)),
            cuboid("desk", [2.0, 0.5, 1.0], [0.0, 0.25, 0.0], WOOD),
            cuboid("bed_frame", [2.0, 0.5, 1.0], [2.0, 0.25, -2.0], Color(0x4b0082)),
            cuboid("mattress", [1.8, 0.3, 0.8], [2.0, 0.55, -2.0], Color(0xffffff)),
            cuboid("clothes_hanger", [0.5, 2.0, 0.5], [-2.0, 1.0, -2.0], Color(0x654321)),
            cuboid("chair_seat", [1.0, 0.2, 1.0], [-3.0, 0.1, -2.0], WOOD),
            cuboid("chair_back", [1.0, 1.0, 0.2], [-3.0, 0.6, -1.75], WOOD)
                .rotated(DVec3::new(0.0, PI, 0.0)),
        ];
        for (i, (x, z)) in [(-3.4, -2.4), (-3.4, -1.6), (-2.6, -2.4), (-2.6, -1.6)]
            .into_iter()
            .enumerate()
        {
            objects.push(cuboid(
                &format!("chair_leg_{i}"),
                [0.2, 1.0, 0.2],
                [x, 0.5, z],
                WOOD,
            ));
        }
        objects.push(
            cuboid("floor_switch", [0.5, 0.1, 0.5], [0.0, 0.05, 3.0], Color(0xff0000))
                .with_switch(SwitchState { activated: false }),
        );

        let lights = vec![
            Light::Ambient {
                color: Color(0x404040),
                intensity: 1.0,
            },
            Light::Directional {
                color: Color::WHITE,
                intensity: 1.0,
                position: DVec3::new(10.0, 10.0, 10.0).normalize(),
            },
        ];

        Self { objects, lights }
    }
}
