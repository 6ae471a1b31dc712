use serde::Serialize;

use crate::sim::{Entity, SceneWorld};

pub const LOG_FORMAT_VERSION: u32 = 1;
pub const RECORD_TYPE_HEADER: &str = "header";
pub const RECORD_TYPE_KEYFRAME: &str = "keyframe";

/// One line of a session log.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum LogRecord<'a> {
    Header { version: u32, w: u32, h: u32 },
    Keyframe { t: f64, entities: Vec<EntityRecord<'a>> },
}

#[derive(Debug, Serialize, PartialEq)]
pub struct EntityRecord<'a> {
    pub uid: u64,
    pub id: &'a str,
    pub x: f32,
    pub y: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rt: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub w: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub h: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<[f32; 4]>,
}

impl<'a> EntityRecord<'a> {
    /// Snapshot of a positioned entity; `None` when it has no transform.
    pub fn from_entity(entity: &'a Entity) -> Option<Self> {
        let position = entity.position()?;
        let renderable = entity.renderable();
        Some(Self {
            uid: entity.id().0,
            id: entity.name(),
            x: position.x,
            y: position.y,
            rt: renderable.map(|renderable| renderable.shape.as_str()),
            w: renderable.map(|renderable| renderable.size.x),
            h: renderable.map(|renderable| renderable.size.y),
            color: renderable.map(|renderable| renderable.color.to_array()),
        })
    }
}

pub fn keyframe_record(t: f64, world: &SceneWorld) -> LogRecord<'_> {
    let entities = world
        .entities()
        .iter()
        .filter(|entity| entity.is_active())
        .filter_map(EntityRecord::from_entity)
        .collect();
    LogRecord::Keyframe { t, entities }
}

#[cfg(test)]
mod tests {
    use serde_json::{json, Value};

    use super::*;
    use crate::math::Vec2;
    use crate::sim::{factory, Arena, Pursuit, PursuitMode};

    #[test]
    fn header_serializes_with_type_tag() {
        let line = serde_json::to_string(&LogRecord::Header {
            version: LOG_FORMAT_VERSION,
            w: 800,
            h: 600,
        })
        .expect("encode");
        assert_eq!(line, r#"{"type":"header","version":1,"w":800,"h":600}"#);
    }

    #[test]
    fn keyframe_lists_active_entities_with_render_data() {
        let mut world = SceneWorld::new("Game", Arena::default());
        world.spawn(factory::player(Vec2::new(400.0, 300.0), 0.95));
        let enemy = world.spawn(factory::enemy(
            Vec2::new(10.0, 20.0),
            Pursuit {
                chase_speed: 50.0,
                mode: PursuitMode::Velocity,
            },
        ));
        let gone = world.spawn(factory::decoration(Vec2::new(1.0, 1.0)));
        world.find_entity_mut(gone).expect("decoration").set_active(false);

        let value: Value =
            serde_json::to_value(keyframe_record(0.5, &world)).expect("encode keyframe");
        assert_eq!(value["type"], "keyframe");
        assert_eq!(value["t"], 0.5);
        let entities = value["entities"].as_array().expect("entities");
        assert_eq!(entities.len(), 2);
        assert_eq!(entities[0], json!({"uid": 0, "id": "Player", "x": 400.0, "y": 300.0}));
        assert_eq!(
            entities[1],
            json!({
                "uid": enemy.0,
                "id": "Enemy",
                "x": 10.0,
                "y": 20.0,
                "rt": "RECTANGLE",
                "w": 20.0,
                "h": 20.0,
                "color": [1.0, 0.5, 0.0, 1.0]
            })
        );
    }
}
