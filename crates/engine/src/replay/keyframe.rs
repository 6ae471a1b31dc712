use std::path::Path;

use crate::math::{Color, Vec2};
use crate::recording::{read_lines, RECORD_TYPE_KEYFRAME};

use super::record::LineRecord;
use super::ReplayError;

/// Color used when a record carries no readable color.
pub const DEFAULT_REPLAY_COLOR: Color = Color::new(0.9, 0.9, 0.2, 1.0);
pub const MISSING_UID: i64 = -1;

#[derive(Debug, Clone, PartialEq)]
pub struct EntityInfo {
    pub uid: i64,
    pub id: Option<String>,
    pub position: Vec2,
    pub render_kind: Option<String>,
    pub size: Vec2,
    pub color: Color,
}

impl EntityInfo {
    pub fn from_record(record: &LineRecord<'_>) -> Self {
        Self {
            uid: record.i64_field("uid").unwrap_or(MISSING_UID),
            id: record.str_field("id"),
            position: Vec2::new(
                record.f32_field("x").unwrap_or(0.0),
                record.f32_field("y").unwrap_or(0.0),
            ),
            render_kind: record.str_field("rt"),
            size: Vec2::new(
                record.f32_field("w").unwrap_or(0.0),
                record.f32_field("h").unwrap_or(0.0),
            ),
            color: parse_color(record).unwrap_or(DEFAULT_REPLAY_COLOR),
        }
    }
}

fn parse_color(record: &LineRecord<'_>) -> Option<Color> {
    match record.f32_array("color")?.as_slice() {
        [r, g, b] => Some(Color::new(*r, *g, *b, 1.0)),
        [r, g, b, a] => Some(Color::new(*r, *g, *b, *a)),
        _ => None,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Keyframe {
    pub t: f64,
    pub entities: Vec<EntityInfo>,
}

/// Reads one log line; `None` unless its `type` member is `keyframe`.
pub fn parse_keyframe(line: &str) -> Option<Keyframe> {
    let record = LineRecord::parse(line)?;
    if record.str_field("type").as_deref() != Some(RECORD_TYPE_KEYFRAME) {
        return None;
    }
    let entities = record
        .array_items("entities")
        .unwrap_or_default()
        .into_iter()
        .filter_map(LineRecord::parse)
        .map(|entity| EntityInfo::from_record(&entity))
        .collect();
    Some(Keyframe {
        t: record.f64_field("t").unwrap_or(0.0),
        entities,
    })
}

/// Keyframes of a log in ascending `t`; equal times keep file order.
pub fn parse_keyframes<I, S>(lines: I) -> Vec<Keyframe>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut keyframes: Vec<Keyframe> = lines
        .into_iter()
        .filter_map(|line| parse_keyframe(line.as_ref()))
        .collect();
    keyframes.sort_by(|a, b| a.t.total_cmp(&b.t));
    keyframes
}

pub fn load_keyframes(path: &Path) -> Result<Vec<Keyframe>, ReplayError> {
    let lines = read_lines(path).map_err(|source| ReplayError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(parse_keyframes(lines))
}

#[cfg(test)]
mod tests {
    use std::fs;

    use serde_json::json;
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn parses_full_entity_record() {
        let line = json!({
            "type": "keyframe",
            "t": 0.5,
            "entities": [{
                "uid": 3, "id": "Enemy", "x": 1.0, "y": 2.0,
                "rt": "RECTANGLE", "w": 20.0, "h": 20.0,
                "color": [1.0, 0.5, 0.0, 1.0]
            }]
        })
        .to_string();
        let keyframe = parse_keyframe(&line).expect("keyframe");
        assert_eq!(keyframe.t, 0.5);
        assert_eq!(
            keyframe.entities,
            vec![EntityInfo {
                uid: 3,
                id: Some("Enemy".to_string()),
                position: Vec2::new(1.0, 2.0),
                render_kind: Some("RECTANGLE".to_string()),
                size: Vec2::new(20.0, 20.0),
                color: Color::new(1.0, 0.5, 0.0, 1.0),
            }]
        );
    }

    #[test]
    fn missing_fields_take_defaults() {
        let keyframe =
            parse_keyframe(r#"{"type":"keyframe","t":1,"entities":[{"id":"Player"}]}"#)
                .expect("keyframe");
        let info = &keyframe.entities[0];
        assert_eq!(info.uid, MISSING_UID);
        assert_eq!(info.position, Vec2::ZERO);
        assert_eq!(info.render_kind, None);
        assert_eq!(info.color, DEFAULT_REPLAY_COLOR);
    }

    #[test]
    fn color_is_all_or_nothing() {
        let keyframe = parse_keyframe(
            r#"{"type":"keyframe","t":0,"entities":[
                {"uid":1,"color":[0.1,0.2,0.3]},
                {"uid":2,"color":[0.1,"x",0.3,1]},
                {"uid":3,"color":[0.1,0.2]}
            ]}"#,
        )
        .expect("keyframe");
        assert_eq!(keyframe.entities[0].color, Color::new(0.1, 0.2, 0.3, 1.0));
        assert_eq!(keyframe.entities[1].color, DEFAULT_REPLAY_COLOR);
        assert_eq!(keyframe.entities[2].color, DEFAULT_REPLAY_COLOR);
    }

    #[test]
    fn only_keyframe_lines_are_kept_and_sorted() {
        let lines = [
            r#"{"type":"header","version":1,"w":800,"h":600}"#,
            r#"{"type":"keyframe","t":2.0,"entities":[]}"#,
            "garbage",
            r#"{"type":"keyframe","t":1.0,"entities":[{"uid":1}]}"#,
            r#"{"type":"keyframe","t":1.0,"entities":[{"uid":2}]}"#,
            r#"{"type":"input","t":0.5}"#,
        ];
        let keyframes = parse_keyframes(lines);
        let order: Vec<(f64, i64)> = keyframes
            .iter()
            .map(|k| (k.t, k.entities.first().map_or(0, |e| e.uid)))
            .collect();
        assert_eq!(order, vec![(1.0, 1), (1.0, 2), (2.0, 0)]);
    }

    #[test]
    fn load_reports_missing_file() {
        let dir = TempDir::new().expect("temp dir");
        let error = load_keyframes(&dir.path().join("absent.jsonl")).expect_err("missing");
        assert!(matches!(error, ReplayError::Read { .. }));
    }

    #[test]
    fn load_reads_file_lines() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("session.jsonl");
        fs::write(
            &path,
            "{\"type\":\"keyframe\",\"t\":0.0,\"entities\":[]}\n{\"type\":\"keyframe\",\"t\":1.0,\"entities\":[]}\n",
        )
        .expect("write");
        assert_eq!(load_keyframes(&path).expect("load").len(), 2);
    }
}
