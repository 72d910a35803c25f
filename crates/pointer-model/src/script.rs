//! JSONL pointer position scripts.
//!
//! One JSON object per line, `{"t": 120, "x": 640, "y": 400}`, with `t` in
//! milliseconds. Blank lines and lines starting with `#` are skipped.

use serde::{Deserialize, Serialize};

use crate::motion::{PointerPosition, TimestampMs};

/// A single scripted pointer observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptedPosition {
    #[serde(rename = "t")]
    pub timestamp_ms: TimestampMs,
    pub x: i32,
    pub y: i32,
}

impl ScriptedPosition {
    pub fn new(timestamp_ms: TimestampMs, x: i32, y: i32) -> Self {
        Self { timestamp_ms, x, y }
    }

    pub fn position(&self) -> PointerPosition {
        PointerPosition::new(self.x, self.y)
    }
}

/// Parse a position script from JSONL content.
pub fn parse_position_script(jsonl: &str) -> Result<Vec<ScriptedPosition>, serde_json::Error> {
    jsonl
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(serde_json::from_str)
        .collect()
}

/// Render positions as JSONL.
pub fn write_position_script(positions: &[ScriptedPosition]) -> Result<String, serde_json::Error> {
    let mut out = String::new();
    for position in positions {
        out.push_str(&serde_json::to_string(position)?);
        out.push('\n');
    }
    Ok(out)
}

/// A horizontal back-and-forth shake: `count` observations `interval_ms`
/// apart, alternating `amplitude` pixels left and right of `origin`.
pub fn horizontal_shake(
    origin: PointerPosition,
    start_ms: TimestampMs,
    count: usize,
    interval_ms: u64,
    amplitude: i32,
) -> Vec<ScriptedPosition> {
    (0..count)
        .map(|i| {
            let offset = if i % 2 == 0 { 0 } else { amplitude };
            ScriptedPosition::new(
                start_ms.saturating_add((i as u64).saturating_mul(interval_ms)),
                origin.x + offset,
                origin.y,
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_skips_comments_and_blanks() {
        let script = "# shake\n{\"t\":0,\"x\":10,\"y\":20}\n\n{\"t\":40,\"x\":60,\"y\":20}\n";
        let positions = parse_position_script(script).unwrap();
        assert_eq!(
            positions,
            vec![
                ScriptedPosition::new(0, 10, 20),
                ScriptedPosition::new(40, 60, 20)
            ]
        );
    }

    #[test]
    fn parse_reports_bad_lines() {
        assert!(parse_position_script("{\"t\":0,\"x\":1}").is_err());
    }

    #[test]
    fn written_script_parses_back() {
        let shake = horizontal_shake(PointerPosition::new(500, 300), 0, 4, 40, 50);
        let text = write_position_script(&shake).unwrap();
        assert_eq!(text.lines().count(), 4);
        assert_eq!(parse_position_script(&text).unwrap(), shake);
    }

    #[test]
    fn shake_alternates_around_origin() {
        let shake = horizontal_shake(PointerPosition::new(100, 100), 1_000, 3, 40, 50);
        assert_eq!(shake[0], ScriptedPosition::new(1_000, 100, 100));
        assert_eq!(shake[1], ScriptedPosition::new(1_040, 150, 100));
        assert_eq!(shake[2], ScriptedPosition::new(1_080, 100, 100));
    }
}
