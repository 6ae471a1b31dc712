use super::keyframe::Keyframe;

/// Smallest span used when two bracketing keyframes share a timestamp.
pub const SPAN_EPSILON: f64 = 1e-6;

/// Two bracketing keyframes and the blend factor between them.
#[derive(Debug, Clone, Copy)]
pub struct FrameSample<'a> {
    pub a: &'a Keyframe,
    pub b: &'a Keyframe,
    pub u: f32,
}

/// Playback clock over a sorted keyframe list.
#[derive(Debug, Clone, Default)]
pub struct Timeline {
    keyframes: Vec<Keyframe>,
    time: f64,
}

impl Timeline {
    pub fn new(keyframes: Vec<Keyframe>) -> Self {
        Self {
            keyframes,
            time: 0.0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.keyframes.is_empty()
    }

    pub fn keyframes(&self) -> &[Keyframe] {
        &self.keyframes
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn duration(&self) -> f64 {
        self.keyframes.last().map_or(0.0, |last| last.t)
    }

    pub fn is_finished(&self) -> bool {
        !self.is_empty() && self.time >= self.duration()
    }

    /// Moves the clock forward, holding at the last keyframe, and samples it.
    pub fn advance(&mut self, dt: f64) -> Option<FrameSample<'_>> {
        if self.is_empty() {
            return None;
        }
        self.time = (self.time + dt.max(0.0)).min(self.duration());
        self.sample()
    }

    pub fn sample(&self) -> Option<FrameSample<'_>> {
        let (a, b) = bracket(&self.keyframes, self.time)?;
        Some(FrameSample {
            a,
            b,
            u: interpolation_fraction(a.t, b.t, self.time),
        })
    }
}

/// First consecutive pair with `a.t <= time <= b.t`, scanning from the start.
/// Falls back to the first and last keyframes when no pair contains `time`.
pub fn bracket(keyframes: &[Keyframe], time: f64) -> Option<(&Keyframe, &Keyframe)> {
    let fallback = (keyframes.first()?, keyframes.last()?);
    Some(
        keyframes
            .windows(2)
            .map(|pair| (&pair[0], &pair[1]))
            .find(|(a, b)| a.t <= time && time <= b.t)
            .unwrap_or(fallback),
    )
}

pub fn interpolation_fraction(start: f64, end: f64, time: f64) -> f32 {
    let span = (end - start).max(SPAN_EPSILON);
    ((time - start) / span).clamp(0.0, 1.0) as f32
}
