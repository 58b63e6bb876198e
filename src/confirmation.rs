use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum DetectionSignal {
    Monitoring,
    Verifying { elapsed_ms: u64 },
    Confirmed,
}

impl DetectionSignal {
    pub fn status_line(&self) -> String {
        match self {
            DetectionSignal::Monitoring => "Monitoring...".to_string(),
            DetectionSignal::Verifying { elapsed_ms } => {
                format!("Verifying... ({}s)", elapsed_ms / 1000)
            }
            DetectionSignal::Confirmed => "Confirmed quake detected".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ConfirmationState {
    pub streak: u32,
    pub window_start_ms: Option<u64>,
    pub confirmed: bool,
}

#[derive(Debug, Clone)]
pub struct ConfirmationEngine {
    required_streak: u32,
    min_detection_ms: u64,
    state: ConfirmationState,
}

impl ConfirmationEngine {
    pub fn new(required_streak: u32, min_detection_ms: u64) -> Self {
        Self {
            required_streak,
            min_detection_ms,
            state: ConfirmationState::default(),
        }
    }

    // None while latched and still positive.
    pub fn observe(&mut self, positive: bool, now_ms: u64) -> Option<DetectionSignal> {
        if !positive {
            self.reset();
            return Some(DetectionSignal::Monitoring);
        }

        if self.state.streak == 0 {
            self.state.window_start_ms = Some(now_ms);
        }
        self.state.streak = self.state.streak.saturating_add(1);

        let start = self.state.window_start_ms.unwrap_or(now_ms);
        let elapsed_ms = now_ms.saturating_sub(start);

        if self.state.confirmed {
            return None;
        }
        if elapsed_ms >= self.min_detection_ms && self.state.streak >= self.required_streak {
            self.state.confirmed = true;
            return Some(DetectionSignal::Confirmed);
        }
        Some(DetectionSignal::Verifying { elapsed_ms })
    }

    pub fn reset(&mut self) {
        self.state = ConfirmationState::default();
    }

    pub fn state(&self) -> ConfirmationState {
        self.state
    }

    pub fn streak(&self) -> u32 {
        self.state.streak
    }

    pub fn is_confirmed(&self) -> bool {
        self.state.confirmed
    }
}

impl Default for ConfirmationEngine {
    fn default() -> Self {
        Self::new(10, 3000)
    }
}
