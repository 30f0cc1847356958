use serde::{Deserialize, Serialize};

/// Whether tree mutations are captured as history entries
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RecordMode {
    /// Each mutation becomes its own history entry
    #[default]
    Recording,

    /// Mutations write straight to state (undo/redo replay, active gestures)
    Replaying,
}

impl RecordMode {
    pub fn is_recording(self) -> bool {
        self == RecordMode::Recording
    }
}
