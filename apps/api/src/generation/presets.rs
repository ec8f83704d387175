use serde::Serialize;

/// A one-click extra instruction offered next to the job description input.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct InstructionPreset {
    pub label: &'static str,
    pub value: &'static str,
}

pub const PRESETS: &[InstructionPreset] = &[
    InstructionPreset {
        label: "Short",
        value: "Keep it strictly under 100 words.",
    },
    InstructionPreset {
        label: "Casual",
        value: "Use a friendly, conversational tone.",
    },
    InstructionPreset {
        label: "Formal",
        value: "Maintain a strictly professional tone.",
    },
    InstructionPreset {
        label: "Urgent",
        value: "Emphasize ability to start immediately.",
    },
    InstructionPreset {
        label: "Question-heavy",
        value: "Focus heavily on strategic questions.",
    },
];
