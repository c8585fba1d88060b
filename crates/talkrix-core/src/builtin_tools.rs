//! Tools every agent can use without defining them. They live only on the
//! client and are never created, edited or deleted through the API.

use crate::models::Tool;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuiltinToolId {
    HangUp,
    ColdTransfer,
    WarmTransfer,
    LeaveVoicemail,
    QueryCorpus,
    PlayDtmfSounds,
}

impl BuiltinToolId {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::HangUp => "hangUp",
            Self::ColdTransfer => "coldTransfer",
            Self::WarmTransfer => "warmTransfer",
            Self::LeaveVoicemail => "leaveVoicemail",
            Self::QueryCorpus => "queryCorpus",
            Self::PlayDtmfSounds => "playDtmfSounds",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuiltinTool {
    pub id: BuiltinToolId,
    pub title: &'static str,
    pub description: &'static str,
}

pub const BUILTIN_TOOLS: [BuiltinTool; 6] = [
    BuiltinTool {
        id: BuiltinToolId::HangUp,
        title: "Hang Up",
        description: "End the call when the conversation is over.",
    },
    BuiltinTool {
        id: BuiltinToolId::ColdTransfer,
        title: "Cold Transfer",
        description: "Transfer the caller to another number without an introduction.",
    },
    BuiltinTool {
        id: BuiltinToolId::WarmTransfer,
        title: "Warm Transfer",
        description: "Brief a human agent, then hand the caller over.",
    },
    BuiltinTool {
        id: BuiltinToolId::LeaveVoicemail,
        title: "Leave Voicemail",
        description: "Leave a message when the call reaches voicemail.",
    },
    BuiltinTool {
        id: BuiltinToolId::QueryCorpus,
        title: "Query Corpus",
        description: "Look up answers in a knowledge base corpus.",
    },
    BuiltinTool {
        id: BuiltinToolId::PlayDtmfSounds,
        title: "Play DTMF Sounds",
        description: "Send keypad tones to navigate phone menus.",
    },
];

pub fn find(name: &str) -> Option<&'static BuiltinTool> {
    BUILTIN_TOOLS.iter().find(|tool| tool.id.as_str() == name)
}

pub fn is_builtin(name: &str) -> bool {
    find(name).is_some()
}

impl BuiltinTool {
    /// Row shape shared with user-defined tools in the tools list.
    pub fn as_tool(&self) -> Tool {
        Tool {
            id: self.id.as_str().to_string(),
            name: self.title.to_string(),
            description: self.description.to_string(),
            ..Tool::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_names_are_unique_and_resolvable() {
        for tool in BUILTIN_TOOLS {
            assert_eq!(find(tool.id.as_str()).map(|t| t.id), Some(tool.id));
        }
        assert!(!is_builtin("lookupOrder"));
    }
}
