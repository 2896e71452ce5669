/// Instruction sent alongside the image to the vision model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PromptPreset {
    /// Detailed description, purpose, and a BROKEN / NOT BROKEN / UNCLEAR status
    #[default]
    Detailed,
    /// Single-line broken-or-not question
    BrokenCheck,
}

const DETAILED_PROMPT: &str = "You are an expert visual inspector.\n\
Given the image:\n\
1. Describe the object in detailed natural language.\n\
2. Identify its purpose.\n\
3. Check if it appears BROKEN or NOT BROKEN.\n\
4. If uncertain, say 'UNCLEAR'.\n\
Your output must contain two fields:\n\
DESCRIPTION: <your detailed description>\n\
STATUS: BROKEN / NOT BROKEN / UNCLEAR\n";

const BROKEN_CHECK_PROMPT: &str = "Is the main object BROKEN or NOT BROKEN? Answer clearly.";

impl PromptPreset {
    pub fn text(&self) -> &'static str {
        match self {
            Self::Detailed => DETAILED_PROMPT,
            Self::BrokenCheck => BROKEN_CHECK_PROMPT,
        }
    }
}

impl std::str::FromStr for PromptPreset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "detailed" => Ok(Self::Detailed),
            "broken-check" | "broken" => Ok(Self::BrokenCheck),
            other => Err(format!(
                "unknown prompt '{other}', expected 'detailed' or 'broken-check'"
            )),
        }
    }
}
