//! Best-effort reading of the vision model's answer.
//!
//! The detailed inspection prompt asks for `DESCRIPTION:` and `STATUS:`
//! lines. Models do not always comply, so every field is optional and the
//! raw text is always kept.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Broken,
    NotBroken,
    Unclear,
}

impl Verdict {
    /// Finds a verdict phrase anywhere in `text`. "NOT BROKEN" wins over
    /// "BROKEN" since the latter is a substring of the former.
    pub fn find_in(text: &str) -> Option<Self> {
        let upper = text.to_uppercase();
        if upper.contains("NOT BROKEN") {
            Some(Self::NotBroken)
        } else if upper.contains("BROKEN") {
            Some(Self::Broken)
        } else if upper.contains("UNCLEAR") {
            Some(Self::Unclear)
        } else {
            None
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::Broken => "BROKEN",
            Self::NotBroken => "NOT BROKEN",
            Self::Unclear => "UNCLEAR",
        }
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InspectionReport {
    pub description: Option<String>,
    pub verdict: Option<Verdict>,
    pub raw: String,
}

impl InspectionReport {
    pub fn parse(text: &str) -> Self {
        let mut description: Vec<&str> = Vec::new();
        let mut in_description = false;
        let mut verdict = None;

        for line in text.lines() {
            let cleaned = line.trim().trim_matches('*').trim();

            if let Some(rest) = strip_label(cleaned, "DESCRIPTION:") {
                in_description = true;
                if !rest.is_empty() {
                    description.push(rest);
                }
            } else if let Some(rest) = strip_label(cleaned, "STATUS:") {
                in_description = false;
                verdict = Verdict::find_in(rest);
            } else if in_description && !cleaned.is_empty() {
                description.push(cleaned);
            }
        }

        let description = (!description.is_empty()).then(|| description.join("\n"));

        Self {
            description,
            verdict: verdict.or_else(|| Verdict::find_in(text)),
            raw: text.to_string(),
        }
    }
}

fn strip_label<'a>(line: &'a str, label: &str) -> Option<&'a str> {
    let head = line.get(..label.len())?;
    head.eq_ignore_ascii_case(label)
        .then(|| line[label.len()..].trim_start_matches('*').trim())
}
