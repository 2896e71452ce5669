/// Output formats the generation service can be asked for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AssetFormat {
    #[default]
    Glb,
}

impl AssetFormat {
    /// Value sent in the `output_format` form field and used as the key
    /// under `result.assets` in the job status payload
    pub fn id(&self) -> &str {
        match self {
            Self::Glb => "glb",
        }
    }

    /// File extension for the persisted asset
    pub fn extension(&self) -> &str {
        match self {
            Self::Glb => "glb",
        }
    }

    /// Human-readable name for console output
    pub fn name(&self) -> &str {
        match self {
            Self::Glb => "glTF binary",
        }
    }

    /// All supported formats
    pub fn all() -> [AssetFormat; 1] {
        [Self::Glb]
    }
}

impl std::str::FromStr for AssetFormat {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .into_iter()
            .find(|f| f.id().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| crate::Error::Config(format!("unsupported asset format '{s}'")))
    }
}

impl std::fmt::Display for AssetFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_ids() {
        assert_eq!(AssetFormat::Glb.id(), "glb");
        assert_eq!(AssetFormat::Glb.name(), "glTF binary");
        assert_eq!(AssetFormat::default(), AssetFormat::Glb);
    }

    #[test]
    fn test_parse_format() {
        assert_eq!("GLB".parse::<AssetFormat>().unwrap(), AssetFormat::Glb);
        assert!("obj".parse::<AssetFormat>().is_err());
    }

    #[test]
    fn test_all_formats() {
        assert_eq!(AssetFormat::all().len(), 1);
    }
}
