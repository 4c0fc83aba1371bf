#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BannerKind {
    Info,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Banner {
    pub text: String,
    pub kind: BannerKind,
}

impl Banner {
    pub fn info(text: &str) -> Banner {
        return Banner {
            text: text.to_string(),
            kind: BannerKind::Info,
        };
    }

    pub fn warning(text: &str) -> Banner {
        return Banner {
            text: text.to_string(),
            kind: BannerKind::Warning,
        };
    }
}
