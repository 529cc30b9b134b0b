/// Ticks a notice stays visible: ~3 seconds at the 250ms tick rate.
pub const NOTICE_TTL_TICKS: usize = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Success,
    Error,
}

/// Transient user feedback shown in the footer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub title: String,
    pub body: String,
    pub level: NoticeLevel,
}

impl Notice {
    pub fn info(title: &str, body: &str) -> Self {
        Self::new(title, body, NoticeLevel::Info)
    }

    pub fn success(title: &str, body: &str) -> Self {
        Self::new(title, body, NoticeLevel::Success)
    }

    pub fn error(title: &str, body: &str) -> Self {
        Self::new(title, body, NoticeLevel::Error)
    }

    fn new(title: &str, body: &str, level: NoticeLevel) -> Self {
        Self {
            title: title.to_string(),
            body: body.to_string(),
            level,
        }
    }
}
