#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    Mock,
    Http,
}

impl Backend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Backend::Mock => "mock",
            Backend::Http => "http",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "mock" => Some(Backend::Mock),
            "http" => Some(Backend::Http),
            _ => None,
        }
    }

    pub fn all() -> [Backend; 2] {
        [Backend::Mock, Backend::Http]
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Backend::Mock => "Built-in stub",
            Backend::Http => "HTTP service",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_str() {
        for backend in Backend::all() {
            assert_eq!(Backend::from_str(backend.as_str()), Some(backend));
        }
        assert_eq!(Backend::from_str("grpc"), None);
    }
}
