#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataSource {
    Live,
    Simulated,
}

impl std::fmt::Display for DataSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Live => f.write_str("live"),
            Self::Simulated => f.write_str("simulated"),
        }
    }
}

/// A provider result: either what the remote API answered or the locally
/// simulated replacement.
#[derive(Debug, Clone, PartialEq)]
pub enum Fetched<T> {
    Live(T),
    Simulated(T),
}

impl<T> Fetched<T> {
    pub fn source(&self) -> DataSource {
        match self {
            Self::Live(_) => DataSource::Live,
            Self::Simulated(_) => DataSource::Simulated,
        }
    }

    pub fn is_simulated(&self) -> bool {
        self.source() == DataSource::Simulated
    }

    pub fn value(&self) -> &T {
        match self {
            Self::Live(v) | Self::Simulated(v) => v,
        }
    }

    pub fn into_inner(self) -> T {
        match self {
            Self::Live(v) | Self::Simulated(v) => v,
        }
    }

    pub fn into_parts(self) -> (DataSource, T) {
        let source = self.source();
        (source, self.into_inner())
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Fetched<U> {
        match self {
            Self::Live(v) => Fetched::Live(f(v)),
            Self::Simulated(v) => Fetched::Simulated(f(v)),
        }
    }
}
