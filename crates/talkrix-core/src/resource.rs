/// Fetch state of one remotely owned value.
#[derive(Debug, Clone, PartialEq)]
pub enum Resource<T> {
    Idle,
    Loading,
    Ready(T),
    Failed(String),
}

impl<T> Default for Resource<T> {
    fn default() -> Self {
        Self::Idle
    }
}

impl<T> Resource<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            Self::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn ready_mut(&mut self) -> Option<&mut T> {
        match self {
            Self::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Failed(message) => Some(message.as_str()),
            _ => None,
        }
    }

    /// Moves to `Loading`. Returns `false` when a load is already in flight so
    /// callers can drop the duplicate request.
    pub fn begin_load(&mut self) -> bool {
        if self.is_loading() {
            return false;
        }
        *self = Self::Loading;
        true
    }

    pub fn resolve<E: ToString>(&mut self, result: Result<T, E>) {
        *self = match result {
            Ok(value) => Self::Ready(value),
            Err(err) => Self::Failed(err.to_string()),
        };
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Resource<U> {
        match self {
            Self::Idle => Resource::Idle,
            Self::Loading => Resource::Loading,
            Self::Ready(value) => Resource::Ready(f(value)),
            Self::Failed(message) => Resource::Failed(message),
        }
    }
}

impl<T: Default + Clone> Resource<T> {
    /// Value to render: the loaded data, or the empty shape while idle,
    /// loading or failed.
    pub fn value_or_default(&self) -> T {
        self.ready().cloned().unwrap_or_default()
    }
}
