//! Explicit outcome of a pipeline stage that may legitimately produce nothing.

/// Result of a stage whose "nothing" cases are expected, not exceptional.
///
/// `NotFound` means the target is absent from the archive (or an upstream
/// stage already reported it absent). `InsufficientData` means too few
/// usable samples survived to continue.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    Found(T),
    NotFound,
    InsufficientData { needed: usize, got: usize },
}

impl<T> Outcome<T> {
    pub fn is_found(&self) -> bool {
        matches!(self, Outcome::Found(_))
    }

    /// Convert to an `Option`, discarding the reason for absence.
    pub fn into_option(self) -> Option<T> {
        match self {
            Outcome::Found(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_ref(&self) -> Outcome<&T> {
        match self {
            Outcome::Found(value) => Outcome::Found(value),
            Outcome::NotFound => Outcome::NotFound,
            Outcome::InsufficientData { needed, got } => Outcome::InsufficientData {
                needed: *needed,
                got: *got,
            },
        }
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Outcome<U> {
        match self {
            Outcome::Found(value) => Outcome::Found(f(value)),
            Outcome::NotFound => Outcome::NotFound,
            Outcome::InsufficientData { needed, got } => Outcome::InsufficientData { needed, got },
        }
    }

    pub fn and_then<U, F: FnOnce(T) -> Outcome<U>>(self, f: F) -> Outcome<U> {
        match self {
            Outcome::Found(value) => f(value),
            Outcome::NotFound => Outcome::NotFound,
            Outcome::InsufficientData { needed, got } => Outcome::InsufficientData { needed, got },
        }
    }
}

impl<T> From<Option<T>> for Outcome<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => Outcome::Found(v),
            None => Outcome::NotFound,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn map_and_then_propagate_absence() {
        let found: Outcome<i32> = Outcome::Found(2);
        assert_eq!(found.clone().map(|x| x * 2), Outcome::Found(4));
        assert_eq!(
            found.and_then(|_| Outcome::<i32>::InsufficientData { needed: 10, got: 3 }),
            Outcome::InsufficientData { needed: 10, got: 3 }
        );

        let missing: Outcome<i32> = Outcome::NotFound;
        assert_eq!(missing.map(|x| x + 1), Outcome::NotFound);
    }

    #[test]
    fn into_option_and_from_option() {
        assert_eq!(Outcome::Found("a").into_option(), Some("a"));
        assert_eq!(
            Outcome::<&str>::InsufficientData { needed: 1, got: 0 }.into_option(),
            None
        );
        assert_eq!(Outcome::from(None::<u8>), Outcome::NotFound);
        assert!(Outcome::from(Some(1u8)).is_found());
    }
}
