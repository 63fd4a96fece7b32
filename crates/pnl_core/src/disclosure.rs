//! First-class "not disclosed" state.
//!
//! Absent data is a result, not an error and never a zero. `Disclosure<T>`
//! replaces `Option<T>` at every output seam so serialization spells the
//! state out (`"status": "NOT_DISCLOSED"`) instead of dropping the field.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(tag = "status", content = "value", rename_all = "SCREAMING_SNAKE_CASE")
)]
pub enum Disclosure<T> {
    Disclosed(T),
    NotDisclosed,
}

impl<T> Disclosure<T> {
    pub fn is_disclosed(&self) -> bool {
        matches!(self, Disclosure::Disclosed(_))
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            Disclosure::Disclosed(v) => Some(v),
            Disclosure::NotDisclosed => None,
        }
    }

    pub fn into_value(self) -> Option<T> {
        match self {
            Disclosure::Disclosed(v) => Some(v),
            Disclosure::NotDisclosed => None,
        }
    }

    pub fn as_ref(&self) -> Disclosure<&T> {
        match self {
            Disclosure::Disclosed(v) => Disclosure::Disclosed(v),
            Disclosure::NotDisclosed => Disclosure::NotDisclosed,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Disclosure<U> {
        match self {
            Disclosure::Disclosed(v) => Disclosure::Disclosed(f(v)),
            Disclosure::NotDisclosed => Disclosure::NotDisclosed,
        }
    }
}

impl<T> From<Option<T>> for Disclosure<T> {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(v) => Disclosure::Disclosed(v),
            None => Disclosure::NotDisclosed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_and_projects() {
        let d: Disclosure<u32> = Disclosure::Disclosed(7);
        assert!(d.is_disclosed());
        assert_eq!(d.map(|v| v * 2).into_value(), Some(14));
        let n: Disclosure<u32> = Disclosure::NotDisclosed;
        assert_eq!(n.value(), None);
    }
}
