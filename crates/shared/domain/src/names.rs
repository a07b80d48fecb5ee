//! Namespaced identifiers used by the registry and the host protocol.
//!
//! Both [`Api`] and [`Model`] are colon-delimited triplets (`rdk:component:sensor`,
//! `viam-soleng:sensor:mysensor`). A [`ResourceName`] pairs an API with the
//! instance name chosen by the host (`rdk:component:sensor/front`).

use crate::constants::{COMPONENT, GENERIC, NAME_SEPARATOR, RDK, SENSOR, TRIPLET_SEPARATOR};
use serde::{Deserialize, Deserializer, Serialize, Serializer, de};
use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

/// Returned when a textual identifier does not have the expected shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MalformedName {
    pub kind: &'static str,
    pub input: String,
}

impl fmt::Display for MalformedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "malformed {} '{}'", self.kind, self.input)
    }
}

impl std::error::Error for MalformedName {}

fn is_valid_part(part: &str) -> bool {
    !part.is_empty() && part.chars().all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_'))
}

fn split_triplet<'a>(kind: &'static str, s: &'a str) -> Result<[&'a str; 3], MalformedName> {
    let malformed = || MalformedName { kind, input: s.to_owned() };
    let mut parts = s.split(TRIPLET_SEPARATOR);
    let triplet = [
        parts.next().ok_or_else(malformed)?,
        parts.next().ok_or_else(malformed)?,
        parts.next().ok_or_else(malformed)?,
    ];
    if parts.next().is_some() || !triplet.iter().all(|p| is_valid_part(p)) {
        return Err(malformed());
    }
    Ok(triplet)
}

/// The capability contract a resource implements, e.g. `rdk:component:sensor`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Api {
    namespace: Cow<'static, str>,
    kind: Cow<'static, str>,
    subtype: Cow<'static, str>,
}

impl Api {
    pub const SENSOR: Self = Self::from_static(RDK, COMPONENT, SENSOR);
    pub const GENERIC: Self = Self::from_static(RDK, COMPONENT, GENERIC);

    /// Builds an API from compile-time parts. Parts are not validated.
    #[must_use]
    pub const fn from_static(
        namespace: &'static str,
        kind: &'static str,
        subtype: &'static str,
    ) -> Self {
        Self {
            namespace: Cow::Borrowed(namespace),
            kind: Cow::Borrowed(kind),
            subtype: Cow::Borrowed(subtype),
        }
    }

    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// `component` or `service`.
    #[must_use]
    pub fn kind(&self) -> &str {
        &self.kind
    }

    #[must_use]
    pub fn subtype(&self) -> &str {
        &self.subtype
    }
}

impl fmt::Display for Api {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.namespace, self.kind, self.subtype)
    }
}

impl FromStr for Api {
    type Err = MalformedName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let [namespace, kind, subtype] = split_triplet("api", s)?;
        Ok(Self {
            namespace: Cow::Owned(namespace.to_owned()),
            kind: Cow::Owned(kind.to_owned()),
            subtype: Cow::Owned(subtype.to_owned()),
        })
    }
}

/// Identifies a constructible component kind: `namespace:family:name`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Model {
    namespace: Cow<'static, str>,
    family: Cow<'static, str>,
    name: Cow<'static, str>,
}

impl Model {
    /// Builds a model from compile-time parts. Parts are not validated;
    /// prefer the `#[modkit_derive::model]` attribute which checks them at compile time.
    #[must_use]
    pub const fn from_static(
        namespace: &'static str,
        family: &'static str,
        name: &'static str,
    ) -> Self {
        Self {
            namespace: Cow::Borrowed(namespace),
            family: Cow::Borrowed(family),
            name: Cow::Borrowed(name),
        }
    }

    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    #[must_use]
    pub fn family(&self) -> &str {
        &self.family
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.namespace, self.family, self.name)
    }
}

impl FromStr for Model {
    type Err = MalformedName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let [namespace, family, name] = split_triplet("model", s)?;
        Ok(Self {
            namespace: Cow::Owned(namespace.to_owned()),
            family: Cow::Owned(family.to_owned()),
            name: Cow::Owned(name.to_owned()),
        })
    }
}

/// Unique key of a live resource: its API plus the host-assigned name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ResourceName {
    api: Api,
    name: String,
}

impl ResourceName {
    #[must_use]
    pub fn new(api: Api, name: impl Into<String>) -> Self {
        Self { api, name: name.into() }
    }

    #[must_use]
    pub const fn api(&self) -> &Api {
        &self.api
    }

    /// The short, host-assigned name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for ResourceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{NAME_SEPARATOR}{}", self.api, self.name)
    }
}

impl FromStr for ResourceName {
    type Err = MalformedName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || MalformedName { kind: "resource name", input: s.to_owned() };
        let (api, name) = s.split_once(NAME_SEPARATOR).ok_or_else(malformed)?;
        if name.trim().is_empty() {
            return Err(malformed());
        }
        Ok(Self { api: api.parse().map_err(|_| malformed())?, name: name.to_owned() })
    }
}

macro_rules! string_serde {
    ($($ty:ty),+) => {$(
        impl Serialize for $ty {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: Serializer,
            {
                serializer.collect_str(self)
            }
        }

        impl<'de> Deserialize<'de> for $ty {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: Deserializer<'de>,
            {
                let raw = String::deserialize(deserializer)?;
                raw.parse().map_err(de::Error::custom)
            }
        }
    )+};
}

string_serde!(Api, Model, ResourceName);
