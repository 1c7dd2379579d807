//! Port-forwarding binding strings.
//!
//! A binding string encodes the addresses and ports of a forwarding rule:
//!
//! - local / remote: `[bound_address:]local_port:hostname:remote_port`
//! - dynamic: `[bound_address:]local_port`
//!
//! Every grammar exposes the same four named captures, so the result always
//! has the same shape. For dynamic bindings `hostname` and `remote_port` are
//! empty strings, not absent.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

static LOCAL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^((?P<bound_address>[\w.]+):)?(?P<local_port>\d+):(?P<hostname>[\w.]+):(?P<remote_port>\d+)$",
    )
    .expect("local binding pattern compiles")
});

// Capture names must stay identical to LOCAL_RE.
static DYNAMIC_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^((?P<bound_address>[\w.]+):)?(?P<local_port>\d+)(?P<hostname>)(?P<remote_port>)$")
        .expect("dynamic binding pattern compiles")
});

/// Decoded binding string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BindingSpec {
    pub bound_address: Option<String>,
    pub local_port: String,
    pub hostname: String,
    pub remote_port: String,
}

impl BindingSpec {
    pub fn is_empty(&self) -> bool {
        self.local_port.is_empty()
    }
}

impl core::fmt::Display for BindingSpec {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        if let Some(addr) = &self.bound_address {
            write!(f, "{addr}:")?;
        }
        f.write_str(&self.local_port)?;
        if !self.hostname.is_empty() {
            write!(f, ":{}:{}", self.hostname, self.remote_port)?;
        }
        Ok(())
    }
}

/// Signature shared by all binding parsers.
pub type BindingParser = fn(&str) -> CoreResult<BindingSpec>;

/// Port-forwarding type, serialized as its single-letter discriminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ForwardingType {
    #[serde(rename = "D")]
    Dynamic,
    #[serde(rename = "L")]
    Local,
    #[serde(rename = "R")]
    Remote,
}

impl ForwardingType {
    pub const fn letter(self) -> char {
        match self {
            Self::Dynamic => 'D',
            Self::Local => 'L',
            Self::Remote => 'R',
        }
    }

    /// Parser for binding strings of this type.
    pub const fn parser(self) -> BindingParser {
        match self {
            Self::Dynamic => parse_dynamic,
            Self::Local => parse_local,
            Self::Remote => parse_remote,
        }
    }

    pub fn parse_binding(self, binding: &str) -> CoreResult<BindingSpec> {
        (self.parser())(binding)
    }
}

/// Accepts the letter (`L`) or the name (`local`), case-insensitively.
impl core::str::FromStr for ForwardingType {
    type Err = CoreError;

    fn from_str(raw: &str) -> CoreResult<Self> {
        let ty = match raw.to_ascii_lowercase().as_str() {
            "d" | "dynamic" => Self::Dynamic,
            "l" | "local" => Self::Local,
            "r" | "remote" => Self::Remote,
            _ => {
                return Err(CoreError::invalid_argument(format!(
                    "unknown forwarding type '{raw}'"
                )));
            }
        };
        Ok(ty)
    }
}

impl core::fmt::Display for ForwardingType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(match self {
            Self::Dynamic => "dynamic",
            Self::Local => "local",
            Self::Remote => "remote",
        })
    }
}

pub fn parse_local(binding: &str) -> CoreResult<BindingSpec> {
    parse_with(&LOCAL_RE, binding)
}

pub fn parse_remote(binding: &str) -> CoreResult<BindingSpec> {
    parse_with(&LOCAL_RE, binding)
}

pub fn parse_dynamic(binding: &str) -> CoreResult<BindingSpec> {
    parse_with(&DYNAMIC_RE, binding)
}

fn parse_with(re: &Regex, binding: &str) -> CoreResult<BindingSpec> {
    let caps = re
        .captures(binding)
        .ok_or_else(|| CoreError::invalid_binding(binding))?;
    let group = |name: &str| {
        caps.name(name)
            .map(|m| m.as_str().to_string())
            .unwrap_or_default()
    };
    Ok(BindingSpec {
        bound_address: caps.name("bound_address").map(|m| m.as_str().to_string()),
        local_port: group("local_port"),
        hostname: group("hostname"),
        remote_port: group("remote_port"),
    })
}
