//! Audit value objects

use serde::{Deserialize, Serialize};
use std::fmt;

/// Authorization type configured on a gateway method
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AuthorizationType {
    None,
    AwsIam,
    Custom,
    CognitoUserPools,
    /// Any value the gateway reports that we do not model explicitly
    Other(String),
}

impl AuthorizationType {
    /// Parse the raw string reported by the gateway
    pub fn from_raw(raw: &str) -> Self {
        match raw {
            "" | "NONE" => Self::None,
            "AWS_IAM" => Self::AwsIam,
            "CUSTOM" => Self::Custom,
            "COGNITO_USER_POOLS" => Self::CognitoUserPools,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::None => "NONE",
            Self::AwsIam => "AWS_IAM",
            Self::Custom => "CUSTOM",
            Self::CognitoUserPools => "COGNITO_USER_POOLS",
            Self::Other(raw) => raw,
        }
    }

    /// Whether this type counts as proper gateway-level authorization
    pub fn is_authorized(&self) -> bool {
        !matches!(self, Self::None)
    }

    /// Whether the method's authorizer id must resolve in the authorizer cache
    pub fn requires_authorizer(&self) -> bool {
        matches!(self, Self::Custom | Self::CognitoUserPools)
    }
}

impl fmt::Display for AuthorizationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Named reason an endpoint is exempted from gateway-level authorization.
///
/// Variant order matches the alphabetical order of the category labels so a
/// `BTreeSet` iterates them in stable report order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum WhitelistCategory {
    NoRequiereSeguridad,
    SeguridadEnMicroservicio,
    SeguridadPorIp,
}

impl WhitelistCategory {
    pub const ALL: [WhitelistCategory; 3] = [
        Self::NoRequiereSeguridad,
        Self::SeguridadEnMicroservicio,
        Self::SeguridadPorIp,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NoRequiereSeguridad => "NO_REQUIERE_SEGURIDAD",
            Self::SeguridadEnMicroservicio => "SEGURIDAD_EN_MICROSERVICIO",
            Self::SeguridadPorIp => "SEGURIDAD_POR_IP",
        }
    }
}

impl fmt::Display for WhitelistCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
