//! Channel names accepted by the gateway

use std::fmt;
use std::str::FromStr;

use super::errors::GatewayError;

/// Where a request is routed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    /// Rights-holder contract on its own ledger
    RightsHolder,
    /// Authority contract on its own ledger
    Authority,
    /// Gateway workflows spanning both ledgers
    Gateway,
}

impl Channel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Channel::RightsHolder => "rights_holder",
            Channel::Authority => "authority",
            Channel::Gateway => "gateway",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Channel {
    type Err = GatewayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "rights_holder" => Ok(Channel::RightsHolder),
            "authority" => Ok(Channel::Authority),
            "gateway" => Ok(Channel::Gateway),
            other => Err(GatewayError::UnknownChannel(other.to_string())),
        }
    }
}
