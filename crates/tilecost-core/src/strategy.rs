//! Tiling strategy identifiers and their static properties.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// How a layer is partitioned across compute tiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TilingStrategy {
    /// Clustering: the whole layer runs on a single tile.
    None,
    /// Height split; every tile recomputes its own overlap.
    #[serde(rename = "soho")]
    SohOverlapped,
    /// Height split; tiles read a halo border from their neighbours.
    #[serde(rename = "soh_haloread")]
    SohHaloRead,
    /// Channel split with full broadcast of the output.
    Sok,
    /// Channel split, output stays local.
    SokNoBroadcast,
    /// Height split geometry with broadcast write.
    SohoKSwitch,
    /// Width split.
    Sow,
}

impl TilingStrategy {
    pub const ALL: [TilingStrategy; 7] = [
        TilingStrategy::None,
        TilingStrategy::SohOverlapped,
        TilingStrategy::SohHaloRead,
        TilingStrategy::Sok,
        TilingStrategy::SokNoBroadcast,
        TilingStrategy::SohoKSwitch,
        TilingStrategy::Sow,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TilingStrategy::None => "none",
            TilingStrategy::SohOverlapped => "soho",
            TilingStrategy::SohHaloRead => "soh_haloread",
            TilingStrategy::Sok => "sok",
            TilingStrategy::SokNoBroadcast => "sok_no_broadcast",
            TilingStrategy::SohoKSwitch => "soho_k_switch",
            TilingStrategy::Sow => "sow",
        }
    }

    pub fn is_height_split(self) -> bool {
        matches!(
            self,
            TilingStrategy::SohOverlapped | TilingStrategy::SohHaloRead | TilingStrategy::SohoKSwitch
        )
    }

    pub fn is_channel_split(self) -> bool {
        matches!(self, TilingStrategy::Sok | TilingStrategy::SokNoBroadcast)
    }

    pub fn is_width_split(self) -> bool {
        matches!(self, TilingStrategy::Sow)
    }

    /// Strategies whose tiles write their output to every tile.
    pub fn broadcasts(self) -> bool {
        matches!(self, TilingStrategy::Sok | TilingStrategy::SohoKSwitch)
    }
}

impl fmt::Display for TilingStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TilingStrategy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let norm = s.trim().to_ascii_lowercase().replace('-', "_");
        TilingStrategy::ALL
            .into_iter()
            .find(|t| t.as_str() == norm)
            .or(match norm.as_str() {
                "clustering" => Some(TilingStrategy::None),
                "soh" | "soh_overlapped" => Some(TilingStrategy::SohOverlapped),
                _ => None,
            })
            .ok_or_else(|| Error::Config(format!("unknown tiling strategy '{s}'")))
    }
}
