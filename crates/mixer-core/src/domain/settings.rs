//! The persisted configuration consumed by the helper program.
//!
//! A configuration file looks like this (YAML, the helper's native format):
//!
//! ```yaml
//! slider_mapping:
//!   '1': master
//!   '2': chrome.exe
//!   '3': spotify.exe
//! com_port: COM4
//! baud_rate: 9600
//! invert_sliders: false
//! noise_reduction: high
//! process_refresh_frequency: 5
//! ```
//!
//! Keys the editor does not manage (`process_refresh_frequency` above) are
//! kept in [`Configuration::extra`] and written back unchanged, so editing a
//! file never strips settings that only the helper understands.
//!
//! A slider may also be bound to several applications at once, which the
//! helper's stock file does for games:
//!
//! ```yaml
//! slider_mapping:
//!   3:
//!     - pathofexile_x64.exe
//!     - rocketleague.exe
//! ```
//!
//! Such lists are kept as [`SliderTarget::Many`] until the slider is
//! reassigned through the editor, which always binds a single name.
//!
//! # Slider indices
//!
//! Slider indices are written as strings so the same model serializes to TOML,
//! whose table keys must be strings.  Integer keys are accepted when reading,
//! which is how hand-written YAML files usually spell them.

use std::collections::BTreeMap;
use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use tracing::debug;

use super::validation::{validate_target, ValidationError};

/// Sentinel target that binds a slider to the overall system volume.
pub const MASTER_TARGET: &str = "master";

/// Baud rate used when the file does not specify one.
pub const DEFAULT_BAUD_RATE: u32 = 9600;

/// Position of a physical slider on the controller board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SliderIndex(u32);

impl SliderIndex {
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    pub const fn get(self) -> u32 {
        self.0
    }

    /// The index directly after this one.
    pub fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

impl From<u32> for SliderIndex {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

impl fmt::Display for SliderIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for SliderIndex {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}

impl Serialize for SliderIndex {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for SliderIndex {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(SliderIndexVisitor)
    }
}

struct SliderIndexVisitor;

impl<'de> Visitor<'de> for SliderIndexVisitor {
    type Value = SliderIndex;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a non-negative slider index")
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        u32::try_from(v)
            .map(SliderIndex)
            .map_err(|_| E::invalid_value(de::Unexpected::Unsigned(v), &self))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        u32::try_from(v)
            .map(SliderIndex)
            .map_err(|_| E::invalid_value(de::Unexpected::Signed(v), &self))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        v.parse()
            .map_err(|_| E::invalid_value(de::Unexpected::Str(v), &self))
    }
}

/// What a slider controls: one application (or master), or a group of them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SliderTarget {
    One(String),
    Many(Vec<String>),
}

impl SliderTarget {
    /// Every name the slider controls, in file order.
    pub fn names(&self) -> &[String] {
        match self {
            Self::One(name) => std::slice::from_ref(name),
            Self::Many(names) => names,
        }
    }

    /// `true` if any bound name is [`MASTER_TARGET`].
    pub fn is_master(&self) -> bool {
        self.names().iter().any(|name| name == MASTER_TARGET)
    }
}

impl From<&str> for SliderTarget {
    fn from(name: &str) -> Self {
        Self::One(name.to_string())
    }
}

impl From<String> for SliderTarget {
    fn from(name: String) -> Self {
        Self::One(name)
    }
}

impl fmt::Display for SliderTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.names().join(", "))
    }
}

/// Filtering strength the helper applies to raw slider readings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoiseReduction {
    Low,
    /// The helper itself calls this level `default`.
    #[serde(alias = "default")]
    Medium,
    #[default]
    High,
}

impl NoiseReduction {
    /// Every level, weakest first.
    pub const ALL: [NoiseReduction; 3] = [Self::Low, Self::Medium, Self::High];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl fmt::Display for NoiseReduction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NoiseReduction {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        if wanted == "default" {
            return Ok(Self::Medium);
        }
        Self::ALL
            .into_iter()
            .find(|level| level.as_str() == wanted)
            .ok_or_else(|| ValidationError::UnknownNoiseReduction(s.to_string()))
    }
}

fn default_baud_rate() -> u32 {
    DEFAULT_BAUD_RATE
}

/// Settings shared between this editor and the helper program.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Configuration {
    /// Slider index to target (executable names or [`MASTER_TARGET`]).
    #[serde(default)]
    pub slider_mapping: BTreeMap<SliderIndex, SliderTarget>,
    /// Serial device the controller board is attached to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub com_port: Option<String>,
    #[serde(default = "default_baud_rate")]
    pub baud_rate: u32,
    #[serde(default)]
    pub invert_sliders: bool,
    #[serde(default)]
    pub noise_reduction: NoiseReduction,
    /// Keys this editor does not manage, preserved verbatim.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            slider_mapping: BTreeMap::new(),
            com_port: None,
            baud_rate: DEFAULT_BAUD_RATE,
            invert_sliders: false,
            noise_reduction: NoiseReduction::default(),
            extra: BTreeMap::new(),
        }
    }
}

impl Configuration {
    /// Returns the target bound to `index`, if the slider exists.
    pub fn target(&self, index: SliderIndex) -> Option<&SliderTarget> {
        self.slider_mapping.get(&index)
    }

    /// Iterates sliders in index order.
    pub fn sliders(&self) -> impl Iterator<Item = (SliderIndex, &SliderTarget)> {
        self.slider_mapping.iter().map(|(i, t)| (*i, t))
    }

    /// The index a newly created slider must use, or `None` for an empty
    /// mapping (which accepts any starting index).
    pub fn next_slider_index(&self) -> Option<SliderIndex> {
        self.slider_mapping.keys().next_back().map(|last| last.next())
    }

    /// Binds `index` to the single name `target` and returns the previous
    /// target, which may have been a group.
    ///
    /// `index` must already exist or be [`next_slider_index`](Self::next_slider_index),
    /// so indices stay contiguous.
    ///
    /// # Errors
    ///
    /// [`ValidationError::BlankTarget`] for an empty target and
    /// [`ValidationError::SliderIndexGap`] for an index that would leave a hole.
    pub fn assign_slider(
        &mut self,
        index: SliderIndex,
        target: &str,
    ) -> Result<Option<SliderTarget>, ValidationError> {
        let target = validate_target(target)?;
        if !self.slider_mapping.contains_key(&index) {
            if let Some(next) = self.next_slider_index() {
                if index != next {
                    return Err(ValidationError::SliderIndexGap { index, next });
                }
            }
            debug!(%index, "creating slider");
        }
        Ok(self.slider_mapping.insert(index, SliderTarget::One(target)))
    }

    /// Binds `index` to the master volume.
    pub fn set_master_slider(
        &mut self,
        index: SliderIndex,
    ) -> Result<Option<SliderTarget>, ValidationError> {
        self.assign_slider(index, MASTER_TARGET)
    }

    /// Every slider whose target includes [`MASTER_TARGET`].
    pub fn master_sliders(&self) -> Vec<SliderIndex> {
        self.sliders()
            .filter(|(_, target)| target.is_master())
            .map(|(index, _)| index)
            .collect()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
