//! Pixel canvas data on top of the keyed CRDT map.
//!
//! [`PixelData`] maps canvas coordinates to `"x,y"` keys of a [`Map`] of
//! [`Rgb`] colors. Unpainted and erased pixels read back as white. Rendering
//! and input handling are left to the caller, which re-renders after each
//! local mutation or after a [`merge`](PixelData::merge) reports changes.

pub mod errors;

use std::{collections::BTreeMap, fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use tracing::warn;

pub use errors::PixelError;

use crate::crdt::{CRDT, Map, MapState, ReplicaId};

/// An RGB color, serialized as `[red, green, blue]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Rgb(pub [u8; 3]);

impl Rgb {
    /// Color of a pixel that was never painted or has been erased.
    pub const WHITE: Rgb = Rgb([255, 255, 255]);

    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self([red, green, blue])
    }

    pub fn red(&self) -> u8 {
        self.0[0]
    }

    pub fn green(&self) -> u8 {
        self.0[1]
    }

    pub fn blue(&self) -> u8 {
        self.0[2]
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [r, g, b] = self.0;
        write!(f, "#{r:02x}{g:02x}{b:02x}")
    }
}

/// Parses `#rrggbb` or `r,g,b`.
impl FromStr for Rgb {
    type Err = PixelError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let invalid = || PixelError::InvalidColor {
            input: input.to_string(),
        };
        let text = input.trim();

        if let Some(hex) = text.strip_prefix('#') {
            if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
                return Err(invalid());
            }
            let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid());
            return Ok(Rgb([channel(0)?, channel(2)?, channel(4)?]));
        }

        let channels = text
            .split(',')
            .map(|c| c.trim().parse::<u8>().map_err(|_| invalid()))
            .collect::<Result<Vec<_>, _>>()?;
        let [r, g, b] = channels[..] else {
            return Err(invalid());
        };
        Ok(Rgb([r, g, b]))
    }
}

impl From<[u8; 3]> for Rgb {
    fn from(channels: [u8; 3]) -> Self {
        Self(channels)
    }
}

/// Replicated pixel canvas keyed by coordinates.
///
/// # Examples
///
/// ```
/// use pixelsync::pixel::{PixelData, Rgb};
///
/// let mut a = PixelData::new("A");
/// let mut b = PixelData::new("B");
///
/// a.set(0, 0, Rgb::new(255, 0, 0));
/// b.set(0, 0, Rgb::new(0, 0, 255));
/// a.merge(&b.state());
///
/// assert_eq!(a.get(0, 0), Rgb::new(0, 0, 255));
/// assert_eq!(a.get(5, 5), Rgb::WHITE);
/// ```
#[derive(Debug, Clone)]
pub struct PixelData {
    data: Map<Rgb>,
}

impl PixelData {
    /// Create an empty canvas owned by `replica`.
    pub fn new(replica: impl Into<ReplicaId>) -> Self {
        Self {
            data: Map::new(replica),
        }
    }

    /// Restore a canvas from an exported state.
    pub fn from_state(replica: impl Into<ReplicaId>, state: MapState<Rgb>) -> Self {
        Self {
            data: Map::from_state(replica, state),
        }
    }

    /// The map key for a coordinate.
    pub fn key(x: u32, y: u32) -> String {
        format!("{x},{y}")
    }

    /// Inverse of [`PixelData::key`].
    pub fn parse_key(key: &str) -> Result<(u32, u32), PixelError> {
        let invalid = || PixelError::InvalidCoordinate {
            key: key.to_string(),
        };
        let (x, y) = key.split_once(',').ok_or_else(invalid)?;
        let x = x.parse().map_err(|_| invalid())?;
        let y = y.parse().map_err(|_| invalid())?;
        Ok((x, y))
    }

    pub fn replica(&self) -> &ReplicaId {
        self.data.replica()
    }

    /// The underlying keyed map.
    pub fn map(&self) -> &Map<Rgb> {
        &self.data
    }

    /// All painted pixels by key.
    pub fn value(&self) -> BTreeMap<String, Rgb> {
        self.data.value()
    }

    /// Full exportable state, erased pixels included.
    pub fn state(&self) -> MapState<Rgb> {
        self.data.state()
    }

    pub fn set(&mut self, x: u32, y: u32, color: Rgb) {
        self.data.set(Self::key(x, y), color);
    }

    /// Color at a coordinate, white if unpainted or erased.
    pub fn get(&self, x: u32, y: u32) -> Rgb {
        self.data
            .get(&Self::key(x, y))
            .copied()
            .unwrap_or(Rgb::WHITE)
    }

    /// Returns true if the pixel has been painted and not erased.
    pub fn has(&self, x: u32, y: u32) -> bool {
        self.data.has(&Self::key(x, y))
    }

    pub fn delete(&mut self, x: u32, y: u32) {
        self.data.delete(&Self::key(x, y));
    }

    /// Merge a remote canvas state; returns the number of changed pixels.
    pub fn merge(&mut self, remote: &MapState<Rgb>) -> usize {
        self.data.merge(remote)
    }

    /// Painted pixels as `((x, y), color)`, sorted by coordinate.
    ///
    /// Keys received from peers that are not valid coordinates are skipped.
    pub fn pixels(&self) -> Vec<((u32, u32), Rgb)> {
        let mut pixels: Vec<_> = self
            .data
            .iter()
            .filter_map(|(key, color)| match Self::parse_key(key) {
                Ok(coord) => Some((coord, *color)),
                Err(e) => {
                    warn!(key, "Skipping pixel with unparseable key: {e}");
                    None
                }
            })
            .collect();
        pixels.sort_unstable_by_key(|(coord, _)| *coord);
        pixels
    }
}

impl CRDT for PixelData {
    type Value = BTreeMap<String, Rgb>;
    type State = MapState<Rgb>;

    fn value(&self) -> Self::Value {
        PixelData::value(self)
    }

    fn state(&self) -> Self::State {
        self.data.state()
    }

    fn merge(&mut self, remote: &Self::State) -> bool {
        self.data.merge(remote) > 0
    }
}
