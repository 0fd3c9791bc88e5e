//! Integer slot weights and their pixel layout
//!
//! A split stores one positive weight per slot. Only the ratios matter:
//! slot `i` receives `round(w_i * total / Σw)` pixels (ties to even) and the
//! last slot absorbs whatever rounding left over, so sizes always sum to the
//! total exactly.

use serde::{Deserialize, Serialize};

use crate::error::StructuralError;

/// Weight base used when a split has not been laid out yet.
pub const UNLAID_BASE: u32 = 1000;

/// Weights above this are rescaled to keep arithmetic in range.
const RESCALE_THRESHOLD: u32 = 1 << 24;

/// Target maximum weight after a rescale.
const RESCALE_TARGET: f64 = 1_048_576.0;

/// Ordered, positive slot weights of a split.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SplitFractions(Vec<u32>);

impl SplitFractions {
    /// Creates fractions from raw weights. Zero weights become 1.
    #[must_use]
    pub fn new(weights: Vec<u32>) -> Self {
        Self(weights.into_iter().map(|w| w.max(1)).collect())
    }

    /// `count` slots of equal weight.
    #[must_use]
    pub fn equal(count: usize) -> Self {
        Self(vec![1; count])
    }

    /// Parses a whitespace or comma separated weight list such as `"1 2 1"`.
    ///
    /// # Errors
    ///
    /// Returns [`StructuralError::InvalidLayout`] for non-numeric or zero
    /// weights, or an empty list.
    pub fn parse(text: &str) -> Result<Self, StructuralError> {
        let weights = text
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|token| !token.is_empty())
            .map(|token| match token.parse::<u32>() {
                Ok(0) => Err(StructuralError::InvalidLayout(
                    "split weights must be positive".to_string(),
                )),
                Ok(weight) => Ok(weight),
                Err(e) => Err(StructuralError::InvalidLayout(format!(
                    "invalid split weight '{token}': {e}"
                ))),
            })
            .collect::<Result<Vec<_>, _>>()?;

        if weights.is_empty() {
            return Err(StructuralError::InvalidLayout(
                "split weight list is empty".to_string(),
            ));
        }
        Ok(Self(weights))
    }

    /// Weights in slot order.
    #[must_use]
    pub fn weights(&self) -> &[u32] {
        &self.0
    }

    /// Number of slots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if there are no slots.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Sum of all weights.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.0.iter().map(|&w| u64::from(w)).sum()
    }

    /// Pixel size of every slot for a split `total` pixels long.
    ///
    /// The result always sums to `total`. The last slot may be smaller than
    /// its share, or even negative when `total` is smaller than the number
    /// of slots.
    #[must_use]
    pub fn sizes_for(&self, total: i64) -> Vec<i64> {
        self.layout_infos(total)
            .into_iter()
            .map(|(_, size)| size)
            .collect()
    }

    /// Start offset of every slot, the running prefix sum of [`Self::sizes_for`].
    #[must_use]
    pub fn offsets_for(&self, total: i64) -> Vec<i64> {
        self.layout_infos(total)
            .into_iter()
            .map(|(offset, _)| offset)
            .collect()
    }

    /// `(offset, size)` of every slot.
    #[must_use]
    pub fn layout_infos(&self, total: i64) -> Vec<(i64, i64)> {
        let denominator = self.total();
        if self.0.is_empty() {
            return Vec::new();
        }

        let mut infos = Vec::with_capacity(self.0.len());
        let mut offset = 0_i64;
        for &weight in &self.0 {
            let size = if denominator == 0 {
                0
            } else {
                (f64::from(weight) * total as f64 / denominator as f64).round_ties_even() as i64
            };
            infos.push((offset, size));
            offset += size;
        }

        if let Some(last) = infos.last_mut() {
            last.1 += total - offset;
        }
        infos
    }

    /// Moves `pixel_delta` pixels from slot `index + 1` to slot `index`
    /// (a negative delta moves the other way).
    ///
    /// The delta is clipped so neither slot drops below `min_slot_pixels`.
    /// When the pair is too small to satisfy the minimum at all, nothing
    /// changes. Every slot's new weight is its current pixel size, so slots
    /// outside the pair keep their size exactly.
    ///
    /// Returns the delta that was actually applied.
    pub fn adjust(
        &mut self,
        index: usize,
        pixel_delta: i64,
        total: i64,
        min_slot_pixels: i64,
    ) -> i64 {
        if index + 1 >= self.0.len() {
            return 0;
        }

        let min = min_slot_pixels.max(1);
        let mut sizes = self.sizes_for(total);
        let mut delta = pixel_delta;

        if sizes[index] + delta < min {
            delta = -(sizes[index] - min);
        }
        if sizes[index + 1] - delta < min {
            delta = sizes[index + 1] - min;
        }
        // trapped, neither direction has room
        if sizes[index] + delta < min {
            return 0;
        }

        sizes[index] += delta;
        sizes[index + 1] -= delta;
        self.0 = sizes.into_iter().map(pixels_to_weight).collect();
        delta
    }

    /// Inserts a slot at `index` with an explicit weight.
    pub fn insert(&mut self, index: usize, weight: u32) {
        let index = index.min(self.0.len());
        self.0.insert(index, weight.max(1));
    }

    /// Removes the slot at `index`, returning its weight.
    pub fn remove(&mut self, index: usize) -> Option<u32> {
        (index < self.0.len()).then(|| self.0.remove(index))
    }

    /// Weight of the slot at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<u32> {
        self.0.get(index).copied()
    }

    /// Share of the whole held by slot `index`, in `0..=1`.
    #[must_use]
    pub fn share(&self, index: usize) -> f64 {
        let total = self.total();
        match self.0.get(index) {
            Some(&w) if total > 0 => f64::from(w) / total as f64,
            _ => 0.0,
        }
    }

    /// Builds a two-slot split where the inserted slot takes `fraction` of
    /// `extent` pixels. `leading` puts the inserted slot first.
    ///
    /// An extent below two pixels (not laid out yet) uses [`UNLAID_BASE`].
    #[must_use]
    pub fn two_way(extent: f64, fraction: f64, leading: bool) -> Self {
        let base = if extent >= 2.0 {
            pixels_to_weight(extent.round() as i64)
        } else {
            UNLAID_BASE
        };
        let inserted = (f64::from(base) * clamp_fraction(fraction)).round() as i64;
        let inserted = inserted.clamp(1, i64::from(base) - 1);
        let inserted = pixels_to_weight(inserted);
        let other = base - inserted;

        let mut fractions = if leading {
            Self(vec![inserted, other])
        } else {
            Self(vec![other, inserted])
        };
        fractions.reduce();
        fractions
    }

    /// Divides slot `index` in two, giving `fraction` of its weight to a new
    /// slot placed before it (`leading`) or after it.
    ///
    /// Returns the index of the new slot.
    pub fn split_slot(&mut self, index: usize, fraction: f64, leading: bool) -> usize {
        let Some(&weight) = self.0.get(index) else {
            return self.0.len();
        };
        // Divided in u64 and shrunk afterwards, so the slot being split
        // keeps at least UNLAID_BASE units whatever its neighbors weigh.
        let factor = u64::from(UNLAID_BASE.div_ceil(weight.max(1)).max(1));
        let mut scaled: Vec<u64> = self.0.iter().map(|&w| u64::from(w) * factor).collect();

        let weight = scaled[index].max(2);
        let inserted = (weight as f64 * clamp_fraction(fraction)).round() as u64;
        let inserted = inserted.clamp(1, weight - 1);
        scaled[index] = weight - inserted;

        let new_index = if leading { index } else { index + 1 };
        scaled.insert(new_index, inserted);
        self.0 = shrink_to_u32(scaled);
        self.reduce();
        new_index
    }

    /// Inserts a new slot at `index` that takes `fraction` of the whole,
    /// shrinking all existing slots proportionally.
    pub fn insert_share(&mut self, index: usize, fraction: f64) {
        let fraction = clamp_fraction(fraction);
        let total = self.total();
        if total == 0 {
            self.0.insert(0, 1);
            return;
        }
        if total < u64::from(UNLAID_BASE) {
            let factor = (u64::from(UNLAID_BASE).div_ceil(total)) as u32;
            self.scale(factor);
        }

        let total = self.total() as f64;
        let inserted = (total * fraction / (1.0 - fraction)).round().max(1.0);
        let inserted = pixels_to_weight(inserted.min(f64::from(u32::MAX)) as i64);
        let index = index.min(self.0.len());
        self.0.insert(index, inserted);
        self.reduce();
    }

    /// Replaces slot `index` with the slots of `inner`, keeping the outer
    /// share of that slot and the inner ratios.
    pub fn splice(&mut self, index: usize, inner: &Self) {
        let Some(&outer) = self.0.get(index) else {
            return;
        };
        let inner_total = inner.total().max(1);

        let mut merged: Vec<u64> = Vec::with_capacity(self.0.len() + inner.len());
        for (i, &w) in self.0.iter().enumerate() {
            if i == index {
                merged.extend(inner.0.iter().map(|&iw| u64::from(iw) * u64::from(outer)));
            } else {
                merged.push(u64::from(w) * inner_total);
            }
        }
        self.0 = shrink_to_u32(merged);
        self.reduce();
    }

    /// Divides every weight by their common divisor and rescales weights
    /// that have grown too large.
    pub fn reduce(&mut self) {
        let divisor = self.0.iter().copied().fold(0, gcd);
        if divisor > 1 {
            for w in &mut self.0 {
                *w /= divisor;
            }
        }

        let max = self.0.iter().copied().max().unwrap_or(0);
        if max > RESCALE_THRESHOLD {
            let factor = RESCALE_TARGET / f64::from(max);
            for w in &mut self.0 {
                *w = ((f64::from(*w) * factor).round() as u32).max(1);
            }
        }
    }

    fn scale(&mut self, factor: u32) {
        let scaled = self
            .0
            .iter()
            .map(|&w| u64::from(w) * u64::from(factor))
            .collect();
        self.0 = shrink_to_u32(scaled);
    }
}

fn clamp_fraction(fraction: f64) -> f64 {
    if fraction.is_nan() {
        return 0.5;
    }
    fraction.clamp(0.001, 0.999)
}

fn pixels_to_weight(pixels: i64) -> u32 {
    u32::try_from(pixels.max(1)).unwrap_or(u32::MAX)
}

fn shrink_to_u32(weights: Vec<u64>) -> Vec<u32> {
    let max = weights.iter().copied().max().unwrap_or(0);
    if max <= u64::from(RESCALE_THRESHOLD) {
        return weights.into_iter().map(|w| w.max(1) as u32).collect();
    }
    let factor = RESCALE_TARGET / max as f64;
    weights
        .into_iter()
        .map(|w| ((w as f64 * factor).round() as u32).max(1))
        .collect()
}

const fn gcd(a: u32, b: u32) -> u32 {
    let (mut a, mut b) = (a, b);
    while b != 0 {
        let t = a % b;
        a = b;
        b = t;
    }
    a
}
