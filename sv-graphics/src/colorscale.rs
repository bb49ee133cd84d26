use std::{borrow::Cow, collections::BTreeMap};

use egui::Color32;
use itertools::Itertools;
use tracing::trace;

use crate::EncodeError;

/// Qualitative "Alphabet" palette: 26 colors, enough for every chromosome label.
pub const ALPHABET: [Color32; 26] = [
    Color32::from_rgb(0xAA, 0x0D, 0xFE),
    Color32::from_rgb(0x32, 0x83, 0xFE),
    Color32::from_rgb(0x85, 0x66, 0x0D),
    Color32::from_rgb(0x78, 0x2A, 0xB6),
    Color32::from_rgb(0x56, 0x56, 0x56),
    Color32::from_rgb(0x1C, 0x83, 0x56),
    Color32::from_rgb(0x16, 0xFF, 0x32),
    Color32::from_rgb(0xF7, 0xE1, 0xA0),
    Color32::from_rgb(0xE2, 0xE2, 0xE2),
    Color32::from_rgb(0x1C, 0xBE, 0x4F),
    Color32::from_rgb(0xC4, 0x45, 0x1C),
    Color32::from_rgb(0xDE, 0xA0, 0xFD),
    Color32::from_rgb(0xFE, 0x00, 0xFA),
    Color32::from_rgb(0x32, 0x5A, 0x9B),
    Color32::from_rgb(0xFE, 0xAF, 0x16),
    Color32::from_rgb(0xF8, 0xA1, 0x9F),
    Color32::from_rgb(0x90, 0xAD, 0x1C),
    Color32::from_rgb(0xF6, 0x22, 0x2E),
    Color32::from_rgb(0x1C, 0xFF, 0xCE),
    Color32::from_rgb(0x2E, 0xD9, 0xFF),
    Color32::from_rgb(0xB1, 0x0D, 0xA1),
    Color32::from_rgb(0xC0, 0x75, 0xA6),
    Color32::from_rgb(0xFC, 0x1C, 0xBF),
    Color32::from_rgb(0xB0, 0x00, 0x68),
    Color32::from_rgb(0xFB, 0xE4, 0x26),
    Color32::from_rgb(0xFA, 0x00, 0x87),
];

/// A fixed, ordered list of distinct colors. The n-th band always gets the n-th color.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Palette(Cow<'static, [Color32]>);

impl Default for Palette {
    fn default() -> Self {
        Self(Cow::Borrowed(&ALPHABET))
    }
}

impl Palette {
    #[must_use]
    pub fn custom(colors: Vec<Color32>) -> Self {
        Self(Cow::Owned(colors))
    }

    #[must_use]
    pub fn colors(&self) -> &[Color32] {
        &self.0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// A hard-edged colorscale for a continuous color axis.
///
/// `[0, 1]` is split into one equal band per category. Each inner boundary
/// appears twice in the stop list, once closing the band below and once opening
/// the band above, so colors never blend.
#[derive(Clone, Debug, PartialEq)]
pub struct ColorScale<T> {
    categories: Vec<T>,
    stops: Vec<(f64, Color32)>,
}

impl<T> ColorScale<T> {
    /// `[position, color]` stops, starting at `0` and ending at `1`.
    #[must_use]
    pub fn stops(&self) -> &[(f64, Color32)] {
        &self.stops
    }

    /// The categories in band order.
    #[must_use]
    pub fn categories(&self) -> &[T] {
        &self.categories
    }

    /// Number of bands.
    #[must_use]
    pub fn len(&self) -> usize {
        self.categories.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Lower end of the color axis; band `i` (1-based) is centred on value `i`.
    #[must_use]
    pub const fn cmin(&self) -> f64 {
        0.5
    }

    #[must_use]
    pub fn cmax(&self) -> f64 {
        self.len() as f64 + 0.5
    }

    /// Color of a value on the color axis, flat within each band.
    /// Values beyond the axis are clamped.
    #[must_use]
    pub fn sample(&self, value: f64) -> Option<Color32> {
        if self.is_empty() || !value.is_finite() {
            return None;
        }
        let t = ((value - self.cmin()) / (self.cmax() - self.cmin())).clamp(0.0, 1.0);
        self.stops
            .iter()
            .rev()
            .find(|(position, _)| *position <= t)
            .map(|(_, color)| *color)
    }
}

impl<T: PartialEq> ColorScale<T> {
    /// Color-axis value of a category: its 1-based band index.
    #[must_use]
    pub fn value_of(&self, category: &T) -> Option<f64> {
        self.categories
            .iter()
            .position(|c| c == category)
            .map(|i| (i + 1) as f64)
    }

    #[must_use]
    pub fn color_of(&self, category: &T) -> Option<Color32> {
        self.value_of(category).and_then(|value| self.sample(value))
    }
}

/// Per-node color values together with the scale that renders them.
#[derive(Clone, Debug, PartialEq)]
pub struct ColorEncoding<T> {
    pub values: Vec<f64>,
    pub scale: ColorScale<T>,
}

/// Compile a discrete colorscale over the categories actually observed.
///
/// Categories are ordered naturally, so the result does not depend on the order
/// of `categories`. `values[i]` is the band index of `categories[i]`.
///
/// # Errors
///
/// [`EncodeError::PaletteExhausted`] when there are more distinct categories
/// than palette colors.
pub fn compile<T: Ord + Clone>(
    categories: &[T],
    palette: &Palette,
) -> Result<ColorEncoding<T>, EncodeError> {
    let distinct: Vec<T> = categories.iter().sorted().dedup().cloned().collect();
    let k = distinct.len();
    if k > palette.len() {
        return Err(EncodeError::PaletteExhausted {
            needed: k,
            available: palette.len(),
        });
    }

    let stops = if k == 0 {
        Vec::new()
    } else {
        // Boundaries 0, 1/k, .., 1, each doubled, minus the outermost copies.
        (0..=k)
            .map(|i| i as f64 / k as f64)
            .flat_map(|b| [b, b])
            .skip(1)
            .take(2 * k)
            .zip(palette.colors()[..k].iter().flat_map(|c| [*c, *c]))
            .collect()
    };
    trace!("Compiled {k} bands into {} stops", stops.len());

    let bands: BTreeMap<&T, usize> = distinct.iter().enumerate().map(|(i, c)| (c, i + 1)).collect();
    let values = categories.iter().map(|c| bands[c] as f64).collect();

    Ok(ColorEncoding {
        values,
        scale: ColorScale {
            categories: distinct,
            stops,
        },
    })
}
