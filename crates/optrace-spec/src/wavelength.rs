//! Wavelength set with a reference wavelength.

use optrace_material::SpectralLine;
use serde::{Deserialize, Serialize};

use crate::error::{check_index, Result, SpecError};

/// One wavelength.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wvl {
    /// Vacuum wavelength in nanometers.
    pub value: f64,
    /// Relative weight in polychromatic analyses.
    #[serde(default = "unit_weight")]
    pub weight: f64,
    /// Color tag for plotting collaborators, e.g. `#0000ff`.
    #[serde(default)]
    pub render_tag: String,
}

fn unit_weight() -> f64 {
    1.0
}

impl Wvl {
    /// Wavelength with unit weight and no tag.
    pub fn new(value: f64) -> Self {
        Self {
            value,
            weight: 1.0,
            render_tag: String::new(),
        }
    }

    /// Wavelength of a spectral line, tagged with its symbol.
    pub fn line(line: SpectralLine) -> Self {
        Self {
            value: line.wavelength(),
            weight: 1.0,
            render_tag: line.symbol().to_string(),
        }
    }
}

/// The wavelengths analysed, one of which is the reference.
///
/// Deserialization goes through [`WvlSpec::new`], so a stored reference
/// index is always in range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "WvlSpecRecord")]
pub struct WvlSpec {
    wavelengths: Vec<Wvl>,
    reference_index: usize,
}

#[derive(Deserialize)]
struct WvlSpecRecord {
    wavelengths: Vec<Wvl>,
    #[serde(default)]
    reference_index: usize,
}

impl TryFrom<WvlSpecRecord> for WvlSpec {
    type Error = SpecError;

    fn try_from(record: WvlSpecRecord) -> Result<Self> {
        Self::new(record.wavelengths, record.reference_index)
    }
}

impl Default for WvlSpec {
    /// The d line alone.
    fn default() -> Self {
        Self {
            wavelengths: vec![Wvl::line(SpectralLine::D)],
            reference_index: 0,
        }
    }
}

impl WvlSpec {
    /// Build from a non-empty list and a reference index into it.
    pub fn new(wavelengths: Vec<Wvl>, reference_index: usize) -> Result<Self> {
        if wavelengths.is_empty() {
            return Err(SpecError::Empty("wavelengths"));
        }
        check_index("wavelengths", reference_index, wavelengths.len())?;
        Ok(Self {
            wavelengths,
            reference_index,
        })
    }

    /// The visible F, d, C triplet with d as reference.
    pub fn visible() -> Self {
        Self {
            wavelengths: vec![
                Wvl::line(SpectralLine::F),
                Wvl::line(SpectralLine::D),
                Wvl::line(SpectralLine::C),
            ],
            reference_index: 1,
        }
    }

    /// Number of wavelengths.
    pub fn len(&self) -> usize {
        self.wavelengths.len()
    }

    /// Always false; a spec keeps at least one wavelength.
    pub fn is_empty(&self) -> bool {
        self.wavelengths.is_empty()
    }

    /// All wavelengths.
    pub fn wavelengths(&self) -> &[Wvl] {
        &self.wavelengths
    }

    /// Wavelength `index` in nanometers.
    pub fn value(&self, index: usize) -> Result<f64> {
        check_index("wavelengths", index, self.wavelengths.len())?;
        Ok(self.wavelengths[index].value)
    }

    /// Index of the reference wavelength.
    pub fn reference_index(&self) -> usize {
        self.reference_index
    }

    /// Reference wavelength in nanometers.
    pub fn reference_wvl(&self) -> f64 {
        self.wavelengths[self.reference_index].value
    }

    /// Choose another reference wavelength.
    pub fn set_reference(&mut self, index: usize) -> Result<()> {
        check_index("wavelengths", index, self.wavelengths.len())?;
        self.reference_index = index;
        Ok(())
    }

    /// Append a wavelength.
    pub fn push(&mut self, wvl: Wvl) {
        self.wavelengths.push(wvl);
    }

    /// Remove wavelength `index`, keeping the reference on the same entry
    /// where possible.
    pub fn remove(&mut self, index: usize) -> Result<Wvl> {
        check_index("wavelengths", index, self.wavelengths.len())?;
        if self.wavelengths.len() == 1 {
            return Err(SpecError::Empty("wavelengths"));
        }
        let removed = self.wavelengths.remove(index);
        if index < self.reference_index || self.reference_index == self.wavelengths.len() {
            self.reference_index -= 1;
        }
        Ok(removed)
    }
}
