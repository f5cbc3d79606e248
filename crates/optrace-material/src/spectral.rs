//! Fraunhofer spectral lines used as reference wavelengths.

use serde::{Deserialize, Serialize};

/// A named spectral line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpectralLine {
    /// Mercury infrared line `t`.
    T,
    /// Cesium line `s`.
    S,
    /// Helium red line `r`.
    R,
    /// Hydrogen red line `C`.
    C,
    /// Cadmium red line `C'`.
    CPrime,
    /// Sodium line `D`.
    SodiumD,
    /// Helium yellow line `d`, the usual reference wavelength.
    D,
    /// Mercury green line `e`.
    E,
    /// Hydrogen blue line `F`.
    F,
    /// Cadmium blue line `F'`.
    FPrime,
    /// Mercury blue line `g`.
    G,
    /// Mercury violet line `h`.
    H,
    /// Mercury ultraviolet line `i`.
    I,
}

impl SpectralLine {
    /// Every line, longest wavelength first.
    pub const ALL: [SpectralLine; 13] = [
        Self::T,
        Self::S,
        Self::R,
        Self::C,
        Self::CPrime,
        Self::SodiumD,
        Self::D,
        Self::E,
        Self::F,
        Self::FPrime,
        Self::G,
        Self::H,
        Self::I,
    ];

    /// Vacuum wavelength in nanometers.
    pub fn wavelength(self) -> f64 {
        match self {
            Self::T => 1013.98,
            Self::S => 852.11,
            Self::R => 706.519,
            Self::C => 656.273,
            Self::CPrime => 643.847,
            Self::SodiumD => 589.294,
            Self::D => 587.562,
            Self::E => 546.074,
            Self::F => 486.133,
            Self::FPrime => 479.991,
            Self::G => 435.834,
            Self::H => 404.656,
            Self::I => 365.015,
        }
    }

    /// Conventional one-letter symbol (`"d"`, `"F'"`, ...).
    pub fn symbol(self) -> &'static str {
        match self {
            Self::T => "t",
            Self::S => "s",
            Self::R => "r",
            Self::C => "C",
            Self::CPrime => "C'",
            Self::SodiumD => "D",
            Self::D => "d",
            Self::E => "e",
            Self::F => "F",
            Self::FPrime => "F'",
            Self::G => "g",
            Self::H => "h",
            Self::I => "i",
        }
    }

    /// Look a line up by its symbol. Case matters: `"d"` and `"D"` differ.
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|line| line.symbol() == symbol)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_lookup() {
        assert_eq!(SpectralLine::from_symbol("d"), Some(SpectralLine::D));
        assert_eq!(SpectralLine::from_symbol("D"), Some(SpectralLine::SodiumD));
        assert_eq!(SpectralLine::from_symbol("F'"), Some(SpectralLine::FPrime));
        assert_eq!(SpectralLine::from_symbol("x"), None);
    }

    #[test]
    fn test_lines_sorted() {
        for pair in SpectralLine::ALL.windows(2) {
            assert!(pair[0].wavelength() > pair[1].wavelength());
        }
    }
}
