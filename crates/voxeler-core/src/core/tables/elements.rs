//! Static element properties keyed by uppercased symbol.
//!
//! Grid cells store one byte per voxel: 0 for empty space, the atomic number
//! for an occupied cell, and two reserved codes above the periodic table for
//! generic metals and water candidates. Van der Waals radii follow Bondi's
//! compilation; elements without a published value fall back to 2.0 Angstroms.

use phf::{phf_map, phf_set};

/// Cell code for a metallic atom whose element could not be resolved.
pub const META_CODE: u8 = 110;
/// Cell code for a water candidate or placed water oxygen.
pub const WATER_CODE: u8 = 111;
/// Number of distinct cell codes (0 through [`WATER_CODE`]).
pub const CODE_COUNT: usize = 112;

/// Van der Waals radius assigned to elements without a tabulated value.
pub const DEFAULT_VDW_RADIUS: f64 = 2.0;
/// Van der Waals radius of a water oxygen, used for placed waters.
pub const WATER_VDW_RADIUS: f64 = 1.52;

/// Static properties of one chemical element.
pub struct Element {
    /// Atomic number, doubling as the grid cell code.
    pub number: u8,
    /// Standard atomic mass in Daltons.
    pub mass: f64,
    /// Van der Waals radius in Angstroms.
    pub vdw: f64,
}

static ELEMENTS: phf::Map<&'static str, Element> = phf_map! {
    "H" => Element { number: 1, mass: 1.008, vdw: 1.20 },
    "HE" => Element { number: 2, mass: 4.003, vdw: 1.40 },
    "LI" => Element { number: 3, mass: 6.941, vdw: 1.82 },
    "BE" => Element { number: 4, mass: 9.012, vdw: 2.0 },
    "B" => Element { number: 5, mass: 10.811, vdw: 2.0 },
    "C" => Element { number: 6, mass: 12.011, vdw: 1.70 },
    "N" => Element { number: 7, mass: 14.007, vdw: 1.55 },
    "O" => Element { number: 8, mass: 15.999, vdw: 1.52 },
    "F" => Element { number: 9, mass: 18.998, vdw: 1.47 },
    "NE" => Element { number: 10, mass: 20.180, vdw: 1.54 },
    "NA" => Element { number: 11, mass: 22.990, vdw: 2.27 },
    "MG" => Element { number: 12, mass: 24.305, vdw: 1.73 },
    "AL" => Element { number: 13, mass: 26.982, vdw: 2.0 },
    "SI" => Element { number: 14, mass: 28.086, vdw: 2.10 },
    "P" => Element { number: 15, mass: 30.974, vdw: 1.80 },
    "S" => Element { number: 16, mass: 32.065, vdw: 1.80 },
    "CL" => Element { number: 17, mass: 35.453, vdw: 1.75 },
    "AR" => Element { number: 18, mass: 39.948, vdw: 1.88 },
    "K" => Element { number: 19, mass: 39.098, vdw: 2.75 },
    "CA" => Element { number: 20, mass: 40.078, vdw: 2.0 },
    "SC" => Element { number: 21, mass: 44.956, vdw: 2.0 },
    "TI" => Element { number: 22, mass: 47.867, vdw: 2.0 },
    "V" => Element { number: 23, mass: 50.942, vdw: 2.0 },
    "CR" => Element { number: 24, mass: 51.996, vdw: 2.0 },
    "MN" => Element { number: 25, mass: 54.938, vdw: 2.0 },
    "FE" => Element { number: 26, mass: 55.845, vdw: 2.0 },
    "CO" => Element { number: 27, mass: 58.933, vdw: 2.0 },
    "NI" => Element { number: 28, mass: 58.693, vdw: 1.63 },
    "CU" => Element { number: 29, mass: 63.546, vdw: 1.40 },
    "ZN" => Element { number: 30, mass: 65.38, vdw: 1.39 },
    "GA" => Element { number: 31, mass: 69.723, vdw: 1.87 },
    "GE" => Element { number: 32, mass: 72.63, vdw: 2.0 },
    "AS" => Element { number: 33, mass: 74.922, vdw: 1.85 },
    "SE" => Element { number: 34, mass: 78.971, vdw: 1.90 },
    "BR" => Element { number: 35, mass: 79.904, vdw: 1.85 },
    "KR" => Element { number: 36, mass: 83.798, vdw: 2.02 },
    "RB" => Element { number: 37, mass: 85.468, vdw: 2.0 },
    "SR" => Element { number: 38, mass: 87.62, vdw: 2.0 },
    "Y" => Element { number: 39, mass: 88.906, vdw: 2.0 },
    "ZR" => Element { number: 40, mass: 91.224, vdw: 2.0 },
    "NB" => Element { number: 41, mass: 92.906, vdw: 2.0 },
    "MO" => Element { number: 42, mass: 95.95, vdw: 2.0 },
    "TC" => Element { number: 43, mass: 98.0, vdw: 2.0 },
    "RU" => Element { number: 44, mass: 101.07, vdw: 2.0 },
    "RH" => Element { number: 45, mass: 102.906, vdw: 2.0 },
    "PD" => Element { number: 46, mass: 106.42, vdw: 1.63 },
    "AG" => Element { number: 47, mass: 107.868, vdw: 1.72 },
    "CD" => Element { number: 48, mass: 112.414, vdw: 1.58 },
    "IN" => Element { number: 49, mass: 114.818, vdw: 1.93 },
    "SN" => Element { number: 50, mass: 118.710, vdw: 2.17 },
    "SB" => Element { number: 51, mass: 121.760, vdw: 2.0 },
    "TE" => Element { number: 52, mass: 127.60, vdw: 2.06 },
    "I" => Element { number: 53, mass: 126.904, vdw: 1.98 },
    "XE" => Element { number: 54, mass: 131.293, vdw: 2.16 },
    "CS" => Element { number: 55, mass: 132.905, vdw: 2.0 },
    "BA" => Element { number: 56, mass: 137.327, vdw: 2.0 },
    "LA" => Element { number: 57, mass: 138.905, vdw: 2.0 },
    "CE" => Element { number: 58, mass: 140.116, vdw: 2.0 },
    "PR" => Element { number: 59, mass: 140.908, vdw: 2.0 },
    "ND" => Element { number: 60, mass: 144.242, vdw: 2.0 },
    "PM" => Element { number: 61, mass: 145.0, vdw: 2.0 },
    "SM" => Element { number: 62, mass: 150.36, vdw: 2.0 },
    "EU" => Element { number: 63, mass: 151.964, vdw: 2.0 },
    "GD" => Element { number: 64, mass: 157.25, vdw: 2.0 },
    "TB" => Element { number: 65, mass: 158.925, vdw: 2.0 },
    "DY" => Element { number: 66, mass: 162.500, vdw: 2.0 },
    "HO" => Element { number: 67, mass: 164.930, vdw: 2.0 },
    "ER" => Element { number: 68, mass: 167.259, vdw: 2.0 },
    "TM" => Element { number: 69, mass: 168.934, vdw: 2.0 },
    "YB" => Element { number: 70, mass: 173.045, vdw: 2.0 },
    "LU" => Element { number: 71, mass: 174.967, vdw: 2.0 },
    "HF" => Element { number: 72, mass: 178.49, vdw: 2.0 },
    "TA" => Element { number: 73, mass: 180.948, vdw: 2.0 },
    "W" => Element { number: 74, mass: 183.84, vdw: 2.0 },
    "RE" => Element { number: 75, mass: 186.207, vdw: 2.0 },
    "OS" => Element { number: 76, mass: 190.23, vdw: 2.0 },
    "IR" => Element { number: 77, mass: 192.217, vdw: 2.0 },
    "PT" => Element { number: 78, mass: 195.084, vdw: 1.75 },
    "AU" => Element { number: 79, mass: 196.967, vdw: 1.66 },
    "HG" => Element { number: 80, mass: 200.592, vdw: 1.55 },
    "TL" => Element { number: 81, mass: 204.38, vdw: 1.96 },
    "PB" => Element { number: 82, mass: 207.2, vdw: 2.02 },
    "BI" => Element { number: 83, mass: 208.980, vdw: 2.0 },
    "PO" => Element { number: 84, mass: 209.0, vdw: 2.0 },
    "AT" => Element { number: 85, mass: 210.0, vdw: 2.0 },
    "RN" => Element { number: 86, mass: 222.0, vdw: 2.0 },
    "FR" => Element { number: 87, mass: 223.0, vdw: 2.0 },
    "RA" => Element { number: 88, mass: 226.0, vdw: 2.0 },
    "AC" => Element { number: 89, mass: 227.0, vdw: 2.0 },
    "TH" => Element { number: 90, mass: 232.038, vdw: 2.0 },
    "PA" => Element { number: 91, mass: 231.036, vdw: 2.0 },
    "U" => Element { number: 92, mass: 238.029, vdw: 1.86 },
    "NP" => Element { number: 93, mass: 237.0, vdw: 2.0 },
    "PU" => Element { number: 94, mass: 244.0, vdw: 2.0 },
    "AM" => Element { number: 95, mass: 243.0, vdw: 2.0 },
    "CM" => Element { number: 96, mass: 247.0, vdw: 2.0 },
    "BK" => Element { number: 97, mass: 247.0, vdw: 2.0 },
    "CF" => Element { number: 98, mass: 251.0, vdw: 2.0 },
    "ES" => Element { number: 99, mass: 252.0, vdw: 2.0 },
    "FM" => Element { number: 100, mass: 257.0, vdw: 2.0 },
    "MD" => Element { number: 101, mass: 258.0, vdw: 2.0 },
    "NO" => Element { number: 102, mass: 259.0, vdw: 2.0 },
    "LR" => Element { number: 103, mass: 262.0, vdw: 2.0 },
    "RF" => Element { number: 104, mass: 267.0, vdw: 2.0 },
    "DB" => Element { number: 105, mass: 268.0, vdw: 2.0 },
    "SG" => Element { number: 106, mass: 271.0, vdw: 2.0 },
    "BH" => Element { number: 107, mass: 272.0, vdw: 2.0 },
    "HS" => Element { number: 108, mass: 270.0, vdw: 2.0 },
    "MT" => Element { number: 109, mass: 276.0, vdw: 2.0 },
};

static METALS: phf::Set<&'static str> = phf_set! {
    "LI", "BE", "NA", "MG", "AL", "K", "CA", "SC", "TI", "V", "CR", "MN",
    "FE", "CO", "NI", "CU", "ZN", "GA", "GE", "RB", "SR", "Y", "ZR", "NB",
    "MO", "TC", "RU", "RH", "PD", "AG", "CD", "IN", "SN", "SB", "CS", "BA",
    "LA", "HF", "TA", "W", "RE", "OS", "IR", "PT", "AU", "HG", "TL", "PB",
    "BI", "PO", "FR", "RA", "AC", "RF", "DB", "SG", "CE", "PR", "ND", "PM",
    "SM", "EU", "GD", "TB", "DY", "HO", "ER", "TM", "YB", "LU", "TH", "PA",
    "U", "NP", "PU", "AM", "CM", "BK", "CF", "ES", "FM", "MD", "NO", "LR",
};

/// Returns the grid cell code of an element symbol.
///
/// Known elements map to their atomic number; the reserved names `META` and
/// `OOW` map to their cell codes above the periodic table.
pub fn code_of(symbol: &str) -> Option<u8> {
    match symbol {
        "META" => Some(META_CODE),
        "OOW" => Some(WATER_CODE),
        _ => ELEMENTS.get(symbol).map(|e| e.number),
    }
}

/// Returns the element symbol for a grid cell code.
pub fn symbol_of(code: u8) -> Option<&'static str> {
    match code {
        META_CODE => Some("META"),
        WATER_CODE => Some("OOW"),
        _ => ELEMENTS
            .entries()
            .find(|(_, e)| e.number == code)
            .map(|(symbol, _)| *symbol),
    }
}

/// Returns the standard atomic mass of an element symbol, if known.
pub fn mass_of(symbol: &str) -> Option<f64> {
    ELEMENTS.get(symbol).map(|e| e.mass)
}

/// Returns the van der Waals radius of an element symbol in Angstroms.
///
/// The reserved water code uses the oxygen radius; anything else unknown gets
/// the default radius.
pub fn vdw_radius(symbol: &str) -> f64 {
    match symbol {
        "OOW" => WATER_VDW_RADIUS,
        _ => ELEMENTS.get(symbol).map_or(DEFAULT_VDW_RADIUS, |e| e.vdw),
    }
}

/// Returns the largest scaled radius over the whole element table, in voxels.
///
/// Grid padding is sized from this value so that a stamped sphere of any
/// element fits inside the grid bounds.
pub fn max_scaled_radius(spacing: f64) -> i32 {
    ELEMENTS
        .values()
        .map(|e| (e.vdw / spacing).round() as i32)
        .max()
        .unwrap_or(0)
}

/// Returns true if the symbol is a metallic element.
pub fn is_metal(symbol: &str) -> bool {
    METALS.contains(symbol)
}

/// Returns true if the symbol is a halogen.
pub fn is_halogen(symbol: &str) -> bool {
    matches!(symbol, "F" | "CL" | "BR" | "I")
}
