//! Fixed substitution tables used by [`sanitize`](super::sanitize).

/// Phonetic equivalent of an umlaut or ligature, e.g. `ä` -> `ae`.
pub fn umlaut(c: char) -> Option<&'static str> {
    let replacement = match c {
        '\u{e4}' => "ae",
        '\u{e6}' => "ae",
        '\u{fc}' => "ue",
        '\u{f6}' => "oe",
        '\u{df}' => "ss",
        '\u{c4}' => "Ae",
        '\u{c6}' => "Ae",
        '\u{dc}' => "Ue",
        '\u{d6}' => "Oe",
        '\u{153}' => "oe",
        '\u{276}' => "oe",
        _ => return None,
    };
    Some(replacement)
}

/// Transliterated name of a Greek letter, e.g. `π` -> `pi`.
pub fn greek(c: char) -> Option<&'static str> {
    let name = match c {
        'α' => "alpha",
        'β' => "beta",
        'γ' => "gamma",
        'δ' => "delta",
        'ε' => "epsilon",
        'ζ' => "zeta",
        'η' => "eta",
        'θ' => "theta",
        'ι' => "iota",
        'κ' => "kappa",
        'λ' => "lambda",
        'μ' => "mu",
        'ν' => "nu",
        'ξ' => "xi",
        'ο' => "omicron",
        'π' => "pi",
        'ρ' => "rho",
        'σ' => "sigma",
        'ς' => "fsigma",
        'τ' => "tau",
        'υ' => "upsilon",
        'φ' => "phi",
        'χ' => "chi",
        'ψ' => "psi",
        'ω' => "omega",
        'Α' => "Alpha",
        'Β' => "Beta",
        'Γ' => "Gamma",
        'Δ' => "Delta",
        'Ε' => "Epsilon",
        'Ζ' => "Zeta",
        'Η' => "Eta",
        'Θ' => "Theta",
        'Ι' => "Iota",
        'Κ' => "Kappa",
        'Λ' => "Lambda",
        'Μ' => "Mu",
        'Ν' => "Nu",
        'Ξ' => "Xi",
        'Ο' => "Omicron",
        'Π' => "Pi",
        'Ρ' => "Rho",
        'Σ' => "Sigma",
        'Τ' => "Tau",
        'Υ' => "Upsilon",
        'Φ' => "Phi",
        'Χ' => "Chi",
        'Ψ' => "Psi",
        'Ω' => "Omega",
        _ => return None,
    };
    Some(name)
}
