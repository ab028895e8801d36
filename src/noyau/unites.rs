// src/noyau/unites.rs
//
// Registre des unités (lecture seule, chargé une fois).
// Chaque symbole -> (dimension, échelle vers la base CGS canonique).
//
// Règles:
// - Symbole exact d’abord (table).
// - Sinon suffixe de puissance entier : "cm3" = cm^3, "K4" = K^4.
// - "pc2", "au3" : radical pris parmi les constantes, voir eval.rs.
// - Les unités composées (g / (K4 s3)) passent par Unite::combiner / puissance.

use std::collections::HashMap;
use std::f64::consts::PI;

use num_rational::Rational32;
use num_traits::{CheckedAdd, CheckedMul, Zero};
use once_cell::sync::Lazy;

use super::dimension::{Dimension, NB_BASES};
use super::erreur::{Erreur, Res};
use super::format::formater_termes;

/// Coulomb -> statcoulomb (c en cm/s / 10).
pub const COULOMB_EN_STATC: f64 = 2.997_924_58e9;

/// Unité : symboles (avec exposants) + dimension + échelle vers la base CGS.
#[derive(Clone, Debug, PartialEq)]
pub struct Unite {
    termes: Vec<(String, Rational32)>,
    dim: Dimension,
    echelle: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OpUnite {
    Mul,
    Div,
}

pub(crate) fn exposant_f64(r: Rational32) -> f64 {
    *r.numer() as f64 / *r.denom() as f64
}

pub(crate) fn puissance_f64(x: f64, r: Rational32) -> f64 {
    if *r.denom() == 1 {
        x.powi(*r.numer())
    } else {
        x.powf(exposant_f64(r))
    }
}

impl Unite {
    /// Unité vide (nombre pur).
    pub fn sans_dimension() -> Self {
        Self {
            termes: Vec::new(),
            dim: Dimension::SANS,
            echelle: 1.0,
        }
    }

    /// Unité atomique nommée. `echelle` doit être > 0.
    pub fn nommee(symbole: &str, dim: Dimension, echelle: f64) -> Self {
        debug_assert!(echelle > 0.0, "échelle d’unité non positive: {symbole}");
        Self {
            termes: vec![(symbole.to_string(), Rational32::from_integer(1))],
            dim,
            echelle,
        }
    }

    /// Unité déjà décomposée (profils CGS / SI).
    pub(crate) fn depuis_termes(termes: Vec<(String, Rational32)>, dim: Dimension, echelle: f64) -> Self {
        Self {
            termes,
            dim,
            echelle,
        }
    }

    pub fn dim(&self) -> Dimension {
        self.dim
    }

    pub fn echelle(&self) -> f64 {
        self.echelle
    }

    pub fn termes(&self) -> &[(String, Rational32)] {
        &self.termes
    }

    /// Symbole lisible (ex: "km / s", "g / (K4 s3)").
    pub fn symbole(&self) -> String {
        formater_termes(&self.termes)
    }

    /// Produit ou quotient de deux unités (dimensions, échelles et symboles).
    pub fn combiner(&self, autre: &Unite, op: OpUnite) -> Res<Unite> {
        let (dim, echelle) = match op {
            OpUnite::Mul => (self.dim.produit(&autre.dim)?, self.echelle * autre.echelle),
            OpUnite::Div => (self.dim.quotient(&autre.dim)?, self.echelle / autre.echelle),
        };

        let mut termes = self.termes.clone();
        for (sym, e) in &autre.termes {
            let e = match op {
                OpUnite::Mul => *e,
                OpUnite::Div => -*e,
            };
            match termes.iter_mut().find(|(s, _)| s == sym) {
                Some((_, cumul)) => {
                    *cumul = cumul
                        .checked_add(&e)
                        .ok_or_else(|| Erreur::non_supportee("exposant d’unité hors bornes"))?;
                }
                None => termes.push((sym.clone(), e)),
            }
        }
        termes.retain(|(_, e)| !e.is_zero());
        // ordre canonique : "J s" et "s J" donnent le même symbole
        termes.sort_by(|a, b| a.0.cmp(&b.0));

        Ok(Unite {
            termes,
            dim,
            echelle,
        })
    }

    /// Unité élevée à une puissance rationnelle.
    pub fn puissance(&self, r: Rational32) -> Res<Unite> {
        let dim = self.dim.puissance(r)?;
        let mut termes = Vec::with_capacity(self.termes.len());
        for (sym, e) in &self.termes {
            let e = e
                .checked_mul(&r)
                .ok_or_else(|| Erreur::non_supportee("exposant d’unité hors bornes"))?;
            if !e.is_zero() {
                termes.push((sym.clone(), e));
            }
        }
        Ok(Unite {
            termes,
            dim,
            echelle: puissance_f64(self.echelle, r),
        })
    }
}

/* ------------------------ Table ------------------------ */

// Ordre des exposants : [L, M, T, Θ, Q, angle, mol, cd]
const LONGUEUR: [i32; NB_BASES] = [1, 0, 0, 0, 0, 0, 0, 0];
const MASSE: [i32; NB_BASES] = [0, 1, 0, 0, 0, 0, 0, 0];
const TEMPS: [i32; NB_BASES] = [0, 0, 1, 0, 0, 0, 0, 0];
const TEMPERATURE: [i32; NB_BASES] = [0, 0, 0, 1, 0, 0, 0, 0];
const CHARGE: [i32; NB_BASES] = [0, 0, 0, 0, 1, 0, 0, 0];
const ANGLE: [i32; NB_BASES] = [0, 0, 0, 0, 0, 1, 0, 0];
const ANGLE_SOLIDE: [i32; NB_BASES] = [0, 0, 0, 0, 0, 2, 0, 0];
const QUANTITE: [i32; NB_BASES] = [0, 0, 0, 0, 0, 0, 1, 0];
const INTENSITE: [i32; NB_BASES] = [0, 0, 0, 0, 0, 0, 0, 1];
const ENERGIE: [i32; NB_BASES] = [2, 1, -2, 0, 0, 0, 0, 0];
const PUISSANCE: [i32; NB_BASES] = [2, 1, -3, 0, 0, 0, 0, 0];
const FORCE: [i32; NB_BASES] = [1, 1, -2, 0, 0, 0, 0, 0];
const PRESSION: [i32; NB_BASES] = [-1, 1, -2, 0, 0, 0, 0, 0];
const FREQUENCE: [i32; NB_BASES] = [0, 0, -1, 0, 0, 0, 0, 0];
const DENSITE: [i32; NB_BASES] = [-3, 1, 0, 0, 0, 0, 0, 0];
const FLUX_SPECTRAL: [i32; NB_BASES] = [0, 1, -2, 0, 0, 0, 0, 0];
const COURANT: [i32; NB_BASES] = [0, 0, -1, 0, 1, 0, 0, 0];
const TENSION: [i32; NB_BASES] = [2, 1, -2, 0, -1, 0, 0, 0];
const CHAMP_B: [i32; NB_BASES] = [0, 1, -1, 0, -1, 0, 0, 0];
const CAPACITE: [i32; NB_BASES] = [-2, -1, 2, 0, 2, 0, 0, 0];

const ANNEE_JULIENNE: f64 = 3.155_76e7;
const TESLA: f64 = 1e3 / COULOMB_EN_STATC;

/// (symbole, dimension, échelle vers CGS)
const TABLE: &[(&str, [i32; NB_BASES], f64)] = &[
    // Longueur
    ("m", LONGUEUR, 1e2),
    ("cm", LONGUEUR, 1.0),
    ("mm", LONGUEUR, 1e-1),
    ("um", LONGUEUR, 1e-4),
    ("nm", LONGUEUR, 1e-7),
    ("Angstrom", LONGUEUR, 1e-8),
    ("Ang", LONGUEUR, 1e-8),
    ("km", LONGUEUR, 1e5),
    ("AU", LONGUEUR, 1.495_978_707e13),
    ("lyr", LONGUEUR, 9.460_730_472_580_8e17),
    ("Mpc", LONGUEUR, 3.085_677_581_491_367_3e24),
    ("Gpc", LONGUEUR, 3.085_677_581_491_367_3e27),
    // Masse
    ("kg", MASSE, 1e3),
    ("g", MASSE, 1.0),
    ("mg", MASSE, 1e-3),
    ("Msun", MASSE, 1.988_409_87e33),
    // Temps
    ("s", TEMPS, 1.0),
    ("ms", TEMPS, 1e-3),
    ("us", TEMPS, 1e-6),
    ("ns", TEMPS, 1e-9),
    ("min", TEMPS, 60.0),
    ("hr", TEMPS, 3600.0),
    ("day", TEMPS, 86400.0),
    ("yr", TEMPS, ANNEE_JULIENNE),
    ("Myr", TEMPS, ANNEE_JULIENNE * 1e6),
    ("Gyr", TEMPS, ANNEE_JULIENNE * 1e9),
    // Énergie
    ("J", ENERGIE, 1e7),
    ("erg", ENERGIE, 1.0),
    ("eV", ENERGIE, 1.602_176_634e-12),
    ("keV", ENERGIE, 1.602_176_634e-9),
    ("MeV", ENERGIE, 1.602_176_634e-6),
    ("GeV", ENERGIE, 1.602_176_634e-3),
    // Puissance
    ("W", PUISSANCE, 1e7),
    ("Lsun", PUISSANCE, 3.828e33),
    // Force / pression
    ("N", FORCE, 1e5),
    ("dyn", FORCE, 1.0),
    ("Pa", PRESSION, 10.0),
    ("Ba", PRESSION, 1.0),
    ("bar", PRESSION, 1e6),
    ("mbar", PRESSION, 1e3),
    // Fréquence
    ("Hz", FREQUENCE, 1.0),
    ("kHz", FREQUENCE, 1e3),
    ("MHz", FREQUENCE, 1e6),
    ("GHz", FREQUENCE, 1e9),
    // Température
    ("K", TEMPERATURE, 1.0),
    // Angles
    ("rad", ANGLE, 1.0),
    ("radian", ANGLE, 1.0),
    ("deg", ANGLE, PI / 180.0),
    ("degree", ANGLE, PI / 180.0),
    ("arcmin", ANGLE, PI / 10_800.0),
    ("arcsec", ANGLE, PI / 648_000.0),
    ("mas", ANGLE, PI / 648_000_000.0),
    ("sr", ANGLE_SOLIDE, 1.0),
    // Astronomie
    ("mpcc", DENSITE, 1.672_621_923_69e-24),
    ("Jy", FLUX_SPECTRAL, 1e-23),
    ("mJy", FLUX_SPECTRAL, 1e-26),
    ("MJy", FLUX_SPECTRAL, 1e-17),
    // Électromagnétisme (base de charge : statC)
    ("C", CHARGE, COULOMB_EN_STATC),
    ("statC", CHARGE, 1.0),
    ("esu", CHARGE, 1.0),
    ("A", COURANT, COULOMB_EN_STATC),
    ("V", TENSION, 1e7 / COULOMB_EN_STATC),
    ("T", CHAMP_B, TESLA),
    ("Gauss", CHAMP_B, TESLA * 1e-4),
    ("F", CAPACITE, COULOMB_EN_STATC * COULOMB_EN_STATC / 1e7),
    // Quantité de matière / intensité lumineuse
    ("mol", QUANTITE, 1.0),
    ("cd", INTENSITE, 1.0),
];

static UNITES: Lazy<HashMap<&'static str, (Dimension, f64)>> = Lazy::new(|| {
    TABLE
        .iter()
        .map(|(sym, exps, echelle)| (*sym, (Dimension::entiers(*exps), *echelle)))
        .collect()
});

fn chercher_atome(symbole: &str) -> Option<Unite> {
    UNITES
        .get(symbole)
        .map(|(dim, echelle)| Unite::nommee(symbole, *dim, *echelle))
}

/// Cherche une unité par symbole (exact, puis suffixe de puissance).
pub fn chercher(symbole: &str) -> Option<Unite> {
    if let Some(u) = chercher_atome(symbole) {
        return Some(u);
    }

    let (radical, n) = decouper_suffixe(symbole)?;
    chercher_atome(radical)?
        .puissance(Rational32::from_integer(n))
        .ok()
}

/// Suffixe de puissance : "cm3" -> ("cm", 3), "pc2" -> ("pc", 2). Jamais d’exposant nul.
pub(crate) fn decouper_suffixe(symbole: &str) -> Option<(&str, i32)> {
    let radical = symbole.trim_end_matches(|c: char| c.is_ascii_digit());
    if radical.is_empty() || radical.len() == symbole.len() {
        return None;
    }
    let n: i32 = symbole[radical.len()..].parse().ok()?;
    (n != 0).then_some((radical, n))
}

/// Symboles de la table, triés (aide des frontaux).
pub fn symboles_connus() -> Vec<&'static str> {
    let mut v: Vec<&'static str> = TABLE.iter().map(|(s, _, _)| *s).collect();
    v.sort_by_key(|s| s.to_lowercase());
    v
}
