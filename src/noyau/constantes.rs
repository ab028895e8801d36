// src/noyau/constantes.rs
//
// Registre des constantes physiques et astronomiques (lecture seule).
// Valeurs SI de référence (CODATA 2018, IAU 2015) ; la quantité utilisée
// dans les calculs est dérivée une fois, en base CGS.

use std::collections::HashMap;
use std::fmt;

use once_cell::sync::Lazy;

use super::conversion::{unite_depuis_texte, CGS};
use super::erreur::{Erreur, Res};
use super::eval::Portee;
use super::format::{formater_abrege, formater_repr};
use super::quantite::{symbole_lisible, Quantite};
use super::unites::Unite;

/// Chiffres de la ligne CGS d’une fiche de constante.
const CHIFFRES_FICHE_CGS: usize = 6;

#[derive(Debug)]
struct Entree {
    nom: &'static str,
    description: &'static str,
    valeur_si: f64,
    incertitude: f64,
    unite_si: &'static str,
    unite_cgs: &'static str,
    reference: &'static str,
}

const fn entree(
    nom: &'static str,
    description: &'static str,
    valeur_si: f64,
    incertitude: f64,
    unite_si: &'static str,
    unite_cgs: &'static str,
    reference: &'static str,
) -> Entree {
    Entree {
        nom,
        description,
        valeur_si,
        incertitude,
        unite_si,
        unite_cgs,
        reference,
    }
}

const CODATA: &str = "CODATA 2018";
const IAU: &str = "IAU 2015 Resolution B 3";

#[rustfmt::skip]
const TABLE: &[Entree] = &[
    entree("G", "Gravitational constant", 6.6743e-11, 1.5e-15, "m3 / (kg s2)", "cm3 / (g s2)", CODATA),
    entree("N_A", "Avogadro's number", 6.022_140_76e23, 0.0, "1 / mol", "1 / mol", CODATA),
    entree("R", "Gas constant", 8.314_462_618, 0.0, "J / (K mol)", "erg / (K mol)", CODATA),
    entree("Ryd", "Rydberg constant", 10_973_731.568_16, 2.1e-5, "1 / m", "1 / cm", CODATA),
    entree("a0", "Bohr radius", 5.291_772_109_03e-11, 8.0e-21, "m", "cm", CODATA),
    entree("alpha", "Fine-structure constant", 7.297_352_569_3e-3, 1.1e-12, "", "", CODATA),
    entree("atm", "Standard atmosphere", 101_325.0, 0.0, "Pa", "Ba", "ISO 2533:1975"),
    entree("b_wien", "Wien wavelength displacement law constant", 2.897_771_955e-3, 0.0, "m K", "cm K", CODATA),
    entree("c", "Speed of light in vacuum", 299_792_458.0, 0.0, "m / s", "cm / s", CODATA),
    entree("g0", "Standard acceleration of gravity", 9.806_65, 0.0, "m / s2", "cm / s2", CODATA),
    entree("h", "Planck constant", 6.626_070_15e-34, 0.0, "J s", "erg s", CODATA),
    entree("hbar", "Reduced Planck constant", 1.054_571_817_646_156_5e-34, 0.0, "J s", "erg s", CODATA),
    entree("k_B", "Boltzmann constant", 1.380_649e-23, 0.0, "J / K", "erg / K", CODATA),
    entree("m_e", "Electron mass", 9.109_383_701_5e-31, 2.8e-40, "kg", "g", CODATA),
    entree("m_n", "Neutron mass", 1.674_927_498_04e-27, 9.5e-37, "kg", "g", CODATA),
    entree("m_p", "Proton mass", 1.672_621_923_69e-27, 5.1e-37, "kg", "g", CODATA),
    entree("e", "Electron charge", 1.602_176_634e-19, 0.0, "C", "statC", CODATA),
    entree("eps0", "Vacuum electric permittivity", 8.854_187_812_8e-12, 1.3e-21, "F / m", "statC2 s2 / (g cm3)", CODATA),
    entree("mu0", "Vacuum magnetic permeability", 1.256_637_062_12e-6, 1.9e-16, "N / A2", "g cm / statC2", CODATA),
    entree("muB", "Bohr magneton", 9.274_010_078_3e-24, 2.8e-33, "J / T", "erg / Gauss", CODATA),
    entree("sigma_T", "Thomson scattering cross-section", 6.652_458_732_1e-29, 6.0e-38, "m2", "cm2", CODATA),
    entree("sigma_sb", "Stefan-Boltzmann constant", 5.670_374_419e-8, 0.0, "W / (K4 m2)", "erg / (cm2 K4 s)", CODATA),
    entree("u", "Atomic mass", 1.660_539_066_6e-27, 5.0e-37, "kg", "g", CODATA),
    entree("GM_earth", "Nominal Earth mass parameter", 3.986_004e14, 0.0, "m3 / s2", "cm3 / s2", IAU),
    entree("GM_jup", "Nominal Jupiter mass parameter", 1.266_865_3e17, 0.0, "m3 / s2", "cm3 / s2", IAU),
    entree("GM_sun", "Nominal solar mass parameter", 1.327_124_4e20, 0.0, "m3 / s2", "cm3 / s2", IAU),
    entree("L_bol0", "Luminosity for absolute bolometric magnitude 0", 3.0128e28, 0.0, "W", "erg / s", IAU),
    entree("L_sun", "Nominal solar luminosity", 3.828e26, 0.0, "W", "erg / s", IAU),
    entree("M_earth", "Earth mass", 5.972_167_867_791_379e24, 1.342_2e20, "kg", "g", IAU),
    entree("M_jup", "Jupiter mass", 1.898_124_597_336_050_5e27, 4.26e22, "kg", "g", IAU),
    entree("M_sun", "Solar mass", 1.988_409_870_698_051e30, 4.468e25, "kg", "g", IAU),
    entree("R_earth", "Nominal Earth equatorial radius", 6_378_100.0, 0.0, "m", "cm", IAU),
    entree("R_jup", "Nominal Jupiter equatorial radius", 71_492_000.0, 0.0, "m", "cm", IAU),
    entree("R_sun", "Nominal solar radius", 695_700_000.0, 0.0, "m", "cm", IAU),
    entree("au", "Astronomical Unit", 149_597_870_700.0, 0.0, "m", "cm", "IAU 2012 Resolution B2"),
    entree("kpc", "Kiloparsec", 3.085_677_581_491_367_4e19, 0.0, "m", "cm", "Derived from au"),
    entree("pc", "Parsec", 3.085_677_581_491_367_4e16, 0.0, "m", "cm", "Derived from au"),
    entree("pi", "Ratio of circumference to diameter", std::f64::consts::PI, 0.0, "", "", ""),
];

/// Fiche descriptive, telle qu’affichée quand on tape le nom seul.
#[derive(Clone, Debug, PartialEq)]
pub struct FicheConstante {
    pub nom: String,
    pub description: String,
    pub valeur: String,
    pub incertitude: String,
    pub unite: String,
    pub reference: String,
}

impl fmt::Display for FicheConstante {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "  Name   = {}", self.description)?;
        writeln!(f, "  Value  = {}", self.valeur)?;
        writeln!(f, "  Uncertainty  = {}", self.incertitude)?;
        writeln!(f, "  Unit  = {}", self.unite)?;
        write!(f, "  Reference = {}", self.reference)
    }
}

#[derive(Clone, Debug)]
pub struct Constante {
    entree: &'static Entree,
    unite_cgs: Unite,
    quantite: Quantite,
}

impl Constante {
    fn charger(entree: &'static Entree) -> Res<Self> {
        // UnitesSeules : le registre des constantes n’est pas encore construit
        let unite_si = unite_depuis_texte(entree.unite_si, Portee::UnitesSeules)?;
        let unite_cgs = unite_depuis_texte(entree.unite_cgs, Portee::UnitesSeules)?;
        if unite_si.dim() != unite_cgs.dim() {
            return Err(Erreur::Dimensions {
                gauche: symbole_lisible(&unite_si),
                droite: symbole_lisible(&unite_cgs),
            });
        }
        let dim = unite_si.dim();
        let quantite = Quantite::new(entree.valeur_si * unite_si.echelle(), CGS.unite_pour(dim));
        Ok(Self {
            entree,
            unite_cgs,
            quantite,
        })
    }

    pub fn nom(&self) -> &'static str {
        self.entree.nom
    }

    pub fn description(&self) -> &'static str {
        self.entree.description
    }

    pub fn valeur_si(&self) -> f64 {
        self.entree.valeur_si
    }

    pub fn incertitude(&self) -> f64 {
        self.entree.incertitude
    }

    pub fn reference(&self) -> &'static str {
        self.entree.reference
    }

    /// Valeur de calcul (base CGS).
    pub fn quantite(&self) -> &Quantite {
        &self.quantite
    }

    pub fn fiche(&self) -> FicheConstante {
        FicheConstante {
            nom: self.nom().to_string(),
            description: self.description().to_string(),
            valeur: formater_repr(self.valeur_si()),
            incertitude: formater_repr(self.incertitude()),
            unite: self.entree.unite_si.to_string(),
            reference: self.reference().to_string(),
        }
    }

    /// Ligne CGS de la fiche : "6.62607e-27 erg s".
    pub fn texte_cgs(&self) -> String {
        let v = self.quantite.valeur_cgs() / self.unite_cgs.echelle();
        let valeur = formater_abrege(v, CHIFFRES_FICHE_CGS);
        if self.entree.unite_cgs.is_empty() {
            valeur
        } else {
            format!("{valeur} {}", self.entree.unite_cgs)
        }
    }
}

static CONSTANTES: Lazy<HashMap<&'static str, Constante>> = Lazy::new(|| {
    TABLE
        .iter()
        .map(|e| {
            let c = Constante::charger(e)
                .unwrap_or_else(|err| panic!("table des constantes invalide ({}): {err}", e.nom));
            (e.nom, c)
        })
        .collect()
});

pub fn chercher(nom: &str) -> Option<&'static Constante> {
    CONSTANTES.get(nom)
}

/// Noms triés sans tenir compte de la casse (aide des frontaux).
pub fn noms() -> Vec<&'static str> {
    let mut v: Vec<&'static str> = TABLE.iter().map(|e| e.nom).collect();
    v.sort_by_key(|s| s.to_lowercase());
    v
}
