// src/noyau/conversion.rs
//
// Conversions:
// - vers_cgs / vers_si : réécriture sur les unités de base du système
// - convertir          : vers une unité cible quelconque (mêmes dimensions)
//
// Exception angulaire : une grandeur sans dimension convertie vers un angle
// (deg, arcmin, arcsec...) est lue comme des radians.

use super::analyse::analyser_expression;
use super::dimension::{Dimension, NB_BASES};
use super::erreur::{Erreur, Res};
use super::eval::{evaluer_unite, Portee};
use super::quantite::{symbole_lisible, Quantite};
use super::reglages::Systeme;
use super::unites::{puissance_f64, Unite, COULOMB_EN_STATC};

/// Unités de base d’un système, dans l’ordre de `Base::TOUTES`.
pub struct Profil {
    noms: [&'static str; NB_BASES],
    echelles: [f64; NB_BASES],
}

pub const CGS: Profil = Profil {
    noms: ["cm", "g", "s", "K", "statC", "rad", "mol", "cd"],
    echelles: [1.0; NB_BASES],
};

pub const SI: Profil = Profil {
    noms: ["m", "kg", "s", "K", "C", "rad", "mol", "cd"],
    echelles: [1e2, 1e3, 1.0, 1.0, COULOMB_EN_STATC, 1.0, 1.0, 1.0],
};

impl Profil {
    pub fn pour(systeme: Systeme) -> &'static Profil {
        match systeme {
            Systeme::Si => &SI,
            Systeme::Cgs => &CGS,
        }
    }

    /// Unité du système pour une dimension donnée (ex: L T^-1 -> "m / s").
    pub fn unite_pour(&self, dim: Dimension) -> Unite {
        let mut termes = Vec::new();
        let mut echelle = 1.0;
        for (b, e) in dim.composantes() {
            termes.push((self.noms[b.index()].to_string(), e));
            echelle *= puissance_f64(self.echelles[b.index()], e);
        }
        Unite::depuis_termes(termes, dim, echelle)
    }
}

/// Réécrit `q` dans les unités de base du profil.
pub fn vers_profil(q: &Quantite, profil: &Profil) -> Quantite {
    let u = profil.unite_pour(q.dim());
    Quantite::new(q.valeur_cgs() / u.echelle(), u)
}

pub fn vers_cgs(q: &Quantite) -> Quantite {
    vers_profil(q, &CGS)
}

pub fn vers_si(q: &Quantite) -> Quantite {
    vers_profil(q, &SI)
}

pub fn vers_systeme(q: &Quantite, systeme: Systeme) -> Quantite {
    vers_profil(q, Profil::pour(systeme))
}

/// `q` exprimée dans `cible`. Dimensions égales exigées (sauf nombre pur -> angle).
pub fn convertir(q: &Quantite, cible: &Unite) -> Res<Quantite> {
    let radians = q.dim().est_sans_dimension() && cible.dim().est_angle();
    if q.dim() != cible.dim() && !radians {
        return Err(Erreur::Dimensions {
            gauche: symbole_lisible(q.unite()),
            droite: symbole_lisible(cible),
        });
    }
    Ok(Quantite::new(q.valeur_cgs() / cible.echelle(), cible.clone()))
}

/// Texte d’unité -> Unite ("km/s", "erg / (cm2 K4 s)", "M_sun"...).
pub fn unite_depuis_texte(texte: &str, portee: Portee) -> Res<Unite> {
    if texte.trim().is_empty() {
        return Ok(Unite::sans_dimension());
    }
    let expr = analyser_expression(texte)?;
    evaluer_unite(&expr, portee)
}

/// Conversion vers une unité saisie par l’utilisateur.
/// Texte vide refusé (une unité vide ne désigne rien ici).
pub fn convertir_texte(q: &Quantite, texte: &str) -> Res<Quantite> {
    if texte.trim().is_empty() {
        return Err(Erreur::syntaxe("unité cible vide"));
    }
    let cible = unite_depuis_texte(texte, Portee::UnitesEtConstantes)?;
    convertir(q, &cible)
}
