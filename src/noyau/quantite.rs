// src/noyau/quantite.rs
//
// Quantité physique = valeur (dans l’échelle de SON unité) + unité.
// Valeur immuable : chaque opération construit une nouvelle Quantite.
//
// Règles dimensionnelles:
// - +, - : dimensions égales exigées (jamais de coercition silencieuse)
// - *, / : dimensions additionnées / soustraites, échelles multipliées / divisées
// - ^    : exposant rationnel (dénominateur <= 12) si la base a une dimension

use std::fmt;

use num_rational::Rational32;

use super::dimension::Dimension;
use super::erreur::{Erreur, Res};
use super::format::formater_quantite;
use super::reglages::CHIFFRES_DEFAUT;
use super::unites::{puissance_f64, OpUnite, Unite};

/// Plus grand dénominateur accepté pour un exposant de grandeur dimensionnée.
const DENOMINATEUR_MAX: i32 = 12;

/// Borne sur |exposant| (évite les dimensions absurdes type m^1e9).
const EXPOSANT_MAX: f64 = 1000.0;

#[derive(Clone, Debug, PartialEq)]
pub struct Quantite {
    valeur: f64,
    unite: Unite,
}

impl Quantite {
    pub fn new(valeur: f64, unite: Unite) -> Self {
        Self { valeur, unite }
    }

    /// Nombre pur.
    pub fn nombre(valeur: f64) -> Self {
        Self::new(valeur, Unite::sans_dimension())
    }

    pub fn valeur(&self) -> f64 {
        self.valeur
    }

    pub fn unite(&self) -> &Unite {
        &self.unite
    }

    pub fn dim(&self) -> Dimension {
        self.unite.dim()
    }

    /// Valeur ramenée à la base CGS.
    pub fn valeur_cgs(&self) -> f64 {
        self.valeur * self.unite.echelle()
    }

    fn erreur_dimensions(&self, autre: &Quantite) -> Erreur {
        Erreur::Dimensions {
            gauche: symbole_lisible(&self.unite),
            droite: symbole_lisible(&autre.unite),
        }
    }

    /// Valeur de `autre` exprimée dans l’unité de `self` (mêmes dimensions exigées).
    fn aligner(&self, autre: &Quantite) -> Res<f64> {
        if self.dim() != autre.dim() {
            return Err(self.erreur_dimensions(autre));
        }
        Ok(autre.valeur * autre.unite.echelle() / self.unite.echelle())
    }

    pub fn additionner(&self, autre: &Quantite) -> Res<Quantite> {
        let v = self.aligner(autre)?;
        Ok(Quantite::new(self.valeur + v, self.unite.clone()))
    }

    pub fn soustraire(&self, autre: &Quantite) -> Res<Quantite> {
        let v = self.aligner(autre)?;
        Ok(Quantite::new(self.valeur - v, self.unite.clone()))
    }

    pub fn multiplier(&self, autre: &Quantite) -> Res<Quantite> {
        let unite = self.unite.combiner(&autre.unite, OpUnite::Mul)?;
        Ok(Quantite::new(self.valeur * autre.valeur, unite))
    }

    pub fn diviser(&self, autre: &Quantite) -> Res<Quantite> {
        if autre.valeur == 0.0 {
            return Err(Erreur::DivisionParZero);
        }
        let unite = self.unite.combiner(&autre.unite, OpUnite::Div)?;
        Ok(Quantite::new(self.valeur / autre.valeur, unite))
    }

    pub fn oppose(&self) -> Quantite {
        Quantite::new(-self.valeur, self.unite.clone())
    }

    /// self^e. Sans dimension : tout exposant réel. Sinon exposant rationnel “simple”.
    pub fn elever(&self, e: f64) -> Res<Quantite> {
        if !e.is_finite() {
            return Err(Erreur::non_supportee("exposant non fini"));
        }
        if self.valeur == 0.0 && e < 0.0 {
            return Err(Erreur::DivisionParZero);
        }

        if self.dim().est_sans_dimension() {
            let v = self.valeur_cgs().powf(e);
            if v.is_nan() {
                return Err(Erreur::non_supportee("puissance non réelle"));
            }
            return Ok(Quantite::nombre(v));
        }

        let r = rationnel_proche(e).ok_or_else(|| {
            Erreur::non_supportee(format!(
                "exposant {e} non représentable pour '{}'",
                symbole_lisible(&self.unite)
            ))
        })?;
        let unite = self.unite.puissance(r)?;
        let v = puissance_f64(self.valeur, r);
        if v.is_nan() {
            return Err(Erreur::non_supportee("puissance non réelle"));
        }
        Ok(Quantite::new(v, unite))
    }
}

impl fmt::Display for Quantite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&formater_quantite(self, CHIFFRES_DEFAUT))
    }
}

/// Symbole pour les messages (jamais vide).
pub(crate) fn symbole_lisible(u: &Unite) -> String {
    let s = u.symbole();
    if s.is_empty() {
        "sans dimension".to_string()
    } else {
        s
    }
}

/// e ≈ n/d avec d <= DENOMINATEUR_MAX (tolérance 1e-9).
pub(crate) fn rationnel_proche(e: f64) -> Option<Rational32> {
    if !e.is_finite() || e.abs() > EXPOSANT_MAX {
        return None;
    }
    (1..=DENOMINATEUR_MAX).find_map(|d| {
        let x = e * d as f64;
        let n = x.round();
        ((x - n).abs() < 1e-9).then(|| Rational32::new(n as i32, d))
    })
}
