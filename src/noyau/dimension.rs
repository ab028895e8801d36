// src/noyau/dimension.rs
//
// Vecteur de dimension : exposants RATIONNELS sur 8 grandeurs de base.
// Deux quantités sont compatibles (+, -, conversion) ssi leurs vecteurs sont égaux.
//
// Arithmétique vérifiée (checked_*) : un exposant qui déborde i32 devient une
// erreur NonSupportee, jamais une panique.

use num_rational::Rational32;
use num_traits::{CheckedAdd, CheckedMul, CheckedSub, Zero};

use super::erreur::{Erreur, Res};

pub const NB_BASES: usize = 8;

/// Grandeurs de base, dans l’ordre du vecteur.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Base {
    Longueur,
    Masse,
    Temps,
    Temperature,
    Charge,
    Angle,
    Quantite,
    Intensite,
}

impl Base {
    pub const TOUTES: [Base; NB_BASES] = [
        Base::Longueur,
        Base::Masse,
        Base::Temps,
        Base::Temperature,
        Base::Charge,
        Base::Angle,
        Base::Quantite,
        Base::Intensite,
    ];

    pub fn index(self) -> usize {
        self as usize
    }
}

const ZERO: Rational32 = Rational32::new_raw(0, 1);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Dimension([Rational32; NB_BASES]);

impl Default for Dimension {
    fn default() -> Self {
        Self::SANS
    }
}

fn hors_bornes() -> Erreur {
    Erreur::non_supportee("exposant de dimension hors bornes")
}

impl Dimension {
    /// Grandeur sans dimension.
    pub const SANS: Dimension = Dimension([ZERO; NB_BASES]);

    /// Vecteur avec une seule base non nulle (entière).
    pub fn base(b: Base, exp: i32) -> Self {
        let mut v = [ZERO; NB_BASES];
        v[b.index()] = Rational32::from_integer(exp);
        Dimension(v)
    }

    /// Construit depuis des exposants entiers, dans l’ordre de `Base::TOUTES`.
    pub fn entiers(exps: [i32; NB_BASES]) -> Self {
        Dimension(exps.map(Rational32::from_integer))
    }

    pub fn exposant(&self, b: Base) -> Rational32 {
        self.0[b.index()]
    }

    pub fn est_sans_dimension(&self) -> bool {
        self.0.iter().all(|e| e.is_zero())
    }

    /// Vrai si la grandeur est un angle pur (rad, deg, arcsec...).
    pub fn est_angle(&self) -> bool {
        *self == Dimension::base(Base::Angle, 1)
    }

    /// Dimension d’un produit : exposants additionnés.
    pub fn produit(&self, autre: &Dimension) -> Res<Dimension> {
        let mut v = self.0;
        for (e, a) in v.iter_mut().zip(autre.0.iter()) {
            *e = e.checked_add(a).ok_or_else(hors_bornes)?;
        }
        Ok(Dimension(v))
    }

    /// Dimension d’un quotient : exposants soustraits.
    pub fn quotient(&self, autre: &Dimension) -> Res<Dimension> {
        let mut v = self.0;
        for (e, a) in v.iter_mut().zip(autre.0.iter()) {
            *e = e.checked_sub(a).ok_or_else(hors_bornes)?;
        }
        Ok(Dimension(v))
    }

    /// Dimension de x^r (r rationnel).
    pub fn puissance(&self, r: Rational32) -> Res<Dimension> {
        let mut v = self.0;
        for e in v.iter_mut() {
            *e = e.checked_mul(&r).ok_or_else(hors_bornes)?;
        }
        Ok(Dimension(v))
    }

    /// (base, exposant) non nuls, dans l’ordre du vecteur.
    pub fn composantes(&self) -> impl Iterator<Item = (Base, Rational32)> + '_ {
        Base::TOUTES
            .iter()
            .map(move |b| (*b, self.0[b.index()]))
            .filter(|(_, e)| !e.is_zero())
    }
}
