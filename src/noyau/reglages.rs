//! Réglages d’affichage, passés explicitement à chaque appel (pas d’état global).

use std::fmt;
use std::str::FromStr;

/// Chiffres significatifs par défaut.
pub const CHIFFRES_DEFAUT: usize = 4;

/// Garde-fou : au-delà, f64 n’a plus rien à dire.
pub const CHIFFRES_MAX: usize = 17;

/// Système d’unités mis en avant par les frontaux.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Systeme {
    #[default]
    Si,
    Cgs,
}

impl fmt::Display for Systeme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Systeme::Si => f.write_str("SI"),
            Systeme::Cgs => f.write_str("cgs"),
        }
    }
}

impl FromStr for Systeme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "si" => Ok(Systeme::Si),
            "cgs" => Ok(Systeme::Cgs),
            autre => Err(format!("système inconnu: {autre} (si | cgs)")),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Reglages {
    pub chiffres: usize,
    pub systeme: Systeme,
}

impl Default for Reglages {
    fn default() -> Self {
        Self {
            chiffres: CHIFFRES_DEFAUT,
            systeme: Systeme::default(),
        }
    }
}

impl Reglages {
    pub fn avec_chiffres(mut self, chiffres: usize) -> Self {
        self.chiffres = chiffres.clamp(1, CHIFFRES_MAX);
        self
    }

    pub fn avec_systeme(mut self, systeme: Systeme) -> Self {
        self.systeme = systeme;
        self
    }

    /// Chiffres effectivement utilisés (borne appliquée même si le champ a été modifié à la main).
    pub fn chiffres_effectifs(&self) -> usize {
        self.chiffres.clamp(1, CHIFFRES_MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defauts() {
        let r = Reglages::default();
        assert_eq!(r.chiffres, 4);
        assert_eq!(r.systeme, Systeme::Si);
    }

    #[test]
    fn bornes() {
        assert_eq!(Reglages::default().avec_chiffres(0).chiffres, 1);
        assert_eq!(Reglages::default().avec_chiffres(99).chiffres, CHIFFRES_MAX);
    }

    #[test]
    fn systeme_depuis_texte() {
        assert_eq!("CGS".parse::<Systeme>(), Ok(Systeme::Cgs));
        assert_eq!(" si ".parse::<Systeme>(), Ok(Systeme::Si));
        assert!("mks".parse::<Systeme>().is_err());
    }
}
