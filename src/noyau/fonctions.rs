// src/noyau/fonctions.rs
//
// Fonctions d’une variable : sqrt, abs, trigo, hyperboliques, exp/log.
//
// Règles dimensionnelles:
// - sqrt, abs : toute dimension (sqrt exige un exposant rationnel valide)
// - sin, cos, tan : sans dimension ou angle (valeur lue en radians)
// - arcsin, arccos, arctan : sans dimension, résultat en rad
// - le reste : sans dimension

use super::dimension::{Base, Dimension};
use super::erreur::{Erreur, Res};
use super::quantite::{symbole_lisible, Quantite};
use super::unites::Unite;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Fonction {
    Sqrt,
    Abs,
    Sin,
    Cos,
    Tan,
    Asin,
    Acos,
    Atan,
    Sinh,
    Cosh,
    Tanh,
    Asinh,
    Acosh,
    Atanh,
    Exp,
    Ln,
    Log10,
    Log2,
}

const TABLE: &[(&str, Fonction)] = &[
    ("sqrt", Fonction::Sqrt),
    ("abs", Fonction::Abs),
    ("sin", Fonction::Sin),
    ("cos", Fonction::Cos),
    ("tan", Fonction::Tan),
    ("arcsin", Fonction::Asin),
    ("asin", Fonction::Asin),
    ("arccos", Fonction::Acos),
    ("acos", Fonction::Acos),
    ("arctan", Fonction::Atan),
    ("atan", Fonction::Atan),
    ("sinh", Fonction::Sinh),
    ("cosh", Fonction::Cosh),
    ("tanh", Fonction::Tanh),
    ("arcsinh", Fonction::Asinh),
    ("arccosh", Fonction::Acosh),
    ("arctanh", Fonction::Atanh),
    ("exp", Fonction::Exp),
    ("log", Fonction::Ln),
    ("ln", Fonction::Ln),
    ("log10", Fonction::Log10),
    ("log2", Fonction::Log2),
];

/// Nom réservé à une fonction ? (utilisé par la juxtaposition et l’analyse)
pub fn est_fonction(nom: &str) -> bool {
    Fonction::depuis_nom(nom).is_some()
}

/// Noms acceptés, pour l’aide des frontaux.
pub fn noms_fonctions() -> Vec<&'static str> {
    TABLE.iter().map(|(n, _)| *n).collect()
}

fn radian() -> Unite {
    Unite::nommee("rad", Dimension::base(Base::Angle, 1), 1.0)
}

impl Fonction {
    pub fn depuis_nom(nom: &str) -> Option<Self> {
        TABLE.iter().find(|(n, _)| *n == nom).map(|(_, f)| *f)
    }

    /// Toutes les fonctions connues prennent un seul argument.
    pub fn arite(self) -> usize {
        1
    }

    pub fn nom(self) -> &'static str {
        TABLE
            .iter()
            .find(|(_, f)| *f == self)
            .map(|(n, _)| *n)
            .unwrap_or("?")
    }

    fn exiger_sans_dimension(self, x: &Quantite) -> Res<f64> {
        if x.dim().est_sans_dimension() {
            Ok(x.valeur_cgs())
        } else {
            Err(Erreur::Dimensions {
                gauche: symbole_lisible(x.unite()),
                droite: "sans dimension".to_string(),
            })
        }
    }

    fn exiger_angle(self, x: &Quantite) -> Res<f64> {
        if x.dim().est_sans_dimension() || x.dim().est_angle() {
            Ok(x.valeur_cgs())
        } else {
            Err(Erreur::Dimensions {
                gauche: symbole_lisible(x.unite()),
                droite: "rad".to_string(),
            })
        }
    }

    pub fn appliquer(self, x: &Quantite) -> Res<Quantite> {
        let r = match self {
            Fonction::Sqrt => {
                if x.valeur() < 0.0 {
                    return Err(Erreur::non_supportee("racine carrée d'un nombre négatif"));
                }
                return x.elever(0.5);
            }
            Fonction::Abs => return Ok(Quantite::new(x.valeur().abs(), x.unite().clone())),

            Fonction::Sin => Quantite::nombre(self.exiger_angle(x)?.sin()),
            Fonction::Cos => Quantite::nombre(self.exiger_angle(x)?.cos()),
            Fonction::Tan => Quantite::nombre(self.exiger_angle(x)?.tan()),

            Fonction::Asin => Quantite::new(self.exiger_sans_dimension(x)?.asin(), radian()),
            Fonction::Acos => Quantite::new(self.exiger_sans_dimension(x)?.acos(), radian()),
            Fonction::Atan => Quantite::new(self.exiger_sans_dimension(x)?.atan(), radian()),

            Fonction::Sinh => Quantite::nombre(self.exiger_sans_dimension(x)?.sinh()),
            Fonction::Cosh => Quantite::nombre(self.exiger_sans_dimension(x)?.cosh()),
            Fonction::Tanh => Quantite::nombre(self.exiger_sans_dimension(x)?.tanh()),
            Fonction::Asinh => Quantite::nombre(self.exiger_sans_dimension(x)?.asinh()),
            Fonction::Acosh => Quantite::nombre(self.exiger_sans_dimension(x)?.acosh()),
            Fonction::Atanh => Quantite::nombre(self.exiger_sans_dimension(x)?.atanh()),

            Fonction::Exp => Quantite::nombre(self.exiger_sans_dimension(x)?.exp()),
            Fonction::Ln | Fonction::Log10 | Fonction::Log2 => {
                let v = self.exiger_sans_dimension(x)?;
                if v <= 0.0 {
                    return Err(Erreur::non_supportee(format!(
                        "{}: argument négatif ou nul",
                        self.nom()
                    )));
                }
                let l = match self {
                    Fonction::Log10 => v.log10(),
                    Fonction::Log2 => v.log2(),
                    _ => v.ln(),
                };
                Quantite::nombre(l)
            }
        };

        if r.valeur().is_nan() {
            return Err(Erreur::non_supportee(format!("{}: hors domaine", self.nom())));
        }
        Ok(r)
    }
}
