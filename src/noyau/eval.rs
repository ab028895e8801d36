//! Noyau: évaluation d’un arbre `Expr` en `Quantite`.
//!
//! Résolution d’un symbole, dans cet ordre:
//!   1. variables de session
//!   2. constantes physiques
//!   3. unités (une unité seule vaut 1 × unité)
//!
//! Une cible de conversion ("in km/s") passe par `evaluer_unite` : seuls les
//! symboles d’unités (et, selon la portée, de constantes) y sont admis.

use std::collections::HashMap;

use num_rational::Rational32;

use super::constantes;
use super::conversion::vers_systeme;
use super::erreur::{Erreur, Res};
use super::expr::{Expr, OpBinaire};
use super::fonctions::Fonction;
use super::quantite::{rationnel_proche, symbole_lisible, Quantite};
use super::reglages::Systeme;
use super::unites::{self, OpUnite, Unite};

/// Variables d’une session (nom -> valeur).
pub type Variables = HashMap<String, Quantite>;

/// Symboles admis dans une expression d’unité.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Portee {
    /// Unités du registre seulement (libellés des constantes, chargés au démarrage).
    UnitesSeules,
    /// Unités puis constantes ("in M_sun", "in R_earth").
    UnitesEtConstantes,
}

/// Plus grande factorielle représentable en f64.
const FACTORIELLE_MAX: f64 = 170.0;

pub fn resoudre_symbole(nom: &str, variables: &Variables) -> Res<Quantite> {
    if let Some((radical, systeme)) = nom.split_once('.') {
        return projeter(&resoudre_symbole(radical, variables)?, systeme);
    }
    if let Some(q) = variables.get(nom) {
        return Ok(q.clone());
    }
    if let Some(c) = constantes::chercher(nom) {
        return Ok(c.quantite().clone());
    }
    if let Some(u) = unites::chercher(nom) {
        return Ok(Quantite::new(1.0, u));
    }
    if let Some(u) = constante_comme_unite(nom) {
        return Ok(Quantite::new(1.0, u?));
    }
    Err(Erreur::SymboleInconnu(nom.to_string()))
}

/// "e.esu", "h.si", "G.cgs" : réécriture dans les unités de base d’un système.
/// esu = cgs (la charge y est déjà en statC).
fn projeter(q: &Quantite, systeme: &str) -> Res<Quantite> {
    match systeme {
        "si" => Ok(vers_systeme(q, Systeme::Si)),
        "cgs" | "esu" => Ok(vers_systeme(q, Systeme::Cgs)),
        autre => Err(Erreur::SymboleInconnu(format!(".{autre}"))),
    }
}

/// Constante utilisée comme unité : "pc", "au", ou puissance "pc2", "au3".
/// Le suffixe n’est admis que pour une constante dimensionnée (pas de "pi2").
fn constante_comme_unite(nom: &str) -> Option<Res<Unite>> {
    let (radical, n) = match constantes::chercher(nom) {
        Some(_) => (nom, 1),
        None => unites::decouper_suffixe(nom)?,
    };
    let q = constantes::chercher(radical)?.quantite();
    if n != 1 && q.dim().est_sans_dimension() {
        return None;
    }
    let v = q.valeur_cgs();
    if !(v > 0.0 && v.is_finite()) {
        return Some(Err(Erreur::non_supportee(format!(
            "'{radical}' ne peut pas servir d'unité"
        ))));
    }
    Some(Unite::nommee(radical, q.dim(), v).puissance(Rational32::from_integer(n)))
}

pub fn evaluer(expr: &Expr, variables: &Variables) -> Res<Quantite> {
    match expr {
        Expr::Nombre(v) => Ok(Quantite::nombre(*v)),
        Expr::Symbole(nom) => resoudre_symbole(nom, variables),

        Expr::Neg(a) => Ok(evaluer(a, variables)?.oppose()),

        Expr::Binaire(op, a, b) => {
            let x = evaluer(a, variables)?;
            let y = evaluer(b, variables)?;
            let r = match op {
                OpBinaire::Add => x.additionner(&y)?,
                OpBinaire::Sub => x.soustraire(&y)?,
                OpBinaire::Mul => x.multiplier(&y)?,
                OpBinaire::Div => x.diviser(&y)?,
                OpBinaire::Pow => {
                    if !y.dim().est_sans_dimension() {
                        return Err(Erreur::Dimensions {
                            gauche: symbole_lisible(y.unite()),
                            droite: "sans dimension".to_string(),
                        });
                    }
                    x.elever(y.valeur_cgs())?
                }
            };
            // inf - inf, 0 * inf
            if r.valeur().is_nan() {
                return Err(Erreur::non_supportee("résultat indéfini (nan)"));
            }
            Ok(r)
        }

        Expr::Appel(nom, args) => {
            let f = Fonction::depuis_nom(nom)
                .ok_or_else(|| Erreur::SymboleInconnu(nom.clone()))?;
            let [arg] = args.as_slice() else {
                return Err(Erreur::syntaxe(format!(
                    "'{nom}' attend {} argument(s)",
                    f.arite()
                )));
            };
            f.appliquer(&evaluer(arg, variables)?)
        }

        Expr::Factorielle(a) => factorielle(&evaluer(a, variables)?),
    }
}

fn factorielle(q: &Quantite) -> Res<Quantite> {
    if !q.dim().est_sans_dimension() {
        return Err(Erreur::Dimensions {
            gauche: symbole_lisible(q.unite()),
            droite: "sans dimension".to_string(),
        });
    }
    let n = q.valeur_cgs();
    if n < 0.0 || n.fract() != 0.0 || n > FACTORIELLE_MAX {
        return Err(Erreur::non_supportee(format!(
            "factorielle d'un non-entier, d'un négatif ou au-delà de {FACTORIELLE_MAX}: {n}"
        )));
    }
    let r = (2..=n as u32).fold(1.0_f64, |acc, k| acc * k as f64);
    Ok(Quantite::nombre(r))
}

/// Exposant d’une unité : arithmétique de nombres seulement ("cm^(3/2)", "s^-1").
fn exposant_numerique(expr: &Expr) -> Res<f64> {
    match expr {
        Expr::Nombre(v) => Ok(*v),
        Expr::Neg(a) => Ok(-exposant_numerique(a)?),
        Expr::Binaire(op, a, b) => {
            let x = exposant_numerique(a)?;
            let y = exposant_numerique(b)?;
            match op {
                OpBinaire::Add => Ok(x + y),
                OpBinaire::Sub => Ok(x - y),
                OpBinaire::Mul => Ok(x * y),
                OpBinaire::Div if y == 0.0 => Err(Erreur::DivisionParZero),
                OpBinaire::Div => Ok(x / y),
                OpBinaire::Pow => Ok(x.powf(y)),
            }
        }
        _ => Err(Erreur::non_supportee(
            "exposant d'unité : seuls des nombres sont admis",
        )),
    }
}

fn unite_de_symbole(nom: &str, portee: Portee) -> Res<Unite> {
    if let Some(u) = unites::chercher(nom) {
        return Ok(u);
    }
    if portee == Portee::UnitesEtConstantes {
        if let Some(u) = constante_comme_unite(nom) {
            return u;
        }
    }
    Err(Erreur::SymboleInconnu(nom.to_string()))
}

/// Évalue une expression d’unité ("km/s", "erg / (cm2 K4 s)", "1 / mol", "cm^(1/2)").
pub fn evaluer_unite(expr: &Expr, portee: Portee) -> Res<Unite> {
    match expr {
        Expr::Symbole(nom) => unite_de_symbole(nom, portee),
        Expr::Nombre(v) if *v == 1.0 => Ok(Unite::sans_dimension()),
        Expr::Binaire(OpBinaire::Mul, a, b) => {
            evaluer_unite(a, portee)?.combiner(&evaluer_unite(b, portee)?, OpUnite::Mul)
        }
        Expr::Binaire(OpBinaire::Div, a, b) => {
            evaluer_unite(a, portee)?.combiner(&evaluer_unite(b, portee)?, OpUnite::Div)
        }
        Expr::Binaire(OpBinaire::Pow, a, b) => {
            let base = evaluer_unite(a, portee)?;
            let e = exposant_numerique(b)?;
            let r = rationnel_proche(e).ok_or_else(|| {
                Erreur::non_supportee(format!("exposant d'unité non rationnel: {e}"))
            })?;
            base.puissance(r)
        }
        autre => Err(Erreur::non_supportee(format!(
            "expression d'unité invalide: {autre}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::noyau::analyse::analyser_expression;
    use crate::noyau::dimension::{Base, Dimension};

    fn eval(s: &str) -> Res<Quantite> {
        evaluer(&analyser_expression(s).unwrap(), &Variables::new())
    }

    fn unite(s: &str) -> Res<Unite> {
        evaluer_unite(&analyser_expression(s).unwrap(), Portee::UnitesEtConstantes)
    }

    #[test]
    fn arithmetique_simple() {
        assert_eq!(eval("1 + 2 * 3").unwrap().valeur(), 7.0);
        assert_eq!(eval("-2^2").unwrap().valeur(), -4.0);
        assert_eq!(eval("2^3^2").unwrap().valeur(), 512.0);
        assert_eq!(eval("5!").unwrap().valeur(), 120.0);
        assert_eq!(eval("0!").unwrap().valeur(), 1.0);
    }

    #[test]
    fn unite_seule_vaut_un() {
        let q = eval("km").unwrap();
        assert_eq!(q.valeur(), 1.0);
        assert_eq!(q.unite().symbole(), "km");
    }

    #[test]
    fn constante_avant_unite() {
        // "c" est la vitesse de la lumière, pas une unité
        let q = eval("c").unwrap();
        assert!((q.valeur_cgs() - 2.997_924_58e10).abs() < 1.0);
    }

    #[test]
    fn variable_avant_constante() {
        let mut vars = Variables::new();
        vars.insert("c".to_string(), Quantite::nombre(3.0));
        let q = evaluer(&analyser_expression("2 c").unwrap(), &vars).unwrap();
        assert_eq!(q.valeur(), 6.0);
    }

    #[test]
    fn symbole_inconnu() {
        assert_eq!(
            eval("3 zorglub").unwrap_err(),
            Erreur::SymboleInconnu("zorglub".into())
        );
    }

    #[test]
    fn erreurs_dimensionnelles() {
        assert!(matches!(eval("1 km + 1 s"), Err(Erreur::Dimensions { .. })));
        assert!(matches!(eval("2^(1 km)"), Err(Erreur::Dimensions { .. })));
        assert!(matches!(eval("(3 km)!"), Err(Erreur::Dimensions { .. })));
        assert!(matches!(eval("2.5!"), Err(Erreur::NonSupportee(_))));
        assert!(matches!(eval("(-1)!"), Err(Erreur::NonSupportee(_))));
        assert!(matches!(eval("171!"), Err(Erreur::NonSupportee(_))));
        assert!(matches!(eval("1 km^pi"), Err(Erreur::NonSupportee(_))));
        assert_eq!(eval("1 / 0").unwrap_err(), Erreur::DivisionParZero);
        assert_eq!(eval("0^-1").unwrap_err(), Erreur::DivisionParZero);
    }

    #[test]
    fn expressions_d_unite() {
        let u = unite("erg / (cm2 K4 s)").unwrap();
        assert_eq!(u.dim(), Dimension::entiers([0, 1, -3, -4, 0, 0, 0, 0]));
        assert_eq!(unite("1 / mol").unwrap().symbole(), "1 / mol");
        assert_eq!(
            unite("cm^(1/2)").unwrap().dim().exposant(Base::Longueur),
            num_rational::Rational32::new(1, 2)
        );
        assert_eq!(unite("M_sun").unwrap().symbole(), "M_sun");
    }

    #[test]
    fn puissance_d_une_constante_longueur() {
        let pc = constantes::chercher("pc").unwrap().quantite().valeur_cgs();

        let q = eval("1 pc2").unwrap();
        assert_eq!(q.dim(), Dimension::base(Base::Longueur, 2));
        assert!(((q.valeur_cgs() - pc * pc) / (pc * pc)).abs() < 1e-12);
        assert_eq!(q.unite().symbole(), "pc2");

        let u = unite("pc3").unwrap();
        assert_eq!(u.dim(), Dimension::base(Base::Longueur, 3));
        assert!(((u.echelle() - pc.powi(3)) / pc.powi(3)).abs() < 1e-12);

        assert_eq!(eval("1 au2").unwrap().dim(), Dimension::base(Base::Longueur, 2));
        // constante sans dimension : pas de suffixe
        assert_eq!(eval("pi2").unwrap_err(), Erreur::SymboleInconnu("pi2".into()));
    }

    #[test]
    fn projection_sur_un_systeme() {
        let esu = eval("e.esu").unwrap();
        assert_eq!(esu.unite().symbole(), "statC");
        assert!((esu.valeur() - 4.803_204_712_570_263e-10).abs() < 1e-18);

        let si = eval("e.si").unwrap();
        assert_eq!(si.unite().symbole(), "C");
        assert!((si.valeur() - 1.602_176_634e-19).abs() < 1e-28);

        assert_eq!(eval("G.cgs").unwrap().valeur_cgs(), eval("G").unwrap().valeur_cgs());
        assert_eq!(eval("e.mks").unwrap_err(), Erreur::SymboleInconnu(".mks".into()));
        assert_eq!(eval("zorglub.si").unwrap_err(), Erreur::SymboleInconnu("zorglub".into()));
    }

    #[test]
    fn soustraction_dimensionnelle() {
        let d = eval("1 km - 1 m").unwrap();
        assert_eq!(d.dim(), Dimension::base(Base::Longueur, 1));
        assert!((d.valeur() - 0.999).abs() < 1e-12);
        assert_eq!(d.unite().symbole(), "km");
        assert!(matches!(eval("1 km - 1 s"), Err(Erreur::Dimensions { .. })));
        assert!(matches!(eval("G - c"), Err(Erreur::Dimensions { .. })));
    }

    #[test]
    fn expressions_d_unite_refusees() {
        assert!(matches!(unite("2 km"), Err(Erreur::NonSupportee(_))));
        assert!(matches!(unite("km + m"), Err(Erreur::NonSupportee(_))));
        assert!(matches!(unite("sqrt(km)"), Err(Erreur::NonSupportee(_))));
        assert_eq!(unite("furlong").unwrap_err(), Erreur::SymboleInconnu("furlong".into()));
        // constantes exclues en portée restreinte
        let e = analyser_expression("M_sun").unwrap();
        assert!(evaluer_unite(&e, Portee::UnitesSeules).is_err());
    }
}
