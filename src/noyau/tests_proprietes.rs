//! Propriétés (quickcheck) : formatage, analyse, conversions.

use quickcheck::{QuickCheck, TestResult};

use super::analyse::analyser_expression;
use super::conversion::{convertir, convertir_texte, unite_depuis_texte, vers_cgs, vers_si};
use super::eval::Portee;
use super::format::{formater_nombre, formater_repr};
use super::jetons::tokenize;
use super::juxtaposition::resoudre;
use super::quantite::Quantite;
use super::reglages::Reglages;
use super::session::Session;
use super::unites::{chercher, symboles_connus, Unite};

/// Propriété : tokenize/analyse ne paniquent jamais, quelle que soit l’entrée
#[test]
fn prop_analyse_ne_panique_pas() {
    fn prop(s: String) -> TestResult {
        let _ = tokenize(&s);
        let _ = analyser_expression(&s);
        TestResult::passed()
    }

    QuickCheck::new()
        .tests(200)
        .quickcheck(prop as fn(String) -> TestResult);
}

/// Propriété : une session ne panique jamais et revient au repos
#[test]
fn prop_session_ne_panique_pas() {
    fn prop(s: String) -> TestResult {
        let mut session = Session::new();
        let _ = session.evaluer_ligne(&s, &Reglages::default());
        TestResult::from_bool(session.etat() == super::session::EtatSession::Repos)
    }

    QuickCheck::new()
        .tests(200)
        .quickcheck(prop as fn(String) -> TestResult);
}

/// Propriété : la multiplication implicite est idempotente
#[test]
fn prop_juxtaposition_idempotente() {
    fn prop(s: String) -> TestResult {
        let Ok(jetons) = tokenize(&s) else {
            return TestResult::discard();
        };
        let une = resoudre(jetons);
        let deux = resoudre(une.clone());
        TestResult::from_bool(une == deux)
    }

    QuickCheck::new()
        .tests(200)
        .quickcheck(prop as fn(String) -> TestResult);
}

/// Propriété : formater_repr relit exactement la même valeur
#[test]
fn prop_repr_relit_la_valeur() {
    fn prop(v: f64) -> TestResult {
        if !v.is_finite() {
            return TestResult::discard();
        }
        let relu: f64 = match formater_repr(v).parse() {
            Ok(x) => x,
            Err(_) => return TestResult::failed(),
        };
        TestResult::from_bool(relu == v || (relu == 0.0 && v == 0.0))
    }

    QuickCheck::new()
        .tests(300)
        .quickcheck(prop as fn(f64) -> TestResult);
}

/// Propriété : n chiffres significatifs => erreur relative <= 10^(1-n)
#[test]
fn prop_chiffres_significatifs() {
    fn prop(v: f64, n: u8) -> TestResult {
        let n = (n % 10) as usize + 1;
        if !v.is_finite() || v == 0.0 || v.abs() < 1e-300 || v.abs() > 1e300 {
            return TestResult::discard();
        }
        let Ok(relu) = formater_nombre(v, n).parse::<f64>() else {
            return TestResult::failed();
        };
        let tolerance = 10f64.powi(1 - n as i32);
        TestResult::from_bool(((relu - v) / v).abs() <= tolerance)
    }

    QuickCheck::new()
        .tests(300)
        .quickcheck(prop as fn(f64, u8) -> TestResult);
}

/// Unités du registre, leurs carrés et cubes, et quelques constantes-unités.
fn unites_de_reference() -> Vec<Unite> {
    let mut symboles: Vec<String> = Vec::new();
    for s in symboles_connus() {
        symboles.push(s.to_string());
        symboles.push(format!("{s}2"));
        symboles.push(format!("{s}3"));
    }
    symboles.extend(["pc", "pc2", "pc3", "au2", "kpc", "M_sun"].map(String::from));
    symboles
        .iter()
        .map(|s| {
            unite_depuis_texte(s, Portee::UnitesEtConstantes)
                .unwrap_or_else(|e| panic!("unité {s:?} : {e}"))
        })
        .collect()
}

/// Propriété : unité -> CGS -> unité rend la valeur de départ, pour toute unité connue
#[test]
fn prop_conversion_aller_retour() {
    fn prop(v: f64) -> TestResult {
        if !v.is_finite() || v.abs() > 1e100 || (v != 0.0 && v.abs() < 1e-100) {
            return TestResult::discard();
        }
        for u in unites_de_reference() {
            let q = Quantite::new(v, u.clone());
            let Ok(retour) = convertir(&vers_cgs(&q), &u) else {
                return TestResult::failed();
            };
            if (retour.valeur() - v).abs() > 1e-12 * v.abs() {
                return TestResult::error(format!("{}: {v} -> {}", u.symbole(), retour.valeur()));
            }
        }
        TestResult::passed()
    }

    QuickCheck::new()
        .tests(50)
        .quickcheck(prop as fn(f64) -> TestResult);
}

/// km -> m -> km par le texte
#[test]
fn conversion_texte_aller_retour() {
    let q = Quantite::new(1.5, chercher("km").unwrap());
    let m = convertir_texte(&q, "m").unwrap();
    assert!((m.valeur() - 1500.0).abs() < 1e-9);
    let retour = convertir_texte(&m, "km").unwrap();
    assert!((retour.valeur() - 1.5).abs() < 1e-12);
}

/// Propriété : SI et CGS décrivent la même grandeur
#[test]
fn prop_si_cgs_meme_grandeur() {
    fn prop(v: f64) -> TestResult {
        if !v.is_finite() || v.abs() > 1e200 {
            return TestResult::discard();
        }
        let Ok(u) = analyser_expression("erg / (cm2 s)") else {
            return TestResult::failed();
        };
        let Ok(unite) = super::eval::evaluer_unite(&u, Portee::UnitesSeules) else {
            return TestResult::failed();
        };
        let q = Quantite::new(v, unite);
        let si = vers_si(&q);
        let cgs = vers_cgs(&q);
        let ecart = (si.valeur_cgs() - cgs.valeur_cgs()).abs();
        TestResult::from_bool(si.dim() == cgs.dim() && ecart <= 1e-12 * v.abs().max(1e-300))
    }

    QuickCheck::new()
        .tests(200)
        .quickcheck(prop as fn(f64) -> TestResult);
}

/// Propriété : l’addition de longueurs commute (aux arrondis près)
#[test]
fn prop_addition_commute() {
    fn prop(a: i16, b: i16) -> TestResult {
        let ligne_ab = format!("{a} km + {b} m");
        let ligne_ba = format!("{b} m + {a} km");
        let reglages = Reglages::default();
        let (Ok(ab), Ok(ba)) = (
            Session::new().evaluer_ligne(&ligne_ab, &reglages),
            Session::new().evaluer_ligne(&ligne_ba, &reglages),
        ) else {
            return TestResult::failed();
        };
        let x = ab.quantite().valeur_cgs();
        let y = ba.quantite().valeur_cgs();
        TestResult::from_bool((x - y).abs() <= 1e-9 * x.abs().max(1.0))
    }

    QuickCheck::new()
        .tests(100)
        .quickcheck(prop as fn(i16, i16) -> TestResult);
}

/// Propriété : + et - ferment sur une dimension, refusent deux dimensions différentes
#[test]
fn prop_fermeture_dimensionnelle() {
    fn prop(a: i16, b: i16, soustraire: bool) -> TestResult {
        let op = if soustraire { "-" } else { "+" };
        let reglages = Reglages::default();
        let Ok(r) = Session::new().evaluer_ligne(&format!("{a} km {op} ({b} m)"), &reglages) else {
            return TestResult::failed();
        };
        if r.quantite().dim() != chercher("m").unwrap().dim() {
            return TestResult::failed();
        }
        let refus = Session::new().evaluer_ligne(&format!("{a} km {op} ({b} s)"), &reglages);
        TestResult::from_bool(matches!(
            refus.map_err(|e| e.source),
            Err(super::erreur::Erreur::Dimensions { .. })
        ))
    }

    QuickCheck::new()
        .tests(100)
        .quickcheck(prop as fn(i16, i16, bool) -> TestResult);
}
