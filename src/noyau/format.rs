// src/noyau/format.rs
//
// Affichage : nombres (chiffres significatifs) + symboles d’unités.
//
// Contrats:
// - Déterministe : même entrée, même texte (aucun état caché).
// - Même liste de termes => même ordre de symboles, quel que soit le chemin de calcul.

use num_rational::Rational32;
use num_traits::Signed;

use super::quantite::Quantite;
use super::reglages::CHIFFRES_MAX;

/* ------------------------ Nombres ------------------------ */

fn non_fini(v: f64) -> String {
    if v.is_nan() {
        "nan".to_string()
    } else if v > 0.0 {
        "inf".to_string()
    } else {
        "-inf".to_string()
    }
}

/// Sépare "2.978e6" en ("2.978", 6).
fn decouper_sci(sci: &str) -> Option<(&str, i32)> {
    let (mantisse, exp) = sci.split_once('e')?;
    Some((mantisse, exp.parse().ok()?))
}

fn exposant_texte(exp: i32) -> String {
    let signe = if exp < 0 { '-' } else { '+' };
    format!("{signe}{:02}", exp.abs())
}

/// `chiffres` significatifs, notation fixe si l’exposant est “proche de 1”.
///
/// - 2.97847e6, 4  -> "2.978e+06"
/// - 0.510999, 4   -> "0.5110"
/// - 0, 4          -> "0.000"
pub fn formater_nombre(v: f64, chiffres: usize) -> String {
    let n = chiffres.clamp(1, CHIFFRES_MAX);
    if !v.is_finite() {
        return non_fini(v);
    }
    // pas de "-0.000"
    let v = if v == 0.0 { 0.0 } else { v };

    let sci = format!("{:.*e}", n - 1, v);
    let Some((mantisse, exp)) = decouper_sci(&sci) else {
        return sci;
    };

    if exp >= -4 && exp < n as i32 {
        let decimales = (n as i32 - 1 - exp) as usize;
        format!("{v:.decimales$}")
    } else {
        format!("{mantisse}e{}", exposant_texte(exp))
    }
}

/// Comme `formater_nombre`, zéros de fin retirés ("6.62607e-27").
pub fn formater_abrege(v: f64, chiffres: usize) -> String {
    let plein = formater_nombre(v, chiffres);
    let (mantisse, reste) = match plein.find('e') {
        Some(i) => plein.split_at(i),
        None => (plein.as_str(), ""),
    };
    if !mantisse.contains('.') {
        return plein.clone();
    }
    let mantisse = mantisse.trim_end_matches('0').trim_end_matches('.');
    format!("{mantisse}{reste}")
}

/// Forme la plus courte qui relit la même valeur ("6.62607015e-34", "299792458.0").
pub fn formater_repr(v: f64) -> String {
    if !v.is_finite() {
        return non_fini(v);
    }
    if v == 0.0 {
        return "0.0".to_string();
    }
    let sci = format!("{v:e}");
    let Some((mantisse, exp)) = decouper_sci(&sci) else {
        return sci;
    };
    if (-4..16).contains(&exp) {
        let mut s = format!("{v}");
        if !s.contains('.') {
            s.push_str(".0");
        }
        s
    } else {
        format!("{mantisse}e{}", exposant_texte(exp))
    }
}

/* ------------------------ Unités ------------------------ */

fn formater_terme(symbole: &str, e: Rational32) -> String {
    if e == Rational32::from_integer(1) {
        symbole.to_string()
    } else if e.is_integer() {
        format!("{symbole}{}", e.numer())
    } else {
        format!("{symbole}({}/{})", e.numer(), e.denom())
    }
}

/// Termes -> "cm2 g / s2", "g / (K4 s3)", "1 / s", "" (sans dimension).
///
/// Ordre: exposants positifs décroissants, puis négatifs par |exposant| décroissant.
/// À exposant égal, l’ordre reçu est conservé (tri stable).
pub fn formater_termes(termes: &[(String, Rational32)]) -> String {
    let mut num: Vec<&(String, Rational32)> = termes.iter().filter(|(_, e)| e.is_positive()).collect();
    let mut den: Vec<&(String, Rational32)> = termes.iter().filter(|(_, e)| e.is_negative()).collect();

    num.sort_by(|a, b| b.1.cmp(&a.1));
    den.sort_by(|a, b| a.1.cmp(&b.1));

    let num: Vec<String> = num.iter().map(|(s, e)| formater_terme(s, *e)).collect();
    let den: Vec<String> = den.iter().map(|(s, e)| formater_terme(s, -*e)).collect();

    match (num.is_empty(), den.len()) {
        (true, 0) => String::new(),
        (false, 0) => num.join(" "),
        (vide, n) => {
            let haut = if vide { "1".to_string() } else { num.join(" ") };
            let bas = if n == 1 {
                den[0].clone()
            } else {
                format!("({})", den.join(" "))
            };
            format!("{haut} / {bas}")
        }
    }
}

/// Valeur + symbole ("2.978e+06 cm / s"), ou valeur seule si sans unité.
pub fn formater_quantite(q: &Quantite, chiffres: usize) -> String {
    let valeur = formater_nombre(q.valeur(), chiffres);
    let symbole = q.unite().symbole();
    if symbole.is_empty() {
        valeur
    } else {
        format!("{valeur} {symbole}")
    }
}
