// src/noyau/juxtaposition.rs
//
// Multiplication implicite : "2 G M" = 2·G·M, "10 km" = 10·km, "(a)(b)" = (a)·(b).
//
// Un Juxt est inséré entre A et B quand:
// - A termine un terme : nombre, identifiant (hors fonction), ')', '!'
// - B commence un terme : nombre, identifiant, '('
//
// "sqrt(x)" n’a donc jamais de Juxt entre sqrt et '('.

use super::fonctions::est_fonction;
use super::jetons::Tok;

fn termine_un_terme(t: &Tok) -> bool {
    match t {
        Tok::Num(_) | Tok::RPar | Tok::Bang => true,
        Tok::Ident(nom) => !est_fonction(nom),
        _ => false,
    }
}

fn commence_un_terme(t: &Tok) -> bool {
    matches!(t, Tok::Num(_) | Tok::Ident(_) | Tok::LPar)
}

/// Ajoute les Juxt nécessaires. Idempotent : un flux déjà résolu ne change pas.
pub fn resoudre(jetons: Vec<Tok>) -> Vec<Tok> {
    let mut out: Vec<Tok> = Vec::with_capacity(jetons.len() * 2);
    for tok in jetons {
        if let Some(prec) = out.last() {
            if termine_un_terme(prec) && commence_un_terme(&tok) {
                out.push(Tok::Juxt);
            }
        }
        out.push(tok);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::noyau::jetons::{format_tokens, tokenize};

    fn r(s: &str) -> String {
        format_tokens(&resoudre(tokenize(s).unwrap()))
    }

    #[test]
    fn nombre_et_identifiants() {
        assert_eq!(r("2 G M"), "2 · G · M");
        assert_eq!(r("10 km"), "10 · km");
        assert_eq!(r("m_e c^2"), "m_e · c ^ 2");
    }

    #[test]
    fn parentheses() {
        assert_eq!(r("(a)(b)"), "( a ) · ( b )");
        assert_eq!(r("2(x)"), "2 · ( x )");
        assert_eq!(r("3! x"), "3 ! · x");
    }

    #[test]
    fn appel_de_fonction_sans_juxt() {
        assert_eq!(r("sqrt(2 G)"), "sqrt ( 2 · G )");
        assert_eq!(r("2 sqrt(x)"), "2 · sqrt ( x )");
    }

    #[test]
    fn operateurs_explicites_intacts() {
        assert_eq!(r("a * b / c - d"), "a * b / c - d");
        assert_eq!(r("x = 3"), "x = 3");
    }

    #[test]
    fn idempotent() {
        let une_fois = resoudre(tokenize("2 arcsec/radian (1 + x)").unwrap());
        let deux_fois = resoudre(une_fois.clone());
        assert_eq!(une_fois, deux_fois);
    }
}
