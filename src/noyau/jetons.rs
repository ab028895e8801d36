// src/noyau/jetons.rs

use super::erreur::{Erreur, Res};

#[derive(Clone, Debug, PartialEq)]
pub enum Tok {
    Num(f64),

    // Constantes, variables, unités, fonctions : le parse décidera.
    // NOTE: la casse est conservée (M ≠ m, K ≠ k).
    Ident(String),

    Plus,
    Minus,
    Star,
    Slash,
    Caret, // ^ ou **
    Bang,  // ! (factorielle)

    LPar,
    RPar,

    Virgule, // , ; ou fin de ligne
    Egal,

    // Multiplication implicite : insérée par juxtaposition.rs, jamais par tokenize().
    Juxt,
}

fn debut_ident(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || c == 'µ'
}

fn suite_ident(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == 'µ'
}

/// Position en octets du caractère `i` (π, µ, √ en occupent plusieurs).
fn octet(chars: &[char], i: usize) -> usize {
    chars[..i].iter().map(|c| c.len_utf8()).sum()
}

/// Tokenize une chaîne en jetons.
/// Supporte:
/// - nombres décimaux et exponentiels (ex: 12, 1.4, .5, 6.674e-08)
/// - opérateurs + - * / ^ ** !
/// - parenthèses ( ), séparateurs , ; et fin de ligne, =
/// - identifiants [a-zA-Z_][a-zA-Z0-9_]* lus en entier (M_sun, sigma_sb, cm3)
/// - identifiant pointé pour une projection : e.esu, h.si, G.cgs
/// - π (= pi), √ (= sqrt), × (= *), µ (= u dans un identifiant : µm = um)
///
/// Erreur lexicale : position en octets dans `s`.
pub fn tokenize(s: &str) -> Res<Vec<Tok>> {
    let mut out = Vec::new();
    let chars: Vec<char> = s.chars().collect();
    let mut i: usize = 0;

    while i < chars.len() {
        let c = chars[i];

        if c == '\n' || c == ';' || c == ',' {
            out.push(Tok::Virgule);
            i += 1;
            continue;
        }

        if c.is_whitespace() {
            i += 1;
            continue;
        }

        // Opérateurs / ponctuation
        let simple = match c {
            '(' => Some(Tok::LPar),
            ')' => Some(Tok::RPar),
            '+' => Some(Tok::Plus),
            '-' | '−' => Some(Tok::Minus),
            '/' => Some(Tok::Slash),
            '^' => Some(Tok::Caret),
            '!' => Some(Tok::Bang),
            '=' => Some(Tok::Egal),
            '×' | '·' => Some(Tok::Star),
            'π' => Some(Tok::Ident("pi".to_string())),
            '√' => Some(Tok::Ident("sqrt".to_string())),
            _ => None,
        };
        if let Some(t) = simple {
            out.push(t);
            i += 1;
            continue;
        }

        // * ou ** (puissance, notation Python)
        if c == '*' {
            if i + 1 < chars.len() && chars[i + 1] == '*' {
                out.push(Tok::Caret);
                i += 2;
            } else {
                out.push(Tok::Star);
                i += 1;
            }
            continue;
        }

        // Identifiants : lecture la plus longue (M_sun ne se coupe jamais en M + _sun)
        if debut_ident(c) {
            let start = i;
            i += 1;
            while i < chars.len() && suite_ident(chars[i]) {
                i += 1;
            }
            // projection "e.esu", "h.si" : un seul identifiant pointé
            if i + 1 < chars.len() && chars[i] == '.' && debut_ident(chars[i + 1]) {
                i += 2;
                while i < chars.len() && suite_ident(chars[i]) {
                    i += 1;
                }
            }
            let word: String = chars[start..i]
                .iter()
                .map(|&c| if c == 'µ' { 'u' } else { c })
                .collect();
            out.push(Tok::Ident(word));
            continue;
        }

        // Nombre : 12, 1.4, .5, 6.674e-08
        let debut_nombre =
            c.is_ascii_digit() || (c == '.' && i + 1 < chars.len() && chars[i + 1].is_ascii_digit());
        if debut_nombre {
            let start = i;
            while i < chars.len() && chars[i].is_ascii_digit() {
                i += 1;
            }
            if i < chars.len() && chars[i] == '.' {
                i += 1;
                while i < chars.len() && chars[i].is_ascii_digit() {
                    i += 1;
                }
            }

            // exposant seulement si des chiffres suivent : "2e" = 2 puis e (charge élémentaire)
            if i < chars.len() && (chars[i] == 'e' || chars[i] == 'E') {
                let mut j = i + 1;
                if j < chars.len() && (chars[j] == '+' || chars[j] == '-') {
                    j += 1;
                }
                if j < chars.len() && chars[j].is_ascii_digit() {
                    while j < chars.len() && chars[j].is_ascii_digit() {
                        j += 1;
                    }
                    i = j;
                }
            }

            let txt: String = chars[start..i].iter().collect();
            let v: f64 = txt
                .parse()
                .map_err(|_| Erreur::Lexicale { pos: octet(&chars, start), car: c })?;
            out.push(Tok::Num(v));
            continue;
        }

        return Err(Erreur::Lexicale { pos: octet(&chars, i), car: c });
    }

    Ok(out)
}

/// Format utilitaire (debug/“démarche”) : liste de jetons en texte.
pub fn format_tokens(tokens: &[Tok]) -> String {
    let mut out = Vec::new();
    for t in tokens {
        let s = match t {
            Tok::Num(v) => format!("{v}"),
            Tok::Ident(name) => name.clone(),

            Tok::Plus => "+".to_string(),
            Tok::Minus => "-".to_string(),
            Tok::Star => "*".to_string(),
            Tok::Slash => "/".to_string(),
            Tok::Caret => "^".to_string(),
            Tok::Bang => "!".to_string(),

            Tok::LPar => "(".to_string(),
            Tok::RPar => ")".to_string(),
            Tok::Virgule => ",".to_string(),
            Tok::Egal => "=".to_string(),
            Tok::Juxt => "·".to_string(),
        };
        out.push(s);
    }
    out.join(" ")
}
