// src/noyau/analyse.rs
//
// Analyse syntaxique (descente récursive) : jetons -> Expr / Instruction.
//
// Priorités (de la plus faible à la plus forte):
//   + -            (binaire, gauche)
//   - +            (unaire : -a*b = -(a*b), -2^2 = -4)
//   * /            (explicites, gauche ; l’opérande peut porter un signe : a * -b)
//   juxtaposition  (gauche ; lie plus fort que * et / : "x / 2 y" = x/(2*y))
//   ^              (droite ; exposant signé accepté : c^-2)
//   !              (postfixe)
//   atomes         (nombre, symbole, appel, parenthèses)
//
// Instructions:
//   nom = expr     (affectation ; un seul '=' et un identifiant seul à gauche)
//   in <unité>     (conversion du résultat précédent)
//   expr

use std::fmt;

use super::erreur::{Erreur, Res};
use super::expr::{Expr, OpBinaire};
use super::fonctions::{est_fonction, Fonction};
use super::jetons::{tokenize, Tok};
use super::juxtaposition::resoudre;

/// Imbrication maximale (parenthèses, exposants en chaîne).
pub const PROFONDEUR_MAX: usize = 200;

/// Jetons maximum par instruction (borne la profondeur des arbres gauches).
pub const JETONS_MAX: usize = 4096;

#[derive(Clone, Debug, PartialEq)]
pub enum Instruction {
    Affectation { nom: String, expr: Expr },
    Expression(Expr),
    Conversion(Expr),
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instruction::Affectation { nom, expr } => write!(f, "{nom} = {expr}"),
            Instruction::Expression(e) => write!(f, "{e}"),
            Instruction::Conversion(u) => write!(f, "in {u}"),
        }
    }
}

/// Découpe une ligne en instructions sur ',' ';' et fin de ligne (hors parenthèses).
/// Les morceaux vides en fin de ligne sont ignorés ; ceux du milieu sont gardés
/// (l’analyse les refusera avec un numéro d’instruction exact).
pub fn decouper_instructions(texte: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut profondeur: i32 = 0;
    let mut debut = 0;

    for (i, c) in texte.char_indices() {
        match c {
            '(' => profondeur += 1,
            ')' => profondeur -= 1,
            ',' | ';' | '\n' if profondeur <= 0 => {
                out.push(&texte[debut..i]);
                debut = i + c.len_utf8();
            }
            _ => {}
        }
    }
    out.push(&texte[debut..]);

    while out.last().is_some_and(|s| s.trim().is_empty()) {
        out.pop();
    }
    out
}

/// Expression seule (pas d’affectation ni de conversion).
pub fn analyser_expression(texte: &str) -> Res<Expr> {
    let jetons = tokenize(texte)?;
    analyser_jetons(jetons)
}

/// Une instruction (un morceau de `decouper_instructions`).
pub fn analyser_instruction(texte: &str) -> Res<Instruction> {
    let jetons = tokenize(texte)?;
    if jetons.is_empty() {
        return Err(Erreur::syntaxe("instruction vide"));
    }

    // in <unité>
    if let [Tok::Ident(mot), reste @ ..] = jetons.as_slice() {
        if mot == "in" && !reste.is_empty() && reste[0] != Tok::Egal {
            let cible = analyser_jetons(reste.to_vec())?;
            return Ok(Instruction::Conversion(cible));
        }
    }

    let nb_egal = jetons.iter().filter(|t| **t == Tok::Egal).count();
    if nb_egal == 0 {
        return Ok(Instruction::Expression(analyser_jetons(jetons)?));
    }
    if nb_egal > 1 {
        return Err(Erreur::syntaxe("plusieurs '=' dans une instruction"));
    }

    match jetons.as_slice() {
        [Tok::Ident(nom), Tok::Egal, reste @ ..] => {
            if est_fonction(nom) {
                return Err(Erreur::syntaxe(format!("'{nom}' est une fonction réservée")));
            }
            if nom.contains('.') {
                return Err(Erreur::syntaxe(format!("'{nom}' : projection non affectable")));
            }
            if reste.is_empty() {
                return Err(Erreur::syntaxe(format!("affectation de '{nom}' sans valeur")));
            }
            let expr = analyser_jetons(reste.to_vec())?;
            Ok(Instruction::Affectation {
                nom: nom.clone(),
                expr,
            })
        }
        _ => Err(Erreur::syntaxe(
            "cible d'affectation invalide (un identifiant seul attendu avant '=')",
        )),
    }
}

/// Jetons bruts -> Expr (la juxtaposition est résolue ici).
pub fn analyser_jetons(jetons: Vec<Tok>) -> Res<Expr> {
    if jetons.len() > JETONS_MAX {
        return Err(Erreur::syntaxe("expression trop longue"));
    }
    let mut a = Analyseur::new(resoudre(jetons));
    let e = a.expression()?;
    match a.suivant() {
        None => Ok(e),
        Some(Tok::RPar) => Err(Erreur::syntaxe("parenthèse fermante sans ouvrante")),
        Some(Tok::Egal) => Err(Erreur::syntaxe("'=' inattendu")),
        Some(t) => Err(Erreur::syntaxe(format!("jeton inattendu: {}", decrire(t)))),
    }
}

fn decrire(t: &Tok) -> String {
    match t {
        Tok::Num(v) => format!("nombre {v}"),
        Tok::Ident(n) => format!("'{n}'"),
        Tok::Plus => "'+'".into(),
        Tok::Minus => "'-'".into(),
        Tok::Star => "'*'".into(),
        Tok::Slash => "'/'".into(),
        Tok::Caret => "'^'".into(),
        Tok::Bang => "'!'".into(),
        Tok::LPar => "'('".into(),
        Tok::RPar => "')'".into(),
        Tok::Virgule => "','".into(),
        Tok::Egal => "'='".into(),
        Tok::Juxt => "produit implicite".into(),
    }
}

struct Analyseur {
    jetons: Vec<Tok>,
    pos: usize,
    profondeur: usize,
}

impl Analyseur {
    fn new(jetons: Vec<Tok>) -> Self {
        Self {
            jetons,
            pos: 0,
            profondeur: 0,
        }
    }

    fn suivant(&self) -> Option<&Tok> {
        self.jetons.get(self.pos)
    }

    fn avancer(&mut self) -> Option<Tok> {
        let t = self.jetons.get(self.pos).cloned();
        if t.is_some() {
            self.pos += 1;
        }
        t
    }

    fn accepter(&mut self, attendu: &Tok) -> bool {
        if self.suivant() == Some(attendu) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn entrer(&mut self) -> Res<()> {
        self.profondeur += 1;
        if self.profondeur > PROFONDEUR_MAX {
            return Err(Erreur::syntaxe("expression trop imbriquée"));
        }
        Ok(())
    }

    fn sortir(&mut self) {
        self.profondeur -= 1;
    }

    // somme := signe (('+'|'-') signe)*
    fn expression(&mut self) -> Res<Expr> {
        self.entrer()?;
        let mut gauche = self.signe()?;
        loop {
            let op = match self.suivant() {
                Some(Tok::Plus) => OpBinaire::Add,
                Some(Tok::Minus) => OpBinaire::Sub,
                _ => break,
            };
            self.pos += 1;
            let droite = self.signe()?;
            gauche = Expr::binaire(op, gauche, droite);
        }
        self.sortir();
        Ok(gauche)
    }

    /// Préfixes '+'/'-' en boucle (pas de récursion), puis `suite`.
    fn prefixes(&mut self, suite: fn(&mut Self) -> Res<Expr>) -> Res<Expr> {
        let mut negatif = Vec::new();
        loop {
            match self.suivant() {
                Some(Tok::Minus) => negatif.push(true),
                Some(Tok::Plus) => negatif.push(false),
                _ => break,
            }
            self.pos += 1;
        }
        let mut e = suite(self)?;
        for n in negatif.into_iter().rev() {
            if n {
                e = Expr::neg(e);
            }
        }
        Ok(e)
    }

    // signe := ('-'|'+')* produit
    fn signe(&mut self) -> Res<Expr> {
        self.prefixes(Self::produit)
    }

    // produit := juxt (('*'|'/') ('-'|'+')* juxt)*
    fn produit(&mut self) -> Res<Expr> {
        let mut gauche = self.juxt()?;
        loop {
            let op = match self.suivant() {
                Some(Tok::Star) => OpBinaire::Mul,
                Some(Tok::Slash) => OpBinaire::Div,
                _ => break,
            };
            self.pos += 1;
            let droite = self.prefixes(Self::juxt)?;
            gauche = Expr::binaire(op, gauche, droite);
        }
        Ok(gauche)
    }

    // juxt := puissance (Juxt puissance)*
    fn juxt(&mut self) -> Res<Expr> {
        let mut gauche = self.puissance()?;
        while self.accepter(&Tok::Juxt) {
            let droite = self.puissance()?;
            gauche = Expr::binaire(OpBinaire::Mul, gauche, droite);
        }
        Ok(gauche)
    }

    // puissance := postfixe ('^' ('-'|'+')* puissance)?
    fn puissance(&mut self) -> Res<Expr> {
        let base = self.postfixe()?;
        if !self.accepter(&Tok::Caret) {
            return Ok(base);
        }
        self.entrer()?;
        let exposant = self.prefixes(Self::puissance)?;
        self.sortir();
        Ok(Expr::binaire(OpBinaire::Pow, base, exposant))
    }

    // postfixe := atome '!'*
    fn postfixe(&mut self) -> Res<Expr> {
        let mut e = self.atome()?;
        while self.accepter(&Tok::Bang) {
            e = Expr::Factorielle(Box::new(e));
        }
        Ok(e)
    }

    fn atome(&mut self) -> Res<Expr> {
        match self.avancer() {
            Some(Tok::Num(v)) => Ok(Expr::Nombre(v)),

            Some(Tok::Ident(nom)) => match Fonction::depuis_nom(&nom) {
                Some(f) => self.appel(nom, f),
                None => Ok(Expr::Symbole(nom)),
            },

            Some(Tok::LPar) => {
                if self.suivant() == Some(&Tok::RPar) {
                    return Err(Erreur::syntaxe("parenthèses vides"));
                }
                let e = self.expression()?;
                if !self.accepter(&Tok::RPar) {
                    return Err(Erreur::syntaxe("parenthèse non fermée"));
                }
                Ok(e)
            }

            Some(Tok::RPar) => Err(Erreur::syntaxe("opérande manquant avant ')'")),
            Some(t) => Err(Erreur::syntaxe(format!(
                "opérande attendu, trouvé {}",
                decrire(&t)
            ))),
            None => Err(Erreur::syntaxe("opérande manquant en fin d'expression")),
        }
    }

    fn appel(&mut self, nom: String, f: Fonction) -> Res<Expr> {
        if !self.accepter(&Tok::LPar) {
            return Err(Erreur::syntaxe(format!("'{nom}' doit être suivi de '('")));
        }
        let mut args = Vec::new();
        if self.suivant() != Some(&Tok::RPar) {
            args.push(self.expression()?);
            while self.accepter(&Tok::Virgule) {
                args.push(self.expression()?);
            }
        }
        if !self.accepter(&Tok::RPar) {
            return Err(Erreur::syntaxe(format!("parenthèse de '{nom}' non fermée")));
        }
        if args.len() != f.arite() {
            return Err(Erreur::syntaxe(format!(
                "'{nom}' attend {} argument(s), {} reçu(s)",
                f.arite(),
                args.len()
            )));
        }
        Ok(Expr::Appel(nom, args))
    }
}
