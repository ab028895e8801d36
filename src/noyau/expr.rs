// src/noyau/expr.rs
//
// AST d’une expression physique.
// - Nombre  : littéral (f64)
// - Symbole : variable, constante ou unité (résolu à l’évaluation, pas au parse)
// - Appel   : fonction connue (table dans fonctions.rs)
//
// L’affichage (Display) est la forme normalisée montrée à l’utilisateur :
// opérateurs explicites, parenthèses minimales mais fidèles à l’arbre.
//   "2 G M_sun / au"  -> "2*G*M_sun/au"
//   "m_e c^2"         -> "m_e*c^2"
//   "a b / c d"       -> "a*b/(c*d)"

use std::fmt;

use super::format::formater_repr;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OpBinaire {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
}

impl OpBinaire {
    fn symbole(self) -> &'static str {
        match self {
            OpBinaire::Add => " + ",
            OpBinaire::Sub => " - ",
            OpBinaire::Mul => "*",
            OpBinaire::Div => "/",
            OpBinaire::Pow => "^",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    Nombre(f64),
    Symbole(String),

    Neg(Box<Expr>),
    Binaire(OpBinaire, Box<Expr>, Box<Expr>),
    Appel(String, Vec<Expr>),
    Factorielle(Box<Expr>),
}

impl Expr {
    pub fn binaire(op: OpBinaire, a: Expr, b: Expr) -> Expr {
        Expr::Binaire(op, Box::new(a), Box::new(b))
    }

    pub fn neg(a: Expr) -> Expr {
        Expr::Neg(Box::new(a))
    }

    pub fn symbole(nom: &str) -> Expr {
        Expr::Symbole(nom.to_string())
    }

    /// Niveau de priorité pour l’affichage (plus grand = lie plus fort).
    fn niveau(&self) -> u8 {
        match self {
            Expr::Binaire(OpBinaire::Add | OpBinaire::Sub, _, _) => 1,
            Expr::Neg(_) => 2,
            Expr::Binaire(OpBinaire::Mul | OpBinaire::Div, _, _) => 3,
            Expr::Binaire(OpBinaire::Pow, _, _) => 5,
            Expr::Factorielle(_) => 6,
            Expr::Nombre(_) | Expr::Symbole(_) | Expr::Appel(_, _) => 7,
        }
    }
}

/// Littéral sans ".0" superflu : 2, 1.4, 6.674e-08.
fn litteral(v: f64) -> String {
    let s = formater_repr(v);
    match s.strip_suffix(".0") {
        Some(entier) => entier.to_string(),
        None => s,
    }
}

fn ecrire(f: &mut fmt::Formatter<'_>, e: &Expr, parentheses: bool) -> fmt::Result {
    if parentheses {
        write!(f, "({e})")
    } else {
        write!(f, "{e}")
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use Expr::*;
        match self {
            Nombre(v) => {
                let s = litteral(*v);
                // un littéral négatif n’apparaît que par construction directe
                if *v < 0.0 {
                    write!(f, "({s})")
                } else {
                    f.write_str(&s)
                }
            }
            Symbole(s) => f.write_str(s),

            Neg(a) => {
                f.write_str("-")?;
                ecrire(f, a, a.niveau() < 2)
            }

            Factorielle(a) => {
                ecrire(f, a, a.niveau() < 7)?;
                f.write_str("!")
            }

            Appel(nom, args) => {
                write!(f, "{nom}(")?;
                for (i, a) in args.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{a}")?;
                }
                f.write_str(")")
            }

            Binaire(op, a, b) => {
                let (pg, pd) = match op {
                    OpBinaire::Add => (a.niveau() < 1, b.niveau() <= 1),
                    OpBinaire::Sub => (a.niveau() < 1, b.niveau() <= 1),
                    OpBinaire::Mul | OpBinaire::Div => (a.niveau() < 3, b.niveau() <= 3),
                    // associatif à droite : a^b^c = a^(b^c)
                    OpBinaire::Pow => (a.niveau() <= 5, b.niveau() < 5),
                };
                ecrire(f, a, pg)?;
                f.write_str(op.symbole())?;
                ecrire(f, b, pd)
            }
        }
    }
}
