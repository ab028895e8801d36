//! Noyau: calculatrice physique à unités
//!
//! Organisation interne :
//! - erreur.rs        : taxonomie des erreurs (une par instruction)
//! - dimension.rs     : vecteur de dimension (exposants rationnels)
//! - unites.rs        : registre des unités + Unite (termes, dimension, échelle)
//! - quantite.rs      : valeur + unité, arithmétique dimensionnelle
//! - constantes.rs    : registre des constantes (CODATA / IAU)
//! - jetons.rs        : tokenisation
//! - juxtaposition.rs : multiplication implicite
//! - analyse.rs       : descente récursive -> Expr / Instruction
//! - fonctions.rs     : sqrt, trigo, exp/log…
//! - eval.rs          : évaluation (variables, constantes, unités)
//! - conversion.rs    : SI / CGS / unité cible
//! - format.rs        : chiffres significatifs + symboles d’unités
//! - reglages.rs      : chiffres, système mis en avant
//! - session.rs       : pipeline complet d’une ligne

pub mod analyse;
pub mod constantes;
pub mod conversion;
pub mod dimension;
pub mod erreur;
pub mod eval;
pub mod expr;
pub mod fonctions;
pub mod format;
pub mod jetons;
pub mod juxtaposition;
pub mod quantite;
pub mod reglages;
pub mod session;
pub mod unites;

#[cfg(test)]
mod tests_scenarios;

#[cfg(test)]
mod tests_fuzz_safe;

#[cfg(test)]
mod tests_proprietes;

// API publique minimale (frontaux)
pub use conversion::convertir_texte;
pub use reglages::{Reglages, Systeme};
pub use session::{Resultat, Session, Sortie};
