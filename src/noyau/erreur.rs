// src/noyau/erreur.rs
//
// Taxonomie des erreurs du noyau.
// Chaque instruction échoue avec UNE de ces variantes ; la session la rattrape
// à la frontière d’instruction (jamais de panique au-delà).

use thiserror::Error;

pub type Res<T> = std::result::Result<T, Erreur>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum Erreur {
    /// `pos` en octets depuis le début de l’instruction.
    #[error("caractère inattendu '{car}' (position {pos})")]
    Lexicale { pos: usize, car: char },

    #[error("syntaxe : {0}")]
    Syntaxe(String),

    #[error("symbole inconnu : {0}")]
    SymboleInconnu(String),

    #[error("dimensions incompatibles : '{gauche}' et '{droite}'")]
    Dimensions { gauche: String, droite: String },

    #[error("opération non supportée : {0}")]
    NonSupportee(String),

    #[error("division par zéro")]
    DivisionParZero,
}

impl Erreur {
    pub(crate) fn syntaxe(msg: impl Into<String>) -> Self {
        Erreur::Syntaxe(msg.into())
    }

    pub(crate) fn non_supportee(msg: impl Into<String>) -> Self {
        Erreur::NonSupportee(msg.into())
    }
}

/// Échec d’une instruction dans une ligne multi-instructions.
/// `numero` commence à 1 ; les instructions précédentes ont déjà été appliquées.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("instruction {numero} ({instruction}) : {source}")]
pub struct ErreurLigne {
    pub numero: usize,
    pub instruction: String,
    #[source]
    pub source: Erreur,
}
