// src/noyau/session.rs
//
// Session interactive : variables + dernier résultat, évaluation ligne par ligne.
//
// Une ligne = plusieurs instructions (séparées par , ; ou fin de ligne),
// exécutées dans l’ordre. Échec partiel : les affectations déjà faites restent,
// l’erreur porte le numéro (1-based) et le texte de l’instruction fautive.
//
// États : Repos -> {Affectation | Evaluation | Conversion} -> Repos (toujours,
// même après une erreur).

use tracing::{debug, trace};

use super::analyse::{analyser_instruction, decouper_instructions, Instruction};
use super::constantes::{self, FicheConstante};
use super::conversion::{convertir, vers_cgs, vers_si};
use super::erreur::{Erreur, ErreurLigne, Res};
use super::eval::{evaluer, evaluer_unite, Portee, Variables};
use super::expr::Expr;
use super::format::formater_quantite;
use super::jetons::{format_tokens, tokenize};
use super::juxtaposition::resoudre;
use super::quantite::Quantite;
use super::reglages::{Reglages, Systeme};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum EtatSession {
    #[default]
    Repos,
    Affectation,
    Evaluation,
    Conversion,
}

/// Sortie de la DERNIÈRE instruction d’une ligne.
#[derive(Clone, Debug, PartialEq)]
pub enum Sortie {
    Valeur {
        quantite: Quantite,
        si: String,
        cgs: String,
    },
    /// Nom de constante tapé seul : fiche complète (SI) + ligne CGS.
    Constante {
        quantite: Quantite,
        fiche: FicheConstante,
        cgs: String,
    },
    Affectation {
        nom: String,
        quantite: Quantite,
        si: String,
        cgs: String,
    },
    Conversion {
        quantite: Quantite,
        texte: String,
    },
}

#[derive(Clone, Debug, PartialEq)]
pub struct Resultat {
    /// Forme normalisée de la ligne ("M = 1.4*M_sun, sqrt(2*G*M/R)").
    pub expression: String,
    /// Jetons après multiplication implicite (démarche).
    pub jetons: String,
    pub sortie: Sortie,
}

impl Resultat {
    pub fn quantite(&self) -> &Quantite {
        match &self.sortie {
            Sortie::Valeur { quantite, .. }
            | Sortie::Constante { quantite, .. }
            | Sortie::Affectation { quantite, .. }
            | Sortie::Conversion { quantite, .. } => quantite,
        }
    }

    pub fn si(&self) -> String {
        match &self.sortie {
            Sortie::Valeur { si, .. } | Sortie::Affectation { si, .. } => si.clone(),
            Sortie::Constante { fiche, .. } => fiche.to_string(),
            Sortie::Conversion { texte, .. } => texte.clone(),
        }
    }

    pub fn cgs(&self) -> String {
        match &self.sortie {
            Sortie::Valeur { cgs, .. }
            | Sortie::Affectation { cgs, .. }
            | Sortie::Constante { cgs, .. } => cgs.clone(),
            Sortie::Conversion { texte, .. } => texte.clone(),
        }
    }

    /// Texte mis en avant selon le système choisi.
    pub fn principal(&self, systeme: Systeme) -> String {
        match systeme {
            Systeme::Si => self.si(),
            Systeme::Cgs => self.cgs(),
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct Session {
    variables: Variables,
    dernier: Option<Quantite>,
    etat: EtatSession,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn etat(&self) -> EtatSession {
        self.etat
    }

    pub fn variable(&self, nom: &str) -> Option<&Quantite> {
        self.variables.get(nom)
    }

    /// Variables triées par nom.
    pub fn variables(&self) -> Vec<(&str, &Quantite)> {
        let mut v: Vec<(&str, &Quantite)> =
            self.variables.iter().map(|(k, q)| (k.as_str(), q)).collect();
        v.sort_by(|a, b| a.0.cmp(b.0));
        v
    }

    pub fn dernier_resultat(&self) -> Option<&Quantite> {
        self.dernier.as_ref()
    }

    /// Oublie variables et dernier résultat.
    pub fn reinitialiser(&mut self) {
        *self = Session::default();
    }

    fn passer(&mut self, etat: EtatSession) {
        trace!(de = ?self.etat, vers = ?etat, "transition");
        self.etat = etat;
    }

    /// Évalue une ligne complète.
    pub fn evaluer_ligne(&mut self, ligne: &str, reglages: &Reglages) -> Result<Resultat, ErreurLigne> {
        debug!(ligne, "évaluation");
        let instructions = decouper_instructions(ligne);

        let mut normalisees = Vec::with_capacity(instructions.len());
        let mut jetons = Vec::with_capacity(instructions.len());
        let mut derniere = None;

        for (i, brut) in instructions.iter().enumerate() {
            let res = self.executer(brut, reglages);
            self.passer(EtatSession::Repos);
            match res {
                Ok((norm, jet, sortie)) => {
                    debug!(numero = i + 1, instruction = %norm, "instruction appliquée");
                    normalisees.push(norm);
                    jetons.push(jet);
                    derniere = Some(sortie);
                }
                Err(source) => {
                    debug!(numero = i + 1, erreur = %source, "instruction refusée");
                    return Err(ErreurLigne {
                        numero: i + 1,
                        instruction: brut.trim().to_string(),
                        source,
                    });
                }
            }
        }

        let sortie = derniere.ok_or_else(|| ErreurLigne {
            numero: 1,
            instruction: String::new(),
            source: Erreur::syntaxe("entrée vide"),
        })?;

        Ok(Resultat {
            expression: normalisees.join(", "),
            jetons: jetons.join(" , "),
            sortie,
        })
    }

    fn executer(&mut self, brut: &str, reglages: &Reglages) -> Res<(String, String, Sortie)> {
        let instruction = analyser_instruction(brut)?;
        let norm = instruction.to_string();
        let jetons = format_tokens(&resoudre(tokenize(brut)?));
        let chiffres = reglages.chiffres_effectifs();

        let sortie = match instruction {
            Instruction::Affectation { nom, expr } => {
                self.passer(EtatSession::Affectation);
                let quantite = evaluer(&expr, &self.variables)?;
                self.variables.insert(nom.clone(), quantite.clone());
                self.dernier = Some(quantite.clone());
                Sortie::Affectation {
                    nom,
                    si: formater_quantite(&vers_si(&quantite), chiffres),
                    cgs: formater_quantite(&vers_cgs(&quantite), chiffres),
                    quantite,
                }
            }

            Instruction::Expression(expr) => {
                self.passer(EtatSession::Evaluation);
                let quantite = evaluer(&expr, &self.variables)?;
                self.dernier = Some(quantite.clone());
                match self.constante_seule(&expr) {
                    Some(c) => Sortie::Constante {
                        quantite,
                        fiche: c.fiche(),
                        cgs: c.texte_cgs(),
                    },
                    None => Sortie::Valeur {
                        si: formater_quantite(&vers_si(&quantite), chiffres),
                        cgs: formater_quantite(&vers_cgs(&quantite), chiffres),
                        quantite,
                    },
                }
            }

            Instruction::Conversion(cible) => {
                self.passer(EtatSession::Conversion);
                let source = self
                    .dernier
                    .as_ref()
                    .ok_or_else(|| Erreur::syntaxe("aucun résultat précédent à convertir"))?;
                let unite = evaluer_unite(&cible, Portee::UnitesEtConstantes)?;
                let quantite = convertir(source, &unite)?;
                self.dernier = Some(quantite.clone());
                Sortie::Conversion {
                    texte: formater_quantite(&quantite, chiffres),
                    quantite,
                }
            }
        };

        Ok((norm, jetons, sortie))
    }

    /// Nom de constante seul, non masqué par une variable.
    fn constante_seule(&self, expr: &Expr) -> Option<&'static constantes::Constante> {
        match expr {
            Expr::Symbole(nom) if !self.variables.contains_key(nom) => constantes::chercher(nom),
            _ => None,
        }
    }
}
