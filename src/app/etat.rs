//! src/app/etat.rs
//!
//! État UI (sans vue).
//!
//! Rôle : contenir l’état de la calculatrice (entrée, unité choisie, résultats SI/CGS,
//! erreur, réglages, démarche, session) et offrir des opérations simples (C/CLR/AC/VAR)
//! sans logique d’affichage.
//!
//! Contrats :
//! - Aucune évaluation ici : la vue appelle le noyau, puis dépose le résultat.
//! - Actions déterministes, sans effet de bord caché.
//! - Chiffres bornés (1..=CHIFFRES_MAX).

use crate::noyau::reglages::{CHIFFRES_DEFAUT, CHIFFRES_MAX};
use crate::noyau::{Reglages, Session, Systeme};

#[derive(Clone, Default, Debug)]
pub struct Demarche {
    pub jetons: String,
    pub expression: String,
    pub variables: String,
}

#[derive(Clone, Debug)]
pub struct AppCalc {
    // --- entrée utilisateur ---
    pub entree: String,
    pub unite_utilisateur: String, // ex: "km/s", vide = pas de conversion

    // --- sorties ---
    pub expression: String,  // forme normalisée de la ligne
    pub si: String,          // résultat en unités SI (ou fiche de constante)
    pub cgs: String,         // résultat en unités CGS
    pub utilisateur: String, // résultat dans l’unité choisie
    pub erreur: String,

    // --- démarche (panneau d’explication) ---
    pub demarche: Demarche,

    // --- paramètres ---
    pub chiffres: usize,
    pub systeme: Systeme,

    // --- variables + dernier résultat ---
    pub session: Session,

    // --- UX ---
    // Permet à vue.rs de redonner le focus à l’entrée après un clic sur un bouton.
    pub focus_entree: bool,
}

impl Default for AppCalc {
    fn default() -> Self {
        Self {
            entree: String::new(),
            unite_utilisateur: String::new(),
            expression: String::new(),
            si: String::new(),
            cgs: String::new(),
            utilisateur: String::new(),
            erreur: String::new(),
            demarche: Demarche::default(),
            chiffres: CHIFFRES_DEFAUT,
            systeme: Systeme::default(),
            session: Session::new(),
            focus_entree: true, // au lancement, on veut pouvoir taper tout de suite
        }
    }
}

impl AppCalc {
    pub fn reglages(&self) -> Reglages {
        Reglages::default()
            .avec_chiffres(self.chiffres)
            .avec_systeme(self.systeme)
    }

    /* ------------------------ Actions “boutons” (état seulement) ------------------------ */

    /// AC : remise à zéro totale (entrée + résultats + variables + réglages par défaut).
    pub fn reset_total(&mut self) {
        self.entree.clear();
        self.unite_utilisateur.clear();
        self.clear_resultats();
        self.session.reinitialiser();
        self.chiffres = CHIFFRES_DEFAUT;
        self.systeme = Systeme::default();
        self.focus_entree = true;
    }

    /// C : effacer seulement l’entrée (sans toucher aux résultats).
    pub fn clear_entree(&mut self) {
        self.entree.clear();
        self.focus_entree = true;
    }

    /// VAR : oublier variables et dernier résultat.
    pub fn oublier_variables(&mut self) {
        self.session.reinitialiser();
        self.demarche.variables.clear();
        self.focus_entree = true;
    }

    fn clear_demarche(&mut self) {
        self.demarche = Demarche::default();
    }

    /// CLR : effacer résultats + erreur + démarche (sans toucher à l’entrée).
    pub fn clear_resultats(&mut self) {
        self.expression.clear();
        self.si.clear();
        self.cgs.clear();
        self.utilisateur.clear();
        self.erreur.clear();
        self.clear_demarche();
        self.focus_entree = true;
    }

    /// Utilitaire : placer une erreur.
    ///
    /// Choix UX :
    /// - On CONSERVE les résultats précédents pour ne pas “effacer l’écran” sur une faute.
    /// - La démarche ne décrit plus rien de valide : on l’efface.
    pub fn set_erreur(&mut self, msg: impl Into<String>) {
        self.erreur = msg.into();
        self.clear_demarche();
        self.focus_entree = true;
    }

    /// Utilitaire : déposer un résultat complet.
    pub fn set_resultats(
        &mut self,
        expression: impl Into<String>,
        si: impl Into<String>,
        cgs: impl Into<String>,
        utilisateur: Option<String>,
        demarche: Demarche,
    ) {
        self.erreur.clear();
        self.expression = expression.into();
        self.si = si.into();
        self.cgs = cgs.into();
        self.utilisateur = utilisateur.unwrap_or_default();
        self.demarche = demarche;
        self.focus_entree = true;
    }

    /// Garde-fou : borne les chiffres significatifs.
    pub fn set_chiffres(&mut self, chiffres: usize) {
        self.chiffres = chiffres.clamp(1, CHIFFRES_MAX);
        self.focus_entree = true;
    }

    pub fn set_systeme(&mut self, systeme: Systeme) {
        self.systeme = systeme;
        self.focus_entree = true;
    }

    /// Résultat mis en avant selon le système choisi.
    pub fn principal(&self) -> &str {
        match self.systeme {
            Systeme::Si => &self.si,
            Systeme::Cgs => &self.cgs,
        }
    }
}
