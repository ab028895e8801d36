// src/app/vue.rs
//
// Vue (UI egui): natif + web
// ---------------------------
// Objectifs :
// - Même AppCalc (etat.rs) pour natif + wasm
// - Clavier : Enter évalue, Backspace efface (quand le champ est focus)
// - Tactile : gros boutons, focus redonné après clic (focus_entree)
// - Boutons constantes / unités (saisie sans clavier sur mobile)
//
// Note :
// - PAS de Key::NumEnter (n’existe pas dans egui 0.33.x)
// - Enter suffit (clavier PC + “Enter” virtuel mobile selon navigateur)

use eframe::egui;

use super::etat::{AppCalc, Demarche};
use crate::noyau::constantes;
use crate::noyau::fonctions::noms_fonctions;
use crate::noyau::format::formater_quantite;
use crate::noyau::reglages::CHIFFRES_MAX;
use crate::noyau::unites::symboles_connus;
use crate::noyau::{convertir_texte, Systeme};

/// Motifs retirés d’un coup par DEL.
const MOTIFS_DEL: &[&str] = &[
    "sqrt(", "sin(", "cos(", "exp(", "log10(", "M_sun", "m_e", "m_p", "k_B", "au", "pc",
];

impl AppCalc {
    /// UI principale : à appeler depuis eframe::App::update(...)
    pub fn ui(&mut self, ui: &mut egui::Ui) {
        // Densité “calc”
        ui.spacing_mut().item_spacing = egui::vec2(6.0, 6.0);

        egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                ui.heading("Calculatrice astro");
                ui.add_space(6.0);

                self.ui_entree(ui);

                ui.add_space(8.0);
                ui.separator();
                ui.add_space(8.0);

                self.ui_resultats(ui);

                ui.add_space(8.0);
                ui.separator();
                ui.add_space(8.0);

                self.ui_demarche(ui);
                self.ui_aide(ui);
            });
    }

    fn ui_entree(&mut self, ui: &mut egui::Ui) {
        ui.label("Entrée :");

        // IMPORTANT : id stable + focus contrôlé
        let resp = ui.add(
            egui::TextEdit::singleline(&mut self.entree)
                .desired_width(ui.available_width())
                .hint_text("Ex: sqrt(G M_sun / au), M = 1.4 M_sun, m_e c^2")
                .id_source("entree_edit")
                .code_editor(),
        );

        // Si on a cliqué un bouton, on redonne le focus
        if self.focus_entree {
            resp.request_focus();
            self.focus_entree = false;
        }

        // --- Clavier : Enter évalue (seulement si le champ est focus) ---
        let enter = ui.input(|i| i.key_pressed(egui::Key::Enter));
        if resp.has_focus() && enter {
            self.eval_via_noyau();
            self.focus_entree = true;
        }

        // --- Clavier : Backspace (seulement si le champ est focus) ---
        let backspace = ui.input(|i| i.key_pressed(egui::Key::Backspace));
        if resp.has_focus() && backspace {
            self.backspace_entree();
            self.focus_entree = true;
        }

        ui.add_space(4.0);
        ui.horizontal(|ui| {
            ui.label("Unité :");
            let resp = ui.add(
                egui::TextEdit::singleline(&mut self.unite_utilisateur)
                    .desired_width(180.0)
                    .hint_text("km/s, MeV, M_sun…")
                    .id_source("unite_edit")
                    .code_editor(),
            );
            let enter = ui.input(|i| i.key_pressed(egui::Key::Enter));
            if resp.lost_focus() && enter {
                self.eval_via_noyau();
                self.focus_entree = true;
            }
        });

        ui.add_space(6.0);

        // Actions + réglages
        ui.horizontal(|ui| {
            // Contrat: C = entrée ; CLR = résultats ; VAR = variables ; AC = tout
            self.bouton_action(ui, "C", "Efface seulement l’entrée", Action::ClearEntree);
            self.bouton_action(
                ui,
                "CLR",
                "Efface résultats + erreur + démarche",
                Action::ClearResultats,
            );
            self.bouton_action(ui, "VAR", "Oublie les variables", Action::OublierVariables);
            self.bouton_action(ui, "AC", "Remise à zéro totale", Action::ResetTotal);

            ui.separator();

            let mut d = self.chiffres as u32;
            let resp = ui.add(
                egui::DragValue::new(&mut d)
                    .speed(1)
                    .range(1..=CHIFFRES_MAX as u32)
                    .suffix(" chiffres"),
            );
            if resp.changed() {
                self.set_chiffres(d as usize);
            }

            let mut systeme = self.systeme;
            ui.selectable_value(&mut systeme, Systeme::Si, "SI");
            ui.selectable_value(&mut systeme, Systeme::Cgs, "CGS");
            if systeme != self.systeme {
                self.set_systeme(systeme);
            }
        });

        ui.add_space(8.0);

        // Touches rapides + "="
        ui.horizontal_wrapped(|ui| {
            self.bouton_insert(ui, "(", "(", InsertKind::OpenParen);
            self.bouton_insert(ui, ")", ")", InsertKind::CloseParen);

            self.bouton_insert(ui, "+", "+", InsertKind::Op);
            self.bouton_insert(ui, "-", "-", InsertKind::Op);
            self.bouton_insert(ui, "*", "*", InsertKind::Op);
            self.bouton_insert(ui, "/", "/", InsertKind::Op);
            self.bouton_insert(ui, "^", "^", InsertKind::Op);
            self.bouton_insert(ui, ",", ",", InsertKind::Op);

            ui.separator();

            self.bouton_insert(ui, "sqrt", "sqrt(", InsertKind::Func);
            self.bouton_insert(ui, "sin", "sin(", InsertKind::Func);
            self.bouton_insert(ui, "cos", "cos(", InsertKind::Func);
            self.bouton_insert(ui, "exp", "exp(", InsertKind::Func);
            self.bouton_insert(ui, "log10", "log10(", InsertKind::Func);

            ui.add_space(10.0);

            let eq = ui.add_sized([64.0, 32.0], egui::Button::new("="));
            if eq.clicked() {
                self.eval_via_noyau();
                self.focus_entree = true;
            }
        });

        ui.horizontal_wrapped(|ui| {
            ui.label("Constantes :");
            for c in ["G", "c", "h", "k_B", "m_e", "m_p", "M_sun", "R_sun", "L_sun", "au", "pc"] {
                self.bouton_insert(ui, c, c, InsertKind::Word);
            }
        });

        ui.horizontal_wrapped(|ui| {
            ui.label("Unités :");
            for u in ["km", "s", "yr", "g", "K", "eV", "erg", "Jy", "arcsec"] {
                self.bouton_insert(ui, u, u, InsertKind::Word);
            }
        });

        ui.add_space(8.0);

        // Pavé numérique
        self.ui_pave_numerique(ui);

        if !self.erreur.is_empty() {
            ui.add_space(6.0);
            ui.colored_label(ui.visuals().error_fg_color, &self.erreur);
        }
    }

    fn ui_pave_numerique(&mut self, ui: &mut egui::Ui) {
        egui::Grid::new("pave_numerique_astro")
            .num_columns(4)
            .spacing([6.0, 6.0])
            .show(ui, |ui| {
                self.bouton_insert(ui, "7", "7", InsertKind::Digit);
                self.bouton_insert(ui, "8", "8", InsertKind::Digit);
                self.bouton_insert(ui, "9", "9", InsertKind::Digit);
                self.bouton_action(ui, "DEL", "Efface le dernier symbole", Action::Backspace);
                ui.end_row();

                self.bouton_insert(ui, "4", "4", InsertKind::Digit);
                self.bouton_insert(ui, "5", "5", InsertKind::Digit);
                self.bouton_insert(ui, "6", "6", InsertKind::Digit);
                self.bouton_insert(ui, "=", "=", InsertKind::Op);
                ui.end_row();

                self.bouton_insert(ui, "1", "1", InsertKind::Digit);
                self.bouton_insert(ui, "2", "2", InsertKind::Digit);
                self.bouton_insert(ui, "3", "3", InsertKind::Digit);
                self.bouton_insert(ui, ".", ".", InsertKind::Digit);
                ui.end_row();

                self.bouton_insert(ui, "0", "0", InsertKind::Digit);
                self.bouton_insert(ui, "e", "e", InsertKind::Digit);
                ui.label("");
                ui.label("");
                ui.end_row();
            });
    }

    /// Backspace “intelligent” : retire d’un coup les motifs utiles ("sqrt(", "M_sun", etc.).
    fn backspace_entree(&mut self) {
        if self.entree.is_empty() {
            return;
        }

        while self.entree.ends_with(' ') {
            self.entree.pop();
        }

        for pat in MOTIFS_DEL {
            if self.entree.ends_with(pat) {
                for _ in 0..pat.chars().count() {
                    self.entree.pop();
                }
                while self.entree.ends_with(' ') {
                    self.entree.pop();
                }
                return;
            }
        }

        // Sinon : un caractère
        self.entree.pop();
        while self.entree.ends_with(' ') {
            self.entree.pop();
        }
    }

    fn ui_resultats(&mut self, ui: &mut egui::Ui) {
        ui.label("Entrée analysée :");
        Self::champ_monospace(ui, "expression_out", &self.expression, 1);

        ui.add_space(6.0);

        // Le système choisi d’abord
        let (premier, second) = match self.systeme {
            Systeme::Si => (("SI", &self.si), ("CGS", &self.cgs)),
            Systeme::Cgs => (("CGS", &self.cgs), ("SI", &self.si)),
        };
        for (titre, contenu) in [premier, second] {
            ui.label(format!("{titre} :"));
            Self::champ_monospace(ui, titre, contenu, 1);
            ui.add_space(4.0);
        }

        if !self.unite_utilisateur.trim().is_empty() {
            ui.label(format!("En {} :", self.unite_utilisateur.trim()));
            Self::champ_monospace(ui, "utilisateur_out", &self.utilisateur, 1);
        }
    }

    fn ui_demarche(&mut self, ui: &mut egui::Ui) {
        egui::CollapsingHeader::new("Démarche")
            .default_open(false)
            .show(ui, |ui| {
                Self::champ_demarche(ui, "Jetons", "demarche_jetons", &self.demarche.jetons);
                Self::champ_demarche(
                    ui,
                    "Expression",
                    "demarche_expression",
                    &self.demarche.expression,
                );
                Self::champ_demarche(
                    ui,
                    "Variables",
                    "demarche_variables",
                    &self.demarche.variables,
                );
            });
    }

    fn ui_aide(&mut self, ui: &mut egui::Ui) {
        egui::CollapsingHeader::new("Aide")
            .default_open(false)
            .show(ui, |ui| {
                ui.label("Plusieurs instructions : séparées par , ou ;");
                ui.label("Affectation : M = 1.4 M_sun");
                ui.label("Conversion du résultat précédent : in km/s");
                ui.label("Projection d’une constante : e.esu, h.si, G.cgs ; puissances : pc2, au3");
                Self::champ_demarche(ui, "Constantes", "aide_constantes", &liste_constantes());
                Self::champ_demarche(ui, "Unités", "aide_unites", &symboles_connus().join(" "));
                Self::champ_demarche(ui, "Fonctions", "aide_fonctions", &noms_fonctions().join(" "));
            });
    }

    fn champ_demarche(ui: &mut egui::Ui, titre: &str, id: &str, contenu: &str) {
        ui.add_space(4.0);
        ui.label(format!("{titre} :"));
        Self::champ_monospace(ui, id, contenu, 2);
    }

    fn champ_monospace(ui: &mut egui::Ui, id: &str, contenu: &str, rows: usize) {
        // Affichage lecture seule “stable”, sans TextEdit interactif.
        egui::Frame::group(ui.style())
            .fill(ui.visuals().extreme_bg_color)
            .show(ui, |ui| {
                ui.push_id(id, |ui| {
                    ui.set_min_width(ui.available_width());
                    ui.set_min_height(
                        rows as f32 * ui.text_style_height(&egui::TextStyle::Monospace),
                    );
                    ui.monospace(contenu);
                });
            });
    }

    fn bouton_action(&mut self, ui: &mut egui::Ui, label: &str, tip: &str, action: Action) {
        let resp = ui
            .add_sized([56.0, 30.0], egui::Button::new(label))
            .on_hover_text(tip);

        if resp.clicked() {
            match action {
                Action::ClearEntree => self.clear_entree(),
                Action::ClearResultats => self.clear_resultats(),
                Action::OublierVariables => self.oublier_variables(),
                Action::ResetTotal => self.reset_total(),
                Action::Backspace => self.backspace_entree(),
            }
            self.focus_entree = true;
        }
    }

    fn bouton_insert(&mut self, ui: &mut egui::Ui, label: &str, to_insert: &str, kind: InsertKind) {
        let resp = ui.add_sized([46.0, 28.0], egui::Button::new(label));
        if !resp.clicked() || to_insert.is_empty() {
            return;
        }

        match kind {
            InsertKind::CloseParen => {
                while self.entree.ends_with(' ') {
                    self.entree.pop();
                }
                self.entree.push_str(to_insert);
            }
            InsertKind::OpenParen | InsertKind::Func | InsertKind::Word => {
                // multiplication implicite : un espace suffit ("2 G", "M_sun au")
                if !self.entree.is_empty() && !self.entree.ends_with(char::is_whitespace) {
                    let last = self.entree.chars().rev().find(|c| !c.is_whitespace());
                    if let Some(c) = last {
                        if c.is_ascii_alphanumeric() || c == '_' || c == ')' {
                            self.entree.push(' ');
                        }
                    }
                }
                self.entree.push_str(to_insert);
            }
            InsertKind::Op => {
                while self.entree.ends_with(' ') {
                    self.entree.pop();
                }
                if !self.entree.is_empty() {
                    self.entree.push(' ');
                }
                self.entree.push_str(to_insert);
                self.entree.push(' ');
            }
            InsertKind::Digit => {
                // chiffres: pas d’espaces auto
                self.entree.push_str(to_insert);
            }
        }

        self.focus_entree = true;
    }

    /// Entrée vide : le dernier résultat est ré-exprimé dans l’unité choisie.
    fn convertir_dernier(&mut self) {
        let unite = self.unite_utilisateur.trim().to_string();
        let chiffres = self.reglages().chiffres_effectifs();
        let res = match self.session.dernier_resultat() {
            Some(q) if !unite.is_empty() => convertir_texte(q, &unite),
            _ => {
                self.set_erreur("Entrée vide");
                return;
            }
        };
        match res {
            Ok(q) => {
                self.erreur.clear();
                self.utilisateur = formater_quantite(&q, chiffres);
            }
            Err(e) => self.set_erreur(format!("unité « {unite} » : {e}")),
        }
        self.focus_entree = true;
    }

    /// Évalue la ligne via la session, puis dépose SI/CGS/unité choisie/démarche dans l’état UI.
    fn eval_via_noyau(&mut self) {
        let ligne = self.entree.trim().to_string();
        if ligne.is_empty() {
            self.convertir_dernier();
            return;
        }

        let reglages = self.reglages();
        let r = match self.session.evaluer_ligne(&ligne, &reglages) {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!(erreur = %e, "ligne refusée");
                self.set_erreur(e.to_string());
                return;
            }
        };

        let unite = self.unite_utilisateur.trim().to_string();
        let utilisateur = if unite.is_empty() {
            Ok(None)
        } else {
            convertir_texte(r.quantite(), &unite)
                .map(|q| Some(formater_quantite(&q, reglages.chiffres_effectifs())))
        };

        let variables = self
            .session
            .variables()
            .iter()
            .map(|(nom, q)| format!("{nom} = {q}"))
            .collect::<Vec<_>>()
            .join("\n");

        let demarche = Demarche {
            jetons: r.jetons.clone(),
            expression: r.expression.clone(),
            variables,
        };

        match utilisateur {
            Ok(u) => self.set_resultats(r.expression.clone(), r.si(), r.cgs(), u, demarche),
            Err(e) => {
                self.set_resultats(r.expression.clone(), r.si(), r.cgs(), None, demarche);
                self.erreur = format!("unité « {unite} » : {e}");
            }
        }
    }
}

#[derive(Clone, Copy, Debug)]
enum Action {
    ClearEntree,
    ClearResultats,
    OublierVariables,
    ResetTotal,
    Backspace,
}

#[derive(Clone, Copy, Debug)]
enum InsertKind {
    Digit,
    Word,
    Func,
    Op,
    OpenParen,
    CloseParen,
}

/// "nom  description (référence)", une constante par ligne.
fn liste_constantes() -> String {
    constantes::noms()
        .into_iter()
        .filter_map(constantes::chercher)
        .map(|c| {
            if c.reference().is_empty() {
                format!("{:<9} {}", c.nom(), c.description())
            } else {
                format!("{:<9} {} ({})", c.nom(), c.description(), c.reference())
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}
