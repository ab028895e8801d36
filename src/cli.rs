// src/cli.rs
//
// Frontal ligne de commande (natif seulement).
//
//   calculatrice_astro "sqrt(G M_sun / au)" km/s
//   calculatrice_astro --repl
//   calculatrice_astro            (sans argument : fenêtre graphique)

use std::io::{self, BufRead, Write};
use std::process::ExitCode;

use clap::Parser;
use tracing::{debug, info, warn};

use crate::noyau::format::formater_quantite;
use crate::noyau::reglages::CHIFFRES_DEFAUT;
use crate::noyau::{convertir_texte, Reglages, Resultat, Session, Sortie, Systeme};

#[derive(Parser, Debug)]
#[command(
    name = "calculatrice_astro",
    version,
    about = "Calculatrice physique à unités (SI / CGS, constantes astronomiques)"
)]
pub struct Cli {
    /// Ligne à évaluer (ex: "M = 1.4 M_sun, sqrt(G M / (10 km))")
    pub expression: Option<String>,

    /// Unité de sortie supplémentaire (ex: km/s, MeV, M_sun)
    pub unite: Option<String>,

    /// Chiffres significatifs
    #[arg(short, long, default_value_t = CHIFFRES_DEFAUT)]
    pub chiffres: usize,

    /// Système mis en avant (si | cgs)
    #[arg(short, long, default_value = "si")]
    pub systeme: Systeme,

    /// Lecture interactive ligne par ligne (variables conservées)
    #[arg(long)]
    pub repl: bool,
}

impl Cli {
    /// Vrai si la ligne de commande demande un frontal texte.
    pub fn mode_texte(&self) -> bool {
        self.repl || self.expression.is_some()
    }

    pub fn reglages(&self) -> Reglages {
        Reglages::default()
            .avec_chiffres(self.chiffres)
            .avec_systeme(self.systeme)
    }
}

pub fn executer(cli: &Cli) -> ExitCode {
    let reglages = cli.reglages();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    let res = if cli.repl {
        info!("mode interactif");
        let stdin = io::stdin();
        repl(stdin.lock(), &mut out, &reglages)
    } else if let Some(expr) = &cli.expression {
        une_ligne(expr, cli.unite.as_deref(), &reglages, &mut out)
    } else {
        Ok(true)
    };

    match res {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("erreur d'écriture : {e}");
            ExitCode::FAILURE
        }
    }
}

/// Évaluation unique : entrée normalisée, SI, CGS, puis l’unité demandée.
/// Retourne Ok(false) si la ligne a échoué (message déjà écrit).
fn une_ligne(
    ligne: &str,
    unite: Option<&str>,
    reglages: &Reglages,
    out: &mut impl Write,
) -> io::Result<bool> {
    let mut session = Session::new();
    match session.evaluer_ligne(ligne, reglages) {
        Ok(r) => {
            afficher(&r, unite, reglages, out)?;
            Ok(true)
        }
        Err(e) => {
            warn!(erreur = %e, "ligne refusée");
            writeln!(out, "erreur : {e}")?;
            Ok(false)
        }
    }
}

fn afficher(
    r: &Resultat,
    unite: Option<&str>,
    reglages: &Reglages,
    out: &mut impl Write,
) -> io::Result<()> {
    writeln!(out, "entrée : {}", r.expression)?;
    match &r.sortie {
        Sortie::Constante { fiche, cgs, .. } => {
            writeln!(out, "{fiche}")?;
            writeln!(out, "CGS    : {cgs}")?;
        }
        Sortie::Conversion { texte, .. } => writeln!(out, "       = {texte}")?,
        Sortie::Valeur { si, cgs, .. } | Sortie::Affectation { si, cgs, .. } => {
            let (a, b) = match reglages.systeme {
                Systeme::Si => (("SI", si), ("CGS", cgs)),
                Systeme::Cgs => (("CGS", cgs), ("SI", si)),
            };
            writeln!(out, "{:<6} : {}", a.0, a.1)?;
            writeln!(out, "{:<6} : {}", b.0, b.1)?;
        }
    }

    if let Some(u) = unite.map(str::trim).filter(|u| !u.is_empty()) {
        match convertir_texte(r.quantite(), u) {
            Ok(q) => writeln!(out, "{:<6} : {}", u, formater_quantite(&q, reglages.chiffres_effectifs()))?,
            Err(e) => writeln!(out, "erreur (unité {u}) : {e}")?,
        }
    }
    Ok(())
}

/// "!" = ligne précédente, "!n" = n-ième ligne (1 = première). None si pas un rappel.
fn rappel<'h>(ligne: &str, historique: &'h [String]) -> Option<Result<&'h str, String>> {
    let suite = ligne.strip_prefix('!')?;
    let n = if suite.is_empty() {
        historique.len()
    } else {
        match suite.trim().parse::<usize>() {
            Ok(n) => n,
            Err(_) => return Some(Err(format!("rappel invalide : {ligne}"))),
        }
    };
    Some(
        n.checked_sub(1)
            .and_then(|i| historique.get(i))
            .map(String::as_str)
            .ok_or_else(|| format!("historique : pas de ligne {n}")),
    )
}

/// Boucle interactive. "q" / "quit" / "exit" / fin d’entrée terminent.
/// "!" et "!n" rejouent une ligne de l’historique.
fn repl(entree: impl BufRead, out: &mut impl Write, reglages: &Reglages) -> io::Result<bool> {
    let mut session = Session::new();
    let mut historique: Vec<String> = Vec::new();
    let mut tout_ok = true;

    write!(out, "> ")?;
    out.flush()?;
    for ligne in entree.lines() {
        let ligne = ligne?;
        let mut ligne = ligne.trim().to_string();
        if matches!(ligne.as_str(), "q" | "quit" | "exit") {
            break;
        }
        match rappel(&ligne, &historique) {
            Some(Ok(rejouee)) => {
                ligne = rejouee.to_string();
                writeln!(out, "{ligne}")?;
            }
            Some(Err(msg)) => {
                writeln!(out, "{msg}")?;
                ligne.clear();
            }
            None => {}
        }
        if !ligne.is_empty() {
            match session.evaluer_ligne(&ligne, reglages) {
                Ok(r) => writeln!(out, "{}", r.principal(reglages.systeme))?,
                Err(e) => {
                    warn!(erreur = %e, "ligne refusée");
                    writeln!(out, "erreur : {e}")?;
                    tout_ok = false;
                }
            }
            debug!(etat = ?session.etat(), "ligne traitée");
            historique.push(ligne);
        }
        write!(out, "> ")?;
        out.flush()?;
    }
    writeln!(out)?;
    Ok(tout_ok)
}
